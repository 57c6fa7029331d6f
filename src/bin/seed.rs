//! Seed provisioning
//!
//! Creates the admin account, a regular account, the teachers and the
//! initial session catalog. Safe to run repeatedly: existing rows are kept.

use anyhow::Context;
use chrono::NaiveDate;
use tracing::info;

use YogaStudio::{
    config::Settings,
    database::{
        connection::{create_pool, run_migrations, DatabaseConfig},
        SessionRepository, SessionStore, TeacherRepository, TeacherStore, UserRepository,
    },
    models::{CreateSessionRequest, CreateTeacherRequest, CreateUserRequest, Teacher},
    services::password::hash_password,
    utils::logging,
};

const SEED_PASSWORD: &str = "test!1234";

const TEACHERS: [(&str, &str); 3] = [
    ("Margot", "Delahaye"),
    ("Hélène", "Thiercelin"),
    ("David", "Martin"),
];

/// (name, date, description, index into TEACHERS)
const SESSIONS: [(&str, &str, &str, usize); 4] = [
    (
        "Yoga Vinyasa",
        "2026-02-15",
        "A dynamic class that links movement and breath. Builds strength and flexibility.",
        0,
    ),
    (
        "Yoga Hatha",
        "2026-02-20",
        "A gentle practice open to everyone, centred on postures and mindful breathing.",
        1,
    ),
    (
        "Yoga Ashtanga",
        "2026-02-25",
        "A traditional, structured style with a set series of flowing postures.",
        0,
    ),
    (
        "Yin Yoga",
        "2026-03-01",
        "A slow, meditative practice with long holds that stretch the deep tissues.",
        2,
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let settings = Settings::new().context("Failed to load configuration")?;
    settings.validate().context("Invalid configuration")?;
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting seed...");

    let pool = create_pool(&DatabaseConfig::from(&settings.database))
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool).await.context("Failed to run migrations")?;

    let users = UserRepository::new(pool.clone());
    let teachers = TeacherRepository::new(pool.clone());
    let sessions = SessionRepository::new(pool);

    let password_hash = hash_password(SEED_PASSWORD, settings.auth.bcrypt_cost).await?;

    let admin = users
        .upsert(CreateUserRequest {
            email: "yoga@studio.com".to_string(),
            password_hash: password_hash.clone(),
            first_name: "Admin".to_string(),
            last_name: "Yoga".to_string(),
            admin: true,
        })
        .await
        .context("Failed to provision admin user")?;
    info!(email = %admin.email, "Admin user ready");

    let regular = users
        .upsert(CreateUserRequest {
            email: "user@test.com".to_string(),
            password_hash,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            admin: false,
        })
        .await
        .context("Failed to provision regular user")?;
    info!(email = %regular.email, "Regular user ready");

    let mut provisioned: Vec<Teacher> = Vec::with_capacity(TEACHERS.len());
    for (first_name, last_name) in TEACHERS {
        let teacher = match teachers.find_by_name(first_name, last_name).await? {
            Some(existing) => existing,
            None => {
                teachers
                    .create(CreateTeacherRequest {
                        first_name: first_name.to_string(),
                        last_name: last_name.to_string(),
                    })
                    .await?
            }
        };
        provisioned.push(teacher);
    }
    info!(count = provisioned.len(), "Teachers ready");

    for (name, date, description, teacher_index) in SESSIONS {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Bad seed date for {}", name))?;

        if sessions.find_by_name_and_date(name, date).await?.is_some() {
            continue;
        }

        let session = sessions
            .create(CreateSessionRequest {
                name: name.to_string(),
                date,
                description: description.to_string(),
                teacher_id: provisioned[teacher_index].id,
            })
            .await?;
        info!(session_id = session.id, name = %session.name, "Session created");
    }

    info!(users = users.count().await?, "Seed completed successfully!");
    Ok(())
}
