//! Generated test data

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use serde_json::{json, Value};

/// A registration body that passes validation
pub fn registration_body() -> Value {
    json!({
        "email": SafeEmail().fake::<String>(),
        "password": "password123",
        "firstName": short_name(FirstName().fake()),
        "lastName": short_name(LastName().fake()),
    })
}

pub fn session_body(teacher_id: i64) -> Value {
    json!({
        "name": "Yoga Vinyasa",
        "date": "2026-02-15",
        "description": "A dynamic class that links movement and breath.",
        "teacherId": teacher_id,
    })
}

/// Generated names can exceed the 20 character bound
fn short_name(name: String) -> String {
    let name: String = name.chars().take(20).collect();
    if name.chars().count() < 2 {
        format!("{}x", name)
    } else {
        name
    }
}
