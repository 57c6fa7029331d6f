//! Typed HTTP client for the studio API
//!
//! Wraps every endpoint and keeps the local session (bearer token plus
//! cached profile) in an injected [`SessionStorage`]. Failed calls come back
//! as [`ClientError`] values; nothing here panics on a bad response.

pub mod error;
pub mod storage;

pub use error::{ClientError, ClientResult, FALLBACK_MESSAGE};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::models::{
    AuthResponse, CreateSessionPayload, LoginRequest, RegisterRequest, SessionDetails, Teacher,
    UpdateSessionPayload, User,
};
use crate::utils::errors::MessageBody;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    storage: Arc<dyn SessionStorage>,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:8080`
    pub fn new(base_url: &str, storage: Arc<dyn SessionStorage>) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("YogaStudio-Client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http,
            base_url,
            storage,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // Local session

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let body = LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        };
        let response: AuthResponse = self.send(Method::POST, "api/auth/login", Some(&body)).await?;
        self.store_session(&response)?;
        Ok(response)
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        let response: AuthResponse = self.send(Method::POST, "api/auth/register", Some(request)).await?;
        self.store_session(&response)?;
        Ok(response)
    }

    pub fn logout(&self) -> ClientResult<()> {
        self.storage.clear()
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Cached profile from the last login or registration
    pub fn current_user(&self) -> Option<AuthResponse> {
        let raw = self.storage.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable cached profile");
                None
            }
        }
    }

    /// Merge `patch` (a JSON object) into the cached profile.
    ///
    /// Returns `None` when nobody is signed in.
    pub fn update_current_user(&self, patch: Value) -> ClientResult<Option<AuthResponse>> {
        let Some(raw) = self.storage.get(USER_KEY) else {
            return Ok(None);
        };

        let mut profile: Value = serde_json::from_str(&raw)?;
        if let (Some(profile), Value::Object(patch)) = (profile.as_object_mut(), patch) {
            profile.extend(patch);
        }

        let updated: AuthResponse = serde_json::from_value(profile)?;
        self.storage.set(USER_KEY, &serde_json::to_string(&updated)?)?;
        Ok(Some(updated))
    }

    fn store_session(&self, response: &AuthResponse) -> ClientResult<()> {
        self.storage.set(TOKEN_KEY, &response.token)?;
        self.storage.set(USER_KEY, &serde_json::to_string(response)?)
    }

    // Sessions

    pub async fn sessions(&self) -> ClientResult<Vec<SessionDetails>> {
        self.send(Method::GET, "api/session", None::<&()>).await
    }

    pub async fn session(&self, id: i64) -> ClientResult<SessionDetails> {
        self.send(Method::GET, &format!("api/session/{}", id), None::<&()>).await
    }

    pub async fn create_session(&self, payload: &CreateSessionPayload) -> ClientResult<SessionDetails> {
        self.send(Method::POST, "api/session", Some(payload)).await
    }

    pub async fn update_session(&self, id: i64, payload: &UpdateSessionPayload) -> ClientResult<SessionDetails> {
        self.send(Method::PUT, &format!("api/session/{}", id), Some(payload)).await
    }

    pub async fn delete_session(&self, id: i64) -> ClientResult<MessageBody> {
        self.send(Method::DELETE, &format!("api/session/{}", id), None::<&()>).await
    }

    pub async fn participate(&self, session_id: i64, user_id: i64) -> ClientResult<MessageBody> {
        let path = format!("api/session/{}/participate/{}", session_id, user_id);
        self.send(Method::POST, &path, None::<&()>).await
    }

    pub async fn unparticipate(&self, session_id: i64, user_id: i64) -> ClientResult<MessageBody> {
        let path = format!("api/session/{}/participate/{}", session_id, user_id);
        self.send(Method::DELETE, &path, None::<&()>).await
    }

    // Teachers

    pub async fn teachers(&self) -> ClientResult<Vec<Teacher>> {
        self.send(Method::GET, "api/teacher", None::<&()>).await
    }

    pub async fn teacher(&self, id: i64) -> ClientResult<Teacher> {
        self.send(Method::GET, &format!("api/teacher/{}", id), None::<&()>).await
    }

    // Users

    pub async fn user(&self, id: i64) -> ClientResult<User> {
        self.send(Method::GET, &format!("api/user/{}", id), None::<&()>).await
    }

    /// Deleting the signed-in account also signs out
    pub async fn delete_user(&self, id: i64) -> ClientResult<MessageBody> {
        let message: MessageBody = self
            .send(Method::DELETE, &format!("api/user/{}", id), None::<&()>)
            .await?;

        if self.current_user().is_some_and(|user| user.id == id) {
            self.logout()?;
        }
        Ok(message)
    }

    pub async fn promote_self_to_admin(&self) -> ClientResult<User> {
        let user: User = self.send(Method::POST, "api/user/promote-admin", None::<&()>).await?;
        self.update_current_user(serde_json::json!({ "admin": user.admin }))?;
        Ok(user)
    }

    // Transport

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.base_url.join(path)?;
        debug!(method = %method, url = %url, "Sending API request");

        let mut request: RequestBuilder = self.http.request(method, url);
        if let Some(token) = self.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &text));
        }

        Ok(response.json().await?)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// The server's `message` when the body carries one, the fallback otherwise
fn api_error(status: u16, body: &str) -> ClientError {
    let message = serde_json::from_str::<MessageBody>(body)
        .ok()
        .map(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());

    ClientError::Api { status, message }
}
