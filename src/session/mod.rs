//! # Session State
//!
//! Everything one run carries from check to check: the generated test user,
//! the current bearer token and the identifiers captured along the way.
//! Captured identifiers are only ever set, never cleared.

use chrono::{DateTime, TimeZone};
use serde_json::{Value, json};

use crate::auth::Credentials;
use crate::domain::ResourceId;
use crate::http::request::ApiRequest;

const TEST_USER_NAME: &str = "Alex Johnson";
const TEST_USER_PASSWORD: &str = "SecurePass123!";

/// Credentials for the throwaway account a run signs up with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl TestUser {
    /// Build a user whose email is unique to the second `now` falls in.
    pub fn generate<Tz: TimeZone>(now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            name: TEST_USER_NAME.to_string(),
            email: format!("alex.johnson.{}@eduquest.com", now.format("%Y%m%d%H%M%S")),
            password: TEST_USER_PASSWORD.to_string(),
        }
    }

    pub fn signup_body(&self) -> Value {
        json!({
            "name": self.name,
            "email": self.email,
            "password": self.password,
        })
    }

    pub fn login_body(&self) -> Value {
        json!({
            "email": self.email,
            "password": self.password,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    user: TestUser,
    token: Option<String>,
    course_id: Option<ResourceId>,
    enrollment_id: Option<ResourceId>,
    chat_session_id: Option<ResourceId>,
}

impl Session {
    pub fn new(user: TestUser) -> Self {
        Self {
            user,
            token: None,
            course_id: None,
            enrollment_id: None,
            chat_session_id: None,
        }
    }

    pub fn user(&self) -> &TestUser {
        &self.user
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Replace the held token; the latest successful login wins.
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn course_id(&self) -> Option<&ResourceId> {
        self.course_id.as_ref()
    }

    pub fn capture_course(&mut self, id: ResourceId) {
        self.course_id = Some(id);
    }

    pub fn enrollment_id(&self) -> Option<&ResourceId> {
        self.enrollment_id.as_ref()
    }

    pub fn capture_enrollment(&mut self, id: ResourceId) {
        self.enrollment_id = Some(id);
    }

    pub fn chat_session_id(&self) -> Option<&ResourceId> {
        self.chat_session_id.as_ref()
    }

    pub fn capture_chat_session(&mut self, id: ResourceId) {
        self.chat_session_id = Some(id);
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::from_token(self.token())
    }

    /// Attach the session's current credentials to `request`.
    pub fn authorize(&self, request: ApiRequest) -> ApiRequest {
        request.with_credentials(self.credentials())
    }

    // Every request starts out carrying the held token. The only way to send
    // one without it is `ApiRequest::anonymous`.

    pub fn get(&self, path: impl Into<String>) -> ApiRequest {
        self.authorize(ApiRequest::get(path))
    }

    pub fn post(&self, path: impl Into<String>, body: Value) -> ApiRequest {
        self.authorize(ApiRequest::post(path, body))
    }

    pub fn put(&self, path: impl Into<String>, body: Value) -> ApiRequest {
        self.authorize(ApiRequest::put(path, body))
    }
}
