use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

// ─── Identifiers ──────────────────────────────────────────────────────────────

/// Identifier handed out by the API. Deployments have used both UUID strings
/// and integer keys, so either is accepted and carried opaquely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(i64),
    Text(String),
}

impl ResourceId {
    pub fn to_json(&self) -> Value {
        match self {
            ResourceId::Number(n) => Value::from(*n),
            ResourceId::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Number(n) => write!(f, "{n}"),
            ResourceId::Text(s) => write!(f, "{s}"),
        }
    }
}

// ─── Auth Types ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

// ─── Course Types ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct Course {
    pub id: ResourceId,
    #[serde(default)]
    pub title: String,
}

// ─── Enrollment Types ─────────────────────────────────────────────────────────

/// Body of a successful `POST /enrollments`. The platform answers this one
/// with snake_case keys.
#[derive(Debug, Deserialize)]
pub struct Enrollment {
    pub id: ResourceId,
    pub course_id: ResourceId,
}

/// Entry of `GET /enrollments`; both nested objects must be present.
#[derive(Debug, Deserialize)]
pub struct EnrollmentSummary {
    pub course: Value,
    pub progress: Value,
}

// ─── Progress Types ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub success: bool,
    pub new_xp: Number,
    pub new_level: Number,
    #[serde(default)]
    pub progress: Option<Value>,
}

/// The part of a progress response the accumulation check reads. An absent
/// total reads as zero.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpTotal {
    #[serde(default)]
    pub new_xp: f64,
}

// ─── Chat Types ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatSession {
    pub id: ResourceId,
    /// Required when a session is created; optional when one is fetched.
    pub messages: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct ChatReply {
    pub message: String,
}
