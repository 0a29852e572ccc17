//! # Authentication
//!
//! Credentials attached to outgoing API requests. A request either carries the
//! session's bearer token or is explicitly anonymous; the unauthorized-access
//! checks use the anonymous variant instead of touching session state.

use reqwest::header::{HeaderValue, InvalidHeaderValue};

/// Credentials a single request is sent with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    #[default]
    Anonymous,
    BearerToken(String),
}

impl Credentials {
    /// Bearer credentials for `token`, or anonymous when no token is held.
    pub fn from_token(token: Option<&str>) -> Self {
        match token.map(str::trim) {
            Some(token) if !token.is_empty() => Credentials::BearerToken(token.to_string()),
            _ => Credentials::Anonymous,
        }
    }

    /// Value for the `Authorization` header, if any.
    pub fn header_value(&self) -> Result<Option<HeaderValue>, InvalidHeaderValue> {
        match self {
            Credentials::Anonymous => Ok(None),
            Credentials::BearerToken(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
                value.set_sensitive(true);
                Ok(Some(value))
            }
        }
    }
}
