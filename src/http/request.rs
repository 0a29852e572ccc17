use serde_json::Value;

use crate::auth::Credentials;

use super::method::HttpMethod;

/// One call against the API, relative to the client's base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    /// Overrides applied after the default headers, replacing same-named ones.
    pub headers: Vec<(String, String)>,
    pub credentials: Credentials,
    /// Set by [`ApiRequest::anonymous`]; no `Authorization` header from any
    /// source is sent.
    pub without_auth: bool,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
            credentials: Credentials::Anonymous,
            without_auth: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path).with_body(body)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Drop any credentials so the request goes out without `Authorization`.
    pub fn anonymous(mut self) -> Self {
        self.without_auth = true;
        self.with_credentials(Credentials::Anonymous)
    }
}
