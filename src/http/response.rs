use serde::de::DeserializeOwned;
use serde_json::Value;

/// Response captured from the API. Non-2xx statuses land here too; only
/// transport failures are reported as errors.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub duration_ms: u128,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }

    /// The `error` text the API puts in failure bodies, or `Unknown error`.
    pub fn error_message(&self) -> String {
        self.json::<Value>()
            .ok()
            .and_then(|body| match body.get("error")? {
                Value::String(text) => Some(text.clone()),
                other => Some(other.to_string()),
            })
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}
