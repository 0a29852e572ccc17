use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};

use crate::error::{AppError, RequestError};

use super::request::ApiRequest;
use super::response::ApiResponse;

/// HTTP client bound to one API root.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    /// Sent with every request, after the built-in defaults.
    default_headers: Vec<(String, String)>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let parsed = Url::parse(base_url).map_err(|e| AppError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(AppError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers: Vec::new(),
        })
    }

    pub fn with_default_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.default_headers = headers;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request. HTTP error statuses come back as `Ok`; only
    /// transport-level failures are errors. No retries.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, RequestError> {
        let url = self.url(&request.path);
        let headers = build_headers(&self.default_headers, request)?;

        let mut builder = self
            .client
            .request(request.method.into(), &url)
            .headers(headers);
        if request.method.has_body() {
            if let Some(body) = &request.body {
                builder = builder.body(body.to_string());
            }
        }

        let started = Instant::now();
        let response = builder.send().await.map_err(|source| {
            if source.is_timeout() {
                RequestError::Timeout {
                    method: request.method.to_string(),
                    url: url.clone(),
                }
            } else {
                RequestError::Send {
                    method: request.method.to_string(),
                    url: url.clone(),
                    source,
                }
            }
        })?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| RequestError::ReadBody {
                url: url.clone(),
                source,
            })?;
        let duration_ms = started.elapsed().as_millis();

        tracing::debug!(
            method = %request.method,
            url = %url,
            status,
            size = bytes.len(),
            "request completed"
        );

        Ok(ApiResponse {
            status,
            duration_ms,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Built-in defaults first (`Content-Type`, then `Authorization` from the
/// request's credentials), then the client-wide headers, then the request's own
/// overrides. Later entries replace same-named earlier ones. A client-wide
/// `Authorization` is not applied to anonymous requests.
fn build_headers(
    client_headers: &[(String, String)],
    request: &ApiRequest,
) -> Result<HeaderMap, RequestError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let authorization = request
        .credentials
        .header_value()
        .map_err(|e| RequestError::InvalidHeader {
            name: AUTHORIZATION.to_string(),
            reason: e.to_string(),
        })?;
    if let Some(value) = authorization {
        headers.insert(AUTHORIZATION, value);
    }

    let client_headers = client_headers.iter().filter(|(key, _)| {
        !(request.without_auth && key.trim().eq_ignore_ascii_case(AUTHORIZATION.as_str()))
    });
    for (key, value) in client_headers.chain(&request.headers) {
        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        let header_name =
            HeaderName::from_bytes(key.as_bytes()).map_err(|e| RequestError::InvalidHeader {
                name: key.to_string(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| RequestError::InvalidHeader {
            name: key.to_string(),
            reason: e.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}
