//! HTTP transport for the StatusCake API.
//!
//! Every call is a single attempt. Responses are classified into [`Outcome::Success`]
//! or [`Outcome::Failure`]; nothing here returns an error for a remote condition.

use std::fmt;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::normalize::Form;
use crate::status::{Status, value_text};

/// Production API origin.
pub const DEFAULT_BASE_URL: &str = "https://api.statuscake.com";

/// Connection settings for [`ApiClient`].
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"********")
            .finish()
    }
}

/// Classified result of one request that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// `None` when no response was received.
    pub status: Option<StatusCode>,
    pub message: String,
}

impl From<Failure> for Status {
    fn from(failure: Failure) -> Self {
        Status::failed(failure.message)
    }
}

/// Result of one request.
#[derive(Debug, Clone)]
pub enum Outcome {
    Success {
        status: StatusCode,
        body: Option<Value>,
    },
    Failure(Failure),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn into_result(self) -> std::result::Result<(StatusCode, Option<Value>), Failure> {
        match self {
            Outcome::Success { status, body } => Ok((status, body)),
            Outcome::Failure(failure) => Err(failure),
        }
    }
}

/// Authenticated client bound to one API origin.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(Error::Client(format!(
                "base url must be http(s): {}",
                config.base_url
            )));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| Error::Client("api key is not a valid header value".to_string()))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("cakesync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    pub fn full_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue one request. `path` is relative to the base url and may carry a query string.
    pub async fn request(&self, method: Method, path: &str, body: Option<&Form>) -> Outcome {
        let url = self.full_url(path);
        debug!("{} {}", method, url);

        let mut builder = self.http.request(method.clone(), &url);
        if let Some(form) = body {
            builder = builder.form(&form.pairs());
        }
        let sent = body.map(Form::redacted).unwrap_or_else(|| "{}".to_string());

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} {} failed: {}", method, url, e);
                return Outcome::Failure(Failure {
                    status: None,
                    message: format!("message: {}, errors: {{}}, data: {}", e, sent),
                });
            }
        };

        let status = response.status();
        if status.is_success() {
            let bytes = match response.bytes().await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("{} {} body unreadable: {}", method, url, e);
                    return Outcome::Failure(Failure {
                        status: Some(status),
                        message: format!("message: {}, errors: {{}}, data: {}", e, sent),
                    });
                }
            };
            let body = if bytes.is_empty() {
                None
            } else {
                match serde_json::from_slice(&bytes) {
                    Ok(value) => Some(value),
                    Err(e) => {
                        debug!("{} {} returned non-JSON body: {}", method, url, e);
                        None
                    }
                }
            };
            debug!("{} {} -> {}", method, url, status);
            return Outcome::Success { status, body };
        }

        let reason = status.canonical_reason().unwrap_or("Unknown Status").to_string();
        let headers = format!("{:?}", response.headers());
        let text = response.text().await.unwrap_or_default();
        let (message, errors) = match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(obj)) => (
                obj.get("message").map(value_text).unwrap_or_else(|| reason.clone()),
                obj.get("errors")
                    .map(value_text)
                    .unwrap_or_else(|| "{}".to_string()),
            ),
            _ => (reason, headers),
        };

        warn!("{} {} -> {}: {}", method, url, status, message);
        Outcome::Failure(Failure {
            status: Some(status),
            message: format!(
                "HTTP {}: message: {}, errors: {}, data: {}",
                status.as_u16(),
                message,
                errors,
                sent
            ),
        })
    }
}
