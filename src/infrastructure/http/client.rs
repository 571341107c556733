//! Thin wrapper around `reqwest` bound to the backend base URL.
//!
//! One attempt per call: no retry, no backoff and no client-side timeout.
//! Errors are returned to the caller for display.

use std::fmt;

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::infrastructure::storage::SharedTokenStore;
use crate::shared::{ApiError, ApiResult};

/// Relative request against the backend
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn json<B: Serialize>(mut self, body: &B) -> ApiResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

impl fmt::Display for RequestSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Backend client.
///
/// Cheap to clone; the token store is shared by every clone.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    tokens: SharedTokenStore,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>, tokens: SharedTokenStore) -> Self {
        Self::with_client(Client::new(), base_url, tokens)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, tokens: SharedTokenStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &SharedTokenStore {
        &self.tokens
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Send a request and return the raw JSON body.
    ///
    /// An empty 2xx body is `null`; a non-JSON 2xx body is returned as a
    /// JSON string.
    pub async fn execute(&self, spec: &RequestSpec) -> ApiResult<Value> {
        let token = self.tokens.load().await?;
        let url = self.url(&spec.path);

        debug!(
            method = %spec.method,
            path = %spec.path,
            authenticated = token.is_some(),
            "Sending request"
        );

        let mut builder = self.client.request(spec.method.clone(), &url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &spec.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), &text);
            warn!(
                method = %spec.method,
                path = %spec.path,
                status = status.as_u16(),
                error = %err,
                "Request failed"
            );
            return Err(err);
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    /// Send a request and decode the body into `T`
    pub async fn request<T: DeserializeOwned>(&self, spec: &RequestSpec) -> ApiResult<T> {
        let value = self.execute(spec).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("{}: {}", spec, e)))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: impl Into<String>) -> ApiResult<T> {
        self.request(&RequestSpec::get(path)).await
    }

    pub async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: impl Into<String>,
        body: &B,
    ) -> ApiResult<T> {
        self.request(&RequestSpec::new(method, path).json(body)?).await
    }
}
