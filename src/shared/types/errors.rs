//! Error taxonomy shared by the client, the cache and the pages.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Failure of a single backend call.
///
/// `Clone` because one in-flight request may be awaited by several
/// deduplicated callers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// No response at all (connection refused, DNS, broken body)
    #[error("Network error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status
    #[error("Backend error {status}: {message}")]
    Backend {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    /// 2xx response whose body does not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Reading or writing the session credential failed
    #[error("Token storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Build a backend error from a status code and raw response body.
    ///
    /// The message is taken from the first of `message`, `title`, `error`
    /// found in a JSON body, then from a plain-text body, then from the
    /// canonical status reason.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let field = |name: &str| {
            parsed
                .as_ref()
                .and_then(|v| v.get(name))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let message = field("message")
            .or_else(|| field("title"))
            .or_else(|| field("error"))
            .or_else(|| {
                let text = body.trim();
                (parsed.is_none() && !text.is_empty()).then(|| truncate(text, 200))
            })
            .unwrap_or_else(|| reason_phrase(status).to_string());

        ApiError::Backend {
            status,
            message,
            detail: field("detail"),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(400..=499))
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(500..=599))
    }

    /// Text suitable for a banner: the backend message plus detail when present
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Backend {
                message,
                detail: Some(detail),
                ..
            } if detail != message => format!("{} ({})", message, detail),
            ApiError::Backend { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

fn reason_phrase(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Request failed")
}

/// Field-level validation failures collected before any network call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Err(self)` when anything was recorded
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<validator::ValidationErrors> for FormErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FormErrors::new();
        for (field, errs) in errors.field_errors() {
            for e in errs.iter() {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                out.add(field.to_string(), msg);
            }
        }
        out
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return f.write_str("Validation failed");
        }
        let parts: Vec<String> = self
            .fields
            .iter()
            .flat_map(|(field, msgs)| msgs.iter().map(move |m| format!("{}: {}", field, m)))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for FormErrors {}

/// Top-level error of the console front end
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Validation failed: {0}")]
    Form(#[from] FormErrors),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;
