//! Transient success/error messages shown after an action

use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// How long a banner stays visible
pub const BANNER_TTL_SECS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub severity: Severity,
    pub message: String,
    pub shown_at: DateTime<Utc>,
}

impl Banner {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            shown_at: Utc::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn is_success(&self) -> bool {
        self.severity == Severity::Success
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.shown_at + Duration::seconds(BANNER_TTL_SECS)
    }

    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at()
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible_at(Utc::now())
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity.as_str(), self.message)
    }
}
