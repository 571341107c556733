//! Custom field rules shared by several forms

use std::borrow::Cow;
use std::str::FromStr;

use validator::ValidationError;

use crate::domain::{ResourceStatus, Role, TaskStatus};

pub const PASSWORD_MIN_LEN: usize = 8;

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Requirements of the composite password rule that `password` misses
pub fn password_violations(password: &str) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if password.chars().count() < PASSWORD_MIN_LEN {
        missing.push("at least 8 characters");
    }
    if !password.chars().any(char::is_uppercase) {
        missing.push("an uppercase letter");
    }
    if !password.chars().any(char::is_lowercase) {
        missing.push("a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        missing.push("a digit");
    }
    if !password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()) {
        missing.push("a special character");
    }
    missing
}

pub fn strong_password(password: &str) -> Result<(), ValidationError> {
    let missing = password_violations(password);
    if missing.is_empty() {
        return Ok(());
    }
    Err(error(
        "password",
        format!("Password must contain {}", missing.join(", ")),
    ))
}

/// Letters, digits, `_`, `.` and `-`
pub fn username_chars(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Ok(())
    } else {
        Err(error(
            "username",
            "Username may only contain letters, digits, '_', '.' and '-'",
        ))
    }
}

pub fn role_name(role: &str) -> Result<(), ValidationError> {
    Role::from_str(role)
        .map(|_| ())
        .map_err(|_| error("role", "Select a role (User, Moderator or Admin)"))
}

pub fn task_status_name(status: &str) -> Result<(), ValidationError> {
    TaskStatus::from_str(status)
        .map(|_| ())
        .map_err(|_| error("status", "Incorrect status"))
}

pub fn resource_status_name(status: &str) -> Result<(), ValidationError> {
    ResourceStatus::from_str(status)
        .map(|_| ())
        .map_err(|_| error("status", "Status must be Active or Inactive"))
}

/// Trimmed value, `None` when blank
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
