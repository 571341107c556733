//! Login and registration forms

use validator::Validate;

use super::rules::{strong_password, username_chars};
use crate::domain::{LoginRequest, RegisterRequest};
use crate::shared::FormErrors;

#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn submit(&self) -> Result<LoginRequest, FormErrors> {
        let form = Self::new(self.username.as_str(), self.password.as_str());
        form.validate()?;
        Ok(LoginRequest {
            username: form.username,
            password: form.password,
        })
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct RegisterForm {
    #[validate(
        length(min = 3, max = 50, message = "Username must be 3-50 characters"),
        custom(function = "username_chars")
    )]
    pub username: String,
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, max = 100, message = "Patronymic is required"))]
    pub patronymic: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "strong_password"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirmation: String,
}

impl RegisterForm {
    /// Text fields trimmed; passwords are kept as typed
    fn trimmed(&self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            patronymic: self.patronymic.trim().to_string(),
            email: self.email.trim().to_string(),
            ..self.clone()
        }
    }

    pub fn submit(&self) -> Result<RegisterRequest, FormErrors> {
        let form = self.trimmed();
        form.validate()?;
        Ok(RegisterRequest {
            username: form.username,
            first_name: form.first_name,
            last_name: form.last_name,
            patronymic: form.patronymic,
            email: form.email,
            password: form.password,
            password_confirmation: form.password_confirmation,
        })
    }
}
