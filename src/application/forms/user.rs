//! User administration and account forms

use validator::Validate;

use super::rules::{non_blank, role_name, strong_password, username_chars};
use crate::domain::{CreateUserRequest, Role, UpdateUserRequest, User};
use crate::shared::FormErrors;

/// "Add user" on the user-management page
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateUserForm {
    #[validate(
        length(min = 3, max = 50, message = "Username must be 3-50 characters"),
        custom(function = "username_chars")
    )]
    pub username: String,
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(max = 100, message = "Patronymic is too long"))]
    pub patronymic: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "strong_password"))]
    pub password: String,
    #[validate(custom(function = "role_name"))]
    pub role: String,
    #[validate(range(min = 1, message = "Company id must be positive"))]
    pub company_id: Option<i64>,
}

impl CreateUserForm {
    fn trimmed(&self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            patronymic: self.patronymic.trim().to_string(),
            email: self.email.trim().to_string(),
            role: self.role.trim().to_string(),
            ..self.clone()
        }
    }

    pub fn submit(&self) -> Result<CreateUserRequest, FormErrors> {
        let form = self.trimmed();
        form.validate()?;
        Ok(CreateUserRequest {
            patronymic: non_blank(&form.patronymic),
            role: form.role.parse().unwrap_or_default(),
            username: form.username,
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            password: form.password,
            company_id: form.company_id,
        })
    }
}

/// Partial update of a user; only the fields that are set are sent.
///
/// Used both by the account page (own profile) and by user management.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateUserForm {
    #[validate(
        length(min = 3, max = 50, message = "Username must be 3-50 characters"),
        custom(function = "username_chars")
    )]
    pub username: Option<String>,
    #[validate(length(min = 1, max = 100, message = "First name must not be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last name must not be empty"))]
    pub last_name: Option<String>,
    #[validate(length(max = 100, message = "Patronymic is too long"))]
    pub patronymic: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(custom(function = "strong_password"))]
    pub password: Option<String>,
    #[validate(custom(function = "role_name"))]
    pub role: Option<String>,
    #[validate(range(min = 1, message = "Company id must be positive"))]
    pub company_id: Option<i64>,
}

impl UpdateUserForm {
    /// Form prefilled with the profile fields of `user`
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            patronymic: user.patronymic.clone(),
            email: user.email.clone(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.patronymic.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.role.is_none()
            && self.company_id.is_none()
    }

    fn trimmed(&self) -> Self {
        let trim = |v: &Option<String>| v.as_deref().map(|s| s.trim().to_string());
        Self {
            username: trim(&self.username),
            first_name: trim(&self.first_name),
            last_name: trim(&self.last_name),
            patronymic: trim(&self.patronymic),
            email: trim(&self.email),
            role: trim(&self.role),
            ..self.clone()
        }
    }

    pub fn submit(&self, user_id: i64) -> Result<UpdateUserRequest, FormErrors> {
        let form = self.trimmed();
        form.validate()?;
        if form.is_empty() {
            let mut errors = FormErrors::new();
            errors.add("form", "Nothing to update");
            return Err(errors);
        }
        Ok(UpdateUserRequest {
            id: user_id,
            role: form.role.as_deref().and_then(|r| r.parse::<Role>().ok()),
            username: form.username,
            first_name: form.first_name,
            last_name: form.last_name,
            patronymic: form.patronymic,
            email: form.email,
            company_id: form.company_id,
            password: form.password,
        })
    }
}
