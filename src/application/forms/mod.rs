//! Declarative form validation.
//!
//! Each form validates with `validator` derive rules and, only when every
//! field passes, produces the request body for its mutation. Failures come
//! back as [`FormErrors`](crate::shared::FormErrors) keyed by field.

mod auth;
mod company;
mod monitoring;
mod resource;
mod rules;
mod task;
mod user;

pub use auth::{LoginForm, RegisterForm};
pub use company::CompanyForm;
pub use monitoring::MonitoringForm;
pub use resource::ResourceForm;
pub use rules::{password_violations, strong_password, PASSWORD_MIN_LEN};
pub use task::TaskForm;
pub use user::{CreateUserForm, UpdateUserForm};
