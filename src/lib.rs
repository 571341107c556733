//! # Tracking Services console
//!
//! Headless administrative console for the Tracking Services backend:
//! companies, users, monitored resources, monitoring checks and tasks.
//!
//! ## Architecture
//!
//! - **domain**: records mirrored from the backend and request shapes
//! - **infrastructure**: reqwest HTTP client and session token storage
//! - **application**: typed endpoint catalogue, tag-invalidated query cache,
//!   route guard and form validation
//! - **interfaces**: routes, page controllers and the navigation shell
//! - **runtime**: logging setup and wiring for a front end

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod runtime;
pub mod shared;

pub use application::{ConsoleApi, GuardState, QueryCache, RouteGuard};
pub use config::{default_config_path, AppConfig};
pub use infrastructure::{FileTokenStore, HttpClient, MemoryTokenStore, TokenStore};
pub use interfaces::console::{NavigationOutcome, Route, Shell};
pub use runtime::{init_tracing, Console};
pub use shared::{ApiError, ApiResult, ConsoleError, FormErrors};
