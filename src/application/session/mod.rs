//! Authenticated-session gating

mod guard;

pub use guard::{GuardState, RouteGuard};
