//! Headless console: routes, pages and the navigation shell

pub mod banner;
pub mod pages;
pub mod routes;
pub mod shell;
pub mod view;

pub use banner::{Banner, Severity, BANNER_TTL_SECS};
pub use pages::{ActionOutcome, ActivePage};
pub use routes::Route;
pub use shell::{menu, MenuItem, NavigationOutcome, Shell};
pub use view::{Section, Table, View};
