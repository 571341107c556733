//! Console routes

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Main,
    Login,
    Register,
    Company,
    Tasks,
    UserManagement,
    CompanyManagement,
    MonitoringSetting,
    Resource,
    Account,
}

impl Route {
    pub const ALL: [Route; 10] = [
        Route::Main,
        Route::Login,
        Route::Register,
        Route::Company,
        Route::Tasks,
        Route::UserManagement,
        Route::CompanyManagement,
        Route::MonitoringSetting,
        Route::Resource,
        Route::Account,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Main => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Company => "/company",
            Route::Tasks => "/tasks",
            Route::UserManagement => "/userManagement",
            Route::CompanyManagement => "/companyManagement",
            Route::MonitoringSetting => "/monitoringSetting",
            Route::Resource => "/resource",
            Route::Account => "/account",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Main => "Tracking Services",
            Route::Login => "Sign in",
            Route::Register => "Register",
            Route::Company => "Company",
            Route::Tasks => "Tasks",
            Route::UserManagement => "User Management",
            Route::CompanyManagement => "Company Management",
            Route::MonitoringSetting => "Monitoring",
            Route::Resource => "Resources",
            Route::Account => "Account",
        }
    }

    /// Every route except sign-in and registration needs a session
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }

    /// Parse a path; unknown paths fall back to `/`.
    ///
    /// Matching ignores case, a trailing slash and a missing leading slash.
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim().trim_end_matches('/');
        let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
        Route::ALL
            .into_iter()
            .find(|r| r.path()[1..].eq_ignore_ascii_case(trimmed))
            .unwrap_or(Route::Main)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Route::parse(s))
    }
}
