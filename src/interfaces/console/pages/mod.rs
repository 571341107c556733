//! Page controllers, one per route.
//!
//! A page subscribes its queries on `mount`, reads them back from the cache
//! in `view` (so refetches after an invalidation show up on the next
//! render) and drops them on `unmount`. Actions never fail outward: they
//! return an [`ActionOutcome`] with a banner, field errors or a redirect.

mod account;
mod companies;
mod company;
mod login;
mod main_page;
mod monitoring;
mod register;
mod resources;
mod tasks;
mod users;

pub use account::AccountPage;
pub use companies::CompanyManagementPage;
pub use company::CompanyPage;
pub use login::LoginPage;
pub use main_page::MainPage;
pub use monitoring::MonitoringPage;
pub use register::RegisterPage;
pub use resources::ResourcePage;
pub use tasks::TasksPage;
pub use users::UserManagementPage;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::banner::Banner;
use super::routes::Route;
use super::view::View;
use crate::application::api::ConsoleApi;
use crate::application::cache::{Query, QueryKey, QueryState};
use crate::domain::User;
use crate::shared::{ApiError, FormErrors};

/// Result of a user action on a page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionOutcome {
    pub banner: Option<Banner>,
    pub errors: FormErrors,
    pub redirect: Option<Route>,
}

impl ActionOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            banner: Some(Banner::success(message)),
            ..Self::default()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            banner: Some(Banner::error(message)),
            ..Self::default()
        }
    }

    /// Form validation failed; nothing was sent
    pub fn invalid(errors: FormErrors) -> Self {
        Self {
            errors,
            ..Self::default()
        }
    }

    pub fn redirect_to(mut self, route: Route) -> Self {
        self.redirect = Some(route);
        self
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && self.banner.as_ref().map(Banner::is_success).unwrap_or(true)
    }
}

/// "Context: backend message" for an error banner
pub(crate) fn failure_message(context: &str, err: &ApiError) -> String {
    format!("{}: {}", context, err.user_message())
}

/// Keep the outcome's banner on the page so the next `view` shows it
pub(crate) fn remember(slot: &mut Option<Banner>, outcome: ActionOutcome) -> ActionOutcome {
    if outcome.banner.is_some() {
        *slot = outcome.banner.clone();
    }
    outcome
}

/// Queries a page holds while mounted
pub(crate) struct Subscriptions {
    api: ConsoleApi,
    keys: Vec<QueryKey>,
}

impl Subscriptions {
    pub fn new(api: ConsoleApi) -> Self {
        Self {
            api,
            keys: Vec::new(),
        }
    }

    /// Subscribe `query`, or report it skipped when its prerequisite is unknown
    pub async fn load<T>(&mut self, query: Option<&Query<T>>) -> QueryState<T>
    where
        T: DeserializeOwned + 'static,
    {
        let Some(query) = query else {
            return QueryState::Skipped;
        };
        if self.keys.contains(query.key()) {
            return self.api.cache().read(query);
        }
        let state = self.api.cache().subscribe(query).await;
        self.keys.push(query.key().clone());
        state
    }

    pub fn read<T: DeserializeOwned>(&self, query: Option<&Query<T>>) -> QueryState<T> {
        match query {
            Some(query) => self.api.cache().read(query),
            None => QueryState::Skipped,
        }
    }

    pub fn release(&mut self) {
        for key in self.keys.drain(..) {
            self.api.cache().unsubscribe(&key);
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        if !self.keys.is_empty() {
            debug!(count = self.keys.len(), "Releasing page subscriptions on drop");
            self.release();
        }
    }
}

/// The page currently shown by the shell
pub enum ActivePage {
    Main(MainPage),
    Login(LoginPage),
    Register(RegisterPage),
    Company(CompanyPage),
    Tasks(TasksPage),
    UserManagement(UserManagementPage),
    CompanyManagement(CompanyManagementPage),
    MonitoringSetting(MonitoringPage),
    Resource(ResourcePage),
    Account(AccountPage),
}

impl ActivePage {
    /// Build the page for `route`; protected pages need the signed-in user
    pub(crate) fn build(route: Route, api: ConsoleApi, user: Option<User>) -> Self {
        let user = user.unwrap_or_default();
        match route {
            Route::Main => ActivePage::Main(MainPage::new(api, user)),
            Route::Login => ActivePage::Login(LoginPage::new(api)),
            Route::Register => ActivePage::Register(RegisterPage::new(api)),
            Route::Company => ActivePage::Company(CompanyPage::new(api, user)),
            Route::Tasks => ActivePage::Tasks(TasksPage::new(api, user)),
            Route::UserManagement => ActivePage::UserManagement(UserManagementPage::new(api)),
            Route::CompanyManagement => {
                ActivePage::CompanyManagement(CompanyManagementPage::new(api))
            }
            Route::MonitoringSetting => {
                ActivePage::MonitoringSetting(MonitoringPage::new(api, user))
            }
            Route::Resource => ActivePage::Resource(ResourcePage::new(api, user)),
            Route::Account => ActivePage::Account(AccountPage::new(api)),
        }
    }

    pub fn route(&self) -> Route {
        match self {
            ActivePage::Main(_) => Route::Main,
            ActivePage::Login(_) => Route::Login,
            ActivePage::Register(_) => Route::Register,
            ActivePage::Company(_) => Route::Company,
            ActivePage::Tasks(_) => Route::Tasks,
            ActivePage::UserManagement(_) => Route::UserManagement,
            ActivePage::CompanyManagement(_) => Route::CompanyManagement,
            ActivePage::MonitoringSetting(_) => Route::MonitoringSetting,
            ActivePage::Resource(_) => Route::Resource,
            ActivePage::Account(_) => Route::Account,
        }
    }

    pub async fn mount(&mut self) {
        match self {
            ActivePage::Main(p) => p.mount().await,
            ActivePage::Login(_) | ActivePage::Register(_) => {}
            ActivePage::Company(p) => p.mount().await,
            ActivePage::Tasks(p) => p.mount().await,
            ActivePage::UserManagement(p) => p.mount().await,
            ActivePage::CompanyManagement(p) => p.mount().await,
            ActivePage::MonitoringSetting(p) => p.mount().await,
            ActivePage::Resource(p) => p.mount().await,
            ActivePage::Account(p) => p.mount().await,
        }
    }

    pub fn view(&self) -> View {
        match self {
            ActivePage::Main(p) => p.view(),
            ActivePage::Login(p) => p.view(),
            ActivePage::Register(p) => p.view(),
            ActivePage::Company(p) => p.view(),
            ActivePage::Tasks(p) => p.view(),
            ActivePage::UserManagement(p) => p.view(),
            ActivePage::CompanyManagement(p) => p.view(),
            ActivePage::MonitoringSetting(p) => p.view(),
            ActivePage::Resource(p) => p.view(),
            ActivePage::Account(p) => p.view(),
        }
    }

    pub fn unmount(&mut self) {
        match self {
            ActivePage::Main(p) => p.unmount(),
            ActivePage::Login(_) | ActivePage::Register(_) => {}
            ActivePage::Company(p) => p.unmount(),
            ActivePage::Tasks(p) => p.unmount(),
            ActivePage::UserManagement(p) => p.unmount(),
            ActivePage::CompanyManagement(p) => p.unmount(),
            ActivePage::MonitoringSetting(p) => p.unmount(),
            ActivePage::Resource(p) => p.unmount(),
            ActivePage::Account(p) => p.unmount(),
        }
    }
}
