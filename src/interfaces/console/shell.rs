//! Navigation shell: side menu, route transitions and guarding.

use tracing::{debug, info};

use super::pages::{ActionOutcome, ActivePage};
use super::routes::Route;
use super::view::View;
use crate::application::api::ConsoleApi;
use crate::application::cache::{CacheEvent, EventSubscriber};
use crate::application::session::{GuardState, RouteGuard};
use crate::domain::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub route: Option<Route>,
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    fn link(label: &'static str, route: Route) -> Self {
        Self {
            label,
            route: Some(route),
            children: Vec::new(),
        }
    }

    fn group(label: &'static str, children: Vec<MenuItem>) -> Self {
        Self {
            label,
            route: None,
            children,
        }
    }
}

/// Side menu entries, in display order
pub fn menu() -> Vec<MenuItem> {
    vec![
        MenuItem::link("Company", Route::Company),
        MenuItem::link("Services", Route::Resource),
        MenuItem::link("Tasks", Route::Tasks),
        MenuItem::link("Monitoring", Route::MonitoringSetting),
        MenuItem::group(
            "Admin area",
            vec![
                MenuItem::link("Company management", Route::CompanyManagement),
                MenuItem::link("User management", Route::UserManagement),
            ],
        ),
        MenuItem::link("Account", Route::Account),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    Rendered(Route),
    /// The guard refused `from`; the shell is now on `to`
    Redirected { from: Route, to: Route },
}

impl NavigationOutcome {
    pub fn route(&self) -> Route {
        match self {
            NavigationOutcome::Rendered(route) => *route,
            NavigationOutcome::Redirected { to, .. } => *to,
        }
    }
}

pub struct Shell {
    api: ConsoleApi,
    guard: Option<RouteGuard>,
    page: Option<ActivePage>,
    /// Identity the current page was built for
    page_user: Option<User>,
    events: EventSubscriber,
}

impl Shell {
    pub fn new(api: ConsoleApi) -> Self {
        Self {
            events: api.cache().events(),
            api,
            guard: None,
            page: None,
            page_user: None,
        }
    }

    pub fn api(&self) -> &ConsoleApi {
        &self.api
    }

    pub fn current_route(&self) -> Option<Route> {
        self.page.as_ref().map(ActivePage::route)
    }

    pub fn page(&self) -> Option<&ActivePage> {
        self.page.as_ref()
    }

    pub fn page_mut(&mut self) -> Option<&mut ActivePage> {
        self.page.as_mut()
    }

    pub fn guard_state(&self) -> Option<&GuardState> {
        self.guard.as_ref().map(RouteGuard::state)
    }

    fn leave(&mut self) {
        if let Some(mut page) = self.page.take() {
            debug!(route = %page.route(), "Unmounting page");
            page.unmount();
        }
        self.page_user = None;
        if let Some(mut guard) = self.guard.take() {
            guard.release();
        }
    }

    async fn show(&mut self, route: Route, guard: Option<RouteGuard>) {
        let user = guard.as_ref().and_then(|g| g.user().cloned());
        self.mount_page(route, user).await;
        self.guard = guard;
    }

    async fn mount_page(&mut self, route: Route, user: Option<User>) {
        let mut page = ActivePage::build(route, self.api.clone(), user.clone());
        page.mount().await;
        self.page = Some(page);
        self.page_user = user;
        // events up to here are already reflected by the new page
        self.events.drain();
    }

    /// Rebuild the current page when an invalidation refetched the signed-in
    /// user and it changed (profile edit, company membership). Returns
    /// whether the page was rebuilt.
    pub async fn refresh(&mut self) -> bool {
        let Some(identity) = self.guard.as_ref().and_then(RouteGuard::identity_key).cloned() else {
            self.events.drain();
            return false;
        };
        let touched = self.events.drain().into_iter().any(|message| match message.event {
            CacheEvent::Invalidated { refetched, .. } => refetched.contains(&identity),
            _ => false,
        });
        if !touched {
            return false;
        }

        let live = self.guard.as_ref().and_then(RouteGuard::current_user);
        if live.is_none() || live == self.page_user {
            return false;
        }
        let Some(mut page) = self.page.take() else {
            return false;
        };
        let route = page.route();
        info!(route = %route, "Signed-in user changed, rebuilding page");
        page.unmount();
        self.mount_page(route, live).await;
        true
    }

    /// Unmount the current page and show `route`, guarding protected routes
    pub async fn navigate(&mut self, route: Route) -> NavigationOutcome {
        self.leave();

        if !route.is_protected() {
            self.show(route, None).await;
            return NavigationOutcome::Rendered(route);
        }

        let mut guard = RouteGuard::new(self.api.clone());
        if guard.check().await.is_authenticated() {
            self.show(route, Some(guard)).await;
            NavigationOutcome::Rendered(route)
        } else {
            info!(route = %route, "Not signed in, redirecting to login");
            drop(guard);
            self.show(Route::Login, None).await;
            NavigationOutcome::Redirected {
                from: route,
                to: Route::Login,
            }
        }
    }

    pub async fn navigate_path(&mut self, path: &str) -> NavigationOutcome {
        self.navigate(Route::parse(path)).await
    }

    /// Follow the redirect of an action outcome, if it has one
    pub async fn follow(&mut self, outcome: &ActionOutcome) -> Option<NavigationOutcome> {
        match outcome.redirect {
            Some(route) => Some(self.navigate(route).await),
            None => None,
        }
    }

    pub fn view(&self) -> Option<View> {
        self.page.as_ref().map(ActivePage::view)
    }

    /// Drop the current page without showing another one
    pub fn close(&mut self) {
        self.leave();
    }
}

impl Drop for Shell {
    fn drop(&mut self) {
        self.leave();
    }
}
