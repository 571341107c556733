//! `/login`

use tracing::warn;

use super::{remember, ActionOutcome};
use crate::application::api::ConsoleApi;
use crate::application::forms::LoginForm;
use crate::interfaces::console::banner::Banner;
use crate::interfaces::console::routes::Route;
use crate::interfaces::console::view::View;

pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub struct LoginPage {
    api: ConsoleApi,
    banner: Option<Banner>,
}

impl LoginPage {
    pub fn new(api: ConsoleApi) -> Self {
        Self { api, banner: None }
    }

    /// Sign in; on success the shell should follow the redirect to `/`.
    /// A rejected login leaves the stored token untouched.
    pub async fn submit(&mut self, form: &LoginForm) -> ActionOutcome {
        let request = match form.submit() {
            Ok(request) => request,
            Err(errors) => return ActionOutcome::invalid(errors),
        };
        let outcome = match self.api.login(&request).await {
            Ok(()) => ActionOutcome::success("Signed in").redirect_to(Route::Main),
            Err(err) if err.is_unauthorized() => ActionOutcome::failure(INVALID_CREDENTIALS),
            Err(err) => {
                warn!(error = %err, "Login failed");
                ActionOutcome::failure(err.user_message())
            }
        };
        remember(&mut self.banner, outcome)
    }

    pub fn view(&self) -> View {
        let mut view = View::new("Tracking Services").with_banner(self.banner.as_ref());
        view.heading(Route::Login.title());
        view.text("Enter username and password");
        view.text("No account yet? Register at /register");
        view
    }
}
