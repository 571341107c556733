//! `/register`

use super::{failure_message, remember, ActionOutcome};
use crate::application::api::ConsoleApi;
use crate::application::forms::RegisterForm;
use crate::interfaces::console::banner::Banner;
use crate::interfaces::console::routes::Route;
use crate::interfaces::console::view::View;

pub struct RegisterPage {
    api: ConsoleApi,
    banner: Option<Banner>,
}

impl RegisterPage {
    pub fn new(api: ConsoleApi) -> Self {
        Self { api, banner: None }
    }

    pub async fn submit(&mut self, form: &RegisterForm) -> ActionOutcome {
        let request = match form.submit() {
            Ok(request) => request,
            Err(errors) => return ActionOutcome::invalid(errors),
        };
        let outcome = match self.api.register(&request).await {
            Ok(()) => ActionOutcome::success("Registration completed, please sign in")
                .redirect_to(Route::Login),
            Err(err) => ActionOutcome::failure(failure_message("Registration failed", &err)),
        };
        remember(&mut self.banner, outcome)
    }

    pub fn view(&self) -> View {
        let mut view = View::new("Tracking Services").with_banner(self.banner.as_ref());
        view.heading(Route::Register.title());
        view.text("Username, first name, last name, patronymic, email, password and confirmation are required");
        view.text("Already have an account? Sign in at /login");
        view
    }
}
