//! `/userManagement`: every user of the service

use tracing::warn;

use super::company::users_table;
use super::{failure_message, remember, ActionOutcome, Subscriptions};
use crate::application::api::{companies, users, ConsoleApi};
use crate::application::cache::{Query, QueryState};
use crate::application::forms::{CreateUserForm, UpdateUserForm};
use crate::domain::User;
use crate::interfaces::console::banner::{Banner, Severity};
use crate::interfaces::console::routes::Route;
use crate::interfaces::console::view::View;

pub struct UserManagementPage {
    api: ConsoleApi,
    subs: Subscriptions,
    users: Query<Vec<User>>,
    banner: Option<Banner>,
}

impl UserManagementPage {
    pub fn new(api: ConsoleApi) -> Self {
        Self {
            subs: Subscriptions::new(api.clone()),
            api,
            users: users::get_all_users(),
            banner: None,
        }
    }

    pub async fn mount(&mut self) {
        self.subs.load(Some(&self.users)).await;
    }

    pub fn unmount(&mut self) {
        self.subs.release();
    }

    pub fn users(&self) -> Vec<User> {
        self.subs.read(Some(&self.users)).into_data().unwrap_or_default()
    }

    fn record(&mut self, outcome: ActionOutcome) -> ActionOutcome {
        remember(&mut self.banner, outcome)
    }

    pub async fn create_user(&mut self, form: &CreateUserForm) -> ActionOutcome {
        let request = match form.submit() {
            Ok(request) => request,
            Err(errors) => return ActionOutcome::invalid(errors),
        };
        let result = match users::create_user(&request) {
            Ok(mutation) => self.api.cache().mutate(mutation).await.map(|_| ()),
            Err(err) => Err(err),
        };
        let outcome = match result {
            Ok(()) => ActionOutcome::success(format!("User {} was added", request.username)),
            Err(err) => {
                warn!(username = %request.username, error = %err, "User creation failed");
                ActionOutcome::failure(failure_message("Error when adding a user", &err))
            }
        };
        self.record(outcome)
    }

    pub async fn update_user(&mut self, user_id: i64, form: &UpdateUserForm) -> ActionOutcome {
        let request = match form.submit(user_id) {
            Ok(request) => request,
            Err(errors) => return ActionOutcome::invalid(errors),
        };
        let result = match users::update_user(&request) {
            Ok(mutation) => self.api.cache().mutate(mutation).await.map(|_| ()),
            Err(err) => Err(err),
        };
        let outcome = match result {
            Ok(()) => ActionOutcome::success("The user has been updated"),
            Err(err) => ActionOutcome::failure(failure_message("User update error", &err)),
        };
        self.record(outcome)
    }

    pub async fn delete_user(&mut self, user_id: i64) -> ActionOutcome {
        let outcome = match self.api.cache().mutate(users::delete_user(user_id)).await {
            Ok(_) => ActionOutcome::success("The user has been deleted"),
            Err(err) => ActionOutcome::failure(failure_message("User deletion error", &err)),
        };
        self.record(outcome)
    }

    pub async fn add_to_company(&mut self, user_id: i64, company_id: i64) -> ActionOutcome {
        let mutation = companies::add_user_to_company(user_id, company_id);
        let outcome = match self.api.cache().mutate(mutation).await {
            Ok(_) => ActionOutcome::success("The user has been added to the company"),
            Err(err) => {
                ActionOutcome::failure(failure_message("Error when adding the user to the company", &err))
            }
        };
        self.record(outcome)
    }

    pub async fn remove_from_company(&mut self, user_id: i64, company_id: i64) -> ActionOutcome {
        let mutation = companies::delete_user_from_company(user_id, company_id);
        let outcome = match self.api.cache().mutate(mutation).await {
            Ok(_) => ActionOutcome::success("The user has been removed from the company"),
            Err(err) => ActionOutcome::failure(failure_message(
                "Error when removing the user from the company",
                &err,
            )),
        };
        self.record(outcome)
    }

    pub fn view(&self) -> View {
        let mut view = View::new(Route::UserManagement.title()).with_banner(self.banner.as_ref());
        match self.subs.read(Some(&self.users)) {
            QueryState::Ready(users) => {
                let mut table = users_table(&users);
                table.headers.push("Company".to_string());
                for (row, user) in table.rows.iter_mut().zip(&users) {
                    row.push(user.company_id.map(|id| id.to_string()).unwrap_or_default());
                }
                view.table(table);
            }
            QueryState::Failed(err) => {
                view.notice(Severity::Error, failure_message("Failed to load users", &err))
            }
            QueryState::Loading | QueryState::Skipped => view.loading(),
        }
        view
    }
}
