//! `/company`: the signed-in user's company and its members

use super::Subscriptions;
use crate::application::api::{companies, ConsoleApi};
use crate::application::cache::{Query, QueryState};
use crate::domain::{Company, User};
use crate::interfaces::console::banner::Severity;
use crate::interfaces::console::routes::Route;
use crate::interfaces::console::view::{Table, View};

pub const NO_COMPANY: &str = "You don't belong to the company";

pub struct CompanyPage {
    subs: Subscriptions,
    company: Option<Query<Company>>,
    users: Option<Query<Vec<User>>>,
}

pub(crate) fn users_table<'a>(users: impl IntoIterator<Item = &'a User>) -> Table {
    let mut table = Table::new([
        "Id", "Username", "FirstName", "LastName", "Patronymic", "Role", "Email",
    ]);
    for user in users {
        table.push([
            user.id.map(|id| id.to_string()).unwrap_or_default(),
            user.username.clone().unwrap_or_default(),
            user.first_name.clone().unwrap_or_default(),
            user.last_name.clone().unwrap_or_default(),
            user.patronymic.clone().unwrap_or_default(),
            user.role.map(|r| r.to_string()).unwrap_or_default(),
            user.email.clone().unwrap_or_default(),
        ]);
    }
    table
}

impl CompanyPage {
    pub fn new(api: ConsoleApi, user: User) -> Self {
        Self {
            subs: Subscriptions::new(api),
            company: user.company_id.map(companies::get_company_by_id),
            users: user.company_id.map(companies::get_company_users),
        }
    }

    pub async fn mount(&mut self) {
        self.subs.load(self.company.as_ref()).await;
        self.subs.load(self.users.as_ref()).await;
    }

    pub fn unmount(&mut self) {
        self.subs.release();
    }

    pub fn view(&self) -> View {
        let mut view = View::new(Route::Company.title());
        if self.company.is_none() {
            view.notice(Severity::Warning, NO_COMPANY);
            return view;
        }

        let company = self.subs.read(self.company.as_ref());
        let users = self.subs.read(self.users.as_ref());
        match (company, users) {
            (QueryState::Failed(_), _) | (_, QueryState::Failed(_)) => {
                view.notice(Severity::Error, "An error occurred when uploading data");
            }
            (QueryState::Ready(company), QueryState::Ready(users)) => {
                view.heading(company.name());
                view.table(users_table(&users));
            }
            _ => view.loading(),
        }
        view
    }
}
