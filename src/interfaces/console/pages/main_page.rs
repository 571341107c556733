//! `/` overview: welcome header and counters

use super::Subscriptions;
use crate::application::api::{companies, resources, tasks, ConsoleApi};
use crate::application::cache::{Query, QueryState};
use crate::domain::{Company, Resource, Task, TaskStatus, User};
use crate::interfaces::console::routes::Route;
use crate::interfaces::console::view::{Section, View};

pub struct MainPage {
    subs: Subscriptions,
    user: User,
    my_tasks: Option<Query<Vec<Task>>>,
    companies: Query<Vec<Company>>,
    company_resources: Option<Query<Vec<Resource>>>,
    company_users: Option<Query<Vec<User>>>,
}

impl MainPage {
    pub fn new(api: ConsoleApi, user: User) -> Self {
        Self {
            my_tasks: user.id.map(tasks::get_all_user_tasks),
            companies: companies::get_all_companies(),
            company_resources: user.company_id.map(resources::get_company_resources),
            company_users: user.company_id.map(companies::get_company_users),
            subs: Subscriptions::new(api),
            user,
        }
    }

    pub async fn mount(&mut self) {
        self.subs.load(self.my_tasks.as_ref()).await;
        self.subs.load(Some(&self.companies)).await;
        self.subs.load(self.company_resources.as_ref()).await;
        self.subs.load(self.company_users.as_ref()).await;
    }

    pub fn unmount(&mut self) {
        self.subs.release();
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Counters as shown on the overview cards; `None` while unknown
    pub fn counts(&self) -> Vec<(&'static str, Option<usize>)> {
        let count = |state: QueryState<usize>| match state {
            QueryState::Ready(n) => Some(n),
            QueryState::Skipped => Some(0),
            _ => None,
        };
        let active_tasks = self.subs.read(self.my_tasks.as_ref()).map(|tasks| {
            tasks
                .iter()
                .filter(|t| t.task_status != Some(TaskStatus::Completed))
                .count()
        });
        vec![
            ("Active Tasks", count(active_tasks)),
            ("Companies", count(self.subs.read(Some(&self.companies)).map(|c| c.len()))),
            (
                "Resources",
                count(self.subs.read(self.company_resources.as_ref()).map(|r| r.len())),
            ),
            ("Users", count(self.subs.read(self.company_users.as_ref()).map(|u| u.len()))),
        ]
    }

    pub fn view(&self) -> View {
        let mut view = View::new(Route::Main.title());
        view.heading("Welcome to Tracking Services");
        view.text(format!("Signed in as {}", self.user.display_name()));
        let counts = self
            .counts()
            .into_iter()
            .map(|(label, n)| (label.to_string(), n.unwrap_or(0)))
            .collect();
        view.sections.push(Section::Counts(counts));
        view
    }
}
