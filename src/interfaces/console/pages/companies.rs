//! `/companyManagement`: every company of the service

use super::{failure_message, remember, ActionOutcome, Subscriptions};
use crate::application::api::{companies, ConsoleApi};
use crate::application::cache::{Query, QueryState};
use crate::application::forms::CompanyForm;
use crate::domain::Company;
use crate::interfaces::console::banner::{Banner, Severity};
use crate::interfaces::console::routes::Route;
use crate::interfaces::console::view::{Table, View};

pub struct CompanyManagementPage {
    api: ConsoleApi,
    subs: Subscriptions,
    companies: Query<Vec<Company>>,
    banner: Option<Banner>,
}

impl CompanyManagementPage {
    pub fn new(api: ConsoleApi) -> Self {
        Self {
            subs: Subscriptions::new(api.clone()),
            api,
            companies: companies::get_all_companies(),
            banner: None,
        }
    }

    pub async fn mount(&mut self) {
        self.subs.load(Some(&self.companies)).await;
    }

    pub fn unmount(&mut self) {
        self.subs.release();
    }

    pub fn companies(&self) -> Vec<Company> {
        self.subs.read(Some(&self.companies)).into_data().unwrap_or_default()
    }

    fn record(&mut self, outcome: ActionOutcome) -> ActionOutcome {
        remember(&mut self.banner, outcome)
    }

    pub async fn create_company(&mut self, form: &CompanyForm) -> ActionOutcome {
        let request = match form.create() {
            Ok(request) => request,
            Err(errors) => return ActionOutcome::invalid(errors),
        };
        let result = match companies::create_company(&request) {
            Ok(mutation) => self.api.cache().mutate(mutation).await.map(|_| ()),
            Err(err) => Err(err),
        };
        let outcome = match result {
            Ok(()) => ActionOutcome::success(format!("Company {} was added", request.company_name)),
            Err(err) => ActionOutcome::failure(failure_message("Error when adding a company", &err)),
        };
        self.record(outcome)
    }

    pub async fn rename_company(&mut self, company_id: i64, form: &CompanyForm) -> ActionOutcome {
        let request = match form.rename(company_id) {
            Ok(request) => request,
            Err(errors) => return ActionOutcome::invalid(errors),
        };
        let result = match companies::update_company(&request) {
            Ok(mutation) => self.api.cache().mutate(mutation).await.map(|_| ()),
            Err(err) => Err(err),
        };
        let outcome = match result {
            Ok(()) => ActionOutcome::success("The company has been updated"),
            Err(err) => ActionOutcome::failure(failure_message("Company update error", &err)),
        };
        self.record(outcome)
    }

    pub async fn delete_company(&mut self, company_id: i64) -> ActionOutcome {
        let outcome = match self.api.cache().mutate(companies::delete_company(company_id)).await {
            Ok(_) => ActionOutcome::success("The company has been deleted"),
            Err(err) => ActionOutcome::failure(failure_message("Company deletion error", &err)),
        };
        self.record(outcome)
    }

    pub fn view(&self) -> View {
        let mut view = View::new(Route::CompanyManagement.title()).with_banner(self.banner.as_ref());
        match self.subs.read(Some(&self.companies)) {
            QueryState::Ready(companies) => {
                let mut table = Table::new(["Id", "Name"]);
                for company in &companies {
                    table.push([
                        company.id.map(|id| id.to_string()).unwrap_or_default(),
                        company.name().to_string(),
                    ]);
                }
                view.table(table);
            }
            QueryState::Failed(err) => {
                view.notice(Severity::Error, failure_message("Failed to load companies", &err))
            }
            QueryState::Loading | QueryState::Skipped => view.loading(),
        }
        view
    }
}
