//! `/resource`: company resources and the unowned catalogue

use super::{failure_message, remember, ActionOutcome, Subscriptions};
use crate::application::api::{resources, ConsoleApi};
use crate::application::cache::{Query, QueryState};
use crate::application::forms::ResourceForm;
use crate::domain::{Resource, ResourceStatus, UpdateResourceRequest, User};
use crate::interfaces::console::banner::{Banner, Severity};
use crate::interfaces::console::routes::Route;
use crate::interfaces::console::view::{Table, View};

pub struct ResourcePage {
    api: ConsoleApi,
    subs: Subscriptions,
    company_id: Option<i64>,
    company_resources: Option<Query<Vec<Resource>>>,
    all_resources: Query<Vec<Resource>>,
    banner: Option<Banner>,
}

pub(crate) fn resources_table<'a>(resources: impl IntoIterator<Item = &'a Resource>) -> Table {
    let mut table = Table::new(["Id", "Name", "Type", "Source", "Status"]);
    for resource in resources {
        table.push([
            resource.id.map(|id| id.to_string()).unwrap_or_default(),
            resource.name.clone().unwrap_or_default(),
            resource.kind.clone().unwrap_or_default(),
            resource.source.clone().unwrap_or_else(|| "N/A".to_string()),
            resource.resource_status.map(|s| s.to_string()).unwrap_or_default(),
        ]);
    }
    table
}

impl ResourcePage {
    pub fn new(api: ConsoleApi, user: User) -> Self {
        Self {
            subs: Subscriptions::new(api.clone()),
            api,
            company_id: user.company_id,
            company_resources: user.company_id.map(resources::get_company_resources),
            all_resources: resources::get_all_resources(),
            banner: None,
        }
    }

    pub async fn mount(&mut self) {
        self.subs.load(self.company_resources.as_ref()).await;
        self.subs.load(Some(&self.all_resources)).await;
    }

    pub fn unmount(&mut self) {
        self.subs.release();
    }

    pub fn company_resources(&self) -> Vec<Resource> {
        self.subs
            .read(self.company_resources.as_ref())
            .into_data()
            .unwrap_or_default()
    }

    /// Services not owned by any company
    pub fn catalogue(&self) -> Vec<Resource> {
        self.subs
            .read(Some(&self.all_resources))
            .into_data()
            .unwrap_or_default()
            .into_iter()
            .filter(Resource::is_catalogue)
            .collect()
    }

    fn record(&mut self, outcome: ActionOutcome) -> ActionOutcome {
        remember(&mut self.banner, outcome)
    }

    fn no_company(&mut self) -> ActionOutcome {
        self.record(ActionOutcome::failure("Company not found"))
    }

    pub async fn add_resource(&mut self, form: &ResourceForm) -> ActionOutcome {
        let Some(company_id) = self.company_id else {
            return self.no_company();
        };
        let request = match form.create(company_id) {
            Ok(request) => request,
            Err(errors) => return ActionOutcome::invalid(errors),
        };
        let result = match resources::add_company_resource(company_id, &request) {
            Ok(mutation) => self.api.cache().mutate(mutation).await.map(|_| ()),
            Err(err) => Err(err),
        };
        let outcome = match result {
            Ok(()) => ActionOutcome::success(format!("Service {} was added", request.name)),
            Err(err) => ActionOutcome::failure(failure_message("Error when adding a service", &err)),
        };
        self.record(outcome)
    }

    pub async fn update_resource(&mut self, resource_id: i64, form: &ResourceForm) -> ActionOutcome {
        let Some(company_id) = self.company_id else {
            return self.no_company();
        };
        let request = match form.update(resource_id, Some(company_id)) {
            Ok(request) => request,
            Err(errors) => return ActionOutcome::invalid(errors),
        };
        let outcome = self.send_update(company_id, &request, "The service has been updated").await;
        self.record(outcome)
    }

    /// Take a catalogue service into the user's company
    pub async fn adopt_service(&mut self, resource_id: i64) -> ActionOutcome {
        let Some(company_id) = self.company_id else {
            return self.no_company();
        };
        let Some(service) = self
            .catalogue()
            .into_iter()
            .find(|r| r.id == Some(resource_id))
        else {
            return self.record(ActionOutcome::failure("Service not found"));
        };
        let request = UpdateResourceRequest {
            id: resource_id,
            company_id: Some(company_id),
            name: service.name.unwrap_or_default(),
            kind: service.kind.unwrap_or_default(),
            source: service.source.unwrap_or_default(),
            status: service.resource_status.unwrap_or(ResourceStatus::Active),
        };
        let outcome = self
            .send_update(company_id, &request, "The service has been added to the company")
            .await;
        self.record(outcome)
    }

    async fn send_update(
        &self,
        company_id: i64,
        request: &UpdateResourceRequest,
        success: &str,
    ) -> ActionOutcome {
        let result = match resources::update_company_resource(company_id, request.id, request) {
            Ok(mutation) => self.api.cache().mutate(mutation).await.map(|_| ()),
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => ActionOutcome::success(success),
            Err(err) => ActionOutcome::failure(failure_message("Service update error", &err)),
        }
    }

    pub async fn delete_resource(&mut self, resource_id: i64) -> ActionOutcome {
        let Some(company_id) = self.company_id else {
            return self.no_company();
        };
        let mutation = resources::delete_company_resource(resource_id, company_id);
        let outcome = match self.api.cache().mutate(mutation).await {
            Ok(_) => ActionOutcome::success("The service has been deleted"),
            Err(err) => ActionOutcome::failure(failure_message("Service deletion error", &err)),
        };
        self.record(outcome)
    }

    pub fn view(&self) -> View {
        let mut view = View::new(Route::Resource.title()).with_banner(self.banner.as_ref());

        view.heading("All company resources");
        match self.subs.read(self.company_resources.as_ref()) {
            QueryState::Skipped => view.notice(Severity::Warning, "You don't belong to the company"),
            QueryState::Loading => view.loading(),
            QueryState::Failed(err) => {
                view.notice(Severity::Error, failure_message("Failed to load resources", &err))
            }
            QueryState::Ready(resources) => view.table(resources_table(&resources)),
        }

        view.heading("All services");
        match self.subs.read(Some(&self.all_resources)) {
            QueryState::Ready(_) => view.table(resources_table(&self.catalogue())),
            QueryState::Failed(err) => {
                view.notice(Severity::Error, failure_message("Failed to load services", &err))
            }
            QueryState::Loading | QueryState::Skipped => view.loading(),
        }
        view
    }
}
