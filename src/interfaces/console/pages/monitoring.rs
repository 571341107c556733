//! `/monitoringSetting`: company resources joined with their checks

use std::collections::BTreeMap;

use super::resources::resources_table;
use super::{failure_message, remember, ActionOutcome, Subscriptions};
use crate::application::api::{monitoring_settings, resources, ConsoleApi};
use crate::application::cache::{Query, QueryState};
use crate::application::forms::MonitoringForm;
use crate::domain::{MonitoringSetting, Resource, User};
use crate::interfaces::console::banner::{Banner, Severity};
use crate::interfaces::console::routes::Route;
use crate::interfaces::console::view::View;

pub struct MonitoringPage {
    api: ConsoleApi,
    subs: Subscriptions,
    resources: Option<Query<Vec<Resource>>>,
    settings: BTreeMap<i64, Query<Option<MonitoringSetting>>>,
    banner: Option<Banner>,
}

impl MonitoringPage {
    pub fn new(api: ConsoleApi, user: User) -> Self {
        Self {
            subs: Subscriptions::new(api.clone()),
            api,
            resources: user.company_id.map(resources::get_company_resources),
            settings: BTreeMap::new(),
            banner: None,
        }
    }

    /// Loads the company resources, then one setting query per resource
    pub async fn mount(&mut self) {
        let resources = self.subs.load(self.resources.as_ref()).await;
        let ids: Vec<i64> = resources
            .into_data()
            .unwrap_or_default()
            .iter()
            .filter_map(|r| r.id)
            .collect();
        for id in ids {
            let query = self
                .settings
                .entry(id)
                .or_insert_with(|| monitoring_settings::get_monitoring_setting_by_resource_id(id))
                .clone();
            self.subs.load(Some(&query)).await;
        }
    }

    pub fn unmount(&mut self) {
        self.subs.release();
        self.settings.clear();
    }

    /// Setting of `resource_id`; a failed lookup counts as not configured
    pub fn setting(&self, resource_id: i64) -> Option<MonitoringSetting> {
        self.subs
            .read(self.settings.get(&resource_id))
            .into_data()
            .flatten()
    }

    fn record(&mut self, outcome: ActionOutcome) -> ActionOutcome {
        remember(&mut self.banner, outcome)
    }

    pub async fn add_check(&mut self, form: &MonitoringForm) -> ActionOutcome {
        let request = match form.create() {
            Ok(request) => request,
            Err(errors) => return ActionOutcome::invalid(errors),
        };
        let result = match monitoring_settings::create_monitoring_setting(&request) {
            Ok(mutation) => self.api.cache().mutate(mutation).await.map(|_| ()),
            Err(err) => Err(err),
        };
        let outcome = match result {
            Ok(()) => ActionOutcome::success("The check was added"),
            Err(err) => ActionOutcome::failure(failure_message("Error when adding a check", &err)),
        };
        self.record(outcome)
    }

    pub async fn update_check(&mut self, setting_id: i64, form: &MonitoringForm) -> ActionOutcome {
        let request = match form.update(setting_id) {
            Ok(request) => request,
            Err(errors) => return ActionOutcome::invalid(errors),
        };
        let result = match monitoring_settings::update_monitoring_setting(&request) {
            Ok(mutation) => self.api.cache().mutate(mutation).await.map(|_| ()),
            Err(err) => Err(err),
        };
        let outcome = match result {
            Ok(()) => ActionOutcome::success("The check has been updated"),
            Err(err) => ActionOutcome::failure(failure_message("Check update error", &err)),
        };
        self.record(outcome)
    }

    pub async fn delete_check(&mut self, setting_id: i64) -> ActionOutcome {
        let mutation = monitoring_settings::delete_monitoring_setting(setting_id);
        let outcome = match self.api.cache().mutate(mutation).await {
            Ok(_) => ActionOutcome::success("The check has been deleted"),
            Err(err) => ActionOutcome::failure(failure_message("Check deletion error", &err)),
        };
        self.record(outcome)
    }

    pub fn view(&self) -> View {
        let mut view = View::new(Route::MonitoringSetting.title()).with_banner(self.banner.as_ref());
        view.heading("All company resources");

        let resources = match self.subs.read(self.resources.as_ref()) {
            QueryState::Skipped => {
                view.notice(Severity::Warning, "You don't belong to the company");
                return view;
            }
            QueryState::Loading => {
                view.loading();
                return view;
            }
            QueryState::Failed(err) => {
                view.notice(Severity::Error, failure_message("Failed to load resources", &err));
                return view;
            }
            QueryState::Ready(resources) => resources,
        };

        let mut table = resources_table(&resources);
        table.headers.extend(["Check Interval".to_string(), "Mode".to_string()]);
        for (row, resource) in table.rows.iter_mut().zip(&resources) {
            let setting = resource.id.and_then(|id| self.setting(id));
            let interval = setting
                .as_ref()
                .map(|s| s.check_interval.clone())
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| "N/A".to_string());
            let mode = setting.as_ref().map(MonitoringSetting::mode_label).unwrap_or("Disabled");
            row.push(interval);
            row.push(mode.to_string());
        }
        view.table(table);
        view
    }
}
