//! `/tasks`: the signed-in user's tasks within their company

use tracing::{info, warn};

use super::{remember, ActionOutcome, Subscriptions};
use crate::application::api::{companies, resources, tasks, ConsoleApi};
use crate::application::cache::{Query, QueryState};
use crate::application::forms::TaskForm;
use crate::domain::{Resource, Task, TaskStatus, UpdateTaskRequest, User};
use crate::interfaces::console::banner::{Banner, Severity};
use crate::interfaces::console::routes::Route;
use crate::interfaces::console::view::{Table, View};

pub const NOT_AN_EMPLOYEE: &str = "The user is not an employee of the companies or has not been found";
pub const NOTHING_TO_ASSIGN: &str = "There are no available resources or users to create the task";
pub const NO_TASKS: &str = "You dont have any tasks";

pub struct TasksPage {
    api: ConsoleApi,
    subs: Subscriptions,
    user_id: Option<i64>,
    company_id: Option<i64>,
    resources: Option<Query<Vec<Resource>>>,
    users: Option<Query<Vec<User>>>,
    tasks: Option<Query<Vec<Task>>>,
    banner: Option<Banner>,
}

impl TasksPage {
    pub fn new(api: ConsoleApi, user: User) -> Self {
        Self {
            subs: Subscriptions::new(api.clone()),
            api,
            user_id: user.id,
            company_id: user.company_id,
            resources: user.company_id.map(resources::get_company_resources),
            users: user.company_id.map(companies::get_company_users),
            tasks: user.id.map(tasks::get_all_user_tasks),
            banner: None,
        }
    }

    pub async fn mount(&mut self) {
        self.subs.load(self.resources.as_ref()).await;
        self.subs.load(self.users.as_ref()).await;
        self.subs.load(self.tasks.as_ref()).await;
    }

    pub fn unmount(&mut self) {
        self.subs.release();
    }

    /// Current task list (empty until loaded)
    pub fn tasks(&self) -> Vec<Task> {
        self.subs.read(self.tasks.as_ref()).into_data().unwrap_or_default()
    }

    /// Statuses offered by the "add task" form
    pub fn creatable_statuses(&self) -> Vec<TaskStatus> {
        TaskStatus::creatable()
    }

    fn record(&mut self, outcome: ActionOutcome) -> ActionOutcome {
        remember(&mut self.banner, outcome)
    }

    pub async fn add_task(&mut self, form: &TaskForm) -> ActionOutcome {
        let (Some(_), Some(user_id)) = (self.company_id, self.user_id) else {
            return self.record(ActionOutcome::failure("The company or user was not found"));
        };
        let request = match form.create(user_id) {
            Ok(request) => request,
            Err(errors) => return ActionOutcome::invalid(errors),
        };
        let mutation = match tasks::create_task(&request) {
            Ok(mutation) => mutation,
            Err(err) => return self.record(ActionOutcome::failure(err.user_message())),
        };
        let outcome = match self.api.cache().mutate(mutation).await {
            Ok(_) => {
                info!(resource_id = request.resource_id, "Task created");
                ActionOutcome::success("The task was successfully added")
            }
            Err(err) => {
                warn!(error = %err, "Task creation failed");
                ActionOutcome::failure("Error when creating a task")
            }
        };
        self.record(outcome)
    }

    pub async fn update_task(&mut self, task_id: i64, form: &TaskForm) -> ActionOutcome {
        if self.company_id.is_none() {
            return self.record(ActionOutcome::failure("Company not found"));
        }
        let request = match form.update(task_id) {
            Ok(request) => request,
            Err(errors) => return ActionOutcome::invalid(errors),
        };
        let outcome = self.send_update(&request).await;
        self.record(outcome)
    }

    async fn send_update(&self, request: &UpdateTaskRequest) -> ActionOutcome {
        let mutation = match tasks::update_task(request) {
            Ok(mutation) => mutation,
            Err(err) => return ActionOutcome::failure(err.user_message()),
        };
        match self.api.cache().mutate(mutation).await {
            Ok(_) => ActionOutcome::success("The issue has been successfully updated"),
            Err(err) => {
                warn!(task_id = request.id, error = %err, "Task update failed");
                ActionOutcome::failure("Issue update error")
            }
        }
    }

    /// Mark a task completed.
    ///
    /// The task is fetched directly from the backend at this point so the
    /// update carries its current fields.
    pub async fn complete_task(&mut self, task_id: i64) -> ActionOutcome {
        if self.company_id.is_none() {
            return self.record(ActionOutcome::failure("Company not found"));
        }
        let task = match self.api.fetch_task(task_id).await {
            Ok(task) => task,
            Err(err) if err.status() == Some(404) => {
                return self.record(ActionOutcome::failure("Task not found"))
            }
            Err(err) => {
                warn!(task_id, error = %err, "Fetching task before completion failed");
                return self.record(ActionOutcome::failure("Error at the end of the task"));
            }
        };
        let Some(request) = UpdateTaskRequest::with_status(&task, TaskStatus::Completed) else {
            return self.record(ActionOutcome::failure("Task not found"));
        };
        let outcome = match tasks::update_task(&request) {
            Ok(mutation) => match self.api.cache().mutate(mutation).await {
                Ok(_) => ActionOutcome::success("The task has been successfully completed"),
                Err(err) => {
                    warn!(task_id, error = %err, "Completing task failed");
                    ActionOutcome::failure("Error at the end of the task")
                }
            },
            Err(err) => ActionOutcome::failure(err.user_message()),
        };
        self.record(outcome)
    }

    pub async fn delete_task(&mut self, task_id: i64) -> ActionOutcome {
        if self.company_id.is_none() {
            return self.record(ActionOutcome::failure("Company not found"));
        }
        let outcome = match self.api.cache().mutate(tasks::delete_task(task_id)).await {
            Ok(_) => ActionOutcome::success("The task was successfully deleted"),
            Err(err) => {
                warn!(task_id, error = %err, "Task deletion failed");
                ActionOutcome::failure("Error when deleting the task")
            }
        };
        self.record(outcome)
    }

    pub async fn reassign_task(&mut self, task_id: i64, new_user_id: i64) -> ActionOutcome {
        if self.company_id.is_none() {
            return self.record(ActionOutcome::failure("Company not found"));
        }
        let mutation = tasks::reassign_task_to_user(new_user_id, task_id);
        let outcome = match self.api.cache().mutate(mutation).await {
            Ok(_) => ActionOutcome::success("The task has been reassigned"),
            Err(err) => {
                warn!(task_id, new_user_id, error = %err, "Task reassignment failed");
                ActionOutcome::failure("Task reassignment error")
            }
        };
        self.record(outcome)
    }

    pub fn view(&self) -> View {
        let mut view = View::new(Route::Tasks.title()).with_banner(self.banner.as_ref());

        let resources = self.subs.read(self.resources.as_ref());
        let users = self.subs.read(self.users.as_ref());
        let tasks = self.subs.read(self.tasks.as_ref());

        if let Some(err) = resources.error().or(users.error()).or(tasks.error()) {
            view.notice(Severity::Error, format!("Data upload error: {}", err));
            return view;
        }
        if self.company_id.is_none() || self.user_id.is_none() {
            view.notice(Severity::Error, NOT_AN_EMPLOYEE);
            return view;
        }
        let (QueryState::Ready(resources), QueryState::Ready(users), QueryState::Ready(tasks)) =
            (resources, users, tasks)
        else {
            view.loading();
            return view;
        };
        if resources.is_empty() || users.is_empty() {
            view.notice(Severity::Warning, NOTHING_TO_ASSIGN);
            return view;
        }

        view.heading("Add a task");
        view.field(
            "Resources",
            resources
                .iter()
                .map(|r| format!("{}={}", r.id.unwrap_or_default(), r.name.as_deref().unwrap_or("")))
                .collect::<Vec<_>>()
                .join(", "),
        );
        view.field(
            "Users",
            users
                .iter()
                .map(|u| format!("{}={}", u.id.unwrap_or_default(), u.username.as_deref().unwrap_or("")))
                .collect::<Vec<_>>()
                .join(", "),
        );
        view.field(
            "Statuses",
            self.creatable_statuses()
                .iter()
                .map(TaskStatus::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        );

        view.heading("My tasks");
        if tasks.is_empty() {
            view.text(NO_TASKS);
            return view;
        }

        let resource_name = |id: Option<i64>| {
            resources
                .iter()
                .find(|r| r.id.is_some() && r.id == id)
                .and_then(|r| r.name.clone())
                .unwrap_or_else(|| "Unknown".to_string())
        };
        let username = |id: Option<i64>| {
            users
                .iter()
                .find(|u| u.id.is_some() && u.id == id)
                .and_then(|u| u.username.clone())
                .unwrap_or_else(|| "Unknown".to_string())
        };

        let mut table = Table::new(["Id", "Description", "Resource", "Created", "AssignedUser", "Status"]);
        for task in &tasks {
            table.push([
                task.id.map(|id| id.to_string()).unwrap_or_default(),
                task.description.clone().unwrap_or_default(),
                resource_name(task.resource_id),
                username(task.created_by_id),
                username(task.assigned_user_id),
                task.task_status.map(|s| s.to_string()).unwrap_or_default(),
            ]);
        }
        view.table(table);
        view
    }
}
