//! Task form

use validator::Validate;

use super::rules::task_status_name;
use crate::domain::{CreateTaskRequest, Task, TaskStatus, UpdateTaskRequest};
use crate::shared::FormErrors;

#[derive(Debug, Clone, Validate)]
pub struct TaskForm {
    #[validate(
        required(message = "Resource is required"),
        range(min = 1, message = "Select a resource")
    )]
    pub resource_id: Option<i64>,
    #[validate(
        required(message = "Assigned user is required"),
        range(min = 1, message = "Select a assigned user")
    )]
    pub assigned_user_id: Option<i64>,
    #[validate(length(min = 3, message = "The description must be at least 3 characters long"))]
    pub description: String,
    #[validate(custom(function = "task_status_name"))]
    pub status: String,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            resource_id: None,
            assigned_user_id: None,
            description: String::new(),
            status: TaskStatus::Opened.to_string(),
        }
    }
}

impl TaskForm {
    /// Form prefilled from an existing task (the edit row)
    pub fn from_task(task: &Task) -> Self {
        Self {
            resource_id: task.resource_id,
            assigned_user_id: task.assigned_user_id,
            description: task.description.clone().unwrap_or_default(),
            status: task.task_status.unwrap_or_default().to_string(),
        }
    }

    fn checked(&self) -> Result<(i64, i64, String, TaskStatus), FormErrors> {
        let description = self.description.trim().to_string();
        let trimmed = Self {
            description: description.clone(),
            ..self.clone()
        };
        trimmed.validate()?;

        let mut errors = FormErrors::new();
        let status = self.status.parse::<TaskStatus>().map_err(|_| {
            errors.add("status", "Incorrect status");
        });
        match (self.resource_id, self.assigned_user_id, status) {
            (Some(resource_id), Some(assigned_user_id), Ok(status)) => {
                Ok((resource_id, assigned_user_id, description, status))
            }
            _ => Err(errors),
        }
    }

    /// New task created by `created_by_id`; `Completed` is not a valid
    /// starting status.
    pub fn create(&self, created_by_id: i64) -> Result<CreateTaskRequest, FormErrors> {
        let (resource_id, assigned_user_id, description, status) = self.checked()?;
        if !TaskStatus::creatable().contains(&status) {
            let mut errors = FormErrors::new();
            errors.add("status", "Incorrect status");
            return Err(errors);
        }
        Ok(CreateTaskRequest {
            resource_id,
            description,
            assigned_user_id,
            created_by_id,
            status: Some(status),
        })
    }

    pub fn update(&self, task_id: i64) -> Result<UpdateTaskRequest, FormErrors> {
        let (resource_id, assigned_user_id, description, status) = self.checked()?;
        Ok(UpdateTaskRequest {
            id: task_id,
            resource_id,
            description,
            assigned_user_id,
            status,
        })
    }
}
