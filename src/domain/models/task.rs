//! Tasks assigned to company users against a resource

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Opened,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Opened, TaskStatus::InProgress, TaskStatus::Completed];

    /// Statuses offered when creating a task: a new task cannot start completed
    pub fn creatable() -> Vec<TaskStatus> {
        Self::ALL
            .into_iter()
            .filter(|s| *s != TaskStatus::Completed)
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Opened => "Opened",
            TaskStatus::InProgress => "InProgress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Opened
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle: String = s.chars().filter(|c| !matches!(c, ' ' | '_' | '-')).collect();
        TaskStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(&needle))
            .ok_or_else(|| format!("unknown task status: {}", s))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub resource_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_user_id: Option<i64>,
    #[serde(default)]
    pub created_by_id: Option<i64>,
    #[serde(default)]
    pub task_status: Option<TaskStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub resource_id: i64,
    pub description: String,
    pub assigned_user_id: i64,
    pub created_by_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub id: i64,
    pub resource_id: i64,
    pub description: String,
    pub assigned_user_id: i64,
    pub status: TaskStatus,
}

impl UpdateTaskRequest {
    /// Rebuild a full update from a fetched task with a new status.
    ///
    /// Returns `None` when the backend omitted a field the update needs.
    pub fn with_status(task: &Task, status: TaskStatus) -> Option<Self> {
        Some(Self {
            id: task.id?,
            resource_id: task.resource_id?,
            description: task.description.clone()?,
            assigned_user_id: task.assigned_user_id?,
            status,
        })
    }
}
