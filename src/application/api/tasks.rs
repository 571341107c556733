//! `/Task` endpoints

use serde::de::IgnoredAny;
use serde_json::Value;

use crate::application::cache::{list_tags, Mutation, Query, Tag, TagKind};
use crate::domain::{CreateTaskRequest, Task, UpdateTaskRequest};
use crate::infrastructure::{HttpClient, RequestSpec};
use crate::shared::ApiResult;

const TASK: [Tag; 1] = [Tag::whole(TagKind::Task)];

pub fn create_task(request: &CreateTaskRequest) -> ApiResult<Mutation<Value>> {
    Ok(Mutation::new(RequestSpec::post("/Task").json(request)?, TASK))
}

pub fn update_task(request: &UpdateTaskRequest) -> ApiResult<Mutation<IgnoredAny>> {
    Ok(Mutation::new(RequestSpec::put("/Task").json(request)?, TASK))
}

pub fn assign_task_to_user(user_id: i64, task_id: i64) -> Mutation<IgnoredAny> {
    Mutation::new(
        RequestSpec::post(format!("/Task/AssignTaskToUser/{}/{}", user_id, task_id)),
        TASK,
    )
}

pub fn reassign_task_to_user(new_user_id: i64, task_id: i64) -> Mutation<IgnoredAny> {
    Mutation::new(
        RequestSpec::put(format!("/Task/ReassignTaskToUser/{}/{}", new_user_id, task_id)),
        TASK,
    )
}

pub fn delete_task(task_id: i64) -> Mutation<IgnoredAny> {
    Mutation::new(RequestSpec::delete(format!("/Task/{}", task_id)), TASK)
}

pub fn get_task_by_id(task_id: i64) -> Query<Task> {
    Query::new(
        "getTaskById",
        task_id,
        RequestSpec::get(format!("/Task/{}", task_id)),
        move |_| vec![Tag::id(TagKind::Task, task_id)],
    )
}

fn task_list_tags(tasks: Option<&Vec<Task>>) -> Vec<Tag> {
    list_tags(TagKind::Task, tasks.into_iter().flatten().map(|t| t.id))
}

pub fn get_all_user_tasks(user_id: i64) -> Query<Vec<Task>> {
    Query::new(
        "getAllUserTasks",
        user_id,
        RequestSpec::get(format!("/Task/GetAllUserTasks/{}", user_id)),
        task_list_tags,
    )
}

pub fn get_all_company_tasks(company_id: i64) -> Query<Vec<Task>> {
    Query::new(
        "getAllCompanyTasks",
        company_id,
        RequestSpec::get(format!("/Task/GetAllCompanyTasks/{}", company_id)),
        task_list_tags,
    )
}

/// Fetch one task straight from the backend, bypassing the cache.
///
/// Used by "complete task", which needs the current record at click time.
pub async fn fetch_task(client: &HttpClient, task_id: i64) -> ApiResult<Task> {
    client.get_json(format!("/Task/{}", task_id)).await
}
