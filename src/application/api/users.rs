//! `/User` endpoints

use serde::de::IgnoredAny;
use serde_json::Value;

use crate::application::cache::{list_tags, Mutation, Query, Tag, TagKind};
use crate::domain::{CreateUserRequest, UpdateUserRequest, User};
use crate::infrastructure::RequestSpec;
use crate::shared::ApiResult;

pub fn create_user(request: &CreateUserRequest) -> ApiResult<Mutation<Value>> {
    Ok(Mutation::new(
        RequestSpec::post("/User").json(request)?,
        [Tag::whole(TagKind::User)],
    ))
}

pub fn update_user(request: &UpdateUserRequest) -> ApiResult<Mutation<IgnoredAny>> {
    Ok(Mutation::new(
        RequestSpec::put("/User").json(request)?,
        [Tag::whole(TagKind::User)],
    ))
}

pub fn delete_user(user_id: i64) -> Mutation<IgnoredAny> {
    Mutation::new(
        RequestSpec::delete(format!("/User/{}", user_id)),
        [Tag::whole(TagKind::User)],
    )
}

pub fn get_user_by_id(user_id: i64) -> Query<User> {
    Query::new(
        "getUserById",
        user_id,
        RequestSpec::get(format!("/User/{}", user_id)),
        move |_| vec![Tag::id(TagKind::User, user_id)],
    )
}

pub fn get_all_users() -> Query<Vec<User>> {
    Query::new("getAllUsers", "", RequestSpec::get("/User"), |users: Option<&Vec<User>>| {
        list_tags(TagKind::User, users.into_iter().flatten().map(|u| u.id))
    })
}

/// The signed-in user, identified by the bearer token
pub fn user_info() -> Query<User> {
    Query::new("userInfo", "", RequestSpec::get("/User/UserInfo"), |_| {
        vec![Tag::whole(TagKind::User)]
    })
}
