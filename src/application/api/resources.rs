//! `/Resource` endpoints

use serde::de::IgnoredAny;
use serde_json::Value;

use crate::application::cache::{list_tags, Mutation, Query, Tag, TagKind};
use crate::domain::{CreateResourceRequest, Resource, UpdateResourceRequest};
use crate::infrastructure::RequestSpec;
use crate::shared::ApiResult;

pub fn create_resource(request: &CreateResourceRequest) -> ApiResult<Mutation<Value>> {
    Ok(Mutation::new(
        RequestSpec::post("/Resource").json(request)?,
        [Tag::whole(TagKind::Resource)],
    ))
}

pub fn add_company_resource(
    company_id: i64,
    resource: &CreateResourceRequest,
) -> ApiResult<Mutation<IgnoredAny>> {
    Ok(Mutation::new(
        RequestSpec::post(format!("/Resource/{}", company_id)).json(resource)?,
        [Tag::whole(TagKind::Resource)],
    ))
}

pub fn update_company_resource(
    company_id: i64,
    resource_id: i64,
    resource: &UpdateResourceRequest,
) -> ApiResult<Mutation<IgnoredAny>> {
    Ok(Mutation::new(
        RequestSpec::put(format!("/Resource/{}/{}", company_id, resource_id)).json(resource)?,
        [Tag::whole(TagKind::Resource)],
    ))
}

/// Note the path order: resource first, then company
pub fn delete_company_resource(resource_id: i64, company_id: i64) -> Mutation<IgnoredAny> {
    Mutation::new(
        RequestSpec::delete(format!("/Resource/{}/{}", resource_id, company_id)),
        [Tag::whole(TagKind::Resource)],
    )
}

pub fn get_all_resources() -> Query<Vec<Resource>> {
    Query::new(
        "getAllResources",
        "",
        RequestSpec::get("/Resource"),
        |resources: Option<&Vec<Resource>>| {
            list_tags(TagKind::Resource, resources.into_iter().flatten().map(|r| r.id))
        },
    )
}

pub fn get_company_resources(company_id: i64) -> Query<Vec<Resource>> {
    Query::new(
        "getCompanyResources",
        company_id,
        RequestSpec::get(format!("/Resource/GetCompanyResources/{}", company_id)),
        move |_| vec![Tag::id(TagKind::Resource, company_id)],
    )
}
