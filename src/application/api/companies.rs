//! `/Company` endpoints

use serde::de::IgnoredAny;
use serde_json::Value;

use crate::application::cache::{list_tags, Mutation, Query, Tag, TagKind};
use crate::domain::{Company, CreateCompanyRequest, UpdateCompanyRequest, User};
use crate::infrastructure::RequestSpec;
use crate::shared::ApiResult;

const MEMBERSHIP_TAGS: [Tag; 2] = [Tag::whole(TagKind::User), Tag::whole(TagKind::Company)];

pub fn create_company(request: &CreateCompanyRequest) -> ApiResult<Mutation<Value>> {
    Ok(Mutation::new(
        RequestSpec::post("/Company").json(request)?,
        [Tag::whole(TagKind::Company)],
    ))
}

pub fn update_company(request: &UpdateCompanyRequest) -> ApiResult<Mutation<IgnoredAny>> {
    Ok(Mutation::new(
        RequestSpec::put("/Company").json(request)?,
        [Tag::whole(TagKind::Company)],
    ))
}

pub fn delete_company(company_id: i64) -> Mutation<IgnoredAny> {
    Mutation::new(
        RequestSpec::delete(format!("/Company/{}", company_id)),
        [Tag::whole(TagKind::Company)],
    )
}

pub fn add_user_to_company(user_id: i64, company_id: i64) -> Mutation<IgnoredAny> {
    Mutation::new(
        RequestSpec::post(format!("/Company/AddUserToCompany/{}/{}", user_id, company_id)),
        MEMBERSHIP_TAGS,
    )
}

pub fn delete_user_from_company(user_id: i64, company_id: i64) -> Mutation<IgnoredAny> {
    Mutation::new(
        RequestSpec::delete(format!(
            "/Company/DeleteUserFromCompany/{}/{}",
            user_id, company_id
        )),
        MEMBERSHIP_TAGS,
    )
}

pub fn get_company_by_id(company_id: i64) -> Query<Company> {
    Query::new(
        "getCompanyById",
        company_id,
        RequestSpec::get(format!("/Company/{}", company_id)),
        move |_| vec![Tag::id(TagKind::Company, company_id)],
    )
}

pub fn get_all_companies() -> Query<Vec<Company>> {
    Query::new(
        "getAllCompanies",
        "",
        RequestSpec::get("/Company"),
        |companies: Option<&Vec<Company>>| {
            list_tags(TagKind::Company, companies.into_iter().flatten().map(|c| c.id))
        },
    )
}

/// Members of a company; tagged `User:{companyId}`
pub fn get_company_users(company_id: i64) -> Query<Vec<User>> {
    Query::new(
        "getCompanyUsers",
        company_id,
        RequestSpec::get(format!("/Company/GetCompanyUsers/{}", company_id)),
        move |_| vec![Tag::id(TagKind::User, company_id)],
    )
}
