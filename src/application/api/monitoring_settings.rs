//! `/MonitoringSetting` endpoints

use serde::de::IgnoredAny;
use serde_json::Value;

use crate::application::cache::{Mutation, Query, Tag, TagKind};
use crate::domain::{
    CreateMonitoringSettingRequest, MonitoringSetting, UpdateMonitoringSettingRequest,
};
use crate::infrastructure::RequestSpec;
use crate::shared::ApiResult;

const MONITORING: [Tag; 1] = [Tag::whole(TagKind::MonitoringSetting)];

pub fn create_monitoring_setting(
    request: &CreateMonitoringSettingRequest,
) -> ApiResult<Mutation<Value>> {
    Ok(Mutation::new(
        RequestSpec::post("/MonitoringSetting").json(request)?,
        MONITORING,
    ))
}

pub fn update_monitoring_setting(
    request: &UpdateMonitoringSettingRequest,
) -> ApiResult<Mutation<IgnoredAny>> {
    Ok(Mutation::new(
        RequestSpec::put("/MonitoringSetting").json(request)?,
        MONITORING,
    ))
}

pub fn delete_monitoring_setting(setting_id: i64) -> Mutation<IgnoredAny> {
    Mutation::new(
        RequestSpec::delete(format!("/MonitoringSetting/{}", setting_id)),
        MONITORING,
    )
}

/// Setting of one resource; a resource without one answers with an error
/// or an empty body, which pages treat as "not configured".
pub fn get_monitoring_setting_by_resource_id(resource_id: i64) -> Query<Option<MonitoringSetting>> {
    Query::new(
        "getMonitoringSettingByResourceId",
        resource_id,
        RequestSpec::get(format!("/MonitoringSetting/{}", resource_id)),
        move |_| vec![Tag::id(TagKind::MonitoringSetting, resource_id)],
    )
}
