//! Per-resource monitoring checks

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringSetting {
    #[serde(default)]
    pub id: Option<i64>,
    pub resource_id: i64,
    /// Human-readable schedule, e.g. "Every 5 minutes"
    pub check_interval: String,
    pub mode: bool,
}

impl MonitoringSetting {
    pub fn mode_label(&self) -> &'static str {
        if self.mode {
            "Enabled"
        } else {
            "Disabled"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMonitoringSettingRequest {
    pub resource_id: i64,
    pub check_interval: String,
    pub mode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMonitoringSettingRequest {
    pub id: i64,
    pub resource_id: i64,
    pub check_interval: String,
    pub mode: bool,
}
