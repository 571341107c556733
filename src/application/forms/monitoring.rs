//! Monitoring check form

use validator::Validate;

use crate::domain::{CreateMonitoringSettingRequest, UpdateMonitoringSettingRequest};
use crate::shared::FormErrors;

#[derive(Debug, Clone, Default, Validate)]
pub struct MonitoringForm {
    #[validate(range(min = 1, message = "Select a resource"))]
    pub resource_id: i64,
    #[validate(length(min = 1, max = 100, message = "Check interval is required"))]
    pub check_interval: String,
    pub mode: bool,
}

impl MonitoringForm {
    pub fn new(resource_id: i64, check_interval: impl Into<String>, mode: bool) -> Self {
        Self {
            resource_id,
            check_interval: check_interval.into().trim().to_string(),
            mode,
        }
    }

    fn checked(&self) -> Result<Self, FormErrors> {
        let form = Self::new(self.resource_id, self.check_interval.as_str(), self.mode);
        form.validate()?;
        Ok(form)
    }

    pub fn create(&self) -> Result<CreateMonitoringSettingRequest, FormErrors> {
        let form = self.checked()?;
        Ok(CreateMonitoringSettingRequest {
            resource_id: form.resource_id,
            check_interval: form.check_interval,
            mode: form.mode,
        })
    }

    pub fn update(&self, setting_id: i64) -> Result<UpdateMonitoringSettingRequest, FormErrors> {
        let form = self.checked()?;
        Ok(UpdateMonitoringSettingRequest {
            id: setting_id,
            resource_id: form.resource_id,
            check_interval: form.check_interval,
            mode: form.mode,
        })
    }
}
