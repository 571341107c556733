//! Resource (monitored service) form

use validator::Validate;

use super::rules::resource_status_name;
use crate::domain::{CreateResourceRequest, ResourceStatus, UpdateResourceRequest};
use crate::shared::FormErrors;

#[derive(Debug, Clone, Validate)]
pub struct ResourceForm {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "Type is required"))]
    pub kind: String,
    #[validate(url(message = "Source must be an absolute URL"))]
    pub source: String,
    #[validate(custom(function = "resource_status_name"))]
    pub status: String,
}

impl Default for ResourceForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: String::new(),
            source: String::new(),
            status: ResourceStatus::Active.to_string(),
        }
    }
}

impl ResourceForm {
    fn status(&self) -> ResourceStatus {
        self.status.parse().unwrap_or(ResourceStatus::Active)
    }

    fn checked(&self) -> Result<Self, FormErrors> {
        let form = Self {
            name: self.name.trim().to_string(),
            kind: self.kind.trim().to_string(),
            source: self.source.trim().to_string(),
            status: self.status.trim().to_string(),
        };
        form.validate()?;
        Ok(form)
    }

    pub fn create(&self, company_id: i64) -> Result<CreateResourceRequest, FormErrors> {
        let form = self.checked()?;
        Ok(CreateResourceRequest {
            status: Some(form.status()),
            name: form.name,
            kind: form.kind,
            source: form.source,
            company_id,
        })
    }

    pub fn update(
        &self,
        resource_id: i64,
        company_id: Option<i64>,
    ) -> Result<UpdateResourceRequest, FormErrors> {
        let form = self.checked()?;
        Ok(UpdateResourceRequest {
            id: resource_id,
            company_id,
            status: form.status(),
            name: form.name,
            kind: form.kind,
            source: form.source,
        })
    }
}
