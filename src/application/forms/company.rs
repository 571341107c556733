//! Company name form

use validator::Validate;

use crate::domain::{CreateCompanyRequest, UpdateCompanyRequest};
use crate::shared::FormErrors;

#[derive(Debug, Clone, Default, Validate)]
pub struct CompanyForm {
    #[validate(length(min = 1, max = 100, message = "Company name must be 1-100 characters"))]
    pub company_name: String,
}

impl CompanyForm {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into().trim().to_string(),
        }
    }

    fn checked(&self) -> Result<String, FormErrors> {
        let form = Self::new(self.company_name.as_str());
        form.validate()?;
        Ok(form.company_name)
    }

    pub fn create(&self) -> Result<CreateCompanyRequest, FormErrors> {
        Ok(CreateCompanyRequest {
            company_name: self.checked()?,
        })
    }

    pub fn rename(&self, company_id: i64) -> Result<UpdateCompanyRequest, FormErrors> {
        Ok(UpdateCompanyRequest {
            id: company_id,
            company_name: Some(self.checked()?),
        })
    }
}
