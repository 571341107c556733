//! Company records and requests

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub company_name: Option<String>,
}

impl Company {
    pub fn name(&self) -> &str {
        self.company_name.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    pub company_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyRequest {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}
