//! Company and user record definitions

use serde::{Deserialize, Serialize};

/// A business entity that owns financial records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Request body for creating a company
#[derive(Debug, Clone, Serialize)]
pub struct NewCompany {
    pub name: String,
    pub industry: String,
}

impl NewCompany {
    /// Trims the name; a blank industry becomes `"General"`.
    pub fn new(name: impl Into<String>, industry: impl Into<String>) -> Self {
        let industry = industry.into();
        let industry = industry.trim();
        Self {
            name: name.into().trim().to_string(),
            industry: if industry.is_empty() {
                "General".to_string()
            } else {
                industry.to_string()
            },
        }
    }
}

/// A user row as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
}

impl UserRecord {
    /// The linked company, treating a blank id as no link
    pub fn linked_company(&self) -> Option<&str> {
        self.company_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Request body for creating a user record linked to a company
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub company_id: String,
}

/// Partial update of a user record
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl UserPatch {
    pub fn company(company_id: impl Into<String>) -> Self {
        Self {
            company_id: Some(company_id.into()),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }
}
