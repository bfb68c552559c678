//! Company directory trait
//!
//! The user/company operations the session layer needs, behind a trait so the
//! resolver and flows can run against a fake backend.

use async_trait::async_trait;
use tally_core::company::{Company, NewCompany, NewUser, UserPatch, UserRecord};

use crate::client::ApiClient;
use crate::endpoints::CreatedCompany;
use crate::error::Result;

/// Remote source of truth for user/company links
#[async_trait]
pub trait CompanyDirectory: Send + Sync {
    /// User record for an email, `None` when the backend does not know it
    async fn find_user(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Company linked to an email. Unknown users and blank links are `None`.
    async fn lookup_company_link(&self, email: &str) -> Result<Option<String>> {
        Ok(self
            .find_user(email)
            .await?
            .and_then(|user| user.linked_company().map(str::to_string)))
    }

    async fn create_user(&self, user: &NewUser) -> Result<()>;

    async fn update_user(&self, user_id: &str, patch: &UserPatch) -> Result<()>;

    async fn delete_user(&self, user_id: &str) -> Result<()>;

    async fn list_companies(&self) -> Result<Vec<Company>>;

    async fn get_company(&self, company_id: &str) -> Result<Company>;

    async fn create_company(&self, company: &NewCompany) -> Result<CreatedCompany>;
}

#[async_trait]
impl CompanyDirectory for ApiClient {
    async fn find_user(&self, email: &str) -> Result<Option<UserRecord>> {
        self.users().find_by_email(email).await
    }

    async fn create_user(&self, user: &NewUser) -> Result<()> {
        self.users().create(user).await?;
        Ok(())
    }

    async fn update_user(&self, user_id: &str, patch: &UserPatch) -> Result<()> {
        self.users().update(user_id, patch).await?;
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.users().delete(user_id).await
    }

    async fn list_companies(&self) -> Result<Vec<Company>> {
        self.companies().list().await
    }

    async fn get_company(&self, company_id: &str) -> Result<Company> {
        self.companies().get(company_id).await
    }

    async fn create_company(&self, company: &NewCompany) -> Result<CreatedCompany> {
        self.companies().create(company).await
    }
}
