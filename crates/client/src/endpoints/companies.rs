//! `/companies` endpoints

use tally_core::company::{Company, NewCompany, UserRecord};

use crate::client::ApiClient;
use crate::envelope::{Ack, Envelope};
use crate::error::{ApiError, Result};

/// Outcome of creating a company
#[derive(Debug, Clone)]
pub struct CreatedCompany {
    pub company: Company,
    /// A company with the same name already existed and was returned instead
    pub existing: bool,
    pub message: Option<String>,
}

pub struct Companies<'a> {
    client: &'a ApiClient,
}

impl<'a> Companies<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// All companies, deduplicated by name on the server
    pub async fn list(&self) -> Result<Vec<Company>> {
        self.client
            .get::<Envelope<Vec<Company>>>("/companies/")
            .await?
            .into_data()
    }

    pub async fn get(&self, company_id: &str) -> Result<Company> {
        let path = format!("/companies/{}", urlencoding::encode(company_id));
        self.client
            .get::<Envelope<Company>>(&path)
            .await?
            .into_data()
    }

    /// Create a company. The server returns the existing row when the name is
    /// taken, flagged by a message.
    pub async fn create(&self, company: &NewCompany) -> Result<CreatedCompany> {
        let envelope = self
            .client
            .post::<Envelope<Vec<Company>>, _>("/companies/", company)
            .await?;
        let message = envelope.message.clone();
        let company = envelope
            .into_data()?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::unexpected("company creation returned no rows"))?;

        Ok(CreatedCompany {
            company,
            existing: message.is_some(),
            message,
        })
    }

    pub async fn delete(&self, company_id: &str) -> Result<()> {
        let path = format!("/companies/{}", urlencoding::encode(company_id));
        self.client.delete::<Ack>(&path).await?.ensure_success()?;
        Ok(())
    }

    /// Users linked to a company
    pub async fn members(&self, company_id: &str) -> Result<Vec<UserRecord>> {
        let path = format!("/companies/{}/users", urlencoding::encode(company_id));
        self.client
            .get::<Envelope<Vec<UserRecord>>>(&path)
            .await?
            .into_data()
    }
}
