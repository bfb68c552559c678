//! `/categories` endpoints

use tally_core::expense::{Category, CategoryUpdate, NewCategory};

use crate::client::ApiClient;
use crate::envelope::{Ack, Envelope};
use crate::error::{ApiError, Result};

pub struct Categories<'a> {
    client: &'a ApiClient,
}

impl<'a> Categories<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Active categories of a company
    pub async fn for_company(&self, company_id: &str) -> Result<Vec<Category>> {
        let path = format!("/categories/company/{}", urlencoding::encode(company_id));
        self.client
            .get::<Envelope<Vec<Category>>>(&path)
            .await?
            .into_data()
    }

    pub async fn create(&self, category: &NewCategory) -> Result<Category> {
        self.client
            .post::<Envelope<Vec<Category>>, _>("/categories/", category)
            .await?
            .into_data()?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::unexpected("category creation returned no rows"))
    }

    pub async fn update(&self, category_id: &str, update: &CategoryUpdate) -> Result<Vec<Category>> {
        let path = format!("/categories/{}", urlencoding::encode(category_id));
        self.client
            .patch::<Envelope<Vec<Category>>, _>(&path, update)
            .await?
            .into_data()
    }

    /// Deactivate a category; the backend keeps the row
    pub async fn delete(&self, category_id: &str) -> Result<()> {
        let path = format!("/categories/{}", urlencoding::encode(category_id));
        self.client.delete::<Ack>(&path).await?.ensure_success()?;
        Ok(())
    }
}
