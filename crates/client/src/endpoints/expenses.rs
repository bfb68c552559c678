//! `/expenses` and expense review endpoints

use serde::Deserialize;
use tally_core::expense::{Expense, ExpenseDraft, ExpenseReview, ExpenseUpdate, NewExpense};

use crate::client::ApiClient;
use crate::envelope::{Ack, Envelope};
use crate::error::Result;

/// Response of `POST /expenses/manual_entry`
#[derive(Debug, Clone, Deserialize)]
pub struct RecordedExpense {
    #[serde(default)]
    pub message: Option<String>,
    /// The bill row created for the expense
    #[serde(default)]
    pub bill: Vec<Expense>,
}

pub struct Expenses<'a> {
    client: &'a ApiClient,
}

impl<'a> Expenses<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Expenses of a company, with vendor names joined
    pub async fn for_company(&self, company_id: &str) -> Result<Vec<Expense>> {
        let path = format!("/expenses/company/{}", urlencoding::encode(company_id));
        self.client
            .get::<Envelope<Vec<Expense>>>(&path)
            .await?
            .into_data()
    }

    /// Record a manual expense. The backend also books the journal entry.
    pub async fn create(&self, expense: &NewExpense) -> Result<RecordedExpense> {
        self.client.post("/expenses/manual_entry", expense).await
    }

    pub async fn update(&self, expense_id: &str, update: &ExpenseUpdate) -> Result<Vec<Expense>> {
        let path = format!("/expenses/{}", urlencoding::encode(expense_id));
        self.client
            .patch::<Envelope<Vec<Expense>>, _>(&path, update)
            .await?
            .into_data()
    }

    /// Void an expense
    pub async fn delete(&self, expense_id: &str) -> Result<()> {
        let path = format!("/expenses/{}", urlencoding::encode(expense_id));
        self.client.delete::<Ack>(&path).await?.ensure_success()?;
        Ok(())
    }

    /// Ask the AI backend to validate a draft and suggest normalised fields
    pub async fn review(&self, draft: &ExpenseDraft) -> Result<ExpenseReview> {
        self.client.post("/ai/overlook_expense", draft).await
    }
}
