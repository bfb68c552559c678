//! Expense model definitions

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Vendor name joined onto a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorRef {
    pub name: String,
}

/// An expense as returned by the backend (a bill row with its vendor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub bill_number: Option<String>,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub bill_date: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub vendors: Option<VendorRef>,
}

impl Expense {
    pub fn vendor_name(&self) -> Option<&str> {
        self.vendors.as_ref().map(|v| v.name.as_str())
    }

    /// Deleted expenses are kept by the backend with status `void`
    pub fn is_void(&self) -> bool {
        self.status.as_deref() == Some("void")
    }
}

/// How an expense was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    BankTransfer,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        Self::CreditCard
    }
}

/// Request body for `POST /expenses/manual_entry`
#[derive(Debug, Clone, Serialize)]
pub struct NewExpense {
    pub company_id: String,
    pub user_id: Option<Uuid>,
    pub vendor_name: String,
    pub amount: f64,
    pub category: String,
    pub payment_method: PaymentMethod,
    pub memo: String,
    pub date: NaiveDate,
}

impl NewExpense {
    /// Create a manual expense entry with default category and payment method
    pub fn new(
        company_id: impl Into<String>,
        vendor_name: impl Into<String>,
        amount: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            company_id: company_id.into(),
            user_id: None,
            vendor_name: vendor_name.into(),
            amount,
            category: "Uncategorized".to_string(),
            payment_method: PaymentMethod::default(),
            memo: String::new(),
            date,
        }
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    pub fn with_payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }
}

/// Partial update of an expense
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExpenseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Request body for the AI expense review
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseDraft {
    pub company_id: String,
    pub vendor_name: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: String,
    pub memo: String,
}

/// Suggestions returned by the AI expense review
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSuggestions {
    #[serde(default)]
    pub normalized_vendor: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
}

/// Result of `POST /ai/overlook_expense`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseReview {
    pub valid: bool,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub suggestions: Option<ExpenseSuggestions>,
}

impl ExpenseDraft {
    /// Apply review suggestions, keeping current values where none is offered
    pub fn apply(&mut self, suggestions: &ExpenseSuggestions) {
        if let Some(vendor) = suggestions.normalized_vendor.as_deref().filter(|v| !v.is_empty()) {
            self.vendor_name = vendor.to_string();
        }
        if let Some(category) = suggestions.category.as_deref().filter(|c| !c.is_empty()) {
            self.category = category.to_string();
        }
        if let Some(memo) = suggestions.memo.as_deref().filter(|m| !m.is_empty()) {
            self.memo = memo.to_string();
        }
    }
}

/// An expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub company_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub budget_amount: Option<f64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Request body for `POST /categories/`
#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub company_id: String,
    pub name: String,
    pub description: String,
    pub budget_amount: Option<f64>,
}

impl NewCategory {
    pub fn new(company_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            name: name.into().trim().to_string(),
            description: String::new(),
            budget_amount: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into().trim().to_string();
        self
    }

    pub fn with_budget(mut self, budget_amount: f64) -> Self {
        self.budget_amount = Some(budget_amount);
        self
    }
}

/// Partial update of a category
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_amount: Option<f64>,
}

/// Fields extracted from an uploaded receipt by the OCR/AI backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedReceipt {
    #[serde(default)]
    pub parsed_fields: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub sample_text: String,
    #[serde(default)]
    pub ai_enhanced: bool,
    #[serde(default)]
    pub message: Option<String>,
}
