//! Dashboard aggregation
//!
//! Folds an already-fetched expense list into the figures the dashboard
//! shows: spend for the current month, the top category and vendor by spend,
//! and a per-month series for charting.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::model::Expense;

const UNCATEGORIZED: &str = "Uncategorized";
const UNKNOWN_VENDOR: &str = "Unknown";

/// A name and the total spent against it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopEntry {
    pub name: String,
    pub total: f64,
}

impl fmt::Display for TopEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (${:.2})", self.name, self.total)
    }
}

/// Spend for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub total: f64,
}

/// Figures for the month containing a reference date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub expense_count: usize,
    pub total_spend: f64,
    pub top_category: Option<TopEntry>,
    pub top_vendor: Option<TopEntry>,
}

impl DashboardSummary {
    /// Summarise the expenses dated in the same month as `today`
    pub fn for_month(expenses: &[Expense], today: NaiveDate) -> Self {
        let (period_start, period_end) = month_bounds(today);

        let in_period: Vec<&Expense> = expenses
            .iter()
            .filter(|e| !e.is_void())
            .filter(|e| {
                e.bill_date
                    .is_some_and(|d| d >= period_start && d <= period_end)
            })
            .collect();

        let total_spend: f64 = in_period.iter().map(|e| e.total_amount).sum();

        let top_category = top_by(&in_period, |e| {
            e.category
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(UNCATEGORIZED)
        });
        let top_vendor = top_by(&in_period, |e| {
            e.vendor_name()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(UNKNOWN_VENDOR)
        });

        Self {
            period_start,
            period_end,
            expense_count: in_period.len(),
            total_spend,
            top_category,
            top_vendor,
        }
    }
}

/// Total spend per month, oldest first. Undated and voided expenses are skipped.
pub fn monthly_totals(expenses: &[Expense]) -> Vec<MonthlyTotal> {
    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for expense in expenses.iter().filter(|e| !e.is_void()) {
        if let Some(date) = expense.bill_date {
            *buckets.entry((date.year(), date.month())).or_default() += expense.total_amount;
        }
    }

    buckets
        .into_iter()
        .map(|((year, month), total)| MonthlyTotal { year, month, total })
        .collect()
}

fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date.with_day(1).unwrap_or(date);
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    let end = next_month.and_then(|d| d.pred_opt()).unwrap_or(date);
    (start, end)
}

// Ties go to the alphabetically first name so the result is stable.
fn top_by<'a, F>(expenses: &[&'a Expense], key: F) -> Option<TopEntry>
where
    F: Fn(&'a Expense) -> &'a str,
{
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for expense in expenses {
        *totals.entry(key(*expense)).or_default() += expense.total_amount;
    }

    totals
        .into_iter()
        .max_by(|(a_name, a_total), (b_name, b_total)| {
            a_total.total_cmp(b_total).then_with(|| b_name.cmp(a_name))
        })
        .map(|(name, total)| TopEntry {
            name: name.to_string(),
            total,
        })
}
