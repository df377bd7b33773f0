//! Financial summary types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Query parameters for `GET /v1/finance/summary`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinanceSummaryQuery {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

/// Aggregated amount for one ledger category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub income: f64,
    pub expense: f64,
}

/// Income/expense summary over an optional date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub record_count: usize,
    /// Per-category breakdown, sorted by category name.
    pub by_category: Vec<CategoryTotal>,
}
