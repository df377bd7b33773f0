//! Dashboard landing page summary types.

use serde::{Deserialize, Serialize};

/// Counters shown on the dashboard landing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub active_schools: usize,
    pub total_students: i64,
    pub low_stock_items: usize,
    pub batches_in_progress: usize,
    pub distributions_today: usize,
    pub portions_scheduled_today: i64,
    pub finance_balance: f64,
}
