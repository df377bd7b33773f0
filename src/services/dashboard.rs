//! Dashboard summary orchestration.

use chrono::NaiveDate;

use crate::api::DashboardSummary;
use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::{BatchStatus, DistributionStatus};
use crate::routes::finance::FinanceSummaryQuery;
use crate::services::finance::compute_finance_summary;

/// Collect the landing-page counters for a given operational day.
pub async fn compute_dashboard_summary<R: FullRepository + ?Sized>(
    repo: &R,
    today: NaiveDate,
) -> RepositoryResult<DashboardSummary> {
    let schools = repo.list_schools(false).await?;
    let inventory = repo.list_inventory_items().await?;
    let batches = repo.list_batches().await?;
    let distributions = repo.list_distributions().await?;
    let ledger = repo.list_financial_records().await?;

    let total_students = schools.iter().map(|s| s.student_count as i64).sum();
    let low_stock_items = inventory.iter().filter(|i| i.is_low_stock()).count();
    let batches_in_progress = batches
        .iter()
        .filter(|b| matches!(b.status, BatchStatus::Planned | BatchStatus::Cooking))
        .count();

    let todays_runs: Vec<_> = distributions
        .iter()
        .filter(|d| d.distribution_date == today && d.status != DistributionStatus::Cancelled)
        .collect();
    let portions_scheduled_today = todays_runs
        .iter()
        .map(|d| d.total_portions() as i64)
        .sum();

    let finance = compute_finance_summary(&ledger, &FinanceSummaryQuery::default());

    Ok(DashboardSummary {
        active_schools: schools.len(),
        total_students,
        low_stock_items,
        batches_in_progress,
        distributions_today: todays_runs.len(),
        portions_scheduled_today,
        finance_balance: finance.balance,
    })
}
