//! Financial ledger summarization.

use std::collections::BTreeMap;

use crate::api::{CategoryTotal, FinanceSummary};
use crate::models::{FinanceKind, FinancialRecord};
use crate::routes::finance::FinanceSummaryQuery;

/// Summarize ledger records over an optional inclusive date range.
///
/// Records outside `[from, to]` are ignored. The per-category breakdown is
/// sorted by category name so the output is stable across backends.
pub fn compute_finance_summary(
    records: &[FinancialRecord],
    query: &FinanceSummaryQuery,
) -> FinanceSummary {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut record_count = 0usize;
    let mut by_category: BTreeMap<String, (f64, f64)> = BTreeMap::new();

    for record in records {
        if let Some(from) = query.from {
            if record.record_date < from {
                continue;
            }
        }
        if let Some(to) = query.to {
            if record.record_date > to {
                continue;
            }
        }

        record_count += 1;
        let entry = by_category.entry(record.category.clone()).or_default();
        match record.kind {
            FinanceKind::Income => {
                total_income += record.amount;
                entry.0 += record.amount;
            }
            FinanceKind::Expense => {
                total_expense += record.amount;
                entry.1 += record.amount;
            }
        }
    }

    FinanceSummary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        record_count,
        by_category: by_category
            .into_iter()
            .map(|(category, (income, expense))| CategoryTotal {
                category,
                income,
                expense,
            })
            .collect(),
    }
}
