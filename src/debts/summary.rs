//! Dashboard summary aggregation
//!
//! Pure computation over a user's full debt set. Kept free of I/O so the
//! aggregation rules can be tested without a database.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::models::{
    CategorySummary, CurrencyBucket, DashboardSummary, Debt, DebtStatus, Last30DaysActivity,
    StatusBreakdown, SummaryBucket,
};

const TOP_CATEGORY_LIMIT: usize = 5;
const UNCATEGORIZED: &str = "uncategorized";

/// Aggregate a user's debts into the dashboard summary.
///
/// Headline totals report in USD regardless of the per-debt currency;
/// the per-currency map carries the accurate split.
pub fn compute_summary(debts: &[Debt], now: DateTime<Utc>) -> DashboardSummary {
    let thirty_days_ago = now - Duration::days(30);

    let total: Decimal = debts.iter().map(|d| d.amount).sum();
    let pending: Vec<&Debt> = debts.iter().filter(|d| !d.is_paid).collect();
    let paid: Vec<&Debt> = debts.iter().filter(|d| d.is_paid).collect();

    let mut by_status = StatusBreakdown::default();
    for debt in debts {
        let bucket = match debt.status {
            DebtStatus::Pending => &mut by_status.pending,
            DebtStatus::Paid => &mut by_status.paid,
            DebtStatus::Overdue => &mut by_status.overdue,
            DebtStatus::Cancelled => &mut by_status.cancelled,
        };
        bucket.count += 1;
        bucket.total_amount += debt.amount;
    }

    let new_debts = bucket_of(debts.iter().filter(|d| d.created_at >= thirty_days_ago));
    let recently_paid = bucket_of(
        debts
            .iter()
            .filter(|d| matches!(d.paid_at, Some(at) if at >= thirty_days_ago)),
    );
    // Overdue is a stored status, never derived from due_date here
    let overdue = bucket_of(debts.iter().filter(|d| d.status == DebtStatus::Overdue));

    let mut by_currency: BTreeMap<String, SummaryBucket> = BTreeMap::new();
    for debt in debts {
        let bucket = by_currency.entry(debt.currency.clone()).or_default();
        bucket.count += 1;
        bucket.total_amount += debt.amount;
    }

    let mut by_category: BTreeMap<String, SummaryBucket> = BTreeMap::new();
    for debt in debts {
        let key = debt
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCATEGORIZED)
            .to_string();
        let bucket = by_category.entry(key).or_default();
        bucket.count += 1;
        bucket.total_amount += debt.amount;
    }
    let mut top_categories: Vec<CategorySummary> = by_category
        .into_iter()
        .map(|(category, bucket)| CategorySummary {
            category,
            count: bucket.count,
            total_amount: bucket.total_amount,
        })
        .collect();
    top_categories.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
    top_categories.truncate(TOP_CATEGORY_LIMIT);

    DashboardSummary {
        total_debts: CurrencyBucket {
            count: debts.len() as i64,
            total_amount: total,
            currency: "USD".to_string(),
        },
        pending_debts: CurrencyBucket {
            count: pending.len() as i64,
            total_amount: pending.iter().map(|d| d.amount).sum(),
            currency: "USD".to_string(),
        },
        paid_debts: CurrencyBucket {
            count: paid.len() as i64,
            total_amount: paid.iter().map(|d| d.amount).sum(),
            currency: "USD".to_string(),
        },
        debts_by_status: by_status,
        last_30_days_activity: Last30DaysActivity {
            new_debts,
            paid_debts: recently_paid,
            overdue_debts: overdue,
        },
        debts_by_currency: by_currency,
        top_categories,
        generated_at: now,
    }
}

fn bucket_of<'a>(debts: impl Iterator<Item = &'a Debt>) -> SummaryBucket {
    let mut bucket = SummaryBucket::default();
    for debt in debts {
        bucket.count += 1;
        bucket.total_amount += debt.amount;
    }
    bucket
}
