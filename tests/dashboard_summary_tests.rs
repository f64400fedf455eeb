//! Dashboard summary aggregation tests

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use dutch_server::debts::summary::compute_summary;
use dutch_server::models::{Debt, DebtStatus, Priority};

fn debt_between(
    creditor: Uuid,
    debtor: Uuid,
    amount: Decimal,
    status: DebtStatus,
) -> Debt {
    let now = Utc::now();
    let is_paid = status == DebtStatus::Paid;
    Debt {
        id: Uuid::new_v4(),
        description: "Shared groceries".to_string(),
        amount,
        currency: "USD".to_string(),
        status,
        is_paid,
        creditor_id: creditor,
        debtor_id: debtor,
        due_date: None,
        paid_at: if is_paid { Some(now) } else { None },
        notes: None,
        category: None,
        priority: Priority::Medium,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn summary_counts_debts_on_both_sides() {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    // Alice's dashboard covers debts where she is creditor or debtor
    let debts = vec![
        debt_between(alice, bob, dec!(50.00), DebtStatus::Pending),
        debt_between(bob, alice, dec!(20.00), DebtStatus::Paid),
    ];

    let summary = compute_summary(&debts, Utc::now());

    assert_eq!(summary.total_debts.count, 2);
    assert_eq!(summary.total_debts.total_amount, dec!(70.00));
    assert_eq!(summary.pending_debts.count, 1);
    assert_eq!(summary.paid_debts.count, 1);
    assert_eq!(summary.paid_debts.total_amount, dec!(20.00));
}

#[test]
fn cancelled_debts_count_toward_totals_but_not_paid() {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let debts = vec![debt_between(alice, bob, dec!(15.00), DebtStatus::Cancelled)];

    let summary = compute_summary(&debts, Utc::now());

    assert_eq!(summary.total_debts.count, 1);
    assert_eq!(summary.paid_debts.count, 0);
    // Cancelled is unpaid, so it sits in the pending partition
    assert_eq!(summary.pending_debts.count, 1);
    assert_eq!(summary.debts_by_status.cancelled.count, 1);
}

#[test]
fn recently_paid_window_uses_paid_at_not_created_at() {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let now = Utc::now();

    let mut old_debt_paid_recently = debt_between(alice, bob, dec!(75.00), DebtStatus::Paid);
    old_debt_paid_recently.created_at = now - Duration::days(120);
    old_debt_paid_recently.paid_at = Some(now - Duration::days(3));

    let summary = compute_summary(&[old_debt_paid_recently], now);

    assert_eq!(summary.last_30_days_activity.new_debts.count, 0);
    assert_eq!(summary.last_30_days_activity.paid_debts.count, 1);
    assert_eq!(
        summary.last_30_days_activity.paid_debts.total_amount,
        dec!(75.00)
    );
}

#[test]
fn generated_at_matches_computation_time() {
    let now = Utc::now();
    let summary = compute_summary(&[], now);
    assert_eq!(summary.generated_at, now);
}

#[test]
fn summary_serializes_with_camel_case_and_status_keys() {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let debts = vec![debt_between(alice, bob, dec!(9.99), DebtStatus::Overdue)];

    let summary = compute_summary(&debts, Utc::now());
    let json = serde_json::to_value(&summary).unwrap();

    assert!(json.get("totalDebts").is_some());
    assert!(json.get("pendingDebts").is_some());
    assert!(json.get("last30DaysActivity").is_some());
    assert!(json.get("debtsByCurrency").is_some());
    assert!(json.get("topCategories").is_some());
    assert_eq!(json["totalDebts"]["currency"], "USD");

    let by_status = &json["debtsByStatus"];
    for key in ["PENDING", "PAID", "OVERDUE", "CANCELLED"] {
        assert!(by_status.get(key).is_some(), "missing status bucket {}", key);
    }
    assert_eq!(by_status["OVERDUE"]["count"], 1);
}
