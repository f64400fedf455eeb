//! Debt lifecycle rules
//!
//! Pure authorization and state checks shared by the service layer, kept
//! free of I/O so each rule can be tested without a database. Every check
//! returns the exact error the API reports when the rule is violated.

use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Debt;

/// A debt may not be a self-debt, and only the creditor may originate it.
pub fn check_creation(
    acting_user_id: Uuid,
    creditor_id: Uuid,
    debtor_id: Uuid,
) -> Result<(), ApiError> {
    if creditor_id == debtor_id {
        return Err(ApiError::BadRequest(
            "Creditor and debtor cannot be the same person".to_string(),
        ));
    }
    if creditor_id != acting_user_id {
        return Err(ApiError::Forbidden(
            "You can only create debts where you are the creditor".to_string(),
        ));
    }
    Ok(())
}

/// Only the two parties may see a debt.
pub fn check_view(creditor_id: Uuid, debtor_id: Uuid, acting_user_id: Uuid) -> Result<(), ApiError> {
    if creditor_id != acting_user_id && debtor_id != acting_user_id {
        return Err(ApiError::Forbidden(
            "You do not have access to this debt".to_string(),
        ));
    }
    Ok(())
}

/// Only the creditor may modify a debt, and a paid debt's amount and
/// description are immutable.
pub fn check_update(
    debt: &Debt,
    acting_user_id: Uuid,
    touches_amount: bool,
    touches_description: bool,
) -> Result<(), ApiError> {
    if debt.creditor_id != acting_user_id {
        return Err(ApiError::Forbidden(
            "Only the creditor can modify this debt".to_string(),
        ));
    }
    if debt.is_paid && (touches_amount || touches_description) {
        return Err(ApiError::BadRequest("Cannot modify paid debts".to_string()));
    }
    Ok(())
}

/// Only the creditor may settle a debt, and only once.
pub fn check_mark_paid(debt: &Debt, acting_user_id: Uuid) -> Result<(), ApiError> {
    if debt.creditor_id != acting_user_id {
        return Err(ApiError::Forbidden(
            "Only the creditor can mark this debt as paid".to_string(),
        ));
    }
    if debt.is_paid {
        return Err(ApiError::BadRequest(
            "Debt is already marked as paid".to_string(),
        ));
    }
    Ok(())
}

/// Only the creditor may delete a debt, and never after it is paid.
pub fn check_delete(debt: &Debt, acting_user_id: Uuid) -> Result<(), ApiError> {
    if debt.creditor_id != acting_user_id {
        return Err(ApiError::Forbidden(
            "Only the creditor can delete this debt".to_string(),
        ));
    }
    if debt.is_paid {
        return Err(ApiError::BadRequest("Cannot delete paid debts".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DebtStatus, Priority};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn debt(creditor_id: Uuid, debtor_id: Uuid, is_paid: bool) -> Debt {
        let now = Utc::now();
        Debt {
            id: Uuid::new_v4(),
            description: "Movie tickets".to_string(),
            amount: dec!(18.00),
            currency: "USD".to_string(),
            status: if is_paid {
                DebtStatus::Paid
            } else {
                DebtStatus::Pending
            },
            is_paid,
            creditor_id,
            debtor_id,
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
    fn self_debt_is_rejected() {
        let alice = Uuid::new_v4();
        let err = check_creation(alice, alice, alice).unwrap_err();
        assert!(
            matches!(err, ApiError::BadRequest(ref m) if m == "Creditor and debtor cannot be the same person")
        );
    }

    #[test]
    fn only_the_creditor_may_originate() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        assert!(check_creation(alice, alice, bob).is_ok());

        // Alice cannot record a debt on Bob's behalf
        let err = check_creation(alice, bob, alice).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn only_parties_may_view() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let carol = Uuid::new_v4();

        assert!(check_view(alice, bob, alice).is_ok());
        assert!(check_view(alice, bob, bob).is_ok());

        let err = check_view(alice, bob, carol).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(ref m) if m == "You do not have access to this debt"));
    }

    #[test]
    fn debtor_cannot_update_mark_paid_or_delete() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let d = debt(alice, bob, false);

        assert!(
            matches!(check_update(&d, bob, false, false).unwrap_err(), ApiError::Forbidden(_))
        );
        assert!(matches!(check_mark_paid(&d, bob).unwrap_err(), ApiError::Forbidden(_)));
        assert!(matches!(check_delete(&d, bob).unwrap_err(), ApiError::Forbidden(_)));
    }

    #[test]
    fn paid_debt_amount_and_description_are_immutable() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let paid = debt(alice, bob, true);

        let err = check_update(&paid, alice, true, false).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Cannot modify paid debts"));
        assert!(matches!(
            check_update(&paid, alice, false, true).unwrap_err(),
            ApiError::BadRequest(_)
        ));

        // Other fields stay editable after payment
        assert!(check_update(&paid, alice, false, false).is_ok());
    }

    #[test]
    fn marking_paid_twice_is_rejected() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        assert!(check_mark_paid(&debt(alice, bob, false), alice).is_ok());

        let err = check_mark_paid(&debt(alice, bob, true), alice).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Debt is already marked as paid"));
    }

    #[test]
    fn paid_debt_cannot_be_deleted() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        assert!(check_delete(&debt(alice, bob, false), alice).is_ok());

        let err = check_delete(&debt(alice, bob, true), alice).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Cannot delete paid debts"));
    }
}
