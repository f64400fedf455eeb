use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{DebtStatus, Priority};

fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_positive() && !amount.is_zero() {
        Ok(())
    } else {
        Err(ValidationError::new("amount must be greater than zero"))
    }
}

/// Request body for creating a debt
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDebtRequest {
    #[validate(length(min = 3, max = 500, message = "must be 3-500 characters"))]
    pub description: String,

    #[validate(custom = "validate_positive_amount")]
    pub amount: Decimal,

    #[validate(length(max = 3, message = "must be at most 3 characters"))]
    pub currency: Option<String>,

    pub creditor_id: Uuid,
    pub debtor_id: Uuid,

    pub due_date: Option<DateTime<Utc>>,

    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub notes: Option<String>,

    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub category: Option<String>,

    pub priority: Option<Priority>,
}

/// Request body for updating a debt
#[derive(Debug, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDebtRequest {
    #[validate(length(min = 3, max = 500, message = "must be 3-500 characters"))]
    pub description: Option<String>,

    #[validate(custom = "validate_positive_amount")]
    pub amount: Option<Decimal>,

    #[validate(length(max = 3, message = "must be at most 3 characters"))]
    pub currency: Option<String>,

    pub status: Option<DebtStatus>,
    pub due_date: Option<DateTime<Utc>>,

    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub notes: Option<String>,

    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub category: Option<String>,

    pub priority: Option<Priority>,
}

/// Query parameters for the debt listing
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DebtQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<DebtStatus>,
    pub is_paid: Option<bool>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub creditor_id: Option<Uuid>,
    pub debtor_id: Option<Uuid>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Export format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

/// Request body for exporting debts to a file
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub format: Option<ExportFormat>,
    pub status: Option<DebtStatus>,
    pub is_paid: Option<bool>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub creditor_id: Option<Uuid>,
    pub debtor_id: Option<Uuid>,
    pub search: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// A generated export file ready to be served
#[derive(Debug)]
pub struct ExportResult {
    pub file_path: std::path::PathBuf,
    pub filename: String,
    pub content_type: &'static str,
}

/// Export capabilities advertised to clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStats {
    pub total_debts: i64,
    pub available_filters: Vec<&'static str>,
    pub supported_formats: Vec<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejects_zero_and_negative_amounts() {
        assert!(validate_positive_amount(&dec!(0)).is_err());
        assert!(validate_positive_amount(&dec!(-5.00)).is_err());
        assert!(validate_positive_amount(&dec!(0.01)).is_ok());
    }

    #[test]
    fn create_request_validation() {
        let request = CreateDebtRequest {
            description: "ab".to_string(),
            amount: dec!(10),
            currency: None,
            creditor_id: Uuid::new_v4(),
            debtor_id: Uuid::new_v4(),
            due_date: None,
            notes: None,
            category: None,
            priority: None,
        };
        assert!(request.validate().is_err());
    }
}
