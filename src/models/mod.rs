//! Data models for the Dutch backend

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub full_name: String,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public user projection returned by the API
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Minimal user projection embedded in debt responses
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

/// Debt status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq, Hash)]
#[sqlx(type_name = "debt_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum DebtStatus {
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl DebtStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtStatus::Pending => "PENDING",
            DebtStatus::Paid => "PAID",
            DebtStatus::Overdue => "OVERDUE",
            DebtStatus::Cancelled => "CANCELLED",
        }
    }
}

/// Debt priority
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "debt_priority", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Urgent => "URGENT",
        }
    }
}

/// Debt model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: DebtStatus,
    pub is_paid: bool,
    pub creditor_id: Uuid,
    pub debtor_id: Uuid,
    pub due_date: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub category: Option<String>,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Debt row joined with the creditor/debtor projections
#[derive(Debug, sqlx::FromRow, Clone)]
pub struct DebtWithParties {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: DebtStatus,
    pub is_paid: bool,
    pub creditor_id: Uuid,
    pub debtor_id: Uuid,
    pub due_date: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub category: Option<String>,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub creditor_full_name: String,
    pub creditor_email: String,
    pub debtor_full_name: String,
    pub debtor_email: String,
}

/// Debt response with embedded party projections
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DebtResponse {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: DebtStatus,
    pub is_paid: bool,
    pub creditor_id: Uuid,
    pub debtor_id: Uuid,
    pub creditor: UserSummary,
    pub debtor: UserSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub category: Option<String>,
    pub priority: Priority,
}

impl From<DebtWithParties> for DebtResponse {
    fn from(row: DebtWithParties) -> Self {
        Self {
            id: row.id,
            description: row.description,
            amount: row.amount,
            currency: row.currency,
            status: row.status,
            is_paid: row.is_paid,
            creditor_id: row.creditor_id,
            debtor_id: row.debtor_id,
            creditor: UserSummary {
                id: row.creditor_id,
                full_name: row.creditor_full_name,
                email: row.creditor_email,
            },
            debtor: UserSummary {
                id: row.debtor_id,
                full_name: row.debtor_full_name,
                email: row.debtor_email,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
            due_date: row.due_date,
            paid_at: row.paid_at,
            notes: row.notes,
            category: row.category,
            priority: row.priority,
        }
    }
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Paginated response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

/// Highest accepted page number. Keeps the OFFSET arithmetic well away
/// from i64 overflow on hostile input.
pub const MAX_PAGE: i64 = 1_000_000;

/// Normalize 1-based pagination inputs into (page, limit, offset)
pub fn page_window(page: Option<i64>, limit: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).clamp(1, MAX_PAGE);
    let limit = limit.unwrap_or(10).clamp(1, 100);
    (page, limit, (page - 1) * limit)
}

/// Count/amount bucket used throughout the dashboard summary
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryBucket {
    pub count: i64,
    pub total_amount: Decimal,
}

/// Count/amount bucket with a currency label
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyBucket {
    pub count: i64,
    pub total_amount: Decimal,
    pub currency: String,
}

/// Per-status breakdown; all four statuses are always present
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct StatusBreakdown {
    #[serde(rename = "PENDING")]
    pub pending: SummaryBucket,
    #[serde(rename = "PAID")]
    pub paid: SummaryBucket,
    #[serde(rename = "OVERDUE")]
    pub overdue: SummaryBucket,
    #[serde(rename = "CANCELLED")]
    pub cancelled: SummaryBucket,
}

/// Rolling 30-day activity window
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Last30DaysActivity {
    pub new_debts: SummaryBucket,
    pub paid_debts: SummaryBucket,
    pub overdue_debts: SummaryBucket,
}

/// Per-category aggregate
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: String,
    pub count: i64,
    pub total_amount: Decimal,
}

/// Cached, per-user dashboard aggregate
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_debts: CurrencyBucket,
    pub pending_debts: CurrencyBucket,
    pub paid_debts: CurrencyBucket,
    pub debts_by_status: StatusBreakdown,
    #[serde(rename = "last30DaysActivity")]
    pub last_30_days_activity: Last30DaysActivity,
    pub debts_by_currency: BTreeMap<String, SummaryBucket>,
    pub top_categories: Vec<CategorySummary>,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_window_defaults() {
        assert_eq!(page_window(None, None), (1, 10, 0));
        assert_eq!(page_window(Some(3), Some(25)), (3, 25, 50));
    }

    #[test]
    fn page_window_clamps_out_of_range_input() {
        assert_eq!(page_window(Some(0), Some(0)), (1, 1, 0));
        assert_eq!(page_window(Some(-7), Some(500)), (1, 100, 0));
    }

    #[test]
    fn page_window_survives_extreme_pages() {
        let (page, limit, offset) = page_window(Some(i64::MAX), Some(100));
        assert_eq!(page, MAX_PAGE);
        assert_eq!(offset, (MAX_PAGE - 1) * limit);

        let (page, _, offset) = page_window(Some(i64::MIN), None);
        assert_eq!(page, 1);
        assert_eq!(offset, 0);
    }
}
