//! Debt export
//!
//! Generates JSON or CSV export files under the system temp directory. The
//! handler streams the file back and removes it afterwards.

use chrono::Utc;
use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{DebtResponse, DebtWithParties};

use super::model::{DebtQuery, ExportFormat, ExportRequest, ExportResult, ExportStats};
use super::service::push_visibility_and_filters;

const CSV_HEADER: &str = "ID,Description,Amount,Currency,Status,Is Paid,\
Creditor ID,Creditor Name,Creditor Email,Debtor ID,Debtor Name,Debtor Email,\
Created At,Updated At,Due Date,Paid At,Notes,Category,Priority";

const AVAILABLE_FILTERS: [&str; 9] = [
    "status",
    "priority",
    "category",
    "search",
    "creditorId",
    "debtorId",
    "isPaid",
    "startDate",
    "endDate",
];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport {
    export_date: chrono::DateTime<Utc>,
    total_debts: usize,
    debts: Vec<DebtResponse>,
}

#[derive(Clone)]
pub struct ExportService {
    db_pool: PgPool,
}

impl ExportService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Export the user's visible debts, filtered, into a temp file
    pub async fn export_debts(
        &self,
        user_id: Uuid,
        request: ExportRequest,
    ) -> Result<ExportResult, ApiError> {
        let format = request.format.unwrap_or_default();
        tracing::info!(user_id = %user_id, format = format.as_str(), "Exporting debts");

        let debts = self.fetch_filtered(user_id, &request).await?;

        let content = match format {
            ExportFormat::Json => {
                let export = JsonExport {
                    export_date: Utc::now(),
                    total_debts: debts.len(),
                    debts,
                };
                serde_json::to_string_pretty(&export)?
            }
            ExportFormat::Csv => render_csv(&debts),
        };

        let filename = format!("debts_export_{}.{}", Uuid::new_v4(), format.as_str());
        let file_path = std::env::temp_dir().join(&filename);

        tokio::fs::write(&file_path, content).await.map_err(|e| {
            ApiError::InternalError(format!("Failed to write export file: {}", e))
        })?;

        tracing::info!(user_id = %user_id, filename = %filename, "Export file written");
        Ok(ExportResult {
            file_path,
            filename,
            content_type: format.content_type(),
        })
    }

    /// Remove a served export file. A missing file is not an error.
    pub async fn cleanup_temp_file(&self, result: &ExportResult) {
        if let Err(e) = tokio::fs::remove_file(&result.file_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    error = %e,
                    path = %result.file_path.display(),
                    "Failed to remove export temp file"
                );
            }
        }
    }

    /// Export capabilities plus the user's visible debt count
    pub async fn get_export_stats(&self, user_id: Uuid) -> Result<ExportStats, ApiError> {
        let total_debts: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM debts WHERE creditor_id = $1 OR debtor_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(ExportStats {
            total_debts,
            available_filters: AVAILABLE_FILTERS.to_vec(),
            supported_formats: vec!["json", "csv"],
        })
    }

    async fn fetch_filtered(
        &self,
        user_id: Uuid,
        request: &ExportRequest,
    ) -> Result<Vec<DebtResponse>, ApiError> {
        let filters = DebtQuery {
            status: request.status,
            is_paid: request.is_paid,
            priority: request.priority,
            category: request.category.clone(),
            creditor_id: request.creditor_id,
            debtor_id: request.debtor_id,
            search: request.search.clone(),
            ..DebtQuery::default()
        };

        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT
                d.id, d.description, d.amount, d.currency, d.status, d.is_paid,
                d.creditor_id, d.debtor_id, d.due_date, d.paid_at, d.notes,
                d.category, d.priority, d.created_at, d.updated_at,
                c.full_name AS creditor_full_name, c.email AS creditor_email,
                b.full_name AS debtor_full_name, b.email AS debtor_email
            FROM debts d
            JOIN users c ON c.id = d.creditor_id
            JOIN users b ON b.id = d.debtor_id
            "#,
        );
        push_visibility_and_filters(&mut builder, user_id, &filters);

        if let Some(start) = request.start_date {
            builder.push(" AND d.created_at >= ");
            builder.push_bind(start);
        }
        if let Some(end) = request.end_date {
            builder.push(" AND d.created_at <= ");
            builder.push_bind(end);
        }

        builder.push(" ORDER BY d.created_at DESC");

        let rows = builder
            .build_query_as::<DebtWithParties>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(rows.into_iter().map(DebtResponse::from).collect())
    }
}

/// Render debts as CSV. Free-text fields are quoted with internal quotes
/// doubled; an empty export still yields the header line.
pub(super) fn render_csv(debts: &[DebtResponse]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for debt in debts {
        out.push_str(&render_csv_row(debt));
        out.push('\n');
    }
    out
}

fn render_csv_row(debt: &DebtResponse) -> String {
    [
        debt.id.to_string(),
        quoted(&debt.description),
        debt.amount.to_string(),
        debt.currency.clone(),
        debt.status.as_str().to_string(),
        debt.is_paid.to_string(),
        debt.creditor_id.to_string(),
        quoted(&debt.creditor.full_name),
        debt.creditor.email.clone(),
        debt.debtor_id.to_string(),
        quoted(&debt.debtor.full_name),
        debt.debtor.email.clone(),
        debt.created_at.to_rfc3339(),
        debt.updated_at.to_rfc3339(),
        debt.due_date.map(|d| d.to_rfc3339()).unwrap_or_default(),
        debt.paid_at.map(|d| d.to_rfc3339()).unwrap_or_default(),
        debt.notes
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(quoted)
            .unwrap_or_default(),
        debt.category.clone().unwrap_or_default(),
        debt.priority.as_str().to_string(),
    ]
    .join(",")
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DebtStatus, Priority, UserSummary};
    use rust_decimal_macros::dec;

    fn sample_debt() -> DebtResponse {
        let now = Utc::now();
        DebtResponse {
            id: Uuid::new_v4(),
            description: "Dinner at \"Luigi's\"".to_string(),
            amount: dec!(42.50),
            currency: "USD".to_string(),
            status: DebtStatus::Pending,
            is_paid: false,
            creditor_id: Uuid::new_v4(),
            debtor_id: Uuid::new_v4(),
            creditor: UserSummary {
                id: Uuid::new_v4(),
                full_name: "Alice Smith".to_string(),
                email: "alice@example.com".to_string(),
            },
            debtor: UserSummary {
                id: Uuid::new_v4(),
                full_name: "Bob Jones".to_string(),
                email: "bob@example.com".to_string(),
            },
            created_at: now,
            updated_at: now,
            due_date: None,
            paid_at: None,
            notes: None,
            category: Some("food".to_string()),
            priority: Priority::High,
        }
    }

    #[test]
    fn empty_export_is_header_only() {
        let csv = render_csv(&[]);
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("ID,Description,Amount"));
    }

    #[test]
    fn header_has_nineteen_columns() {
        assert_eq!(CSV_HEADER.split(',').count(), 19);
    }

    #[test]
    fn quotes_are_doubled_in_text_fields() {
        let csv = render_csv(&[sample_debt()]);
        assert!(csv.contains("\"Dinner at \"\"Luigi's\"\"\""));
    }

    #[test]
    fn row_carries_status_and_priority_labels() {
        let csv = render_csv(&[sample_debt()]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains("PENDING"));
        assert!(row.ends_with("HIGH"));
        assert!(row.contains("\"Alice Smith\""));
    }

    #[test]
    fn missing_optionals_render_empty() {
        let csv = render_csv(&[sample_debt()]);
        let row = csv.lines().nth(1).unwrap();
        // due date and paid at are empty adjacent fields
        assert!(row.contains(",,"));
    }

    #[test]
    fn absent_notes_render_as_bare_empty_field() {
        let mut debt = sample_debt();
        debt.description = "Plain".to_string();
        debt.notes = None;
        let csv = render_csv(&[debt]);
        let row = csv.lines().nth(1).unwrap();

        // Notes is the 17th column; when absent it is empty and unquoted
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields[16], "");

        let mut debt = sample_debt();
        debt.description = "Plain".to_string();
        debt.notes = Some("call me".to_string());
        let csv = render_csv(&[debt]);
        let fields: Vec<&str> = csv.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(fields[16], "\"call me\"");
    }

    #[tokio::test]
    async fn cleanup_removes_file_and_tolerates_missing() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let service = ExportService::new(pool);

        let file_path =
            std::env::temp_dir().join(format!("debts_export_{}.json", Uuid::new_v4()));
        tokio::fs::write(&file_path, "{}").await.unwrap();

        let result = ExportResult {
            file_path: file_path.clone(),
            filename: "debts_export_test.json".to_string(),
            content_type: "application/json",
        };

        service.cleanup_temp_file(&result).await;
        assert!(!file_path.exists());

        // Removing it again must not panic or log an error
        service.cleanup_temp_file(&result).await;
    }
}
