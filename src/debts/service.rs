//! Debt service
//!
//! Debt CRUD, the mark-paid lifecycle, filtered listing, and the cached
//! dashboard summary. Every access check is enforced here rather than in the
//! handlers.

use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::cache::CacheStore;
use crate::error::ApiError;
use crate::models::{
    page_window, DashboardSummary, Debt, DebtResponse, DebtStatus, DebtWithParties,
    PaginatedResponse,
};

use super::model::{CreateDebtRequest, DebtQuery, UpdateDebtRequest};
use super::rules;
use super::summary::compute_summary;

const DASHBOARD_CACHE_PREFIX: &str = "dashboard_summary";
const DASHBOARD_CACHE_TTL_SECONDS: u64 = 300;
const DEFAULT_CURRENCY: &str = "USD";

/// Columns of a debt row joined with both party projections
const DEBT_WITH_PARTIES_COLUMNS: &str = r#"
    d.id, d.description, d.amount, d.currency, d.status, d.is_paid,
    d.creditor_id, d.debtor_id, d.due_date, d.paid_at, d.notes,
    d.category, d.priority, d.created_at, d.updated_at,
    c.full_name AS creditor_full_name, c.email AS creditor_email,
    b.full_name AS debtor_full_name, b.email AS debtor_email
"#;

const DEBT_WITH_PARTIES_JOINS: &str = r#"
    FROM debts d
    JOIN users c ON c.id = d.creditor_id
    JOIN users b ON b.id = d.debtor_id
"#;

#[derive(Clone)]
pub struct DebtService {
    db_pool: PgPool,
    cache: CacheStore,
}

impl DebtService {
    pub fn new(db_pool: PgPool, cache: CacheStore) -> Self {
        Self { db_pool, cache }
    }

    /// Create a debt with the acting user as creditor
    pub async fn create_debt(
        &self,
        acting_user_id: Uuid,
        request: CreateDebtRequest,
    ) -> Result<DebtResponse, ApiError> {
        tracing::info!(
            creditor_id = %request.creditor_id,
            debtor_id = %request.debtor_id,
            "Creating debt"
        );

        rules::check_creation(acting_user_id, request.creditor_id, request.debtor_id).map_err(
            |e| {
                tracing::warn!(user_id = %acting_user_id, "Debt creation rejected");
                e
            },
        )?;

        let creditor_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)",
        )
        .bind(request.creditor_id)
        .fetch_one(&self.db_pool);
        let debtor_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)",
        )
        .bind(request.debtor_id)
        .fetch_one(&self.db_pool);

        let (creditor_exists, debtor_exists) = tokio::try_join!(creditor_exists, debtor_exists)?;
        if !creditor_exists || !debtor_exists {
            return Err(ApiError::NotFound(
                "Creditor or debtor not found".to_string(),
            ));
        }

        let debt = sqlx::query_as::<_, Debt>(
            r#"
            INSERT INTO debts
                (id, description, amount, currency, creditor_id, debtor_id,
                 due_date, notes, category, priority)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 'MEDIUM'::debt_priority))
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.description)
        .bind(request.amount)
        .bind(
            request
                .currency
                .as_deref()
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_CURRENCY),
        )
        .bind(request.creditor_id)
        .bind(request.debtor_id)
        .bind(request.due_date)
        .bind(&request.notes)
        .bind(&request.category)
        .bind(request.priority)
        .fetch_one(&self.db_pool)
        .await?;

        self.invalidate_dashboards().await;

        tracing::info!(debt_id = %debt.id, "Debt created");
        self.fetch_debt_with_parties(debt.id).await
    }

    /// List debts visible to the user, filtered, sorted, and paginated
    pub async fn get_all_debts(
        &self,
        user_id: Uuid,
        query: DebtQuery,
    ) -> Result<PaginatedResponse<DebtResponse>, ApiError> {
        let (page, limit, offset) = page_window(query.page, query.limit);

        let mut list_builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} {}",
            DEBT_WITH_PARTIES_COLUMNS, DEBT_WITH_PARTIES_JOINS
        ));
        let mut count_builder =
            QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) {}", DEBT_WITH_PARTIES_JOINS));

        push_visibility_and_filters(&mut list_builder, user_id, &query);
        push_visibility_and_filters(&mut count_builder, user_id, &query);

        let sort_column = match query.sort_by.as_deref() {
            Some("amount") => "d.amount",
            Some("dueDate") => "d.due_date",
            Some("priority") => "d.priority",
            // Unknown sort keys fall back to creation time
            _ => "d.created_at",
        };
        let sort_direction = match query.sort_order.as_deref() {
            Some(order) if order.eq_ignore_ascii_case("asc") => "ASC",
            _ => "DESC",
        };

        list_builder.push(format!(" ORDER BY {} {}", sort_column, sort_direction));
        list_builder.push(" LIMIT ");
        list_builder.push_bind(limit);
        list_builder.push(" OFFSET ");
        list_builder.push_bind(offset);

        let rows_fut = list_builder
            .build_query_as::<DebtWithParties>()
            .fetch_all(&self.db_pool);
        let total_fut = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.db_pool);

        let (rows, total) = tokio::try_join!(rows_fut, total_fut)?;

        let total_pages = (total + limit - 1) / limit;

        Ok(PaginatedResponse {
            data: rows.into_iter().map(DebtResponse::from).collect(),
            total,
            page,
            limit,
            total_pages,
        })
    }

    /// Fetch a single debt, enforcing party-only visibility
    pub async fn get_debt_by_id(
        &self,
        user_id: Uuid,
        debt_id: Uuid,
    ) -> Result<DebtResponse, ApiError> {
        let debt = self.fetch_debt_with_parties(debt_id).await?;

        rules::check_view(debt.creditor_id, debt.debtor_id, user_id).map_err(|e| {
            tracing::warn!(user_id = %user_id, debt_id = %debt_id, "Debt access denied");
            e
        })?;

        Ok(debt)
    }

    /// Update a debt; only the creditor may modify it
    pub async fn update_debt(
        &self,
        user_id: Uuid,
        debt_id: Uuid,
        request: UpdateDebtRequest,
    ) -> Result<DebtResponse, ApiError> {
        tracing::info!(debt_id = %debt_id, "Updating debt");

        let existing = self.fetch_debt(debt_id).await?;

        rules::check_update(
            &existing,
            user_id,
            request.amount.is_some(),
            request.description.is_some(),
        )?;

        // Moving a debt to PAID through a status update behaves like mark-paid
        let becomes_paid = request.status == Some(DebtStatus::Paid) && !existing.is_paid;
        let paid_at = if becomes_paid { Some(Utc::now()) } else { None };

        sqlx::query(
            r#"
            UPDATE debts
            SET description = COALESCE($1, description),
                amount = COALESCE($2, amount),
                currency = COALESCE($3, currency),
                status = COALESCE($4, status),
                due_date = COALESCE($5, due_date),
                notes = COALESCE($6, notes),
                category = COALESCE($7, category),
                priority = COALESCE($8, priority),
                is_paid = CASE WHEN $9 THEN TRUE ELSE is_paid END,
                paid_at = COALESCE($10, paid_at),
                updated_at = NOW()
            WHERE id = $11
            "#,
        )
        .bind(&request.description)
        .bind(request.amount)
        .bind(&request.currency)
        .bind(request.status)
        .bind(request.due_date)
        .bind(&request.notes)
        .bind(&request.category)
        .bind(request.priority)
        .bind(becomes_paid)
        .bind(paid_at)
        .bind(debt_id)
        .execute(&self.db_pool)
        .await?;

        self.invalidate_dashboards().await;

        tracing::info!(debt_id = %debt_id, "Debt updated");
        self.fetch_debt_with_parties(debt_id).await
    }

    /// Mark a debt as paid; only the creditor may do so
    pub async fn mark_as_paid(
        &self,
        user_id: Uuid,
        debt_id: Uuid,
    ) -> Result<DebtResponse, ApiError> {
        tracing::info!(debt_id = %debt_id, "Marking debt as paid");

        let existing = self.fetch_debt(debt_id).await?;

        rules::check_mark_paid(&existing, user_id)?;

        sqlx::query(
            r#"
            UPDATE debts
            SET status = 'PAID'::debt_status,
                is_paid = TRUE,
                paid_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(debt_id)
        .execute(&self.db_pool)
        .await?;

        self.invalidate_dashboards().await;

        tracing::info!(debt_id = %debt_id, "Debt marked as paid");
        self.fetch_debt_with_parties(debt_id).await
    }

    /// Delete a debt; only the creditor may, and only while unpaid
    pub async fn delete_debt(&self, user_id: Uuid, debt_id: Uuid) -> Result<(), ApiError> {
        tracing::info!(debt_id = %debt_id, "Deleting debt");

        let existing = self.fetch_debt(debt_id).await?;

        rules::check_delete(&existing, user_id)?;

        sqlx::query("DELETE FROM debts WHERE id = $1")
            .bind(debt_id)
            .execute(&self.db_pool)
            .await?;

        self.invalidate_dashboards().await;

        tracing::info!(debt_id = %debt_id, "Debt deleted");
        Ok(())
    }

    /// Dashboard summary for the user, served from cache when fresh
    pub async fn get_dashboard_summary(
        &self,
        user_id: Uuid,
    ) -> Result<DashboardSummary, ApiError> {
        let cache_key = format!("{}:{}", DASHBOARD_CACHE_PREFIX, user_id);

        if let Some(cached) = self.cache.get::<DashboardSummary>(&cache_key).await {
            tracing::debug!(user_id = %user_id, "Dashboard summary cache hit");
            return Ok(cached);
        }

        let debts = sqlx::query_as::<_, Debt>(
            "SELECT * FROM debts WHERE creditor_id = $1 OR debtor_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        let summary = compute_summary(&debts, Utc::now());

        self.cache
            .set(&cache_key, &summary, DASHBOARD_CACHE_TTL_SECONDS)
            .await;

        Ok(summary)
    }

    async fn fetch_debt(&self, debt_id: Uuid) -> Result<Debt, ApiError> {
        sqlx::query_as::<_, Debt>("SELECT * FROM debts WHERE id = $1")
            .bind(debt_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Debt not found".to_string()))
    }

    async fn fetch_debt_with_parties(&self, debt_id: Uuid) -> Result<DebtResponse, ApiError> {
        let row = sqlx::query_as::<_, DebtWithParties>(&format!(
            "SELECT {} {} WHERE d.id = $1",
            DEBT_WITH_PARTIES_COLUMNS, DEBT_WITH_PARTIES_JOINS
        ))
        .bind(debt_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Debt not found".to_string()))?;

        Ok(DebtResponse::from(row))
    }

    /// Any debt mutation can affect either party's dashboard, so all cached
    /// summaries are dropped rather than tracking which users are involved.
    async fn invalidate_dashboards(&self) {
        self.cache.invalidate_all(DASHBOARD_CACHE_PREFIX).await;
    }
}

/// Append the visibility clause and the optional filters shared by the list
/// and count queries.
pub(super) fn push_visibility_and_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    user_id: Uuid,
    query: &DebtQuery,
) {
    builder.push(" WHERE (d.creditor_id = ");
    builder.push_bind(user_id);
    builder.push(" OR d.debtor_id = ");
    builder.push_bind(user_id);
    builder.push(")");

    if let Some(status) = query.status {
        builder.push(" AND d.status = ");
        builder.push_bind(status);
    }
    if let Some(is_paid) = query.is_paid {
        builder.push(" AND d.is_paid = ");
        builder.push_bind(is_paid);
    }
    if let Some(priority) = query.priority {
        builder.push(" AND d.priority = ");
        builder.push_bind(priority);
    }
    if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
        builder.push(" AND d.category = ");
        builder.push_bind(category.to_string());
    }
    if let Some(creditor_id) = query.creditor_id {
        builder.push(" AND d.creditor_id = ");
        builder.push_bind(creditor_id);
    }
    if let Some(debtor_id) = query.debtor_id {
        builder.push(" AND d.debtor_id = ");
        builder.push_bind(debtor_id);
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        builder.push(" AND d.description ILIKE ");
        builder.push_bind(format!("%{}%", search));
    }
}
