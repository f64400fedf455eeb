//! User directory service
//!
//! User CRUD, the active-debt deletion guard, and refresh token bookkeeping.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{page_window, PaginatedResponse, User, UserResponse};
use crate::users::model::{CreateUserRequest, UpdateUserRequest, UserListQuery};

const BCRYPT_COST: u32 = 12;

#[derive(Clone)]
pub struct UserService {
    db_pool: PgPool,
}

impl UserService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Create a new user with a hashed password
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, ApiError> {
        tracing::info!(email = %request.email, "Creating user");

        let existing = self.find_user_by_email(&request.email).await?;
        if existing.is_some() {
            tracing::warn!(email = %request.email, "User already exists");
            return Err(ApiError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let password_hash = bcrypt::hash(&request.password, BCRYPT_COST)
            .map_err(|e| ApiError::InternalError(format!("Password hashing failed: {}", e)))?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password, full_name)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.email)
        .bind(&password_hash)
        .bind(&request.full_name)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_user_by_id(&self, id: Uuid) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Find a user by email, including the password hash for authentication
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(user)
    }

    /// Update a user's profile
    pub async fn update_user(
        &self,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<User, ApiError> {
        tracing::info!(user_id = %id, "Updating user");

        let existing = self.find_user_by_id(id).await?;

        // Reject an email change to an address already held by another user
        if let Some(new_email) = &request.email {
            if new_email != &existing.email {
                let taken = self.find_user_by_email(new_email).await?;
                if taken.is_some() {
                    tracing::warn!(email = %new_email, "Email is already taken");
                    return Err(ApiError::Conflict("Email is already taken".to_string()));
                }
            }
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = COALESCE($1, email),
                full_name = COALESCE($2, full_name),
                is_active = COALESCE($3, is_active),
                updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&request.email)
        .bind(&request.full_name)
        .bind(request.is_active)
        .bind(id)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(user_id = %id, "User updated");
        Ok(user)
    }

    /// Delete a user, provided they hold no unpaid debt on either side
    pub async fn delete_user(&self, id: Uuid) -> Result<(), ApiError> {
        tracing::info!(user_id = %id, "Deleting user");

        self.find_user_by_id(id).await?;

        let active_debts: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM debts
            WHERE (creditor_id = $1 OR debtor_id = $1) AND is_paid = FALSE
            "#,
        )
        .bind(id)
        .fetch_one(&self.db_pool)
        .await?;

        if active_debts > 0 {
            tracing::warn!(user_id = %id, active_debts, "Cannot delete user with active debts");
            return Err(ApiError::BadRequest(
                "Cannot delete user with active debts".to_string(),
            ));
        }

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// List users with pagination and an optional search over email/name
    pub async fn get_all_users(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<UserResponse>, ApiError> {
        let (page, limit, offset) = page_window(query.page, query.limit);

        let mut query_builder = sqlx::QueryBuilder::new("SELECT * FROM users WHERE 1=1");
        let mut count_builder = sqlx::QueryBuilder::new("SELECT COUNT(*) FROM users WHERE 1=1");

        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            query_builder.push(" AND (email ILIKE ");
            query_builder.push_bind(pattern.clone());
            query_builder.push(" OR full_name ILIKE ");
            query_builder.push_bind(pattern.clone());
            query_builder.push(")");
            count_builder.push(" AND (email ILIKE ");
            count_builder.push_bind(pattern.clone());
            count_builder.push(" OR full_name ILIKE ");
            count_builder.push_bind(pattern);
            count_builder.push(")");
        }

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.db_pool)
            .await?;

        query_builder.push(" ORDER BY created_at DESC LIMIT ");
        query_builder.push_bind(limit);
        query_builder.push(" OFFSET ");
        query_builder.push_bind(offset);

        let users = query_builder
            .build_query_as::<User>()
            .fetch_all(&self.db_pool)
            .await?;

        let total_pages = (total + limit - 1) / limit;

        Ok(PaginatedResponse {
            data: users.into_iter().map(UserResponse::from).collect(),
            total,
            page,
            limit,
            total_pages,
        })
    }

    /// Store the latest issued refresh token; only one is valid at a time
    pub async fn update_refresh_token(
        &self,
        user_id: Uuid,
        refresh_token: &str,
    ) -> Result<(), ApiError> {
        sqlx::query("UPDATE users SET refresh_token = $1, updated_at = NOW() WHERE id = $2")
            .bind(refresh_token)
            .bind(user_id)
            .execute(&self.db_pool)
            .await?;
        Ok(())
    }

    /// Clear the stored refresh token on logout
    pub async fn remove_refresh_token(&self, user_id: Uuid) -> Result<(), ApiError> {
        sqlx::query("UPDATE users SET refresh_token = NULL, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&self.db_pool)
            .await?;
        Ok(())
    }
}
