//! PostgreSQL-backed user store.
//!
//! Uniqueness is enforced by the `users.username` primary key. Inserts use
//! `ON CONFLICT DO NOTHING` so a duplicate is detected without relying on
//! error string matching.

use crate::errors::GatewayError;
use crate::models::User;
use crate::repositories::users::UserStore;
use async_trait::async_trait;
use sqlx::PgPool;

/// User store persisted in the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the bundled migrations.
    pub async fn migrate(&self) -> Result<(), GatewayError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| GatewayError::Database(format!("Failed to run migrations: {}", e)))
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get(&self, username: &str) -> Result<Option<User>, GatewayError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT username, password_hash, role
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GatewayError::Database(format!("Failed to fetch user: {}", e)))?;

        Ok(user)
    }

    async fn insert(&self, user: User) -> Result<User, GatewayError> {
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (username) DO NOTHING
            RETURNING username, password_hash, role
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GatewayError::Database(format!("Failed to create user: {}", e)))?;

        inserted.ok_or(GatewayError::DuplicateUser)
    }
}
