//! PostgreSQL persistence backend.
//!
//! Two tables: `chat_messages` (per-conversation transcript) and `users`
//! (accounts with a default conversation id). Migrations are inline and
//! idempotent; the schema is created on first connect.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use interdesk_core::error::HistoryError;
use interdesk_core::history::{HistoryStore, NewUser, UserRecord, UserStore};
use interdesk_core::message::{ConversationId, Message, Role};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::{debug, info, warn};

/// A production Postgres store for conversations and users.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and run migrations.
    pub async fn new(database_url: &str) -> Result<Self, HistoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(8)
            .connect(database_url)
            .await
            .map_err(|e| HistoryError::Storage(format!("Failed to connect to Postgres: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("Postgres history store initialized");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: PgPool) -> Result<Self, HistoryError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), HistoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chat_messages (
                id              BIGSERIAL PRIMARY KEY,
                conversation_id VARCHAR(64) NOT NULL,
                role            VARCHAR(16) NOT NULL,
                content         TEXT NOT NULL,
                created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::MigrationFailed(format!("chat_messages table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_chat_messages_conversation
             ON chat_messages(conversation_id, created_at, id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::MigrationFailed(format!("chat_messages index: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id                      BIGSERIAL PRIMARY KEY,
                email                   VARCHAR(255) UNIQUE NOT NULL,
                password_hash           VARCHAR(255) NOT NULL,
                default_conversation_id VARCHAR(64),
                created_at              TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::MigrationFailed(format!("users table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(&self.pool)
            .await
            .map_err(|e| HistoryError::MigrationFailed(format!("users index: {e}")))?;

        debug!("Postgres migrations complete");
        Ok(())
    }

    fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<UserRecord, HistoryError> {
        Ok(UserRecord {
            id: row
                .try_get("id")
                .map_err(|e| HistoryError::QueryFailed(format!("id column: {e}")))?,
            email: row
                .try_get("email")
                .map_err(|e| HistoryError::QueryFailed(format!("email column: {e}")))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| HistoryError::QueryFailed(format!("password_hash column: {e}")))?,
            default_conversation_id: row.try_get("default_conversation_id").map_err(|e| {
                HistoryError::QueryFailed(format!("default_conversation_id column: {e}"))
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| HistoryError::QueryFailed(format!("created_at column: {e}")))?,
        })
    }
}

#[async_trait]
impl HistoryStore for PostgresStore {
    fn name(&self) -> &str {
        "postgres"
    }

    async fn load_history(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Message>, HistoryError> {
        let rows = sqlx::query(
            "SELECT role, content FROM chat_messages
             WHERE conversation_id = $1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(&conversation_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HistoryError::QueryFailed(format!("load_history: {e}")))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let role: String = row
                .try_get("role")
                .map_err(|e| HistoryError::QueryFailed(format!("role column: {e}")))?;
            let content: String = row
                .try_get("content")
                .map_err(|e| HistoryError::QueryFailed(format!("content column: {e}")))?;

            // Rows written by older builds may carry roles we no longer
            // know; skip them rather than failing the whole load.
            match Role::parse(&role) {
                Some(role) => messages.push(Message { role, content }),
                None => warn!(role = %role, "Skipping message with unknown role"),
            }
        }
        Ok(messages)
    }

    async fn append(
        &self,
        conversation_id: &ConversationId,
        role: Role,
        content: &str,
    ) -> Result<(), HistoryError> {
        sqlx::query(
            "INSERT INTO chat_messages (conversation_id, role, content) VALUES ($1, $2, $3)",
        )
        .bind(&conversation_id.0)
        .bind(role.as_str())
        .bind(content)
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::Storage(format!("append: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, HistoryError> {
        let row = sqlx::query(
            "INSERT INTO users (email, password_hash, default_conversation_id)
             VALUES ($1, $2, $3)
             RETURNING id, email, password_hash, default_conversation_id, created_at",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.default_conversation_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| HistoryError::Storage(format!("create_user: {e}")))?;

        Self::row_to_user(&row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, HistoryError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, default_conversation_id, created_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| HistoryError::QueryFailed(format!("find_by_email: {e}")))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, HistoryError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, default_conversation_id, created_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| HistoryError::QueryFailed(format!("find_by_id: {e}")))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn set_default_conversation(
        &self,
        id: i64,
        conversation_id: &str,
    ) -> Result<(), HistoryError> {
        sqlx::query("UPDATE users SET default_conversation_id = $1 WHERE id = $2")
            .bind(conversation_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| HistoryError::Storage(format!("set_default_conversation: {e}")))?;
        Ok(())
    }
}
