//! Persistence traits — conversation history and user accounts.
//!
//! The core makes no locking guarantee across turns: callers either
//! serialize reads/writes per conversation id or accept last-write-wins
//! under concurrent turns. Within a turn, `load_history` is called once
//! before orchestration and `append` twice after it (user message, then
//! assistant reply) — best-effort, no partial-commit contract.

use crate::error::HistoryError;
use crate::message::{ConversationId, Message, Role};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Stored conversation history, ordered chronologically.
///
/// Implementations: PostgreSQL (production), in-memory (tests, CLI).
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// The backend name (e.g., "postgres", "in_memory").
    fn name(&self) -> &str;

    /// Load all messages for a conversation in chronological order.
    /// Unknown conversation ids yield an empty history.
    async fn load_history(
        &self,
        conversation_id: &ConversationId,
    ) -> std::result::Result<Vec<Message>, HistoryError>;

    /// Append one message to a conversation.
    async fn append(
        &self,
        conversation_id: &ConversationId,
        role: Role,
        content: &str,
    ) -> std::result::Result<(), HistoryError>;
}

/// A persisted user account.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub default_conversation_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub default_conversation_id: String,
}

/// User accounts for the gateway's register/login routes.
///
/// The core is agnostic to how credentials are verified; the gateway owns
/// hashing and token issuance.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user, returning the stored record.
    /// Fails when the email is already registered.
    async fn create_user(&self, user: NewUser) -> std::result::Result<UserRecord, HistoryError>;

    /// Look up a user by email.
    async fn find_by_email(
        &self,
        email: &str,
    ) -> std::result::Result<Option<UserRecord>, HistoryError>;

    /// Look up a user by id.
    async fn find_by_id(&self, id: i64)
    -> std::result::Result<Option<UserRecord>, HistoryError>;

    /// Set the default conversation id for a user (backfilled at login
    /// when missing).
    async fn set_default_conversation(
        &self,
        id: i64,
        conversation_id: &str,
    ) -> std::result::Result<(), HistoryError>;
}
