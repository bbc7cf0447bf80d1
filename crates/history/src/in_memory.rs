//! In-memory store — tests and the CLI chat loop. Nothing survives
//! process exit.

use async_trait::async_trait;
use chrono::Utc;
use interdesk_core::error::HistoryError;
use interdesk_core::history::{HistoryStore, NewUser, UserRecord, UserStore};
use interdesk_core::message::{ConversationId, Message, Role};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    conversations: HashMap<String, Vec<Message>>,
    users: Vec<UserRecord>,
}

/// A volatile store backed by a `HashMap` behind an async lock.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn load_history(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Message>, HistoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .conversations
            .get(&conversation_id.0)
            .cloned()
            .unwrap_or_default())
    }

    async fn append(
        &self,
        conversation_id: &ConversationId,
        role: Role,
        content: &str,
    ) -> Result<(), HistoryError> {
        let mut inner = self.inner.write().await;
        inner
            .conversations
            .entry(conversation_id.0.clone())
            .or_default()
            .push(Message {
                role,
                content: content.to_string(),
            });
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, HistoryError> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(HistoryError::Storage(format!(
                "email already registered: {}",
                user.email
            )));
        }

        let record = UserRecord {
            id: inner.users.len() as i64 + 1,
            email: user.email,
            password_hash: user.password_hash,
            default_conversation_id: Some(user.default_conversation_id),
            created_at: Utc::now(),
        };
        inner.users.push(record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, HistoryError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, HistoryError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn set_default_conversation(
        &self,
        id: i64,
        conversation_id: &str,
    ) -> Result<(), HistoryError> {
        let mut inner = self.inner.write().await;
        if let Some(user) = inner.users.iter_mut().find(|u| u.id == id) {
            user.default_conversation_id = Some(conversation_id.to_string());
        }
        Ok(())
    }
}
