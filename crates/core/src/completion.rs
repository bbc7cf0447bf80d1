//! CompletionClient trait — the abstraction over the hosted LLM endpoint.
//!
//! The orchestrator calls `complete()` without knowing which backend is
//! configured. One request, one text reply: no retries, no streaming, no
//! token accounting beyond the history truncation done by the caller.

use crate::error::UpstreamError;
use crate::message::Message;
use async_trait::async_trait;

/// A client for a chat-completion endpoint.
///
/// Implementations: Groq (OpenAI-compatible wire format), scripted mocks
/// in tests.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// A human-readable name for this client (e.g., "groq").
    fn name(&self) -> &str;

    /// Send the conversation and get the assistant's reply text.
    ///
    /// Fails with [`UpstreamError`] when the endpoint is unreachable or
    /// returns an error; the caller decides fallback behavior.
    async fn complete(&self, messages: &[Message]) -> std::result::Result<String, UpstreamError>;
}
