//! Text summarization — a single purpose-prompted completion call.

use interdesk_core::error::UpstreamError;
use interdesk_core::message::Message;
use interdesk_core::CompletionClient;
use std::sync::Arc;
use tracing::debug;

const SUMMARY_SYSTEM_PROMPT: &str =
    "You are a summarization assistant. Summarize the user's text in a few \
     short sentences, keeping all concrete details (names, numbers, dates). \
     Return ONLY the summary, nothing else.";

/// Summarizes text by delegating to the completion endpoint.
pub struct Summarizer {
    client: Arc<dyn CompletionClient>,
}

impl Summarizer {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Produce a summary of `text`. Upstream failures propagate.
    pub async fn summarize(&self, text: &str) -> Result<String, UpstreamError> {
        debug!(chars = text.len(), "Summarizing text");
        let messages = [
            Message::system(SUMMARY_SYSTEM_PROMPT),
            Message::user(text),
        ];
        self.client.complete(&messages).await
    }
}
