//! Engagement-question injector.
//!
//! Every reply leaving the orchestrator ends with a question about
//! InterCloud's service catalog. Replies that already do are passed
//! through; everything else gets one generated (or, when the upstream
//! call fails, canned) question appended.

use interdesk_core::message::Message;
use interdesk_core::CompletionClient;
use std::sync::Arc;
use tracing::warn;

/// Keywords that mark an existing trailing question as on-topic.
const SERVICE_KEYWORDS: &[&str] = &[
    "intercloud",
    "ants shop",
    "cloud",
    "telephony",
    "pbx",
    "sms",
    "internet",
    "data",
    "connect",
    "brilliant",
];

/// Appended when question generation fails upstream. The single place an
/// `UpstreamError` is recovered instead of surfaced.
const FALLBACK_QUESTION: &str = "Would you like to learn more about any of InterCloud's services, such as our Cloud solutions, Telephony, or Ants Shop?";

const QUESTION_PROMPT: &str = "Based on this conversation, generate a single, natural question about InterCloud's services (Ants Shop, Cloud, Telephony, PBX, SMS, Internet/Data, or Connect app) that could help the user. Make it conversational and relevant. Return ONLY the question, nothing else.";

/// Appends a domain-relevant engagement question to replies that lack one.
pub struct EngagementInjector {
    client: Arc<dyn CompletionClient>,
}

impl EngagementInjector {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Post-process a reply so it ends with an on-topic question.
    ///
    /// Unchanged when the trimmed reply already ends with `?` and mentions
    /// a service keyword. Otherwise one question is generated upstream and
    /// appended after a blank line; an upstream failure falls back to the
    /// canned question.
    pub async fn inject(&self, reply: &str) -> String {
        let reply = reply.trim();

        if reply.ends_with('?') {
            let lower = reply.to_lowercase();
            if SERVICE_KEYWORDS.iter().any(|k| lower.contains(k)) {
                return reply.to_string();
            }
        }

        let question = match self.generate_question(reply).await {
            Ok(q) => {
                let q = q.trim().to_string();
                if q.is_empty() {
                    FALLBACK_QUESTION.to_string()
                } else if q.ends_with('?') {
                    q
                } else {
                    format!("{q}?")
                }
            }
            Err(e) => {
                warn!("Engagement question generation failed, using fallback: {e}");
                FALLBACK_QUESTION.to_string()
            }
        };

        format!("{reply}\n\n{question}")
    }

    async fn generate_question(
        &self,
        reply: &str,
    ) -> Result<String, interdesk_core::UpstreamError> {
        let messages = [
            Message::system(
                "You are a helpful assistant that generates relevant questions about InterCloud services.",
            ),
            Message::user(format!("Conversation context: {reply}\n\n{QUESTION_PROMPT}")),
        ];
        self.client.complete(&messages).await
    }
}
