//! The response orchestrator — one turn's decision procedure.
//!
//! Given a conversation ending in the latest user message, decide whether
//! to answer from the knowledge base, delegate to the model, or run one
//! tool round-trip signaled by a marker in the model's reply. Exactly one
//! tool may run per turn; markers in second-pass replies are ignored.

use crate::injector::EngagementInjector;
use crate::truncate::truncate_history;
use interdesk_core::message::{Message, Role};
use interdesk_core::{CompletionClient, Error, Result, TICKET_CREATION_LINK};
use interdesk_tools::{create_ticket, DocIndex, KnowledgeBase, Summarizer};
use std::sync::Arc;
use tracing::{debug, info};

/// Marker prefixes the model uses to request a tool, in evaluation order.
const SEARCH_MARKER: &str = "__Search__:";
const SUMMARY_MARKER: &str = "__SUMMARY__:";
const TICKET_MARKER: &str = "__CREATE_TICKET__:";

/// Substrings (lowercase) that identify an OTP-delivery complaint.
const OTP_KEYWORDS: &[&str] = &[
    "otp",
    "one time password",
    "one-time password",
    "verification code",
    "auth code",
    "login code",
];

/// Orchestrates one conversation turn. All collaborators are injected at
/// construction; there is no process-global state.
pub struct Orchestrator {
    client: Arc<dyn CompletionClient>,
    knowledge_base: KnowledgeBase,
    docs: DocIndex,
    summarizer: Summarizer,
    injector: EngagementInjector,
    max_history: usize,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn CompletionClient>, max_history: usize) -> Self {
        Self {
            knowledge_base: KnowledgeBase::new(),
            docs: DocIndex::new(),
            summarizer: Summarizer::new(client.clone()),
            injector: EngagementInjector::new(client.clone()),
            client,
            max_history,
        }
    }

    /// Run one turn over `history` and produce the assistant reply.
    ///
    /// `history` must end with the latest user message; a tool round-trip
    /// appends its intermediate result to `history` as an assistant
    /// message. The engagement injector runs on every return path.
    ///
    /// Errors: [`Error::Validation`] for an empty user message (checked
    /// before any tool or upstream call); [`Error::Upstream`] when a
    /// completion call on the main reply path fails, including the second
    /// pass after a tool invocation.
    pub async fn respond(&self, history: &mut Vec<Message>) -> Result<String> {
        let user_message = match history.last() {
            Some(m) if m.role == Role::User => m.content.clone(),
            _ => return Err(Error::validation("history must end with a user message")),
        };
        if user_message.trim().is_empty() {
            return Err(Error::validation("message is required"));
        }

        // OTP issues bypass the model entirely: open a ticket from the
        // first report and ask for the account phone number.
        if is_otp_issue(&user_message) {
            let ticket = create_ticket(&user_message);
            info!(ticket_id = %ticket.ticket_id, "OTP short-circuit: ticket opened");
            let response = format!(
                "I've opened ticket {} for your OTP issue based on your first message. \
                 Please share the phone number linked to your account so I can add it to the ticket.\n\n\
                 You can also create or manage tickets directly at: {}",
                ticket.ticket_id, TICKET_CREATION_LINK
            );
            return Ok(self.injector.inject(&response).await);
        }

        // Knowledge base beats the model.
        if let Some(response) = self.knowledge_base.lookup(&user_message) {
            debug!("Knowledge base hit");
            return Ok(self.injector.inject(response).await);
        }

        // Pass 1: let the model answer or request a tool.
        let reply = self.complete(history).await?;

        // At most one marker is honored per turn, in this order.
        if let Some(query) = marker_payload(&reply, SEARCH_MARKER) {
            debug!(query = %query, "Dispatching doc search");
            let results = self.docs.search(&query);
            history.push(Message::assistant(serde_json::to_string(&results)?));
            let reply = self.complete(history).await?;
            return Ok(self.injector.inject(&reply).await);
        }

        if let Some(text) = marker_payload(&reply, SUMMARY_MARKER) {
            debug!("Dispatching summarization");
            let summary = self.summarizer.summarize(&text).await?;
            history.push(Message::assistant(summary));
            let reply = self.complete(history).await?;
            return Ok(self.injector.inject(&reply).await);
        }

        if let Some(issue) = marker_payload(&reply, TICKET_MARKER) {
            debug!("Dispatching ticket creation");
            let ticket = create_ticket(&issue);
            let ticket_info = format!(
                "Ticket {} has been created. You can create or manage tickets at: {}",
                ticket.ticket_id, TICKET_CREATION_LINK
            );
            history.push(Message::assistant(format!(
                "{}\n{ticket_info}",
                serde_json::to_string(&ticket)?
            )));
            let mut reply = self.complete(history).await?;
            if !reply.contains(TICKET_CREATION_LINK) {
                reply.push_str(&format!(
                    "\n\nCreate or manage tickets at: {TICKET_CREATION_LINK}"
                ));
            }
            return Ok(self.injector.inject(&reply).await);
        }

        Ok(self.injector.inject(&reply).await)
    }

    /// One completion call over the truncated history.
    async fn complete(&self, history: &[Message]) -> Result<String> {
        let bounded = truncate_history(history, self.max_history);
        Ok(self.client.complete(&bounded).await?)
    }
}

/// Whether the user message reports an OTP-delivery issue.
fn is_otp_issue(message: &str) -> bool {
    let normalized = message.to_lowercase();
    OTP_KEYWORDS.iter().any(|k| normalized.contains(k))
}

/// The text after the first occurrence of `marker`, trimmed.
fn marker_payload(reply: &str, marker: &str) -> Option<String> {
    reply
        .find(marker)
        .map(|at| reply[at + marker.len()..].trim().to_string())
}
