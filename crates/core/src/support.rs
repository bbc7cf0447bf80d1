//! Support-domain value objects: tickets, doc search hits, knowledge entries.

use serde::{Deserialize, Serialize};

/// Where users create or manage tickets themselves. Reproduced verbatim in
/// ticket responses.
pub const TICKET_CREATION_LINK: &str = "https://app-support.brilliant.com.bd/create-ticket";

/// Lifecycle state of a support ticket. Only creation happens in this
/// system; later transitions live in the external ticketing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    Created,
}

/// A support ticket produced by the ticket-creation tool.
///
/// The id carries a pseudo-random 4-digit suffix with no uniqueness
/// guarantee; collisions are accepted. Tickets are not persisted here —
/// the external ticketing service owns them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: String,
    pub issue: String,
    pub status: TicketStatus,
    pub ticket_link: String,
}

/// A documentation search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSearchResult {
    pub title: String,
    pub content: String,
}

/// A static knowledge-base entry: a topic, the keywords that trigger it,
/// and the canned response returned on a hit.
#[derive(Debug, Clone)]
pub struct KnowledgeEntry {
    pub topic: &'static str,
    pub keywords: &'static [&'static str],
    pub response: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_serializes_with_link() {
        let ticket = Ticket {
            ticket_id: "TICKET-1234".into(),
            issue: "OTP not arriving".into(),
            status: TicketStatus::Created,
            ticket_link: TICKET_CREATION_LINK.into(),
        };
        let json = serde_json::to_string(&ticket).unwrap();
        assert!(json.contains("TICKET-1234"));
        assert!(json.contains("app-support.brilliant.com.bd"));
    }
}
