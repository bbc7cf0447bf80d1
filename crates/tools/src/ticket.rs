//! Support-ticket creation.
//!
//! Ticket ids carry a pseudo-random 4-digit suffix. Uniqueness is not
//! guaranteed and collisions are accepted; the external ticketing service
//! is the system of record.

use interdesk_core::{Ticket, TicketStatus, TICKET_CREATION_LINK};
use rand::Rng;
use tracing::info;

/// Create a ticket for the given issue description.
pub fn create_ticket(issue: &str) -> Ticket {
    let suffix: u32 = rand::rng().random_range(1000..=9999);
    let ticket_id = format!("TICKET-{suffix}");
    info!(ticket_id = %ticket_id, "Support ticket created");

    Ticket {
        ticket_id,
        issue: issue.to_string(),
        status: TicketStatus::Created,
        ticket_link: TICKET_CREATION_LINK.to_string(),
    }
}
