//! # InterDesk Core
//!
//! Domain types, traits, and error definitions for the InterDesk
//! support-chat backend. This crate has **zero framework dependencies** —
//! it defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is defined as a trait here. Implementations
//! live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod completion;
pub mod error;
pub mod history;
pub mod message;
pub mod support;

// Re-export key types at crate root for ergonomics
pub use completion::CompletionClient;
pub use error::{AuthError, Error, HistoryError, Result, UpstreamError};
pub use history::{HistoryStore, NewUser, UserRecord, UserStore};
pub use message::{ConversationId, Message, Role};
pub use support::{DocSearchResult, KnowledgeEntry, Ticket, TicketStatus, TICKET_CREATION_LINK};
