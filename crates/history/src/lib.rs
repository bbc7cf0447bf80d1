//! Persistence backends for InterDesk.
//!
//! Implements the core `HistoryStore` and `UserStore` traits:
//! - [`PostgresStore`] — production backend over sqlx
//! - [`InMemoryStore`] — tests and the CLI chat loop
//!
//! Neither backend serializes turns per conversation id; concurrent turns
//! on the same conversation resolve last-write-wins (append in call order).

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;
