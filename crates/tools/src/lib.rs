//! Support tools for InterDesk.
//!
//! Everything the orchestrator can reach for besides the completion
//! endpoint itself: the static knowledge base, ticket creation, the
//! documentation index, and text summarization.

pub mod doc_search;
pub mod knowledge_base;
pub mod summarize;
pub mod ticket;

pub use doc_search::DocIndex;
pub use knowledge_base::KnowledgeBase;
pub use summarize::Summarizer;
pub use ticket::create_ticket;
