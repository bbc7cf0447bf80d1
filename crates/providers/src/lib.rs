//! Completion-endpoint clients for InterDesk.
//!
//! The production backend is Groq, which exposes an OpenAI-compatible
//! `/chat/completions` endpoint; [`GroqClient`] therefore works unchanged
//! against OpenAI, OpenRouter, vLLM, and similar services.

pub mod groq;

pub use groq::GroqClient;
