//! Shared test helpers for orchestration tests.

use async_trait::async_trait;
use interdesk_core::error::UpstreamError;
use interdesk_core::message::Message;
use interdesk_core::CompletionClient;
use std::sync::Mutex;

/// A mock completion client that returns a sequence of scripted results.
///
/// Each call to `complete` returns the next result in the queue and records
/// the messages it was given. Panics if more calls are made than results
/// provided.
pub struct SequentialMockClient {
    responses: Mutex<Vec<Result<String, UpstreamError>>>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl SequentialMockClient {
    pub fn new(responses: Vec<Result<String, UpstreamError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A client scripted with a single successful text reply.
    pub fn single_text(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The messages sent on the n-th call.
    pub fn call(&self, n: usize) -> Vec<Message> {
        self.calls.lock().unwrap()[n].clone()
    }
}

#[async_trait]
impl CompletionClient for SequentialMockClient {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, UpstreamError> {
        let mut calls = self.calls.lock().unwrap();
        let mut responses = self.responses.lock().unwrap();

        if responses.is_empty() {
            panic!(
                "SequentialMockClient: no more responses (call #{})",
                calls.len() + 1
            );
        }

        calls.push(messages.to_vec());
        responses.remove(0)
    }
}
