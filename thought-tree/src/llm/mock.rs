//! Mock LLM for tests and examples.
//!
//! Returns a fixed reply, or replays a script of replies in order (the last one repeats once the
//! script runs out). Records every request so tests can assert on prompts.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{LlmClient, LlmError, Message};

/// Mock LLM: fixed or scripted assistant text, or a fixed failure.
pub struct MockLlm {
    /// Replies still to be returned; the last one is kept and repeated.
    script: Mutex<VecDeque<String>>,
    /// When set, every call fails with this message.
    failure: Option<String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    /// Creates a mock that always answers `content`.
    pub fn new(content: impl Into<String>) -> Self {
        Self::scripted([content.into()])
    }

    /// Creates a mock that answers with `replies` in order, repeating the last one.
    pub fn scripted<I, T>(replies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            script: Mutex::new(replies.into_iter().map(Into::into).collect()),
            failure: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock whose every call fails.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::scripted(Vec::<String>::new())
        }
    }

    /// Number of `invoke` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Messages of every request received so far, in call order.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }
        if let Some(msg) = &self.failure {
            return Err(LlmError(msg.clone()));
        }
        let mut script = self
            .script
            .lock()
            .map_err(|_| LlmError("mock script lock poisoned".into()))?;
        let reply = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        Ok(reply.unwrap_or_default())
    }
}
