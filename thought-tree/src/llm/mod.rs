//! Language-model backed generator and evaluator.
//!
//! The search core never talks to a model directly. This module provides the glue a calling
//! application wires in: an [`LlmClient`] trait (bring your own HTTP client),
//! [`LlmThoughtGenerator`] and [`LlmThoughtEvaluator`] that turn prompts into candidates and
//! scores, and [`MockLlm`] for tests. Problem and state are plain text: a node's state is the
//! reasoning so far, one step per line.

mod evaluator;
mod generator;
mod mock;
mod prompt;

use async_trait::async_trait;
use thiserror::Error;

pub use evaluator::{parse_value_score, parse_vote, LlmThoughtEvaluator};
pub use generator::{parse_candidates, LlmThoughtGenerator};
pub use mock::MockLlm;
pub use prompt::{GENERATE_SYSTEM_PROMPT, VALUE_SYSTEM_PROMPT, VOTE_SYSTEM_PROMPT};

/// Chat message sent to an [`LlmClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    System(String),
    User(String),
    Assistant(String),
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System(content.into())
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message::User(content.into())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant(content.into())
    }

    pub fn content(&self) -> &str {
        match self {
            Message::System(s) | Message::User(s) | Message::Assistant(s) => s,
        }
    }
}

/// Failure reported by an [`LlmClient`].
#[derive(Debug, Clone, Error)]
#[error("llm call failed: {0}")]
pub struct LlmError(pub String);

/// One-shot chat completion: messages in, assistant text out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(&self, messages: &[Message]) -> Result<String, LlmError>;
}

/// Joins the reasoning steps so far with a new step, one step per line.
pub fn append_step(state: &str, step: &str) -> String {
    if state.trim().is_empty() {
        step.to_string()
    } else {
        format!("{}\n{}", state.trim_end(), step)
    }
}

fn steps_or_none(state: &str) -> &str {
    if state.trim().is_empty() {
        "(none yet)"
    } else {
        state
    }
}
