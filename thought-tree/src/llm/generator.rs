//! LLM generator: one call per expansion, parsed into several candidate steps.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CallbackError;
use crate::thought::{GenerationContext, Thought, ThoughtGenerator};

use super::prompt::GENERATE_SYSTEM_PROMPT;
use super::{append_step, steps_or_none, LlmClient, Message};

/// Generator that asks a language model for `beam_width` next steps.
///
/// The child state is the parent state with the new step appended on its own line.
pub struct LlmThoughtGenerator {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl LlmThoughtGenerator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            system_prompt: GENERATE_SYSTEM_PROMPT.trim().to_string(),
        }
    }

    /// Replaces the base system prompt; the candidate-count instruction is still appended.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    fn build_messages(&self, ctx: &GenerationContext<'_, String, String>) -> Vec<Message> {
        let n = ctx.beam_width;
        let system = format!(
            "{}\n\nGenerate exactly {} candidates. You MUST output {} lines: {}.",
            self.system_prompt,
            n,
            n,
            (1..=n)
                .map(|i| format!("CANDIDATE {}", i))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let user = format!(
            "Problem:\n{}\n\nSteps so far:\n{}",
            ctx.problem,
            steps_or_none(ctx.parent_state)
        );
        vec![Message::system(system), Message::user(user)]
    }
}

#[async_trait]
impl ThoughtGenerator<String, String> for LlmThoughtGenerator {
    async fn generate(
        &self,
        ctx: &GenerationContext<'_, String, String>,
    ) -> Result<Vec<Thought<String>>, CallbackError> {
        let messages = self.build_messages(ctx);
        let content = self
            .llm
            .invoke(&messages)
            .await
            .map_err(|e| CallbackError::Generation(e.to_string()))?;
        Ok(parse_candidates(&content)
            .into_iter()
            .map(|step| {
                let state = append_step(ctx.parent_state, &step);
                Thought::new(step, state)
            })
            .collect())
    }
}

/// Parses model output into candidate steps.
///
/// Tries, in order: (1) lines containing `THOUGHT:` (e.g. `CANDIDATE 1: THOUGHT: ...`),
/// (2) a JSON envelope `{"candidates": [{"thought": "..."} | "..."]}`, (3) the whole trimmed
/// response as a single candidate. Empty output yields no candidates.
pub fn parse_candidates(content: &str) -> Vec<String> {
    let mut out = parse_line_based(content);
    if out.is_empty() {
        out = parse_json_envelope(content);
    }
    if out.is_empty() && !content.trim().is_empty() {
        out.push(content.trim().to_string());
    }
    out
}

fn parse_line_based(content: &str) -> Vec<String> {
    const MARKER: &str = "THOUGHT:";
    let mut out = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        // ASCII uppercasing keeps byte offsets valid for slicing `line`.
        let Some(pos) = line.to_ascii_uppercase().find(MARKER) else {
            continue;
        };
        let thought = line[pos + MARKER.len()..].trim().trim_end_matches('|').trim();
        if !thought.is_empty() {
            out.push(thought.to_string());
        }
    }
    out
}

fn parse_json_envelope(content: &str) -> Vec<String> {
    let body = strip_code_fence(content);
    let Ok(v) = serde_json::from_str::<serde_json::Value>(body) else {
        return vec![];
    };
    let Some(arr) = v.get("candidates").and_then(|c| c.as_array()) else {
        return vec![];
    };
    arr.iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) => Some(s.trim().to_string()),
            other => other
                .get("thought")
                .and_then(|t| t.as_str())
                .map(|s| s.trim().to_string()),
        })
        .filter(|s| !s.is_empty())
        .collect()
}

fn strip_code_fence(content: &str) -> &str {
    let s = content.trim();
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.rfind("```").map_or(rest, |end| &rest[..end]).trim()
}
