//! LLM evaluator: `value` scores each candidate alone, `vote` picks one winner per expansion.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CallbackError;
use crate::thought::{EvaluationContext, Thought, ThoughtEvaluator};

use super::prompt::{VALUE_SYSTEM_PROMPT, VOTE_SYSTEM_PROMPT};
use super::{steps_or_none, LlmClient, Message};

const STRATEGY_VALUE: &str = "value";
const STRATEGY_VOTE: &str = "vote";

/// Evaluator backed by a language model.
///
/// Dispatches on [`EvaluationContext::evaluation_strategy`]:
/// - `value`: one call per candidate, reply parsed with [`parse_value_score`].
/// - `vote`: one call per expansion listing all candidates; the chosen one scores 1.0 and the
///   rest 0.0.
///
/// Any other strategy name fails the evaluation.
///
/// `vote` compares siblings, so it only works through
/// [`evaluate_batch`](ThoughtEvaluator::evaluate_batch), which the executor uses when
/// `evaluation_concurrency` is 1. Scoring a single candidate under `vote` is an error.
pub struct LlmThoughtEvaluator {
    llm: Arc<dyn LlmClient>,
}

impl LlmThoughtEvaluator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    async fn ask(&self, system: &str, user: String) -> Result<String, CallbackError> {
        let messages = [Message::system(system.trim()), Message::user(user)];
        self.llm
            .invoke(&messages)
            .await
            .map_err(|e| CallbackError::Evaluation(e.to_string()))
    }

    async fn value(
        &self,
        ctx: &EvaluationContext<'_, String, String>,
        thought: &Thought<String>,
    ) -> Result<f64, CallbackError> {
        let user = format!(
            "Problem:\n{}\n\nSteps so far:\n{}\n\nProposed next step:\n{}",
            ctx.problem,
            steps_or_none(ctx.parent_state),
            thought.label
        );
        let reply = self.ask(VALUE_SYSTEM_PROMPT, user).await?;
        parse_value_score(&reply).ok_or_else(|| {
            CallbackError::Evaluation(format!("unparseable value reply: {:?}", reply.trim()))
        })
    }

    async fn vote(
        &self,
        ctx: &EvaluationContext<'_, String, String>,
        thoughts: &[Thought<String>],
    ) -> Result<Vec<f64>, CallbackError> {
        if thoughts.is_empty() {
            return Ok(vec![]);
        }
        let listing = thoughts
            .iter()
            .enumerate()
            .map(|(i, t)| format!("Candidate {}: {}", i + 1, t.label))
            .collect::<Vec<_>>()
            .join("\n");
        let user = format!(
            "Problem:\n{}\n\nSteps so far:\n{}\n\n{}",
            ctx.problem,
            steps_or_none(ctx.parent_state),
            listing
        );
        let reply = self.ask(VOTE_SYSTEM_PROMPT, user).await?;
        let best = parse_vote(&reply, thoughts.len()).ok_or_else(|| {
            CallbackError::Evaluation(format!("unparseable vote reply: {:?}", reply.trim()))
        })?;
        Ok((0..thoughts.len())
            .map(|i| if i == best { 1.0 } else { 0.0 })
            .collect())
    }
}

#[async_trait]
impl ThoughtEvaluator<String, String> for LlmThoughtEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext<'_, String, String>,
        thought: &Thought<String>,
    ) -> Result<f64, CallbackError> {
        match ctx.evaluation_strategy {
            STRATEGY_VALUE => self.value(ctx, thought).await,
            STRATEGY_VOTE => Err(CallbackError::Evaluation(
                "vote compares all candidates of an expansion; set evaluation_concurrency to 1"
                    .into(),
            )),
            other => Err(unknown_strategy(other)),
        }
    }

    async fn evaluate_batch(
        &self,
        ctx: &EvaluationContext<'_, String, String>,
        thoughts: &[Thought<String>],
    ) -> Result<Vec<f64>, CallbackError> {
        match ctx.evaluation_strategy {
            STRATEGY_VALUE => {
                let mut scores = Vec::with_capacity(thoughts.len());
                for thought in thoughts {
                    scores.push(self.value(ctx, thought).await?);
                }
                Ok(scores)
            }
            STRATEGY_VOTE => self.vote(ctx, thoughts).await,
            other => Err(unknown_strategy(other)),
        }
    }
}

fn unknown_strategy(name: &str) -> CallbackError {
    CallbackError::Evaluation(format!("unknown evaluation strategy: {}", name))
}

const SCORE_SURE: f64 = 1.0;
const SCORE_LIKELY: f64 = 0.5;
const SCORE_UNLIKELY: f64 = 0.1;
const SCORE_IMPOSSIBLE: f64 = 0.0;

/// Parses a `value` reply into a score in [0, 1].
///
/// The first number wins and is clamped; `n/d` and `n out of d` are read as ratios. Without a
/// number, the first verdict word decides: `sure` 1.0, `likely` 0.5, `unlikely` 0.1,
/// `impossible` 0.0. A `not` right before a verdict weakens it (`not sure` reads as
/// `unlikely`, `not impossible` as `likely`).
pub fn parse_value_score(reply: &str) -> Option<f64> {
    if let Some((n, end)) = first_number(reply) {
        let score = match denominator(&reply[end..]) {
            Some(d) => n / d,
            None => n,
        };
        return Some(score.clamp(0.0, 1.0));
    }
    verdict_score(reply)
}

fn verdict_score(reply: &str) -> Option<f64> {
    let lower = reply.to_lowercase();
    let mut negated = false;
    for word in lower.split(|c: char| !c.is_alphanumeric() && c != '\'') {
        let score = match word {
            "" => continue,
            "not" | "isn't" | "never" => {
                negated = true;
                continue;
            }
            "sure" | "certain" if negated => SCORE_UNLIKELY,
            "likely" if negated => SCORE_UNLIKELY,
            "impossible" if negated => SCORE_LIKELY,
            "sure" | "certain" => SCORE_SURE,
            "likely" => SCORE_LIKELY,
            "unlikely" => SCORE_UNLIKELY,
            "impossible" => SCORE_IMPOSSIBLE,
            _ => {
                negated = false;
                continue;
            }
        };
        return Some(score);
    }
    None
}

/// Denominator of a ratio right after a number: `/10` or ` out of 10`.
fn denominator(rest: &str) -> Option<f64> {
    let rest = rest.trim_start();
    let rest = match rest.strip_prefix('/') {
        Some(r) => r,
        None => rest.strip_prefix("out of")?,
    };
    let rest = rest.trim_start();
    match first_number(rest) {
        Some((d, _)) if d > 0.0 && rest.starts_with(|c: char| c.is_ascii_digit() || c == '.') => {
            Some(d)
        }
        _ => None,
    }
}

/// Parses a `vote` reply (`BEST: <n>`, 1-based) into a 0-based index below `count`.
///
/// Without the `BEST:` marker the first number in the reply is used.
pub fn parse_vote(reply: &str, count: usize) -> Option<usize> {
    let upper = reply.to_ascii_uppercase();
    let tail = match upper.find("BEST:") {
        Some(pos) => &reply[pos + "BEST:".len()..],
        None => reply,
    };
    let (n, _) = first_number(tail)?;
    if n.fract() != 0.0 || n < 1.0 {
        return None;
    }
    let idx = n as usize - 1;
    (idx < count).then_some(idx)
}

/// First decimal number in `text` and the byte offset just past it.
///
/// A `-` directly before the digits is part of the number unless it follows a letter or digit
/// (`step-2` yields 2).
fn first_number(text: &str) -> Option<(f64, usize)> {
    let bytes = text.as_bytes();
    let starts_digits = |i: usize| match bytes.get(i) {
        Some(b) if b.is_ascii_digit() => true,
        Some(&b'.') => bytes.get(i + 1).is_some_and(u8::is_ascii_digit),
        _ => false,
    };
    let digits = (0..bytes.len()).find(|&i| starts_digits(i))?;
    let start = if digits > 0
        && bytes[digits - 1] == b'-'
        && (digits < 2 || !bytes[digits - 2].is_ascii_alphanumeric())
    {
        digits - 1
    } else {
        digits
    };
    let mut end = digits;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {}
            b'.' if !seen_dot && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) => {
                seen_dot = true
            }
            _ => break,
        }
        end += 1;
    }
    text[start..end].parse().ok().map(|n| (n, end))
}
