//! Generator and evaluator callbacks.
//!
//! The executor knows nothing about how thoughts are produced or scored. It hands a
//! [`GenerationContext`] to a [`ThoughtGenerator`] and an [`EvaluationContext`] plus the
//! candidates to a [`ThoughtEvaluator`]. Implementations may call a language model, a solver
//! or plain code; [`FnGenerator`] and [`FnEvaluator`] adapt synchronous closures, which is what
//! most tests use.

use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CallbackError;

/// One candidate continuation: a label for the step and the state it leads to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought<S> {
    pub label: String,
    pub state: S,
}

impl<S> Thought<S> {
    pub fn new(label: impl Into<String>, state: S) -> Self {
        Self {
            label: label.into(),
            state,
        }
    }
}

/// Input to [`ThoughtGenerator::generate`] for the node being expanded.
#[derive(Debug)]
pub struct GenerationContext<'a, P, S> {
    pub problem: &'a P,
    /// State of the node being expanded.
    pub parent_state: &'a S,
    /// Number of children the executor will keep; generators may produce more or fewer.
    pub beam_width: usize,
    /// Depth of the node being expanded.
    pub depth: usize,
    /// Number of nodes in the tree before this expansion.
    pub tree_size: usize,
}

/// Input shared by every candidate scored in one expansion.
#[derive(Debug)]
pub struct EvaluationContext<'a, P, S> {
    pub problem: &'a P,
    pub parent_state: &'a S,
    /// Opaque tag from `SearchConfig::evaluation_strategy`, forwarded as-is.
    pub evaluation_strategy: &'a str,
    /// Depth of the node being expanded (candidates land at `depth + 1`).
    pub depth: usize,
}

/// Produces candidate children for a node.
///
/// Must not rely on state shared with the executor. Returning `Ok(vec![])` or an error both
/// leave the node without children.
#[async_trait]
pub trait ThoughtGenerator<P, S>: Send + Sync
where
    P: Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    async fn generate(
        &self,
        ctx: &GenerationContext<'_, P, S>,
    ) -> Result<Vec<Thought<S>>, CallbackError>;
}

/// Scores candidates; higher means more promising. No fixed range is imposed.
#[async_trait]
pub trait ThoughtEvaluator<P, S>: Send + Sync
where
    P: Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    /// Scores a single candidate.
    async fn evaluate(
        &self,
        ctx: &EvaluationContext<'_, P, S>,
        thought: &Thought<S>,
    ) -> Result<f64, CallbackError>;

    /// Scores all candidates of one expansion, returning scores in input order.
    ///
    /// Default scores one at a time; override when the backend can score a batch in one call.
    async fn evaluate_batch(
        &self,
        ctx: &EvaluationContext<'_, P, S>,
        thoughts: &[Thought<S>],
    ) -> Result<Vec<f64>, CallbackError> {
        let mut scores = Vec::with_capacity(thoughts.len());
        for thought in thoughts {
            scores.push(self.evaluate(ctx, thought).await?);
        }
        Ok(scores)
    }
}

/// Adapts a synchronous closure into a [`ThoughtGenerator`].
pub struct FnGenerator<P, S, F> {
    f: F,
    _marker: PhantomData<fn(&P, &S)>,
}

impl<P, S, F> FnGenerator<P, S, F>
where
    F: Fn(&GenerationContext<'_, P, S>) -> Result<Vec<Thought<S>>, CallbackError>,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<P, S, F> fmt::Debug for FnGenerator<P, S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnGenerator").field("f", &"<fn>").finish()
    }
}

#[async_trait]
impl<P, S, F> ThoughtGenerator<P, S> for FnGenerator<P, S, F>
where
    P: Send + Sync + 'static,
    S: Send + Sync + 'static,
    F: Fn(&GenerationContext<'_, P, S>) -> Result<Vec<Thought<S>>, CallbackError> + Send + Sync,
{
    async fn generate(
        &self,
        ctx: &GenerationContext<'_, P, S>,
    ) -> Result<Vec<Thought<S>>, CallbackError> {
        (self.f)(ctx)
    }
}

/// Adapts a synchronous closure into a [`ThoughtEvaluator`] (one candidate per call).
pub struct FnEvaluator<P, S, F> {
    f: F,
    _marker: PhantomData<fn(&P, &S)>,
}

impl<P, S, F> FnEvaluator<P, S, F>
where
    F: Fn(&EvaluationContext<'_, P, S>, &Thought<S>) -> Result<f64, CallbackError>,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<P, S, F> fmt::Debug for FnEvaluator<P, S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnEvaluator").field("f", &"<fn>").finish()
    }
}

#[async_trait]
impl<P, S, F> ThoughtEvaluator<P, S> for FnEvaluator<P, S, F>
where
    P: Send + Sync + 'static,
    S: Send + Sync + 'static,
    F: Fn(&EvaluationContext<'_, P, S>, &Thought<S>) -> Result<f64, CallbackError>
        + Send
        + Sync,
{
    async fn evaluate(
        &self,
        ctx: &EvaluationContext<'_, P, S>,
        thought: &Thought<S>,
    ) -> Result<f64, CallbackError> {
        (self.f)(ctx, thought)
    }
}
