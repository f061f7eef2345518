//! Search executor: the iterate-until-terminal state machine.
//!
//! Each [`SearchExecutor::run`] call owns its own tree, frontier and counters; nothing is
//! shared between calls, so one executor can serve concurrent searches.
//!
//! Per iteration (from [`SearchStatus::Running`]):
//! cancelled? → frontier empty? → budget spent? → select a node (counts against the budget)
//! → solution check → expand (generate, score, keep the best `beam_width`, insert children).

use std::cmp::Ordering;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::{CallbackError, SearchError, TreeError};
use crate::stream::SearchEvent;
use crate::thought::{
    EvaluationContext, GenerationContext, Thought, ThoughtEvaluator, ThoughtGenerator,
};
use crate::tree::{NodeId, Tree, TreeNode};

use super::config::SearchConfig;
use super::frontier::Frontier;
use super::logging::{
    log_callback_failed, log_depth_limit, log_expansion, log_node_selected, log_search_complete,
    log_search_start,
};
use super::result::{build_outcome, SearchCounters, SearchOutcome, TerminationReason};
use super::retry::call_with_retry;

/// Caller-supplied goal test, applied to each node as it leaves the frontier.
pub type SolutionCheck<S> = Arc<dyn Fn(&TreeNode<S>) -> bool + Send + Sync>;

/// Caller-supplied answer extraction from the solution (or best-known) node.
pub type AnswerExtractor<S> = Arc<dyn Fn(&TreeNode<S>) -> String + Send + Sync>;

/// Label given to the root node unless overridden with
/// [`SearchExecutor::with_root_thought`].
pub const DEFAULT_ROOT_THOUGHT: &str = "root";

/// Value a node must exceed to pass the default solution check.
pub const DEFAULT_SOLUTION_THRESHOLD: f64 = 0.8;

/// Executor state. `Running` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchStatus {
    Running,
    SolutionFound(NodeId),
    /// Carries the best-valued frontier node at cutoff.
    BudgetExhausted(Option<NodeId>),
    FrontierExhausted,
    /// Carries the best-valued frontier node at cancellation.
    Cancelled(Option<NodeId>),
}

impl SearchStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SearchStatus::Running)
    }

    /// Termination reason; `None` while running.
    pub fn reason(&self) -> Option<TerminationReason> {
        match self {
            SearchStatus::Running => None,
            SearchStatus::SolutionFound(_) => Some(TerminationReason::SolutionFound),
            SearchStatus::BudgetExhausted(_) => Some(TerminationReason::BudgetExhausted),
            SearchStatus::FrontierExhausted => Some(TerminationReason::FrontierExhausted),
            SearchStatus::Cancelled(_) => Some(TerminationReason::Cancelled),
        }
    }
}

/// Per-call search state.
struct SearchRun<S> {
    tree: Tree<S>,
    frontier: Frontier,
    counters: SearchCounters,
}

/// Budgeted tree search over generator/evaluator callbacks.
///
/// Built once with a [`SearchConfig`] and injected callbacks; optional hooks set the
/// solution check, answer extraction, root label, event channel and cancellation token.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use thought_tree::{
///     EvaluationContext, FnEvaluator, FnGenerator, GenerationContext, SearchConfig,
///     SearchExecutor, SearchStrategy, Thought,
/// };
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), thought_tree::SearchError> {
/// let generator = FnGenerator::new(|ctx: &GenerationContext<'_, u32, u32>| {
///     Ok(vec![
///         Thought::new("+1", ctx.parent_state + 1),
///         Thought::new("*2", ctx.parent_state * 2),
///     ])
/// });
/// let evaluator = FnEvaluator::new(|ctx: &EvaluationContext<'_, u32, u32>, t: &Thought<u32>| {
///     Ok(1.0 / (1.0 + (f64::from(*ctx.problem) - f64::from(t.state)).abs()))
/// });
/// let executor = SearchExecutor::<u32, u32>::new(
///     SearchConfig::default().with_strategy(SearchStrategy::BestFirst),
///     Arc::new(generator),
///     Arc::new(evaluator),
/// )
/// .with_solution_check(|node| *node.state() == 10);
///
/// let outcome = executor.run(&10, 1).await?;
/// println!("{} {:?}", outcome.reason, outcome.solution_thoughts());
/// # Ok(())
/// # }
/// ```
pub struct SearchExecutor<P, S> {
    config: SearchConfig,
    generator: Arc<dyn ThoughtGenerator<P, S>>,
    evaluator: Arc<dyn ThoughtEvaluator<P, S>>,
    solution_check: Option<SolutionCheck<S>>,
    answer_extractor: Option<AnswerExtractor<S>>,
    root_thought: String,
    event_tx: Option<mpsc::Sender<SearchEvent>>,
    cancel: Option<CancellationToken>,
}

impl<P, S> SearchExecutor<P, S>
where
    P: Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    pub fn new(
        config: SearchConfig,
        generator: Arc<dyn ThoughtGenerator<P, S>>,
        evaluator: Arc<dyn ThoughtEvaluator<P, S>>,
    ) -> Self {
        Self {
            config,
            generator,
            evaluator,
            solution_check: None,
            answer_extractor: None,
            root_thought: DEFAULT_ROOT_THOUGHT.to_string(),
            event_tx: None,
            cancel: None,
        }
    }

    /// Replaces the default solution check (see [`is_default_solution`]).
    pub fn with_solution_check(
        mut self,
        check: impl Fn(&TreeNode<S>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.solution_check = Some(Arc::new(check));
        self
    }

    /// Replaces the default answer extraction (the node's thought label).
    pub fn with_answer_extractor(
        mut self,
        extract: impl Fn(&TreeNode<S>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.answer_extractor = Some(Arc::new(extract));
        self
    }

    pub fn with_root_thought(mut self, thought: impl Into<String>) -> Self {
        self.root_thought = thought.into();
        self
    }

    /// Emits [`SearchEvent`]s on `tx`. Sending waits when the channel is full.
    pub fn with_event_sender(mut self, tx: mpsc::Sender<SearchEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Stops the search at the next iteration once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs one search from `initial_state`.
    ///
    /// Returns `Err` only for configuration errors (before any callback runs) or a tree
    /// invariant violation. Exhaustion and cancellation are reported in the outcome.
    pub async fn run(&self, problem: &P, initial_state: S) -> Result<SearchOutcome<S>, SearchError> {
        self.config.validate()?;
        log_search_start(&self.config);

        let tree = Tree::new(self.root_thought.clone(), initial_state);
        let frontier = Frontier::new(self.config.strategy, tree.root_id());
        let mut run = SearchRun {
            tree,
            frontier,
            counters: SearchCounters::default(),
        };
        self.emit(SearchEvent::Started {
            strategy: self.config.strategy,
            budget: self.config.budget,
            beam_width: self.config.beam_width,
            max_depth: self.config.max_depth,
        })
        .await;

        let mut status = SearchStatus::Running;
        while !status.is_terminal() {
            status = self.step(problem, &mut run).await?;
        }

        let reason = status.reason().unwrap_or(TerminationReason::FrontierExhausted);
        let (solution, fallback) = match status {
            SearchStatus::SolutionFound(id) => (Some(id), None),
            SearchStatus::BudgetExhausted(best) | SearchStatus::Cancelled(best) => (None, best),
            SearchStatus::FrontierExhausted | SearchStatus::Running => {
                (None, run.tree.best_node().map(TreeNode::id))
            }
        };
        // With nothing scored yet, the root is the best that is known.
        let fallback = fallback.or(Some(run.tree.root_id()));
        log_search_complete(reason, run.counters.nodes_evaluated, run.tree.size());

        let outcome = match &self.answer_extractor {
            Some(extract) => build_outcome(
                run.tree,
                reason,
                solution,
                fallback,
                run.counters,
                &self.config,
                extract.as_ref(),
            )?,
            None => build_outcome(
                run.tree,
                reason,
                solution,
                fallback,
                run.counters,
                &self.config,
                &|node: &TreeNode<S>| node.thought().to_string(),
            )?,
        };
        self.emit(SearchEvent::Finished {
            reason,
            success: outcome.success,
            nodes_evaluated: outcome.nodes_evaluated,
            tree_size: outcome.metadata.tree_size,
        })
        .await;
        Ok(outcome)
    }

    /// One transition out of `Running`.
    async fn step(&self, problem: &P, run: &mut SearchRun<S>) -> Result<SearchStatus, SearchError> {
        if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Ok(SearchStatus::Cancelled(run.frontier.best(&run.tree)));
        }
        if run.frontier.is_empty() {
            return Ok(SearchStatus::FrontierExhausted);
        }
        if run.counters.nodes_evaluated >= self.config.budget {
            return Ok(SearchStatus::BudgetExhausted(run.frontier.best(&run.tree)));
        }
        let Some(id) = run.frontier.select(&run.tree) else {
            return Ok(SearchStatus::FrontierExhausted);
        };
        run.counters.nodes_evaluated += 1;

        let node = run.tree.get(id)?;
        log_node_selected(id, node.depth(), node.value(), run.counters.nodes_evaluated);
        self.emit(SearchEvent::NodeSelected {
            node: id,
            depth: node.depth(),
            value: node.value(),
            nodes_evaluated: run.counters.nodes_evaluated,
            frontier_len: run.frontier.len(),
        })
        .await;
        if self.is_solution(node) {
            return Ok(SearchStatus::SolutionFound(id));
        }

        run.counters.search_steps += 1;
        let children = self.expand(problem, &mut run.tree, id).await?;
        run.frontier.insert(&children);
        Ok(SearchStatus::Running)
    }

    fn is_solution(&self, node: &TreeNode<S>) -> bool {
        match &self.solution_check {
            Some(check) => check(node),
            None => is_default_solution(node, self.config.max_depth),
        }
    }

    /// Generates, scores and inserts the children of `id`; returns their ids best-first.
    ///
    /// Callback failures are logged and yield no children.
    async fn expand(
        &self,
        problem: &P,
        tree: &mut Tree<S>,
        id: NodeId,
    ) -> Result<Vec<NodeId>, TreeError> {
        let node = tree.get(id)?;
        if node.depth() >= self.config.max_depth {
            log_depth_limit(id, node.depth());
            return Ok(Vec::new());
        }
        let scored = match self.generate_and_score(problem, node, tree.size()).await {
            Ok(scored) => scored,
            Err(error) => {
                log_callback_failed(id, &error);
                self.emit(SearchEvent::CallbackFailed {
                    node: id,
                    error: error.to_string(),
                })
                .await;
                return Ok(Vec::new());
            }
        };

        let mut children = Vec::with_capacity(scored.len());
        let mut scores = Vec::with_capacity(scored.len());
        for (score, thought) in scored {
            children.push(tree.add_child(id, thought.label, thought.state, Some(score))?);
            scores.push(score);
        }
        log_expansion(id, &children, &scores);
        if !children.is_empty() {
            self.emit(SearchEvent::NodeExpanded {
                node: id,
                children: children.clone(),
                scores,
            })
            .await;
        }
        Ok(children)
    }

    /// Calls the generator, scores every candidate, and keeps the best `beam_width`
    /// (stable sort, so equal scores keep generator order).
    async fn generate_and_score(
        &self,
        problem: &P,
        node: &TreeNode<S>,
        tree_size: usize,
    ) -> Result<Vec<(f64, Thought<S>)>, CallbackError> {
        let gen_ctx = GenerationContext {
            problem,
            parent_state: node.state(),
            beam_width: self.config.beam_width,
            depth: node.depth(),
            tree_size,
        };
        let timeout = self.config.callback_timeout();
        let candidates = call_with_retry(&self.config.retry, timeout, || {
            self.generator.generate(&gen_ctx)
        })
        .await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let eval_ctx = EvaluationContext {
            problem,
            parent_state: node.state(),
            evaluation_strategy: &self.config.evaluation_strategy,
            depth: node.depth(),
        };
        let scores = self.score(&eval_ctx, &candidates).await?;
        if scores.len() != candidates.len() {
            return Err(CallbackError::ScoreCountMismatch {
                expected: candidates.len(),
                got: scores.len(),
            });
        }

        let mut scored: Vec<(f64, Thought<S>)> = scores
            .into_iter()
            .map(|s| if s.is_nan() { f64::NEG_INFINITY } else { s })
            .zip(candidates)
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(self.config.beam_width);
        Ok(scored)
    }

    /// Scores candidates in input order: through `evaluate_batch` when concurrency is 1,
    /// otherwise via `evaluate` on up to `evaluation_concurrency` candidates at a time.
    async fn score(
        &self,
        ctx: &EvaluationContext<'_, P, S>,
        candidates: &[Thought<S>],
    ) -> Result<Vec<f64>, CallbackError> {
        let timeout = self.config.callback_timeout();
        if self.config.evaluation_concurrency <= 1 {
            return call_with_retry(&self.config.retry, timeout, || {
                self.evaluator.evaluate_batch(ctx, candidates)
            })
            .await;
        }
        let results: Vec<Result<f64, CallbackError>> = stream::iter(candidates)
            .map(|thought| {
                call_with_retry(&self.config.retry, timeout, move || {
                    self.evaluator.evaluate(ctx, thought)
                })
            })
            .buffered(self.config.evaluation_concurrency)
            .collect()
            .await;
        results.into_iter().collect()
    }

    async fn emit(&self, event: SearchEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event).await;
        }
    }
}

/// Default goal test: an unexpanded node, at least halfway to `max_depth`, valued above
/// [`DEFAULT_SOLUTION_THRESHOLD`].
///
/// A domain-agnostic heuristic only; production callers should pass their own check.
pub fn is_default_solution<S>(node: &TreeNode<S>, max_depth: usize) -> bool {
    node.is_leaf()
        && node.depth() as f64 >= max_depth as f64 / 2.0
        && node.value().is_some_and(|v| v > DEFAULT_SOLUTION_THRESHOLD)
}
