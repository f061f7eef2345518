//! Fixtures shared by the integration tests.
//!
//! The test domain is a letter tree: a state is the string of letters chosen so far, each
//! expansion appends one of `a`, `b`, `c`, ... and a node is scored by its last letter.
//! With [`last_letter_score`], `b` (0.9) beats `c` (0.6) beats `a` (0.3) at every level.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thought_tree::{
    CallbackError, EvaluationContext, GenerationContext, SearchConfig, SearchEvent,
    SearchExecutor, SearchOutcome, Thought, ThoughtEvaluator, ThoughtGenerator,
};
use tokio::sync::mpsc;

pub fn last_letter_score(state: &str) -> f64 {
    match state.chars().last() {
        Some('a') => 0.3,
        Some('b') => 0.9,
        Some('c') => 0.6,
        _ => 0.1,
    }
}

/// Appends one of the first `branching` letters. Records the parent states it was called
/// with, in call order.
pub struct LetterGenerator {
    pub branching: usize,
    /// Parent state on which every call fails.
    pub fail_on: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

impl LetterGenerator {
    pub fn new(branching: usize) -> Self {
        Self {
            branching,
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, state: &str) -> Self {
        self.fail_on = Some(state.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ThoughtGenerator<(), String> for LetterGenerator {
    async fn generate(
        &self,
        ctx: &GenerationContext<'_, (), String>,
    ) -> Result<Vec<Thought<String>>, CallbackError> {
        self.calls.lock().unwrap().push(ctx.parent_state.clone());
        if self.fail_on.as_deref() == Some(ctx.parent_state.as_str()) {
            return Err(CallbackError::Generation(format!(
                "refusing to expand {:?}",
                ctx.parent_state
            )));
        }
        Ok((0..self.branching)
            .map(|i| {
                let letter = char::from(b'a' + i as u8);
                Thought::new(letter.to_string(), format!("{}{}", ctx.parent_state, letter))
            })
            .collect())
    }
}

/// Scores with a plain function of the candidate state; counts calls.
pub struct StateScorer {
    pub score: fn(&str) -> f64,
    pub calls: AtomicUsize,
}

impl StateScorer {
    pub fn new(score: fn(&str) -> f64) -> Self {
        Self {
            score,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ThoughtEvaluator<(), String> for StateScorer {
    async fn evaluate(
        &self,
        _ctx: &EvaluationContext<'_, (), String>,
        thought: &Thought<String>,
    ) -> Result<f64, CallbackError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((self.score)(&thought.state))
    }
}

/// Letter-tree executor that never declares a solution and reports the state as the answer.
pub fn letter_search(
    config: SearchConfig,
    generator: Arc<LetterGenerator>,
) -> SearchExecutor<(), String> {
    SearchExecutor::new(
        config,
        generator,
        Arc::new(StateScorer::new(last_letter_score)),
    )
    .with_solution_check(|_| false)
    .with_answer_extractor(|node| node.state().clone())
}

/// Runs `executor` with an event channel attached and returns the outcome plus every event.
pub async fn run_with_events(
    executor: SearchExecutor<(), String>,
) -> (SearchOutcome<String>, Vec<SearchEvent>) {
    let (tx, mut rx) = mpsc::channel(16);
    let collector = tokio::spawn(async move {
        let mut events = Vec::new();
        while let Some(ev) = rx.recv().await {
            events.push(ev);
        }
        events
    });
    let executor = executor.with_event_sender(tx);
    let outcome = executor.run(&(), String::new()).await.unwrap();
    drop(executor);
    let events = collector.await.unwrap();
    (outcome, events)
}

/// States of the nodes taken off the frontier, in selection order.
pub fn selection_order(outcome: &SearchOutcome<String>, events: &[SearchEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|ev| match ev {
            SearchEvent::NodeSelected { node, .. } => {
                Some(outcome.tree.get(*node).unwrap().state().clone())
            }
            _ => None,
        })
        .collect()
}

/// Asserts the structural invariants every finished tree must satisfy.
pub fn assert_tree_well_formed(outcome: &SearchOutcome<String>, max_depth: usize, beam: usize) {
    let tree = &outcome.tree;
    assert_eq!(tree.nodes().count(), tree.size());
    for (i, node) in tree.nodes().enumerate() {
        assert_eq!(node.id().index(), i, "ids are dense and ordered");
        assert!(node.depth() <= max_depth, "{} deeper than {}", node.id(), max_depth);
        assert!(node.children().len() <= beam);
        let path = tree.path_ids(node.id()).unwrap();
        assert_eq!(path.len(), node.depth() + 1);
        assert_eq!(path[0], tree.root_id());
        for child in node.children() {
            assert_eq!(tree.get(*child).unwrap().depth(), node.depth() + 1);
            assert_eq!(tree.get(*child).unwrap().parent(), Some(node.id()));
        }
        if node.is_root() {
            assert_eq!(node.value(), None);
        } else {
            assert!(node.value().is_some());
        }
    }
}
