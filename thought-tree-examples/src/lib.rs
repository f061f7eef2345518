//! Shared domain for the thought-tree examples: the countdown numbers game.
//!
//! Combine the given numbers with `+`, `-`, `*` and exact `/` (each number used at most once)
//! to reach the target. A state is the numbers still available plus the steps taken; each
//! step replaces two numbers with their result.

use async_trait::async_trait;
use serde::Serialize;
use thought_tree::{
    CallbackError, EvaluationContext, GenerationContext, Thought, ThoughtEvaluator,
    ThoughtGenerator, TreeNode,
};

#[derive(Debug, Clone)]
pub struct Countdown {
    pub numbers: Vec<i64>,
    pub target: i64,
}

impl Countdown {
    pub fn new(numbers: Vec<i64>, target: i64) -> Self {
        Self { numbers, target }
    }

    pub fn initial_state(&self) -> CountdownState {
        CountdownState {
            remaining: self.numbers.clone(),
            steps: Vec::new(),
        }
    }

    /// Goal test for [`SearchExecutor::with_solution_check`](thought_tree::SearchExecutor::with_solution_check).
    pub fn is_solved(&self, node: &TreeNode<CountdownState>) -> bool {
        node.state().reaches(self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountdownState {
    pub remaining: Vec<i64>,
    pub steps: Vec<String>,
}

impl CountdownState {
    pub fn reaches(&self, target: i64) -> bool {
        self.remaining.contains(&target)
    }

    /// Distance from the closest available number to `target`; `None` when nothing is left.
    pub fn distance(&self, target: i64) -> Option<i64> {
        self.remaining.iter().map(|n| (n - target).abs()).min()
    }

    /// Steps as one line, e.g. `4*6=24; 24+1=25`.
    pub fn summary(&self) -> String {
        if self.steps.is_empty() {
            "(no steps)".to_string()
        } else {
            self.steps.join("; ")
        }
    }

    fn combine(&self, i: usize, j: usize, op: char, result: i64) -> CountdownState {
        let (a, b) = (self.remaining[i], self.remaining[j]);
        let mut remaining: Vec<i64> = self
            .remaining
            .iter()
            .enumerate()
            .filter(|(k, _)| *k != i && *k != j)
            .map(|(_, n)| *n)
            .collect();
        remaining.push(result);
        let mut steps = self.steps.clone();
        steps.push(format!("{}{}{}={}", a, op, b, result));
        CountdownState { remaining, steps }
    }
}

/// All results of combining the pair `(a, b)`, larger operand first. Skips moves that cannot
/// help: subtraction to zero, multiplication or division by one.
fn moves(a: i64, b: i64) -> Vec<(char, i64)> {
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    let mut out = vec![('+', hi + lo)];
    if hi != lo {
        out.push(('-', hi - lo));
    }
    if lo != 1 {
        out.push(('*', hi * lo));
        if lo != 0 && hi % lo == 0 {
            out.push(('/', hi / lo));
        }
    }
    out
}

/// Proposes every useful combination of two available numbers.
pub struct CountdownGenerator;

#[async_trait]
impl ThoughtGenerator<Countdown, CountdownState> for CountdownGenerator {
    async fn generate(
        &self,
        ctx: &GenerationContext<'_, Countdown, CountdownState>,
    ) -> Result<Vec<Thought<CountdownState>>, CallbackError> {
        let state = ctx.parent_state;
        let n = state.remaining.len();
        let mut out = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (state.remaining[i], state.remaining[j]);
                let (hi, lo) = if a >= b { (i, j) } else { (j, i) };
                for (op, result) in moves(a, b) {
                    let child = state.combine(hi, lo, op, result);
                    let label = child.steps.last().cloned().unwrap_or_default();
                    out.push(Thought::new(label, child));
                }
            }
        }
        Ok(out)
    }
}

/// Scores a state by how close its best number is to the target: 1.0 on the target, falling
/// off with distance.
pub struct DistanceEvaluator;

#[async_trait]
impl ThoughtEvaluator<Countdown, CountdownState> for DistanceEvaluator {
    async fn evaluate(
        &self,
        ctx: &EvaluationContext<'_, Countdown, CountdownState>,
        thought: &Thought<CountdownState>,
    ) -> Result<f64, CallbackError> {
        let distance = thought
            .state
            .distance(ctx.problem.target)
            .ok_or_else(|| CallbackError::Evaluation("no numbers left".into()))?;
        Ok(1.0 / (1.0 + distance as f64 / 10.0))
    }
}
