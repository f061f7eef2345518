//! Example: countdown numbers game solved by tree search.
//!
//! Reads limits from the layered config (`THOUGHT_TREE_*`, `.env`, XDG `config.toml`), lets
//! the command line override the strategy, prints progress events and the solution path.
//!
//! Run: `cargo run -p thought-tree-examples --example countdown -- 4,6,1,9 37 best_first`

use std::env;
use std::sync::Arc;

use thought_tree::{SearchConfig, SearchEvent, SearchExecutor, SearchStrategy};
use thought_tree_examples::{Countdown, CountdownGenerator, CountdownState, DistanceEvaluator};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _tracing = thought_tree_config::init_tracing("warn,thought_tree=info")?;

    let mut args = env::args().skip(1);
    let numbers = args
        .next()
        .unwrap_or_else(|| "4,6,1,9".to_string())
        .split(',')
        .map(|s| s.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()?;
    let target: i64 = args.next().unwrap_or_else(|| "37".to_string()).parse()?;

    let mut config = SearchConfig::load()?;
    if let Some(strategy) = args.next() {
        config.strategy = strategy.parse::<SearchStrategy>()?;
    }
    // Countdown branches widely; keep every legal move unless configured otherwise.
    if env::var(thought_tree::search::ENV_BEAM_WIDTH).is_err() {
        config.beam_width = 16;
    }
    config.max_depth = config.max_depth.min(numbers.len().saturating_sub(1));

    let problem = Countdown::new(numbers, target);
    let checker = problem.clone();
    let (tx, mut rx) = mpsc::channel(64);
    let executor = SearchExecutor::<Countdown, CountdownState>::new(
        config,
        Arc::new(CountdownGenerator),
        Arc::new(DistanceEvaluator),
    )
    .with_root_thought(format!("reach {}", target))
    .with_solution_check(move |node| checker.is_solved(node))
    .with_answer_extractor(|node| node.state().summary())
    .with_event_sender(tx);

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                SearchEvent::Started { strategy, budget, .. } => {
                    println!("searching ({}, budget {})", strategy, budget);
                }
                SearchEvent::NodeExpanded { node, children, .. } => {
                    println!("  expanded {} -> {} children", node, children.len());
                }
                SearchEvent::CallbackFailed { node, error } => {
                    println!("  {} failed: {}", node, error);
                }
                _ => {}
            }
        }
    });

    let outcome = executor.run(&problem, problem.initial_state()).await?;
    drop(executor);
    printer.await?;

    println!();
    println!("reason:          {}", outcome.reason);
    println!("success:         {}", outcome.success);
    println!("answer:          {}", outcome.answer.as_deref().unwrap_or("-"));
    println!("nodes evaluated: {}", outcome.nodes_evaluated);
    println!("tree size:       {}", outcome.metadata.tree_size);
    for (depth, node) in outcome.solution_nodes().iter().enumerate() {
        println!("  {:>2}. {:<14} {:?}", depth, node.thought(), node.state().remaining);
    }
    Ok(())
}
