//! Example: LLM-backed generator and evaluator, driven by a scripted mock model.
//!
//! The same wiring works with a real model: implement `LlmClient` over your HTTP client and
//! pass it in place of `MockLlm`.
//!
//! Run: `cargo run -p thought-tree-examples --example llm_mock -- vote`

use std::env;
use std::sync::Arc;

use thought_tree::{
    LlmThoughtEvaluator, LlmThoughtGenerator, MockLlm, SearchConfig, SearchExecutor,
    SearchStrategy,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _tracing = thought_tree_config::init_tracing("warn,thought_tree=debug")?;
    let evaluation = env::args().nth(1).unwrap_or_else(|| "value".to_string());

    let generator_llm = Arc::new(MockLlm::scripted([
        "CANDIDATE 1: THOUGHT: list what is known\nCANDIDATE 2: THOUGHT: guess an answer",
        "CANDIDATE 1: THOUGHT: derive the answer from the list\nCANDIDATE 2: THOUGHT: start over",
        "CANDIDATE 1: THOUGHT: state the final answer",
    ]));
    let evaluator_llm: Arc<MockLlm> = Arc::new(match evaluation.as_str() {
        "vote" => MockLlm::new("BEST: 1"),
        _ => MockLlm::scripted(["0.9", "0.2", "sure", "impossible"]),
    });

    let config = SearchConfig::default()
        .with_strategy(SearchStrategy::BestFirst)
        .with_beam_width(2)
        .with_max_depth(3)
        .with_budget(10)
        .with_evaluation_strategy(evaluation);
    let executor = SearchExecutor::<String, String>::new(
        config,
        Arc::new(LlmThoughtGenerator::new(generator_llm.clone())),
        Arc::new(LlmThoughtEvaluator::new(evaluator_llm.clone())),
    )
    .with_root_thought("start");

    let problem = "What is the answer to the puzzle?".to_string();
    let outcome = executor.run(&problem, String::new()).await?;

    println!("reason: {}  success: {}", outcome.reason, outcome.success);
    println!("path:   {}", outcome.solution_thoughts().join(" -> "));
    if let Some(best) = outcome.best() {
        println!("best state:\n{}", best.state());
    }
    println!(
        "llm calls: {} generate, {} evaluate",
        generator_llm.call_count(),
        evaluator_llm.call_count()
    );
    println!("{}", serde_json::to_string_pretty(&outcome.metadata)?);
    Ok(())
}
