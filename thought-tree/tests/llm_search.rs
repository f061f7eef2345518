//! LLM-backed generator and evaluator driving real searches against `MockLlm`.

mod init_logging;

use std::sync::Arc;

use thought_tree::{
    LlmThoughtEvaluator, LlmThoughtGenerator, Message, MockLlm, SearchConfig, SearchEvent,
    SearchExecutor, SearchStrategy, TerminationReason,
};
use tokio::sync::mpsc;

const TWO_CANDIDATES: &str = "CANDIDATE 1: THOUGHT: x\nCANDIDATE 2: THOUGHT: y";

fn llm_search(
    config: SearchConfig,
    generator_llm: Arc<MockLlm>,
    evaluator_llm: Arc<MockLlm>,
) -> SearchExecutor<String, String> {
    SearchExecutor::new(
        config,
        Arc::new(LlmThoughtGenerator::new(generator_llm)),
        Arc::new(LlmThoughtEvaluator::new(evaluator_llm)),
    )
}

#[tokio::test]
async fn vote_strategy_with_default_solution_check() {
    let generator_llm = Arc::new(MockLlm::new(TWO_CANDIDATES));
    let evaluator_llm = Arc::new(MockLlm::new("BEST: 2"));
    let executor = llm_search(
        SearchConfig::default()
            .with_strategy(SearchStrategy::BestFirst)
            .with_beam_width(2)
            .with_max_depth(2)
            .with_evaluation_strategy("vote"),
        generator_llm.clone(),
        evaluator_llm.clone(),
    );
    let outcome = executor.run(&"puzzle".to_string(), String::new()).await.unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.solution_thoughts(), vec!["root", "y"]);
    assert_eq!(outcome.answer.as_deref(), Some("y"));
    assert_eq!(outcome.best().map(|n| n.value()), Some(Some(1.0)));
    assert_eq!(generator_llm.call_count(), 1);
    assert_eq!(evaluator_llm.call_count(), 1);
}

#[tokio::test]
async fn value_strategy_accumulates_steps_in_state() {
    let generator_llm = Arc::new(MockLlm::new(TWO_CANDIDATES));
    let evaluator_llm = Arc::new(MockLlm::scripted(["0.2", "0.7", "sure", "impossible"]));
    let executor = llm_search(
        SearchConfig::default()
            .with_strategy(SearchStrategy::BreadthFirst)
            .with_beam_width(2)
            .with_max_depth(3),
        generator_llm.clone(),
        evaluator_llm.clone(),
    )
    .with_solution_check(|node| node.state().lines().count() == 2)
    .with_answer_extractor(|node| node.state().clone());
    let outcome = executor.run(&"puzzle".to_string(), String::new()).await.unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.answer.as_deref(), Some("y\nx"));
    assert_eq!(outcome.nodes_evaluated, 4);
    assert_eq!(generator_llm.call_count(), 3);
    assert_eq!(evaluator_llm.call_count(), 6);

    // Second generation call expands "y": the prompt carries the problem and the steps so far.
    let requests = generator_llm.requests();
    assert!(matches!(&requests[1][0], Message::System(s) if s.contains("Generate exactly 2 candidates")));
    let user = requests[1][1].content();
    assert!(user.contains("puzzle"));
    assert!(user.contains("Steps so far:\ny"));
}

#[tokio::test]
async fn failing_model_leaves_root_as_partial_answer() {
    let executor = llm_search(
        SearchConfig::default(),
        Arc::new(MockLlm::failing("503 upstream")),
        Arc::new(MockLlm::new("1")),
    );
    let outcome = executor.run(&"puzzle".to_string(), String::new()).await.unwrap();

    assert_eq!(outcome.reason, TerminationReason::FrontierExhausted);
    assert_eq!(outcome.tree.size(), 1);
    assert_eq!(outcome.answer.as_deref(), Some("root"));
}

#[tokio::test]
async fn unknown_evaluation_strategy_fails_each_expansion() {
    let (tx, mut rx) = mpsc::channel(32);
    let evaluator_llm = Arc::new(MockLlm::new("1"));
    let executor = llm_search(
        SearchConfig::default().with_evaluation_strategy("poll"),
        Arc::new(MockLlm::new(TWO_CANDIDATES)),
        evaluator_llm.clone(),
    )
    .with_event_sender(tx);
    let outcome = executor.run(&"puzzle".to_string(), String::new()).await.unwrap();
    drop(executor);

    assert_eq!(outcome.tree.size(), 1);
    assert_eq!(evaluator_llm.call_count(), 0);
    let mut failure = None;
    while let Some(ev) = rx.recv().await {
        if let SearchEvent::CallbackFailed { error, .. } = ev {
            failure = Some(error);
        }
    }
    let failure = failure.expect("a callback failure event");
    assert!(failure.contains("unknown evaluation strategy: poll"), "{}", failure);
}

#[tokio::test]
async fn whole_reply_becomes_single_candidate() {
    let generator_llm = Arc::new(MockLlm::new("Try the obvious thing."));
    let executor = llm_search(
        SearchConfig::default().with_max_depth(1),
        generator_llm,
        Arc::new(MockLlm::new("likely")),
    )
    .with_solution_check(|_| false);
    let outcome = executor.run(&"puzzle".to_string(), String::new()).await.unwrap();

    assert_eq!(outcome.tree.size(), 2);
    let child = outcome.tree.nodes().nth(1).unwrap();
    assert_eq!(child.thought(), "Try the obvious thing.");
    assert_eq!(child.value(), Some(0.5));
}

#[tokio::test]
async fn vote_with_concurrent_scoring_expands_nothing() {
    let evaluator_llm = Arc::new(MockLlm::new("BEST: 1"));
    let executor = llm_search(
        SearchConfig::default()
            .with_evaluation_strategy("vote")
            .with_evaluation_concurrency(2),
        Arc::new(MockLlm::new(TWO_CANDIDATES)),
        evaluator_llm.clone(),
    );
    let outcome = executor.run(&"puzzle".to_string(), String::new()).await.unwrap();

    // Without sibling comparison every candidate would score 1.0; the expansion fails instead.
    assert_eq!(outcome.reason, TerminationReason::FrontierExhausted);
    assert_eq!(outcome.tree.size(), 1);
    assert_eq!(evaluator_llm.call_count(), 0);
}
