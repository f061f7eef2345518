//! Frontier disciplines end to end: exact selection orders on the letter tree, plus
//! determinism across runs.

mod common;
mod init_logging;

use std::sync::Arc;

use common::{
    assert_tree_well_formed, letter_search, run_with_events, selection_order, LetterGenerator,
};
use thought_tree::{SearchConfig, SearchStrategy, TerminationReason};

fn full_tree(strategy: SearchStrategy) -> SearchConfig {
    SearchConfig::default()
        .with_strategy(strategy)
        .with_beam_width(3)
        .with_max_depth(2)
        .with_budget(100)
}

#[tokio::test]
async fn breadth_first_visits_level_by_level_best_child_first() {
    let executor = letter_search(
        full_tree(SearchStrategy::BreadthFirst),
        Arc::new(LetterGenerator::new(3)),
    );
    let (outcome, events) = run_with_events(executor).await;

    assert_eq!(
        selection_order(&outcome, &events),
        ["", "b", "c", "a", "bb", "bc", "ba", "cb", "cc", "ca", "ab", "ac", "aa"]
    );
    assert_eq!(outcome.reason, TerminationReason::FrontierExhausted);
    assert_eq!(outcome.nodes_evaluated, 13);
    assert_tree_well_formed(&outcome, 2, 3);
}

#[tokio::test]
async fn depth_first_dives_before_visiting_siblings() {
    let executor = letter_search(
        full_tree(SearchStrategy::DepthFirst),
        Arc::new(LetterGenerator::new(3)),
    );
    let (outcome, events) = run_with_events(executor).await;

    assert_eq!(
        selection_order(&outcome, &events),
        ["", "b", "bb", "bc", "ba", "c", "cb", "cc", "ca", "a", "ab", "ac", "aa"]
    );
    assert_eq!(outcome.reason, TerminationReason::FrontierExhausted);
    assert_tree_well_formed(&outcome, 2, 3);
}

#[tokio::test]
async fn best_first_always_takes_highest_value_earliest_on_ties() {
    let executor = letter_search(
        full_tree(SearchStrategy::BestFirst),
        Arc::new(LetterGenerator::new(3)),
    );
    let (outcome, events) = run_with_events(executor).await;

    // "c" (0.6) and "bc" (0.6) tie after "bb"; "c" entered the frontier first.
    assert_eq!(
        selection_order(&outcome, &events),
        ["", "b", "bb", "c", "cb", "bc", "cc", "a", "ab", "ac", "ba", "ca", "aa"]
    );
    assert_tree_well_formed(&outcome, 2, 3);
}

#[tokio::test]
async fn best_first_never_selects_below_a_waiting_node() {
    let executor = letter_search(
        full_tree(SearchStrategy::BestFirst).with_max_depth(3),
        Arc::new(LetterGenerator::new(3)),
    );
    let (outcome, events) = run_with_events(executor).await;
    let order = selection_order(&outcome, &events);

    // Every node is selected after all strictly better nodes that were already generated.
    let generated_at: Vec<usize> = outcome
        .tree
        .nodes()
        .map(|n| {
            let parent_state = n
                .parent()
                .map(|p| outcome.tree.get(p).unwrap().state().clone());
            parent_state.map_or(0, |s| order.iter().position(|x| *x == s).unwrap() + 1)
        })
        .collect();
    for (pos, state) in order.iter().enumerate() {
        let node = outcome.tree.nodes().find(|n| n.state() == state).unwrap();
        for other in outcome.tree.nodes() {
            let other_pos = order.iter().position(|x| x == other.state()).unwrap();
            let waiting = generated_at[other.id().index()] <= pos && other_pos > pos;
            if waiting {
                assert!(
                    other.value() <= node.value(),
                    "{:?} selected while {:?} waited with a higher value",
                    state,
                    other.state()
                );
            }
        }
    }
}

#[tokio::test]
async fn beam_width_caps_children_per_node() {
    let executor = letter_search(
        full_tree(SearchStrategy::BreadthFirst).with_beam_width(2),
        Arc::new(LetterGenerator::new(3)),
    );
    let (outcome, _) = run_with_events(executor).await;

    // 1 + 2 + 4; "a" (lowest score) never survives a cut.
    assert_eq!(outcome.tree.size(), 7);
    assert!(outcome.tree.nodes().all(|n| !n.state().contains('a')));
    assert_tree_well_formed(&outcome, 2, 2);
}

#[tokio::test]
async fn identical_runs_produce_identical_trees() {
    for strategy in [
        SearchStrategy::BreadthFirst,
        SearchStrategy::DepthFirst,
        SearchStrategy::BestFirst,
    ] {
        let config = full_tree(strategy).with_budget(9);
        let (first, first_events) =
            run_with_events(letter_search(config.clone(), Arc::new(LetterGenerator::new(3)))).await;
        let (second, second_events) =
            run_with_events(letter_search(config, Arc::new(LetterGenerator::new(3)))).await;

        assert_eq!(first_events, second_events, "{}", strategy);
        assert_eq!(
            serde_json::to_value(&first.tree).unwrap(),
            serde_json::to_value(&second.tree).unwrap()
        );
        assert_eq!(first.answer, second.answer);
    }
}
