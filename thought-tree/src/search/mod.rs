//! Search: configuration, frontier disciplines, executor and result builder.
//!
//! Build a [`SearchExecutor`] from a [`SearchConfig`] plus generator/evaluator callbacks,
//! then call [`SearchExecutor::run`] to get a [`SearchOutcome`].

mod config;
mod executor;
mod frontier;
mod logging;
mod result;
mod retry;

pub use config::{
    SearchConfig, SearchStrategy, CONFIG_APP_NAME, ENV_BEAM_WIDTH, ENV_BUDGET,
    ENV_CALLBACK_TIMEOUT_MS, ENV_EVALUATION_CONCURRENCY, ENV_EVALUATION_STRATEGY, ENV_MAX_DEPTH,
    ENV_STRATEGY, SEARCH_SECTION,
};
pub use executor::{
    is_default_solution, AnswerExtractor, SearchExecutor, SearchStatus, SolutionCheck,
    DEFAULT_ROOT_THOUGHT, DEFAULT_SOLUTION_THRESHOLD,
};
pub use result::{SearchMetadata, SearchOutcome, TerminationReason};
pub use retry::RetryPolicy;
