//! # Thought-tree
//!
//! Budgeted search over a tree of reasoning steps. The caller supplies two async callbacks: a
//! **generator** proposing candidate next steps from a state, and an **evaluator** scoring each
//! candidate. The engine grows a tree from the initial state, keeps the best `beam_width`
//! children per expansion, and walks the tree breadth-first, depth-first or best-first until a
//! solution is found, the node budget is spent or nothing is left to expand.
//!
//! ## Design principles
//!
//! - **Callbacks, not models**: the engine never calls an LLM; [`ThoughtGenerator`] and
//!   [`ThoughtEvaluator`] are the only seams. [`llm`] provides model-backed implementations.
//! - **Arena tree**: nodes live in a [`Tree`] and refer to each other by [`NodeId`]; paths are
//!   rebuilt from parent links.
//! - **Failures stay local**: a failing callback leaves its node childless and the search goes
//!   on; only configuration errors abort a run.
//!
//! ## Main modules
//!
//! - [`search`]: [`SearchConfig`], [`SearchStrategy`], [`SearchExecutor`], [`SearchOutcome`],
//!   [`RetryPolicy`].
//! - [`tree`]: [`Tree`], [`TreeNode`], [`NodeId`].
//! - [`thought`]: [`Thought`], callback traits and closure adapters ([`FnGenerator`],
//!   [`FnEvaluator`]).
//! - [`llm`]: [`LlmClient`], [`LlmThoughtGenerator`], [`LlmThoughtEvaluator`], [`MockLlm`].
//! - [`stream`]: [`SearchEvent`] progress events.
//! - [`error`]: [`SearchError`], [`TreeError`], [`CallbackError`].
//!
//! Configuration can come from code (`SearchConfig::default().with_*`), from the environment
//! ([`SearchConfig::from_env`], `THOUGHT_TREE_*` variables) or from `.env` plus
//! `$XDG_CONFIG_HOME/thought-tree/config.toml` ([`SearchConfig::load`]).

pub mod error;
pub mod llm;
pub mod search;
pub mod stream;
pub mod thought;
pub mod tree;

pub use error::{CallbackError, SearchError, TreeError};
pub use llm::{
    LlmClient, LlmError, LlmThoughtEvaluator, LlmThoughtGenerator, Message, MockLlm,
};
pub use search::{
    is_default_solution, AnswerExtractor, RetryPolicy, SearchConfig, SearchExecutor,
    SearchMetadata, SearchOutcome, SearchStatus, SearchStrategy, SolutionCheck,
    TerminationReason,
};
pub use stream::SearchEvent;
pub use thought::{
    EvaluationContext, FnEvaluator, FnGenerator, GenerationContext, Thought, ThoughtEvaluator,
    ThoughtGenerator,
};
pub use tree::{NodeId, Tree, TreeNode};
