//! Search configuration: strategy, limits, and callback policies.
//!
//! [`SearchConfig::default`] matches the documented defaults (breadth-first, beam 3,
//! depth 5, budget 100). [`SearchConfig::from_env`] overrides them from `THOUGHT_TREE_*`
//! variables; [`SearchConfig::load`] also reads `.env` and XDG `config.toml` through
//! `thought-tree-config`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

use super::retry::RetryPolicy;

/// App name used for `$XDG_CONFIG_HOME/<app>/config.toml`.
pub const CONFIG_APP_NAME: &str = "thought-tree";

/// Table of `config.toml` deserialized into [`SearchConfig`] by [`SearchConfig::load`].
pub const SEARCH_SECTION: &str = "search";

pub const ENV_STRATEGY: &str = "THOUGHT_TREE_STRATEGY";
pub const ENV_BEAM_WIDTH: &str = "THOUGHT_TREE_BEAM_WIDTH";
pub const ENV_MAX_DEPTH: &str = "THOUGHT_TREE_MAX_DEPTH";
pub const ENV_BUDGET: &str = "THOUGHT_TREE_BUDGET";
pub const ENV_EVALUATION_STRATEGY: &str = "THOUGHT_TREE_EVALUATION_STRATEGY";
pub const ENV_EVALUATION_CONCURRENCY: &str = "THOUGHT_TREE_EVALUATION_CONCURRENCY";
pub const ENV_CALLBACK_TIMEOUT_MS: &str = "THOUGHT_TREE_CALLBACK_TIMEOUT_MS";

/// Frontier discipline. Chosen once per search; only selection and insertion differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// FIFO: every depth-d node is expanded before any depth-(d+1) node.
    #[default]
    BreadthFirst,
    /// LIFO: follows one branch down to `max_depth`, then backtracks to siblings.
    DepthFirst,
    /// Greedy: always expands the highest-valued frontier node, regardless of depth.
    BestFirst,
}

impl SearchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BreadthFirst => "breadth_first",
            Self::DepthFirst => "depth_first",
            Self::BestFirst => "best_first",
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchStrategy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "breadth_first" | "bfs" => Ok(Self::BreadthFirst),
            "depth_first" | "dfs" => Ok(Self::DepthFirst),
            "best_first" | "greedy" => Ok(Self::BestFirst),
            _ => Err(SearchError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Limits and policies for one search call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub strategy: SearchStrategy,
    /// Children kept per expansion after sorting candidates by score. Must be positive.
    pub beam_width: usize,
    /// Nodes at this depth are never expanded. Zero means only the root is examined.
    pub max_depth: usize,
    /// Maximum number of nodes taken off the frontier. Must be positive.
    pub budget: usize,
    /// Opaque tag forwarded to the evaluator (e.g. "value" or "vote").
    pub evaluation_strategy: String,
    /// Candidates scored concurrently per expansion; 1 routes through `evaluate_batch`.
    pub evaluation_concurrency: usize,
    /// Per-call timeout for generator and evaluator callbacks.
    pub callback_timeout_ms: Option<u64>,
    pub retry: RetryPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::BreadthFirst,
            beam_width: 3,
            max_depth: 5,
            budget: 100,
            evaluation_strategy: "value".to_string(),
            evaluation_concurrency: 1,
            callback_timeout_ms: None,
            retry: RetryPolicy::None,
        }
    }
}

impl SearchConfig {
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_beam_width(mut self, beam_width: usize) -> Self {
        self.beam_width = beam_width;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_evaluation_strategy(mut self, tag: impl Into<String>) -> Self {
        self.evaluation_strategy = tag.into();
        self
    }

    pub fn with_evaluation_concurrency(mut self, n: usize) -> Self {
        self.evaluation_concurrency = n;
        self
    }

    /// Sets the per-call timeout, rounded up to whole milliseconds.
    pub fn with_callback_timeout(mut self, timeout: Duration) -> Self {
        let ms = timeout.as_nanos().div_ceil(1_000_000);
        self.callback_timeout_ms = Some(u64::try_from(ms).unwrap_or(u64::MAX));
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn callback_timeout(&self) -> Option<Duration> {
        self.callback_timeout_ms.map(Duration::from_millis)
    }

    /// Rejects limits that would make the search meaningless. Called by the executor before
    /// the first iteration.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.budget == 0 {
            return Err(SearchError::InvalidConfig("budget must be positive".into()));
        }
        if self.beam_width == 0 {
            return Err(SearchError::InvalidConfig("beam_width must be positive".into()));
        }
        if self.evaluation_concurrency == 0 {
            return Err(SearchError::InvalidConfig(
                "evaluation_concurrency must be positive".into(),
            ));
        }
        if self.callback_timeout_ms == Some(0) {
            return Err(SearchError::InvalidConfig(
                "callback_timeout_ms must be positive when set".into(),
            ));
        }
        Ok(())
    }

    /// Defaults overridden by `THOUGHT_TREE_*` environment variables.
    ///
    /// Unset variables keep the default; a set but unparsable value is an error.
    pub fn from_env() -> Result<Self, SearchError> {
        Self::default().with_env_overrides()
    }

    /// `self` with every set `THOUGHT_TREE_*` variable applied on top.
    pub fn with_env_overrides(self) -> Result<Self, SearchError> {
        let mut config = self;
        if let Some(s) = env_string(ENV_STRATEGY) {
            config.strategy = s.parse()?;
        }
        if let Some(n) = env_parse(ENV_BEAM_WIDTH)? {
            config.beam_width = n;
        }
        if let Some(n) = env_parse(ENV_MAX_DEPTH)? {
            config.max_depth = n;
        }
        if let Some(n) = env_parse(ENV_BUDGET)? {
            config.budget = n;
        }
        if let Some(s) = env_string(ENV_EVALUATION_STRATEGY) {
            config.evaluation_strategy = s;
        }
        if let Some(n) = env_parse(ENV_EVALUATION_CONCURRENCY)? {
            config.evaluation_concurrency = n;
        }
        if let Some(ms) = env_parse(ENV_CALLBACK_TIMEOUT_MS)? {
            config.callback_timeout_ms = Some(ms);
        }
        Ok(config)
    }

    /// Full layered load, lowest priority first: defaults, the `[search]` table of
    /// `$XDG_CONFIG_HOME/thought-tree/config.toml`, then `THOUGHT_TREE_*` variables from the
    /// process env, `.env` or the XDG `[env]` table (in that order of precedence).
    pub fn load() -> Result<Self, SearchError> {
        let applied = env_config::load_and_apply(CONFIG_APP_NAME, None)?;
        if !applied.is_empty() {
            tracing::debug!(keys = ?applied.keys().collect::<Vec<_>>(), "applied env from config files");
        }
        let base = env_config::load_section::<SearchConfig>(CONFIG_APP_NAME, SEARCH_SECTION)?
            .unwrap_or_default();
        base.with_env_overrides()
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, SearchError> {
    match env_string(key) {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| SearchError::InvalidConfig(format!("{key}: cannot parse {s:?}"))),
    }
}
