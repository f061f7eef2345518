//! Layered configuration: XDG `[search]` table, XDG `[env]` table and process env.
//!
//! One test per binary: it rewrites process-wide environment variables.

use std::env;
use std::time::Duration;

use thought_tree::search::{ENV_BEAM_WIDTH, ENV_BUDGET, ENV_STRATEGY};
use thought_tree::{RetryPolicy, SearchConfig, SearchStrategy};

#[test]
fn load_layers_defaults_section_and_env() {
    let xdg = tempfile::tempdir().unwrap();
    let app_dir = xdg.path().join("thought-tree");
    std::fs::create_dir_all(&app_dir).unwrap();
    std::fs::write(
        app_dir.join("config.toml"),
        r#"
[env]
THOUGHT_TREE_BUDGET = 33

[search]
strategy = "depth_first"
beam_width = 4
budget = 10
evaluation_strategy = "vote"

[search.retry]
kind = "fixed"
max_attempts = 2
interval = { secs = 0, nanos = 5000000 }
"#,
    )
    .unwrap();

    let prev_xdg = env::var_os("XDG_CONFIG_HOME");
    env::set_var("XDG_CONFIG_HOME", xdg.path());
    env::remove_var(ENV_STRATEGY);
    env::remove_var(ENV_BUDGET);
    env::set_var(ENV_BEAM_WIDTH, "6");

    let loaded = SearchConfig::load();

    env::remove_var(ENV_BUDGET);
    env::remove_var(ENV_BEAM_WIDTH);
    match prev_xdg {
        Some(v) => env::set_var("XDG_CONFIG_HOME", v),
        None => env::remove_var("XDG_CONFIG_HOME"),
    }

    let config = loaded.unwrap();
    // From [search].
    assert_eq!(config.strategy, SearchStrategy::DepthFirst);
    assert_eq!(config.evaluation_strategy, "vote");
    assert_eq!(
        config.retry,
        RetryPolicy::fixed(2, Duration::from_millis(5))
    );
    // [env] beats [search]; process env beats both.
    assert_eq!(config.budget, 33);
    assert_eq!(config.beam_width, 6);
    // Untouched default.
    assert_eq!(config.max_depth, 5);
}
