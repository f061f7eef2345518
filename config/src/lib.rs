//! Layered configuration for thought-tree, applied to the process environment with priority
//! **existing env > project `.env` > `$XDG_CONFIG_HOME/<app>/config.toml` `[env]`**.
//!
//! Besides `[env]`, the XDG file may carry typed sections read with [`load_section`]
//! (thought-tree reads `[search]`).
//!
//! ```toml
//! # ~/.config/thought-tree/config.toml
//! [env]
//! RUST_LOG = "thought_tree=debug"
//!
//! [search]
//! strategy = "best_first"
//! budget = 200
//! ```

mod dotenv;
mod xdg_toml;

#[cfg(feature = "tracing-init")]
mod tracing_init;

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

#[cfg(feature = "tracing-init")]
pub use tracing_init::{init_tracing, TracingGuard, ENV_LOG_FILE};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("xdg [env] entry {0} must be a string, number or boolean")]
    NonScalarEnv(String),
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
}

/// Where a variable set by [`load_and_apply`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvSource {
    Dotenv,
    Xdg,
}

/// Keys [`load_and_apply`] wrote to the environment, with their source. Keys already present
/// in the environment are not listed.
pub type AppliedEnv = BTreeMap<String, EnvSource>;

/// Loads `.env` and the XDG `[env]` table and sets every key that is **not** already in the
/// process environment. `.env` beats XDG for keys present in both.
///
/// * `app_name`: XDG subdirectory, e.g. `"thought-tree"`.
/// * `dotenv_dir`: directory holding `.env`; current directory when `None`.
pub fn load_and_apply(app_name: &str, dotenv_dir: Option<&Path>) -> Result<AppliedEnv, LoadError> {
    let xdg = xdg_toml::load_env_map(app_name)?;
    let dotenv = dotenv::load(dotenv_dir).map_err(LoadError::DotenvRead)?;

    let keys: HashSet<&String> = xdg.keys().chain(dotenv.keys()).collect();
    let mut applied = AppliedEnv::new();
    for key in keys {
        if std::env::var_os(key).is_some() {
            continue;
        }
        let (value, source) = match dotenv.get(key) {
            Some(v) => (v, EnvSource::Dotenv),
            None => match xdg.get(key) {
                Some(v) => (v, EnvSource::Xdg),
                None => continue,
            },
        };
        std::env::set_var(key, value);
        applied.insert(key.clone(), source);
    }
    Ok(applied)
}

/// Deserializes `[section]` of `$XDG_CONFIG_HOME/<app_name>/config.toml`. `None` when the file
/// or the section is missing.
pub fn load_section<T: DeserializeOwned>(
    app_name: &str,
    section: &str,
) -> Result<Option<T>, LoadError> {
    xdg_toml::load_section(app_name, section)
}

/// Path of the XDG config file for `app_name`, whether or not it exists.
pub fn config_file_path(app_name: &str) -> Result<PathBuf, LoadError> {
    xdg_toml::config_path(app_name)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::with_xdg_home;
    use std::env;

    const APP: &str = "thought-tree-config-test";

    fn write_xdg(root: &Path, content: &str) {
        let dir = root.join(APP);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), content).unwrap();
    }

    #[test]
    fn nothing_to_load_is_ok() {
        let xdg = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();
        let applied = with_xdg_home(xdg.path(), || load_and_apply(APP, Some(cwd.path()))).unwrap();
        assert!(applied.is_empty());
    }

    #[test]
    fn existing_env_wins() {
        let xdg = tempfile::tempdir().unwrap();
        write_xdg(xdg.path(), "[env]\nTTC_TEST_EXISTING = \"from_xdg\"\n");
        let cwd = tempfile::tempdir().unwrap();
        let applied = with_xdg_home(xdg.path(), || {
            env::set_var("TTC_TEST_EXISTING", "from_env");
            let applied = load_and_apply(APP, Some(cwd.path()));
            assert_eq!(env::var("TTC_TEST_EXISTING").as_deref(), Ok("from_env"));
            env::remove_var("TTC_TEST_EXISTING");
            applied
        })
        .unwrap();
        assert!(!applied.contains_key("TTC_TEST_EXISTING"));
    }

    #[test]
    fn dotenv_beats_xdg_and_sources_are_reported() {
        let xdg = tempfile::tempdir().unwrap();
        write_xdg(
            xdg.path(),
            "[env]\nTTC_TEST_BOTH = \"from_xdg\"\nTTC_TEST_XDG_ONLY = \"x\"\n",
        );
        let cwd = tempfile::tempdir().unwrap();
        std::fs::write(
            cwd.path().join(".env"),
            "TTC_TEST_BOTH=from_dotenv\nTTC_TEST_DOTENV_ONLY=d\n",
        )
        .unwrap();

        let (applied, both, xdg_only, dotenv_only) = with_xdg_home(xdg.path(), || {
            for k in ["TTC_TEST_BOTH", "TTC_TEST_XDG_ONLY", "TTC_TEST_DOTENV_ONLY"] {
                env::remove_var(k);
            }
            let applied = load_and_apply(APP, Some(cwd.path()));
            let read = |k: &str| {
                let v = env::var(k).ok();
                env::remove_var(k);
                v
            };
            (
                applied,
                read("TTC_TEST_BOTH"),
                read("TTC_TEST_XDG_ONLY"),
                read("TTC_TEST_DOTENV_ONLY"),
            )
        });
        let applied = applied.unwrap();
        assert_eq!(both.as_deref(), Some("from_dotenv"));
        assert_eq!(xdg_only.as_deref(), Some("x"));
        assert_eq!(dotenv_only.as_deref(), Some("d"));
        assert_eq!(applied["TTC_TEST_BOTH"], EnvSource::Dotenv);
        assert_eq!(applied["TTC_TEST_XDG_ONLY"], EnvSource::Xdg);
    }

    #[test]
    fn invalid_xdg_toml_fails_with_parse_error() {
        let xdg = tempfile::tempdir().unwrap();
        write_xdg(xdg.path(), "invalid [[[\n");
        let result = with_xdg_home(xdg.path(), || load_and_apply(APP, None));
        assert!(matches!(result, Err(LoadError::XdgParse(_))));
    }

    #[test]
    fn config_file_path_follows_xdg_home() {
        let xdg = tempfile::tempdir().unwrap();
        let path = with_xdg_home(xdg.path(), || config_file_path(APP)).unwrap();
        assert_eq!(path, xdg.path().join(APP).join("config.toml"));
    }
}
