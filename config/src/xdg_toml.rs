//! `$XDG_CONFIG_HOME/<app>/config.toml`: an `[env]` table of variables plus arbitrary
//! typed sections (e.g. `[search]`).

use std::collections::HashMap;
use std::path::PathBuf;

use serde::de::DeserializeOwned;

use crate::LoadError;

/// `$XDG_CONFIG_HOME` when set to an absolute path, else the platform config dir.
pub(crate) fn config_home() -> Result<PathBuf, LoadError> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        if dir.is_absolute() {
            return Ok(dir);
        }
    }
    dirs::config_dir().ok_or_else(|| LoadError::XdgPath("no config directory for this platform".into()))
}

pub(crate) fn config_path(app_name: &str) -> Result<PathBuf, LoadError> {
    Ok(config_home()?.join(app_name).join("config.toml"))
}

/// Parsed file, or `None` when it does not exist.
fn read_table(app_name: &str) -> Result<Option<toml::Table>, LoadError> {
    let path = config_path(app_name)?;
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path).map_err(LoadError::XdgRead)?;
    Ok(Some(content.parse::<toml::Table>()?))
}

/// `[env]` entries. Strings are taken as-is; numbers and booleans are stringified so
/// `BUDGET = 50` works as well as `BUDGET = "50"`.
pub(crate) fn load_env_map(app_name: &str) -> Result<HashMap<String, String>, LoadError> {
    let Some(table) = read_table(app_name)? else {
        return Ok(HashMap::new());
    };
    let Some(env) = table.get("env").and_then(toml::Value::as_table) else {
        return Ok(HashMap::new());
    };
    let mut out = HashMap::with_capacity(env.len());
    for (key, value) in env {
        let value = match value {
            toml::Value::String(s) => s.clone(),
            toml::Value::Integer(_) | toml::Value::Float(_) | toml::Value::Boolean(_) => {
                value.to_string()
            }
            _ => return Err(LoadError::NonScalarEnv(key.clone())),
        };
        out.insert(key.clone(), value);
    }
    Ok(out)
}

/// Deserializes `[section]`; `None` when the file or the section is absent.
pub(crate) fn load_section<T: DeserializeOwned>(
    app_name: &str,
    section: &str,
) -> Result<Option<T>, LoadError> {
    let Some(mut table) = read_table(app_name)? else {
        return Ok(None);
    };
    match table.remove(section) {
        Some(value) => Ok(Some(value.try_into()?)),
        None => Ok(None),
    }
}
