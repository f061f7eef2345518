//! Project `.env` reader. Only parses; applying to the process env happens in the crate root.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// `.env` in `dir`, or in the current directory when `dir` is `None`. `None` if absent.
fn find(dir: Option<&Path>) -> Option<PathBuf> {
    let dir = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir().ok()?,
    };
    let path = dir.join(".env");
    path.is_file().then_some(path)
}

/// Parses `KEY=VALUE` lines.
///
/// * Blank lines and lines starting with `#` are skipped; so are lines without `=` or with an
///   empty key.
/// * A leading `export ` is ignored, so shell-sourced files work unchanged.
/// * `"..."` values unescape `\"`; `'...'` values are taken literally.
/// * An unquoted value ends at ` #` (inline comment).
/// * Later lines override earlier ones.
pub(crate) fn parse(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, raw) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), unquote(raw.trim())))
        })
        .collect()
}

fn unquote(raw: &str) -> String {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return raw[1..raw.len() - 1].replace("\\\"", "\"");
    }
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return raw[1..raw.len() - 1].to_string();
    }
    match raw.find(" #") {
        Some(i) => raw[..i].trim_end().to_string(),
        None => raw.to_string(),
    }
}

/// Reads and parses `.env`; a missing file is an empty map.
pub(crate) fn load(dir: Option<&Path>) -> std::io::Result<HashMap<String, String>> {
    match find(dir) {
        Some(path) => Ok(parse(&std::fs::read_to_string(path)?)),
        None => Ok(HashMap::new()),
    }
}
