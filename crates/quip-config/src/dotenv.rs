//! `.env` file loading (`KEY=VALUE` lines).
//!
//! Variables already present in the process environment always win over
//! values from the file.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Parse `.env` contents into key/value pairs, in file order.
///
/// Blank lines and `#` comments are skipped, an `export ` prefix is
/// accepted, and matching single or double quotes around the value are
/// stripped. In unquoted values a `#` preceded by whitespace starts an
/// inline comment; quoted values keep their `#`. Lines without `=` or with
/// an empty key are ignored.
pub fn parse(contents: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        pairs.push((key.to_string(), parse_value(value.trim()).to_string()));
    }
    pairs
}

fn parse_value(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.split_once(quote))
            .map(|(inner, _)| inner)
        {
            return inner;
        }
    }
    strip_inline_comment(value)
}

fn strip_inline_comment(value: &str) -> &str {
    let cut = value
        .char_indices()
        .find(|&(i, c)| {
            c == '#'
                && value[..i]
                    .chars()
                    .next_back()
                    .is_some_and(char::is_whitespace)
        })
        .map_or(value.len(), |(i, _)| i);
    value[..cut].trim_end()
}

/// Load the first readable file among `candidates` into the process
/// environment. Returns the path that was loaded, if any.
pub fn load_first(candidates: &[PathBuf]) -> Option<PathBuf> {
    for path in candidates {
        let Ok(contents) = std::fs::read_to_string(path) else {
            debug!("no .env at {}", path.display());
            continue;
        };
        apply(&contents);
        info!("loaded environment from {}", path.display());
        return Some(path.clone());
    }
    None
}

/// Load a single `.env` file. Returns `false` if it could not be read.
pub fn load_path(path: &Path) -> bool {
    load_first(&[path.to_path_buf()]).is_some()
}

fn apply(contents: &str) {
    for (key, value) in parse(contents) {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(key, value);
        }
    }
}
