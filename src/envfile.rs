//! Line-preserving edits to `KEY=value` environment files.
//!
//! The project initializer pins a fixed key set in the `.env` file a fresh
//! environment ships with. Everything outside the touched keys (comments,
//! unknown keys, ordering) must survive byte for byte.

use std::fs;
use std::io;
use std::path::Path;

use regex::{NoExpand, Regex};
use tracing::debug;

/// Apply `KEY=value` pairs to the file at `path`.
///
/// Each key replaces the first existing `KEY=...` line in place; keys not
/// present are appended, one per line, at the end. A missing file is
/// treated as empty and created. Values are written raw, no quoting.
pub fn apply_env_values(path: &Path, values: &[(String, String)]) -> io::Result<()> {
    let mut content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(err),
    };

    let mut replaced = 0usize;
    let mut appended = 0usize;

    for (key, value) in values {
        let line = format!("{key}={value}");
        // Anchored to the whole line so FOO never matches FOO_BAR
        let pattern = Regex::new(&format!(r"(?m)^{}=.*$", regex::escape(key))).unwrap();

        if pattern.is_match(&content) {
            content = pattern.replace(&content, NoExpand(&line)).into_owned();
            replaced += 1;
        } else {
            if !content.is_empty() && !content.ends_with('\n') {
                content.push('\n');
            }
            content.push_str(&line);
            content.push('\n');
            appended += 1;
        }
    }

    fs::write(path, &content)?;
    debug!(path = %path.display(), replaced, appended, "environment file updated");
    Ok(())
}
