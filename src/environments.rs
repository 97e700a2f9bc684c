//! Parsing of the orchestration CLI's environment listing.
//!
//! `warden status` prints a semi-free-form, ANSI-colored report. This module
//! recovers ordered (name, directory) records from it and hides the fragile
//! text patterns behind [`parse_environment_list`].

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// One running environment reported by the orchestration CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentRecord {
    /// Environment name
    pub name: String,

    /// Project directory exactly as printed (trimmed, not canonicalized)
    pub path: String,

    /// Source line the directory was read from, ANSI stripped
    pub raw_line: String,
}

/// "<name> a <type> project" announces the next environment block.
static NAME_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\w+)\s+a\s+(\w+)\s+project").unwrap());

/// "Project Directory: <path>" completes the pending block.
static DIRECTORY_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*Project Directory:\s*(.+)$").unwrap());

/// Parse the status listing into ordered environment records.
///
/// The listing is consumed line by line with a single pending-name slot:
/// a name line fills the slot, the next directory line emits a record and
/// clears it. Blocks are expected as {name, directory, optional URL}; a
/// directory line without a pending name is dropped, and a second name line
/// overwrites an unconsumed one, so malformed blocks are skipped rather
/// than mis-attributed. Duplicate names are kept as separate records.
pub fn parse_environment_list(raw: &str) -> Vec<EnvironmentRecord> {
    let mut records = Vec::new();
    let mut pending_name: Option<String> = None;

    for line in raw.lines() {
        let plain = strip_ansi_codes(line);
        let trimmed = plain.trim();

        if trimmed.is_empty() || is_banner_line(trimmed) {
            continue;
        }

        // URL lines carry no record field
        if plain.contains("Project URL:") {
            continue;
        }

        if let Some(caps) = NAME_LINE.captures(&plain) {
            pending_name = Some(caps[1].to_string());
            continue;
        }

        if let Some(caps) = DIRECTORY_LINE.captures(&plain) {
            if let Some(name) = pending_name.take() {
                records.push(EnvironmentRecord {
                    name,
                    path: caps[1].trim().to_string(),
                    raw_line: plain.clone(),
                });
            }
        }
    }

    debug!(count = records.len(), "parsed environment listing");
    records
}

fn is_banner_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("no running environments") || lower.contains("found the following")
}

/// Strip ANSI escape sequences (`ESC [ ... <letter>`) from a string.
pub fn strip_ansi_codes(s: &str) -> String {
    let mut plain = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\x1b' {
            plain.push(c);
            continue;
        }
        if chars.peek() == Some(&'[') {
            chars.next();
            // A letter terminates the control sequence
            for inner in chars.by_ref() {
                if inner.is_ascii_alphabetic() {
                    break;
                }
            }
        }
    }

    plain
}
