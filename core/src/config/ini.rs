//! Persisted configuration format
//!
//! Configuration files are INI documents. Keys are read from the `[config]`
//! section and then from the `[fs-uae]` section, so `[fs-uae]` wins when both
//! define a key. Other sections are ignored.
//!
//! Accepted syntax:
//! - `key = value` or `key: value`; keys are case-insensitive and stored
//!   lowercase
//! - whole-line comments starting with `#` or `;`
//! - indented lines continue the previous value; blank lines between them
//!   are part of the value, trailing blank lines are not
//! - a leading byte order mark is ignored
//! - a repeated key overrides the earlier one

use std::fmt::Write as _;

use super::ConfigValues;
use crate::error::ConfigError;

/// Sections read into the configuration, in merge order.
pub const CONFIG_SECTIONS: [&str; 2] = ["config", "fs-uae"];

/// Section written by [`write`].
pub const WRITE_SECTION: &str = "config";

struct Entry {
    section: usize,
    key: String,
    value: String,
}

/// Parse configuration text into a raw mapping.
///
/// # Errors
///
/// Returns [`ConfigError::SourceMalformed`] with the 1-based line number for
/// an option outside any section, an unterminated section header, or a line
/// that is neither an option nor a continuation.
pub fn parse(text: &str) -> Result<ConfigValues, ConfigError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut sections: Vec<String> = Vec::new();
    let mut entries: Vec<Entry> = Vec::new();
    // Continuations are only valid after an option
    let mut last_entry: Option<usize> = None;
    // Blank lines seen since the last line of the current value
    let mut pending_blanks = 0usize;

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let malformed = |message: &str| ConfigError::SourceMalformed {
            line: line_no,
            message: message.to_string(),
        };

        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            if last_entry.is_some() {
                pending_blanks += 1;
            }
            continue;
        }

        if raw_line.starts_with([' ', '\t'])
            && let Some(entry) = last_entry
        {
            let value = &mut entries[entry].value;
            for _ in 0..=pending_blanks {
                value.push('\n');
            }
            value.push_str(trimmed);
            pending_blanks = 0;
            continue;
        }
        pending_blanks = 0;

        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('[') {
            let name = rest
                .strip_suffix(']')
                .ok_or_else(|| malformed("unterminated section header"))?;
            sections.push(name.trim().to_string());
            last_entry = None;
            continue;
        }

        let Some(section) = sections.len().checked_sub(1) else {
            return Err(malformed("option outside of any section"));
        };
        let Some(split) = trimmed.find(['=', ':']) else {
            return Err(malformed("expected `key = value`"));
        };
        let key = trimmed[..split].trim().to_lowercase();
        if key.is_empty() {
            return Err(malformed("empty key"));
        }
        entries.push(Entry {
            section,
            key,
            value: trimmed[split + 1..].trim().to_string(),
        });
        last_entry = Some(entries.len() - 1);
    }

    let mut values = ConfigValues::new();
    for wanted in CONFIG_SECTIONS {
        for entry in &entries {
            if sections[entry.section] == wanted {
                values.insert(entry.key.clone(), entry.value.clone());
            }
        }
    }
    Ok(values)
}

/// Render key/value pairs as a configuration document.
///
/// Multi-line values are written with indented continuation lines.
pub fn write<'a>(items: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut out = format!("[{WRITE_SECTION}]\n");
    for (key, value) in items {
        let mut lines = value.lines();
        let first = lines.next().unwrap_or("");
        let _ = writeln!(out, "{key} = {first}");
        for line in lines {
            if line.trim().is_empty() {
                out.push('\n');
            } else {
                let _ = writeln!(out, "    {line}");
            }
        }
    }
    out
}
