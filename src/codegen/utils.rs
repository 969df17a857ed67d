//! Identifier case conversion and string helpers used by the generators.
//!
//! The snake-case rule is deliberately simple and fixed: a segment starts at
//! every ASCII upper-case letter and runs through all following characters that
//! are not upper-case. Consecutive capitals therefore each become their own
//! segment (`IPCManager` -> `i_p_c_manager`).

use regex::Regex;
use std::sync::OnceLock;

fn dot_dash_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.\-]+").expect("valid regex"))
}

fn underscore_dash_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[_\-]+").expect("valid regex"))
}

/// Convert an identifier or path to snake_case
///
/// Runs of `.` and `-` become a single `_` before segmentation, so a path like
/// `include/foo/bar.h` becomes `include/foo/bar_h`.
pub fn to_snake_case(s: &str) -> String {
    let s = dot_dash_runs().replace_all(s, "_");

    let mut segments: Vec<&str> = Vec::new();
    let mut start = 0;
    for (idx, ch) in s.char_indices() {
        if ch.is_ascii_uppercase() && idx > start {
            segments.push(&s[start..idx]);
            start = idx;
        }
    }
    if start < s.len() {
        segments.push(&s[start..]);
    }

    segments.join("_").to_lowercase()
}

/// Convert a snake_case or kebab-case identifier to CamelCase
///
/// Each word keeps only its first letter upper-case: `ipc_MANAGER` -> `IpcManager`.
pub fn to_camel_case(s: &str) -> String {
    let spaced = underscore_dash_runs().replace_all(s, " ");
    spaced.split_whitespace().map(capitalize).collect()
}

/// [`to_snake_case`] over an optional input; absent in, absent out
pub fn snake_case_opt(s: Option<&str>) -> Option<String> {
    s.map(to_snake_case)
}

/// [`to_camel_case`] over an optional input; absent in, absent out
pub fn camel_case_opt(s: Option<&str>) -> Option<String> {
    s.map(to_camel_case)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Escape one line of text for use inside a C string literal
pub fn escape_c_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\'', "\\'")
}

/// Check that a token is a valid C preprocessor identifier
pub fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
