//! Whitespace normalization for extracted page text.

use regex::Regex;
use std::sync::OnceLock;

fn newline_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n+").expect("valid regex"))
}

fn space_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" +").expect("valid regex"))
}

/// Collapse every run of newlines to a single newline and every run of
/// spaces to a single space. Empty input yields empty output.
pub fn normalize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let collapsed = newline_runs().replace_all(text, "\n");
    space_runs().replace_all(&collapsed, " ").into_owned()
}
