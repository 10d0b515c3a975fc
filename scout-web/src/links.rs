//! Relative-link resolution against a base page URL.

use url::Url;

/// Convert an anchor's href (possibly relative) into absolute form.
///
/// Empty hrefs stay empty, already-absolute http/https hrefs pass through
/// unchanged, and anything else is joined against `base` with standard URL
/// semantics. A base or join that cannot be parsed falls back to returning
/// the href as given. Pure and idempotent.
pub fn resolve_href(base: &str, href: &str) -> String {
    if href.is_empty() {
        return String::new();
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    match Url::parse(base).and_then(|b| b.join(href)) {
        Ok(joined) => joined.to_string(),
        Err(_) => href.to_string(),
    }
}
