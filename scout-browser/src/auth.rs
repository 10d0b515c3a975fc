//! Stored authentication state for browser sessions.
//!
//! The on-disk format is the browser-exported storage-state JSON: a top-level
//! `cookies` array. Only the cookie fields WebDriver can replay are read;
//! origin-storage entries are ignored.

use anyhow::{Context, Result};
use fantoccini::cookies::Cookie;
use serde::Deserialize;
use std::path::Path;

/// Parsed stored-session state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthState {
    #[serde(default)]
    pub cookies: Vec<StoredCookie>,
}

/// A single cookie from the stored state file.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub secure: Option<bool>,
    #[serde(default, rename = "httpOnly")]
    pub http_only: Option<bool>,
}

impl AuthState {
    /// Read and parse a storage-state file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read auth state: {}", path.display()))?;
        let state: AuthState = serde_json::from_str(&raw)
            .with_context(|| format!("invalid auth state JSON: {}", path.display()))?;
        Ok(state)
    }

    /// Cookies applicable to `host`, converted to WebDriver cookies.
    ///
    /// WebDriver only accepts cookies for the domain the session is currently
    /// on, so entries for unrelated domains are filtered out here instead of
    /// failing one by one at add time.
    pub fn cookies_for_host(&self, host: &str) -> Vec<Cookie<'static>> {
        self.cookies
            .iter()
            .filter(|c| domain_matches(&c.domain, host))
            .map(|c| {
                let mut cookie = Cookie::new(c.name.clone(), c.value.clone());
                if let Some(path) = &c.path {
                    cookie.set_path(path.clone());
                }
                if let Some(secure) = c.secure {
                    cookie.set_secure(secure);
                }
                if let Some(http_only) = c.http_only {
                    cookie.set_http_only(http_only);
                }
                cookie
            })
            .collect()
    }
}

/// Cookie-domain matching: `.example.com` covers `example.com` and any
/// subdomain; a bare domain matches itself and subdomains.
fn domain_matches(cookie_domain: &str, host: &str) -> bool {
    if cookie_domain.is_empty() {
        return false;
    }
    let domain = cookie_domain.trim_start_matches('.');
    host == domain || host.ends_with(&format!(".{domain}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "cookies": [
            {"name": "sid", "value": "abc123", "domain": ".example.com",
             "path": "/", "secure": true, "httpOnly": true},
            {"name": "theme", "value": "dark", "domain": "other.net"}
        ],
        "origins": []
    }"#;

    #[test]
    fn parses_storage_state_json() {
        let state: AuthState = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(state.cookies.len(), 2);
        assert_eq!(state.cookies[0].name, "sid");
        assert_eq!(state.cookies[0].http_only, Some(true));
    }

    #[test]
    fn filters_cookies_by_host() {
        let state: AuthState = serde_json::from_str(SAMPLE).unwrap();

        let cookies = state.cookies_for_host("www.example.com");
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name(), "sid");

        let cookies = state.cookies_for_host("example.com");
        assert_eq!(cookies.len(), 1);

        assert!(state.cookies_for_host("unrelated.org").is_empty());
    }

    #[test]
    fn leading_dot_does_not_match_suffix_lookalikes() {
        assert!(domain_matches(".example.com", "a.example.com"));
        assert!(!domain_matches(".example.com", "badexample.com"));
        assert!(!domain_matches("", "example.com"));
    }

    #[test]
    fn empty_state_has_no_cookies() {
        let state = AuthState::default();
        assert!(state.cookies_for_host("example.com").is_empty());
    }
}
