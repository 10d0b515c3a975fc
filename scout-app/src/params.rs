//! Request parameter shapes, shared by the HTTP front (query strings) and
//! the stdio tool front (JSON args).

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct EncyclopediaParams {
    pub query: String,
    pub lang: String,
    pub num_results: usize,
}

#[derive(Debug, Deserialize)]
pub struct WebSearchParams {
    pub query: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Domain to restrict the search to; empty means unrestricted.
    #[serde(default)]
    pub site: String,
    /// Enrich every result with extracted page content and links.
    #[serde(default)]
    pub detail: bool,
}

fn default_max_results() -> usize {
    10
}

#[derive(Debug, Deserialize)]
pub struct ExtractParams {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    pub url: String,
    pub save_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_search_defaults_apply() {
        let p: WebSearchParams = serde_json::from_str(r#"{"query": "cats"}"#).unwrap();
        assert_eq!(p.max_results, 10);
        assert_eq!(p.site, "");
        assert!(!p.detail);
    }

    #[test]
    fn web_search_query_is_required() {
        let p: Result<WebSearchParams, _> = serde_json::from_str(r#"{"detail": true}"#);
        assert!(p.is_err());
    }
}
