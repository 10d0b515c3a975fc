//! Encyclopedia keyword search against the MediaWiki Action API.
//!
//! Two-step flow: `list=search` for matching titles, then `prop=extracts`
//! (plain text) per title. Disambiguation pages and missing pages are
//! skipped per title; only a failing search query is fatal to the call.

use scout_common::{Result, ScoutError};
use scout_http::{HttpClient, RequestOpts};
use serde::Deserialize;

const API_PATH: &str = "w/api.php";
const USER_AGENT_VALUE: &str = "webscout/0.1";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchTitle>,
}

#[derive(Debug, Deserialize)]
struct SearchTitle {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    query: Option<PagesQuery>,
}

#[derive(Debug, Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: Vec<PageExtract>,
}

#[derive(Debug, Deserialize)]
struct PageExtract {
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    missing: Option<bool>,
    #[serde(default)]
    pageprops: Option<PageProps>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    // Present (as an empty string) on disambiguation pages.
    #[serde(default)]
    disambiguation: Option<String>,
}

/// Client for one language edition of Wikipedia.
#[derive(Clone)]
pub struct WikipediaClient;

impl WikipediaClient {
    pub fn new() -> Self {
        Self
    }

    /// Search for `query` in the `lang` edition and return rendered article
    /// texts for up to `num_results` titles.
    ///
    /// Titles that resolve to a disambiguation page or to nothing are
    /// skipped; the remaining articles come back as
    /// `"Title:\n<title>\n\nContent:\n<body>\n"` strings in search order.
    pub async fn search_articles(
        &self,
        query: &str,
        lang: &str,
        num_results: usize,
    ) -> Result<Vec<String>> {
        let http = client_for(lang)?;

        tracing::debug!(target: "web.wiki", %lang, %query, "encyclopedia search");
        let titles = self.search_titles(&http, query, num_results).await?;

        let mut articles = Vec::new();
        for title in titles {
            match self.fetch_article(&http, &title).await? {
                Some(body) => {
                    articles.push(format!("Title:\n{title}\n\nContent:\n{body}\n"));
                }
                None => {
                    tracing::debug!(target: "web.wiki", %title, "skipping ambiguous or missing page");
                }
            }
        }
        Ok(articles)
    }

    async fn search_titles(
        &self,
        http: &HttpClient,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<String>> {
        let limit = num_results.to_string();
        let resp: SearchResponse = http
            .get_json(
                API_PATH,
                RequestOpts {
                    query: Some(vec![
                        ("action", "query".into()),
                        ("list", "search".into()),
                        ("srsearch", query.into()),
                        ("srlimit", limit.as_str().into()),
                        ("format", "json".into()),
                        ("formatversion", "2".into()),
                    ]),
                    headers: Some(user_agent()),
                    retries: Some(0),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| ScoutError::Backend(e.to_string()))?;

        Ok(resp
            .query
            .map(|q| q.search.into_iter().map(|s| s.title).collect())
            .unwrap_or_default())
    }

    /// Fetch one article's plain text; `None` means disambiguation/missing.
    async fn fetch_article(&self, http: &HttpClient, title: &str) -> Result<Option<String>> {
        let resp: ExtractResponse = http
            .get_json(
                API_PATH,
                RequestOpts {
                    query: Some(vec![
                        ("action", "query".into()),
                        ("prop", "extracts|pageprops".into()),
                        ("ppprop", "disambiguation".into()),
                        ("explaintext", "1".into()),
                        ("redirects", "1".into()),
                        ("titles", title.into()),
                        ("format", "json".into()),
                        ("formatversion", "2".into()),
                    ]),
                    headers: Some(user_agent()),
                    retries: Some(0),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| ScoutError::Backend(e.to_string()))?;

        let Some(page) = resp.query.and_then(|q| q.pages.into_iter().next()) else {
            return Ok(None);
        };
        Ok(article_body(page))
    }
}

impl Default for WikipediaClient {
    fn default() -> Self {
        Self::new()
    }
}

fn client_for(lang: &str) -> Result<HttpClient> {
    if lang.is_empty() || !lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ScoutError::Config(format!("invalid wiki language: {lang:?}")));
    }
    HttpClient::new(&format!("https://{lang}.wikipedia.org/"))
        .map_err(|e| ScoutError::Config(format!("wiki endpoint: {e}")))
}

fn user_agent() -> scout_http::header::HeaderMap {
    let mut headers = scout_http::header::HeaderMap::new();
    headers.insert(
        scout_http::header::USER_AGENT,
        scout_http::header::HeaderValue::from_static(USER_AGENT_VALUE),
    );
    headers
}

/// Project a page record onto its usable body text, dropping disambiguation
/// and missing pages.
fn article_body(page: PageExtract) -> Option<String> {
    if page.missing.unwrap_or(false) {
        return None;
    }
    if page
        .pageprops
        .as_ref()
        .is_some_and(|p| p.disambiguation.is_some())
    {
        return None;
    }
    page.extract.filter(|body| !body.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(json: &str) -> PageExtract {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn plain_page_yields_body() {
        let p = page(r#"{"title": "Rust", "extract": "A language."}"#);
        assert_eq!(article_body(p).as_deref(), Some("A language."));
    }

    #[test]
    fn disambiguation_page_is_skipped() {
        let p = page(
            r#"{"title": "Mercury", "extract": "Mercury may refer to:",
                "pageprops": {"disambiguation": ""}}"#,
        );
        assert!(article_body(p).is_none());
    }

    #[test]
    fn missing_page_is_skipped() {
        let p = page(r#"{"title": "Nope", "missing": true}"#);
        assert!(article_body(p).is_none());
    }

    #[test]
    fn empty_extract_is_skipped() {
        let p = page(r#"{"title": "Stub", "extract": ""}"#);
        assert!(article_body(p).is_none());
    }

    #[test]
    fn search_response_parses_titles() {
        let resp: SearchResponse = serde_json::from_str(
            r#"{"batchcomplete": true,
                "query": {"search": [{"ns": 0, "title": "Rust"},
                                      {"ns": 0, "title": "Rust (fungus)"}]}}"#,
        )
        .unwrap();
        let titles: Vec<String> = resp
            .query
            .map(|q| q.search.into_iter().map(|s| s.title).collect())
            .unwrap_or_default();
        assert_eq!(titles, ["Rust", "Rust (fungus)"]);
    }

    #[test]
    fn invalid_language_is_a_config_error() {
        assert!(client_for("").is_err());
        assert!(client_for("en wiki").is_err());
        assert!(client_for("en").is_ok());
        assert!(client_for("zh-yue").is_ok());
    }
}
