//! DuckDuckGo HTML backend.
//!
//! The `html.duckduckgo.com` endpoint is the no-JS results page: hits live
//! in `.result` blocks, ads carry a `result--ad` class, and outbound hrefs
//! are redirect links whose real target sits in the `uddg` query parameter.

use async_trait::async_trait;
use scout_common::{Result, ScoutError};
use scout_config::SearchConfig;
use scout_http::header::{HeaderMap, HeaderValue, USER_AGENT};
use scout_http::{HttpClient, RequestOpts};
use scraper::{Html, Selector};
use std::sync::OnceLock;
use url::Url;

use super::{RawHit, SearchBackend};

struct ResultSelectors {
    result: Selector,
    title: Selector,
    snippet: Selector,
}

fn selectors() -> &'static ResultSelectors {
    static SEL: OnceLock<ResultSelectors> = OnceLock::new();
    SEL.get_or_init(|| ResultSelectors {
        result: Selector::parse(".result").expect("static selector"),
        title: Selector::parse(".result__a").expect("static selector"),
        snippet: Selector::parse(".result__snippet").expect("static selector"),
    })
}

/// Search backend client for the DuckDuckGo HTML endpoint.
#[derive(Clone)]
pub struct DdgClient {
    http: HttpClient,
    user_agent: String,
}

impl DdgClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let http = HttpClient::new(&config.endpoint)
            .map_err(|e| ScoutError::Config(format!("search endpoint: {e}")))?;
        Ok(Self {
            http,
            user_agent: config.user_agent.clone(),
        })
    }
}

#[async_trait]
impl SearchBackend for DdgClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawHit>> {
        let mut headers = HeaderMap::new();
        if let Ok(ua) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, ua);
        }

        let html = self
            .http
            .get_text(
                "html/",
                RequestOpts {
                    query: Some(vec![("q", query.into())]),
                    headers: Some(headers),
                    // Best-effort single attempt; failures surface upward.
                    retries: Some(0),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| ScoutError::Backend(e.to_string()))?;

        Ok(parse_results(&html, max_results))
    }
}

/// Map the results page into raw hits, skipping ad rows, capped at
/// `max_results` (the endpoint itself has no count parameter).
fn parse_results(html: &str, max_results: usize) -> Vec<RawHit> {
    let document = Html::parse_document(html);
    let sel = selectors();

    let mut hits = Vec::new();
    for element in document.select(&sel.result) {
        if hits.len() >= max_results {
            break;
        }
        if element
            .value()
            .attr("class")
            .is_some_and(|c| c.contains("result--ad"))
        {
            continue;
        }

        let Some(title_node) = element.select(&sel.title).next() else {
            continue;
        };
        let title: String = title_node.text().collect::<String>().trim().to_string();
        let href = clean_redirect(title_node.value().attr("href").unwrap_or(""));
        let body = element
            .select(&sel.snippet)
            .next()
            .map(|n| n.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        hits.push(RawHit { title, href, body });
    }
    hits
}

/// Unwrap DuckDuckGo's redirect links to the real target URL.
fn clean_redirect(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut url_str = raw.to_string();
    if url_str.starts_with("//") {
        url_str = format!("https:{url_str}");
    } else if url_str.starts_with('/') {
        url_str = format!("https://duckduckgo.com{url_str}");
    }

    if let Ok(parsed) = Url::parse(&url_str) {
        if let Some((_, target)) = parsed.query_pairs().find(|(k, _)| k == "uddg") {
            return target.to_string();
        }
    }

    url_str
}
