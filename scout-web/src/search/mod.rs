//! Search aggregation over a web search backend.
//!
//! The backend hands back ordered raw hits; the aggregator maps them to
//! [`SearchResult`] records and, in detail mode, enriches each one in order
//! through the page extractor. Enrichment is strictly sequential so at most
//! one browser session exists at a time.

mod ddg;

pub use ddg::DdgClient;

use std::sync::Arc;

use async_trait::async_trait;
use scout_common::Result;

use crate::extract::Extractor;
use crate::types::SearchResult;

/// A raw hit as exposed by a search backend; missing fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawHit {
    pub title: String,
    pub href: String,
    pub body: String,
}

/// Backend collaborator contract: an ordered page of hits for a query.
///
/// A backend failure is fatal to the whole search call.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawHit>>;
}

/// Aggregates backend hits into result records, optionally enriched.
pub struct WebSearcher {
    backend: Arc<dyn SearchBackend>,
    extractor: Arc<dyn Extractor>,
}

impl WebSearcher {
    pub fn new(backend: Arc<dyn SearchBackend>, extractor: Arc<dyn Extractor>) -> Self {
        Self { backend, extractor }
    }

    /// Run a search, optionally site-restricted and detail-enriched.
    ///
    /// Site restriction is delegated to the backend's own query syntax by
    /// prefixing a `site:` token. With `detail`, every result is extracted
    /// one at a time in backend order; a failed extraction leaves that one
    /// result snippet-only and the batch continues.
    pub async fn search_web(
        &self,
        query: &str,
        max_results: usize,
        site: Option<&str>,
        detail: bool,
    ) -> Result<Vec<SearchResult>> {
        let query = match site {
            Some(domain) if !domain.is_empty() => format!("site:{domain} {query}"),
            _ => query.to_string(),
        };

        let hits = self.backend.search(&query, max_results).await?;
        tracing::info!(target: "web.search", query = %query, hit_count = hits.len(), "search.page");

        let mut results: Vec<SearchResult> = hits
            .into_iter()
            .map(|hit| SearchResult::from_hit(hit.title, hit.href, hit.body))
            .collect();

        if detail {
            for result in &mut results {
                tracing::debug!(
                    target: "web.search",
                    title = %result.title,
                    url = %result.url,
                    "detail enrichment"
                );
                if let Some(page) = self.extractor.extract_page(&result.url).await {
                    result.page_content = page.page_content;
                    result.links = page.links;
                }
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Link;
    use scout_common::ScoutError;
    use std::sync::Mutex;

    struct FixedBackend {
        hits: Vec<RawHit>,
        queries: Mutex<Vec<String>>,
    }

    impl FixedBackend {
        fn new(hits: Vec<RawHit>) -> Self {
            Self {
                hits,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchBackend for FixedBackend {
        async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawHit>> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(self.hits.iter().take(max_results).cloned().collect())
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl SearchBackend for FailingBackend {
        async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<RawHit>> {
            Err(ScoutError::Backend("upstream down".into()))
        }
    }

    /// Extractor that fails for one specific URL and succeeds elsewhere.
    struct FlakyExtractor {
        failing_url: String,
    }

    #[async_trait]
    impl Extractor for FlakyExtractor {
        async fn extract_page(&self, url: &str) -> Option<SearchResult> {
            if url == self.failing_url {
                return None;
            }
            Some(SearchResult {
                title: "extracted".into(),
                url: url.to_string(),
                snippet: "body".into(),
                page_content: "body".into(),
                links: vec![Link {
                    href: format!("{url}/next"),
                    text: "next".into(),
                }],
            })
        }
    }

    fn hits() -> Vec<RawHit> {
        vec![
            RawHit {
                title: "one".into(),
                href: "https://a.com/1".into(),
                body: "first".into(),
            },
            RawHit {
                title: "two".into(),
                href: "https://a.com/2".into(),
                body: "second".into(),
            },
            RawHit {
                title: "three".into(),
                href: "https://a.com/3".into(),
                body: "third".into(),
            },
        ]
    }

    fn searcher(backend: FixedBackend, failing_url: &str) -> (Arc<FixedBackend>, WebSearcher) {
        let backend = Arc::new(backend);
        let searcher = WebSearcher::new(
            backend.clone(),
            Arc::new(FlakyExtractor {
                failing_url: failing_url.to_string(),
            }),
        );
        (backend, searcher)
    }

    #[tokio::test]
    async fn plain_search_never_populates_enrichment_fields() {
        let (_, searcher) = searcher(FixedBackend::new(hits()), "");
        let results = searcher.search_web("cats", 10, None, false).await.unwrap();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.page_content.is_empty()));
        assert!(results.iter().all(|r| r.links.is_empty()));
        assert_eq!(results[0].snippet, "first");
    }

    #[tokio::test]
    async fn detail_degrades_only_the_failing_result() {
        let (_, searcher) = searcher(FixedBackend::new(hits()), "https://a.com/2");
        let results = searcher.search_web("cats", 10, None, true).await.unwrap();

        assert_eq!(results.len(), 3);
        let empty: Vec<_> = results
            .iter()
            .filter(|r| r.page_content.is_empty())
            .collect();
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].url, "https://a.com/2");
        // The degraded result keeps its snippet.
        assert_eq!(empty[0].snippet, "second");
        // Enriched results carry content and links together.
        assert!(!results[0].page_content.is_empty());
        assert!(!results[0].links.is_empty());
    }

    #[tokio::test]
    async fn detail_preserves_backend_order() {
        let (_, searcher) = searcher(FixedBackend::new(hits()), "");
        let results = searcher.search_web("cats", 10, None, true).await.unwrap();
        let urls: Vec<_> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, ["https://a.com/1", "https://a.com/2", "https://a.com/3"]);
    }

    #[tokio::test]
    async fn site_restriction_rewrites_the_upstream_query() {
        let (backend, searcher) = searcher(FixedBackend::new(hits()), "");
        searcher
            .search_web("cats", 5, Some("example.com"), false)
            .await
            .unwrap();
        let queries = backend.queries.lock().unwrap();
        assert_eq!(queries[0], "site:example.com cats");
    }

    #[tokio::test]
    async fn empty_site_restriction_is_ignored() {
        let (backend, searcher) = searcher(FixedBackend::new(hits()), "");
        searcher.search_web("cats", 5, Some(""), false).await.unwrap();
        assert_eq!(backend.queries.lock().unwrap()[0], "cats");
    }

    #[tokio::test]
    async fn max_results_bounds_the_backend_request() {
        let (_, searcher) = searcher(FixedBackend::new(hits()), "");
        let results = searcher.search_web("cats", 2, None, false).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn backend_failure_is_fatal() {
        let searcher = WebSearcher::new(
            Arc::new(FailingBackend),
            Arc::new(FlakyExtractor {
                failing_url: String::new(),
            }),
        );
        let err = searcher.search_web("cats", 5, None, false).await;
        assert!(matches!(err, Err(ScoutError::Backend(_))));
    }
}
