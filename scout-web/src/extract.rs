//! Browser-rendered page extraction.
//!
//! Each call launches its own browser session, reads the rendered document
//! (post-script DOM, which is why a real engine is used instead of a plain
//! fetch), and reduces it to normalized text plus resolved outbound links.
//! The session is torn down on every exit path.

use scout_browser::{AuthState, BrowserSession};
use scout_config::BrowserConfig;
use scraper::{Html, Selector};
use std::sync::OnceLock;

use crate::links::resolve_href;
use crate::text::normalize_text;
use crate::types::{Link, SearchResult};

fn anchor_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("a").expect("static selector"))
}

/// Seam for anything that can turn a URL into an extracted result.
///
/// The aggregator depends on this rather than on the concrete
/// browser-backed extractor so enrichment can be exercised without a
/// browser.
#[async_trait::async_trait]
pub trait Extractor: Send + Sync {
    async fn extract_page(&self, url: &str) -> Option<SearchResult>;
}

/// Drives a browser session per call to turn a URL into a populated
/// [`SearchResult`].
#[derive(Debug, Clone)]
pub struct PageExtractor {
    config: BrowserConfig,
}

#[async_trait::async_trait]
impl Extractor for PageExtractor {
    /// Extract text and links from `url`.
    ///
    /// Returns `None` on any failure (launch, navigation, parse); the record
    /// is never partially populated. Failures are logged here, not surfaced,
    /// so a caller enriching a batch can simply skip this item.
    async fn extract_page(&self, url: &str) -> Option<SearchResult> {
        match self.try_extract(url).await {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::error!(target: "web.extract", %url, error = %e, "extraction failed");
                None
            }
        }
    }
}

impl PageExtractor {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    async fn try_extract(&self, url: &str) -> anyhow::Result<SearchResult> {
        let session = BrowserSession::launch(&self.config).await?;
        let outcome = self.drive(&session, url).await;
        // Teardown happens before the outcome is inspected so a navigation
        // error cannot leak the session.
        if let Err(e) = session.close().await {
            tracing::debug!(target: "web.extract", error = %e, "session close failed");
        }
        outcome
    }

    async fn drive(&self, session: &BrowserSession, url: &str) -> anyhow::Result<SearchResult> {
        session.goto(url).await?;

        if let Some(path) = self.config.valid_auth_state_path() {
            let state = AuthState::load(&path)?;
            session.apply_auth_state(&state).await?;
        }

        let title = session.title().await?;
        let html = session.content().await?;

        let (text, links) = parse_document(url, &html);
        Ok(SearchResult {
            title,
            url: url.to_string(),
            snippet: text.clone(),
            page_content: text,
            links,
        })
    }
}

/// Reduce rendered HTML to normalized text and the in-order anchor list.
///
/// Anchors without an href, with an empty href, or with no text are dropped;
/// surviving hrefs are resolved against `url`. Sync on purpose: the parsed
/// DOM is not `Send` and must not live across an await.
pub(crate) fn parse_document(url: &str, html: &str) -> (String, Vec<Link>) {
    let doc = Html::parse_document(html);

    let text: String = doc.root_element().text().collect();
    let text = normalize_text(&text);

    let mut links = Vec::new();
    for anchor in doc.select(anchor_selector()) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if href.is_empty() {
            continue;
        }
        let link_text: String = anchor.text().collect();
        if link_text.is_empty() {
            continue;
        }
        links.push(Link {
            href: resolve_href(url, href),
            text: link_text,
        });
    }

    (text, links)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head><title>Sample</title></head>
        <body>
          <p>First   paragraph</p>


          <p>Second paragraph</p>
          <a href="https://b.com/abs">absolute</a>
          <a href="rel/page.html">relative</a>
          <a href="">empty href</a>
          <a href="/no-text"></a>
        </body></html>
    "#;

    #[test]
    fn anchors_resolve_in_document_order() {
        let (_, links) = parse_document("https://a.com/base/", PAGE);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].href, "https://b.com/abs");
        assert_eq!(links[0].text, "absolute");
        assert_eq!(links[1].href, "https://a.com/base/rel/page.html");
        assert_eq!(links[1].text, "relative");
    }

    #[test]
    fn empty_href_and_textless_anchors_are_dropped() {
        let (_, links) = parse_document("https://a.com/", PAGE);
        assert!(links.iter().all(|l| !l.href.is_empty()));
        assert!(links.iter().all(|l| !l.text.is_empty()));
    }

    #[test]
    fn text_is_normalized() {
        let (text, _) = parse_document("https://a.com/", PAGE);
        assert!(!text.contains("  "));
        assert!(!text.contains("\n\n"));
        assert!(text.contains("First paragraph"));
    }
}
