//! Core service wiring shared by both transport fronts.

use std::sync::Arc;

use scout_common::Result;
use scout_config::ScoutConfig;
use scout_web::search::DdgClient;
use scout_web::{PageExtractor, WebSearcher, WikipediaClient};

/// The four core entry points, constructed once per process.
pub struct Services {
    pub searcher: WebSearcher,
    pub extractor: Arc<PageExtractor>,
    pub wiki: WikipediaClient,
}

impl Services {
    pub fn build(config: &ScoutConfig) -> Result<Self> {
        let backend = Arc::new(DdgClient::new(&config.search)?);
        let extractor = Arc::new(PageExtractor::new(config.browser.clone()));
        let searcher = WebSearcher::new(backend, extractor.clone());
        Ok(Self {
            searcher,
            extractor,
            wiki: WikipediaClient::new(),
        })
    }
}
