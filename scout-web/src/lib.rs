//! Web discovery and acquisition utilities.
//!
//! - Search aggregation over a web search backend (`search`)
//! - Browser-rendered page extraction (`extract`)
//! - Encyclopedia keyword search (`wiki`)
//! - Plain HTTP file download (`download`)
//! - Pure helpers: whitespace normalization (`text`) and relative-link
//!   resolution (`links`)
//!
//! The aggregator calls the extractor when detail mode is on; the extractor
//! calls the two pure helpers. Nothing here caches or shares state across
//! calls.

pub mod download;
pub mod extract;
pub mod links;
pub mod search;
pub mod text;
pub mod types;
pub mod wiki;

pub use extract::{Extractor, PageExtractor};
pub use search::{SearchBackend, WebSearcher};
pub use types::{Link, SearchResult};
pub use wiki::WikipediaClient;
