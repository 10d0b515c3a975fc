use serde::{Deserialize, Serialize};

/// An outbound link discovered on an extracted page.
///
/// `href` is always absolute by the time a link reaches a caller; `text` is
/// never empty (anchors without visible text are dropped at extraction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub text: String,
}

/// The single result record, shared by search hits and page extraction.
///
/// A hit fresh from the search backend carries `title`/`url`/`snippet` only.
/// `page_content` and `links` are populated together by exactly one
/// successful extraction; a failed extraction leaves both empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub page_content: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl SearchResult {
    /// A snippet-only record as produced from a raw backend hit.
    pub fn from_hit(title: String, url: String, snippet: String) -> Self {
        Self {
            title,
            url,
            snippet,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_record_leaves_enrichment_fields_empty() {
        let res = SearchResult::from_hit("t".into(), "https://a.com".into(), "s".into());
        assert!(res.page_content.is_empty());
        assert!(res.links.is_empty());
    }

    #[test]
    fn serializes_links_as_records() {
        let res = SearchResult {
            title: "t".into(),
            url: "https://a.com".into(),
            links: vec![Link {
                href: "https://a.com/x".into(),
                text: "x".into(),
            }],
            ..Default::default()
        };
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["links"][0]["href"], "https://a.com/x");
        assert_eq!(json["links"][0]["text"], "x");
    }
}
