//! Stdio tool front.
//!
//! Newline-delimited JSON requests (`{"tool": <name>, "args": {...}}`) are
//! resolved against an explicit registry built at startup. A tool name that
//! is requested on the command line but does not exist is a startup
//! configuration error, never a silent skip; a request for a name outside
//! the registry gets an error response.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use scout_common::{Result, ScoutError};
use scout_web::download::download_file;
use scout_web::Extractor;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::params::{DownloadParams, EncyclopediaParams, ExtractParams, WebSearchParams};
use crate::services::Services;

/// The capabilities the stdio front can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tool {
    SearchEncyclopedia,
    SearchWeb,
    ExtractPage,
    DownloadFile,
}

impl Tool {
    pub const ALL: [Tool; 4] = [
        Tool::SearchEncyclopedia,
        Tool::SearchWeb,
        Tool::ExtractPage,
        Tool::DownloadFile,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::SearchEncyclopedia => "search_encyclopedia",
            Tool::SearchWeb => "search_web",
            Tool::ExtractPage => "extract_page",
            Tool::DownloadFile => "download_file",
        }
    }

    fn from_name(name: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|t| t.name() == name)
    }
}

/// Explicit name-to-capability map, fixed at startup.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    enabled: BTreeSet<Tool>,
}

impl ToolRegistry {
    /// Registry carrying every capability (the default when `--tools` is
    /// not given).
    pub fn with_all() -> Self {
        Self {
            enabled: Tool::ALL.into(),
        }
    }

    /// Build from a comma-separated name list. An unknown name is a
    /// configuration error.
    pub fn from_names(spec: &str) -> Result<Self> {
        let mut enabled = BTreeSet::new();
        for name in spec.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let tool = Tool::from_name(name)
                .ok_or_else(|| ScoutError::Config(format!("unknown tool: {name:?}")))?;
            enabled.insert(tool);
        }
        if enabled.is_empty() {
            return Err(ScoutError::Config("empty tool list".into()));
        }
        Ok(Self { enabled })
    }

    /// Resolve a requested name against the enabled set.
    pub fn resolve(&self, name: &str) -> Option<Tool> {
        Tool::from_name(name).filter(|t| self.enabled.contains(t))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.enabled.iter().map(|t| t.name()).collect()
    }
}

#[derive(Debug, Deserialize)]
struct ToolRequest {
    tool: String,
    #[serde(default)]
    args: Value,
}

/// Serve tool requests over stdin/stdout until EOF.
///
/// One response line per request line; malformed JSON and unregistered
/// names produce error responses rather than terminating the loop. Stdout
/// is the protocol channel, so nothing else in the process may write to it.
pub async fn run_stdio(services: Arc<Services>, registry: ToolRegistry) -> anyhow::Result<()> {
    tracing::info!(target: "app.tools", tools = ?registry.names(), "stdio front ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = respond(&services, &registry, &line).await;
        let mut out = serde_json::to_string(&response)?;
        out.push('\n');
        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
    }
    Ok(())
}

async fn respond(services: &Services, registry: &ToolRegistry, line: &str) -> Value {
    let request: ToolRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => return error_response(format!("malformed request: {e}")),
    };

    let Some(tool) = registry.resolve(&request.tool) else {
        return error_response(format!("unknown tool: {:?}", request.tool));
    };

    match invoke(services, tool, request.args).await {
        Ok(result) => json!({ "ok": true, "result": result }),
        Err(message) => error_response(message),
    }
}

fn error_response(message: String) -> Value {
    json!({ "ok": false, "error": message })
}

/// Run one tool call; the error string is already user-facing.
async fn invoke(services: &Services, tool: Tool, args: Value) -> std::result::Result<Value, String> {
    match tool {
        Tool::SearchEncyclopedia => {
            let p: EncyclopediaParams = parse_args(args)?;
            let articles = services
                .wiki
                .search_articles(&p.query, &p.lang, p.num_results)
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!(articles))
        }
        Tool::SearchWeb => {
            let p: WebSearchParams = parse_args(args)?;
            let results = services
                .searcher
                .search_web(&p.query, p.max_results, Some(p.site.as_str()), p.detail)
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!(results))
        }
        Tool::ExtractPage => {
            let p: ExtractParams = parse_args(args)?;
            Ok(json!(services.extractor.extract_page(&p.url).await))
        }
        Tool::DownloadFile => {
            let p: DownloadParams = parse_args(args)?;
            let saved = download_file(&p.url, Path::new(&p.save_path)).await;
            Ok(json!(saved.is_some()))
        }
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(args: Value) -> std::result::Result<T, String> {
    serde_json::from_value(args).map_err(|e| format!("invalid args: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_carries_every_tool() {
        let registry = ToolRegistry::with_all();
        for tool in Tool::ALL {
            assert_eq!(registry.resolve(tool.name()), Some(tool));
        }
    }

    #[test]
    fn unknown_name_in_spec_is_a_startup_error() {
        let err = ToolRegistry::from_names("search_web,vector_search");
        assert!(matches!(err, Err(ScoutError::Config(_))));
    }

    #[test]
    fn spec_restricts_the_enabled_set() {
        let registry = ToolRegistry::from_names("search_web, download_file").unwrap();
        assert_eq!(registry.resolve("search_web"), Some(Tool::SearchWeb));
        assert_eq!(registry.resolve("download_file"), Some(Tool::DownloadFile));
        assert_eq!(registry.resolve("extract_page"), None);
        assert_eq!(registry.resolve("no_such_tool"), None);
    }

    #[test]
    fn empty_spec_is_rejected() {
        assert!(ToolRegistry::from_names("").is_err());
        assert!(ToolRegistry::from_names(" , ").is_err());
    }

    #[test]
    fn request_parses_with_and_without_args() {
        let r: ToolRequest =
            serde_json::from_str(r#"{"tool": "extract_page", "args": {"url": "https://a.com"}}"#)
                .unwrap();
        assert_eq!(r.tool, "extract_page");
        assert_eq!(r.args["url"], "https://a.com");

        let r: ToolRequest = serde_json::from_str(r#"{"tool": "search_web"}"#).unwrap();
        assert!(r.args.is_null());
    }
}
