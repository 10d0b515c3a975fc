//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Precedence: `SCOUT__`-prefixed environment variables win over the config
//! file; `${VAR}` placeholders inside values are expanded after merging. The
//! file is optional so a deployment can run purely on environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Top-level runtime configuration for the webscout services.
#[derive(Debug, Default, Deserialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Browser session settings, read once per extraction call.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Run the browser without a visible window.
    #[serde(default)]
    pub headless: bool,
    /// Browser channel to drive ("chrome" or "msedge").
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Stored authentication state (cookies) to apply to fresh sessions.
    /// Empty or missing file means anonymous.
    #[serde(default)]
    pub auth_state_path: String,
    /// WebDriver endpoint the driver connects to.
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: false,
            channel: default_channel(),
            auth_state_path: String::new(),
            webdriver_url: default_webdriver_url(),
        }
    }
}

impl BrowserConfig {
    /// The configured auth-state path, only if the file actually exists.
    ///
    /// A configured-but-absent file is treated as "no stored session" rather
    /// than an error, so callers can fall back to an anonymous context.
    pub fn valid_auth_state_path(&self) -> Option<PathBuf> {
        if self.auth_state_path.is_empty() {
            return None;
        }
        let path = PathBuf::from(&self.auth_state_path);
        path.exists().then_some(path)
    }
}

/// Search backend settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the DuckDuckGo HTML endpoint.
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
    /// User agent presented to the search backend.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            user_agent: default_user_agent(),
        }
    }
}

/// HTTP transport front settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

fn default_channel() -> String {
    "chrome".into()
}
fn default_webdriver_url() -> String {
    "http://localhost:9515".into()
}
fn default_search_endpoint() -> String {
    "https://html.duckduckgo.com".into()
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36"
        .into()
}
fn default_bind_addr() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8000
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (file + env overrides).
pub struct ScoutConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ScoutConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoutConfigLoader {
    /// Start with sensible defaults: optional config file + `SCOUT__` env
    /// overrides (e.g. `SCOUT__BROWSER__HEADLESS=true`).
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("SCOUT").separator("__"));
        Self { builder }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by
    /// suffix. The file may be absent, in which case only defaults and the
    /// environment apply.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// `${VAR}` placeholders are expanded (recursively, depth-capped) after
    /// all sources are merged, so a file value may reference an environment
    /// variable that the deployment injects.
    pub fn load(self) -> Result<ScoutConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_are_complete() {
        let cfg = ScoutConfig::default();
        assert!(!cfg.browser.headless);
        assert_eq!(cfg.browser.channel, "chrome");
        assert_eq!(cfg.browser.webdriver_url, "http://localhost:9515");
        assert_eq!(cfg.server.port, 8000);
    }

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("SCOUT_TEST_AUTH_DIR", Some("/tmp/auth"), || {
            let mut v = json!("${SCOUT_TEST_AUTH_DIR}/state.json");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("/tmp/auth/state.json"));
        });
    }

    #[test]
    fn expands_nested_objects() {
        temp_env::with_var("SCOUT_TEST_HOST", Some("localhost"), || {
            let mut v = json!({
                "browser": { "webdriver_url": "http://${SCOUT_TEST_HOST}:9515" },
                "server": { "port": 8000 }
            });
            expand_env_in_value(&mut v);
            assert_eq!(
                v["browser"]["webdriver_url"],
                json!("http://localhost:9515")
            );
        });
    }

    #[test]
    fn expansion_terminates_on_cycles() {
        temp_env::with_vars([("CYC_A", Some("${CYC_B}")), ("CYC_B", Some("${CYC_A}"))], || {
            let mut v = json!("x=${CYC_A}");
            expand_env_in_value(&mut v);
            // Depth cap stops the loop; the unresolved placeholder survives.
            assert!(v.as_str().unwrap().contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("keep-${SCOUT_TEST_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("keep-${SCOUT_TEST_DOES_NOT_EXIST}"));
    }

    #[test]
    fn missing_auth_state_file_is_anonymous() {
        let browser = BrowserConfig {
            auth_state_path: "/definitely/not/present/auth.json".into(),
            ..Default::default()
        };
        assert!(browser.valid_auth_state_path().is_none());

        let empty = BrowserConfig::default();
        assert!(empty.valid_auth_state_path().is_none());
    }

    #[test]
    fn existing_auth_state_file_is_returned() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let browser = BrowserConfig {
            auth_state_path: tmp.path().to_string_lossy().into_owned(),
            ..Default::default()
        };
        assert_eq!(browser.valid_auth_state_path(), Some(tmp.path().to_path_buf()));
    }
}
