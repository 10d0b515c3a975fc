use anyhow::{anyhow, Result};
use fantoccini::{Client, ClientBuilder};
use scout_config::BrowserConfig;
use serde_json::json;
use std::collections::HashMap;
use webdriver::capabilities::Capabilities;

use crate::auth::AuthState;

/// One exclusive WebDriver browser session.
///
/// Launch, drive, and close; the session is never reused across calls and
/// [`BrowserSession::close`] must run on every exit path.
pub struct BrowserSession {
    client: Client,
}

impl BrowserSession {
    /// Connect to the configured WebDriver endpoint and start a session.
    ///
    /// `channel` selects the browser to drive; `headless` appends the usual
    /// headless switches to the vendor options.
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut caps = Capabilities::new();
        let (browser_name, options_key) = vendor_capabilities(&config.channel)?;

        let mut args: Vec<&str> = vec!["--no-first-run", "--disable-extensions"];
        if config.headless {
            args.push("--headless");
            args.push("--disable-gpu");
        }

        let mut vendor_opts = HashMap::new();
        vendor_opts.insert("args".to_string(), json!(args));

        caps.insert("browserName".to_string(), json!(browser_name));
        caps.insert(options_key.to_string(), json!(vendor_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&config.webdriver_url)
            .await?;

        Ok(Self { client })
    }

    /// Navigate to `url` and wait for navigation to complete.
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.client.goto(url).await.map_err(anyhow::Error::from)
    }

    /// Apply stored cookies for the current page's host, then reload so the
    /// document is served with the session attached.
    ///
    /// Individual rejected cookies are logged and skipped; replaying a stale
    /// export should not sink the whole extraction.
    pub async fn apply_auth_state(&self, state: &AuthState) -> Result<()> {
        let current = self.client.current_url().await?;
        let Some(host) = current.host_str() else {
            return Ok(());
        };

        let cookies = state.cookies_for_host(host);
        if cookies.is_empty() {
            return Ok(());
        }

        let mut applied = 0usize;
        for cookie in cookies {
            let name = cookie.name().to_string();
            match self.client.add_cookie(cookie).await {
                Ok(()) => applied += 1,
                Err(e) => {
                    tracing::debug!(target: "browser.auth", cookie = %name, error = %e, "cookie rejected")
                }
            }
        }
        tracing::debug!(target: "browser.auth", %host, applied, "auth state applied");

        if applied > 0 {
            self.client.refresh().await?;
        }
        Ok(())
    }

    /// Return the full rendered page HTML (post-script DOM, not the raw
    /// server response).
    pub async fn content(&self) -> Result<String> {
        self.client.source().await.map_err(anyhow::Error::from)
    }

    /// Return the rendered page title.
    pub async fn title(&self) -> Result<String> {
        self.client.title().await.map_err(anyhow::Error::from)
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}

fn vendor_capabilities(channel: &str) -> Result<(&'static str, &'static str)> {
    match channel {
        "chrome" | "chromium" => Ok(("chrome", "goog:chromeOptions")),
        "msedge" | "edge" => Ok(("MicrosoftEdge", "ms:edgeOptions")),
        other => Err(anyhow!("unsupported browser channel: {other}")),
    }
}
