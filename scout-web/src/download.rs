//! Plain HTTP file download.

use scout_http::{HttpClient, RequestOpts};
use std::path::{Path, PathBuf};

/// Fetch `url` and write the exact response bytes to `dest`.
///
/// `dest` may be an existing directory, in which case the file name is
/// derived from the URL's final path segment. Any failure (transport,
/// non-success status, filesystem) is logged and reported as `None` — it
/// never propagates past this boundary. No partial-file cleanup happens on
/// failure; callers must assume an incomplete or absent file.
pub async fn download_file(url: &str, dest: &Path) -> Option<PathBuf> {
    match try_download(url, dest).await {
        Ok(path) => {
            tracing::info!(target: "web.download", %url, path = %path.display(), "file downloaded");
            Some(path)
        }
        Err(e) => {
            tracing::error!(target: "web.download", %url, error = %e, "download failed");
            None
        }
    }
}

async fn try_download(url: &str, dest: &Path) -> anyhow::Result<PathBuf> {
    let client = HttpClient::new(url)?;
    let bytes = client
        .get_bytes(
            url,
            RequestOpts {
                allow_absolute: true,
                // Single attempt; a failed download is reported, not retried.
                retries: Some(0),
                ..Default::default()
            },
        )
        .await?;

    let path = resolve_destination(url, dest);
    tokio::fs::write(&path, &bytes).await?;
    Ok(path)
}

/// Turn a directory destination into a concrete file path using the URL's
/// final path segment; full-path destinations pass through.
fn resolve_destination(url: &str, dest: &Path) -> PathBuf {
    if !dest.is_dir() {
        return dest.to_path_buf();
    }
    let name = url::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|segments| segments.rev().find(|s| !s.is_empty()).map(String::from))
        })
        .unwrap_or_else(|| "download".to_string());
    dest.join(name)
}
