//! Downloads remote images into temporary files.

use crate::utils::{BlockviewError, Result};
use reqwest::{Client, Url};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

/// Parse `url`, accepting only http and https
pub fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| BlockviewError::invalid_url(format!("{}: {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
        scheme => Err(BlockviewError::invalid_url(format!(
            "{}: unsupported scheme '{}'",
            url, scheme
        ))),
    }
}

/// Whether `source` looks like something to fetch rather than a local path
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// HTTP client shared by every fetch
pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Download `url` into a temporary file, deleted when the returned handle drops
pub async fn fetch_to_tempfile(client: &Client, url: &str) -> Result<NamedTempFile> {
    let parsed = parse_url(url)?;
    log::info!("Fetching {}", parsed);

    let response = client
        .get(parsed.clone())
        .send()
        .await
        .map_err(|e| unreachable_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(BlockviewError::source_not_found(format!("{} ({})", url, status)));
    }

    let bytes = response.bytes().await.map_err(|e| unreachable_error(url, e))?;

    let mut file = tempfile::Builder::new()
        .prefix("blockview-")
        .suffix(&suffix_for(&parsed))
        .tempfile()?;
    file.write_all(&bytes)?;
    file.flush()?;

    log::debug!("Saved {} bytes from {} to {}", bytes.len(), url, file.path().display());
    Ok(file)
}

fn unreachable_error(url: &str, err: reqwest::Error) -> BlockviewError {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        BlockviewError::source_not_found(format!("{}: {}", url, err))
    } else {
        BlockviewError::Http(err)
    }
}

/// Keep the remote extension so the temp file is recognisable
fn suffix_for(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}
