//! Shared HTTP plumbing.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

use crate::error::RemoteError;

/// Build a client that sends `user_agent` and accepts JSON.
pub fn build_client(user_agent: &str, timeout_secs: u64) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    reqwest::Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("failed to build HTTP client")
}

/// GET `url` and return the body bytes, mapping failures to [`RemoteError`].
pub async fn get_bytes(
    client: &reqwest::Client,
    url: &str,
    timeout_secs: u64,
) -> Result<Vec<u8>, RemoteError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| RemoteError::from_transport(e, timeout_secs))?;
    let status = response.status();
    if !status.is_success() {
        return Err(RemoteError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    let body = response
        .bytes()
        .await
        .map_err(|e| RemoteError::from_transport(e, timeout_secs))?;
    Ok(body.to_vec())
}

/// GET `url` and decode the body as UTF-8 text.
pub async fn get_text(
    client: &reqwest::Client,
    url: &str,
    timeout_secs: u64,
) -> Result<String, RemoteError> {
    let bytes = get_bytes(client, url, timeout_secs).await?;
    String::from_utf8(bytes).map_err(|e| RemoteError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// GET `url` and decode the body as JSON.
pub async fn get_json<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    timeout_secs: u64,
) -> Result<T, RemoteError> {
    let bytes = get_bytes(client, url, timeout_secs).await?;
    serde_json::from_slice(&bytes).map_err(|e| RemoteError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}
