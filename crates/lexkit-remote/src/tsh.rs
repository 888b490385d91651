//! Fetch a tournament director's published files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::http;

/// Download `config.tsh` and `{division}.t` from `base_url` into `dir`,
/// creating it if needed. Returns the written paths.
pub async fn download_tsh_directory(
    client: &reqwest::Client,
    base_url: &str,
    dir: &Path,
    division: &str,
    timeout_secs: u64,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;
    let base = base_url.trim_end_matches('/');
    let mut written = Vec::new();
    for name in ["config.tsh".to_string(), format!("{division}.t")] {
        let url = format!("{base}/{name}");
        info!("downloading {url}");
        let text = http::get_text(client, &url, timeout_secs).await?;
        let path = dir.join(&name);
        std::fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn downloads_both_files() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2024/config.tsh"))
            .respond_with(ResponseTemplate::new(200).set_body_string("config rounds = 7\n"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/2024/a.t"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Ann Lee 1 2; 400;\n"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("tsh");
        let client = http::build_client("lexkit-test", 5).unwrap();
        let base = format!("{}/2024/", server.uri());
        let written = download_tsh_directory(&client, &base, &dest, "a", 5).await.unwrap();
        assert_eq!(written, vec![dest.join("config.tsh"), dest.join("a.t")]);
        assert_eq!(std::fs::read_to_string(dest.join("a.t")).unwrap(), "Ann Lee 1 2; 400;\n");
    }

    #[tokio::test]
    async fn missing_division_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/config.tsh"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let client = http::build_client("lexkit-test", 5).unwrap();
        let err = download_tsh_directory(&client, &server.uri(), dir.path(), "b", 5)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("HTTP 404"));
    }
}
