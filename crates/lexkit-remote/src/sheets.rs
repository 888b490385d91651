//! Spreadsheet TSV export.

use anyhow::Result;
use tracing::{info, instrument};

use crate::config::SheetsConfig;
use crate::error::RemoteError;
use crate::http;

const TIMEOUT_SECS: u64 = 60;

pub struct SheetsClient {
    base_url: String,
    client: reqwest::Client,
}

impl SheetsClient {
    pub fn new(config: &SheetsConfig, user_agent: &str) -> Result<Self> {
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: http::build_client(user_agent, TIMEOUT_SECS)?,
        })
    }

    /// Download a sheet as tab-separated text.
    #[instrument(skip(self))]
    pub async fn export_tsv(&self, sheet_id: &str) -> Result<String, RemoteError> {
        let url = format!("{}/spreadsheets/d/{sheet_id}/export?format=tsv", self.base_url);
        info!("downloading sheet from {url}");
        http::get_text(&self.client, &url, TIMEOUT_SECS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SheetsClient {
        let config = SheetsConfig {
            base_url: server.uri(),
        };
        SheetsClient::new(&config, "lexkit-test").unwrap()
    }

    #[tokio::test]
    async fn exports_tsv() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/spreadsheets/d/abc123/export"))
            .and(query_param("format", "tsv"))
            .respond_with(ResponseTemplate::new(200).set_body_string("QI\tQ\tI\n"))
            .mount(&server)
            .await;
        let tsv = client_for(&server).export_tsv("abc123").await.unwrap();
        assert_eq!(tsv, "QI\tQ\tI\n");
    }

    #[tokio::test]
    async fn non_success_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let err = client_for(&server).export_tsv("missing").await.unwrap_err();
        assert!(matches!(err, RemoteError::Http { status: 404, .. }));
    }
}
