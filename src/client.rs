use crate::config::Config;
use crate::error::ApiError;
use crate::models::{ArtifactKind, ReportContentItem, ReportLogPage};
use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Raw file returned by the artifact endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Name suggested by the server's Content-Disposition header
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// The REST surface the history view needs from the backend.
#[async_trait]
pub trait ReportApi: Send + Sync {
    async fn fetch_logs(
        &self,
        report_id: i64,
        page: u32,
        page_size: u32,
    ) -> Result<ReportLogPage, ApiError>;

    async fn fetch_content(&self, log_id: i64) -> Result<ReportContentItem, ApiError>;

    async fn fetch_artifact(&self, log_id: i64, kind: ArtifactKind) -> Result<Artifact, ApiError>;

    /// Link to an artifact, for display.
    fn artifact_url(&self, log_id: i64, kind: ArtifactKind) -> String;
}

pub struct HttpReportClient {
    client: Client,
    api_root: String,
    access_token: Option<String>,
}

impl HttpReportClient {
    pub fn new(client: Client, base_url: &str, api_prefix: &str, access_token: Option<String>) -> Self {
        Self {
            client,
            api_root: format!("{}{}", base_url.trim_end_matches('/'), api_prefix),
            access_token,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self::new(
            client,
            &config.base_url,
            &config.api_prefix,
            config.access_token.clone(),
        ))
    }

    fn logs_url(&self, report_id: i64, page: u32, page_size: u32) -> String {
        format!(
            "{}/report/{}/logs?page={}&page_size={}",
            self.api_root, report_id, page, page_size
        )
    }

    fn content_url(&self, log_id: i64) -> String {
        format!("{}/report/logs/{}/content", self.api_root, log_id)
    }

    async fn get(&self, url: &str) -> Result<Response, ApiError> {
        debug!("GET {}", url);
        let mut request = self.client.get(url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let bytes = self.get(url).await?.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(format!("{} (url={})", e, url)))
    }
}

#[async_trait]
impl ReportApi for HttpReportClient {
    async fn fetch_logs(
        &self,
        report_id: i64,
        page: u32,
        page_size: u32,
    ) -> Result<ReportLogPage, ApiError> {
        if page_size == 0 {
            return Err(ApiError::InvalidRequest("page_size must be greater than 0".into()));
        }
        self.get_json(&self.logs_url(report_id, page, page_size)).await
    }

    async fn fetch_content(&self, log_id: i64) -> Result<ReportContentItem, ApiError> {
        self.get_json(&self.content_url(log_id)).await
    }

    async fn fetch_artifact(&self, log_id: i64, kind: ArtifactKind) -> Result<Artifact, ApiError> {
        let response = self.get(&self.artifact_url(log_id, kind)).await?;
        let file_name = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition);
        let bytes = response.bytes().await?.to_vec();

        Ok(Artifact { file_name, bytes })
    }

    fn artifact_url(&self, log_id: i64, kind: ArtifactKind) -> String {
        format!(
            "{}/report/logs/{}/file?type={}",
            self.api_root,
            log_id,
            kind.query_value()
        )
    }
}

/// Extract `filename` from a Content-Disposition header value.
pub fn filename_from_disposition(value: &str) -> Option<String> {
    value.split(';').map(str::trim).find_map(|part| {
        let (key, raw) = part.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let name = raw.trim().trim_matches('"');
        (!name.is_empty()).then(|| name.to_string())
    })
}
