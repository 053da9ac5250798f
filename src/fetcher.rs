use crate::client::{Artifact, ReportApi};
use crate::history::{FetchOutcome, FetchRequest};
use crate::models::ArtifactKind;
use crate::paths;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Runs fetch requests on the tokio runtime and reports back over a channel.
///
/// The UI loop drains the receiver between frames, so the history state is
/// only ever touched from one place.
pub struct Fetcher {
    api: Arc<dyn ReportApi>,
    download_dir: PathBuf,
    tx: mpsc::UnboundedSender<FetchOutcome>,
}

impl Fetcher {
    pub fn new(
        api: Arc<dyn ReportApi>,
        download_dir: PathBuf,
    ) -> (Self, mpsc::UnboundedReceiver<FetchOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { api, download_dir, tx }, rx)
    }

    /// Link to an artifact, for display.
    pub fn artifact_url(&self, log_id: i64, kind: ArtifactKind) -> String {
        self.api.artifact_url(log_id, kind)
    }

    pub fn dispatch(&self, request: FetchRequest) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let download_dir = self.download_dir.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let outcome = execute(api.as_ref(), &download_dir, request).await;
            // Receiver is gone only when the app is shutting down.
            let _ = tx.send(outcome);
        })
    }
}

/// Perform one request against the API.
pub async fn execute(api: &dyn ReportApi, download_dir: &Path, request: FetchRequest) -> FetchOutcome {
    match request {
        FetchRequest::Logs {
            token,
            report_id,
            page,
            page_size,
        } => FetchOutcome::Logs {
            token,
            result: api.fetch_logs(report_id, page, page_size).await,
        },
        FetchRequest::Content { token, log_id } => FetchOutcome::Content {
            token,
            log_id,
            result: api.fetch_content(log_id).await,
        },
        FetchRequest::Artifact { token, log_id, kind } => FetchOutcome::Artifact {
            token,
            log_id,
            kind,
            result: api.fetch_artifact(log_id, kind).await,
        },
        // Only issued for a download that is still current when its bytes arrive.
        FetchRequest::Save {
            token,
            log_id,
            kind,
            artifact,
        } => FetchOutcome::Saved {
            token,
            kind,
            result: save_artifact(download_dir, log_id, kind, &artifact).await,
        },
    }
}

/// Write an artifact into `dir`, named after the server's suggestion when it has one.
pub async fn save_artifact(
    dir: &Path,
    log_id: i64,
    kind: ArtifactKind,
    artifact: &Artifact,
) -> Result<PathBuf> {
    paths::ensure_dir(dir)?;

    let file_name = artifact
        .file_name
        .as_deref()
        .and_then(paths::sanitize_file_name)
        .unwrap_or_else(|| format!("report-log-{}.{}", log_id, kind.extension()));
    let path = dir.join(file_name);

    tokio::fs::write(&path, &artifact.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}
