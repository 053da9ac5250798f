//! List/detail state of the report history modal.
//!
//! `ReportHistory` never performs I/O. Every user action that needs data
//! returns a [`FetchRequest`]; the caller executes it and feeds the
//! [`FetchOutcome`] back through [`ReportHistory::apply`]. Each request carries
//! a fresh [`RequestToken`], and outcomes whose token is no longer the latest
//! of their kind are dropped, so a slow response never overwrites newer state.

use crate::client::Artifact;
use crate::error::{ApiError, HistoryError};
use crate::models::{ArtifactKind, ReportContentItem, ReportLogItem, ReportLogPage};
use crate::pagination::Pagination;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

pub const LOGS_LOAD_ERROR: &str = "无法加载报告历史记录";
pub const CONTENT_LOAD_ERROR: &str = "无法加载报告内容";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Logs {
        token: RequestToken,
        report_id: i64,
        page: u32,
        page_size: u32,
    },
    Content {
        token: RequestToken,
        log_id: i64,
    },
    Artifact {
        token: RequestToken,
        log_id: i64,
        kind: ArtifactKind,
    },
    /// Write a fetched artifact into the download directory.
    Save {
        token: RequestToken,
        log_id: i64,
        kind: ArtifactKind,
        artifact: Artifact,
    },
}

impl FetchRequest {
    pub fn token(&self) -> RequestToken {
        match self {
            FetchRequest::Logs { token, .. }
            | FetchRequest::Content { token, .. }
            | FetchRequest::Artifact { token, .. }
            | FetchRequest::Save { token, .. } => *token,
        }
    }
}

#[derive(Debug)]
pub enum FetchOutcome {
    Logs {
        token: RequestToken,
        result: Result<ReportLogPage, ApiError>,
    },
    Content {
        token: RequestToken,
        log_id: i64,
        result: Result<ReportContentItem, ApiError>,
    },
    Artifact {
        token: RequestToken,
        log_id: i64,
        kind: ArtifactKind,
        result: Result<Artifact, ApiError>,
    },
    Saved {
        token: RequestToken,
        kind: ArtifactKind,
        result: anyhow::Result<PathBuf>,
    },
}

/// What applying an outcome did, for status reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Stale or post-hide outcome; nothing changed
    Ignored,
    Updated,
    Failed,
    /// The outcome needs a follow-up request before it is complete
    Continue(FetchRequest),
    Downloaded(PathBuf),
    DownloadFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    List,
    Detail(Box<ReportContentItem>),
}

#[derive(Debug)]
pub struct ReportHistory {
    report_id: i64,
    visible: bool,
    logs: Vec<ReportLogItem>,
    pagination: Pagination,
    /// Cursor of the rows in `logs`; restored when a page fetch fails
    shown: Pagination,
    selected: Option<usize>,
    view: View,
    error: Option<String>,
    pending_logs: Option<RequestToken>,
    pending_content: Option<RequestToken>,
    pending_download: Option<RequestToken>,
    last_token: u64,
}

impl ReportHistory {
    pub fn new(report_id: i64, page_size: u32) -> Self {
        Self {
            report_id,
            visible: false,
            logs: Vec::new(),
            pagination: Pagination::new(page_size),
            shown: Pagination::new(page_size),
            selected: None,
            view: View::List,
            error: None,
            pending_logs: None,
            pending_content: None,
            pending_download: None,
            last_token: 0,
        }
    }

    pub fn report_id(&self) -> i64 {
        self.report_id
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn logs(&self) -> &[ReportLogItem] {
        &self.logs
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_log(&self) -> Option<&ReportLogItem> {
        self.selected.and_then(|i| self.logs.get(i))
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn detail(&self) -> Option<&ReportContentItem> {
        match &self.view {
            View::Detail(item) => Some(item),
            View::List => None,
        }
    }

    pub fn is_detail(&self) -> bool {
        matches!(self.view, View::Detail(_))
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_logs.is_some() || self.pending_content.is_some()
    }

    pub fn is_downloading(&self) -> bool {
        self.pending_download.is_some()
    }

    fn issue_token(&mut self) -> RequestToken {
        self.last_token += 1;
        RequestToken(self.last_token)
    }

    fn request_logs(&mut self) -> FetchRequest {
        let token = self.issue_token();
        self.pending_logs = Some(token);
        // A list request means the user moved on from any pending detail.
        self.pending_content = None;
        self.error = None;
        debug!(
            report_id = self.report_id,
            page = self.pagination.page(),
            page_size = self.pagination.page_size(),
            "Requesting report logs"
        );
        FetchRequest::Logs {
            token,
            report_id: self.report_id,
            page: self.pagination.page(),
            page_size: self.pagination.page_size(),
        }
    }

    /// Make the modal visible and load the current page.
    /// Returns None if it is already visible.
    pub fn show(&mut self) -> Option<FetchRequest> {
        if self.visible {
            return None;
        }
        self.visible = true;
        Some(self.request_logs())
    }

    /// Hide the modal. Drops the detail view and every in-flight request;
    /// page and page size are kept for the next `show`.
    pub fn hide(&mut self) {
        self.visible = false;
        self.view = View::List;
        self.pending_logs = None;
        self.pending_content = None;
        self.pending_download = None;
    }

    fn in_list(&self) -> bool {
        self.visible && !self.is_detail()
    }

    /// Re-fetch the current page.
    pub fn reload(&mut self) -> Option<FetchRequest> {
        self.in_list().then(|| self.request_logs())
    }

    /// Jump to a one-based page. Returns None if the page did not change.
    pub fn change_page(&mut self, display_page: u32) -> Option<FetchRequest> {
        if !self.in_list() || !self.pagination.go_to(display_page) {
            return None;
        }
        Some(self.request_logs())
    }

    pub fn next_page(&mut self) -> Option<FetchRequest> {
        if !self.in_list() || !self.pagination.next_page() {
            return None;
        }
        Some(self.request_logs())
    }

    pub fn previous_page(&mut self) -> Option<FetchRequest> {
        if !self.in_list() || !self.pagination.previous_page() {
            return None;
        }
        Some(self.request_logs())
    }

    /// Change the page size; always resets to the first page and re-fetches.
    pub fn change_page_size(&mut self, page_size: u32) -> Option<FetchRequest> {
        if !self.in_list() || !self.pagination.set_page_size(page_size) {
            return None;
        }
        Some(self.request_logs())
    }

    pub fn select_next(&mut self) {
        if let Some(sel) = self.selected {
            if sel < self.logs.len().saturating_sub(1) {
                self.selected = Some(sel + 1);
            }
        } else if !self.logs.is_empty() {
            self.selected = Some(0);
        }
    }

    pub fn select_previous(&mut self) {
        if let Some(sel) = self.selected {
            if sel > 0 {
                self.selected = Some(sel - 1);
            }
        }
    }

    /// Fetch the content of a log on the current page.
    /// Refused for rows without stored content.
    pub fn view_content(&mut self, log_id: i64) -> Result<FetchRequest, HistoryError> {
        let log = self
            .logs
            .iter()
            .find(|l| l.id == log_id)
            .ok_or(HistoryError::UnknownLog(log_id))?;
        if !log.has_content {
            return Err(HistoryError::NoContent(log_id));
        }
        if !self.in_list() {
            return Err(HistoryError::NoSelection);
        }

        let token = self.issue_token();
        self.pending_content = Some(token);
        self.error = None;
        debug!(log_id, "Requesting report content");
        Ok(FetchRequest::Content { token, log_id })
    }

    pub fn view_selected(&mut self) -> Result<FetchRequest, HistoryError> {
        let log_id = self.selected_log().map(|l| l.id).ok_or(HistoryError::NoSelection)?;
        self.view_content(log_id)
    }

    /// Leave the detail view. The list is not re-fetched.
    pub fn back_to_list(&mut self) {
        self.view = View::List;
        self.pending_content = None;
    }

    /// Download an artifact of the run shown in the detail view.
    pub fn download(&mut self, kind: ArtifactKind) -> Result<FetchRequest, HistoryError> {
        let item = self.detail().ok_or(HistoryError::NoSelection)?;
        if item.artifact_path(kind).is_none() {
            return Err(HistoryError::ArtifactMissing(kind));
        }
        let log_id = item.id;

        let token = self.issue_token();
        self.pending_download = Some(token);
        Ok(FetchRequest::Artifact { token, log_id, kind })
    }

    /// Fold a completed request into the state.
    pub fn apply(&mut self, outcome: FetchOutcome) -> Applied {
        match outcome {
            FetchOutcome::Logs { token, result } => {
                if self.pending_logs != Some(token) {
                    debug!(?token, "Dropping stale log page");
                    return Applied::Ignored;
                }
                self.pending_logs = None;
                match result {
                    Ok(page) => {
                        info!(
                            report_id = self.report_id,
                            count = page.count,
                            rows = page.logs.len(),
                            "Loaded report history"
                        );
                        self.logs = page.logs;
                        let clamped = self.pagination.set_count(page.count);
                        self.shown = self.pagination;
                        self.selected = if self.logs.is_empty() { None } else { Some(0) };
                        if clamped {
                            // The total shrank below the requested page.
                            warn!(
                                report_id = self.report_id,
                                page = self.pagination.page(),
                                "Page out of range, reloading last page"
                            );
                            return Applied::Continue(self.request_logs());
                        }
                        Applied::Updated
                    }
                    Err(e) => {
                        error!(report_id = self.report_id, "Failed to load report history: {}", e);
                        self.pagination = self.shown;
                        self.error = Some(LOGS_LOAD_ERROR.to_string());
                        Applied::Failed
                    }
                }
            }
            FetchOutcome::Content { token, log_id, result } => {
                if self.pending_content != Some(token) {
                    debug!(?token, log_id, "Dropping stale report content");
                    return Applied::Ignored;
                }
                self.pending_content = None;
                match result {
                    Ok(item) if item.id == log_id => {
                        self.view = View::Detail(Box::new(item));
                        Applied::Updated
                    }
                    Ok(item) => {
                        warn!(log_id, returned = item.id, "Server returned content for another log");
                        self.error = Some(CONTENT_LOAD_ERROR.to_string());
                        Applied::Failed
                    }
                    Err(e) => {
                        error!(log_id, "Failed to load report content: {}", e);
                        self.error = Some(CONTENT_LOAD_ERROR.to_string());
                        Applied::Failed
                    }
                }
            }
            FetchOutcome::Artifact {
                token,
                log_id,
                kind,
                result,
            } => {
                if self.pending_download != Some(token) {
                    debug!(?token, log_id, "Dropping superseded {} artifact", kind);
                    return Applied::Ignored;
                }
                match result {
                    Ok(artifact) => Applied::Continue(FetchRequest::Save {
                        token,
                        log_id,
                        kind,
                        artifact,
                    }),
                    Err(e) => {
                        self.pending_download = None;
                        error!(log_id, "Failed to download {} artifact: {}", kind, e);
                        Applied::DownloadFailed(format!("{} download failed: {}", kind, e))
                    }
                }
            }
            FetchOutcome::Saved { token, kind, result } => {
                if self.pending_download != Some(token) {
                    return Applied::Ignored;
                }
                self.pending_download = None;
                match result {
                    Ok(path) => {
                        info!("Saved {} artifact to {}", kind, path.display());
                        Applied::Downloaded(path)
                    }
                    Err(e) => {
                        error!("Failed to save {} artifact: {:#}", kind, e);
                        Applied::DownloadFailed(format!("{} download failed: {:#}", kind, e))
                    }
                }
            }
        }
    }
}
