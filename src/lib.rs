pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod history;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod paths;
pub mod presentation;
pub mod theme;
pub mod tui;
pub mod ui;

pub use client::{HttpReportClient, ReportApi};
pub use config::Config;
pub use error::{ApiError, HistoryError};
pub use fetcher::Fetcher;
pub use history::{Applied, FetchOutcome, FetchRequest, ReportHistory, View};
pub use models::{ArtifactKind, ExecutionState, ReportContentItem, ReportLogItem, ReportLogPage};
