//! Wire types for the report history endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Execution state of one report run.
///
/// The backend sends a bare string. Values other than the three the UI
/// distinguishes are kept verbatim so they can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExecutionState {
    Success,
    Error,
    Working,
    Other(String),
}

impl ExecutionState {
    pub fn as_str(&self) -> &str {
        match self {
            ExecutionState::Success => "SUCCESS",
            ExecutionState::Error => "ERROR",
            ExecutionState::Working => "WORKING",
            ExecutionState::Other(raw) => raw,
        }
    }
}

impl From<String> for ExecutionState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "SUCCESS" => ExecutionState::Success,
            "ERROR" => ExecutionState::Error,
            "WORKING" => ExecutionState::Working,
            _ => ExecutionState::Other(raw),
        }
    }
}

impl From<ExecutionState> for String {
    fn from(state: ExecutionState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded execution attempt of a scheduled report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLogItem {
    pub id: i64,
    #[serde(default)]
    pub scheduled_dttm: Option<String>,
    #[serde(default)]
    pub start_dttm: Option<String>,
    #[serde(default)]
    pub end_dttm: Option<String>,
    pub state: ExecutionState,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub has_content: bool,
}

/// Body of `GET /report/{id}/logs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLogPage {
    pub logs: Vec<ReportLogItem>,
    pub count: u64,
}

/// Metadata stored alongside a run's output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportContent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Set by the server when the stored metadata could not be parsed.
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `GET /report/logs/{id}/content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportContentItem {
    pub id: i64,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default, deserialize_with = "lenient_content")]
    pub content: Option<ReportContent>,
    #[serde(default)]
    pub screenshot_path: Option<String>,
    #[serde(default)]
    pub csv_path: Option<String>,
    #[serde(default)]
    pub pdf_path: Option<String>,
    #[serde(default)]
    pub scheduled_dttm: Option<String>,
    #[serde(default)]
    pub start_dttm: Option<String>,
    #[serde(default)]
    pub end_dttm: Option<String>,
    pub state: ExecutionState,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ReportContentItem {
    /// Stored path for an artifact kind, if the run produced one.
    pub fn artifact_path(&self, kind: ArtifactKind) -> Option<&str> {
        let path = match kind {
            ArtifactKind::Screenshot => &self.screenshot_path,
            ArtifactKind::Csv => &self.csv_path,
            ArtifactKind::Pdf => &self.pdf_path,
        };
        path.as_deref().filter(|p| !p.is_empty())
    }

    pub fn available_artifacts(&self) -> Vec<ArtifactKind> {
        ArtifactKind::ALL
            .into_iter()
            .filter(|&kind| self.artifact_path(kind).is_some())
            .collect()
    }
}

// Content is free-form JSON on the server; anything that isn't an object we
// understand is dropped rather than failing the whole response.
fn lenient_content<'de, D>(deserializer: D) -> Result<Option<ReportContent>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Files a run can produce, served by `GET /report/logs/{id}/file?type=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Screenshot,
    Csv,
    Pdf,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [ArtifactKind::Screenshot, ArtifactKind::Csv, ArtifactKind::Pdf];

    /// Value of the `type` query parameter.
    pub fn query_value(self) -> &'static str {
        match self {
            ArtifactKind::Screenshot => "screenshot",
            ArtifactKind::Csv => "csv",
            ArtifactKind::Pdf => "pdf",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Screenshot => "png",
            ArtifactKind::Csv => "csv",
            ArtifactKind::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_page() {
        let json = r#"{
            "logs": [
                {"id": 7, "scheduled_dttm": "2024-05-01T08:00:00", "start_dttm": "2024-05-01T08:00:01",
                 "end_dttm": "2024-05-01T08:00:09", "state": "SUCCESS", "error_message": null, "has_content": true},
                {"id": 6, "scheduled_dttm": "2024-04-30T08:00:00", "start_dttm": null,
                 "end_dttm": null, "state": "NOOP", "error_message": null, "has_content": false}
            ],
            "count": 42
        }"#;
        let page: ReportLogPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.count, 42);
        assert_eq!(page.logs[0].state, ExecutionState::Success);
        assert!(page.logs[0].has_content);
        assert_eq!(page.logs[1].state, ExecutionState::Other("NOOP".to_string()));
        assert!(page.logs[1].end_dttm.is_none());
    }

    #[test]
    fn test_parse_content_with_unparseable_metadata() {
        let json = r#"{"id": 3, "state": "ERROR", "content": {"error": "无法解析报告内容"},
                       "error_message": "timeout"}"#;
        let item: ReportContentItem = serde_json::from_str(json).unwrap();
        let content = item.content.unwrap();
        assert!(content.name.is_none());
        assert_eq!(content.error.as_deref(), Some("无法解析报告内容"));
        assert_eq!(item.error_message.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_non_object_content_is_dropped() {
        let json = r#"{"id": 3, "state": "SUCCESS", "content": "plain text"}"#;
        let item: ReportContentItem = serde_json::from_str(json).unwrap();
        assert!(item.content.is_none());
    }

    #[test]
    fn test_available_artifacts_skips_empty_paths() {
        let json = r#"{"id": 9, "state": "SUCCESS", "csv_path": "/data/9.csv", "pdf_path": ""}"#;
        let item: ReportContentItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.available_artifacts(), vec![ArtifactKind::Csv]);
    }

    #[test]
    fn test_execution_state_serializes_raw_value() {
        let json = serde_json::to_string(&ExecutionState::Other("GRACE".into())).unwrap();
        assert_eq!(json, "\"GRACE\"");
        assert_eq!(ExecutionState::Working.to_string(), "WORKING");
    }
}
