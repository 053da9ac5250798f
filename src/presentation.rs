//! Maps fetched records onto what the modal displays.

use crate::models::{ArtifactKind, ExecutionState, ReportContentItem, ReportLogItem};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// User-facing strings.
pub mod labels {
    pub const TITLE: &str = "报告历史记录";
    pub const COLUMN_EXECUTED_AT: &str = "执行时间";
    pub const COLUMN_STATE: &str = "状态";
    pub const COLUMN_ACTION: &str = "操作";
    pub const VIEW_CONTENT: &str = "查看内容";
    pub const BACK_TO_LIST: &str = "返回列表";
    pub const LOADING: &str = "加载中...";
    pub const DEFAULT_CONTENT_TITLE: &str = "报告内容";
    pub const ERROR: &str = "错误";
    pub const DESCRIPTION: &str = "描述";
    pub const EMPTY_TITLE: &str = "暂无历史报告记录";
    pub const EMPTY_DESCRIPTION: &str = "该报告尚未执行或没有保存历史记录";
}

pub const PLACEHOLDER: &str = "-";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How an empty history page is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyListPolicy {
    /// An illustration with a short explanation
    #[default]
    EmptyState,
    /// The (empty) table with its pagination bar
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateTag {
    Success,
    Error,
    Processing,
    Default,
}

pub fn state_tag(state: &ExecutionState) -> StateTag {
    match state {
        ExecutionState::Success => StateTag::Success,
        ExecutionState::Error => StateTag::Error,
        ExecutionState::Working => StateTag::Processing,
        ExecutionState::Other(_) => StateTag::Default,
    }
}

/// `YYYY-MM-DD HH:mm:ss` in local time, or `-` when there is no value.
///
/// Values with an offset are converted to local time; naive values are taken
/// to be local already. Anything unparseable is shown as received.
pub fn format_timestamp(value: Option<&str>) -> String {
    let raw = match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => return PLACEHOLDER.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(DISPLAY_FORMAT).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return naive.format(DISPLAY_FORMAT).to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return format!("{} 00:00:00", date.format("%Y-%m-%d"));
    }

    raw.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    pub id: i64,
    pub executed_at: String,
    pub state: String,
    pub tag: StateTag,
    /// Whether the view-content action is reachable
    pub can_view: bool,
}

pub fn log_row(log: &ReportLogItem) -> LogRow {
    LogRow {
        id: log.id,
        executed_at: format_timestamp(log.end_dttm.as_deref()),
        state: log.state.to_string(),
        tag: state_tag(&log.state),
        can_view: log.has_content,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListBody {
    EmptyState {
        title: &'static str,
        description: &'static str,
    },
    Table(Vec<LogRow>),
}

pub fn list_body(logs: &[ReportLogItem], policy: EmptyListPolicy) -> ListBody {
    if logs.is_empty() && policy == EmptyListPolicy::EmptyState {
        return ListBody::EmptyState {
            title: labels::EMPTY_TITLE,
            description: labels::EMPTY_DESCRIPTION,
        };
    }
    ListBody::Table(logs.iter().map(log_row).collect())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSection {
    pub kind: ArtifactKind,
    pub heading: &'static str,
    pub action: &'static str,
    /// Key that triggers the download
    pub key: char,
    pub url: String,
}

pub fn artifact_section(kind: ArtifactKind, url: String) -> ArtifactSection {
    let (heading, action, key) = match kind {
        ArtifactKind::Screenshot => ("截图", "下载截图", 's'),
        ArtifactKind::Csv => ("CSV 数据", "下载 CSV", 'c'),
        ArtifactKind::Pdf => ("PDF 报告", "下载 PDF", 'p'),
    };
    ArtifactSection {
        kind,
        heading,
        action,
        key,
        url,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPanel {
    pub title: String,
    pub state: String,
    pub tag: StateTag,
    pub executed_at: String,
    pub error_banner: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    /// Stored metadata could not be read by the server
    pub content_error: Option<String>,
    pub artifacts: Vec<ArtifactSection>,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

pub fn detail_panel<F>(item: &ReportContentItem, artifact_url: F) -> DetailPanel
where
    F: Fn(i64, ArtifactKind) -> String,
{
    let content = item.content.as_ref();

    DetailPanel {
        title: non_empty(content.and_then(|c| c.name.as_ref()))
            .unwrap_or_else(|| labels::DEFAULT_CONTENT_TITLE.to_string()),
        state: item.state.to_string(),
        tag: state_tag(&item.state),
        executed_at: format_timestamp(item.end_dttm.as_deref()),
        error_banner: non_empty(item.error_message.as_ref()),
        description: non_empty(content.and_then(|c| c.description.as_ref())),
        link: non_empty(content.and_then(|c| c.url.as_ref())),
        content_error: non_empty(content.and_then(|c| c.error.as_ref())),
        artifacts: item
            .available_artifacts()
            .into_iter()
            .map(|kind| artifact_section(kind, artifact_url(item.id, kind)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportContent;
    use chrono::TimeZone;

    fn item() -> ReportContentItem {
        ReportContentItem {
            id: 8,
            uuid: None,
            content: None,
            screenshot_path: None,
            csv_path: None,
            pdf_path: None,
            scheduled_dttm: None,
            start_dttm: None,
            end_dttm: None,
            state: ExecutionState::Success,
            error_message: None,
        }
    }

    fn url(id: i64, kind: ArtifactKind) -> String {
        format!("/api/v1/report/logs/{}/file?type={}", id, kind.query_value())
    }

    #[test]
    fn test_state_tags() {
        assert_eq!(state_tag(&"SUCCESS".to_string().into()), StateTag::Success);
        assert_eq!(state_tag(&"ERROR".to_string().into()), StateTag::Error);
        assert_eq!(state_tag(&"WORKING".to_string().into()), StateTag::Processing);
        for other in ["NOOP", "GRACE", "success", ""] {
            assert_eq!(state_tag(&other.to_string().into()), StateTag::Default);
        }
    }

    #[test]
    fn test_missing_timestamp_is_placeholder() {
        assert_eq!(format_timestamp(None), "-");
        assert_eq!(format_timestamp(Some("")), "-");
        assert_eq!(format_timestamp(Some("   ")), "-");
    }

    #[test]
    fn test_naive_timestamps_keep_wall_clock() {
        assert_eq!(format_timestamp(Some("2024-05-01T08:03:09")), "2024-05-01 08:03:09");
        assert_eq!(
            format_timestamp(Some("2024-05-01T08:03:09.123456")),
            "2024-05-01 08:03:09"
        );
        assert_eq!(format_timestamp(Some("2024-05-01")), "2024-05-01 00:00:00");
    }

    #[test]
    fn test_offset_timestamps_convert_to_local() {
        let expected = chrono::Utc
            .with_ymd_and_hms(2024, 5, 1, 8, 3, 9)
            .unwrap()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        assert_eq!(format_timestamp(Some("2024-05-01T08:03:09+00:00")), expected);
        assert_eq!(format_timestamp(Some("2024-05-01T08:03:09Z")), expected);
    }

    #[test]
    fn test_unparseable_timestamp_shown_verbatim() {
        assert_eq!(format_timestamp(Some("yesterday")), "yesterday");
    }

    #[test]
    fn test_row_disables_action_without_content() {
        let log = ReportLogItem {
            id: 4,
            scheduled_dttm: None,
            start_dttm: None,
            end_dttm: None,
            state: ExecutionState::Working,
            error_message: None,
            has_content: false,
        };
        let row = log_row(&log);
        assert!(!row.can_view);
        assert_eq!(row.executed_at, "-");
        assert_eq!(row.tag, StateTag::Processing);
        assert_eq!(row.state, "WORKING");
    }

    #[test]
    fn test_empty_list_follows_policy() {
        assert!(matches!(
            list_body(&[], EmptyListPolicy::EmptyState),
            ListBody::EmptyState { title: labels::EMPTY_TITLE, .. }
        ));
        assert_eq!(list_body(&[], EmptyListPolicy::Table), ListBody::Table(vec![]));
    }

    #[test]
    fn test_csv_only_detail() {
        let mut item = item();
        item.csv_path = Some("/data/8.csv".to_string());
        let panel = detail_panel(&item, url);
        assert_eq!(panel.artifacts.len(), 1);
        assert_eq!(panel.artifacts[0].kind, ArtifactKind::Csv);
        assert_eq!(panel.artifacts[0].action, "下载 CSV");
        assert_eq!(panel.artifacts[0].url, "/api/v1/report/logs/8/file?type=csv");
        assert!(panel.error_banner.is_none());
        assert!(panel.description.is_none());
    }

    #[test]
    fn test_detail_title_and_sections() {
        let mut item = item();
        item.content = Some(ReportContent {
            name: Some("Weekly sales".to_string()),
            description: Some("All regions".to_string()),
            url: None,
            error: None,
        });
        item.error_message = Some("Partial data".to_string());
        item.screenshot_path = Some("/s.png".to_string());
        item.pdf_path = Some("/r.pdf".to_string());

        let panel = detail_panel(&item, url);
        assert_eq!(panel.title, "Weekly sales");
        assert_eq!(panel.error_banner.as_deref(), Some("Partial data"));
        assert_eq!(panel.description.as_deref(), Some("All regions"));
        let kinds: Vec<_> = panel.artifacts.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![ArtifactKind::Screenshot, ArtifactKind::Pdf]);
    }

    #[test]
    fn test_detail_title_falls_back() {
        let panel = detail_panel(&item(), url);
        assert_eq!(panel.title, labels::DEFAULT_CONTENT_TITLE);
        assert!(panel.artifacts.is_empty());
    }
}
