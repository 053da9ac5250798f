use crate::error::HistoryError;
use crate::history::{FetchRequest, ReportHistory};
use crate::models::ArtifactKind;
use crate::pagination::step_page_size;
use crate::presentation::{self, labels, DetailPanel, EmptyListPolicy, ListBody, LogRow};
use crate::theme::Theme;
use crate::ui::GridLayout;
use crossterm::event::KeyCode;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};

const LIST_HINTS: &str = "↑↓/jk: row  Enter: view  ←→/hl: page  +/-: size  r: reload  Esc/q: close";
const DETAIL_HINTS: &str = "Esc/b: back  s/c/p: download  q: close";

/// What the app has to do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum ModalAction {
    None,
    Fetch(FetchRequest),
    Hidden,
    Refused(HistoryError),
}

impl From<Result<FetchRequest, HistoryError>> for ModalAction {
    fn from(result: Result<FetchRequest, HistoryError>) -> Self {
        match result {
            Ok(request) => ModalAction::Fetch(request),
            Err(e) => ModalAction::Refused(e),
        }
    }
}

/// The report history modal: key handling and drawing around a `ReportHistory`.
#[derive(Debug)]
pub struct HistoryModal {
    history: ReportHistory,
    empty_list: EmptyListPolicy,
    page_size_options: Vec<u32>,
}

impl HistoryModal {
    pub fn new(history: ReportHistory, empty_list: EmptyListPolicy, page_size_options: Vec<u32>) -> Self {
        Self {
            history,
            empty_list,
            page_size_options,
        }
    }

    pub fn history(&self) -> &ReportHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut ReportHistory {
        &mut self.history
    }

    pub fn hints(&self) -> &'static str {
        if self.history.is_detail() {
            DETAIL_HINTS
        } else {
            LIST_HINTS
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> ModalAction {
        if !self.history.is_visible() {
            return ModalAction::None;
        }
        if self.history.is_detail() {
            self.handle_detail_key(key)
        } else {
            self.handle_list_key(key)
        }
    }

    fn handle_list_key(&mut self, key: KeyCode) -> ModalAction {
        let request = match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.history.select_previous();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.history.select_next();
                None
            }
            KeyCode::Enter | KeyCode::Char('v') => return self.history.view_selected().into(),
            KeyCode::Left | KeyCode::Char('h') => self.history.previous_page(),
            KeyCode::Right | KeyCode::Char('l') => self.history.next_page(),
            KeyCode::Home | KeyCode::Char('g') => self.history.change_page(1),
            KeyCode::End | KeyCode::Char('G') => {
                let last = self.history.pagination().page_count();
                self.history.change_page(last)
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.step_page_size(true),
            KeyCode::Char('-') => self.step_page_size(false),
            KeyCode::Char('r') => self.history.reload(),
            KeyCode::Esc | KeyCode::Char('q') => {
                self.history.hide();
                return ModalAction::Hidden;
            }
            _ => None,
        };
        request.map_or(ModalAction::None, ModalAction::Fetch)
    }

    fn handle_detail_key(&mut self, key: KeyCode) -> ModalAction {
        match key {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                self.history.back_to_list();
                ModalAction::None
            }
            KeyCode::Char('s') => self.history.download(ArtifactKind::Screenshot).into(),
            KeyCode::Char('c') => self.history.download(ArtifactKind::Csv).into(),
            KeyCode::Char('p') => self.history.download(ArtifactKind::Pdf).into(),
            KeyCode::Char('q') => {
                self.history.hide();
                ModalAction::Hidden
            }
            _ => ModalAction::None,
        }
    }

    fn step_page_size(&mut self, larger: bool) -> Option<FetchRequest> {
        let current = self.history.pagination().page_size();
        let next = step_page_size(&self.page_size_options, current, larger);
        if next == current {
            return None;
        }
        self.history.change_page_size(next)
    }

    pub fn render<F>(&self, theme: &Theme, frame: &mut Frame, area: Rect, artifact_url: F)
    where
        F: Fn(i64, ArtifactKind) -> String,
    {
        let modal = GridLayout::modal_area(area);
        frame.render_widget(Clear, modal);

        let mut title = format!(" {} · #{} ", labels::TITLE, self.history.report_id());
        if self.history.is_loading() {
            title.push_str(labels::LOADING);
            title.push(' ');
        }
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .style(theme.modal_style());
        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        match self.history.detail() {
            Some(item) => {
                let panel = presentation::detail_panel(item, &artifact_url);
                self.render_detail(theme, frame, inner, &panel);
            }
            None => self.render_list(theme, frame, inner),
        }
    }

    fn render_error(&self, theme: &Theme, frame: &mut Frame, area: Rect) {
        if let Some(error) = self.history.error() {
            let banner = Paragraph::new(format!("⚠ {}", error))
                .style(theme.error_style().add_modifier(Modifier::BOLD));
            frame.render_widget(banner, area);
        }
    }

    fn render_list(&self, theme: &Theme, frame: &mut Frame, area: Rect) {
        let body = presentation::list_body(self.history.logs(), self.empty_list);
        let banner_lines = u16::from(self.history.error().is_some());
        let with_pager = matches!(body, ListBody::Table(_));
        let (banner, body_area, pager) = GridLayout::modal_sections(area, banner_lines, with_pager);

        self.render_error(theme, frame, banner);

        match body {
            ListBody::EmptyState { title, description } => {
                let lines = vec![
                    Line::from(""),
                    Line::from("╭───────╮"),
                    Line::from("│   ∅   │"),
                    Line::from("╰───────╯"),
                    Line::from(""),
                    Line::from(Span::styled(title, theme.primary_style().add_modifier(Modifier::BOLD))),
                    Line::from(Span::styled(description, theme.secondary_style())),
                ];
                let para = Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .style(theme.dim_style());
                frame.render_widget(para, body_area);
            }
            ListBody::Table(rows) => {
                self.render_table(theme, frame, body_area, &rows);
                self.render_pager(theme, frame, pager);
            }
        }
    }

    fn render_table(&self, theme: &Theme, frame: &mut Frame, area: Rect, rows: &[LogRow]) {
        let header = Row::new(vec![
            labels::COLUMN_EXECUTED_AT,
            labels::COLUMN_STATE,
            labels::COLUMN_ACTION,
        ])
        .style(theme.primary_style().add_modifier(Modifier::BOLD));

        let table_rows = rows.iter().map(|row| {
            let action_style = if row.can_view {
                theme.primary_style().add_modifier(Modifier::UNDERLINED)
            } else {
                theme.dim_style()
            };
            Row::new(vec![
                Cell::from(row.executed_at.clone()),
                Cell::from(row.state.clone()).style(theme.tag_style(row.tag)),
                Cell::from(labels::VIEW_CONTENT).style(action_style),
            ])
        });

        let table = Table::new(
            table_rows,
            [Constraint::Length(21), Constraint::Length(12), Constraint::Min(10)],
        )
        .header(header)
        .highlight_style(theme.highlight_style())
        .highlight_symbol("▶ ");

        let mut state = TableState::default();
        state.select(self.history.selected());
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_pager(&self, theme: &Theme, frame: &mut Frame, area: Rect) {
        let pagination = self.history.pagination();
        let line = Line::from(vec![
            Span::styled(format!("‹ {} ›", pagination.position_label()), theme.primary_style()),
            Span::styled(" │ ", theme.border_style()),
            Span::styled(format!("{} 条/页", pagination.page_size()), theme.secondary_style()),
            Span::styled(" │ ", theme.border_style()),
            Span::styled(pagination.total_label(), theme.secondary_style()),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Right), area);
    }

    fn render_detail(&self, theme: &Theme, frame: &mut Frame, area: Rect, panel: &DetailPanel) {
        let banner_lines = u16::from(self.history.error().is_some());
        let (banner, body_area, _) = GridLayout::modal_sections(area, banner_lines, false);
        self.render_error(theme, frame, banner);

        let bold = theme.primary_style().add_modifier(Modifier::BOLD);
        let mut lines = vec![
            Line::from(Span::styled(format!("[Esc] {}", labels::BACK_TO_LIST), theme.dim_style())),
            Line::from(""),
            Line::from(Span::styled(panel.title.clone(), bold)),
            Line::from(vec![
                Span::styled(panel.state.clone(), theme.tag_style(panel.tag)),
                Span::raw("  "),
                Span::styled(panel.executed_at.clone(), theme.secondary_style()),
            ]),
        ];

        if let Some(message) = &panel.error_banner {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", labels::ERROR), theme.error_style().add_modifier(Modifier::BOLD)),
                Span::styled(message.clone(), theme.error_style()),
            ]));
        }
        if let Some(message) = &panel.content_error {
            lines.push(Line::from(Span::styled(message.clone(), theme.warning_style())));
        }
        if let Some(description) = &panel.description {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", labels::DESCRIPTION), bold),
                Span::styled(description.clone(), theme.primary_style()),
            ]));
        }
        if let Some(link) = &panel.link {
            lines.push(Line::from(Span::styled(link.clone(), theme.secondary_style())));
        }

        for section in &panel.artifacts {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(section.heading, bold)));
            lines.push(Line::from(vec![
                Span::styled(format!("  [{}] {}  ", section.key, section.action), theme.highlight_style()),
                Span::styled(format!("  {}", section.url), theme.dim_style()),
            ]));
        }

        let para = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(para, body_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{FetchOutcome, RequestToken};
    use crate::models::{ExecutionState, ReportContentItem, ReportLogItem, ReportLogPage};
    use ratatui::backend::TestBackend;

    fn token(request: &FetchRequest) -> RequestToken {
        request.token()
    }

    fn log(id: i64, state: &str, has_content: bool) -> ReportLogItem {
        ReportLogItem {
            id,
            scheduled_dttm: None,
            start_dttm: None,
            end_dttm: Some("2024-05-01T08:00:00".into()),
            state: state.to_string().into(),
            error_message: None,
            has_content,
        }
    }

    fn modal(logs: Vec<ReportLogItem>, count: u64, policy: EmptyListPolicy) -> HistoryModal {
        let mut history = ReportHistory::new(12, 10);
        let request = history.show().unwrap();
        history.apply(FetchOutcome::Logs {
            token: token(&request),
            result: Ok(ReportLogPage { logs, count }),
        });
        HistoryModal::new(history, policy, vec![10, 20, 50, 100])
    }

    fn csv_item(id: i64) -> ReportContentItem {
        ReportContentItem {
            id,
            uuid: None,
            content: None,
            screenshot_path: None,
            csv_path: Some("/data/out.csv".into()),
            pdf_path: None,
            scheduled_dttm: None,
            start_dttm: None,
            end_dttm: None,
            state: ExecutionState::Success,
            error_message: None,
        }
    }

    fn url(id: i64, kind: ArtifactKind) -> String {
        format!("http://bi/api/v1/report/logs/{}/file?type={}", id, kind.query_value())
    }

    fn render_to_string(modal: &HistoryModal) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|f| {
                let area = f.size();
                modal.render(&theme, f, area, url)
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn open_detail(modal: &mut HistoryModal) {
        let ModalAction::Fetch(request) = modal.handle_key(KeyCode::Enter) else {
            panic!("expected a content request");
        };
        let log_id = match request {
            FetchRequest::Content { log_id, .. } => log_id,
            other => panic!("unexpected request {:?}", other),
        };
        modal.history_mut().apply(FetchOutcome::Content {
            token: token(&request),
            log_id,
            result: Ok(csv_item(log_id)),
        });
    }

    #[test]
    fn test_enter_on_row_without_content_is_refused() {
        let mut m = modal(vec![log(1, "SUCCESS", false)], 1, EmptyListPolicy::EmptyState);
        assert_eq!(
            m.handle_key(KeyCode::Enter),
            ModalAction::Refused(HistoryError::NoContent(1))
        );
    }

    #[test]
    fn test_page_keys_issue_requests() {
        let mut m = modal(vec![log(1, "SUCCESS", true)], 45, EmptyListPolicy::EmptyState);
        assert!(matches!(
            m.handle_key(KeyCode::Right),
            ModalAction::Fetch(FetchRequest::Logs { page: 1, .. })
        ));
        assert!(matches!(
            m.handle_key(KeyCode::End),
            ModalAction::Fetch(FetchRequest::Logs { page: 4, .. })
        ));
        assert!(matches!(
            m.handle_key(KeyCode::Char('+')),
            ModalAction::Fetch(FetchRequest::Logs { page: 0, page_size: 20, .. })
        ));
        assert_eq!(m.handle_key(KeyCode::Left), ModalAction::None);
    }

    #[test]
    fn test_escape_walks_back_then_hides() {
        let mut m = modal(vec![log(3, "SUCCESS", true)], 1, EmptyListPolicy::EmptyState);
        open_detail(&mut m);
        assert!(m.history().is_detail());
        assert_eq!(m.hints(), DETAIL_HINTS);

        assert_eq!(m.handle_key(KeyCode::Esc), ModalAction::None);
        assert!(!m.history().is_detail());
        assert_eq!(m.handle_key(KeyCode::Esc), ModalAction::Hidden);
        assert!(!m.history().is_visible());
        assert_eq!(m.handle_key(KeyCode::Enter), ModalAction::None);
    }

    #[test]
    fn test_detail_download_keys() {
        let mut m = modal(vec![log(3, "SUCCESS", true)], 1, EmptyListPolicy::EmptyState);
        open_detail(&mut m);
        assert!(matches!(
            m.handle_key(KeyCode::Char('c')),
            ModalAction::Fetch(FetchRequest::Artifact { log_id: 3, kind: ArtifactKind::Csv, .. })
        ));
        assert_eq!(
            m.handle_key(KeyCode::Char('p')),
            ModalAction::Refused(HistoryError::ArtifactMissing(ArtifactKind::Pdf))
        );
    }

    #[test]
    fn test_render_table_with_pager() {
        let m = modal(
            vec![log(1, "SUCCESS", true), log(2, "WORKING", false)],
            25,
            EmptyListPolicy::EmptyState,
        );
        let screen = render_to_string(&m);
        assert!(screen.contains("SUCCESS"));
        assert!(screen.contains("WORKING"));
        assert!(screen.contains("2024-05-01 08:00:00"));
        assert!(screen.contains("1/3"));
    }

    #[test]
    fn test_render_empty_table_policy_shows_pager() {
        let m = modal(vec![], 0, EmptyListPolicy::Table);
        let screen = render_to_string(&m);
        assert!(screen.contains("1/1"));
        assert!(!screen.contains("∅"));
    }

    #[test]
    fn test_render_empty_state_policy_hides_pager() {
        let m = modal(vec![], 0, EmptyListPolicy::EmptyState);
        let screen = render_to_string(&m);
        assert!(screen.contains("∅"));
        assert!(!screen.contains("1/1"));
    }

    #[test]
    fn test_render_csv_only_detail() {
        let mut m = modal(vec![log(3, "SUCCESS", true)], 1, EmptyListPolicy::EmptyState);
        open_detail(&mut m);
        let screen = render_to_string(&m);
        assert!(screen.contains("[c]"));
        assert!(!screen.contains("[s]"));
        assert!(!screen.contains("[p]"));
        assert!(screen.contains("type=csv"));
    }
}
