use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, poll, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph},
};
use report_history::*;
use report_history::cli::Cli;
use report_history::history::Applied;
use report_history::tui::{HistoryModal, ModalAction};
use report_history::ui::{Footer, FooterStatus, GridLayout, Header};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

const TICK: Duration = Duration::from_millis(100);

enum AppState {
    Browsing,
    Closed,
}

struct App {
    state: AppState,
    modal: HistoryModal,
    fetcher: Fetcher,
    theme: theme::Theme,
    footer: Footer,
}

impl App {
    fn new(config: &Config, report_id: i64, fetcher: Fetcher) -> Self {
        let history = ReportHistory::new(report_id, config.pagination.default_page_size);
        let modal = HistoryModal::new(
            history,
            config.display.empty_list,
            config.pagination.page_size_options.clone(),
        );

        Self {
            state: AppState::Closed,
            modal,
            fetcher,
            theme: theme::Theme::from_env(),
            footer: Footer::new(),
        }
    }

    fn open(&mut self) {
        if let Some(request) = self.modal.history_mut().show() {
            self.fetcher.dispatch(request);
        }
        self.state = AppState::Browsing;
    }

    /// Returns false when the app should quit.
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Closed => match key {
                KeyCode::Enter | KeyCode::Char('o') => self.open(),
                KeyCode::Esc | KeyCode::Char('q') => return false,
                _ => {}
            },
            AppState::Browsing => match self.modal.handle_key(key) {
                ModalAction::Fetch(request) => {
                    if let FetchRequest::Artifact { kind, .. } = &request {
                        self.footer
                            .set_status(FooterStatus::Processing(format!("Downloading {}...", kind)));
                    }
                    self.fetcher.dispatch(request);
                }
                ModalAction::Hidden => {
                    self.state = AppState::Closed;
                    self.footer.set_status(FooterStatus::Ready);
                }
                ModalAction::Refused(e) => self.footer.set_status(FooterStatus::Error(e.to_string())),
                ModalAction::None => {}
            },
        }
        true
    }

    fn apply(&mut self, outcome: FetchOutcome) {
        match self.modal.history_mut().apply(outcome) {
            Applied::Downloaded(path) => self
                .footer
                .set_status(FooterStatus::Success(format!("Saved {}", path.display()))),
            Applied::DownloadFailed(message) => self.footer.set_status(FooterStatus::Error(message)),
            Applied::Continue(request) => {
                self.fetcher.dispatch(request);
            }
            Applied::Updated | Applied::Failed | Applied::Ignored => {}
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let bg_block = Block::default().style(Style::default().bg(self.theme.bg()));
        frame.render_widget(bg_block, frame.size());

        let (header_area, content_area, footer_area) = GridLayout::main_layout(frame.size());
        let report_id = self.modal.history().report_id();

        Header::new(format!("Report #{}", report_id))
            .with_hint("Scheduled report history")
            .render(&self.theme, header_area, frame);

        match self.state {
            AppState::Browsing => {
                let fetcher = &self.fetcher;
                self.modal.render(&self.theme, frame, content_area, |log_id, kind| {
                    fetcher.artifact_url(log_id, kind)
                });
                self.footer
                    .render(&self.theme, self.modal.hints(), footer_area, frame);
            }
            AppState::Closed => {
                let text = format!("History of report #{} is closed.\n\n[Enter/o] Reopen   [q] Quit", report_id);
                let para = Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .style(self.theme.dim_style());
                frame.render_widget(para, GridLayout::centered_dialog(content_area, 60, 3));
                self.footer.render(&self.theme, "Enter/o: reopen  q: quit", footer_area, frame);
            }
        }
    }
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    outcomes: &mut mpsc::UnboundedReceiver<FetchOutcome>,
) -> Result<()> {
    loop {
        while let Ok(outcome) = outcomes.try_recv() {
            app.apply(outcome);
        }

        terminal.draw(|f| app.render(f))?;

        // Poll with a timeout so finished fetches are picked up without a keypress.
        if poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !app.handle_key(key.code) {
                    return Ok(());
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = logging::init_logging().context("Failed to initialize logging")?;
    paths::ensure_data_dir()?;

    info!("Starting reporthist for report {}", cli.report_id);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let mut config = config.with_overrides(cli.base_url, cli.token, cli.page_size);
    config.validate()?;

    let api = HttpReportClient::from_config(&config).context("Failed to build HTTP client")?;
    let (fetcher, mut outcomes) = Fetcher::new(Arc::new(api), config.download_dir()?);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config, cli.report_id, fetcher);
    app.open();

    let result = run(&mut terminal, &mut app, &mut outcomes);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!("Application error: {:#}", e);
        eprintln!("Log file: {}", log_file.display());
    }
    info!("Application exiting");
    result
}
