use crate::theme::Theme;
use crate::ui::animations::Spinner;
use ratatui::{
    prelude::*,
    style::Modifier,
    widgets::{Block, Borders, Paragraph},
};

/// Header widget showing app name, current screen, and hint
pub struct Header {
    current_screen: String,
    hint: String,
}

impl Header {
    pub fn new(current_screen: impl Into<String>) -> Self {
        Self {
            current_screen: current_screen.into(),
            hint: String::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn render(&self, theme: &Theme, area: Rect, frame: &mut Frame) {
        let mut text = format!("reporthist v{} │ {}", env!("CARGO_PKG_VERSION"), self.current_screen);
        if !self.hint.is_empty() {
            text.push_str(" │ ");
            text.push_str(&self.hint);
        }

        let paragraph = Paragraph::new(text)
            .style(theme.primary_style().add_modifier(Modifier::BOLD))
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(theme.border_style()),
            );

        frame.render_widget(paragraph, area);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FooterStatus {
    Ready,
    Processing(String),
    Success(String),
    Error(String),
}

/// Footer widget showing keybind hints and status
pub struct Footer {
    status: FooterStatus,
    spinner: Option<Spinner>,
}

impl Footer {
    pub fn new() -> Self {
        Self {
            status: FooterStatus::Ready,
            spinner: None,
        }
    }

    pub fn set_status(&mut self, status: FooterStatus) {
        match status {
            FooterStatus::Processing(_) => {
                if self.spinner.is_none() {
                    self.spinner = Some(Spinner::new());
                }
            }
            _ => self.spinner = None,
        }
        self.status = status;
    }

    pub fn render(&self, theme: &Theme, hints: &str, area: Rect, frame: &mut Frame) {
        let (status_text, status_style) = match &self.status {
            FooterStatus::Ready => (String::new(), theme.secondary_style()),
            FooterStatus::Processing(msg) => {
                let spinner = self
                    .spinner
                    .as_ref()
                    .map(|s| format!("{} ", s.current()))
                    .unwrap_or_default();
                (format!("{}{}", spinner, msg), theme.primary_style())
            }
            FooterStatus::Success(msg) => (msg.clone(), theme.success_style()),
            FooterStatus::Error(msg) => (format!("[ERR] {}", msg), theme.error_style()),
        };

        let line = Line::from(vec![
            Span::styled(format!("  {}", hints), theme.secondary_style()),
            Span::styled(" │ ", theme.border_style()),
            Span::styled(status_text, status_style),
        ]);

        let paragraph = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(theme.border_style()),
        );

        frame.render_widget(paragraph, area);
    }
}

impl Default for Footer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_only_while_processing() {
        let mut footer = Footer::new();
        footer.set_status(FooterStatus::Processing("loading".into()));
        assert!(footer.spinner.is_some());
        footer.set_status(FooterStatus::Success("saved".into()));
        assert!(footer.spinner.is_none());
        assert_eq!(footer.status, FooterStatus::Success("saved".into()));
    }
}
