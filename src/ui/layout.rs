use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Grid-aligned layout helper for stable, deterministic layouts
pub struct GridLayout;

impl GridLayout {
    /// Header, content and footer bands
    pub fn main_layout(area: Rect) -> (Rect, Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(8),    // Content
                Constraint::Length(2), // Footer
            ])
            .split(area);

        (chunks[0], chunks[1], chunks[2])
    }

    /// Centered box of at most `width` x `height`, shrunk to fit `area`.
    pub fn centered_dialog(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width);
        let height = height.min(area.height);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }

    /// Area of the history modal: near full size, capped on large terminals.
    pub fn modal_area(area: Rect) -> Rect {
        Self::centered_dialog(
            area,
            area.width.saturating_sub(4).min(100),
            area.height.saturating_sub(2).min(30),
        )
    }

    /// Banner, body and pagination bar inside the modal.
    /// The banner collapses to zero height when `banner_lines` is 0.
    pub fn modal_sections(area: Rect, banner_lines: u16, with_pager: bool) -> (Rect, Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(banner_lines),
                Constraint::Min(3),
                Constraint::Length(if with_pager { 1 } else { 0 }),
            ])
            .split(area);

        (chunks[0], chunks[1], chunks[2])
    }
}
