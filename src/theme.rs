use crate::presentation::StateTag;
use ratatui::style::{Color, Modifier, Style};
use std::env;

/// Theme identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Phosphor,
    Amber,
    Mono,
}

/// Colors a theme is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub primary: Color,
    pub secondary: Color,
    pub dim: Color,
    pub accent_bg: Color,
    pub accent_fg: Color,
    pub border: Color,
    pub warning: Color,
    pub error: Color,
    pub success: Color,
}

fn supports_truecolor() -> bool {
    env::var("COLORTERM")
        .map(|v| v == "truecolor" || v == "24bit")
        .unwrap_or(false)
}

impl Palette {
    fn phosphor(truecolor: bool) -> Self {
        if truecolor {
            Self {
                background: Color::Rgb(0x07, 0x11, 0x0A),
                primary: Color::Rgb(0x3C, 0xFF, 0x8A),
                secondary: Color::Rgb(0x1F, 0xBF, 0x62),
                dim: Color::Rgb(0x0E, 0x5A, 0x2E),
                accent_bg: Color::Rgb(0x0F, 0x2A, 0x1A),
                accent_fg: Color::Rgb(0xBF, 0xFF, 0xD6),
                border: Color::Rgb(0x16, 0x7A, 0x43),
                warning: Color::Rgb(0xC8, 0xFF, 0x5A),
                error: Color::Rgb(0xFF, 0x4D, 0x6D),
                success: Color::Rgb(0x53, 0xFF, 0xA7),
            }
        } else {
            Self {
                background: Color::Indexed(0),
                primary: Color::Indexed(10),
                secondary: Color::Indexed(2),
                dim: Color::Indexed(22),
                accent_bg: Color::Indexed(22),
                accent_fg: Color::Indexed(10),
                border: Color::Indexed(2),
                warning: Color::Indexed(11),
                error: Color::Indexed(9),
                success: Color::Indexed(10),
            }
        }
    }

    fn amber(truecolor: bool) -> Self {
        if truecolor {
            Self {
                background: Color::Rgb(0x0A, 0x08, 0x05),
                primary: Color::Rgb(0xFF, 0xB3, 0x40),
                secondary: Color::Rgb(0xCC, 0x88, 0x20),
                dim: Color::Rgb(0x66, 0x44, 0x11),
                accent_bg: Color::Rgb(0x1A, 0x14, 0x0A),
                accent_fg: Color::Rgb(0xFF, 0xCC, 0x80),
                border: Color::Rgb(0x7A, 0x5A, 0x20),
                warning: Color::Rgb(0xFF, 0xCC, 0x40),
                error: Color::Rgb(0xFF, 0x66, 0x66),
                success: Color::Rgb(0xCC, 0xFF, 0x66),
            }
        } else {
            Self {
                background: Color::Indexed(0),
                primary: Color::Indexed(11),
                secondary: Color::Indexed(3),
                dim: Color::Indexed(58),
                accent_bg: Color::Indexed(58),
                accent_fg: Color::Indexed(11),
                border: Color::Indexed(3),
                warning: Color::Indexed(11),
                error: Color::Indexed(9),
                success: Color::Indexed(10),
            }
        }
    }

    /// For accessibility; tags are told apart by modifiers instead of color.
    fn mono() -> Self {
        Self {
            background: Color::Black,
            primary: Color::White,
            secondary: Color::Gray,
            dim: Color::DarkGray,
            accent_bg: Color::DarkGray,
            accent_fg: Color::White,
            border: Color::Gray,
            warning: Color::White,
            error: Color::White,
            success: Color::White,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,
    pub palette: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeName::Phosphor)
    }
}

impl Theme {
    pub fn new(name: ThemeName) -> Self {
        let truecolor = supports_truecolor();
        let palette = match name {
            ThemeName::Phosphor => Palette::phosphor(truecolor),
            ThemeName::Amber => Palette::amber(truecolor),
            ThemeName::Mono => Palette::mono(),
        };
        Self { name, palette }
    }

    /// Pick the theme named by `TUI_THEME` (phosphor, amber, mono).
    pub fn from_env() -> Self {
        match env::var("TUI_THEME") {
            Ok(value) => Self::new(Self::parse_name(&value)),
            Err(_) => Self::default(),
        }
    }

    fn parse_name(value: &str) -> ThemeName {
        match value.to_lowercase().as_str() {
            "amber" => ThemeName::Amber,
            "mono" => ThemeName::Mono,
            _ => ThemeName::Phosphor,
        }
    }

    pub fn bg(&self) -> Color {
        self.palette.background
    }

    pub fn primary_style(&self) -> Style {
        Style::default().fg(self.palette.primary)
    }

    pub fn secondary_style(&self) -> Style {
        Style::default().fg(self.palette.secondary)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.palette.dim)
    }

    /// Selected row
    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.palette.accent_bg)
            .fg(self.palette.accent_fg)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.palette.border)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.palette.warning)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.palette.error)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.palette.success)
    }

    /// Modal surface drawn over the background
    pub fn modal_style(&self) -> Style {
        Style::default().fg(self.palette.primary).bg(self.palette.background)
    }

    /// Style of an execution-state tag.
    pub fn tag_style(&self, tag: StateTag) -> Style {
        match tag {
            StateTag::Success => self.success_style().add_modifier(Modifier::BOLD),
            StateTag::Error => self.error_style().add_modifier(Modifier::BOLD | Modifier::REVERSED),
            StateTag::Processing => self.warning_style().add_modifier(Modifier::ITALIC),
            StateTag::Default => self.secondary_style(),
        }
    }
}

/// Animations are off under `TUI_NO_ANIM` or `TUI_REDUCED_MOTION`.
pub fn no_animations() -> bool {
    ["TUI_NO_ANIM", "TUI_REDUCED_MOTION"].iter().any(|var| {
        env::var(var)
            .map(|v| v == "1" || v == "true")
            .unwrap_or(false)
    })
}
