//! Colors and style builders for the picker view.
//!
//! The palette is Nord. Widgets never pick colors directly; they ask the
//! [`Theme`] for a semantic role so alternative palettes only have to fill in
//! [`ThemeRoles`].

use std::fmt::Debug;

use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
};

// Polar Night
const N1: Color = Color::Rgb(0x3B, 0x42, 0x52);
const N2: Color = Color::Rgb(0x43, 0x4C, 0x5E);
const N3: Color = Color::Rgb(0x4C, 0x56, 0x6A);

// Snow Storm
const S0: Color = Color::Rgb(0xD8, 0xDE, 0xE9);
const S1: Color = Color::Rgb(0xE5, 0xE9, 0xF0);
const S2: Color = Color::Rgb(0xEC, 0xEF, 0xF4);

// Frost
const F1: Color = Color::Rgb(0x88, 0xC0, 0xD0);

// Aurora
const A_YELLOW: Color = Color::Rgb(0xEB, 0xCB, 0x8B);

const TEXT_MUTED: Color = Color::Rgb(0x61, 0x6E, 0x88);

/// Semantic color roles.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    pub surface: Color,
    pub surface_muted: Color,
    pub border: Color,

    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    pub accent_primary: Color,

    pub warning: Color,

    pub selection_bg: Color,
    pub selection_fg: Color,
    pub focus: Color,
}

pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }
    fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().text_secondary)
    }
    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().text_muted)
    }

    fn border_style(&self, focused: bool) -> Style {
        let color = if focused { self.roles().focus } else { self.roles().border };
        Style::default().fg(color)
    }

    fn selection_style(&self) -> Style {
        Style::default().fg(self.roles().selection_fg).bg(self.roles().selection_bg)
    }

    fn status_warning(&self) -> Style {
        Style::default().fg(self.roles().warning)
    }

    fn accent_primary_style(&self) -> Style {
        Style::default().fg(self.roles().accent_primary)
    }
    fn accent_emphasis_style(&self) -> Style {
        Style::default().fg(self.roles().accent_primary).add_modifier(Modifier::BOLD)
    }
}

/// Nord palette tuned for dark terminals.
#[derive(Debug, Clone)]
pub struct NordTheme {
    roles: ThemeRoles,
}

impl NordTheme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                surface: N1,
                surface_muted: N2,
                border: N1,

                text: S0,
                text_secondary: S1,
                text_muted: TEXT_MUTED,

                accent_primary: F1,

                warning: A_YELLOW,

                selection_bg: N3,
                selection_fg: S2,
                focus: F1,
            },
        }
    }
}

impl Default for NordTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for NordTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

/// Standard bordered block on the panel surface.
pub fn block<'a, T: Theme + ?Sized>(theme: &T, title: Option<String>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(title) = title {
        block = block.title(Span::styled(
            format!(" {title} "),
            theme.text_secondary_style().add_modifier(Modifier::BOLD),
        ));
    }
    block
}

pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let roles = theme.roles();
    Style::default().bg(roles.surface).fg(roles.text)
}

/// Background for the whole header row so column gaps are filled too.
pub fn table_header_row_style<T: Theme + ?Sized>(theme: &T) -> Style {
    Style::default()
        .bg(theme.roles().surface_muted)
        .fg(theme.roles().text_secondary)
        .add_modifier(Modifier::BOLD)
}

/// Zebra striping on darkened surface tones.
pub fn table_row_style<T: Theme + ?Sized>(theme: &T, row_index: usize) -> Style {
    let roles = theme.roles();
    let background = if row_index % 2 == 0 {
        darken_rgb(roles.surface, 0.60)
    } else {
        darken_rgb(roles.surface_muted, 0.60)
    };
    Style::default().bg(background).fg(roles.text)
}

pub fn table_selected_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme.selection_style().add_modifier(Modifier::BOLD)
}

/// Style for a pagination or action control.
pub fn control_style<T: Theme + ?Sized>(theme: &T, enabled: bool) -> Style {
    if enabled {
        theme.accent_primary_style()
    } else {
        theme.text_muted_style()
    }
}

/// Multiplies each RGB channel by `factor`; other colors are returned as is.
fn darken_rgb(color: Color, factor: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let f = factor.clamp(0.0, 1.0);
            let scale = |channel: u8| (f32::from(channel) * f).round().clamp(0.0, 255.0) as u8;
            Color::Rgb(scale(r), scale(g), scale(b))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn darken_scales_rgb_only() {
        assert_eq!(darken_rgb(Color::Rgb(100, 200, 50), 0.5), Color::Rgb(50, 100, 25));
        assert_eq!(darken_rgb(Color::Red, 0.5), Color::Red);
    }

    #[test]
    fn rows_alternate_backgrounds() {
        let theme = NordTheme::new();
        assert_ne!(table_row_style(&theme, 0).bg, table_row_style(&theme, 1).bg);
        assert_eq!(table_row_style(&theme, 0), table_row_style(&theme, 2));
    }
}
