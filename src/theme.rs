//! Theme configuration and colors.
//!
//! Palettes come from the `ratatui-themes` crate; [`ThemeColors`] derives the
//! handful of styles the shell and the update notice need.

use ratatui::style::{Color, Modifier, Style};
use ratatui_themes::{ThemeName, ThemePalette};
use serde::{Deserialize, Serialize};

/// Theme wrapper around `ThemeName` from ratatui-themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme(pub ThemeName);

impl Theme {
    /// Get the next theme in rotation
    #[must_use]
    pub fn next(&self) -> Self {
        Self(self.0.next())
    }

    /// Get the display name for the theme.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.0.display_name()
    }

    /// Get the color palette for this theme
    #[must_use]
    pub fn colors(&self) -> ThemeColors {
        ThemeColors::from_palette(self.0.palette())
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Colors used by the terminal UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Window background
    pub bg: Color,
    /// Background of the notice panel
    pub bg_panel: Color,
    /// Primary text color
    pub fg: Color,
    /// Dimmed text color
    pub fg_dim: Color,
    /// Accent color
    pub primary: Color,
    /// Secondary accent color
    pub secondary: Color,
    /// Success state color
    pub success: Color,
    /// Warning state color
    pub warning: Color,
    /// Error state color
    pub error: Color,
    /// Border color (unfocused)
    pub border: Color,
    /// Border color (focused)
    pub border_focus: Color,
    /// Selection background
    pub selection: Color,
}

impl ThemeColors {
    /// Create `ThemeColors` from a `ThemePalette`
    #[must_use]
    pub fn from_palette(p: ThemePalette) -> Self {
        Self {
            bg: p.bg,
            bg_panel: Self::lighten(p.bg, 12),
            fg: p.fg,
            fg_dim: p.muted,
            primary: p.accent,
            secondary: p.secondary,
            success: p.success,
            warning: p.warning,
            error: p.error,
            border: p.muted,
            border_focus: p.accent,
            selection: p.selection,
        }
    }

    fn lighten(color: Color, amount: u8) -> Color {
        if let Color::Rgb(r, g, b) = color {
            Color::Rgb(
                r.saturating_add(amount),
                g.saturating_add(amount),
                b.saturating_add(amount),
            )
        } else {
            color
        }
    }

    /// Default text style
    #[must_use]
    pub fn text(&self) -> Style {
        Style::default().fg(self.fg)
    }

    /// Dimmed text style
    #[must_use]
    pub fn text_dim(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    /// Primary accent style
    #[must_use]
    pub fn text_primary(&self) -> Style {
        Style::default().fg(self.primary)
    }

    /// Success style
    #[must_use]
    pub fn text_success(&self) -> Style {
        Style::default().fg(self.success)
    }

    /// Warning style
    #[must_use]
    pub fn text_warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    /// Block border style
    #[must_use]
    pub fn block(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Focused block border style
    #[must_use]
    pub fn block_focus(&self) -> Style {
        Style::default().fg(self.border_focus)
    }

    /// Selected item style
    #[must_use]
    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .fg(self.fg)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint style (for shortcuts)
    #[must_use]
    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.secondary)
            .add_modifier(Modifier::BOLD)
    }

    /// Everything behind a blocking notice
    #[must_use]
    pub fn blocked(&self) -> Style {
        Style::default()
            .fg(self.fg_dim)
            .add_modifier(Modifier::DIM)
    }

    /// Notice title
    #[must_use]
    pub fn notice_title(&self) -> Style {
        Style::default()
            .fg(self.warning)
            .add_modifier(Modifier::BOLD)
    }

    /// Enabled button
    #[must_use]
    pub fn button(&self, focused: bool) -> Style {
        let style = Style::default().fg(self.bg).bg(self.primary);
        if focused {
            style.add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            style
        }
    }

    /// Disabled button
    #[must_use]
    pub fn button_disabled(&self) -> Style {
        Style::default()
            .fg(self.fg_dim)
            .bg(self.bg_panel)
            .add_modifier(Modifier::ITALIC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_roundtrips_as_plain_string() {
        #[derive(Serialize, Deserialize)]
        struct Holder {
            theme: Theme,
        }

        let holder = Holder {
            theme: Theme::default(),
        };
        let text = toml::to_string(&holder).unwrap();
        let back: Holder = toml::from_str(&text).unwrap();
        assert_eq!(back.theme, Theme::default());
    }

    #[test]
    fn test_next_changes_theme() {
        let theme = Theme::default();
        assert_ne!(theme.next(), theme);
    }

    #[test]
    fn test_lighten_only_touches_rgb() {
        assert_eq!(
            ThemeColors::lighten(Color::Rgb(250, 0, 10), 12),
            Color::Rgb(255, 12, 22)
        );
        assert_eq!(ThemeColors::lighten(Color::Red, 12), Color::Red);
    }
}
