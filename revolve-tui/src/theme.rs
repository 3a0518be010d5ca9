//! Color themes for Revolve

use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    /// Primary foreground color (text, borders)
    pub fg: Color,
    /// Dimmed foreground (secondary text)
    pub fg_dim: Color,
    /// Background color
    pub bg: Color,
    /// Highlight color (selected items, active elements)
    pub highlight: Color,
    /// Accent color (platter marker, meters)
    pub accent: Color,
    /// Warning color
    pub warning: Color,
    /// Vinyl surface color
    pub vinyl: Color,
    /// Record label color (the disc center)
    pub label: Color,
}

impl Theme {
    /// Get style for normal text
    pub fn normal(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Get style for dimmed text
    pub fn dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    /// Get style for highlighted/selected items
    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for borders
    pub fn border(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    /// Get style for active borders (drop hover ring, focused pane)
    pub fn border_active(&self) -> Style {
        Style::default().fg(self.highlight).add_modifier(Modifier::BOLD)
    }

    /// Get title style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the vinyl surface grooves
    pub fn vinyl_style(&self) -> Style {
        Style::default().fg(self.vinyl).bg(self.bg)
    }

    /// Style for the record label disc
    pub fn label_style(&self) -> Style {
        Style::default().fg(self.bg).bg(self.label)
    }

    /// Style for the rotation marker
    pub fn marker_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Style for warnings in the status line
    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning).bg(self.bg)
    }
}

/// Dark slate theme with a warm label, the default look
pub const SLATE: Theme = Theme {
    name: "slate",
    fg: Color::Rgb(214, 214, 214),
    fg_dim: Color::Rgb(110, 110, 110),
    bg: Color::Rgb(16, 16, 20),
    highlight: Color::Rgb(120, 170, 255),
    accent: Color::Rgb(255, 196, 0),
    warning: Color::Rgb(255, 140, 90),
    vinyl: Color::Rgb(60, 60, 66),
    label: Color::Rgb(196, 90, 60),
};

/// High-contrast phosphor green, for terminals that render RGB poorly
pub const PHOSPHOR: Theme = Theme {
    name: "phosphor",
    fg: Color::Rgb(51, 255, 51),
    fg_dim: Color::Rgb(25, 128, 25),
    bg: Color::Rgb(0, 10, 0),
    highlight: Color::Rgb(180, 255, 180),
    accent: Color::Rgb(255, 255, 120),
    warning: Color::Rgb(255, 200, 80),
    vinyl: Color::Rgb(20, 90, 20),
    label: Color::Rgb(40, 160, 40),
};
