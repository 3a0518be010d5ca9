//! Status bar widget - transport state, track time, messages

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use revolve_audio::PlayerState;

use crate::theme::Theme;

/// One-line status bar at the bottom of the screen
pub struct StatusBarWidget<'a> {
    player: &'a PlayerState,
    theme: &'a Theme,
    message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(player: &'a PlayerState, theme: &'a Theme) -> Self {
        Self {
            player,
            theme,
            message: None,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }

    fn format_time(secs: f64) -> String {
        let mins = (secs / 60.0) as u32;
        let secs = secs % 60.0;
        format!("{mins:02}:{secs:04.1}")
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let transport = if self.player.playing {
            ("▶ PLAYING", self.theme.title())
        } else if self.player.loaded {
            ("⏸ PAUSED", self.theme.dim())
        } else {
            ("⏹ NO TRACK", self.theme.dim())
        };

        let time = format!(
            " {} / {} ",
            Self::format_time(self.player.position_secs),
            Self::format_time(self.player.duration_secs),
        );
        let rate = format!("rate {:+.2} ", self.player.ratio);

        let mut spans = vec![
            Span::styled(transport.0, transport.1),
            Span::styled(time, self.theme.normal()),
            Span::styled(rate, self.theme.dim()),
        ];

        if let Some(message) = self.message {
            spans.push(Span::styled("| ", self.theme.dim()));
            spans.push(Span::styled(message, self.theme.warning_style()));
        } else {
            spans.push(Span::styled(
                "| space play/pause · drag record to scratch · q quit",
                self.theme.dim(),
            ));
        }

        let line = Line::from(spans);
        buf.set_style(area, self.theme.normal());
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        assert_eq!(StatusBarWidget::format_time(0.0), "00:00.0");
        assert_eq!(StatusBarWidget::format_time(75.25), "01:15.2");
    }
}
