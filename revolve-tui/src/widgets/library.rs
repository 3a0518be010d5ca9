//! Track list widget - the import/drag source

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use revolve_library::Track;

use crate::theme::Theme;

/// State for the track list
#[derive(Debug, Clone, Default)]
pub struct LibraryState {
    /// All imported tracks
    pub tracks: Vec<Track>,
    /// Currently selected track index
    pub selected_index: usize,
    /// Scroll offset for the list
    pub scroll_offset: usize,
}

impl LibraryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the track list
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    /// Move selection down
    pub fn select_next(&mut self) {
        if !self.tracks.is_empty() && self.selected_index < self.tracks.len() - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Move selection to first item
    pub fn select_first(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    /// Move selection to last item
    pub fn select_last(&mut self) {
        if !self.tracks.is_empty() {
            self.selected_index = self.tracks.len() - 1;
        }
    }

    /// Select the row under a terminal cell, if any
    ///
    /// `area` is the widget's last rendered rectangle.
    pub fn select_at(&mut self, area: Rect, row: u16) -> Option<usize> {
        if row <= area.y || row >= area.y + area.height.saturating_sub(1) {
            return None;
        }
        let index = self.scroll_offset + (row - area.y - 1) as usize;
        if index < self.tracks.len() {
            self.selected_index = index;
            Some(index)
        } else {
            None
        }
    }

    /// Get the currently selected track
    pub fn selected_track(&self) -> Option<&Track> {
        self.tracks.get(self.selected_index)
    }

    /// Keep the selection inside the visible window
    fn ensure_visible(&mut self, visible_rows: usize) {
        if visible_rows == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_rows {
            self.scroll_offset = self.selected_index + 1 - visible_rows;
        }
    }
}

/// Widget for displaying the track list
pub struct LibraryWidget<'a> {
    state: &'a mut LibraryState,
    theme: &'a Theme,
    /// Index of the row currently being dragged toward the platter
    dragging: Option<usize>,
}

impl<'a> LibraryWidget<'a> {
    pub fn new(state: &'a mut LibraryState, theme: &'a Theme) -> Self {
        Self {
            state,
            theme,
            dragging: None,
        }
    }

    pub fn dragging(mut self, index: Option<usize>) -> Self {
        self.dragging = index;
        self
    }
}

impl Widget for LibraryWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let count = self.state.tracks.len();
        let title = format!(" TRACKS ({count}) ");
        let block = Block::default()
            .title(Line::styled(title, self.theme.title()))
            .borders(Borders::ALL)
            .border_style(self.theme.border());
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        if count == 0 {
            buf.set_string(
                inner.x + 1,
                inner.y,
                "no tracks - pass a music folder on the command line",
                self.theme.dim(),
            );
            return;
        }

        self.state.ensure_visible(inner.height as usize);

        let visible = self
            .state
            .tracks
            .iter()
            .enumerate()
            .skip(self.state.scroll_offset)
            .take(inner.height as usize);

        for (line_no, (index, track)) in visible.enumerate() {
            let y = inner.y + line_no as u16;
            let selected = index == self.state.selected_index;
            let dragged = self.dragging == Some(index);

            let prefix = if dragged {
                "≡ "
            } else if selected {
                "▸ "
            } else {
                "  "
            };
            let style = if selected {
                self.theme.highlight()
            } else {
                self.theme.normal()
            };

            let text = format!("{prefix}{} — {}", track.title, track.artist);
            let line = Line::from(Span::styled(text, style));
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track {
                title: format!("track {i}"),
                artist: "artist".into(),
                path: PathBuf::from(format!("/music/{i}.mp3")),
                album_art: None,
            })
            .collect()
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut state = LibraryState::new();
        state.set_tracks(tracks(3));

        state.select_prev();
        assert_eq!(state.selected_index, 0);

        for _ in 0..10 {
            state.select_next();
        }
        assert_eq!(state.selected_index, 2);

        state.select_first();
        assert_eq!(state.selected_index, 0);
        state.select_last();
        assert_eq!(state.selected_index, 2);
    }

    #[test]
    fn test_scroll_follows_selection() {
        let mut state = LibraryState::new();
        state.set_tracks(tracks(20));

        state.selected_index = 12;
        state.ensure_visible(5);
        assert_eq!(state.scroll_offset, 8);

        state.selected_index = 2;
        state.ensure_visible(5);
        assert_eq!(state.scroll_offset, 2);
    }

    #[test]
    fn test_select_at_maps_rows_to_indices() {
        let mut state = LibraryState::new();
        state.set_tracks(tracks(5));
        let area = Rect::new(0, 0, 30, 7);

        // Row 1 is the first list row (row 0 is the border).
        assert_eq!(state.select_at(area, 1), Some(0));
        assert_eq!(state.select_at(area, 3), Some(2));
        assert_eq!(state.selected_index, 2);

        // Border rows and rows past the list are not selectable.
        assert_eq!(state.select_at(area, 0), None);
        assert_eq!(state.select_at(area, 6), None);
    }

    #[test]
    fn test_select_at_respects_scroll_offset() {
        let mut state = LibraryState::new();
        state.set_tracks(tracks(20));
        state.scroll_offset = 10;
        let area = Rect::new(0, 0, 30, 7);

        assert_eq!(state.select_at(area, 1), Some(10));
    }

    #[test]
    fn test_selected_track_on_empty_list() {
        let state = LibraryState::new();
        assert!(state.selected_track().is_none());
    }
}
