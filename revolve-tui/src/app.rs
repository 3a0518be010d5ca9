//! Application state management

use ratatui::layout::Rect;
use revolve_audio::{AudioEvent, PlayerState};
use revolve_library::Track;
use revolve_motion::RotationState;

use crate::theme::{Theme, SLATE};
use crate::widgets::LibraryState;

/// A track row being dragged toward the platter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    /// Index of the dragged library row
    pub track_index: usize,
    /// Whether the pointer currently hovers the record surface
    pub over_platter: bool,
}

/// Shared UI state, mutated by the frame loop, input handling, and
/// audio events
pub struct AppState {
    /// Platter rotation; also written directly by the scratch controller
    pub rotation: RotationState,
    /// Latest snapshot from the audio thread
    pub player: PlayerState,
    /// Transport intent (true between play and pause, regardless of
    /// whether the decoded buffer is ready yet)
    pub playing: bool,
    /// Track currently on the platter
    pub current_track: Option<Track>,
    pub library: LibraryState,
    /// In-progress track drag, if any
    pub drag: Option<DragState>,
    /// Last rendered platter rectangle, for hit tests and gesture centers
    pub platter_area: Rect,
    /// Last rendered library rectangle, for row hit tests
    pub library_area: Rect,
    /// Device sample rate, known once the audio thread reports in
    pub engine_sample_rate: Option<u32>,
    pub message: Option<String>,
    pub theme: Theme,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            rotation: RotationState::default(),
            player: PlayerState::default(),
            playing: false,
            current_track: None,
            library: LibraryState::new(),
            drag: None,
            platter_area: Rect::default(),
            library_area: Rect::default(),
            engine_sample_rate: None,
            message: None,
            theme: SLATE,
        }
    }
}

impl AppState {
    /// Apply an event from the audio thread
    pub fn handle_audio_event(&mut self, event: AudioEvent) {
        match event {
            AudioEvent::Ready { sample_rate } => {
                self.engine_sample_rate = Some(sample_rate);
            }
            AudioEvent::State(state) => {
                self.player = state;
            }
            AudioEvent::Error(message) => {
                // Playback degrades silently; the message is informational.
                self.message = Some(message);
            }
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }
}

/// Top-level application
pub struct App {
    pub state: AppState,
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            state: AppState::default(),
            should_quit: false,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_events_update_state() {
        let mut state = AppState::default();

        state.handle_audio_event(AudioEvent::Ready { sample_rate: 44_100 });
        assert_eq!(state.engine_sample_rate, Some(44_100));

        state.handle_audio_event(AudioEvent::State(PlayerState {
            playing: true,
            position_secs: 12.5,
            ..PlayerState::default()
        }));
        assert!(state.player.playing);

        state.handle_audio_event(AudioEvent::Error("no output device".into()));
        assert_eq!(state.message.as_deref(), Some("no output device"));
    }
}
