//! Commands produced by input handling

/// High-level actions the UI can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start the platter and audio
    Play,
    /// Spin the platter down and fade the audio out
    Pause,
    /// Play if paused, pause if playing
    TogglePlay,
    /// Move the track list selection down
    SelectNext,
    /// Move the track list selection up
    SelectPrev,
    /// Jump to the first track
    SelectFirst,
    /// Jump to the last track
    SelectLast,
    /// Drop the selected track onto the platter
    DropSelected,
    /// Exit the application
    Quit,
}
