//! Track import for Revolve - decoding, metadata, and the drop catalog
//!
//! Produces [`Track`] values for the UI and decoded sample buffers for the
//! audio engine. Import never hard-fails: unreadable metadata falls back to
//! the filename, undecodable audio leaves the engine in its no-buffer state.

mod catalog;
mod config;
mod loader;

pub use catalog::{import_dir, Track, AUDIO_EXTENSIONS};
pub use config::Config;
pub use loader::{DecodeOutcome, LoadError, LoadedTrack, TrackLoader, TrackMetadata};
