//! Audio engine for Revolve - variable-speed playback and velocity sync
//!
//! This crate provides the playback side of the turntable:
//! - Player: decoded buffer, lazily reconciled position model, gain ramps
//! - Engine: command/event mailbox between the UI and the audio thread
//!
//! The platter's rotational velocity maps onto a signed playback ratio; the
//! render path reads the buffer at that fractional rate, so scratching
//! backwards really plays backwards.

mod engine;
mod gain;
mod playback;

pub use engine::{AudioCommand, AudioEngine, AudioEvent, EngineState};
pub use gain::GainRamp;
pub use playback::{PlaybackClock, Player, PlayerState, VELOCITY_EPSILON};
