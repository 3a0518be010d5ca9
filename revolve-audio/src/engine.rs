//! Audio engine - command mailbox around the player
//!
//! The audio thread owns an [`EngineState`]; the UI talks to it exclusively
//! through bounded channels. Commands never block: if the mailbox is full
//! the send is dropped and the next frame's update supersedes it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::playback::{Player, PlayerState};

/// Commands sent to the audio engine
#[derive(Debug, Clone)]
pub enum AudioCommand {
    /// Replace the loaded track with freshly decoded samples
    /// (interleaved stereo, `Arc` to avoid copying through the channel)
    Load {
        samples: Arc<Vec<f32>>,
        sample_rate: u32,
        title: Option<String>,
    },
    /// Start forward playback at the current position, ratio 1.0
    Play,
    /// Halt playback immediately
    Stop,
    /// Fade to silence over `fade_secs`, then stop (deferred, click-free)
    Pause { fade_secs: f32 },
    /// Ramp output gain to `target` over `secs`
    Fade { target: f32, secs: f32 },
    /// Map rotational velocity to a playback rate
    SetVelocity { velocity: f64, base_speed: f64 },
    /// Directly advance the playback position (scratch drag)
    Nudge { delta_secs: f64 },
    /// Shut the audio thread down
    Shutdown,
}

/// Events sent from the audio engine
#[derive(Debug, Clone)]
pub enum AudioEvent {
    /// Output stream opened; reports the device sample rate so the loader
    /// can decode straight to it
    Ready { sample_rate: u32 },
    /// Periodic state snapshot for UI rendering
    State(PlayerState),
    /// Something went wrong; informational only, playback degrades silently
    Error(String),
}

/// Engine state held by the audio thread
pub struct EngineState {
    player: Player,
}

impl EngineState {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            player: Player::new(sample_rate),
        }
    }

    /// Process a command
    pub fn handle_command(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Load {
                samples,
                sample_rate,
                title,
            } => {
                tracing::debug!(frames = samples.len() / 2, sample_rate, "track loaded");
                self.player.load(samples, sample_rate, title);
            }
            AudioCommand::Play => self.player.play(),
            AudioCommand::Stop => self.player.stop(),
            AudioCommand::Pause { fade_secs } => self.player.pause_with_fade(fade_secs),
            AudioCommand::Fade { target, secs } => self.player.fade(target, secs),
            AudioCommand::SetVelocity {
                velocity,
                base_speed,
            } => self.player.set_velocity(velocity, base_speed),
            AudioCommand::Nudge { delta_secs } => self.player.nudge(delta_secs),
            AudioCommand::Shutdown => {} // Handled at thread level
        }
    }

    /// Generate current state for UI
    pub fn state(&self) -> AudioEvent {
        AudioEvent::State(self.player.state())
    }

    /// Render audio into the output buffer (interleaved stereo)
    pub fn process(&mut self, output: &mut [f32]) {
        self.player.render(output);
    }
}

/// Handle to communicate with the audio engine
pub struct AudioEngine {
    /// Send commands to the audio thread
    pub command_tx: Sender<AudioCommand>,
    /// Receive events from the audio thread
    pub event_rx: Receiver<AudioEvent>,
    /// Shutdown flag
    shutdown: Arc<AtomicBool>,
}

impl AudioEngine {
    /// Create channels for engine communication
    ///
    /// Buffer size of 256 gives headroom for a burst of per-frame velocity
    /// updates without saturating.
    #[allow(clippy::type_complexity)]
    pub fn create_channels() -> (
        Sender<AudioCommand>,
        Receiver<AudioCommand>,
        Sender<AudioEvent>,
        Receiver<AudioEvent>,
    ) {
        let (cmd_tx, cmd_rx) = bounded(256);
        let (evt_tx, evt_rx) = bounded(256);
        (cmd_tx, cmd_rx, evt_tx, evt_rx)
    }

    /// Create a new engine handle
    pub fn new(command_tx: Sender<AudioCommand>, event_rx: Receiver<AudioEvent>) -> Self {
        Self {
            command_tx,
            event_rx,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Send a command to the audio engine (non-blocking, best effort)
    pub fn send(&self, cmd: AudioCommand) {
        let _ = self.command_tx.try_send(cmd);
    }

    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Request shutdown
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        let _ = self.command_tx.try_send(AudioCommand::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 48_000;

    #[test]
    fn test_drop_scenario_starts_at_zero_and_plays() {
        // Dropping a track loads fresh samples and begins playback at the
        // start of the buffer.
        let mut engine = EngineState::new(RATE);
        let samples = Arc::new(vec![0.0f32; RATE as usize * 2 * 4]);

        engine.handle_command(AudioCommand::Load {
            samples,
            sample_rate: RATE,
            title: Some("dropped".into()),
        });
        engine.handle_command(AudioCommand::Play);

        let AudioEvent::State(state) = engine.state() else {
            panic!("expected state event");
        };
        assert!(state.playing);
        assert!(state.position_secs < 0.01);
        assert!((state.ratio - 1.0).abs() < 1e-9);
        assert_eq!(state.title.as_deref(), Some("dropped"));
    }

    #[test]
    fn test_commands_without_buffer_are_noops() {
        let mut engine = EngineState::new(RATE);
        engine.handle_command(AudioCommand::Play);
        engine.handle_command(AudioCommand::Nudge { delta_secs: 3.0 });
        engine.handle_command(AudioCommand::SetVelocity {
            velocity: 2.5,
            base_speed: 2.5,
        });

        let AudioEvent::State(state) = engine.state() else {
            panic!("expected state event");
        };
        assert!(!state.loaded);
        assert!(!state.playing);
        assert_eq!(state.position_secs, 0.0);
    }
}
