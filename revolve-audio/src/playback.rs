//! Variable-speed playback with a lazily reconciled position model
//!
//! The playback position is not advanced sample-by-sample from the UI's
//! point of view: it is recomputed from elapsed real time and the last known
//! velocity ratio whenever the ratio changes, then wrapped into
//! `[0, duration)`. The render path reads the decoded buffer at the signed
//! fractional rate, so negative ratios genuinely play backwards.

use std::sync::Arc;
use std::time::Instant;

use crate::gain::GainRamp;

/// Velocities whose magnitude falls below this stop playback outright
/// rather than producing near-zero-rate artifacts
pub const VELOCITY_EPSILON: f64 = 1e-3;

/// Scratch repositioning stays this far short of the buffer end
const POSITION_END_GUARD: f64 = 1e-3;

/// Position/ratio model, advanced by explicit time deltas
///
/// Kept separate from [`Player`] so the reconciliation arithmetic is
/// testable with exact deltas instead of a wall clock.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackClock {
    /// Current playback position in seconds, wrapped into `[0, duration)`
    pub position_secs: f64,
    /// Velocity ratio: seconds of audio per second of real time (signed)
    pub ratio: f64,
}

impl PlaybackClock {
    /// Advance the position by `ratio * dt`, wrapping into `[0, duration)`
    ///
    /// With no (or zero) duration the position is only clamped non-negative.
    pub fn advance(&mut self, dt_secs: f64, duration_secs: Option<f64>) {
        self.position_secs += self.ratio * dt_secs;
        match duration_secs {
            Some(d) if d > 0.0 => self.position_secs = self.position_secs.rem_euclid(d),
            _ => self.position_secs = self.position_secs.max(0.0),
        }
    }
}

/// Snapshot of player state for the UI
#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    pub loaded: bool,
    pub playing: bool,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub ratio: f64,
    pub gain: f32,
    pub title: Option<String>,
}

/// Single-track variable-speed player
///
/// Owns the decoded buffer, the position model, and the output gain. At most
/// one "source" is ever active: every rate change supersedes the previous
/// playback state in place.
pub struct Player {
    /// Interleaved stereo samples
    samples: Arc<Vec<f32>>,
    /// Sample rate of the loaded buffer
    buffer_rate: u32,
    /// Sample rate of the output device
    device_rate: u32,
    clock: PlaybackClock,
    last_sync: Option<Instant>,
    playing: bool,
    gain: GainRamp,
    /// Stop once the current fade settles at silence (deferred stop)
    stop_after_fade: bool,
    title: Option<String>,
}

impl Player {
    pub fn new(device_rate: u32) -> Self {
        Self {
            samples: Arc::new(Vec::new()),
            buffer_rate: device_rate,
            device_rate,
            clock: PlaybackClock::default(),
            last_sync: None,
            playing: false,
            gain: GainRamp::new(),
            stop_after_fade: false,
            title: None,
        }
    }

    /// Replace all playback state with a freshly decoded buffer
    ///
    /// The previous track is torn down entirely: position back to zero,
    /// stopped, unity gain, no pending fades.
    pub fn load(&mut self, samples: Arc<Vec<f32>>, buffer_rate: u32, title: Option<String>) {
        self.samples = samples;
        self.buffer_rate = buffer_rate.max(1);
        self.clock = PlaybackClock::default();
        self.last_sync = None;
        self.playing = false;
        self.gain = GainRamp::new();
        self.stop_after_fade = false;
        self.title = title;
    }

    pub fn is_loaded(&self) -> bool {
        !self.samples.is_empty()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Track duration in seconds (0.0 when nothing is loaded)
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / (self.buffer_rate as f64 * 2.0)
    }

    fn duration_hint(&self) -> Option<f64> {
        let d = self.duration_secs();
        (d > 0.0).then_some(d)
    }

    /// Reconcile the position model against elapsed real time
    fn sync_at(&mut self, now: Instant) {
        if let Some(last) = self.last_sync {
            let dt = now.duration_since(last).as_secs_f64();
            self.clock.advance(dt, self.duration_hint());
        }
        self.last_sync = Some(now);
    }

    /// Current position estimate without mutating the model
    pub fn position_secs(&self) -> f64 {
        let mut clock = self.clock;
        if let Some(last) = self.last_sync {
            clock.advance(last.elapsed().as_secs_f64(), self.duration_hint());
        }
        clock.position_secs
    }

    /// Start forward playback at the current position, ratio 1.0, looping
    ///
    /// No-op until a buffer is loaded.
    pub fn play(&mut self) {
        if !self.is_loaded() {
            return;
        }
        self.last_sync = Some(Instant::now());
        self.clock.ratio = 1.0;
        self.playing = true;
        self.stop_after_fade = false;
    }

    /// Halt playback; idempotent
    ///
    /// Position is retained so a later play resumes where the record stopped.
    pub fn stop(&mut self) {
        if self.playing {
            self.sync_at(Instant::now());
        }
        self.playing = false;
        self.clock.ratio = 0.0;
        self.stop_after_fade = false;
    }

    /// Central synchronization primitive: map rotational velocity to a
    /// playback rate
    ///
    /// Reconciles the position against the previous ratio first, then
    /// switches to `velocity / base_speed`. Magnitudes below
    /// [`VELOCITY_EPSILON`] stop playback entirely (ratio 0).
    pub fn set_velocity(&mut self, velocity: f64, base_speed: f64) {
        if !self.is_loaded() || base_speed == 0.0 || !velocity.is_finite() {
            return;
        }
        self.sync_at(Instant::now());
        if velocity.abs() < VELOCITY_EPSILON {
            self.playing = false;
            self.clock.ratio = 0.0;
            return;
        }
        self.clock.ratio = velocity / base_speed;
        self.playing = true;
    }

    /// Directly reposition playback by `delta_secs` (scratch drag)
    ///
    /// Clamped to `[0, duration - guard]`; unlike [`PlaybackClock::advance`]
    /// a drag never wraps around the record edge.
    pub fn nudge(&mut self, delta_secs: f64) {
        if !self.is_loaded() {
            return;
        }
        self.sync_at(Instant::now());
        let end = (self.duration_secs() - POSITION_END_GUARD).max(0.0);
        self.clock.position_secs = (self.clock.position_secs + delta_secs).clamp(0.0, end);
    }

    /// Linearly ramp output gain to `target` (cancels any previous ramp)
    pub fn fade(&mut self, target: f32, duration_secs: f32) {
        self.gain.fade_to(target, duration_secs, self.device_rate);
        self.stop_after_fade = false;
    }

    /// Fade to silence, then stop once the ramp completes
    ///
    /// The deferred stop avoids the click of cutting an active source.
    pub fn pause_with_fade(&mut self, duration_secs: f32) {
        self.gain.fade_to(0.0, duration_secs, self.device_rate);
        self.stop_after_fade = true;
    }

    /// Render interleaved stereo output
    ///
    /// Reads the buffer at the signed fractional rate with linear
    /// interpolation, looping at the edges. The wall-clock model remains the
    /// position authority; the read head here is a per-callback projection
    /// of it.
    pub fn render(&mut self, output: &mut [f32]) {
        let frame_count = (output.len() / 2) as u32;
        let source_frames = self.samples.len() / 2;

        if !self.playing || source_frames == 0 {
            output.fill(0.0);
            self.gain.advance_frames(frame_count);
            self.finish_pending_stop();
            return;
        }

        self.sync_at(Instant::now());

        let total_frames = source_frames as f64;
        // Read head in buffer frames; advances by `ratio` scaled for the
        // buffer/device rate mismatch per output frame.
        let mut head = self.clock.position_secs * self.buffer_rate as f64;
        let step = self.clock.ratio * self.buffer_rate as f64 / self.device_rate as f64;

        for frame in output.chunks_exact_mut(2) {
            let g = self.gain.next();
            head = head.rem_euclid(total_frames);

            let idx = head as usize;
            let frac = (head - idx as f64) as f32;
            let next = (idx + 1) % source_frames;

            let l0 = self.samples[idx * 2];
            let r0 = self.samples[idx * 2 + 1];
            let l1 = self.samples[next * 2];
            let r1 = self.samples[next * 2 + 1];

            frame[0] = (l0 + frac * (l1 - l0)) * g;
            frame[1] = (r0 + frac * (r1 - r0)) * g;

            head += step;
        }

        self.finish_pending_stop();
    }

    fn finish_pending_stop(&mut self) {
        if self.stop_after_fade && self.gain.is_silent() {
            self.stop();
        }
    }

    /// Snapshot for the UI
    pub fn state(&self) -> PlayerState {
        PlayerState {
            loaded: self.is_loaded(),
            playing: self.playing,
            position_secs: self.position_secs(),
            duration_secs: self.duration_secs(),
            ratio: self.clock.ratio,
            gain: self.gain.value(),
            title: self.title.clone(),
        }
    }
}
