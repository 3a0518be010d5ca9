//! Scratch gesture state machine
//!
//! Two states: `Idle` and `Scratching`. While scratching, pointer motion
//! bypasses the easing loop entirely - angle deltas go straight into the
//! rotation state and the returned audio advance goes straight to the
//! engine. On release the last move delta is handed off as inertia.

use revolve_motion::{angle_to, normalize_angle, PlatterPhysics, Point, RotationState, RAD_TO_DEG};

/// A scratch gesture in progress
///
/// The platter center is captured at gesture start from the widget's
/// current on-screen geometry, so layout changes between gestures are
/// picked up automatically.
#[derive(Debug, Clone, Copy)]
struct ScratchSession {
    center: Point,
    last_angle: Option<f64>,
    last_move_delta: f64,
}

#[derive(Debug, Clone, Copy, Default)]
enum GesturePhase {
    #[default]
    Idle,
    Scratching(ScratchSession),
}

/// Result of one scratch move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScratchMove {
    /// Degrees added to the visual rotation
    pub visual_delta_deg: f64,
    /// Seconds to advance the audio position by
    pub audio_delta_secs: f64,
}

/// Gesture controller translating pointer events into rotation and audio
/// position updates
pub struct ScratchController {
    phase: GesturePhase,
    physics: PlatterPhysics,
}

impl ScratchController {
    pub fn new(physics: PlatterPhysics) -> Self {
        Self {
            phase: GesturePhase::Idle,
            physics,
        }
    }

    pub fn is_scratching(&self) -> bool {
        matches!(self.phase, GesturePhase::Scratching(_))
    }

    /// Idle -> Scratching: pointer pressed on the record
    ///
    /// Caches the platter center and the initial pointer angle, and
    /// disengages the approach-to-target so the hand owns the platter.
    /// Velocity drops to zero with the grab - the record is held, and no
    /// sound plays until the first move. The caller stops audio output
    /// alongside this call.
    pub fn begin(&mut self, center: Point, pointer: Point, rotation: &mut RotationState) {
        rotation.target_velocity = 0.0;
        rotation.velocity = 0.0;
        self.phase = GesturePhase::Scratching(ScratchSession {
            center,
            last_angle: Some(angle_to(center, pointer)),
            last_move_delta: 0.0,
        });
    }

    /// Scratching -> Scratching: pointer moved
    ///
    /// Returns the rotation/audio deltas applied, or `None` when idle or
    /// when no prior angle was cached (the move then only re-caches).
    pub fn on_move(&mut self, pointer: Point, rotation: &mut RotationState) -> Option<ScratchMove> {
        let GesturePhase::Scratching(ref mut session) = self.phase else {
            return None;
        };

        let current = angle_to(session.center, pointer);
        let Some(last) = session.last_angle else {
            session.last_angle = Some(current);
            return None;
        };
        session.last_angle = Some(current);

        let delta_deg = normalize_angle(current - last) * RAD_TO_DEG;
        let visual_delta_deg = delta_deg * self.physics.scratch_factor;

        rotation.angle_degrees += visual_delta_deg;
        // Velocity mirrors the move for immediate response; it is also the
        // inertia source at release.
        rotation.velocity = visual_delta_deg;
        session.last_move_delta = visual_delta_deg;

        Some(ScratchMove {
            visual_delta_deg,
            audio_delta_secs: visual_delta_deg * self.physics.audio_secs_per_deg,
        })
    }

    /// Scratching -> Idle: pointer released (anywhere on screen)
    ///
    /// Hands the last move delta off as inertia and restores the easing
    /// target. Audio resumes implicitly through the animation loop's next
    /// velocity update.
    pub fn release(&mut self, rotation: &mut RotationState, playing: bool) {
        if let GesturePhase::Scratching(session) = self.phase {
            rotation.velocity = session.last_move_delta;
            rotation.target_velocity = if playing {
                self.physics.rotation_speed
            } else {
                0.0
            };
            self.phase = GesturePhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ScratchController {
        ScratchController::new(PlatterPhysics::default())
    }

    fn pointer_at(center: Point, radius: f64, angle_deg: f64) -> Point {
        let rad = angle_deg / RAD_TO_DEG;
        Point::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
    }

    #[test]
    fn test_begin_halts_the_platter() {
        let mut ctl = controller();
        let mut rotation = RotationState {
            velocity: 2.5,
            target_velocity: 2.5,
            ..RotationState::default()
        };
        let center = Point::new(40.0, 40.0);

        ctl.begin(center, pointer_at(center, 10.0, 0.0), &mut rotation);
        assert!(ctl.is_scratching());
        assert_eq!(rotation.target_velocity, 0.0);
        assert_eq!(rotation.velocity, 0.0);
    }

    #[test]
    fn test_thirty_degree_drag_scales_to_visual_and_audio() {
        // +30 degrees of pointer motion with scratch_factor 0.8 gives +24
        // degrees of rotation, and with 0.1 s/deg gives +2.4s of audio.
        let mut ctl = controller();
        let mut rotation = RotationState::default();
        let center = Point::new(40.0, 40.0);

        ctl.begin(center, pointer_at(center, 10.0, 0.0), &mut rotation);
        let mv = ctl
            .on_move(pointer_at(center, 10.0, 30.0), &mut rotation)
            .expect("move while scratching");

        assert!((mv.visual_delta_deg - 24.0).abs() < 1e-9);
        assert!((mv.audio_delta_secs - 2.4).abs() < 1e-9);
        assert!((rotation.angle_degrees - 24.0).abs() < 1e-9);
        assert!((rotation.velocity - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_backward_drag_is_negative() {
        let mut ctl = controller();
        let mut rotation = RotationState::default();
        let center = Point::new(40.0, 40.0);

        ctl.begin(center, pointer_at(center, 10.0, 90.0), &mut rotation);
        let mv = ctl
            .on_move(pointer_at(center, 10.0, 45.0), &mut rotation)
            .unwrap();

        assert!((mv.visual_delta_deg + 36.0).abs() < 1e-9);
        assert!(mv.audio_delta_secs < 0.0);
    }

    #[test]
    fn test_drag_across_angle_seam_stays_small() {
        // Crossing the atan2 seam (just above vs just below the negative x
        // axis) must not produce a near-full-turn delta.
        let mut ctl = controller();
        let mut rotation = RotationState::default();
        let center = Point::new(40.0, 40.0);

        ctl.begin(center, pointer_at(center, 10.0, 175.0), &mut rotation);
        let mv = ctl
            .on_move(pointer_at(center, 10.0, 185.0), &mut rotation)
            .unwrap();

        assert!((mv.visual_delta_deg - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let mut ctl = controller();
        let mut rotation = RotationState::default();

        let result = ctl.on_move(Point::new(5.0, 5.0), &mut rotation);
        assert!(result.is_none());
        assert_eq!(rotation, RotationState::default());
    }

    #[test]
    fn test_move_without_cached_angle_only_recaches() {
        let mut ctl = controller();
        let mut rotation = RotationState::default();
        let center = Point::new(40.0, 40.0);

        // Force the should-not-happen state so the recovery path is covered.
        ctl.phase = GesturePhase::Scratching(ScratchSession {
            center,
            last_angle: None,
            last_move_delta: 0.0,
        });

        let first = ctl.on_move(pointer_at(center, 10.0, 60.0), &mut rotation);
        assert!(first.is_none());
        assert_eq!(rotation.angle_degrees, 0.0);

        // The angle is now cached, so the next move produces a delta.
        let second = ctl.on_move(pointer_at(center, 10.0, 70.0), &mut rotation);
        assert!(second.is_some());
    }

    #[test]
    fn test_release_hands_off_inertia() {
        let mut ctl = controller();
        let mut rotation = RotationState::default();
        let center = Point::new(40.0, 40.0);

        ctl.begin(center, pointer_at(center, 10.0, 0.0), &mut rotation);
        ctl.on_move(pointer_at(center, 10.0, 10.0), &mut rotation);
        let flick = rotation.velocity;

        ctl.release(&mut rotation, true);
        assert!(!ctl.is_scratching());
        assert_eq!(rotation.velocity, flick);
        assert_eq!(rotation.target_velocity, 2.5);
    }

    #[test]
    fn test_release_while_paused_targets_zero() {
        let mut ctl = controller();
        let mut rotation = RotationState::default();
        let center = Point::new(40.0, 40.0);

        ctl.begin(center, pointer_at(center, 10.0, 0.0), &mut rotation);
        ctl.release(&mut rotation, false);
        assert_eq!(rotation.target_velocity, 0.0);
    }

    #[test]
    fn test_release_while_idle_is_noop() {
        let mut ctl = controller();
        let mut rotation = RotationState {
            velocity: 1.5,
            target_velocity: 2.5,
            ..RotationState::default()
        };
        ctl.release(&mut rotation, true);
        assert_eq!(rotation.velocity, 1.5);
    }
}
