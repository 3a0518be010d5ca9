//! Platter rotation physics - easing toward a target speed, friction decay,
//! and the inertia hand-off from a scratch gesture
//!
//! Modeled after a direct-drive turntable: the motor pulls the platter
//! toward its nominal speed while a hand on the record overrides everything.

/// Free spin below this speed is considered stopped; friction no longer applies
const DECAY_FLOOR: f64 = 1e-5;

/// Speeds below this count as a dead start and get kicked on play
const DEAD_START: f64 = 0.02;

/// Fraction of nominal speed used to kick a dead platter into motion
const KICK_FRACTION: f64 = 0.25;

/// Rotation state of the platter
///
/// `angle_degrees` accumulates without wrapping; the renderer wraps for
/// display. `velocity` is in degrees per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationState {
    pub angle_degrees: f64,
    pub velocity: f64,
    pub target_velocity: f64,
}

/// Per-frame platter physics and gesture tunables
#[derive(Debug, Clone, Copy)]
pub struct PlatterPhysics {
    /// Nominal rotation speed in degrees per frame
    pub rotation_speed: f64,
    /// Smoothing constant in (0, 1): per-frame exponential approach to target
    pub ease_to_target: f64,
    /// Decay factor in [0, 1] applied to free spin (1.0 = no decay)
    pub friction: f64,
    /// Pointer rotation -> visual rotation sensitivity during a scratch
    pub scratch_factor: f64,
    /// Seconds of audio per degree of rotation
    pub audio_secs_per_deg: f64,
}

impl Default for PlatterPhysics {
    fn default() -> Self {
        Self {
            rotation_speed: 2.5,
            ease_to_target: 0.1,
            friction: 1.0,
            scratch_factor: 0.8,
            audio_secs_per_deg: 0.1,
        }
    }
}

impl PlatterPhysics {
    /// Advance the rotation by one frame
    ///
    /// Velocity eases toward the target, free spin decays by `friction`
    /// (suppressed while a scratch gesture is driving the platter directly),
    /// and the accumulated angle moves by the resulting velocity.
    pub fn tick(&self, rotation: &mut RotationState, scratching: bool) {
        rotation.velocity +=
            (rotation.target_velocity - rotation.velocity) * self.ease_to_target;

        if !scratching && rotation.velocity.abs() > DECAY_FLOOR {
            rotation.velocity *= self.friction;
        }

        rotation.angle_degrees += rotation.velocity;
    }

    /// Velocity kick applied when play starts from a (nearly) stopped platter
    pub fn kick_velocity(&self) -> f64 {
        self.rotation_speed * KICK_FRACTION
    }

    /// Whether the platter is effectively at rest
    pub fn is_dead_start(&self, rotation: &RotationState) -> bool {
        rotation.velocity.abs() < DEAD_START
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_eases_toward_target() {
        let physics = PlatterPhysics::default();
        let mut rotation = RotationState {
            angle_degrees: 0.0,
            velocity: 0.0,
            target_velocity: 2.5,
        };

        physics.tick(&mut rotation, false);
        // One exponential step: v' = v + (tv - v) * 0.1
        assert!((rotation.velocity - 0.25).abs() < 1e-9);

        for _ in 0..200 {
            physics.tick(&mut rotation, false);
        }
        assert!((rotation.velocity - 2.5).abs() < 1e-3);
    }

    #[test]
    fn test_angle_advances_by_velocity() {
        let physics = PlatterPhysics {
            ease_to_target: 0.1,
            ..PlatterPhysics::default()
        };
        let mut rotation = RotationState {
            angle_degrees: 90.0,
            velocity: 2.0,
            target_velocity: 2.0,
        };

        physics.tick(&mut rotation, false);
        assert!((rotation.angle_degrees - 92.0).abs() < 1e-9);
    }

    #[test]
    fn test_friction_decays_free_spin_only() {
        let physics = PlatterPhysics {
            friction: 0.9,
            ease_to_target: 0.0,
            ..PlatterPhysics::default()
        };

        let mut free = RotationState {
            velocity: 1.0,
            target_velocity: 1.0,
            ..RotationState::default()
        };
        physics.tick(&mut free, false);
        assert!((free.velocity - 0.9).abs() < 1e-9);

        let mut held = RotationState {
            velocity: 1.0,
            target_velocity: 1.0,
            ..RotationState::default()
        };
        physics.tick(&mut held, true);
        assert!((held.velocity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_friction_skips_stopped_platter() {
        let physics = PlatterPhysics {
            friction: 0.5,
            ease_to_target: 0.0,
            ..PlatterPhysics::default()
        };
        let mut rotation = RotationState {
            velocity: 1e-6,
            ..RotationState::default()
        };
        physics.tick(&mut rotation, false);
        assert!((rotation.velocity - 1e-6).abs() < 1e-12);
    }

    #[test]
    fn test_inertia_hand_off_eases_back_to_target() {
        // Releasing a scratch drops the last move delta into `velocity`;
        // subsequent ticks ease it toward the nominal speed.
        let physics = PlatterPhysics::default();
        let mut rotation = RotationState {
            angle_degrees: 0.0,
            velocity: 12.0, // fast flick at release
            target_velocity: physics.rotation_speed,
        };

        let mut last = rotation.velocity;
        for _ in 0..100 {
            physics.tick(&mut rotation, false);
            assert!(rotation.velocity.is_finite());
            // Approach is monotone from above toward the target.
            assert!(rotation.velocity <= last + 1e-9);
            last = rotation.velocity;
        }
        assert!((rotation.velocity - physics.rotation_speed).abs() < 0.05);
    }

    #[test]
    fn test_dead_start_detection_and_kick() {
        let physics = PlatterPhysics::default();
        let rotation = RotationState::default();
        assert!(physics.is_dead_start(&rotation));
        assert!((physics.kick_velocity() - 0.625).abs() < 1e-9);

        let spinning = RotationState {
            velocity: 1.0,
            ..RotationState::default()
        };
        assert!(!physics.is_dead_start(&spinning));
    }
}
