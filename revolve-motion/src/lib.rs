//! Platter motion model for Revolve - angle math, easing, friction
//!
//! This crate is pure math: no I/O, no timers, no audio. The app drives
//! [`PlatterPhysics::tick`] once per frame and the gesture controller uses
//! the angle helpers to turn pointer motion into angular deltas.

mod angle;
mod platter;

pub use angle::{angle_to, normalize_angle, Point, RAD_TO_DEG};
pub use platter::{PlatterPhysics, RotationState};
