//! jumpQOC - a charge-and-release platformer climbing through stacked rooms
//!
//! Core modules:
//! - `sim`: Deterministic simulation (surface sensing, motion, camera, freeze hazard)
//! - `tuning`: Data-driven gameplay constants
//! - `settings`: Player audio preferences passed down to presentation

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed physics timestep (50 Hz)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the scheduler will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Jump power floor so a tap still leaves the ground
    pub const MIN_JUMP_POWER: f32 = 5.0;
    /// Liftoff grace window after a jump (seconds)
    pub const JUMP_COOLDOWN: f32 = 0.2;

    /// Number of countdown steps before a freeze roll
    pub const COUNTDOWN_STEPS: u8 = 3;

    /// Hidden-zone triggers ignore slower horizontal motion
    pub const HIDDEN_ZONE_MIN_SPEED: f32 = 0.1;

    /// Stand-in for zero lengths in divisions
    pub const EPSILON: f32 = 1e-4;
}

/// Move `current` toward `target` by at most `max_delta` (linear approach)
#[inline]
pub fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

/// Angle between a surface normal and world up, in degrees
#[inline]
pub fn angle_from_up(normal: Vec2) -> f32 {
    let n = normal.normalize_or_zero();
    if n == Vec2::ZERO {
        return 0.0;
    }
    n.dot(Vec2::Y).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Sign of a horizontal input as a facing value, `None` for a dead stick
#[inline]
pub fn input_sign(x: f32) -> Option<f32> {
    if x > 0.0 {
        Some(1.0)
    } else if x < 0.0 {
        Some(-1.0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_toward_clamps_step() {
        assert_eq!(move_toward(0.0, 10.0, 2.0), 2.0);
        assert_eq!(move_toward(10.0, 0.0, 2.0), 8.0);
        assert_eq!(move_toward(9.5, 10.0, 2.0), 10.0);
        assert_eq!(move_toward(3.0, 3.0, 0.0), 3.0);
    }

    #[test]
    fn test_angle_from_up() {
        assert!(angle_from_up(Vec2::Y).abs() < 0.001);
        assert!((angle_from_up(Vec2::X) - 90.0).abs() < 0.001);
        let slope = Vec2::new(1.0, 1.0);
        assert!((angle_from_up(slope) - 45.0).abs() < 0.01);
        assert_eq!(angle_from_up(Vec2::ZERO), 0.0);
    }

    #[test]
    fn test_input_sign() {
        assert_eq!(input_sign(0.3), Some(1.0));
        assert_eq!(input_sign(-1.0), Some(-1.0));
        assert_eq!(input_sign(0.0), None);
    }
}
