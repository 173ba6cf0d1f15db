//! Simulation state shared between the motion, camera and hazard systems
//!
//! All of it is plain data; the systems in sibling modules mutate it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::surface::SurfaceClass;

/// Charge-jump bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargeState {
    pub is_charging: bool,
    /// Seconds the jump button has been held
    pub charge_time: f32,
    pub max_charge_time: f32,
}

impl ChargeState {
    pub fn new(max_charge_time: f32) -> Self {
        Self {
            is_charging: false,
            charge_time: 0.0,
            max_charge_time,
        }
    }

    /// Charge progress in [0, 1]; a non-positive max counts as fully charged
    pub fn ratio(&self) -> f32 {
        if self.max_charge_time <= 0.0 {
            return 1.0;
        }
        self.charge_time.clamp(0.0, self.max_charge_time) / self.max_charge_time
    }

    pub fn cancel(&mut self) {
        self.is_charging = false;
        self.charge_time = 0.0;
    }
}

/// Observable state of the motion state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    GroundedIdle,
    GroundedCharging,
    Airborne,
}

/// The player actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    /// Center of the collision box
    pub pos: Vec2,
    pub vel: Vec2,
    /// +1 facing right, -1 facing left
    pub facing: f32,
    pub grounded: bool,
    pub surface: SurfaceClass,
    pub charge: ChargeState,
    /// Set by the freeze hazard; suppresses horizontal control and jumps
    pub control_locked: bool,
    pub jump_cooldown_remaining: f32,
    pub half_extents: Vec2,
}

impl PlayerState {
    pub fn new(pos: Vec2, half_extents: Vec2, max_charge_time: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            facing: 1.0,
            grounded: false,
            surface: SurfaceClass::Normal,
            charge: ChargeState::new(max_charge_time),
            control_locked: false,
            jump_cooldown_remaining: 0.0,
            half_extents,
        }
    }

    /// Collision box in world space
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.half_extents)
    }

    /// Bottom of the collision box
    #[inline]
    pub fn feet_y(&self) -> f32 {
        self.pos.y - self.half_extents.y
    }

    pub fn motion_state(&self) -> MotionState {
        if !self.grounded {
            MotionState::Airborne
        } else if self.charge.is_charging {
            MotionState::GroundedCharging
        } else {
            MotionState::GroundedIdle
        }
    }

    /// Charge progress for the aim indicator
    pub fn charge_ratio(&self) -> f32 {
        if self.charge.is_charging { self.charge.ratio() } else { 0.0 }
    }

    /// Normalized launch direction toward the pointer; straight up when the
    /// pointer sits on the player
    pub fn aim_direction(&self, pointer: Vec2) -> Vec2 {
        let dir = (pointer - self.pos).normalize_or_zero();
        if dir == Vec2::ZERO { Vec2::Y } else { dir }
    }
}

/// Room camera state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraState {
    /// Camera height of room 0
    pub origin_y: f32,
    /// Current camera center
    pub pos: Vec2,
    pub current_target_y: f32,
    pub overridden: bool,
    /// Fixed camera point, meaningful only while `overridden`
    pub override_position: Vec2,
}

impl CameraState {
    pub fn new(origin: Vec2) -> Self {
        Self {
            origin_y: origin.y,
            pos: origin,
            current_target_y: origin.y,
            overridden: false,
            override_position: Vec2::ZERO,
        }
    }
}

/// Freeze hazard phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HazardPhase {
    /// Quiet period before the countdown
    #[default]
    Waiting,
    /// Countdown step; `remaining` goes 3, 2, 1
    Counting { remaining: u8 },
    /// Player locked in place
    Freezing,
    /// Equal-length quiet period after a roll that did not freeze
    CoolingDown,
}

/// Freeze hazard cycle state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HazardCycleState {
    pub phase: HazardPhase,
    pub phase_elapsed: f32,
    pub active: bool,
}

/// One-shot velocity change requested by a knockback source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpulseRequest {
    /// Push direction; normalized on application
    pub direction: Vec2,
    pub magnitude: f32,
}

impl ImpulseRequest {
    pub fn new(direction: Vec2, magnitude: f32) -> Self {
        Self {
            direction,
            magnitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_ratio_clamps() {
        let mut charge = ChargeState::new(1.0);
        charge.charge_time = 0.5;
        assert!((charge.ratio() - 0.5).abs() < 1e-6);
        charge.charge_time = 3.0;
        assert_eq!(charge.ratio(), 1.0);
        charge.charge_time = -1.0;
        assert_eq!(charge.ratio(), 0.0);
    }

    #[test]
    fn test_degenerate_max_charge_is_full() {
        let mut charge = ChargeState::new(0.0);
        charge.charge_time = 0.0;
        assert_eq!(charge.ratio(), 1.0);
        charge.max_charge_time = -2.0;
        assert_eq!(charge.ratio(), 1.0);
    }

    #[test]
    fn test_motion_state() {
        let mut player = PlayerState::new(Vec2::ZERO, Vec2::new(0.4, 0.5), 1.0);
        assert_eq!(player.motion_state(), MotionState::Airborne);
        player.grounded = true;
        assert_eq!(player.motion_state(), MotionState::GroundedIdle);
        player.charge.is_charging = true;
        assert_eq!(player.motion_state(), MotionState::GroundedCharging);
    }

    #[test]
    fn test_aim_direction_falls_back_to_up() {
        let player = PlayerState::new(Vec2::new(1.0, 1.0), Vec2::new(0.4, 0.5), 1.0);
        assert_eq!(player.aim_direction(Vec2::new(1.0, 1.0)), Vec2::Y);
        let dir = player.aim_direction(Vec2::new(4.0, 5.0));
        assert!((dir - Vec2::new(0.6, 0.8)).length() < 1e-5);
    }
}
