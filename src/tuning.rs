//! Data-driven gameplay tuning
//!
//! Every constant the simulation reads lives here. Values are loaded once from
//! JSON at startup (missing sections fall back to defaults) and never change
//! while the simulation runs.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a tuning file.
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Player movement and charge-jump constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    /// Horizontal run speed (units/second)
    pub move_speed: f32,
    /// Launch speed at full charge
    pub max_jump_power: f32,
    /// Launch speed floor for a tap
    pub min_jump_power: f32,
    /// Hold time for a full charge (seconds)
    pub max_charge_time: f32,
    /// Liftoff window during which ground sensing is skipped (seconds)
    pub jump_cooldown: f32,
    /// Velocity change rate on normal ground (units/second²)
    pub ground_decel: f32,
    /// Coasting friction on ice and slopes
    pub ice_decel: f32,
    /// Steering rate on ice and slopes
    pub ice_acceleration: f32,
    /// Friction on no-control ice
    pub no_control_decel: f32,
    /// Steering rate while airborne (0 keeps launch momentum)
    pub air_control_rate: f32,
    /// Downward acceleration while airborne
    pub gravity: f32,
    /// Steeper contacts than this count as slopes (degrees)
    pub slope_threshold_degrees: f32,
    /// How far below the feet the ground probe reaches
    pub probe_distance: f32,
    /// Probe width as a fraction of the player's width
    pub probe_width_factor: f32,
    /// Player collision box half extents
    pub half_extents: [f32; 2],
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            max_jump_power: 40.0,
            min_jump_power: crate::consts::MIN_JUMP_POWER,
            max_charge_time: 1.0,
            jump_cooldown: crate::consts::JUMP_COOLDOWN,
            ground_decel: 60.0,
            ice_decel: 2.0,
            ice_acceleration: 6.0,
            no_control_decel: 0.5,
            air_control_rate: 0.0,
            gravity: 25.0,
            slope_threshold_degrees: 30.0,
            probe_distance: 0.1,
            probe_width_factor: 0.9,
            half_extents: [0.4, 0.5],
        }
    }
}

/// Room camera constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Exponential smoothing rate toward the target
    pub smooth_rate: f32,
    /// Desired visible width in pixels
    pub target_width_pixels: f32,
    /// Pixels per world unit
    pub pixels_per_unit: f32,
    /// Fixed aspect ratio (width, height)
    pub fixed_aspect: [f32; 2],
    /// Camera height of room 0
    pub origin_y: f32,
    /// Whether side boundary walls are generated
    pub create_boundaries: bool,
    /// Boundary wall thickness
    pub boundary_thickness: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            smooth_rate: 10.0,
            target_width_pixels: 1080.0,
            pixels_per_unit: 100.0,
            fixed_aspect: [9.0, 16.0],
            origin_y: 0.0,
            create_boundaries: true,
            boundary_thickness: 1.0,
        }
    }
}

/// Freeze hazard schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    /// Quiet time before each countdown (seconds)
    pub free_time: f32,
    /// Length of each countdown step (seconds)
    pub count_interval: f32,
    /// Length of the resolved phase, frozen or not (seconds)
    pub freeze_duration: f32,
    /// Probability a countdown ends in a freeze
    pub freeze_chance: f32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            free_time: 3.0,
            count_interval: 1.0,
            freeze_duration: 2.0,
            freeze_chance: 0.5,
        }
    }
}

/// Knockback source constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnockbackTuning {
    pub projectile_speed: f32,
    pub projectile_lifetime: f32,
    pub projectile_knockback: f32,
    /// Upward bias added to the push direction
    pub projectile_lift: f32,
    pub projectile_half_size: f32,
    pub launcher_fire_interval: f32,
    pub launcher_range: f32,
    pub jump_pad_force: f32,
    /// Wind-up between stepping on a woofer plate and the wave
    pub woofer_anticipation_time: f32,
    /// How long the wave keeps pushing
    pub woofer_wave_duration: f32,
    /// Extra rest after the wave before the plate works again
    pub woofer_cooldown: f32,
    pub woofer_range: f32,
    /// Push per 1/60 s at point blank
    pub woofer_push_force: f32,
    /// Half-angle of the push cone around the fire direction
    pub woofer_cone_degrees: f32,
    /// Fade the push linearly to zero at the edge of the range
    pub woofer_falloff: bool,
}

impl Default for KnockbackTuning {
    fn default() -> Self {
        Self {
            projectile_speed: 10.0,
            projectile_lifetime: 3.0,
            projectile_knockback: 15.0,
            projectile_lift: 0.5,
            projectile_half_size: 0.2,
            launcher_fire_interval: 1.5,
            launcher_range: 10.0,
            jump_pad_force: 20.0,
            woofer_anticipation_time: 0.5,
            woofer_wave_duration: 0.5,
            woofer_cooldown: 0.5,
            woofer_range: 8.0,
            woofer_push_force: 20.0,
            woofer_cone_degrees: 30.0,
            woofer_falloff: true,
        }
    }
}

/// All tuning sections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub motion: MotionTuning,
    pub camera: CameraTuning,
    pub hazard: HazardTuning,
    pub knockback: KnockbackTuning,
}

impl Tuning {
    /// Parse tuning from a JSON string
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Load tuning, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("{err}; using default tuning");
                Self::default()
            }
        }
    }

    /// Replace values the simulation cannot work with
    ///
    /// A non-positive `max_charge_time` is left alone: the charge ratio treats
    /// it as a full charge.
    pub fn sanitized(mut self) -> Self {
        let defaults = Tuning::default();

        let m = &mut self.motion;
        for (name, value) in [
            ("ground_decel", &mut m.ground_decel),
            ("ice_decel", &mut m.ice_decel),
            ("ice_acceleration", &mut m.ice_acceleration),
            ("no_control_decel", &mut m.no_control_decel),
            ("air_control_rate", &mut m.air_control_rate),
            ("jump_cooldown", &mut m.jump_cooldown),
            ("probe_distance", &mut m.probe_distance),
        ] {
            if !(*value >= 0.0) {
                log::warn!("motion.{name} = {value} is negative; clamping to 0");
                *value = 0.0;
            }
        }
        if m.min_jump_power > m.max_jump_power {
            log::warn!(
                "motion.min_jump_power {} exceeds max_jump_power {}",
                m.min_jump_power,
                m.max_jump_power
            );
        }
        if !(m.half_extents[0] > 0.0 && m.half_extents[1] > 0.0) {
            log::warn!("motion.half_extents {:?} degenerate; using default", m.half_extents);
            m.half_extents = defaults.motion.half_extents;
        }

        let c = &mut self.camera;
        if !(c.target_width_pixels > 0.0) || !(c.pixels_per_unit > 0.0) {
            log::warn!(
                "camera projection {}px @ {}ppu degenerate; using default",
                c.target_width_pixels,
                c.pixels_per_unit
            );
            c.target_width_pixels = defaults.camera.target_width_pixels;
            c.pixels_per_unit = defaults.camera.pixels_per_unit;
        }
        if !(c.fixed_aspect[0] > 0.0 && c.fixed_aspect[1] > 0.0) {
            log::warn!("camera.fixed_aspect {:?} degenerate; using default", c.fixed_aspect);
            c.fixed_aspect = defaults.camera.fixed_aspect;
        }
        if !(c.smooth_rate >= 0.0) {
            c.smooth_rate = 0.0;
        }

        let h = &mut self.hazard;
        if !(0.0..=1.0).contains(&h.freeze_chance) {
            let clamped = if h.freeze_chance > 1.0 { 1.0 } else { 0.0 };
            log::warn!("hazard.freeze_chance {} outside [0,1]; using {clamped}", h.freeze_chance);
            h.freeze_chance = clamped;
        }
        for (name, value) in [
            ("free_time", &mut h.free_time),
            ("count_interval", &mut h.count_interval),
            ("freeze_duration", &mut h.freeze_duration),
        ] {
            if !(*value >= 0.0) {
                log::warn!("hazard.{name} = {value} is negative; clamping to 0");
                *value = 0.0;
            }
        }

        let k = &mut self.knockback;
        for (name, value) in [
            ("woofer_anticipation_time", &mut k.woofer_anticipation_time),
            ("woofer_wave_duration", &mut k.woofer_wave_duration),
            ("woofer_cooldown", &mut k.woofer_cooldown),
            ("woofer_range", &mut k.woofer_range),
        ] {
            if !(*value >= 0.0) {
                log::warn!("knockback.{name} = {value} is negative; clamping to 0");
                *value = 0.0;
            }
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "motion": { "move_speed": 7.5 } }"#).unwrap();
        assert_eq!(tuning.motion.move_speed, 7.5);
        assert_eq!(tuning.motion.max_jump_power, 40.0);
        assert_eq!(tuning.hazard.freeze_chance, 0.5);
        assert_eq!(tuning.camera.fixed_aspect, [9.0, 16.0]);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default("/definitely/not/here/tuning.json");
        assert_eq!(tuning.motion.move_speed, MotionTuning::default().move_speed);
        assert!(matches!(
            Tuning::load("/definitely/not/here/tuning.json"),
            Err(TuningError::Io(_))
        ));
    }

    #[test]
    fn test_sanitize_clamps_degenerate_values() {
        let mut tuning = Tuning::default();
        tuning.hazard.freeze_chance = 1.7;
        tuning.motion.ground_decel = -3.0;
        tuning.camera.pixels_per_unit = 0.0;
        tuning.camera.fixed_aspect = [9.0, 0.0];
        tuning.knockback.woofer_range = -2.0;
        tuning.knockback.woofer_cooldown = f32::NAN;
        let tuning = tuning.sanitized();
        assert_eq!(tuning.hazard.freeze_chance, 1.0);
        assert_eq!(tuning.motion.ground_decel, 0.0);
        assert_eq!(tuning.camera.pixels_per_unit, 100.0);
        assert_eq!(tuning.camera.fixed_aspect, [9.0, 16.0]);
        assert_eq!(tuning.knockback.woofer_range, 0.0);
        assert_eq!(tuning.knockback.woofer_cooldown, 0.0);
    }

    #[test]
    fn test_round_trip_defaults() {
        let json = serde_json::to_string(&Tuning::default()).unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.knockback.jump_pad_force, 20.0);
    }
}
