//! Ground sensing and surface classification
//!
//! Each physics tick the player's feet are probed once. The nearest hit is
//! classified by its tag first and its slope second:
//! - tagged no-control ice -> `NoControlIce`
//! - tagged ice, or the hazard floor -> `Ice`
//! - steeper than the slope threshold -> `Slope` (same friction as ice)
//! - anything else -> `Normal`

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use crate::angle_from_up;

/// Friction regime of the ground under the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SurfaceClass {
    #[default]
    Normal,
    Ice,
    NoControlIce,
    Slope,
}

impl SurfaceClass {
    /// Ice and slopes share the slippery friction constants
    #[inline]
    pub fn is_slippery(self) -> bool {
        matches!(self, SurfaceClass::Ice | SurfaceClass::Slope)
    }
}

/// Contact tag vocabulary shared by platforms and trigger zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContactTag {
    #[default]
    Normal,
    Ice,
    NoControlIce,
    HazardZoneEnter,
    HazardZoneExit,
    HiddenZoneEntrance,
    HiddenZoneExit,
    StoryMarker,
}

impl ContactTag {
    /// Surface class forced by the tag, if any; `None` defers to the slope test
    pub fn surface_override(self) -> Option<SurfaceClass> {
        match self {
            ContactTag::NoControlIce => Some(SurfaceClass::NoControlIce),
            ContactTag::Ice | ContactTag::HazardZoneEnter => Some(SurfaceClass::Ice),
            _ => None,
        }
    }

    /// Parse an editor tag name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Normal" | "Ground" => Some(ContactTag::Normal),
            "Ice" => Some(ContactTag::Ice),
            "NoControlIce" => Some(ContactTag::NoControlIce),
            "HazardZoneEnter" | "FrozenZoneEnter" => Some(ContactTag::HazardZoneEnter),
            "HazardZoneExit" | "FrozenZoneExit" => Some(ContactTag::HazardZoneExit),
            "HiddenZoneEntrance" => Some(ContactTag::HiddenZoneEntrance),
            "HiddenZoneExit" => Some(ContactTag::HiddenZoneExit),
            "StoryMarker" => Some(ContactTag::StoryMarker),
            _ => None,
        }
    }
}

/// Nearest ground found below the feet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    pub tag: ContactTag,
    /// Unit normal of the contact surface
    pub normal: Vec2,
    /// World Y of the supporting surface
    pub surface_y: f32,
}

/// Downward contact sensing against static geometry
pub trait SurfaceProbe {
    /// Cast a thin box `bounds.width * width_factor` wide from the body center
    /// down to `distance` below the feet and return the nearest hit.
    fn probe_down(&self, bounds: &Aabb, distance: f32, width_factor: f32) -> Option<ProbeHit>;
}

/// Result of classifying the ground for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceReading {
    pub grounded: bool,
    pub class: SurfaceClass,
    pub normal: Vec2,
    /// Where to rest the feet when grounded
    pub support_y: Option<f32>,
}

impl SurfaceReading {
    /// Nothing underfoot
    pub fn airborne() -> Self {
        Self {
            grounded: false,
            class: SurfaceClass::Normal,
            normal: Vec2::Y,
            support_y: None,
        }
    }
}

/// Turns probe hits into surface readings
#[derive(Debug, Clone)]
pub struct SurfaceClassifier {
    pub slope_threshold_degrees: f32,
    pub probe_distance: f32,
    pub probe_width_factor: f32,
}

impl SurfaceClassifier {
    pub fn new(tuning: &crate::tuning::MotionTuning) -> Self {
        Self {
            slope_threshold_degrees: tuning.slope_threshold_degrees,
            probe_distance: tuning.probe_distance,
            probe_width_factor: tuning.probe_width_factor,
        }
    }

    /// Classify a single contact
    pub fn classify_hit(&self, tag: ContactTag, normal: Vec2) -> SurfaceClass {
        if let Some(class) = tag.surface_override() {
            return class;
        }
        if angle_from_up(normal) > self.slope_threshold_degrees {
            SurfaceClass::Slope
        } else {
            SurfaceClass::Normal
        }
    }

    /// Sense the ground under `bounds`
    ///
    /// Skipped entirely during the liftoff window and while moving upward:
    /// platforms are one-way, so a rising body passes through them.
    pub fn sense(
        &self,
        probe: &impl SurfaceProbe,
        bounds: &Aabb,
        velocity_y: f32,
        jump_cooldown_remaining: f32,
    ) -> SurfaceReading {
        if jump_cooldown_remaining > 0.0 || velocity_y > 0.0 {
            return SurfaceReading::airborne();
        }

        match probe.probe_down(bounds, self.probe_distance, self.probe_width_factor) {
            Some(hit) => SurfaceReading {
                grounded: true,
                class: self.classify_hit(hit.tag, hit.normal),
                normal: hit.normal,
                support_y: Some(hit.surface_y),
            },
            None => SurfaceReading::airborne(),
        }
    }
}
