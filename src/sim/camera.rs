//! Room-quantized camera with a scripted hidden-zone override
//!
//! The level is a stack of rooms exactly one screen tall. While scrolling the
//! camera holds the center of the player's room; room changes are eased with
//! exponential smoothing. Inside a hidden zone the camera parks on a fixed
//! point instead.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::state::CameraState;
use crate::consts::EPSILON;
use crate::tuning::CameraTuning;

/// Orthographic view size derived from the fixed design resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub half_width: f32,
    pub half_height: f32,
}

impl Projection {
    /// Size from the desired width and the fixed aspect, never the live window
    pub fn from_tuning(tuning: &CameraTuning) -> Self {
        let width = tuning.target_width_pixels / tuning.pixels_per_unit.max(EPSILON);
        let aspect = tuning.fixed_aspect[0] / tuning.fixed_aspect[1].max(EPSILON);
        let half_height = width / aspect.max(EPSILON) / 2.0;
        Self {
            half_width: width / 2.0,
            half_height,
        }
    }

    #[inline]
    pub fn room_height(&self) -> f32 {
        self.half_height * 2.0
    }
}

/// Scrolling or parked on a hidden-zone point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraMode {
    Scrolling,
    Overridden,
}

/// Which screen edge a boundary wall guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Invisible wall at a screen edge, carried along with the camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub side: Side,
    /// Center offset from the camera
    pub offset: Vec2,
    pub half_extents: Vec2,
    pub enabled: bool,
}

impl Boundary {
    pub fn bounds(&self, camera_pos: Vec2) -> Aabb {
        Aabb::from_center(camera_pos + self.offset, self.half_extents)
    }
}

/// Per-frame camera driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraScroller {
    pub state: CameraState,
    pub projection: Projection,
    pub smooth_rate: f32,
    room_height: f32,
    boundaries: Vec<Boundary>,
}

impl CameraScroller {
    pub fn new(tuning: &CameraTuning, start_x: f32) -> Self {
        let projection = Projection::from_tuning(tuning);
        let mut scroller = Self::with_projection(
            projection,
            Vec2::new(start_x, tuning.origin_y),
            tuning.smooth_rate,
        );
        if tuning.create_boundaries {
            scroller.create_boundaries(tuning.boundary_thickness);
        }
        scroller
    }

    /// Camera without boundary walls
    pub fn with_projection(projection: Projection, origin: Vec2, smooth_rate: f32) -> Self {
        let mut room_height = projection.room_height();
        if !(room_height > 0.0) {
            log::warn!("Room height {room_height} degenerate; using {EPSILON}");
            room_height = EPSILON;
        }
        Self {
            state: CameraState::new(origin),
            projection,
            smooth_rate,
            room_height,
            boundaries: Vec::new(),
        }
    }

    /// Generate the side walls once, sized to the visible area
    fn create_boundaries(&mut self, thickness: f32) {
        let width = self.projection.half_width * 2.0;
        let height = self.projection.room_height();
        let half_extents = Vec2::new(thickness / 2.0, height * 10.0 / 2.0);
        let offset_x = width / 2.0 + thickness / 2.0;
        self.boundaries = vec![
            Boundary {
                side: Side::Left,
                offset: Vec2::new(-offset_x, 0.0),
                half_extents,
                enabled: true,
            },
            Boundary {
                side: Side::Right,
                offset: Vec2::new(offset_x, 0.0),
                half_extents,
                enabled: true,
            },
        ];
    }

    #[inline]
    pub fn room_height(&self) -> f32 {
        self.room_height
    }

    pub fn mode(&self) -> CameraMode {
        if self.state.overridden {
            CameraMode::Overridden
        } else {
            CameraMode::Scrolling
        }
    }

    /// Room containing `player_y`; anything below room 0 stays in room 0
    pub fn room_index(&self, player_y: f32) -> u32 {
        let offset = player_y - self.state.origin_y + self.room_height / 2.0;
        let index = (offset / self.room_height).floor();
        if index.is_nan() || index < 0.0 {
            0
        } else {
            index as u32
        }
    }

    /// Camera height that frames the room containing `player_y`
    pub fn room_target_y(&self, player_y: f32) -> f32 {
        self.state.origin_y + self.room_height * self.room_index(player_y) as f32
    }

    /// Where the camera is heading this frame
    pub fn target(&self, player_y: f32) -> Vec2 {
        if self.state.overridden {
            self.state.override_position
        } else {
            Vec2::new(self.state.pos.x, self.room_target_y(player_y))
        }
    }

    /// Ease toward the current target
    pub fn tick(&mut self, player_y: f32, dt: f32) {
        let target = self.target(player_y);
        self.state.current_target_y = target.y;
        let t = (self.smooth_rate * dt).clamp(0.0, 1.0);
        self.state.pos = self.state.pos.lerp(target, t);
    }

    /// Park the camera on `point`, optionally opening the left wall
    pub fn enter_hidden_zone(&mut self, point: Vec2, disable_left_boundary: bool) {
        if self.state.overridden {
            log::debug!("Already in a hidden zone; ignoring entrance");
            return;
        }
        log::info!("Entering hidden zone, camera -> {point:?}");
        self.state.overridden = true;
        self.state.override_position = point;
        self.state.current_target_y = point.y;
        if disable_left_boundary {
            self.set_boundary_enabled(Side::Left, false);
        }
    }

    /// Resume room scrolling and close the left wall again
    pub fn exit_hidden_zone(&mut self) {
        if self.state.overridden {
            log::info!("Leaving hidden zone");
        }
        self.state.overridden = false;
        self.set_boundary_enabled(Side::Left, true);
    }

    fn set_boundary_enabled(&mut self, side: Side, enabled: bool) {
        for wall in self.boundaries.iter_mut().filter(|w| w.side == side) {
            wall.enabled = enabled;
        }
    }

    pub fn boundary(&self, side: Side) -> Option<&Boundary> {
        self.boundaries.iter().find(|w| w.side == side)
    }

    /// World-space boxes of the walls that currently block the player
    pub fn active_boundaries(&self) -> impl Iterator<Item = (Side, Aabb)> + '_ {
        let pos = self.state.pos;
        self.boundaries
            .iter()
            .filter(|w| w.enabled)
            .map(move |w| (w.side, w.bounds(pos)))
    }
}
