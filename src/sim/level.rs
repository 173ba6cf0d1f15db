//! Static level geometry
//!
//! Platforms are one-way: they only catch the player from above. This is the
//! whole of the collision model; there is no general rigid-body physics.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::surface::{ContactTag, ProbeHit, SurfaceProbe};

/// A standable box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub bounds: Aabb,
    pub tag: ContactTag,
    /// Surface normal reported to the classifier; tilted for slopes
    pub normal: Vec2,
}

impl Platform {
    pub fn new(bounds: Aabb, tag: ContactTag) -> Self {
        Self {
            bounds,
            tag,
            normal: Vec2::Y,
        }
    }

    /// Platform whose surface leans `degrees` away from flat
    pub fn sloped(bounds: Aabb, tag: ContactTag, degrees: f32) -> Self {
        let rad = degrees.to_radians();
        Self {
            bounds,
            tag,
            normal: Vec2::new(-rad.sin(), rad.cos()),
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.bounds.max.y
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Level {
    pub platforms: Vec<Platform>,
}

impl Level {
    pub fn new(platforms: Vec<Platform>) -> Self {
        Self { platforms }
    }

    pub fn add(&mut self, platform: Platform) {
        self.platforms.push(platform);
    }

    /// Horizontal footprint of the ground probe
    fn probe_span(bounds: &Aabb, width_factor: f32) -> (f32, f32) {
        let half = bounds.width() * width_factor.clamp(0.0, 1.0) / 2.0;
        let cx = bounds.center().x;
        (cx - half, cx + half)
    }

    fn under_span(&self, span: (f32, f32)) -> impl Iterator<Item = &Platform> {
        self.platforms
            .iter()
            .filter(move |p| p.bounds.min.x < span.1 && p.bounds.max.x > span.0)
    }

    /// Highest platform top crossed while the feet moved from `prev_feet_y`
    /// down to the bottom of `bounds`
    pub fn landing_height(
        &self,
        prev_feet_y: f32,
        bounds: &Aabb,
        width_factor: f32,
    ) -> Option<f32> {
        let span = Self::probe_span(bounds, width_factor);
        let feet = bounds.min.y;
        self.under_span(span)
            .map(Platform::top)
            .filter(|&top| top <= prev_feet_y && top >= feet)
            .reduce(f32::max)
    }

    /// Whether a box touches any platform
    pub fn overlaps_solid(&self, bounds: &Aabb) -> bool {
        self.platforms.iter().any(|p| p.bounds.overlaps(bounds))
    }
}

impl SurfaceProbe for Level {
    fn probe_down(&self, bounds: &Aabb, distance: f32, width_factor: f32) -> Option<ProbeHit> {
        let span = Self::probe_span(bounds, width_factor);
        let reach = bounds.min.y - distance.max(0.0);
        let center_y = bounds.center().y;

        self.under_span(span)
            .filter(|p| p.top() >= reach && p.top() <= center_y)
            .max_by(|a, b| a.top().total_cmp(&b.top()))
            .map(|p| ProbeHit {
                tag: p.tag,
                normal: p.normal,
                surface_y: p.top(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Platform {
        Platform::new(Aabb::new(Vec2::new(-10.0, -1.0), Vec2::new(10.0, 0.0)), ContactTag::Normal)
    }

    fn player_box(x: f32, feet: f32) -> Aabb {
        Aabb::new(Vec2::new(x - 0.4, feet), Vec2::new(x + 0.4, feet + 1.0))
    }

    #[test]
    fn test_probe_finds_floor_within_reach() {
        let level = Level::new(vec![floor()]);
        let hit = level.probe_down(&player_box(0.0, 0.05), 0.1, 0.9).unwrap();
        assert_eq!(hit.surface_y, 0.0);
        assert_eq!(hit.tag, ContactTag::Normal);
        assert!(level.probe_down(&player_box(0.0, 0.5), 0.1, 0.9).is_none());
    }

    #[test]
    fn test_probe_prefers_nearest_surface() {
        let ice = Platform::new(
            Aabb::new(Vec2::new(-1.0, -0.5), Vec2::new(1.0, 0.02)),
            ContactTag::Ice,
        );
        let level = Level::new(vec![floor(), ice]);
        let hit = level.probe_down(&player_box(0.0, 0.05), 0.1, 0.9).unwrap();
        assert_eq!(hit.tag, ContactTag::Ice);
    }

    #[test]
    fn test_probe_ignores_platforms_off_to_the_side() {
        let ledge = Platform::new(
            Aabb::new(Vec2::new(0.38, -1.0), Vec2::new(5.0, 0.0)),
            ContactTag::Normal,
        );
        let level = Level::new(vec![ledge]);
        // narrowed probe spans -0.36..0.36
        assert!(level.probe_down(&player_box(0.0, 0.0), 0.1, 0.9).is_none());
        assert!(level.probe_down(&player_box(0.0, 0.0), 0.1, 1.0).is_some());
    }

    #[test]
    fn test_sloped_normal() {
        let slope = Platform::sloped(floor().bounds, ContactTag::Normal, 45.0);
        assert!((crate::angle_from_up(slope.normal) - 45.0).abs() < 0.01);
    }

    #[test]
    fn test_landing_height_catches_fast_fall() {
        let level = Level::new(vec![floor()]);
        assert_eq!(level.landing_height(2.0, &player_box(0.0, -0.7), 0.9), Some(0.0));
        assert_eq!(level.landing_height(2.0, &player_box(0.0, 0.5), 0.9), None);
    }
}
