//! Trigger zones the player walks through
//!
//! Zones fire on the entering edge only: a zone reports itself the first tick
//! the player overlaps it and stays quiet until the player leaves and
//! returns.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::surface::ContactTag;

/// What a zone does when entered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TriggerKind {
    HazardZoneEnter,
    HazardZoneExit,
    /// Camera parks on `point`; only fires while moving left
    HiddenZoneEntrance {
        point: Vec2,
        disable_left_boundary: bool,
    },
    /// Only fires while moving right
    HiddenZoneExit,
    StoryMarker {
        id: u32,
    },
}

impl TriggerKind {
    pub fn tag(&self) -> ContactTag {
        match self {
            TriggerKind::HazardZoneEnter => ContactTag::HazardZoneEnter,
            TriggerKind::HazardZoneExit => ContactTag::HazardZoneExit,
            TriggerKind::HiddenZoneEntrance { .. } => ContactTag::HiddenZoneEntrance,
            TriggerKind::HiddenZoneExit => ContactTag::HiddenZoneExit,
            TriggerKind::StoryMarker { .. } => ContactTag::StoryMarker,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerZone {
    pub bounds: Aabb,
    pub kind: TriggerKind,
    occupied: bool,
}

impl TriggerZone {
    pub fn new(bounds: Aabb, kind: TriggerKind) -> Self {
        Self {
            bounds,
            kind,
            occupied: false,
        }
    }

    /// Update occupancy; true on the tick the player enters
    pub fn entered(&mut self, player: &Aabb) -> bool {
        let inside = self.bounds.overlaps(player);
        let entered = inside && !self.occupied;
        self.occupied = inside;
        entered
    }
}

/// Kinds of all zones entered this tick, in zone order
pub fn collect_entered(zones: &mut [TriggerZone], player: &Aabb) -> Vec<TriggerKind> {
    zones
        .iter_mut()
        .filter_map(|zone| zone.entered(player).then_some(zone.kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone() -> TriggerZone {
        TriggerZone::new(
            Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0)),
            TriggerKind::StoryMarker { id: 7 },
        )
    }

    #[test]
    fn test_fires_on_entering_edge_only() {
        let mut z = zone();
        let outside = Aabb::from_center(Vec2::new(-3.0, 1.0), Vec2::splat(0.5));
        let inside = Aabb::from_center(Vec2::new(1.0, 1.0), Vec2::splat(0.5));

        assert!(!z.entered(&outside));
        assert!(z.entered(&inside));
        assert!(!z.entered(&inside));
        assert!(!z.entered(&outside));
        assert!(z.entered(&inside));
    }

    #[test]
    fn test_collect_entered() {
        let mut zones = vec![
            zone(),
            TriggerZone::new(
                Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(12.0, 2.0)),
                TriggerKind::HazardZoneEnter,
            ),
        ];
        let inside = Aabb::from_center(Vec2::new(1.0, 1.0), Vec2::splat(0.5));
        assert_eq!(collect_entered(&mut zones, &inside), vec![TriggerKind::StoryMarker { id: 7 }]);
        assert!(collect_entered(&mut zones, &inside).is_empty());
    }

    #[test]
    fn test_tags() {
        assert_eq!(TriggerKind::HiddenZoneExit.tag(), ContactTag::HiddenZoneExit);
        assert_eq!(zone().kind.tag(), ContactTag::StoryMarker);
    }
}
