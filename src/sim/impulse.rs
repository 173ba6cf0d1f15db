//! One-shot knockback impulses
//!
//! The receiver applies whatever it is given. Sources hold a [`OneShot`] so a
//! single contact produces exactly one impulse however long it lasts.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{ImpulseRequest, PlayerState};

/// Replace the player's velocity with `normalize(direction) * magnitude`
///
/// Ignored while the player is frozen or when the direction has no length.
/// Returns whether the impulse was applied.
pub fn apply_impulse(player: &mut PlayerState, request: ImpulseRequest) -> bool {
    if player.control_locked {
        return false;
    }
    let direction = request.direction.normalize_or_zero();
    if direction == Vec2::ZERO || !request.magnitude.is_finite() {
        log::debug!("Ignoring degenerate impulse {request:?}");
        return false;
    }

    player.vel = Vec2::ZERO;
    player.vel += direction * request.magnitude;
    player.charge.cancel();
    true
}

/// Fires once per contact; re-arms only when the contact ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneShot {
    fired: bool,
}

impl OneShot {
    /// True the first time it is called during a contact
    pub fn trigger(&mut self) -> bool {
        if self.fired {
            false
        } else {
            self.fired = true;
            true
        }
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Contact ended
    pub fn rearm(&mut self) {
        self.fired = false;
    }
}
