//! Knockback sources: jump pads, launchers and their projectiles, woofers
//!
//! Each source owns its one-shot guard and only ever hands the world an
//! [`ImpulseRequest`]; applying it is the receiver's job.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::impulse::OneShot;
use super::state::{ImpulseRequest, PlayerState};
use crate::tuning::KnockbackTuning;

/// Feet this close above a pad top still count as standing on it
const PAD_CONTACT_SLOP: f32 = 0.05;

/// Woofer push force is tuned per frame at this rate
const PUSH_REFERENCE_RATE: f32 = 60.0;

/// Player resting on or falling onto the top of `bounds`
fn stepping_on(bounds: &Aabb, player: &PlayerState) -> bool {
    let feet = player.feet_y();
    let top = bounds.max.y;
    player.bounds().overlaps_x(bounds)
        && player.vel.y <= 0.0
        && feet >= top - PAD_CONTACT_SLOP
        && feet <= top + PAD_CONTACT_SLOP
}

/// Springboard that launches the player straight up when stepped on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JumpPad {
    pub bounds: Aabb,
    pub force: f32,
    guard: OneShot,
}

impl JumpPad {
    pub fn new(bounds: Aabb, force: f32) -> Self {
        Self {
            bounds,
            force,
            guard: OneShot::default(),
        }
    }

    /// Impulse for this tick, at most one per landing
    pub fn update(&mut self, player: &PlayerState) -> Option<ImpulseRequest> {
        if !stepping_on(&self.bounds, player) {
            self.guard.rearm();
            return None;
        }
        if self.guard.trigger() {
            log::debug!("Jump pad fired at {:?}", self.bounds.center());
            Some(ImpulseRequest::new(Vec2::Y, self.force))
        } else {
            None
        }
    }
}

/// A thrown projectile; knocks the player back on first contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub half_size: f32,
    pub age: f32,
    pub lifetime: f32,
    pub knockback: f32,
    /// Upward bias mixed into the push so it lifts the player
    pub lift: f32,
    hit: OneShot,
}

impl Projectile {
    pub fn new(pos: Vec2, direction: Vec2, tuning: &KnockbackTuning) -> Self {
        Self {
            pos,
            vel: direction.normalize_or_zero() * tuning.projectile_speed,
            half_size: tuning.projectile_half_size,
            age: 0.0,
            lifetime: tuning.projectile_lifetime,
            knockback: tuning.projectile_knockback,
            lift: tuning.projectile_lift,
            hit: OneShot::default(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(self.half_size))
    }

    pub fn advance(&mut self, dt: f32) {
        if self.hit.has_fired() {
            return;
        }
        self.pos += self.vel * dt;
        self.age += dt;
    }

    /// Already hit something or flew too long
    pub fn is_spent(&self) -> bool {
        self.hit.has_fired() || self.age >= self.lifetime
    }

    /// Hit scenery; no knockback
    pub fn shatter(&mut self) {
        self.hit.trigger();
    }

    /// Knockback for the player if this is the first contact
    pub fn strike(&mut self, player: &PlayerState) -> Option<ImpulseRequest> {
        if !self.bounds().overlaps(&player.bounds()) || !self.hit.trigger() {
            return None;
        }
        let away = (player.pos - self.pos).normalize_or_zero();
        let push = (away + Vec2::Y * self.lift).normalize_or_zero();
        Some(ImpulseRequest::new(push, self.knockback))
    }
}

/// Turret that fires projectiles while the player is in range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Launcher {
    pub pos: Vec2,
    pub fire_direction: Vec2,
    pub fire_interval: f32,
    pub detection_range: f32,
    timer: f32,
}

impl Launcher {
    pub fn new(pos: Vec2, fire_direction: Vec2, tuning: &KnockbackTuning) -> Self {
        Self {
            pos,
            fire_direction,
            fire_interval: tuning.launcher_fire_interval,
            detection_range: tuning.launcher_range,
            timer: 0.0,
        }
    }

    /// Advance the firing timer; leaving range restarts it
    pub fn update(
        &mut self,
        dt: f32,
        player_pos: Vec2,
        tuning: &KnockbackTuning,
    ) -> Option<Projectile> {
        if self.pos.distance(player_pos) > self.detection_range {
            self.timer = 0.0;
            return None;
        }
        self.timer += dt;
        if self.timer >= self.fire_interval {
            self.timer = 0.0;
            Some(Projectile::new(self.pos, self.fire_direction, tuning))
        } else {
            None
        }
    }
}

/// Where a woofer is in its firing routine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WooferPhase {
    #[default]
    Idle,
    WindingUp,
    Emitting,
}

/// What a woofer did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WooferOutput {
    /// The wave left the speaker this tick
    pub wave_started: bool,
    pub push: Option<ImpulseRequest>,
}

/// Speaker that blasts a cone of air when its floor plate is stepped on
///
/// Stepping on the plate starts a wind-up; the wave then pushes the player
/// along the fire direction every tick for `wave_duration` while they stand
/// inside the cone and range. The plate stays dead until the cooldown ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Woofer {
    pub pos: Vec2,
    /// Plate that sets it off
    pub plate: Aabb,
    pub fire_angle_degrees: f32,
    pub anticipation_time: f32,
    pub wave_duration: f32,
    pub cooldown: f32,
    pub range: f32,
    pub push_force: f32,
    pub cone_degrees: f32,
    pub falloff: bool,
    phase: WooferPhase,
    phase_elapsed: f32,
    cooldown_remaining: f32,
    step: OneShot,
}

impl Woofer {
    pub fn new(pos: Vec2, plate: Aabb, fire_angle_degrees: f32, tuning: &KnockbackTuning) -> Self {
        Self {
            pos,
            plate,
            fire_angle_degrees,
            anticipation_time: tuning.woofer_anticipation_time,
            wave_duration: tuning.woofer_wave_duration,
            cooldown: tuning.woofer_cooldown,
            range: tuning.woofer_range,
            push_force: tuning.woofer_push_force,
            cone_degrees: tuning.woofer_cone_degrees,
            falloff: tuning.woofer_falloff,
            phase: WooferPhase::Idle,
            phase_elapsed: 0.0,
            cooldown_remaining: 0.0,
            step: OneShot::default(),
        }
    }

    pub fn phase(&self) -> WooferPhase {
        self.phase
    }

    pub fn fire_direction(&self) -> Vec2 {
        Vec2::from_angle(self.fire_angle_degrees.to_radians())
    }

    pub fn update(&mut self, dt: f32, player: &PlayerState) -> WooferOutput {
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);

        if !stepping_on(&self.plate, player) {
            self.step.rearm();
        } else if self.step.trigger() {
            self.try_fire();
        }

        let mut out = WooferOutput::default();
        match self.phase {
            WooferPhase::Idle => {}
            WooferPhase::WindingUp => {
                self.phase_elapsed += dt;
                if self.phase_elapsed >= self.anticipation_time {
                    self.phase = WooferPhase::Emitting;
                    self.phase_elapsed = 0.0;
                    out.wave_started = true;
                }
            }
            WooferPhase::Emitting => {
                self.phase_elapsed += dt;
                out.push = self.push_for(player.pos, dt);
                if self.phase_elapsed >= self.wave_duration {
                    self.phase = WooferPhase::Idle;
                    self.phase_elapsed = 0.0;
                }
            }
        }
        out
    }

    /// Steps during cooldown or mid-routine are swallowed
    fn try_fire(&mut self) {
        if self.cooldown_remaining > 0.0 || self.phase != WooferPhase::Idle {
            log::debug!("Woofer at {:?} still recharging", self.pos);
            return;
        }
        log::debug!("Woofer at {:?} winding up", self.pos);
        self.phase = WooferPhase::WindingUp;
        self.phase_elapsed = 0.0;
        self.cooldown_remaining = self.anticipation_time + self.wave_duration + self.cooldown;
    }

    fn push_for(&self, player_pos: Vec2, dt: f32) -> Option<ImpulseRequest> {
        let to_player = player_pos - self.pos;
        let distance = to_player.length();
        if distance > self.range {
            return None;
        }
        let direction = self.fire_direction();
        let off_axis = direction
            .dot(to_player.normalize_or_zero())
            .clamp(-1.0, 1.0)
            .acos()
            .to_degrees();
        if off_axis >= self.cone_degrees {
            return None;
        }

        let mut force = self.push_force;
        if self.falloff && self.range > 0.0 {
            force *= 1.0 - distance / self.range;
        }
        let magnitude = force * dt * PUSH_REFERENCE_RATE;
        (magnitude > 0.0).then(|| ImpulseRequest::new(direction, magnitude))
    }
}
