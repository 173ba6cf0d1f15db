//! Fixed timestep world tick
//!
//! Physics-rate work (surface sensing, motion, knockback, triggers) runs in
//! [`World::step`]. [`World::frame`] feeds it from a variable frame time and
//! then runs the frame-rate work: camera smoothing and the hazard schedule.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::{CameraScroller, Side};
use super::events::{Presenter, SimEvent, SoundCue, dispatch_all};
use super::hazard::HazardCycle;
use super::knockback::{JumpPad, Launcher, Projectile, Woofer};
use super::level::{Level, Platform};
use super::motion::MotionController;
use super::state::{ImpulseRequest, PlayerState};
use super::surface::{ContactTag, SurfaceClassifier};
use super::triggers::{TriggerKind, TriggerZone, collect_entered};
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::{KnockbackTuning, Tuning};

/// State of the jump control for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpButton {
    #[default]
    Up,
    /// Went down since the last tick
    Pressed,
    Held,
    /// Went up since the last tick
    Released,
    /// Went down and back up since the last tick
    Tapped,
}

impl JumpButton {
    pub fn is_edge(self) -> bool {
        matches!(
            self,
            JumpButton::Pressed | JumpButton::Released | JumpButton::Tapped
        )
    }

    /// Level the button settles to once its edge has been consumed
    pub fn settled(self) -> Self {
        match self {
            JumpButton::Pressed | JumpButton::Held => JumpButton::Held,
            JumpButton::Released | JumpButton::Tapped | JumpButton::Up => JumpButton::Up,
        }
    }
}

/// Edges waiting for a tick beyond this are dropped oldest first
const MAX_PENDING_EDGES: usize = 4;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Horizontal axis in [-1, 1]
    pub horizontal: f32,
    pub jump: JumpButton,
    /// Pointer position in world space; the jump aims at it
    pub pointer: Vec2,
}

/// Everything the simulation owns
#[derive(Debug, Clone)]
pub struct World {
    pub player: PlayerState,
    pub motion: MotionController,
    pub classifier: SurfaceClassifier,
    pub camera: CameraScroller,
    pub hazard: HazardCycle,
    pub level: Level,
    pub triggers: Vec<TriggerZone>,
    pub pads: Vec<JumpPad>,
    pub launchers: Vec<Launcher>,
    pub projectiles: Vec<Projectile>,
    pub woofers: Vec<Woofer>,
    pub knockback: KnockbackTuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub time_ticks: u64,
    rng: Pcg32,
    accumulator: f32,
    /// Edges not yet delivered to a tick, oldest first
    pending_edges: VecDeque<JumpButton>,
    events: Vec<SimEvent>,
}

impl World {
    pub fn new(tuning: &Tuning, level: Level, spawn: Vec2, seed: u64) -> Self {
        let motion = MotionController::new(tuning.motion.clone());
        let player = motion.spawn(spawn);
        log::info!(
            "World: {} platforms, spawn {spawn:?}, seed {seed}",
            level.platforms.len()
        );
        Self {
            player,
            classifier: SurfaceClassifier::new(&tuning.motion),
            motion,
            camera: CameraScroller::new(&tuning.camera, spawn.x),
            hazard: HazardCycle::new(tuning.hazard.clone()),
            level,
            triggers: Vec::new(),
            pads: Vec::new(),
            launchers: Vec::new(),
            projectiles: Vec::new(),
            woofers: Vec::new(),
            knockback: tuning.knockback.clone(),
            seed,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            accumulator: 0.0,
            pending_edges: VecDeque::new(),
            events: Vec::new(),
        }
    }

    pub fn add_trigger(&mut self, zone: TriggerZone) {
        self.triggers.push(zone);
    }

    /// Pad plus the platform it sits on
    pub fn add_pad(&mut self, pad: JumpPad) {
        self.level.add(Platform::new(pad.bounds, ContactTag::Normal));
        self.pads.push(pad);
    }

    pub fn add_launcher(&mut self, launcher: Launcher) {
        self.launchers.push(launcher);
    }

    /// Woofer plus the plate that sets it off
    pub fn add_woofer(&mut self, woofer: Woofer) {
        self.level.add(Platform::new(woofer.plate, ContactTag::Normal));
        self.woofers.push(woofer);
    }

    /// Advance the simulation by one fixed tick
    pub fn step(&mut self, input: &TickInput, dt: f32) {
        let reading = self.classifier.sense(
            &self.level,
            &self.player.bounds(),
            self.player.vel.y,
            self.player.jump_cooldown_remaining,
        );
        let prev_feet = self.player.feet_y();
        self.motion
            .tick(&mut self.player, &reading, input, dt, &mut self.events);
        self.catch_fall(prev_feet);

        for request in self.update_knockback(dt) {
            self.apply_impulse(request);
        }
        for request in self.update_woofers(dt) {
            self.motion.apply_impulse(&mut self.player, request);
        }

        self.update_triggers();
        self.push_out_of_boundaries();
        self.time_ticks += 1;
    }

    /// Stop on any platform crossed this tick so fast falls cannot tunnel
    fn catch_fall(&mut self, prev_feet: f32) {
        let player = &mut self.player;
        if player.grounded || player.vel.y > 0.0 {
            return;
        }
        if let Some(top) = self.level.landing_height(
            prev_feet,
            &player.bounds(),
            self.classifier.probe_width_factor,
        ) {
            player.pos.y = top + player.half_extents.y;
            player.vel.y = 0.0;
        }
    }

    /// Impulses produced by pads and projectiles this tick
    fn update_knockback(&mut self, dt: f32) -> Vec<ImpulseRequest> {
        let mut requests = Vec::new();

        for pad in &mut self.pads {
            requests.extend(pad.update(&self.player));
        }

        for launcher in &mut self.launchers {
            if let Some(projectile) = launcher.update(dt, self.player.pos, &self.knockback) {
                self.projectiles.push(projectile);
            }
        }

        for projectile in &mut self.projectiles {
            projectile.advance(dt);
            if let Some(request) = projectile.strike(&self.player) {
                requests.push(request);
            } else if self.level.overlaps_solid(&projectile.bounds()) {
                projectile.shatter();
            }
        }
        self.projectiles.retain(|p| !p.is_spent());

        requests
    }

    /// Continuous wave pushes; they carry no bounce cue of their own
    fn update_woofers(&mut self, dt: f32) -> Vec<ImpulseRequest> {
        let mut pushes = Vec::new();
        for woofer in &mut self.woofers {
            let out = woofer.update(dt, &self.player);
            if out.wave_started {
                self.events.push(SimEvent::SpeakerWave {
                    origin: woofer.pos,
                    angle_degrees: woofer.fire_angle_degrees,
                });
            }
            pushes.extend(out.push);
        }
        pushes
    }

    fn update_triggers(&mut self) {
        let bounds = self.player.bounds();
        for kind in collect_entered(&mut self.triggers, &bounds) {
            log::debug!("Entered {:?} zone", kind.tag());
            match kind {
                TriggerKind::HazardZoneEnter => self.hazard.activate(&mut self.events),
                TriggerKind::HazardZoneExit => self
                    .hazard
                    .deactivate(&mut self.player.control_locked, &mut self.events),
                TriggerKind::HiddenZoneEntrance {
                    point,
                    disable_left_boundary,
                } => {
                    if self.player.vel.x < -HIDDEN_ZONE_MIN_SPEED {
                        self.camera.enter_hidden_zone(point, disable_left_boundary);
                    }
                }
                TriggerKind::HiddenZoneExit => {
                    if self.player.vel.x > HIDDEN_ZONE_MIN_SPEED {
                        self.camera.exit_hidden_zone();
                    }
                }
                TriggerKind::StoryMarker { id } => {
                    log::info!("Story marker {id}");
                    self.events.push(SimEvent::StoryMarker(id));
                }
            }
        }
    }

    /// Keep the player inside the enabled screen-edge walls
    fn push_out_of_boundaries(&mut self) {
        let player = &mut self.player;
        for (side, wall) in self.camera.active_boundaries() {
            let body = player.bounds();
            if body.max.y <= wall.min.y || body.min.y >= wall.max.y {
                continue;
            }
            match side {
                Side::Left if body.min.x < wall.max.x => {
                    player.pos.x = wall.max.x + player.half_extents.x;
                    player.vel.x = player.vel.x.max(0.0);
                }
                Side::Right if body.max.x > wall.min.x => {
                    player.pos.x = wall.min.x - player.half_extents.x;
                    player.vel.x = player.vel.x.min(0.0);
                }
                _ => {}
            }
        }
    }

    /// Hold an edge for the next tick; a press still waiting when its release
    /// arrives becomes a tap so both land on the same tick
    fn queue_edge(&mut self, edge: JumpButton) {
        let pending = &mut self.pending_edges;
        if edge == JumpButton::Released && pending.back() == Some(&JumpButton::Pressed) {
            pending.pop_back();
            pending.push_back(JumpButton::Tapped);
            return;
        }
        if pending.len() == MAX_PENDING_EDGES {
            log::debug!("Dropping stale jump edge {:?}", pending.front());
            pending.pop_front();
        }
        pending.push_back(edge);
    }

    /// Run as many fixed ticks as `frame_dt` covers, then the per-frame work
    ///
    /// Each queued edge reaches exactly one tick, in arrival order; every other
    /// tick sees the settled button. Returns the number of ticks run.
    pub fn frame(&mut self, input: &TickInput, frame_dt: f32) -> u32 {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        if input.jump.is_edge() {
            self.queue_edge(input.jump);
        }

        self.accumulator += frame_dt;
        let mut tick_input = input.clone();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick_input.jump = self
                .pending_edges
                .pop_front()
                .unwrap_or_else(|| input.jump.settled());
            self.step(&tick_input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        self.camera.tick(self.player.pos.y, frame_dt);
        self.hazard.tick(
            frame_dt,
            &mut self.player.control_locked,
            &mut self.rng,
            &mut self.events,
        );
        substeps
    }

    /// Knock the player back; a bounce cue plays when it lands
    pub fn apply_impulse(&mut self, request: ImpulseRequest) -> bool {
        let applied = self.motion.apply_impulse(&mut self.player, request);
        if applied {
            self.events.push(SimEvent::Sound(SoundCue::Bounce));
        }
        applied
    }

    pub fn activate_hazard(&mut self) {
        self.hazard.activate(&mut self.events);
    }

    pub fn deactivate_hazard(&mut self) {
        self.hazard
            .deactivate(&mut self.player.control_locked, &mut self.events);
    }

    pub fn enter_hidden_zone(&mut self, point: Vec2, disable_left_boundary: bool) {
        self.camera.enter_hidden_zone(point, disable_left_boundary);
    }

    pub fn exit_hidden_zone(&mut self) {
        self.camera.exit_hidden_zone();
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drain pending events into a presenter
    pub fn present(&mut self, presenter: &mut dyn Presenter, settings: &Settings) {
        let events = self.drain_events();
        dispatch_all(&events, presenter, settings);
    }
}
