//! Periodic freeze hazard
//!
//! While the player is inside a hazard zone the cycle loops:
//! Waiting (free time) -> Counting 3, 2, 1 -> roll -> Freezing or CoolingDown
//! (same length either way) -> Waiting. Waits are elapsed-time counters
//! advanced by `tick`, never sleeps. The only thing the cycle writes into the
//! player is the control-lock flag it is handed.

use rand::Rng;

use super::events::{SimEvent, SoundCue, Tint};
use super::state::{HazardCycleState, HazardPhase};
use crate::consts::COUNTDOWN_STEPS;
use crate::tuning::HazardTuning;

/// Phase changes allowed in one tick before the remainder is dropped
const MAX_TRANSITIONS_PER_TICK: u32 = 16;

#[derive(Debug, Clone)]
pub struct HazardCycle {
    pub tuning: HazardTuning,
    pub state: HazardCycleState,
    holds_lock: bool,
    resolutions: u64,
    freezes: u64,
}

impl HazardCycle {
    pub fn new(tuning: HazardTuning) -> Self {
        Self {
            tuning,
            state: HazardCycleState::default(),
            holds_lock: false,
            resolutions: 0,
            freezes: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn phase(&self) -> HazardPhase {
        self.state.phase
    }

    /// Countdowns that reached a roll
    pub fn resolutions(&self) -> u64 {
        self.resolutions
    }

    /// Rolls that froze the player
    pub fn freezes(&self) -> u64 {
        self.freezes
    }

    /// Player entered the zone; starts a fresh cycle from Waiting
    pub fn activate(&mut self, events: &mut Vec<SimEvent>) {
        if self.state.active {
            log::debug!("Hazard already active");
            return;
        }
        log::info!("Freeze hazard activated");
        self.state = HazardCycleState {
            phase: HazardPhase::Waiting,
            phase_elapsed: 0.0,
            active: true,
        };
        events.push(SimEvent::ParticlesActive(true));
        events.push(SimEvent::ZoneMusic(true));
    }

    /// Player left the zone; abandons any countdown and releases a held lock
    pub fn deactivate(&mut self, control_locked: &mut bool, events: &mut Vec<SimEvent>) {
        if self.holds_lock {
            *control_locked = false;
            self.holds_lock = false;
        }
        if !self.state.active {
            return;
        }
        log::info!("Freeze hazard deactivated during {:?}", self.state.phase);
        self.state = HazardCycleState::default();
        events.push(SimEvent::ParticlesActive(false));
        events.push(SimEvent::ZoneMusic(false));
        events.push(SimEvent::Countdown(None));
        events.push(SimEvent::FrozenBubble(false));
        events.push(SimEvent::SpriteTint(Tint::Normal));
    }

    fn phase_duration(&self) -> f32 {
        match self.state.phase {
            HazardPhase::Waiting => self.tuning.free_time,
            HazardPhase::Counting { .. } => self.tuning.count_interval,
            HazardPhase::Freezing | HazardPhase::CoolingDown => self.tuning.freeze_duration,
        }
    }

    /// Advance the wall-clock schedule by `dt`
    pub fn tick(
        &mut self,
        dt: f32,
        control_locked: &mut bool,
        rng: &mut impl Rng,
        events: &mut Vec<SimEvent>,
    ) {
        if !self.state.active {
            return;
        }

        self.state.phase_elapsed += dt.max(0.0);
        let mut transitions = 0;
        while self.state.phase_elapsed >= self.phase_duration() {
            if transitions == MAX_TRANSITIONS_PER_TICK {
                log::warn!("Hazard schedule too short for the frame; dropping remainder");
                self.state.phase_elapsed = 0.0;
                break;
            }
            self.state.phase_elapsed -= self.phase_duration();
            self.advance(control_locked, rng, events);
            transitions += 1;
        }
    }

    fn advance(
        &mut self,
        control_locked: &mut bool,
        rng: &mut impl Rng,
        events: &mut Vec<SimEvent>,
    ) {
        self.state.phase = match self.state.phase {
            HazardPhase::Waiting => {
                self.count(COUNTDOWN_STEPS, events);
                HazardPhase::Counting {
                    remaining: COUNTDOWN_STEPS,
                }
            }
            HazardPhase::Counting { remaining } if remaining > 1 => {
                self.count(remaining - 1, events);
                HazardPhase::Counting {
                    remaining: remaining - 1,
                }
            }
            HazardPhase::Counting { .. } => {
                events.push(SimEvent::Countdown(None));
                self.resolve(control_locked, rng, events)
            }
            HazardPhase::Freezing => {
                *control_locked = false;
                self.holds_lock = false;
                events.push(SimEvent::FrozenBubble(false));
                events.push(SimEvent::SpriteTint(Tint::Normal));
                HazardPhase::Waiting
            }
            HazardPhase::CoolingDown => HazardPhase::Waiting,
        };
    }

    fn count(&self, value: u8, events: &mut Vec<SimEvent>) {
        events.push(SimEvent::Countdown(Some(value)));
        events.push(SimEvent::Sound(SoundCue::Count));
    }

    /// Roll once; the resolved phase lasts the same either way
    fn resolve(
        &mut self,
        control_locked: &mut bool,
        rng: &mut impl Rng,
        events: &mut Vec<SimEvent>,
    ) -> HazardPhase {
        self.resolutions += 1;
        let roll: f32 = rng.random();
        if roll < self.tuning.freeze_chance {
            self.freezes += 1;
            *control_locked = true;
            self.holds_lock = true;
            log::debug!("Hazard roll {roll:.3}: freeze");
            events.push(SimEvent::Sound(SoundCue::Freeze));
            events.push(SimEvent::SpriteTint(Tint::Frozen));
            events.push(SimEvent::FrozenBubble(true));
            HazardPhase::Freezing
        } else {
            log::debug!("Hazard roll {roll:.3}: spared");
            HazardPhase::CoolingDown
        }
    }
}
