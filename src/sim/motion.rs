//! Player motion: friction regimes, charge-jump and integration
//!
//! States: Grounded-Idle -> Grounded-Charging (press) -> Airborne (release)
//! -> Grounded-Idle (ground sensed after the liftoff window). The control
//! lock is not a state of its own; it gates every tick.

use glam::Vec2;

use super::events::{SimEvent, SoundCue};
use super::impulse::apply_impulse;
use super::state::{ChargeState, ImpulseRequest, PlayerState};
use super::surface::{SurfaceClass, SurfaceReading};
use super::tick::{JumpButton, TickInput};
use crate::tuning::MotionTuning;
use crate::{input_sign, move_toward};

/// Drives a [`PlayerState`] one fixed tick at a time
#[derive(Debug, Clone)]
pub struct MotionController {
    pub tuning: MotionTuning,
}

impl MotionController {
    pub fn new(tuning: MotionTuning) -> Self {
        Self { tuning }
    }

    /// Fresh player standing at `pos`
    pub fn spawn(&self, pos: Vec2) -> PlayerState {
        PlayerState::new(
            pos,
            Vec2::from(self.tuning.half_extents),
            self.tuning.max_charge_time,
        )
    }

    /// Launch speed for a given charge; never below the tap floor
    pub fn jump_power(&self, charge: &ChargeState) -> f32 {
        (charge.ratio() * self.tuning.max_jump_power).max(self.tuning.min_jump_power)
    }

    /// Knockback entry point for projectiles and pads
    pub fn apply_impulse(&self, player: &mut PlayerState, request: ImpulseRequest) -> bool {
        apply_impulse(player, request)
    }

    /// Advance the player by one fixed tick using this tick's surface reading
    pub fn tick(
        &self,
        player: &mut PlayerState,
        reading: &SurfaceReading,
        input: &TickInput,
        dt: f32,
        events: &mut Vec<SimEvent>,
    ) {
        let was_grounded = player.grounded;
        player.grounded = reading.grounded;
        player.surface = if reading.grounded {
            reading.class
        } else {
            SurfaceClass::Normal
        };

        if player.grounded && !was_grounded {
            log::debug!("Landed on {:?} at {:?}", player.surface, player.pos);
            events.push(SimEvent::Sound(SoundCue::Land));
        }

        // A charge only survives while standing on something
        if player.charge.is_charging && !player.grounded {
            player.charge.cancel();
        }

        let mut launched = false;
        if player.control_locked {
            player.charge.cancel();
            player.vel.x = 0.0;
        } else {
            launched = self.handle_jump(player, input, dt, events);
            if !launched {
                self.integrate_horizontal(player, input.horizontal, dt);
            }
        }

        self.integrate_vertical(player, reading, dt);
        player.pos += player.vel * dt;

        if !launched {
            player.jump_cooldown_remaining = (player.jump_cooldown_remaining - dt).max(0.0);
        }
    }

    /// Charge and release handling; returns true on the launch tick
    fn handle_jump(
        &self,
        player: &mut PlayerState,
        input: &TickInput,
        dt: f32,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        match input.jump {
            JumpButton::Pressed => {
                self.start_charge(player);
                false
            }
            JumpButton::Held => {
                if player.charge.is_charging {
                    player.charge.charge_time += dt;
                }
                false
            }
            JumpButton::Released => self.release(player, input.pointer, events),
            JumpButton::Tapped => {
                self.start_charge(player);
                self.release(player, input.pointer, events)
            }
            JumpButton::Up => false,
        }
    }

    /// Re-presses while charging, airborne or cooling down are ignored
    fn start_charge(&self, player: &mut PlayerState) {
        if player.grounded && !player.charge.is_charging && player.jump_cooldown_remaining <= 0.0 {
            player.charge.is_charging = true;
            player.charge.charge_time = 0.0;
        }
    }

    fn release(
        &self,
        player: &mut PlayerState,
        pointer: Vec2,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        if !player.charge.is_charging {
            return false;
        }
        let power = self.jump_power(&player.charge);
        let direction = player.aim_direction(pointer);
        player.vel = direction * power;
        player.grounded = false;
        player.jump_cooldown_remaining = self.tuning.jump_cooldown;
        player.charge.cancel();
        log::debug!("Jump: power {power:.2} toward {direction:?}");
        events.push(SimEvent::Sound(SoundCue::Jump));
        true
    }

    /// Linear approach of velocity.x toward the input target speed
    fn integrate_horizontal(&self, player: &mut PlayerState, horizontal: f32, dt: f32) {
        let t = &self.tuning;
        let horizontal = if horizontal.is_finite() {
            horizontal.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let surface = player.surface;
        let charging = player.charge.is_charging;

        // Aiming plants the feet except on ice, where the slide carries on
        let suppressed = surface == SurfaceClass::NoControlIce
            || (charging && matches!(surface, SurfaceClass::Normal | SurfaceClass::Slope));
        let target_speed = if suppressed {
            0.0
        } else {
            horizontal * t.move_speed
        };

        let change_rate = if !player.grounded {
            t.air_control_rate
        } else if surface == SurfaceClass::NoControlIce {
            t.no_control_decel
        } else if target_speed != 0.0 {
            if surface.is_slippery() {
                t.ice_acceleration
            } else {
                t.ground_decel
            }
        } else if surface.is_slippery() {
            t.ice_decel
        } else {
            t.ground_decel
        };

        player.vel.x = move_toward(player.vel.x, target_speed, change_rate * dt);

        if !charging && surface != SurfaceClass::NoControlIce {
            if let Some(sign) = input_sign(horizontal) {
                player.facing = sign;
            }
        }
    }

    /// Rest on the ground or fall
    fn integrate_vertical(&self, player: &mut PlayerState, reading: &SurfaceReading, dt: f32) {
        if player.grounded && player.vel.y <= 0.0 {
            player.vel.y = 0.0;
            if let Some(support_y) = reading.support_y {
                player.pos.y = support_y + player.half_extents.y;
            }
        } else {
            player.vel.y -= self.tuning.gravity * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    fn controller() -> MotionController {
        MotionController::new(MotionTuning::default())
    }

    fn ground(class: SurfaceClass) -> SurfaceReading {
        SurfaceReading {
            grounded: true,
            class,
            normal: Vec2::Y,
            support_y: Some(0.0),
        }
    }

    fn standing_player(mc: &MotionController) -> PlayerState {
        let mut player = mc.spawn(Vec2::new(0.0, 0.5));
        player.grounded = true;
        player
    }

    fn input(horizontal: f32, jump: JumpButton) -> TickInput {
        TickInput {
            horizontal,
            jump,
            pointer: Vec2::new(0.0, 10.0),
        }
    }

    fn run(
        mc: &MotionController,
        player: &mut PlayerState,
        reading: SurfaceReading,
        tick_input: TickInput,
        ticks: usize,
    ) -> Vec<SimEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            mc.tick(player, &reading, &tick_input, SIM_DT, &mut events);
        }
        events
    }

    #[test]
    fn test_jump_power_examples() {
        let mc = controller();
        let mut charge = ChargeState::new(1.0);
        charge.charge_time = 0.5;
        assert!((mc.jump_power(&charge) - 20.0).abs() < 1e-4);
        charge.charge_time = 0.0;
        assert_eq!(mc.jump_power(&charge), 5.0);
        charge.charge_time = 2.0;
        assert_eq!(mc.jump_power(&charge), 40.0);
    }

    #[test]
    fn test_zero_max_charge_is_full_power() {
        let mc = controller();
        let charge = ChargeState::new(0.0);
        assert_eq!(mc.jump_power(&charge), 40.0);
    }

    #[test]
    fn test_charge_and_release_launches_toward_pointer() {
        let mc = controller();
        let mut player = standing_player(&mc);
        let reading = ground(SurfaceClass::Normal);

        run(&mc, &mut player, reading, input(0.0, JumpButton::Pressed), 1);
        assert!(player.charge.is_charging);
        run(&mc, &mut player, reading, input(0.0, JumpButton::Held), 25);
        assert!((player.charge.charge_time - 0.5).abs() < 1e-3);

        let mut release = input(0.0, JumpButton::Released);
        release.pointer = player.pos + Vec2::new(3.0, 4.0);
        let events = run(&mc, &mut player, reading, release, 1);

        assert!(!player.charge.is_charging);
        assert!(!player.grounded);
        assert_eq!(player.jump_cooldown_remaining, mc.tuning.jump_cooldown);
        assert!(events.contains(&SimEvent::Sound(SoundCue::Jump)));
        // 20 power along (0.6, 0.8), minus one tick of gravity on y
        assert!((player.vel.x - 12.0).abs() < 0.05);
        assert!((player.vel.y - (16.0 - mc.tuning.gravity * SIM_DT)).abs() < 0.05);
    }

    #[test]
    fn test_press_ignored_when_airborne_locked_or_cooling() {
        let mc = controller();
        let mut player = standing_player(&mc);
        run(&mc, &mut player, SurfaceReading::airborne(), input(0.0, JumpButton::Pressed), 1);
        assert!(!player.charge.is_charging);

        let mut player = standing_player(&mc);
        player.control_locked = true;
        run(&mc, &mut player, ground(SurfaceClass::Normal), input(0.0, JumpButton::Pressed), 1);
        assert!(!player.charge.is_charging);

        let mut player = standing_player(&mc);
        player.jump_cooldown_remaining = 0.1;
        run(&mc, &mut player, ground(SurfaceClass::Normal), input(0.0, JumpButton::Pressed), 1);
        assert!(!player.charge.is_charging);
    }

    #[test]
    fn test_repress_while_charging_keeps_charge() {
        let mc = controller();
        let mut player = standing_player(&mc);
        let reading = ground(SurfaceClass::Normal);
        run(&mc, &mut player, reading, input(0.0, JumpButton::Pressed), 1);
        run(&mc, &mut player, reading, input(0.0, JumpButton::Held), 10);
        let held = player.charge.charge_time;
        run(&mc, &mut player, reading, input(0.0, JumpButton::Pressed), 1);
        assert!(player.charge.is_charging);
        assert_eq!(player.charge.charge_time, held);
    }

    #[test]
    fn test_release_without_charge_does_nothing() {
        let mc = controller();
        let mut player = standing_player(&mc);
        let reading = ground(SurfaceClass::Normal);
        let events = run(&mc, &mut player, reading, input(0.0, JumpButton::Released), 1);
        assert!(player.grounded);
        assert!(events.is_empty());
    }

    #[test]
    fn test_tap_within_one_tick_jumps_at_floor_power() {
        let mc = controller();
        let mut player = standing_player(&mc);
        let reading = ground(SurfaceClass::Normal);
        let events = run(&mc, &mut player, reading, input(0.0, JumpButton::Tapped), 1);

        assert!(!player.grounded);
        assert!(!player.charge.is_charging);
        assert!(events.contains(&SimEvent::Sound(SoundCue::Jump)));
        let expected = mc.tuning.min_jump_power - mc.tuning.gravity * SIM_DT;
        assert!((player.vel.y - expected).abs() < 1e-4);
    }

    #[test]
    fn test_tap_ignored_while_cooling_down() {
        let mc = controller();
        let mut player = standing_player(&mc);
        player.jump_cooldown_remaining = 0.1;
        let reading = ground(SurfaceClass::Normal);
        let events = run(&mc, &mut player, reading, input(0.0, JumpButton::Tapped), 1);
        assert!(player.grounded);
        assert!(events.is_empty());
    }

    #[test]
    fn test_lock_cancels_charge_and_stops_player() {
        let mc = controller();
        let mut player = standing_player(&mc);
        let reading = ground(SurfaceClass::Ice);
        player.vel.x = 4.0;
        run(&mc, &mut player, reading, input(0.0, JumpButton::Pressed), 1);
        assert!(player.charge.is_charging);

        player.control_locked = true;
        run(&mc, &mut player, reading, input(1.0, JumpButton::Held), 1);
        assert!(!player.charge.is_charging);
        assert_eq!(player.vel.x, 0.0);

        let events = run(&mc, &mut player, reading, input(1.0, JumpButton::Released), 1);
        assert!(player.grounded);
        assert!(events.is_empty());
    }

    #[test]
    fn test_normal_ground_reaches_run_speed_quickly() {
        let mc = controller();
        let mut player = standing_player(&mc);
        run(&mc, &mut player, ground(SurfaceClass::Normal), input(1.0, JumpButton::Up), 5);
        assert_eq!(player.vel.x, mc.tuning.move_speed);
        assert_eq!(player.facing, 1.0);

        run(&mc, &mut player, ground(SurfaceClass::Normal), input(0.0, JumpButton::Up), 5);
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_ice_accelerates_and_coasts_linearly() {
        let mc = controller();
        let mut player = standing_player(&mc);
        run(&mc, &mut player, ground(SurfaceClass::Ice), input(1.0, JumpButton::Up), 1);
        assert!((player.vel.x - mc.tuning.ice_acceleration * SIM_DT).abs() < 1e-5);

        player.vel.x = 4.0;
        run(&mc, &mut player, ground(SurfaceClass::Ice), input(0.0, JumpButton::Up), 10);
        let expected = 4.0 - mc.tuning.ice_decel * SIM_DT * 10.0;
        assert!((player.vel.x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_slope_uses_ice_friction() {
        let mc = controller();
        let mut player = standing_player(&mc);
        player.vel.x = 2.0;
        run(&mc, &mut player, ground(SurfaceClass::Slope), input(0.0, JumpButton::Up), 1);
        assert!((player.vel.x - (2.0 - mc.tuning.ice_decel * SIM_DT)).abs() < 1e-5);
    }

    #[test]
    fn test_no_control_ice_ignores_input_and_facing() {
        let mc = controller();
        let mut player = standing_player(&mc);
        player.vel.x = 3.0;
        player.facing = 1.0;
        run(&mc, &mut player, ground(SurfaceClass::NoControlIce), input(-1.0, JumpButton::Up), 1);
        assert!((player.vel.x - (3.0 - mc.tuning.no_control_decel * SIM_DT)).abs() < 1e-5);
        assert_eq!(player.facing, 1.0);
    }

    #[test]
    fn test_charging_plants_feet_on_normal_but_not_ice() {
        let mc = controller();

        let mut player = standing_player(&mc);
        run(&mc, &mut player, ground(SurfaceClass::Normal), input(0.0, JumpButton::Pressed), 1);
        run(&mc, &mut player, ground(SurfaceClass::Normal), input(1.0, JumpButton::Held), 5);
        assert_eq!(player.vel.x, 0.0);
        assert_eq!(player.facing, 1.0);

        let mut player = standing_player(&mc);
        player.facing = -1.0;
        run(&mc, &mut player, ground(SurfaceClass::Ice), input(0.0, JumpButton::Pressed), 1);
        run(&mc, &mut player, ground(SurfaceClass::Ice), input(1.0, JumpButton::Held), 5);
        assert!(player.vel.x > 0.0);
        // facing holds while aiming
        assert_eq!(player.facing, -1.0);
    }

    #[test]
    fn test_airborne_keeps_momentum_by_default() {
        let mc = controller();
        let mut player = mc.spawn(Vec2::new(0.0, 5.0));
        player.vel = Vec2::new(6.0, 0.0);
        run(&mc, &mut player, SurfaceReading::airborne(), input(-1.0, JumpButton::Up), 3);
        assert_eq!(player.vel.x, 6.0);
        assert!(player.vel.y < 0.0);
    }

    #[test]
    fn test_landing_snaps_and_emits_land() {
        let mc = controller();
        let mut player = mc.spawn(Vec2::new(0.0, 0.55));
        player.vel.y = -3.0;
        let reading = ground(SurfaceClass::Normal);
        let events = run(&mc, &mut player, reading, input(0.0, JumpButton::Up), 1);
        assert!(events.contains(&SimEvent::Sound(SoundCue::Land)));
        assert_eq!(player.vel.y, 0.0);
        assert!((player.feet_y() - 0.0).abs() < 1e-5);
    }

    #[test]
    fn test_charge_cancelled_when_ground_disappears() {
        let mc = controller();
        let mut player = standing_player(&mc);
        run(&mc, &mut player, ground(SurfaceClass::Ice), input(0.0, JumpButton::Pressed), 1);
        run(&mc, &mut player, SurfaceReading::airborne(), input(0.0, JumpButton::Held), 1);
        assert!(!player.charge.is_charging);
    }

    #[test]
    fn test_cooldown_counts_down() {
        let mc = controller();
        let mut player = mc.spawn(Vec2::new(0.0, 5.0));
        player.jump_cooldown_remaining = 0.2;
        run(&mc, &mut player, SurfaceReading::airborne(), input(0.0, JumpButton::Up), 10);
        assert_eq!(player.jump_cooldown_remaining, 0.0);
    }

    proptest! {
        #[test]
        fn prop_jump_power_monotonic_with_floor(a in 0.0f32..1.0, b in 0.0f32..1.0) {
            let mc = controller();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let mut c_lo = ChargeState::new(1.0);
            c_lo.charge_time = lo;
            let mut c_hi = ChargeState::new(1.0);
            c_hi.charge_time = hi;
            prop_assert!(mc.jump_power(&c_lo) <= mc.jump_power(&c_hi));
            prop_assert!(mc.jump_power(&c_lo) >= mc.tuning.min_jump_power);
        }

        #[test]
        fn prop_lock_forces_zero_horizontal(
            vx in -50.0f32..50.0,
            horizontal in -1.0f32..1.0,
            grounded in any::<bool>(),
            class_idx in 0usize..4,
        ) {
            let classes = [
                SurfaceClass::Normal,
                SurfaceClass::Ice,
                SurfaceClass::NoControlIce,
                SurfaceClass::Slope,
            ];
            let mc = controller();
            let mut player = standing_player(&mc);
            player.vel.x = vx;
            player.control_locked = true;
            let reading = if grounded {
                ground(classes[class_idx])
            } else {
                SurfaceReading::airborne()
            };
            for jump in [
                JumpButton::Pressed,
                JumpButton::Held,
                JumpButton::Released,
                JumpButton::Tapped,
            ] {
                let mut events = Vec::new();
                mc.tick(&mut player, &reading, &input(horizontal, jump), SIM_DT, &mut events);
                prop_assert_eq!(player.vel.x, 0.0);
            }
        }
    }
}
