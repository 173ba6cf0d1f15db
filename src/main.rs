//! Jump QoC entry point
//!
//! Runs a scripted headless session on a small demo level and logs what a
//! presentation layer would be asked to do.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;

    use jump_qoc::Settings;
    use jump_qoc::sim::{
        Aabb, ContactTag, JumpButton, JumpPad, Launcher, Level, Platform, Presenter, SoundCue,
        TickInput, Tint, TriggerKind, TriggerZone, Woofer, World,
    };
    use jump_qoc::tuning::Tuning;

    /// Presenter that writes every request to the log
    struct LogPresenter;

    impl Presenter for LogPresenter {
        fn play_sound(&mut self, cue: SoundCue, volume: f32) {
            log::info!("sound {cue:?} at {volume:.2}");
        }

        fn show_countdown(&mut self, value: Option<u8>) {
            match value {
                Some(n) => log::info!("countdown {n}"),
                None => log::info!("countdown hidden"),
            }
        }

        fn set_sprite_tint(&mut self, tint: Tint) {
            log::info!("tint {tint:?} {:?}", tint.rgba());
        }

        fn set_particles_active(&mut self, active: bool) {
            log::info!("snow particles {}", if active { "on" } else { "off" });
        }

        fn set_frozen_bubble(&mut self, visible: bool) {
            log::info!("frozen bubble {}", if visible { "shown" } else { "hidden" });
        }

        fn set_zone_music(&mut self, playing: bool, volume: f32) {
            log::info!("zone music playing={playing} volume={volume:.2}");
        }

        fn show_story(&mut self, marker: u32) {
            log::info!("story marker {marker}");
        }

        fn show_speaker_wave(&mut self, origin: Vec2, angle_degrees: f32) {
            log::info!("speaker wave from {origin:?} at {angle_degrees:.0} degrees");
        }
    }

    /// Platform tagged by its editor name; unknown names fall back to plain ground
    fn platform(min: (f32, f32), max: (f32, f32), tag: &str) -> Platform {
        let tag = ContactTag::from_name(tag).unwrap_or_else(|| {
            log::warn!("Unknown contact tag {tag:?}; treating as Normal");
            ContactTag::Normal
        });
        Platform::new(Aabb::new(Vec2::from(min), Vec2::from(max)), tag)
    }

    fn demo_world(tuning: &Tuning, seed: u64) -> World {
        let level = Level::new(vec![
            platform((-20.0, -1.0), (20.0, 0.0), "Ground"),
            platform((1.5, 0.0), (4.0, 0.05), "Ice"),
            platform((-4.0, 3.0), (-1.0, 3.4), "NoControlIce"),
            Platform::sloped(
                Aabb::new(Vec2::new(1.0, 5.0), Vec2::new(4.0, 5.5)),
                ContactTag::Normal,
                40.0,
            ),
            platform((-3.0, 11.0), (3.0, 11.5), "Normal"),
        ]);

        let mut world = World::new(tuning, level, Vec2::new(0.0, 0.5), seed);
        world.add_pad(JumpPad::new(
            Aabb::new(Vec2::new(-4.5, 0.0), Vec2::new(-3.5, 0.2)),
            tuning.knockback.jump_pad_force,
        ));
        world.add_launcher(Launcher::new(
            Vec2::new(4.5, 1.0),
            Vec2::NEG_X,
            &tuning.knockback,
        ));
        let woofer = Woofer::new(
            Vec2::new(7.0, 0.2),
            Aabb::new(Vec2::new(6.5, 0.0), Vec2::new(7.5, 0.2)),
            120.0,
            &tuning.knockback,
        );
        world.add_woofer(woofer);
        world.add_trigger(TriggerZone::new(
            Aabb::new(Vec2::new(-3.0, 11.5), Vec2::new(3.0, 14.0)),
            TriggerKind::HazardZoneEnter,
        ));
        world.add_trigger(TriggerZone::new(
            Aabb::new(Vec2::new(-1.5, 0.0), Vec2::new(-1.0, 2.0)),
            TriggerKind::StoryMarker { id: 1 },
        ));
        world.add_trigger(TriggerZone::new(
            Aabb::new(Vec2::new(-5.0, 0.0), Vec2::new(-4.6, 2.0)),
            TriggerKind::HiddenZoneEntrance {
                point: Vec2::new(-12.0, 0.0),
                disable_left_boundary: true,
            },
        ));
        world
    }

    /// Input for a given frame of the scripted session
    fn scripted_input(frame: u32, pointer: Vec2) -> TickInput {
        let (horizontal, jump) = match frame {
            0..60 => (1.0, JumpButton::Up),
            60..120 => (-1.0, JumpButton::Up),
            120 => (0.0, JumpButton::Pressed),
            121..150 => (0.0, JumpButton::Held),
            150 => (0.0, JumpButton::Released),
            151..400 => (0.0, JumpButton::Up),
            400 => (0.0, JumpButton::Pressed),
            401..460 => (0.0, JumpButton::Held),
            460 => (0.0, JumpButton::Released),
            _ => (-1.0, JumpButton::Up),
        };
        TickInput {
            horizontal,
            jump,
            pointer,
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let tuning = match args.next() {
            Some(path) => Tuning::load_or_default(path),
            None => Tuning::default(),
        };
        let settings = match args.next() {
            Some(path) => Settings::load(path),
            None => Settings::default(),
        };
        let seed = 0x5eed;
        let mut world = demo_world(&tuning, seed);
        let mut presenter = LogPresenter;

        let frame_dt = 1.0 / 60.0;
        let mut ticks = 0;
        for frame in 0..1200 {
            let pointer = world.player.pos + Vec2::new(0.3, 1.0);
            let input = scripted_input(frame, pointer);
            ticks += world.frame(&input, frame_dt);
            world.present(&mut presenter, &settings);

            if frame % 60 == 0 {
                log::debug!(
                    "t={:.1}s pos={:?} vel={:?} state={:?} charge={:.2} surface={:?} room={}",
                    frame as f32 * frame_dt,
                    world.player.pos,
                    world.player.vel,
                    world.player.motion_state(),
                    world.player.charge_ratio(),
                    world.player.surface,
                    world.camera.room_index(world.player.pos.y),
                );
            }
        }

        log::info!(
            "Finished: {ticks} ticks, player {:?}, camera {:?} ({:?}), {} rolls, {} freezes",
            world.player.pos,
            world.camera.state.pos,
            world.camera.mode(),
            world.hazard.resolutions(),
            world.hazard.freezes(),
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Jump QoC (headless) starting...");
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No web frontend; the library is driven by an embedding host
}
