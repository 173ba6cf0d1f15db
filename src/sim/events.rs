//! Fire-and-forget cues for presentation collaborators
//!
//! The simulation only records what happened. Hosts drain the queue after a
//! frame and hand it to a [`Presenter`]; any cue the presenter does not care
//! about falls through to a default no-op, so a missing sound or UI
//! collaborator never affects the tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::{Channel, Settings};

/// Sound effects the core asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Jump,
    Land,
    /// One countdown tick
    Count,
    Freeze,
    /// Jump pad bounce
    Bounce,
}

/// Player sprite tint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    Normal,
    /// Light blue while frozen
    Frozen,
}

impl Tint {
    /// RGBA color
    pub fn rgba(self) -> [f32; 4] {
        match self {
            Tint::Normal => [1.0, 1.0, 1.0, 1.0],
            Tint::Frozen => [0.5, 0.8, 1.0, 1.0],
        }
    }
}

/// Something presentation should react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Sound(SoundCue),
    /// Countdown value to display, or `None` to hide the bubble
    Countdown(Option<u8>),
    SpriteTint(Tint),
    /// Snow particles in the hazard zone
    ParticlesActive(bool),
    /// Frozen-state bubble over the player
    FrozenBubble(bool),
    /// Zone background music on/off
    ZoneMusic(bool),
    /// Player walked into a story marker
    StoryMarker(u32),
    /// A woofer released its wave from `origin`
    SpeakerWave { origin: Vec2, angle_degrees: f32 },
}

/// Presentation collaborator; every hook defaults to doing nothing
#[allow(unused_variables)]
pub trait Presenter {
    fn play_sound(&mut self, cue: SoundCue, volume: f32) {}
    fn show_countdown(&mut self, value: Option<u8>) {}
    fn set_sprite_tint(&mut self, tint: Tint) {}
    fn set_particles_active(&mut self, active: bool) {}
    fn set_frozen_bubble(&mut self, visible: bool) {}
    fn set_zone_music(&mut self, playing: bool, volume: f32) {}
    fn show_story(&mut self, marker: u32) {}
    fn show_speaker_wave(&mut self, origin: Vec2, angle_degrees: f32) {}
}

/// Presenter that ignores everything (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}

impl SimEvent {
    /// Forward this event to a presenter, applying the player's volume settings
    pub fn dispatch(&self, presenter: &mut dyn Presenter, settings: &Settings) {
        match *self {
            SimEvent::Sound(cue) => {
                presenter.play_sound(cue, settings.volume(Channel::Effects));
            }
            SimEvent::Countdown(value) => presenter.show_countdown(value),
            SimEvent::SpriteTint(tint) => presenter.set_sprite_tint(tint),
            SimEvent::ParticlesActive(active) => presenter.set_particles_active(active),
            SimEvent::FrozenBubble(visible) => presenter.set_frozen_bubble(visible),
            SimEvent::ZoneMusic(playing) => {
                presenter.set_zone_music(playing, settings.volume(Channel::Music));
            }
            SimEvent::StoryMarker(id) => presenter.show_story(id),
            SimEvent::SpeakerWave {
                origin,
                angle_degrees,
            } => presenter.show_speaker_wave(origin, angle_degrees),
        }
    }
}

/// Dispatch a batch of events in order
pub fn dispatch_all(events: &[SimEvent], presenter: &mut dyn Presenter, settings: &Settings) {
    for event in events {
        event.dispatch(presenter, settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct SoundLog {
        sounds: Vec<(SoundCue, f32)>,
        countdown: Vec<Option<u8>>,
    }

    impl Presenter for SoundLog {
        fn play_sound(&mut self, cue: SoundCue, volume: f32) {
            self.sounds.push((cue, volume));
        }

        fn show_countdown(&mut self, value: Option<u8>) {
            self.countdown.push(value);
        }
    }

    #[test]
    fn test_dispatch_applies_sfx_volume() {
        let settings = Settings {
            sfx_volume: 0.5,
            ..Default::default()
        };
        let mut log = SoundLog::default();
        dispatch_all(
            &[
                SimEvent::Sound(SoundCue::Jump),
                SimEvent::Countdown(Some(3)),
                SimEvent::SpriteTint(Tint::Frozen),
            ],
            &mut log,
            &settings,
        );
        assert_eq!(log.sounds.len(), 1);
        assert!((log.sounds[0].1 - settings.effective_sfx_volume()).abs() < 1e-6);
        assert_eq!(log.countdown, vec![Some(3)]);
    }

    #[test]
    fn test_null_presenter_accepts_everything() {
        let mut presenter = NullPresenter;
        let settings = Settings::default();
        for event in [
            SimEvent::Sound(SoundCue::Freeze),
            SimEvent::ParticlesActive(true),
            SimEvent::ZoneMusic(false),
            SimEvent::StoryMarker(4),
            SimEvent::SpeakerWave {
                origin: Vec2::ZERO,
                angle_degrees: 45.0,
            },
        ] {
            event.dispatch(&mut presenter, &settings);
        }
    }
}
