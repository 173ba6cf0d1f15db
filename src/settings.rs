//! Player audio preferences
//!
//! Passed down to whoever plays sounds instead of living in global state.
//! Persisted as JSON next to the game, separate from tuning.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Overall loudness ceiling applied on top of the master slider
pub const DEFAULT_MASTER_CAP: f32 = 0.4;

/// Which mixer channel a sound plays on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    Music,
    Effects,
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub bgm_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Ceiling applied to every channel
    pub master_cap: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            bgm_volume: 0.5,
            sfx_volume: 1.0,
            master_cap: DEFAULT_MASTER_CAP,
        }
    }
}

impl Settings {
    /// Clamp every slider into [0, 1]
    pub fn clamped(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.bgm_volume = self.bgm_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.master_cap = self.master_cap.clamp(0.0, 1.0);
        self
    }

    /// Music volume; squared so the slider feels linear to the ear
    pub fn effective_bgm_volume(&self) -> f32 {
        self.bgm_volume * self.bgm_volume * self.master_cap * self.master_volume
    }

    /// Sound effect volume
    pub fn effective_sfx_volume(&self) -> f32 {
        self.sfx_volume * self.master_cap * self.master_volume
    }

    /// Volume for a given channel
    pub fn volume(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Music => self.effective_bgm_volume(),
            Channel::Effects => self.effective_sfx_volume(),
        }
    }

    /// Load settings from disk, defaulting when missing or unreadable
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings.clamped()
                }
                Err(err) => {
                    log::warn!(
                        "Settings file {} is malformed ({err}); using defaults",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to disk; failures are logged and otherwise ignored
    pub fn save(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = std::fs::write(path, json) {
                    log::warn!("Could not write settings to {}: {err}", path.display());
                } else {
                    log::info!("Settings saved");
                }
            }
            Err(err) => log::warn!("Could not serialize settings: {err}"),
        }
    }
}
