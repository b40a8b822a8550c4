//! Game settings and preferences
//!
//! Read from JSON (never written back). Every field has a default, so a
//! partial file is fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Animation delays in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Die rolling animation
    pub die_roll_ms: u32,
    /// Shorter roll when the die shows 1
    pub die_roll_one_ms: u32,
    /// Margin after the roll animation before the value is read
    pub die_settle_ms: u32,
    /// Pause between choosing an operator and the automatic roll
    pub auto_roll_ms: u32,
    /// Pause before the level 2 intro after the last operator
    pub level1_handoff_ms: u32,
    /// Card flip animation
    pub card_flip_ms: u32,
    /// Card result display
    pub card_result_ms: u32,
    /// Coin spin animation
    pub coin_flip_ms: u32,
    /// Delay before the coin result panel
    pub coin_result_ms: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            die_roll_ms: 2000,
            die_roll_one_ms: 1000,
            die_settle_ms: 50,
            auto_roll_ms: 700,
            level1_handoff_ms: 1000,
            card_flip_ms: 800,
            card_result_ms: 1500,
            coin_flip_ms: 1500,
            coin_result_ms: 500,
        }
    }
}

impl Timings {
    /// Total wait from roll start until the die value is read
    pub fn roll_duration(&self, die: u8) -> u32 {
        let anim = if die == 1 {
            self.die_roll_one_ms
        } else {
            self.die_roll_ms
        };
        anim + self.die_settle_ms
    }

    /// All delays zero (headless runs)
    pub fn instant() -> Self {
        Self {
            die_roll_ms: 0,
            die_roll_one_ms: 0,
            die_settle_ms: 0,
            auto_roll_ms: 0,
            level1_handoff_ms: 0,
            card_flip_ms: 0,
            card_result_ms: 0,
            coin_flip_ms: 0,
            coin_result_ms: 0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Start muted
    pub muted: bool,
    /// Directory holding `level1/`, `level2/`, `level3/` sound folders
    pub asset_root: String,

    // === Gameplay ===
    /// Fixed seed; a fresh one is picked when absent
    pub seed: Option<u64>,
    /// Animation delays
    pub timings: Timings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
            muted: false,
            asset_root: "assets/sounds".to_string(),
            seed: None,
            timings: Timings::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.clamp_volumes();
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read settings, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_path(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{} - using default settings", e);
                Self::default()
            }
        }
    }

    fn clamp_volumes(&mut self) {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
    }
}
