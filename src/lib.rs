//! Lucky Trio - a three-level dice / cards / coin mini-game
//!
//! Core modules:
//! - `sim`: Game rules (score ledger, level engines, sequencing, timers, RNG)
//! - `audio`: Background music vs. one-shot effect arbitration
//! - `session`: Owns the game state and wires input -> engines -> sound -> UI
//! - `ui`: Presentation collaborator interface
//! - `platform`: Browser bindings (wasm only)
//! - `settings`: Volumes, mute and animation timings

pub mod audio;
pub mod error;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod ui;

pub use audio::{AudioBackend, NullBackend, SoundArbiter, SoundId};
pub use error::{AudioError, GameError, SettingsError};
pub use session::GameSession;
pub use settings::{Settings, Timings};

/// Game configuration constants
pub mod consts {
    /// Die faces
    pub const DIE_MIN: i32 = 1;
    pub const DIE_MAX: i32 = 6;

    /// Card range for level 2
    pub const CARD_MIN: u8 = 1;
    pub const CARD_MAX: u8 = 10;

    /// Rounds played in level 2
    pub const LEVEL2_ROUNDS: u32 = 10;
    /// Points for a correct higher/lower call
    pub const DIRECTIONAL_POINTS: f64 = 1.0;
    /// Points for a correct "equal" call
    pub const EQUAL_POINTS: f64 = 3.0;
    /// Points lost on a wrong call
    pub const WRONG_PENALTY: f64 = 1.0;

    /// Maximum flips in level 3
    pub const LEVEL3_FLIPS: u32 = 5;
    /// Winning flip pays this multiple of the stake
    pub const PAYOUT_MULTIPLIER: u32 = 2;
    /// Minimum score (and stake) for wagering
    pub const MIN_STAKE: u32 = 1;

    /// Default clip volume
    pub const CLIP_VOLUME: f32 = 0.7;
    /// Background music volume
    pub const BACKGROUND_VOLUME: f32 = 0.6;
    /// Bet slider tick volume
    pub const BET_TICK_VOLUME: f32 = 0.4;
}

/// Round to 2 decimal places
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a score for display: 2 decimals max, trailing zeros dropped
pub fn format_score(value: f64) -> String {
    let rounded = round2(value);
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        let s = format!("{:.2}", rounded);
        s.trim_end_matches('0').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(7.0), 7.0);
        assert_eq!(round2(10.0 / 3.0), 3.33);
        assert_eq!(round2(2.0 / 3.0), 0.67);
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(12.0), "12");
        assert_eq!(format_score(2.5), "2.5");
        assert_eq!(format_score(1.0 / 3.0), "0.33");
        assert_eq!(format_score(0.0), "0");
    }
}
