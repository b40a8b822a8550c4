//! Error types
//!
//! Nothing here is fatal: game errors are rejected inputs (no state change),
//! audio errors degrade to silence.

use thiserror::Error;

use crate::sim::{Level, Operation};

/// A rejected player action. The game state is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("Choose HEADS or TAILS first")]
    NoSideSelected,
    #[error("The minimum bet is {min} point")]
    StakeTooLow { min: u32 },
    #[error("Not enough points: bet {stake}, have {score}")]
    StakeExceedsScore { stake: u32, score: f64 },
    #[error("You can only stand after the first flip")]
    StandNotAllowed,
    #[error("Operation {0} was already used")]
    OperationUnavailable(Operation),
    #[error("Score is already set")]
    ScoreAlreadySet,
    #[error("Card value {0} is out of range")]
    CardOutOfRange(u8),
    #[error("Cannot {action} right now in {level}")]
    InvalidAction { level: Level, action: &'static str },
    #[error("Please wait for the current animation")]
    InputLocked,
}

/// Clip loading / playback failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("Unsupported or missing clip: {0}")]
    Unsupported(String),
    #[error("Audio backend error: {0}")]
    Backend(String),
}

/// Settings file could not be read
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}
