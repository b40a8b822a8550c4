//! Game state and shared core types
//!
//! Everything a running game mutates lives in `GameState`, owned by the
//! session. There are no globals.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::level1::Level1Engine;
use super::level2::Level2Engine;
use super::level3::Level3Engine;
use super::score::ScoreLedger;
use super::sequencer::{LevelSequencer, Stage};

/// One of the three game levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Dice arithmetic
    One,
    /// Card prediction
    Two,
    /// Coin-flip betting
    Three,
}

impl Level {
    pub fn number(&self) -> u8 {
        match self {
            Level::One => 1,
            Level::Two => 2,
            Level::Three => 3,
        }
    }

    /// Level played after this one
    pub fn next(&self) -> Option<Level> {
        match self {
            Level::One => Some(Level::Two),
            Level::Two => Some(Level::Three),
            Level::Three => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {}", self.number())
    }
}

/// Complete game state for one playthrough
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Shared score
    pub ledger: ScoreLedger,
    /// Title -> intros -> levels -> summary
    pub sequencer: LevelSequencer,
    pub level1: Level1Engine,
    pub level2: Level2Engine,
    pub level3: Level3Engine,
}

impl GameState {
    /// Create a fresh game state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ledger: ScoreLedger::new(),
            sequencer: LevelSequencer::new(),
            level1: Level1Engine::new(),
            level2: Level2Engine::new(),
            level3: Level3Engine::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.sequencer.stage()
    }

    /// Level currently being played, if any
    pub fn active_level(&self) -> Option<Level> {
        match self.stage() {
            Stage::Playing(level) => Some(level),
            _ => None,
        }
    }
}
