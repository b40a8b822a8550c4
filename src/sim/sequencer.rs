//! Level sequencing: title -> intro 1 -> level 1 -> intro 2 -> ... -> summary

use serde::{Deserialize, Serialize};

use super::state::Level;
use crate::error::GameError;

/// Where the player is in the overall game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// General intro with the Play button
    Title,
    /// Per-level intro with the Next button
    Intro(Level),
    Playing(Level),
    /// Final score screen
    Summary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSequencer {
    stage: Stage,
}

impl Default for LevelSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelSequencer {
    pub fn new() -> Self {
        Self {
            stage: Stage::Title,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Play / Next pressed on an intro screen
    pub fn press_continue(&mut self) -> Result<Stage, GameError> {
        self.stage = match self.stage {
            Stage::Title => Stage::Intro(Level::One),
            Stage::Intro(level) => Stage::Playing(level),
            Stage::Playing(level) => {
                return Err(GameError::InvalidAction {
                    level,
                    action: "skip ahead",
                });
            }
            Stage::Summary => {
                return Err(GameError::InvalidAction {
                    level: Level::Three,
                    action: "continue past the summary",
                });
            }
        };
        log::info!("Stage -> {:?}", self.stage);
        Ok(self.stage)
    }

    /// The active level reached its terminal state
    pub fn level_finished(&mut self, level: Level) -> Result<Stage, GameError> {
        if self.stage != Stage::Playing(level) {
            return Err(GameError::InvalidAction {
                level,
                action: "finish a level that is not being played",
            });
        }
        self.stage = match level.next() {
            Some(next) => Stage::Intro(next),
            None => Stage::Summary,
        };
        log::info!("{} finished, stage -> {:?}", level, self.stage);
        Ok(self.stage)
    }

    pub fn reset(&mut self) {
        self.stage = Stage::Title;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_sequence() {
        let mut seq = LevelSequencer::new();
        assert_eq!(seq.press_continue(), Ok(Stage::Intro(Level::One)));
        assert_eq!(seq.press_continue(), Ok(Stage::Playing(Level::One)));
        assert_eq!(seq.level_finished(Level::One), Ok(Stage::Intro(Level::Two)));
        assert_eq!(seq.press_continue(), Ok(Stage::Playing(Level::Two)));
        assert_eq!(seq.level_finished(Level::Two), Ok(Stage::Intro(Level::Three)));
        assert_eq!(seq.press_continue(), Ok(Stage::Playing(Level::Three)));
        assert_eq!(seq.level_finished(Level::Three), Ok(Stage::Summary));
    }

    #[test]
    fn test_cannot_skip_active_level() {
        let mut seq = LevelSequencer::new();
        seq.press_continue().unwrap();
        seq.press_continue().unwrap();
        assert!(seq.press_continue().is_err());
        assert!(seq.level_finished(Level::Two).is_err());
        assert_eq!(seq.stage(), Stage::Playing(Level::One));
    }

    #[test]
    fn test_reset_returns_to_title() {
        let mut seq = LevelSequencer::new();
        seq.press_continue().unwrap();
        seq.reset();
        assert_eq!(seq.stage(), Stage::Title);
    }
}
