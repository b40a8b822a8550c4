//! Level 2: card prediction
//!
//! Each round the player calls whether the hidden card will be higher, lower
//! or equal to the face-up card. Ten rounds, always.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::score::ScoreLedger;
use super::state::Level;
use crate::consts::*;
use crate::error::GameError;

/// A card value in `CARD_MIN..=CARD_MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Card(u8);

impl Card {
    pub fn new(value: u8) -> Result<Self, GameError> {
        if (CARD_MIN..=CARD_MAX).contains(&value) {
            Ok(Card(value))
        } else {
            Err(GameError::CardOutOfRange(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Card {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Card::new(value)
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> u8 {
        card.0
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The player's call for the next card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prediction {
    Higher,
    Lower,
    Equal,
}

impl Prediction {
    /// Equal needs an exact match; higher/lower need strict inequality
    pub fn is_correct(&self, current: Card, next: Card) -> bool {
        match self {
            Prediction::Higher => next > current,
            Prediction::Lower => next < current,
            Prediction::Equal => next == current,
        }
    }

    /// Points awarded when correct
    pub fn reward(&self) -> f64 {
        match self {
            Prediction::Higher | Prediction::Lower => DIRECTIONAL_POINTS,
            Prediction::Equal => EQUAL_POINTS,
        }
    }
}

impl FromStr for Prediction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "higher" | "greater" | ">" => Ok(Prediction::Higher),
            "lower" | "less" | "<" => Ok(Prediction::Lower),
            "equal" | "=" => Ok(Prediction::Equal),
            other => Err(format!("unknown prediction '{}'", other)),
        }
    }
}

/// Level 2 phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level2Phase {
    /// Waiting for a prediction
    RoundActive,
    /// Score updated, card flipping over
    RoundResolving,
    Complete,
}

/// Result of one prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub prediction: Prediction,
    pub current: Card,
    pub next: Card,
    pub correct: bool,
    /// Signed points (+1, +3 or -1) before the zero floor
    pub points: f64,
    pub score_after: f64,
}

/// Card-prediction state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level2Engine {
    phase: Level2Phase,
    current_card: Option<Card>,
    rounds_remaining: u32,
    pending: Option<RoundResult>,
    history: Vec<RoundResult>,
}

impl Default for Level2Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Level2Engine {
    pub fn new() -> Self {
        Self {
            phase: Level2Phase::RoundActive,
            current_card: None,
            rounds_remaining: LEVEL2_ROUNDS,
            pending: None,
            history: Vec::new(),
        }
    }

    /// Begin the level with a freshly drawn card
    pub fn start(&mut self, first: Card) {
        *self = Self::new();
        self.current_card = Some(first);
        log::debug!("Level 2: first card {}", first);
    }

    pub fn phase(&self) -> Level2Phase {
        self.phase
    }

    pub fn current_card(&self) -> Option<Card> {
        self.current_card
    }

    pub fn rounds_remaining(&self) -> u32 {
        self.rounds_remaining
    }

    pub fn history(&self) -> &[RoundResult] {
        &self.history
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Level2Phase::Complete
    }

    /// Scored prediction whose card is still flipping
    pub fn pending_result(&self) -> Option<RoundResult> {
        self.pending
    }

    /// Score a prediction against `next`; the card is revealed by `complete_round`
    pub fn predict(
        &mut self,
        prediction: Prediction,
        next: Card,
        ledger: &mut ScoreLedger,
    ) -> Result<RoundResult, GameError> {
        let current = match (self.phase, self.current_card) {
            (Level2Phase::RoundActive, Some(card)) => card,
            _ => {
                return Err(GameError::InvalidAction {
                    level: Level::Two,
                    action: "predict",
                });
            }
        };

        let correct = prediction.is_correct(current, next);
        let points = if correct {
            prediction.reward()
        } else {
            -WRONG_PENALTY
        };
        let score_after = ledger.adjust(points);

        let result = RoundResult {
            prediction,
            current,
            next,
            correct,
            points,
            score_after,
        };
        self.pending = Some(result);
        self.phase = Level2Phase::RoundResolving;
        log::debug!(
            "Level 2: {:?} {} -> {} ({}), score {}",
            prediction,
            current,
            next,
            if correct { "correct" } else { "wrong" },
            score_after
        );
        Ok(result)
    }

    /// Reveal finished: next card becomes current, one round used
    pub fn complete_round(&mut self) -> Result<Level2Phase, GameError> {
        let Some(result) = self.pending.take() else {
            return Err(GameError::InvalidAction {
                level: Level::Two,
                action: "finish a round",
            });
        };
        self.current_card = Some(result.next);
        self.history.push(result);
        self.rounds_remaining = self.rounds_remaining.saturating_sub(1);
        self.phase = if self.rounds_remaining == 0 {
            Level2Phase::Complete
        } else {
            Level2Phase::RoundActive
        };
        Ok(self.phase)
    }
}
