//! Level 1: dice arithmetic
//!
//! The first roll seeds the score. After that the player picks one of the
//! remaining operators and the next roll is applied with it. Each operator can
//! be used once; the level completes when none are left.

use serde::{Deserialize, Serialize};

use super::score::{Operation, ScoreLedger, ScoreTrend};
use super::state::Level;
use crate::error::GameError;
use crate::format_score;

/// Level 1 phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level1Phase {
    AwaitingFirstRoll,
    AwaitingOperationChoice,
    AwaitingResolvingRoll,
    Complete,
}

/// Operators not yet used this playthrough (menu order preserved)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSet {
    remaining: Vec<Operation>,
}

impl Default for OperationSet {
    fn default() -> Self {
        Self {
            remaining: Operation::ALL.to_vec(),
        }
    }
}

impl OperationSet {
    pub fn contains(&self, op: Operation) -> bool {
        self.remaining.contains(&op)
    }

    /// Remove `op` permanently; false if it was already used
    pub fn take(&mut self, op: Operation) -> bool {
        match self.remaining.iter().position(|o| *o == op) {
            Some(i) => {
                self.remaining.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn as_slice(&self) -> &[Operation] {
        &self.remaining
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// What a settled die did to the score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RollOutcome {
    /// First roll: score initialized to the die value
    Seeded { die: u8 },
    /// Pending operator applied with the die value
    Resolved {
        op: Operation,
        die: u8,
        before: f64,
        after: f64,
        trend: ScoreTrend,
    },
}

impl RollOutcome {
    pub fn die(&self) -> u8 {
        match self {
            RollOutcome::Seeded { die } | RollOutcome::Resolved { die, .. } => *die,
        }
    }

    /// Text shown under the die
    pub fn describe(&self) -> String {
        match self {
            RollOutcome::Seeded { die } => format!("Initial value: {}", die),
            RollOutcome::Resolved {
                op,
                die,
                before,
                after,
                ..
            } => format!(
                "{} {} {} = {}",
                format_score(*before),
                op,
                die,
                format_score(*after)
            ),
        }
    }
}

/// Dice-arithmetic state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level1Engine {
    phase: Level1Phase,
    ops: OperationSet,
    pending: Option<Operation>,
    last_die: Option<u8>,
    resolved_rolls: u32,
}

impl Default for Level1Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Level1Engine {
    pub fn new() -> Self {
        Self {
            phase: Level1Phase::AwaitingFirstRoll,
            ops: OperationSet::default(),
            pending: None,
            last_die: None,
            resolved_rolls: 0,
        }
    }

    pub fn phase(&self) -> Level1Phase {
        self.phase
    }

    pub fn available(&self) -> &[Operation] {
        self.ops.as_slice()
    }

    pub fn pending(&self) -> Option<Operation> {
        self.pending
    }

    pub fn last_die(&self) -> Option<u8> {
        self.last_die
    }

    /// Rolls that applied an operator
    pub fn resolved_rolls(&self) -> u32 {
        self.resolved_rolls
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Level1Phase::Complete
    }

    /// Whether a roll is accepted in the current phase
    pub fn accepts_roll(&self) -> bool {
        matches!(
            self.phase,
            Level1Phase::AwaitingFirstRoll | Level1Phase::AwaitingResolvingRoll
        )
    }

    /// Pick the operator for the next roll
    pub fn choose(&mut self, op: Operation) -> Result<(), GameError> {
        if self.phase != Level1Phase::AwaitingOperationChoice {
            return Err(GameError::InvalidAction {
                level: Level::One,
                action: "choose an operation",
            });
        }
        if !self.ops.take(op) {
            return Err(GameError::OperationUnavailable(op));
        }
        self.pending = Some(op);
        self.phase = Level1Phase::AwaitingResolvingRoll;
        log::debug!("Level 1: chose {} ({} left)", op, self.ops.len());
        Ok(())
    }

    /// A die has settled on `die`
    pub fn on_roll(&mut self, die: u8, ledger: &mut ScoreLedger) -> Result<RollOutcome, GameError> {
        let outcome = match self.phase {
            Level1Phase::AwaitingFirstRoll => {
                ledger.initialize(f64::from(die))?;
                RollOutcome::Seeded { die }
            }
            Level1Phase::AwaitingResolvingRoll => {
                let op = self.pending.take().ok_or(GameError::InvalidAction {
                    level: Level::One,
                    action: "resolve a roll",
                })?;
                let before = ledger.get();
                let after = ledger.apply(op, f64::from(die));
                self.resolved_rolls += 1;
                RollOutcome::Resolved {
                    op,
                    die,
                    before,
                    after,
                    trend: ScoreTrend::between(before, after),
                }
            }
            _ => {
                return Err(GameError::InvalidAction {
                    level: Level::One,
                    action: "roll",
                });
            }
        };

        self.last_die = Some(die);
        self.phase = if self.ops.is_empty() {
            Level1Phase::Complete
        } else {
            Level1Phase::AwaitingOperationChoice
        };
        log::debug!("Level 1: {}", outcome.describe());
        Ok(outcome)
    }
}
