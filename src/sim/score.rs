//! Running score shared by all three levels

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::{format_score, round2};

/// Arithmetic operators offered in level 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// All operators in menu order
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "\u{00D7}",
            Operation::Divide => "\u{00F7}",
        }
    }

    /// Evaluate `lhs op rhs`. Division by zero leaves `lhs` unchanged.
    pub fn eval(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operation::Add => lhs + rhs,
            Operation::Subtract => lhs - rhs,
            Operation::Multiply => lhs * rhs,
            Operation::Divide => {
                if rhs == 0.0 {
                    lhs
                } else {
                    lhs / rhs
                }
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operation {
    type Err = String;

    /// Accepts the display symbol, its ASCII stand-in, or the name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "+" | "add" | "plus" => Ok(Operation::Add),
            "-" | "subtract" | "minus" => Ok(Operation::Subtract),
            "\u{00D7}" | "*" | "x" | "multiply" | "times" => Ok(Operation::Multiply),
            "\u{00F7}" | "/" | "divide" => Ok(Operation::Divide),
            other => Err(format!("unknown operation '{}'", other)),
        }
    }
}

/// Direction of a score change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreTrend {
    Up,
    Unchanged,
    Down,
}

impl ScoreTrend {
    pub fn between(before: f64, after: f64) -> Self {
        if after > before {
            ScoreTrend::Up
        } else if after < before {
            ScoreTrend::Down
        } else {
            ScoreTrend::Unchanged
        }
    }
}

/// Holds the player's score.
///
/// Every mutation rounds to 2 decimals and floors at zero. The score starts
/// unset (not zero) until the first die roll seeds it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreLedger {
    value: Option<f64>,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self { value: None }
    }

    /// Current score, `None` until seeded
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Current score with unset treated as zero
    pub fn get(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Display string ("0" while unset)
    pub fn display(&self) -> String {
        format_score(self.get())
    }

    /// Seed the score. Only valid while unset.
    pub fn initialize(&mut self, value: f64) -> Result<f64, GameError> {
        if self.value.is_some() {
            return Err(GameError::ScoreAlreadySet);
        }
        Ok(self.store(value))
    }

    /// Apply `score op operand`
    pub fn apply(&mut self, op: Operation, operand: f64) -> f64 {
        let next = op.eval(self.get(), operand);
        self.store(next)
    }

    /// Add a signed delta (prediction and betting payouts)
    pub fn adjust(&mut self, delta: f64) -> f64 {
        let next = self.get() + delta;
        self.store(next)
    }

    /// Raise the score to `min` if it is below it
    pub fn ensure_at_least(&mut self, min: f64) -> f64 {
        if self.get() < min {
            self.store(min)
        } else {
            self.get()
        }
    }

    /// Full reset (restart)
    pub fn reset(&mut self) {
        self.value = None;
    }

    fn store(&mut self, raw: f64) -> f64 {
        let value = if raw.is_nan() { 0.0 } else { round2(raw).max(0.0) };
        self.value = Some(value);
        value
    }
}
