//! Level 3: coin-flip betting
//!
//! The player stakes part of the score on heads or tails. A win pays twice the
//! stake, a loss forfeits it. The first flip is mandatory; after that the
//! player may stand. The level ends on bankruptcy, after the last flip, or on
//! stand.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::score::ScoreLedger;
use super::state::Level;
use crate::consts::*;
use crate::error::GameError;

/// Coin faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinSide {
    Heads,
    Tails,
}

impl CoinSide {
    /// Map a 0/1 draw onto a face
    pub fn from_draw(draw: i32) -> Self {
        if draw == 0 {
            CoinSide::Heads
        } else {
            CoinSide::Tails
        }
    }
}

impl fmt::Display for CoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoinSide::Heads => f.write_str("heads"),
            CoinSide::Tails => f.write_str("tails"),
        }
    }
}

impl FromStr for CoinSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heads" | "head" | "h" => Ok(CoinSide::Heads),
            "tails" | "tail" | "t" => Ok(CoinSide::Tails),
            other => Err(format!("unknown coin side '{}'", other)),
        }
    }
}

/// Level 3 phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level3Phase {
    AwaitingBet,
    /// Coin in the air
    Flipping,
    /// Outcome applied, waiting for the player to continue
    RoundResolved,
    Ended(EndReason),
}

/// Why level 3 stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Score fell below the minimum stake
    Bankrupt,
    /// All flips used
    OutOfFlips,
    /// Player chose to stop
    Stood,
}

/// Current wager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetState {
    pub stake: u32,
    pub side: Option<CoinSide>,
    pub flips_remaining: u32,
    /// First flip cannot be skipped
    pub first_flip: bool,
}

impl Default for BetState {
    fn default() -> Self {
        Self {
            stake: MIN_STAKE,
            side: None,
            flips_remaining: LEVEL3_FLIPS,
            first_flip: true,
        }
    }
}

/// Result of one flip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlipResult {
    pub side: CoinSide,
    pub outcome: CoinSide,
    pub won: bool,
    pub stake: u32,
    /// Gross payout (2x stake on a win, 0 on a loss)
    pub payout: u32,
    /// Net change: +stake or -stake
    pub net: f64,
    pub score_after: f64,
    pub flips_remaining: u32,
}

/// Betting state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level3Engine {
    phase: Level3Phase,
    bet: BetState,
    last: Option<FlipResult>,
}

impl Default for Level3Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Level3Engine {
    pub fn new() -> Self {
        Self {
            phase: Level3Phase::AwaitingBet,
            bet: BetState::default(),
            last: None,
        }
    }

    /// Start the level; the score is raised to the minimum stake so a wager is possible
    pub fn enter(&mut self, ledger: &mut ScoreLedger) {
        *self = Self::new();
        let score = ledger.ensure_at_least(f64::from(MIN_STAKE));
        log::debug!("Level 3: entering with score {}", score);
    }

    pub fn phase(&self) -> Level3Phase {
        self.phase
    }

    pub fn bet(&self) -> &BetState {
        &self.bet
    }

    pub fn last_flip(&self) -> Option<&FlipResult> {
        self.last.as_ref()
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, Level3Phase::Ended(_))
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        match self.phase {
            Level3Phase::Ended(reason) => Some(reason),
            _ => None,
        }
    }

    /// Stand is offered only between rounds after the first flip
    pub fn can_stand(&self) -> bool {
        self.phase == Level3Phase::AwaitingBet && !self.bet.first_flip
    }

    pub fn select_side(&mut self, side: CoinSide) -> Result<(), GameError> {
        self.require_awaiting_bet("choose a side")?;
        self.bet.side = Some(side);
        Ok(())
    }

    /// Set the stake; rejected (unchanged) unless `MIN_STAKE <= amount <= score`
    pub fn set_stake(&mut self, amount: i64, ledger: &ScoreLedger) -> Result<u32, GameError> {
        self.require_awaiting_bet("change the bet")?;
        let stake = validate_stake(amount, ledger.get())?;
        self.bet.stake = stake;
        Ok(stake)
    }

    /// Validate the wager and put the coin in the air
    pub fn begin_flip(&mut self, ledger: &ScoreLedger) -> Result<(), GameError> {
        self.require_awaiting_bet("flip")?;
        if self.bet.side.is_none() {
            return Err(GameError::NoSideSelected);
        }
        validate_stake(i64::from(self.bet.stake), ledger.get())?;
        self.phase = Level3Phase::Flipping;
        Ok(())
    }

    /// The coin landed on `outcome`
    pub fn land(&mut self, outcome: CoinSide, ledger: &mut ScoreLedger) -> Result<FlipResult, GameError> {
        let side = match (self.phase, self.bet.side) {
            (Level3Phase::Flipping, Some(side)) => side,
            _ => {
                return Err(GameError::InvalidAction {
                    level: Level::Three,
                    action: "land the coin",
                });
            }
        };

        let stake = self.bet.stake;
        let won = side == outcome;
        let payout = if won { stake * PAYOUT_MULTIPLIER } else { 0 };
        let net = f64::from(payout) - f64::from(stake);
        let score_after = ledger.adjust(net);

        self.bet.flips_remaining = self.bet.flips_remaining.saturating_sub(1);
        self.bet.first_flip = false;
        self.phase = Level3Phase::RoundResolved;

        let result = FlipResult {
            side,
            outcome,
            won,
            stake,
            payout,
            net,
            score_after,
            flips_remaining: self.bet.flips_remaining,
        };
        self.last = Some(result);
        log::debug!(
            "Level 3: bet {} on {}, landed {}, score {}",
            stake,
            side,
            outcome,
            score_after
        );
        Ok(result)
    }

    /// After a result: end the level or reset the wager for another flip
    pub fn continue_round(&mut self, ledger: &ScoreLedger) -> Result<Level3Phase, GameError> {
        if self.phase != Level3Phase::RoundResolved {
            return Err(GameError::InvalidAction {
                level: Level::Three,
                action: "continue",
            });
        }
        self.phase = if ledger.get() < f64::from(MIN_STAKE) {
            Level3Phase::Ended(EndReason::Bankrupt)
        } else if self.bet.flips_remaining == 0 {
            Level3Phase::Ended(EndReason::OutOfFlips)
        } else {
            self.bet.side = None;
            self.bet.stake = MIN_STAKE;
            Level3Phase::AwaitingBet
        };
        Ok(self.phase)
    }

    /// Stop betting voluntarily
    pub fn stand(&mut self) -> Result<(), GameError> {
        if !self.can_stand() {
            return Err(GameError::StandNotAllowed);
        }
        self.phase = Level3Phase::Ended(EndReason::Stood);
        Ok(())
    }

    fn require_awaiting_bet(&self, action: &'static str) -> Result<(), GameError> {
        if self.phase == Level3Phase::AwaitingBet {
            Ok(())
        } else {
            Err(GameError::InvalidAction {
                level: Level::Three,
                action,
            })
        }
    }
}

fn validate_stake(amount: i64, score: f64) -> Result<u32, GameError> {
    if amount < i64::from(MIN_STAKE) {
        return Err(GameError::StakeTooLow { min: MIN_STAKE });
    }
    let stake = u32::try_from(amount).unwrap_or(u32::MAX);
    if f64::from(stake) > score {
        return Err(GameError::StakeExceedsScore { stake, score });
    }
    Ok(stake)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entered(score: f64) -> (Level3Engine, ScoreLedger) {
        let mut ledger = ScoreLedger::new();
        ledger.initialize(score).unwrap();
        let mut engine = Level3Engine::new();
        engine.enter(&mut ledger);
        (engine, ledger)
    }

    fn flip(engine: &mut Level3Engine, ledger: &mut ScoreLedger, side: CoinSide, outcome: CoinSide) -> FlipResult {
        engine.select_side(side).unwrap();
        engine.begin_flip(ledger).unwrap();
        engine.land(outcome, ledger).unwrap()
    }

    #[test]
    fn test_entry_reseeds_to_one() {
        let (_, ledger) = entered(0.0);
        assert_eq!(ledger.get(), 1.0);
    }

    #[test]
    fn test_stake_bounds_rejected() {
        let (mut engine, ledger) = entered(10.0);
        assert_eq!(
            engine.set_stake(0, &ledger),
            Err(GameError::StakeTooLow { min: 1 })
        );
        assert!(matches!(
            engine.set_stake(11, &ledger),
            Err(GameError::StakeExceedsScore { stake: 11, .. })
        ));
        assert_eq!(engine.bet().stake, 1);
        assert_eq!(ledger.get(), 10.0);
    }

    #[test]
    fn test_flip_without_side_rejected() {
        let (mut engine, ledger) = entered(10.0);
        assert_eq!(engine.begin_flip(&ledger), Err(GameError::NoSideSelected));
        assert_eq!(engine.phase(), Level3Phase::AwaitingBet);
    }

    #[test]
    fn test_win_pays_double() {
        let (mut engine, mut ledger) = entered(10.0);
        engine.set_stake(3, &ledger).unwrap();
        let r = flip(&mut engine, &mut ledger, CoinSide::Heads, CoinSide::Heads);
        assert!(r.won);
        assert_eq!(r.payout, 6);
        assert_eq!(ledger.get(), 16.0);
    }

    #[test]
    fn test_loss_forfeits_stake() {
        let (mut engine, mut ledger) = entered(10.0);
        engine.set_stake(3, &ledger).unwrap();
        let r = flip(&mut engine, &mut ledger, CoinSide::Heads, CoinSide::Tails);
        assert!(!r.won);
        assert_eq!(ledger.get(), 7.0);
    }

    #[test]
    fn test_stand_only_after_first_flip() {
        let (mut engine, mut ledger) = entered(5.0);
        assert_eq!(engine.stand(), Err(GameError::StandNotAllowed));
        flip(&mut engine, &mut ledger, CoinSide::Tails, CoinSide::Tails);
        assert_eq!(engine.stand(), Err(GameError::StandNotAllowed));
        assert_eq!(engine.continue_round(&ledger), Ok(Level3Phase::AwaitingBet));
        assert!(engine.bet().side.is_none());
        engine.stand().unwrap();
        assert_eq!(engine.end_reason(), Some(EndReason::Stood));
    }

    #[test]
    fn test_bankrupt_ends_level() {
        let (mut engine, mut ledger) = entered(1.0);
        flip(&mut engine, &mut ledger, CoinSide::Heads, CoinSide::Tails);
        assert_eq!(ledger.get(), 0.0);
        assert_eq!(
            engine.continue_round(&ledger),
            Ok(Level3Phase::Ended(EndReason::Bankrupt))
        );
    }

    #[test]
    fn test_fractional_score_below_stake() {
        let (mut engine, ledger) = entered(2.5);
        assert!(engine.set_stake(3, &ledger).is_err());
        assert_eq!(engine.set_stake(2, &ledger), Ok(2));
    }

    proptest! {
        #[test]
        fn prop_ends_within_five_flips(
            start in 1u32..50,
            flips in prop::collection::vec((1u32..10, any::<bool>(), any::<bool>()), 5),
        ) {
            let (mut engine, mut ledger) = entered(f64::from(start));
            let mut used = 0;
            for (stake, pick_heads, land_heads) in flips {
                if engine.is_ended() {
                    break;
                }
                let stake = stake.min(ledger.get() as u32).max(1);
                engine.set_stake(i64::from(stake), &ledger).unwrap();
                let side = if pick_heads { CoinSide::Heads } else { CoinSide::Tails };
                let outcome = if land_heads { CoinSide::Heads } else { CoinSide::Tails };
                let before = ledger.get();
                let r = flip(&mut engine, &mut ledger, side, outcome);
                prop_assert!(f64::from(r.stake) <= before);
                prop_assert!(ledger.get() >= 0.0);
                used += 1;
                engine.continue_round(&ledger).unwrap();
            }
            prop_assert!(engine.is_ended());
            prop_assert!(used <= LEVEL3_FLIPS);
        }
    }
}
