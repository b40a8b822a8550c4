//! Game rules
//!
//! All gameplay logic lives here. This module must stay headless:
//! - No rendering, audio or platform dependencies
//! - Randomness only through `RandomSource`
//! - Delays only through `Scheduler`

pub mod level1;
pub mod level2;
pub mod level3;
pub mod rng;
pub mod score;
pub mod sequencer;
pub mod state;
pub mod timer;

pub use level1::{Level1Engine, Level1Phase, OperationSet, RollOutcome};
pub use level2::{Card, Level2Engine, Level2Phase, Prediction, RoundResult};
pub use level3::{BetState, CoinSide, EndReason, FlipResult, Level3Engine, Level3Phase};
pub use rng::{PcgSource, RandomSource, ScriptedSource};
pub use score::{Operation, ScoreLedger, ScoreTrend};
pub use sequencer::{LevelSequencer, Stage};
pub use state::{GameState, Level};
pub use timer::{Scheduler, TimerEvent};
