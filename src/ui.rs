//! Presentation seam
//!
//! The core never draws. It hands plain view values to a `Renderer` and
//! ignores whatever the renderer does with them.

use serde::Serialize;

use crate::consts::LEVEL3_FLIPS;
use crate::format_score;
use crate::sim::{
    BetState, CoinSide, FlipResult, Level, Level3Engine, Operation, RollOutcome, RoundResult,
    ScoreTrend,
};

/// Intro screens, in order of appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IntroScreen {
    /// General instructions with the Play button
    Title,
    /// Rules for the upcoming level with the Next button
    Level(Level),
}

impl IntroScreen {
    /// Screen index (0 = title, 1-3 = level intros)
    pub fn index(&self) -> u8 {
        match self {
            IntroScreen::Title => 0,
            IntroScreen::Level(level) => level.number(),
        }
    }

    pub fn button_label(&self) -> &'static str {
        match self {
            IntroScreen::Title => "Play",
            IntroScreen::Level(_) => "Next",
        }
    }
}

/// Die result under the dice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Level1ResultView {
    pub die: u8,
    /// "Initial value: 4" or "4 × 3 = 12"
    pub text: String,
    /// `None` for the seeding roll
    pub trend: Option<ScoreTrend>,
    pub score: String,
}

impl Level1ResultView {
    pub fn new(outcome: &RollOutcome, score: f64) -> Self {
        let trend = match outcome {
            RollOutcome::Seeded { .. } => None,
            RollOutcome::Resolved { trend, .. } => Some(*trend),
        };
        Self {
            die: outcome.die(),
            text: outcome.describe(),
            trend,
            score: format_score(score),
        }
    }
}

/// Betting panel state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Level3View {
    pub score: String,
    pub stake: u32,
    pub side: Option<CoinSide>,
    /// Remaining flips as "n/5"
    pub flips: String,
    pub can_stand: bool,
    /// "Flip" on the first flip, "Bet" afterwards
    pub flip_label: &'static str,
}

impl Level3View {
    pub fn new(engine: &Level3Engine, score: f64) -> Self {
        let bet: &BetState = engine.bet();
        Self {
            score: format_score(score),
            stake: bet.stake,
            side: bet.side,
            flips: format!("{}/{}", bet.flips_remaining, LEVEL3_FLIPS),
            can_stand: engine.can_stand(),
            flip_label: if bet.first_flip { "Flip" } else { "Bet" },
        }
    }
}

/// Outcome overlay for a prediction or a flip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub level: Level,
    /// Prediction correct / bet won
    pub success: bool,
    pub headline: String,
    pub detail: String,
    pub score: String,
}

impl ResultView {
    pub fn from_round(result: &RoundResult) -> Self {
        let headline = if result.correct {
            format!("Correct! +{}", format_score(result.points))
        } else {
            format!("Wrong! -{}", format_score(result.points.abs()))
        };
        Self {
            level: Level::Two,
            success: result.correct,
            headline,
            detail: format!("The next card was {}", result.next),
            score: format_score(result.score_after),
        }
    }

    pub fn from_flip(result: &FlipResult) -> Self {
        let headline = if result.won {
            format!("You win! +{}", result.stake)
        } else {
            format!("You lose! -{}", result.stake)
        };
        Self {
            level: Level::Three,
            success: result.won,
            headline,
            detail: format!(
                "The coin landed on {}. Bank: {}",
                result.outcome,
                format_score(result.score_after)
            ),
            score: format_score(result.score_after),
        }
    }
}

/// Receives everything the player should see
pub trait Renderer {
    fn render_intro(&mut self, screen: IntroScreen);
    /// Score text, already formatted
    fn render_score(&mut self, display: &str);
    /// Die is tumbling
    fn render_rolling(&mut self);
    /// Die value plus the operators still available
    fn render_level1_choices(&mut self, die: u8, ops: &[Operation]);
    fn render_level1_result(&mut self, view: &Level1ResultView);
    fn render_level2_round(&mut self, card: u8, rounds_remaining: u32);
    fn render_level3_panel(&mut self, view: &Level3View);
    fn render_result(&mut self, view: &ResultView);
    fn render_summary(&mut self, final_score: &str);
    /// Transient notice (rejected input)
    fn render_message(&mut self, text: &str);
    fn render_sound_toggle(&mut self, muted: bool);
}

/// Renderer that writes every frame to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render_intro(&mut self, screen: IntroScreen) {
        log::info!("[intro {}] press {}", screen.index(), screen.button_label());
    }

    fn render_score(&mut self, display: &str) {
        log::info!("[score] {}", display);
    }

    fn render_rolling(&mut self) {
        log::debug!("[dice] rolling...");
    }

    fn render_level1_choices(&mut self, die: u8, ops: &[Operation]) {
        let ops: Vec<&str> = ops.iter().map(|op| op.symbol()).collect();
        log::info!("[dice] {} - choose {}", die, ops.join(" "));
    }

    fn render_level1_result(&mut self, view: &Level1ResultView) {
        log::info!("[dice] {}", view.text);
    }

    fn render_level2_round(&mut self, card: u8, rounds_remaining: u32) {
        log::info!("[cards] current {} ({} rounds left)", card, rounds_remaining);
    }

    fn render_level3_panel(&mut self, view: &Level3View) {
        log::info!(
            "[coin] bank {} stake {} side {:?} flips {}{}",
            view.score,
            view.stake,
            view.side,
            view.flips,
            if view.can_stand { " (stand available)" } else { "" }
        );
    }

    fn render_result(&mut self, view: &ResultView) {
        log::info!("[{}] {} {}", view.level, view.headline, view.detail);
    }

    fn render_summary(&mut self, final_score: &str) {
        log::info!("[summary] final score {}", final_score);
    }

    fn render_message(&mut self, text: &str) {
        log::warn!("{}", text);
    }

    fn render_sound_toggle(&mut self, muted: bool) {
        log::debug!("[sound] {}", if muted { "off" } else { "on" });
    }
}
