//! Game session
//!
//! Owns the game state plus every collaborator (random source, sound
//! arbiter, renderer, scheduler) and turns player input and elapsed time into
//! engine calls, sound cues and render calls.
//!
//! Input is rejected with `GameError::InputLocked` while any animation delay
//! is in flight. Rejected input never changes state; its message is shown
//! through `Renderer::render_message`.

use crate::audio::{AudioBackend, PlayOptions, SoundArbiter, SoundId};
use crate::consts::*;
use crate::error::GameError;
use crate::settings::{Settings, Timings};
use crate::sim::{
    Card, CoinSide, GameState, Level, Level1Phase, Level2Phase, Level3Phase, Operation,
    Prediction, RandomSource, RollOutcome, Scheduler, ScoreTrend, Stage, TimerEvent,
};
use crate::ui::{IntroScreen, Level1ResultView, Level3View, Renderer, ResultView};

pub struct GameSession<R: RandomSource, B: AudioBackend, V: Renderer> {
    state: GameState,
    timings: Timings,
    scheduler: Scheduler,
    rng: R,
    audio: SoundArbiter<B>,
    renderer: V,
}

impl<R: RandomSource, B: AudioBackend, V: Renderer> GameSession<R, B, V> {
    /// Create a session on the title screen.
    ///
    /// `seed` is recorded in the state; `rng` should already be seeded from it.
    /// Sound clips are loaded from `settings.asset_root`.
    pub fn new(settings: &Settings, seed: u64, rng: R, backend: B, renderer: V) -> Self {
        let mut audio = SoundArbiter::new(backend);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        let loaded = audio.load_catalogue(&settings.asset_root);
        log::info!(
            "Loaded {}/{} sounds from {}",
            loaded,
            SoundId::CATALOGUE.len(),
            settings.asset_root
        );
        if settings.muted {
            audio.set_muted(true);
        }

        let mut session = Self {
            state: GameState::new(seed),
            timings: settings.timings,
            scheduler: Scheduler::new(),
            rng,
            audio,
            renderer,
        };
        log::info!("New game (seed {})", seed);
        session.show_title();
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    pub fn score(&self) -> f64 {
        self.state.ledger.get()
    }

    pub fn audio(&self) -> &SoundArbiter<B> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut SoundArbiter<B> {
        &mut self.audio
    }

    pub fn renderer(&self) -> &V {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut V {
        &mut self.renderer
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// An animation delay is pending
    pub fn is_busy(&self) -> bool {
        self.scheduler.is_busy()
    }

    // === Input ===

    /// Play (title) or Next (level intro)
    pub fn press_continue(&mut self) -> Result<Stage, GameError> {
        let result = self.try_press_continue();
        self.report(result)
    }

    /// Roll button (first roll of level 1; later rolls are automatic)
    pub fn roll(&mut self) -> Result<(), GameError> {
        let result = self.try_roll();
        self.report(result)
    }

    /// Pick the operator applied by the next (automatic) roll
    pub fn choose_operation(&mut self, op: Operation) -> Result<(), GameError> {
        let result = self.try_choose_operation(op);
        self.report(result)
    }

    /// Call the next card
    pub fn predict(&mut self, prediction: Prediction) -> Result<(), GameError> {
        let result = self.try_predict(prediction);
        self.report(result)
    }

    pub fn select_side(&mut self, side: CoinSide) -> Result<(), GameError> {
        let result = self.try_select_side(side);
        self.report(result)
    }

    /// Change the wager; out-of-range amounts are rejected and the stake kept
    pub fn set_stake(&mut self, amount: i64) -> Result<u32, GameError> {
        let result = self.try_set_stake(amount);
        self.report(result)
    }

    pub fn flip(&mut self) -> Result<(), GameError> {
        let result = self.try_flip();
        self.report(result)
    }

    /// Continue after a flip result
    pub fn continue_betting(&mut self) -> Result<Level3Phase, GameError> {
        let result = self.try_continue_betting();
        self.report(result)
    }

    pub fn stand(&mut self) -> Result<(), GameError> {
        let result = self.try_stand();
        self.report(result)
    }

    /// Sound on/off; returns the new muted state
    pub fn toggle_mute(&mut self) -> bool {
        let muted = !self.audio.is_muted();
        self.set_muted(muted);
        muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
        self.renderer.render_sound_toggle(muted);
    }

    /// Play again: drop all progress and return to the title screen
    pub fn restart(&mut self, seed: u64) {
        self.scheduler.clear();
        self.audio.reset();
        self.rng.reseed(seed);
        self.state = GameState::new(seed);
        log::info!("Restarted (seed {})", seed);
        self.show_title();
    }

    /// Move the clock to `now_ms`, firing every delay that came due
    pub fn advance(&mut self, now_ms: f64) {
        while let Some(event) = self.scheduler.pop_due(now_ms) {
            if let Err(e) = self.on_timer(event) {
                log::warn!("Timer {:?} ignored: {}", event, e);
            }
        }
        self.scheduler.set_now(now_ms);
        self.audio.pump();
    }

    /// Fire every pending delay, however far in the future
    pub fn run_until_idle(&mut self) {
        while let Some(due) = self.scheduler.next_due() {
            self.advance(due);
        }
        self.audio.pump();
    }

    // === Stage flow ===

    fn show_title(&mut self) {
        self.renderer.render_intro(IntroScreen::Title);
        self.renderer.render_score(&self.state.ledger.display());
        self.renderer.render_sound_toggle(self.audio.is_muted());
    }

    fn try_press_continue(&mut self) -> Result<Stage, GameError> {
        if self.scheduler.is_busy() {
            return Err(GameError::InputLocked);
        }
        let stage = self.state.sequencer.press_continue()?;
        self.audio.play(SoundId::OperationClick);
        match stage {
            Stage::Intro(level) => self.renderer.render_intro(IntroScreen::Level(level)),
            Stage::Playing(level) => self.start_level(level)?,
            Stage::Title | Stage::Summary => {}
        }
        Ok(stage)
    }

    fn start_level(&mut self, level: Level) -> Result<(), GameError> {
        log::info!("Starting {} with score {}", level, self.state.ledger.display());
        self.audio.play_background(level);
        match level {
            Level::One => {
                self.state.level1 = Default::default();
            }
            Level::Two => {
                let first = self.draw_card()?;
                self.state.level2.start(first);
                self.renderer
                    .render_level2_round(first.value(), self.state.level2.rounds_remaining());
            }
            Level::Three => {
                self.state.level3.enter(&mut self.state.ledger);
                self.render_level3_panel();
            }
        }
        self.renderer.render_score(&self.state.ledger.display());
        Ok(())
    }

    fn finish_level(&mut self, level: Level) -> Result<(), GameError> {
        match self.state.sequencer.level_finished(level)? {
            Stage::Intro(next) => self.renderer.render_intro(IntroScreen::Level(next)),
            Stage::Summary => {
                self.audio.reset();
                let final_score = self.state.ledger.display();
                log::info!("Game over, final score {}", final_score);
                self.renderer.render_summary(&final_score);
            }
            Stage::Title | Stage::Playing(_) => {}
        }
        Ok(())
    }

    /// Level input is only accepted while `level` is being played and idle
    fn require_playing(&self, level: Level, action: &'static str) -> Result<(), GameError> {
        if self.state.stage() != Stage::Playing(level) {
            return Err(GameError::InvalidAction { level, action });
        }
        if self.scheduler.is_busy() {
            return Err(GameError::InputLocked);
        }
        Ok(())
    }

    fn report<T>(&mut self, result: Result<T, GameError>) -> Result<T, GameError> {
        if let Err(e) = &result {
            log::debug!("Rejected input: {}", e);
            self.renderer.render_message(&e.to_string());
        }
        result
    }

    // === Level 1 ===

    fn try_roll(&mut self) -> Result<(), GameError> {
        self.require_playing(Level::One, "roll")?;
        if self.state.level1.phase() != Level1Phase::AwaitingFirstRoll {
            return Err(GameError::InvalidAction {
                level: Level::One,
                action: "roll",
            });
        }
        self.audio.play(SoundId::RollClick);
        self.start_roll();
        Ok(())
    }

    fn try_choose_operation(&mut self, op: Operation) -> Result<(), GameError> {
        self.require_playing(Level::One, "choose an operation")?;
        self.state.level1.choose(op)?;
        self.audio.play(SoundId::OperationClick);
        self.scheduler
            .schedule(self.timings.auto_roll_ms, TimerEvent::AutoRoll);
        Ok(())
    }

    /// Draw the die now; its value is revealed when the animation ends
    fn start_roll(&mut self) {
        let value = self.rng.random_int(DIE_MIN, DIE_MAX).clamp(DIE_MIN, DIE_MAX) as u8;
        self.audio.play_loop(SoundId::DiceRolling);
        self.renderer.render_rolling();
        self.scheduler
            .schedule(self.timings.roll_duration(value), TimerEvent::DieSettled { value });
    }

    fn on_die_settled(&mut self, value: u8) -> Result<(), GameError> {
        self.audio.stop_loop(SoundId::DiceRolling);
        let outcome = self.state.level1.on_roll(value, &mut self.state.ledger)?;

        if let RollOutcome::Resolved { trend, .. } = outcome {
            let cue = match trend {
                ScoreTrend::Down => SoundId::ResultNegative,
                ScoreTrend::Up | ScoreTrend::Unchanged => SoundId::ResultPositive,
            };
            self.audio.play(cue);
        }

        let score = self.state.ledger.get();
        self.renderer.render_score(&self.state.ledger.display());
        self.renderer
            .render_level1_result(&Level1ResultView::new(&outcome, score));

        if self.state.level1.is_complete() {
            self.scheduler
                .schedule(self.timings.level1_handoff_ms, TimerEvent::Level1Finished);
        } else {
            self.renderer
                .render_level1_choices(value, self.state.level1.available());
        }
        Ok(())
    }

    // === Level 2 ===

    fn draw_card(&mut self) -> Result<Card, GameError> {
        let value = self
            .rng
            .random_int(i32::from(CARD_MIN), i32::from(CARD_MAX))
            .clamp(i32::from(CARD_MIN), i32::from(CARD_MAX));
        Card::new(value as u8)
    }

    fn try_predict(&mut self, prediction: Prediction) -> Result<(), GameError> {
        self.require_playing(Level::Two, "predict")?;
        if self.state.level2.phase() != Level2Phase::RoundActive {
            return Err(GameError::InvalidAction {
                level: Level::Two,
                action: "predict",
            });
        }
        let next = self.draw_card()?;
        let result = self
            .state
            .level2
            .predict(prediction, next, &mut self.state.ledger)?;

        self.audio.play(SoundId::DecisionClick);
        self.audio.play(if result.correct {
            SoundId::PredictionCorrect
        } else {
            SoundId::PredictionWrong
        });
        self.renderer.render_score(&self.state.ledger.display());
        self.scheduler
            .schedule(self.timings.card_flip_ms, TimerEvent::CardRevealed);
        Ok(())
    }

    fn on_card_revealed(&mut self) -> Result<(), GameError> {
        let Some(result) = self.state.level2.pending_result() else {
            return Err(GameError::InvalidAction {
                level: Level::Two,
                action: "reveal a card",
            });
        };
        self.renderer.render_result(&ResultView::from_round(&result));
        self.state.level2.complete_round()?;
        self.scheduler
            .schedule(self.timings.card_result_ms, TimerEvent::RoundFinished);
        Ok(())
    }

    fn on_round_finished(&mut self) -> Result<(), GameError> {
        if self.state.level2.is_complete() {
            return self.finish_level(Level::Two);
        }
        if let Some(card) = self.state.level2.current_card() {
            self.renderer
                .render_level2_round(card.value(), self.state.level2.rounds_remaining());
        }
        Ok(())
    }

    // === Level 3 ===

    fn render_level3_panel(&mut self) {
        let view = Level3View::new(&self.state.level3, self.state.ledger.get());
        self.renderer.render_level3_panel(&view);
    }

    fn try_select_side(&mut self, side: CoinSide) -> Result<(), GameError> {
        self.require_playing(Level::Three, "choose a side")?;
        self.state.level3.select_side(side)?;
        self.audio.play(SoundId::CoinSideClick);
        self.render_level3_panel();
        Ok(())
    }

    fn try_set_stake(&mut self, amount: i64) -> Result<u32, GameError> {
        self.require_playing(Level::Three, "change the bet")?;
        let stake = self.state.level3.set_stake(amount, &self.state.ledger)?;
        self.audio.play_foreground(
            SoundId::BetTick,
            PlayOptions::with_volume(BET_TICK_VOLUME),
        );
        self.render_level3_panel();
        Ok(stake)
    }

    fn try_flip(&mut self) -> Result<(), GameError> {
        self.require_playing(Level::Three, "flip")?;
        self.state.level3.begin_flip(&self.state.ledger)?;
        self.audio.play(SoundId::FlipClick);
        self.audio.play_loop(SoundId::CoinSpinning);
        self.scheduler
            .schedule(self.timings.coin_flip_ms, TimerEvent::CoinLanded);
        Ok(())
    }

    fn on_coin_landed(&mut self) -> Result<(), GameError> {
        self.audio.stop_loop(SoundId::CoinSpinning);
        let outcome = CoinSide::from_draw(self.rng.random_int(0, 1));
        self.state.level3.land(outcome, &mut self.state.ledger)?;
        self.renderer.render_score(&self.state.ledger.display());
        self.scheduler
            .schedule(self.timings.coin_result_ms, TimerEvent::FlipResultShown);
        Ok(())
    }

    fn on_flip_result_shown(&mut self) -> Result<(), GameError> {
        let Some(result) = self.state.level3.last_flip().copied() else {
            return Err(GameError::InvalidAction {
                level: Level::Three,
                action: "show a flip result",
            });
        };
        self.audio.play(if result.won {
            SoundId::WinJingle
        } else {
            SoundId::LossSting
        });
        self.renderer.render_result(&ResultView::from_flip(&result));
        Ok(())
    }

    fn try_continue_betting(&mut self) -> Result<Level3Phase, GameError> {
        self.require_playing(Level::Three, "continue")?;
        let phase = self.state.level3.continue_round(&self.state.ledger)?;
        match phase {
            Level3Phase::Ended(reason) => {
                log::info!("Level 3 ended: {:?}", reason);
                self.finish_level(Level::Three)?;
            }
            _ => self.render_level3_panel(),
        }
        Ok(phase)
    }

    fn try_stand(&mut self) -> Result<(), GameError> {
        self.require_playing(Level::Three, "stand")?;
        self.state.level3.stand()?;
        log::info!("Level 3 ended: player stood");
        self.finish_level(Level::Three)
    }

    // === Timers ===

    fn on_timer(&mut self, event: TimerEvent) -> Result<(), GameError> {
        match event {
            TimerEvent::DieSettled { value } => self.on_die_settled(value),
            TimerEvent::AutoRoll => {
                self.start_roll();
                Ok(())
            }
            TimerEvent::Level1Finished => self.finish_level(Level::One),
            TimerEvent::CardRevealed => self.on_card_revealed(),
            TimerEvent::RoundFinished => self.on_round_finished(),
            TimerEvent::CoinLanded => self.on_coin_landed(),
            TimerEvent::FlipResultShown => self.on_flip_result_shown(),
        }
    }
}
