//! Lucky Trio entry point
//!
//! On the web this only sets up logging; the page constructs `WebGame`.
//! Natively it plays one headless game with a simple policy and logs it.
//! An optional settings JSON path may be passed as the first argument.

#[cfg(target_arch = "wasm32")]
fn main() {
    lucky_trio::platform::web::init();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lucky Trio (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => lucky_trio::Settings::load_or_default(path),
        None => lucky_trio::Settings::default(),
    };
    autoplay::run(&settings);
}

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use lucky_trio::ui::LogRenderer;
    use lucky_trio::sim::{
        CoinSide, Level, Level1Phase, Level3Phase, Operation, PcgSource, Prediction, Stage,
    };
    use lucky_trio::{GameSession, NullBackend, Settings, platform};

    /// Guard against a stuck policy
    const MAX_STEPS: usize = 500;

    type Session = GameSession<PcgSource, NullBackend, LogRenderer>;

    pub fn run(settings: &Settings) {
        let seed = settings.seed.unwrap_or_else(platform::fresh_seed);
        let mut session = GameSession::new(
            settings,
            seed,
            PcgSource::new(seed),
            NullBackend,
            LogRenderer,
        );

        for _ in 0..MAX_STEPS {
            if session.stage() == Stage::Summary {
                log::info!("Final score: {}", session.state().ledger.display());
                return;
            }
            step(&mut session);
            session.run_until_idle();
        }
        log::warn!("Gave up after {} steps in {:?}", MAX_STEPS, session.stage());
    }

    fn step(session: &mut Session) {
        let result = match session.stage() {
            Stage::Title | Stage::Intro(_) => session.press_continue().map(|_| ()),
            Stage::Playing(Level::One) => play_dice(session),
            Stage::Playing(Level::Two) => play_cards(session),
            Stage::Playing(Level::Three) => play_coin(session),
            Stage::Summary => Ok(()),
        };
        if let Err(e) = result {
            log::debug!("Policy move rejected: {}", e);
        }
    }

    fn play_dice(session: &mut Session) -> Result<(), lucky_trio::GameError> {
        match session.state().level1.phase() {
            Level1Phase::AwaitingFirstRoll => session.roll(),
            Level1Phase::AwaitingOperationChoice => {
                let available = session.state().level1.available();
                // Grow early, take the losses last
                let preference = [
                    Operation::Multiply,
                    Operation::Add,
                    Operation::Divide,
                    Operation::Subtract,
                ];
                let op = preference
                    .into_iter()
                    .find(|op| available.contains(op))
                    .unwrap_or(Operation::Add);
                session.choose_operation(op)
            }
            Level1Phase::AwaitingResolvingRoll | Level1Phase::Complete => Ok(()),
        }
    }

    fn play_cards(session: &mut Session) -> Result<(), lucky_trio::GameError> {
        let prediction = match session.state().level2.current_card() {
            Some(card) if card.value() <= 5 => Prediction::Higher,
            _ => Prediction::Lower,
        };
        session.predict(prediction)
    }

    fn play_coin(session: &mut Session) -> Result<(), lucky_trio::GameError> {
        match session.state().level3.phase() {
            Level3Phase::AwaitingBet => {
                let score = session.score();
                if session.state().level3.can_stand() && score >= 40.0 {
                    return session.stand();
                }
                session.select_side(CoinSide::Heads)?;
                let stake = ((score / 4.0).floor() as i64).max(1);
                session.set_stake(stake)?;
                session.flip()
            }
            Level3Phase::RoundResolved => session.continue_betting().map(|_| ()),
            Level3Phase::Flipping | Level3Phase::Ended(_) => Ok(()),
        }
    }
}
