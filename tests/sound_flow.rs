mod common;

use common::*;
use lucky_trio::sim::{CoinSide, Level, Operation, Prediction};
use lucky_trio::{GameSession, Settings, SoundId};

#[test]
fn test_all_clips_registered_from_asset_root() {
    let s = session([]);
    let urls = &s.audio().backend().urls;
    assert_eq!(urls.len(), SoundId::CATALOGUE.len());
    assert!(urls.contains(&"assets/sounds/level1/background.mp3".to_string()));
    assert!(urls.contains(&"assets/sounds/level3/bet-tick.wav".to_string()));
}

#[test]
fn test_level_start_plays_its_background() {
    let mut s = session(LEVEL1_DICE);
    s.press_continue().unwrap();
    assert_eq!(s.audio().background(), None);
    s.press_continue().unwrap();
    // Starts under the Next click, resumes once it ends
    assert_eq!(s.audio().background(), Some((Level::One, true)));
    s.run_until_idle();
    assert_eq!(s.audio().background(), Some((Level::One, false)));
}

#[test]
fn test_rolling_pauses_background_until_effects_end() {
    let mut s = session(LEVEL1_DICE);
    enter_level1(&mut s);
    s.run_until_idle();
    assert!(s.audio().is_background_playing());

    s.roll().unwrap();
    // Roll click plus the rolling loop
    assert_eq!(s.audio().active_count(), 2);
    assert_eq!(s.audio().background(), Some((Level::One, true)));

    s.advance(s.scheduler().now() + 500.0);
    // Click has finished but the die is still tumbling
    assert_eq!(s.audio().active_count(), 1);
    assert!(!s.audio().is_background_playing());

    s.run_until_idle();
    assert_eq!(s.audio().active_count(), 0);
    assert!(s.audio().is_background_playing());
}

#[test]
fn test_result_cue_follows_score_direction() {
    let mut s = session([4, 6, 6]);
    enter_level1(&mut s);
    s.roll().unwrap();
    s.run_until_idle();

    s.choose_operation(Operation::Subtract).unwrap();
    s.run_until_idle();
    assert_eq!(s.score(), 0.0);
    let negative = s
        .audio()
        .backend()
        .started
        .iter()
        .any(|(_, url, _, _)| url.ends_with("result-negative.wav"));
    assert!(negative);

    s.choose_operation(Operation::Multiply).unwrap();
    s.run_until_idle();
    // 0 × 6 leaves the score unchanged, which counts as positive
    let (_, url, _, _) = s.audio().backend().last_started().unwrap();
    assert!(url.ends_with("result-positive.wav"));
}

#[test]
fn test_bet_tick_is_quieter() {
    let mut values = LEVEL1_DICE.to_vec();
    values.extend([5, 7, 7, 3, 3, 3, 3, 3, 3, 3, 3, 0]);
    let mut s = session(values);
    enter_level1(&mut s);
    play_level1(&mut s);
    s.press_continue().unwrap();
    for _ in 0..10 {
        s.predict(Prediction::Higher).unwrap();
        s.run_until_idle();
    }
    s.press_continue().unwrap();
    s.run_until_idle();
    assert_eq!(s.audio().background(), Some((Level::Three, false)));

    s.select_side(CoinSide::Tails).unwrap();
    s.set_stake(1).unwrap();
    let (_, url, volume, _) = s.audio().backend().last_started().unwrap();
    assert!(url.ends_with("bet-tick.wav"));
    assert!((volume - 0.4).abs() < 1e-6);
}

#[test]
fn test_mute_toggle_stops_and_restores_background() {
    let mut s = session(LEVEL1_DICE);
    enter_level1(&mut s);
    assert!(s.toggle_mute());
    assert_eq!(s.audio().background(), None);
    assert_eq!(s.renderer().last_with("sound:"), Some("sound:off"));

    // Effects are silent while muted
    s.roll().unwrap();
    assert_eq!(s.audio().active_count(), 0);
    s.run_until_idle();

    assert!(!s.toggle_mute());
    assert_eq!(s.audio().background(), Some((Level::One, false)));
    assert_eq!(s.renderer().last_with("sound:"), Some("sound:on"));
}

#[test]
fn test_volumes_scale_effects() {
    let settings = Settings {
        master_volume: 0.5,
        sfx_volume: 0.5,
        ..Settings::default()
    };
    let mut s = GameSession::new(
        &settings,
        1,
        lucky_trio::sim::ScriptedSource::new([4]),
        FakeBackend::default(),
        RecordingRenderer::default(),
    );
    s.press_continue().unwrap();
    let (_, url, volume, _) = s.audio().backend().last_started().unwrap();
    assert!(url.ends_with("operation-click.wav"));
    assert!((volume - 0.7 * 0.25).abs() < 1e-6);
}

#[test]
fn test_muted_setting_starts_silent() {
    let settings = Settings {
        muted: true,
        ..Settings::default()
    };
    let mut s = GameSession::new(
        &settings,
        1,
        lucky_trio::sim::ScriptedSource::new([4]),
        FakeBackend::default(),
        RecordingRenderer::default(),
    );
    assert_eq!(s.renderer().last_with("sound:"), Some("sound:off"));
    enter_level1(&mut s);
    assert_eq!(s.audio().background(), None);
    assert_eq!(s.audio().last_background(), Some(Level::One));
}

#[test]
fn test_unmute_after_restart_stays_silent() {
    let mut s = session(LEVEL1_DICE);
    enter_level1(&mut s);
    s.run_until_idle();
    assert_eq!(s.audio().background(), Some((Level::One, false)));

    s.restart(5);
    assert_eq!(s.audio().background(), None);
    assert!(s.toggle_mute());
    assert!(!s.toggle_mute());
    // Title screen has no music until level 1 starts again
    assert_eq!(s.audio().background(), None);
    assert_eq!(s.audio().active_count(), 0);
}

#[test]
fn test_unmute_on_summary_stays_silent() {
    let mut values = LEVEL1_DICE.to_vec();
    values.extend([5, 7, 7, 3, 3, 3, 3, 3, 3, 3, 3, 0]);
    let mut s = session(values);
    enter_level1(&mut s);
    play_level1(&mut s);
    s.press_continue().unwrap();
    for _ in 0..10 {
        s.predict(Prediction::Higher).unwrap();
        s.run_until_idle();
    }
    s.press_continue().unwrap();
    s.run_until_idle();
    assert_eq!(s.audio().background(), Some((Level::Three, false)));

    s.select_side(CoinSide::Heads).unwrap();
    s.flip().unwrap();
    s.run_until_idle();
    s.continue_betting().unwrap();
    s.stand().unwrap();
    assert_eq!(s.renderer().count("summary:"), 1);
    assert_eq!(s.audio().background(), None);

    assert!(s.toggle_mute());
    assert!(!s.toggle_mute());
    assert_eq!(s.audio().background(), None);
    let level3_music = s
        .audio()
        .backend()
        .started
        .iter()
        .filter(|(_, url, _, _)| url.ends_with("level3/background.mp3"))
        .count();
    assert_eq!(level3_music, 1);
}
