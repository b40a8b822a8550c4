#![allow(dead_code)]

use lucky_trio::audio::{ClipHandle, VoiceId};
use lucky_trio::sim::{Operation, ScriptedSource};
use lucky_trio::ui::{IntroScreen, Level1ResultView, Level3View, Renderer, ResultView};
use lucky_trio::{AudioBackend, AudioError, GameSession, Settings};

/// Keeps every render call as a short text line
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub lines: Vec<String>,
    pub results: Vec<ResultView>,
    pub panels: Vec<Level3View>,
}

impl RecordingRenderer {
    pub fn last_with(&self, prefix: &str) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .find(|l| l.starts_with(prefix))
            .map(|l| l.as_str())
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.lines.iter().filter(|l| l.starts_with(prefix)).count()
    }
}

impl Renderer for RecordingRenderer {
    fn render_intro(&mut self, screen: IntroScreen) {
        self.lines.push(format!("intro:{}", screen.index()));
    }

    fn render_score(&mut self, display: &str) {
        self.lines.push(format!("score:{}", display));
    }

    fn render_rolling(&mut self) {
        self.lines.push("rolling".to_string());
    }

    fn render_level1_choices(&mut self, die: u8, ops: &[Operation]) {
        let ops: Vec<&str> = ops.iter().map(|op| op.symbol()).collect();
        self.lines.push(format!("choices:{}:{}", die, ops.join("")));
    }

    fn render_level1_result(&mut self, view: &Level1ResultView) {
        self.lines.push(format!("dice:{}", view.text));
    }

    fn render_level2_round(&mut self, card: u8, rounds_remaining: u32) {
        self.lines.push(format!("round:{}:{}", card, rounds_remaining));
    }

    fn render_level3_panel(&mut self, view: &Level3View) {
        self.lines.push(format!("panel:{}", view.flips));
        self.panels.push(view.clone());
    }

    fn render_result(&mut self, view: &ResultView) {
        self.lines.push(format!("result:{}", view.headline));
        self.results.push(view.clone());
    }

    fn render_summary(&mut self, final_score: &str) {
        self.lines.push(format!("summary:{}", final_score));
    }

    fn render_message(&mut self, text: &str) {
        self.lines.push(format!("message:{}", text));
    }

    fn render_sound_toggle(&mut self, muted: bool) {
        self.lines.push(format!("sound:{}", if muted { "off" } else { "on" }));
    }
}

/// Every clip loads; one-shots report finished on the next pump
#[derive(Debug, Default)]
pub struct FakeBackend {
    pub urls: Vec<String>,
    /// (voice, clip url, volume, looped)
    pub started: Vec<(VoiceId, String, f32, bool)>,
    pub paused: Vec<VoiceId>,
    pub stopped: Vec<VoiceId>,
    pending_finish: Vec<VoiceId>,
}

impl FakeBackend {
    pub fn is_voice_paused(&self, voice: VoiceId) -> bool {
        self.paused.contains(&voice)
    }

    pub fn last_started(&self) -> Option<&(VoiceId, String, f32, bool)> {
        self.started.last()
    }
}

impl AudioBackend for FakeBackend {
    fn load(&mut self, url: &str) -> Result<ClipHandle, AudioError> {
        self.urls.push(url.to_string());
        Ok((self.urls.len() - 1) as ClipHandle)
    }

    fn start(&mut self, clip: ClipHandle, volume: f32, looped: bool) -> Result<VoiceId, AudioError> {
        let voice = self.started.len() as VoiceId + 1;
        let url = self.urls[clip as usize].clone();
        self.started.push((voice, url, volume, looped));
        if !looped {
            self.pending_finish.push(voice);
        }
        Ok(voice)
    }

    fn pause(&mut self, voice: VoiceId) {
        if !self.paused.contains(&voice) {
            self.paused.push(voice);
        }
    }

    fn resume(&mut self, voice: VoiceId) -> Result<(), AudioError> {
        self.paused.retain(|v| *v != voice);
        Ok(())
    }

    fn stop(&mut self, voice: VoiceId) {
        self.stopped.push(voice);
        self.pending_finish.retain(|v| *v != voice);
    }

    fn take_finished(&mut self) -> Vec<VoiceId> {
        std::mem::take(&mut self.pending_finish)
    }
}

pub type TestSession = GameSession<ScriptedSource, FakeBackend, RecordingRenderer>;

pub fn session(values: impl IntoIterator<Item = i32>) -> TestSession {
    GameSession::new(
        &Settings::default(),
        7,
        ScriptedSource::new(values),
        FakeBackend::default(),
        RecordingRenderer::default(),
    )
}

/// Die script for level 1 that ends on 6: 4, ×3 = 12, +2 = 14, ÷2 = 7, -1 = 6
pub const LEVEL1_DICE: [i32; 5] = [4, 3, 2, 2, 1];

/// Title -> intro 1 -> playing level 1
pub fn enter_level1(s: &mut TestSession) {
    s.press_continue().unwrap();
    s.press_continue().unwrap();
}

/// Play level 1 with `LEVEL1_DICE` and the operators in menu order × + ÷ -
pub fn play_level1(s: &mut TestSession) {
    s.roll().unwrap();
    s.run_until_idle();
    for op in [
        Operation::Multiply,
        Operation::Add,
        Operation::Divide,
        Operation::Subtract,
    ] {
        s.choose_operation(op).unwrap();
        s.run_until_idle();
    }
}
