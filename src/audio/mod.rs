//! Sound arbitration
//!
//! One looping background track per level plays underneath the game. Any
//! foreground effect (clicks, result stings, rolling/spinning loops) pauses
//! the background; it resumes once no foreground voice is left. Missing clips
//! and autoplay rejections degrade to silence.

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::collections::HashMap;

use crate::consts::{BACKGROUND_VOLUME, CLIP_VOLUME};
use crate::error::AudioError;
use crate::sim::Level;

/// Loaded clip, as handed out by a backend
pub type ClipHandle = u32;
/// One playing instance of a clip
pub type VoiceId = u32;

/// Named sound clips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    /// Roll button pressed
    RollClick,
    /// Die tumbling (looped)
    DiceRolling,
    /// Operator picked / intro buttons
    OperationClick,
    /// Score went up or stayed the same
    ResultPositive,
    /// Score went down
    ResultNegative,
    /// Higher/lower/equal pressed
    DecisionClick,
    PredictionCorrect,
    PredictionWrong,
    /// Heads/tails pressed
    CoinSideClick,
    /// Bet amount changed
    BetTick,
    /// Flip button pressed
    FlipClick,
    /// Coin spinning (looped)
    CoinSpinning,
    WinJingle,
    LossSting,
    /// Level background music
    Background(Level),
}

impl SoundId {
    /// Every clip the game uses
    pub const CATALOGUE: [SoundId; 17] = [
        SoundId::RollClick,
        SoundId::DiceRolling,
        SoundId::OperationClick,
        SoundId::ResultPositive,
        SoundId::ResultNegative,
        SoundId::DecisionClick,
        SoundId::PredictionCorrect,
        SoundId::PredictionWrong,
        SoundId::CoinSideClick,
        SoundId::BetTick,
        SoundId::FlipClick,
        SoundId::CoinSpinning,
        SoundId::WinJingle,
        SoundId::LossSting,
        SoundId::Background(Level::One),
        SoundId::Background(Level::Two),
        SoundId::Background(Level::Three),
    ];

    pub fn is_background(&self) -> bool {
        matches!(self, SoundId::Background(_))
    }

    /// Asset path relative to the sound root, without extension
    pub fn asset_stem(&self) -> &'static str {
        match self {
            SoundId::RollClick => "level1/roll-click",
            SoundId::DiceRolling => "level1/dice-rolling",
            SoundId::OperationClick => "level1/operation-click",
            SoundId::ResultPositive => "level1/result-positive",
            SoundId::ResultNegative => "level1/result-negative",
            SoundId::DecisionClick => "level2/decision-click",
            SoundId::PredictionCorrect => "level2/prediction-correct",
            SoundId::PredictionWrong => "level2/prediction-wrong",
            SoundId::CoinSideClick => "level3/coin-side-click",
            SoundId::BetTick => "level3/bet-tick",
            SoundId::FlipClick => "level3/flip-click",
            SoundId::CoinSpinning => "level3/coin-spinning",
            SoundId::WinJingle => "level3/win-jingle",
            SoundId::LossSting => "level3/loss-sting",
            SoundId::Background(Level::One) => "level1/background",
            SoundId::Background(Level::Two) => "level2/background",
            SoundId::Background(Level::Three) => "level3/background",
        }
    }

    /// File extensions to try, most likely first
    pub fn formats(&self) -> &'static [&'static str] {
        if self.is_background() {
            &["mp3", "wav", "ogg"]
        } else {
            &["wav", "mp3", "ogg"]
        }
    }
}

/// How to start a voice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayOptions {
    /// Clip volume before master/sfx scaling
    pub volume: f32,
    pub looped: bool,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            volume: CLIP_VOLUME,
            looped: false,
        }
    }
}

impl PlayOptions {
    pub fn looped() -> Self {
        Self {
            looped: true,
            ..Self::default()
        }
    }

    pub fn with_volume(volume: f32) -> Self {
        Self {
            volume,
            ..Self::default()
        }
    }
}

/// Host audio: loads clips and drives voices
pub trait AudioBackend {
    /// Load the clip at `url`; fails if the format is unsupported or missing
    fn load(&mut self, url: &str) -> Result<ClipHandle, AudioError>;
    /// Start a new voice of `clip`
    fn start(&mut self, clip: ClipHandle, volume: f32, looped: bool) -> Result<VoiceId, AudioError>;
    fn pause(&mut self, voice: VoiceId);
    /// Continue a paused voice (the host may refuse, e.g. autoplay policy)
    fn resume(&mut self, voice: VoiceId) -> Result<(), AudioError>;
    /// Stop and rewind; the voice id is dead afterwards
    fn stop(&mut self, voice: VoiceId);
    /// One-shot voices that reached their end since the last call
    fn take_finished(&mut self) -> Vec<VoiceId>;
}

/// Headless backend: no clip ever loads, so every request is a no-op
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn load(&mut self, url: &str) -> Result<ClipHandle, AudioError> {
        Err(AudioError::Unsupported(url.to_string()))
    }

    fn start(&mut self, _clip: ClipHandle, _volume: f32, _looped: bool) -> Result<VoiceId, AudioError> {
        Err(AudioError::Backend("no audio output".to_string()))
    }

    fn pause(&mut self, _voice: VoiceId) {}

    fn resume(&mut self, _voice: VoiceId) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop(&mut self, _voice: VoiceId) {}

    fn take_finished(&mut self) -> Vec<VoiceId> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveVoice {
    id: SoundId,
    voice: VoiceId,
    looped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BackgroundSlot {
    level: Level,
    voice: VoiceId,
    paused: bool,
}

/// Arbitrates background music against foreground effects
pub struct SoundArbiter<B: AudioBackend> {
    backend: B,
    registry: HashMap<SoundId, Option<ClipHandle>>,
    active: Vec<ActiveVoice>,
    background: Option<BackgroundSlot>,
    last_background: Option<Level>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl<B: AudioBackend> SoundArbiter<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            registry: HashMap::new(),
            active: Vec::new(),
            background: None,
            last_background: None,
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
            muted: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0); applies from the next background start
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    fn effect_volume(&self, clip_volume: f32) -> f32 {
        (clip_volume * self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    fn background_volume(&self) -> f32 {
        (BACKGROUND_VOLUME * self.master_volume * self.music_volume).clamp(0.0, 1.0)
    }

    /// Register `id`, trying each of its formats at `base_path.<ext>` in order.
    ///
    /// Returns whether the clip is playable. An id is only loaded once.
    pub fn load_clip(&mut self, id: SoundId, base_path: &str) -> bool {
        if let Some(handle) = self.registry.get(&id) {
            return handle.is_some();
        }

        let mut loaded = None;
        for ext in id.formats() {
            let url = format!("{}.{}", base_path, ext);
            match self.backend.load(&url) {
                Ok(handle) => {
                    log::debug!("Loaded sound {:?} from {}", id, url);
                    loaded = Some(handle);
                    break;
                }
                Err(e) => log::debug!("{}", e),
            }
        }
        if loaded.is_none() {
            log::warn!("Could not load sound {:?} from {}", id, base_path);
        }
        self.registry.insert(id, loaded);
        loaded.is_some()
    }

    /// Load every clip in the catalogue from `root`; returns how many loaded
    pub fn load_catalogue(&mut self, root: &str) -> usize {
        let root = root.trim_end_matches('/');
        SoundId::CATALOGUE
            .iter()
            .filter(|id| self.load_clip(**id, &format!("{}/{}", root, id.asset_stem())))
            .count()
    }

    pub fn is_available(&self, id: SoundId) -> bool {
        matches!(self.registry.get(&id), Some(Some(_)))
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Foreground voices currently playing
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Playing background level and whether it is paused
    pub fn background(&self) -> Option<(Level, bool)> {
        self.background.map(|b| (b.level, b.paused))
    }

    /// Background music is audible right now
    pub fn is_background_playing(&self) -> bool {
        matches!(self.background, Some(BackgroundSlot { paused: false, .. }))
    }

    pub fn last_background(&self) -> Option<Level> {
        self.last_background
    }

    /// Play a one-shot effect at the default volume
    pub fn play(&mut self, id: SoundId) -> Option<VoiceId> {
        self.play_foreground(id, PlayOptions::default())
    }

    /// Start a looping effect; stop it with `stop_loop`
    pub fn play_loop(&mut self, id: SoundId) -> Option<VoiceId> {
        self.play_foreground(id, PlayOptions::looped())
    }

    /// Start a foreground voice, pausing the background while it plays.
    ///
    /// `None` when muted, when the clip is unavailable, or when the host
    /// refused playback.
    pub fn play_foreground(&mut self, id: SoundId, options: PlayOptions) -> Option<VoiceId> {
        if self.muted {
            return None;
        }
        if let SoundId::Background(level) = id {
            log::warn!("{:?} is a background track; use play_background", id);
            self.play_background(level);
            return None;
        }
        let Some(clip) = self.registry.get(&id).copied().flatten() else {
            log::debug!("Sound {:?} unavailable", id);
            return None;
        };

        if options.looped {
            // Restarting a loop replaces the old voice instead of stacking it
            self.stop_voices(|v| v.id == id && v.looped);
        }

        self.pause_background();
        let volume = self.effect_volume(options.volume);
        match self.backend.start(clip, volume, options.looped) {
            Ok(voice) => {
                self.active.push(ActiveVoice {
                    id,
                    voice,
                    looped: options.looped,
                });
                Some(voice)
            }
            Err(e) => {
                log::debug!("Could not play {:?}: {}", id, e);
                self.resume_if_idle();
                None
            }
        }
    }

    /// Switch the background track to `level`
    pub fn play_background(&mut self, level: Level) {
        self.last_background = Some(level);
        self.stop_background();
        if self.muted {
            return;
        }

        let id = SoundId::Background(level);
        let Some(clip) = self.registry.get(&id).copied().flatten() else {
            log::debug!("Background for {} unavailable", level);
            return;
        };
        let volume = self.background_volume();
        match self.backend.start(clip, volume, true) {
            Ok(voice) => {
                let mut slot = BackgroundSlot {
                    level,
                    voice,
                    paused: false,
                };
                if !self.active.is_empty() {
                    self.backend.pause(voice);
                    slot.paused = true;
                }
                self.background = Some(slot);
            }
            Err(e) => log::debug!("Could not start background for {}: {}", level, e),
        }
    }

    /// Stop the background track (the level is still remembered for unmute)
    pub fn stop_background(&mut self) {
        if let Some(slot) = self.background.take() {
            self.backend.stop(slot.voice);
        }
    }

    /// Stop a looping foreground effect
    pub fn stop_loop(&mut self, id: SoundId) {
        if self.stop_voices(|v| v.id == id && v.looped) {
            self.resume_if_idle();
        }
    }

    /// Retire finished one-shots; resumes the background once nothing is left
    pub fn pump(&mut self) {
        let finished = self.backend.take_finished();
        if finished.is_empty() {
            return;
        }
        let before = self.active.len();
        self.active.retain(|v| !finished.contains(&v.voice));
        if self.active.len() != before {
            self.resume_if_idle();
        }
    }

    /// Muting silences everything; unmuting restarts the last background level
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.stop_background();
            self.stop_voices(|_| true);
        } else if let Some(level) = self.last_background {
            self.play_background(level);
        }
        log::info!("Sound {}", if muted { "muted" } else { "on" });
    }

    /// Silence everything and forget the last background level, so unmuting
    /// brings nothing back until a level starts again
    pub fn reset(&mut self) {
        self.stop_background();
        self.stop_voices(|_| true);
        self.last_background = None;
    }

    /// Stop and forget every voice matching `pred`; true if any matched
    fn stop_voices(&mut self, pred: impl Fn(&ActiveVoice) -> bool) -> bool {
        let (stopped, kept): (Vec<_>, Vec<_>) = self.active.iter().copied().partition(|v| pred(v));
        self.active = kept;
        for v in &stopped {
            self.backend.stop(v.voice);
        }
        !stopped.is_empty()
    }

    fn pause_background(&mut self) {
        if let Some(slot) = self.background.as_mut() {
            if !slot.paused {
                self.backend.pause(slot.voice);
                slot.paused = true;
            }
        }
    }

    fn resume_if_idle(&mut self) {
        if !self.active.is_empty() {
            return;
        }
        if let Some(slot) = self.background.as_mut() {
            if slot.paused {
                match self.backend.resume(slot.voice) {
                    Ok(()) => slot.paused = false,
                    // Autoplay policy: stays paused until the next attempt
                    Err(e) => log::debug!("Background resume refused: {}", e),
                }
            }
        }
    }
}
