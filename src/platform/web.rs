//! Browser bindings
//!
//! The page owns the DOM. `WebGame` exposes one method per button and a
//! `tick(now_ms)` to call from `requestAnimationFrame`; every render call
//! is forwarded to a JS callback as `(kind, json)`.

use std::sync::Once;

use serde::Serialize;
use serde_json::json;
use wasm_bindgen::prelude::*;

use crate::audio::web::HtmlAudioBackend;
use crate::session::GameSession;
use crate::settings::Settings;
use crate::sim::{CoinSide, Operation, PcgSource, Prediction};
use crate::ui::{IntroScreen, Level1ResultView, Level3View, Renderer, ResultView};

/// Forwards render calls to `callback(kind, json)`
pub struct JsRenderer {
    callback: js_sys::Function,
}

impl JsRenderer {
    pub fn new(callback: js_sys::Function) -> Self {
        Self { callback }
    }

    fn emit(&self, kind: &str, payload: &impl Serialize) {
        let json = match serde_json::to_string(payload) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not encode {} payload: {}", kind, e);
                return;
            }
        };
        if let Err(e) = self.callback.call2(
            &JsValue::NULL,
            &JsValue::from_str(kind),
            &JsValue::from_str(&json),
        ) {
            log::warn!("Render callback failed for {}: {:?}", kind, e);
        }
    }
}

impl Renderer for JsRenderer {
    fn render_intro(&mut self, screen: IntroScreen) {
        self.emit(
            "intro",
            &json!({ "index": screen.index(), "button": screen.button_label() }),
        );
    }

    fn render_score(&mut self, display: &str) {
        self.emit("score", &json!({ "score": display }));
    }

    fn render_rolling(&mut self) {
        self.emit("rolling", &json!({}));
    }

    fn render_level1_choices(&mut self, die: u8, ops: &[Operation]) {
        let ops: Vec<&str> = ops.iter().map(|op| op.symbol()).collect();
        self.emit("level1_choices", &json!({ "die": die, "ops": ops }));
    }

    fn render_level1_result(&mut self, view: &Level1ResultView) {
        self.emit("level1_result", view);
    }

    fn render_level2_round(&mut self, card: u8, rounds_remaining: u32) {
        self.emit(
            "level2_round",
            &json!({ "card": card, "rounds_remaining": rounds_remaining }),
        );
    }

    fn render_level3_panel(&mut self, view: &Level3View) {
        self.emit("level3_panel", view);
    }

    fn render_result(&mut self, view: &ResultView) {
        self.emit("result", view);
    }

    fn render_summary(&mut self, final_score: &str) {
        self.emit("summary", &json!({ "score": final_score }));
    }

    fn render_message(&mut self, text: &str) {
        self.emit("message", &json!({ "text": text }));
    }

    fn render_sound_toggle(&mut self, muted: bool) {
        self.emit("sound_toggle", &json!({ "muted": muted }));
    }
}

/// Game handle exported to the page
#[wasm_bindgen]
pub struct WebGame {
    session: GameSession<PcgSource, HtmlAudioBackend, JsRenderer>,
}

#[wasm_bindgen]
impl WebGame {
    /// `settings_json` may be empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(callback: js_sys::Function, settings_json: &str) -> Result<WebGame, JsValue> {
        let settings = if settings_json.trim().is_empty() {
            Settings::default()
        } else {
            Settings::from_json(settings_json).unwrap_or_else(|e| {
                log::warn!("{} - using default settings", e);
                Settings::default()
            })
        };
        let seed = settings.seed.unwrap_or_else(super::fresh_seed);
        let backend = HtmlAudioBackend::new().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let session = GameSession::new(
            &settings,
            seed,
            PcgSource::new(seed),
            backend,
            JsRenderer::new(callback),
        );
        Ok(WebGame { session })
    }

    /// Title screen Play button
    pub fn play(&mut self) -> bool {
        self.session.press_continue().is_ok()
    }

    /// Level intro Next button
    pub fn next(&mut self) -> bool {
        self.session.press_continue().is_ok()
    }

    pub fn roll(&mut self) -> bool {
        self.session.roll().is_ok()
    }

    pub fn choose_operation(&mut self, symbol: &str) -> bool {
        match symbol.parse::<Operation>() {
            Ok(op) => self.session.choose_operation(op).is_ok(),
            Err(e) => self.reject(&e),
        }
    }

    /// `higher`, `lower` or `equal`
    pub fn predict(&mut self, name: &str) -> bool {
        match name.parse::<Prediction>() {
            Ok(prediction) => self.session.predict(prediction).is_ok(),
            Err(e) => self.reject(&e),
        }
    }

    /// `heads` or `tails`
    pub fn select_side(&mut self, name: &str) -> bool {
        match name.parse::<CoinSide>() {
            Ok(side) => self.session.select_side(side).is_ok(),
            Err(e) => self.reject(&e),
        }
    }

    pub fn set_stake(&mut self, amount: f64) -> bool {
        self.session.set_stake(amount.floor() as i64).is_ok()
    }

    pub fn flip(&mut self) -> bool {
        self.session.flip().is_ok()
    }

    pub fn stand(&mut self) -> bool {
        self.session.stand().is_ok()
    }

    pub fn continue_betting(&mut self) -> bool {
        self.session.continue_betting().is_ok()
    }

    /// Returns the new muted state
    pub fn toggle_mute(&mut self) -> bool {
        self.session.toggle_mute()
    }

    pub fn restart(&mut self) {
        self.session.restart(super::fresh_seed());
    }

    /// Advance timers; pass the `requestAnimationFrame` timestamp
    pub fn tick(&mut self, now_ms: f64) {
        self.session.advance(now_ms);
    }

    pub fn score(&self) -> f64 {
        self.session.score()
    }

    pub fn is_busy(&self) -> bool {
        self.session.is_busy()
    }
}

impl WebGame {
    fn reject(&mut self, message: &str) -> bool {
        self.session.renderer_mut().render_message(message);
        false
    }
}

static INIT: Once = Once::new();

/// Logging and panic hook for the browser; runs when the module is
/// instantiated, later calls do nothing
#[wasm_bindgen(start)]
pub fn init() {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&format!("Logger not installed: {}", e)));
        }
        log::info!("Lucky Trio starting...");
    });
}
