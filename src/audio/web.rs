//! Browser audio through `HtmlAudioElement`

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlAudioElement;

use super::{AudioBackend, ClipHandle, VoiceId};
use crate::error::AudioError;

fn mime_for(url: &str) -> Option<&'static str> {
    let ext = url.rsplit('.').next()?;
    match ext {
        "mp3" => Some("audio/mpeg"),
        "wav" => Some("audio/wav"),
        "ogg" => Some("audio/ogg"),
        _ => None,
    }
}

/// One `<audio>` element per voice
pub struct HtmlAudioBackend {
    format_check: HtmlAudioElement,
    clips: Vec<String>,
    voices: HashMap<VoiceId, HtmlAudioElement>,
    next_voice: VoiceId,
    finished: Rc<RefCell<Vec<VoiceId>>>,
}

impl HtmlAudioBackend {
    pub fn new() -> Result<Self, AudioError> {
        let format_check = HtmlAudioElement::new()
            .map_err(|e| AudioError::Backend(format!("{:?}", e)))?;
        Ok(Self {
            format_check,
            clips: Vec::new(),
            voices: HashMap::new(),
            next_voice: 0,
            finished: Rc::new(RefCell::new(Vec::new())),
        })
    }
}

impl AudioBackend for HtmlAudioBackend {
    fn load(&mut self, url: &str) -> Result<ClipHandle, AudioError> {
        let mime = mime_for(url).ok_or_else(|| AudioError::Unsupported(url.to_string()))?;
        // can_play_type answers "", "maybe" or "probably"
        if self.format_check.can_play_type(mime).is_empty() {
            return Err(AudioError::Unsupported(url.to_string()));
        }
        self.clips.push(url.to_string());
        Ok((self.clips.len() - 1) as ClipHandle)
    }

    fn start(&mut self, clip: ClipHandle, volume: f32, looped: bool) -> Result<VoiceId, AudioError> {
        let url = self
            .clips
            .get(clip as usize)
            .ok_or_else(|| AudioError::Backend(format!("unknown clip {}", clip)))?;
        let element = HtmlAudioElement::new_with_src(url)
            .map_err(|e| AudioError::Backend(format!("{:?}", e)))?;
        element.set_volume(f64::from(volume));
        element.set_loop(looped);

        self.next_voice += 1;
        let voice = self.next_voice;

        if !looped {
            let finished = self.finished.clone();
            let on_ended = Closure::once_into_js(move || {
                finished.borrow_mut().push(voice);
            });
            let _ = element.add_event_listener_with_callback("ended", on_ended.unchecked_ref());
        }

        let promise = element
            .play()
            .map_err(|e| AudioError::Backend(format!("{:?}", e)))?;
        let finished = self.finished.clone();
        let on_rejected = Closure::<dyn FnMut(JsValue)>::new(move |err: JsValue| {
            let name = js_sys::Reflect::get(&err, &JsValue::from_str("name"))
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default();
            if name != "NotAllowedError" {
                log::debug!("Audio play failed: {:?}", err);
            }
            // A refused one-shot never ends on its own. A refused loop keeps
            // its element so the next resume retries play()
            if !looped {
                finished.borrow_mut().push(voice);
            }
        });
        let _ = promise.catch(&on_rejected);
        on_rejected.forget();

        self.voices.insert(voice, element);
        Ok(voice)
    }

    fn pause(&mut self, voice: VoiceId) {
        if let Some(element) = self.voices.get(&voice) {
            let _ = element.pause();
        }
    }

    fn resume(&mut self, voice: VoiceId) -> Result<(), AudioError> {
        let element = self
            .voices
            .get(&voice)
            .ok_or_else(|| AudioError::Backend(format!("unknown voice {}", voice)))?;
        let promise = element
            .play()
            .map_err(|e| AudioError::Backend(format!("{:?}", e)))?;
        let on_rejected = Closure::<dyn FnMut(JsValue)>::new(|err: JsValue| {
            log::debug!("Audio resume refused: {:?}", err);
        });
        let _ = promise.catch(&on_rejected);
        on_rejected.forget();
        Ok(())
    }

    fn stop(&mut self, voice: VoiceId) {
        if let Some(element) = self.voices.remove(&voice) {
            let _ = element.pause();
            element.set_current_time(0.0);
        }
    }

    fn take_finished(&mut self) -> Vec<VoiceId> {
        let finished = std::mem::take(&mut *self.finished.borrow_mut());
        for voice in &finished {
            self.voices.remove(voice);
        }
        finished
    }
}
