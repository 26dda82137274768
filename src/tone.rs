//! Audible feedback for sort steps.
//!
//! Each comparison or placement plays the current element's value as a
//! frequency in Hz. A frequency of zero (or anything non-positive) silences
//! whatever is still sounding; runs send it once they finish.

use crate::config::{DEFAULT_VOLUME_DB, TONE_DURATION_SEC};
use log::{debug, warn};
use std::cell::RefCell;
use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioScheduledSourceNode, OscillatorNode, OscillatorType};

/// Sink for step tones. Implementations must never fail the caller.
pub trait ToneEmitter {
    fn emit(&self, frequency: f32);
}

/// Emits nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentTone;

impl ToneEmitter for SilentTone {
    fn emit(&self, _frequency: f32) {}
}

/// Web Audio oscillator playing a short blip per step.
///
/// The audio context is created lazily on the first audible tone, since
/// browsers refuse to start one before a user gesture.
pub struct WebTone {
    context: RefCell<Option<AudioContext>>,
    active: RefCell<Option<OscillatorNode>>,
    volume_db: f32,
}

impl WebTone {
    pub fn new(volume_db: f32) -> Self {
        Self {
            context: RefCell::new(None),
            active: RefCell::new(None),
            volume_db,
        }
    }

    fn context(&self) -> Result<AudioContext, JsValue> {
        if let Some(ctx) = self.context.borrow().as_ref() {
            return Ok(ctx.clone());
        }
        let ctx = AudioContext::new()?;
        debug!("Created audio context");
        *self.context.borrow_mut() = Some(ctx.clone());
        Ok(ctx)
    }

    fn play(&self, frequency: f32) -> Result<(), JsValue> {
        let ctx = self.context()?;
        self.silence();

        let oscillator = ctx.create_oscillator()?;
        oscillator.set_type(OscillatorType::Triangle);
        oscillator.frequency().set_value(frequency);

        let gain = ctx.create_gain()?;
        gain.gain().set_value(db_to_gain(self.volume_db));

        oscillator.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&ctx.destination())?;

        let now = ctx.current_time();
        let source: &AudioScheduledSourceNode = &oscillator;
        source.start_with_when(now)?;
        source.stop_with_when(now + TONE_DURATION_SEC)?;

        *self.active.borrow_mut() = Some(oscillator);
        Ok(())
    }

    fn silence(&self) {
        if let Some(oscillator) = self.active.borrow_mut().take() {
            let source: &AudioScheduledSourceNode = &oscillator;
            // Fails when the blip already ended on its own
            if let Err(err) = source.stop() {
                debug!("Oscillator already stopped: {:?}", err);
            }
        }
    }
}

impl Default for WebTone {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME_DB)
    }
}

impl ToneEmitter for WebTone {
    fn emit(&self, frequency: f32) {
        if !frequency.is_finite() || frequency <= 0.0 {
            self.silence();
            return;
        }
        if let Err(err) = self.play(frequency) {
            warn!("Tone at {} Hz failed: {:?}", frequency, err);
        }
    }
}

/// Convert a decibel level to a linear gain factor.
pub fn db_to_gain(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}
