//! Animated sorting engine for the sort visualizer.
//!
//! The engine runs bubble, selection, insertion and merge sort over a shared
//! [`ValueSequence`], pausing on a [`StepClock`] between observable steps so a
//! renderer can draw every comparison and swap, and a [`ToneEmitter`] can play
//! it. Runs are cancelled through a [`Generation`] counter: starting a new run
//! silently stops the old one.

use log::warn;
use std::fmt;
use wasm_bindgen::prelude::*;

pub mod algorithms;
pub mod clock;
pub mod config;
pub mod sequence;
pub mod tone;
pub mod utils;

pub use algorithms::{run, Algorithm, Outcome, RunReport, SortRun, StepStats};
pub use clock::{Generation, ImmediateClock, RunGuard, StepClock, TimerClock};
pub use config::RunConfig;
pub use sequence::{Entry, Observer, ValueSequence};
pub use tone::{SilentTone, ToneEmitter, WebTone};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// Requested sequence length below zero.
    InvalidSize(i64),
    /// Requested value ceiling below one.
    InvalidRange(i64),
    /// The delay primitive was asked to wait a negative duration.
    NegativeDelay(i64),
    UnknownAlgorithm(String),
    /// A newer run took over the sequence. Reported by `run` as
    /// [`Outcome::Superseded`], never returned as an error.
    Superseded,
}

impl fmt::Display for SortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortError::InvalidSize(size) => {
                write!(f, "Invalid sequence size {} (must be at least 0)", size)
            }
            SortError::InvalidRange(ceiling) => {
                write!(f, "Invalid value ceiling {} (must be at least 1)", ceiling)
            }
            SortError::NegativeDelay(ms) => write!(
                f,
                "Step delay of {} ms is negative; speed exceeds the maximum",
                ms
            ),
            SortError::UnknownAlgorithm(name) => write!(
                f,
                "Unknown algorithm '{}'. Use: bubble, selection, insertion, or merge",
                name
            ),
            SortError::Superseded => write!(f, "Run was superseded by a newer run"),
        }
    }
}

impl std::error::Error for SortError {}

/// Sort `values` with the named algorithm, without pacing or sound.
///
/// Entry point for plain JavaScript callers.
///
/// # Arguments
/// * `values_js` - Array of positive integers
/// * `algorithm` - `"bubble"`, `"selection"`, `"insertion"` or `"merge"`
///
/// # Returns
/// The sorted array, or an error message string
#[wasm_bindgen]
pub async fn sort_values(values_js: JsValue, algorithm: String) -> JsValue {
    let values: Vec<u32> = match serde_wasm_bindgen::from_value(values_js) {
        Ok(v) => v,
        Err(e) => {
            return serde_wasm_bindgen::to_value(&format!("Failed to deserialize values: {}", e))
                .unwrap_or(JsValue::NULL);
        }
    };

    let algorithm: Algorithm = match algorithm.parse() {
        Ok(a) => a,
        Err(e) => {
            warn!("{}", e);
            return serde_wasm_bindgen::to_value(&e.to_string()).unwrap_or(JsValue::NULL);
        }
    };

    match sort_headless(algorithm, &values).await {
        Ok(sorted) => serde_wasm_bindgen::to_value(&sorted).unwrap_or(JsValue::NULL),
        Err(e) => serde_wasm_bindgen::to_value(&format!("Sort failed: {}", e))
            .unwrap_or(JsValue::NULL),
    }
}

/// Run `algorithm` over a copy of `values` with no delays and return the result.
pub async fn sort_headless(algorithm: Algorithm, values: &[u32]) -> Result<Vec<u32>, SortError> {
    let sequence = ValueSequence::from_values(values);
    let ctx = SortRun::headless(sequence.clone());
    run(algorithm, &ctx).await?;
    Ok(sequence.values())
}
