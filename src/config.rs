//! Application-level configuration constants and the shared run configuration.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

// Speed slider
pub const MAX_SPEED: u32 = 1000;
pub const DEFAULT_SPEED: u32 = 990; // 10 ms per step

// Sequence size slider
pub const DEFAULT_SIZE: usize = 100;
pub const MIN_SIZE: usize = 5;
pub const MAX_SIZE: usize = 300;

// Merge placements pause for a fraction of the swap delay
pub const MERGE_DELAY_DIVISOR: i64 = 10;

// Tone output
pub const DEFAULT_VOLUME_DB: f32 = -20.0;
pub const TONE_DURATION_SEC: f64 = 0.1;

// Used until the viewport can be measured
pub const FALLBACK_CEILING: u32 = 500;

// DOM ids the controller measures
pub const HEADER_ID: &str = "header";
pub const ARRAY_CONTAINER_ID: &str = "arrayContainer";

/// Speed and mute settings shared between the UI and the running sort.
///
/// Clones share the same cells, so a slider change made while a run is
/// suspended is picked up by that run's next delay.
#[derive(Clone)]
pub struct RunConfig {
    speed: Rc<Cell<u32>>,
    muted: Rc<Cell<bool>>,
    max_speed: u32,
}

impl RunConfig {
    pub fn new(speed: u32, max_speed: u32, muted: bool) -> Self {
        Self {
            speed: Rc::new(Cell::new(speed)),
            muted: Rc::new(Cell::new(muted)),
            max_speed,
        }
    }

    /// A config whose delay is exactly `delay_ms`.
    pub fn with_delay(delay_ms: u32) -> Self {
        Self::new(MAX_SPEED.saturating_sub(delay_ms), MAX_SPEED, true)
    }

    pub fn speed(&self) -> u32 {
        self.speed.get()
    }

    pub fn set_speed(&self, speed: u32) {
        self.speed.set(speed);
    }

    pub fn max_speed(&self) -> u32 {
        self.max_speed
    }

    /// Current step delay. Negative when the speed setting overshoots
    /// `max_speed`; the step context rejects that.
    pub fn delay_ms(&self) -> i64 {
        self.max_speed as i64 - self.speed.get() as i64
    }

    pub fn is_muted(&self) -> bool {
        self.muted.get()
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.set(muted);
    }

    /// Flip the mute flag, returning the new state.
    pub fn toggle_muted(&self) -> bool {
        let muted = !self.muted.get();
        self.muted.set(muted);
        muted
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED, MAX_SPEED, true)
    }
}

impl PartialEq for RunConfig {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.speed, &other.speed) && Rc::ptr_eq(&self.muted, &other.muted)
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("speed", &self.speed.get())
            .field("max_speed", &self.max_speed)
            .field("muted", &self.muted.get())
            .finish()
    }
}
