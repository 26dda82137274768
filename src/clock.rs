//! Pacing and cancellation primitives for a sort run.
//!
//! A run only ever suspends inside [`StepClock::delay`]. Between two delays
//! everything it does is synchronous, so the renderer always observes whole
//! steps.

use futures::future::{self, FutureExt, LocalBoxFuture};
use gloo_timers::future::TimeoutFuture;
use std::cell::Cell;
use std::rc::Rc;

/// Cooperative delay used between observable steps.
pub trait StepClock {
    /// Suspend the current run for `ms` milliseconds. A zero delay still
    /// hands control back to the scheduler where the platform allows it.
    fn delay(&self, ms: u32) -> LocalBoxFuture<'static, ()>;
}

/// Browser timer clock backed by `setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerClock;

impl StepClock for TimerClock {
    fn delay(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        TimeoutFuture::new(ms).boxed_local()
    }
}

/// Resolves every delay immediately. Used for headless sorting.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateClock;

impl StepClock for ImmediateClock {
    fn delay(&self, _ms: u32) -> LocalBoxFuture<'static, ()> {
        future::ready(()).boxed_local()
    }
}

/// Monotonic run counter shared by the controller and every run it spawns.
#[derive(Debug, Clone, Default)]
pub struct Generation(Rc<Cell<u64>>);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.0.get()
    }

    /// Supersede every outstanding run and hand out the guard for the next one.
    pub fn advance(&self) -> RunGuard {
        self.0.set(self.0.get().wrapping_add(1));
        self.guard()
    }

    /// Guard bound to the current generation.
    pub fn guard(&self) -> RunGuard {
        RunGuard {
            generation: self.clone(),
            token: self.current(),
        }
    }
}

/// A run's captured generation. Once the counter moves on, the run must stop
/// touching its sequence.
#[derive(Debug, Clone)]
pub struct RunGuard {
    generation: Generation,
    token: u64,
}

impl RunGuard {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn is_current(&self) -> bool {
        self.generation.current() == self.token
    }
}
