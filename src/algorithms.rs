//! The four animated sorting algorithms.
//!
//! Each algorithm works on a shared [`ValueSequence`] through a [`SortRun`],
//! which owns the pacing, cancellation and tone rules:
//!
//! - every swap holds the first value, writes it, suspends, then writes the
//!   second one, so the renderer sees the mid-swap instant
//! - the run's guard is checked before every mutation and after every delay;
//!   once superseded, the run stops without touching the sequence again
//! - the delay is read from [`RunConfig`] each time it is issued
//!
//! On completion the sequence is non-decreasing by value and nothing is
//! highlighted.

use crate::clock::{Generation, ImmediateClock, RunGuard, StepClock};
use crate::config::{RunConfig, MERGE_DELAY_DIVISOR};
use crate::sequence::{Entry, ValueSequence};
use crate::tone::{SilentTone, ToneEmitter};
use crate::SortError;
use futures::future::{FutureExt, LocalBoxFuture};
use log::{debug, info, warn};
use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Bubble,
    Selection,
    Insertion,
    Merge,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Bubble,
        Algorithm::Selection,
        Algorithm::Insertion,
        Algorithm::Merge,
    ];

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            Algorithm::Bubble => "Bubble Sort",
            Algorithm::Selection => "Selection Sort",
            Algorithm::Insertion => "Insertion Sort",
            Algorithm::Merge => "Merge Sort",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Selection => "selection",
            Algorithm::Insertion => "insertion",
            Algorithm::Merge => "merge",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Algorithm {
    type Err = SortError;

    /// Accepts the key (`"merge"`), the label (`"Merge Sort"`) or the
    /// camel-case form (`"mergeSort"`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        let name = normalized.strip_suffix("sort").unwrap_or(&normalized);

        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.key() == name)
            .ok_or_else(|| SortError::UnknownAlgorithm(s.to_string()))
    }
}

/// Counters for the observable events of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepStats {
    pub comparisons: usize,
    pub swaps: usize,
    pub delays: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// A newer run started before this one finished.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub algorithm: Algorithm,
    pub outcome: Outcome,
    pub stats: StepStats,
}

/// Everything one run needs: the sequence it owns, how to pace itself, where
/// to send tones, and the guard telling it whether it is still wanted.
pub struct SortRun {
    sequence: ValueSequence,
    clock: Rc<dyn StepClock>,
    config: RunConfig,
    tone: Rc<dyn ToneEmitter>,
    guard: RunGuard,
    stats: Cell<StepStats>,
}

impl SortRun {
    pub fn new(
        sequence: ValueSequence,
        clock: Rc<dyn StepClock>,
        config: RunConfig,
        tone: Rc<dyn ToneEmitter>,
        guard: RunGuard,
    ) -> Self {
        Self {
            sequence,
            clock,
            config,
            tone,
            guard,
            stats: Cell::new(StepStats::default()),
        }
    }

    /// Zero-delay, silent run that can never be superseded.
    pub fn headless(sequence: ValueSequence) -> Self {
        Self::new(
            sequence,
            Rc::new(ImmediateClock),
            RunConfig::with_delay(0),
            Rc::new(SilentTone),
            Generation::new().guard(),
        )
    }

    pub fn sequence(&self) -> &ValueSequence {
        &self.sequence
    }

    pub fn stats(&self) -> StepStats {
        self.stats.get()
    }

    fn bump(&self, update: impl FnOnce(&mut StepStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    fn ensure_current(&self) -> Result<(), SortError> {
        if self.guard.is_current() {
            Ok(())
        } else {
            Err(SortError::Superseded)
        }
    }

    fn compare(&self, i: usize, j: usize) -> Ordering {
        self.bump(|s| s.comparisons += 1);
        self.sequence.value(i).cmp(&self.sequence.value(j))
    }

    fn highlight(&self, index: usize, on: bool) -> Result<(), SortError> {
        self.ensure_current()?;
        self.sequence.set_highlight(index, on);
        Ok(())
    }

    /// Configured delay divided by `divisor`, rejecting a negative setting.
    fn step_delay(&self, divisor: i64) -> Result<u32, SortError> {
        let ms = self.config.delay_ms();
        if ms < 0 {
            return Err(SortError::NegativeDelay(ms));
        }
        Ok(u32::try_from(ms / divisor).unwrap_or(u32::MAX))
    }

    async fn wait(&self, ms: u32) -> Result<(), SortError> {
        self.bump(|s| s.delays += 1);
        self.clock.delay(ms).await;
        self.ensure_current()
    }

    /// Suspend for the configured delay divided by `divisor`.
    async fn pause(&self, divisor: i64) -> Result<(), SortError> {
        self.ensure_current()?;
        let ms = self.step_delay(divisor)?;
        self.wait(ms).await
    }

    /// Exchange the payloads of `i` and `j` across one delay.
    ///
    /// The delay is resolved before the first write so a rejected delay
    /// leaves both values in place.
    async fn swap(&self, i: usize, j: usize) -> Result<(), SortError> {
        self.ensure_current()?;
        let ms = self.step_delay(1)?;
        let held = self.sequence.get(i);
        self.sequence.set_payload(i, self.sequence.get(j));
        self.wait(ms).await?;
        self.sequence.set_payload(j, held);
        self.bump(|s| s.swaps += 1);
        Ok(())
    }

    fn write_run(&self, start: usize, run: &[Entry]) -> Result<(), SortError> {
        self.ensure_current()?;
        self.sequence.write_run(start, run);
        Ok(())
    }

    fn tone(&self, value: u32) {
        if !self.config.is_muted() {
            self.tone.emit(value as f32);
        }
    }

    fn finish_tone(&self) {
        self.tone.emit(0.0);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(target_arch = "wasm32")]
fn elapsed_ms(start: f64) -> f64 {
    js_sys::Date::now() - start
}

/// Run `algorithm` to completion over the run's sequence.
///
/// A superseded run is not an error: it reports [`Outcome::Superseded`] and
/// leaves the sequence as it was when the newer run took over.
pub async fn run(algorithm: Algorithm, ctx: &SortRun) -> Result<RunReport, SortError> {
    #[cfg(not(target_arch = "wasm32"))]
    let started = Instant::now();
    #[cfg(target_arch = "wasm32")]
    let started = js_sys::Date::now();

    info!(
        "Starting {} over {} values (run {})",
        algorithm,
        ctx.sequence.len(),
        ctx.guard.token()
    );

    let result = match algorithm {
        Algorithm::Bubble => bubble_sort(ctx).await,
        Algorithm::Selection => selection_sort(ctx).await,
        Algorithm::Insertion => insertion_sort(ctx).await,
        Algorithm::Merge => merge_sort(ctx).await,
    };

    let stats = ctx.stats();
    let outcome = match result {
        Ok(()) => {
            ctx.finish_tone();
            info!(
                "{} finished in {:.0} ms: {} comparisons, {} swaps, {} delays",
                algorithm,
                elapsed_ms(started),
                stats.comparisons,
                stats.swaps,
                stats.delays
            );
            Outcome::Completed
        }
        Err(SortError::Superseded) => {
            warn!(
                "{} (run {}) superseded after {} delays",
                algorithm,
                ctx.guard.token(),
                stats.delays
            );
            Outcome::Superseded
        }
        Err(err) => {
            if ctx.guard.is_current() {
                ctx.sequence.clear_highlights();
            }
            ctx.finish_tone();
            return Err(err);
        }
    };

    Ok(RunReport {
        algorithm,
        outcome,
        stats,
    })
}

/// Repeated full passes over adjacent pairs until a pass makes no swap.
async fn bubble_sort(ctx: &SortRun) -> Result<(), SortError> {
    let n = ctx.sequence.len();
    if n < 2 {
        return Ok(());
    }

    let mut swapped = true;
    let mut passes = 0;
    while swapped {
        swapped = false;
        for i in 0..n - 1 {
            ctx.highlight(i, true)?;
            if ctx.compare(i, i + 1) == Ordering::Greater {
                ctx.swap(i, i + 1).await?;
                swapped = true;
            }
            ctx.highlight(i, false)?;
            ctx.tone(ctx.sequence.value(i));
        }
        passes += 1;
    }

    debug!("Bubble sort settled after {} passes", passes);
    Ok(())
}

/// Places the minimum of the unsorted suffix at each position. Moving the
/// candidate highlight is free; each placement costs exactly one delay.
async fn selection_sort(ctx: &SortRun) -> Result<(), SortError> {
    let n = ctx.sequence.len();
    if n < 2 {
        return Ok(());
    }

    for i in 0..n - 1 {
        ctx.highlight(i, true)?;
        ctx.tone(ctx.sequence.value(i));

        let mut lowest = i;
        for j in i + 1..n {
            if ctx.compare(lowest, j) == Ordering::Greater {
                if lowest != i {
                    ctx.highlight(lowest, false)?;
                }
                lowest = j;
                ctx.highlight(lowest, true)?;
            }
        }

        if lowest == i {
            // Already in place: pause without exchanging anything
            ctx.pause(1).await?;
        } else {
            ctx.swap(i, lowest).await?;
        }

        ctx.highlight(i, false)?;
        ctx.highlight(lowest, false)?;
    }

    Ok(())
}

/// Walks each out-of-place element left one swap at a time, carrying the
/// highlight with it.
async fn insertion_sort(ctx: &SortRun) -> Result<(), SortError> {
    let n = ctx.sequence.len();
    if n < 2 {
        return Ok(());
    }

    for i in 1..n {
        if ctx.compare(i, i - 1) != Ordering::Less {
            continue;
        }

        let mut current = i;
        ctx.highlight(current, true)?;
        while current > 0 && ctx.compare(current, current - 1) == Ordering::Less {
            ctx.tone(ctx.sequence.value(current - 1));
            ctx.swap(current, current - 1).await?;

            ctx.highlight(current, false)?;
            current -= 1;
            ctx.highlight(current, true)?;
        }
        ctx.highlight(current, false)?;
    }

    Ok(())
}

async fn merge_sort(ctx: &SortRun) -> Result<(), SortError> {
    let n = ctx.sequence.len();
    if n < 2 {
        return Ok(());
    }
    merge_range(ctx, 0, n).await
}

/// Sort the absolute range `[start, start + len)`, splitting at `len / 2`.
fn merge_range(
    ctx: &SortRun,
    start: usize,
    len: usize,
) -> LocalBoxFuture<'_, Result<(), SortError>> {
    async move {
        if len <= 1 {
            return Ok(());
        }
        let mid = len / 2;
        merge_range(ctx, start, mid).await?;
        merge_range(ctx, start + mid, len - mid).await?;
        merge_runs(ctx, start, mid, len).await
    }
    .boxed_local()
}

/// Merge the sorted runs `[start, start + mid)` and `[start + mid, start + len)`.
///
/// Ties take the left head. Every placement flashes the element at its
/// current position; the merged run is written back once all are placed.
async fn merge_runs(ctx: &SortRun, start: usize, mid: usize, len: usize) -> Result<(), SortError> {
    ctx.ensure_current()?;
    let left = ctx.sequence.slice(start, start + mid);
    let right = ctx.sequence.slice(start + mid, start + len);

    let mut merged = Vec::with_capacity(len);
    let (mut l, mut r) = (0, 0);

    while l < left.len() || r < right.len() {
        let take_left = if r == right.len() {
            true
        } else if l == left.len() {
            false
        } else {
            ctx.bump(|s| s.comparisons += 1);
            left[l].value <= right[r].value
        };

        let (entry, position) = if take_left {
            l += 1;
            (left[l - 1], start + l - 1)
        } else {
            r += 1;
            (right[r - 1], start + mid + r - 1)
        };

        ctx.highlight(position, true)?;
        ctx.pause(MERGE_DELAY_DIVISOR).await?;
        ctx.highlight(position, false)?;
        ctx.tone(entry.value);

        merged.push(entry);
    }

    ctx.write_run(start, &merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::future;
    use std::cell::RefCell;

    /// Records every requested delay.
    #[derive(Default)]
    struct RecordingClock {
        requested: RefCell<Vec<u32>>,
    }

    impl StepClock for RecordingClock {
        fn delay(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
            self.requested.borrow_mut().push(ms);
            future::ready(()).boxed_local()
        }
    }

    #[derive(Default)]
    struct RecordingTone {
        frequencies: RefCell<Vec<f32>>,
    }

    impl ToneEmitter for RecordingTone {
        fn emit(&self, frequency: f32) {
            self.frequencies.borrow_mut().push(frequency);
        }
    }

    fn run_with(
        algorithm: Algorithm,
        values: &[u32],
        clock: Rc<RecordingClock>,
        config: RunConfig,
    ) -> (ValueSequence, RunReport) {
        let sequence = ValueSequence::from_values(values);
        let ctx = SortRun::new(
            sequence.clone(),
            clock,
            config,
            Rc::new(SilentTone),
            Generation::new().guard(),
        );
        let report = block_on(run(algorithm, &ctx)).expect("run succeeds");
        (sequence, report)
    }

    #[test]
    fn parses_algorithm_names() {
        assert_eq!("bubble".parse::<Algorithm>().unwrap(), Algorithm::Bubble);
        assert_eq!("Merge Sort".parse::<Algorithm>().unwrap(), Algorithm::Merge);
        assert_eq!("insertionSort".parse::<Algorithm>().unwrap(), Algorithm::Insertion);
        assert_eq!(" SELECTION ".parse::<Algorithm>().unwrap(), Algorithm::Selection);
        assert!(matches!(
            "quick".parse::<Algorithm>(),
            Err(SortError::UnknownAlgorithm(name)) if name == "quick"
        ));
    }

    #[test]
    fn labels_round_trip_through_parse() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn swap_is_observable_mid_delay() {
        let sequence = ValueSequence::from_values(&[5, 3]);
        let observed = Rc::new(RefCell::new(Vec::new()));

        struct PeekClock {
            sequence: ValueSequence,
            observed: Rc<RefCell<Vec<Vec<u32>>>>,
        }
        impl StepClock for PeekClock {
            fn delay(&self, _ms: u32) -> LocalBoxFuture<'static, ()> {
                self.observed.borrow_mut().push(self.sequence.values());
                future::ready(()).boxed_local()
            }
        }

        let ctx = SortRun::new(
            sequence.clone(),
            Rc::new(PeekClock {
                sequence: sequence.clone(),
                observed: observed.clone(),
            }),
            RunConfig::with_delay(1),
            Rc::new(SilentTone),
            Generation::new().guard(),
        );
        block_on(run(Algorithm::Bubble, &ctx)).unwrap();

        // Held value not yet written back while suspended
        assert_eq!(*observed.borrow(), vec![vec![3, 3]]);
        assert_eq!(sequence.values(), vec![3, 5]);
    }

    #[test]
    fn bubble_delays_track_swaps() {
        let clock = Rc::new(RecordingClock::default());
        let (_, report) = run_with(
            Algorithm::Bubble,
            &[4, 3, 2, 1],
            clock.clone(),
            RunConfig::with_delay(7),
        );
        assert_eq!(report.stats.swaps, 6);
        assert_eq!(report.stats.delays, 6);
        assert_eq!(*clock.requested.borrow(), vec![7; 6]);
    }

    #[test]
    fn selection_places_each_position_once() {
        for values in [vec![1, 2, 3, 4, 5], vec![5, 4, 3, 2, 1], vec![2, 2, 1, 9, 0]] {
            let clock = Rc::new(RecordingClock::default());
            let (seq, report) =
                run_with(Algorithm::Selection, &values, clock, RunConfig::with_delay(3));
            assert_eq!(report.stats.delays, values.len() - 1);
            assert!(seq.is_sorted());
        }
    }

    #[test]
    fn selection_on_sorted_input_swaps_nothing() {
        let clock = Rc::new(RecordingClock::default());
        let (_, report) = run_with(
            Algorithm::Selection,
            &[1, 2, 2, 7],
            clock,
            RunConfig::with_delay(0),
        );
        assert_eq!(report.stats.swaps, 0);
        assert_eq!(report.stats.delays, 3);
    }

    #[test]
    fn insertion_swaps_once_per_inversion() {
        let clock = Rc::new(RecordingClock::default());
        let (seq, report) = run_with(
            Algorithm::Insertion,
            &[3, 1, 2],
            clock,
            RunConfig::with_delay(0),
        );
        assert_eq!(seq.values(), vec![1, 2, 3]);
        assert_eq!(report.stats.swaps, 2);
        assert_eq!(report.stats.delays, 2);
    }

    #[test]
    fn merge_pauses_for_a_tenth_of_the_delay() {
        let clock = Rc::new(RecordingClock::default());
        let (seq, report) = run_with(
            Algorithm::Merge,
            &[4, 1, 3, 2],
            clock.clone(),
            RunConfig::with_delay(50),
        );
        assert_eq!(seq.values(), vec![1, 2, 3, 4]);
        // 2 + 2 placements for the pairs, 4 for the final merge
        assert_eq!(report.stats.delays, 8);
        assert_eq!(report.stats.swaps, 0);
        assert!(clock.requested.borrow().iter().all(|&ms| ms == 5));
    }

    #[test]
    fn speed_change_applies_from_next_delay() {
        let config = RunConfig::with_delay(20);
        let ui = config.clone();
        let requested = Rc::new(RefCell::new(Vec::new()));

        struct SliderClock {
            ui: RunConfig,
            requested: Rc<RefCell<Vec<u32>>>,
        }
        impl StepClock for SliderClock {
            fn delay(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
                self.requested.borrow_mut().push(ms);
                // User drags the slider to full speed during the first pause
                self.ui.set_speed(self.ui.max_speed());
                future::ready(()).boxed_local()
            }
        }

        let ctx = SortRun::new(
            ValueSequence::from_values(&[3, 2, 1]),
            Rc::new(SliderClock {
                ui,
                requested: requested.clone(),
            }),
            config,
            Rc::new(SilentTone),
            Generation::new().guard(),
        );
        block_on(run(Algorithm::Insertion, &ctx)).unwrap();
        assert_eq!(*requested.borrow(), vec![20, 0, 0]);
    }

    #[test]
    fn negative_delay_fails_fast() {
        let sequence = ValueSequence::from_values(&[2, 1]);
        let ctx = SortRun::new(
            sequence.clone(),
            Rc::new(RecordingClock::default()),
            RunConfig::new(1_050, 1_000, true),
            Rc::new(SilentTone),
            Generation::new().guard(),
        );
        let err = block_on(run(Algorithm::Bubble, &ctx)).unwrap_err();
        assert_eq!(err, SortError::NegativeDelay(-50));
    }

    #[test]
    fn rejected_delay_leaves_values_intact() {
        for algorithm in Algorithm::ALL {
            let sequence = ValueSequence::from_values(&[7, 2, 9, 4]);
            let ctx = SortRun::new(
                sequence.clone(),
                Rc::new(RecordingClock::default()),
                RunConfig::new(1_050, 1_000, true),
                Rc::new(SilentTone),
                Generation::new().guard(),
            );
            let err = block_on(run(algorithm, &ctx)).unwrap_err();
            assert_eq!(err, SortError::NegativeDelay(-50), "{}", algorithm);

            let mut values = sequence.values();
            values.sort_unstable();
            assert_eq!(values, vec![2, 4, 7, 9], "{} lost a value", algorithm);
            assert!(!sequence.any_highlighted(), "{} left a highlight", algorithm);
        }
    }

    #[test]
    fn muted_runs_only_send_the_finish_sentinel() {
        let tone = Rc::new(RecordingTone::default());
        let ctx = SortRun::new(
            ValueSequence::from_values(&[3, 1, 2]),
            Rc::new(RecordingClock::default()),
            RunConfig::with_delay(0),
            tone.clone(),
            Generation::new().guard(),
        );
        block_on(run(Algorithm::Bubble, &ctx)).unwrap();
        assert_eq!(*tone.frequencies.borrow(), vec![0.0]);
    }

    #[test]
    fn audible_runs_play_values_then_silence() {
        let tone = Rc::new(RecordingTone::default());
        let config = RunConfig::with_delay(0);
        config.set_muted(false);
        let ctx = SortRun::new(
            ValueSequence::from_values(&[220, 110]),
            Rc::new(RecordingClock::default()),
            config,
            tone.clone(),
            Generation::new().guard(),
        );
        block_on(run(Algorithm::Bubble, &ctx)).unwrap();
        // Pass one swaps then sounds position 0, pass two only sounds it
        assert_eq!(*tone.frequencies.borrow(), vec![110.0, 110.0, 0.0]);
    }

    #[test]
    fn superseded_run_stops_writing() {
        let generation = Generation::new();
        let guard = generation.advance();
        let sequence = ValueSequence::from_values(&[9, 8, 7, 6]);
        let frozen = Rc::new(RefCell::new(None));

        struct SupersedingClock {
            generation: Generation,
            sequence: ValueSequence,
            frozen: Rc<RefCell<Option<Vec<Entry>>>>,
        }
        impl StepClock for SupersedingClock {
            fn delay(&self, _ms: u32) -> LocalBoxFuture<'static, ()> {
                if self.frozen.borrow().is_none() {
                    self.generation.advance();
                    *self.frozen.borrow_mut() = Some(self.sequence.snapshot());
                }
                future::ready(()).boxed_local()
            }
        }

        let ctx = SortRun::new(
            sequence.clone(),
            Rc::new(SupersedingClock {
                generation,
                sequence: sequence.clone(),
                frozen: frozen.clone(),
            }),
            RunConfig::with_delay(10),
            Rc::new(SilentTone),
            guard,
        );
        let report = block_on(run(Algorithm::Selection, &ctx)).unwrap();

        assert_eq!(report.outcome, Outcome::Superseded);
        assert_eq!(report.stats.delays, 1);
        assert_eq!(Some(sequence.snapshot()), *frozen.borrow());
    }
}
