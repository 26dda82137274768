//! The sequence of bars being sorted.
//!
//! A [`ValueSequence`] is a shared handle: clones point at the same entries,
//! which lets the running sort mutate it while the renderer reads snapshots.
//! Every mutation is synchronous and is followed by a notification to the
//! registered observers.

use log::{debug, warn};
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// One bar of the visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// Sort key, also the bar height and the tone frequency.
    pub value: u32,
    /// Marks the element currently compared or moved. Never affects ordering.
    pub highlighted: bool,
    /// Slot the value was seeded into. Moves together with `value`.
    pub origin: usize,
}

impl Entry {
    pub fn new(value: u32, origin: usize) -> Self {
        Self {
            value,
            highlighted: false,
            origin,
        }
    }
}

/// Render callback, invoked with the full entry list after every mutation.
///
/// Observers must not mutate the sequence they are attached to.
pub type Observer = Rc<dyn Fn(&[Entry])>;

struct SequenceInner {
    entries: RefCell<Vec<Entry>>,
    observers: RefCell<Vec<Observer>>,
}

#[derive(Clone)]
pub struct ValueSequence {
    inner: Rc<SequenceInner>,
}

impl ValueSequence {
    /// Seed `size` entries with values drawn uniformly from `[1, ceiling]`.
    ///
    /// A `ceiling` of zero is clamped to 1.
    pub fn create<R: Rng + ?Sized>(size: usize, ceiling: u32, rng: &mut R) -> Self {
        let ceiling = if ceiling < 1 {
            warn!("Sequence ceiling {} is below 1, clamping to 1", ceiling);
            1
        } else {
            ceiling
        };

        let dist = Uniform::new_inclusive(1, ceiling).expect("ceiling is clamped to at least 1");
        let entries = (0..size)
            .map(|origin| Entry::new(dist.sample(rng), origin))
            .collect::<Vec<_>>();

        debug!("Seeded sequence of {} values in [1, {}]", size, ceiling);
        Self::from_entries(entries)
    }

    /// Build a sequence from explicit values, unhighlighted, origins in order.
    pub fn from_values(values: &[u32]) -> Self {
        Self::from_entries(
            values
                .iter()
                .enumerate()
                .map(|(origin, &value)| Entry::new(value, origin))
                .collect(),
        )
    }

    fn from_entries(entries: Vec<Entry>) -> Self {
        Self {
            inner: Rc::new(SequenceInner {
                entries: RefCell::new(entries),
                observers: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Entry {
        self.inner.entries.borrow()[index]
    }

    pub fn value(&self, index: usize) -> u32 {
        self.inner.entries.borrow()[index].value
    }

    /// Copy of the current entries for rendering.
    pub fn snapshot(&self) -> Vec<Entry> {
        self.inner.entries.borrow().clone()
    }

    pub fn values(&self) -> Vec<u32> {
        self.inner.entries.borrow().iter().map(|e| e.value).collect()
    }

    /// Non-decreasing by value.
    pub fn is_sorted(&self) -> bool {
        self.inner
            .entries
            .borrow()
            .windows(2)
            .all(|pair| pair[0].value <= pair[1].value)
    }

    pub fn any_highlighted(&self) -> bool {
        self.inner.entries.borrow().iter().any(|e| e.highlighted)
    }

    pub fn set_highlight(&self, index: usize, on: bool) {
        self.inner.entries.borrow_mut()[index].highlighted = on;
        self.notify();
    }

    /// Turn every highlight off.
    pub fn clear_highlights(&self) {
        {
            let mut entries = self.inner.entries.borrow_mut();
            for entry in entries.iter_mut() {
                entry.highlighted = false;
            }
        }
        self.notify();
    }

    /// Overwrite the value payload (value and origin) at `index`, leaving its
    /// highlight untouched.
    pub fn set_payload(&self, index: usize, source: Entry) {
        {
            let mut entries = self.inner.entries.borrow_mut();
            entries[index].value = source.value;
            entries[index].origin = source.origin;
        }
        self.notify();
    }

    /// Write a merged run back starting at `start`, clearing highlights.
    pub fn write_run(&self, start: usize, run: &[Entry]) {
        {
            let mut entries = self.inner.entries.borrow_mut();
            for (offset, entry) in run.iter().enumerate() {
                entries[start + offset] = Entry {
                    highlighted: false,
                    ..*entry
                };
            }
        }
        self.notify();
    }

    /// Copy of `[start, end)`.
    pub fn slice(&self, start: usize, end: usize) -> Vec<Entry> {
        self.inner.entries.borrow()[start..end].to_vec()
    }

    /// Register a render observer. It is called after every mutation.
    pub fn subscribe(&self, observer: Observer) {
        self.inner.observers.borrow_mut().push(observer);
    }

    /// Whether two handles point at the same underlying sequence.
    pub fn same_as(&self, other: &ValueSequence) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn notify(&self) {
        let observers = self.inner.observers.borrow().clone();
        if observers.is_empty() {
            return;
        }
        let entries = self.inner.entries.borrow();
        for observer in observers.iter() {
            observer(&entries);
        }
    }
}

impl PartialEq for ValueSequence {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl fmt::Debug for ValueSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.entries.borrow().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::Cell;

    #[test]
    fn create_draws_values_within_ceiling() {
        let mut rng = StdRng::seed_from_u64(7);
        let seq = ValueSequence::create(200, 40, &mut rng);
        assert_eq!(seq.len(), 200);
        assert!(seq.values().iter().all(|&v| (1..=40).contains(&v)));
        assert!(!seq.any_highlighted());
        assert!(seq
            .snapshot()
            .iter()
            .enumerate()
            .all(|(i, e)| e.origin == i));
    }

    #[test]
    fn zero_ceiling_is_clamped_to_one() {
        let mut rng = StdRng::seed_from_u64(1);
        let seq = ValueSequence::create(10, 0, &mut rng);
        assert_eq!(seq.values(), vec![1; 10]);
    }

    #[test]
    fn empty_sequence() {
        let mut rng = StdRng::seed_from_u64(1);
        let seq = ValueSequence::create(0, 100, &mut rng);
        assert!(seq.is_empty());
        assert!(seq.is_sorted());
    }

    #[test]
    fn same_seed_gives_same_values() {
        let a = ValueSequence::create(32, 500, &mut StdRng::seed_from_u64(99));
        let b = ValueSequence::create(32, 500, &mut StdRng::seed_from_u64(99));
        assert_eq!(a.values(), b.values());
        assert!(!a.same_as(&b));
    }

    #[test]
    fn set_payload_keeps_highlight() {
        let seq = ValueSequence::from_values(&[4, 9]);
        seq.set_highlight(0, true);
        seq.set_payload(0, seq.get(1));
        let first = seq.get(0);
        assert_eq!(first.value, 9);
        assert_eq!(first.origin, 1);
        assert!(first.highlighted);
    }

    #[test]
    fn write_run_clears_highlights() {
        let seq = ValueSequence::from_values(&[3, 1, 2]);
        seq.set_highlight(1, true);
        let mut run = seq.slice(1, 3);
        run.reverse();
        seq.write_run(1, &run);
        assert_eq!(seq.values(), vec![3, 2, 1]);
        assert!(!seq.any_highlighted());
    }

    #[test]
    fn observers_see_every_mutation() {
        let seq = ValueSequence::from_values(&[2, 1]);
        let calls = Rc::new(Cell::new(0));
        let last = Rc::new(RefCell::new(Vec::new()));
        {
            let calls = calls.clone();
            let last = last.clone();
            seq.subscribe(Rc::new(move |entries: &[Entry]| {
                calls.set(calls.get() + 1);
                *last.borrow_mut() = entries.to_vec();
            }));
        }

        seq.set_highlight(0, true);
        seq.set_payload(0, seq.get(1));
        seq.set_highlight(0, false);

        assert_eq!(calls.get(), 3);
        assert_eq!(*last.borrow(), seq.snapshot());
    }

    #[test]
    fn clear_highlights_resets_every_entry() {
        let seq = ValueSequence::from_values(&[1, 2, 3]);
        seq.set_highlight(0, true);
        seq.set_highlight(2, true);
        seq.clear_highlights();
        assert!(!seq.any_highlighted());
        assert_eq!(seq.values(), vec![1, 2, 3]);
    }

    #[test]
    fn clones_share_entries() {
        let seq = ValueSequence::from_values(&[1, 2, 3]);
        let handle = seq.clone();
        handle.set_highlight(2, true);
        assert!(seq.get(2).highlighted);
        assert_eq!(seq, handle);
    }
}
