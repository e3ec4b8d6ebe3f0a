//! One-shot, pull-based lazy sequences.
//!
//! [`Seq`] is a single-producer sequence: each pull yields the next element
//! or `None` once exhausted. There is no restart and no buffering — every
//! combinator defers work until the output is pulled. The evaluator builds
//! its node streams exclusively out of these, so a caller that stops pulling
//! stops all upstream work.

use serde_json::{Map, Value};

/// A one-shot pull sequence of `T`.
///
/// Backed by a boxed closure; pulling is a plain synchronous call. `Seq`
/// implements [`Iterator`], so consumers can use `for` loops and `collect`,
/// but unlike most iterators a `Seq` is built once and consumed once.
pub struct Seq<'a, T>(Box<dyn FnMut() -> Option<T> + 'a>);

impl<'a, T: 'a> Seq<'a, T> {
    /// Wrap a pull closure.
    pub fn new(f: impl FnMut() -> Option<T> + 'a) -> Self {
        Seq(Box::new(f))
    }

    /// The sequence with no elements.
    #[must_use]
    pub fn empty() -> Self {
        Seq::new(|| None)
    }

    /// The sequence with exactly one element.
    #[must_use]
    pub fn singleton(value: T) -> Self {
        let mut slot = Some(value);
        Seq::new(move || slot.take())
    }

    /// A sequence over an owned vector, in order.
    #[must_use]
    pub fn from_vec(values: Vec<T>) -> Self {
        Seq::over(values.into_iter())
    }

    /// Adapt any iterator into a `Seq`.
    pub fn over(mut iter: impl Iterator<Item = T> + 'a) -> Self {
        Seq::new(move || iter.next())
    }

    /// The infinite sequence `seed, f(seed), f(f(seed)), …`.
    /// Callers bound it with [`Seq::take`].
    pub fn iterate(seed: T, mut f: impl FnMut(&T) -> T + 'a) -> Self
    where
        T: Clone,
    {
        let mut state = Some(seed);
        Seq::new(move || {
            let current = state.take()?;
            state = Some(f(&current));
            Some(current)
        })
    }

    /// Apply `f` to each element as it is pulled.
    pub fn map<U: 'a>(mut self, mut f: impl FnMut(T) -> U + 'a) -> Seq<'a, U> {
        Seq::new(move || self.pull().map(&mut f))
    }

    /// Keep only elements satisfying `predicate`.
    pub fn filter(mut self, mut predicate: impl FnMut(&T) -> bool + 'a) -> Self {
        Seq::new(move || loop {
            let value = self.pull()?;
            if predicate(&value) {
                return Some(value);
            }
        })
    }

    /// Concatenate two sequences. `other` is not pulled — not even once —
    /// until `self` is exhausted.
    pub fn chain(mut self, mut other: Seq<'a, T>) -> Self {
        let mut first = true;
        Seq::new(move || {
            if first {
                if let Some(value) = self.pull() {
                    return Some(value);
                }
                first = false;
            }
            other.pull()
        })
    }

    /// Map each element to a sequence and concatenate the results,
    /// pulling inner sequences one at a time in arrival order.
    pub fn flat_map<U: 'a>(self, f: impl FnMut(T) -> Seq<'a, U> + 'a) -> Seq<'a, U> {
        self.map(f).flatten()
    }

    /// Pair elements of two sequences; stops as soon as either does.
    pub fn zip<U: 'a>(mut self, mut other: Seq<'a, U>) -> Seq<'a, (T, U)> {
        Seq::new(move || {
            let left = self.pull()?;
            let right = other.pull()?;
            Some((left, right))
        })
    }

    /// Pair each element with its zero-based position: `zip` with the
    /// naturals.
    #[must_use]
    pub fn enumerate(self) -> Seq<'a, (usize, T)> {
        Seq::iterate(0usize, |n| n + 1).zip(self)
    }

    /// At most the first `n` elements.
    #[must_use]
    pub fn take(mut self, n: usize) -> Self {
        let mut remaining = n;
        Seq::new(move || {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            self.pull()
        })
    }

    /// Pull the next element, or `None` once exhausted.
    pub fn pull(&mut self) -> Option<T> {
        (self.0)()
    }

    /// Drain into a vector.
    #[must_use]
    pub fn to_vec(self) -> Vec<T> {
        self.collect()
    }
}

impl<'a, T: 'a> Seq<'a, Seq<'a, T>> {
    /// Flatten a sequence of sequences. The outer sequence is only pulled
    /// when the current inner sequence runs dry.
    #[must_use]
    pub fn flatten(mut self) -> Seq<'a, T> {
        let mut current: Option<Seq<'a, T>> = None;
        Seq::new(move || loop {
            if let Some(inner) = current.as_mut() {
                if let Some(value) = inner.pull() {
                    return Some(value);
                }
                current = None;
            }
            current = Some(self.pull()?);
        })
    }
}

impl<'a, T: 'a> Iterator for Seq<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.pull()
    }
}

/// A sequence over an object's entries in insertion order.
pub fn from_object(map: &Map<String, Value>) -> Seq<'_, (&String, &Value)> {
    Seq::over(map.iter())
}

/// Collect `(key, value)` pairs into an object. Duplicate keys are
/// overwritten by the latest pair.
#[must_use]
pub fn to_object(pairs: Seq<'_, (String, Value)>) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in pairs {
        map.insert(key, value);
    }
    map
}
