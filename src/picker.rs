//! Random index selection.
//!
//! Every random choice the engine makes (response variant, footer parts)
//! goes through [`IndexPicker`], so tests can pin the choices down.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Source of random indices.
pub trait IndexPicker {
    /// Returns an index in `0..bound`. `bound` is never zero.
    fn index(&mut self, bound: usize) -> usize;
}

/// [`IndexPicker`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngPicker<R> {
    rng: R,
}

impl<R: Rng> RngPicker<R> {
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngPicker<ThreadRng> {
    /// Picker over the thread-local generator.
    pub fn thread() -> Self {
        Self::new(rand::rng())
    }
}

impl RngPicker<StdRng> {
    /// Reproducible picker: the same seed yields the same sequence of picks.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> IndexPicker for RngPicker<R> {
    fn index(&mut self, bound: usize) -> usize {
        self.rng.random_range(0..bound)
    }
}

/// Picks one element of `items`, or `None` when it is empty.
pub fn pick<'a, T>(picker: &mut dyn IndexPicker, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    // Clamp so a misbehaving picker cannot index out of bounds.
    let idx = picker.index(items.len()).min(items.len() - 1);
    items.get(idx)
}

/// Picker that replays a fixed script of indices (wrapping modulo the bound).
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedPicker {
    script: Vec<usize>,
    pos: usize,
}

#[cfg(test)]
impl ScriptedPicker {
    pub fn new(script: Vec<usize>) -> Self {
        Self { script, pos: 0 }
    }

    /// Always picks the first element.
    pub fn first() -> Self {
        Self::new(vec![0])
    }
}

#[cfg(test)]
impl IndexPicker for ScriptedPicker {
    fn index(&mut self, bound: usize) -> usize {
        if self.script.is_empty() {
            return 0;
        }
        let value = self.script[self.pos % self.script.len()];
        self.pos += 1;
        value % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_empty_is_none() {
        let mut picker = ScriptedPicker::first();
        let items: [&str; 0] = [];
        assert!(pick(&mut picker, &items).is_none());
    }

    #[test]
    fn pick_follows_script() {
        let mut picker = ScriptedPicker::new(vec![2, 0, 1]);
        let items = ["a", "b", "c"];
        assert_eq!(pick(&mut picker, &items), Some(&"c"));
        assert_eq!(pick(&mut picker, &items), Some(&"a"));
        assert_eq!(pick(&mut picker, &items), Some(&"b"));
    }

    #[test]
    fn seeded_pickers_agree() {
        let mut a = RngPicker::seeded(42);
        let mut b = RngPicker::seeded(42);
        let left: Vec<usize> = (0..32).map(|_| a.index(7)).collect();
        let right: Vec<usize> = (0..32).map(|_| b.index(7)).collect();
        assert_eq!(left, right);
        assert!(left.iter().all(|&i| i < 7));
    }

    #[test]
    fn thread_picker_stays_in_bounds() {
        let mut picker = RngPicker::thread();
        for _ in 0..100 {
            assert!(picker.index(3) < 3);
        }
    }
}
