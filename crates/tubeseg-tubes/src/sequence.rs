//! Monotonic id sequences

/// An unbounded, monotonically increasing id generator.
///
/// Values are never reclaimed. Each sequence is independent; two sequences
/// built with the same start yield the same values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    next: u64,
    step: u64,
}

impl Sequence {
    pub fn new(start: u64, step: u64) -> Self {
        debug_assert!(step > 0, "sequence step must be positive");
        Self { next: start, step }
    }

    /// Take the next id.
    pub fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += self.step;
        id
    }

    /// The id the next call to [`allocate`](Self::allocate) will return.
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

impl Iterator for Sequence {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.allocate())
    }
}
