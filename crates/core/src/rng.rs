//! RNG module - injectable randomness for piece selection
//!
//! Piece selection is uniform over the seven kinds and goes through the
//! [`RandomSource`] trait so a session can be driven by:
//!
//! - [`SimpleRng`]: a small seeded LCG, the default source
//! - `rand` generators (`StdRng`, `ThreadRng`)
//! - [`KindSequence`]: a fixed, repeating list of kinds for deterministic tests

use rand::rngs::{StdRng, ThreadRng};
use rand::Rng;

use crate::types::PieceKind;

/// Source of uniform indices used to pick the next piece kind
pub trait RandomSource {
    /// Uniform index in `[0, bound)`. `bound` is never zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_index(&mut self, bound: usize) -> usize {
        (**self).next_index(bound)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn next_index(&mut self, bound: usize) -> usize {
        (**self).next_index(bound)
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Create an RNG seeded from the thread-local entropy source
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RandomSource for SimpleRng {
    fn next_index(&mut self, bound: usize) -> usize {
        self.next_range(bound as u32) as usize
    }
}

impl RandomSource for StdRng {
    fn next_index(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }
}

impl RandomSource for ThreadRng {
    fn next_index(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }
}

/// Repeating, fixed sequence of piece kinds
///
/// Each draw yields the catalog index of the next kind in the list, wrapping
/// around at the end. An empty list always yields the first kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindSequence {
    kinds: Vec<PieceKind>,
    pos: usize,
}

impl KindSequence {
    pub fn new(kinds: impl Into<Vec<PieceKind>>) -> Self {
        Self {
            kinds: kinds.into(),
            pos: 0,
        }
    }

    /// Same kind on every draw
    pub fn repeat(kind: PieceKind) -> Self {
        Self::new(vec![kind])
    }

    /// Number of draws made so far
    pub fn draws(&self) -> usize {
        self.pos
    }
}

impl RandomSource for KindSequence {
    fn next_index(&mut self, bound: usize) -> usize {
        let index = if self.kinds.is_empty() {
            0
        } else {
            self.kinds[self.pos % self.kinds.len()].index()
        };
        self.pos += 1;
        index % bound
    }
}
