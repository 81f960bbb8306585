//! RNG module - 7-bag random piece generation
//!
//! Implements the "7-bag" randomizer: each bag holds one of each piece
//! (I, O, T, S, Z, J, L), shuffled. Draws consume the bag; an exhausted bag is
//! replaced by a fresh full permutation, never a partial one.
//!
//! The shuffle is driven by a small seeded LCG so a given seed always yields
//! the same infinite sequence.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
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

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod 2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// 7-bag piece supplier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bag {
    /// Current permutation
    bag: [PieceKind; 7],
    /// Index of the next draw; 7 means exhausted
    cursor: usize,
    /// RNG for shuffling
    rng: SimpleRng,
    seed: u32,
}

impl Bag {
    /// Create a new supplier with the given seed.
    ///
    /// The first permutation is generated lazily by the first draw, so a
    /// fresh bag and an exhausted bag take the same path.
    pub fn new(seed: u32) -> Self {
        Self {
            bag: PieceKind::ALL,
            cursor: 7,
            rng: SimpleRng::new(seed),
            seed,
        }
    }

    /// Generate a new shuffled bag
    fn refill(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.cursor = 0;
    }

    /// Draw the next piece kind.
    pub fn next(&mut self) -> PieceKind {
        if self.cursor >= 7 {
            self.refill();
        }
        let piece = self.bag[self.cursor];
        self.cursor += 1;
        piece
    }

    /// Fill `out` with the kinds the next `out.len()` draws will return,
    /// without touching this supplier.
    ///
    /// The preview runs on a copy of the bag and RNG state, so any bag
    /// regeneration it simulates is exactly the one `next()` will perform.
    pub fn peek_into(&self, out: &mut [PieceKind]) {
        let mut preview = self.clone();
        for slot in out {
            *slot = preview.next();
        }
    }

    /// The next `n` kinds without consuming them.
    pub fn peek(&self, n: usize) -> Vec<PieceKind> {
        let mut out = vec![PieceKind::I; n];
        self.peek_into(&mut out);
        out
    }

    /// Draws left before the current permutation is exhausted.
    pub fn remaining_in_bag(&self) -> usize {
        7 - self.cursor
    }

    /// Seed this supplier was created with (for restarting with the same sequence).
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for Bag {
    fn default() -> Self {
        Self::new(1)
    }
}
