//! Deterministic draw source.
//!
//! The algorithm is pinned because reproducibility is part of the API:
//!
//! - keystream: ChaCha with 8 rounds (`rand_chacha::ChaCha8Rng`), keyed with
//!   `SeedableRng::seed_from_u64` on the seed's two's-complement bits;
//! - `next_int_below(bound)`: one 64-bit word `w`, result `(w * bound) >> 64`
//!   in 128-bit arithmetic;
//! - `next_float01()`: one 64-bit word, `(w >> 11) * 2^-53`;
//! - `next_bytes(n)`: the next `n` keystream bytes.
//!
//! Integer and float draws consume exactly one word each, so the stream
//! position after a draw sequence never depends on the values drawn.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

const FLOAT_SCALE: f64 = 1.0 / (1_u64 << 53) as f64;

/// Seeded pseudo-random stream shared by every record of one batch.
#[derive(Debug, Clone)]
pub struct SeededValueStream {
    rng: ChaCha8Rng,
    draws: u64,
}

impl SeededValueStream {
    pub fn new(seed: i64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed as u64),
            draws: 0,
        }
    }

    /// Uniform integer in `[0, bound)`. A zero bound yields zero but still
    /// consumes a draw.
    pub fn next_int_below(&mut self, bound: u64) -> u64 {
        let word = self.next_word();
        ((u128::from(word) * u128::from(bound)) >> 64) as u64
    }

    /// [`next_int_below`](Self::next_int_below) for slice indexing.
    pub fn next_index(&mut self, len: usize) -> usize {
        self.next_int_below(len as u64) as usize
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_float01(&mut self) -> f64 {
        (self.next_word() >> 11) as f64 * FLOAT_SCALE
    }

    pub fn next_bytes(&mut self, len: usize) -> Vec<u8> {
        let mut bytes = vec![0_u8; len];
        self.fill_bytes(&mut bytes);
        bytes
    }

    pub fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws += 1;
        self.rng.fill_bytes(dest);
    }

    /// Pick one element of a non-empty table.
    pub fn pick<'a, T>(&mut self, table: &'a [T]) -> Option<&'a T> {
        let index = self.next_index(table.len());
        table.get(index)
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    fn next_word(&mut self) -> u64 {
        self.draws += 1;
        self.rng.next_u64()
    }
}
