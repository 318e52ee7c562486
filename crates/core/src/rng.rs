//! RNG module - uniform random piece generation
//!
//! Every draw is independent: each of the seven kinds has probability 1/7
//! regardless of history. Seeded so a session can be replayed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::PieceKind;

/// Seeded source of piece kinds
#[derive(Debug, Clone)]
pub struct PieceRng {
    seed: u64,
    rng: StdRng,
}

impl PieceRng {
    /// Create a generator with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed this generator was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw the next kind uniformly at random
    pub fn draw(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.random_range(0..PieceKind::COUNT)]
    }
}
