//! Fair-coin sources for the early row-close decision.
//!
//! The partitioner only asks for a flip when a row sits inside the height
//! band, so tests can script the exact sequence of outcomes.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait CoinFlip {
    /// Returns `true` to close the row early.
    fn flip(&mut self) -> bool;
}

impl<C: CoinFlip + ?Sized> CoinFlip for &mut C {
    fn flip(&mut self) -> bool {
        (**self).flip()
    }
}

/// Fair coin backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomCoin<R> {
    rng: R,
}

impl<R: Rng> RandomCoin<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomCoin<StdRng> {
    /// Reproducible coin for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> CoinFlip for RandomCoin<R> {
    fn flip(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }
}

/// Always lands the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCoin(pub bool);

impl CoinFlip for FixedCoin {
    fn flip(&mut self) -> bool {
        self.0
    }
}

/// Replays a fixed list of outcomes, then keeps returning `fallback`.
#[derive(Debug, Clone)]
pub struct ScriptedCoin {
    outcomes: VecDeque<bool>,
    fallback: bool,
    flips: usize,
}

impl ScriptedCoin {
    pub fn new(outcomes: impl IntoIterator<Item = bool>, fallback: bool) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
            fallback,
            flips: 0,
        }
    }

    /// How many times the coin has been flipped.
    pub fn flips(&self) -> usize {
        self.flips
    }
}

impl CoinFlip for ScriptedCoin {
    fn flip(&mut self) -> bool {
        self.flips += 1;
        self.outcomes.pop_front().unwrap_or(self.fallback)
    }
}
