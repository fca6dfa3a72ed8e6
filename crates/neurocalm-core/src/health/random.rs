//! Pseudo-random sources for the simulation.
//!
//! Every draw the simulation makes goes through [`RandomSource`], so a
//! session can run on thread randomness, on a reproducible seed, or on a
//! scripted sequence in tests.

use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;

    /// Uniform integer in `[0, n)`.
    fn next_below(&mut self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        ((self.next_unit() * n as f64).floor() as u64).min(n - 1)
    }
}

/// Thread-local OS-seeded randomness.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Seed for reproducible sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationSeed(pub u64);

impl Default for SimulationSeed {
    fn default() -> Self {
        Self(42)
    }
}

/// PCG-backed reproducible randomness.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: Mcg128Xsl64,
}

impl SeededRandom {
    pub fn new(seed: SimulationSeed) -> Self {
        Self {
            rng: Mcg128Xsl64::seed_from_u64(seed.0),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted.
///
/// Values are clamped into `[0, 1)`.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    pos: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            pos: 0,
        }
    }

    /// Every draw returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Box a source chosen at runtime.
pub fn source_for(seed: Option<SimulationSeed>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    }
}
