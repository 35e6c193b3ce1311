//! Uniform random sources.
//!
//! The generator never touches a global RNG. Callers hand it a
//! `UniformSource`: production code uses the unseeded `RngSource::thread()`,
//! reproducible runs derive one source per month from a `SeedHierarchy`, and
//! tests replay fixed draws with `ScriptedSource`.

use crate::calendar::MonthKey;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// A source of uniform floats in `[0, 1)`.
pub trait UniformSource {
    fn next_unit(&mut self) -> f64;

    /// `base + U * span`.
    fn uniform(&mut self, base: f64, span: f64) -> f64 {
        base + self.next_unit() * span
    }

    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    fn index(&mut self, len: usize) -> usize {
        let idx = (self.next_unit() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Adapter from any `rand::Rng`.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<ThreadRng> {
    /// Unseeded source; results differ on every run.
    pub fn thread() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> UniformSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Deterministic per-month seeds.
///
/// The master seed is expanded into one sub-seed per `MonthKey` with BLAKE3,
/// so a month's draws do not depend on which other months were generated
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedHierarchy {
    master_seed: u64,
}

impl SeedHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn sub_seed(&self, key: MonthKey) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(&key.year().to_le_bytes());
        hasher.update(&key.month().to_le_bytes());
        let hash = hasher.finalize();
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(prefix)
    }

    pub fn source_for(&self, key: MonthKey) -> RngSource<StdRng> {
        RngSource::seeded(self.sub_seed(key))
    }
}

/// Replays a fixed list of unit values, cycling when exhausted.
///
/// Values are returned as given; an empty script yields `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl UniformSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
