//! Weighted-probability model for fairness-biased draws.
//!
//! The crate exposes:
//! - [`normalize`]: weights to probabilities over one pool.
//! - [`pick`]: cumulative-distribution draw against a uniform sample.
//! - [`adjust`]: post-draw weight update under an [`AdjustPolicy`].
//! - [`SampleSource`]: seedable uniform sample generator.
//!
//! Everything here is pure computation; callers own the entity state and the
//! iteration order. Probabilities preserve the input order so a draw is
//! reproducible given the same sample.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use thiserror::Error;

/// Multiplier applied to the winning entry's weight after a draw.
pub const WINNER_REDUCTION_FACTOR: f64 = 0.5;
/// Multiplier applied to every losing entry's weight after a draw.
pub const OTHERS_BOOST_FACTOR: f64 = 1.1;
/// Floor keeping every entry drawable.
pub const MIN_WEIGHT: f64 = 0.1;
/// Ceiling keeping any entry from dominating the pool.
pub const MAX_WEIGHT: f64 = 3.0;

pub type Result<T> = std::result::Result<T, DrawError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DrawError {
    #[error("draw requires at least one weighted entry")]
    EmptyPool,
    #[error("weight at index {index} must be positive and finite, got {weight}")]
    InvalidWeight { index: usize, weight: f64 },
    #[error("sample must lie in [0, 1), got {sample}")]
    SampleOutOfRange { sample: f64 },
}

/// Geometric decay/boost bounded on both ends.
#[derive(Debug, Clone, Copy)]
pub struct AdjustPolicy {
    pub winner_factor: f64,
    pub others_factor: f64,
    pub min_weight: f64,
    pub max_weight: f64,
}

impl Default for AdjustPolicy {
    fn default() -> Self {
        Self {
            winner_factor: WINNER_REDUCTION_FACTOR,
            others_factor: OTHERS_BOOST_FACTOR,
            min_weight: MIN_WEIGHT,
            max_weight: MAX_WEIGHT,
        }
    }
}

/// Maps each entry's weight to its share of the pool's total weight.
///
/// Input order is preserved; the returned probabilities sum to 1.0 up to
/// floating-point tolerance.
pub fn normalize<K: Copy>(weights: &[(K, f64)]) -> Result<Vec<(K, f64)>> {
    validate_weights(weights)?;

    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    Ok(weights
        .iter()
        .map(|&(key, weight)| (key, weight / total))
        .collect())
}

/// Walks the pool in slice order accumulating probability mass and returns
/// the first entry whose cumulative mass reaches `sample`.
///
/// Rounding can leave the final cumulative mass just under 1.0; the last
/// entry wins in that case rather than the walk falling through.
pub fn pick<K: Copy>(probabilities: &[(K, f64)], sample: f64) -> Result<K> {
    let (last, _) = probabilities.last().ok_or(DrawError::EmptyPool)?;
    if !(0.0..1.0).contains(&sample) {
        return Err(DrawError::SampleOutOfRange { sample });
    }

    let mut cumulative = 0.0;
    for &(key, probability) in probabilities {
        cumulative += probability;
        if sample <= cumulative {
            return Ok(key);
        }
    }
    Ok(*last)
}

/// Applies the post-draw adjustment: the winner's weight shrinks by
/// `winner_factor` down to the floor, every other weight grows by
/// `others_factor` up to the ceiling.
pub fn adjust<K: Copy + PartialEq>(
    weights: &[(K, f64)],
    winner: K,
    policy: &AdjustPolicy,
) -> Vec<(K, f64)> {
    weights
        .iter()
        .map(|&(key, weight)| {
            let updated = if key == winner {
                (weight * policy.winner_factor).max(policy.min_weight)
            } else {
                (weight * policy.others_factor).min(policy.max_weight)
            };
            (key, updated)
        })
        .collect()
}

fn validate_weights<K>(weights: &[(K, f64)]) -> Result<()> {
    if weights.is_empty() {
        return Err(DrawError::EmptyPool);
    }
    for (index, (_, weight)) in weights.iter().enumerate() {
        if !weight.is_finite() || *weight <= 0.0 {
            return Err(DrawError::InvalidWeight {
                index,
                weight: *weight,
            });
        }
    }
    Ok(())
}

/// Uniform `[0, 1)` samples from a seedable generator. A fixed seed
/// reproduces the full draw sequence.
pub struct SampleSource {
    rng: Pcg64,
    uniform: Uniform<f64>,
}

impl SampleSource {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed.max(1)),
            uniform: Uniform::new(0.0, 1.0),
        }
    }

    /// Seeds from the system clock. The mix step keeps a zero nanosecond
    /// reading from producing a degenerate seed.
    pub fn from_clock() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let mut seed = now.as_nanos() as u64;
        if seed == 0 {
            seed = 0x853c_49e6_748f_ea9b;
        }
        Self::seeded(seed)
    }

    pub fn next_sample(&mut self) -> f64 {
        self.uniform.sample(&mut self.rng)
    }
}
