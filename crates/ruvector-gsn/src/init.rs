//! Weight initialization.
//!
//! Initialization is a seam: the parameter store asks a [`WeightInitializer`]
//! for each weight matrix and never decides the distribution itself. Biases
//! are always zero.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

/// Produces initial weight matrices of shape `[fan_in, fan_out]`.
pub trait WeightInitializer {
    /// Create a weight matrix for a layer mapping `fan_in` features to `fan_out`.
    fn init(&mut self, fan_in: usize, fan_out: usize) -> Array2<f32>;
}

/// Glorot bound: samples come from U(-a, a) with a = sqrt(6 / (fan_in + fan_out)).
#[inline]
pub fn glorot_limit(fan_in: usize, fan_out: usize) -> f32 {
    (6.0 / (fan_in + fan_out) as f32).sqrt()
}

fn glorot_sample<R: Rng + ?Sized>(rng: &mut R, fan_in: usize, fan_out: usize) -> Array2<f32> {
    let limit = glorot_limit(fan_in, fan_out);
    let uniform = Uniform::new_inclusive(-limit, limit);
    Array2::from_shape_fn((fan_in, fan_out), |_| uniform.sample(&mut *rng))
}

/// Xavier/Glorot uniform initialization from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct Glorot;

impl WeightInitializer for Glorot {
    fn init(&mut self, fan_in: usize, fan_out: usize) -> Array2<f32> {
        let mut rng = rand::thread_rng();
        glorot_sample(&mut rng, fan_in, fan_out)
    }
}

/// Glorot uniform initialization from a seeded RNG, for reproducible parameters
#[derive(Debug, Clone)]
pub struct SeededGlorot {
    rng: StdRng,
}

impl SeededGlorot {
    /// Create a seeded initializer
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl WeightInitializer for SeededGlorot {
    fn init(&mut self, fan_in: usize, fan_out: usize) -> Array2<f32> {
        glorot_sample(&mut self.rng, fan_in, fan_out)
    }
}
