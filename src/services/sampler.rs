use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Distribution;

/// Standard normal draws through the Box–Muller transform.
///
/// Only the cosine branch is used; the paired sine value is discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxMuller;

impl Distribution<f64> for BoxMuller {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u = nonzero_unit(rng);
        let v = nonzero_unit(rng);
        (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
    }
}

fn nonzero_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let value: f64 = rng.r#gen();
        if value != 0.0 {
            return value;
        }
    }
}

/// Draws from the distributions used by the lessons.
///
/// Implementors only provide the two primitive draws; everything else is
/// derived from them, so a single source feeds every draw.
pub trait Sampler {
    /// One draw from N(0, 1).
    fn standard_normal(&mut self) -> f64;

    /// One draw from [0, 1).
    fn unit_uniform(&mut self) -> f64;

    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        mean + std_dev * self.standard_normal()
    }

    fn sample_normal(&mut self, n: usize, mean: f64, std_dev: f64) -> Vec<f64> {
        (0..n).map(|_| self.normal(mean, std_dev)).collect()
    }

    /// A pair whose correlation tends to `rho` over many draws, built from
    /// the 2x2 Cholesky factor of the target covariance matrix. `rho` must
    /// lie in [-1, 1]; outside that range `y` is NaN.
    fn correlated_normal_pair(
        &mut self,
        mean1: f64,
        std1: f64,
        mean2: f64,
        std2: f64,
        rho: f64,
    ) -> (f64, f64) {
        let z1 = self.standard_normal();
        let z2 = self.standard_normal();
        let x = mean1 + std1 * z1;
        let y = mean2 + std2 * (rho * z1 + (1.0 - rho * rho).sqrt() * z2);
        (x, y)
    }

    fn sample_correlated_normals(
        &mut self,
        n: usize,
        mean1: f64,
        std1: f64,
        mean2: f64,
        std2: f64,
        rho: f64,
    ) -> (Vec<f64>, Vec<f64>) {
        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(n);
        for _ in 0..n {
            let (x, y) = self.correlated_normal_pair(mean1, std1, mean2, std2, rho);
            xs.push(x);
            ys.push(y);
        }
        (xs, ys)
    }

    /// 1.0 with probability `p`, else 0.0.
    fn bernoulli(&mut self, p: f64) -> f64 {
        if self.unit_uniform() < p { 1.0 } else { 0.0 }
    }

    fn sample_bernoulli(&mut self, n: usize, p: f64) -> Vec<f64> {
        (0..n).map(|_| self.bernoulli(p)).collect()
    }

    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + self.unit_uniform() * (max - min)
    }
}

/// [`Sampler`] over any `rand` generator.
pub struct RngSampler<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSampler<StdRng> {
    /// Reproducible sampler: equal seeds give equal draws.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> Sampler for RngSampler<R> {
    fn standard_normal(&mut self) -> f64 {
        BoxMuller.sample(&mut self.rng)
    }

    fn unit_uniform(&mut self) -> f64 {
        self.rng.r#gen()
    }
}
