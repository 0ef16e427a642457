//! Sample generators.
//!
//! Each render block gets its own sampler from [`Sampler::copy`], so nothing
//! on the per-ray path is shared between threads.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use umbra_core::SamplerConfig;

/// Source of uniform samples in `[0, 1)`.
pub trait Sampler: Send + Sync {
    fn sample(&mut self) -> f32;

    fn sample_2d(&mut self) -> Vec2 {
        let x = self.sample();
        let y = self.sample();
        Vec2::new(x, y)
    }

    fn samples_per_pixel(&self) -> u32;

    fn is_random(&self) -> bool;

    /// An independent sampler for `stream`. The same stream index always
    /// yields the same sequence.
    fn copy(&self, stream: u64) -> Box<dyn Sampler>;
}

/// Always returns `½`: one sample per pixel through pixel centres.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicSampler;

impl Sampler for DeterministicSampler {
    #[inline]
    fn sample(&mut self) -> f32 {
        0.5
    }

    fn samples_per_pixel(&self) -> u32 {
        1
    }

    fn is_random(&self) -> bool {
        false
    }

    fn copy(&self, _stream: u64) -> Box<dyn Sampler> {
        Box::new(*self)
    }
}

/// Seeded pseudo-random sampler.
#[derive(Debug, Clone)]
pub struct RandomSampler {
    rng: StdRng,
    seed: u64,
    samples_per_pixel: u32,
}

impl RandomSampler {
    pub fn new(samples_per_pixel: u32, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            samples_per_pixel: samples_per_pixel.max(1),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Sampler for RandomSampler {
    #[inline]
    fn sample(&mut self) -> f32 {
        self.rng.gen()
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    fn is_random(&self) -> bool {
        true
    }

    fn copy(&self, stream: u64) -> Box<dyn Sampler> {
        Box::new(RandomSampler::new(
            self.samples_per_pixel,
            split_seed(self.seed, stream),
        ))
    }
}

/// SplitMix64 finaliser over the parent seed and the stream index.
fn split_seed(seed: u64, stream: u64) -> u64 {
    let mut z = seed ^ stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Build the sampler a configuration describes.
pub fn make_sampler(config: &SamplerConfig) -> Box<dyn Sampler> {
    match *config {
        SamplerConfig::Deterministic => Box::new(DeterministicSampler),
        SamplerConfig::Random {
            samples_per_pixel,
            seed,
        } => Box::new(RandomSampler::new(samples_per_pixel, seed)),
    }
}
