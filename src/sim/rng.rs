//! Deterministic track RNG
//!
//! A 32-bit linear congruential generator. Every procedural decision in the
//! track generator draws from this, so a given seed and call sequence always
//! produces the same corridor.

use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_SEED;

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;
/// 2^-24: maps the top 24 bits of state onto [0, 1)
const UNIT_SCALE: f32 = 1.0 / 16_777_216.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRng {
    state: u32,
}

impl Default for TrackRng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl TrackRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance the recurrence and return the new state
    #[inline]
    pub fn step(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// Uniform float in [0, 1)
    #[inline]
    pub fn uniform01(&mut self) -> f32 {
        (self.step() >> 8) as f32 * UNIT_SCALE
    }

    /// Uniform integer in [min, max] inclusive
    pub fn uniform_int(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(max >= min);
        // Span of a full i32 range does not fit in i32
        let span = i64::from(max) - i64::from(min) + 1;
        let offset = (self.uniform01() * span as f32) as i64;
        (i64::from(min) + offset).min(i64::from(max)) as i32
    }
}

impl RngCore for TrackRng {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.step() as u64;
        let hi = self.step() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for TrackRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
