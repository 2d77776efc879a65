//! Decorative particle bursts
//!
//! Sparks on wall/paddle impacts, explosions on destroyed blocks. Particles
//! never feed back into gameplay. The collection is owned by the session and
//! driven by a seeded RNG so runs replay identically.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::theme::{Rgb, SPARK_COLOR};

/// Tolerance for `f32` rounding in the `lifetime <= 0` expiry check, so step
/// sizes that sum to the full lifetime always evict
const EXPIRY_EPSILON: f32 = 1e-5;

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgb,
    /// Seconds left
    pub lifetime: f32,
    pub max_lifetime: f32,
    /// Radius in pixels at full life
    pub size: u8,
}

impl Particle {
    /// Remaining life in [0, 1], used for fading
    pub fn life_fraction(&self) -> f32 {
        if self.max_lifetime <= 0.0 {
            0.0
        } else {
            (self.lifetime / self.max_lifetime).clamp(0.0, 1.0)
        }
    }

    /// Advance physics. Returns false once lifetime reaches zero (within
    /// `EXPIRY_EPSILON`).
    fn tick(&mut self, dt: f32) -> bool {
        self.pos += self.vel * dt;
        self.vel.y += PARTICLE_GRAVITY * dt;
        self.lifetime -= dt;
        self.lifetime > EXPIRY_EPSILON
    }
}

/// Burst parameters
struct Burst {
    count: usize,
    speed: (f32, f32),
    lifetime: (f32, f32),
}

const SPARK: Burst = Burst {
    count: SPARK_COUNT,
    speed: SPARK_SPEED,
    lifetime: SPARK_LIFETIME,
};

const EXPLOSION: Burst = Burst {
    count: EXPLOSION_COUNT,
    speed: EXPLOSION_SPEED,
    lifetime: EXPLOSION_LIFETIME,
};

/// Active particles plus the RNG that seeds new ones
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: Pcg32,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Small white burst at an impact point
    pub fn spawn_spark(&mut self, pos: Vec2) {
        self.burst(pos, SPARK_COLOR, &SPARK);
    }

    /// Large burst in a block's color
    pub fn spawn_explosion(&mut self, pos: Vec2, color: Rgb) {
        self.burst(pos, color, &EXPLOSION);
    }

    fn burst(&mut self, pos: Vec2, color: Rgb, burst: &Burst) {
        self.particles.reserve(burst.count);
        for _ in 0..burst.count {
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.random_range(burst.speed.0..=burst.speed.1);
            let lifetime = self.rng.random_range(burst.lifetime.0..=burst.lifetime.1);
            let size = self.rng.random_range(PARTICLE_SIZE.0..=PARTICLE_SIZE.1);
            self.particles.push(Particle {
                pos,
                vel: Vec2::from_angle(angle) * speed,
                color,
                lifetime,
                max_lifetime: lifetime,
                size,
            });
        }
    }

    /// Integrate, apply gravity, age, and drop expired particles
    pub fn advance(&mut self, dt: f32) {
        self.particles.retain_mut(|p| p.tick(dt));
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
