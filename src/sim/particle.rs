//! Decorative hit particles
//!
//! Particles never touch gameplay; they only need to look right. Each one
//! flies in a straight line, slows down and fades until it disappears.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Ball, Block, Color};
use crate::direction;
use crate::tuning::Tuning;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub size: Vec2,
    pub angle: f32,
    pub speed: f32,
    /// Speed lost per tick
    pub retardation: f32,
    pub color: Color,
    pub alpha: f32,
    /// Alpha lost per tick, 0 keeps the particle opaque
    pub alpha_step: f32,
}

impl Particle {
    /// Advance one tick; returns false once the particle has stopped or faded
    pub fn update(&mut self) -> bool {
        self.speed -= self.retardation;
        if self.speed <= 0.0 {
            return false;
        }

        if self.alpha_step > 0.0 {
            if self.alpha - self.alpha_step < 0.0 {
                return false;
            }
            self.alpha -= self.alpha_step;
        }

        self.pos += direction(self.angle) * self.speed;
        true
    }
}

fn push_capped(particles: &mut Vec<Particle>, cap: usize, particle: Particle) {
    if particles.len() < cap {
        particles.push(particle);
    }
}

/// Sparks thrown off a ball along its heading
pub fn ball_burst(
    particles: &mut Vec<Particle>,
    cap: usize,
    rng: &mut impl Rng,
    ball: &Ball,
    tuning: &Tuning,
) {
    let jitter = tuning.particle.angle_jitter;
    let size = Vec2::new(ball.rect.width as f32 / 4.0, ball.rect.height as f32 / 4.0);
    let center = ball.pos + Vec2::new(ball.rect.width as f32, ball.rect.height as f32) / 2.0;

    for _ in 0..tuning.ball.particle_spawn_amount {
        let spread = if jitter > 0.0 {
            rng.random_range(-jitter..jitter)
        } else {
            0.0
        };
        push_capped(
            particles,
            cap,
            Particle {
                pos: center,
                size,
                angle: ball.stats.angle + spread,
                speed: ball.stats.speed,
                retardation: ball.stats.speed / 24.0,
                color: ball.color,
                alpha: 255.0,
                alpha_step: tuning.particle.alpha_step,
            },
        );
    }
}

/// Debris scattered in every direction from a damaged block
pub fn block_burst(
    particles: &mut Vec<Particle>,
    cap: usize,
    rng: &mut impl Rng,
    block: &Block,
    tuning: &Tuning,
) {
    let p = &tuning.particle;
    let center = block.rect.center();

    for _ in 0..tuning.block.particle_spawn_amount {
        push_capped(
            particles,
            cap,
            Particle {
                pos: center,
                size: Vec2::splat(p.block_particle_size),
                angle: rng.random_range(0.0..TAU),
                speed: p.block_particle_speed,
                retardation: p.block_particle_retardation,
                color: block.color,
                alpha: 255.0,
                alpha_step: p.alpha_step,
            },
        );
    }
}
