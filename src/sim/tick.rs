//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::particle::Particle;
use super::physics::{OtherBalls, TickContext, update_ball};
use super::state::{GameEvent, PaddleInput, PlayerSide, SoundEffect, World};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: PaddleInput,
    pub right: PaddleInput,
}

impl TickInput {
    pub fn input(&self, side: PlayerSide) -> PaddleInput {
        match side {
            PlayerSide::Left => self.left,
            PlayerSide::Right => self.right,
        }
    }
}

/// Advance the world by one step of `dt_ms` milliseconds
pub fn tick(world: &mut World, input: &TickInput, dt_ms: f32) {
    // Balls, in id order; each one commits before the next moves
    let mut spawns = Vec::new();
    {
        let World {
            tuning,
            arena,
            balls,
            paddles,
            blocks,
            power_ups,
            particles,
            max_particles,
            trail_length,
            rng,
            events,
            ..
        } = world;
        let mut ctx = TickContext {
            tuning,
            arena: *arena,
            dt_ms,
            trail_length: *trail_length,
            max_particles: *max_particles,
            rng,
            particles,
            events,
            spawns: &mut spawns,
        };
        for index in 0..balls.len() {
            if let Some((ball, mut others)) = OtherBalls::split(balls, index) {
                update_ball(ball, &mut others, paddles, blocks, power_ups, &mut ctx);
            }
        }
    }

    // Extra balls from MultiBall pickups
    for spawn in spawns {
        world.spawn_ball(spawn.pos, spawn.angle, spawn.owner);
    }
    world.power_ups.retain(|p| !p.consumed);

    // Effect timers
    for ball in &mut world.balls {
        for effect in ball.update_effects(dt_ms) {
            log::debug!("Ball {} lost {effect}", ball.id);
            world.events.push(GameEvent::EffectExpired {
                ball: ball.id,
                effect: effect.to_string(),
            });
        }
    }

    world.particles.retain_mut(Particle::update);

    for paddle in &mut world.paddles {
        paddle.update(input.input(paddle.owner), &world.arena);
    }

    // Blocks: fade hit flashes, blow up the depleted ones
    for block in &mut world.blocks {
        let faded = block.flash.as_mut().is_some_and(|flash| !flash.update());
        if faded {
            block.flash = None;
        }

        if block.is_depleted() && block.destroy() {
            log::debug!("Block {} of {:?} destroyed", block.id, block.owner);
            world.events.push(GameEvent::BlockDestroyed {
                block: block.id,
                owner: block.owner,
            });
            world
                .events
                .push(GameEvent::Sound(SoundEffect::BlockExplode));
        }
    }
    world.blocks.retain(|b| !b.is_destroyed());

    world.time_ticks += 1;
}
