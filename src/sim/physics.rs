//! Ball physics
//!
//! Each tick every ball runs the same fixed pipeline: collide with paddles,
//! other balls, blocks and power-ups, keep the heading away from vertical,
//! move, bounce off the arena edges, then drop a trail marker and report a
//! hit sound if anything was struck.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::blocks::collide_blocks;
use super::collision::{Side, approaches, classify_side, mirror_x, mirror_y, radial_angles};
use super::effects::{DoubleSpeed, Fire, Resize};
use super::particle::{Particle, ball_burst};
use super::rect::Rect;
use super::state::{Ball, BallSpawn, Block, GameEvent, Paddle, PowerUp, PowerUpKind, SoundEffect};
use crate::consts::GAME_SCALE;
use crate::tuning::Tuning;
use crate::{direction, normalize_angle};

/// Everything outside the ball and its colliders that a ball update touches
pub struct TickContext<'a> {
    pub tuning: &'a Tuning,
    pub arena: Rect,
    /// Milliseconds since the previous tick
    pub dt_ms: f32,
    pub trail_length: usize,
    pub max_particles: usize,
    pub rng: &'a mut Pcg32,
    pub particles: &'a mut Vec<Particle>,
    pub events: &'a mut Vec<GameEvent>,
    /// Balls to create once the ball pass is over
    pub spawns: &'a mut Vec<BallSpawn>,
}

impl TickContext<'_> {
    /// Sparks for any hit the ball takes part in
    pub(crate) fn ball_particles(&mut self, ball: &Ball) {
        ball_burst(self.particles, self.max_particles, self.rng, ball, self.tuning);
    }
}

/// Every ball except the one being updated, borrowed as the two halves of
/// the ball list around it
pub struct OtherBalls<'a> {
    pub before: &'a mut [Ball],
    pub after: &'a mut [Ball],
}

impl<'a> OtherBalls<'a> {
    /// Split `balls` around `index`; `None` if out of range
    pub fn split(balls: &'a mut [Ball], index: usize) -> Option<(&'a mut Ball, Self)> {
        if index >= balls.len() {
            return None;
        }
        let (before, rest) = balls.split_at_mut(index);
        let (ball, after) = rest.split_first_mut()?;
        Some((ball, Self { before, after }))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Ball> {
        self.before.iter_mut().chain(self.after.iter_mut())
    }
}

/// Advance one ball by one tick
pub fn update_ball(
    ball: &mut Ball,
    others: &mut OtherBalls<'_>,
    paddles: &[Paddle],
    blocks: &mut [Block],
    power_ups: &mut [PowerUp],
    ctx: &mut TickContext<'_>,
) {
    assert!(
        ball.stats.angle.is_finite() && ball.stats.speed.is_finite(),
        "ball {} has non-finite motion {:?}",
        ball.id,
        ball.stats
    );

    ball.collided = false;

    collide_paddles(ball, paddles, ctx);
    collide_balls(ball, others, ctx);
    collide_blocks(ball, blocks, ctx);
    collide_power_ups(ball, power_ups, ctx);

    let band = ctx.tuning.ball.least_allowed_vertical_angle;
    let angle = clamp_vertical(ball.stats.angle, band, ctx.rng);
    ball.set_angle(angle);

    if ball.stats.speed > ball.stats.max_speed {
        ball.stats.speed = ball.stats.max_speed;
    }

    let step = direction(ball.stats.angle) * ball.stats.speed;
    ball.set_pos(ball.pos + step);

    collide_walls(ball, ctx);
    advance_trail(ball, ctx);

    if ball.collided {
        ctx.events.push(GameEvent::Sound(SoundEffect::BallHit));
    }
}

/// Push a heading out of the forbidden bands around straight down (π/2) and
/// straight up (3π/2). Angles inside a band move to its nearer edge; an
/// exactly vertical heading is nudged to a random side. Returns a
/// normalized angle.
pub fn clamp_vertical(angle: f32, band: f32, rng: &mut impl Rng) -> f32 {
    let angle = normalize_angle(angle);
    for vertical in [FRAC_PI_2, 3.0 * FRAC_PI_2] {
        if angle > vertical - band && angle < vertical + band {
            let clamped = if angle > vertical {
                vertical + band
            } else if angle < vertical {
                vertical - band
            } else if rng.random_bool(0.5) {
                vertical + band
            } else {
                vertical - band
            };
            return normalize_angle(clamped);
        }
    }
    angle
}

/// Bend the heading by the paddle's vertical velocity
pub fn apply_spin(ball: &mut Ball, paddle: &Paddle, strength: f32) {
    let velocity_y = paddle.velocity_y / GAME_SCALE as f32;
    let spin = velocity_y * strength;
    let angle = ball.stats.angle;

    let bent = if angle <= FRAC_PI_2 || angle > 3.0 * FRAC_PI_2 {
        angle - spin
    } else {
        angle + spin
    };
    ball.set_angle(bent);
}

fn collide_paddles(ball: &mut Ball, paddles: &[Paddle], ctx: &mut TickContext<'_>) {
    let strength = ctx.tuning.ball.spin_angle_strength;

    for paddle in paddles {
        if !ball.rect.overlaps(&paddle.rect) {
            continue;
        }

        match classify_side(&ball.rect, &paddle.rect) {
            Some(side @ (Side::Top | Side::Bottom)) => {
                if approaches(side, ball.stats.angle) {
                    ball.set_angle(mirror_y(ball.stats.angle));
                }
                ball.place_against(side, &paddle.rect);
            }
            Some(side @ (Side::Left | Side::Right)) => {
                apply_spin(ball, paddle, strength);
                if approaches(side, ball.stats.angle) {
                    ball.set_angle(mirror_x(ball.stats.angle));
                }
                ball.place_against(side, &paddle.rect);
            }
            // Deep overlap with no clear face: the hit still registers but
            // the ball keeps its course
            None => {}
        }

        hit_paddle(ball, paddle, ctx);
    }
}

fn hit_paddle(ball: &mut Ball, paddle: &Paddle, ctx: &mut TickContext<'_>) {
    ctx.ball_particles(ball);
    for effect in &mut ball.effects {
        effect.on_hit_paddle(&mut ball.stats, paddle);
    }
    ctx.events.push(GameEvent::BallHitPaddle {
        ball: ball.id,
        paddle: paddle.id,
    });
    ball.collided = true;
}

fn collide_balls(ball: &mut Ball, others: &mut OtherBalls<'_>, ctx: &mut TickContext<'_>) {
    for other in others.iter_mut() {
        if !ball.rect.overlaps(&other.rect) {
            continue;
        }

        if let Some(side) = classify_side(&ball.rect, &other.rect) {
            ball.place_against(side, &other.rect);
        }

        // Balls bounce apart along the line between their centers
        let (mine, theirs) = radial_angles(&ball.rect, &other.rect);
        ball.set_angle(mine);
        other.set_angle(theirs);

        hit_ball(ball, other, ctx);
    }
}

fn hit_ball(ball: &mut Ball, other: &Ball, ctx: &mut TickContext<'_>) {
    ctx.ball_particles(ball);
    for effect in &mut ball.effects {
        effect.on_hit_ball(&mut ball.stats, other.id);
    }
    ctx.events.push(GameEvent::BallHitBall {
        ball: ball.id,
        other: other.id,
    });
    ball.collided = true;
}

fn collide_power_ups(ball: &mut Ball, power_ups: &mut [PowerUp], ctx: &mut TickContext<'_>) {
    for power_up in power_ups.iter_mut() {
        if !ball.rect.overlaps(&power_up.rect) {
            continue;
        }
        let Some(kind) = power_up.consume() else {
            continue;
        };

        let tuning = &ctx.tuning.power_up;
        match kind {
            PowerUpKind::MultiBall => {
                let center = power_up.rect.center();
                let half = Vec2::new(ball.rect.width as f32, ball.rect.height as f32) / 2.0;
                ctx.spawns.push(BallSpawn {
                    pos: center - half,
                    angle: ctx.rng.random_range(0.0..TAU),
                    owner: ball.owner,
                });
            }
            PowerUpKind::DoubleSpeed => {
                ball.add_effect(Box::new(DoubleSpeed::new(tuning.double_speed_duration_ms)));
            }
            PowerUpKind::Fire => {
                ball.add_effect(Box::new(Fire::new(
                    tuning.fire_duration_ms,
                    tuning.fire_damage_factor,
                )));
            }
            PowerUpKind::Enlarger => {
                ball.add_effect(Box::new(Resize::enlarger(
                    tuning.enlarger_duration_ms,
                    tuning.enlarger_factor,
                )));
            }
            PowerUpKind::Reducer => {
                ball.add_effect(Box::new(Resize::reducer(
                    tuning.reducer_duration_ms,
                    tuning.reducer_factor,
                )));
            }
        }

        log::debug!("Ball {} collected {kind:?}", ball.id);
        ctx.events.push(GameEvent::PowerUpCollected {
            power_up: power_up.id,
            kind,
            ball: ball.id,
        });
        ctx.events.push(GameEvent::Sound(SoundEffect::PowerUp));
    }
}

/// Bounce off the arena edges, one axis at a time
fn collide_walls(ball: &mut Ball, ctx: &mut TickContext<'_>) {
    let arena = ctx.arena;
    let band = ctx.tuning.ball.least_allowed_vertical_angle;

    if ball.rect.left() < arena.left() {
        set_reflected(ball, mirror_x(ball.stats.angle), band);
        ball.set_x(arena.left() as f32);
        hit_wall(ball, ctx);
    } else if ball.rect.right() > arena.right() {
        set_reflected(ball, mirror_x(ball.stats.angle), band);
        ball.set_x((arena.right() - ball.rect.width) as f32);
        hit_wall(ball, ctx);
    }

    if ball.rect.top() < arena.top() {
        set_reflected(ball, mirror_y(ball.stats.angle), band);
        ball.set_y(arena.top() as f32);
        hit_wall(ball, ctx);
    } else if ball.rect.bottom() > arena.bottom() {
        set_reflected(ball, mirror_y(ball.stats.angle), band);
        ball.set_y((arena.bottom() - ball.rect.height) as f32);
        hit_wall(ball, ctx);
    }
}

/// Mirroring a heading that sits on a band edge can round a hair inside
/// the band; anything this close to an edge goes back onto it
const BAND_EDGE_TOLERANCE: f32 = 1e-5;

/// Wall reflections happen after the vertical clamp, so they must not
/// leave the heading inside a band
fn set_reflected(ball: &mut Ball, angle: f32, band: f32) {
    ball.set_angle(angle);
    ball.set_angle(snap_to_band_edge(ball.stats.angle, band));
}

/// Move a normalized angle lying just inside a vertical band onto the edge
/// it is within `BAND_EDGE_TOLERANCE` of
pub fn snap_to_band_edge(angle: f32, band: f32) -> f32 {
    if !in_vertical_band(angle, band) {
        return angle;
    }
    [FRAC_PI_2, 3.0 * FRAC_PI_2]
        .into_iter()
        .flat_map(|vertical| [vertical - band, vertical + band])
        .find(|edge| (angle - edge).abs() <= BAND_EDGE_TOLERANCE)
        .unwrap_or(angle)
}

fn hit_wall(ball: &mut Ball, ctx: &mut TickContext<'_>) {
    ctx.ball_particles(ball);
    for effect in &mut ball.effects {
        effect.on_hit_wall(&mut ball.stats);
    }
    ctx.events.push(GameEvent::BallHitWall { ball: ball.id });
    ball.collided = true;
}

fn advance_trail(ball: &mut Ball, ctx: &mut TickContext<'_>) {
    ball.trace_timer_ms += ctx.dt_ms;
    if ball.trace_timer_ms >= ctx.tuning.ball.trace_spawn_rate_ms {
        ball.trace_timer_ms = 0.0;
        if ctx.trail_length > 0 {
            ball.record_trail(ctx.trail_length);
        }
    }
}

/// True if the angle lies strictly inside either forbidden vertical band
pub fn in_vertical_band(angle: f32, band: f32) -> bool {
    [FRAC_PI_2, 3.0 * FRAC_PI_2]
        .iter()
        .any(|&vertical| angle > vertical - band && angle < vertical + band)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use rand::SeedableRng;

    use super::*;
    use crate::consts::*;
    use crate::settings::Settings;
    use crate::sim::effects::BallEffect;
    use crate::sim::state::{BallStats, EntityId, PlayerSide, World};

    /// Counts hook calls so tests can see what the engine reported
    #[derive(Debug, Default)]
    struct Recorder {
        walls: std::rc::Rc<std::cell::Cell<u32>>,
        paddles: std::rc::Rc<std::cell::Cell<u32>>,
        balls: std::rc::Rc<std::cell::Cell<u32>>,
    }

    impl BallEffect for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }
        fn on_hit_wall(&mut self, _stats: &mut BallStats) {
            self.walls.set(self.walls.get() + 1);
        }
        fn on_hit_paddle(&mut self, _stats: &mut BallStats, _paddle: &Paddle) {
            self.paddles.set(self.paddles.get() + 1);
        }
        fn on_hit_ball(&mut self, _stats: &mut BallStats, _other: EntityId) {
            self.balls.set(self.balls.get() + 1);
        }
    }

    fn world() -> World {
        World::new(11, &Settings::default(), Tuning::default())
    }

    /// Run the pipeline for ball `index` against the world's colliders
    fn step(world: &mut World, index: usize) -> Vec<GameEvent> {
        let mut spawns = Vec::new();
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
            dt_ms: FRAME_MS,
            trail_length: *trail_length,
            max_particles: *max_particles,
            rng,
            particles,
            events,
            spawns: &mut spawns,
        };
        let (ball, mut others) = OtherBalls::split(balls, index).unwrap();
        update_ball(ball, &mut others, paddles, blocks, power_ups, &mut ctx);
        world.drain_events()
    }

    fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
        events.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn test_clamp_vertical_pushes_to_band_edge() {
        let mut rng = Pcg32::seed_from_u64(1);
        let band = 0.21;
        let below = clamp_vertical(FRAC_PI_2 - 0.1, band, &mut rng);
        assert!((below - (FRAC_PI_2 - band)).abs() < 1e-6);
        let above = clamp_vertical(3.0 * FRAC_PI_2 + 0.05, band, &mut rng);
        assert!((above - (3.0 * FRAC_PI_2 + band)).abs() < 1e-6);
        let outside = clamp_vertical(0.3, band, &mut rng);
        assert_eq!(outside, 0.3);
        // Unnormalized input is handled the same as its normalized twin
        let negative = clamp_vertical(-FRAC_PI_2 + 0.1, band, &mut rng);
        assert!((negative - (3.0 * FRAC_PI_2 + band)).abs() < 1e-5);
    }

    #[test]
    fn test_clamp_vertical_nudges_exact_vertical() {
        let mut rng = Pcg32::seed_from_u64(3);
        let band = 0.21;
        let mut seen_left = false;
        let mut seen_right = false;
        for _ in 0..64 {
            let nudged = clamp_vertical(FRAC_PI_2, band, &mut rng);
            assert!(!in_vertical_band(nudged, band));
            if nudged > FRAC_PI_2 {
                seen_right = true;
            } else {
                seen_left = true;
            }
        }
        assert!(seen_left && seen_right);
    }

    #[test]
    fn test_right_wall_reflection() {
        let mut world = world();
        let x = (LEVEL_MAX_X - 8) as f32 - 1.0;
        world.spawn_ball(Vec2::new(x, 150.0), 0.1, PlayerSide::Left);
        world.balls[0].stats.speed = 5.0;
        let walls = std::rc::Rc::new(std::cell::Cell::new(0));
        world.balls[0].add_effect(Box::new(Recorder {
            walls: walls.clone(),
            ..Default::default()
        }));
        world.drain_events();

        let events = step(&mut world, 0);
        let ball = &world.balls[0];
        assert!((ball.stats.angle - (PI - 0.1)).abs() < 1e-5);
        assert_eq!(ball.rect.right(), LEVEL_MAX_X);
        assert_eq!(walls.get(), 1);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::BallHitWall { .. })), 1);
        assert_eq!(
            count(&events, |e| matches!(e, GameEvent::Sound(SoundEffect::BallHit))),
            1
        );
    }

    #[test]
    fn test_corner_hits_both_walls_but_one_sound() {
        let mut world = world();
        world.spawn_ball(Vec2::new(LEVEL_X as f32 + 1.0, LEVEL_Y as f32 + 1.0), 1.25 * PI, PlayerSide::Left);
        world.balls[0].stats.speed = 5.0;
        world.drain_events();

        let events = step(&mut world, 0);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::BallHitWall { .. })), 2);
        assert_eq!(
            count(&events, |e| matches!(e, GameEvent::Sound(SoundEffect::BallHit))),
            1
        );
        let ball = &world.balls[0];
        assert_eq!((ball.rect.left(), ball.rect.top()), (LEVEL_X, LEVEL_Y));
        // Heading into the corner at 225°, out of it at 45°
        assert!((ball.stats.angle - 0.25 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_snap_to_band_edge() {
        let band = 0.21;
        let edge = 3.0 * FRAC_PI_2 + band;
        assert_eq!(snap_to_band_edge(edge - 2e-7, band), edge);
        assert_eq!(snap_to_band_edge(FRAC_PI_2 - band + 1e-6, band), FRAC_PI_2 - band);
        // Deep inside the band is the clamp's job, not this one's
        let inside = FRAC_PI_2 + 0.1;
        assert_eq!(snap_to_band_edge(inside, band), inside);
        assert_eq!(snap_to_band_edge(0.3, band), 0.3);
    }

    #[test]
    fn test_wall_reflection_of_band_edge_stays_out_of_band() {
        let band = Tuning::default().ball.least_allowed_vertical_angle;
        let edges = [
            FRAC_PI_2 - band,
            FRAC_PI_2 + band,
            3.0 * FRAC_PI_2 - band,
            3.0 * FRAC_PI_2 + band,
        ];
        for edge in edges {
            let mut world = world();
            // Steep enough to reach the top or bottom wall this tick
            let y = if edge < PI {
                (LEVEL_MAX_Y - 9) as f32
            } else {
                LEVEL_Y as f32 + 1.0
            };
            world.spawn_ball(Vec2::new(250.0, y), edge, PlayerSide::Left);
            world.balls[0].stats.speed = 5.0;

            let events = step(&mut world, 0);
            assert_eq!(count(&events, |e| matches!(e, GameEvent::BallHitWall { .. })), 1);
            let angle = world.balls[0].stats.angle;
            assert!(!in_vertical_band(angle, band), "{edge} reflected to {angle}");
            assert!((angle - normalize_angle(-edge)).abs() < 1e-5);
        }
    }

    #[test]
    fn test_speed_capped() {
        let mut world = world();
        world.spawn_ball(Vec2::new(250.0, 150.0), 0.0, PlayerSide::Left);
        world.balls[0].stats.speed = 100.0;
        step(&mut world, 0);
        assert_eq!(world.balls[0].stats.speed, world.balls[0].stats.max_speed);
    }

    #[test]
    fn test_paddle_left_face_reflects_with_spin() {
        let mut world = world();
        world.spawn_paddle(Vec2::new(300.0, 130.0), PlayerSide::Right);
        world.paddles[0].velocity_y = 4.0;
        // Ball 8x8 poking 2px into the paddle's left face, moving right
        world.spawn_ball(Vec2::new(294.0, 150.0), 0.0, PlayerSide::Left);
        let hits = std::rc::Rc::new(std::cell::Cell::new(0));
        world.balls[0].add_effect(Box::new(Recorder {
            paddles: hits.clone(),
            ..Default::default()
        }));
        world.balls[0].stats.speed = 0.5;
        world.drain_events();

        let events = step(&mut world, 0);
        let ball = &world.balls[0];
        // Spin: 0 - (4 / 2) * 0.09 = -0.18, mirrored: π + 0.18
        assert!((ball.stats.angle - (PI + 0.18)).abs() < 1e-5);
        assert_eq!(hits.get(), 1);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::BallHitPaddle { .. })), 1);
        // Placed one pixel left of the paddle before moving away
        assert!(ball.rect.right() < 300);
    }

    #[test]
    fn test_paddle_top_face_reflects_down_moving_ball() {
        let mut world = world();
        world.spawn_paddle(Vec2::new(300.0, 130.0), PlayerSide::Right);
        world.spawn_ball(Vec2::new(300.0, 124.0), 1.2, PlayerSide::Left);
        world.balls[0].stats.speed = 0.5;

        step(&mut world, 0);
        let ball = &world.balls[0];
        assert!((ball.stats.angle - (TAU - 1.2)).abs() < 1e-5);
        assert!(ball.rect.bottom() < 130);
    }

    #[test]
    fn test_paddle_fully_overlapped_keeps_course() {
        let mut world = world();
        world.spawn_paddle(Vec2::new(300.0, 130.0), PlayerSide::Right);
        // Ball entirely inside the 8x48 paddle: no face can be classified
        world.spawn_ball(Vec2::new(300.0, 150.0), 0.3, PlayerSide::Left);
        world.balls[0].stats.speed = 0.5;

        let events = step(&mut world, 0);
        let ball = &world.balls[0];
        assert!((ball.stats.angle - 0.3).abs() < 1e-6);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::BallHitPaddle { .. })), 1);
        assert!(ball.collided);
    }

    #[test]
    fn test_balls_bounce_radially() {
        let mut world = world();
        world.tuning.ball.width = 16;
        world.tuning.ball.height = 16;
        world.arena = Rect::new(-100, -100, 400, 400);
        // Centers at (0, 0) and (10, 0)
        world.spawn_ball(Vec2::new(-8.0, -8.0), 0.5, PlayerSide::Left);
        world.spawn_ball(Vec2::new(2.0, -8.0), 2.0, PlayerSide::Right);
        let hits = std::rc::Rc::new(std::cell::Cell::new(0));
        world.balls[0].add_effect(Box::new(Recorder {
            balls: hits.clone(),
            ..Default::default()
        }));
        let mut spawns = Vec::new();
        let World {
            tuning,
            arena,
            balls,
            particles,
            rng,
            events,
            ..
        } = &mut world;
        let mut ctx = TickContext {
            tuning,
            arena: *arena,
            dt_ms: FRAME_MS,
            trail_length: 0,
            max_particles: 0,
            rng,
            particles,
            events,
            spawns: &mut spawns,
        };
        let (ball, mut others) = OtherBalls::split(balls, 0).unwrap();
        collide_balls(ball, &mut others, &mut ctx);

        assert!((world.balls[0].stats.angle - PI).abs() < 1e-6);
        assert!(world.balls[1].stats.angle.abs() < 1e-6);
        assert_eq!(hits.get(), 1);
        assert!(world.balls[0].collided);
    }

    #[test]
    fn test_other_balls_skips_self() {
        let mut world = world();
        for i in 0..4 {
            world.spawn_ball(Vec2::new(150.0 + 20.0 * i as f32, 100.0), 0.0, PlayerSide::Left);
        }
        let ids: Vec<EntityId> = world.balls.iter().map(|b| b.id).collect();
        for index in 0..ids.len() {
            let (ball, mut others) = OtherBalls::split(&mut world.balls, index).unwrap();
            let seen: Vec<EntityId> = others.iter_mut().map(|b| b.id).collect();
            let expected: Vec<EntityId> = ids.iter().copied().filter(|&id| id != ball.id).collect();
            assert_eq!(seen, expected);
        }
        assert!(OtherBalls::split(&mut world.balls, 4).is_none());
    }

    #[test]
    fn test_power_up_consumed_once() {
        let mut world = world();
        world.spawn_power_up(PowerUpKind::DoubleSpeed, Vec2::new(250.0, 150.0));
        // Both balls sit on the pickup, edge to edge with each other
        world.spawn_ball(Vec2::new(250.0, 150.0), 0.0, PlayerSide::Left);
        world.spawn_ball(Vec2::new(258.0, 158.0), PI, PlayerSide::Right);
        world.drain_events();

        let first = step(&mut world, 0);
        let second = step(&mut world, 1);
        assert_eq!(count(&first, |e| matches!(e, GameEvent::PowerUpCollected { .. })), 1);
        assert_eq!(count(&second, |e| matches!(e, GameEvent::PowerUpCollected { .. })), 0);
        assert!(world.balls[0].has_effect(DoubleSpeed::NAME));
        assert!(!world.balls[1].has_effect(DoubleSpeed::NAME));
        assert!(world.power_ups[0].consumed);
        assert_eq!(world.balls[0].stats.max_speed, 2.0 * Tuning::default().ball.max_speed);
    }

    #[test]
    fn test_enlarger_grows_collecting_ball() {
        let mut world = world();
        world.spawn_power_up(PowerUpKind::Enlarger, Vec2::new(250.0, 150.0));
        world.spawn_ball(Vec2::new(254.0, 154.0), 0.0, PlayerSide::Left);
        world.drain_events();

        let events = step(&mut world, 0);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::PowerUpCollected { .. })), 1);
        let ball = &world.balls[0];
        assert!(ball.has_effect(Resize::ENLARGER));
        assert_eq!((ball.rect.width, ball.rect.height), (16, 16));
        // Grown around its old center, then moved right
        assert_eq!(ball.rect.top(), 150);
    }

    #[test]
    fn test_trail_marker_every_spawn_rate() {
        let mut world = world();
        world.spawn_ball(Vec2::new(250.0, 150.0), 0.0, PlayerSide::Left);
        // 16.7ms frames against a 32ms rate: a marker every second tick
        for _ in 0..4 {
            step(&mut world, 0);
        }
        assert_eq!(world.balls[0].trail.len(), 2);
    }

    #[test]
    fn test_free_flight_emits_nothing() {
        let mut world = world();
        world.spawn_ball(Vec2::new(250.0, 150.0), 0.0, PlayerSide::Left);
        world.drain_events();
        let events = step(&mut world, 0);
        assert!(events.is_empty());
        assert!(!world.balls[0].collided);
    }
}
