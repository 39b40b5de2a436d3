//! Game state and core simulation types
//!
//! The `World` owns every entity in typed collections kept in spawn order,
//! which is also the order the tick processes them in.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Side;
use super::effects::{BallEffect, Flash};
use super::particle::Particle;
use super::rect::Rect;
use crate::consts::{LEVEL_HEIGHT, LEVEL_WIDTH, LEVEL_X, LEVEL_Y};
use crate::normalize_angle;
use crate::settings::Settings;
use crate::tuning::{BallTuning, Tuning};

/// Stable identifier handed out by the world, increasing with spawn order
pub type EntityId = u32;

/// The two players, also used as the owner tag of every entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSide {
    Left,
    Right,
}

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// A player: identity plus the color copied into everything they own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub side: PlayerSide,
    pub name: String,
    pub color: Color,
}

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
}

/// The part of a ball that effects may read and adjust
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallStats {
    /// Direction of travel in radians, kept in [0, 2π)
    pub angle: f32,
    /// Pixels per tick
    pub speed: f32,
    pub max_speed: f32,
    pub damage: f32,
    /// Multiplier on the ball's base width and height
    pub scale: f32,
}

/// A ball entity
#[derive(Debug)]
pub struct Ball {
    pub id: EntityId,
    pub owner: PlayerSide,
    pub color: Color,
    pub pos: Vec2,
    pub rect: Rect,
    pub stats: BallStats,
    /// Set by any hit this tick; drives the hit sound
    pub collided: bool,
    /// Milliseconds since the last trail marker
    pub trace_timer_ms: f32,
    /// Trail history for rendering (newest first)
    pub trail: Vec<TrailPoint>,
    pub effects: Vec<Box<dyn BallEffect>>,
    /// Width and height at scale 1
    base_size: (i32, i32),
    destroyed: bool,
}

impl Ball {
    pub fn new(id: EntityId, pos: Vec2, angle: f32, owner: &Player, tuning: &BallTuning) -> Self {
        assert!(angle.is_finite(), "ball angle must be finite, got {angle}");
        Self {
            id,
            owner: owner.side,
            color: owner.color,
            pos,
            rect: Rect::at(pos, tuning.width, tuning.height),
            stats: BallStats {
                angle: normalize_angle(angle),
                speed: tuning.speed,
                max_speed: tuning.max_speed,
                damage: tuning.damage,
                scale: 1.0,
            },
            collided: false,
            trace_timer_ms: 0.0,
            trail: Vec::new(),
            effects: Vec::new(),
            base_size: (tuning.width, tuning.height),
            destroyed: false,
        }
    }

    /// Set the heading, normalized into [0, 2π)
    pub fn set_angle(&mut self, angle: f32) {
        assert!(angle.is_finite(), "ball {} got non-finite angle", self.id);
        self.stats.angle = normalize_angle(angle);
    }

    /// Move to a new position and re-derive the bounding box
    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
        self.rect = Rect::at(pos, self.rect.width, self.rect.height);
    }

    pub fn set_x(&mut self, x: f32) {
        self.set_pos(Vec2::new(x, self.pos.y));
    }

    pub fn set_y(&mut self, y: f32) {
        self.set_pos(Vec2::new(self.pos.x, y));
    }

    /// Snap flush against one face of `other`, one pixel clear of it
    pub fn place_against(&mut self, side: Side, other: &Rect) {
        match side {
            Side::Top => self.set_y((other.top() - self.rect.height - 1) as f32),
            Side::Bottom => self.set_y((other.bottom() + 1) as f32),
            Side::Left => self.set_x((other.left() - self.rect.width - 1) as f32),
            Side::Right => self.set_x((other.right() + 1) as f32),
        }
    }

    /// Attach an effect. Picking up an effect the ball already carries
    /// refreshes it instead of stacking; returns whether it was newly added.
    pub fn add_effect(&mut self, mut effect: Box<dyn BallEffect>) -> bool {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.name() == effect.name()) {
            existing.refresh();
            return false;
        }
        effect.on_apply(&mut self.stats);
        self.effects.push(effect);
        self.fit_to_scale();
        true
    }

    /// Resize the bounding box to the current scale, keeping its center
    fn fit_to_scale(&mut self) {
        let (base_width, base_height) = self.base_size;
        let width = ((base_width as f32 * self.stats.scale).round() as i32).max(1);
        let height = ((base_height as f32 * self.stats.scale).round() as i32).max(1);
        if (width, height) == (self.rect.width, self.rect.height) {
            return;
        }
        let grow = Vec2::new(
            (width - self.rect.width) as f32,
            (height - self.rect.height) as f32,
        );
        self.pos -= grow / 2.0;
        self.rect = Rect::at(self.pos, width, height);
    }

    pub fn has_effect(&self, name: &str) -> bool {
        self.effects.iter().any(|e| e.name() == name)
    }

    /// Advance effect timers, removing the ones that ran out.
    /// Returns the names of removed effects.
    pub fn update_effects(&mut self, dt_ms: f32) -> Vec<&'static str> {
        let mut expired = Vec::new();
        let stats = &mut self.stats;
        self.effects.retain_mut(|effect| {
            if effect.update(stats, dt_ms) {
                true
            } else {
                effect.on_remove(stats);
                expired.push(effect.name());
                false
            }
        });
        if !expired.is_empty() {
            self.fit_to_scale();
        }
        expired
    }

    /// Record current position to trail
    pub fn record_trail(&mut self, max_len: usize) {
        self.trail.insert(0, TrailPoint { pos: self.pos });
        self.trail.truncate(max_len);
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Tear the ball down together with its effects and trail.
    /// Safe to call repeatedly; only the first call does anything.
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        for mut effect in self.effects.drain(..) {
            effect.on_remove(&mut self.stats);
        }
        self.fit_to_scale();
        self.trail.clear();
        true
    }
}

/// Up/down signals for one paddle, one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddleInput {
    pub up: bool,
    pub down: bool,
}

/// A player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub id: EntityId,
    pub owner: PlayerSide,
    pub color: Color,
    pub pos: Vec2,
    pub rect: Rect,
    /// Pixels per tick, negative is up
    pub velocity_y: f32,
    pub acceleration: f32,
    pub retardation: f32,
    pub max_speed: f32,
}

impl Paddle {
    /// Accelerate toward the pressed direction or brake toward rest, then
    /// move and stay within the arena's vertical bounds
    pub fn update(&mut self, input: PaddleInput, arena: &Rect) {
        if input.up {
            self.velocity_y = (self.velocity_y - self.acceleration).max(-self.max_speed);
        } else if input.down {
            self.velocity_y = (self.velocity_y + self.acceleration).min(self.max_speed);
        } else if self.velocity_y > 0.0 {
            self.velocity_y = (self.velocity_y - self.retardation).max(0.0);
        } else if self.velocity_y < 0.0 {
            self.velocity_y = (self.velocity_y + self.retardation).min(0.0);
        }

        self.set_y(self.pos.y + self.velocity_y);

        if self.rect.top() < arena.top() {
            self.set_y(arena.top() as f32);
        } else if self.rect.bottom() > arena.bottom() {
            self.set_y((arena.bottom() - self.rect.height) as f32);
        }
    }

    fn set_y(&mut self, y: f32) {
        self.pos.y = y;
        self.rect = Rect::at(self.pos, self.rect.width, self.rect.height);
    }
}

/// Block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    Normal,
    Strong,
}

/// What a single hit did to a block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockHit {
    /// Health dropped to half or below with this hit
    pub crossed_half_health: bool,
    /// Health is gone; the block will be destroyed at the end of the tick
    pub depleted: bool,
}

/// A destructible block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: EntityId,
    pub owner: PlayerSide,
    pub color: Color,
    pub kind: BlockKind,
    pub pos: Vec2,
    pub rect: Rect,
    pub health: f32,
    pub max_health: f32,
    /// Damaged look has been switched on
    pub half_health: bool,
    /// White hit flash, fading out
    #[serde(skip)]
    pub flash: Option<Flash>,
    destroyed: bool,
}

impl Block {
    /// Take damage and start the hit flash
    pub fn on_hit(&mut self, damage: f32, flash_fade_step: f32) -> BlockHit {
        assert!(
            damage.is_finite() && damage >= 0.0,
            "block damage must be finite and non-negative, got {damage}"
        );
        self.health -= damage;
        self.flash = Some(Flash::new(flash_fade_step));

        let crossed_half_health = !self.half_health && self.health <= self.max_health / 2.0;
        if crossed_half_health {
            self.half_health = true;
        }

        BlockHit {
            crossed_half_health,
            depleted: self.is_depleted(),
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.health <= 0.0
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Mark destroyed; only the first call returns true
    pub fn destroy(&mut self) -> bool {
        !std::mem::replace(&mut self.destroyed, true)
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// An extra ball for the collector's owner
    MultiBall,
    /// Doubles the collecting ball's speed for a while
    DoubleSpeed,
    /// Doubles the collecting ball's block damage for a while
    Fire,
    /// Grows the collecting ball for a while
    Enlarger,
    /// Shrinks the collecting ball for a while
    Reducer,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::MultiBall,
        PowerUpKind::DoubleSpeed,
        PowerUpKind::Fire,
        PowerUpKind::Enlarger,
        PowerUpKind::Reducer,
    ];
}

/// A pickup entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: EntityId,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub rect: Rect,
    pub consumed: bool,
}

impl PowerUp {
    /// First contact wins; later calls yield nothing
    pub fn consume(&mut self) -> Option<PowerUpKind> {
        if self.consumed {
            None
        } else {
            self.consumed = true;
            Some(self.kind)
        }
    }
}

/// A ball requested mid-tick, created once the ball pass is over
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallSpawn {
    pub pos: Vec2,
    pub angle: f32,
    pub owner: PlayerSide,
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Ball hit anything; at most once per ball per tick
    BallHit,
    /// Block destroyed
    BlockExplode,
    /// Power-up collected
    PowerUp,
}

/// Notifications for the audio, scoring and presentation layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BallSpawned { ball: EntityId, owner: PlayerSide },
    BallDestroyed { ball: EntityId },
    BallHitWall { ball: EntityId },
    BallHitPaddle { ball: EntityId, paddle: EntityId },
    BallHitBall { ball: EntityId, other: EntityId },
    BallHitBlock { ball: EntityId, block: EntityId, damage: f32 },
    BlockHalfHealth { block: EntityId },
    BlockDestroyed { block: EntityId, owner: PlayerSide },
    PowerUpCollected { power_up: EntityId, kind: PowerUpKind, ball: EntityId },
    EffectExpired { ball: EntityId, effect: String },
    Sound(SoundEffect),
}

/// Complete game state
#[derive(Debug)]
pub struct World {
    pub tuning: Tuning,
    /// Playfield bounds
    pub arena: Rect,
    pub players: [Player; 2],
    /// Active balls (sorted by id)
    pub balls: Vec<Ball>,
    pub paddles: Vec<Paddle>,
    /// Active blocks (sorted by id)
    pub blocks: Vec<Block>,
    pub power_ups: Vec<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub max_particles: usize,
    /// Trail markers kept per ball, 0 disables trails
    pub trail_length: usize,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    next_id: EntityId,
}

impl World {
    /// Create an empty world; use `level::build` to lay out blocks and paddles
    pub fn new(seed: u64, settings: &Settings, tuning: Tuning) -> Self {
        let player = |side| {
            let prefs = settings.player(side);
            Player {
                side,
                name: prefs.name.clone(),
                color: prefs.color,
            }
        };
        Self {
            tuning,
            arena: Rect::new(LEVEL_X, LEVEL_Y, LEVEL_WIDTH, LEVEL_HEIGHT),
            players: [player(PlayerSide::Left), player(PlayerSide::Right)],
            balls: Vec::new(),
            paddles: Vec::new(),
            blocks: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            max_particles: settings.max_particles(),
            trail_length: settings.trail_length(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    pub fn player(&self, side: PlayerSide) -> &Player {
        match side {
            PlayerSide::Left => &self.players[0],
            PlayerSide::Right => &self.players[1],
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn a ball for `owner` with its top-left corner at `pos`
    pub fn spawn_ball(&mut self, pos: Vec2, angle: f32, owner: PlayerSide) -> EntityId {
        let id = self.next_entity_id();
        let ball = Ball::new(id, pos, angle, self.player(owner), &self.tuning.ball);
        log::debug!("Ball {id} spawned for {owner:?} at ({:.1}, {:.1})", pos.x, pos.y);
        self.balls.push(ball);
        self.events.push(GameEvent::BallSpawned { ball: id, owner });
        id
    }

    /// Serve a ball from the player's paddle toward the opponent's half.
    /// Returns `None` if the player has no paddle.
    pub fn serve_ball(&mut self, owner: PlayerSide) -> Option<EntityId> {
        let paddle = self.paddles.iter().find(|p| p.owner == owner)?;
        let width = paddle.rect.width as f32;
        let center_y = paddle.pos.y + paddle.rect.height as f32 / 2.0;
        let (x, angles) = match owner {
            PlayerSide::Left => (paddle.pos.x + width * 2.0, 3.0 * FRAC_PI_2..5.0 * FRAC_PI_2),
            PlayerSide::Right => (paddle.pos.x - width, FRAC_PI_2..3.0 * FRAC_PI_2),
        };
        let angle = self.rng.random_range(angles);
        Some(self.spawn_ball(Vec2::new(x, center_y), angle, owner))
    }

    pub fn spawn_paddle(&mut self, pos: Vec2, owner: PlayerSide) -> EntityId {
        let id = self.next_entity_id();
        let color = self.player(owner).color;
        let tuning = &self.tuning.paddle;
        let paddle = Paddle {
            id,
            owner,
            color,
            pos,
            rect: Rect::at(pos, tuning.width, tuning.height),
            velocity_y: 0.0,
            acceleration: tuning.acceleration,
            retardation: tuning.retardation,
            max_speed: tuning.max_speed,
        };
        self.paddles.push(paddle);
        id
    }

    pub fn spawn_block(&mut self, kind: BlockKind, pos: Vec2, owner: PlayerSide) -> EntityId {
        let id = self.next_entity_id();
        let color = self.player(owner).color;
        let tuning = &self.tuning.block;
        let health = match kind {
            BlockKind::Normal => tuning.normal_health,
            BlockKind::Strong => tuning.strong_health,
        };
        let block = Block {
            id,
            owner,
            color,
            kind,
            pos,
            rect: Rect::at(pos, tuning.width, tuning.height),
            health,
            max_health: health,
            half_health: false,
            flash: None,
            destroyed: false,
        };
        self.blocks.push(block);
        id
    }

    pub fn spawn_power_up(&mut self, kind: PowerUpKind, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let size = self.tuning.power_up.size;
        log::debug!("{kind:?} spawned @ ({:.1}, {:.1})", pos.x, pos.y);
        self.power_ups.push(PowerUp {
            id,
            kind,
            pos,
            rect: Rect::at(pos, size, size),
            consumed: false,
        });
        id
    }

    /// Drop a random power-up somewhere in the middle half of the arena
    pub fn spawn_random_power_up(&mut self) -> EntityId {
        let arena = self.arena;
        let size = self.tuning.power_up.size as f32;
        let quarter = arena.width as f32 / 4.0;
        let x = self
            .rng
            .random_range(arena.left() as f32 + quarter..arena.left() as f32 + 3.0 * quarter);
        let y = self
            .rng
            .random_range(arena.top() as f32..arena.bottom() as f32 - size);
        let kind = PowerUpKind::ALL[self.rng.random_range(0..PowerUpKind::ALL.len())];
        self.spawn_power_up(kind, Vec2::new(x, y))
    }

    /// Destroy a ball and everything attached to it. Returns false if no such
    /// ball is alive.
    pub fn destroy_ball(&mut self, id: EntityId) -> bool {
        let Some(index) = self.balls.iter().position(|b| b.id == id) else {
            return false;
        };
        let mut ball = self.balls.remove(index);
        if ball.destroy() {
            log::debug!("Ball {id} destroyed");
            self.events.push(GameEvent::BallDestroyed { ball: id });
        }
        true
    }

    /// Knock out every block a player owns (they explode at the end of the
    /// next tick). Returns how many were hit.
    pub fn destroy_blocks_of(&mut self, owner: PlayerSide) -> usize {
        let mut count = 0;
        for block in self.blocks.iter_mut().filter(|b| b.owner == owner) {
            block.health = block.health.min(0.0);
            count += 1;
        }
        count
    }

    pub fn balls_owned_by(&self, owner: PlayerSide) -> impl Iterator<Item = &Ball> {
        self.balls.iter().filter(move |b| b.owner == owner)
    }

    pub fn blocks_owned_by(&self, owner: PlayerSide) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(move |b| b.owner == owner)
    }
}
