//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed group order per tick
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod blocks;
pub mod collision;
pub mod effects;
pub mod level;
pub mod particle;
pub mod physics;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{Side, classify_side, radial_angles};
pub use effects::{BallEffect, DoubleSpeed, Fire, Flash, Resize};
pub use particle::Particle;
pub use rect::Rect;
pub use state::{
    Ball, BallStats, Block, BlockKind, Color, EntityId, GameEvent, Paddle, PaddleInput, Player,
    PlayerSide, PowerUp, PowerUpKind, SoundEffect, World,
};
pub use tick::{TickInput, tick};
