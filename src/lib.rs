//! mBreak - a two-player Pong/Breakout arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, collisions, world state)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player and presentation preferences
//! - `error`: Configuration errors

pub mod error;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Scales the graphics of the game while keeping movement smooth
    pub const GAME_SCALE: i32 = 2;

    /// Window dimensions
    pub const SCREEN_WIDTH: i32 = 285 * GAME_SCALE;
    pub const SCREEN_HEIGHT: i32 = 160 * GAME_SCALE;

    /// Playfield dimensions, centered on the screen
    pub const LEVEL_WIDTH: i32 = 176 * GAME_SCALE;
    pub const LEVEL_HEIGHT: i32 = 120 * GAME_SCALE;
    pub const LEVEL_X: i32 = (SCREEN_WIDTH - LEVEL_WIDTH) / 2;
    pub const LEVEL_Y: i32 = (SCREEN_HEIGHT - LEVEL_HEIGHT) / 2;
    pub const LEVEL_MAX_X: i32 = LEVEL_X + LEVEL_WIDTH;
    pub const LEVEL_MAX_Y: i32 = LEVEL_Y + LEVEL_HEIGHT;

    /// Nominal frame time of the 60 FPS clock, in milliseconds
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
}

/// Normalize angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Unit direction vector for an angle (y grows downward on screen)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
