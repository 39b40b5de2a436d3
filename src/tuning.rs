//! Data-driven game balance
//!
//! Every physics constant the simulation reads lives here. Defaults match the
//! shipped game at `GAME_SCALE`; a JSON file may override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::GAME_SCALE;
use crate::error::ConfigError;

const SCALE: f32 = GAME_SCALE as f32;

/// Ball balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallTuning {
    pub width: i32,
    pub height: i32,
    /// Starting speed (pixels per tick)
    pub speed: f32,
    pub max_speed: f32,
    /// Damage dealt to blocks of the other player (own blocks take half)
    pub damage: f32,
    /// How strongly paddle velocity bends the ball's angle
    pub spin_angle_strength: f32,
    /// Half-width of the forbidden band around straight up/down (radians)
    pub least_allowed_vertical_angle: f32,
    /// Milliseconds between trail markers
    pub trace_spawn_rate_ms: f32,
    /// Particles spawned on every hit
    pub particle_spawn_amount: u32,
}

impl Default for BallTuning {
    fn default() -> Self {
        Self {
            width: 4 * GAME_SCALE,
            height: 4 * GAME_SCALE,
            speed: 1.0 * SCALE,
            max_speed: 3.0 * SCALE,
            damage: 10.0,
            spin_angle_strength: 0.09,
            least_allowed_vertical_angle: 0.21,
            trace_spawn_rate_ms: 32.0,
            particle_spawn_amount: 3,
        }
    }
}

/// Paddle balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleTuning {
    pub width: i32,
    pub height: i32,
    pub acceleration: f32,
    pub retardation: f32,
    pub max_speed: f32,
}

impl Default for PaddleTuning {
    fn default() -> Self {
        Self {
            width: 4 * GAME_SCALE,
            height: 24 * GAME_SCALE,
            acceleration: 0.75 * SCALE,
            retardation: 2.0 * SCALE,
            max_speed: 2.0 * SCALE,
        }
    }
}

/// Block balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockTuning {
    pub width: i32,
    pub height: i32,
    pub normal_health: f32,
    pub strong_health: f32,
    /// Particles spawned when a block is damaged
    pub particle_spawn_amount: u32,
    /// Alpha lost per tick by the white hit flash
    pub flash_fade_step: f32,
}

impl Default for BlockTuning {
    fn default() -> Self {
        Self {
            width: 8 * GAME_SCALE,
            height: 12 * GAME_SCALE,
            normal_health: 20.0,
            strong_health: 40.0,
            particle_spawn_amount: 4,
            flash_fade_step: 15.0,
        }
    }
}

/// Power-up balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTuning {
    pub size: i32,
    pub double_speed_duration_ms: f32,
    pub fire_duration_ms: f32,
    /// Damage multiplier while a ball is on fire
    pub fire_damage_factor: f32,
    pub enlarger_duration_ms: f32,
    /// Size multiplier of an enlarged ball
    pub enlarger_factor: f32,
    pub reducer_duration_ms: f32,
    /// Size multiplier of a reduced ball
    pub reducer_factor: f32,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            size: 8 * GAME_SCALE,
            double_speed_duration_ms: 8000.0,
            fire_duration_ms: 6000.0,
            fire_damage_factor: 2.0,
            enlarger_duration_ms: 8000.0,
            enlarger_factor: 2.0,
            reducer_duration_ms: 8000.0,
            reducer_factor: 0.5,
        }
    }
}

/// Decorative particle values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    /// Random spread around the ball's heading (radians)
    pub angle_jitter: f32,
    pub alpha_step: f32,
    pub block_particle_size: f32,
    pub block_particle_speed: f32,
    pub block_particle_retardation: f32,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            angle_jitter: 0.20,
            alpha_step: 5.0,
            block_particle_size: 0.75 * SCALE,
            block_particle_speed: 2.5 * SCALE,
            block_particle_retardation: 0.125 * SCALE,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub ball: BallTuning,
    pub paddle: PaddleTuning,
    pub block: BlockTuning,
    pub power_up: PowerUpTuning,
    pub particle: ParticleTuning,
}

impl Tuning {
    /// Parse and validate a tuning table from JSON (missing fields keep defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning table from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("ball.width", self.ball.width),
            ("ball.height", self.ball.height),
            ("paddle.width", self.paddle.width),
            ("paddle.height", self.paddle.height),
            ("block.width", self.block.width),
            ("block.height", self.block.height),
            ("power_up.size", self.power_up.size),
        ];
        for (field, value) in sizes {
            if value <= 0 {
                return Err(ConfigError::invalid(field, format!("must be positive, got {value}")));
            }
        }

        let positive = [
            ("ball.speed", self.ball.speed),
            ("ball.max_speed", self.ball.max_speed),
            ("ball.trace_spawn_rate_ms", self.ball.trace_spawn_rate_ms),
            ("paddle.max_speed", self.paddle.max_speed),
            ("block.normal_health", self.block.normal_health),
            ("block.strong_health", self.block.strong_health),
            ("power_up.double_speed_duration_ms", self.power_up.double_speed_duration_ms),
            ("power_up.fire_duration_ms", self.power_up.fire_duration_ms),
            ("power_up.fire_damage_factor", self.power_up.fire_damage_factor),
            ("power_up.enlarger_duration_ms", self.power_up.enlarger_duration_ms),
            ("power_up.enlarger_factor", self.power_up.enlarger_factor),
            ("power_up.reducer_duration_ms", self.power_up.reducer_duration_ms),
            ("power_up.reducer_factor", self.power_up.reducer_factor),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(field, format!("must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("ball.damage", self.ball.damage),
            ("ball.spin_angle_strength", self.ball.spin_angle_strength),
            ("paddle.acceleration", self.paddle.acceleration),
            ("paddle.retardation", self.paddle.retardation),
            ("block.flash_fade_step", self.block.flash_fade_step),
            ("particle.angle_jitter", self.particle.angle_jitter),
            ("particle.alpha_step", self.particle.alpha_step),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(field, format!("must not be negative, got {value}")));
            }
        }

        let band = self.ball.least_allowed_vertical_angle;
        if !(0.0..std::f32::consts::FRAC_PI_4).contains(&band) {
            return Err(ConfigError::invalid(
                "ball.least_allowed_vertical_angle",
                format!("must lie in [0, π/4), got {band}"),
            ));
        }

        if self.ball.speed > self.ball.max_speed {
            return Err(ConfigError::invalid(
                "ball.speed",
                "starting speed exceeds max_speed",
            ));
        }

        Ok(())
    }
}
