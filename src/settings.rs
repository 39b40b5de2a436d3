//! Game settings and preferences
//!
//! Reading and writing the settings file is the front end's job; this module
//! only defines the resolved values and their JSON form.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::{Color, PlayerSide};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 256,
            QualityPreset::High => 1024,
        }
    }

    /// Trail markers kept per ball
    pub fn trail_length(&self) -> usize {
        match self {
            QualityPreset::Low => 5,
            QualityPreset::Medium => 12,
            QualityPreset::High => 20,
        }
    }
}

/// Per-player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub name: String,
    pub color: Color,
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player_left: PlayerSettings,
    pub player_right: PlayerSettings,

    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Ball trails
    pub traces: bool,
    /// Hit particles
    pub particles: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_left: PlayerSettings {
                name: "Player Left".to_string(),
                color: Color::rgb(255, 96, 64),
            },
            player_right: PlayerSettings {
                name: "Player Right".to_string(),
                color: Color::rgb(64, 160, 255),
            },
            quality: QualityPreset::Medium,
            traces: true,
            particles: true,
        }
    }
}

impl Settings {
    /// Preferences of one player
    pub fn player(&self, side: PlayerSide) -> &PlayerSettings {
        match side {
            PlayerSide::Left => &self.player_left,
            PlayerSide::Right => &self.player_right,
        }
    }

    /// Effective particle cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective trail length
    pub fn trail_length(&self) -> usize {
        if !self.traces {
            0
        } else {
            self.quality.trail_length()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        for side in [PlayerSide::Left, PlayerSide::Right] {
            if settings.player(side).name.trim().is_empty() {
                return Err(ConfigError::invalid("player.name", "must not be empty"));
            }
        }
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
