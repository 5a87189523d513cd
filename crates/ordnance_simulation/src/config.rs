//! Tuning конфиг из RON
//!
//! Все параметры с `#[serde(default)]`: в файле достаточно указать только
//! то, что отличается от дефолтов. После парсинга — `validate()`.

use std::fmt;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::EnemyConfig;
use crate::combat::{BlastConfig, MineConfig};
use crate::input::KeyLayout;
use crate::physics::PhysicsSettings;
use crate::player::PlayerConfig;

/// Ошибка загрузки конфига
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "config io error: {}", err),
            ConfigError::Parse(err) => write!(f, "config parse error: {}", err),
            ConfigError::Invalid(reason) => write!(f, "invalid config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(err: ron::error::SpannedError) -> Self {
        ConfigError::Parse(err)
    }
}

/// Весь tuning игры
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    pub key_layout: KeyLayout,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub mine: MineConfig,
    pub physics: PhysicsSettings,
}

impl GameTuning {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let tuning: GameTuning = ron::from_str(source)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let enemy = &self.enemy;
        if enemy.lose_radius <= enemy.detection_radius {
            return Err(ConfigError::Invalid(format!(
                "enemy.lose_radius ({}) must be greater than detection_radius ({})",
                enemy.lose_radius, enemy.detection_radius
            )));
        }
        if enemy.min_throw_range > enemy.max_throw_range {
            return Err(ConfigError::Invalid(format!(
                "enemy.min_throw_range ({}) is greater than max_throw_range ({})",
                enemy.min_throw_range, enemy.max_throw_range
            )));
        }

        let camera = &self.player.camera;
        if camera.min_pitch > camera.max_pitch {
            return Err(ConfigError::Invalid(format!(
                "camera.min_pitch ({}) is greater than max_pitch ({})",
                camera.min_pitch, camera.max_pitch
            )));
        }

        if self.physics.gravity <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "physics.gravity must be positive, got {}",
                self.physics.gravity
            )));
        }

        let blasts = [
            ("mine", Some(&self.mine.blast)),
            ("player grenade", self.player.throw.grenade.as_ref().map(|g| &g.blast)),
            ("enemy grenade", enemy.grenade.as_ref().map(|g| &g.blast)),
        ];
        for (name, blast) in blasts {
            if let Some(blast) = blast {
                validate_blast(name, blast)?;
            }
        }

        Ok(())
    }
}

fn validate_blast(name: &str, blast: &BlastConfig) -> Result<(), ConfigError> {
    if blast.radius <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "{} explosion radius must be positive, got {}",
            name, blast.radius
        )));
    }
    Ok(())
}
