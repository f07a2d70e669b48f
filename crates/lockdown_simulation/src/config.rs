//! Конфигурация симуляции (RON)
//!
//! Defaults воспроизводят все hardcoded константы архетипов и босса.
//! Hysteresis (1.5×) и boss thresholds (0.6/0.3) вынесены сюда как named
//! constants: кандидаты на тюнинг, но дефолты менять не нужно.

use std::collections::HashMap;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{Archetype, StatBlock};
use crate::error::ConfigError;

/// Главный конфиг combat core
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Множитель hysteresis band (re-entry на range × factor)
    pub hysteresis_factor: f32,
    /// Скорость патруля = speed × factor
    pub patrol_speed_factor: f32,
    /// Waypoint считается достигнутым ближе этой дистанции
    pub waypoint_tolerance: f32,
    /// Допуск готовности cooldown (float drift на fixed step)
    pub cooldown_epsilon: f32,
    /// Override статов по архетипам (иначе базовая таблица)
    pub stat_overrides: HashMap<Archetype, StatBlock>,
    pub boss: BossTuning,
    pub encounter: EncounterLayout,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            hysteresis_factor: 1.5,
            patrol_speed_factor: 0.5,
            waypoint_tolerance: 0.5,
            cooldown_epsilon: 1e-4,
            stat_overrides: HashMap::new(),
            boss: BossTuning::default(),
            encounter: EncounterLayout::default(),
        }
    }
}

/// Тюнинг босса: фазы, щит, паттерны атак
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub phase2_threshold: f32,
    pub phase3_threshold: f32,
    pub phase2_speed: f32,
    pub phase2_damage: f32,
    pub phase3_speed: f32,
    pub phase3_damage: f32,
    /// Входящий урон × multiplier пока щит активен
    pub shield_multiplier: f32,
    pub summon_cooldown: f32,
    pub summon_count: usize,
    /// Telegraph energy beam (секунды между началом и выстрелом)
    pub beam_telegraph: f32,
    pub slam_ring_speed: f32,
    pub slam_band: f32,
    pub slam_max_radius: f32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            phase2_threshold: 0.6,
            phase3_threshold: 0.3,
            phase2_speed: 3.0,
            phase2_damage: 60.0,
            phase3_speed: 4.0,
            phase3_damage: 80.0,
            shield_multiplier: 0.3,
            summon_cooldown: 10.0,
            summon_count: 2,
            beam_telegraph: 0.5,
            slam_ring_speed: 12.0,
            slam_band: 2.0,
            slam_max_radius: 20.0,
        }
    }
}

/// Раскладка уровня для EncounterDirector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterLayout {
    /// Сколько спасённых нужно для открытия выхода
    pub rescue_threshold: u32,
    /// Boss trigger: игрок пересёк z < threshold (после открытия выхода)
    pub boss_trigger_z: f32,
    /// Точка спавна босса `[x, y, z]`
    pub boss_spawn_point: [f32; 3],
}

impl EncounterLayout {
    pub fn boss_spawn(&self) -> Vec3 {
        Vec3::from_array(self.boss_spawn_point)
    }
}

impl Default for EncounterLayout {
    fn default() -> Self {
        Self {
            rescue_threshold: 3,
            boss_trigger_z: -60.0,
            boss_spawn_point: [0.0, 0.0, -80.0],
        }
    }
}

impl SimulationConfig {
    /// Статы архетипа с учётом override
    pub fn stats_for(&self, archetype: Archetype) -> StatBlock {
        self.stat_overrides
            .get(&archetype)
            .copied()
            .unwrap_or_else(|| archetype.base_stats())
    }

    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = ron::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_ron_str(&contents)?;
        crate::log_info(&format!("Loaded simulation config from {}", path.display()));
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.hysteresis_factor >= 1.0) {
            return Err(invalid(format!(
                "hysteresis_factor must be >= 1.0, got {}",
                self.hysteresis_factor
            )));
        }

        let non_negative = [
            ("patrol_speed_factor", self.patrol_speed_factor),
            ("waypoint_tolerance", self.waypoint_tolerance),
            ("cooldown_epsilon", self.cooldown_epsilon),
            ("boss.phase2_speed", self.boss.phase2_speed),
            ("boss.phase2_damage", self.boss.phase2_damage),
            ("boss.phase3_speed", self.boss.phase3_speed),
            ("boss.phase3_damage", self.boss.phase3_damage),
            ("boss.shield_multiplier", self.boss.shield_multiplier),
            ("boss.summon_cooldown", self.boss.summon_cooldown),
            ("boss.beam_telegraph", self.boss.beam_telegraph),
            ("boss.slam_ring_speed", self.boss.slam_ring_speed),
            ("boss.slam_band", self.boss.slam_band),
            ("boss.slam_max_radius", self.boss.slam_max_radius),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{} must be non-negative, got {}", name, value)));
            }
        }

        let thresholds = (self.boss.phase2_threshold, self.boss.phase3_threshold);
        if !(0.0 < thresholds.1 && thresholds.1 < thresholds.0 && thresholds.0 < 1.0) {
            return Err(invalid(format!(
                "boss thresholds must satisfy 0 < phase3 < phase2 < 1, got {:?}",
                thresholds
            )));
        }

        for (archetype, block) in &self.stat_overrides {
            block
                .validate()
                .map_err(|e| invalid(format!("{}: {}", archetype.name(), e)))?;
        }

        Ok(())
    }
}

fn invalid(reason: String) -> ConfigError {
    ConfigError::Invalid { reason }
}
