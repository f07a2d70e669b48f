//! Базовые компоненты акторов: Enemy, Health, CombatStats, Attacker, Facing

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{CombatError, CombatResult};

/// Архетип врага (tagged variant вместо наследования)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize)]
pub enum Archetype {
    Guard,
    Drone,
    Turret,
    Mech,
    ScientistZombie,
    Boss,
}

impl Archetype {
    pub const ALL: [Archetype; 6] = [
        Archetype::Guard,
        Archetype::Drone,
        Archetype::Turret,
        Archetype::Mech,
        Archetype::ScientistZombie,
        Archetype::Boss,
    ];

    /// Базовая таблица статов (hp/dmg/spd/detect/atkRange/fireRate)
    pub fn base_stats(&self) -> StatBlock {
        match self {
            Archetype::Guard => StatBlock::new(150.0, 25.0, 3.0, 12.0, 2.5, 1.5),
            Archetype::Drone => StatBlock::new(80.0, 15.0, 5.0, 20.0, 10.0, 1.5),
            Archetype::Turret => StatBlock::new(200.0, 20.0, 0.0, 25.0, 25.0, 0.15),
            Archetype::Mech => StatBlock::new(500.0, 50.0, 1.5, 18.0, 15.0, 1.5),
            // fire_rate зомби = пауза между рывками
            Archetype::ScientistZombie => StatBlock::new(60.0, 15.0, 5.0, 10.0, 2.0, 2.0),
            Archetype::Boss => StatBlock::new(2000.0, 40.0, 2.0, 30.0, 20.0, 1.5),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Guard => "Guard",
            Archetype::Drone => "Drone",
            Archetype::Turret => "Turret",
            Archetype::Mech => "Mech",
            Archetype::ScientistZombie => "ScientistZombie",
            Archetype::Boss => "Boss",
        }
    }
}

/// Статы архетипа (из таблицы или override из `SimulationConfig`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    pub max_health: f32,
    pub damage: f32,
    pub speed: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    /// Cooldown между атаками (секунды)
    pub fire_rate: f32,
}

impl StatBlock {
    pub const fn new(
        max_health: f32,
        damage: f32,
        speed: f32,
        detection_range: f32,
        attack_range: f32,
        fire_rate: f32,
    ) -> Self {
        Self {
            max_health,
            damage,
            speed,
            detection_range,
            attack_range,
            fire_rate,
        }
    }

    /// Отклоняет отрицательные/нечисловые значения до спавна актора
    pub fn validate(&self) -> CombatResult<()> {
        let fields = [
            ("max_health", self.max_health),
            ("damage", self.damage),
            ("speed", self.speed),
            ("detection_range", self.detection_range),
            ("attack_range", self.attack_range),
            ("fire_rate", self.fire_rate),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(CombatError::InvalidConfiguration {
                    reason: format!("{} must be a non-negative number, got {}", name, value),
                });
            }
        }

        if self.max_health <= 0.0 {
            return Err(CombatError::InvalidConfiguration {
                reason: format!("max_health must be positive, got {}", self.max_health),
            });
        }

        Ok(())
    }
}

/// Маркер врага + его архетип
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Enemy {
    pub archetype: Archetype,
}

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max. Мутируется только через `combat::health`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Доля здоровья 0.0..=1.0 (для HUD и boss phase thresholds)
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }
}

/// Боевые статы (boss фазы меняют speed/damage на лету)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CombatStats {
    pub damage: f32,
    pub speed: f32,
    pub detection_range: f32,
    pub attack_range: f32,
}

impl From<&StatBlock> for CombatStats {
    fn from(block: &StatBlock) -> Self {
        Self {
            damage: block.damage,
            speed: block.speed,
            detection_range: block.detection_range,
            attack_range: block.attack_range,
        }
    }
}

/// Attacker: cooldown gate для `attack()`
///
/// Инвариант: cooldown ≥ 0, уменьшается каждый тик.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Attacker {
    /// Cooldown после атаки (секунды)
    pub fire_rate: f32,
    /// Текущий таймер (уменьшается до 0)
    pub cooldown: f32,
}

impl Attacker {
    pub fn new(fire_rate: f32) -> Self {
        Self {
            fire_rate,
            cooldown: 0.0,
        }
    }

    /// Готов атаковать (с sub-tick допуском на дрейф f32)
    pub fn can_attack(&self, epsilon: f32) -> bool {
        self.cooldown <= epsilon
    }

    /// Сбросить cooldown после атаки
    pub fn start_attack(&mut self) {
        self.cooldown = self.fire_rate;
    }
}

/// Направление взгляда (yaw, радианы; 0 = +Z)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Facing {
    pub yaw: f32,
}
