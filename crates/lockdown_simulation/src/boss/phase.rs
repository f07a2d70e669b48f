//! Boss phase controller: фазы 1 → 2 → 3 по порогам здоровья.
//!
//! Фаза монотонна. Щит (фаза 3): модификатор входящего урона перед
//! health model, не отдельный пул здоровья.

use bevy::prelude::*;

use crate::ai::{AIState, ArchetypeState};
use crate::bridge::{EffectKind, EffectParams, VisualCommand};
use crate::components::{CombatStats, Health};
use crate::config::BossTuning;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossEncounter {
    /// 1 | 2 | 3, только растёт
    pub phase: u8,
    pub shield_active: bool,
    /// Round-robin индекс паттерна атаки (0 beam, 1 slam, 2 summon)
    pub attack_pattern: u8,
    pub summon_cooldown: f32,
}

impl Default for BossEncounter {
    fn default() -> Self {
        Self {
            phase: 1,
            shield_active: false,
            attack_pattern: 0,
            summon_cooldown: 0.0,
        }
    }
}

/// Событие: босс перешёл в новую фазу (данные для boss bar в HUD)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct BossPhaseChanged {
    pub entity: Entity,
    pub from: u8,
    pub to: u8,
    pub shield_active: bool,
}

/// Следующая фаза. Не больше одного шага за вызов.
pub fn next_phase(phase: u8, health_fraction: f32, tuning: &BossTuning) -> u8 {
    match phase {
        1 if health_fraction < tuning.phase2_threshold => 2,
        2 if health_fraction < tuning.phase3_threshold => 3,
        _ => phase,
    }
}

/// Урон после щита
pub fn incoming_damage(encounter: &BossEncounter, raw: f32, tuning: &BossTuning) -> f32 {
    if encounter.shield_active {
        raw * tuning.shield_multiplier
    } else {
        raw
    }
}

/// Войти в фазу: статы + щит
pub fn enter_phase(encounter: &mut BossEncounter, stats: &mut CombatStats, phase: u8, tuning: &BossTuning) {
    encounter.phase = phase;
    match phase {
        2 => {
            stats.speed = tuning.phase2_speed;
            stats.damage = tuning.phase2_damage;
        }
        3 => {
            stats.speed = tuning.phase3_speed;
            stats.damage = tuning.phase3_damage;
            encounter.shield_active = true;
        }
        _ => {}
    }
}

/// System: проверка порогов каждый тик (после входящего урона)
pub fn check_boss_phases(
    mut bosses: Query<(Entity, &Health, &AIState, &Transform, &mut ArchetypeState, &mut CombatStats)>,
    config: Res<crate::config::SimulationConfig>,
    mut phase_events: EventWriter<BossPhaseChanged>,
    mut visuals: EventWriter<VisualCommand>,
) {
    for (entity, health, state, transform, mut kind, mut stats) in bosses.iter_mut() {
        if state.is_dead() {
            continue;
        }
        let Some(current) = kind.boss() else {
            continue;
        };

        let fraction = health.fraction();
        if next_phase(current.phase, fraction, &config.boss) == current.phase {
            continue;
        }

        let ArchetypeState::Boss(encounter) = &mut *kind else {
            continue;
        };
        // Все пересечённые пороги в этой же проверке: щит должен стоять до следующего попадания
        loop {
            let from = encounter.phase;
            let to = next_phase(from, fraction, &config.boss);
            if to == from {
                break;
            }
            enter_phase(encounter, &mut stats, to, &config.boss);

            phase_events.write(BossPhaseChanged {
                entity,
                from,
                to,
                shield_active: encounter.shield_active,
            });
            visuals.write(VisualCommand::Effect {
                kind: EffectKind::PhaseShift,
                position: transform.translation,
                params: EffectParams::scaled(to as f32),
            });
            if encounter.shield_active {
                visuals.write(VisualCommand::Effect {
                    kind: EffectKind::ShieldUp,
                    position: transform.translation,
                    params: EffectParams::default(),
                });
            }

            crate::log_info(&format!(
                "👹 Boss {:?}: phase {} → {} (hp {:.0}/{:.0}, shield: {})",
                entity, from, to, health.current, health.max, encounter.shield_active
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Archetype;

    #[test]
    fn test_phase_thresholds() {
        let tuning = BossTuning::default();
        assert_eq!(next_phase(1, 0.61, &tuning), 1);
        assert_eq!(next_phase(1, 0.6, &tuning), 1);
        assert_eq!(next_phase(1, 0.59, &tuning), 2);
        assert_eq!(next_phase(2, 0.31, &tuning), 2);
        assert_eq!(next_phase(2, 0.29, &tuning), 3);
        assert_eq!(next_phase(3, 0.0, &tuning), 3);
    }

    #[test]
    fn test_phase_advances_one_step_per_check() {
        let tuning = BossTuning::default();
        // Один большой удар до 10%: сначала 2, потом 3
        assert_eq!(next_phase(1, 0.1, &tuning), 2);
        assert_eq!(next_phase(2, 0.1, &tuning), 3);
    }

    #[test]
    fn test_phase_never_regresses() {
        let tuning = BossTuning::default();
        // Здоровье снова выше порога (лечение): фаза остаётся
        assert_eq!(next_phase(2, 0.95, &tuning), 2);
        assert_eq!(next_phase(3, 0.95, &tuning), 3);
    }

    #[test]
    fn test_enter_phase_scales_stats() {
        let tuning = BossTuning::default();
        let mut encounter = BossEncounter::default();
        let mut stats = CombatStats::from(&Archetype::Boss.base_stats());

        enter_phase(&mut encounter, &mut stats, 2, &tuning);
        assert_eq!((stats.speed, stats.damage), (3.0, 60.0));
        assert!(!encounter.shield_active);

        enter_phase(&mut encounter, &mut stats, 3, &tuning);
        assert_eq!((stats.speed, stats.damage), (4.0, 80.0));
        assert!(encounter.shield_active);
    }

    #[test]
    fn test_shield_multiplier() {
        let tuning = BossTuning::default();
        let mut encounter = BossEncounter::default();
        assert_eq!(incoming_damage(&encounter, 100.0, &tuning), 100.0);

        encounter.shield_active = true;
        assert!((incoming_damage(&encounter, 100.0, &tuning) - 30.0).abs() < 1e-4);
    }
}
