//! Damage flow: входящие попадания по акторам, смерть, журнал урона.
//!
//! Порядок для одного попадания:
//! 1. Boss shield modifier (до health model)
//! 2. `health::apply_damage`
//! 3. DamageDealt / EntityDied события + запись в CombatLog
//! 4. На смерти: Dead state, отмена таймеров, death sequence

use std::collections::VecDeque;

use bevy::prelude::*;

use super::health::apply_damage;
use crate::ai::{AIState, ArchetypeState, StateChanged};
use crate::boss::incoming_damage;
use crate::components::{Archetype, Enemy, Health};
use crate::config::SimulationConfig;
use crate::error::CombatError;
use crate::timers::{PendingAction, ScheduledActions, SimulationClock};

/// Попадание по актору от хоста (оружие игрока, ловушки)
#[derive(Event, Debug, Clone, Copy)]
pub struct ActorHit {
    pub source: Option<Entity>,
    pub target: Entity,
    /// Сырой урон до модификаторов
    pub amount: f32,
}

/// Кому нанесён урон
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageTarget {
    Player,
    Actor(Entity),
}

/// Способ атаки (для журнала и эффектов попадания)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackKind {
    Melee,
    Laser,
    TurretShot,
    /// Ракета меха; `traveled`: пройденная дистанция на момент попадания
    Rocket { traveled: f32 },
    Claw,
    EnergyBeam,
    GroundSlam,
    /// Внешнее попадание (оружие игрока)
    Weapon,
}

/// Событие: урон нанесён (DamageEvent)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub source: Option<Entity>,
    pub target: DamageTarget,
    /// Урон после модификаторов
    pub amount: f32,
    /// Секунды симуляции
    pub timestamp: f32,
    pub kind: AttackKind,
}

/// Событие: актор умер (ровно один раз на актора)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub archetype: Archetype,
    pub killer: Option<Entity>,
}

/// Урон по игроку: хост применяет к своему health model (`onPlayerDamaged`)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerDamaged {
    pub amount: f32,
    pub source: Entity,
    pub kind: AttackKind,
}

/// Журнал урона и смертей текущего уровня
///
/// Ограничен `CAPACITY` записями на журнал: старые вытесняются.
/// Сбрасывается в `dispose_encounter`.
#[derive(Resource, Debug, Default)]
pub struct CombatLog {
    pub damage: VecDeque<DamageDealt>,
    pub deaths: VecDeque<EntityDied>,
}

impl CombatLog {
    pub const CAPACITY: usize = 4096;

    pub fn record_damage(&mut self, event: DamageDealt) {
        push_bounded(&mut self.damage, event);
    }

    pub fn record_death(&mut self, event: EntityDied) {
        push_bounded(&mut self.deaths, event);
    }

    pub fn player_hits(&self) -> impl Iterator<Item = &DamageDealt> {
        self.damage
            .iter()
            .filter(|event| event.target == DamageTarget::Player)
    }

    pub fn hits_from(&self, source: Entity) -> impl Iterator<Item = &DamageDealt> {
        self.damage
            .iter()
            .filter(move |event| event.source == Some(source))
    }

    pub fn total_player_damage(&self) -> f32 {
        self.player_hits().map(|event| event.amount).sum()
    }

    pub fn clear(&mut self) {
        self.damage.clear();
        self.deaths.clear();
    }
}

fn push_bounded<T>(entries: &mut VecDeque<T>, entry: T) {
    if entries.len() >= CombatLog::CAPACITY {
        entries.pop_front();
    }
    entries.push_back(entry);
}

/// Death sequence архетипа: (задержка, действие).
/// Последним всегда идёт `Dispose`.
pub fn death_sequence(archetype: Archetype) -> Vec<(f32, PendingAction)> {
    match archetype {
        // Многоступенчатый взрыв перед финальным disposal
        Archetype::Boss => {
            let mut sequence: Vec<_> = (0..5)
                .map(|stage| {
                    (
                        stage as f32 * 0.4,
                        PendingAction::DeathBlast {
                            stage,
                            scale: 2.0 + stage as f32,
                        },
                    )
                })
                .collect();
            sequence.push((2.5, PendingAction::Dispose));
            sequence
        }
        Archetype::Mech => vec![
            (0.0, PendingAction::DeathBlast { stage: 0, scale: 2.0 }),
            (0.3, PendingAction::DeathBlast { stage: 1, scale: 3.0 }),
            (1.5, PendingAction::Dispose),
        ],
        Archetype::Drone | Archetype::Turret => vec![
            (0.0, PendingAction::DeathBlast { stage: 0, scale: 1.0 }),
            (0.5, PendingAction::Dispose),
        ],
        // Death анимация
        Archetype::Guard | Archetype::ScientistZombie => vec![(2.0, PendingAction::Dispose)],
    }
}

/// System: ActorHit → Health (+ смерть)
pub fn apply_actor_hits(
    mut hits: EventReader<ActorHit>,
    mut actors: Query<(
        &Enemy,
        &mut Health,
        &mut AIState,
        &mut ScheduledActions,
        Option<&ArchetypeState>,
    )>,
    config: Res<SimulationConfig>,
    clock: Res<SimulationClock>,
    mut log: ResMut<CombatLog>,
    mut damage_dealt: EventWriter<DamageDealt>,
    mut entity_died: EventWriter<EntityDied>,
    mut transitions: EventWriter<StateChanged>,
) {
    for hit in hits.read() {
        let Ok((enemy, mut health, mut state, mut scheduled, kind)) = actors.get_mut(hit.target) else {
            crate::log_warning(&format!(
                "⚠️ {}",
                CombatError::InvalidActorReference(hit.target)
            ));
            continue;
        };

        let amount = match kind {
            Some(ArchetypeState::Boss(boss)) => incoming_damage(boss, hit.amount, &config.boss),
            _ => hit.amount,
        };

        let outcome = match apply_damage(hit.target, &mut health, amount) {
            Ok(outcome) => outcome,
            // Добивание трупа: тихий no-op
            Err(CombatError::AlreadyDead(_)) => continue,
            Err(e) => {
                crate::log_warning(&format!("⚠️ {}", e));
                continue;
            }
        };

        let event = DamageDealt {
            source: hit.source,
            target: DamageTarget::Actor(hit.target),
            amount,
            timestamp: clock.elapsed,
            kind: AttackKind::Weapon,
        };
        damage_dealt.write(event);
        log.record_damage(event);

        if !outcome.died {
            continue;
        }

        let previous = *state;
        *state = AIState::Dead;
        transitions.write(StateChanged {
            entity: hit.target,
            archetype: enemy.archetype,
            from: previous,
            to: AIState::Dead,
        });

        let died = EntityDied {
            entity: hit.target,
            archetype: enemy.archetype,
            killer: hit.source,
        };
        entity_died.write(died);
        log.record_death(died);

        // Незавершённые атаки умирают вместе с актором
        scheduled.cancel_all();
        for (delay, action) in death_sequence(enemy.archetype) {
            scheduled.schedule(delay, action);
        }

        crate::log_info(&format!(
            "💀 {} {:?} died (killer: {:?})",
            enemy.archetype.name(),
            hit.target,
            hit.source
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_death_sequence_ends_with_dispose() {
        for archetype in Archetype::ALL {
            let sequence = death_sequence(archetype);
            let (last_delay, last) = sequence.last().cloned().unwrap();
            assert_eq!(last, PendingAction::Dispose, "{:?}", archetype);
            assert!(sequence.iter().all(|(delay, _)| *delay <= last_delay));
        }
    }

    #[test]
    fn test_boss_death_is_multi_stage() {
        let blasts = death_sequence(Archetype::Boss)
            .into_iter()
            .filter(|(_, action)| matches!(action, PendingAction::DeathBlast { .. }))
            .count();
        assert!(blasts >= 3);
    }

    #[test]
    fn test_combat_log_filters() {
        let source = Entity::from_raw(7);
        let mut log = CombatLog::default();
        log.record_damage(DamageDealt {
            source: Some(source),
            target: DamageTarget::Player,
            amount: 20.0,
            timestamp: 0.5,
            kind: AttackKind::TurretShot,
        });
        log.record_damage(DamageDealt {
            source: None,
            target: DamageTarget::Actor(source),
            amount: 35.0,
            timestamp: 0.6,
            kind: AttackKind::Weapon,
        });

        assert_eq!(log.player_hits().count(), 1);
        assert_eq!(log.hits_from(source).count(), 1);
        assert_eq!(log.total_player_damage(), 20.0);

        log.clear();
        assert!(log.damage.is_empty());
    }

    #[test]
    fn test_combat_log_drops_oldest_when_full() {
        let mut log = CombatLog::default();
        for i in 0..CombatLog::CAPACITY + 3 {
            log.record_damage(DamageDealt {
                source: None,
                target: DamageTarget::Player,
                amount: 1.0,
                timestamp: i as f32,
                kind: AttackKind::TurretShot,
            });
        }

        assert_eq!(log.damage.len(), CombatLog::CAPACITY);
        assert_eq!(log.damage.front().map(|event| event.timestamp), Some(3.0));
        assert_eq!(
            log.damage.back().map(|event| event.timestamp),
            Some((CombatLog::CAPACITY + 2) as f32)
        );
    }
}
