//! Combat intents: что поведение архетипа хочет сделать в этом тике.
//!
//! Поведения: чистые функции, возвращают `Vec<CombatIntent>`.
//! `CombatOutput` применяет их к миру (события, спавн снарядов, таймеры).

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::damage::{AttackKind, CombatLog, DamageDealt, DamageTarget, PlayerDamaged};
use super::projectile::{OwnedBy, Projectile};
use super::shockwave::Shockwave;
use crate::bridge::{EffectKind, EffectParams, VisualCommand};
use crate::components::Archetype;
use crate::config::SimulationConfig;
use crate::encounter::enemy_bundle;
use crate::player::PlayerSnapshot;
use crate::timers::{PendingAction, ScheduledActions, SimulationClock};

/// Намерение атаки/эффекта от поведения архетипа
#[derive(Debug, Clone, PartialEq)]
pub enum CombatIntent {
    /// Мгновенное попадание по игроку (melee, laser, turret)
    StrikePlayer { amount: f32, kind: AttackKind },
    /// Самонаводящаяся ракета к текущей позиции игрока
    LaunchRocket { origin: Vec3, damage: f32 },
    /// Отложенное действие в очередь актора
    Schedule { delay: f32, action: PendingAction },
    /// Расширяющееся кольцо ground slam
    Shockwave { origin: Vec3, damage: f32 },
    Summon { archetype: Archetype, position: Vec3 },
    Visual(VisualCommand),
}

impl CombatIntent {
    pub fn effect(kind: EffectKind, position: Vec3, params: EffectParams) -> Self {
        CombatIntent::Visual(VisualCommand::Effect {
            kind,
            position,
            params,
        })
    }
}

/// SystemParam: всё, что нужно для применения intents
#[derive(SystemParam)]
pub struct CombatOutput<'w, 's> {
    commands: Commands<'w, 's>,
    player: Res<'w, PlayerSnapshot>,
    clock: Res<'w, SimulationClock>,
    config: Res<'w, SimulationConfig>,
    log: ResMut<'w, CombatLog>,
    player_damaged: EventWriter<'w, PlayerDamaged>,
    damage_dealt: EventWriter<'w, DamageDealt>,
    visuals: EventWriter<'w, VisualCommand>,
}

impl CombatOutput<'_, '_> {
    pub fn player(&self) -> PlayerSnapshot {
        *self.player
    }

    /// Попадание по игроку. false: игрок отсутствует, notarget или неуязвим.
    pub fn strike_player(&mut self, source: Entity, amount: f32, kind: AttackKind) -> bool {
        if !self.player.can_be_damaged() {
            return false;
        }

        self.player_damaged.write(PlayerDamaged {
            amount,
            source,
            kind,
        });

        let event = DamageDealt {
            source: Some(source),
            target: DamageTarget::Player,
            amount,
            timestamp: self.clock.elapsed,
            kind,
        };
        self.damage_dealt.write(event);
        self.log.record_damage(event);
        true
    }

    pub fn visual(&mut self, command: VisualCommand) {
        self.visuals.write(command);
    }

    pub fn effect(&mut self, kind: EffectKind, position: Vec3, params: EffectParams) {
        self.visual(VisualCommand::Effect {
            kind,
            position,
            params,
        });
    }

    /// Удалить entity из симуляции и сообщить renderer'у
    pub fn dispose(&mut self, entity: Entity) {
        self.commands.entity(entity).try_despawn();
        self.visual(VisualCommand::Dispose { entity });
    }

    /// Применить intents актора `source`
    pub fn apply(
        &mut self,
        source: Entity,
        intents: Vec<CombatIntent>,
        scheduled: &mut ScheduledActions,
    ) {
        for intent in intents {
            match intent {
                CombatIntent::StrikePlayer { amount, kind } => {
                    self.strike_player(source, amount, kind);
                }
                CombatIntent::LaunchRocket { origin, damage } => {
                    // Ракета без цели не запускается
                    let Some(target) = self.player.target_position() else {
                        continue;
                    };
                    self.commands.spawn((
                        Projectile::rocket(origin, target, damage),
                        Transform::from_translation(origin),
                        OwnedBy(source),
                    ));
                    self.effect(EffectKind::MuzzleFlash, origin, EffectParams::default());
                }
                CombatIntent::Schedule { delay, action } => {
                    scheduled.schedule(delay, action);
                }
                CombatIntent::Shockwave { origin, damage } => {
                    self.commands.spawn((
                        Shockwave::from_tuning(damage, &self.config.boss),
                        Transform::from_translation(origin),
                        OwnedBy(source),
                    ));
                    self.effect(EffectKind::Shockwave, origin, EffectParams::default());
                }
                CombatIntent::Summon {
                    archetype,
                    position,
                } => match enemy_bundle(&self.config, archetype, position, Vec::new()) {
                    Ok(bundle) => {
                        let minion = self.commands.spawn(bundle).id();
                        self.effect(EffectKind::Summon, position, EffectParams::default());
                        crate::log(&format!(
                            "🛸 {:?} summoned {} {:?}",
                            source,
                            archetype.name(),
                            minion
                        ));
                    }
                    Err(e) => crate::log_error(&format!("❌ summon failed: {}", e)),
                },
                CombatIntent::Visual(command) => self.visual(command),
            }
        }
    }
}
