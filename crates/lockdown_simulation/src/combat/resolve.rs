//! Разрешение отложенных действий и cleanup сирот

use bevy::prelude::*;

use super::damage::AttackKind;
use super::output::CombatOutput;
use super::projectile::OwnedBy;
use crate::ai::AIState;
use crate::bridge::{EffectKind, EffectParams};
use crate::combat::math::distance;
use crate::components::{Enemy, Facing};
use crate::timers::{PendingAction, ScheduledActions};

/// System: продвинуть очереди таймеров и выполнить созревшие действия
pub fn run_scheduled_actions(
    mut actors: Query<(Entity, &Enemy, &AIState, &Transform, &Facing, &mut ScheduledActions)>,
    time: Res<Time<Fixed>>,
    mut output: CombatOutput,
) {
    let dt = time.delta_secs();
    let target = output.player().target_position();

    for (entity, enemy, state, transform, facing, mut scheduled) in actors.iter_mut() {
        if scheduled.is_empty() {
            continue;
        }

        let origin = transform.translation;
        for action in scheduled.advance(dt) {
            match action {
                PendingAction::BeamDischarge { damage, range } => {
                    // Смерть отменяет очередь, но труп всё равно не стреляет
                    if state.is_dead() {
                        continue;
                    }
                    match target.filter(|t| distance(origin, *t) <= range) {
                        Some(end) => {
                            output.effect(EffectKind::EnergyBeam, origin, EffectParams::beam(end));
                            output.strike_player(entity, damage, AttackKind::EnergyBeam);
                        }
                        None => {
                            let forward = Vec3::new(facing.yaw.sin(), 0.0, facing.yaw.cos());
                            let end = origin + forward * range;
                            output.effect(EffectKind::EnergyBeam, origin, EffectParams::beam(end));
                        }
                    }
                }
                PendingAction::DeathBlast { stage, scale } => {
                    let offset = Vec3::Y * (stage as f32 * 0.5);
                    output.effect(EffectKind::Explosion, origin + offset, EffectParams::scaled(scale));
                }
                PendingAction::Dispose => {
                    crate::log(&format!("🗑️ {} {:?} disposed", enemy.archetype.name(), entity));
                    output.dispose(entity);
                }
            }
        }
    }
}

/// System: снаряды/волны, чей владелец удалён, удаляются вместе с ним
pub fn sweep_orphans(
    owned: Query<(Entity, &OwnedBy)>,
    owners: Query<(), With<Enemy>>,
    mut output: CombatOutput,
) {
    for (entity, owner) in owned.iter() {
        if owners.get(owner.0).is_err() {
            output.dispose(entity);
        }
    }
}
