//! Создание/удаление акторов. Единственный путь в roster.

use bevy::prelude::*;

use crate::ai::{AIState, ArchetypeState};
use crate::bridge::VisualCommand;
use crate::combat::{CombatLog, OwnedBy, Projectile, Shockwave};
use crate::components::{Archetype, Attacker, CombatStats, Enemy, Facing, Health, PatrolRoute};
use crate::config::SimulationConfig;
use crate::error::{CombatError, CombatResult};
use crate::timers::{ScheduledActions, SimulationClock};

use super::EncounterDirector;

/// Полный набор компонентов врага
#[derive(Bundle)]
pub struct EnemyBundle {
    pub enemy: Enemy,
    pub health: Health,
    pub stats: CombatStats,
    pub attacker: Attacker,
    pub state: AIState,
    pub facing: Facing,
    pub route: PatrolRoute,
    pub kind: ArchetypeState,
    pub scheduled: ScheduledActions,
    pub transform: Transform,
}

/// Собрать bundle. Невалидные статы не доходят до tick loop.
pub fn enemy_bundle(
    config: &SimulationConfig,
    archetype: Archetype,
    position: Vec3,
    waypoints: Vec<Vec3>,
) -> CombatResult<EnemyBundle> {
    let block = config.stats_for(archetype);
    block.validate()?;

    if !position.is_finite() || waypoints.iter().any(|point| !point.is_finite()) {
        return Err(CombatError::InvalidConfiguration {
            reason: format!("{} spawn/patrol points must be finite", archetype.name()),
        });
    }

    Ok(EnemyBundle {
        enemy: Enemy { archetype },
        health: Health::new(block.max_health),
        stats: CombatStats::from(&block),
        attacker: Attacker::new(block.fire_rate),
        state: AIState::Patrol,
        facing: Facing::default(),
        route: PatrolRoute::new(waypoints),
        kind: ArchetypeState::for_archetype(archetype, position),
        scheduled: ScheduledActions::default(),
        transform: Transform::from_translation(position),
    })
}

/// `spawn(archetype, position, patrolRoute?) -> actorId`
pub fn spawn_enemy(
    world: &mut World,
    archetype: Archetype,
    position: Vec3,
    waypoints: Vec<Vec3>,
) -> CombatResult<Entity> {
    let bundle = {
        let config = world.get_resource_or_init::<SimulationConfig>();
        enemy_bundle(&config, archetype, position, waypoints)?
    };
    let entity = world.spawn(bundle).id();
    crate::log(&format!("➕ Spawned {} {:?} at {:?}", archetype.name(), entity, position));
    Ok(entity)
}

/// Немедленно убрать актора (без death sequence). Его снаряды уберёт orphan sweep.
pub fn despawn_actor(world: &mut World, entity: Entity) -> CombatResult<()> {
    if world.get::<Enemy>(entity).is_none() {
        return Err(CombatError::InvalidActorReference(entity));
    }

    world.despawn(entity);
    world.send_event(VisualCommand::Dispose { entity });
    Ok(())
}

/// Снести весь encounter (выгрузка уровня): враги, снаряды, таймеры, director,
/// журнал урона и часы. Следующий уровень начинается с нуля.
pub fn dispose_encounter(world: &mut World) -> usize {
    let mut doomed: Vec<Entity> = world
        .query_filtered::<Entity, Or<(With<Enemy>, With<Projectile>, With<Shockwave>, With<OwnedBy>)>>()
        .iter(world)
        .collect();
    doomed.sort();

    for &entity in &doomed {
        world.despawn(entity);
        world.send_event(VisualCommand::Dispose { entity });
    }

    let layout = world
        .get_resource::<SimulationConfig>()
        .map(|config| config.encounter.clone())
        .unwrap_or_default();
    world.insert_resource(EncounterDirector::new(&layout));
    world.insert_resource(CombatLog::default());
    world.insert_resource(SimulationClock::default());

    crate::log_info(&format!("🧹 Encounter disposed ({} entities)", doomed.len()));
    doomed.len()
}

/// `getAliveCount()` для HUD
pub fn count_alive(world: &mut World) -> usize {
    world
        .query::<(&Enemy, &AIState)>()
        .iter(world)
        .filter(|(_, state)| !state.is_dead())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_uses_config_stats() {
        let config = SimulationConfig::default();
        let bundle = enemy_bundle(&config, Archetype::Mech, Vec3::ZERO, Vec::new()).unwrap();
        assert_eq!(bundle.health.max, 500.0);
        assert_eq!(bundle.stats.attack_range, 15.0);
        assert_eq!(bundle.attacker.fire_rate, 1.5);
        assert_eq!(bundle.state, AIState::Patrol);
    }

    #[test]
    fn test_negative_override_rejected_at_construction() {
        let mut config = SimulationConfig::default();
        let mut block = Archetype::Guard.base_stats();
        block.speed = -3.0;
        config.stat_overrides.insert(Archetype::Guard, block);

        let result = enemy_bundle(&config, Archetype::Guard, Vec3::ZERO, Vec::new());
        assert!(matches!(result, Err(CombatError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_nan_spawn_point_rejected() {
        let config = SimulationConfig::default();
        let result = enemy_bundle(&config, Archetype::Drone, Vec3::new(f32::NAN, 0.0, 0.0), Vec::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_despawn_unknown_actor_is_invalid_reference() {
        let mut world = World::new();
        world.init_resource::<Events<VisualCommand>>();
        let stranger = world.spawn_empty().id();

        assert_eq!(
            despawn_actor(&mut world, stranger),
            Err(CombatError::InvalidActorReference(stranger))
        );
    }

    #[test]
    fn test_count_alive_skips_dead() {
        let mut world = World::new();
        world.init_resource::<Events<VisualCommand>>();
        world.insert_resource(SimulationConfig::default());

        let guard = spawn_enemy(&mut world, Archetype::Guard, Vec3::ZERO, Vec::new()).unwrap();
        spawn_enemy(&mut world, Archetype::Drone, Vec3::Y * 4.0, Vec::new()).unwrap();
        assert_eq!(count_alive(&mut world), 2);

        *world.get_mut::<AIState>(guard).unwrap() = AIState::Dead;
        assert_eq!(count_alive(&mut world), 1);

        despawn_actor(&mut world, guard).unwrap();
        assert_eq!(count_alive(&mut world), 1);
        assert!(despawn_actor(&mut world, guard).is_err());
    }
}
