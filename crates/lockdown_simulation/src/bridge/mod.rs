//! Bridge к rendering/physics collaborator'ам хоста
//!
//! ECS → renderer: `VisualCommand` events (transform, animation, effects).
//! Renderer/physics → ECS: synchronous queries через `SceneQueries` trait.
//! Core ничего не рендерит сам: только данные.

use bevy::prelude::*;

use crate::ai::{AIState, StateChanged};
use crate::combat::{Projectile, Shockwave};
use crate::components::{Archetype, Enemy};

/// Команды для renderer'а (читаются хостом после fixed шага)
#[derive(Event, Debug, Clone, PartialEq)]
pub enum VisualCommand {
    SetTransform {
        entity: Entity,
        position: Vec3,
        rotation_y: f32,
    },
    PlayAnimation {
        entity: Entity,
        clip: &'static str,
        looped: bool,
        speed: f32,
    },
    StopAnimation {
        entity: Entity,
    },
    Effect {
        kind: EffectKind,
        position: Vec3,
        params: EffectParams,
    },
    /// Entity удалён из симуляции: убрать visual
    Dispose {
        entity: Entity,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    MuzzleFlash,
    Laser,
    Explosion,
    Shockwave,
    Telegraph,
    EnergyBeam,
    ClawSwipe,
    Footstep,
    PhaseShift,
    ShieldUp,
    Summon,
}

/// Параметры эффекта (renderer сам решает, что использовать)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectParams {
    /// Конечная точка для лучей
    pub end: Option<Vec3>,
    pub radius: f32,
    pub scale: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            end: None,
            radius: 0.0,
            scale: 1.0,
        }
    }
}

impl EffectParams {
    pub fn beam(end: Vec3) -> Self {
        Self {
            end: Some(end),
            ..Default::default()
        }
    }

    pub fn scaled(scale: f32) -> Self {
        Self {
            scale,
            ..Default::default()
        }
    }
}

/// Результат raycast от physics backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Option<Entity>,
    pub point: Vec3,
    pub distance: f32,
}

/// Синхронные запросы к physics/rendering хоста
pub trait SceneQueries: Send + Sync {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
    fn has_animation(&self, entity: Entity, clip: &str) -> bool;
}

/// Headless backend: геометрии нет, все клипы "есть"
pub struct NullScene;

impl SceneQueries for NullScene {
    fn raycast(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<RayHit> {
        None
    }

    fn has_animation(&self, _entity: Entity, _clip: &str) -> bool {
        true
    }
}

#[derive(Resource)]
pub struct SceneBackend(pub Box<dyn SceneQueries>);

impl Default for SceneBackend {
    fn default() -> Self {
        Self(Box::new(NullScene))
    }
}

impl SceneBackend {
    /// Конец луча: первая преграда раньше цели, иначе сама цель
    pub fn beam_end(&self, origin: Vec3, target: Vec3) -> Vec3 {
        let offset = target - origin;
        let length = offset.length();
        if length <= f32::EPSILON {
            return target;
        }

        match self.0.raycast(origin, offset / length, length) {
            Some(hit) if hit.distance < length => hit.point,
            _ => target,
        }
    }
}

/// Клип анимации для (архетип, state)
pub fn animation_for(archetype: Archetype, state: AIState) -> Option<(&'static str, bool, f32)> {
    match (archetype, state) {
        // Турель без скелета: только поворот корпуса через SetTransform
        (Archetype::Turret, _) => None,
        (_, AIState::Dead) => Some(("Death", false, 1.0)),
        (Archetype::Drone, _) => Some(("Hover", true, 1.0)),
        (Archetype::Mech, AIState::Attack) => Some(("Idle", true, 1.0)),
        // Шаг меха медленный: walking cycle на половине скорости
        (Archetype::Mech, _) => Some(("Walk", true, 0.5)),
        (_, AIState::Patrol) => Some(("Walk", true, 1.0)),
        (_, AIState::Chase) => Some(("Run", true, 1.0)),
        (_, AIState::Attack) => Some(("Attack", true, 1.0)),
    }
}

/// System: Changed<Transform> → SetTransform для renderer'а
pub fn publish_transforms(
    moved: Query<
        (Entity, &Transform),
        (Changed<Transform>, Or<(With<Enemy>, With<Projectile>, With<Shockwave>)>),
    >,
    mut visuals: EventWriter<VisualCommand>,
) {
    for (entity, transform) in moved.iter() {
        let (rotation_y, _, _) = transform.rotation.to_euler(EulerRot::YXZ);
        visuals.write(VisualCommand::SetTransform {
            entity,
            position: transform.translation,
            rotation_y,
        });
    }
}

/// System: StateChanged → PlayAnimation (только если клип существует у модели)
pub fn animate_state_changes(
    mut changes: EventReader<StateChanged>,
    scene: Res<SceneBackend>,
    mut visuals: EventWriter<VisualCommand>,
) {
    for change in changes.read() {
        match animation_for(change.archetype, change.to) {
            Some((clip, looped, speed)) if scene.0.has_animation(change.entity, clip) => {
                visuals.write(VisualCommand::PlayAnimation {
                    entity: change.entity,
                    clip,
                    looped,
                    speed,
                });
            }
            _ if change.to == AIState::Dead => {
                visuals.write(VisualCommand::StopAnimation {
                    entity: change.entity,
                });
            }
            _ => {}
        }
    }
}

pub struct BridgePlugin;

impl Plugin for BridgePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<VisualCommand>()
            .init_resource::<SceneBackend>()
            .add_systems(
                FixedUpdate,
                (animate_state_changes, publish_transforms)
                    .chain()
                    .in_set(crate::SimulationSet::Present),
            );
    }
}
