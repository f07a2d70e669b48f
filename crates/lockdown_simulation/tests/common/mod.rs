//! Общие helpers для integration тестов
#![allow(dead_code)]

use bevy::prelude::*;
use lockdown_simulation::{
    create_headless_app, spawn_enemy, AIState, ActorHit, Archetype, Health, PlayerSnapshot,
    SimulationPlugin,
};

pub const DT: f32 = 1.0 / 60.0;

/// Headless app с полной симуляцией
pub fn simulation_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    app
}

/// Копит события типа `E` за весь прогон (события живут только два кадра)
#[derive(Resource)]
pub struct Recorded<E: Event + Clone>(pub Vec<E>);

fn record<E: Event + Clone>(mut reader: EventReader<E>, mut recorded: ResMut<Recorded<E>>) {
    recorded.0.extend(reader.read().cloned());
}

pub fn record_events<E: Event + Clone>(app: &mut App) {
    app.insert_resource(Recorded::<E>(Vec::new()))
        .add_systems(FixedPostUpdate, record::<E>);
}

pub fn recorded<E: Event + Clone>(app: &App) -> Vec<E> {
    app.world().resource::<Recorded<E>>().0.clone()
}

pub fn spawn(app: &mut App, archetype: Archetype, position: Vec3) -> Entity {
    spawn_enemy(app.world_mut(), archetype, position, Vec::new()).unwrap()
}

pub fn set_player(app: &mut App, position: Vec3) {
    app.insert_resource(PlayerSnapshot::at(position));
}

pub fn state_of(app: &App, entity: Entity) -> AIState {
    *app.world().get::<AIState>(entity).unwrap()
}

pub fn health_of(app: &App, entity: Entity) -> Health {
    *app.world().get::<Health>(entity).unwrap()
}

pub fn position_of(app: &App, entity: Entity) -> Vec3 {
    app.world().get::<Transform>(entity).unwrap().translation
}

pub fn hit(app: &mut App, target: Entity, amount: f32) {
    app.world_mut().send_event(ActorHit {
        source: None,
        target,
        amount,
    });
}
