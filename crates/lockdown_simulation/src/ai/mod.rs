//! AI decision-making module
//!
//! Общий FSM (Patrol → Chase → Attack, Dead terminal) + поведения архетипов.
//! Все системы в FixedUpdate, `SimulationSet::Decide`.

use bevy::prelude::*;

pub mod archetypes;
pub mod components;
pub mod events;
pub mod systems;

pub use archetypes::{ArchetypeState, Body, HoverState, LungeState, MechGait, TickContext, TurretAim};
pub use components::{next_state, AIState, TransitionRules};
pub use events::StateChanged;

/// AI Plugin
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<StateChanged>()
            .register_type::<AIState>()
            .add_systems(
                FixedUpdate,
                systems::enemy_ai_tick.in_set(crate::SimulationSet::Decide),
            );
    }
}
