//! Boss: phase controller + attack patterns поверх общего FSM.

use bevy::prelude::*;

pub mod attacks;
pub mod phase;

pub use attacks::{engage, AttackPattern};
pub use phase::{check_boss_phases, incoming_damage, next_phase, BossEncounter, BossPhaseChanged};

pub struct BossPlugin;

impl Plugin for BossPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BossPhaseChanged>().add_systems(
            FixedUpdate,
            check_boss_phases
                .after(crate::combat::apply_actor_hits)
                .in_set(crate::SimulationSet::Intake),
        );
    }
}
