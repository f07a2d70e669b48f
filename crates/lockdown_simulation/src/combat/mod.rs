//! Combat module: health model, damage flow, projectiles, ground slam.
//!
//! Порядок в fixed шаге:
//! - Intake: отложенные действия → `apply_actor_hits` (входящие попадания, смерть)
//! - Resolve: снаряды → ударные волны
//! - Lifecycle: `sweep_orphans`

use bevy::prelude::*;

use crate::SimulationSet;

pub mod damage;
pub mod health;
pub mod math;
pub mod output;
pub mod projectile;
pub mod resolve;
pub mod shockwave;

pub use damage::{
    apply_actor_hits, death_sequence, ActorHit, AttackKind, CombatLog, DamageDealt, DamageTarget,
    EntityDied, PlayerDamaged,
};
pub use health::{apply_damage, heal, DamageOutcome};
pub use output::{CombatIntent, CombatOutput};
pub use projectile::{advance_projectiles, OwnedBy, Projectile, ProjectileStep};
pub use resolve::{run_scheduled_actions, sweep_orphans};
pub use shockwave::{expand_shockwaves, Shockwave};

/// Combat Plugin
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ActorHit>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<PlayerDamaged>()
            .init_resource::<CombatLog>()
            .register_type::<Projectile>()
            .register_type::<Shockwave>()
            .add_systems(
                FixedUpdate,
                (run_scheduled_actions, apply_actor_hits)
                    .chain()
                    .in_set(SimulationSet::Intake),
            )
            .add_systems(
                FixedUpdate,
                (advance_projectiles, expand_shockwaves)
                    .chain()
                    .in_set(SimulationSet::Resolve),
            )
            .add_systems(FixedUpdate, sweep_orphans.in_set(SimulationSet::Lifecycle));
    }
}
