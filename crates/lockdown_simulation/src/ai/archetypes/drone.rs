//! Drone: висит на высоте спавна с синусоидальным bob, стреляет лазером.
//!
//! Лазер: hitscan: попадание в тот же тик, без полёта.
//! Луч визуально обрывается на первой преграде из physics raycast.

use bevy::prelude::*;

use super::TickContext;
use crate::bridge::{EffectKind, EffectParams};
use crate::combat::{AttackKind, CombatIntent};
use crate::components::CombatStats;

pub const BOB_AMPLITUDE: f32 = 0.3;
/// рад/с
pub const BOB_FREQUENCY: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverState {
    /// Базовая высота (y при спавне)
    pub altitude: f32,
}

pub fn hover(state: &HoverState, body: &mut super::Body, elapsed: f32) {
    body.position.y = state.altitude + BOB_AMPLITUDE * (elapsed * BOB_FREQUENCY).sin();
}

pub fn fire_laser(origin: Vec3, target: Vec3, stats: &CombatStats, ctx: &TickContext) -> Vec<CombatIntent> {
    let end = ctx.scene.beam_end(origin, target);
    vec![
        CombatIntent::effect(EffectKind::Laser, origin, EffectParams::beam(end)),
        CombatIntent::StrikePlayer {
            amount: stats.damage,
            kind: AttackKind::Laser,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::archetypes::tests::with_context;
    use crate::ai::archetypes::Body;
    use crate::components::Archetype;

    #[test]
    fn test_hover_bobs_around_spawn_height() {
        let state = HoverState { altitude: 4.0 };
        let mut body = Body {
            position: Vec3::new(1.0, 0.0, 1.0),
            yaw: 0.0,
        };

        hover(&state, &mut body, 0.0);
        assert!((body.position.y - 4.0).abs() < 1e-6);

        // sin(2 × π/4) = 1 → пик
        hover(&state, &mut body, std::f32::consts::FRAC_PI_4);
        assert!((body.position.y - 4.3).abs() < 1e-5);
        assert_eq!(body.position.x, 1.0);
    }

    #[test]
    fn test_laser_hits_immediately() {
        let stats = CombatStats::from(&Archetype::Drone.base_stats());
        let target = Vec3::new(0.0, 0.0, 8.0);
        let intents = with_context(Some(target), Vec3::Y * 4.0, |ctx| {
            fire_laser(Vec3::Y * 4.0, target, &stats, ctx)
        });

        assert!(intents.contains(&CombatIntent::StrikePlayer {
            amount: 15.0,
            kind: AttackKind::Laser,
        }));
        assert!(intents.contains(&CombatIntent::effect(
            EffectKind::Laser,
            Vec3::Y * 4.0,
            EffectParams::beam(target)
        )));
    }
}
