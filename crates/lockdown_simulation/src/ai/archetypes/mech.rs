//! Mech: медленный шагающий, поворот корпуса ограничен, две ракеты с плеч.

use bevy::prelude::*;

use super::Body;
use crate::bridge::{EffectKind, EffectParams};
use crate::combat::math::{angle_toward, rotate_toward};
use crate::combat::CombatIntent;
use crate::components::CombatStats;

/// рад/с
pub const TURN_SPEED: f32 = 1.5;
/// Длина шага для walking cycle
pub const STRIDE: f32 = 1.2;
/// Точки пуска ракет в локальных координатах (x: вбок, y: вверх)
pub const SHOULDER_MOUNTS: [Vec3; 2] = [Vec3::new(-0.8, 2.0, 0.0), Vec3::new(0.8, 2.0, 0.0)];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MechGait {
    /// Пройденная дистанция в шагах (дробная часть: фаза шага)
    pub cycle: f32,
}

/// Walking cycle: только анимационный, позицию двигает обычный Chase/Patrol
pub fn walk_cycle(gait: &mut MechGait, before: Vec3, body: &Body) -> Vec<CombatIntent> {
    let moved = before.distance(body.position);
    if moved <= f32::EPSILON {
        return Vec::new();
    }

    let previous = gait.cycle;
    gait.cycle += moved / STRIDE;
    if gait.cycle.floor() > previous.floor() {
        vec![CombatIntent::effect(
            EffectKind::Footstep,
            body.position,
            EffectParams::scaled(1.5),
        )]
    } else {
        Vec::new()
    }
}

pub fn aim(body: &mut Body, target: Vec3, dt: f32) {
    let desired = angle_toward(body.position, target);
    body.yaw = rotate_toward(body.yaw, desired, TURN_SPEED, dt);
}

pub fn launch_rockets(body: &Body, stats: &CombatStats) -> Vec<CombatIntent> {
    let rotation = Quat::from_rotation_y(body.yaw);
    SHOULDER_MOUNTS
        .iter()
        .map(|mount| CombatIntent::LaunchRocket {
            origin: body.position + rotation * *mount,
            damage: stats.damage,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Archetype;

    #[test]
    fn test_two_rockets_from_shoulders() {
        let stats = CombatStats::from(&Archetype::Mech.base_stats());
        let body = Body {
            position: Vec3::new(5.0, 0.0, 5.0),
            yaw: 0.0,
        };

        let intents = launch_rockets(&body, &stats);
        assert_eq!(intents.len(), 2);
        let origins: Vec<Vec3> = intents
            .iter()
            .filter_map(|intent| match intent {
                CombatIntent::LaunchRocket { origin, damage } => {
                    assert_eq!(*damage, 50.0);
                    Some(*origin)
                }
                _ => None,
            })
            .collect();
        assert!((origins[0] - Vec3::new(4.2, 2.0, 5.0)).length() < 1e-5);
        assert!((origins[1] - Vec3::new(5.8, 2.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_footstep_once_per_stride() {
        let mut gait = MechGait::default();
        let mut body = Body {
            position: Vec3::ZERO,
            yaw: 0.0,
        };

        let mut footsteps = 0;
        // 1.5 u/s × 2s = 3.0 → два полных шага по 1.2
        for _ in 0..120 {
            let before = body.position;
            body.position.z += 1.5 / 60.0;
            footsteps += walk_cycle(&mut gait, before, &body).len();
        }
        assert_eq!(footsteps, 2);
    }

    #[test]
    fn test_aim_turn_is_slow() {
        let mut body = Body {
            position: Vec3::ZERO,
            yaw: 0.0,
        };
        aim(&mut body, Vec3::new(10.0, 0.0, 0.0), 1.0 / 60.0);
        assert!((body.yaw - TURN_SPEED / 60.0).abs() < 1e-6);
    }
}
