//! Turret: стационарная, крутит корпус за целью с ограниченной угловой скоростью.
//!
//! Patrol для турели: медленное сканирование, без перемещения.

use bevy::prelude::*;

use super::{Body, TickContext};
use crate::bridge::{EffectKind, EffectParams};
use crate::combat::math::{angle_toward, rotate_toward, shortest_angle_delta};
use crate::combat::{AttackKind, CombatIntent};
use crate::components::CombatStats;

/// targetingSpeed, рад/с
pub const TRACKING_SPEED: f32 = 2.5;
pub const IDLE_SCAN_SPEED: f32 = 0.4;
const SETTLE_ANGLE: f32 = 0.05;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TurretAim {
    /// Куда смотрели при потере цели; сначала доворачиваем туда
    pub last_known: Option<Vec3>,
}

pub fn idle_scan(aim: &mut TurretAim, body: &mut Body, dt: f32) {
    if let Some(point) = aim.last_known {
        let desired = angle_toward(body.position, point);
        body.yaw = rotate_toward(body.yaw, desired, TRACKING_SPEED, dt);
        if shortest_angle_delta(desired, body.yaw).abs() < SETTLE_ANGLE {
            aim.last_known = None;
        }
        return;
    }

    body.yaw = shortest_angle_delta(body.yaw + IDLE_SCAN_SPEED * dt, 0.0);
}

pub fn track(aim: &mut TurretAim, body: &mut Body, ctx: &TickContext) {
    let Some(target) = ctx.target else {
        return;
    };
    aim.last_known = Some(target);
    let desired = angle_toward(body.position, target);
    body.yaw = rotate_toward(body.yaw, desired, TRACKING_SPEED, ctx.dt);
}

/// Выстрел всегда попадает (неуязвимость проверяет CombatOutput)
pub fn fire(muzzle: Vec3, stats: &CombatStats) -> Vec<CombatIntent> {
    vec![
        CombatIntent::effect(EffectKind::MuzzleFlash, muzzle, EffectParams::default()),
        CombatIntent::StrikePlayer {
            amount: stats.damage,
            kind: AttackKind::TurretShot,
        },
    ]
}
