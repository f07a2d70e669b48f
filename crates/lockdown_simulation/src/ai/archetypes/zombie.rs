//! ScientistZombie: рваное преследование и рывок (lunge) в Attack.
//!
//! Lunge: при готовом cooldown запоминаем позицию игрока и летим к ней
//! на `LUNGE_SPEED`, независимо от обычного Chase. Ближе `CLAW_REACH` к
//! игроку: удар когтями. Долетели до точки и не достали: промах.
//! В обоих случаях cooldown = fire_rate (2с) до следующего рывка.

use bevy::prelude::*;
use rand::Rng;

use super::{Body, TickContext};
use crate::bridge::{EffectKind, EffectParams};
use crate::combat::math::{distance, horizontal_direction, horizontal_distance};
use crate::combat::{AttackKind, CombatIntent};
use crate::components::{Attacker, CombatStats};

pub const LUNGE_SPEED: f32 = 12.0;
pub const CLAW_REACH: f32 = 1.5;
/// Максимальное боковое отклонение (доля от направления на игрока)
pub const LATERAL_JITTER: f32 = 0.6;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LungeState {
    pub is_lunging: bool,
    /// Last-known позиция игрока на старте рывка
    pub target: Option<Vec3>,
}

impl LungeState {
    pub fn cancel(&mut self) {
        self.is_lunging = false;
        self.target = None;
    }
}

/// Базовое направление + случайный боковой снос
pub fn erratic_chase(body: &mut Body, stats: &CombatStats, ctx: &mut TickContext) {
    let Some(target) = ctx.target else {
        return;
    };

    let forward = horizontal_direction(body.position, target);
    if forward == Vec3::ZERO {
        return;
    }

    let lateral = Vec3::new(forward.z, 0.0, -forward.x);
    let jitter: f32 = ctx.rng.gen_range(-LATERAL_JITTER..=LATERAL_JITTER);
    let heading = (forward + lateral * jitter).normalize_or_zero();

    let goal = body.position + heading * stats.speed * ctx.dt;
    body.move_horizontally(goal, stats.speed * ctx.dt);
}

pub fn lunge(
    state: &mut LungeState,
    body: &mut Body,
    attacker: &mut Attacker,
    stats: &CombatStats,
    ctx: &TickContext,
) -> Vec<CombatIntent> {
    if !state.is_lunging {
        if !ctx.ready(attacker) {
            if let Some(target) = ctx.target {
                body.face(target);
            }
            return Vec::new();
        }
        state.is_lunging = true;
        state.target = ctx.target;
    }

    let Some(goal) = state.target else {
        state.cancel();
        return Vec::new();
    };

    body.move_horizontally(goal, LUNGE_SPEED * ctx.dt);

    let closed_in = ctx
        .target
        .is_some_and(|player| distance(body.position, player) <= CLAW_REACH);

    if closed_in {
        state.cancel();
        attacker.start_attack();
        return vec![
            CombatIntent::effect(EffectKind::ClawSwipe, body.position, EffectParams::default()),
            CombatIntent::StrikePlayer {
                amount: stats.damage,
                kind: AttackKind::Claw,
            },
        ];
    }

    if horizontal_distance(body.position, goal) <= f32::EPSILON {
        // Промах: точка достигнута, игрок ушёл
        state.cancel();
        attacker.start_attack();
    }

    Vec::new()
}
