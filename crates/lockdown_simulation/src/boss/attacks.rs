//! Boss attack patterns: beam → slam → summon по кругу.
//!
//! - Energy beam: telegraph, выстрел через `beam_telegraph` секунд
//! - Ground slam: расширяющееся кольцо (см. `combat::shockwave`)
//! - Summon: дроны по бокам, только с фазы 2 и при готовом summon cooldown;
//!   иначе вместо него energy beam

use bevy::prelude::*;

use super::phase::BossEncounter;
use crate::ai::{Body, TickContext};
use crate::bridge::{EffectKind, EffectParams};
use crate::combat::CombatIntent;
use crate::components::{Archetype, Attacker, CombatStats};
use crate::timers::PendingAction;

pub const PATTERN_COUNT: u8 = 3;
/// Боковой отступ миньонов от босса
pub const SUMMON_SPREAD: f32 = 4.0;
/// Дроны появляются над головой босса
pub const SUMMON_HEIGHT: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPattern {
    EnergyBeam,
    GroundSlam,
    Summon,
}

impl AttackPattern {
    pub fn from_index(index: u8) -> Self {
        match index % PATTERN_COUNT {
            0 => AttackPattern::EnergyBeam,
            1 => AttackPattern::GroundSlam,
            _ => AttackPattern::Summon,
        }
    }
}

/// Attack state босса: держим игрока в фокусе, подходим, бьём по cooldown
pub fn engage(
    encounter: &mut BossEncounter,
    body: &mut Body,
    attacker: &mut Attacker,
    stats: &CombatStats,
    ctx: &TickContext,
) -> Vec<CombatIntent> {
    let Some(target) = ctx.target else {
        return Vec::new();
    };

    if ctx.distance > stats.attack_range {
        body.move_horizontally(target, stats.speed * ctx.dt);
    }
    body.face(target);

    if !ctx.within_fire_band(stats) || !ctx.ready(attacker) {
        return Vec::new();
    }
    attacker.start_attack();
    next_pattern(encounter, body, stats, ctx)
}

/// Выполнить текущий паттерн и сдвинуть индекс
pub fn next_pattern(
    encounter: &mut BossEncounter,
    body: &Body,
    stats: &CombatStats,
    ctx: &TickContext,
) -> Vec<CombatIntent> {
    let pattern = AttackPattern::from_index(encounter.attack_pattern);
    encounter.attack_pattern = (encounter.attack_pattern + 1) % PATTERN_COUNT;

    match pattern {
        AttackPattern::EnergyBeam => energy_beam(body, stats, ctx),
        AttackPattern::GroundSlam => vec![CombatIntent::Shockwave {
            origin: body.position,
            damage: stats.damage,
        }],
        AttackPattern::Summon => {
            let allowed = encounter.phase >= 2
                && encounter.summon_cooldown <= ctx.config.cooldown_epsilon;
            if !allowed {
                return energy_beam(body, stats, ctx);
            }
            encounter.summon_cooldown = ctx.config.boss.summon_cooldown;
            summon(body, ctx.config.boss.summon_count)
        }
    }
}

fn energy_beam(body: &Body, stats: &CombatStats, ctx: &TickContext) -> Vec<CombatIntent> {
    let telegraph = ctx.config.boss.beam_telegraph;
    vec![
        CombatIntent::effect(
            EffectKind::Telegraph,
            body.position,
            EffectParams {
                radius: 1.0,
                scale: telegraph,
                ..Default::default()
            },
        ),
        CombatIntent::Schedule {
            delay: telegraph,
            action: PendingAction::BeamDischarge {
                damage: stats.damage,
                range: stats.attack_range * ctx.config.hysteresis_factor,
            },
        },
    ]
}

fn summon(body: &Body, count: usize) -> Vec<CombatIntent> {
    let right = Quat::from_rotation_y(body.yaw) * Vec3::X;
    (0..count)
        .map(|i| {
            let side = if i % 2 == 0 { -1.0 } else { 1.0 };
            let rank = (i / 2 + 1) as f32;
            let position = body.position + right * side * rank * SUMMON_SPREAD + Vec3::Y * SUMMON_HEIGHT;
            CombatIntent::Summon {
                archetype: Archetype::Drone,
                position,
            }
        })
        .collect()
}
