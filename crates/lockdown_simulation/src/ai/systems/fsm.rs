//! Per-tick FSM для всех живых врагов.

use bevy::prelude::*;

use crate::ai::archetypes::{self, ArchetypeState, Body, TickContext};
use crate::ai::components::{next_state, AIState, TransitionRules};
use crate::ai::events::StateChanged;
use crate::bridge::SceneBackend;
use crate::combat::math::{distance_to, tick_cooldown};
use crate::combat::CombatOutput;
use crate::components::{Attacker, CombatStats, Enemy, Facing, PatrolRoute};
use crate::config::SimulationConfig;
use crate::player::PlayerSnapshot;
use crate::timers::{ScheduledActions, SimulationClock};
use crate::DeterministicRng;

/// System: один тик FSM на каждого врага
///
/// 1. Dead: пропуск
/// 2. cooldown -= dt
/// 3. дистанция до игрока (+∞ без игрока)
/// 4. поведение ТЕКУЩЕГО состояния
/// 5. переход по дистанции из шага 3 (+ enter/exit hooks)
/// 6. write-back позиции и intents
pub fn enemy_ai_tick(
    mut enemies: Query<(
        Entity,
        &Enemy,
        &mut AIState,
        &mut Transform,
        &mut Facing,
        &mut Attacker,
        &CombatStats,
        &mut PatrolRoute,
        &mut ArchetypeState,
        &mut ScheduledActions,
    )>,
    player: Res<PlayerSnapshot>,
    config: Res<SimulationConfig>,
    scene: Res<SceneBackend>,
    clock: Res<SimulationClock>,
    time: Res<Time<Fixed>>,
    mut rng: ResMut<DeterministicRng>,
    mut transitions: EventWriter<StateChanged>,
    mut output: CombatOutput,
) {
    let dt = time.delta_secs();
    let target = player.target_position();

    for (
        entity,
        enemy,
        mut state,
        mut transform,
        mut facing,
        mut attacker,
        stats,
        mut route,
        mut kind,
        mut scheduled,
    ) in enemies.iter_mut()
    {
        if state.is_dead() {
            continue;
        }

        attacker.cooldown = tick_cooldown(attacker.cooldown, dt);
        let distance = distance_to(transform.translation, target);

        let mut body = Body {
            position: transform.translation,
            yaw: facing.yaw,
        };
        let mut ctx = TickContext {
            entity,
            dt,
            elapsed: clock.elapsed,
            target,
            distance,
            config: &config,
            scene: &scene,
            rng: &mut rng.rng,
        };

        archetypes::pre_tick(&mut kind, &mut body, &ctx);

        let current = *state;
        let intents = match current {
            AIState::Patrol => archetypes::patrol(&mut kind, &mut body, &mut route, stats, &mut ctx),
            AIState::Chase => archetypes::chase(&mut kind, &mut body, stats, &mut ctx),
            AIState::Attack => archetypes::attack(&mut kind, &mut body, &mut attacker, stats, &mut ctx),
            AIState::Dead => Vec::new(),
        };

        let rules = TransitionRules {
            detection_range: stats.detection_range,
            attack_range: stats.attack_range,
            hysteresis: config.hysteresis_factor,
            holds_attack: kind.holds_attack(),
        };
        let next = next_state(current, distance, &rules);
        if next != current {
            archetypes::on_transition(&mut kind, current, next, &mut attacker);
            *state = next;
            transitions.write(StateChanged {
                entity,
                archetype: enemy.archetype,
                from: current,
                to: next,
            });
            crate::log(&format!(
                "🔄 {} {:?}: {:?} → {:?} (dist {:.2})",
                enemy.archetype.name(),
                entity,
                current,
                next,
                distance
            ));
        }

        transform.set_if_neq(Transform {
            translation: body.position,
            rotation: Quat::from_rotation_y(body.yaw),
            ..*transform
        });
        facing.set_if_neq(Facing { yaw: body.yaw });

        if !intents.is_empty() {
            output.apply(entity, intents, &mut scheduled);
        }
    }
}
