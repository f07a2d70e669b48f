//! FSM врага: состояния и чистая функция переходов.

use bevy::prelude::*;

/// AI FSM состояния (ровно одно активно)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
#[reflect(Component)]
pub enum AIState {
    /// Патруль по маршруту (или idle без маршрута)
    #[default]
    Patrol,

    /// Движение прямо к игроку
    Chase,

    /// Атака с cooldown gate
    Attack,

    /// Terminal: ни один переход не выходит из Dead
    Dead,
}

impl AIState {
    pub fn is_dead(&self) -> bool {
        matches!(self, AIState::Dead)
    }
}

/// Параметры переходов для конкретного актора
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionRules {
    pub detection_range: f32,
    pub attack_range: f32,
    /// Re-entry band: выход из состояния только за range × hysteresis
    pub hysteresis: f32,
    /// Turret/Boss: однажды войдя в Attack, не возвращаются в Chase
    pub holds_attack: bool,
}

/// Следующее состояние по дистанции до игрока.
///
/// Один переход за тик. `distance = +∞` (нет игрока) всегда ведёт обратно в Patrol.
pub fn next_state(state: AIState, distance: f32, rules: &TransitionRules) -> AIState {
    match state {
        AIState::Dead => AIState::Dead,
        AIState::Patrol => {
            if distance < rules.detection_range {
                AIState::Chase
            } else {
                AIState::Patrol
            }
        }
        AIState::Chase => {
            if distance < rules.attack_range {
                AIState::Attack
            } else if distance > rules.detection_range * rules.hysteresis {
                AIState::Patrol
            } else {
                AIState::Chase
            }
        }
        AIState::Attack => {
            if rules.holds_attack {
                // Tracking не отпускает цель, пока она вообще существует
                if distance.is_finite() {
                    AIState::Attack
                } else {
                    AIState::Patrol
                }
            } else if distance > rules.attack_range * rules.hysteresis {
                AIState::Chase
            } else {
                AIState::Attack
            }
        }
    }
}
