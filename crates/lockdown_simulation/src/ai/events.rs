//! AI Events: наружу для анимаций, HUD и тестов

use bevy::prelude::*;

use super::components::AIState;
use crate::components::Archetype;

/// FSM сменил состояние (включая переход в Dead)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct StateChanged {
    pub entity: Entity,
    pub archetype: Archetype,
    pub from: AIState,
    pub to: AIState,
}
