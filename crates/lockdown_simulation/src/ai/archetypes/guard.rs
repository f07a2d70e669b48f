//! Guard: стандартный наземный патруль/преследование, melee удар.

use crate::combat::{AttackKind, CombatIntent};
use crate::components::CombatStats;

/// Один удар в melee радиусе
pub fn strike(stats: &CombatStats) -> Vec<CombatIntent> {
    vec![CombatIntent::StrikePlayer {
        amount: stats.damage,
        kind: AttackKind::Melee,
    }]
}
