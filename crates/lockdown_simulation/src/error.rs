//! Ошибки combat core
//!
//! Ни одна из них не должна ронять frame loop: per-tick код логирует и пропускает.

use bevy::prelude::Entity;
use std::path::PathBuf;
use thiserror::Error;

/// Ошибки операций над акторами
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CombatError {
    /// Entity уже despawned или никогда не был актором
    #[error("invalid actor reference: {0:?}")]
    InvalidActorReference(Entity),

    /// Урон по мёртвому актору (идемпотентный no-op)
    #[error("actor {0:?} is already dead")]
    AlreadyDead(Entity),

    /// Отрицательные/нечисловые статы при создании актора
    #[error("invalid actor configuration: {reason}")]
    InvalidConfiguration { reason: String },
}

pub type CombatResult<T> = Result<T, CombatError>;

/// Ошибки загрузки `SimulationConfig`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read simulation config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse simulation config RON")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid simulation config: {reason}")]
    Invalid { reason: String },
}
