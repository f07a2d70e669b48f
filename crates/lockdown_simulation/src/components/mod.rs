//! ECS Components для акторов combat core
//!
//! Организация по доменам:
//! - actor: архетип, здоровье, статы, cooldown, facing
//! - world: маршруты патруля

pub mod actor;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use world::*;
