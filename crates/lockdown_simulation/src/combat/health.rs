//! Health bookkeeping для любого участника боя (игрок, враг, босс)
//!
//! Модификаторы (boss shield) применяются ДО вызова `apply_damage`.
//! Визуалы не трогаем: это ответственность вызывающего.

use bevy::prelude::*;

use crate::components::Health;
use crate::error::{CombatError, CombatResult};

/// Результат применения урона
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub remaining_health: f32,
    /// true ровно один раз: на переходе >0 → 0
    pub died: bool,
}

/// Применить урон: health -= amount, clamp в 0.
///
/// Повторный вызов на мёртвом акторе: no-op с `AlreadyDead`.
pub fn apply_damage(entity: Entity, health: &mut Health, amount: f32) -> CombatResult<DamageOutcome> {
    if !health.is_alive() {
        return Err(CombatError::AlreadyDead(entity));
    }

    let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
    health.current = (health.current - amount).clamp(0.0, health.max);

    Ok(DamageOutcome {
        remaining_health: health.current,
        died: !health.is_alive(),
    })
}

/// Лечение с clamp в max. Мёртвых не воскрешаем.
pub fn heal(entity: Entity, health: &mut Health, amount: f32) -> CombatResult<f32> {
    if !health.is_alive() {
        return Err(CombatError::AlreadyDead(entity));
    }

    let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
    health.current = (health.current + amount).min(health.max);
    Ok(health.current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_reduces_and_clamps() {
        let mut health = Health::new(100.0);

        let outcome = apply_damage(Entity::PLACEHOLDER, &mut health, 30.0).unwrap();
        assert_eq!(outcome.remaining_health, 70.0);
        assert!(!outcome.died);

        let outcome = apply_damage(Entity::PLACEHOLDER, &mut health, 500.0).unwrap();
        assert_eq!(outcome.remaining_health, 0.0);
        assert!(outcome.died);
        assert_eq!(health.current, 0.0);
    }

    #[test]
    fn test_damage_on_dead_is_idempotent() {
        let mut health = Health::new(50.0);
        assert!(apply_damage(Entity::PLACEHOLDER, &mut health, 50.0).unwrap().died);

        for _ in 0..2 {
            let result = apply_damage(Entity::PLACEHOLDER, &mut health, 10.0);
            assert_eq!(result, Err(CombatError::AlreadyDead(Entity::PLACEHOLDER)));
            assert_eq!(health.current, 0.0);
        }
    }

    #[test]
    fn test_negative_damage_does_not_heal() {
        let mut health = Health::new(100.0);
        apply_damage(Entity::PLACEHOLDER, &mut health, 40.0).unwrap();
        apply_damage(Entity::PLACEHOLDER, &mut health, -25.0).unwrap();
        assert_eq!(health.current, 60.0);
    }

    #[test]
    fn test_heal_clamps_at_max() {
        let mut health = Health::new(100.0);
        apply_damage(Entity::PLACEHOLDER, &mut health, 50.0).unwrap();

        assert_eq!(heal(Entity::PLACEHOLDER, &mut health, 30.0).unwrap(), 80.0);
        assert_eq!(heal(Entity::PLACEHOLDER, &mut health, 100.0).unwrap(), 100.0);
    }

    #[test]
    fn test_heal_dead_actor_rejected() {
        let mut health = Health::new(10.0);
        apply_damage(Entity::PLACEHOLDER, &mut health, 10.0).unwrap();
        assert!(heal(Entity::PLACEHOLDER, &mut health, 5.0).is_err());
        assert_eq!(health.current, 0.0);
    }
}
