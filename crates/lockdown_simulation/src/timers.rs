//! Time-deferred state: simulation clock + per-actor очередь отложенных действий
//!
//! Никаких sleep/async: отложенное действие хранит остаток времени и
//! разрешается на одном из следующих fixed тиков.

use bevy::prelude::*;

/// Глобальные часы симуляции (детерминистичные, только fixed шаги)
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SimulationClock {
    pub tick: u64,
    /// Секунды симуляции с начала уровня
    pub elapsed: f32,
}

/// System: tick counter + elapsed (запускается ПЕРВЫМ в fixed шаге)
pub fn advance_clock(mut clock: ResMut<SimulationClock>, time: Res<Time<Fixed>>) {
    clock.tick = clock.tick.wrapping_add(1);
    clock.elapsed += time.delta_secs();
}

/// Допуск готовности: накопленный f32 dt не должен сдвигать действие на лишний тик
pub const READY_TOLERANCE: f32 = 1e-5;

/// Отложенное действие, привязанное к актору
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    /// Выстрел energy beam после telegraph
    BeamDischarge { damage: f32, range: f32 },
    /// Один взрыв из death sequence
    DeathBlast { stage: u32, scale: f32 },
    /// Финальный despawn после death sequence
    Dispose,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledAction {
    pub remaining: f32,
    pub action: PendingAction,
}

/// Очередь отложенных действий актора
///
/// Живёт на entity владельца: despawn владельца = отмена всех его таймеров.
#[derive(Component, Debug, Clone, Default)]
pub struct ScheduledActions {
    entries: Vec<ScheduledAction>,
}

impl ScheduledActions {
    pub fn schedule(&mut self, delay: f32, action: PendingAction) {
        self.entries.push(ScheduledAction {
            remaining: delay.max(0.0),
            action,
        });
    }

    /// Продвинуть таймеры; готовые действия возвращаются в порядке постановки
    pub fn advance(&mut self, dt: f32) -> Vec<PendingAction> {
        let mut ready = Vec::new();
        self.entries.retain_mut(|entry| {
            entry.remaining -= dt;
            if entry.remaining <= READY_TOLERANCE {
                ready.push(entry.action.clone());
                false
            } else {
                true
            }
        });
        ready
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
