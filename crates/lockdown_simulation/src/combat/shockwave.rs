//! Ground slam: кольцо, расширяющееся от точки удара.
//!
//! Игрок получает урон один раз, когда его горизонтальная дистанция
//! попадает в полосу `radius ± band`.

use bevy::prelude::*;

use super::damage::AttackKind;
use super::output::CombatOutput;
use super::projectile::OwnedBy;
use crate::combat::math::horizontal_distance;
use crate::config::BossTuning;

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Shockwave {
    pub damage: f32,
    pub radius: f32,
    pub speed: f32,
    pub band: f32,
    pub max_radius: f32,
    pub hit_player: bool,
}

impl Shockwave {
    pub fn from_tuning(damage: f32, tuning: &BossTuning) -> Self {
        Self {
            damage,
            radius: 0.0,
            speed: tuning.slam_ring_speed,
            band: tuning.slam_band,
            max_radius: tuning.slam_max_radius,
            hit_player: false,
        }
    }

    pub fn expand(&mut self, dt: f32) {
        self.radius += self.speed * dt;
    }

    pub fn catches(&self, distance: f32) -> bool {
        (distance - self.radius).abs() <= self.band
    }

    pub fn finished(&self) -> bool {
        self.radius >= self.max_radius
    }
}

/// System: расширение колец + урон
pub fn expand_shockwaves(
    mut waves: Query<(Entity, &mut Shockwave, &Transform, &OwnedBy)>,
    time: Res<Time<Fixed>>,
    mut output: CombatOutput,
) {
    let dt = time.delta_secs();
    let target = output.player().target_position();

    for (entity, mut wave, transform, owner) in waves.iter_mut() {
        wave.expand(dt);

        if let Some(target) = target {
            let distance = horizontal_distance(transform.translation, target);
            if !wave.hit_player && wave.catches(distance) {
                wave.hit_player = true;
                output.strike_player(owner.0, wave.damage, AttackKind::GroundSlam);
            }
        }

        if wave.finished() {
            output.dispose(entity);
        }
    }
}
