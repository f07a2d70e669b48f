//! Снаряды с конечной скоростью (ракеты меха)
//!
//! Ракета наводится на текущую позицию игрока, попадает в радиусе 1.5,
//! иначе истекает после `дистанция при запуске + 5` пройденных единиц.

use bevy::prelude::*;

use super::damage::AttackKind;
use super::output::CombatOutput;
use crate::combat::math::distance;
use crate::bridge::{EffectKind, EffectParams};

pub const ROCKET_SPEED: f32 = 20.0;
pub const ROCKET_HIT_RADIUS: f32 = 1.5;
/// Запас дистанции сверх начальной до цели
pub const ROCKET_OVERSHOOT: f32 = 5.0;

/// Владелец снаряда/ударной волны. Владелец удалён → entity удаляется.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedBy(pub Entity);

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    pub damage: f32,
    pub speed: f32,
    pub traveled: f32,
    pub max_travel: f32,
    pub hit_radius: f32,
    /// Последнее направление полёта (используется, когда цели нет)
    pub heading: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileStep {
    InFlight,
    Hit,
    Expired,
}

impl Projectile {
    pub fn rocket(origin: Vec3, target: Vec3, damage: f32) -> Self {
        Self {
            damage,
            speed: ROCKET_SPEED,
            traveled: 0.0,
            max_travel: distance(origin, target) + ROCKET_OVERSHOOT,
            hit_radius: ROCKET_HIT_RADIUS,
            heading: (target - origin).normalize_or_zero(),
        }
    }

    /// Один шаг полёта. Проверка попадания: после перемещения.
    pub fn advance(&mut self, position: &mut Vec3, target: Option<Vec3>, dt: f32) -> ProjectileStep {
        if let Some(target) = target {
            let toward = (target - *position).normalize_or_zero();
            if toward != Vec3::ZERO {
                self.heading = toward;
            }
        }

        let step = self.speed * dt;
        *position += self.heading * step;
        self.traveled += step;

        if target.is_some_and(|target| distance(*position, target) <= self.hit_radius) {
            ProjectileStep::Hit
        } else if self.traveled >= self.max_travel {
            ProjectileStep::Expired
        } else {
            ProjectileStep::InFlight
        }
    }
}

/// System: полёт снарядов + разрешение попаданий
pub fn advance_projectiles(
    mut projectiles: Query<(Entity, &mut Projectile, &mut Transform, &OwnedBy)>,
    time: Res<Time<Fixed>>,
    mut output: CombatOutput,
) {
    let dt = time.delta_secs();
    let target = output.player().target_position();

    for (entity, mut projectile, mut transform, owner) in projectiles.iter_mut() {
        let mut position = transform.translation;
        let step = projectile.advance(&mut position, target, dt);
        transform.translation = position;

        match step {
            ProjectileStep::InFlight => {}
            ProjectileStep::Hit => {
                let kind = AttackKind::Rocket {
                    traveled: projectile.traveled,
                };
                output.strike_player(owner.0, projectile.damage, kind);
                output.effect(EffectKind::Explosion, position, EffectParams::scaled(0.8));
                output.dispose(entity);
            }
            ProjectileStep::Expired => {
                output.effect(EffectKind::Explosion, position, EffectParams::scaled(0.5));
                output.dispose(entity);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_rocket_hits_only_after_closing_distance() {
        let target = Vec3::new(0.0, 0.0, 10.0);
        let mut position = Vec3::ZERO;
        let mut rocket = Projectile::rocket(position, target, 50.0);

        let mut ticks = 0;
        loop {
            ticks += 1;
            match rocket.advance(&mut position, Some(target), DT) {
                ProjectileStep::InFlight => assert!(rocket.traveled < 8.5 + 1e-3),
                ProjectileStep::Hit => break,
                ProjectileStep::Expired => panic!("rocket expired instead of hitting"),
            }
        }

        assert!(rocket.traveled >= 8.5 - 1e-4, "traveled {}", rocket.traveled);
        assert!(ticks as f32 * DT >= 0.425 - 1e-4);
    }

    #[test]
    fn test_rocket_expires_without_target() {
        let mut position = Vec3::ZERO;
        let mut rocket = Projectile::rocket(position, Vec3::new(0.0, 0.0, 10.0), 50.0);

        let mut step = ProjectileStep::InFlight;
        for _ in 0..60 {
            step = rocket.advance(&mut position, None, DT);
            if step != ProjectileStep::InFlight {
                break;
            }
        }

        assert_eq!(step, ProjectileStep::Expired);
        assert!(rocket.traveled >= 15.0);
        // Летела прямо по последнему курсу
        assert!(position.x.abs() < 1e-4);
    }

    #[test]
    fn test_rocket_outrun_by_target_expires() {
        let mut position = Vec3::ZERO;
        let mut rocket = Projectile::rocket(position, Vec3::new(0.0, 0.0, 4.0), 50.0);

        // Цель убегает быстрее ракеты
        let mut target = Vec3::new(0.0, 0.0, 4.0);
        let mut step = ProjectileStep::InFlight;
        for _ in 0..120 {
            target.z += 30.0 * DT;
            step = rocket.advance(&mut position, Some(target), DT);
            if step != ProjectileStep::InFlight {
                break;
            }
        }
        assert_eq!(step, ProjectileStep::Expired);
    }
}
