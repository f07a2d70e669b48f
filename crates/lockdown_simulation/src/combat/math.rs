//! Combat math: дистанции, cooldown, углы
//!
//! Чистые функции без состояния.

use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

/// Полная 3D дистанция (detection/attack range checks)
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}

/// Дистанция до игрока; нет игрока (или notarget) → +∞
pub fn distance_to(a: Vec3, target: Option<Vec3>) -> f32 {
    target.map_or(f32::INFINITY, |b| distance(a, b))
}

/// Горизонтальная дистанция (y обнулён)
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    a.with_y(0.0).distance(b.with_y(0.0))
}

/// Нормализованное направление в горизонтальной плоскости.
/// Актор не наклоняется к цели выше/ниже себя.
pub fn horizontal_direction(from: Vec3, to: Vec3) -> Vec3 {
    (to - from).with_y(0.0).normalize_or_zero()
}

pub fn tick_cooldown(current: f32, dt: f32) -> f32 {
    (current - dt).max(0.0)
}

/// Yaw к цели: atan2(dx, dz)
pub fn angle_toward(from: Vec3, to: Vec3) -> f32 {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    dx.atan2(dz)
}

/// Кратчайшая разница углов в (-π, π]
pub fn shortest_angle_delta(target: f32, current: f32) -> f32 {
    let mut delta = (target - current) % TAU;
    if delta > PI {
        delta -= TAU;
    } else if delta <= -PI {
        delta += TAU;
    }
    delta
}

/// Поворот yaw к target с ограниченной угловой скоростью (рад/с)
pub fn rotate_toward(current: f32, target: f32, max_speed: f32, dt: f32) -> f32 {
    let delta = shortest_angle_delta(target, current);
    let max_step = max_speed * dt;
    current + delta.clamp(-max_step, max_step)
}

/// Шаг по направлению к точке, без перелёта
pub fn step_toward(from: Vec3, to: Vec3, max_step: f32) -> Vec3 {
    let offset = to - from;
    let length = offset.length();
    if length <= max_step || length <= f32::EPSILON {
        to
    } else {
        from + offset / length * max_step
    }
}
