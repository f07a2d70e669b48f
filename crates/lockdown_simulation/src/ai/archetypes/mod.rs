//! Поведения архетипов поверх общего FSM.
//!
//! Архетип = tagged variant (`ArchetypeState`) + таблица поведения:
//! patrol / chase / attack dispatch по тегу. Поведения работают с локальной
//! копией тела (`Body`) и возвращают `CombatIntent`, мир не трогают.

use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::boss::{self, BossEncounter};
use crate::bridge::SceneBackend;
use crate::combat::math::{angle_toward, horizontal_distance, step_toward, tick_cooldown};
use crate::combat::CombatIntent;
use crate::components::{Archetype, Attacker, CombatStats, PatrolRoute};
use crate::config::SimulationConfig;

use super::components::AIState;

pub mod drone;
pub mod guard;
pub mod mech;
pub mod turret;
pub mod zombie;

pub use drone::HoverState;
pub use mech::MechGait;
pub use turret::TurretAim;
pub use zombie::LungeState;

/// Состояние, специфичное для архетипа
#[derive(Component, Debug, Clone, PartialEq)]
pub enum ArchetypeState {
    Guard,
    Drone(HoverState),
    Turret(TurretAim),
    Mech(MechGait),
    ScientistZombie(LungeState),
    Boss(BossEncounter),
}

impl ArchetypeState {
    pub fn for_archetype(archetype: Archetype, spawn: Vec3) -> Self {
        match archetype {
            Archetype::Guard => ArchetypeState::Guard,
            Archetype::Drone => ArchetypeState::Drone(HoverState { altitude: spawn.y }),
            Archetype::Turret => ArchetypeState::Turret(TurretAim::default()),
            Archetype::Mech => ArchetypeState::Mech(MechGait::default()),
            Archetype::ScientistZombie => ArchetypeState::ScientistZombie(LungeState::default()),
            Archetype::Boss => ArchetypeState::Boss(BossEncounter::default()),
        }
    }

    /// Turret и Boss не выходят из Attack tracking, пока цель существует
    pub fn holds_attack(&self) -> bool {
        matches!(self, ArchetypeState::Turret(_) | ArchetypeState::Boss(_))
    }

    pub fn boss(&self) -> Option<&BossEncounter> {
        match self {
            ArchetypeState::Boss(encounter) => Some(encounter),
            _ => None,
        }
    }

    pub fn lunge(&self) -> Option<&LungeState> {
        match self {
            ArchetypeState::ScientistZombie(lunge) => Some(lunge),
            _ => None,
        }
    }
}

/// Локальная копия позиции/yaw на время тика
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec3,
    pub yaw: f32,
}

impl Body {
    /// Мгновенно развернуться к точке
    pub fn face(&mut self, point: Vec3) {
        if horizontal_distance(self.position, point) > f32::EPSILON {
            self.yaw = angle_toward(self.position, point);
        }
    }

    /// Шаг в горизонтальной плоскости (y не меняется), лицом по движению
    pub fn move_horizontally(&mut self, goal: Vec3, max_step: f32) {
        let goal = goal.with_y(self.position.y);
        let next = step_toward(self.position, goal, max_step);
        if next != self.position {
            self.yaw = angle_toward(self.position, next);
            self.position = next;
        }
    }
}

/// Всё, что поведение видит о мире в этом тике
pub struct TickContext<'a> {
    pub entity: Entity,
    pub dt: f32,
    /// Секунды симуляции (для bob и прочих периодических движений)
    pub elapsed: f32,
    /// Позиция игрока; None: нет игрока или notarget
    pub target: Option<Vec3>,
    pub distance: f32,
    pub config: &'a SimulationConfig,
    pub scene: &'a SceneBackend,
    pub rng: &'a mut ChaCha8Rng,
}

impl TickContext<'_> {
    pub fn ready(&self, attacker: &Attacker) -> bool {
        attacker.can_attack(self.config.cooldown_epsilon)
    }

    /// Дистанция, на которой stationary/tracking архетипы ещё стреляют
    pub fn within_fire_band(&self, stats: &CombatStats) -> bool {
        self.distance <= stats.attack_range * self.config.hysteresis_factor
    }
}

/// Шаги до поведения состояния (hover, таймеры архетипа)
pub fn pre_tick(kind: &mut ArchetypeState, body: &mut Body, ctx: &TickContext) {
    match kind {
        ArchetypeState::Drone(hover) => drone::hover(hover, body, ctx.elapsed),
        ArchetypeState::Boss(encounter) => {
            encounter.summon_cooldown = tick_cooldown(encounter.summon_cooldown, ctx.dt);
        }
        _ => {}
    }
}

pub fn patrol(
    kind: &mut ArchetypeState,
    body: &mut Body,
    route: &mut PatrolRoute,
    stats: &CombatStats,
    ctx: &mut TickContext,
) -> Vec<CombatIntent> {
    match kind {
        ArchetypeState::Turret(aim) => {
            turret::idle_scan(aim, body, ctx.dt);
            Vec::new()
        }
        ArchetypeState::Mech(gait) => {
            let before = body.position;
            ground_patrol(body, route, stats, ctx);
            mech::walk_cycle(gait, before, body)
        }
        _ => {
            ground_patrol(body, route, stats, ctx);
            Vec::new()
        }
    }
}

pub fn chase(
    kind: &mut ArchetypeState,
    body: &mut Body,
    stats: &CombatStats,
    ctx: &mut TickContext,
) -> Vec<CombatIntent> {
    match kind {
        ArchetypeState::Turret(aim) => {
            turret::track(aim, body, ctx);
            Vec::new()
        }
        ArchetypeState::ScientistZombie(_) => {
            zombie::erratic_chase(body, stats, ctx);
            Vec::new()
        }
        ArchetypeState::Mech(gait) => {
            let before = body.position;
            ground_chase(body, stats, ctx);
            mech::walk_cycle(gait, before, body)
        }
        _ => {
            ground_chase(body, stats, ctx);
            Vec::new()
        }
    }
}

pub fn attack(
    kind: &mut ArchetypeState,
    body: &mut Body,
    attacker: &mut Attacker,
    stats: &CombatStats,
    ctx: &mut TickContext,
) -> Vec<CombatIntent> {
    let Some(target) = ctx.target else {
        return Vec::new();
    };

    match kind {
        ArchetypeState::Guard => {
            body.face(target);
            fire_when_ready(attacker, ctx, |_| guard::strike(stats))
        }
        ArchetypeState::Drone(_) => {
            body.face(target);
            let origin = body.position;
            fire_when_ready(attacker, ctx, |ctx| drone::fire_laser(origin, target, stats, ctx))
        }
        ArchetypeState::Turret(aim) => {
            turret::track(aim, body, ctx);
            if !ctx.within_fire_band(stats) {
                return Vec::new();
            }
            let muzzle = body.position;
            fire_when_ready(attacker, ctx, |_| turret::fire(muzzle, stats))
        }
        ArchetypeState::Mech(_) => {
            mech::aim(body, target, ctx.dt);
            let mount = *body;
            fire_when_ready(attacker, ctx, |_| mech::launch_rockets(&mount, stats))
        }
        ArchetypeState::ScientistZombie(lunge) => zombie::lunge(lunge, body, attacker, stats, ctx),
        ArchetypeState::Boss(encounter) => boss::engage(encounter, body, attacker, stats, ctx),
    }
}

/// Enter/exit hooks на смене состояния
pub fn on_transition(kind: &mut ArchetypeState, from: AIState, to: AIState, attacker: &mut Attacker) {
    match kind {
        // Lock-on: первый выстрел через один интервал после захвата
        ArchetypeState::Turret(_) if to == AIState::Attack => attacker.start_attack(),
        ArchetypeState::ScientistZombie(lunge) if from == AIState::Attack => lunge.cancel(),
        _ => {}
    }
}

fn fire_when_ready(
    attacker: &mut Attacker,
    ctx: &mut TickContext,
    fire: impl FnOnce(&mut TickContext) -> Vec<CombatIntent>,
) -> Vec<CombatIntent> {
    if !ctx.ready(attacker) {
        return Vec::new();
    }
    attacker.start_attack();
    fire(ctx)
}

/// Patrol: к текущему waypoint на speed × 0.5; пустой маршрут: стоим
pub fn ground_patrol(body: &mut Body, route: &mut PatrolRoute, stats: &CombatStats, ctx: &TickContext) {
    let Some(waypoint) = route.current_waypoint() else {
        return;
    };

    if horizontal_distance(body.position, waypoint) < ctx.config.waypoint_tolerance {
        route.advance();
    }

    if let Some(waypoint) = route.current_waypoint() {
        let step = stats.speed * ctx.config.patrol_speed_factor * ctx.dt;
        body.move_horizontally(waypoint, step);
    }
}

/// Chase: прямо к игроку на полной скорости
pub fn ground_chase(body: &mut Body, stats: &CombatStats, ctx: &TickContext) {
    if let Some(target) = ctx.target {
        body.move_horizontally(target, stats.speed * ctx.dt);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::SeedableRng;

    pub(crate) fn with_context<R>(
        target: Option<Vec3>,
        from: Vec3,
        f: impl FnOnce(&mut TickContext) -> R,
    ) -> R {
        let config = SimulationConfig::default();
        let scene = SceneBackend::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut ctx = TickContext {
            entity: Entity::PLACEHOLDER,
            dt: 1.0 / 60.0,
            elapsed: 0.0,
            target,
            distance: crate::combat::math::distance_to(from, target),
            config: &config,
            scene: &scene,
            rng: &mut rng,
        };
        f(&mut ctx)
    }

    #[test]
    fn test_patrol_advances_waypoints_with_wraparound() {
        let stats = CombatStats::from(&Archetype::Guard.base_stats());
        let mut route = PatrolRoute::new(vec![Vec3::new(0.0, 0.0, 0.2), Vec3::new(0.0, 0.0, 5.0)]);
        let mut body = Body {
            position: Vec3::ZERO,
            yaw: 0.0,
        };

        with_context(None, body.position, |ctx| {
            ground_patrol(&mut body, &mut route, &stats, ctx);
        });

        // В пределах 0.5 от первой точки: переключились на вторую и пошли к ней
        assert_eq!(route.current, 1);
        let expected_step = 3.0 * 0.5 / 60.0;
        assert!((body.position.z - expected_step).abs() < 1e-5);
        assert!(body.yaw.abs() < 1e-5);
    }

    #[test]
    fn test_empty_route_holds_position() {
        let stats = CombatStats::from(&Archetype::Guard.base_stats());
        let mut route = PatrolRoute::default();
        let start = Vec3::new(3.0, 0.0, -2.0);
        let mut body = Body {
            position: start,
            yaw: 1.0,
        };

        with_context(Some(Vec3::new(40.0, 0.0, 0.0)), start, |ctx| {
            ground_patrol(&mut body, &mut route, &stats, ctx);
        });
        assert_eq!(body.position, start);
        assert_eq!(body.yaw, 1.0);
    }

    #[test]
    fn test_chase_ignores_vertical_offset() {
        let stats = CombatStats::from(&Archetype::Guard.base_stats());
        let mut body = Body {
            position: Vec3::ZERO,
            yaw: 0.0,
        };

        with_context(Some(Vec3::new(10.0, 4.0, 0.0)), body.position, |ctx| {
            ground_chase(&mut body, &stats, ctx);
        });
        assert_eq!(body.position.y, 0.0);
        assert!((body.position.x - 3.0 / 60.0).abs() < 1e-5);
    }

    #[test]
    fn test_turret_lock_on_primes_cooldown() {
        let mut kind = ArchetypeState::for_archetype(Archetype::Turret, Vec3::ZERO);
        let mut attacker = Attacker::new(0.15);
        on_transition(&mut kind, AIState::Chase, AIState::Attack, &mut attacker);
        assert_eq!(attacker.cooldown, 0.15);

        let mut guard = ArchetypeState::Guard;
        let mut attacker = Attacker::new(1.5);
        on_transition(&mut guard, AIState::Chase, AIState::Attack, &mut attacker);
        assert_eq!(attacker.cooldown, 0.0);
    }

    #[test]
    fn test_guard_attack_respects_cooldown() {
        let stats = CombatStats::from(&Archetype::Guard.base_stats());
        let mut kind = ArchetypeState::Guard;
        let mut attacker = Attacker::new(1.5);
        let mut body = Body {
            position: Vec3::ZERO,
            yaw: 0.0,
        };
        let player = Some(Vec3::new(2.0, 0.0, 0.0));

        let first = with_context(player, body.position, |ctx| {
            attack(&mut kind, &mut body, &mut attacker, &stats, ctx)
        });
        assert_eq!(first.len(), 1);
        assert_eq!(attacker.cooldown, 1.5);
        // Развернулся к игроку (+X)
        assert!((body.yaw - std::f32::consts::FRAC_PI_2).abs() < 1e-5);

        let second = with_context(player, body.position, |ctx| {
            attack(&mut kind, &mut body, &mut attacker, &stats, ctx)
        });
        assert!(second.is_empty());
    }
}
