//! LOCKDOWN Simulation Core
//!
//! Enemy AI & combat на Bevy 0.16 ECS (headless, fixed 60Hz)
//!
//! - ECS = решения: FSM врагов, урон, фазы босса, encounter гейты
//! - Хост = rendering/physics/audio/HUD; общается через events и `SceneQueries`
//!
//! Один fixed шаг (`SimulationSet`, строго по порядку):
//! Intake → Decide → Resolve → Lifecycle → Direct → Present

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod ai;
pub mod boss;
pub mod bridge;
pub mod combat;
pub mod components;
pub mod config;
pub mod encounter;
pub mod error;
pub mod logger;
pub mod player;
pub mod timers;

pub use ai::{AIPlugin, AIState, ArchetypeState, StateChanged};
pub use boss::{BossEncounter, BossPhaseChanged, BossPlugin};
pub use bridge::{BridgePlugin, EffectKind, EffectParams, NullScene, RayHit, SceneBackend, SceneQueries, VisualCommand};
pub use combat::{
    ActorHit, AttackKind, CombatLog, CombatPlugin, DamageDealt, DamageTarget, EntityDied, PlayerDamaged,
};
pub use components::*;
pub use config::{BossTuning, EncounterLayout, SimulationConfig};
pub use encounter::{
    count_alive, despawn_actor, dispose_encounter, spawn_enemy, EncounterDirector, EncounterEvent,
    EncounterPlugin, RescueCompleted,
};
pub use error::{CombatError, CombatResult, ConfigError};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger,
    set_logger_if_needed, ConsoleLogger, LogLevel, LogPrinter,
};
pub use player::PlayerSnapshot;
pub use timers::{PendingAction, ScheduledActions, SimulationClock};

/// Seed по умолчанию, если хост не вставил свой `DeterministicRng`
pub const DEFAULT_SEED: u64 = 42;

/// Фазы одного fixed шага
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Часы, созревшие таймеры, входящие попадания, пороги фаз босса
    Intake,
    /// FSM + поведения архетипов
    Decide,
    /// Снаряды, ударные волны
    Resolve,
    /// Cleanup сирот
    Lifecycle,
    /// Encounter director
    Direct,
    /// Visual commands для renderer'а
    Present,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Ресурсы, уже вставленные хостом (config, RNG, player), не перезаписываются.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        if !app.world().contains_resource::<SimulationConfig>() {
            app.insert_resource(config.clone());
        }
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(DEFAULT_SEED));
        }
        if !app.world().contains_resource::<EncounterDirector>() {
            app.insert_resource(EncounterDirector::new(&config.encounter));
        }

        app
            // Fixed timestep 60Hz
            .insert_resource(Time::<Fixed>::from_duration(fixed_timestep()))
            .init_resource::<PlayerSnapshot>()
            .init_resource::<SimulationClock>()
            .register_type::<Enemy>()
            .register_type::<Health>()
            .register_type::<CombatStats>()
            .register_type::<Attacker>()
            .register_type::<Facing>()
            .register_type::<PatrolRoute>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Intake,
                    SimulationSet::Decide,
                    SimulationSet::Resolve,
                    SimulationSet::Lifecycle,
                    SimulationSet::Direct,
                    SimulationSet::Present,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                timers::advance_clock
                    .in_set(SimulationSet::Intake)
                    .before(combat::run_scheduled_actions),
            )
            .add_plugins((CombatPlugin, AIPlugin, BossPlugin, EncounterPlugin, BridgePlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Длительность одного fixed шага (1/60 с)
pub fn fixed_timestep() -> Duration {
    Duration::from_secs_f64(1.0 / 60.0)
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время ручное: каждый `app.update()` = ровно один fixed шаг.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(TimeUpdateStrategy::ManualDuration(fixed_timestep()));

    app
}

/// Первый `update()` только инициализирует Real clock (delta = 0)
fn prime_clock(app: &mut App) {
    let unprimed = app
        .world()
        .get_resource::<Time<Real>>()
        .is_some_and(|time| time.first_update().is_none());
    if unprimed {
        app.update();
    }
}

/// Прогнать ровно `ticks` fixed шагов (при `ManualDuration(fixed_timestep())`)
pub fn advance_fixed_ticks(app: &mut App, ticks: u32) {
    prime_clock(app);
    for _ in 0..ticks {
        app.update();
    }
}

/// Потолок одного `app.update()`: `Time<Virtual>` обрезает delta выше своего `max_delta` (250ms)
pub const MAX_UPDATE_DELTA: f32 = 0.25;

/// `tick(deltaTime, playerPosition, playerState)` для frame loop хоста.
///
/// `delta` копится в fixed accumulator: кадр может дать 0, 1 или несколько fixed шагов.
/// Длинный кадр режется на куски ≤ `MAX_UPDATE_DELTA`, чтобы время не терялось.
pub fn tick(app: &mut App, delta: f32, player: PlayerSnapshot) {
    let mut remaining = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
    app.insert_resource(player);
    prime_clock(app);

    loop {
        let step = remaining.min(MAX_UPDATE_DELTA);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(step as f64)));
        app.update();

        remaining -= step;
        if remaining <= 0.0 {
            break;
        }
    }
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
