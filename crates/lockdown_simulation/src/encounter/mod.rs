//! Encounter director: roster, rescue gate, boss trigger, арена.
//!
//! Гейты одноразовые:
//! - rescued ≥ threshold → выход открыт (ExitUnlocked, один раз)
//! - выход открыт и игрок пересёк z < boss_trigger_z → босс + арена запечатана
//! - босс мёртв → арена открыта, BossDefeated

use bevy::prelude::*;

use crate::ai::AIState;
use crate::config::{EncounterLayout, SimulationConfig};
use crate::player::PlayerSnapshot;

pub mod spawn;

pub use spawn::{count_alive, despawn_actor, dispose_encounter, enemy_bundle, spawn_enemy, EnemyBundle};

use crate::components::{Archetype, Enemy};

/// Хост сообщает: спасён один rescue target (учёный, заложник)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RescueCompleted;

/// Прогресс уровня для level layer (двери, барьер арены, музыка)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterEvent {
    ExitUnlocked,
    BossSpawned { boss: Entity },
    /// Непроходимый барьер вокруг арены
    ArenaSealed,
    ArenaOpened,
    BossDefeated { boss: Entity },
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct EncounterDirector {
    pub rescue_threshold: u32,
    pub boss_trigger_z: f32,
    pub boss_spawn: Vec3,
    pub rescued: u32,
    pub exit_unlocked: bool,
    pub boss_spawned: bool,
    pub boss: Option<Entity>,
    pub boss_defeated: bool,
    pub arena_sealed: bool,
    /// Живые враги (для HUD), обновляется каждый тик
    pub alive: usize,
}

impl Default for EncounterDirector {
    fn default() -> Self {
        Self::new(&EncounterLayout::default())
    }
}

impl EncounterDirector {
    pub fn new(layout: &EncounterLayout) -> Self {
        Self {
            rescue_threshold: layout.rescue_threshold,
            boss_trigger_z: layout.boss_trigger_z,
            boss_spawn: layout.boss_spawn(),
            rescued: 0,
            exit_unlocked: false,
            boss_spawned: false,
            boss: None,
            boss_defeated: false,
            arena_sealed: false,
            alive: 0,
        }
    }

    /// Учесть спасение. true: именно этот вызов открыл выход.
    pub fn record_rescue(&mut self) -> bool {
        self.rescued += 1;
        if !self.exit_unlocked && self.rescued >= self.rescue_threshold {
            self.exit_unlocked = true;
            return true;
        }
        false
    }

    /// Boss trigger: выход открыт, босса ещё не было, игрок за линией
    pub fn should_spawn_boss(&self, player: Option<Vec3>) -> bool {
        self.exit_unlocked
            && !self.boss_spawned
            && player.is_some_and(|position| position.z < self.boss_trigger_z)
    }
}

/// System: RescueCompleted → счётчик → ExitUnlocked
pub fn track_rescues(
    mut rescues: EventReader<RescueCompleted>,
    mut director: ResMut<EncounterDirector>,
    mut events: EventWriter<EncounterEvent>,
) {
    for _ in rescues.read() {
        if director.record_rescue() {
            events.write(EncounterEvent::ExitUnlocked);
            crate::log_info(&format!(
                "🚪 Exit unlocked ({}/{} rescued)",
                director.rescued, director.rescue_threshold
            ));
        }
    }
}

/// System: позиционный триггер босса (ровно один раз)
pub fn trigger_boss(
    mut commands: Commands,
    mut director: ResMut<EncounterDirector>,
    player: Res<PlayerSnapshot>,
    config: Res<SimulationConfig>,
    mut events: EventWriter<EncounterEvent>,
) {
    // Триггер позиционный: notarget не отключает его
    if !director.should_spawn_boss(player.position) {
        return;
    }

    // Guard ставим до спавна: ошибка конфигурации не должна ретраиться каждый тик
    director.boss_spawned = true;

    let bundle = match enemy_bundle(&config, Archetype::Boss, director.boss_spawn, Vec::new()) {
        Ok(bundle) => bundle,
        Err(e) => {
            crate::log_error(&format!("❌ Boss spawn failed: {}", e));
            return;
        }
    };

    let boss = commands.spawn(bundle).id();
    director.boss = Some(boss);
    director.arena_sealed = true;
    events.write(EncounterEvent::BossSpawned { boss });
    events.write(EncounterEvent::ArenaSealed);
    crate::log_info(&format!("👹 Boss {:?} spawned, arena sealed", boss));
}

/// System: boss-death hook (один раз через `boss_defeated`)
pub fn watch_boss(
    mut director: ResMut<EncounterDirector>,
    states: Query<&AIState>,
    mut events: EventWriter<EncounterEvent>,
) {
    let Some(boss) = director.boss else {
        return;
    };
    if director.boss_defeated {
        return;
    }

    // Удалённый босс (disposal после death sequence) тоже считается побеждённым
    let dead = states.get(boss).map_or(true, |state| state.is_dead());
    if !dead {
        return;
    }

    director.boss_defeated = true;
    director.arena_sealed = false;
    events.write(EncounterEvent::ArenaOpened);
    events.write(EncounterEvent::BossDefeated { boss });
    crate::log_info(&format!("🏆 Boss {:?} defeated, arena opened", boss));
}

/// System: счётчик живых для HUD
pub fn count_roster(mut director: ResMut<EncounterDirector>, enemies: Query<&AIState, With<Enemy>>) {
    let alive = enemies.iter().filter(|state| !state.is_dead()).count();
    if director.alive != alive {
        director.alive = alive;
    }
}

pub struct EncounterPlugin;

impl Plugin for EncounterPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RescueCompleted>()
            .add_event::<EncounterEvent>()
            .add_systems(
                FixedUpdate,
                (track_rescues, trigger_boss, watch_boss, count_roster)
                    .chain()
                    .in_set(crate::SimulationSet::Direct),
            );
    }
}
