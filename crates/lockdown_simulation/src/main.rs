//! Headless прогон LOCKDOWN encounter
//!
//! Скриптованный игрок: идёт по коридору мимо охраны, спасает учёных,
//! пересекает boss trigger. Печатает roster каждые 2 секунды.

use bevy::prelude::*;
use lockdown_simulation::{
    advance_fixed_ticks, count_alive, create_headless_app, spawn_enemy, Archetype, CombatLog,
    EncounterDirector, PlayerSnapshot, RescueCompleted, SimulationPlugin,
};

fn main() {
    let seed = 42;
    println!("Starting LOCKDOWN headless encounter (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    let roster = [
        (Archetype::Guard, Vec3::new(-4.0, 0.0, -10.0), vec![Vec3::new(-4.0, 0.0, -10.0), Vec3::new(4.0, 0.0, -10.0)]),
        (Archetype::Drone, Vec3::new(0.0, 4.0, -25.0), Vec::new()),
        (Archetype::Turret, Vec3::new(6.0, 0.0, -35.0), Vec::new()),
        (Archetype::ScientistZombie, Vec3::new(-3.0, 0.0, -40.0), Vec::new()),
        (Archetype::Mech, Vec3::new(0.0, 0.0, -50.0), Vec::new()),
    ];
    for (archetype, position, route) in roster {
        if let Err(e) = spawn_enemy(app.world_mut(), archetype, position, route) {
            eprintln!("Failed to spawn {}: {}", archetype.name(), e);
        }
    }

    // 30 секунд: игрок идёт от z=0 до z=-75 со скоростью 2.5 u/s
    for second in 0..30 {
        let z = -2.5 * second as f32;
        app.insert_resource(PlayerSnapshot::at(Vec3::new(0.0, 0.0, z)));

        if second % 5 == 0 && second > 0 {
            app.world_mut().send_event(RescueCompleted);
        }

        advance_fixed_ticks(&mut app, 60);

        if second % 2 == 0 {
            let alive = count_alive(app.world_mut());
            let director = app.world().resource::<EncounterDirector>();
            println!(
                "t={:>2}s player z={:>6.1}: {} alive, rescued {}, exit {}, boss {}",
                second, z, alive, director.rescued, director.exit_unlocked, director.boss_spawned
            );
        }
    }

    let log = app.world().resource::<CombatLog>();
    println!(
        "Simulation complete: {} hits on player ({:.0} damage), {} deaths",
        log.player_hits().count(),
        log.total_player_damage(),
        log.deaths.len()
    );
}
