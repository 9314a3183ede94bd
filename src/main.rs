//! Critter - headless mob AI sandbox
//!
//! Builds a small walled arena, spawns one mob of every kind next to a
//! player stand-in, runs the simulation and prints a JSON report.

mod arena;
mod settings;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use critter_ai::{MobKind, MobManager};
use critter_core::{EntityId, TickClock, Vec3};
use critter_physics::MobBody;
use critter_world::{EntityAccess, VoxelWorld};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use settings::SimSettings;

#[derive(Serialize)]
struct Report {
    ticks: u64,
    dummy_health: Option<f32>,
    projectiles: usize,
    mobs: Vec<MobReport>,
}

#[derive(Serialize)]
struct MobReport {
    id: EntityId,
    kind: MobKind,
    position: Vec3,
    health: Option<f32>,
    active_goals: Vec<&'static str>,
    target: Option<EntityId>,
    navigating: bool,
}

impl Report {
    fn collect(ticks: u64, world: &VoxelWorld, manager: &MobManager, dummy: EntityId) -> Self {
        let mobs = manager
            .mobs()
            .iter()
            .map(|managed| {
                let mob = &managed.mob;
                MobReport {
                    id: mob.id(),
                    kind: managed.kind,
                    position: mob.body().position(),
                    health: world.entity(mob.id()).map(|e| e.health),
                    active_goals: mob.active_goals(),
                    target: mob.memory().target,
                    navigating: !mob.navigator().is_idle(),
                }
            })
            .collect();

        Self {
            ticks,
            dummy_health: world.entity(dummy).map(|e| e.health),
            projectiles: world.projectiles().len(),
            mobs,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging, RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting Critter sandbox...");

    let settings = SimSettings::load();
    if std::env::args().any(|arg| arg == "--write-settings") {
        settings.save().context("Failed to write settings")?;
    }
    let sim = &settings.simulation;
    let mut clock = TickClock::new(sim.clock.clone()).context("Invalid tick configuration")?;

    let mut world = arena::build().context("Failed to build demo arena")?;
    let dummy = arena::spawn_dummy(&mut world);
    let mut manager = MobManager::new(settings.ai.clone());
    for (kind, position) in arena::spawn_points() {
        manager.spawn(&mut world, kind, position);
    }

    info!(
        "Running {} ticks at {} Hz ({})",
        sim.ticks,
        sim.clock.tick_rate,
        if sim.realtime { "realtime" } else { "headless" }
    );

    let mut simulated = 0u64;
    let mut run_tick = |world: &mut VoxelWorld, manager: &mut MobManager| {
        manager.tick(world);
        simulated += 1;
        if sim.report_interval > 0 && simulated % sim.report_interval == 0 {
            info!(
                "Tick {}: {} mobs alive, dummy health {:.1}",
                simulated,
                manager.len(),
                world.entity(dummy).map_or(0.0, |e| e.health)
            );
        }
        simulated
    };

    if sim.realtime {
        let pace = Duration::from_secs_f32(sim.clock.tick_duration() / 4.0);
        let mut last = Instant::now();
        let mut done = 0u64;
        while done < sim.ticks {
            let now = Instant::now();
            let steps = clock.advance(now.duration_since(last).as_secs_f32());
            last = now;
            for _ in 0..(steps as u64).min(sim.ticks - done) {
                done = run_tick(&mut world, &mut manager);
            }
            std::thread::sleep(pace);
        }
    } else {
        while clock.tick_count < sim.ticks {
            clock.step();
            run_tick(&mut world, &mut manager);
        }
    }

    let report = Report::collect(clock.tick_count.min(sim.ticks), &world, &manager, dummy);
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{}", json);

    info!("Critter sandbox finished");
    Ok(())
}
