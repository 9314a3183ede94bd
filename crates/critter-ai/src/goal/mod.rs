//! Goals: the behaviour units a [`GoalScheduler`] arbitrates between
//!
//! Eligibility is split in two. [`Goal::evaluate`] only looks at the world
//! through [`Senses`] and proposes a [`Decision`]; the scheduler hands that
//! decision to [`Goal::commit`] only when the goal actually starts. Probing
//! a goal therefore never changes where the mob is going.

mod escape;
mod flee;
mod fuse;
mod look;
mod melee;
mod ranged;
mod revenge;
mod sampling;
mod scheduler;
mod swim;
mod target;
mod wander;

pub use escape::EscapeGoal;
pub use flee::PanicGoal;
pub use fuse::{Fuse, FuseGoal, FuseSignal, FuseState};
pub use look::LookGoal;
pub use melee::MeleeGoal;
pub use ranged::RangedGoal;
pub use revenge::RevengeGoal;
pub use sampling::{DestinationSampler, Sample};
pub use scheduler::GoalScheduler;
pub use swim::SwimGoal;
pub use target::TargetGoal;
pub use wander::WanderGoal;

use critter_core::EntityId;
use critter_physics::MobBody;
use critter_world::{EntitySnapshot, World};
use glam::Vec3;
use rand::rngs::StdRng;

use crate::config::AiConfig;
use crate::memory::MobMemory;
use crate::movement::MoveControl;
use crate::navigator::Navigator;
use crate::probes::has_line_of_sight;

/// What an eligible goal proposes to do once started
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Start with nothing chosen up front
    Proceed,
    /// Walk to (or look at) this point
    Destination(Vec3),
    /// Act on this entity
    Target(EntityId),
}

/// Read-only view of the mob and its surroundings
pub struct Senses<'a> {
    pub self_id: EntityId,
    pub tick: u64,
    pub config: &'a AiConfig,
    pub body: &'a dyn MobBody,
    pub world: &'a dyn World,
    pub navigator: &'a Navigator,
    pub memory: &'a MobMemory,
}

impl Senses<'_> {
    /// The remembered target, if it still exists and is alive
    pub fn target(&self) -> Option<EntitySnapshot> {
        live_target(self.world, self.memory)
    }

    /// Unobstructed sight line from this mob's eyes to `point`
    pub fn can_see(&self, point: Vec3) -> bool {
        has_line_of_sight(self.world, self.body.eye_position(), point, &self.config.probes)
    }
}

/// Everything a started goal may act on during one tick
pub struct GoalContext<'a> {
    pub self_id: EntityId,
    pub tick: u64,
    pub config: &'a AiConfig,
    pub body: &'a mut dyn MobBody,
    pub world: &'a mut dyn World,
    pub navigator: &'a mut Navigator,
    pub move_control: &'a mut MoveControl,
    pub memory: &'a mut MobMemory,
    pub rng: &'a mut StdRng,
}

impl GoalContext<'_> {
    /// Read-only senses plus the random source, borrowed side by side
    pub fn split(&mut self) -> (Senses<'_>, &mut StdRng) {
        let senses = Senses {
            self_id: self.self_id,
            tick: self.tick,
            config: self.config,
            body: &*self.body,
            world: &*self.world,
            navigator: &*self.navigator,
            memory: &*self.memory,
        };
        (senses, &mut *self.rng)
    }

    /// Stop walking: drop the destination and the move target
    pub fn halt(&mut self) {
        self.navigator.stop();
        self.move_control.clear();
    }

    pub fn target(&self) -> Option<EntitySnapshot> {
        live_target(&*self.world, &*self.memory)
    }

    pub fn can_see(&self, point: Vec3) -> bool {
        has_line_of_sight(&*self.world, self.body.eye_position(), point, &self.config.probes)
    }
}

fn live_target(world: &dyn World, memory: &MobMemory) -> Option<EntitySnapshot> {
    memory
        .target
        .and_then(|id| world.entity(id))
        .filter(EntitySnapshot::is_alive)
}

/// One behaviour unit.
///
/// Lower priority numbers take precedence. An exclusive goal stops every
/// active goal with a larger priority number when it starts, and keeps
/// them from starting while it runs.
pub trait Goal {
    fn name(&self) -> &'static str;
    fn priority(&self) -> u32;

    fn is_exclusive(&self) -> bool {
        false
    }

    /// Called on every goal once per tick, before any evaluation; the place
    /// to update counters that need a sample every tick
    fn sense(&mut self, _senses: &Senses<'_>) {}

    /// Propose a decision if the goal could start now
    fn evaluate(&self, senses: &Senses<'_>, rng: &mut StdRng) -> Option<Decision>;

    /// Whether an active goal keeps running
    fn can_continue(&self, senses: &Senses<'_>, rng: &mut StdRng) -> bool {
        self.evaluate(senses, rng).is_some()
    }

    /// Accept the decision `evaluate` proposed; called only on activation
    fn commit(&mut self, _decision: Decision) {}

    fn on_start(&mut self, _ctx: &mut GoalContext<'_>) {}
    fn on_tick(&mut self, _ctx: &mut GoalContext<'_>) {}
    fn on_stop(&mut self, _ctx: &mut GoalContext<'_>) {}
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Shared test harness: a flat arena and a context builder

    use critter_core::BlockPos;
    use critter_physics::KinematicBody;
    use critter_world::{Block, VoxelWorld};
    use rand::SeedableRng;

    use super::*;

    pub struct Harness {
        pub id: EntityId,
        pub tick: u64,
        pub config: AiConfig,
        pub body: KinematicBody,
        pub world: VoxelWorld,
        pub navigator: Navigator,
        pub move_control: MoveControl,
        pub memory: MobMemory,
        pub rng: StdRng,
    }

    impl Harness {
        /// 41×41 stone floor at y=63 with the mob standing at the origin
        pub fn flat() -> Self {
            let mut world = VoxelWorld::new();
            world.fill(BlockPos::new(-20, 63, -20), BlockPos::new(20, 63, 20), Block::Stone);
            Self::with_world(world, Vec3::new(0.5, 64.0, 0.5))
        }

        pub fn with_world(world: VoxelWorld, position: Vec3) -> Self {
            let mut body = KinematicBody::new(position);
            body.step(&world);
            Self {
                id: EntityId::from_u128(1000),
                tick: 1,
                config: AiConfig::default(),
                body,
                world,
                navigator: Navigator::new(),
                move_control: MoveControl::new(),
                memory: MobMemory::new(),
                rng: StdRng::seed_from_u64(7),
            }
        }

        pub fn ctx(&mut self) -> GoalContext<'_> {
            GoalContext {
                self_id: self.id,
                tick: self.tick,
                config: &self.config,
                body: &mut self.body,
                world: &mut self.world,
                navigator: &mut self.navigator,
                move_control: &mut self.move_control,
                memory: &mut self.memory,
                rng: &mut self.rng,
            }
        }

        /// Run sense + evaluate the way the scheduler does
        pub fn evaluate(&mut self, goal: &mut dyn Goal) -> Option<Decision> {
            let mut ctx = self.ctx();
            let (senses, rng) = ctx.split();
            goal.sense(&senses);
            goal.evaluate(&senses, rng)
        }

        pub fn can_continue(&mut self, goal: &mut dyn Goal) -> bool {
            let mut ctx = self.ctx();
            let (senses, rng) = ctx.split();
            goal.sense(&senses);
            goal.can_continue(&senses, rng)
        }

        /// Evaluate, and if eligible, commit and start the goal
        pub fn start(&mut self, goal: &mut dyn Goal) -> bool {
            match self.evaluate(goal) {
                Some(decision) => {
                    goal.commit(decision);
                    goal.on_start(&mut self.ctx());
                    true
                }
                None => false,
            }
        }

        pub fn on_tick(&mut self, goal: &mut dyn Goal) {
            goal.on_tick(&mut self.ctx());
            self.tick += 1;
        }

        /// Move the body one tick: navigator, mover, physics
        pub fn step_body(&mut self) {
            self.navigator
                .tick(&self.body, &self.world, &self.config.pathfinding, &mut self.move_control);
            self.move_control.tick(&mut self.body, &self.config.movement);
            self.body.step(&self.world);
        }
    }
}
