//! A mob: one body plus the AI pipeline that drives it

use critter_core::EntityId;
use critter_physics::MobBody;
use critter_world::World;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::AiConfig;
use crate::goal::{GoalContext, GoalScheduler};
use crate::memory::MobMemory;
use crate::movement::MoveControl;
use crate::navigator::Navigator;

pub struct Mob<B: MobBody> {
    id: EntityId,
    body: B,
    scheduler: GoalScheduler,
    navigator: Navigator,
    move_control: MoveControl,
    memory: MobMemory,
    config: AiConfig,
    rng: StdRng,
    tick: u64,
}

impl<B: MobBody> Mob<B> {
    pub fn new(id: EntityId, body: B, scheduler: GoalScheduler, config: AiConfig, seed: u64) -> Self {
        Self {
            id,
            body,
            scheduler,
            navigator: Navigator::new(),
            move_control: MoveControl::new(),
            memory: MobMemory::new(),
            config,
            rng: StdRng::seed_from_u64(seed),
            tick: 0,
        }
    }

    /// Run one simulation step of AI: goals, then the navigator, then the
    /// mover. Physics integration is left to whoever owns the body.
    pub fn tick(&mut self, world: &mut dyn World) {
        if self.memory.removed {
            return;
        }
        self.tick += 1;

        let mut ctx = GoalContext {
            self_id: self.id,
            tick: self.tick,
            config: &self.config,
            body: &mut self.body,
            world: &mut *world,
            navigator: &mut self.navigator,
            move_control: &mut self.move_control,
            memory: &mut self.memory,
            rng: &mut self.rng,
        };
        self.scheduler.tick(&mut ctx);

        self.navigator
            .tick(&self.body, &*world, &self.config.pathfinding, &mut self.move_control);
        self.move_control.tick(&mut self.body, &self.config.movement);
    }

    /// Damage notification; feeds the panic and revenge goals
    pub fn on_hurt(&mut self, source: Option<EntityId>) {
        self.memory.record_hurt(source, self.tick);
    }

    /// Stop every goal and mark the mob removed
    pub fn remove(&mut self, world: &mut dyn World) {
        let mut ctx = GoalContext {
            self_id: self.id,
            tick: self.tick,
            config: &self.config,
            body: &mut self.body,
            world,
            navigator: &mut self.navigator,
            move_control: &mut self.move_control,
            memory: &mut self.memory,
            rng: &mut self.rng,
        };
        self.scheduler.stop_all(&mut ctx);
        self.memory.mark_removed();
    }

    pub fn is_removed(&self) -> bool {
        self.memory.removed
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn move_control(&self) -> &MoveControl {
        &self.move_control
    }

    pub fn memory(&self) -> &MobMemory {
        &self.memory
    }

    pub fn scheduler(&self) -> &GoalScheduler {
        &self.scheduler
    }

    pub fn active_goals(&self) -> Vec<&'static str> {
        self.scheduler.active_goals()
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Ticks run so far
    pub fn age(&self) -> u64 {
        self.tick
    }
}
