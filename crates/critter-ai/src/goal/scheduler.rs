//! Priority-ordered goal arbitration

use tracing::debug;

use super::{Goal, GoalContext};

struct Slot {
    goal: Box<dyn Goal>,
    active: bool,
}

/// Owns a mob's goals for its whole lifetime, sorted by priority
#[derive(Default)]
pub struct GoalScheduler {
    slots: Vec<Slot>,
}

impl GoalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert after every goal of equal or better priority
    pub fn add_goal(&mut self, goal: Box<dyn Goal>) {
        let priority = goal.priority();
        let index = self
            .slots
            .iter()
            .position(|slot| slot.goal.priority() > priority)
            .unwrap_or(self.slots.len());
        self.slots.insert(index, Slot { goal, active: false });
    }

    /// Builder form of [`GoalScheduler::add_goal`]
    pub fn with_goal(mut self, goal: impl Goal + 'static) -> Self {
        self.add_goal(Box::new(goal));
        self
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Names of all goals in evaluation order
    pub fn goal_names(&self) -> Vec<&'static str> {
        self.slots.iter().map(|slot| slot.goal.name()).collect()
    }

    /// Names of the active goals in priority order
    pub fn active_goals(&self) -> Vec<&'static str> {
        self.slots
            .iter()
            .filter(|slot| slot.active)
            .map(|slot| slot.goal.name())
            .collect()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.slots.iter().any(|slot| slot.active && slot.goal.name() == name)
    }

    /// One evaluation pass followed by ticking every goal left active
    pub fn tick(&mut self, ctx: &mut GoalContext<'_>) {
        {
            let (senses, _) = ctx.split();
            for slot in &mut self.slots {
                slot.goal.sense(&senses);
            }
        }

        for i in 0..self.slots.len() {
            if self.slots[i].active {
                let keep = {
                    let (senses, rng) = ctx.split();
                    self.slots[i].goal.can_continue(&senses, rng)
                };
                if !keep {
                    self.stop(i, ctx);
                }
                continue;
            }

            if self.blocked_by_exclusive(i) {
                continue;
            }
            let decision = {
                let (senses, rng) = ctx.split();
                self.slots[i].goal.evaluate(&senses, rng)
            };
            let Some(decision) = decision else {
                continue;
            };

            if self.slots[i].goal.is_exclusive() {
                let priority = self.slots[i].goal.priority();
                for j in 0..self.slots.len() {
                    if j != i && self.slots[j].active && self.slots[j].goal.priority() > priority {
                        self.stop(j, ctx);
                    }
                }
            }

            let slot = &mut self.slots[i];
            slot.goal.commit(decision);
            slot.goal.on_start(ctx);
            slot.active = true;
            debug!(
                "Goal '{}' (priority {}) started for {}",
                slot.goal.name(),
                slot.goal.priority(),
                ctx.self_id
            );
        }

        for slot in &mut self.slots {
            if slot.active {
                slot.goal.on_tick(ctx);
            }
        }
    }

    /// Stop every active goal, e.g. when the mob is removed
    pub fn stop_all(&mut self, ctx: &mut GoalContext<'_>) {
        for i in 0..self.slots.len() {
            if self.slots[i].active {
                self.stop(i, ctx);
            }
        }
    }

    /// An active exclusive goal with strictly better priority keeps slot `i`
    /// from starting
    fn blocked_by_exclusive(&self, i: usize) -> bool {
        let priority = self.slots[i].goal.priority();
        self.slots
            .iter()
            .any(|s| s.active && s.goal.is_exclusive() && s.goal.priority() < priority)
    }

    fn stop(&mut self, i: usize, ctx: &mut GoalContext<'_>) {
        let slot = &mut self.slots[i];
        slot.active = false;
        slot.goal.on_stop(ctx);
        debug!(
            "Goal '{}' (priority {}) stopped for {}",
            slot.goal.name(),
            slot.goal.priority(),
            ctx.self_id
        );
    }
}
