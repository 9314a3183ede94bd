//! Target acquisition: pick the nearest visible prey and hold it with hysteresis

use critter_core::EntityId;
use critter_world::{EntityKind, EntitySnapshot};
use rand::rngs::StdRng;

use super::{Decision, Goal, GoalContext, Senses};

/// Periodically scans for the nearest valid entity and holds it as the
/// mob's target until it dies, escapes, or stays out of sight too long
#[derive(Debug, Clone)]
pub struct TargetGoal {
    priority: u32,
    range: f32,
    require_sight: bool,
    kinds: Vec<EntityKind>,
    /// Ticks between scans while nothing is held
    scan_interval: u64,
    /// Ticks a held target may stay out of sight
    sight_memory: u32,
    holding: Option<EntityId>,
    unseen_ticks: u32,
}

impl TargetGoal {
    pub fn new(priority: u32, range: f32, kinds: &[EntityKind]) -> Self {
        Self {
            priority,
            range,
            require_sight: true,
            kinds: kinds.to_vec(),
            scan_interval: 10,
            sight_memory: 60,
            holding: None,
            unseen_ticks: 0,
        }
    }

    pub fn without_sight(mut self) -> Self {
        self.require_sight = false;
        self
    }

    pub fn with_sight_memory(mut self, ticks: u32) -> Self {
        self.sight_memory = ticks;
        self
    }

    pub fn holding(&self) -> Option<EntityId> {
        self.holding
    }

    fn visible(&self, senses: &Senses<'_>, entity: &EntitySnapshot) -> bool {
        !self.require_sight || senses.can_see(entity.eye_position())
    }
}

impl Goal for TargetGoal {
    fn name(&self) -> &'static str {
        "target"
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn sense(&mut self, senses: &Senses<'_>) {
        let Some(id) = self.holding else {
            return;
        };
        match senses.world.entity(id) {
            Some(entity) if self.visible(senses, &entity) => self.unseen_ticks = 0,
            _ => self.unseen_ticks = self.unseen_ticks.saturating_add(1),
        }
    }

    fn evaluate(&self, senses: &Senses<'_>, _rng: &mut StdRng) -> Option<Decision> {
        if senses.memory.target.is_some() || senses.tick % self.scan_interval != 0 {
            return None;
        }
        let position = senses.body.position();
        senses
            .world
            .entities_near(position, self.range)
            .into_iter()
            .filter(|e| e.id != senses.self_id && self.kinds.contains(&e.kind))
            .filter(|e| self.visible(senses, e))
            .min_by(|a, b| {
                let da = a.position.distance_squared(position);
                let db = b.position.distance_squared(position);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|e| Decision::Target(e.id))
    }

    fn can_continue(&self, senses: &Senses<'_>, _rng: &mut StdRng) -> bool {
        let Some(id) = self.holding else {
            return false;
        };
        if senses.memory.target != Some(id) {
            return false;
        }
        let Some(target) = senses.target() else {
            return false;
        };
        let leash = self.range * 1.5;
        target.position.distance_squared(senses.body.position()) <= leash * leash
            && self.unseen_ticks <= self.sight_memory
    }

    fn commit(&mut self, decision: Decision) {
        if let Decision::Target(id) = decision {
            self.holding = Some(id);
            self.unseen_ticks = 0;
        }
    }

    fn on_start(&mut self, ctx: &mut GoalContext<'_>) {
        ctx.memory.target = self.holding;
    }

    fn on_stop(&mut self, ctx: &mut GoalContext<'_>) {
        if let Some(id) = self.holding.take() {
            ctx.memory.release_target(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::fixtures::Harness;
    use critter_core::BlockPos;
    use critter_world::{Block, EntityRecord};
    use glam::Vec3;

    const PLAYERS: &[EntityKind] = &[EntityKind::Player];

    fn spawn(harness: &mut Harness, id: u128, kind: EntityKind, position: Vec3) -> EntityId {
        harness
            .world
            .spawn_entity(EntityRecord::new(EntityId::from_u128(id), kind, position, 20.0))
    }

    fn scan_tick(harness: &mut Harness) {
        harness.tick = 10;
    }

    #[test]
    fn test_acquires_nearest_matching_entity() {
        let mut harness = Harness::flat();
        scan_tick(&mut harness);
        spawn(&mut harness, 1, EntityKind::Player, Vec3::new(8.5, 64.0, 0.5));
        let near = spawn(&mut harness, 2, EntityKind::Player, Vec3::new(4.5, 64.0, 0.5));
        spawn(&mut harness, 3, EntityKind::Passive, Vec3::new(2.5, 64.0, 0.5));
        let mut goal = TargetGoal::new(2, 16.0, PLAYERS);

        assert!(harness.start(&mut goal));
        assert_eq!(harness.memory.target, Some(near));
        assert_eq!(goal.holding(), Some(near));
    }

    #[test]
    fn test_scans_only_on_interval() {
        let mut harness = Harness::flat();
        spawn(&mut harness, 1, EntityKind::Player, Vec3::new(4.5, 64.0, 0.5));
        let mut goal = TargetGoal::new(2, 16.0, PLAYERS);
        harness.tick = 11;
        assert!(harness.evaluate(&mut goal).is_none());
        harness.tick = 20;
        assert!(harness.evaluate(&mut goal).is_some());
    }

    #[test]
    fn test_requires_line_of_sight() {
        let mut harness = Harness::flat();
        scan_tick(&mut harness);
        harness
            .world
            .fill(BlockPos::new(3, 64, -3), BlockPos::new(3, 66, 3), Block::Stone);
        spawn(&mut harness, 1, EntityKind::Player, Vec3::new(6.5, 64.0, 0.5));

        let mut goal = TargetGoal::new(2, 16.0, PLAYERS);
        assert!(harness.evaluate(&mut goal).is_none());
        let mut blind = TargetGoal::new(2, 16.0, PLAYERS).without_sight();
        assert!(harness.evaluate(&mut blind).is_some());
    }

    #[test]
    fn test_drops_target_beyond_leash() {
        let mut harness = Harness::flat();
        scan_tick(&mut harness);
        let player = spawn(&mut harness, 1, EntityKind::Player, Vec3::new(8.5, 64.0, 0.5));
        let mut goal = TargetGoal::new(2, 10.0, PLAYERS);
        assert!(harness.start(&mut goal));

        // Past the scan range but inside the 1.5x leash
        harness.world.set_entity_position(player, Vec3::new(14.5, 64.0, 0.5));
        assert!(harness.can_continue(&mut goal));
        harness.world.set_entity_position(player, Vec3::new(16.5, 64.0, 0.5));
        assert!(!harness.can_continue(&mut goal));

        goal.on_stop(&mut harness.ctx());
        assert!(harness.memory.target.is_none());
    }

    #[test]
    fn test_sight_memory_window() {
        let mut harness = Harness::flat();
        scan_tick(&mut harness);
        spawn(&mut harness, 1, EntityKind::Player, Vec3::new(6.5, 64.0, 0.5));
        let mut goal = TargetGoal::new(2, 16.0, PLAYERS).with_sight_memory(5);
        assert!(harness.start(&mut goal));

        harness
            .world
            .fill(BlockPos::new(3, 64, -3), BlockPos::new(3, 66, 3), Block::Stone);
        for _ in 0..5 {
            assert!(harness.can_continue(&mut goal));
        }
        assert!(!harness.can_continue(&mut goal));
    }

    #[test]
    fn test_dead_target_is_dropped() {
        let mut harness = Harness::flat();
        scan_tick(&mut harness);
        let player = spawn(&mut harness, 1, EntityKind::Player, Vec3::new(4.5, 64.0, 0.5));
        let mut goal = TargetGoal::new(2, 16.0, PLAYERS);
        assert!(harness.start(&mut goal));

        if let Some(record) = harness.world.record_mut(player) {
            record.snapshot.health = 0.0;
        }
        assert!(!harness.can_continue(&mut goal));
    }

    #[test]
    fn test_ignores_self() {
        let mut harness = Harness::flat();
        scan_tick(&mut harness);
        let own = harness.id;
        harness.world.spawn_entity(EntityRecord::new(
            own,
            EntityKind::Player,
            Vec3::new(0.5, 64.0, 0.5),
            20.0,
        ));
        let mut goal = TargetGoal::new(2, 16.0, PLAYERS);
        assert!(harness.evaluate(&mut goal).is_none());
    }
}
