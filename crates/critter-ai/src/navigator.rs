//! Navigator: owns the current plan and decides when to re-plan
//!
//! Goals only ever set or clear a destination. Once per tick the navigator
//! checks whether its plan is still usable, re-runs the search when it is
//! not, and hands the next waypoint to [`MoveControl`].

use critter_core::math::horizontal_distance_squared;
use critter_core::BlockPos;
use critter_physics::MobBody;
use critter_world::BlockAccess;
use glam::Vec3;
use tracing::{debug, trace};

use crate::config::PathfindingConfig;
use crate::movement::MoveControl;
use crate::path::{find_path, Path, PathNodeEvaluator, SearchOutcome};

/// Why a new search was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplanReason {
    NewDestination,
    /// The plan was made for a different target cell
    StaleTarget,
    /// The world changed under the next waypoint
    BlockedWaypoint,
    IntervalElapsed,
}

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    path: Option<Path>,
    destination: Option<Vec3>,
    speed: f32,
    replan_countdown: u32,
    pending: Option<ReplanReason>,
    last_outcome: Option<SearchOutcome>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Head for `destination`. Re-targeting the same cell keeps the current
    /// plan and only updates the speed.
    pub fn navigate_to(&mut self, destination: Vec3, speed: f32) {
        self.speed = speed;
        let same_cell = self
            .destination
            .is_some_and(|d| BlockPos::from_vec3(d) == BlockPos::from_vec3(destination));
        self.destination = Some(destination);
        if !same_cell {
            self.last_outcome = None;
        }
        if !same_cell || self.path.is_none() {
            self.pending = Some(ReplanReason::NewDestination);
        }
    }

    /// Drop the destination and the plan
    pub fn stop(&mut self) {
        self.path = None;
        self.destination = None;
        self.pending = None;
    }

    pub fn is_idle(&self) -> bool {
        self.destination.is_none()
    }

    /// Holding a destination whose last search found no route. The search
    /// is retried every `replan_interval` ticks until it succeeds or the
    /// destination changes.
    pub fn is_blocked(&self) -> bool {
        self.destination.is_some()
            && self.path.is_none()
            && matches!(
                self.last_outcome,
                Some(SearchOutcome::Exhausted | SearchOutcome::IterationCap)
            )
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Result of the most recent search, if any ran
    pub fn last_outcome(&self) -> Option<SearchOutcome> {
        self.last_outcome
    }

    /// Whether `position` is within arrival distance of the destination
    pub fn has_reached_target(&self, position: Vec3, config: &PathfindingConfig) -> bool {
        self.destination.is_some_and(|dest| {
            horizontal_distance_squared(position, dest) < config.arrival_distance_sq
                && (position.y - dest.y).abs() < config.arrival_vertical
        })
    }

    pub fn tick<W: BlockAccess + ?Sized>(
        &mut self,
        body: &dyn MobBody,
        world: &W,
        config: &PathfindingConfig,
        move_control: &mut MoveControl,
    ) {
        let Some(destination) = self.destination else {
            return;
        };
        let position = body.position();

        if self.has_reached_target(position, config) {
            trace!("Reached {:?}", destination);
            self.stop();
            move_control.clear();
            return;
        }

        self.replan_countdown = self.replan_countdown.saturating_sub(1);
        if let Some(reason) = self.replan_reason(world, destination, config) {
            trace!("Re-planning toward {:?}: {:?}", destination, reason);
            if !self.replan(world, position, destination, config) {
                move_control.clear();
                return;
            }
        }

        let Some(path) = self.path.as_mut() else {
            return;
        };
        while path.should_advance(position, config.advance_horizontal, config.advance_vertical) {
            path.advance();
        }
        // Past the last waypoint, walk straight at the exact destination
        let waypoint = path
            .current()
            .map(|node| node.pos.bottom_center())
            .unwrap_or(destination);
        move_control.set_target(waypoint, self.speed);
    }

    fn replan_reason<W: BlockAccess + ?Sized>(
        &mut self,
        world: &W,
        destination: Vec3,
        config: &PathfindingConfig,
    ) -> Option<ReplanReason> {
        if let Some(reason) = self.pending.take() {
            return Some(reason);
        }
        let Some(path) = &self.path else {
            return (self.replan_countdown == 0).then_some(ReplanReason::IntervalElapsed);
        };
        if path.target() != BlockPos::from_vec3(destination) {
            return Some(ReplanReason::StaleTarget);
        }
        if let Some(node) = path.current() {
            let mut evaluator = PathNodeEvaluator::new(config);
            let now = evaluator.classify(world, node.pos);
            if now.pos != node.pos || !now.kind.is_traversable() {
                return Some(ReplanReason::BlockedWaypoint);
            }
        }
        if self.replan_countdown == 0 {
            return Some(ReplanReason::IntervalElapsed);
        }
        None
    }

    /// Run a fresh search, discarding the old plan. Returns false when no
    /// route was found; the destination is kept and the search retried once
    /// the countdown runs out, the same as having no plan yet.
    fn replan<W: BlockAccess + ?Sized>(
        &mut self,
        world: &W,
        position: Vec3,
        destination: Vec3,
        config: &PathfindingConfig,
    ) -> bool {
        self.replan_countdown = config.replan_interval;
        let start = BlockPos::from_vec3(position);
        let goal = BlockPos::from_vec3(destination);
        let result = find_path(world, start, goal, config);
        self.last_outcome = Some(result.outcome);

        match result.outcome {
            SearchOutcome::Found | SearchOutcome::AlreadyThere => {
                debug!(
                    "Planned {} -> {}: {} waypoints, {} expanded",
                    start,
                    goal,
                    result.path.len(),
                    result.expanded
                );
                self.path = Some(result.path);
                true
            }
            SearchOutcome::Exhausted | SearchOutcome::IterationCap => {
                debug!(
                    "No route {} -> {} ({:?} after {} expanded), retrying in {} ticks",
                    start, goal, result.outcome, result.expanded, config.replan_interval
                );
                self.path = None;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use critter_physics::KinematicBody;
    use critter_world::{Block, VoxelWorld};

    use crate::config::AiConfig;

    /// Single-row floor at y=63 from x=0..=20 along z=0
    fn strip() -> VoxelWorld {
        let mut world = VoxelWorld::new();
        world.fill(BlockPos::new(0, 63, 0), BlockPos::new(20, 63, 0), Block::Stone);
        world
    }

    #[test]
    fn test_strip_scenario_plans_and_arrives() {
        let world = strip();
        let config = AiConfig::default();
        let mut body = KinematicBody::new(Vec3::new(0.5, 64.0, 0.5));
        let mut navigator = Navigator::new();
        let mut control = MoveControl::new();
        let destination = Vec3::new(10.5, 64.0, 0.5);

        navigator.navigate_to(destination, 1.0);
        navigator.tick(&body, &world, &config.pathfinding, &mut control);

        let path = navigator.current_path().expect("planned");
        assert!(!path.is_empty());
        let end = path.end().unwrap().pos;
        assert_eq!((end.x, end.z), (10, 0));
        assert!(end.y.abs_diff(64) <= 1);

        let mut arrived = false;
        for _ in 0..200 {
            navigator.tick(&body, &world, &config.pathfinding, &mut control);
            if navigator.is_idle() {
                arrived = true;
                break;
            }
            control.tick(&mut body, &config.movement);
            body.step(&world);
        }
        assert!(arrived, "stopped at {:?}", body.position());
        let pos = body.position();
        assert!(horizontal_distance_squared(pos, destination) < 1.5);
        assert!((pos.y - 64.0).abs() < 2.0);
    }

    #[test]
    fn test_has_reached_target_thresholds() {
        let config = PathfindingConfig::default();
        let mut navigator = Navigator::new();
        assert!(!navigator.has_reached_target(Vec3::ZERO, &config));

        navigator.navigate_to(Vec3::new(10.0, 64.0, 0.0), 1.0);
        assert!(navigator.has_reached_target(Vec3::new(9.0, 64.0, 0.0), &config));
        assert!(!navigator.has_reached_target(Vec3::new(8.7, 64.0, 0.0), &config));
        assert!(!navigator.has_reached_target(Vec3::new(10.0, 66.5, 0.0), &config));
    }

    #[test]
    fn test_unreachable_destination_is_kept_and_blocked() {
        let mut world = strip();
        world.fill(BlockPos::new(5, 64, 0), BlockPos::new(5, 66, 0), Block::Stone);
        let config = PathfindingConfig::default();
        let body = KinematicBody::new(Vec3::new(0.5, 64.0, 0.5));
        let mut navigator = Navigator::new();
        let mut control = MoveControl::new();

        navigator.navigate_to(Vec3::new(10.5, 64.0, 0.5), 1.0);
        navigator.tick(&body, &world, &config, &mut control);
        assert!(!navigator.is_idle());
        assert!(navigator.is_blocked());
        assert!(navigator.current_path().is_none());
        assert!(!control.has_target());
        assert_eq!(navigator.last_outcome(), Some(SearchOutcome::Exhausted));

        navigator.navigate_to(Vec3::new(3.5, 64.0, 0.5), 1.0);
        assert!(!navigator.is_blocked());
    }

    #[test]
    fn test_failed_search_retries_after_world_changes() {
        let mut world = strip();
        world.fill(BlockPos::new(5, 64, 0), BlockPos::new(5, 66, 0), Block::Stone);
        let config = AiConfig::default();
        let mut body = KinematicBody::new(Vec3::new(0.5, 64.0, 0.5));
        let mut navigator = Navigator::new();
        let mut control = MoveControl::new();
        let destination = Vec3::new(10.5, 64.0, 0.5);

        navigator.navigate_to(destination, 1.0);
        navigator.tick(&body, &world, &config.pathfinding, &mut control);
        assert!(navigator.is_blocked());

        world.fill(BlockPos::new(5, 64, 0), BlockPos::new(5, 66, 0), Block::Air);
        let mut arrived = false;
        for _ in 0..config.pathfinding.replan_interval + 200 {
            navigator.tick(&body, &world, &config.pathfinding, &mut control);
            if navigator.is_idle() {
                arrived = true;
                break;
            }
            control.tick(&mut body, &config.movement);
            body.step(&world);
        }
        assert!(arrived, "stopped at {:?}", body.position());
        assert!(horizontal_distance_squared(body.position(), destination) < 1.5);
    }

    #[test]
    fn test_same_cell_keeps_plan() {
        let world = strip();
        let config = PathfindingConfig::default();
        let body = KinematicBody::new(Vec3::new(0.5, 64.0, 0.5));
        let mut navigator = Navigator::new();
        let mut control = MoveControl::new();

        navigator.navigate_to(Vec3::new(10.5, 64.0, 0.5), 1.0);
        navigator.tick(&body, &world, &config, &mut control);
        navigator.navigate_to(Vec3::new(10.2, 64.0, 0.7), 1.3);
        assert_eq!(navigator.replan_reason(&world, Vec3::new(10.2, 64.0, 0.7), &config), None);
        assert_eq!(navigator.speed(), 1.3);

        navigator.navigate_to(Vec3::new(12.5, 64.0, 0.5), 1.0);
        assert_eq!(
            navigator.replan_reason(&world, Vec3::new(12.5, 64.0, 0.5), &config),
            Some(ReplanReason::NewDestination)
        );
    }

    #[test]
    fn test_blocked_waypoint_triggers_replan() {
        let mut world = strip();
        let config = PathfindingConfig::default();
        let body = KinematicBody::new(Vec3::new(0.5, 64.0, 0.5));
        let mut navigator = Navigator::new();
        let mut control = MoveControl::new();
        let destination = Vec3::new(10.5, 64.0, 0.5);

        navigator.navigate_to(destination, 1.0);
        navigator.tick(&body, &world, &config, &mut control);
        let next = navigator.current_path().unwrap().current().unwrap().pos;
        world.set_block(next, Block::Stone);
        assert_eq!(
            navigator.replan_reason(&world, destination, &config),
            Some(ReplanReason::BlockedWaypoint)
        );
    }

    #[test]
    fn test_stop_clears_everything() {
        let mut navigator = Navigator::new();
        navigator.navigate_to(Vec3::new(3.0, 64.0, 0.0), 1.0);
        navigator.stop();
        assert!(navigator.is_idle());
        assert!(navigator.current_path().is_none());
        assert!(navigator.destination().is_none());
    }
}
