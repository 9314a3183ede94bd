//! Built-in mob kinds and the goal lists they are assembled from

use critter_physics::BodyConfig;
use critter_world::EntityKind;
use serde::{Deserialize, Serialize};

use crate::goal::{
    EscapeGoal, FuseGoal, GoalScheduler, LookGoal, MeleeGoal, PanicGoal, RangedGoal,
    RevengeGoal, SwimGoal, TargetGoal, WanderGoal,
};

const PREY: &[EntityKind] = &[EntityKind::Player];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MobKind {
    Zombie,
    Skeleton,
    Creeper,
    Animal,
}

impl MobKind {
    pub const ALL: [MobKind; 4] = [
        MobKind::Zombie,
        MobKind::Skeleton,
        MobKind::Creeper,
        MobKind::Animal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MobKind::Zombie => "zombie",
            MobKind::Skeleton => "skeleton",
            MobKind::Creeper => "creeper",
            MobKind::Animal => "animal",
        }
    }

    /// How other mobs classify this one
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            MobKind::Animal => EntityKind::Passive,
            _ => EntityKind::Hostile,
        }
    }

    pub fn max_health(&self) -> f32 {
        match self {
            MobKind::Animal => 10.0,
            _ => 20.0,
        }
    }

    pub fn body_config(&self) -> BodyConfig {
        let base = BodyConfig::default();
        match self {
            MobKind::Zombie => BodyConfig {
                move_speed: 0.18,
                ..base
            },
            MobKind::Skeleton => BodyConfig {
                height: 1.99,
                ..base
            },
            MobKind::Creeper => BodyConfig {
                height: 1.7,
                ..base
            },
            MobKind::Animal => BodyConfig {
                width: 0.9,
                height: 1.3,
                move_speed: 0.16,
                ..base
            },
        }
    }

    /// Create the goal list for this kind
    pub fn goals(&self) -> GoalScheduler {
        match self {
            MobKind::Zombie => Self::zombie_setup(),
            MobKind::Skeleton => Self::skeleton_setup(),
            MobKind::Creeper => Self::creeper_setup(),
            MobKind::Animal => Self::animal_setup(),
        }
    }

    // --- Kind setup factories ---

    fn zombie_setup() -> GoalScheduler {
        GoalScheduler::new()
            .with_goal(SwimGoal::new(0))
            .with_goal(RevengeGoal::new(1))
            .with_goal(TargetGoal::new(2, 16.0, PREY))
            .with_goal(EscapeGoal::new(3, 1.0))
            .with_goal(MeleeGoal::new(4, 1.0, 3.0))
            .with_goal(WanderGoal::new(6, 0.8))
            .with_goal(LookGoal::new(7, 8.0))
    }

    fn skeleton_setup() -> GoalScheduler {
        GoalScheduler::new()
            .with_goal(SwimGoal::new(0))
            .with_goal(RevengeGoal::new(1))
            .with_goal(TargetGoal::new(2, 16.0, PREY))
            .with_goal(EscapeGoal::new(3, 1.0))
            .with_goal(RangedGoal::new(4, 1.0, 4.0, 12.0))
            .with_goal(WanderGoal::new(6, 0.8))
            .with_goal(LookGoal::new(7, 8.0))
    }

    fn creeper_setup() -> GoalScheduler {
        GoalScheduler::new()
            .with_goal(SwimGoal::new(0))
            .with_goal(TargetGoal::new(2, 16.0, PREY))
            .with_goal(FuseGoal::new(3, 30))
            .with_goal(MeleeGoal::new(4, 1.0, 0.0).approach_only())
            .with_goal(WanderGoal::new(5, 0.8))
            .with_goal(LookGoal::new(6, 8.0))
    }

    fn animal_setup() -> GoalScheduler {
        GoalScheduler::new()
            .with_goal(SwimGoal::new(0))
            .with_goal(PanicGoal::new(1, 1.25))
            .with_goal(EscapeGoal::new(2, 1.0))
            .with_goal(WanderGoal::new(5, 1.0))
            .with_goal(LookGoal::new(6, 6.0))
    }
}

impl std::fmt::Display for MobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_lists_are_priority_ordered() {
        assert_eq!(
            MobKind::Zombie.goals().goal_names(),
            vec!["swim", "revenge", "target", "escape", "melee", "wander", "look"]
        );
        assert_eq!(
            MobKind::Creeper.goals().goal_names(),
            vec!["swim", "target", "fuse", "melee", "wander", "look"]
        );
        assert_eq!(
            MobKind::Animal.goals().goal_names(),
            vec!["swim", "panic", "escape", "wander", "look"]
        );
    }

    #[test]
    fn test_every_kind_swims_first() {
        for kind in MobKind::ALL {
            assert_eq!(kind.goals().goal_names().first(), Some(&"swim"), "{kind}");
        }
    }

    #[test]
    fn test_only_animals_are_passive() {
        for kind in MobKind::ALL {
            let passive = kind.entity_kind() == EntityKind::Passive;
            assert_eq!(passive, kind == MobKind::Animal);
        }
    }
}
