//! Per-mob blackboard shared between goals

use critter_core::EntityId;

/// What a mob remembers between ticks
#[derive(Debug, Clone, Default)]
pub struct MobMemory {
    /// Entity the mob is currently hunting
    pub target: Option<EntityId>,
    /// Who hurt it last, if anyone did
    pub last_attacker: Option<EntityId>,
    /// Tick of the most recent damage
    pub last_hurt_tick: Option<u64>,
    /// Set once the mob has left the simulation (e.g. detonated)
    pub removed: bool,
}

impl MobMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hurt(&mut self, source: Option<EntityId>, tick: u64) {
        self.last_hurt_tick = Some(tick);
        if source.is_some() {
            self.last_attacker = source;
        }
    }

    /// Whether damage arrived within the last `window` ticks
    pub fn hurt_within(&self, now: u64, window: u64) -> bool {
        self.last_hurt_tick
            .is_some_and(|tick| now.saturating_sub(tick) <= window)
    }

    /// Forget the target, but only if it is still `id`
    pub fn release_target(&mut self, id: EntityId) {
        if self.target == Some(id) {
            self.target = None;
        }
    }

    pub fn mark_removed(&mut self) {
        self.removed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hurt_window() {
        let mut memory = MobMemory::new();
        assert!(!memory.hurt_within(10, 100));
        memory.record_hurt(Some(EntityId::from_u128(7)), 50);
        assert!(memory.hurt_within(150, 100));
        assert!(!memory.hurt_within(151, 100));
        assert_eq!(memory.last_attacker, Some(EntityId::from_u128(7)));
    }

    #[test]
    fn test_anonymous_damage_keeps_attacker() {
        let mut memory = MobMemory::new();
        memory.record_hurt(Some(EntityId::from_u128(7)), 1);
        memory.record_hurt(None, 5);
        assert_eq!(memory.last_attacker, Some(EntityId::from_u128(7)));
        assert_eq!(memory.last_hurt_tick, Some(5));
    }

    #[test]
    fn test_release_only_matching_target() {
        let mut memory = MobMemory::new();
        memory.target = Some(EntityId::from_u128(1));
        memory.release_target(EntityId::from_u128(2));
        assert!(memory.target.is_some());
        memory.release_target(EntityId::from_u128(1));
        assert!(memory.target.is_none());
    }
}
