//! Entity records held by the world's registry

use critter_core::EntityId;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Broad classification used for targeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Hostile,
    Passive,
}

/// Read-only view of an entity as other mobs see it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Feet position
    pub position: Vec3,
    pub width: f32,
    pub height: f32,
    pub health: f32,
}

impl EntitySnapshot {
    /// Eye point, slightly below the top of the bounding box
    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.height * 0.85, 0.0)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

/// Mutable registry entry
#[derive(Debug, Clone)]
pub struct EntityRecord {
    pub snapshot: EntitySnapshot,
    pub max_health: f32,
    /// Knockback accumulated since the owner last drained it
    pub pending_knockback: Vec3,
}

impl EntityRecord {
    pub fn new(id: EntityId, kind: EntityKind, position: Vec3, health: f32) -> Self {
        Self {
            snapshot: EntitySnapshot {
                id,
                kind,
                position,
                width: 0.6,
                height: 1.8,
                health,
            },
            max_health: health,
            pending_knockback: Vec3::ZERO,
        }
    }

    /// Override the bounding box size
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.snapshot.width = width;
        self.snapshot.height = height;
        self
    }
}

/// A damage application, kept so the owner can react (panic, revenge)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    pub target: EntityId,
    pub source: Option<EntityId>,
    pub amount: f32,
    pub knockback: Vec3,
}

/// A launched projectile; flight is simulated by whoever owns the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub owner: EntityId,
    pub origin: Vec3,
    pub velocity: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eye_position_below_top() {
        let record = EntityRecord::new(EntityId::from_u128(1), EntityKind::Player, Vec3::ZERO, 20.0);
        let eye = record.snapshot.eye_position();
        assert!(eye.y > 0.0 && eye.y < record.snapshot.height);
    }

    #[test]
    fn test_alive() {
        let mut record = EntityRecord::new(EntityId::from_u128(1), EntityKind::Passive, Vec3::ZERO, 4.0);
        assert!(record.snapshot.is_alive());
        record.snapshot.health = 0.0;
        assert!(!record.snapshot.is_alive());
    }
}
