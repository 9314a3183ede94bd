//! Mob manager - owns every mob and steps them against a `VoxelWorld`

use critter_core::EntityId;
use critter_physics::{KinematicBody, MobBody};
use critter_world::{EntityAccess, EntityRecord, VoxelWorld};
use glam::Vec3;
use tracing::info;

use crate::config::AiConfig;
use crate::mob::Mob;
use crate::presets::MobKind;

pub struct ManagedMob {
    pub kind: MobKind,
    pub mob: Mob<KinematicBody>,
}

/// Owns all mobs in spawn order, so a tick is reproducible
pub struct MobManager {
    mobs: Vec<ManagedMob>,
    config: AiConfig,
    next_seed: u64,
}

impl MobManager {
    pub fn new(config: AiConfig) -> Self {
        Self {
            mobs: Vec::new(),
            config,
            next_seed: 1,
        }
    }

    pub fn spawn(&mut self, world: &mut VoxelWorld, kind: MobKind, position: Vec3) -> EntityId {
        self.spawn_with_id(world, kind, position, EntityId::new())
    }

    /// Spawn with a caller-chosen id and register it in the world
    pub fn spawn_with_id(
        &mut self,
        world: &mut VoxelWorld,
        kind: MobKind,
        position: Vec3,
        id: EntityId,
    ) -> EntityId {
        let body = KinematicBody::with_config(position, kind.body_config());
        world.spawn_entity(
            EntityRecord::new(id, kind.entity_kind(), position, kind.max_health())
                .with_size(body.width(), body.height()),
        );

        let seed = self.next_seed;
        self.next_seed += 1;
        let mob = Mob::new(id, body, kind.goals(), self.config.clone(), seed);
        self.mobs.push(ManagedMob { kind, mob });
        info!("Spawned {} {} at {:?}", kind, id, position);
        id
    }

    /// One simulation step: deliver damage, run AI, integrate bodies, sync
    /// the registry, and drop mobs that died or detonated
    pub fn tick(&mut self, world: &mut VoxelWorld) {
        for event in world.drain_damage_events() {
            if let Some(managed) = self.get_mut(event.target) {
                managed.mob.on_hurt(event.source);
            }
        }

        for managed in &mut self.mobs {
            let id = managed.mob.id();
            let push = world.take_knockback(id);
            if push != Vec3::ZERO {
                managed.mob.body_mut().add_velocity(push);
            }
            managed.mob.tick(world);
            managed.mob.body_mut().step(&*world);
            world.set_entity_position(id, managed.mob.body().position());
        }

        let mut i = 0;
        while i < self.mobs.len() {
            let id = self.mobs[i].mob.id();
            let dead = world.entity(id).map_or(true, |e| !e.is_alive());
            if self.mobs[i].mob.is_removed() || dead {
                let managed = self.mobs.remove(i);
                managed.retire(world, dead);
            } else {
                i += 1;
            }
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&ManagedMob> {
        self.mobs.iter().find(|m| m.mob.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut ManagedMob> {
        self.mobs.iter_mut().find(|m| m.mob.id() == id)
    }

    pub fn mobs(&self) -> &[ManagedMob] {
        &self.mobs
    }

    pub fn len(&self) -> usize {
        self.mobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mobs.is_empty()
    }

    pub fn count_by_kind(&self, kind: MobKind) -> usize {
        self.mobs.iter().filter(|m| m.kind == kind).count()
    }
}

impl ManagedMob {
    fn retire(mut self, world: &mut VoxelWorld, died: bool) {
        let id = self.mob.id();
        if !self.mob.is_removed() {
            self.mob.remove(world);
        }
        world.remove_entity(id);
        let reason = if died { "died" } else { "removed" };
        info!("{} {} {} after {} ticks", self.kind, id, reason, self.mob.age());
    }
}
