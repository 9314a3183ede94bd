//! Chunked in-memory block store and entity registry
//!
//! Blocks live in 16×16 chunk columns split into 16³ sections that are
//! allocated on first write. Cells in chunks that were never written read as
//! `None` (unloaded), cells in allocated chunks read as their stored block.

use std::collections::{BTreeMap, HashMap};

use critter_core::{BlockPos, EntityId};
use glam::Vec3;
use tracing::debug;

use crate::access::{BlockAccess, EntityAccess};
use crate::block::Block;
use crate::entity::{DamageEvent, EntityRecord, EntitySnapshot, Projectile};

/// Width of a chunk column and edge of a section, in blocks
pub const CHUNK_SIZE: i32 = 16;
const SECTION_VOLUME: usize = (CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Grid coordinate for a chunk column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The chunk column containing a block
    pub fn from_block(pos: BlockPos) -> Self {
        Self {
            x: pos.x.div_euclid(CHUNK_SIZE),
            z: pos.z.div_euclid(CHUNK_SIZE),
        }
    }

    /// Chebyshev distance to another chunk coord
    pub fn distance(&self, other: &ChunkCoord) -> u32 {
        (self.x.abs_diff(other.x)).max(self.z.abs_diff(other.z))
    }
}

/// One 16³ cube of blocks
struct Section {
    blocks: Box<[Block; SECTION_VOLUME]>,
}

impl Section {
    fn new() -> Self {
        Self {
            blocks: Box::new([Block::Air; SECTION_VOLUME]),
        }
    }

    fn index(pos: BlockPos) -> usize {
        let lx = pos.x.rem_euclid(CHUNK_SIZE) as usize;
        let ly = pos.y.rem_euclid(CHUNK_SIZE) as usize;
        let lz = pos.z.rem_euclid(CHUNK_SIZE) as usize;
        (ly * CHUNK_SIZE as usize + lz) * CHUNK_SIZE as usize + lx
    }
}

/// A single chunk column
#[derive(Default)]
pub struct Chunk {
    sections: BTreeMap<i32, Section>,
}

impl Chunk {
    fn get(&self, pos: BlockPos) -> Block {
        self.sections
            .get(&pos.y.div_euclid(CHUNK_SIZE))
            .map(|s| s.blocks[Section::index(pos)])
            .unwrap_or(Block::Air)
    }

    fn set(&mut self, pos: BlockPos, block: Block) {
        let section_y = pos.y.div_euclid(CHUNK_SIZE);
        if block.is_air() && !self.sections.contains_key(&section_y) {
            return;
        }
        let section = self.sections.entry(section_y).or_insert_with(Section::new);
        section.blocks[Section::index(pos)] = block;
    }

    /// Number of allocated sections
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}

/// Block grid plus the registry of entities living in it
#[derive(Default)]
pub struct VoxelWorld {
    chunks: HashMap<ChunkCoord, Chunk>,
    entities: HashMap<EntityId, EntityRecord>,
    damage_log: Vec<DamageEvent>,
    projectiles: Vec<Projectile>,
}

impl VoxelWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a block, loading its chunk if needed
    pub fn set_block(&mut self, pos: BlockPos, block: Block) {
        self.chunks
            .entry(ChunkCoord::from_block(pos))
            .or_default()
            .set(pos, block);
    }

    /// Fill the inclusive box between two corners
    pub fn fill(&mut self, a: BlockPos, b: BlockPos, block: Block) {
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            for y in a.y.min(b.y)..=a.y.max(b.y) {
                for z in a.z.min(b.z)..=a.z.max(b.z) {
                    self.set_block(BlockPos::new(x, y, z), block);
                }
            }
        }
    }

    /// Mark a chunk column as loaded without placing anything in it
    pub fn load_chunk(&mut self, coord: ChunkCoord) {
        self.chunks.entry(coord).or_default();
    }

    pub fn unload_chunk(&mut self, coord: ChunkCoord) {
        if self.chunks.remove(&coord).is_some() {
            debug!("Unloaded chunk ({}, {})", coord.x, coord.z);
        }
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    // --- Entities ---

    pub fn spawn_entity(&mut self, record: EntityRecord) -> EntityId {
        let id = record.snapshot.id;
        self.entities.insert(id, record);
        id
    }

    pub fn remove_entity(&mut self, id: EntityId) -> Option<EntityRecord> {
        self.entities.remove(&id)
    }

    pub fn record(&self, id: EntityId) -> Option<&EntityRecord> {
        self.entities.get(&id)
    }

    pub fn record_mut(&mut self, id: EntityId) -> Option<&mut EntityRecord> {
        self.entities.get_mut(&id)
    }

    /// Move an entity's registry entry (owners sync after their own physics)
    pub fn set_entity_position(&mut self, id: EntityId, position: Vec3) {
        if let Some(record) = self.entities.get_mut(&id) {
            record.snapshot.position = position;
        }
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Take all damage applied since the last call
    pub fn drain_damage_events(&mut self) -> Vec<DamageEvent> {
        std::mem::take(&mut self.damage_log)
    }

    /// Take the knockback accumulated on one entity
    pub fn take_knockback(&mut self, id: EntityId) -> Vec3 {
        self.entities
            .get_mut(&id)
            .map(|r| std::mem::replace(&mut r.pending_knockback, Vec3::ZERO))
            .unwrap_or(Vec3::ZERO)
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }
}

impl BlockAccess for VoxelWorld {
    fn block(&self, pos: BlockPos) -> Option<Block> {
        self.chunks
            .get(&ChunkCoord::from_block(pos))
            .map(|chunk| chunk.get(pos))
    }
}

impl EntityAccess for VoxelWorld {
    fn entity(&self, id: EntityId) -> Option<EntitySnapshot> {
        self.entities.get(&id).map(|r| r.snapshot)
    }

    fn entities_near(&self, center: Vec3, radius: f32) -> Vec<EntitySnapshot> {
        let radius_sq = radius * radius;
        let mut found: Vec<EntitySnapshot> = self
            .entities
            .values()
            .map(|r| r.snapshot)
            .filter(|s| s.is_alive() && (s.position - center).length_squared() <= radius_sq)
            .collect();
        // HashMap order is arbitrary; keep results reproducible
        found.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        found
    }

    fn damage(&mut self, target: EntityId, source: Option<EntityId>, amount: f32, knockback: Vec3) {
        let Some(record) = self.entities.get_mut(&target) else {
            return;
        };
        record.snapshot.health = (record.snapshot.health - amount).max(0.0);
        record.pending_knockback += knockback;
        self.damage_log.push(DamageEvent {
            target,
            source,
            amount,
            knockback,
        });
    }

    fn spawn_projectile(&mut self, owner: EntityId, origin: Vec3, velocity: Vec3) {
        self.projectiles.push(Projectile {
            owner,
            origin,
            velocity,
        });
    }
}
