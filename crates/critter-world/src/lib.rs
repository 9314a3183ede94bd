//! Critter World - the block grid and entity registry the mob AI runs against
//!
//! Provides explicit block capability flags, the `BlockAccess`/`EntityAccess`
//! query traits, and a chunked in-memory `VoxelWorld` implementing both.

pub mod access;
pub mod block;
pub mod entity;
pub mod error;
pub mod layout;
pub mod voxel;

pub use access::{BlockAccess, EntityAccess, World};
pub use block::{Block, BlockProperties};
pub use entity::{DamageEvent, EntityKind, EntityRecord, EntitySnapshot, Projectile};
pub use error::WorldError;
pub use voxel::{ChunkCoord, VoxelWorld, CHUNK_SIZE};
