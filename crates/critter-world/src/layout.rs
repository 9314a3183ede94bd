//! ASCII layouts for building small worlds
//!
//! A layout is a list of layers, bottom first. Each layer is a block of text
//! whose lines run along +Z and whose characters run along +X. Glyphs are
//! listed in [`Block::glyph`].

use critter_core::BlockPos;

use crate::block::Block;
use crate::error::WorldError;
use crate::voxel::VoxelWorld;

impl VoxelWorld {
    /// Build a world whose layer 0, row 0, column 0 sits at `origin`
    pub fn from_layers(origin: BlockPos, layers: &[&str]) -> Result<Self, WorldError> {
        let mut world = VoxelWorld::new();
        world.paint_layers(origin, layers)?;
        Ok(world)
    }

    /// Paint layers onto an existing world. Air glyphs overwrite.
    pub fn paint_layers(&mut self, origin: BlockPos, layers: &[&str]) -> Result<(), WorldError> {
        if layers.is_empty() {
            return Err(WorldError::EmptyLayout);
        }

        for (dy, layer) in layers.iter().enumerate() {
            let rows = layer.lines().filter(|line| !line.trim().is_empty());
            for (dz, row) in rows.enumerate() {
                for (dx, glyph) in row.chars().enumerate() {
                    let pos = origin.offset(dx as i32, dy as i32, dz as i32);
                    let block = Block::from_glyph(glyph)
                        .ok_or(WorldError::UnknownGlyph { glyph, pos })?;
                    self.set_block(pos, block);
                }
            }
        }
        Ok(())
    }
}
