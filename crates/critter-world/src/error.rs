//! World construction errors

use critter_core::BlockPos;

/// Errors that can occur while building a world
#[derive(Debug, Clone, thiserror::Error)]
pub enum WorldError {
    #[error("unknown block glyph '{glyph}' at {pos}")]
    UnknownGlyph { glyph: char, pos: BlockPos },

    #[error("layout has no layers")]
    EmptyLayout,
}
