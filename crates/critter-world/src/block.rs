//! Block types and their capability flags
//!
//! Every capability the AI cares about is a flag fixed here, at block-type
//! definition time. Nothing downstream inspects block names.

use serde::{Deserialize, Serialize};

/// Capabilities of one block type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockProperties {
    /// Occupies its cell for collision and footing
    pub solid: bool,
    /// Does not block line of sight even when solid
    pub transparent: bool,
    /// Hurts whatever stands in or on it (fire, lava, cactus class)
    pub hazard: bool,
    /// Swimmable fluid
    pub liquid: bool,
    /// Too tall to step onto (fences, walls)
    pub fence: bool,
    /// Solid but openable by walking mobs
    pub door: bool,
    /// Extra path cost for walking on top of it (slippery or slowing surfaces)
    pub friction_penalty: f32,
}

impl BlockProperties {
    /// Properties of an unloaded or void cell: passable and see-through
    pub const VOID: BlockProperties = BlockProperties {
        solid: false,
        transparent: true,
        hazard: false,
        liquid: false,
        fence: false,
        door: false,
        friction_penalty: 0.0,
    };

    const fn opaque_solid() -> Self {
        BlockProperties {
            solid: true,
            transparent: false,
            ..Self::VOID
        }
    }
}

/// A block type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Block {
    Air,
    Stone,
    Dirt,
    Grass,
    Sand,
    Planks,
    Bedrock,
    Glass,
    Leaves,
    Ice,
    SoulSand,
    Water,
    Lava,
    Fire,
    Cactus,
    Magma,
    Fence,
    Door,
}

impl Block {
    /// All block types, in declaration order
    pub const ALL: [Block; 18] = [
        Block::Air,
        Block::Stone,
        Block::Dirt,
        Block::Grass,
        Block::Sand,
        Block::Planks,
        Block::Bedrock,
        Block::Glass,
        Block::Leaves,
        Block::Ice,
        Block::SoulSand,
        Block::Water,
        Block::Lava,
        Block::Fire,
        Block::Cactus,
        Block::Magma,
        Block::Fence,
        Block::Door,
    ];

    pub const fn properties(self) -> BlockProperties {
        match self {
            Block::Air => BlockProperties::VOID,
            Block::Stone | Block::Dirt | Block::Grass | Block::Sand | Block::Planks | Block::Bedrock => {
                BlockProperties::opaque_solid()
            }
            Block::Glass | Block::Leaves => BlockProperties {
                solid: true,
                transparent: true,
                ..BlockProperties::VOID
            },
            Block::Ice => BlockProperties {
                friction_penalty: 0.2,
                ..BlockProperties::opaque_solid()
            },
            Block::SoulSand => BlockProperties {
                friction_penalty: 0.5,
                ..BlockProperties::opaque_solid()
            },
            Block::Water => BlockProperties {
                liquid: true,
                ..BlockProperties::VOID
            },
            Block::Lava => BlockProperties {
                liquid: true,
                hazard: true,
                transparent: false,
                ..BlockProperties::VOID
            },
            Block::Fire => BlockProperties {
                hazard: true,
                ..BlockProperties::VOID
            },
            Block::Cactus => BlockProperties {
                hazard: true,
                ..BlockProperties::opaque_solid()
            },
            Block::Magma => BlockProperties {
                hazard: true,
                ..BlockProperties::opaque_solid()
            },
            Block::Fence => BlockProperties {
                solid: true,
                transparent: true,
                fence: true,
                ..BlockProperties::VOID
            },
            Block::Door => BlockProperties {
                solid: true,
                transparent: true,
                door: true,
                ..BlockProperties::VOID
            },
        }
    }

    pub const fn is_air(self) -> bool {
        matches!(self, Block::Air)
    }

    /// Character used by the ASCII layout loader
    pub const fn glyph(self) -> char {
        match self {
            Block::Air => '.',
            Block::Stone => '#',
            Block::Dirt => 'd',
            Block::Grass => 'g',
            Block::Sand => 's',
            Block::Planks => 'p',
            Block::Bedrock => 'B',
            Block::Glass => 'G',
            Block::Leaves => 'L',
            Block::Ice => 'i',
            Block::SoulSand => 'S',
            Block::Water => 'w',
            Block::Lava => 'l',
            Block::Fire => 'f',
            Block::Cactus => 'c',
            Block::Magma => 'm',
            Block::Fence => 'F',
            Block::Door => 'D',
        }
    }

    /// Inverse of [`Block::glyph`]; a space also reads as air
    pub fn from_glyph(glyph: char) -> Option<Block> {
        if glyph == ' ' {
            return Some(Block::Air);
        }
        Block::ALL.iter().copied().find(|b| b.glyph() == glyph)
    }
}
