use super::neighbor_heights;
use crate::context::PostContext;
use crate::error::FilterError;
use crate::filter::{Phase, PostBlockFilter};

use loam_core::BlockState;

/// Cliffs at least this tall get painted.
const MIN_WALL_HEIGHT: i32 = 3;

/// Turns the soft blocks of exposed cliff faces into rock. The surface block on top keeps its material.
pub struct WallPainter {
    phase: Phase,
}

impl WallPainter {
    pub const KIND: &'static str = "wall-painter";

    pub fn new(phase: Phase) -> Self {
        Self { phase }
    }
}

fn weathered(block: BlockState) -> Option<BlockState> {
    match block {
        BlockState::DIRT | BlockState::GRASS => Some(BlockState::STONE),
        BlockState::SAND => Some(BlockState::SANDSTONE),
        _ => None,
    }
}

impl PostBlockFilter for WallPainter {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn on_post(&self, ctx: &PostContext<'_>, x: i32, z: i32) -> Result<(), FilterError> {
        let h = ctx.highest_terrain_block(x, z)?;
        let lowest = neighbor_heights(ctx, x, z)?.iter().copied().min().unwrap_or(h);
        if h - lowest < MIN_WALL_HEIGHT {
            return Ok(());
        }

        for y in (lowest + 1).max(0)..h {
            if let Some(rock) = weathered(ctx.block(x, y, z)?) {
                ctx.set_block(x, y, z, rock);
            }
        }

        Ok(())
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
