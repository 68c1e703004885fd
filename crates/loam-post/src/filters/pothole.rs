use super::neighbor_heights;
use crate::context::PostContext;
use crate::error::FilterError;
use crate::filter::{Phase, PostBlockFilter};

use loam_core::BlockState;

/// Fills one-block pits that sit below all four neighbors with the material of their floor.
pub struct PotholeFiller {
    phase: Phase,
}

impl PotholeFiller {
    pub const KIND: &'static str = "pothole-filler";

    pub fn new(phase: Phase) -> Self {
        Self { phase }
    }
}

impl PostBlockFilter for PotholeFiller {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn on_post(&self, ctx: &PostContext<'_>, x: i32, z: i32) -> Result<(), FilterError> {
        let h = ctx.highest_terrain_block(x, z)?;
        if h < 0 || neighbor_heights(ctx, x, z)?.iter().any(|&n| n <= h) {
            return Ok(());
        }

        let top = ctx.block(x, h, z)?;
        if !top.is_solid() || ctx.block(x, h + 1, z)?.is_solid() {
            return Ok(());
        }

        if ctx.set_block(x, h + 1, z, top) {
            // Grass doesn't grow under other blocks.
            if top == BlockState::GRASS {
                ctx.set_block(x, h, z, BlockState::DIRT);
            }
            ctx.update_height(x, z, h + 1);
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
