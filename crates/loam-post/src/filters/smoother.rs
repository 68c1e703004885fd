use super::neighbor_heights;
use crate::context::PostContext;
use crate::error::FilterError;
use crate::filter::{Phase, PostBlockFilter};

use loam_core::BlockState;

/// Lowers one-block bumps that stick out above all four neighbors. The surface material moves down with the bump.
pub struct NibSmoother {
    phase: Phase,
}

impl NibSmoother {
    pub const KIND: &'static str = "nib-smoother";

    pub fn new(phase: Phase) -> Self {
        Self { phase }
    }
}

impl PostBlockFilter for NibSmoother {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn on_post(&self, ctx: &PostContext<'_>, x: i32, z: i32) -> Result<(), FilterError> {
        let h = ctx.highest_terrain_block(x, z)?;
        if h < 2 || neighbor_heights(ctx, x, z)?.iter().any(|&n| n >= h) {
            return Ok(());
        }

        let top = ctx.block(x, h, z)?;
        if !top.is_solid() || !ctx.block(x, h - 1, z)?.is_solid() {
            return Ok(());
        }

        let replacement = if ctx.block(x, h + 1, z)?.is_fluid() {
            BlockState::WATER
        } else {
            BlockState::AIR
        };
        ctx.set_block(x, h, z, replacement);
        ctx.set_block(x, h - 1, z, top);
        ctx.update_height(x, z, h - 1);

        Ok(())
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
