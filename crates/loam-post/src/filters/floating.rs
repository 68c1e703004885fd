use crate::context::PostContext;
use crate::error::FilterError;
use crate::filter::{Phase, PostBlockFilter};

use loam_core::face_neighbors;
use loam_core::glam::IVec2;
use loam_core::BlockState;

/// Air pockets at least this tall under a surface block are caves, and the block is their roof.
const MIN_CAVE_HEIGHT: i32 = 3;

/// Deletes single surface blocks that float over a small gap without touching any other block at their level.
///
/// Detection only reads blocks; the removal is deferred until every column of the phase has been checked, so no column
/// ever sees another column's removal.
pub struct FloatingBlockRemover {
    phase: Phase,
}

impl FloatingBlockRemover {
    pub const KIND: &'static str = "floating-block-remover";

    pub fn new(phase: Phase) -> Self {
        Self { phase }
    }
}

impl PostBlockFilter for FloatingBlockRemover {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn on_post(&self, ctx: &PostContext<'_>, x: i32, z: i32) -> Result<(), FilterError> {
        let h = ctx.highest_terrain_block(x, z)?;
        if h < 2 || !ctx.block(x, h, z)?.is_solid() || !ctx.block(x, h - 1, z)?.is_air() {
            return Ok(());
        }

        for n in face_neighbors(IVec2::new(x, z)) {
            if ctx.block(n.x, h, n.y)?.is_solid() {
                return Ok(());
            }
        }

        let is_cave_roof = ctx
            .cave_floors(x, z)?
            .iter()
            .any(|cave| cave.ceiling == h - 1 && cave.ceiling - cave.floor + 1 >= MIN_CAVE_HEIGHT);
        if is_cave_roof {
            return Ok(());
        }

        ctx.defer(move |ctx| {
            ctx.set_block(x, h, z, BlockState::AIR);
            let mut y = h - 1;
            while y > 0 && !ctx.block(x, y, z)?.is_solid() {
                y -= 1;
            }
            ctx.update_height(x, z, y);
            Ok(())
        });

        Ok(())
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
