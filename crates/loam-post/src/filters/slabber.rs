use super::neighbor_heights;
use crate::context::PostContext;
use crate::error::FilterError;
use crate::filter::{Phase, PostBlockFilter};

use rand::Rng;

/// Softens one-block steps by putting a slab in front of them, on about half of the eligible columns.
pub struct Slabber {
    phase: Phase,
}

impl Slabber {
    pub const KIND: &'static str = "slabber";

    pub fn new(phase: Phase) -> Self {
        Self { phase }
    }
}

impl PostBlockFilter for Slabber {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn on_post(&self, ctx: &PostContext<'_>, x: i32, z: i32) -> Result<(), FilterError> {
        let h = ctx.highest_terrain_block(x, z)?;
        if h < 0 || ctx.block(x, h + 1, z)?.is_solid() {
            return Ok(());
        }

        let top = ctx.block(x, h, z)?;
        let slab = match top.slab() {
            Some(slab) if !top.is_slab() => slab,
            _ => return Ok(()),
        };
        if !neighbor_heights(ctx, x, z)?.contains(&(h + 1)) {
            return Ok(());
        }

        if ctx.column_rng(x, z).gen_bool(0.5) && ctx.set_block(x, h + 1, z, slab) {
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

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::{run_filter, TestTerrain};

    use loam_core::glam::IVec3;
    use loam_core::{BlockState, ChunkCoords};

    fn step(low: i32) -> TestTerrain {
        TestTerrain::from_fn(move |x, _| if x < 8 { low } else { low + 1 })
    }

    #[test]
    fn slabs_are_only_placed_in_front_of_steps() {
        let (buffer, _) = run_filter(step(70), Slabber::new(0), ChunkCoords::new(0, 0), |_| ());

        let cobble_slab = BlockState::COBBLESTONE.slab();
        let mut placed = 0;
        for z in 0..16 {
            for x in 0..16 {
                let above = buffer.get(IVec3::new(x, if x < 8 { 71 } else { 72 }, z));
                if x == 7 && above == cobble_slab {
                    placed += 1;
                } else {
                    assert_eq!(above, Some(BlockState::AIR), "column ({}, {})", x, z);
                }
            }
        }
        assert!(placed > 0);
        assert!(placed < 16);
    }

    #[test]
    fn sand_steps_get_sandstone_slabs() {
        let (buffer, _) = run_filter(step(50), Slabber::new(0), ChunkCoords::new(0, 0), |_| ());

        let sandstone_slab = BlockState::SANDSTONE.slab();
        assert!((0..16).any(|z| buffer.get(IVec3::new(7, 51, z)) == sandstone_slab));
        assert!((0..16).all(|z| buffer.get(IVec3::new(6, 51, z)) == Some(BlockState::WATER)));
    }

    #[test]
    fn placement_only_depends_on_the_seed() {
        let (a, _) = run_filter(step(70), Slabber::new(0), ChunkCoords::new(0, 0), |_| ());
        let (b, _) = run_filter(step(70), Slabber::new(0), ChunkCoords::new(0, 0), |_| ());
        assert_eq!(a, b);
    }
}
