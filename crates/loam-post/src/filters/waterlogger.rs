use crate::context::PostContext;
use crate::error::FilterError;
use crate::filter::{Phase, PostBlockFilter};

use loam_core::face_neighbors;
use loam_core::glam::IVec2;

/// Fills surface slabs with water when water touches them from above or from the side.
pub struct Waterlogger {
    phase: Phase,
}

impl Waterlogger {
    pub const KIND: &'static str = "waterlogger";

    pub fn new(phase: Phase) -> Self {
        Self { phase }
    }
}

impl PostBlockFilter for Waterlogger {
    fn kind(&self) -> &str {
        Self::KIND
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn on_post(&self, ctx: &PostContext<'_>, x: i32, z: i32) -> Result<(), FilterError> {
        let h = ctx.highest_terrain_block(x, z)?;
        for y in h.max(0)..=h + 1 {
            let block = ctx.block(x, y, z)?;
            let logged = match block.waterlogged() {
                Some(logged) if !block.is_waterlogged() => logged,
                _ => continue,
            };

            let mut wet = ctx.block(x, y + 1, z)?.is_fluid();
            for n in face_neighbors(IVec2::new(x, z)) {
                if wet {
                    break;
                }
                wet = ctx.block(n.x, y, n.y)?.is_fluid();
            }
            if wet {
                ctx.set_block(x, y, z, logged);
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

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::{run_filter, TestTerrain};

    use loam_core::glam::IVec3;
    use loam_core::{BlockState, ChunkCoords};

    fn cobble_slab() -> BlockState {
        BlockState::COBBLESTONE.slab().unwrap()
    }

    #[test]
    fn slab_under_water_is_waterlogged() {
        let (buffer, _) = run_filter(
            TestTerrain::flat(55),
            Waterlogger::new(0),
            ChunkCoords::new(0, 0),
            |buffer| {
                buffer.set(IVec3::new(4, 56, 4), cobble_slab());
            },
        );

        assert_eq!(buffer.get(IVec3::new(4, 56, 4)), cobble_slab().waterlogged());
    }

    #[test]
    fn slab_next_to_water_is_waterlogged() {
        let terrain = TestTerrain::from_fn(|x, _| if x < 8 { 58 } else { 62 });
        let sandstone_slab = BlockState::SANDSTONE.slab().unwrap();
        let (buffer, _) = run_filter(terrain, Waterlogger::new(0), ChunkCoords::new(0, 0), |buffer| {
            buffer.set(IVec3::new(8, 62, 3), sandstone_slab);
            buffer.set(IVec3::new(9, 62, 3), sandstone_slab);
        });

        assert_eq!(buffer.get(IVec3::new(8, 62, 3)), sandstone_slab.waterlogged());
        assert_eq!(buffer.get(IVec3::new(9, 62, 3)), Some(sandstone_slab));
    }

    #[test]
    fn dry_slab_stays_dry() {
        let (buffer, _) = run_filter(
            TestTerrain::flat(70),
            Waterlogger::new(0),
            ChunkCoords::new(0, 0),
            |buffer| {
                buffer.set(IVec3::new(4, 71, 4), cobble_slab());
            },
        );

        assert_eq!(buffer.get(IVec3::new(4, 71, 4)), Some(cobble_slab()));
    }
}
