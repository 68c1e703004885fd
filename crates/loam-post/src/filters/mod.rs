//! The built-in post-processing filters.
//!
//! Every built-in only writes blocks of the column it is called for. Neighbor heights are read from the snapshot
//! published at the end of the previous phase, so the outcome never depends on the order columns are visited in.

mod floating;
mod pothole;
mod slabber;
mod smoother;
mod wall;
mod waterlogger;

pub use floating::FloatingBlockRemover;
pub use pothole::PotholeFiller;
pub use slabber::Slabber;
pub use smoother::NibSmoother;
pub use wall::WallPainter;
pub use waterlogger::Waterlogger;

use crate::context::PostContext;
use crate::error::SampleError;

use loam_core::face_neighbors;
use loam_core::glam::IVec2;

/// Terrain heights of the four face neighbors of `(x, z)`.
fn neighbor_heights(ctx: &PostContext<'_>, x: i32, z: i32) -> Result<[i32; 4], SampleError> {
    let [a, b, c, d] = face_neighbors(IVec2::new(x, z));
    Ok([
        ctx.highest_terrain_block(a.x, a.y)?,
        ctx.highest_terrain_block(b.x, b.y)?,
        ctx.highest_terrain_block(c.x, c.y)?,
        ctx.highest_terrain_block(d.x, d.y)?,
    ])
}
