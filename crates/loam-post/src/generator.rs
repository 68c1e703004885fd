use crate::error::SampleError;

use loam_core::{CaveFloors, ChunkBuffer, ChunkCoords, Sliver};
use rand::RngCore;

/// The base terrain pass. Implementations live with the host; the pipeline only needs these queries.
///
/// Every method must be deterministic for a given generator and safe to call from many threads at once. The height and
/// cave queries default to scanning [`BaseGenerator::sample_column`], which keeps them consistent with what the
/// [`CrossChunkSampler`](crate::CrossChunkSampler) reports. Overrides must preserve that consistency.
pub trait BaseGenerator: Send + Sync {
    /// Produces the column at world `(x, z)` without generating the rest of its chunk.
    fn sample_column(&self, x: i32, z: i32) -> Result<Sliver, SampleError>;

    /// Produces the raw block data of a whole chunk.
    fn generate_base_chunk(
        &self,
        chunk: ChunkCoords,
        _rng: &mut dyn RngCore,
    ) -> Result<ChunkBuffer, SampleError> {
        let mut buffer = ChunkBuffer::default();
        let min = chunk.min_column();
        for column in chunk.columns() {
            let sliver = self.sample_column(column.x, column.y)?;
            let local = column - min;
            buffer.write_column(local.x, local.y, &sliver);
        }
        Ok(buffer)
    }

    fn highest_terrain_block(&self, x: i32, z: i32) -> Result<i32, SampleError> {
        Ok(self.sample_column(x, z)?.highest_terrain())
    }

    fn highest_terrain_or_fluid_block(&self, x: i32, z: i32) -> Result<i32, SampleError> {
        Ok(self.sample_column(x, z)?.highest_terrain_or_fluid())
    }

    fn cave_floors(&self, x: i32, z: i32) -> Result<CaveFloors, SampleError> {
        Ok(self.sample_column(x, z)?.caves())
    }
}
