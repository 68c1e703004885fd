use crate::error::SampleError;
use crate::sampler::CrossChunkSampler;

use loam_core::glam::IVec3;
use loam_core::{local_coords, BlockState, ChunkBuffer, ChunkCoords, SmallKeyHashMap};
use parking_lot::Mutex;

/// An attempt to write a block outside of the chunk owned by the running invocation. The write is dropped.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Overdraw {
    pub owner: ChunkCoords,
    pub target: ChunkCoords,
    pub position: IVec3,
}

/// Everything one invocation owns while post-processing a chunk.
///
/// The buffer sits behind a single lock shared by all column tasks. Height updates are staged and only become visible
/// when [`publish_heights`](Self::publish_heights) runs at the end of a phase.
pub struct OwnedChunk {
    coords: ChunkCoords,
    buffer: Mutex<ChunkBuffer>,
    overdraws: Mutex<Vec<Overdraw>>,
    heights: Mutex<SmallKeyHashMap<(i32, i32), i32>>,
    staged_heights: Mutex<SmallKeyHashMap<(i32, i32), i32>>,
}

impl OwnedChunk {
    pub fn new(coords: ChunkCoords, buffer: ChunkBuffer) -> Self {
        Self {
            coords,
            buffer: Mutex::new(buffer),
            overdraws: Mutex::new(Vec::new()),
            heights: Mutex::new(SmallKeyHashMap::default()),
            staged_heights: Mutex::new(SmallKeyHashMap::default()),
        }
    }

    pub fn coords(&self) -> ChunkCoords {
        self.coords
    }

    #[inline]
    pub fn owns(&self, x: i32, z: i32) -> bool {
        self.coords.contains(x, z)
    }

    /// The published terrain height of an owned column, if a filter changed it.
    pub fn height_override(&self, x: i32, z: i32) -> Option<i32> {
        self.heights.lock().get(&(x, z)).copied()
    }

    pub fn stage_height(&self, x: i32, z: i32, height: i32) {
        self.staged_heights.lock().insert((x, z), height);
    }

    pub fn publish_heights(&self) {
        let staged = std::mem::take(&mut *self.staged_heights.lock());
        self.heights.lock().extend(staged);
    }

    pub fn overdraws(&self) -> Vec<Overdraw> {
        self.overdraws.lock().clone()
    }

    pub fn into_parts(self) -> (ChunkBuffer, Vec<Overdraw>) {
        (self.buffer.into_inner(), self.overdraws.into_inner())
    }

    /// Like [`into_parts`](Self::into_parts), for when something else still holds a reference. Leaves an empty chunk.
    pub fn take_parts(&self) -> (ChunkBuffer, Vec<Overdraw>) {
        (
            std::mem::take(&mut *self.buffer.lock()),
            std::mem::take(&mut *self.overdraws.lock()),
        )
    }
}

/// Routes block reads and writes either to the owned chunk buffer or to the [`CrossChunkSampler`].
#[derive(Clone, Copy)]
pub struct BlockAccess<'a> {
    owned: &'a OwnedChunk,
    sampler: &'a CrossChunkSampler,
}

impl<'a> BlockAccess<'a> {
    pub fn new(owned: &'a OwnedChunk, sampler: &'a CrossChunkSampler) -> Self {
        Self { owned, sampler }
    }

    pub fn owned(&self) -> &'a OwnedChunk {
        self.owned
    }

    pub fn sampler(&self) -> &'a CrossChunkSampler {
        self.sampler
    }

    /// Reads a block in world coordinates. Blocks of other chunks come from their base generation, never from a buffer.
    pub fn get_block(&self, p: IVec3) -> Result<BlockState, SampleError> {
        if self.owned.owns(p.x, p.z) {
            let buffer = self.owned.buffer.lock();
            return Ok(buffer.get(local_coords(p)).unwrap_or(BlockState::AIR));
        }

        Ok(self.sampler.sample(p.x, p.z)?.get(p.y))
    }

    /// Writes a block in world coordinates. Returns `false` if nothing was written, either because the position is
    /// above or below the chunk, or because it belongs to another chunk (an [`Overdraw`]).
    pub fn set_block(&self, p: IVec3, state: BlockState) -> bool {
        if self.owned.owns(p.x, p.z) {
            return self.owned.buffer.lock().set(local_coords(p), state);
        }

        let overdraw = Overdraw {
            owner: self.owned.coords,
            target: ChunkCoords::containing(p.x, p.z),
            position: p,
        };
        log::warn!(
            "Post block overdraw: {} into {} at {}",
            overdraw.owner,
            overdraw.target,
            p
        );
        self.owned.overdraws.lock().push(overdraw);
        false
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
    use crate::test_util::TestTerrain;

    use std::sync::Arc;

    #[test]
    fn owned_reads_come_from_the_buffer_and_foreign_reads_from_the_sampler() {
        let sampler = CrossChunkSampler::new(Arc::new(TestTerrain::flat(70)));
        let owned = OwnedChunk::new(ChunkCoords::new(0, 0), ChunkBuffer::filled(BlockState::GRAVEL));
        let access = BlockAccess::new(&owned, &sampler);

        assert_eq!(access.get_block(IVec3::new(15, 70, 15)).unwrap(), BlockState::GRAVEL);
        assert_eq!(access.get_block(IVec3::new(16, 70, 15)).unwrap(), BlockState::GRASS);
        assert_eq!(access.get_block(IVec3::new(-1, 71, 0)).unwrap(), BlockState::AIR);
        // Out of the vertical range of the owned chunk.
        assert_eq!(access.get_block(IVec3::new(0, 300, 0)).unwrap(), BlockState::AIR);
    }

    #[test]
    fn foreign_writes_are_recorded_and_dropped() {
        let generator = Arc::new(TestTerrain::flat(70));
        let sampler = CrossChunkSampler::new(generator.clone());
        let owned = OwnedChunk::new(ChunkCoords::new(2, -1), ChunkBuffer::default());
        let access = BlockAccess::new(&owned, &sampler);

        let target = IVec3::new(48, 71, -17);
        assert!(!access.set_block(target, BlockState::STONE));
        assert!(!access.set_block(target, BlockState::STONE));
        assert_eq!(access.get_block(target).unwrap(), BlockState::AIR);

        let overdraws = owned.overdraws();
        assert_eq!(overdraws.len(), 2);
        assert_eq!(
            overdraws[0],
            Overdraw {
                owner: ChunkCoords::new(2, -1),
                target: ChunkCoords::new(3, -2),
                position: target,
            }
        );

        let (buffer, _) = owned.into_parts();
        assert_eq!(buffer, ChunkBuffer::default());
    }

    #[test]
    fn staged_heights_are_invisible_until_published() {
        let owned = OwnedChunk::new(ChunkCoords::new(0, 0), ChunkBuffer::default());
        owned.stage_height(3, 4, 80);
        assert_eq!(owned.height_override(3, 4), None);
        owned.publish_heights();
        assert_eq!(owned.height_override(3, 4), Some(80));
    }

    #[test]
    fn failing_samples_surface_as_errors() {
        let sampler = CrossChunkSampler::new(Arc::new(TestTerrain::flat(70).failing_at(16, 0)));
        let owned = OwnedChunk::new(ChunkCoords::new(0, 0), ChunkBuffer::default());
        let access = BlockAccess::new(&owned, &sampler);
        assert_eq!(
            access.get_block(IVec3::new(16, 10, 0)),
            Err(SampleError::new(16, 0, "test terrain refuses this column"))
        );
    }
}
