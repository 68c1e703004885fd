use crate::block::BlockState;
use crate::sliver::Sliver;

use glam::IVec3;
use ndshape::{ConstShape, ConstShape3u32};
use static_assertions::const_assert_eq;
use std::fmt;

pub const CHUNK_EDGE_LENGTH: i32 = 16;
pub const CHUNK_EDGE_LENGTH_LOG2: i32 = 4;
pub const CHUNK_HEIGHT: i32 = 256;

/// The 3D array shape of a [`ChunkBuffer`], linearized in `[x, y, z]` order.
pub type ChunkShape = ConstShape3u32<16, 256, 16>;
const_assert_eq!(ChunkShape::SIZE, 16 * 256 * 16);
pub const CHUNK_SIZE: usize = ChunkShape::SIZE as usize;

/// Block data for one chunk, addressed with chunk-local coordinates.
///
/// Every access is bounds-checked: reads outside the chunk return `None` and writes outside the chunk are ignored.
#[derive(Clone, Eq, PartialEq)]
pub struct ChunkBuffer {
    blocks: Box<[BlockState]>,
}

impl Default for ChunkBuffer {
    fn default() -> Self {
        Self::filled(BlockState::AIR)
    }
}

impl ChunkBuffer {
    pub fn filled(state: BlockState) -> Self {
        Self {
            blocks: vec![state; CHUNK_SIZE].into_boxed_slice(),
        }
    }

    #[inline]
    fn index(local: IVec3) -> Option<usize> {
        let in_bounds = (0..CHUNK_EDGE_LENGTH).contains(&local.x)
            && (0..CHUNK_HEIGHT).contains(&local.y)
            && (0..CHUNK_EDGE_LENGTH).contains(&local.z);
        in_bounds.then(|| {
            ChunkShape::linearize([local.x as u32, local.y as u32, local.z as u32]) as usize
        })
    }

    #[inline]
    pub fn get(&self, local: IVec3) -> Option<BlockState> {
        Self::index(local).map(|i| self.blocks[i])
    }

    /// Returns `false` if `local` is out of bounds.
    #[inline]
    pub fn set(&mut self, local: IVec3, state: BlockState) -> bool {
        match Self::index(local) {
            Some(i) => {
                self.blocks[i] = state;
                true
            }
            None => false,
        }
    }

    /// Copies the column at local `(x, z)` into a [`Sliver`].
    pub fn column(&self, x: i32, z: i32) -> Sliver {
        (0..CHUNK_HEIGHT)
            .map(|y| self.get(IVec3::new(x, y, z)).unwrap_or_default())
            .collect()
    }

    /// Overwrites the column at local `(x, z)` with `sliver`.
    pub fn write_column(&mut self, x: i32, z: i32, sliver: &Sliver) {
        for y in 0..CHUNK_HEIGHT {
            self.set(IVec3::new(x, y, z), sliver.get(y));
        }
    }

    pub fn as_slice(&self) -> &[BlockState] {
        &self.blocks
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.blocks)
    }
}

impl fmt::Debug for ChunkBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let non_air = self.blocks.iter().filter(|b| !b.is_air()).count();
        f.debug_struct("ChunkBuffer")
            .field("non_air", &non_air)
            .finish()
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

    #[test]
    fn out_of_bounds_access_is_rejected() {
        let mut buffer = ChunkBuffer::default();
        let before = buffer.clone();

        for p in [
            IVec3::new(-1, 0, 0),
            IVec3::new(16, 0, 0),
            IVec3::new(0, -1, 0),
            IVec3::new(0, 256, 0),
            IVec3::new(0, 0, 16),
        ] {
            assert_eq!(buffer.get(p), None);
            assert!(!buffer.set(p, BlockState::STONE));
        }
        assert_eq!(buffer, before);
    }

    #[test]
    fn columns_round_trip_through_slivers() {
        let mut buffer = ChunkBuffer::default();
        assert!(buffer.set(IVec3::new(3, 0, 9), BlockState::BEDROCK));
        assert!(buffer.set(IVec3::new(3, 255, 9), BlockState::GRASS));

        let sliver = buffer.column(3, 9);
        assert_eq!(sliver.get(0), BlockState::BEDROCK);
        assert_eq!(sliver.get(255), BlockState::GRASS);

        let mut other = ChunkBuffer::default();
        other.write_column(3, 9, &sliver);
        assert_eq!(other, buffer);
        assert_eq!(other.as_bytes(), buffer.as_bytes());
    }
}
