use crate::buffer::{CHUNK_EDGE_LENGTH, CHUNK_EDGE_LENGTH_LOG2};

use glam::{IVec2, IVec3};
use std::fmt;

const LOCAL_MASK: i32 = CHUNK_EDGE_LENGTH - 1;

/// Identifies a chunk by its position on the horizontal chunk grid.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct ChunkCoords {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoords {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns the coordinates of the chunk that contains the world column `(x, z)`.
    #[inline]
    pub const fn containing(x: i32, z: i32) -> Self {
        Self {
            x: x >> CHUNK_EDGE_LENGTH_LOG2,
            z: z >> CHUNK_EDGE_LENGTH_LOG2,
        }
    }

    #[inline]
    pub fn contains(self, x: i32, z: i32) -> bool {
        Self::containing(x, z) == self
    }

    /// The world column with the least coordinates in this chunk.
    pub fn min_column(self) -> IVec2 {
        IVec2::new(
            self.x << CHUNK_EDGE_LENGTH_LOG2,
            self.z << CHUNK_EDGE_LENGTH_LOG2,
        )
    }

    /// All 256 world columns of this chunk, `x` major.
    pub fn columns(self) -> impl Iterator<Item = IVec2> {
        let min = self.min_column();
        (0..CHUNK_EDGE_LENGTH)
            .flat_map(move |i| (0..CHUNK_EDGE_LENGTH).map(move |j| min + IVec2::new(i, j)))
    }
}

impl fmt::Debug for ChunkCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

impl fmt::Display for ChunkCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.z)
    }
}

/// Transforms world block coordinates into coordinates local to the containing chunk. `y` is unchanged.
#[inline]
pub fn local_coords(p: IVec3) -> IVec3 {
    IVec3::new(p.x & LOCAL_MASK, p.y, p.z & LOCAL_MASK)
}

/// The four horizontal neighbors of a column, in `-x, +x, -z, +z` order.
pub fn face_neighbors(column: IVec2) -> [IVec2; 4] {
    [
        column - IVec2::X,
        column + IVec2::X,
        column - IVec2::Y,
        column + IVec2::Y,
    ]
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
    fn negative_columns_round_down() {
        assert_eq!(ChunkCoords::containing(-1, -16), ChunkCoords::new(-1, -1));
        assert_eq!(ChunkCoords::containing(-17, 15), ChunkCoords::new(-2, 0));
        assert_eq!(local_coords(IVec3::new(-1, 70, -17)), IVec3::new(15, 70, 15));
    }

    #[test]
    fn columns_cover_the_chunk_exactly_once() {
        let chunk = ChunkCoords::new(-3, 2);
        let columns: Vec<_> = chunk.columns().collect();
        assert_eq!(columns.len(), 256);
        assert!(columns.iter().all(|c| chunk.contains(c.x, c.y)));

        let mut deduped = columns.clone();
        deduped.sort_by_key(|c| (c.x, c.y));
        deduped.dedup();
        assert_eq!(deduped.len(), 256);
        assert_eq!(columns[0], IVec2::new(-48, 32));
    }
}
