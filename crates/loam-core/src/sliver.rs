use crate::block::BlockState;

use smallvec::SmallVec;
use std::iter::FromIterator;

/// A single vertical column of blocks, indexed by `y` from 0.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Sliver {
    blocks: Vec<BlockState>,
}

/// An air pocket beneath the terrain surface of a column. `floor` is the lowest air block, `ceiling` the highest.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CaveResult {
    pub floor: i32,
    pub ceiling: i32,
}

/// Caves of one column, ordered from the top down. Most columns have very few.
pub type CaveFloors = SmallVec<[CaveResult; 4]>;

impl Sliver {
    pub fn from_blocks(blocks: Vec<BlockState>) -> Self {
        Self { blocks }
    }

    pub fn height(&self) -> i32 {
        self.blocks.len() as i32
    }

    /// Returns `AIR` outside of the column.
    #[inline]
    pub fn get(&self, y: i32) -> BlockState {
        usize::try_from(y)
            .ok()
            .and_then(|i| self.blocks.get(i).copied())
            .unwrap_or(BlockState::AIR)
    }

    pub fn set(&mut self, y: i32, state: BlockState) -> bool {
        match usize::try_from(y).ok().and_then(|i| self.blocks.get_mut(i)) {
            Some(b) => {
                *b = state;
                true
            }
            None => false,
        }
    }

    /// The highest solid block, or -1 if there is none.
    pub fn highest_terrain(&self) -> i32 {
        self.highest_matching(BlockState::is_solid)
    }

    /// The highest solid or fluid block, or -1 if there is none.
    pub fn highest_terrain_or_fluid(&self) -> i32 {
        self.highest_matching(|b| !b.is_air())
    }

    fn highest_matching(&self, f: impl Fn(BlockState) -> bool) -> i32 {
        self.blocks
            .iter()
            .rposition(|b| f(*b))
            .map_or(-1, |i| i as i32)
    }

    /// Scans down from the terrain surface and collects every air pocket enclosed by solid blocks.
    pub fn caves(&self) -> CaveFloors {
        let mut caves = CaveFloors::new();
        let mut ceiling = None;
        for y in (0..self.highest_terrain()).rev() {
            let block = self.get(y);
            match (block.is_air(), ceiling) {
                (true, None) => ceiling = Some(y),
                (false, Some(top)) => {
                    caves.push(CaveResult {
                        floor: y + 1,
                        ceiling: top,
                    });
                    ceiling = None;
                }
                _ => (),
            }
        }
        caves
    }
}

impl FromIterator<BlockState> for Sliver {
    fn from_iter<I: IntoIterator<Item = BlockState>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
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

    fn column(blocks: &[BlockState]) -> Sliver {
        blocks.iter().copied().collect()
    }

    #[test]
    fn heights_ignore_air_and_fluid_as_requested() {
        use BlockState as B;
        let sliver = column(&[B::BEDROCK, B::STONE, B::DIRT, B::WATER, B::WATER, B::AIR]);
        assert_eq!(sliver.highest_terrain(), 2);
        assert_eq!(sliver.highest_terrain_or_fluid(), 4);
        assert_eq!(Sliver::default().highest_terrain(), -1);
        assert_eq!(sliver.get(-1), B::AIR);
        assert_eq!(sliver.get(100), B::AIR);
    }

    #[test]
    fn caves_are_found_top_down() {
        use BlockState as B;
        let sliver = column(&[
            B::BEDROCK,
            B::AIR,
            B::STONE,
            B::AIR,
            B::AIR,
            B::STONE,
            B::GRASS,
            B::AIR,
        ]);
        let caves = sliver.caves();
        assert_eq!(
            caves.as_slice(),
            &[
                CaveResult {
                    floor: 3,
                    ceiling: 4
                },
                CaveResult {
                    floor: 1,
                    ceiling: 1
                },
            ]
        );
    }
}
