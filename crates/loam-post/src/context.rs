use crate::access::BlockAccess;
use crate::error::{FilterError, SampleError};
use crate::filter::DeferredQueue;

use loam_core::glam::IVec3;
use loam_core::{BlockState, CaveFloors, ChunkCoords};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// The view a filter gets of the world while post-processing one chunk.
///
/// Reads of columns outside the owned chunk are served from base generation. Writes outside the owned chunk are dropped
/// and reported as overdraw.
pub struct PostContext<'a> {
    access: BlockAccess<'a>,
    deferred: &'a DeferredQueue,
    seed: u64,
}

impl<'a> PostContext<'a> {
    pub fn new(access: BlockAccess<'a>, deferred: &'a DeferredQueue, seed: u64) -> Self {
        Self {
            access,
            deferred,
            seed,
        }
    }

    /// The chunk being post-processed.
    pub fn chunk(&self) -> ChunkCoords {
        self.access.owned().coords()
    }

    pub fn owns(&self, x: i32, z: i32) -> bool {
        self.access.owned().owns(x, z)
    }

    pub fn block(&self, x: i32, y: i32, z: i32) -> Result<BlockState, SampleError> {
        self.access.get_block(IVec3::new(x, y, z))
    }

    pub fn set_block(&self, x: i32, y: i32, z: i32, state: BlockState) -> bool {
        self.access.set_block(IVec3::new(x, y, z), state)
    }

    /// Height of the highest solid block. Changes made with [`update_height`](Self::update_height) become visible after
    /// the phase that made them.
    pub fn highest_terrain_block(&self, x: i32, z: i32) -> Result<i32, SampleError> {
        match self.height_override(x, z) {
            Some(h) => Ok(h),
            None => self.access.sampler().highest_terrain_block(x, z),
        }
    }

    /// Height of the highest solid or fluid block. Fluid is only taken from base generation when it stands above the
    /// base terrain, so lowering a dry column lowers this height too.
    pub fn highest_terrain_or_fluid_block(&self, x: i32, z: i32) -> Result<i32, SampleError> {
        let sampler = self.access.sampler();
        let fluid = sampler.highest_terrain_or_fluid_block(x, z)?;
        match self.height_override(x, z) {
            Some(h) if fluid > sampler.highest_terrain_block(x, z)? => Ok(h.max(fluid)),
            Some(h) => Ok(h),
            None => Ok(fluid),
        }
    }

    pub fn cave_floors(&self, x: i32, z: i32) -> Result<CaveFloors, SampleError> {
        self.access.sampler().cave_floors(x, z)
    }

    /// Records the new terrain height of an owned column. Heights of other chunks can't change.
    pub fn update_height(&self, x: i32, z: i32, height: i32) {
        if self.owns(x, z) {
            self.access.owned().stage_height(x, z, height);
        } else {
            log::debug!(
                "Ignoring height update for foreign column ({}, {}) while processing {}",
                x,
                z,
                self.chunk()
            );
        }
    }

    /// A random number generator that only depends on the invocation's entropy and the column, never on scheduling.
    pub fn column_rng(&self, x: i32, z: i32) -> StdRng {
        StdRng::seed_from_u64(column_seed(self.seed, x, z))
    }

    /// Runs `item` after every column of the current phase has been processed, in submission order.
    pub fn defer(
        &self,
        item: impl FnOnce(&PostContext<'_>) -> Result<(), FilterError> + Send + 'static,
    ) {
        self.deferred.push(Box::new(item));
    }

    fn height_override(&self, x: i32, z: i32) -> Option<i32> {
        if self.owns(x, z) {
            self.access.owned().height_override(x, z)
        } else {
            None
        }
    }
}

// SplitMix64 finalizer over the seed and both coordinates.
fn column_seed(seed: u64, x: i32, z: i32) -> u64 {
    let mut h = seed ^ (((x as u32 as u64) << 32) | z as u32 as u64);
    h = h.wrapping_add(0x9e37_79b9_7f4a_7c15);
    h = (h ^ (h >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    h = (h ^ (h >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    h ^ (h >> 31)
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
