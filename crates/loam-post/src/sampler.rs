use crate::error::SampleError;
use crate::generator::BaseGenerator;

use loam_core::{CaveFloors, Sliver};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Arc;
use thread_local::ThreadLocal;

/// Slivers kept per thread. Filters mostly probe the handful of columns around the one they are processing.
const SLIVER_CACHE_CAPACITY: usize = 16;

/// Read-only access to terrain outside of the chunk being post-processed.
///
/// Columns are produced on demand by the [`BaseGenerator`] without materializing their chunks. Each thread keeps a
/// small cache of recently sampled columns; base generation is deterministic, so a cached column never goes stale.
pub struct CrossChunkSampler {
    generator: Arc<dyn BaseGenerator>,
    cache: ThreadLocal<RefCell<SliverCache>>,
}

#[derive(Default)]
struct SliverCache {
    entries: VecDeque<((i32, i32), Arc<Sliver>)>,
}

impl SliverCache {
    fn get(&self, key: (i32, i32)) -> Option<Arc<Sliver>> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, sliver)| sliver.clone())
    }

    fn insert(&mut self, key: (i32, i32), sliver: Arc<Sliver>) {
        if self.entries.len() >= SLIVER_CACHE_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back((key, sliver));
    }
}

impl CrossChunkSampler {
    pub fn new(generator: Arc<dyn BaseGenerator>) -> Self {
        Self {
            generator,
            cache: ThreadLocal::new(),
        }
    }

    pub fn generator(&self) -> &Arc<dyn BaseGenerator> {
        &self.generator
    }

    /// The column the base generator produces at world `(x, z)`.
    pub fn sample(&self, x: i32, z: i32) -> Result<Arc<Sliver>, SampleError> {
        let cache = self.cache.get_or(Default::default);
        if let Some(sliver) = cache.borrow().get((x, z)) {
            return Ok(sliver);
        }

        let sliver = Arc::new(self.generator.sample_column(x, z)?);
        cache.borrow_mut().insert((x, z), sliver.clone());
        Ok(sliver)
    }

    pub fn highest_terrain_block(&self, x: i32, z: i32) -> Result<i32, SampleError> {
        self.generator.highest_terrain_block(x, z)
    }

    pub fn highest_terrain_or_fluid_block(&self, x: i32, z: i32) -> Result<i32, SampleError> {
        self.generator.highest_terrain_or_fluid_block(x, z)
    }

    pub fn cave_floors(&self, x: i32, z: i32) -> Result<CaveFloors, SampleError> {
        self.generator.cave_floors(x, z)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
