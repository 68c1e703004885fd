//! Deterministic terrain for unit tests.

use crate::config::SchedulerConfig;
use crate::error::SampleError;
use crate::filter::PostBlockFilter;
use crate::generator::BaseGenerator;
use crate::pipeline::{PostPipeline, PostReport};
use crate::sampler::CrossChunkSampler;
use crate::scheduler::WorkerPool;

use loam_core::{BlockState, ChunkBuffer, ChunkCoords, Sliver, TimingRecorder, CHUNK_HEIGHT};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const SEA_LEVEL: i32 = 62;

pub struct TestTerrain {
    height: Box<dyn Fn(i32, i32) -> i32 + Send + Sync>,
    caves: Vec<(i32, i32, i32, i32)>,
    fail_at: Option<(i32, i32)>,
    pub columns_sampled: AtomicUsize,
}

impl TestTerrain {
    pub fn from_fn(height: impl Fn(i32, i32) -> i32 + Send + Sync + 'static) -> Self {
        Self {
            height: Box::new(height),
            caves: Vec::new(),
            fail_at: None,
            columns_sampled: AtomicUsize::new(0),
        }
    }

    pub fn flat(height: i32) -> Self {
        Self::from_fn(move |_, _| height)
    }

    /// Gentle hills crossing the sea level.
    pub fn hills() -> Self {
        Self::from_fn(|x, z| SEA_LEVEL - 3 + (x * 3 + z * 5).rem_euclid(9))
    }

    /// Hollows out `floor..=ceiling` of column `(x, z)`.
    pub fn carve(mut self, x: i32, z: i32, floor: i32, ceiling: i32) -> Self {
        self.caves.push((x, z, floor, ceiling));
        self
    }

    pub fn failing_at(mut self, x: i32, z: i32) -> Self {
        self.fail_at = Some((x, z));
        self
    }

    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        (self.height)(x, z)
    }

    fn is_carved(&self, x: i32, y: i32, z: i32) -> bool {
        self.caves
            .iter()
            .any(|&(cx, cz, floor, ceiling)| (cx, cz) == (x, z) && (floor..=ceiling).contains(&y))
    }
}

impl BaseGenerator for TestTerrain {
    fn sample_column(&self, x: i32, z: i32) -> Result<Sliver, SampleError> {
        if self.fail_at == Some((x, z)) {
            return Err(SampleError::new(x, z, "test terrain refuses this column"));
        }
        self.columns_sampled.fetch_add(1, Ordering::SeqCst);

        let height = self.height_at(x, z);
        Ok((0..CHUNK_HEIGHT)
            .map(|y| {
                if y == 0 {
                    BlockState::BEDROCK
                } else if self.is_carved(x, y, z) {
                    BlockState::AIR
                } else if y < height - 3 {
                    BlockState::STONE
                } else if y < height {
                    BlockState::DIRT
                } else if y == height {
                    if height <= SEA_LEVEL {
                        BlockState::SAND
                    } else {
                        BlockState::GRASS
                    }
                } else if y <= SEA_LEVEL {
                    BlockState::WATER
                } else {
                    BlockState::AIR
                }
            })
            .collect())
    }
}

pub fn pool(threads: usize) -> Arc<WorkerPool> {
    let config = SchedulerConfig {
        threads,
        ..Default::default()
    };
    Arc::new(WorkerPool::new(&config).unwrap())
}

pub fn base_chunk(generator: &dyn BaseGenerator, chunk: ChunkCoords) -> ChunkBuffer {
    generator
        .generate_base_chunk(chunk, &mut StdRng::seed_from_u64(0))
        .unwrap()
}

pub fn pipeline(
    generator: Arc<dyn BaseGenerator>,
    filters: Vec<Arc<dyn PostBlockFilter>>,
    threads: usize,
) -> PostPipeline {
    PostPipeline::new(
        "test",
        filters,
        pool(threads),
        Arc::new(CrossChunkSampler::new(generator)),
        Arc::new(TimingRecorder::new()),
    )
}

/// Generates `chunk`, lets `edit` modify the base buffer, and post-processes it with `filters`.
pub fn run_filters(
    terrain: TestTerrain,
    filters: Vec<Arc<dyn PostBlockFilter>>,
    chunk: ChunkCoords,
    edit: impl FnOnce(&mut ChunkBuffer),
) -> (ChunkBuffer, PostReport) {
    let terrain = Arc::new(terrain);
    let mut buffer = base_chunk(terrain.as_ref(), chunk);
    edit(&mut buffer);
    let pipeline = pipeline(terrain, filters, 2);
    pipeline.post_process_with_report(chunk, buffer, &mut StdRng::seed_from_u64(7))
}

pub fn run_filter(
    terrain: TestTerrain,
    filter: impl PostBlockFilter + 'static,
    chunk: ChunkCoords,
    edit: impl FnOnce(&mut ChunkBuffer),
) -> (ChunkBuffer, PostReport) {
    run_filters(terrain, vec![Arc::new(filter)], chunk, edit)
}
