use crate::access::{BlockAccess, Overdraw, OwnedChunk};
use crate::config::PostConfig;
use crate::context::PostContext;
use crate::error::PostError;
use crate::filter::{DeferredQueue, Phase, PostBlockFilter};
use crate::registry::build_filters;
use crate::sampler::CrossChunkSampler;
use crate::scheduler::{panic_message, WorkerPool};

use itertools::Itertools;
use loam_core::glam::IVec2;
use loam_core::{ChunkBuffer, ChunkCoords, MetricsSink};
use rand::RngCore;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metric name of the wall-clock time spent post-processing one chunk.
pub const POST_METRIC: &str = "post";

/// What happened while post-processing one chunk. Failures never abort the chunk, they only show up here and in the
/// log.
#[derive(Clone, Debug, Default)]
pub struct PostReport {
    pub overdraws: Vec<Overdraw>,
    /// Column callbacks and deferred items that returned an error or panicked.
    pub failed_units: usize,
    pub phases_run: Vec<Phase>,
    pub elapsed: Duration,
}

/// Runs a dimension's filters over freshly generated chunks.
///
/// Phases run in ascending order. For each phase, one task per column is queued on the shared [`WorkerPool`]; every
/// task calls the phase's filters in registration order. Once the barrier passes, the deferred work of those filters is
/// drained on the calling thread and staged height updates are published. Only then does the next phase start.
///
/// Several chunks may be processed at the same time from different threads. They share the pool, but each invocation
/// gets its own queue name, buffer lock and deferred queues.
pub struct PostPipeline {
    dimension: String,
    enabled: bool,
    filters: Arc<[Arc<dyn PostBlockFilter>]>,
    /// Distinct phases in ascending order, with the indices of their filters in registration order.
    phases: Vec<(Phase, Arc<[usize]>)>,
    pool: Arc<WorkerPool>,
    sampler: Arc<CrossChunkSampler>,
    metrics: Arc<dyn MetricsSink>,
    invocations: AtomicU64,
}

impl PostPipeline {
    pub fn new(
        dimension: impl Into<String>,
        filters: Vec<Arc<dyn PostBlockFilter>>,
        pool: Arc<WorkerPool>,
        sampler: Arc<CrossChunkSampler>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        let phases = filters
            .iter()
            .map(|f| f.phase())
            .sorted()
            .dedup()
            .map(|phase| {
                let active: Arc<[usize]> = filters
                    .iter()
                    .positions(|f| f.phase() == phase)
                    .collect();
                (phase, active)
            })
            .collect();

        Self {
            dimension: dimension.into(),
            enabled: true,
            filters: filters.into(),
            phases,
            pool,
            sampler,
            metrics,
            invocations: AtomicU64::new(0),
        }
    }

    /// Builds the pipeline of `dimension` from its configuration. Unknown filter kinds are fatal.
    pub fn from_config(
        dimension: &str,
        config: &PostConfig,
        pool: Arc<WorkerPool>,
        sampler: Arc<CrossChunkSampler>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Result<Self, PostError> {
        if !config.post_processing {
            return Ok(Self::disabled(dimension, pool, sampler, metrics));
        }

        let filters = build_filters(dimension, config)?;
        log::info!(
            "Post processing for {}: {}",
            dimension,
            filters
                .iter()
                .map(|f| format!("{}@{}", f.kind(), f.phase()))
                .join(", ")
        );

        Ok(Self::new(dimension, filters, pool, sampler, metrics))
    }

    /// A pipeline that hands every chunk back untouched.
    pub fn disabled(
        dimension: impl Into<String>,
        pool: Arc<WorkerPool>,
        sampler: Arc<CrossChunkSampler>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        let mut pipeline = Self::new(dimension, Vec::new(), pool, sampler, metrics);
        pipeline.enabled = false;
        pipeline
    }

    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn filters(&self) -> &[Arc<dyn PostBlockFilter>] {
        &self.filters
    }

    pub fn sampler(&self) -> &Arc<CrossChunkSampler> {
        &self.sampler
    }

    pub fn post_process(&self, chunk: ChunkCoords, buffer: ChunkBuffer, rng: &mut dyn RngCore) -> ChunkBuffer {
        self.post_process_with_report(chunk, buffer, rng).0
    }

    /// Post-processes `buffer`, the base generation of `chunk`. `rng` supplies the entropy for
    /// [`PostContext::column_rng`].
    pub fn post_process_with_report(
        &self,
        chunk: ChunkCoords,
        buffer: ChunkBuffer,
        rng: &mut dyn RngCore,
    ) -> (ChunkBuffer, PostReport) {
        if !self.enabled {
            return (buffer, PostReport::default());
        }

        let seed = rng.next_u64();
        let columns: Vec<IVec2> = chunk.columns().collect();
        self.run(chunk, buffer, seed, &columns)
    }

    /// Runs all phases, queueing column tasks in the order of `columns`.
    fn run(&self, chunk: ChunkCoords, buffer: ChunkBuffer, seed: u64, columns: &[IVec2]) -> (ChunkBuffer, PostReport) {
        let started = Instant::now();
        let queue = format!(
            "post-{}-{}#{}",
            self.dimension,
            chunk,
            self.invocations.fetch_add(1, Ordering::Relaxed)
        );

        let invocation = Arc::new(Invocation {
            owned: OwnedChunk::new(chunk, buffer),
            sampler: self.sampler.clone(),
            filters: self.filters.clone(),
            deferred: (0..self.filters.len()).map(|_| DeferredQueue::default()).collect(),
            seed,
            failures: AtomicUsize::new(0),
        });

        let mut phases_run = Vec::with_capacity(self.phases.len());
        for (phase, active) in self.phases.iter() {
            for &column in columns {
                let invocation = invocation.clone();
                let active = active.clone();
                self.pool
                    .queue(&queue, move || invocation.run_column(&active, column));
            }
            self.pool.wait_for(&queue);

            invocation.drain_deferred(active);
            invocation.owned.publish_heights();
            phases_run.push(*phase);
        }

        let failed_units = invocation.failures.load(Ordering::SeqCst);
        let (buffer, overdraws) = match Arc::try_unwrap(invocation) {
            Ok(invocation) => invocation.owned.into_parts(),
            Err(invocation) => invocation.owned.take_parts(),
        };

        let elapsed = started.elapsed();
        self.metrics
            .record_timing(POST_METRIC, elapsed.as_secs_f64() * 1000.0);
        if failed_units > 0 || !overdraws.is_empty() {
            log::warn!(
                "Post processing {} in {} finished with {} failed units and {} overdraws",
                chunk,
                self.dimension,
                failed_units,
                overdraws.len()
            );
        }

        (
            buffer,
            PostReport {
                overdraws,
                failed_units,
                phases_run,
                elapsed,
            },
        )
    }
}

/// Per-chunk state shared by the column tasks of one invocation.
struct Invocation {
    owned: OwnedChunk,
    sampler: Arc<CrossChunkSampler>,
    filters: Arc<[Arc<dyn PostBlockFilter>]>,
    /// One queue per filter, indexed like `filters`.
    deferred: Vec<DeferredQueue>,
    seed: u64,
    failures: AtomicUsize,
}

impl Invocation {
    fn context(&self, filter: usize) -> PostContext<'_> {
        PostContext::new(
            BlockAccess::new(&self.owned, &self.sampler),
            &self.deferred[filter],
            self.seed,
        )
    }

    fn run_column(&self, active: &[usize], column: IVec2) {
        for &i in active {
            let filter = &self.filters[i];
            let ctx = self.context(i);
            let result = panic::catch_unwind(AssertUnwindSafe(|| filter.on_post(&ctx, column.x, column.y)));
            let error = match result {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e.to_string(),
                Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
            };
            self.failures.fetch_add(1, Ordering::SeqCst);
            log::error!(
                "Post processor {} failed on column ({}, {}) of chunk {}: {}",
                filter.kind(),
                column.x,
                column.y,
                self.owned.coords(),
                error
            );
        }
    }

    /// Deferred items run one at a time, filter by filter in registration order.
    fn drain_deferred(&self, active: &[usize]) {
        for &i in active {
            let ctx = self.context(i);
            while let Some(item) = self.deferred[i].pop() {
                let error = match panic::catch_unwind(AssertUnwindSafe(|| item(&ctx))) {
                    Ok(Ok(())) => continue,
                    Ok(Err(e)) => e.to_string(),
                    Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
                };
                self.failures.fetch_add(1, Ordering::SeqCst);
                log::error!(
                    "Deferred work of post processor {} failed in chunk {}: {}",
                    self.filters[i].kind(),
                    self.owned.coords(),
                    error
                );
            }
        }
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
