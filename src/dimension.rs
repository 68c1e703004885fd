use crate::config::{Config, DimensionConfig};
use crate::error::LoamError;
use crate::terrain::NoiseTerrain;

use loam_core::{ChunkBuffer, ChunkCoords, MetricsSink, TimingRecorder};
use loam_post::{BaseGenerator, CrossChunkSampler, PostError, PostPipeline, PostReport, SampleError, WorkerPool};
use rand::RngCore;
use std::sync::Arc;
use std::time::Instant;

/// Metric name of the wall-clock time spent in base generation of one chunk.
pub const BASE_METRIC: &str = "base";

/// One generated world: a set of dimensions sharing a worker pool and metrics.
pub struct World {
    dimensions: Vec<Dimension>,
    metrics: Arc<TimingRecorder>,
    pool: Arc<WorkerPool>,
}

impl World {
    /// Builds every configured dimension on top of [`NoiseTerrain`].
    pub fn new(config: &Config) -> Result<Self, LoamError> {
        Self::with_generators(config, |dim| -> Arc<dyn BaseGenerator> {
            Arc::new(NoiseTerrain::new(dim.seed, dim.sea_level))
        })
    }

    pub fn with_generators(
        config: &Config,
        mut generator: impl FnMut(&DimensionConfig) -> Arc<dyn BaseGenerator>,
    ) -> Result<Self, LoamError> {
        let pool = Arc::new(WorkerPool::new(&config.scheduler)?);
        let metrics = Arc::new(TimingRecorder::new());

        let dimensions = config
            .dimensions
            .iter()
            .map(|dim| Dimension::new(dim, generator(dim), pool.clone(), metrics.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            dimensions,
            metrics,
            pool,
        })
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn dimension(&self, name: &str) -> Result<&Dimension, LoamError> {
        self.dimensions
            .iter()
            .find(|d| d.name() == name)
            .ok_or_else(|| LoamError::UnknownDimension(name.to_owned()))
    }

    pub fn metrics(&self) -> &TimingRecorder {
        &self.metrics
    }

    pub fn threads(&self) -> usize {
        self.pool.threads()
    }
}

/// A named terrain generator together with its post-processing pipeline.
pub struct Dimension {
    name: String,
    generator: Arc<dyn BaseGenerator>,
    pipeline: PostPipeline,
    metrics: Arc<dyn MetricsSink>,
}

impl Dimension {
    pub fn new(
        config: &DimensionConfig,
        generator: Arc<dyn BaseGenerator>,
        pool: Arc<WorkerPool>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Result<Self, PostError> {
        let sampler = Arc::new(CrossChunkSampler::new(generator.clone()));
        let pipeline = PostPipeline::from_config(&config.name, &config.post, pool, sampler, metrics.clone())?;

        Ok(Self {
            name: config.name.clone(),
            generator,
            pipeline,
            metrics,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pipeline(&self) -> &PostPipeline {
        &self.pipeline
    }

    pub fn generate_chunk(&self, chunk: ChunkCoords, rng: &mut dyn RngCore) -> Result<ChunkBuffer, SampleError> {
        self.generate_chunk_with_report(chunk, rng)
            .map(|(buffer, _)| buffer)
    }

    /// Runs base generation and then post-processing for `chunk`. Only a failing base pass is an error; problems during
    /// post-processing are in the report.
    pub fn generate_chunk_with_report(
        &self,
        chunk: ChunkCoords,
        rng: &mut dyn RngCore,
    ) -> Result<(ChunkBuffer, PostReport), SampleError> {
        let started = Instant::now();
        let base = self.generator.generate_base_chunk(chunk, rng)?;
        self.metrics
            .record_timing(BASE_METRIC, started.elapsed().as_secs_f64() * 1000.0);

        Ok(self.pipeline.post_process_with_report(chunk, base, rng))
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
