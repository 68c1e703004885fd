//! Chunk post-processing for loam worlds.
//!
//! # Pipeline
//!
//! After the base generator fills a [`ChunkBuffer`](loam_core::ChunkBuffer), a [`PostPipeline`] runs a dimension's
//! [`PostBlockFilter`]s over it. Filters are grouped by [`Phase`]. Every phase visits all 256 columns of the chunk in
//! parallel on a shared [`WorkerPool`], then drains the work its filters deferred, and only then does the next phase
//! begin.
//!
//! ## Block Access
//!
//! Filters see the world through a [`PostContext`]. Reads and writes inside the chunk being processed go to its buffer,
//! behind a single lock. Reads of other chunks are answered by the [`CrossChunkSampler`], which asks the
//! [`BaseGenerator`] for just the one column instead of generating whole neighbor chunks. Writes to other chunks are
//! dropped and recorded as [`Overdraw`]s.
//!
//! ## Filters
//!
//! Filters are created by name from a [`PostConfig`] (see [`BUILT_IN_KINDS`]). They are shared by all chunks of a
//! dimension and keep no per-chunk state; deferred work is queued per chunk invocation.

mod access;
mod config;
mod context;
mod error;
mod filter;
mod filters;
mod generator;
mod pipeline;
mod registry;
mod sampler;
mod scheduler;

#[cfg(test)]
mod test_util;

pub use access::*;
pub use config::*;
pub use context::*;
pub use error::*;
pub use filter::*;
pub use filters::*;
pub use generator::*;
pub use pipeline::*;
pub use registry::*;
pub use sampler::*;
pub use scheduler::*;
