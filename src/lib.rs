//! Voxel terrain generation with loam.
//!
//! A [`World`] is built from a RON [`Config`]. Each [`Dimension`] pairs a base terrain generator with the
//! post-processing pipeline of [`loam_post`], and all dimensions share one worker pool.

mod config;
mod dimension;
mod error;
mod terrain;

pub use config::{Config, DimensionConfig};
pub use dimension::{Dimension, World, BASE_METRIC};
pub use error::LoamError;
pub use terrain::NoiseTerrain;

pub use loam_core;
pub use loam_post;
