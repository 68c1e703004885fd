use loam_post::{PostError, SampleError};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoamError {
    #[error("failed to read configuration: {0}")]
    Config(#[from] ron::Error),
    #[error(transparent)]
    Post(#[from] PostError),
    #[error("failed to start the worker pool: {0}")]
    Pool(#[from] std::io::Error),
    #[error(transparent)]
    Sample(#[from] SampleError),
    #[error("no dimension named {0:?}")]
    UnknownDimension(String),
}
