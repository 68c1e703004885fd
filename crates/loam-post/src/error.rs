use thiserror::Error;

/// Setup errors for a dimension's post-processing pipeline. These are fatal; they indicate a corrupt configuration.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum PostError {
    #[error("unknown post processor {kind:?} configured for dimension {dimension:?}")]
    UnknownFilterKind { kind: String, dimension: String },
}

/// The base generator failed to produce a column.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
#[error("failed to sample column ({x}, {z}): {reason}")]
pub struct SampleError {
    pub x: i32,
    pub z: i32,
    pub reason: String,
}

impl SampleError {
    pub fn new(x: i32, z: i32, reason: impl Into<String>) -> Self {
        Self {
            x,
            z,
            reason: reason.into(),
        }
    }
}

/// Failure of a single filter callback or deferred item. Only the affected unit of work is skipped.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum FilterError {
    #[error(transparent)]
    Sample(#[from] SampleError),
    #[error("{0}")]
    Invalid(String),
}
