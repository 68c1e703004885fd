use crate::filter::Phase;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Post-processing setup of a single dimension.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PostConfig {
    /// When false, chunks are handed back exactly as the base pass produced them.
    pub post_processing: bool,
    /// Filters in registration order. Within one phase they run in this order for every column.
    pub post_processors: Vec<FilterConfig>,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            post_processing: true,
            post_processors: vec![
                FilterConfig::new("floating-block-remover", 0),
                FilterConfig::new("nib-smoother", 1),
                FilterConfig::new("pothole-filler", 1),
                FilterConfig::new("wall-painter", 2),
                FilterConfig::new("slabber", 2),
                FilterConfig::new("waterlogger", 3),
            ],
        }
    }
}

impl PostConfig {
    pub fn disabled() -> Self {
        Self {
            post_processing: false,
            post_processors: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FilterConfig {
    /// Registry name of the filter, e.g. `"nib-smoother"`.
    pub kind: String,
    pub phase: Phase,
}

impl FilterConfig {
    pub fn new(kind: impl Into<String>, phase: Phase) -> Self {
        Self {
            kind: kind.into(),
            phase,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Number of worker threads shared by every chunk invocation.
    pub threads: usize,
    /// A barrier that waits longer than this logs a warning and keeps waiting.
    pub barrier_warn_after_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            threads: 4,
            barrier_warn_after_ms: 5000,
        }
    }
}

impl SchedulerConfig {
    pub fn barrier_warn_after(&self) -> Duration {
        Duration::from_millis(self.barrier_warn_after_ms.max(1))
    }
}
