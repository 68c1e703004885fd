use crate::config::PostConfig;
use crate::error::PostError;
use crate::filter::{Phase, PostBlockFilter};
use crate::filters::{FloatingBlockRemover, NibSmoother, PotholeFiller, Slabber, WallPainter, Waterlogger};

use std::sync::Arc;

/// Every filter kind that can be named in a [`PostConfig`].
pub const BUILT_IN_KINDS: [&str; 6] = [
    FloatingBlockRemover::KIND,
    NibSmoother::KIND,
    PotholeFiller::KIND,
    Slabber::KIND,
    WallPainter::KIND,
    Waterlogger::KIND,
];

/// Instantiates the built-in filter registered under `kind`.
pub fn create_filter(dimension: &str, kind: &str, phase: Phase) -> Result<Arc<dyn PostBlockFilter>, PostError> {
    let filter: Arc<dyn PostBlockFilter> = match kind {
        FloatingBlockRemover::KIND => Arc::new(FloatingBlockRemover::new(phase)),
        NibSmoother::KIND => Arc::new(NibSmoother::new(phase)),
        PotholeFiller::KIND => Arc::new(PotholeFiller::new(phase)),
        Slabber::KIND => Arc::new(Slabber::new(phase)),
        WallPainter::KIND => Arc::new(WallPainter::new(phase)),
        Waterlogger::KIND => Arc::new(Waterlogger::new(phase)),
        _ => {
            log::error!("Unknown post processor kind {:?} in dimension {}", kind, dimension);
            return Err(PostError::UnknownFilterKind {
                kind: kind.to_owned(),
                dimension: dimension.to_owned(),
            });
        }
    };
    Ok(filter)
}

/// Builds the filters of `dimension` in configuration order. Fails on the first unknown kind.
pub fn build_filters(dimension: &str, config: &PostConfig) -> Result<Vec<Arc<dyn PostBlockFilter>>, PostError> {
    config
        .post_processors
        .iter()
        .map(|f| create_filter(dimension, &f.kind, f.phase))
        .collect()
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
