use crate::context::PostContext;
use crate::error::FilterError;

use parking_lot::Mutex;
use std::collections::VecDeque;

/// Filters run in ascending phase order. All work of one phase finishes before the next phase starts.
pub type Phase = u32;

/// A post-processing filter.
///
/// Filters are built once per dimension and shared by every chunk invocation, so they must not keep per-chunk state of
/// their own. [`on_post`](Self::on_post) is called once for every column of the chunk being processed, concurrently
/// from several worker threads. All block access goes through the [`PostContext`]. Work that has to wait until every
/// column of the phase has been visited can be handed to [`PostContext::defer`].
pub trait PostBlockFilter: Send + Sync {
    /// The registry name of this filter.
    fn kind(&self) -> &str;

    fn phase(&self) -> Phase;

    fn on_post(&self, ctx: &PostContext<'_>, x: i32, z: i32) -> Result<(), FilterError>;
}

/// A unit of work that runs on the orchestrator thread after its filter's phase barrier.
pub type Deferred = Box<dyn FnOnce(&PostContext<'_>) -> Result<(), FilterError> + Send>;

/// FIFO of deferred work for one filter within one chunk invocation.
#[derive(Default)]
pub struct DeferredQueue {
    items: Mutex<VecDeque<Deferred>>,
}

impl DeferredQueue {
    pub fn push(&self, item: Deferred) {
        self.items.lock().push_back(item);
    }

    pub fn pop(&self) -> Option<Deferred> {
        self.items.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
