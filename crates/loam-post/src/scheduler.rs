use crate::config::SchedulerConfig;

use crossbeam::channel::{self, Receiver, Sender};
use loam_core::SmallKeyHashMap;
use parking_lot::{Condvar, Mutex};
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub type Task = Box<dyn FnOnce() + Send + 'static>;

struct Job {
    queue: Arc<str>,
    task: Task,
}

/// Outstanding task counts by queue name. A queue is removed from the map as soon as it drains.
struct Shared {
    pending: Mutex<SmallKeyHashMap<Arc<str>, usize>>,
    drained: Condvar,
}

impl Shared {
    fn complete(&self, queue: &str) {
        let mut pending = self.pending.lock();
        if let Some(count) = pending.get_mut(queue) {
            *count -= 1;
            if *count == 0 {
                pending.remove(queue);
                self.drained.notify_all();
            }
        }
    }
}

/// A fixed set of worker threads fed from named queues.
///
/// Any thread can [`queue`](WorkerPool::queue) work. [`wait_for`](WorkerPool::wait_for) is a barrier over one queue
/// name: it returns once every task submitted under that name has finished, regardless of what other queues are doing.
/// Tasks that panic are logged and still count as finished, so a barrier can't be stalled by a crashing task.
///
/// **WARNING**: Never call `wait_for` from inside a task running on the same pool. The waiting worker can't run the
/// tasks it is waiting on.
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
    barrier_warn_after: Duration,
}

impl WorkerPool {
    pub fn new(config: &SchedulerConfig) -> io::Result<Self> {
        let threads = config.threads.max(1);
        let (sender, receiver) = channel::unbounded();
        let shared = Arc::new(Shared {
            pending: Mutex::new(SmallKeyHashMap::default()),
            drained: Condvar::new(),
        });

        let mut workers = Vec::with_capacity(threads);
        for i in 0..threads {
            let receiver = receiver.clone();
            let shared = shared.clone();
            let builder = thread::Builder::new().name(format!("loam-worker-{}", i));
            workers.push(builder.spawn(move || worker_loop(receiver, shared))?);
        }
        log::debug!("Started {} post-processing workers", threads);

        Ok(Self {
            sender: Some(sender),
            shared,
            workers,
            barrier_warn_after: config.barrier_warn_after(),
        })
    }

    pub fn threads(&self) -> usize {
        self.workers.len()
    }

    /// Submits `task` to the queue called `name`. Never blocks.
    pub fn queue(&self, name: &str, task: impl FnOnce() + Send + 'static) {
        let queue: Arc<str> = Arc::from(name);
        *self.shared.pending.lock().entry(queue.clone()).or_insert(0) += 1;

        let job = Job {
            queue,
            task: Box::new(task),
        };
        let unsent = match &self.sender {
            Some(sender) => sender.send(job).err().map(|e| e.into_inner()),
            None => Some(job),
        };
        if let Some(job) = unsent {
            log::warn!("No workers alive, running task for queue {:?} inline", job.queue);
            run_job(job, &self.shared);
        }
    }

    /// The number of tasks of queue `name` that are waiting or running.
    pub fn pending(&self, name: &str) -> usize {
        self.shared.pending.lock().get(name).copied().unwrap_or(0)
    }

    /// Blocks until queue `name` has no waiting or running tasks.
    ///
    /// There is no timeout; a barrier that takes suspiciously long is reported in the log on every
    /// `barrier_warn_after_ms` interval.
    pub fn wait_for(&self, name: &str) {
        let started = Instant::now();
        let mut pending = self.shared.pending.lock();
        while pending.contains_key(name) {
            let result = self
                .shared
                .drained
                .wait_for(&mut pending, self.barrier_warn_after);
            if result.timed_out() {
                if let Some(count) = pending.get(name) {
                    log::warn!(
                        "Still waiting on {} tasks in queue {:?} after {:?}",
                        count,
                        name,
                        started.elapsed()
                    );
                }
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Disconnecting the channel lets every worker finish its backlog and exit.
        self.sender.take();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                log::error!("Post-processing worker exited abnormally");
            }
        }
    }
}

fn worker_loop(receiver: Receiver<Job>, shared: Arc<Shared>) {
    for job in receiver.iter() {
        run_job(job, &shared);
    }
}

fn run_job(job: Job, shared: &Shared) {
    let Job { queue, task } = job;
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
        log::error!(
            "Task in queue {:?} panicked: {}",
            queue,
            panic_message(payload.as_ref())
        );
    }
    shared.complete(&queue);
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "<non-string panic payload>"
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
