use crate::SmallKeyHashMap;

use parking_lot::Mutex;
use std::time::Duration;

/// Receives timing samples from the generation pipeline. Recording is fire-and-forget.
pub trait MetricsSink: Send + Sync {
    fn record_timing(&self, metric: &str, millis: f64);
}

/// Accumulates the samples of a single metric.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkTimer {
    total_time: Duration,
    max_time: Duration,
    items_completed: u32,
}

impl WorkTimer {
    pub fn start() -> Self {
        Self::default()
    }

    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    pub fn max_time(&self) -> Duration {
        self.max_time
    }

    pub fn items_completed(&self) -> u32 {
        self.items_completed
    }

    pub fn complete_item(&mut self, d: Duration) {
        self.total_time = self.total_time.saturating_add(d);
        self.max_time = self.max_time.max(d);
        self.items_completed += 1;
    }

    pub fn average_time_ms(&self) -> f64 {
        self.total_time.as_secs_f64() * 1000.0 / f64::from(self.items_completed.max(1))
    }
}

/// A [`MetricsSink`] that keeps a [`WorkTimer`] per metric name.
#[derive(Default)]
pub struct TimingRecorder {
    timers: Mutex<SmallKeyHashMap<String, WorkTimer>>,
}

impl TimingRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timer(&self, metric: &str) -> Option<WorkTimer> {
        self.timers.lock().get(metric).copied()
    }

    /// All metrics recorded so far, sorted by name.
    pub fn snapshot(&self) -> Vec<(String, WorkTimer)> {
        let mut all: Vec<_> = self
            .timers
            .lock()
            .iter()
            .map(|(name, timer)| (name.clone(), *timer))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }
}

impl MetricsSink for TimingRecorder {
    fn record_timing(&self, metric: &str, millis: f64) {
        let sample = Duration::try_from_secs_f64(millis.max(0.0) / 1000.0).unwrap_or(Duration::MAX);
        let mut timers = self.timers.lock();
        match timers.get_mut(metric) {
            Some(timer) => timer.complete_item(sample),
            None => {
                let mut timer = WorkTimer::start();
                timer.complete_item(sample);
                timers.insert(metric.to_owned(), timer);
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
