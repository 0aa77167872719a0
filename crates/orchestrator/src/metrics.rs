//! Duration instrumentation for runs.
//!
//! Key names are consumed by dashboards and must stay stable.

use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Timer covering every engine run.
pub const ENGINES_TIMER: &str = "engines.time";

/// Timer for one engine, `engines.names.<name>.time`.
pub fn engine_timer_key(name: &str) -> String {
    format!("engines.names.{}.time", name)
}

/// Metrics sink injected into the runner.
pub trait Metrics: Send + Sync {
    fn timing(&self, key: &str, elapsed: Duration);
}

/// Emits every sample as a debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMetrics;

impl Metrics for TracingMetrics {
    fn timing(&self, key: &str, elapsed: Duration) {
        debug!(metric = key, elapsed_ms = elapsed.as_millis() as u64, "timing");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub key: String,
    pub elapsed: Duration,
}

/// Keeps samples in memory, in the order they were recorded.
#[derive(Debug, Default)]
pub struct RecordingMetrics {
    samples: Mutex<Vec<Sample>>,
}

impl RecordingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> Vec<Sample> {
        self.samples
            .lock()
            .map(|samples| samples.clone())
            .unwrap_or_default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.samples().into_iter().map(|s| s.key).collect()
    }

    pub fn timings(&self, key: &str) -> Vec<Duration> {
        self.samples()
            .into_iter()
            .filter(|sample| sample.key == key)
            .map(|sample| sample.elapsed)
            .collect()
    }

    fn record(&self, sample: Sample) {
        if let Ok(mut samples) = self.samples.lock() {
            samples.push(sample);
        }
    }
}

impl Metrics for RecordingMetrics {
    fn timing(&self, key: &str, elapsed: Duration) {
        self.record(Sample {
            key: key.to_string(),
            elapsed,
        });
    }
}
