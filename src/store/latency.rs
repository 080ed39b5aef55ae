use std::fmt::Debug;
use std::time::Duration;

use rand::Rng;

/// Decides how long each store operation waits before touching state.
pub trait Latency: Debug + Send + Sync {
    fn next_delay(&self) -> Duration;
}

/// Zero delay; for tests and batch tools
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLatency;

impl Latency for NoLatency {
    fn next_delay(&self) -> Duration {
        Duration::ZERO
    }
}

/// Delay drawn uniformly from `min_ms..=max_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLatency {
    min_ms: u64,
    max_ms: u64,
}

impl UniformLatency {
    pub const DEFAULT_MIN_MS: u64 = 50;
    pub const DEFAULT_MAX_MS: u64 = 350;
    /// Upper bound of the recognized configuration range
    pub const MAX_RECOGNIZED_MS: u64 = 5_000;

    /// Returns `None` unless `min_ms <= max_ms <= MAX_RECOGNIZED_MS`.
    pub fn new(min_ms: u64, max_ms: u64) -> Option<Self> {
        if min_ms <= max_ms && max_ms <= Self::MAX_RECOGNIZED_MS {
            Some(Self { min_ms, max_ms })
        } else {
            None
        }
    }

    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }
}

impl Default for UniformLatency {
    fn default() -> Self {
        Self {
            min_ms: Self::DEFAULT_MIN_MS,
            max_ms: Self::DEFAULT_MAX_MS,
        }
    }
}

impl Latency for UniformLatency {
    fn next_delay(&self) -> Duration {
        if self.min_ms == self.max_ms {
            return self.min();
        }
        let ms = rand::thread_rng().gen_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }
}
