//! Parallel processing configuration for the orchestrator.

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigValidator};

/// Controls whether stored images are transformed on a rayon pool.
///
/// Every image path is owned by exactly one worker, so enabling this only
/// changes scheduling, never results: per-image seeds are drawn up front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelPolicy {
    /// Dispatch per-image transforms across worker threads.
    /// Default: false (fully sequential)
    #[serde(default)]
    pub enabled: bool,

    /// Maximum number of threads to use for parallel processing.
    /// If None, rayon will use the default thread pool size (typically number of CPU cores).
    #[serde(default)]
    pub max_threads: Option<usize>,
}

impl ParallelPolicy {
    /// Create a new ParallelPolicy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel dispatch.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the maximum number of threads.
    pub fn with_max_threads(mut self, max_threads: Option<usize>) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Install a thread pool honoring `max_threads` and run `op` inside it.
    pub fn install<OP, R>(&self, op: OP) -> Result<R, rayon::ThreadPoolBuildError>
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = self.max_threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;
        Ok(pool.install(op))
    }
}

impl ConfigValidator for ParallelPolicy {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(threads) = self.max_threads {
            self.validate_thread_count(threads)?;
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_policy_defaults_to_sequential() {
        let policy = ParallelPolicy::default();
        assert!(!policy.enabled);
        assert!(policy.max_threads.is_none());
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_parallel_policy_rejects_zero_threads() {
        let policy = ParallelPolicy::new().with_max_threads(Some(0));
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_install_runs_closure() {
        let policy = ParallelPolicy::new().with_enabled(true).with_max_threads(Some(2));
        let threads = policy.install(rayon::current_num_threads).unwrap();
        assert_eq!(threads, 2);
    }
}
