use crate::error::{CollectorError, Result};
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Fixed-size worker pool running one task per requested location
pub struct ParallelProcessor {
    max_workers: usize,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self { max_workers }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Run `task` for every location on a dedicated thread pool.
    ///
    /// Results come back in the order of `locations`. The first failing
    /// task fails the whole call once all tasks have been gathered.
    pub fn process_locations<T, F>(
        &self,
        locations: &[String],
        progress: Option<&ProgressReporter>,
        task: F,
    ) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(&str) -> Result<T> + Sync + Send,
    {
        if self.max_workers == 0 {
            return Err(CollectorError::Config(
                "Worker pool needs at least one worker".to_string(),
            ));
        }

        let total = locations.len();
        let processed_count = AtomicUsize::new(0);

        debug!(
            "Dispatching {} locations to {} workers",
            total, self.max_workers
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| CollectorError::Config(e.to_string()))?;

        let results: Vec<Result<T>> = pool.install(|| {
            locations
                .par_iter()
                .map(|location| {
                    let result = task(location);

                    let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(p) = progress {
                        p.set_message(&format!("Processed {}/{} locations", count, total));
                    }

                    result
                })
                .collect()
        });

        results.into_iter().collect()
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
