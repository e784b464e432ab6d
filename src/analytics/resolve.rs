use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use async_trait::async_trait;

use crate::leetcode::{bounded, LeetCodeProvider, ProblemMetadata, Submission};

/// Pacing between two metadata lookups.
#[async_trait]
pub trait Throttle: Send + Sync {
    async fn pause(&self, delay: Duration);
}

/// Real wall-clock pacing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepThrottle;

#[async_trait]
impl Throttle for SleepThrottle {
    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Unique problem ids in first-seen order.
pub fn unique_problem_ids(submissions: &[Submission]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for submission in submissions {
        if seen.insert(submission.problem_id.as_str()) {
            ids.push(submission.problem_id.clone());
        }
    }
    ids
}

#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub metadata: HashMap<String, ProblemMetadata>,
    /// Unique ids handed to the resolver.
    pub total_unique: usize,
    /// Ids beyond the lookup cap, never queried.
    pub skipped: Vec<String>,
    /// Ids whose lookup errored.
    pub failed: Vec<String>,
}

impl Resolution {
    pub fn resolved(&self) -> usize {
        self.metadata.len()
    }

    pub fn limit_reached(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Sequential, rate-limit friendly metadata lookups.
///
/// At most `max_lookups` ids are queried, one at a time, with the throttle
/// paused for `delay` between two calls. A failing lookup is logged and
/// skipped; it never aborts the rest of the queue.
pub struct MetadataResolver<'a> {
    provider: &'a dyn LeetCodeProvider,
    throttle: &'a dyn Throttle,
    max_lookups: usize,
    delay: Duration,
    call_timeout: Duration,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(
        provider: &'a dyn LeetCodeProvider,
        throttle: &'a dyn Throttle,
        max_lookups: usize,
        delay: Duration,
        call_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            throttle,
            max_lookups,
            delay,
            call_timeout,
        }
    }

    pub async fn resolve(&self, ids: &[String]) -> Resolution {
        let mut queue: VecDeque<&String> = ids.iter().take(self.max_lookups).collect();
        let batch = queue.len();
        let mut resolution = Resolution {
            total_unique: ids.len(),
            skipped: ids.iter().skip(self.max_lookups).cloned().collect(),
            ..Resolution::default()
        };

        let mut position = 0;
        while let Some(id) = queue.pop_front() {
            position += 1;
            tracing::debug!(problem = %id, position, batch, "Resolving problem metadata");

            match bounded(self.call_timeout, self.provider.problem(id)).await {
                Ok(meta) => {
                    resolution.metadata.insert(id.clone(), meta);
                }
                Err(e) => {
                    tracing::warn!(problem = %id, error = %e, "Problem lookup failed, skipping");
                    resolution.failed.push(id.clone());
                }
            }

            if !queue.is_empty() {
                self.throttle.pause(self.delay).await;
            }
        }

        tracing::info!(
            resolved = resolution.resolved(),
            failed = resolution.failed.len(),
            skipped = resolution.skipped.len(),
            "Problem metadata resolved"
        );
        resolution
    }
}
