//! Per-queue snapshots and the multi-queue aggregate.

use crate::error::BoardResult;
use crate::job::{normalize, JobView};
use crate::metrics::{parse_metrics, MetricsSnapshot};
use crate::queue::{JobCounts, JobFilter, LifecycleState, QueueHandle};
use crate::registry::QueueRegistry;
use futures_util::future::try_join_all;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Maximum number of jobs listed per queue.
pub const JOBS_PER_QUEUE: usize = 10;

/// Job filters keyed by queue name.
pub type QueueFilters = HashMap<String, JobFilter>;

/// Point-in-time view of one queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueSnapshot {
    /// Queue name.
    pub name: String,
    /// Job counts for every lifecycle state.
    pub counts: JobCounts,
    /// Recently seen jobs, in backend order.
    pub jobs: Vec<JobView>,
}

/// Dashboard payload: backend metrics plus one snapshot per queue.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateResult {
    /// Backend health metrics.
    pub stats: MetricsSnapshot,
    /// Queue snapshots in registry order.
    pub queues: Vec<QueueSnapshot>,
}

/// Build the snapshot of one queue.
///
/// Counts and the job listing are fetched concurrently; the listed jobs are
/// then normalized concurrently.
///
/// # Errors
///
/// Fails if the counts fetch, the jobs fetch, or any normalization fails.
pub async fn build_snapshot(
    name: &str,
    handle: &dyn QueueHandle,
    filter: Option<&JobFilter>,
) -> BoardResult<QueueSnapshot> {
    debug!(queue = name, ?filter, "Building queue snapshot");

    let (counts, handles) = tokio::try_join!(
        handle.job_counts(&LifecycleState::ALL),
        handle.jobs(filter, JOBS_PER_QUEUE),
    )?;

    let jobs = try_join_all(handles.iter().map(|job| normalize(job.as_ref()))).await?;

    Ok(QueueSnapshot {
        name: name.to_string(),
        counts,
        jobs,
    })
}

/// Aggregate snapshots of every registered queue plus backend metrics.
///
/// Metrics are read once, from the first registered queue's connection; all
/// queues of a deployment are assumed to share one backend. An empty
/// registry yields an empty result without touching the backend.
///
/// # Errors
///
/// Fails if any queue snapshot or the metrics request fails.
pub async fn aggregate(
    registry: &QueueRegistry,
    filters: &QueueFilters,
) -> BoardResult<AggregateResult> {
    let Some((_, first)) = registry.first() else {
        return Ok(AggregateResult::default());
    };

    let connection = first.connection();
    let snapshots = registry
        .iter()
        .map(|(name, handle)| build_snapshot(name, handle.as_ref(), filters.get(name)));

    let (raw_info, queues) = tokio::try_join!(connection.info(), try_join_all(snapshots))?;

    Ok(AggregateResult {
        stats: parse_metrics(&raw_info),
        queues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_shape() {
        let json = serde_json::to_value(AggregateResult::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "stats": {}, "queues": [] }));
    }
}
