//! Read-only Redis commands common to both client generations.

use super::connection::RedisConnection;
use super::hash::JobHash;
use super::keys::{key_kind, KeyKind, QueueKeys};
use crate::error::{BoardError, BoardResult};
use crate::queue::{JobCounts, LifecycleState};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Reads the state collections and job hashes of one queue.
#[derive(Debug, Clone)]
pub(crate) struct QueueReader {
    pub(crate) name: String,
    pub(crate) keys: QueueKeys,
    pub(crate) connection: Arc<RedisConnection>,
}

impl QueueReader {
    pub(crate) fn new(connection: Arc<RedisConnection>, prefix: &str, name: &str) -> Self {
        Self {
            name: name.to_string(),
            keys: QueueKeys::new(prefix, name),
            connection,
        }
    }

    /// Count jobs per state in one pipelined round trip.
    pub(crate) async fn counts(&self, states: &[LifecycleState]) -> BoardResult<JobCounts> {
        debug!(queue = %self.name, ?states, "Counting jobs");

        let mut pipe = redis::pipe();
        for &state in states {
            let command = match key_kind(state) {
                KeyKind::List => "LLEN",
                KeyKind::SortedSet => "ZCARD",
            };
            pipe.cmd(command).arg(self.keys.state(state));
        }

        let mut conn = self.connection.manager();
        let totals: Vec<u64> = pipe.query_async(&mut conn).await?;

        Ok(states.iter().copied().zip(totals).collect())
    }

    /// Newest job ids across `states`, at most `limit` of them.
    ///
    /// Ranges are read per state, concatenated in `states` order and
    /// de-duplicated.
    pub(crate) async fn job_ids(
        &self,
        states: &[LifecycleState],
        limit: usize,
    ) -> BoardResult<Vec<String>> {
        if states.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        debug!(queue = %self.name, ?states, limit, "Listing job ids");

        let stop = isize::try_from(limit - 1).unwrap_or(isize::MAX);
        let mut pipe = redis::pipe();
        for &state in states {
            let command = match key_kind(state) {
                KeyKind::List => "LRANGE",
                KeyKind::SortedSet => "ZREVRANGE",
            };
            pipe.cmd(command).arg(self.keys.state(state)).arg(0).arg(stop);
        }

        let mut conn = self.connection.manager();
        let ranges: Vec<Vec<String>> = pipe.query_async(&mut conn).await?;

        Ok(merge_ranges(ranges, limit))
    }

    /// Load the hashes of `ids`.
    ///
    /// Fails with [`BoardError::MissingJob`] if a job was removed after it
    /// was listed.
    pub(crate) async fn job_hashes(&self, ids: Vec<String>) -> BoardResult<Vec<(String, JobHash)>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut pipe = redis::pipe();
        for id in &ids {
            pipe.cmd("HGETALL").arg(self.keys.job(id));
        }

        let mut conn = self.connection.manager();
        let hashes: Vec<JobHash> = pipe.query_async(&mut conn).await?;

        pair_hashes(&self.name, ids, hashes)
    }
}

/// Concatenate per-state id ranges, drop repeated ids and keep the first
/// `limit`.
pub(crate) fn merge_ranges(ranges: Vec<Vec<String>>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    ranges
        .into_iter()
        .flatten()
        .filter(|id| seen.insert(id.clone()))
        .take(limit)
        .collect()
}

/// Pair listed ids with their hashes. An empty hash means the job is gone.
pub(crate) fn pair_hashes(
    queue: &str,
    ids: Vec<String>,
    hashes: Vec<JobHash>,
) -> BoardResult<Vec<(String, JobHash)>> {
    ids.into_iter()
        .zip(hashes)
        .map(|(id, hash)| {
            if hash.is_empty() {
                debug!(queue, job = %id, "Job vanished before it could be read");
                return Err(BoardError::MissingJob {
                    queue: queue.to_string(),
                    id,
                });
            }
            Ok((id, hash))
        })
        .collect()
}

/// Check membership of job `id` in the delayed set.
pub(crate) async fn is_in_delayed_set(
    connection: &RedisConnection,
    delayed_key: &str,
    id: &str,
) -> BoardResult<bool> {
    let mut conn = connection.manager();
    let score: Option<f64> = redis::cmd("ZSCORE")
        .arg(delayed_key)
        .arg(id)
        .query_async(&mut conn)
        .await?;
    Ok(score.is_some())
}
