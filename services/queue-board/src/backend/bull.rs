//! Adapter for queues written by the legacy Bull client.

use super::connection::RedisConnection;
use super::hash::{decode_job, JobHash};
use super::reader::{is_in_delayed_set, QueueReader};
use crate::error::BoardResult;
use crate::job::{JobData, JobHandle};
use crate::queue::{BackendConnection, JobCounts, JobFilter, LifecycleState, QueueHandle};
use async_trait::async_trait;
use std::sync::Arc;

/// Hash field holding the attempt count.
const ATTEMPT_FIELDS: [&str; 1] = ["attemptsMade"];

/// States a listing ranges over. Bull lists nothing without a filter.
pub(crate) fn listed_states(filter: Option<&JobFilter>) -> Vec<LifecycleState> {
    filter.map(JobFilter::states).unwrap_or_default()
}

/// Queue stored in the legacy Bull layout.
///
/// Without an explicit filter, Bull lists no jobs.
#[derive(Debug, Clone)]
pub struct BullQueue {
    reader: QueueReader,
}

impl BullQueue {
    /// Read queue `name` under `prefix` through `connection`.
    #[must_use]
    pub fn new(connection: Arc<RedisConnection>, prefix: &str, name: &str) -> Self {
        Self {
            reader: QueueReader::new(connection, prefix, name),
        }
    }
}

#[async_trait]
impl QueueHandle for BullQueue {
    fn connection(&self) -> Arc<dyn BackendConnection> {
        self.reader.connection.clone()
    }

    async fn job_counts(&self, states: &[LifecycleState]) -> BoardResult<JobCounts> {
        self.reader.counts(states).await
    }

    async fn jobs(
        &self,
        filter: Option<&JobFilter>,
        limit: usize,
    ) -> BoardResult<Vec<Box<dyn JobHandle>>> {
        let states = listed_states(filter);
        let ids = self.reader.job_ids(&states, limit).await?;
        let delayed_key = self.reader.keys.state(LifecycleState::Delayed);

        Ok(self
            .reader
            .job_hashes(ids)
            .await?
            .into_iter()
            .map(|(id, hash)| {
                Box::new(BullJob {
                    id,
                    hash,
                    delayed_key: delayed_key.clone(),
                    connection: self.reader.connection.clone(),
                }) as Box<dyn JobHandle>
            })
            .collect())
    }
}

/// Job read from a legacy Bull queue.
#[derive(Debug, Clone)]
pub struct BullJob {
    id: String,
    hash: JobHash,
    delayed_key: String,
    connection: Arc<RedisConnection>,
}

#[async_trait]
impl JobHandle for BullJob {
    fn to_json(&self) -> BoardResult<JobData> {
        decode_job(&self.id, &self.hash, &ATTEMPT_FIELDS)
    }

    async fn is_delayed(&self) -> BoardResult<bool> {
        is_in_delayed_set(&self.connection, &self.delayed_key, &self.id).await
    }
}
