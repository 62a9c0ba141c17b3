//! Adapter for queues written by the BullMQ client.

use super::connection::RedisConnection;
use super::hash::{decode_job, JobHash};
use super::reader::{is_in_delayed_set, QueueReader};
use crate::error::BoardResult;
use crate::job::{JobData, JobHandle};
use crate::queue::{BackendConnection, JobCounts, JobFilter, LifecycleState, QueueHandle};
use async_trait::async_trait;
use std::sync::Arc;

/// BullMQ writes `atm` in recent versions and `attemptsMade` in older ones.
const ATTEMPT_FIELDS: [&str; 2] = ["attemptsMade", "atm"];

/// States a listing ranges over.
///
/// Without a filter every state is listed. Asking for `waiting` also lists
/// `paused`, since a paused queue keeps its waiting jobs there.
pub(crate) fn listed_states(filter: Option<&JobFilter>) -> Vec<LifecycleState> {
    let mut states = filter.map_or_else(|| LifecycleState::ALL.to_vec(), JobFilter::states);
    if states.contains(&LifecycleState::Waiting) && !states.contains(&LifecycleState::Paused) {
        states.push(LifecycleState::Paused);
    }
    states
}

/// Queue stored in the BullMQ layout.
#[derive(Debug, Clone)]
pub struct BullMqQueue {
    reader: QueueReader,
}

impl BullMqQueue {
    /// Read queue `name` under `prefix` through `connection`.
    #[must_use]
    pub fn new(connection: Arc<RedisConnection>, prefix: &str, name: &str) -> Self {
        Self {
            reader: QueueReader::new(connection, prefix, name),
        }
    }
}

#[async_trait]
impl QueueHandle for BullMqQueue {
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

        let jobs = self.reader.job_hashes(ids).await?;
        Ok(jobs
            .into_iter()
            .map(|(id, hash)| -> Box<dyn JobHandle> {
                Box::new(BullMqJob {
                    id,
                    hash,
                    delayed_key: delayed_key.clone(),
                    connection: Arc::clone(&self.reader.connection),
                })
            })
            .collect())
    }
}

/// Job read from a BullMQ queue.
#[derive(Debug, Clone)]
pub struct BullMqJob {
    id: String,
    hash: JobHash,
    delayed_key: String,
    connection: Arc<RedisConnection>,
}

#[async_trait]
impl JobHandle for BullMqJob {
    fn to_json(&self) -> BoardResult<JobData> {
        decode_job(&self.id, &self.hash, &ATTEMPT_FIELDS)
    }

    async fn is_delayed(&self) -> BoardResult<bool> {
        is_in_delayed_set(&self.connection, &self.delayed_key, &self.id).await
    }
}
