//! Queue handle abstraction shared by both client generations.

use crate::error::BoardResult;
use crate::job::JobHandle;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Lifecycle state of a job at observation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Being processed by a worker.
    Active,
    /// Finished successfully.
    Completed,
    /// Scheduled to run later.
    Delayed,
    /// Finished with an error.
    Failed,
    /// Waiting in a paused queue.
    Paused,
    /// Waiting for a worker.
    Waiting,
}

impl LifecycleState {
    /// Every lifecycle state, in canonical order.
    pub const ALL: [Self; 6] = [
        Self::Active,
        Self::Completed,
        Self::Delayed,
        Self::Failed,
        Self::Paused,
        Self::Waiting,
    ];

    /// Lowercase state name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Delayed => "delayed",
            Self::Failed => "failed",
            Self::Paused => "paused",
            Self::Waiting => "waiting",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown state name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown lifecycle state: {0}")]
pub struct UnknownState(pub String);

impl FromStr for LifecycleState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownState(s.to_string()))
    }
}

/// Job counts keyed by lifecycle state.
pub type JobCounts = BTreeMap<LifecycleState, u64>;

/// Job filter requested for one queue.
///
/// A queue with no filter at all uses the handle's default, see
/// [`QueueHandle::jobs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobFilter {
    /// Jobs in any lifecycle state.
    Latest,
    /// Jobs in one state.
    State(LifecycleState),
    /// Jobs in any of the listed states, ranged in list order.
    States(Vec<LifecycleState>),
}

impl JobFilter {
    /// States to range over, with `Latest` expanded to every state.
    #[must_use]
    pub fn states(&self) -> Vec<LifecycleState> {
        match self {
            Self::Latest => LifecycleState::ALL.to_vec(),
            Self::State(state) => vec![*state],
            Self::States(states) => states.clone(),
        }
    }
}

/// Connection to the storage backend shared by the queues.
#[async_trait]
pub trait BackendConnection: Send + Sync {
    /// Fetch the raw status report (`INFO`).
    async fn info(&self) -> BoardResult<String>;
}

/// Read-only view of one named queue.
#[async_trait]
pub trait QueueHandle: Send + Sync {
    /// Connection this queue reads from.
    fn connection(&self) -> Arc<dyn BackendConnection>;

    /// Count jobs in each of the given states.
    async fn job_counts(&self, states: &[LifecycleState]) -> BoardResult<JobCounts>;

    /// List at most `limit` jobs matching `filter`, in backend order.
    ///
    /// `None` applies the client generation's own default filter.
    async fn jobs(
        &self,
        filter: Option<&JobFilter>,
        limit: usize,
    ) -> BoardResult<Vec<Box<dyn JobHandle>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trips_through_name() {
        for state in LifecycleState::ALL {
            assert_eq!(state.as_str().parse::<LifecycleState>(), Ok(state));
        }
        assert_eq!(
            "wait".parse::<LifecycleState>(),
            Err(UnknownState("wait".to_string()))
        );
    }

    #[test]
    fn test_latest_expands_to_every_state() {
        assert_eq!(JobFilter::Latest.states(), LifecycleState::ALL.to_vec());
        assert_eq!(
            JobFilter::State(LifecycleState::Failed).states(),
            vec![LifecycleState::Failed]
        );
    }

    #[test]
    fn test_counts_serialize_with_state_names() {
        let counts: JobCounts = LifecycleState::ALL.into_iter().zip(0..).collect();
        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "active": 0,
                "completed": 1,
                "delayed": 2,
                "failed": 3,
                "paused": 4,
                "waiting": 5,
            })
        );
    }
}
