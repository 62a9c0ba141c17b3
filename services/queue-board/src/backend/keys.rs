//! Redis key layout shared by both client generations.
//!
//! A queue named `mail` under prefix `bull` keeps its state collections at
//! `bull:mail:<state>` and each job hash at `bull:mail:<id>`.

use crate::queue::LifecycleState;

/// Prefix both client generations use unless configured otherwise.
pub const DEFAULT_PREFIX: &str = "bull";

/// Redis data type backing a lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Plain list, newest job at index 0.
    List,
    /// Sorted set scored by time, newest job has the highest score.
    SortedSet,
}

/// Redis data type holding jobs in `state`.
#[must_use]
pub const fn key_kind(state: LifecycleState) -> KeyKind {
    match state {
        LifecycleState::Active | LifecycleState::Paused | LifecycleState::Waiting => {
            KeyKind::List
        }
        LifecycleState::Completed | LifecycleState::Delayed | LifecycleState::Failed => {
            KeyKind::SortedSet
        }
    }
}

/// Key suffix for `state`. Waiting jobs live under `wait`.
#[must_use]
pub const fn state_suffix(state: LifecycleState) -> &'static str {
    match state {
        LifecycleState::Waiting => "wait",
        other => other.as_str(),
    }
}

/// Key builder for one queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueKeys {
    base: String,
}

impl QueueKeys {
    /// Keys for queue `name` under `prefix`.
    #[must_use]
    pub fn new(prefix: &str, name: &str) -> Self {
        Self {
            base: format!("{prefix}:{name}:"),
        }
    }

    /// Key of the collection holding jobs in `state`.
    #[must_use]
    pub fn state(&self, state: LifecycleState) -> String {
        format!("{}{}", self.base, state_suffix(state))
    }

    /// Key of the hash storing job `id`.
    #[must_use]
    pub fn job(&self, id: &str) -> String {
        format!("{}{id}", self.base)
    }
}
