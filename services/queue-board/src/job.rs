//! Job handles and the canonical job view.

use crate::error::BoardResult;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Plain serialization of a job, as both client generations expose it.
#[derive(Debug, Clone, PartialEq)]
pub struct JobData {
    /// Job identifier.
    pub id: String,
    /// Job name.
    pub name: String,
    /// Job payload.
    pub data: Value,
    /// Options the job was enqueued with.
    pub opts: Value,
    /// Progress reported by the worker (number or object).
    pub progress: Value,
    /// Enqueue time in milliseconds since the epoch.
    pub timestamp: Option<u64>,
    /// Time a worker picked the job up.
    pub processed_on: Option<u64>,
    /// Time the job completed or failed.
    pub finished_on: Option<u64>,
    /// Number of attempts made so far.
    pub attempts_made: u64,
    /// Last failure message.
    pub failed_reason: Option<String>,
    /// Stack traces of failed attempts.
    pub stacktrace: Vec<String>,
}

/// Capabilities a job handle offers, independent of client generation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobHandle: Send + Sync {
    /// Serialize the job to a plain structure.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored field cannot be decoded.
    fn to_json(&self) -> BoardResult<JobData>;

    /// Ask the backend whether the job currently sits in the delayed set.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend query fails.
    async fn is_delayed(&self) -> BoardResult<bool>;
}

/// Canonical job record returned to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    /// Job identifier.
    pub id: String,
    /// Enqueue time in milliseconds since the epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    /// Time a worker picked the job up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_on: Option<u64>,
    /// Time the job completed or failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_on: Option<u64>,
    /// Progress reported by the worker.
    pub progress: Value,
    /// Number of attempts made so far.
    pub attempts: u64,
    /// Whether the job is delayed right now.
    pub delay: bool,
    /// Last failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_reason: Option<String>,
    /// Stack traces of failed attempts.
    pub stacktrace: Vec<String>,
    /// Options the job was enqueued with.
    pub opts: Value,
    /// Job payload.
    pub data: Value,
    /// Job name.
    pub name: String,
}

/// Normalize a job handle into a [`JobView`].
///
/// The delayed flag always comes from [`JobHandle::is_delayed`], never from
/// the serialized structure.
///
/// # Errors
///
/// Propagates failures from either capability.
pub async fn normalize(job: &dyn JobHandle) -> BoardResult<JobView> {
    let data = job.to_json()?;
    let delay = job.is_delayed().await?;

    Ok(JobView {
        id: data.id,
        timestamp: data.timestamp,
        processed_on: data.processed_on,
        finished_on: data.finished_on,
        progress: data.progress,
        attempts: data.attempts_made,
        delay,
        failed_reason: data.failed_reason,
        stacktrace: data.stacktrace,
        opts: data.opts,
        data: data.data,
        name: data.name,
    })
}
