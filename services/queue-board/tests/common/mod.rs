//! In-memory queue handles for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use queue_board::{
    BackendConnection, BoardError, BoardResult, JobCounts, JobData, JobFilter, JobHandle,
    LifecycleState, QueueHandle,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn backend_error(message: &'static str) -> BoardError {
    BoardError::Redis(redis::RedisError::from((redis::ErrorKind::IoError, message)))
}

/// Connection answering `INFO` with canned text.
#[derive(Default)]
pub struct FakeConnection {
    pub info: String,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeConnection {
    pub fn with_info(info: &str) -> Arc<Self> {
        Arc::new(Self {
            info: info.to_string(),
            ..Self::default()
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendConnection for FakeConnection {
    async fn info(&self) -> BoardResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(backend_error("INFO refused"));
        }
        Ok(self.info.clone())
    }
}

/// Stored job with the state it sits in.
#[derive(Clone)]
pub struct FakeJob {
    pub state: LifecycleState,
    pub data: JobData,
}

impl FakeJob {
    pub fn new(id: &str, state: LifecycleState) -> Self {
        Self {
            state,
            data: JobData {
                id: id.to_string(),
                name: "work".to_string(),
                data: json!({ "id": id }),
                opts: json!({}),
                progress: json!(0),
                timestamp: Some(1_700_000_000_000),
                processed_on: None,
                finished_on: None,
                attempts_made: 0,
                failed_reason: None,
                stacktrace: Vec::new(),
            },
        }
    }

    pub fn attempts(mut self, attempts: u64) -> Self {
        self.data.attempts_made = attempts;
        self
    }
}

#[async_trait]
impl JobHandle for FakeJob {
    fn to_json(&self) -> BoardResult<JobData> {
        Ok(self.data.clone())
    }

    async fn is_delayed(&self) -> BoardResult<bool> {
        Ok(self.state == LifecycleState::Delayed)
    }
}

/// Queue holding jobs in memory and recording what it was asked for.
pub struct FakeQueue {
    pub connection: Arc<FakeConnection>,
    pub jobs: Vec<FakeJob>,
    pub default_states: Vec<LifecycleState>,
    pub latency: Duration,
    pub fail_jobs: bool,
    pub fail_counts: bool,
    pub calls: AtomicUsize,
    pub requested: Mutex<Vec<Option<JobFilter>>>,
    pub requested_limits: Mutex<Vec<usize>>,
}

impl FakeQueue {
    pub fn new(connection: Arc<FakeConnection>) -> Self {
        Self {
            connection,
            jobs: Vec::new(),
            default_states: Vec::new(),
            latency: Duration::ZERO,
            fail_jobs: false,
            fail_counts: false,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
            requested_limits: Mutex::new(Vec::new()),
        }
    }

    pub fn with_jobs(mut self, jobs: Vec<FakeJob>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_default_states(mut self, states: &[LifecycleState]) -> Self {
        self.default_states = states.to_vec();
        self
    }

    pub fn failing_jobs(mut self) -> Self {
        self.fail_jobs = true;
        self
    }

    pub fn failing_counts(mut self) -> Self {
        self.fail_counts = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<Option<JobFilter>> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueueHandle for FakeQueue {
    fn connection(&self) -> Arc<dyn BackendConnection> {
        self.connection.clone()
    }

    async fn job_counts(&self, states: &[LifecycleState]) -> BoardResult<JobCounts> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        if self.fail_counts {
            return Err(backend_error("counts refused"));
        }
        Ok(states
            .iter()
            .map(|state| {
                let total = self.jobs.iter().filter(|job| job.state == *state).count();
                (*state, total as u64)
            })
            .collect())
    }

    async fn jobs(
        &self,
        filter: Option<&JobFilter>,
        limit: usize,
    ) -> BoardResult<Vec<Box<dyn JobHandle>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(filter.cloned());
        self.requested_limits.lock().unwrap().push(limit);
        tokio::time::sleep(self.latency).await;
        if self.fail_jobs {
            return Err(backend_error("jobs refused"));
        }

        let states = filter.map_or_else(|| self.default_states.clone(), JobFilter::states);
        Ok(self
            .jobs
            .iter()
            .filter(|job| states.contains(&job.state))
            .take(limit)
            .map(|job| Box::new(job.clone()) as Box<dyn JobHandle>)
            .collect())
    }
}

/// `n` jobs spread over every lifecycle state.
pub fn spread_jobs(n: usize) -> Vec<FakeJob> {
    (0..n)
        .map(|i| FakeJob::new(&i.to_string(), LifecycleState::ALL[i % LifecycleState::ALL.len()]))
        .collect()
}
