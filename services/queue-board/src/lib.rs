//! Queue board.
//!
//! Read-only dashboard snapshot of Redis-backed job queues written by the
//! Bull and BullMQ clients: job counts per lifecycle state, the latest jobs
//! of each queue in one canonical shape, and backend health metrics.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod job;
pub mod metrics;
pub mod queue;
pub mod registry;
pub mod snapshot;

pub use config::{BoardConfig, QueueConfig, RedisConfig, ServiceConfig};
pub use error::{BoardError, BoardResult};
pub use job::{normalize, JobData, JobHandle, JobView};
pub use metrics::{parse_metrics, MetricsSnapshot};
pub use queue::{BackendConnection, JobCounts, JobFilter, LifecycleState, QueueHandle};
pub use registry::QueueRegistry;
pub use snapshot::{aggregate, build_snapshot, AggregateResult, QueueFilters, QueueSnapshot};
