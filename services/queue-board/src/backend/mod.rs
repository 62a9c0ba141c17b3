//! Redis adapters for the two queue client generations.
//!
//! Both generations keep the same key layout (see [`keys`]) but differ in
//! details: the field holding the attempt count, and what an unfiltered job
//! listing returns. Each generation gets its own [`QueueHandle`] and
//! [`JobHandle`](crate::job::JobHandle) implementation so the snapshot code
//! never needs to know which one it reads.

pub mod bull;
pub mod bullmq;
mod connection;
pub mod hash;
pub mod keys;
mod reader;

pub use bull::{BullJob, BullQueue};
pub use bullmq::{BullMqJob, BullMqQueue};
pub use connection::RedisConnection;

use crate::queue::QueueHandle;
use serde::Deserialize;
use std::sync::Arc;

/// Client generation that wrote a queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientKind {
    /// Legacy Bull client.
    #[default]
    Bull,
    /// BullMQ client.
    BullMq,
}

/// Build the queue handle matching `kind`.
#[must_use]
pub fn queue_handle(
    kind: ClientKind,
    connection: Arc<RedisConnection>,
    prefix: &str,
    name: &str,
) -> Arc<dyn QueueHandle> {
    match kind {
        ClientKind::Bull => Arc::new(BullQueue::new(connection, prefix, name)),
        ClientKind::BullMq => Arc::new(BullMqQueue::new(connection, prefix, name)),
    }
}
