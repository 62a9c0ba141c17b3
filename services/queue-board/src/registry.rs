//! Ordered registry of named queues.

use crate::backend::{queue_handle, RedisConnection};
use crate::config::QueueConfig;
use crate::error::{BoardError, BoardResult};
use crate::queue::QueueHandle;
use std::fmt;
use std::sync::Arc;

/// Named queue handles in registration order.
///
/// Names are unique. The registry is built once at startup and only read
/// afterwards.
#[derive(Clone, Default)]
pub struct QueueRegistry {
    entries: Vec<(String, Arc<dyn QueueHandle>)>,
}

impl fmt::Debug for QueueRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueRegistry")
            .field("queues", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl QueueRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a queue under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::DuplicateQueue`] if the name is taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handle: Arc<dyn QueueHandle>,
    ) -> BoardResult<()> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(BoardError::DuplicateQueue(name));
        }
        self.entries.push((name, handle));
        Ok(())
    }

    /// Build the registry for the configured queues, all reading through
    /// one shared connection.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::DuplicateQueue`] if two queues share a name.
    pub fn from_config(
        queues: &[QueueConfig],
        connection: &Arc<RedisConnection>,
    ) -> BoardResult<Self> {
        queues.iter().try_fold(Self::new(), |registry, queue| {
            let handle = queue_handle(queue.client, Arc::clone(connection), &queue.prefix, &queue.name);
            registry.with_queue(queue.name.clone(), handle)
        })
    }

    /// Builder-style [`register`](Self::register).
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::DuplicateQueue`] if the name is taken.
    pub fn with_queue(
        mut self,
        name: impl Into<String>,
        handle: Arc<dyn QueueHandle>,
    ) -> BoardResult<Self> {
        self.register(name, handle)?;
        Ok(self)
    }

    /// Look up a queue by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn QueueHandle>> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, handle)| handle)
    }

    /// First registered queue.
    #[must_use]
    pub fn first(&self) -> Option<(&str, &Arc<dyn QueueHandle>)> {
        self.entries
            .first()
            .map(|(name, handle)| (name.as_str(), handle))
    }

    /// Iterate entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn QueueHandle>)> {
        self.entries
            .iter()
            .map(|(name, handle)| (name.as_str(), handle))
    }

    /// Iterate queue names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of registered queues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no queue is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
