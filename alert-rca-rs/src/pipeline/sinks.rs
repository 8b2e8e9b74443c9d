//! State store and event emitter seams
//!
//! Production deployments plug in their own persistence and bus; the
//! in-memory implementations here back tests and single-process setups.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, RwLock};

use crate::error::{RcaError, Result};

/// Scoped key/value persistence
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn set(&self, scope: &str, key: &str, value: Value) -> Result<()>;

    async fn get(&self, scope: &str, key: &str) -> Result<Option<Value>>;
}

/// Downstream event delivery
#[async_trait]
pub trait EventEmitter: Send + Sync {
    async fn emit(&self, topic: &str, data: Value) -> Result<()>;
}

/// A published event
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub topic: String,
    pub data: Value,
}

/// `StateStore` backed by a map
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    entries: RwLock<HashMap<(String, String), Value>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in a scope
    pub async fn len(&self, scope: &str) -> usize {
        self.entries
            .read()
            .await
            .keys()
            .filter(|(s, _)| s == scope)
            .count()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn set(&self, scope: &str, key: &str, value: Value) -> Result<()> {
        self.entries
            .write()
            .await
            .insert((scope.to_string(), key.to_string()), value);
        Ok(())
    }

    async fn get(&self, scope: &str, key: &str) -> Result<Option<Value>> {
        Ok(self
            .entries
            .read()
            .await
            .get(&(scope.to_string(), key.to_string()))
            .cloned())
    }
}

/// `EventEmitter` forwarding into an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    sender: mpsc::UnboundedSender<Event>,
}

impl ChannelEmitter {
    /// Create an emitter and the receiving end of its channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl EventEmitter for ChannelEmitter {
    async fn emit(&self, topic: &str, data: Value) -> Result<()> {
        self.sender
            .send(Event {
                topic: topic.to_string(),
                data,
            })
            .map_err(|_| RcaError::storage(format!("Event channel closed, dropped {}", topic)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_memory_store_scopes() {
        let store = MemoryStateStore::new();
        assert_ok!(store.set("rca-results", "a", json!({"x": 1})).await);
        assert_ok!(store.set("rca-failures", "a", json!({"x": 2})).await);

        assert_eq!(store.get("rca-results", "a").await.unwrap(), Some(json!({"x": 1})));
        assert_eq!(store.get("rca-failures", "a").await.unwrap(), Some(json!({"x": 2})));
        assert_eq!(store.get("rca-results", "b").await.unwrap(), None);
        assert_eq!(store.len("rca-results").await, 1);
    }

    #[tokio::test]
    async fn test_closed_channel_is_an_error() {
        let (emitter, receiver) = ChannelEmitter::new();
        drop(receiver);

        let err = assert_err!(emitter.emit("rca.completed", json!({})).await);
        assert!(matches!(err, RcaError::Storage(_)));
    }
}
