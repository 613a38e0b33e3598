use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::errors::StoreError;

/// One mutation inside a [`WriteBatch`].
#[derive(Clone, Debug)]
pub enum WriteOp {
    Put { key: String, value: Value },
    Delete { key: String },
}

/// An ordered set of mutations applied as a unit: every op lands before any
/// change notification goes out, so subscribers never observe a half-written
/// pair of keys.
#[derive(Clone, Debug, Default)]
pub struct WriteBatch {
    pub ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(mut self, key: impl Into<String>, value: Value) -> Self {
        self.ops.push(WriteOp::Put {
            key: key.into(),
            value,
        });
        self
    }

    pub fn delete(mut self, key: impl Into<String>) -> Self {
        self.ops.push(WriteOp::Delete { key: key.into() });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Notification emitted for each key once the batch containing it has been
/// fully applied. `value` is `None` for deletions.
#[derive(Clone, Debug)]
pub struct KeyChange {
    pub key: String,
    pub value: Option<Value>,
}

/// Async mapping from string key to JSON value with change subscription.
/// Writes are last-writer-wins per key; atomicity spans a single batch only.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    async fn apply(&self, batch: WriteBatch) -> Result<(), StoreError>;

    fn watch(&self) -> broadcast::Receiver<KeyChange>;
}
