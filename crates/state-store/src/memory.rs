use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::api::{KeyChange, KeyValueStore, WriteBatch, WriteOp};
use crate::errors::StoreError;

/// In-memory key-value store standing in for the host environment's
/// persistence layer. Suitable for tests, simulation, and single-process use.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
    changes: broadcast::Sender<KeyChange>,
}

impl MemoryStore {
    pub fn new(capacity: usize) -> Arc<Self> {
        let (changes, _) = broadcast::channel(capacity.max(1));
        Arc::new(Self {
            entries: Mutex::new(HashMap::new()),
            changes,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn apply(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut notifications = Vec::with_capacity(batch.ops.len());
        {
            let mut entries = self.entries.lock();
            for op in batch.ops {
                match op {
                    WriteOp::Put { key, value } => {
                        entries.insert(key.clone(), value.clone());
                        notifications.push(KeyChange {
                            key,
                            value: Some(value),
                        });
                    }
                    WriteOp::Delete { key } => {
                        if entries.remove(&key).is_some() {
                            notifications.push(KeyChange { key, value: None });
                        }
                    }
                }
            }
        }
        for change in notifications {
            // Nobody listening is fine; the store stays the source of truth.
            let _ = self.changes.send(change);
        }
        Ok(())
    }

    fn watch(&self) -> broadcast::Receiver<KeyChange> {
        self.changes.subscribe()
    }
}
