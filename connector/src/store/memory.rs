//! In-process store implementation.
//!
//! Backs local runs and the test suite. Mirrors the pipelined contract of a
//! real store client: writes stage in a buffer and only land in the map on
//! `sync`. Fault injection switches simulate flaky networks and hostile
//! stores.

use super::{StoreClient, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;

/// A value as stored, with its expiration if one was set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub value: Vec<u8>,
    pub ttl_seconds: Option<u64>,
}

#[derive(Debug, Clone)]
struct StagedWrite {
    key: Vec<u8>,
    value: Vec<u8>,
    ttl_seconds: Option<u64>,
}

/// An in-memory key-value store with last-write-wins semantics per key.
#[derive(Debug, Default)]
pub struct MemoryStore {
    connected: bool,
    shut_down: bool,
    staged: Vec<StagedWrite>,
    data: HashMap<Vec<u8>, StoredEntry>,
    // Fault injection
    fail_connects: u32,
    fail_syncs: u32,
    fatal_sync_message: Option<String>,
    // Instrumentation
    connect_calls: u32,
    sync_calls: u32,
}

impl MemoryStore {
    /// Create a disconnected, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` connect attempts with a connection error.
    pub fn fail_next_connects(&mut self, n: u32) {
        self.fail_connects = n;
    }

    /// Fail the next `n` sync calls with a transient connection error.
    /// The failed sync drops the connection, like a real network fault.
    pub fn fail_next_syncs(&mut self, n: u32) {
        self.fail_syncs = n;
    }

    /// Fail every sync call with a non-retriable rejection.
    pub fn reject_syncs(&mut self, message: impl Into<String>) {
        self.fatal_sync_message = Some(message.into());
    }

    /// Look up a stored entry by key.
    pub fn entry(&self, key: &[u8]) -> Option<&StoredEntry> {
        self.data.get(key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// How many times `connect` was called.
    pub fn connect_calls(&self) -> u32 {
        self.connect_calls
    }

    /// How many times `sync` was called.
    pub fn sync_calls(&self) -> u32 {
        self.sync_calls
    }

    fn check_open(&self) -> Result<(), StoreError> {
        if self.shut_down {
            return Err(StoreError::Shutdown);
        }
        if !self.connected {
            return Err(StoreError::NotConnected);
        }
        Ok(())
    }
}

#[async_trait]
impl StoreClient for MemoryStore {
    async fn connect(&mut self) -> Result<(), StoreError> {
        if self.shut_down {
            return Err(StoreError::Shutdown);
        }
        self.connect_calls += 1;
        if self.fail_connects > 0 {
            self.fail_connects -= 1;
            return Err(StoreError::Connection("injected connect failure".into()));
        }
        self.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected && !self.shut_down
    }

    async fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<(), StoreError> {
        self.check_open()?;
        self.staged.push(StagedWrite {
            key,
            value,
            ttl_seconds: None,
        });
        Ok(())
    }

    async fn set_ex(
        &mut self,
        key: Vec<u8>,
        value: Vec<u8>,
        ttl_seconds: u64,
    ) -> Result<(), StoreError> {
        self.check_open()?;
        self.staged.push(StagedWrite {
            key,
            value,
            ttl_seconds: Some(ttl_seconds),
        });
        Ok(())
    }

    async fn sync(&mut self) -> Result<(), StoreError> {
        self.check_open()?;
        self.sync_calls += 1;

        if let Some(message) = &self.fatal_sync_message {
            self.staged.clear();
            return Err(StoreError::Rejected(message.clone()));
        }
        if self.fail_syncs > 0 {
            self.fail_syncs -= 1;
            self.staged.clear();
            self.connected = false;
            return Err(StoreError::Connection("injected sync failure".into()));
        }

        for write in self.staged.drain(..) {
            self.data.insert(
                write.key,
                StoredEntry {
                    value: write.value,
                    ttl_seconds: write.ttl_seconds,
                },
            );
        }
        Ok(())
    }

    async fn shutdown(&mut self) {
        self.connected = false;
        self.shut_down = true;
        self.staged.clear();
    }
}
