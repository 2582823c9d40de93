//! Store client abstraction.
//!
//! The write path talks to the online key-value store exclusively through
//! [`StoreClient`]. Commands are pipelined: `set` and `set_ex` stage writes
//! on the client, and `sync` sends the staged batch and waits for the store
//! to acknowledge it. A flush is only successful after `sync` returns.

mod memory;

pub use memory::{MemoryStore, StoredEntry};

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a store client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Could not establish or re-establish the connection
    #[error("connection failed: {0}")]
    Connection(String),

    /// An operation exceeded its deadline
    #[error("operation timed out after {0} ms")]
    Timeout(u64),

    /// A command was issued while disconnected
    #[error("not connected to the store")]
    NotConnected,

    /// The store accepted the connection but rejected a command
    #[error("store rejected the command: {0}")]
    Rejected(String),

    /// The client has been shut down; no further operations are valid
    #[error("store client has been shut down")]
    Shutdown,
}

impl StoreError {
    /// Connectivity-class failures are worth retrying with backoff; anything
    /// else is fatal for the current batch.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Connection(_) | StoreError::Timeout(_) | StoreError::NotConnected
        )
    }
}

/// Client for the online key-value store.
///
/// One client is exclusively owned by one worker instance; implementations
/// do not need to be shareable across tasks.
#[async_trait]
pub trait StoreClient: Send {
    /// Establish the connection.
    async fn connect(&mut self) -> Result<(), StoreError>;

    /// Whether the connection is currently live.
    fn is_connected(&self) -> bool;

    /// Stage a write without expiration.
    async fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<(), StoreError>;

    /// Stage a write that expires after `ttl_seconds`.
    async fn set_ex(
        &mut self,
        key: Vec<u8>,
        value: Vec<u8>,
        ttl_seconds: u64,
    ) -> Result<(), StoreError>;

    /// Send all staged writes and wait for the store to acknowledge them.
    async fn sync(&mut self) -> Result<(), StoreError>;

    /// Release the connection. No operations are valid afterwards.
    async fn shutdown(&mut self);
}
