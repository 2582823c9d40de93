//! Store connection lifecycle.
//!
//! One worker instance owns one connection for its whole life; there is no
//! sharing and no locking. The lifecycle is an explicit state machine:
//!
//! ```text
//! Uninitialized -> Ready -> (Disconnected <-> Connected) -> Shutdown
//! ```
//!
//! `setup` runs once per worker before any records are processed. Each
//! bundle start triggers a `connect` attempt whose failure is tolerated,
//! because the write executor re-checks liveness before every flush attempt.

use crate::store::{StoreClient, StoreError};

/// Lifecycle state of the store connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Constructed, `setup` not yet run
    Uninitialized,
    /// `setup` has run; no connection attempted yet
    Ready,
    /// Connection is live
    Connected,
    /// Connection is down; may be re-established
    Disconnected,
    /// Client released; no further operations are valid
    Shutdown,
}

/// Owns the store client and tracks its lifecycle.
#[derive(Debug)]
pub struct Connection<C: StoreClient> {
    client: C,
    state: ConnectionState,
}

impl<C: StoreClient> Connection<C> {
    /// Wrap a client. The connection starts uninitialized.
    pub fn new(client: C) -> Self {
        Self {
            client,
            state: ConnectionState::Uninitialized,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Borrow the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Borrow the underlying client mutably. Callers must have ensured the
    /// connection is live.
    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    /// One-time per-worker initialization.
    pub fn setup(&mut self) {
        if self.state == ConnectionState::Uninitialized {
            self.state = ConnectionState::Ready;
            tracing::debug!("store connection initialized");
        }
    }

    /// Bundle-start connection attempt.
    ///
    /// A failure here is logged and leaves the state `Disconnected` rather
    /// than propagating: the write executor will retry the connection before
    /// each flush, so failing the bundle this early would be premature.
    pub async fn connect(&mut self) {
        if self.state == ConnectionState::Shutdown {
            return;
        }
        match self.client.connect().await {
            Ok(()) => {
                self.state = ConnectionState::Connected;
            }
            Err(e) => {
                tracing::error!(error = %e, "connection to the store could not be established");
                self.state = ConnectionState::Disconnected;
            }
        }
    }

    /// Re-check liveness, reconnecting if needed. Called on every flush
    /// attempt, not only the first.
    pub async fn ensure_connected(&mut self) -> Result<(), StoreError> {
        if self.state == ConnectionState::Shutdown {
            return Err(StoreError::Shutdown);
        }
        if !self.client.is_connected() {
            self.client.connect().await.inspect_err(|_| {
                self.state = ConnectionState::Disconnected;
            })?;
        }
        self.state = ConnectionState::Connected;
        Ok(())
    }

    /// Release the client. Called once per worker at teardown.
    pub async fn shutdown(&mut self) {
        if self.state != ConnectionState::Shutdown {
            self.client.shutdown().await;
            self.state = ConnectionState::Shutdown;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn lifecycle_transitions() {
        let mut conn = Connection::new(MemoryStore::new());
        assert_eq!(conn.state(), ConnectionState::Uninitialized);

        conn.setup();
        assert_eq!(conn.state(), ConnectionState::Ready);

        conn.connect().await;
        assert_eq!(conn.state(), ConnectionState::Connected);

        conn.shutdown().await;
        assert_eq!(conn.state(), ConnectionState::Shutdown);
    }

    #[tokio::test]
    async fn failed_connect_is_tolerated() {
        let mut store = MemoryStore::new();
        store.fail_next_connects(1);

        let mut conn = Connection::new(store);
        conn.setup();
        conn.connect().await;
        assert_eq!(conn.state(), ConnectionState::Disconnected);

        // The executor path re-establishes the connection.
        conn.ensure_connected().await.unwrap();
        assert_eq!(conn.state(), ConnectionState::Connected);
    }

    #[tokio::test]
    async fn ensure_connected_reconnects_after_drop() {
        let mut store = MemoryStore::new();
        store.fail_next_syncs(1);

        let mut conn = Connection::new(store);
        conn.setup();
        conn.connect().await;

        // Simulate a dropped connection via a failed sync.
        let _ = conn.client_mut().sync().await;
        assert!(!conn.client().is_connected());

        conn.ensure_connected().await.unwrap();
        assert!(conn.client().is_connected());
    }

    #[tokio::test]
    async fn no_operations_after_shutdown() {
        let mut conn = Connection::new(MemoryStore::new());
        conn.setup();
        conn.shutdown().await;

        assert_eq!(
            conn.ensure_connected().await,
            Err(StoreError::Shutdown)
        );
        conn.connect().await; // no-op
        assert_eq!(conn.state(), ConnectionState::Shutdown);
    }
}
