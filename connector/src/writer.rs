//! The batched write path: buffer, flush, retry, route.
//!
//! A [`FeatureWriter`] is driven by the upstream engine through explicit
//! lifecycle hooks rather than framework callbacks:
//!
//! - `setup` once per worker instance
//! - `start_bundle` at each bundle boundary
//! - `process` per record, flushing whenever the buffer reaches the batch
//!   size
//! - `finish_bundle` to flush any remainder
//! - `teardown` to release the store connection
//!
//! A flush encodes every buffered record, applies the TTL policy, executes
//! the surviving writes as one pipelined store batch under the retry budget,
//! and routes each record to the successful or failed output stream. The
//! buffer is always cleared by a flush; outcomes are captured per record
//! before that happens. Per-record problems (missing schema, encode
//! failure, staleness) never abort sibling records.

use crate::clock::{SystemClock, TimeSource};
use crate::config::{ConfigError, WriterConfig};
use crate::connection::Connection;
use crate::error::SinkError;
use crate::failure::FailureRecord;
use crate::jitter::RandomJitter;
use crate::output::Outputs;
use crate::retry::RetryConfig;
use crate::store::{StoreClient, StoreError};
use plume_engine::{codec, Error as EngineError, FeatureRecord, FeatureSetId, FeatureSetSchema, Jitter, TtlDecision, TtlPolicy};
use std::collections::HashMap;
use std::time::Duration;

/// Per-flush outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
    /// Records written to the store
    pub written: usize,
    /// Records skipped as stale by the TTL policy
    pub skipped: usize,
    /// Records routed to the failure sink because of an error
    pub failed: usize,
}

impl FlushSummary {
    /// Total records accounted for by this flush.
    pub fn total(&self) -> usize {
        self.written + self.skipped + self.failed
    }
}

/// An encoded record waiting to be executed against the store.
#[derive(Debug)]
struct PlannedWrite {
    record: FeatureRecord,
    key: Vec<u8>,
    value: Vec<u8>,
    /// Zero means write without expiration
    ttl_seconds: u64,
}

/// The write path worker: one per worker instance, single-threaded over the
/// records of one bundle at a time.
pub struct FeatureWriter<C: StoreClient> {
    config: WriterConfig,
    schemas: HashMap<FeatureSetId, FeatureSetSchema>,
    connection: Connection<C>,
    retry: RetryConfig,
    policy: TtlPolicy,
    buffer: Vec<FeatureRecord>,
    outputs: Outputs,
    job_name: String,
    clock: Box<dyn TimeSource>,
    jitter: Box<dyn Jitter + Send>,
}

impl<C: StoreClient> FeatureWriter<C> {
    /// Create a writer. Fails if the configuration is invalid.
    pub fn new(
        config: WriterConfig,
        schemas: HashMap<FeatureSetId, FeatureSetSchema>,
        client: C,
        outputs: Outputs,
        job_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let policy = TtlPolicy::new(config.enable_ttl, config.max_ttl_jitter_seconds);
        Ok(Self {
            config,
            schemas,
            connection: Connection::new(client),
            retry: RetryConfig::default(),
            policy,
            buffer: Vec::new(),
            outputs,
            job_name: job_name.into(),
            clock: Box::new(SystemClock),
            jitter: Box::new(RandomJitter),
        })
    }

    /// Override the retry policy.
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Inject a time source (tests, deterministic replays).
    pub fn with_time_source(mut self, clock: impl TimeSource + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Inject a jitter source (tests, deterministic replays).
    pub fn with_jitter_source(mut self, jitter: impl Jitter + Send + 'static) -> Self {
        self.jitter = Box::new(jitter);
        self
    }

    /// One-time per-worker initialization. Runs before any records.
    pub fn setup(&mut self) {
        self.connection.setup();
    }

    /// Bundle start: clear the buffer and attempt to connect. A connection
    /// failure here is logged, not fatal - the executor re-attempts before
    /// each flush.
    pub async fn start_bundle(&mut self) {
        self.buffer.clear();
        self.connection.connect().await;
    }

    /// Accept one record. Flushes when the buffer reaches the configured
    /// batch size and returns that flush's summary.
    pub async fn process(&mut self, record: FeatureRecord) -> Option<FlushSummary> {
        self.buffer.push(record);
        if self.buffer.len() >= self.config.batch_size {
            Some(self.flush().await)
        } else {
            None
        }
    }

    /// Bundle end: flush whatever remains. Never leaves buffered records
    /// behind.
    pub async fn finish_bundle(&mut self) -> FlushSummary {
        self.flush().await
    }

    /// Release the store connection. Called once at worker teardown; no
    /// further operations are valid afterwards.
    pub async fn teardown(&mut self) {
        self.connection.shutdown().await;
    }

    /// Number of records currently buffered.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Borrow the underlying store client.
    pub fn store(&self) -> &C {
        self.connection.client()
    }

    /// Drain the buffer, encode, decide TTLs, execute, and route outcomes.
    async fn flush(&mut self) -> FlushSummary {
        let records = std::mem::take(&mut self.buffer);
        if records.is_empty() {
            return FlushSummary::default();
        }
        tracing::debug!(records = records.len(), "flushing batch to the store");

        let now = self.clock.now_seconds();
        let mut summary = FlushSummary::default();
        let mut planned: Vec<PlannedWrite> = Vec::with_capacity(records.len());
        let mut skipped: Vec<FeatureRecord> = Vec::new();

        for record in records {
            let Some(schema) = self.schemas.get(&record.feature_set) else {
                // Operator error: a known feature set should always have a
                // schema. Loud, but fatal only to this record.
                tracing::error!(
                    feature_set = %record.feature_set,
                    "no schema registered for feature set, failing record"
                );
                let error =
                    SinkError::Engine(EngineError::MissingSchema(record.feature_set.clone()));
                summary.failed += 1;
                self.outputs.emit_failure(
                    FailureRecord::write_failed(&record, &error, &self.job_name),
                    self.clock.now_millis(),
                );
                continue;
            };

            let (key, value) = match codec::encode(&record, schema) {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::error!(
                        feature_set = %record.feature_set,
                        error = %e,
                        "record could not be encoded, failing record"
                    );
                    let error = SinkError::Engine(e);
                    summary.failed += 1;
                    self.outputs.emit_failure(
                        FailureRecord::write_failed(&record, &error, &self.job_name),
                        self.clock.now_millis(),
                    );
                    continue;
                }
            };

            if self.policy.enabled && !schema.has_max_age() {
                tracing::warn!(
                    feature_set = %schema.name,
                    "schema has no max age configured, writing without expiration"
                );
            }

            match self
                .policy
                .decide(&record, Some(schema), now, self.jitter.as_mut())
            {
                TtlDecision::Stale => {
                    tracing::info!(
                        feature_set = %record.feature_set,
                        event_timestamp = record.event_timestamp,
                        "record is stale, skipping write"
                    );
                    skipped.push(record);
                }
                TtlDecision::Write { ttl_seconds } => {
                    planned.push(PlannedWrite {
                        record,
                        key,
                        value,
                        ttl_seconds,
                    });
                }
            }
        }

        if !planned.is_empty() {
            match self.execute_with_retry(&planned).await {
                Ok(()) => {
                    summary.written = planned.len();
                    let now_ms = self.clock.now_millis();
                    for write in planned {
                        self.outputs.emit_success(write.record, now_ms);
                    }
                }
                Err(error) => {
                    tracing::error!(
                        error = %error,
                        records = planned.len(),
                        "batch flush failed, routing records to the failure sink"
                    );
                    summary.failed += planned.len();
                    let now_ms = self.clock.now_millis();
                    for write in planned {
                        self.outputs.emit_failure(
                            FailureRecord::write_failed(&write.record, &error, &self.job_name),
                            now_ms,
                        );
                    }
                }
            }
        }

        summary.skipped = skipped.len();
        let now_ms = self.clock.now_millis();
        for record in skipped {
            self.outputs
                .emit_failure(FailureRecord::stale(&record, &self.job_name), now_ms);
        }

        summary
    }

    /// Execute a planned batch, retrying transient failures under the
    /// backoff budget. The connection is re-checked on every attempt.
    async fn execute_with_retry(&mut self, batch: &[PlannedWrite]) -> Result<(), SinkError> {
        let mut attempt: u32 = 0;
        loop {
            match self.try_execute(batch).await {
                Ok(()) => return Ok(()),
                Err(e) if !e.is_transient() => return Err(SinkError::Store(e)),
                Err(e) if attempt >= self.retry.max_retries => {
                    return Err(SinkError::RetriesExhausted {
                        attempts: attempt + 1,
                        source: e,
                    });
                }
                Err(e) => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        attempt,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "transient store error, backing off before retry"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// One attempt: reconnect if needed, stage every write, then sync. The
    /// whole store interaction is bounded by the configured timeout.
    async fn try_execute(&mut self, batch: &[PlannedWrite]) -> Result<(), StoreError> {
        self.connection.ensure_connected().await?;

        let timeout = Duration::from_millis(self.config.timeout_ms);
        let client = self.connection.client_mut();
        let io = async {
            for write in batch {
                if write.ttl_seconds > 0 {
                    client
                        .set_ex(write.key.clone(), write.value.clone(), write.ttl_seconds)
                        .await?;
                } else {
                    client.set(write.key.clone(), write.value.clone()).await?;
                }
            }
            client.sync().await
        };

        match tokio::time::timeout(timeout, io).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.config.timeout_ms)),
        }
    }
}
