//! Table lifecycle orchestration
//!
//! Drives the `Absent -> Creating -> Active -> Absent` state machine of the
//! remote table. The transient `Creating` state is only ever observed by
//! polling; nothing is cached locally - the table's own status is the source
//! of truth.
//!
//! The poll loop is bounded: after `max_poll_attempts` non-active
//! observations it fails with [`ApiError::ProvisioningTimeout`] instead of
//! waiting forever.

use crate::backoff::Backoff;
use crate::error::ApiError;
use reeldb_core::{MovieStore, StoreError, TableSchema, TableStatus};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Transient describe failures are retried in place this many times before
/// the poll gives up.
const DESCRIBE_RETRY_ATTEMPTS: u32 = 3;

/// Creates the table, polls it to readiness, and deletes it.
pub struct TableLifecycle<S> {
    store: Arc<S>,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl<S: MovieStore> TableLifecycle<S> {
    pub fn new(store: Arc<S>, poll_interval: Duration, max_poll_attempts: u32) -> Self {
        Self {
            store,
            poll_interval,
            max_poll_attempts: max_poll_attempts.max(1),
        }
    }

    /// Issue the create-table request. Success means provisioning has
    /// started, not that the table is ready.
    pub async fn create(&self, schema: &TableSchema) -> Result<(), ApiError> {
        match self.store.create_table(schema).await {
            Ok(()) => Ok(()),
            Err(StoreError::AlreadyExists(table)) => Err(ApiError::TableExists(table)),
            Err(e) => Err(ApiError::Provisioning(e)),
        }
    }

    /// Poll until the table reports active, sleeping `poll_interval` between
    /// checks, for at most `max_poll_attempts` polls.
    pub async fn await_active(&self, table: &str) -> Result<(), ApiError> {
        for attempt in 1..=self.max_poll_attempts {
            match self.describe_with_retry(table).await? {
                TableStatus::Active => {
                    info!(table = %table, attempt, "table is active");
                    return Ok(());
                }
                status => {
                    debug!(table = %table, attempt, status = ?status, "table not yet active");
                }
            }
            if attempt < self.max_poll_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }
        Err(ApiError::ProvisioningTimeout {
            table: table.to_string(),
            attempts: self.max_poll_attempts,
        })
    }

    /// Issue the delete-table request.
    ///
    /// Deleting an absent table is reported as [`ApiError::TableNotFound`],
    /// never as success.
    pub async fn drop_table(&self, table: &str) -> Result<(), ApiError> {
        match self.store.delete_table(table).await {
            Ok(()) => {
                info!(table = %table, "table deleted");
                Ok(())
            }
            Err(StoreError::NotFound(table)) => Err(ApiError::TableNotFound(table)),
            Err(e) => Err(ApiError::Drop(e)),
        }
    }

    /// One status observation, retrying transient describe failures with
    /// backoff up to a small budget.
    async fn describe_with_retry(&self, table: &str) -> Result<TableStatus, ApiError> {
        let mut backoff = Backoff::new(200, 5_000);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.store.table_status(table).await {
                Ok(status) => return Ok(status),
                Err(e) if e.is_transient() && attempt < DESCRIBE_RETRY_ATTEMPTS => {
                    warn!(table = %table, attempt, error = %e, "transient describe failure, retrying");
                    tokio::time::sleep(backoff.next_delay()).await;
                }
                Err(e) => return Err(ApiError::Describe(e)),
            }
        }
    }
}
