//! Record service: per-request orchestration
//!
//! Drives each request through the fixed pipeline:
//! validate -> guard chain -> storage -> notification. Validation and
//! guard failures are terminal and reported immediately; a notification
//! failure after a committed write is logged and swallowed - it never
//! rolls the write back.

use crate::config::QueueConfig;
use crate::error::{Outcome, ServiceError};
use crate::guards::{GuardChain, GuardOutcome};
use crate::notify::NotificationDispatcher;
use crate::storage::{QueueClient, StorageProvider};
use chrono::Utc;
use std::sync::Arc;
use transfer_core::{
    merge, CustomerId, InteractionId, TouchpointId, Transfer, TransferId, TransferPatch,
    ValidationMode, Validator,
};

/// The transfer record service
///
/// Holds no per-request state; every operation is independent and safe
/// to run concurrently. No optimistic-concurrency token is enforced, so
/// two concurrent patches of the same record can race (last write wins).
#[derive(Clone)]
pub struct TransferService {
    storage: Arc<dyn StorageProvider>,
    guards: GuardChain,
    validator: Validator,
    dispatcher: NotificationDispatcher,
}

impl TransferService {
    /// Create new service over the storage and queue collaborators
    #[must_use]
    pub fn new(
        storage: Arc<dyn StorageProvider>,
        queue: Arc<dyn QueueClient>,
        config: QueueConfig,
    ) -> Self {
        Self {
            guards: GuardChain::new(Arc::clone(&storage)),
            validator: Validator::new(),
            dispatcher: NotificationDispatcher::new(Arc::clone(&storage), queue, config),
            storage,
        }
    }

    /// Create a new transfer
    ///
    /// Route identifiers and the caller identity come from the transport
    /// layer; the candidate carries only the business fields. On success
    /// a created-notification is dispatched with the stored record.
    pub async fn create(
        &self,
        customer_id: CustomerId,
        interaction_id: InteractionId,
        caller: TouchpointId,
        candidate: TransferPatch,
        request_url: &str,
    ) -> Result<Outcome<Transfer>, ServiceError> {
        tracing::info!(
            "create transfer for customer {} by touchpoint {}",
            customer_id,
            caller
        );

        let transfer = Transfer::create(customer_id, interaction_id, caller, candidate, Utc::now());

        let failures = self.validator.validate(&transfer, ValidationMode::Create);
        if !failures.is_empty() {
            tracing::info!("create rejected with {} validation failures", failures.len());
            return Ok(Outcome::Rejected(failures));
        }

        match self.guards.check_write(customer_id, interaction_id).await? {
            GuardOutcome::Passed => {}
            GuardOutcome::CustomerReadOnly => {
                return Ok(Outcome::Forbidden { customer_id });
            }
            GuardOutcome::CustomerMissing | GuardOutcome::InteractionMissing => {
                return Ok(Outcome::DependencyMissing);
            }
        }

        let Some(stored) = self.storage.create_transfer(transfer).await? else {
            tracing::warn!("store did not confirm create for customer {}", customer_id);
            return Ok(Outcome::WriteFailed);
        };

        if let Err(e) = self.dispatcher.notify_created(&stored, request_url).await {
            tracing::warn!(
                "notification dispatch failed after create of {}: {}",
                stored.transfer_id,
                e
            );
        }

        tracing::info!("created transfer {}", stored.transfer_id);
        Ok(Outcome::Success(stored))
    }

    /// Apply a partial update to an existing transfer
    ///
    /// A missing existing record is a valid terminal outcome
    /// (`DependencyMissing`), not an error.
    pub async fn patch(
        &self,
        customer_id: CustomerId,
        interaction_id: InteractionId,
        transfer_id: TransferId,
        caller: TouchpointId,
        patch: TransferPatch,
        request_url: &str,
    ) -> Result<Outcome<Transfer>, ServiceError> {
        tracing::info!(
            "patch transfer {} for customer {} by touchpoint {}",
            transfer_id,
            customer_id,
            caller
        );

        let failures = self.validator.validate(&patch, ValidationMode::Patch);
        if !failures.is_empty() {
            tracing::info!("patch rejected with {} validation failures", failures.len());
            return Ok(Outcome::Rejected(failures));
        }

        match self.guards.check_write(customer_id, interaction_id).await? {
            GuardOutcome::Passed => {}
            GuardOutcome::CustomerReadOnly => {
                return Ok(Outcome::Forbidden { customer_id });
            }
            GuardOutcome::CustomerMissing | GuardOutcome::InteractionMissing => {
                return Ok(Outcome::DependencyMissing);
            }
        }

        let Some(existing) = self.storage.get_transfer(customer_id, transfer_id).await? else {
            return Ok(Outcome::DependencyMissing);
        };

        let updated = merge(existing, &patch, &caller, Utc::now());

        let Some(stored) = self.storage.update_transfer(updated).await? else {
            tracing::warn!("store did not confirm update for transfer {}", transfer_id);
            return Ok(Outcome::WriteFailed);
        };

        if let Err(e) = self.dispatcher.notify_modified(&stored, request_url).await {
            tracing::warn!(
                "notification dispatch failed after patch of {}: {}",
                stored.transfer_id,
                e
            );
        }

        tracing::info!("patched transfer {}", stored.transfer_id);
        Ok(Outcome::Success(stored))
    }

    /// Fetch a single transfer
    ///
    /// Runs the read-path guards only: no validation, no read-only
    /// check. A missing record reports as `DependencyMissing`, exactly
    /// like a missing customer or interaction.
    pub async fn get(
        &self,
        customer_id: CustomerId,
        interaction_id: InteractionId,
        transfer_id: TransferId,
    ) -> Result<Outcome<Transfer>, ServiceError> {
        match self.guards.check_read(customer_id, interaction_id).await? {
            GuardOutcome::Passed => {}
            _ => return Ok(Outcome::DependencyMissing),
        }

        match self.storage.get_transfer(customer_id, transfer_id).await? {
            Some(transfer) => Ok(Outcome::Success(transfer)),
            None => Ok(Outcome::DependencyMissing),
        }
    }

    /// Fetch all transfers for a customer
    ///
    /// An empty list is a success; only failed guards report
    /// `DependencyMissing`.
    pub async fn list(
        &self,
        customer_id: CustomerId,
        interaction_id: InteractionId,
    ) -> Result<Outcome<Vec<Transfer>>, ServiceError> {
        match self.guards.check_read(customer_id, interaction_id).await? {
            GuardOutcome::Passed => {}
            _ => return Ok(Outcome::DependencyMissing),
        }

        let transfers = self.storage.list_transfers(customer_id).await?;
        Ok(Outcome::Success(transfers))
    }
}
