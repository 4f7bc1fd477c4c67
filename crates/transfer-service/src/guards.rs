//! Guard chain: existence and authorization checks
//!
//! Sequential checks against the storage collaborator, short-circuiting
//! on the first failure. Order is fixed: customer existence, then
//! customer read-only status, then interaction ownership - a check never
//! runs unless every earlier one passed.

use crate::error::StorageError;
use crate::storage::StorageProvider;
use std::sync::Arc;
use transfer_core::{CustomerId, InteractionId};

/// Result of running the guard chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Every check passed
    Passed,
    /// Customer does not exist (dependency missing)
    CustomerMissing,
    /// Customer has a termination date (forbidden)
    CustomerReadOnly,
    /// Interaction does not exist or belongs to another customer
    /// (dependency missing)
    InteractionMissing,
}

/// The ordered guard chain over the storage collaborator
#[derive(Clone)]
pub struct GuardChain {
    storage: Arc<dyn StorageProvider>,
}

impl GuardChain {
    /// Create new guard chain
    #[must_use]
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self { storage }
    }

    /// Run the full write-path chain: existence, read-only, interaction
    pub async fn check_write(
        &self,
        customer_id: CustomerId,
        interaction_id: InteractionId,
    ) -> Result<GuardOutcome, StorageError> {
        if !self.storage.customer_exists(customer_id).await? {
            tracing::debug!("guard chain: customer {} does not exist", customer_id);
            return Ok(GuardOutcome::CustomerMissing);
        }

        if self.storage.customer_is_read_only(customer_id).await? {
            tracing::debug!("guard chain: customer {} is read-only", customer_id);
            return Ok(GuardOutcome::CustomerReadOnly);
        }

        self.check_interaction(customer_id, interaction_id).await
    }

    /// Run the read-path chain: existence and interaction only
    ///
    /// Reads are always permitted on read-only customers, so the
    /// termination-date check is skipped.
    pub async fn check_read(
        &self,
        customer_id: CustomerId,
        interaction_id: InteractionId,
    ) -> Result<GuardOutcome, StorageError> {
        if !self.storage.customer_exists(customer_id).await? {
            tracing::debug!("guard chain: customer {} does not exist", customer_id);
            return Ok(GuardOutcome::CustomerMissing);
        }

        self.check_interaction(customer_id, interaction_id).await
    }

    async fn check_interaction(
        &self,
        customer_id: CustomerId,
        interaction_id: InteractionId,
    ) -> Result<GuardOutcome, StorageError> {
        if !self
            .storage
            .interaction_exists_for_customer(interaction_id, customer_id)
            .await?
        {
            tracing::debug!(
                "guard chain: interaction {} does not belong to customer {}",
                interaction_id,
                customer_id
            );
            return Ok(GuardOutcome::InteractionMissing);
        }

        Ok(GuardOutcome::Passed)
    }
}
