//! Collaborator interfaces consumed by the pipeline
//!
//! The narrow seams to the document store and the message queue. One
//! trait per collaborator; the transport/hosting layer supplies the real
//! implementations, tests supply mocks or the in-memory fakes.

use crate::error::{QueueError, StorageError};
use async_trait::async_trait;
use transfer_core::{
    CustomerId, InteractionId, NotificationPayload, Subscription, Transfer, TransferId,
};

/// Document-store collaborator
///
/// `create_transfer`/`update_transfer` return the stored record when the
/// store acknowledged the write and `None` when it reported a
/// non-success status; transport-level faults are `Err`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Does the customer resource exist?
    async fn customer_exists(&self, customer_id: CustomerId) -> Result<bool, StorageError>;

    /// Does the customer have a termination date (read-only)?
    async fn customer_is_read_only(&self, customer_id: CustomerId) -> Result<bool, StorageError>;

    /// Does the interaction exist and belong to the customer?
    async fn interaction_exists_for_customer(
        &self,
        interaction_id: InteractionId,
        customer_id: CustomerId,
    ) -> Result<bool, StorageError>;

    /// Fetch a single transfer for a customer
    async fn get_transfer(
        &self,
        customer_id: CustomerId,
        transfer_id: TransferId,
    ) -> Result<Option<Transfer>, StorageError>;

    /// Fetch all transfers for a customer
    async fn list_transfers(&self, customer_id: CustomerId) -> Result<Vec<Transfer>, StorageError>;

    /// Persist a new transfer
    async fn create_transfer(&self, transfer: Transfer)
        -> Result<Option<Transfer>, StorageError>;

    /// Persist an updated transfer
    async fn update_transfer(&self, transfer: Transfer)
        -> Result<Option<Transfer>, StorageError>;

    /// Fetch all subscriptions for a customer
    async fn get_subscriptions(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Subscription>, StorageError>;

    /// Persist a new subscription; `true` when the store acknowledged it
    async fn create_subscription(&self, subscription: Subscription)
        -> Result<bool, StorageError>;
}

/// Message-queue collaborator (at-least-once delivery assumed)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Submit a notification message
    async fn send(&self, message: NotificationPayload) -> Result<(), QueueError>;
}
