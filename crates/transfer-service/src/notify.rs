//! Notification dispatch with subscription deduplication
//!
//! Builds the outbound message for a created or modified transfer,
//! ensures a routing subscription exists for the (customer, target
//! touchpoint) pair, and hands the message to the queue collaborator.
//!
//! The subscription step is the dedup point: at most one active entry
//! per pair, ever. The queue send itself has no dedup - if the record
//! service retries, duplicate notifications can reach the queue. Known
//! limitation.

use crate::config::QueueConfig;
use crate::error::ServiceError;
use crate::storage::{QueueClient, StorageProvider};
use chrono::Utc;
use std::sync::Arc;
use transfer_core::{NotificationPayload, Subscription, Transfer};

/// Notification dispatcher over the storage and queue collaborators
#[derive(Clone)]
pub struct NotificationDispatcher {
    storage: Arc<dyn StorageProvider>,
    queue: Arc<dyn QueueClient>,
    config: QueueConfig,
}

impl NotificationDispatcher {
    /// Create new dispatcher
    #[must_use]
    pub fn new(
        storage: Arc<dyn StorageProvider>,
        queue: Arc<dyn QueueClient>,
        config: QueueConfig,
    ) -> Self {
        Self {
            storage,
            queue,
            config,
        }
    }

    /// Dispatch a "record created" notification
    ///
    /// The resource URL points at the new record:
    /// `{request_url}/{transfer_id}`.
    pub async fn notify_created(
        &self,
        transfer: &Transfer,
        request_url: &str,
    ) -> Result<(), ServiceError> {
        let now = Utc::now();
        let payload = NotificationPayload {
            title_message: format!(
                "New Transfer record {} added at {}",
                transfer.customer_id, now
            ),
            customer_guid: transfer.customer_id,
            last_modified_date: transfer.last_modified_date,
            url: format!("{}/{}", request_url, transfer.transfer_id),
            is_new_customer: false,
            touchpoint_id: transfer.last_modified_touchpoint_id.clone(),
        };

        self.dispatch(transfer, payload).await
    }

    /// Dispatch a "record modified" notification
    pub async fn notify_modified(
        &self,
        transfer: &Transfer,
        request_url: &str,
    ) -> Result<(), ServiceError> {
        let now = Utc::now();
        let payload = NotificationPayload {
            title_message: format!(
                "Transfer record modification for {} at {}",
                transfer.customer_id, now
            ),
            customer_guid: transfer.customer_id,
            last_modified_date: transfer.last_modified_date,
            url: request_url.to_string(),
            is_new_customer: false,
            touchpoint_id: transfer.last_modified_touchpoint_id.clone(),
        };

        self.dispatch(transfer, payload).await
    }

    async fn dispatch(
        &self,
        transfer: &Transfer,
        payload: NotificationPayload,
    ) -> Result<(), ServiceError> {
        self.ensure_subscription(transfer).await?;

        tracing::info!(
            "sending notification for transfer {} to queue {}",
            transfer.transfer_id,
            self.config.queue_name
        );
        self.queue.send(payload).await?;

        Ok(())
    }

    /// Create the routing subscription for the transfer's (customer,
    /// target touchpoint) pair unless an active one already exists
    async fn ensure_subscription(&self, transfer: &Transfer) -> Result<(), ServiceError> {
        let Some(subscription) = Subscription::for_transfer(transfer, Utc::now()) else {
            return Ok(());
        };

        let existing = self.storage.get_subscriptions(transfer.customer_id).await?;
        let already_subscribed = existing.iter().any(|s| {
            s.customer_id == subscription.customer_id
                && s.touch_point_id == subscription.touch_point_id
                && s.subscribe
        });

        if !already_subscribed {
            tracing::debug!(
                "creating subscription for customer {} and touchpoint {}",
                subscription.customer_id,
                subscription.touch_point_id
            );
            self.storage.create_subscription(subscription).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MockQueueClient, MockStorageProvider};
    use transfer_core::{CustomerId, InteractionId, SubscriptionId, TouchpointId, TransferPatch};

    fn sample_transfer() -> Transfer {
        Transfer::create(
            CustomerId::new(),
            InteractionId::new(),
            TouchpointId::parse("0000000001").unwrap(),
            TransferPatch {
                target_touchpoint_id: Some("0000000002".to_string()),
                context: Some("Needs a callback".to_string()),
                ..TransferPatch::default()
            },
            Utc::now(),
        )
    }

    fn matching_subscription(transfer: &Transfer) -> Subscription {
        Subscription {
            subscription_id: SubscriptionId::new(),
            customer_id: transfer.customer_id,
            touch_point_id: "0000000002".to_string(),
            subscribe: true,
            last_modified_date: None,
        }
    }

    #[tokio::test]
    async fn creates_subscription_when_none_matches() {
        let transfer = sample_transfer();

        let mut storage = MockStorageProvider::new();
        storage
            .expect_get_subscriptions()
            .times(1)
            .returning(|_| Ok(vec![]));
        storage
            .expect_create_subscription()
            .times(1)
            .returning(|_| Ok(true));

        let mut queue = MockQueueClient::new();
        queue.expect_send().times(1).returning(|_| Ok(()));

        let dispatcher = NotificationDispatcher::new(
            Arc::new(storage),
            Arc::new(queue),
            QueueConfig::default(),
        );
        dispatcher
            .notify_created(&transfer, "http://api/transfers")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn does_not_duplicate_existing_subscription() {
        let transfer = sample_transfer();
        let existing = matching_subscription(&transfer);

        let mut storage = MockStorageProvider::new();
        storage
            .expect_get_subscriptions()
            .times(1)
            .returning(move |_| Ok(vec![existing.clone()]));
        storage.expect_create_subscription().times(0);

        let mut queue = MockQueueClient::new();
        queue.expect_send().times(1).returning(|_| Ok(()));

        let dispatcher = NotificationDispatcher::new(
            Arc::new(storage),
            Arc::new(queue),
            QueueConfig::default(),
        );
        dispatcher
            .notify_modified(&transfer, "http://api/transfers/1")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn inactive_subscription_does_not_count_as_existing() {
        let transfer = sample_transfer();
        let mut inactive = matching_subscription(&transfer);
        inactive.subscribe = false;

        let mut storage = MockStorageProvider::new();
        storage
            .expect_get_subscriptions()
            .returning(move |_| Ok(vec![inactive.clone()]));
        storage
            .expect_create_subscription()
            .times(1)
            .returning(|_| Ok(true));

        let mut queue = MockQueueClient::new();
        queue.expect_send().returning(|_| Ok(()));

        let dispatcher = NotificationDispatcher::new(
            Arc::new(storage),
            Arc::new(queue),
            QueueConfig::default(),
        );
        dispatcher
            .notify_created(&transfer, "http://api/transfers")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn missing_target_skips_subscription_but_still_sends() {
        let transfer = Transfer::create(
            CustomerId::new(),
            InteractionId::new(),
            TouchpointId::parse("0000000001").unwrap(),
            TransferPatch::default(),
            Utc::now(),
        );

        let mut storage = MockStorageProvider::new();
        storage.expect_get_subscriptions().times(0);
        storage.expect_create_subscription().times(0);

        let mut queue = MockQueueClient::new();
        queue.expect_send().times(1).returning(|_| Ok(()));

        let dispatcher = NotificationDispatcher::new(
            Arc::new(storage),
            Arc::new(queue),
            QueueConfig::default(),
        );
        dispatcher
            .notify_created(&transfer, "http://api/transfers")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn created_url_carries_transfer_id() {
        let transfer = sample_transfer();
        let expected_suffix = format!("/{}", transfer.transfer_id);

        let mut storage = MockStorageProvider::new();
        storage.expect_get_subscriptions().returning(|_| Ok(vec![]));
        storage
            .expect_create_subscription()
            .returning(|_| Ok(true));

        let mut queue = MockQueueClient::new();
        queue
            .expect_send()
            .times(1)
            .withf(move |payload| payload.url.ends_with(&expected_suffix))
            .returning(|_| Ok(()));

        let dispatcher = NotificationDispatcher::new(
            Arc::new(storage),
            Arc::new(queue),
            QueueConfig::default(),
        );
        dispatcher
            .notify_created(&transfer, "http://api/transfers")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn queue_fault_surfaces_as_service_error() {
        let transfer = sample_transfer();

        let mut storage = MockStorageProvider::new();
        storage.expect_get_subscriptions().returning(|_| Ok(vec![]));
        storage
            .expect_create_subscription()
            .returning(|_| Ok(true));

        let mut queue = MockQueueClient::new();
        queue
            .expect_send()
            .returning(|_| Err(crate::error::QueueError::Send("broker down".to_string())));

        let dispatcher = NotificationDispatcher::new(
            Arc::new(storage),
            Arc::new(queue),
            QueueConfig::default(),
        );
        let result = dispatcher
            .notify_created(&transfer, "http://api/transfers")
            .await;
        assert!(matches!(result, Err(ServiceError::Queue(_))));
    }
}
