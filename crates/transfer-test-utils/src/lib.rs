//! Testing utilities for the transfer workspace
//!
//! Shared fakes and fixtures: an in-memory storage provider, a recording
//! queue client, and sample payloads.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use transfer_core::{
    CustomerId, InteractionId, NotificationPayload, Subscription, SubscriptionId, TouchpointId,
    Transfer, TransferId, TransferPatch,
};
use transfer_service::{QueueClient, QueueError, StorageError, StorageProvider};

/// In-memory storage provider backed by concurrent maps
///
/// `fail_writes` flips create/update into the "store did not confirm"
/// path without raising a transport fault.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    customers: DashMap<CustomerId, bool>,
    interactions: DashMap<InteractionId, CustomerId>,
    transfers: DashMap<TransferId, Transfer>,
    subscriptions: DashMap<SubscriptionId, Subscription>,
    fail_writes: AtomicBool,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_customer(&self, customer_id: CustomerId, read_only: bool) {
        self.customers.insert(customer_id, read_only);
    }

    pub fn add_interaction(&self, interaction_id: InteractionId, customer_id: CustomerId) {
        self.interactions.insert(interaction_id, customer_id);
    }

    pub fn insert_transfer(&self, transfer: Transfer) {
        self.transfers.insert(transfer.transfer_id, transfer);
    }

    /// Make subsequent writes report an unconfirmed status
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn transfer_count(&self) -> usize {
        self.transfers.len()
    }

    /// Number of stored subscriptions for a (customer, touchpoint) pair
    pub fn subscription_count(&self, customer_id: CustomerId, touch_point_id: &str) -> usize {
        self.subscriptions
            .iter()
            .filter(|entry| {
                entry.customer_id == customer_id && entry.touch_point_id == touch_point_id
            })
            .count()
    }
}

#[async_trait]
impl StorageProvider for InMemoryStorage {
    async fn customer_exists(&self, customer_id: CustomerId) -> Result<bool, StorageError> {
        Ok(self.customers.contains_key(&customer_id))
    }

    async fn customer_is_read_only(&self, customer_id: CustomerId) -> Result<bool, StorageError> {
        Ok(self
            .customers
            .get(&customer_id)
            .map(|entry| *entry)
            .unwrap_or(false))
    }

    async fn interaction_exists_for_customer(
        &self,
        interaction_id: InteractionId,
        customer_id: CustomerId,
    ) -> Result<bool, StorageError> {
        Ok(self
            .interactions
            .get(&interaction_id)
            .map(|entry| *entry == customer_id)
            .unwrap_or(false))
    }

    async fn get_transfer(
        &self,
        customer_id: CustomerId,
        transfer_id: TransferId,
    ) -> Result<Option<Transfer>, StorageError> {
        Ok(self
            .transfers
            .get(&transfer_id)
            .filter(|entry| entry.customer_id == customer_id)
            .map(|entry| entry.value().clone()))
    }

    async fn list_transfers(&self, customer_id: CustomerId) -> Result<Vec<Transfer>, StorageError> {
        Ok(self
            .transfers
            .iter()
            .filter(|entry| entry.customer_id == customer_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn create_transfer(
        &self,
        transfer: Transfer,
    ) -> Result<Option<Transfer>, StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Ok(None);
        }
        self.transfers.insert(transfer.transfer_id, transfer.clone());
        Ok(Some(transfer))
    }

    async fn update_transfer(
        &self,
        transfer: Transfer,
    ) -> Result<Option<Transfer>, StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Ok(None);
        }
        self.transfers.insert(transfer.transfer_id, transfer.clone());
        Ok(Some(transfer))
    }

    async fn get_subscriptions(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Subscription>, StorageError> {
        Ok(self
            .subscriptions
            .iter()
            .filter(|entry| entry.customer_id == customer_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn create_subscription(
        &self,
        subscription: Subscription,
    ) -> Result<bool, StorageError> {
        self.subscriptions
            .insert(subscription.subscription_id, subscription);
        Ok(true)
    }
}

/// Queue client that records every payload it is handed
#[derive(Debug, Default)]
pub struct RecordingQueue {
    sent: Mutex<Vec<NotificationPayload>>,
    fail_sends: AtomicBool,
}

impl RecordingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail with a queue fault
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<NotificationPayload> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl QueueClient for RecordingQueue {
    async fn send(&self, message: NotificationPayload) -> Result<(), QueueError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(QueueError::Send("recording queue set to fail".to_string()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

pub fn touchpoint(value: &str) -> TouchpointId {
    TouchpointId::parse(value).unwrap()
}

pub fn valid_candidate() -> TransferPatch {
    TransferPatch {
        target_touchpoint_id: Some("0000000002".to_string()),
        context: Some("Customer asked to be handed over for advice".to_string()),
        ..TransferPatch::default()
    }
}

/// Seed a live customer and an interaction that belongs to them
pub fn seed_customer_and_interaction(storage: &InMemoryStorage) -> (CustomerId, InteractionId) {
    let customer_id = CustomerId::new();
    let interaction_id = InteractionId::new();
    storage.add_customer(customer_id, false);
    storage.add_interaction(interaction_id, customer_id);
    (customer_id, interaction_id)
}

/// Build a stored transfer for the given customer and interaction
pub fn stored_transfer(customer_id: CustomerId, interaction_id: InteractionId) -> Transfer {
    Transfer::create(
        customer_id,
        interaction_id,
        touchpoint("0000000001"),
        valid_candidate(),
        Utc::now(),
    )
}
