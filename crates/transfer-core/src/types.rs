//! Domain types for the transfer pipeline
//!
//! Defines the fundamental records:
//! - Identity newtypes for transfers, customers and interactions
//! - The caller identity (`TouchpointId`)
//! - The `Transfer` resource and its partial-update projection
//! - Subscription and notification records

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique transfer record identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransferId(pub Uuid);

impl TransferId {
    /// Generate new transfer ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransferId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique customer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub Uuid);

impl CustomerId {
    /// Generate new customer ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CustomerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique interaction identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InteractionId(pub Uuid);

impl InteractionId {
    /// Generate new interaction ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InteractionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InteractionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique subscription identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    /// Generate new subscription ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authenticated caller identity: exactly 10 ASCII digits
///
/// Supplied by the transport layer from the request headers, never taken
/// from the payload body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TouchpointId(String);

impl TouchpointId {
    /// Parse a touchpoint identifier, rejecting anything that is not
    /// exactly 10 ASCII digits
    pub fn parse(value: impl Into<String>) -> Result<Self, TouchpointIdError> {
        let value = value.into();
        if value.len() == 10 && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value))
        } else {
            Err(TouchpointIdError::Invalid(value))
        }
    }

    /// View as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TouchpointId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TouchpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Touchpoint identity parse errors
#[derive(Debug, thiserror::Error)]
pub enum TouchpointIdError {
    /// Value is not a 10-digit numeric string
    #[error("touchpoint id must be exactly 10 digits, got {0:?}")]
    Invalid(String),
}

/// The transfer resource: a customer handoff between two touchpoints
///
/// Identity fields (`transfer_id`, `customer_id`, `interaction_id`,
/// `originating_touchpoint_id`) are assigned exactly once by
/// [`Transfer::create`] and never mutated afterwards. Everything else is
/// mutable through the patch merge engine only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transfer {
    /// Unique identifier of the transfer record
    #[serde(rename = "id")]
    pub transfer_id: TransferId,
    /// Customer being handed off
    pub customer_id: CustomerId,
    /// Interaction this transfer belongs to
    pub interaction_id: InteractionId,
    /// Touchpoint that created the record (caller identity at creation)
    pub originating_touchpoint_id: TouchpointId,
    /// Touchpoint the customer is being handed off to
    pub target_touchpoint_id: Option<String>,
    /// Free-text context of the transfer
    pub context: Option<String>,
    /// When the transfer request was made
    pub date_and_time_of_transfer: Option<DateTime<Utc>>,
    /// When the target touchpoint accepted the request
    pub date_and_time_of_transfer_accepted: Option<DateTime<Utc>>,
    /// When the customer asked to be called back
    pub requested_callback_time: Option<DateTime<Utc>>,
    /// When the customer was actually contacted
    pub actual_callback_time: Option<DateTime<Utc>>,
    /// Last modification timestamp
    pub last_modified_date: Option<DateTime<Utc>>,
    /// Touchpoint that made the last change
    pub last_modified_touchpoint_id: TouchpointId,
}

impl Transfer {
    /// Assemble a new transfer from an inbound candidate payload
    ///
    /// Assigns a fresh `TransferId`, pins the route identifiers and the
    /// caller identity, and applies the creation defaults: an absent
    /// `date_and_time_of_transfer` or `last_modified_date` becomes `now`.
    #[must_use]
    pub fn create(
        customer_id: CustomerId,
        interaction_id: InteractionId,
        caller: TouchpointId,
        candidate: TransferPatch,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            transfer_id: TransferId::new(),
            customer_id,
            interaction_id,
            originating_touchpoint_id: caller.clone(),
            target_touchpoint_id: candidate.target_touchpoint_id,
            context: candidate.context,
            date_and_time_of_transfer: Some(candidate.date_and_time_of_transfer.unwrap_or(now)),
            date_and_time_of_transfer_accepted: candidate.date_and_time_of_transfer_accepted,
            requested_callback_time: candidate.requested_callback_time,
            actual_callback_time: candidate.actual_callback_time,
            last_modified_date: Some(candidate.last_modified_date.unwrap_or(now)),
            last_modified_touchpoint_id: caller,
        }
    }
}

/// Partial-update projection of [`Transfer`]
///
/// Every mutable field, each optional: absence means "leave unchanged",
/// presence means "set to this value". Carries no identity fields, and no
/// `last_modified_touchpoint_id` - that always comes from the caller
/// identity, never from the payload. Create request bodies parse into the
/// same projection; create-mode validation then enforces the mandatory
/// fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TransferPatch {
    /// New target touchpoint, if changing
    pub target_touchpoint_id: Option<String>,
    /// New context, if changing
    pub context: Option<String>,
    /// New transfer time, if changing
    pub date_and_time_of_transfer: Option<DateTime<Utc>>,
    /// New acceptance time, if changing
    pub date_and_time_of_transfer_accepted: Option<DateTime<Utc>>,
    /// New requested callback time, if changing
    pub requested_callback_time: Option<DateTime<Utc>>,
    /// New actual callback time, if changing
    pub actual_callback_time: Option<DateTime<Utc>>,
    /// New last-modified timestamp; defaults to "now" during merge
    pub last_modified_date: Option<DateTime<Utc>>,
}

/// Notification-routing record for a (customer, touchpoint) pair
///
/// Created lazily the first time a notification is dispatched for the
/// pair; at most one record with `subscribe = true` may exist per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Subscription {
    /// Unique identifier of the subscription record
    #[serde(rename = "id")]
    pub subscription_id: SubscriptionId,
    /// Customer the routing entry belongs to
    pub customer_id: CustomerId,
    /// Touchpoint notifications are routed to
    pub touch_point_id: String,
    /// Whether the routing entry is active
    pub subscribe: bool,
    /// Last modification timestamp
    pub last_modified_date: Option<DateTime<Utc>>,
}

impl Subscription {
    /// Build the routing entry for a transfer's (customer, target) pair
    ///
    /// Returns `None` when the transfer has no target touchpoint - there
    /// is nowhere to route to.
    #[must_use]
    pub fn for_transfer(transfer: &Transfer, now: DateTime<Utc>) -> Option<Self> {
        let target = transfer.target_touchpoint_id.clone()?;
        Some(Self {
            subscription_id: SubscriptionId::new(),
            customer_id: transfer.customer_id,
            touch_point_id: target,
            subscribe: true,
            last_modified_date: Some(transfer.last_modified_date.unwrap_or(now)),
        })
    }
}

/// Message handed to the queue collaborator when a transfer is created or
/// modified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotificationPayload {
    /// Human-readable event title
    pub title_message: String,
    /// Customer the event concerns
    pub customer_guid: CustomerId,
    /// Modification timestamp of the record
    pub last_modified_date: Option<DateTime<Utc>>,
    /// Resource URL for the affected record
    #[serde(rename = "URL")]
    pub url: String,
    /// Always false for transfer events
    pub is_new_customer: bool,
    /// Touchpoint that made the change
    pub touchpoint_id: TouchpointId,
}

/// Payload parse errors, distinct from field-level validation failures
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// Body could not be parsed into the candidate type at all
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Body was empty or whitespace
    #[error("empty payload")]
    Empty,
}

/// Parse an inbound request body into a structured candidate
///
/// A failure here is "unprocessable" - the pipeline never starts, and no
/// field-level validation is attempted.
pub fn parse_payload<T: DeserializeOwned>(body: &str) -> Result<T, PayloadError> {
    if body.trim().is_empty() {
        return Err(PayloadError::Empty);
    }
    Ok(serde_json::from_str(body)?)
}
