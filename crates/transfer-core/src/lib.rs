//! Transfer Core - domain layer for the customer transfer pipeline
//!
//! The pure half of the system:
//! - Record types and identity newtypes
//! - Field/business-rule validation (create vs. patch modes)
//! - The partial-update merge engine
//! - Payload parsing for inbound candidates
//!
//! No I/O lives here; everything is deterministic given a fixed clock.
//!
//! # Example
//!
//! ```rust
//! use transfer_core::{TransferPatch, ValidationMode, Validator};
//!
//! let candidate = TransferPatch {
//!     target_touchpoint_id: Some("0000000002".to_string()),
//!     context: Some("Customer asked for a callback".to_string()),
//!     ..TransferPatch::default()
//! };
//!
//! let failures = Validator::new().validate(&candidate, ValidationMode::Create);
//! assert!(failures.is_empty());
//! ```

#![warn(unreachable_pub)]

pub mod patch;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use patch::merge;
pub use types::{
    parse_payload, CustomerId, InteractionId, NotificationPayload, PayloadError, Subscription,
    SubscriptionId, TouchpointId, TouchpointIdError, Transfer, TransferId, TransferPatch,
};
pub use validation::{
    TransferFields, ValidationFailure, ValidationMode, Validator, MAX_CONTEXT_LEN,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
