//! Transfer Service - orchestration layer for the customer transfer
//! pipeline
//!
//! The async half of the system:
//! - Collaborator traits for the document store and message queue
//! - The ordered guard chain (existence, read-only, interaction)
//! - The record service driving validate -> guard -> persist -> notify
//! - Notification dispatch with subscription deduplication
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use transfer_service::{QueueConfig, TransferService};
//!
//! # async fn example(
//! #     storage: Arc<dyn transfer_service::StorageProvider>,
//! #     queue: Arc<dyn transfer_service::QueueClient>,
//! # ) {
//! let service = TransferService::new(storage, queue, QueueConfig::default());
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod guards;
pub mod notify;
pub mod service;
pub mod storage;

// Re-exports for convenience
pub use config::QueueConfig;
pub use error::{Outcome, QueueError, ServiceError, StorageError};
pub use guards::{GuardChain, GuardOutcome};
pub use notify::NotificationDispatcher;
pub use service::TransferService;
pub use storage::{QueueClient, StorageProvider};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
