//! Error taxonomy and caller-visible outcomes
//!
//! Everything the pipeline can report splits two ways:
//! - [`Outcome`]: the expected terminal states of a request (rejected,
//!   dependency missing, forbidden, write failed, success), recovered at
//!   the record-service boundary and never raised as errors.
//! - [`ServiceError`]: genuine collaborator faults that propagate to the
//!   transport layer.

use transfer_core::{CustomerId, ValidationFailure};

/// Faults from the document-store collaborator
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Store could not be reached
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    /// Store reached but the request itself failed
    #[error("document store request failed: {0}")]
    Request(String),
}

/// Faults from the message-queue collaborator
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// Message could not be handed to the queue
    #[error("queue send failed: {0}")]
    Send(String),
}

/// Faults that escape the pipeline to the transport layer
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Storage collaborator fault
    #[error("storage fault: {0}")]
    Storage(#[from] StorageError),

    /// Queue collaborator fault
    #[error("queue fault: {0}")]
    Queue(#[from] QueueError),
}

/// Terminal state of a pipeline request
///
/// `DependencyMissing` deliberately collapses "referenced customer or
/// interaction does not exist", "record not found" and "nothing to show"
/// into one soft outcome - a compatibility constraint, kept even though
/// callers cannot tell an invalid reference from an empty result.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Operation completed; carries the stored record(s)
    Success(T),
    /// Validation failed; carries every individual failure
    Rejected(Vec<ValidationFailure>),
    /// Referenced customer/interaction/record is not there
    DependencyMissing,
    /// Customer is read-only
    Forbidden {
        /// The read-only customer
        customer_id: CustomerId,
    },
    /// Storage did not confirm the write; the caller may retry
    WriteFailed,
}

impl<T> Outcome<T> {
    /// Whether this is a success outcome
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Extract the success value, if any
    #[inline]
    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }
}
