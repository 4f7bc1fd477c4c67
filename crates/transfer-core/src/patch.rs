//! Patch merge engine
//!
//! Applies a partial update onto an existing record using field-presence
//! semantics: a field present in the patch overwrites, an absent field is
//! left untouched. Pure and total - the only failure mode (a missing
//! patch body) is handled upstream, before merge is invoked.

use crate::types::{TouchpointId, Transfer, TransferPatch};
use chrono::{DateTime, Utc};

/// Merge a patch onto an existing transfer
///
/// Takes the existing record by value and returns the updated copy; the
/// stored record is untouched until the caller persists the result.
///
/// `last_modified_touchpoint_id` is always set to the caller identity,
/// and `last_modified_date` defaults to `now` when the patch does not
/// carry one. For string fields, presence means non-empty: an empty
/// string in the patch cannot null out a previously set value.
#[must_use]
pub fn merge(
    existing: Transfer,
    patch: &TransferPatch,
    caller: &TouchpointId,
    now: DateTime<Utc>,
) -> Transfer {
    let mut updated = existing;

    updated.last_modified_touchpoint_id = caller.clone();
    updated.last_modified_date = Some(patch.last_modified_date.unwrap_or(now));

    if let Some(target) = patch.target_touchpoint_id.as_ref().filter(|v| !v.is_empty()) {
        updated.target_touchpoint_id = Some(target.clone());
    }

    if let Some(context) = patch.context.as_ref().filter(|v| !v.is_empty()) {
        updated.context = Some(context.clone());
    }

    if let Some(value) = patch.date_and_time_of_transfer {
        updated.date_and_time_of_transfer = Some(value);
    }

    if let Some(value) = patch.date_and_time_of_transfer_accepted {
        updated.date_and_time_of_transfer_accepted = Some(value);
    }

    if let Some(value) = patch.requested_callback_time {
        updated.requested_callback_time = Some(value);
    }

    if let Some(value) = patch.actual_callback_time {
        updated.actual_callback_time = Some(value);
    }

    updated
}
