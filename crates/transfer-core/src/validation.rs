//! Field and business-rule validation for transfer candidates
//!
//! Pure validation engine: given a candidate (full record or patch
//! projection) and a mode, produces the complete list of failures. No
//! I/O, deterministic for a fixed `now`.

use crate::types::{Transfer, TransferPatch};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum length of the free-text context field
pub const MAX_CONTEXT_LEN: usize = 2000;

static TARGET_TOUCHPOINT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("target touchpoint pattern compiles"));

// First character must be a letter; the rest is letters, digits,
// whitespace and a small punctuation set.
static CONTEXT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9\s.'\-,/]*$").expect("context pattern compiles"));

/// Whether the candidate is a full create payload or a partial patch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Full record: mandatory fields must be present
    Create,
    /// Partial update: every field optional
    Patch,
}

/// A single field-level or business-rule violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Name of the offending field, in wire casing
    pub field: String,
    /// Human-readable description of the violation
    pub message: String,
}

impl ValidationFailure {
    /// Create new failure for a field
    #[inline]
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Read access to the validated fields, shared by the full record and the
/// patch projection
pub trait TransferFields {
    /// Target touchpoint, if supplied
    fn target_touchpoint_id(&self) -> Option<&str>;
    /// Context text, if supplied
    fn context(&self) -> Option<&str>;
    /// Transfer time, if supplied
    fn date_and_time_of_transfer(&self) -> Option<DateTime<Utc>>;
    /// Acceptance time, if supplied
    fn date_and_time_of_transfer_accepted(&self) -> Option<DateTime<Utc>>;
    /// Requested callback time, if supplied
    fn requested_callback_time(&self) -> Option<DateTime<Utc>>;
    /// Actual callback time, if supplied
    fn actual_callback_time(&self) -> Option<DateTime<Utc>>;
    /// Last-modified timestamp, if supplied
    fn last_modified_date(&self) -> Option<DateTime<Utc>>;
}

impl TransferFields for Transfer {
    fn target_touchpoint_id(&self) -> Option<&str> {
        self.target_touchpoint_id.as_deref()
    }

    fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    fn date_and_time_of_transfer(&self) -> Option<DateTime<Utc>> {
        self.date_and_time_of_transfer
    }

    fn date_and_time_of_transfer_accepted(&self) -> Option<DateTime<Utc>> {
        self.date_and_time_of_transfer_accepted
    }

    fn requested_callback_time(&self) -> Option<DateTime<Utc>> {
        self.requested_callback_time
    }

    fn actual_callback_time(&self) -> Option<DateTime<Utc>> {
        self.actual_callback_time
    }

    fn last_modified_date(&self) -> Option<DateTime<Utc>> {
        self.last_modified_date
    }
}

impl TransferFields for TransferPatch {
    fn target_touchpoint_id(&self) -> Option<&str> {
        self.target_touchpoint_id.as_deref()
    }

    fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    fn date_and_time_of_transfer(&self) -> Option<DateTime<Utc>> {
        self.date_and_time_of_transfer
    }

    fn date_and_time_of_transfer_accepted(&self) -> Option<DateTime<Utc>> {
        self.date_and_time_of_transfer_accepted
    }

    fn requested_callback_time(&self) -> Option<DateTime<Utc>> {
        self.requested_callback_time
    }

    fn actual_callback_time(&self) -> Option<DateTime<Utc>> {
        self.actual_callback_time
    }

    fn last_modified_date(&self) -> Option<DateTime<Utc>> {
        self.last_modified_date
    }
}

/// Transfer candidate validator
///
/// Returns an empty list on success, never an error: callers test
/// `is_empty`, and every violation in the candidate is reported, not just
/// the first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// Create new validator instance
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validate a candidate against the current UTC time
    #[must_use]
    pub fn validate(
        &self,
        candidate: &dyn TransferFields,
        mode: ValidationMode,
    ) -> Vec<ValidationFailure> {
        self.validate_at(candidate, mode, Utc::now())
    }

    /// Validate a candidate against an explicit `now`
    ///
    /// Tests freeze the clock through this entry point; the two-argument
    /// form is otherwise equivalent.
    #[must_use]
    pub fn validate_at(
        &self,
        candidate: &dyn TransferFields,
        mode: ValidationMode,
        now: DateTime<Utc>,
    ) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        if mode == ValidationMode::Create {
            Self::check_mandatory(candidate, &mut failures);
        }

        Self::check_target_touchpoint(candidate, &mut failures);
        Self::check_context(candidate, &mut failures);
        Self::check_dates(candidate, now, &mut failures);

        failures
    }

    fn check_mandatory(candidate: &dyn TransferFields, failures: &mut Vec<ValidationFailure>) {
        if candidate
            .context()
            .map_or(true, |value| value.trim().is_empty())
        {
            failures.push(ValidationFailure::new(
                "Context",
                "Context must have a value",
            ));
        }

        if candidate
            .target_touchpoint_id()
            .map_or(true, str::is_empty)
        {
            failures.push(ValidationFailure::new(
                "TargetTouchpointId",
                "Target Touchpoint Id must have a value",
            ));
        }
    }

    fn check_target_touchpoint(
        candidate: &dyn TransferFields,
        failures: &mut Vec<ValidationFailure>,
    ) {
        let Some(target) = candidate.target_touchpoint_id().filter(|v| !v.is_empty()) else {
            return;
        };

        if !TARGET_TOUCHPOINT_PATTERN.is_match(target) {
            failures.push(ValidationFailure::new(
                "TargetTouchpointId",
                "Target Touchpoint Id must be a 10 digit number",
            ));
        }
    }

    fn check_context(candidate: &dyn TransferFields, failures: &mut Vec<ValidationFailure>) {
        let Some(context) = candidate.context().filter(|v| !v.is_empty()) else {
            return;
        };

        if context.chars().count() > MAX_CONTEXT_LEN {
            failures.push(ValidationFailure::new(
                "Context",
                format!("Context must be {MAX_CONTEXT_LEN} characters or fewer"),
            ));
        }

        if !CONTEXT_PATTERN.is_match(context) {
            failures.push(ValidationFailure::new(
                "Context",
                "Context contains invalid characters",
            ));
        }
    }

    fn check_dates(
        candidate: &dyn TransferFields,
        now: DateTime<Utc>,
        failures: &mut Vec<ValidationFailure>,
    ) {
        let checks = [
            (
                "DateAndTimeOfTransfer",
                candidate.date_and_time_of_transfer(),
                "Date and Time Of Transfer must be less than the current date/time",
            ),
            (
                "DateAndTimeOfTransferAccepted",
                candidate.date_and_time_of_transfer_accepted(),
                "Date and Time of Transfer Accepted must be less than the current date/time",
            ),
            (
                "RequestedCallbackTime",
                candidate.requested_callback_time(),
                "Requested Callback Time must be less than the current date/time",
            ),
            (
                "ActualCallbackTime",
                candidate.actual_callback_time(),
                "Actual Callback Time must be less than the current date/time",
            ),
            (
                "LastModifiedDate",
                candidate.last_modified_date(),
                "Last Modified Date must be less than the current date/time",
            ),
        ];

        for (field, value, message) in checks {
            if let Some(value) = value {
                if value > now {
                    failures.push(ValidationFailure::new(field, message));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn frozen_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn valid_candidate() -> TransferPatch {
        TransferPatch {
            target_touchpoint_id: Some("0000000002".to_string()),
            context: Some("Customer asked to speak to an adviser".to_string()),
            ..TransferPatch::default()
        }
    }

    #[test]
    fn valid_create_candidate_passes() {
        let failures =
            Validator::new().validate_at(&valid_candidate(), ValidationMode::Create, frozen_now());
        assert_eq!(failures, vec![]);
    }

    #[test]
    fn empty_patch_passes() {
        let failures = Validator::new().validate_at(
            &TransferPatch::default(),
            ValidationMode::Patch,
            frozen_now(),
        );
        assert!(failures.is_empty());
    }

    #[test]
    fn create_rejects_missing_context() {
        let candidate = TransferPatch {
            context: None,
            ..valid_candidate()
        };

        let failures =
            Validator::new().validate_at(&candidate, ValidationMode::Create, frozen_now());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "Context");
    }

    #[test]
    fn create_rejects_empty_context_with_single_failure() {
        let candidate = TransferPatch {
            context: Some(String::new()),
            ..valid_candidate()
        };

        let failures =
            Validator::new().validate_at(&candidate, ValidationMode::Create, frozen_now());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "Context");
    }

    #[test]
    fn patch_allows_missing_context() {
        let candidate = TransferPatch {
            context: None,
            ..valid_candidate()
        };

        let failures =
            Validator::new().validate_at(&candidate, ValidationMode::Patch, frozen_now());
        assert!(failures.is_empty());
    }

    #[test]
    fn create_rejects_missing_target_touchpoint() {
        let candidate = TransferPatch {
            target_touchpoint_id: None,
            ..valid_candidate()
        };

        let failures =
            Validator::new().validate_at(&candidate, ValidationMode::Create, frozen_now());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "TargetTouchpointId");
    }

    #[test]
    fn non_numeric_target_rejected_in_both_modes() {
        let candidate = TransferPatch {
            target_touchpoint_id: Some("000000000A".to_string()),
            ..valid_candidate()
        };

        for mode in [ValidationMode::Create, ValidationMode::Patch] {
            let failures = Validator::new().validate_at(&candidate, mode, frozen_now());
            assert_eq!(failures.len(), 1, "mode {mode:?}");
            assert_eq!(failures[0].field, "TargetTouchpointId");
        }
    }

    #[test]
    fn short_target_rejected() {
        let candidate = TransferPatch {
            target_touchpoint_id: Some("12345".to_string()),
            ..valid_candidate()
        };

        let failures =
            Validator::new().validate_at(&candidate, ValidationMode::Patch, frozen_now());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "TargetTouchpointId");
    }

    #[test]
    fn context_must_start_with_letter() {
        let candidate = TransferPatch {
            context: Some("1 customer needs help".to_string()),
            ..valid_candidate()
        };

        let failures =
            Validator::new().validate_at(&candidate, ValidationMode::Patch, frozen_now());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "Context");
    }

    #[test]
    fn context_allows_punctuation_set() {
        let candidate = TransferPatch {
            context: Some("Caller's notes, ref 12/34 - follow-up.".to_string()),
            ..valid_candidate()
        };

        let failures =
            Validator::new().validate_at(&candidate, ValidationMode::Patch, frozen_now());
        assert!(failures.is_empty());
    }

    #[test]
    fn context_rejects_disallowed_characters() {
        let candidate = TransferPatch {
            context: Some("Contains <markup>".to_string()),
            ..valid_candidate()
        };

        let failures =
            Validator::new().validate_at(&candidate, ValidationMode::Patch, frozen_now());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "Context");
    }

    #[test]
    fn context_over_max_length_rejected() {
        let candidate = TransferPatch {
            context: Some(format!("A{}", "a".repeat(MAX_CONTEXT_LEN))),
            ..valid_candidate()
        };

        let failures =
            Validator::new().validate_at(&candidate, ValidationMode::Patch, frozen_now());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "Context");
    }

    #[test]
    fn context_at_max_length_passes() {
        let candidate = TransferPatch {
            context: Some(format!("A{}", "a".repeat(MAX_CONTEXT_LEN - 1))),
            ..valid_candidate()
        };

        let failures =
            Validator::new().validate_at(&candidate, ValidationMode::Patch, frozen_now());
        assert!(failures.is_empty());
    }

    #[test]
    fn future_dated_timestamps_each_rejected() {
        let now = frozen_now();
        let future = now + Duration::hours(1);

        let cases: Vec<(&str, TransferPatch)> = vec![
            (
                "DateAndTimeOfTransfer",
                TransferPatch {
                    date_and_time_of_transfer: Some(future),
                    ..valid_candidate()
                },
            ),
            (
                "DateAndTimeOfTransferAccepted",
                TransferPatch {
                    date_and_time_of_transfer_accepted: Some(future),
                    ..valid_candidate()
                },
            ),
            (
                "RequestedCallbackTime",
                TransferPatch {
                    requested_callback_time: Some(future),
                    ..valid_candidate()
                },
            ),
            (
                "ActualCallbackTime",
                TransferPatch {
                    actual_callback_time: Some(future),
                    ..valid_candidate()
                },
            ),
            (
                "LastModifiedDate",
                TransferPatch {
                    last_modified_date: Some(future),
                    ..valid_candidate()
                },
            ),
        ];

        for (field, candidate) in cases {
            let failures = Validator::new().validate_at(&candidate, ValidationMode::Patch, now);
            assert_eq!(failures.len(), 1, "field {field}");
            assert_eq!(failures[0].field, field);
        }
    }

    #[test]
    fn timestamp_equal_to_now_passes() {
        let now = frozen_now();
        let candidate = TransferPatch {
            date_and_time_of_transfer: Some(now),
            ..valid_candidate()
        };

        let failures = Validator::new().validate_at(&candidate, ValidationMode::Patch, now);
        assert!(failures.is_empty());
    }

    #[test]
    fn all_failures_reported_together() {
        let now = frozen_now();
        let candidate = TransferPatch {
            target_touchpoint_id: Some("bad".to_string()),
            context: Some("<bad>".to_string()),
            actual_callback_time: Some(now + Duration::days(1)),
            ..TransferPatch::default()
        };

        let failures = Validator::new().validate_at(&candidate, ValidationMode::Patch, now);
        assert_eq!(failures.len(), 3);
    }

    #[test]
    fn full_record_validates_through_same_rules() {
        let now = frozen_now();
        let transfer = Transfer::create(
            crate::types::CustomerId::new(),
            crate::types::InteractionId::new(),
            crate::types::TouchpointId::parse("0000000001").unwrap(),
            valid_candidate(),
            now,
        );

        let failures = Validator::new().validate_at(&transfer, ValidationMode::Create, now);
        assert!(failures.is_empty());
    }
}
