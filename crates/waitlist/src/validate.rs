//! Client-side validation of a waitlist draft.
//!
//! Rules run in a fixed order and the first failing rule wins, so the form
//! only ever shows one message. Validation is pure and is re-run on every
//! submission attempt.

use std::sync::LazyLock;

use regex::Regex;

use crate::draft::SubmissionDraft;

/// Shown when the name is empty or whitespace.
pub const NAME_REQUIRED: &str = "Please enter your name.";

/// Shown when the email doesn't have a `local@domain.tld` shape.
pub const EMAIL_INVALID: &str = "Please enter a valid email.";

/// Shown when the pain point is empty or whitespace.
pub const PAIN_REQUIRED: &str = "Tell us your biggest admin headache.";

/// Minimal `local@domain.tld` shape. Not RFC 5322.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"));

/// Outcome of validating a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Every rule passed.
    Valid,
    /// A rule failed; carries the message to show inline.
    Invalid(&'static str),
}

impl ValidationResult {
    /// Check if the draft passed validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The inline message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Valid => None,
            Self::Invalid(message) => Some(*message),
        }
    }
}

/// Check whether an email has the minimal `local@domain.tld` shape.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Validate a draft.
#[must_use]
pub fn validate(draft: &SubmissionDraft) -> ValidationResult {
    if draft.name.trim().is_empty() {
        return ValidationResult::Invalid(NAME_REQUIRED);
    }
    if !is_valid_email(&draft.email) {
        return ValidationResult::Invalid(EMAIL_INVALID);
    }
    if draft.pain.trim().is_empty() {
        return ValidationResult::Invalid(PAIN_REQUIRED);
    }
    ValidationResult::Valid
}
