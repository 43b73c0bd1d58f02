//! The in-progress set of form values.

use serde::{Deserialize, Serialize};

/// One of the three waitlist form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// The person's name.
    Name,
    /// Their work email.
    Email,
    /// Their biggest admin headache.
    Pain,
}

impl Field {
    /// All fields, in form order.
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Pain];

    /// The form key used on the wire and in the fallback log.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Pain => "pain",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A not-yet-delivered set of waitlist form values.
///
/// Owned by the active form session. Reset to empty strings once the
/// submission has been accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionDraft {
    /// The person's name.
    pub name: String,
    /// Their work email.
    pub email: String,
    /// Their biggest admin headache.
    pub pain: String,
}

impl SubmissionDraft {
    /// Create a draft from the three field values.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, pain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            pain: pain.into(),
        }
    }

    /// Get the value of one field.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Pain => &self.pain,
        }
    }

    /// Replace the value of one field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Pain => self.pain = value,
        }
    }

    /// Iterate over `(key, value)` pairs in form order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        Field::ALL.into_iter().map(|f| (f.key(), self.get(f)))
    }

    /// Clear every field.
    pub fn reset(&mut self) {
        self.name.clear();
        self.email.clear();
        self.pain.clear();
    }

    /// Check if every field is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.pain.is_empty()
    }

    /// The part of the email after `@`, for log lines.
    #[must_use]
    pub fn email_domain(&self) -> &str {
        self.email
            .rsplit_once('@')
            .map_or("", |(_, domain)| domain)
    }
}
