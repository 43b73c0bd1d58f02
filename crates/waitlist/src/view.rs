//! Rendering of the waitlist form section.

use std::fmt;

use crate::draft::{Field, SubmissionDraft};
use crate::form::SubmissionViewState;

const SUBMIT_LABEL: &str = "Request Early Access";
const BUSY_LABEL: &str = "Submitting…";
const CONSENT_NOTE: &str = "By submitting, you agree to be contacted about the beta.";
const CONFIRMATION_TITLE: &str = "You’re on the list 🎉";
const CONFIRMATION_BODY: &str =
    "We’ll reach out as soon as slots open up. Keep an eye on your inbox.";

/// Label shown above a field.
#[must_use]
pub fn field_label(field: Field) -> &'static str {
    match field {
        Field::Name => "Name",
        Field::Email => "Work Email",
        Field::Pain => "What’s your biggest admin headache?",
    }
}

/// Placeholder shown in an empty field.
#[must_use]
pub fn field_placeholder(field: Field) -> &'static str {
    match field {
        Field::Name => "Alex Rivera",
        Field::Email => "alex@agency.co",
        Field::Pain => "Tell us what wastes the most time",
    }
}

/// One rendered input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    /// Which field this is.
    pub field: Field,
    /// Label text.
    pub label: &'static str,
    /// Placeholder text.
    pub placeholder: &'static str,
    /// Current value.
    pub value: String,
}

/// The submit button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitButton {
    /// Button text.
    pub label: &'static str,
    /// Whether the button accepts presses.
    pub disabled: bool,
}

/// What the form section shows for a given state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormView {
    /// The input fields, any inline error and the submit button.
    Fields {
        /// Inputs in form order.
        fields: Vec<FieldView>,
        /// Inline error from the last attempt.
        error: Option<String>,
        /// Submit button.
        button: SubmitButton,
        /// Consent note under the button.
        note: &'static str,
    },
    /// Shown instead of the fields once submitted.
    Confirmation {
        /// Headline.
        title: &'static str,
        /// Follow-up text.
        body: &'static str,
    },
}

impl FormView {
    /// Render a state and its draft.
    #[must_use]
    pub fn render(state: &SubmissionViewState, draft: &SubmissionDraft) -> Self {
        if *state == SubmissionViewState::Submitted {
            return Self::Confirmation {
                title: CONFIRMATION_TITLE,
                body: CONFIRMATION_BODY,
            };
        }

        let submitting = *state == SubmissionViewState::Submitting;
        Self::Fields {
            fields: Field::ALL
                .into_iter()
                .map(|field| FieldView {
                    field,
                    label: field_label(field),
                    placeholder: field_placeholder(field),
                    value: draft.get(field).to_string(),
                })
                .collect(),
            error: state.error().map(str::to_string),
            button: SubmitButton {
                label: if submitting { BUSY_LABEL } else { SUBMIT_LABEL },
                disabled: submitting,
            },
            note: CONSENT_NOTE,
        }
    }

    /// The submit button, unless the confirmation is showing.
    #[must_use]
    pub fn button(&self) -> Option<SubmitButton> {
        match self {
            Self::Fields { button, .. } => Some(*button),
            Self::Confirmation { .. } => None,
        }
    }
}

impl fmt::Display for FormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmation { title, body } => {
                writeln!(f, "{title}")?;
                writeln!(f, "{body}")
            }
            Self::Fields {
                fields,
                error,
                button,
                note,
            } => {
                for field in fields {
                    let shown = if field.value.is_empty() {
                        format!("({})", field.placeholder)
                    } else {
                        field.value.clone()
                    };
                    writeln!(f, "{}: {shown}", field.label)?;
                }
                if let Some(error) = error {
                    writeln!(f, "! {error}")?;
                }
                let state = if button.disabled { " (disabled)" } else { "" };
                writeln!(f, "[ {} ]{state}", button.label)?;
                writeln!(f, "{note}")
            }
        }
    }
}
