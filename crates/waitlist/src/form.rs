//! View-state controller for the waitlist form.
//!
//! The form moves through `Idle → Submitting → Submitted | Failed`. A submit
//! from `Failed` starts over; `Submitted` is terminal for the session.
//! Re-entry is gated by an explicit busy flag, so a second submit while one
//! is in flight is ignored instead of sending a duplicate request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::draft::{Field, SubmissionDraft};
use crate::submitter::{SubmissionOutcome, Submitter};
use crate::validate::{validate, ValidationResult};
use crate::view::FormView;

/// What the form is currently showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionViewState {
    /// Waiting for input.
    #[default]
    Idle,
    /// A submission is in flight; the submit button is disabled.
    Submitting,
    /// Accepted; the confirmation replaces the fields.
    Submitted,
    /// The last attempt failed; carries the inline message.
    Failed(String),
}

impl SubmissionViewState {
    /// The inline error message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// What happened to a submit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// The attempt ran to completion and left the form in this state.
    Finished(SubmissionViewState),
    /// Dropped: another submit was in flight, or the form was already submitted.
    Ignored,
}

#[derive(Debug, Default)]
struct FormInner {
    draft: SubmissionDraft,
    state: SubmissionViewState,
}

/// One waitlist form session.
#[derive(Debug)]
pub struct WaitlistForm {
    submitter: Submitter,
    busy: AtomicBool,
    inner: Mutex<FormInner>,
}

/// Clears the busy flag when the submit finishes or is dropped.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl WaitlistForm {
    /// Start an empty session.
    #[must_use]
    pub fn new(submitter: Submitter) -> Self {
        Self {
            submitter,
            busy: AtomicBool::new(false),
            inner: Mutex::new(FormInner::default()),
        }
    }

    /// Start a session with pre-filled values.
    #[must_use]
    pub fn with_draft(submitter: Submitter, draft: SubmissionDraft) -> Self {
        let form = Self::new(submitter);
        form.lock().draft = draft;
        form
    }

    // The state is plain data and stays consistent even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, FormInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current view state.
    #[must_use]
    pub fn state(&self) -> SubmissionViewState {
        self.lock().state.clone()
    }

    /// Current draft values.
    #[must_use]
    pub fn draft(&self) -> SubmissionDraft {
        self.lock().draft.clone()
    }

    /// Check if a submission is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Update one field.
    ///
    /// Returns `false` once the form is submitted; the fields are gone then.
    pub fn set_field(&self, field: Field, value: impl Into<String>) -> bool {
        let mut inner = self.lock();
        if inner.state == SubmissionViewState::Submitted {
            return false;
        }
        inner.draft.set(field, value);
        true
    }

    /// Render the current state.
    #[must_use]
    pub fn view(&self) -> FormView {
        let inner = self.lock();
        FormView::render(&inner.state, &inner.draft)
    }

    /// Handle one press of the submit button.
    ///
    /// Clears any previous error, validates the current draft and, if valid,
    /// hands it to the submitter. The only suspension point is the collector
    /// round-trip.
    pub async fn submit(&self) -> SubmitAttempt {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Submit ignored, another submission is in flight");
            return SubmitAttempt::Ignored;
        }
        let _busy = BusyGuard(&self.busy);

        let draft = {
            let mut inner = self.lock();
            if inner.state == SubmissionViewState::Submitted {
                debug!("Submit ignored, form already submitted");
                return SubmitAttempt::Ignored;
            }
            inner.state = SubmissionViewState::Submitting;
            inner.draft.clone()
        };

        let next = match validate(&draft) {
            ValidationResult::Invalid(message) => SubmissionViewState::Failed(message.to_string()),
            ValidationResult::Valid => match self.submitter.submit(&draft).await {
                SubmissionOutcome::Accepted | SubmissionOutcome::AcceptedViaFallback => {
                    SubmissionViewState::Submitted
                }
                SubmissionOutcome::Failed(reason) => SubmissionViewState::Failed(reason),
            },
        };

        let mut inner = self.lock();
        if next == SubmissionViewState::Submitted {
            inner.draft.reset();
        }
        inner.state = next.clone();
        SubmitAttempt::Finished(next)
    }
}
