//! Delivery of a validated draft, with local fallback capture.
//!
//! Policy:
//! - HTTP 2xx: delivered.
//! - Any other HTTP status: the round-trip worked, so the draft is kept in
//!   the fallback log and the submission still counts as accepted.
//! - No response at all: hard failure, nothing is written locally.
//!
//! No error escapes [`Submitter::submit`]; every failure becomes a
//! [`SubmissionOutcome::Failed`] carrying a short message for the form.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::collector::Collector;
use crate::draft::SubmissionDraft;
use crate::record::FallbackRecord;
use crate::store::FallbackLog;
use crate::validate::{validate, ValidationResult};

/// Shown when neither delivery nor local capture can be confirmed.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Result of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The collector accepted the draft.
    Accepted,
    /// The collector rejected the draft; it was captured locally instead.
    AcceptedViaFallback,
    /// Nothing was confirmed; carries the message to show inline.
    Failed(String),
}

impl SubmissionOutcome {
    /// Check if the person should see the confirmation.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted | Self::AcceptedViaFallback)
    }
}

/// Sends drafts to a collector and falls back to the local log.
#[derive(Clone)]
pub struct Submitter {
    collector: Arc<dyn Collector>,
    fallback: FallbackLog,
}

impl std::fmt::Debug for Submitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Submitter")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl Submitter {
    /// Create a submitter.
    #[must_use]
    pub fn new(collector: Arc<dyn Collector>, fallback: FallbackLog) -> Self {
        Self {
            collector,
            fallback,
        }
    }

    /// The fallback log this submitter appends to.
    #[must_use]
    pub fn fallback(&self) -> &FallbackLog {
        &self.fallback
    }

    /// Validate and deliver one draft.
    ///
    /// An invalid draft is rejected before any network or storage activity.
    pub async fn submit(&self, draft: &SubmissionDraft) -> SubmissionOutcome {
        if let ValidationResult::Invalid(message) = validate(draft) {
            return SubmissionOutcome::Failed(message.to_string());
        }

        let domain = draft.email_domain();
        match self.collector.send(draft).await {
            Ok(response) if response.is_success() => {
                info!(status = response.status, domain, "Waitlist submission delivered");
                SubmissionOutcome::Accepted
            }
            Ok(response) => self.capture_locally(draft, response.status),
            Err(e) => {
                error!(error = %e, domain, "Waitlist submission did not reach the collector");
                SubmissionOutcome::Failed(GENERIC_FAILURE.to_string())
            }
        }
    }

    fn capture_locally(&self, draft: &SubmissionDraft, status: u16) -> SubmissionOutcome {
        let record = FallbackRecord::capture(draft);
        match self.fallback.append(&record) {
            Ok(records) => {
                warn!(
                    status,
                    records,
                    domain = draft.email_domain(),
                    "Collector rejected submission, kept in fallback log"
                );
                SubmissionOutcome::AcceptedViaFallback
            }
            Err(e) => {
                error!(
                    status,
                    error = %e,
                    "Collector rejected submission and fallback capture failed"
                );
                SubmissionOutcome::Failed(GENERIC_FAILURE.to_string())
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fakes shared by the submitter and form tests.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::collector::{Collector, CollectorResponse, TransportError};
    use crate::draft::SubmissionDraft;
    use crate::error::{Error, Result};
    use crate::store::KeyValueStore;

    /// Collector that replies with a fixed result and counts calls.
    #[derive(Debug)]
    pub struct FakeCollector {
        reply: std::result::Result<CollectorResponse, TransportError>,
        calls: AtomicUsize,
        seen: Mutex<Vec<SubmissionDraft>>,
        gate: Option<Notify>,
    }

    impl FakeCollector {
        pub fn status(status: u16) -> Self {
            Self::with_reply(Ok(CollectorResponse::new(status)))
        }

        pub fn unreachable() -> Self {
            Self::with_reply(Err(TransportError::Connect(
                "connection refused".to_string(),
            )))
        }

        fn with_reply(reply: std::result::Result<CollectorResponse, TransportError>) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                gate: None,
            }
        }

        /// Hold every `send` until [`FakeCollector::release`] is called.
        pub fn gated(mut self) -> Self {
            self.gate = Some(Notify::new());
            self
        }

        pub fn release(&self) {
            if let Some(gate) = &self.gate {
                gate.notify_one();
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn seen(&self) -> Vec<SubmissionDraft> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Collector for FakeCollector {
        async fn send(
            &self,
            draft: &SubmissionDraft,
        ) -> std::result::Result<CollectorResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(draft.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.reply.clone()
        }
    }

    /// Store whose every operation fails.
    #[derive(Debug, Default)]
    pub struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::internal("disk on fire"))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::internal("disk on fire"))
        }
    }
}
