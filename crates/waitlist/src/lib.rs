//! `waitlist` - the submission pipeline behind an early-access waitlist form.
//!
//! A draft is validated, posted to a collector endpoint and, if the collector
//! turns it away, kept in a local append-only fallback log. [`WaitlistForm`]
//! drives the view state around one submission at a time.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod collector;
pub mod config;
pub mod draft;
pub mod error;
pub mod form;
pub mod logging;
pub mod record;
pub mod store;
pub mod submitter;
pub mod validate;
pub mod view;

pub use collector::{Collector, CollectorResponse, HttpCollector, TransportError};
pub use config::Config;
pub use draft::{Field, SubmissionDraft};
pub use error::{Error, Result};
pub use form::{SubmissionViewState, SubmitAttempt, WaitlistForm};
pub use logging::init_logging;
pub use record::FallbackRecord;
pub use store::{FallbackLog, KeyValueStore, MemoryStore, SqliteStore, FALLBACK_KEY};
pub use submitter::{SubmissionOutcome, Submitter, GENERIC_FAILURE};
pub use validate::{validate, ValidationResult};
pub use view::FormView;
