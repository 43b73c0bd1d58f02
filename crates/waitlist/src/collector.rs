//! The remote collector endpoint that receives waitlist submissions.
//!
//! A [`Collector`] sends one draft and reports either the HTTP status it got
//! back or a [`TransportError`] when the round-trip never completed. The
//! distinction matters to the submitter: a status proves the network worked,
//! a transport error proves nothing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::multipart::Form;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::CollectorConfig;
use crate::draft::SubmissionDraft;
use crate::error::Result;

/// Why a request never produced a response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The endpoint could not be reached.
    #[error("could not connect to collector: {0}")]
    Connect(String),

    /// The request exceeded the client timeout.
    #[error("collector request timed out")]
    Timeout,

    /// The request failed for another reason (aborted, bad body, redirect loop).
    #[error("collector request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// The response the collector sent back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectorResponse {
    /// HTTP status code.
    pub status: u16,
}

impl CollectorResponse {
    /// Wrap a status code.
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self { status }
    }

    /// Check if the status is in `200..=299`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Something that can deliver a draft to the collector.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Send one draft.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no HTTP response was received.
    async fn send(
        &self,
        draft: &SubmissionDraft,
    ) -> std::result::Result<CollectorResponse, TransportError>;
}

/// Collector that posts a multipart form over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCollector {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpCollector {
    /// Build a collector from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &CollectorConfig) -> Result<Self> {
        Self::new(&config.endpoint, config.timeout())
    }

    /// Build a collector for `endpoint` with an optional request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("waitlist/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            endpoint: endpoint.to_string(),
            client: builder.build()?,
        })
    }

    /// The endpoint this collector posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn form(draft: &SubmissionDraft) -> Form {
        draft
            .fields()
            .fold(Form::new(), |form, (key, value)| {
                form.text(key, value.to_string())
            })
    }
}

#[async_trait]
impl Collector for HttpCollector {
    async fn send(
        &self,
        draft: &SubmissionDraft,
    ) -> std::result::Result<CollectorResponse, TransportError> {
        trace!(endpoint = %self.endpoint, "Posting waitlist form");
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .multipart(Self::form(draft))
            .send()
            .await?;

        let status = response.status().as_u16();
        debug!(status, endpoint = %self.endpoint, "Collector responded");
        Ok(CollectorResponse::new(status))
    }
}
