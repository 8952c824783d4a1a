use std::fmt;

use thiserror::Error;
use time::OffsetDateTime;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// External collaborator a failure originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    EventSource,
    Summarizer,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::EventSource => f.write_str("event source"),
            Service::Summarizer => f.write_str("summarizer"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Transport error talking to {service}: {source}")]
    Transport {
        service: Service,
        #[source]
        source: BoxError,
    },

    #[error("{service} responded with status {status}: {body}")]
    BadResponse {
        service: Service,
        status: u16,
        body: String,
    },

    #[error("Malformed response from {service}: {source}")]
    Decode {
        service: Service,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to decode {kind} payload: {source}")]
    PayloadParse {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Token is already masked: {0}")]
    AlreadyMasked(String),

    #[error("Empty token cannot be masked")]
    EmptyToken,

    #[error("No unique pseudonym for {token:?} after {attempts} attempts")]
    PseudonymCollision { token: String, attempts: u32 },

    #[error("{0} returned no result")]
    EmptyResult(Service),

    #[error("Reached the limit of {pages} pages before the start of the window")]
    PageLimit { pages: u32 },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid time window: start {start} is after end {end}")]
    InvalidWindow {
        start: OffsetDateTime,
        end: OffsetDateTime,
    },

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn transport(service: Service, source: impl Into<BoxError>) -> Self {
        Error::Transport {
            service,
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
