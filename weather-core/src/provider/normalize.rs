//! Translation of raw upstream failures into [`ProviderError`].
//!
//! Both adapters funnel every failure through [`normalize`]; only the
//! [`Rules`] differ between them.

use reqwest::StatusCode;
use tracing::debug;

use crate::{
    context::Interrupt,
    error::{ErrorKind, Operation, ProviderError},
};

/// What actually went wrong on the way to a provider and back.
#[derive(Debug)]
pub enum Failure {
    Interrupted(Interrupt),
    Transport(reqwest::Error),
    Status { status: StatusCode, body: String },
    Decode(serde_json::Error),
}

impl From<Interrupt> for Failure {
    fn from(value: Interrupt) -> Self {
        Failure::Interrupted(value)
    }
}

impl From<reqwest::Error> for Failure {
    fn from(value: reqwest::Error) -> Self {
        Failure::Transport(value)
    }
}

impl From<serde_json::Error> for Failure {
    fn from(value: serde_json::Error) -> Self {
        Failure::Decode(value)
    }
}

/// Per-provider classification of the failures that are not self-evident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    /// Kind reported for a 4xx response.
    pub client_error: ErrorKind,
    /// Kind reported when the payload cannot be decoded.
    pub undecodable: ErrorKind,
}

impl Rules {
    pub const SEARCH: Rules = Rules {
        client_error: ErrorKind::InvalidQuery,
        undecodable: ErrorKind::Unavailable,
    };

    pub const WEATHER: Rules = Rules {
        client_error: ErrorKind::Unavailable,
        undecodable: ErrorKind::MalformedResponse,
    };
}

pub fn classify(failure: &Failure, rules: &Rules) -> ErrorKind {
    match failure {
        Failure::Interrupted(Interrupt::DeadlineExceeded) => ErrorKind::Timeout,
        Failure::Interrupted(Interrupt::Canceled) => ErrorKind::Canceled,
        Failure::Transport(e) if e.is_timeout() => ErrorKind::Timeout,
        Failure::Transport(e) if e.is_decode() => rules.undecodable,
        Failure::Transport(_) => ErrorKind::Unavailable,
        Failure::Status { status, .. } if status.is_client_error() => rules.client_error,
        Failure::Status { .. } => ErrorKind::Unavailable,
        Failure::Decode(_) => rules.undecodable,
    }
}

/// Classifies `failure`, logs the upstream detail and drops it.
pub fn normalize(operation: Operation, failure: Failure, rules: &Rules) -> ProviderError {
    let kind = classify(&failure, rules);

    match &failure {
        Failure::Interrupted(i) => debug!(
            %operation,
            ?kind,
            interrupt = ?i,
            "provider call interrupted"
        ),
        Failure::Transport(e) => debug!(
            %operation,
            ?kind,
            error = %e,
            "provider transport failure"
        ),
        Failure::Status { status, body } => debug!(
            %operation,
            ?kind,
            %status,
            body = %truncate_body(body),
            "provider returned error status"
        ),
        Failure::Decode(e) => debug!(
            %operation,
            ?kind,
            error = %e,
            "provider payload undecodable"
        ),
    }

    ProviderError::new(operation, kind)
}

pub(crate) fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
