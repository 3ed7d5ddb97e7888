//! Error vocabulary shared by the providers, the selection prompt and the
//! orchestrator. Provider errors carry only a kind; their `Display` is the
//! fixed user-facing text and never includes upstream diagnostics.

use std::{fmt, io};

use thiserror::Error;

/// Which external call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    Weather,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Search => "location search",
            Operation::Weather => "weather fetch",
        })
    }
}

/// Closed set of provider failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Timeout,
    Canceled,
    Unavailable,
    InvalidQuery,
    MalformedResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", self.user_message())]
pub struct ProviderError {
    pub operation: Operation,
    pub kind: ErrorKind,
}

impl ProviderError {
    pub fn new(operation: Operation, kind: ErrorKind) -> Self {
        Self { operation, kind }
    }

    pub fn user_message(&self) -> &'static str {
        match (self.operation, self.kind) {
            (Operation::Search, ErrorKind::Timeout) => "Search took too long. Please try again.",
            (Operation::Search, _) => "Unable to search locations. Please try again.",
            (Operation::Weather, ErrorKind::Timeout) => {
                "Weather request took too long. Please try again."
            }
            (Operation::Weather, _) => "Unable to fetch weather. Please try again.",
        }
    }
}

/// Failures of the candidate selection step.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("multiple locations found, please be more specific")]
    AmbiguousNonInteractive,

    #[error("failed to read input: {0}")]
    InputFault(#[source] io::Error),

    #[error("failed to read input: EOF")]
    InputExhausted,

    #[error("failed to write prompt: {0}")]
    OutputFault(#[source] io::Error),
}

/// Any failure of a pipeline run. `Display` carries the stage prefix.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Error searching for location: {0}")]
    Search(#[source] ProviderError),

    #[error("Error selecting location: {0}")]
    Selection(#[source] SelectionError),

    #[error("Error fetching weather: {0}")]
    Weather(#[source] ProviderError),

    #[error("Error printing weather: {0}")]
    Render(#[source] io::Error),
}
