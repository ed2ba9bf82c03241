use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

/// Application-level failure: the service answered, with a non-success envelope code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub code: i32,
    pub url: String,
}

/// Transport-level failure: no usable envelope came back.
#[derive(Debug)]
pub enum TransportError {
    Network(reqwest::Error),
    Http { status: StatusCode, body: String },
    Decode(String),
    InvalidUrl(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl TransportError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TransportError::Http { status, .. } => Some(*status),
            TransportError::Network(err) => err.status(),
            TransportError::Decode(_) | TransportError::InvalidUrl(_) => None,
        }
    }

    /// The `message` field of an HTTP error body, when the body is JSON carrying one.
    pub fn body_message(&self) -> Option<String> {
        match self {
            TransportError::Http { body, .. } => serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.message),
            _ => None,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Network(err) => write!(f, "network error: {}", err),
            TransportError::Http { status, body } => {
                write!(f, "http status {}: body='{}'", status, body)
            }
            TransportError::Decode(msg) => write!(f, "decode error: {}", msg),
            TransportError::InvalidUrl(msg) => write!(f, "invalid url: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

/// Where a dispatched request ended up. Exactly one variant per request.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    Failure(Failure),
    Error(TransportError),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}
