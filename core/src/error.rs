//! Error types for the AIL client.
//!
//! # Design
//! Only fatal conditions are errors. A 4xx with a structured JSON body and an
//! empty 2xx body are recoverable and surface as
//! [`ApiResponse`](crate::types::ApiResponse) variants instead, so calling
//! code can distinguish "the service rejected my input" from "the service is
//! broken."

use std::fmt;

/// Fatal errors returned by [`AilClient`](crate::client::AilClient).
#[derive(Debug)]
pub enum AilError {
    /// No base URL was configured.
    MissingUrl,

    /// No authorization key was configured.
    MissingKey,

    /// The configured base URL or a derived request URL is not valid.
    InvalidUrl(String),

    /// The construction-time health check failed.
    Connection(String),

    /// Connection-level failure: DNS, TLS handshake, proxy, timeout.
    Transport(String),

    /// The server returned a 5xx, or a 4xx whose body is not JSON. The full
    /// request/response exchange is logged before this is returned.
    ServerFault { status: u16, text: String },

    /// A call that expects a JSON success body got an unparseable one.
    UnexpectedResponse(String),

    /// A payload value has no JSON representation.
    Serialization(String),
}

impl fmt::Display for AilError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AilError::MissingUrl => {
                write!(f, "please provide the URL of your AIL instance")
            }
            AilError::MissingKey => {
                write!(f, "please provide your authorization key")
            }
            AilError::InvalidUrl(msg) => write!(f, "invalid URL: {msg}"),
            AilError::Connection(msg) => write!(f, "{msg}"),
            AilError::Transport(msg) => write!(f, "transport failure: {msg}"),
            AilError::ServerFault { status, text } => {
                write!(f, "error code {status}:\n{text}")
            }
            AilError::UnexpectedResponse(msg) => {
                write!(f, "unexpected response from server: {msg}")
            }
            AilError::Serialization(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for AilError {}
