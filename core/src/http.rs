//! HTTP transport types and the synchronous send boundary.
//!
//! # Design
//! Requests and responses are plain owned data. The client assembles a
//! [`PreparedRequest`] without touching the network; the [`Transport`]
//! implementation is the only place a socket is opened. This keeps request
//! construction and response classification deterministic and testable with
//! stub transports.
//!
//! [`TransportOptions`] carries everything a transport needs beyond the
//! request line itself: TLS verification mode, proxies, client certificate,
//! auth override, and timeout. The options are copied from the immutable
//! client configuration on every call, so a shared client never mutates them.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::AilError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// TLS certificate verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Verify the server certificate against the system trust store.
    #[default]
    Verify,
    /// Skip certificate verification entirely.
    NoVerify,
    /// Verify against a caller-supplied CA bundle (concatenated PEM).
    CaBundle(PathBuf),
}

/// Client certificate presented during the TLS handshake, as PEM file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCert {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Transport-level authentication override.
///
/// When set, the transport replaces the `Authorization` header produced from
/// the configured API key with this scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOverride {
    Basic { username: String, password: String },
    Bearer(String),
}

impl AuthOverride {
    /// The `Authorization` header value for this scheme.
    pub fn header_value(&self) -> String {
        match self {
            AuthOverride::Basic { username, password } => {
                format!("Basic {}", BASE64.encode(format!("{username}:{password}")))
            }
            AuthOverride::Bearer(token) => format!("Bearer {token}"),
        }
    }
}

/// Connection settings attached to every prepared request.
#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    pub tls: TlsMode,
    /// Scheme (`http`, `https`, or `all`) to proxy URI.
    pub proxies: HashMap<String, String>,
    pub cert: Option<ClientCert>,
    pub auth: Option<AuthOverride>,
    pub timeout: Option<Duration>,
}

/// A fully-specified request, built once per call and sent once.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub options: TransportOptions,
}

/// A raw HTTP response as returned by a [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Synchronous send capability.
///
/// Implementations must return HTTP error statuses as an `HttpResponse`, not
/// as an `Err`; only connection-level failures (DNS, TLS, timeout, proxy)
/// surface as [`AilError::Transport`].
pub trait Transport {
    fn send(&self, request: &PreparedRequest) -> Result<HttpResponse, AilError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_header_is_base64_of_user_colon_password() {
        let auth = AuthOverride::Basic {
            username: "ail".to_string(),
            password: "secret".to_string(),
        };
        assert_eq!(auth.header_value(), "Basic YWlsOnNlY3JldA==");
    }

    #[test]
    fn bearer_auth_header_carries_token() {
        let auth = AuthOverride::Bearer("tok-123".to_string());
        assert_eq!(auth.header_value(), "Bearer tok-123");
    }

    #[test]
    fn tls_mode_defaults_to_verify() {
        assert_eq!(TlsMode::default(), TlsMode::Verify);
    }
}
