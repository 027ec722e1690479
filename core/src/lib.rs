//! Synchronous client for the AIL threat-intelligence ingestion API.
//!
//! # Overview
//! Authenticates against an AIL instance, submits data items and crawl
//! tasks, and normalizes the service's responses into a predictable
//! success/error shape.
//!
//! # Design
//! - [`client::AilClient`] holds an immutable [`client::Config`]; nothing is
//!   mutated per call, so a client may be shared across threads.
//! - [`codec`] compresses, hashes, and serializes outgoing payloads.
//! - [`response::classify`] is a pure function from a raw response to a
//!   normalized [`response::Outcome`], keeping the precedence rules
//!   independently testable.
//! - The network sits behind the [`http::Transport`] trait;
//!   [`transport::UreqTransport`] is the blocking implementation, and tests
//!   substitute scripted transports.
//! - Recoverable anomalies (structured 4xx errors, empty bodies) come back
//!   as [`types::ApiResponse`] data; only fatal conditions are
//!   [`error::AilError`] values.

pub mod client;
pub mod codec;
pub mod error;
pub mod http;
pub mod response;
pub mod transport;
pub mod types;

pub use client::{AilClient, Config};
pub use error::AilError;
pub use http::{
    AuthOverride, ClientCert, HttpMethod, HttpResponse, PreparedRequest, TlsMode, Transport,
    TransportOptions,
};
pub use response::{classify, Outcome};
pub use transport::UreqTransport;
pub use types::{ApiResponse, CrawlOptions, CrawlProxy, CustomSchedule, Frequency};
