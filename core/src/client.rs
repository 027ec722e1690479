//! AIL client: configuration, request construction, and domain operations.
//!
//! # Design
//! `AilClient` holds an immutable [`Config`] and a [`Transport`]. Each
//! operation builds a [`PreparedRequest`] (no I/O), hands it to the
//! transport, and normalizes the raw response through
//! [`classify`](crate::response::classify). Construction validates the
//! configuration before any network activity, then requires a successful
//! health check against the instance.
//!
//! A client may be shared across threads: no call mutates the configuration,
//! and per-call connection settings are copied into the request.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::{Map, Value};
use url::Url;
use uuid::Uuid;

use crate::codec;
use crate::error::AilError;
use crate::http::{
    AuthOverride, ClientCert, HttpMethod, HttpResponse, PreparedRequest, TlsMode, Transport,
    TransportOptions,
};
use crate::response::{classify, Outcome};
use crate::transport::UreqTransport;
use crate::types::{ApiResponse, CrawlOptions};

const LIBRARY_NAME: &str = "ail-client";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Connection configuration for an AIL instance. Immutable once a client is
/// constructed from it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the instance, e.g. `https://ail.example:7000/`.
    pub url: String,
    /// API key of the user to authenticate as.
    pub key: String,
    pub ssl: TlsMode,
    /// API version tag; only `v1` is currently deployed.
    pub api_version: String,
    /// Scheme (`http`, `https`, or `all`) to proxy URI.
    pub proxies: HashMap<String, String>,
    pub cert: Option<ClientCert>,
    /// Transport-level auth override; wins over the key-based header.
    pub auth: Option<AuthOverride>,
    /// Name of the software using the client, appended to the user agent.
    pub tool: Option<String>,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
            ssl: TlsMode::default(),
            api_version: "v1".to_string(),
            proxies: HashMap::new(),
            cert: None,
            auth: None,
            tool: None,
            timeout: None,
        }
    }
}

/// Request body variants accepted by the request builder.
///
/// An empty field mapping produces no body, which also covers the historic
/// "falsy payload" case by construction.
#[derive(Debug, Clone)]
pub(crate) enum Body {
    None,
    /// A pre-serialized text blob, sent as-is.
    Raw(String),
    /// Structured fields; null values are dropped before serialization.
    Fields(Map<String, Value>),
}

/// Synchronous client for an AIL instance.
#[derive(Debug)]
pub struct AilClient<T: Transport = UreqTransport> {
    config: Config,
    transport: T,
}

impl AilClient<UreqTransport> {
    /// Validate `config`, then ping the instance over HTTP. Fails with a
    /// configuration error before any network call if the URL or key is
    /// missing, and with [`AilError::Connection`] if the health check does
    /// not succeed.
    pub fn connect(config: Config) -> Result<Self, AilError> {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> AilClient<T> {
    /// Like [`AilClient::connect`], with a caller-supplied transport.
    pub fn with_transport(config: Config, transport: T) -> Result<Self, AilError> {
        if config.url.is_empty() {
            return Err(AilError::MissingUrl);
        }
        if config.key.is_empty() {
            return Err(AilError::MissingKey);
        }

        let client = Self { config, transport };
        match client.ping() {
            Ok(ApiResponse::Json(_)) => Ok(client),
            Ok(other) => Err(AilError::Connection(format!(
                "unable to connect to AIL ({}): health check returned {other:?}; please make \
                 sure the API key and the URL are correct (https is required)",
                client.config.url
            ))),
            Err(e) => Err(AilError::Connection(format!(
                "unable to connect to AIL ({}): {e}; please make sure the API key and the URL \
                 are correct (https is required)",
                client.config.url
            ))),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // --- domain operations ---

    /// `GET api/<version>/ping` — health check.
    pub fn ping(&self) -> Result<ApiResponse, AilError> {
        let request = self.prepare_request(
            HttpMethod::Get,
            &format!("api/{}/ping", self.config.api_version),
            Body::None,
            &[],
        )?;
        let response = self.transport.send(&request)?;
        self.check_json_response(&request, response)
    }

    /// Submit one item. `data` is compressed and base64-encoded for
    /// transport; the accompanying SHA-256 digest covers the original
    /// uncompressed bytes.
    pub fn feed_json_item(
        &self,
        data: impl AsRef<[u8]>,
        meta: Value,
        source: &str,
        source_uuid: Uuid,
        default_encoding: &str,
    ) -> Result<ApiResponse, AilError> {
        let mut fields = Map::new();
        fields.insert(
            "data".to_string(),
            Value::String(codec::encode_and_compress(&data)),
        );
        fields.insert(
            "data-sha256".to_string(),
            Value::String(codec::data_sha256(&data)),
        );
        fields.insert("meta".to_string(), meta);
        fields.insert("source".to_string(), Value::String(source.to_string()));
        fields.insert("source_uuid".to_string(), codec::to_json(&source_uuid)?);
        fields.insert(
            "default_encoding".to_string(),
            Value::String(default_encoding.to_string()),
        );

        let request = self.prepare_request(
            HttpMethod::Post,
            &format!("api/{}/import/json/item", self.config.api_version),
            Body::Fields(fields),
            &[],
        )?;
        let response = self.transport.send(&request)?;
        self.check_json_response(&request, response)
    }

    /// Enqueue a crawl task for `url`.
    pub fn crawl_url(&self, url: &str, options: &CrawlOptions) -> Result<ApiResponse, AilError> {
        let mut fields = Map::new();
        fields.insert("url".to_string(), Value::String(url.to_string()));
        fields.insert("har".to_string(), Value::Bool(options.har));
        fields.insert("screenshot".to_string(), Value::Bool(options.screenshot));
        fields.insert("depth_limit".to_string(), Value::from(options.depth_limit));
        if let Some(cookiejar) = &options.cookiejar {
            fields.insert("cookiejar".to_string(), Value::String(cookiejar.clone()));
        }
        if let Some(proxy) = &options.proxy {
            fields.insert("proxy".to_string(), codec::to_json(proxy)?);
        }
        if let Some(frequency) = &options.frequency {
            fields.insert("frequency".to_string(), codec::to_json(frequency)?);
        }

        let request = self.prepare_request(
            HttpMethod::Post,
            &format!("api/{}/add/crawler/task", self.config.api_version),
            Body::Fields(fields),
            &[],
        )?;
        let response = self.transport.send(&request)?;
        self.check_json_response(&request, response)
    }

    /// Attach a capture to an existing crawl task. Cookiejar and frequency
    /// do not apply to captures and are ignored.
    pub fn add_crawler_capture(
        &self,
        task_uuid: Uuid,
        capture_uuid: Uuid,
        url: &str,
        options: &CrawlOptions,
    ) -> Result<ApiResponse, AilError> {
        let mut fields = Map::new();
        fields.insert("task_uuid".to_string(), codec::to_json(&task_uuid)?);
        fields.insert("capture_uuid".to_string(), codec::to_json(&capture_uuid)?);
        fields.insert("url".to_string(), Value::String(url.to_string()));
        fields.insert("har".to_string(), Value::Bool(options.har));
        fields.insert("screenshot".to_string(), Value::Bool(options.screenshot));
        fields.insert("depth_limit".to_string(), Value::from(options.depth_limit));
        if let Some(proxy) = &options.proxy {
            fields.insert("proxy".to_string(), codec::to_json(proxy)?);
        }

        let request = self.prepare_request(
            HttpMethod::Post,
            &format!("api/{}/add/crawler/capture", self.config.api_version),
            Body::Fields(fields),
            &[],
        )?;
        let response = self.transport.send(&request)?;
        self.check_json_response(&request, response)
    }

    // --- request construction ---

    /// Assemble a [`PreparedRequest`]. Resolves `path` against the base URL
    /// with RFC 3986 join semantics, so a relative path extends a base URL
    /// subpath instead of replacing it. No network I/O happens here.
    fn prepare_request(
        &self,
        method: HttpMethod,
        path: &str,
        data: Body,
        params: &[(&str, &str)],
    ) -> Result<PreparedRequest, AilError> {
        let base = Url::parse(&self.config.url)
            .map_err(|e| AilError::InvalidUrl(format!("{}: {e}", self.config.url)))?;
        let mut url = base
            .join(path)
            .map_err(|e| AilError::InvalidUrl(format!("{path}: {e}")))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }

        let body = match data {
            Body::None => None,
            Body::Raw(text) => Some(text),
            Body::Fields(fields) if fields.is_empty() => None,
            Body::Fields(fields) => {
                let fields: Map<String, Value> =
                    fields.into_iter().filter(|(_, v)| !v.is_null()).collect();
                Some(codec::serialize(&fields)?)
            }
        };

        tracing::debug!(method = ?method, url = %url, body = body.as_deref().unwrap_or(""));

        let output_type = "json";
        let mut user_agent = format!(
            "{LIBRARY_NAME} {VERSION} - rust {}-{}",
            std::env::consts::OS,
            std::env::consts::ARCH
        );
        if let Some(tool) = &self.config.tool {
            user_agent = format!("{user_agent} - {tool}");
        }

        let headers = vec![
            ("Authorization".to_string(), self.config.key.clone()),
            ("Accept".to_string(), format!("application/{output_type}")),
            (
                "Content-Type".to_string(),
                format!("application/{output_type}"),
            ),
            ("User-Agent".to_string(), user_agent),
        ];

        Ok(PreparedRequest {
            method,
            url: url.into(),
            headers,
            body,
            options: TransportOptions {
                tls: self.config.ssl.clone(),
                proxies: self.config.proxies.clone(),
                cert: self.config.cert.clone(),
                auth: self.config.auth.clone(),
                timeout: self.config.timeout,
            },
        })
    }

    // --- response normalization ---

    /// Map a classified outcome to the public result, logging the fatal and
    /// recoverable anomalies. Server faults log the complete exchange since
    /// the client cannot self-diagnose a broken deployment.
    fn check_response(
        &self,
        request: &PreparedRequest,
        response: HttpResponse,
        expects_json: bool,
    ) -> Result<ApiResponse, AilError> {
        match classify(response.status, &response.body, expects_json) {
            Outcome::ServerError { status, text } => {
                tracing::error!(
                    request_headers = ?request.headers,
                    request_body = request.body.as_deref().unwrap_or(""),
                    response_text = %text,
                    "unknown error: the response is not in JSON; something is broken \
                     server-side, please report everything above (careful with the auth key)"
                );
                Err(AilError::ServerFault { status, text })
            }
            Outcome::ClientError { status, body } => {
                tracing::error!(status, error = %body, "something went wrong");
                Ok(ApiResponse::Errors { status, body })
            }
            Outcome::Empty => {
                tracing::error!("got an empty response");
                Ok(ApiResponse::Empty)
            }
            Outcome::Unexpected(text) => Err(AilError::UnexpectedResponse(text)),
            Outcome::Success(value) => {
                tracing::debug!(response = %value);
                Ok(ApiResponse::Json(value))
            }
            Outcome::Text(text) => Ok(ApiResponse::Text(text)),
        }
    }

    /// [`check_response`](Self::check_response) for calls that require a JSON
    /// success body. A payload that is neither an object nor an array is an
    /// unexpected response.
    fn check_json_response(
        &self,
        request: &PreparedRequest,
        response: HttpResponse,
    ) -> Result<ApiResponse, AilError> {
        match self.check_response(request, response, true)? {
            ApiResponse::Json(value) if !value.is_object() && !value.is_array() => {
                Err(AilError::UnexpectedResponse("invalid JSON received".to_string()))
            }
            other => Ok(other),
        }
    }
}
