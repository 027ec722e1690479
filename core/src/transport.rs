//! Blocking transport backed by ureq.
//!
//! # Design
//! One agent is built per call from the request's [`TransportOptions`], with
//! ureq's status-as-error behavior disabled so 4xx/5xx responses come back as
//! data for the response classifier. Timeout expiry and TLS/proxy/DNS
//! failures surface as [`AilError::Transport`], distinct from the
//! status-based classification.

use std::fs;

use ureq::tls::{Certificate, PrivateKey, RootCerts, TlsConfig};
use ureq::Agent;

use crate::error::AilError;
use crate::http::{HttpMethod, HttpResponse, PreparedRequest, TlsMode, Transport, TransportOptions};

/// [`Transport`] implementation using ureq's blocking client.
#[derive(Debug, Clone, Default)]
pub struct UreqTransport;

impl UreqTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &PreparedRequest) -> Result<HttpResponse, AilError> {
        let agent = build_agent(request)?;

        let sent = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(agent.get(&request.url), request).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(agent.post(&request.url), request).send(body)
            }
            (HttpMethod::Post, None) => {
                with_headers(agent.post(&request.url), request).send_empty()
            }
        };

        let mut response = sent.map_err(|e| AilError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| AilError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Copy the prepared headers onto a ureq request, applying the auth override
/// last so it wins over the key-based `Authorization` header.
fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    request: &PreparedRequest,
) -> ureq::RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    if let Some(auth) = &request.options.auth {
        builder = builder.header("Authorization", auth.header_value());
    }
    builder
}

fn build_agent(request: &PreparedRequest) -> Result<Agent, AilError> {
    let options = &request.options;
    let mut config = Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(options.timeout);

    if let Some(tls) = tls_config(options)? {
        config = config.tls_config(tls);
    }

    if let Some(uri) = proxy_for(options, &request.url) {
        let proxy = ureq::Proxy::new(uri)
            .map_err(|e| AilError::Transport(format!("invalid proxy {uri}: {e}")))?;
        config = config.proxy(Some(proxy));
    }

    Ok(config.build().new_agent())
}

/// Proxy URI for the request's scheme, falling back to an `all` entry.
fn proxy_for<'a>(options: &'a TransportOptions, url: &str) -> Option<&'a str> {
    let scheme = url.split_once("://").map(|(scheme, _)| scheme)?;
    options
        .proxies
        .get(scheme)
        .or_else(|| options.proxies.get("all"))
        .map(String::as_str)
}

/// TLS settings, or `None` when the defaults (verify against the system
/// store, no client certificate) apply.
fn tls_config(options: &TransportOptions) -> Result<Option<TlsConfig>, AilError> {
    if options.tls == TlsMode::Verify && options.cert.is_none() {
        return Ok(None);
    }

    let mut builder = TlsConfig::builder();

    match &options.tls {
        TlsMode::Verify => {}
        TlsMode::NoVerify => builder = builder.disable_verification(true),
        TlsMode::CaBundle(path) => {
            let pem = fs::read(path).map_err(|e| {
                AilError::Transport(format!("unable to read CA bundle {}: {e}", path.display()))
            })?;
            let root = Certificate::from_pem(&pem).map_err(|e| {
                AilError::Transport(format!("invalid CA bundle {}: {e}", path.display()))
            })?;
            builder = builder.root_certs(RootCerts::new_with_certs(&[root]));
        }
    }

    if let Some(cert) = &options.cert {
        let cert_pem = fs::read(&cert.cert).map_err(|e| {
            AilError::Transport(format!(
                "unable to read client certificate {}: {e}",
                cert.cert.display()
            ))
        })?;
        let key_pem = fs::read(&cert.key).map_err(|e| {
            AilError::Transport(format!(
                "unable to read client key {}: {e}",
                cert.key.display()
            ))
        })?;
        let chain = [Certificate::from_pem(&cert_pem).map_err(|e| {
            AilError::Transport(format!(
                "invalid client certificate {}: {e}",
                cert.cert.display()
            ))
        })?];
        let key = PrivateKey::from_pem(&key_pem).map_err(|e| {
            AilError::Transport(format!("invalid client key {}: {e}", cert.key.display()))
        })?;
        builder = builder.client_cert(Some(ureq::tls::ClientCert::new_with_certs(&chain, key)));
    }

    Ok(Some(builder.build()))
}
