//! Blocking HTTPS transport.
//!
//! `HttpsTransport` owns one `ureq::Agent` configured with the mTLS
//! `rustls::ClientConfig` for a single administration endpoint. Each
//! [`Transport::execute`] call is one POST round trip. The transport does not
//! retry, and it returns the body of non-2xx responses as-is: ES2+ endpoints
//! put the declared status in the body, so interpreting it is the caller's
//! job.

use std::io::Read;
use std::sync::Arc;

use es2plus_proto::credentials::ClientCredentials;
use es2plus_proto::tls::build_client_tls_config;
use es2plus_proto::version::{self, ADMIN_PROTOCOL, ADMIN_PROTOCOL_HEADER, CONTENT_TYPE_JSON};
use es2plus_proto::wire::{Operation, ES2PLUS_BASE_PATH};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Executes one ES2+ function call: request bytes in, response bytes out.
///
/// Implementations must be shareable across threads; the client adds no
/// locking of its own.
pub trait Transport: Send + Sync {
    fn execute(&self, operation: Operation, payload: &[u8]) -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, operation: Operation, payload: &[u8]) -> Result<Vec<u8>> {
        (**self).execute(operation, payload)
    }
}

/// HTTPS transport to one administration endpoint.
pub struct HttpsTransport {
    agent: ureq::Agent,
    base_url: String,
    print_headers: bool,
}

impl HttpsTransport {
    /// Load the client credentials and build the TLS channel.
    ///
    /// Fails if the configuration is invalid or the credentials cannot be
    /// loaded; no network activity happens here.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let credentials = ClientCredentials::from_pem_files(&config.cert_path, &config.key_path)?;
        let tls_config = build_client_tls_config(&credentials, &config.server_verification)?;

        let agent = ureq::AgentBuilder::new()
            .tls_config(Arc::new(tls_config))
            .build();

        info!(endpoint = %config.endpoint, subject = %credentials.subject(), "ES2+ transport ready");

        Ok(Self {
            agent,
            base_url: format!("https://{}{ES2PLUS_BASE_PATH}", config.endpoint),
            print_headers: config.debug.print_headers,
        })
    }

    /// Full URL of `operation` on this endpoint.
    pub fn url(&self, operation: Operation) -> String {
        format!("{}/{}", self.base_url, operation.as_str())
    }
}

impl Transport for HttpsTransport {
    fn execute(&self, operation: Operation, payload: &[u8]) -> Result<Vec<u8>> {
        let url = self.url(operation);

        if self.print_headers {
            info!(
                method = "POST",
                %url,
                x_admin_protocol = ADMIN_PROTOCOL,
                content_type = CONTENT_TYPE_JSON,
                content_length = payload.len(),
                "ES2+ request"
            );
        }

        let response = match self
            .agent
            .post(&url)
            .set(ADMIN_PROTOCOL_HEADER, ADMIN_PROTOCOL)
            .set("Content-Type", CONTENT_TYPE_JSON)
            .send_bytes(payload)
        {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                debug!(%operation, status = code, "non-success HTTP status");
                response
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(ClientError::Transport {
                    operation,
                    message: transport.to_string(),
                });
            }
        };

        let status = response.status();
        check_admin_protocol(operation, response.header(ADMIN_PROTOCOL_HEADER));

        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| ClientError::Transport {
                operation,
                message: format!("read body: {e}"),
            })?;

        debug!(%operation, status, bytes = body.len(), "ES2+ response received");
        Ok(body)
    }
}

/// Warn when the endpoint does not announce a compatible admin protocol.
/// The response is still handed to the caller.
fn check_admin_protocol(operation: Operation, announced: Option<&str>) {
    match announced {
        Some(protocol) if version::is_compatible(protocol) => {}
        Some(protocol) => {
            warn!(%operation, announced = protocol, expected = ADMIN_PROTOCOL, "incompatible admin protocol in response");
        }
        None => {
            warn!(%operation, "response carries no {ADMIN_PROTOCOL_HEADER} header");
        }
    }
}
