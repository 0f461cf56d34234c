//! Client configuration.
//!
//! A [`ClientConfig`] is built once, either from the four values the operator
//! supplies on the command line or from a TOML file, and is never mutated
//! after the client is constructed from it:
//!
//! ```toml
//! endpoint = "smdp.example.com:8443"
//! requester_id = "ACME"
//! cert_path = "/etc/es2plus/client.crt"
//! key_path = "/etc/es2plus/client.key"
//!
//! [server_verification]
//! mode = "ca_bundle"
//! path = "/etc/es2plus/smdp-ca.pem"
//!
//! [debug]
//! print_payload = true
//! ```

use std::path::{Path, PathBuf};

use es2plus_proto::tls::ServerVerification;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Connection and identity settings for one administration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// `host:port` of the administration endpoint.
    pub endpoint: String,

    /// Sent as `functionRequesterIdentifier` in every request.
    pub requester_id: String,

    /// PEM client certificate chain, leaf first.
    pub cert_path: PathBuf,

    /// PEM private key matching the leaf certificate.
    pub key_path: PathBuf,

    #[serde(default)]
    pub server_verification: ServerVerification,

    #[serde(default)]
    pub debug: DebugOptions,
}

/// Diagnostic output switches.
///
/// When set, request/response bodies and request lines are logged at info
/// level regardless of the per-request debug logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugOptions {
    pub print_payload: bool,
    pub print_headers: bool,
}

impl ClientConfig {
    /// Configuration from the four operator-supplied values, with default
    /// server verification and no debug output.
    pub fn new(
        cert_path: impl Into<PathBuf>,
        key_path: impl Into<PathBuf>,
        endpoint: impl Into<String>,
        requester_id: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            requester_id: requester_id.into(),
            cert_path: cert_path.into(),
            key_path: key_path.into(),
            server_verification: ServerVerification::default(),
            debug: DebugOptions::default(),
        }
    }

    pub fn with_server_verification(mut self, verification: ServerVerification) -> Self {
        self.server_verification = verification;
        self
    }

    pub fn with_debug(mut self, debug: DebugOptions) -> Self {
        self.debug = debug;
        self
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values that can be checked without touching the filesystem
    /// or the network.
    pub fn validate(&self) -> Result<()> {
        let Some((host, port)) = self.endpoint.rsplit_once(':') else {
            return Err(ClientError::Config(format!(
                "endpoint '{}' must be host:port",
                self.endpoint
            )));
        };
        if host.is_empty() {
            return Err(ClientError::Config(format!(
                "endpoint '{}' has no host",
                self.endpoint
            )));
        }
        if port.parse::<u16>().is_err() {
            return Err(ClientError::Config(format!(
                "endpoint '{}' has an invalid port",
                self.endpoint
            )));
        }
        if self.requester_id.trim().is_empty() {
            return Err(ClientError::Config("requester_id must not be empty".into()));
        }
        Ok(())
    }
}
