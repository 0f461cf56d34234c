//! Connection settings shared by every subcommand.
//!
//! Settings come from a TOML file (`--config` or `ES2PLUS_CONFIG`), from
//! individual flags, or both; a flag overrides the same value in the file.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use es2plus_client_core::{ClientConfig, DebugOptions};
use es2plus_proto::tls::ServerVerification;

#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// TOML client configuration file
    #[arg(long, env = "ES2PLUS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Client certificate PEM file
    #[arg(long, global = true)]
    pub cert: Option<PathBuf>,

    /// Client private key PEM file
    #[arg(long, global = true)]
    pub key: Option<PathBuf>,

    /// host:port of the ES2+ endpoint
    #[arg(long, global = true)]
    pub hostport: Option<String>,

    /// ES2+ requester ID
    #[arg(long, global = true)]
    pub requesterid: Option<String>,

    /// Verify the endpoint certificate against this PEM CA bundle
    #[arg(long, global = true)]
    pub ca_bundle: Option<PathBuf>,

    /// Log request and response bodies
    #[arg(long, global = true)]
    pub print_payload: bool,

    /// Log request lines and headers
    #[arg(long, global = true)]
    pub print_headers: bool,
}

impl ConnectionArgs {
    /// Merge the configuration file, if any, with the flags.
    pub fn resolve(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)
                .with_context(|| format!("cannot load {}", path.display()))?,
            None => {
                let mut missing = Vec::new();
                if self.cert.is_none() {
                    missing.push("--cert");
                }
                if self.key.is_none() {
                    missing.push("--key");
                }
                if self.hostport.is_none() {
                    missing.push("--hostport");
                }
                if self.requesterid.is_none() {
                    missing.push("--requesterid");
                }
                if !missing.is_empty() {
                    bail!(
                        "missing {} (or pass --config)",
                        missing.join(", ")
                    );
                }
                ClientConfig::new(
                    self.cert.clone().unwrap_or_default(),
                    self.key.clone().unwrap_or_default(),
                    self.hostport.clone().unwrap_or_default(),
                    self.requesterid.clone().unwrap_or_default(),
                )
            }
        };

        if let Some(cert) = &self.cert {
            config.cert_path = cert.clone();
        }
        if let Some(key) = &self.key {
            config.key_path = key.clone();
        }
        if let Some(hostport) = &self.hostport {
            config.endpoint = hostport.clone();
        }
        if let Some(requester) = &self.requesterid {
            config.requester_id = requester.clone();
        }
        if let Some(path) = &self.ca_bundle {
            config.server_verification = ServerVerification::CaBundle { path: path.clone() };
        }
        config.debug = DebugOptions {
            print_payload: config.debug.print_payload || self.print_payload,
            print_headers: config.debug.print_headers || self.print_headers,
        };

        config.validate()?;
        Ok(config)
    }
}
