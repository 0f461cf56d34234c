//! TLS configuration for the ES2+ HTTPS channel.
//!
//! - Client config builder (client certificate + server verification mode)
//! - A server certificate verifier that skips chain validation, for endpoints
//!   operated with verification explicitly disabled

pub mod config;
pub mod verifier;

pub use config::{build_client_tls_config, ServerVerification};
