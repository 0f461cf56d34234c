//! Error types for the ES2+ protocol layer.
//!
//! Declared execution statuses are not errors at this level; whether a
//! non-success status fails an operation is decided by the client.

use thiserror::Error;

/// Errors that can occur within the `es2plus-proto` crate.
#[derive(Debug, Error)]
pub enum ProtoError {
    // --- Correlation ---
    #[error("failed to generate function call identifier: {0}")]
    CallIdentifier(String),

    // --- Serialization ---
    #[error("failed to encode {operation} request: {source}")]
    Encode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    // --- Credentials / TLS ---
    #[error("failed to load client credentials: {0}")]
    Credentials(String),

    #[error("failed to load CA bundle: {0}")]
    CaBundle(String),

    #[error("TLS configuration error: {0}")]
    TlsConfiguration(String),
}

/// Result type alias using [`ProtoError`].
pub type Result<T> = std::result::Result<T, ProtoError>;
