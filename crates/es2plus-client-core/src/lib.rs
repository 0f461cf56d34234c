//! ES2+ client core.
//!
//! Provides the blocking protocol client consumed by operator tooling:
//!
//! - HTTPS transport to one administration endpoint over mutual TLS
//! - The five profile functions (status, recover, cancel, download, confirm)
//! - Profile activation across the AVAILABLE → ALLOCATED → RELEASED lifecycle
//!
//! Every call is synchronous and makes exactly the round trips it documents;
//! nothing is retried or cached.

pub mod activation;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use activation::{Activation, Disposition};
pub use client::Es2PlusClient;
pub use config::{ClientConfig, DebugOptions};
pub use error::ClientError;
pub use transport::{HttpsTransport, Transport};
