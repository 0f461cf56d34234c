//! ES2+ wire protocol definitions.
//!
//! Shared protocol layer consumed by `es2plus-client-core`:
//!
//! - JSON request/response envelopes for the ES2+ profile functions
//! - Function call identifier generation and the JSON codec
//! - Client credential loading and rustls configuration for mTLS
//! - Profile lifecycle states and the activation transition table

pub mod codec;
pub mod credentials;
pub mod error;
pub mod lifecycle;
pub mod tls;
pub mod version;
pub mod wire;

pub use error::ProtoError;
