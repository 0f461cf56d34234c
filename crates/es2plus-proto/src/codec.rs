//! JSON envelope codec and function call identifiers.
//!
//! ES2+ bodies are plain JSON documents. Encoding happens before any network
//! activity, so an encode failure never reaches the endpoint. Decoding is
//! strict about the response header: a body without
//! `header.functionExecutionStatus.status` is a schema mismatch.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Builder;

use crate::error::{ProtoError, Result};
use crate::wire::{Operation, RequestHeader};

/// Generate a fresh function call identifier.
///
/// The identifier is a random (v4) UUID rendered as a URN
/// (`urn:uuid:xxxxxxxx-...`). Randomness comes from the OS CSPRNG; if it is
/// unavailable the error is returned rather than falling back to a weaker
/// source.
pub fn new_call_identifier() -> Result<String> {
    let mut bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| ProtoError::CallIdentifier(e.to_string()))?;
    Ok(Builder::from_random_bytes(bytes).into_uuid().urn().to_string())
}

/// Build the header for one outbound message.
///
/// Every call yields a new call identifier, including calls a caller
/// considers a retry of an earlier message.
pub fn build_header(requester_identifier: &str) -> Result<RequestHeader> {
    Ok(RequestHeader {
        function_requester_identifier: requester_identifier.to_string(),
        function_call_identifier: new_call_identifier()?,
    })
}

/// Serialize a request envelope to JSON bytes.
pub fn encode<T: Serialize>(operation: Operation, payload: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(payload).map_err(|source| ProtoError::Encode {
        operation: operation.as_str(),
        source,
    })
}

/// Deserialize a response envelope from JSON bytes.
pub fn decode<T: DeserializeOwned>(operation: Operation, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|source| ProtoError::Decode {
        operation: operation.as_str(),
        source,
    })
}
