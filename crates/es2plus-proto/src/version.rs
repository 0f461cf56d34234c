//! Admin protocol identification.
//!
//! Every ES2+ request carries `X-Admin-Protocol: gsma/rsp/v<major>.<minor>.<patch>`
//! and a conforming endpoint echoes the version it speaks in the response.

/// HTTP header naming the admin protocol version.
pub const ADMIN_PROTOCOL_HEADER: &str = "X-Admin-Protocol";

/// Admin protocol version sent with every request.
pub const ADMIN_PROTOCOL: &str = "gsma/rsp/v2.0.0";

/// Content type of every ES2+ request body.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Major version component. Endpoints with a different major version are incompatible.
pub const MAJOR: u32 = 2;

const PROTOCOL_PREFIX: &str = "gsma/rsp/v";

/// Returns true if an endpoint announcing `their_protocol` speaks a
/// wire-compatible admin protocol.
///
/// Only the major version must match; minor and patch revisions add optional
/// fields the client ignores.
pub fn is_compatible(their_protocol: &str) -> bool {
    let Some(version) = their_protocol.trim().strip_prefix(PROTOCOL_PREFIX) else {
        return false;
    };
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() != 3 || parts.iter().any(|p| p.parse::<u32>().is_err()) {
        return false;
    }
    parts[0].parse::<u32>() == Ok(MAJOR)
}
