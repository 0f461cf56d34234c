//! rustls client configuration for the administration endpoint.
//!
//! The builder enforces:
//! - Ring crypto provider
//! - rustls safe default protocol versions (TLS 1.2 and 1.3)
//! - A client certificate on every connection (mTLS)
//! - An explicit choice of how the server certificate is verified

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustls::client::danger::ServerCertVerifier;
use rustls::RootCertStore;
use rustls_pki_types::pem::PemObject;
use rustls_pki_types::CertificateDer;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::credentials::ClientCredentials;
use crate::error::{ProtoError, Result};
use crate::tls::verifier::AcceptAnyServerCert;

/// How the administration endpoint's certificate is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ServerVerification {
    /// Accept any server certificate. Handshake signatures are still checked,
    /// but the chain and host name are not. Logged as a warning every time a
    /// config is built with it.
    #[default]
    Disabled,
    /// Verify the server chain and host name against the CA certificates in
    /// a PEM bundle.
    CaBundle { path: PathBuf },
}

/// Build a `rustls::ClientConfig` presenting `credentials` and checking the
/// server according to `verification`.
pub fn build_client_tls_config(
    credentials: &ClientCredentials,
    verification: &ServerVerification,
) -> Result<rustls::ClientConfig> {
    let builder = rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(|e| ProtoError::TlsConfiguration(format!("TLS version config: {e}")))?;

    let builder = match verification {
        ServerVerification::Disabled => {
            warn!("ES2+ server certificate verification is disabled");
            let verifier: Arc<dyn ServerCertVerifier> = Arc::new(AcceptAnyServerCert::new());
            builder
                .dangerous()
                .with_custom_certificate_verifier(verifier)
        }
        ServerVerification::CaBundle { path } => {
            builder.with_root_certificates(load_ca_bundle(path)?)
        }
    };

    builder
        .with_client_auth_cert(credentials.cert_chain().to_vec(), credentials.private_key())
        .map_err(|e| ProtoError::TlsConfiguration(format!("client cert config: {e}")))
}

/// Read every certificate in a PEM bundle into a root store.
fn load_ca_bundle(path: &Path) -> Result<RootCertStore> {
    let mut roots = RootCertStore::empty();
    for cert in CertificateDer::pem_file_iter(path)
        .map_err(|e| ProtoError::CaBundle(format!("{}: {e}", path.display())))?
    {
        let cert = cert.map_err(|e| ProtoError::CaBundle(format!("{}: {e}", path.display())))?;
        roots
            .add(cert)
            .map_err(|e| ProtoError::CaBundle(format!("{}: {e}", path.display())))?;
    }

    if roots.is_empty() {
        return Err(ProtoError::CaBundle(format!(
            "{}: no certificates found",
            path.display()
        )));
    }
    Ok(roots)
}
