//! Client credentials for ES2+ mutual TLS.
//!
//! The administration endpoint authenticates the operator by the client
//! certificate presented during the TLS handshake. The certificate chain and
//! private key are read from PEM files once, when the client is constructed;
//! a client without valid credentials cannot be built.
//!
//! The leaf certificate is parsed with `x509-parser` so that a file holding
//! something other than an X.509 certificate is rejected at load time rather
//! than during the first handshake.

use std::fmt;
use std::path::Path;

use rustls_pki_types::pem::PemObject;
use rustls_pki_types::{CertificateDer, PrivateKeyDer};
use tracing::{info, warn};
use x509_parser::prelude::*;

use crate::error::{ProtoError, Result};

/// Certificate chain and private key presented to the administration endpoint.
pub struct ClientCredentials {
    cert_chain: Vec<CertificateDer<'static>>,
    private_key: PrivateKeyDer<'static>,
    subject: String,
    not_after: String,
}

impl ClientCredentials {
    /// Load a PEM certificate chain (leaf first) and a PEM private key
    /// (PKCS#8, PKCS#1 or SEC1).
    pub fn from_pem_files(cert_path: &Path, key_path: &Path) -> Result<Self> {
        let cert_chain = CertificateDer::pem_file_iter(cert_path)
            .map_err(|e| ProtoError::Credentials(format!("{}: {e}", cert_path.display())))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ProtoError::Credentials(format!("{}: {e}", cert_path.display())))?;

        let private_key = PrivateKeyDer::from_pem_file(key_path)
            .map_err(|e| ProtoError::Credentials(format!("{}: {e}", key_path.display())))?;

        let credentials = Self::from_der(cert_chain, private_key)?;
        info!(
            cert = %cert_path.display(),
            subject = %credentials.subject,
            not_after = %credentials.not_after,
            "loaded ES2+ client credentials"
        );
        Ok(credentials)
    }

    /// Build credentials from already-decoded DER material.
    pub fn from_der(
        cert_chain: Vec<CertificateDer<'static>>,
        private_key: PrivateKeyDer<'static>,
    ) -> Result<Self> {
        let leaf = cert_chain
            .first()
            .ok_or_else(|| ProtoError::Credentials("certificate chain is empty".into()))?;

        let (_, cert) = X509Certificate::from_der(leaf.as_ref())
            .map_err(|e| ProtoError::Credentials(format!("X.509 parse error: {e}")))?;

        let subject = cert.subject().to_string();
        let not_after = cert.validity().not_after.to_string();
        if !cert.validity().is_valid() {
            warn!(%subject, %not_after, "client certificate is outside its validity period");
        }

        Ok(Self {
            cert_chain,
            private_key,
            subject,
            not_after,
        })
    }

    /// The certificate chain, leaf first.
    pub fn cert_chain(&self) -> &[CertificateDer<'static>] {
        &self.cert_chain
    }

    /// A copy of the private key, as rustls takes ownership of it.
    pub fn private_key(&self) -> PrivateKeyDer<'static> {
        self.private_key.clone_key()
    }

    /// Subject distinguished name of the leaf certificate.
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("subject", &self.subject)
            .field("not_after", &self.not_after)
            .field("chain_len", &self.cert_chain.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rcgen::{generate_simple_self_signed, CertifiedKey};
    use tempfile::TempDir;

    use super::*;

    fn write_identity(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
        let CertifiedKey { cert, key_pair } =
            generate_simple_self_signed(vec!["operator.example".to_string()]).expect("rcgen");
        let cert_path = dir.path().join("client.crt");
        let key_path = dir.path().join("client.key");
        fs::write(&cert_path, cert.pem()).unwrap();
        fs::write(&key_path, key_pair.serialize_pem()).unwrap();
        (cert_path, key_path)
    }

    #[test]
    fn loads_rcgen_identity() {
        let dir = TempDir::new().unwrap();
        let (cert_path, key_path) = write_identity(&dir);

        let creds = ClientCredentials::from_pem_files(&cert_path, &key_path)
            .expect("credentials should load");

        assert_eq!(creds.cert_chain().len(), 1);
        assert!(creds.subject().contains("rcgen"));
        assert!(matches!(creds.private_key(), PrivateKeyDer::Pkcs8(_)));
    }

    #[test]
    fn missing_cert_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (_, key_path) = write_identity(&dir);

        let err = ClientCredentials::from_pem_files(&dir.path().join("absent.crt"), &key_path)
            .expect_err("should fail");
        assert!(matches!(err, ProtoError::Credentials(_)));
        assert!(err.to_string().contains("absent.crt"));
    }

    #[test]
    fn cert_file_without_certificates_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (_, key_path) = write_identity(&dir);
        let empty = dir.path().join("empty.crt");
        fs::write(&empty, "not a pem file\n").unwrap();

        let err = ClientCredentials::from_pem_files(&empty, &key_path).expect_err("should fail");
        assert!(err.to_string().contains("certificate chain is empty"));
    }

    #[test]
    fn key_file_holding_a_certificate_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (cert_path, _) = write_identity(&dir);

        let err =
            ClientCredentials::from_pem_files(&cert_path, &cert_path).expect_err("should fail");
        assert!(matches!(err, ProtoError::Credentials(_)));
    }

    #[test]
    fn garbage_der_is_rejected() {
        let key = PrivateKeyDer::Pkcs8(vec![0u8; 16].into());
        let err = ClientCredentials::from_der(vec![CertificateDer::from(vec![1u8, 2, 3])], key)
            .expect_err("should fail");
        assert!(err.to_string().contains("X.509 parse error"));
    }

    #[test]
    fn debug_output_hides_key_material() {
        let dir = TempDir::new().unwrap();
        let (cert_path, key_path) = write_identity(&dir);
        let creds = ClientCredentials::from_pem_files(&cert_path, &key_path).unwrap();

        let debug = format!("{creds:?}");
        assert!(debug.contains("subject"));
        assert!(!debug.contains("private_key"));
    }
}
