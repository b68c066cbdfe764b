//! SHA-256 certificate fingerprints.

use std::path::Path;

use openssl::x509::X509;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::{Result, SslToolError};
use crate::pem_codec::{self, PemKind};

/// Lowercase hex SHA-256 over the certificate's DER bytes
///
/// The digest covers the exact payload of the PEM block. The payload must
/// still parse as a certificate.
pub fn fingerprint(cert_bytes: &[u8]) -> Result<String> {
    let artifact = pem_codec::decode_expecting(cert_bytes, "cert", PemKind::Certificate)?;
    X509::from_der(artifact.payload()).map_err(SslToolError::parse("certificate"))?;
    Ok(hex::encode(Sha256::digest(artifact.payload())))
}

pub fn fingerprint_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let fp = fingerprint(&pem_codec::read_file(path)?)?;
    info!(file = %path.display(), fingerprint = %fp, "computed certificate fingerprint");
    Ok(fp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pem_codec::PemArtifact;
    use crate::test_support;
    use openssl::hash::MessageDigest;

    #[test]
    fn test_deterministic_and_matches_openssl() {
        let pem = test_support::standalone_certificate_pem("fp.example.com", 365);
        let first = fingerprint(&pem).unwrap();
        let second = fingerprint(&pem).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));

        let cert = X509::from_pem(&pem).unwrap();
        let expected = cert.digest(MessageDigest::sha256()).unwrap();
        assert_eq!(first, hex::encode(&*expected));
    }

    #[test]
    fn test_one_byte_change_changes_fingerprint() {
        let pem = test_support::standalone_certificate_pem("fp.example.com", 365);
        let original = pem_codec::decode(&pem).unwrap();

        // Flip a bit in the trailing signature so the DER stays well-formed
        let mut payload = original.payload().to_vec();
        let last = payload.len() - 1;
        payload[last] ^= 0x01;
        let altered = pem_codec::encode(&PemArtifact::new(PemKind::Certificate, payload));

        assert_ne!(
            fingerprint(&pem).unwrap(),
            fingerprint(altered.as_bytes()).unwrap()
        );
    }

    #[test]
    fn test_distinct_certificates_differ() {
        let a = test_support::standalone_certificate_pem("a.example.com", 365);
        let b = test_support::standalone_certificate_pem("a.example.com", 365);
        assert_ne!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn test_key_is_wrong_kind() {
        let (key, _) = test_support::key_and_csr("example.com", "US", "X", "Y");
        let pem = key.rsa().unwrap().private_key_to_pem().unwrap();
        assert!(matches!(
            fingerprint(&pem),
            Err(SslToolError::WrongArtifactKind {
                found: PemKind::PrivateKey,
                ..
            })
        ));
    }

    #[test]
    fn test_unparseable_certificate() {
        let pem = pem_codec::encode(&PemArtifact::new(PemKind::Certificate, vec![1, 2, 3, 4]));
        assert!(matches!(
            fingerprint(pem.as_bytes()),
            Err(SslToolError::ParseFailure { .. })
        ));
    }
}
