//! Consistency check across a private key, CSR and certificate.
//!
//! Each artifact is reduced to a SHA-256 digest of the DER SubjectPublicKeyInfo
//! it carries: the public half of the private key, the CSR's requested public
//! key, and the certificate's subject public key. The triple is consistent when
//! all three digests are equal. A certificate with a different key algorithm
//! (e.g. ECDSA) is just a mismatch.
//!
//! This is the same comparison as `openssl pkey -pubout` / `openssl req
//! -pubkey` / `openssl x509 -pubkey` piped through a digest. It shows the three
//! files refer to the same key pair; it does not check signatures or that the
//! certificate was issued for this CSR.

use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::Result;
use crate::pem_codec::{self, PemKind};

/// Per-artifact public key digests, lowercase hex
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModulusHashes {
    pub key: String,
    pub csr: String,
    pub cert: String,
}

/// Outcome of a consistency check
///
/// A mismatch is reported here, not as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    #[serde(rename = "match")]
    pub matched: bool,
    pub hashes: ModulusHashes,
}

/// Compare the key, CSR and certificate PEM inputs
///
/// # Errors
/// * `WrongArtifactKind` - an input is not the kind its position requires;
///   `role` is `key`, `csr` or `cert`
/// * `MalformedInput` / `UnsupportedPemKind` / `ParseFailure` - an input
///   could not be decoded
pub fn verify(key_bytes: &[u8], csr_bytes: &[u8], cert_bytes: &[u8]) -> Result<VerifyReport> {
    let hashes = ModulusHashes {
        key: public_key_hash(key_bytes, "key", PemKind::PrivateKey)?,
        csr: public_key_hash(csr_bytes, "csr", PemKind::CertificateSigningRequest)?,
        cert: public_key_hash(cert_bytes, "cert", PemKind::Certificate)?,
    };
    let matched = hashes.key == hashes.csr && hashes.csr == hashes.cert;
    Ok(VerifyReport { matched, hashes })
}

/// Read the three files and compare them
pub fn verify_files(
    key_path: impl AsRef<Path>,
    csr_path: impl AsRef<Path>,
    cert_path: impl AsRef<Path>,
) -> Result<VerifyReport> {
    let report = verify(
        &pem_codec::read_file(key_path)?,
        &pem_codec::read_file(csr_path)?,
        &pem_codec::read_file(cert_path)?,
    )?;
    if report.matched {
        info!(hash = %report.hashes.key, "key, CSR and certificate are consistent");
    } else {
        info!(
            key = %report.hashes.key,
            csr = %report.hashes.csr,
            cert = %report.hashes.cert,
            "public key hashes do not match"
        );
    }
    Ok(report)
}

fn public_key_hash(bytes: &[u8], role: &'static str, expected: PemKind) -> Result<String> {
    let artifact = pem_codec::decode_expecting(bytes, role, expected)?;
    let public_key = artifact.parse()?.public_key_der()?;
    Ok(hex::encode(Sha256::digest(&public_key)))
}
