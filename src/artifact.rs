//! Parsed form of a [`PemArtifact`].
//!
//! Each variant owns the OpenSSL object for its kind. Accessors that only make
//! sense for some kinds return `Option`.

use openssl::nid::Nid;
use openssl::pkey::Private;
use openssl::rsa::Rsa;
use openssl::x509::{X509NameRef, X509Req, X509};

use crate::error::{Result, SslToolError};
use crate::pem_codec::{PemArtifact, PemKind};

/// An artifact whose DER payload has been parsed
pub enum ParsedArtifact {
    Certificate(X509),
    CertificateSigningRequest(X509Req),
    PrivateKey(Rsa<Private>),
}

impl PemArtifact {
    /// Parse the DER payload according to the block kind
    ///
    /// # Errors
    /// `ParseFailure` if the payload is not a valid structure of that kind.
    pub fn parse(&self) -> Result<ParsedArtifact> {
        match self.kind() {
            PemKind::Certificate => X509::from_der(self.payload())
                .map(ParsedArtifact::Certificate)
                .map_err(SslToolError::parse("certificate")),
            PemKind::CertificateSigningRequest => X509Req::from_der(self.payload())
                .map(ParsedArtifact::CertificateSigningRequest)
                .map_err(SslToolError::parse("CSR")),
            PemKind::PrivateKey => Rsa::private_key_from_der(self.payload())
                .map(ParsedArtifact::PrivateKey)
                .map_err(SslToolError::parse("private key")),
        }
    }
}

impl ParsedArtifact {
    pub fn kind(&self) -> PemKind {
        match self {
            ParsedArtifact::Certificate(_) => PemKind::Certificate,
            ParsedArtifact::CertificateSigningRequest(_) => PemKind::CertificateSigningRequest,
            ParsedArtifact::PrivateKey(_) => PemKind::PrivateKey,
        }
    }

    /// Subject name of a certificate or CSR; keys have none
    pub fn subject_name(&self) -> Option<&X509NameRef> {
        match self {
            ParsedArtifact::Certificate(cert) => Some(cert.subject_name()),
            ParsedArtifact::CertificateSigningRequest(req) => Some(req.subject_name()),
            ParsedArtifact::PrivateKey(_) => None,
        }
    }

    /// E-mail addresses from the certificate's subject alternative names
    ///
    /// Always empty for CSRs and keys.
    pub fn email_addresses(&self) -> Vec<String> {
        match self {
            ParsedArtifact::Certificate(cert) => cert
                .subject_alt_names()
                .map(|names| {
                    names
                        .iter()
                        .filter_map(|name| name.email().map(|e| e.to_string()))
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// DER-encoded SubjectPublicKeyInfo of the public key the artifact carries
    ///
    /// Works for any key algorithm, so an RSA key and an EC certificate
    /// simply produce different encodings.
    ///
    /// # Errors
    /// `ParseFailure` if the embedded public key cannot be decoded.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        match self {
            ParsedArtifact::PrivateKey(rsa) => rsa
                .public_key_to_der()
                .map_err(SslToolError::crypto("Failed to encode public key")),
            ParsedArtifact::CertificateSigningRequest(req) => req
                .public_key()
                .and_then(|key| key.public_key_to_der())
                .map_err(SslToolError::parse("CSR public key")),
            ParsedArtifact::Certificate(cert) => cert
                .public_key()
                .and_then(|key| key.public_key_to_der())
                .map_err(SslToolError::parse("certificate public key")),
        }
    }
}

/// First value of a (possibly multi-valued) name attribute, or `""`
pub(crate) fn first_entry(name: &X509NameRef, nid: Nid) -> String {
    name.entries_by_nid(nid)
        .next()
        .and_then(|e| e.data().as_utf8().ok())
        .map(|s| s.to_string())
        .unwrap_or_default()
}
