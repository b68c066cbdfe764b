//! PEM framing for the three artifact kinds the tool works with.
//!
//! A file is read as a single artifact: the first PEM block wins, anything
//! around it is ignored. Only the block tag decides the artifact kind; the
//! payload is not interpreted here (see [`crate::artifact`] for that).

use std::fmt;
use std::path::Path;

use pem::{EncodeConfig, LineEnding, Pem};
use tracing::debug;

use crate::error::{Result, SslToolError};

const TAG_PRIVATE_KEY: &str = "RSA PRIVATE KEY";
const TAG_CSR: &str = "CERTIFICATE REQUEST";
const TAG_CERTIFICATE: &str = "CERTIFICATE";

/// Kind of a PEM artifact, identified by its header tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PemKind {
    /// PKCS#1 RSA private key (`RSA PRIVATE KEY`)
    PrivateKey,
    /// PKCS#10 request (`CERTIFICATE REQUEST`)
    CertificateSigningRequest,
    /// X.509 certificate (`CERTIFICATE`)
    Certificate,
}

impl PemKind {
    /// The tag used in the `-----BEGIN <tag>-----` line
    pub fn tag(self) -> &'static str {
        match self {
            PemKind::PrivateKey => TAG_PRIVATE_KEY,
            PemKind::CertificateSigningRequest => TAG_CSR,
            PemKind::Certificate => TAG_CERTIFICATE,
        }
    }

    /// Map a PEM tag back to a kind. Matching is exact.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            TAG_PRIVATE_KEY => Some(PemKind::PrivateKey),
            TAG_CSR => Some(PemKind::CertificateSigningRequest),
            TAG_CERTIFICATE => Some(PemKind::Certificate),
            _ => None,
        }
    }
}

impl fmt::Display for PemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One decoded PEM block: its kind and the raw DER payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PemArtifact {
    kind: PemKind,
    payload: Vec<u8>,
}

impl PemArtifact {
    pub fn new(kind: PemKind, payload: Vec<u8>) -> Self {
        Self { kind, payload }
    }

    pub fn kind(&self) -> PemKind {
        self.kind
    }

    /// The exact bytes carried inside the PEM block
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

/// Decode the first PEM block found in `bytes`
///
/// # Errors
/// * `MalformedInput` - no block could be decoded
/// * `UnsupportedPemKind` - the block tag is not one of the three known kinds
pub fn decode(bytes: &[u8]) -> Result<PemArtifact> {
    let block = pem::parse(bytes).map_err(|e| {
        SslToolError::MalformedInput(format!("failed to parse PEM block: {}", e))
    })?;

    let kind = PemKind::from_tag(block.tag())
        .ok_or_else(|| SslToolError::UnsupportedPemKind(block.tag().to_string()))?;

    debug!(kind = %kind, bytes = block.contents().len(), "decoded PEM block");
    Ok(PemArtifact::new(kind, block.into_contents()))
}

/// Decode `bytes` and require the block to be of kind `expected`
///
/// `role` names the input in the error (e.g. "key", "cert") so callers that
/// take several files can tell which one was wrong.
pub fn decode_expecting(
    bytes: &[u8],
    role: &'static str,
    expected: PemKind,
) -> Result<PemArtifact> {
    let artifact = decode(bytes)?;
    if artifact.kind() != expected {
        return Err(SslToolError::WrongArtifactKind {
            role,
            expected,
            found: artifact.kind(),
        });
    }
    Ok(artifact)
}

/// Encode an artifact with the canonical header/footer for its kind
///
/// Output uses LF line endings and 64-column base64 lines.
pub fn encode(artifact: &PemArtifact) -> String {
    let block = Pem::new(artifact.kind().tag(), artifact.payload());
    pem::encode_config(&block, EncodeConfig::new().set_line_ending(LineEnding::LF))
}

/// Read a whole file into memory
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    std::fs::read(path).map_err(|e| SslToolError::io(path, e))
}

/// Write an artifact as PEM to `path`, replacing any existing file
pub fn write_file(path: impl AsRef<Path>, artifact: &PemArtifact) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, encode(artifact)).map_err(|e| SslToolError::io(path, e))
}
