//! Subject metadata extraction from certificates and CSRs.
//!
//! Every multi-valued name attribute collapses to its first value (or `""`
//! when absent). This is intentionally lossy: the result feeds the config
//! defaults, which hold a single value per field.

use std::path::Path;

use openssl::nid::Nid;
use openssl::x509::X509NameRef;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::artifact::{first_entry, ParsedArtifact};
use crate::error::{Result, SslToolError};
use crate::pem_codec::{self, PemArtifact, PemKind};

/// Key size reported in extracted metadata. Not measured from the key.
pub const KEY_SIZE_HINT: u32 = 2048;

/// Subject fields read back from a certificate or CSR
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    pub domain: String,
    pub country: String,
    pub locality: String,
    pub organization: String,
    pub email: String,
    pub key_size_hint: u32,
}

/// Extract subject metadata from a certificate or CSR artifact
///
/// # Errors
/// * `UnsupportedPemKind` - the artifact is a private key
/// * `ParseFailure` - the payload is not a valid certificate/CSR
pub fn extract(artifact: &PemArtifact) -> Result<ExtractedMetadata> {
    if artifact.kind() == PemKind::PrivateKey {
        return Err(SslToolError::UnsupportedPemKind(
            artifact.kind().tag().to_string(),
        ));
    }
    let parsed = artifact.parse()?;
    extract_parsed(&parsed)
}

/// Read a PEM file and extract its subject metadata
pub fn extract_file(path: impl AsRef<Path>) -> Result<ExtractedMetadata> {
    let path = path.as_ref();
    let artifact = pem_codec::decode(&pem_codec::read_file(path)?)?;
    let metadata = extract(&artifact)?;
    info!(
        file = %path.display(),
        kind = %artifact.kind(),
        domain = %metadata.domain,
        "extracted subject"
    );
    Ok(metadata)
}

fn extract_parsed(parsed: &ParsedArtifact) -> Result<ExtractedMetadata> {
    let subject = parsed
        .subject_name()
        .ok_or_else(|| SslToolError::UnsupportedPemKind(parsed.kind().tag().to_string()))?;

    Ok(ExtractedMetadata {
        domain: first_entry(subject, Nid::COMMONNAME),
        country: first_entry(subject, Nid::COUNTRYNAME),
        locality: first_entry(subject, Nid::LOCALITYNAME),
        organization: first_entry(subject, Nid::ORGANIZATIONNAME),
        email: parsed.email_addresses().into_iter().next().unwrap_or_default(),
        key_size_hint: KEY_SIZE_HINT,
    })
}

/// Human-readable summary of a certificate or CSR
///
/// Certificates also list the issuer CN and validity window.
pub fn describe(parsed: &ParsedArtifact) -> Result<String> {
    let subject = parsed
        .subject_name()
        .ok_or_else(|| SslToolError::UnsupportedPemKind(parsed.kind().tag().to_string()))?;

    let heading = match parsed {
        ParsedArtifact::Certificate(_) => "Certificate Info:",
        _ => "CSR Info:",
    };
    let mut out = format!(
        "{}\n- Common Name: {}\n- Organization: {}\n- Locality: {}\n- Country: {}\n",
        heading,
        first_entry(subject, Nid::COMMONNAME),
        all_entries(subject, Nid::ORGANIZATIONNAME),
        all_entries(subject, Nid::LOCALITYNAME),
        all_entries(subject, Nid::COUNTRYNAME),
    );

    if let ParsedArtifact::Certificate(cert) = parsed {
        out.push_str(&format!(
            "- Issuer: {}\n- Valid From: {}\n- Valid To: {}\n",
            first_entry(cert.issuer_name(), Nid::COMMONNAME),
            cert.not_before(),
            cert.not_after()
        ));
    }
    Ok(out)
}

fn all_entries(name: &X509NameRef, nid: Nid) -> String {
    let values: Vec<String> = name
        .entries_by_nid(nid)
        .filter_map(|e| e.data().as_utf8().ok().map(|s| s.to_string()))
        .collect();
    format!("[{}]", values.join(" "))
}
