//! Private key and CSR generation for a single domain.
//!
//! Output layout for domain `my.test.com`:
//! ```text
//! my_test_com/
//!   ├── my_test_com.key   (PKCS#1 "RSA PRIVATE KEY" PEM)
//!   └── my_test_com.csr   (PKCS#10 "CERTIFICATE REQUEST" PEM)
//! ```
//!
//! Re-running for the same domain overwrites both files. If writing the CSR
//! fails after the key was written, the key file is left in place.
//!
//! # Example
//! ```rust,no_run
//! use ssl_tool::generator::{KeyCsrGenerator, SubjectParams};
//! # fn example() -> ssl_tool::error::Result<()> {
//! let params = SubjectParams::new("example.com", "US", "New York", "TestOrg");
//! let generated = KeyCsrGenerator::new(params).output_root("certs").generate()?;
//! println!("CSR written to {}", generated.csr_path().display());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::x509::{X509Name, X509NameRef, X509Req};
use secrecy::{ExposeSecret, SecretBox};
use tracing::{debug, info};

use crate::error::{Result, SslToolError};
use crate::pem_codec::{self, PemArtifact, PemKind};

/// RSA modulus size for generated keys
pub const RSA_KEY_SIZE: u32 = 2048;
const X509_REQ_VERSION_1: i32 = 0; // PKCS#10 v1 is represented by 0

/// Subject fields bound into the CSR
///
/// Values are used as given; the country code is not upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectParams {
    pub domain: String,
    pub country: String,
    pub locality: String,
    pub organization: String,
}

impl SubjectParams {
    pub fn new(
        domain: impl Into<String>,
        country: impl Into<String>,
        locality: impl Into<String>,
        organization: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            country: country.into(),
            locality: locality.into(),
            organization: organization.into(),
        }
    }

    /// Check every field, in declaration order
    ///
    /// # Errors
    /// `InvalidParameter` naming the first field that fails:
    /// - `domain` must be non-empty
    /// - `country` must be exactly two ASCII letters
    /// - `locality` and `organization` must be non-empty after trimming
    pub fn validate(&self) -> Result<()> {
        if self.domain.is_empty() {
            return Err(SslToolError::invalid("domain", "cannot be empty"));
        }
        if self.country.chars().count() != 2 {
            return Err(SslToolError::invalid("country", "must be 2 letters"));
        }
        if !self.country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(SslToolError::invalid(
                "country",
                "must be alphabetic 2-letter code",
            ));
        }
        if self.locality.trim().is_empty() {
            return Err(SslToolError::invalid("locality", "cannot be empty"));
        }
        if self.organization.trim().is_empty() {
            return Err(SslToolError::invalid("organization", "cannot be empty"));
        }
        Ok(())
    }

    /// Directory and file base name for this domain
    pub fn sanitized_domain(&self) -> String {
        sanitize_domain(&self.domain)
    }
}

/// Replace every `.` in `domain` with `_`
pub fn sanitize_domain(domain: &str) -> String {
    domain.replace('.', "_")
}

/// Result of a generation run: the key material and where it was written
pub struct GeneratedKeyPair {
    // PKCS#1 DER, zeroized on drop
    private_key: SecretBox<Vec<u8>>,
    csr: PemArtifact,
    output_dir: PathBuf,
    key_path: PathBuf,
    csr_path: PathBuf,
}

impl GeneratedKeyPair {
    /// PEM encoding of the private key, identical to the written key file
    pub fn private_key_pem(&self) -> String {
        pem_codec::encode(&PemArtifact::new(
            PemKind::PrivateKey,
            self.private_key.expose_secret().clone(),
        ))
    }

    pub fn csr(&self) -> &PemArtifact {
        &self.csr
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    pub fn csr_path(&self) -> &Path {
        &self.csr_path
    }
}

impl fmt::Debug for GeneratedKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedKeyPair")
            .field("private_key", &"<redacted>")
            .field("csr", &self.csr.kind())
            .field("key_path", &self.key_path)
            .field("csr_path", &self.csr_path)
            .finish()
    }
}

/// Builder for a key + CSR generation run
pub struct KeyCsrGenerator {
    params: SubjectParams,
    output_root: PathBuf,
}

impl KeyCsrGenerator {
    /// Create a generator writing under the current directory
    pub fn new(params: SubjectParams) -> Self {
        Self {
            params,
            output_root: PathBuf::from("."),
        }
    }

    /// Set the directory under which the per-domain directory is created
    pub fn output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    /// Validate, generate the RSA key and signed CSR, and write both files
    ///
    /// # Errors
    /// * `InvalidParameter` - a subject field failed validation; nothing is written
    /// * `Crypto` - key generation or CSR signing failed
    /// * `Io` - directory creation or a file write failed
    pub fn generate(self) -> Result<GeneratedKeyPair> {
        self.params.validate()?;

        let base_name = self.params.sanitized_domain();
        let output_dir = self.output_root.join(&base_name);
        std::fs::create_dir_all(&output_dir).map_err(|e| SslToolError::io(&output_dir, e))?;

        let rsa = Rsa::generate(RSA_KEY_SIZE)
            .map_err(SslToolError::crypto("Failed to generate RSA keypair"))?;
        let key_der = rsa
            .private_key_to_der()
            .map_err(SslToolError::crypto("Failed to encode private key"))?;
        let private_key =
            PKey::from_rsa(rsa).map_err(SslToolError::crypto("Failed to create private key"))?;
        debug!(bits = RSA_KEY_SIZE, "generated RSA keypair");

        let request = build_csr(&self.params, &private_key)?;
        let csr = PemArtifact::new(
            PemKind::CertificateSigningRequest,
            request
                .to_der()
                .map_err(SslToolError::crypto("Failed to encode CSR"))?,
        );

        let key_path = output_dir.join(format!("{}.key", base_name));
        pem_codec::write_file(
            &key_path,
            &PemArtifact::new(PemKind::PrivateKey, key_der.clone()),
        )?;

        let csr_path = output_dir.join(format!("{}.csr", base_name));
        pem_codec::write_file(&csr_path, &csr)?;

        info!(
            key = %key_path.display(),
            csr = %csr_path.display(),
            "generated private key and CSR"
        );

        Ok(GeneratedKeyPair {
            private_key: SecretBox::new(Box::new(key_der)),
            csr,
            output_dir,
            key_path,
            csr_path,
        })
    }
}

/// Generate a key and CSR under the current directory
pub fn generate(params: &SubjectParams) -> Result<GeneratedKeyPair> {
    KeyCsrGenerator::new(params.clone()).generate()
}

/// Subject name CN=domain, C=country, L=locality, O=organization
pub(crate) fn subject_name(params: &SubjectParams) -> Result<X509Name> {
    let mut name_builder =
        X509Name::builder().map_err(SslToolError::crypto("Failed to create name builder"))?;
    name_builder
        .append_entry_by_nid(Nid::COMMONNAME, &params.domain)
        .map_err(SslToolError::crypto("Failed to set CN"))?;
    name_builder
        .append_entry_by_nid(Nid::COUNTRYNAME, &params.country)
        .map_err(SslToolError::crypto("Failed to set country"))?;
    name_builder
        .append_entry_by_nid(Nid::LOCALITYNAME, &params.locality)
        .map_err(SslToolError::crypto("Failed to set locality"))?;
    name_builder
        .append_entry_by_nid(Nid::ORGANIZATIONNAME, &params.organization)
        .map_err(SslToolError::crypto("Failed to set organization"))?;
    Ok(name_builder.build())
}

/// Build a PKCS#10 request for `params`, signed with SHA-256/RSA
pub(crate) fn build_csr(params: &SubjectParams, key: &PKey<Private>) -> Result<X509Req> {
    let name = subject_name(params)?;
    sign_request(&name, key)
}

pub(crate) fn sign_request(name: &X509NameRef, key: &PKey<Private>) -> Result<X509Req> {
    let mut builder =
        X509Req::builder().map_err(SslToolError::crypto("Failed to create CSR builder"))?;
    builder
        .set_version(X509_REQ_VERSION_1)
        .map_err(SslToolError::crypto("Failed to set CSR version"))?;
    builder
        .set_subject_name(name)
        .map_err(SslToolError::crypto("Failed to set subject"))?;
    builder
        .set_pubkey(key)
        .map_err(SslToolError::crypto("Failed to set public key"))?;
    builder
        .sign(key, MessageDigest::sha256())
        .map_err(SslToolError::crypto("Failed to sign CSR"))?;
    Ok(builder.build())
}
