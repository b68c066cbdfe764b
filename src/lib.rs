//! ssl-tool - X.509 artifact management for a single domain
//!
//! Generates an RSA private key and Certificate Signing Request, reads subject
//! metadata back out of certificates and CSRs, reports certificate expiry and
//! fingerprints, and checks that a key, CSR and certificate belong together.
//!
//! # Overview
//!
//! Every operation is a short, stateless sequence: read the file(s), decode the
//! PEM block, compute, return. Nothing is cached between calls.
//!
//! ```text
//! pem_codec ──► artifact ──┬──► subject      (extract-info)
//!                          ├──► expiry       (check-expiration)
//!                          ├──► fingerprint  (fingerprint)
//!                          └──► verify       (verify-hashes)
//! generator ──► pem_codec                    (generate-csr)
//! ```
//!
//! # Quick Start
//!
//! ```bash
//! ssl-tool generate-csr --domain example.com --country US \
//!     --locality "New York" --organization TestOrg
//! # -> example_com/example_com.key, example_com/example_com.csr
//!
//! ssl-tool verify-hashes --key example_com/example_com.key \
//!     --csr example_com/example_com.csr --cert example_com/example_com.crt
//! ```
//!
//! # Module Overview
//!
//! ## [`generator`]
//!
//! Validates [`generator::SubjectParams`] and writes a 2048-bit RSA key and a
//! SHA-256 signed CSR under a directory named after the domain (`.` → `_`).
//!
//! ```no_run
//! use ssl_tool::generator::{generate, SubjectParams};
//!
//! let params = SubjectParams::new("my.test.com", "US", "New York", "TestOrg");
//! let generated = generate(&params)?;
//! assert!(generated.key_path().ends_with("my_test_com/my_test_com.key"));
//! # Ok::<(), ssl_tool::error::SslToolError>(())
//! ```
//!
//! ## [`subject`]
//!
//! Reads CN, country, locality, organization and e-mail from a certificate or
//! CSR. Multi-valued attributes keep only their first value.
//!
//! ## [`expiry`] and [`fingerprint`]
//!
//! ```no_run
//! use ssl_tool::{expiry, fingerprint};
//!
//! let days = expiry::days_until_expiry_file("example_com/example_com.crt")?;
//! let fp = fingerprint::fingerprint_file("example_com/example_com.crt")?;
//! println!("expires in {} days, SHA256 {}", days, fp);
//! # Ok::<(), ssl_tool::error::SslToolError>(())
//! ```
//!
//! ## [`verify`]
//!
//! Hashes the public key carried by the key, the CSR and the certificate and
//! reports whether all three agree. A mismatch is a normal result.
//!
//! ## [`config`]
//!
//! TOML file with subject defaults for the command-line tool. The library
//! operations never read it; the CLI resolves defaults before calling in.
//!
//! # Error Handling
//!
//! Library operations return [`error::SslToolError`], which tells apart
//! malformed PEM, a wrong artifact kind, invalid subject fields, I/O failures
//! and DER parse failures. The config layer and the binary use `anyhow`.

pub mod artifact;
pub mod config;
pub mod error;
pub mod expiry;
pub mod fingerprint;
pub mod generator;
pub mod pem_codec;
pub mod subject;
pub mod verify;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Result, SslToolError};
pub use pem_codec::{PemArtifact, PemKind};
