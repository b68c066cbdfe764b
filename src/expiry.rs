//! Whole-day time-to-expiry for a certificate.

use std::path::Path;

use openssl::asn1::{Asn1Time, Asn1TimeRef};
use openssl::x509::X509;
use tracing::info;

use crate::error::{Result, SslToolError};
use crate::pem_codec::{self, PemKind};

const SECONDS_PER_DAY: i64 = 86_400;

/// Days from now until the certificate's `notAfter`
///
/// The difference is truncated toward zero, so a certificate expiring in
/// 9 days and 23 hours reports 9. Expired certificates give negative values.
///
/// # Errors
/// * `MalformedInput` / `UnsupportedPemKind` - not a usable PEM block
/// * `WrongArtifactKind` - the block is not a certificate
/// * `ParseFailure` - the certificate DER is invalid
pub fn days_until_expiry(cert_bytes: &[u8]) -> Result<i64> {
    let now = Asn1Time::days_from_now(0).map_err(SslToolError::crypto("Failed to read clock"))?;
    days_until_expiry_at(cert_bytes, &now)
}

/// Same as [`days_until_expiry`] with an explicit reference time
pub fn days_until_expiry_at(cert_bytes: &[u8], now: &Asn1TimeRef) -> Result<i64> {
    let artifact = pem_codec::decode_expecting(cert_bytes, "cert", PemKind::Certificate)?;
    let cert = X509::from_der(artifact.payload()).map_err(SslToolError::parse("certificate"))?;

    let diff = now
        .diff(cert.not_after())
        .map_err(SslToolError::parse("certificate validity"))?;
    let seconds = i64::from(diff.days) * SECONDS_PER_DAY + i64::from(diff.secs);
    Ok(seconds / SECONDS_PER_DAY)
}

/// Read a certificate file and report its days until expiry
pub fn days_until_expiry_file(path: impl AsRef<Path>) -> Result<i64> {
    let path = path.as_ref();
    let days = days_until_expiry(&pem_codec::read_file(path)?)?;
    info!(file = %path.display(), days, "checked certificate expiration");
    Ok(days)
}
