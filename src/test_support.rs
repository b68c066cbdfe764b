//! Fixtures shared by the unit tests: keys, CSRs and self-signed certificates.

use std::time::{SystemTime, UNIX_EPOCH};

use openssl::asn1::Asn1Time;
use openssl::bn::{BigNum, MsbOption};
use openssl::ec::{EcGroup, EcKey};
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::x509::extension::SubjectAlternativeName;
use openssl::x509::{X509NameRef, X509Req, X509};

use crate::generator::{self, GeneratedKeyPair, SubjectParams, RSA_KEY_SIZE};

const X509_VERSION_3: i32 = 2;
const SECONDS_PER_DAY: i64 = 86_400;

pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Time `days` days from now (negative for the past)
pub(crate) fn now_offset_days(days: i64) -> Asn1Time {
    Asn1Time::from_unix(unix_now() + days * SECONDS_PER_DAY).unwrap()
}

pub(crate) fn key_and_csr(
    domain: &str,
    country: &str,
    locality: &str,
    organization: &str,
) -> (PKey<Private>, X509Req) {
    let key = PKey::from_rsa(Rsa::generate(RSA_KEY_SIZE).unwrap()).unwrap();
    let params = SubjectParams::new(domain, country, locality, organization);
    let csr = generator::build_csr(&params, &key).unwrap();
    (key, csr)
}

pub(crate) fn csr_with_name(key: &PKey<Private>, name: &X509NameRef) -> X509Req {
    generator::sign_request(name, key).unwrap()
}

/// Sign `csr` with `key` the way `openssl x509 -req -signkey` does
pub(crate) fn sign_certificate(key: &PKey<Private>, csr: &X509Req, not_after: Asn1Time) -> X509 {
    sign_certificate_with_email(key, csr, not_after, None)
}

pub(crate) fn sign_certificate_with_email(
    key: &PKey<Private>,
    csr: &X509Req,
    not_after: Asn1Time,
    email: Option<&str>,
) -> X509 {
    let mut builder = X509::builder().unwrap();
    builder.set_version(X509_VERSION_3).unwrap();

    let mut serial = BigNum::new().unwrap();
    serial.rand(128, MsbOption::MAYBE_ZERO, false).unwrap();
    builder
        .set_serial_number(&serial.to_asn1_integer().unwrap())
        .unwrap();

    builder.set_subject_name(csr.subject_name()).unwrap();
    builder.set_issuer_name(csr.subject_name()).unwrap();
    builder.set_pubkey(&csr.public_key().unwrap()).unwrap();

    // Start well before any not_after used in tests, including expired ones
    builder.set_not_before(&now_offset_days(-30)).unwrap();
    builder.set_not_after(&not_after).unwrap();

    if let Some(email) = email {
        let san = SubjectAlternativeName::new()
            .email(email)
            .build(&builder.x509v3_context(None, None))
            .unwrap();
        builder.append_extension(san).unwrap();
    }

    builder.sign(key, MessageDigest::sha256()).unwrap();
    builder.build()
}

/// Self-signed certificate PEM for a key/CSR pair written by the generator
pub(crate) fn certificate_pem_for(generated: &GeneratedKeyPair, valid_days: i64) -> Vec<u8> {
    let key = PKey::private_key_from_pem(generated.private_key_pem().as_bytes()).unwrap();
    let csr = X509Req::from_der(generated.csr().payload()).unwrap();
    sign_certificate(&key, &csr, now_offset_days(valid_days))
        .to_pem()
        .unwrap()
}

/// Certificate PEM with its own fresh key and the given validity
pub(crate) fn standalone_certificate_pem(domain: &str, valid_days: i64) -> Vec<u8> {
    let (key, csr) = key_and_csr(domain, "US", "New York", "TestOrg");
    sign_certificate(&key, &csr, now_offset_days(valid_days))
        .to_pem()
        .unwrap()
}

/// Certificate PEM over a fresh ECDSA P-256 key
pub(crate) fn ec_certificate_pem(domain: &str, valid_days: i64) -> Vec<u8> {
    let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
    let key = PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap();
    let params = SubjectParams::new(domain, "US", "New York", "TestOrg");
    let name = generator::subject_name(&params).unwrap();
    let csr = generator::sign_request(&name, &key).unwrap();
    sign_certificate(&key, &csr, now_offset_days(valid_days))
        .to_pem()
        .unwrap()
}
