// Licensed under the MIT License.

//! Public key extraction from signer certificates.
//!
//! Trust lists hand out certificates either as PEM or as bare base64 DER. Both
//! are normalized to PEM, parsed as X.509, and the SubjectPublicKeyInfo is
//! reduced to raw key material.

use hcert_common::{HcertError, Result};
use p256::elliptic_curve::sec1::ToEncodedPoint as _;
use p256::pkcs8::DecodePublicKey as _;
use rsa::pkcs1::DecodeRsaPublicKey as _;
use rsa::traits::PublicKeyParts as _;
use rsa::RsaPublicKey;
use x509_parser::x509::SubjectPublicKeyInfo;

use crate::trust::SignerCertificate;

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";

const OID_EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";
const OID_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
const OID_RSASSA_PSS: &str = "1.2.840.113549.1.1.10";

/// Public key material taken from a signer certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKeyMaterial {
    /// Affine coordinates of a P-256 point, 32 bytes each.
    Ec { x: Vec<u8>, y: Vec<u8> },
    /// Big-endian modulus and public exponent.
    Rsa { n: Vec<u8>, e: Vec<u8> },
}

/// Add PEM armor to bare base64 DER; PEM input is returned as is.
pub fn normalize_pem(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with(PEM_BEGIN) {
        return trimmed.to_string();
    }

    let body: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    let mut out = String::with_capacity(body.len() + body.len() / 64 + 64);
    out.push_str(PEM_BEGIN);
    out.push('\n');
    // Non-ASCII input is not base64 and fails to parse later anyway.
    for line in body.as_bytes().chunks(64) {
        out.push_str(&String::from_utf8_lossy(line));
        out.push('\n');
    }
    out.push_str(PEM_END);
    out.push('\n');
    out
}

/// DER bytes of the certificate carried by a signer entry.
pub fn certificate_der(cert: &SignerCertificate) -> Result<Vec<u8>> {
    let pem_text = normalize_pem(&cert.raw);
    let (_, pem) = x509_parser::pem::parse_x509_pem(pem_text.as_bytes())
        .map_err(|e| HcertError::Trust(format!("signer certificate is not valid PEM: {e}")))?;
    Ok(pem.contents)
}

pub fn public_key_material(cert: &SignerCertificate) -> Result<PublicKeyMaterial> {
    let der = certificate_der(cert)?;
    let (_, x509) = x509_parser::parse_x509_certificate(&der)
        .map_err(|e| HcertError::Trust(format!("signer certificate is not valid X.509: {e}")))?;
    spki_key_material(&x509.tbs_certificate.subject_pki)
}

fn spki_key_material(spki: &SubjectPublicKeyInfo<'_>) -> Result<PublicKeyMaterial> {
    let oid = spki.algorithm.algorithm.to_string();
    match oid.as_str() {
        OID_EC_PUBLIC_KEY => {
            // Decoding the full SPKI also checks the named curve is P-256.
            let pk = p256::PublicKey::from_public_key_der(spki.raw)
                .map_err(|e| HcertError::Trust(format!("bad P-256 public key: {e}")))?;
            let point = pk.to_encoded_point(false);
            match (point.x(), point.y()) {
                (Some(x), Some(y)) => Ok(PublicKeyMaterial::Ec {
                    x: x.to_vec(),
                    y: y.to_vec(),
                }),
                _ => Err(HcertError::Trust("P-256 public key is the identity point".to_string())),
            }
        }
        OID_RSA_ENCRYPTION | OID_RSASSA_PSS => {
            // The BIT STRING is a PKCS#1 RSAPublicKey under either OID.
            let key = RsaPublicKey::from_pkcs1_der(&spki.subject_public_key.data)
                .map_err(|e| HcertError::Trust(format!("bad RSA public key: {e}")))?;
            Ok(PublicKeyMaterial::Rsa {
                n: key.n().to_bytes_be(),
                e: key.e().to_bytes_be(),
            })
        }
        other => Err(HcertError::Trust(format!("unsupported signer key algorithm {other}"))),
    }
}
