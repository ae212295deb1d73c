// Licensed under the MIT License.

//! HCERT signature verification.
//!
//! The verification path moves through fixed stages:
//! 1) envelope parsed (done by the caller),
//! 2) `alg` resolved from the protected header,
//! 3) `kid` resolved from the merged headers and looked up in the trust list,
//!    then the signer certificate reduced to key material,
//! 4) the Signature1 Sig_structure rebuilt and checked.
//!
//! Every stage that cannot complete is an error and ends the attempt. A
//! signature that is well-formed enough to evaluate but does not match is
//! `Ok(false)`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hcert_common::{CoseSign1Envelope, HcertError, Result, HEADER_ALG, HEADER_KID};
use rsa::{pss, BigUint, RsaPublicKey};
use sha2::Sha256;
use signature::Verifier as _;

use crate::signer_key::{public_key_material, PublicKeyMaterial};
use crate::trust::{resolve_signer, TrustResolver};
use crate::{CoseAlgorithm, VerifyOptions};

/// Length of one ECDSA P-256 scalar in the COSE `r || s` signature form.
const P256_SCALAR_LEN: usize = 32;

/// Verify the signature of a parsed envelope against the signer registered for its kid.
pub fn verify_cose_sign1(
    envelope: &CoseSign1Envelope,
    resolver: &dyn TrustResolver,
    options: &VerifyOptions,
) -> Result<bool> {
    let alg = resolve_algorithm(envelope, options)?;
    tracing::debug!(?alg, "algorithm resolved");

    let kid = resolve_kid(envelope)?;
    let signer = resolve_signer(resolver, &kid)?;
    let key = public_key_material(&signer)?;
    tracing::debug!(kid = %signer.kid_base64(), "signer resolved");

    let sig_structure = envelope.sig_structure()?;
    let verified = verify_signature(alg, &key, &sig_structure, &envelope.signature)?;

    if verified {
        tracing::debug!(kid = %signer.kid_base64(), "signature verified");
    } else {
        tracing::warn!(kid = %signer.kid_base64(), "signature did not verify");
    }
    Ok(verified)
}

/// Read `alg` (label 1) from the protected header.
///
/// Only the protected header is consulted; an unprotected `alg` would not be
/// covered by the signature.
pub fn resolve_algorithm(envelope: &CoseSign1Envelope, options: &VerifyOptions) -> Result<CoseAlgorithm> {
    let protected = envelope.protected_header()?;
    let id = protected
        .get_i64(HEADER_ALG)
        .ok_or_else(|| HcertError::Protocol("missing or non-integer alg in protected header".to_string()))?;
    let alg = CoseAlgorithm::try_from(id)?;

    if let Some(expected) = options.expected_alg {
        if expected != alg {
            return Err(HcertError::UnsupportedAlgorithm { alg: id });
        }
    }
    Ok(alg)
}

/// Read `kid` (label 4) from the merged protected and unprotected headers.
pub fn resolve_kid(envelope: &CoseSign1Envelope) -> Result<Vec<u8>> {
    let merged = envelope.merged_header()?;
    match merged.get_bytes(HEADER_KID) {
        Some(kid) if !kid.is_empty() => Ok(kid.to_vec()),
        Some(_) => Err(HcertError::Trust("kid header is empty".to_string())),
        None => Err(HcertError::Trust("missing kid header".to_string())),
    }
}

/// Check `signature` over `sig_structure`.
///
/// Returns `Err` only when the key material itself is unusable; a malformed or
/// non-matching signature is `Ok(false)`.
pub fn verify_signature(
    alg: CoseAlgorithm,
    key: &PublicKeyMaterial,
    sig_structure: &[u8],
    signature: &[u8],
) -> Result<bool> {
    match (alg, key) {
        (CoseAlgorithm::ES256, PublicKeyMaterial::Ec { x, y }) => verify_es256(x, y, sig_structure, signature),
        (CoseAlgorithm::PS256, PublicKeyMaterial::Rsa { n, e }) => verify_ps256(n, e, sig_structure, signature),
        (alg, _) => Err(HcertError::Trust(format!(
            "signer key type does not match algorithm {alg:?}"
        ))),
    }
}

fn verify_es256(x: &[u8], y: &[u8], msg: &[u8], sig: &[u8]) -> Result<bool> {
    let mut sec1 = Vec::with_capacity(1 + x.len() + y.len());
    sec1.push(0x04);
    sec1.extend_from_slice(x);
    sec1.extend_from_slice(y);
    let vk = p256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1)
        .map_err(|e| HcertError::Trust(format!("bad P-256 public key: {e}")))?;

    // COSE carries ECDSA signatures as the raw `r || s` concatenation rather than DER.
    if sig.len() != 2 * P256_SCALAR_LEN {
        return Ok(false);
    }
    let Ok(signature) = p256::ecdsa::Signature::from_slice(sig) else {
        return Ok(false);
    };
    Ok(vk.verify(msg, &signature).is_ok())
}

fn verify_ps256(n: &[u8], e: &[u8], msg: &[u8], sig: &[u8]) -> Result<bool> {
    let key = RsaPublicKey::new(BigUint::from_bytes_be(n), BigUint::from_bytes_be(e))
        .map_err(|e| HcertError::Trust(format!("bad RSA public key: {e}")))?;
    let vk = pss::VerifyingKey::<Sha256>::new(key);
    let Ok(signature) = pss::Signature::try_from(sig) else {
        return Ok(false);
    };
    Ok(vk.verify(msg, &signature).is_ok())
}

/// Key id in base64, the form trust lists index by.
pub fn kid_base64(envelope: &CoseSign1Envelope) -> Result<String> {
    Ok(STANDARD.encode(resolve_kid(envelope)?))
}
