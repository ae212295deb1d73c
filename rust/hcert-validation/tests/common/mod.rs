// Licensed under the MIT License.

//! Shared helpers for `hcert-validation` integration tests.
//!
//! Envelopes are encoded by hand with `minicbor` and signed with keys from
//! `rcgen` self-signed certificates, so no fixture files are needed.

#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hcert_common::{encode_signature1_sig_structure, parse_cose_sign1, CoseSign1Envelope, EnvelopeOptions};
use hcert_validation::{SignerCertificate, TrustResolver};
use minicbor::data::Tag;
use minicbor::Encoder;
use p256::pkcs8::DecodePrivateKey as _;
use signature::Signer as _;

pub(crate) const KID: &[u8] = &[0xd9, 0x19, 0x37, 0x5f, 0xc1, 0xe7, 0xb6, 0xb2];

/// Header entry placed in the protected or unprotected map.
#[derive(Clone, Debug)]
pub(crate) enum Hdr {
    Int(i64),
    Bytes(Vec<u8>),
}

fn encode_map(enc: &mut Encoder<&mut Vec<u8>>, entries: &[(i64, Hdr)]) {
    enc.map(entries.len() as u64).unwrap();
    for (k, v) in entries {
        enc.i64(*k).unwrap();
        match v {
            Hdr::Int(i) => {
                enc.i64(*i).unwrap();
            }
            Hdr::Bytes(b) => {
                enc.bytes(b).unwrap();
            }
        }
    }
}

pub(crate) fn encode_protected(entries: &[(i64, Hdr)]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    encode_map(&mut enc, entries);
    out
}

pub(crate) fn encode_envelope(
    protected: &[u8],
    unprotected: &[(i64, Hdr)],
    payload: &[u8],
    signature: &[u8],
) -> Vec<u8> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    enc.tag(Tag::new(18)).unwrap();
    enc.array(4).unwrap();
    enc.bytes(protected).unwrap();
    encode_map(&mut enc, unprotected);
    enc.bytes(payload).unwrap();
    enc.bytes(signature).unwrap();
    out
}

pub(crate) fn parse(bytes: &[u8]) -> CoseSign1Envelope {
    parse_cose_sign1(bytes, &EnvelopeOptions::default()).unwrap()
}

/// A self-signed P-256 certificate (DER) and its signing key.
pub(crate) fn p256_cert_and_key() -> (Vec<u8>, String, p256::ecdsa::SigningKey) {
    let certified = rcgen::generate_simple_self_signed(vec!["dsc.example.test".to_string()]).unwrap();
    let der = certified.cert.der().to_vec();
    let pem = certified.cert.pem();
    let key = p256::ecdsa::SigningKey::from_pkcs8_der(&certified.key_pair.serialize_der()).unwrap();
    (der, pem, key)
}

pub(crate) fn bare_base64(der: &[u8]) -> String {
    STANDARD.encode(der)
}

/// Build an ES256-signed envelope with `kid` in the protected header.
pub(crate) fn signed_es256(payload: &[u8], key: &p256::ecdsa::SigningKey) -> Vec<u8> {
    let protected = encode_protected(&[(1, Hdr::Int(-7)), (4, Hdr::Bytes(KID.to_vec()))]);
    sign_es256_with_headers(&protected, &[], payload, key)
}

pub(crate) fn sign_es256_with_headers(
    protected: &[u8],
    unprotected: &[(i64, Hdr)],
    payload: &[u8],
    key: &p256::ecdsa::SigningKey,
) -> Vec<u8> {
    let sig_structure = encode_signature1_sig_structure(protected, payload).unwrap();
    let sig: p256::ecdsa::Signature = key.sign(&sig_structure);
    encode_envelope(protected, unprotected, payload, &sig.to_bytes())
}

/// A resolver that must never be consulted.
pub(crate) struct UnreachableResolver;

impl TrustResolver for UnreachableResolver {
    fn find_by_kid(&self, _kid: &[u8]) -> Vec<SignerCertificate> {
        panic!("trust resolver consulted")
    }
}
