// Licensed under the MIT License.

//! COSE_Sign1 envelope parsing and Sig_structure encoding.
//!
//! An HCERT is a single-signer COSE message:
//! `18([protected: bstr, unprotected: map, payload: bstr, signature: bstr])`.
//! The elements are addressed by position only.

use minicbor::data::Tag;
use minicbor::data::Type;
use minicbor::{Decoder, Encoder};

use crate::cbor_value::decode_map_from_decoder;
use crate::error::{HcertError, Result};
use crate::header_map::CoseHeaderMap;

pub const COSE_SIGN1_TAG: u64 = 18;
pub const SIG_STRUCTURE_CONTEXT_SIGNATURE1: &str = "Signature1";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvelopeOptions {
    /// Accept a bare 4-element array without the COSE_Sign1 tag.
    pub accept_untagged: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoseSign1Envelope {
    /// Element 0, exactly as carried on the wire.
    pub protected_header_bytes: Vec<u8>,
    /// Element 1.
    pub unprotected_header: CoseHeaderMap,
    /// Element 2.
    pub payload: Vec<u8>,
    /// Element 3.
    pub signature: Vec<u8>,
}

impl CoseSign1Envelope {
    /// Decode the protected header. Decoding is deferred until a field is needed.
    pub fn protected_header(&self) -> Result<CoseHeaderMap> {
        CoseHeaderMap::from_cbor(&self.protected_header_bytes)
            .map_err(|e| HcertError::Protocol(format!("failed to parse protected header: {e}")))
    }

    /// Protected and unprotected headers as one map; protected entries win on collision.
    pub fn merged_header(&self) -> Result<CoseHeaderMap> {
        Ok(self.protected_header()?.merged_with(&self.unprotected_header))
    }

    pub fn sig_structure(&self) -> Result<Vec<u8>> {
        encode_signature1_sig_structure(&self.protected_header_bytes, &self.payload)
    }
}

pub fn parse_cose_sign1(input: &[u8], options: &EnvelopeOptions) -> Result<CoseSign1Envelope> {
    parse_inner(input, options).map_err(HcertError::Protocol)
}

fn parse_inner(input: &[u8], options: &EnvelopeOptions) -> std::result::Result<CoseSign1Envelope, String> {
    if input.is_empty() {
        return Err("empty input".to_string());
    }

    let mut dec = Decoder::new(input);

    if matches!(dec.datatype().map_err(|e| e.to_string())?, Type::Tag) {
        let tag = dec.tag().map_err(|e| format!("failed to read CBOR tag: {e}"))?;
        if tag != Tag::new(COSE_SIGN1_TAG) {
            return Err(format!(
                "unexpected CBOR tag {} (expected COSE_Sign1 tag 18)",
                tag.as_u64()
            ));
        }
    } else if !options.accept_untagged {
        return Err("missing COSE_Sign1 tag 18".to_string());
    }

    let len = dec
        .array()
        .map_err(|e| format!("top-level item is not an array: {e}"))?
        .ok_or_else(|| "indefinite-length arrays are not supported".to_string())?;

    if len != 4 {
        return Err(format!("array length was {len}, expected 4"));
    }

    let protected_header_bytes = match dec.datatype().map_err(|e| e.to_string())? {
        Type::Bytes => dec
            .bytes()
            .map_err(|e| format!("failed to read protected header (bstr): {e}"))?
            .to_vec(),
        other => return Err(format!("protected header is not a byte string: {other:?}")),
    };

    if !matches!(dec.datatype().map_err(|e| e.to_string())?, Type::Map) {
        return Err("unprotected header is not a map".to_string());
    }
    let unprotected_header = CoseHeaderMap::new(
        decode_map_from_decoder(&mut dec, 0)
            .map_err(|e| format!("failed to parse unprotected header: {e}"))?,
    );

    let payload = match dec.datatype().map_err(|e| e.to_string())? {
        Type::Bytes => dec
            .bytes()
            .map_err(|e| format!("failed to read payload (bstr): {e}"))?
            .to_vec(),
        other => return Err(format!("payload is not a byte string: {other:?}")),
    };

    let signature = match dec.datatype().map_err(|e| e.to_string())? {
        Type::Bytes => dec
            .bytes()
            .map_err(|e| format!("failed to read signature (bstr): {e}"))?
            .to_vec(),
        other => return Err(format!("signature is not a byte string: {other:?}")),
    };

    if dec.position() != input.len() {
        return Err("trailing bytes after COSE_Sign1".to_string());
    }

    Ok(CoseSign1Envelope {
        protected_header_bytes,
        unprotected_header,
        payload,
        signature,
    })
}

/// Encode `["Signature1", protected, h'', payload]`.
///
/// `protected` is embedded byte for byte; it is never re-encoded from the decoded map.
pub fn encode_signature1_sig_structure(protected: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(32 + protected.len() + payload.len());
    {
        let mut enc = Encoder::new(&mut out);
        enc.array(4).map_err(sig_structure_error)?;
        enc.str(SIG_STRUCTURE_CONTEXT_SIGNATURE1).map_err(sig_structure_error)?;
        enc.bytes(protected).map_err(sig_structure_error)?;
        enc.bytes(&[]).map_err(sig_structure_error)?; // external_aad
        enc.bytes(payload).map_err(sig_structure_error)?;
    }
    Ok(out)
}

fn sig_structure_error(e: impl std::fmt::Display) -> HcertError {
    HcertError::Protocol(format!("failed to encode Sig_structure: {e}"))
}
