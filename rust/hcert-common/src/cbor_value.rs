// Licensed under the MIT License.

//! Owned CBOR value tree.
//!
//! COSE headers and HCERT claims are both small CBOR maps keyed by integers
//! or text. They are decoded into this tree once and then read through the
//! typed accessors below.

use std::collections::BTreeMap;

use minicbor::data::Type;
use minicbor::Decoder;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum CborKey {
    Int(i64),
    Text(String),
}

impl From<i64> for CborKey {
    fn from(value: i64) -> Self {
        CborKey::Int(value)
    }
}

impl From<&str> for CborKey {
    fn from(value: &str) -> Self {
        CborKey::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CborValue {
    Int(i64),
    Float(f64),
    Bytes(Vec<u8>),
    Text(String),
    Array(Vec<CborValue>),
    Map(BTreeMap<CborKey, CborValue>),
    Tagged(u64, Box<CborValue>),
    Bool(bool),
    Null,
}

impl CborValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CborValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            CborValue::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CborValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[CborValue]> {
        match self {
            CborValue::Array(a) => Some(a.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<CborKey, CborValue>> {
        match self {
            CborValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Strip any number of enclosing tags.
    pub fn untagged(&self) -> &CborValue {
        let mut v = self;
        while let CborValue::Tagged(_, inner) = v {
            v = inner;
        }
        v
    }

    /// Look up `key` when this value is a map.
    pub fn get(&self, key: impl Into<CborKey>) -> Option<&CborValue> {
        self.as_map().and_then(|m| m.get(&key.into()))
    }
}

/// Deepest nesting of arrays, maps and tags accepted by the decoder.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Decode exactly one CBOR data item spanning all of `bytes`.
pub fn decode_cbor_value(bytes: &[u8]) -> Result<CborValue, String> {
    if bytes.is_empty() {
        return Err("empty CBOR input".to_string());
    }

    let mut dec = Decoder::new(bytes);
    let value = decode_value(&mut dec, 0)?;

    if dec.position() != bytes.len() {
        return Err("trailing bytes after CBOR item".to_string());
    }

    Ok(value)
}

/// Decode a definite-length map whose container sits at `depth`.
pub(crate) fn decode_map_from_decoder(
    dec: &mut Decoder<'_>,
    depth: usize,
) -> Result<BTreeMap<CborKey, CborValue>, String> {
    check_depth(depth)?;
    let len = dec
        .map()
        .map_err(|e| format!("failed to read map: {e}"))?
        .ok_or_else(|| "indefinite-length maps are not supported".to_string())?;

    let mut map = BTreeMap::new();
    for _ in 0..len {
        let key = decode_key(dec)?;
        let value = decode_value(dec, depth + 1)?;
        map.insert(key, value);
    }

    Ok(map)
}

fn decode_key(dec: &mut Decoder<'_>) -> Result<CborKey, String> {
    match dec.datatype().map_err(|e| e.to_string())? {
        Type::I8
        | Type::I16
        | Type::I32
        | Type::I64
        | Type::Int
        | Type::U8
        | Type::U16
        | Type::U32
        | Type::U64 => {
            let i = dec
                .i64()
                .map_err(|e| format!("failed to decode int map key: {e}"))?;
            Ok(CborKey::Int(i))
        }
        Type::String => {
            let s = dec
                .str()
                .map_err(|e| format!("failed to decode text map key: {e}"))?;
            Ok(CborKey::Text(s.to_string()))
        }
        other => Err(format!("unsupported map key type: {other:?}")),
    }
}

fn check_depth(depth: usize) -> Result<(), String> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(format!("CBOR nesting too deep (limit {MAX_NESTING_DEPTH})"));
    }
    Ok(())
}

pub(crate) fn decode_value(dec: &mut Decoder<'_>, depth: usize) -> Result<CborValue, String> {
    match dec.datatype().map_err(|e| e.to_string())? {
        Type::Null => {
            dec.null().map_err(|e| e.to_string())?;
            Ok(CborValue::Null)
        }
        Type::Bool => {
            let b = dec.bool().map_err(|e| e.to_string())?;
            Ok(CborValue::Bool(b))
        }
        Type::Bytes => {
            let b = dec.bytes().map_err(|e| e.to_string())?;
            Ok(CborValue::Bytes(b.to_vec()))
        }
        Type::String => {
            let s = dec.str().map_err(|e| e.to_string())?;
            Ok(CborValue::Text(s.to_string()))
        }
        Type::I8
        | Type::I16
        | Type::I32
        | Type::I64
        | Type::Int
        | Type::U8
        | Type::U16
        | Type::U32
        | Type::U64 => {
            let i = dec.i64().map_err(|e| e.to_string())?;
            Ok(CborValue::Int(i))
        }
        Type::F16 | Type::F32 | Type::F64 => {
            let f = dec.f64().map_err(|e| e.to_string())?;
            Ok(CborValue::Float(f))
        }
        Type::Tag => {
            check_depth(depth)?;
            let tag = dec.tag().map_err(|e| format!("failed to read tag: {e}"))?;
            let inner = decode_value(dec, depth + 1)?;
            Ok(CborValue::Tagged(tag.as_u64(), Box::new(inner)))
        }
        Type::Array => {
            check_depth(depth)?;
            let len = dec
                .array()
                .map_err(|e| format!("failed to read array: {e}"))?
                .ok_or_else(|| "indefinite-length arrays are not supported".to_string())?;
            let mut out = Vec::with_capacity(len.min(64) as usize);
            for _ in 0..len {
                out.push(decode_value(dec, depth + 1)?);
            }
            Ok(CborValue::Array(out))
        }
        Type::Map => Ok(CborValue::Map(decode_map_from_decoder(dec, depth)?)),
        other => Err(format!("unsupported CBOR value type: {other:?}")),
    }
}
