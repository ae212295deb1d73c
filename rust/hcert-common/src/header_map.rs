// Licensed under the MIT License.

use std::collections::BTreeMap;

use crate::cbor_value::{decode_cbor_value, CborKey, CborValue};

/// COSE header label for the signature algorithm.
pub const HEADER_ALG: i64 = 1;
/// COSE header label for the key identifier.
pub const HEADER_KID: i64 = 4;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CoseHeaderMap {
    map: BTreeMap<CborKey, CborValue>,
}

impl CoseHeaderMap {
    pub fn new(map: BTreeMap<CborKey, CborValue>) -> Self {
        Self { map }
    }

    /// Decode a CBOR-encoded header map. An empty byte string is an empty map.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, String> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }

        match decode_cbor_value(bytes)? {
            CborValue::Map(map) => Ok(Self { map }),
            _ => Err("header is not a CBOR map".to_string()),
        }
    }

    pub fn get(&self, key: i64) -> Option<&CborValue> {
        self.map.get(&CborKey::Int(key))
    }

    pub fn get_i64(&self, key: i64) -> Option<i64> {
        self.get(key).and_then(CborValue::as_i64)
    }

    pub fn get_bytes(&self, key: i64) -> Option<&[u8]> {
        self.get(key).and_then(CborValue::as_bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn map(&self) -> &BTreeMap<CborKey, CborValue> {
        &self.map
    }

    /// Union of two header maps. On a key collision the entry of `self` is kept.
    pub fn merged_with(&self, other: &CoseHeaderMap) -> CoseHeaderMap {
        let mut map = other.map.clone();
        for (k, v) in &self.map {
            map.insert(k.clone(), v.clone());
        }
        CoseHeaderMap { map }
    }
}
