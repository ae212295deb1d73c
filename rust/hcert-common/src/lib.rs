// Licensed under the MIT License.

//! Byte-level layers of the HCERT pipeline.
//!
//! - `transport`: prefix stripping, base45, deflate.
//! - `cose_sign1`: the tagged 4-element COSE_Sign1 envelope and its Sig_structure.
//! - `cbor_value` / `header_map`: owned CBOR values for headers and claims.
//! - `error`: the error taxonomy shared by the higher-level crates.

pub mod cbor_value;
pub mod cose_sign1;
pub mod error;
pub mod header_map;
pub mod transport;

pub use cbor_value::{decode_cbor_value, CborKey, CborValue, MAX_NESTING_DEPTH};
pub use cose_sign1::{
    encode_signature1_sig_structure, parse_cose_sign1, CoseSign1Envelope, EnvelopeOptions, COSE_SIGN1_TAG,
    SIG_STRUCTURE_CONTEXT_SIGNATURE1,
};
pub use error::{ErrorKind, HcertError, Result};
pub use header_map::{CoseHeaderMap, HEADER_ALG, HEADER_KID};
pub use transport::{
    decode_base45, decode_transport, decompress, strip_prefix, TransportOptions, DEFAULT_MAX_DECOMPRESSED_LEN,
    DEFAULT_PREFIXES,
};
