// Licensed under the MIT License.

//! Transport decoding: type prefix, base45 text armor, deflate compression.
//!
//! Failures here are always [`HcertError::Decode`], which keeps a damaged scan
//! distinguishable from a well-transported but malformed COSE message.

use flate2::{Decompress, FlushDecompress, Status};

use crate::error::{HcertError, Result};

/// Known type prefixes, in match priority order.
pub const DEFAULT_PREFIXES: &[&str] = &["HC1:", "NO1:"];

pub const DEFAULT_MAX_DECOMPRESSED_LEN: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    pub prefixes: Vec<String>,
    pub max_decompressed_len: usize,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            prefixes: DEFAULT_PREFIXES.iter().map(|p| p.to_string()).collect(),
            max_decompressed_len: DEFAULT_MAX_DECOMPRESSED_LEN,
        }
    }
}

/// Turn armored text into the COSE bytes it carries.
pub fn decode_transport(raw: &str, options: &TransportOptions) -> Result<Vec<u8>> {
    let body = strip_prefix(raw, &options.prefixes);
    let compressed = decode_base45(body)?;
    let cose = decompress(&compressed, options.max_decompressed_len)?;
    tracing::debug!(
        armored_len = raw.len(),
        compressed_len = compressed.len(),
        decompressed_len = cose.len(),
        "transport decoded"
    );
    Ok(cose)
}

/// Remove the first matching prefix, or return the input unchanged.
pub fn strip_prefix<'a, S: AsRef<str>>(raw: &'a str, prefixes: &[S]) -> &'a str {
    for prefix in prefixes {
        if let Some(rest) = raw.strip_prefix(prefix.as_ref()) {
            return rest;
        }
    }
    raw
}

pub fn decode_base45(text: &str) -> Result<Vec<u8>> {
    base45::decode(text).map_err(|_| HcertError::Decode("input could not be decoded with base45".to_string()))
}

/// Inflate a zlib-wrapped or raw deflate stream.
///
/// The stream must reach its final block; truncated input is an error.
pub fn decompress(data: &[u8], max_len: usize) -> Result<Vec<u8>> {
    let zlib = has_zlib_header(data);
    let mut inflater = Decompress::new(zlib);
    // One byte of headroom past the limit tells "exactly max_len" apart from "more".
    let limit = max_len.saturating_add(1);
    let mut out = Vec::with_capacity((data.len() * 4).clamp(64, limit.max(64)));

    loop {
        let in_before = inflater.total_in();
        let out_before = inflater.total_out();
        let status = inflater
            .decompress_vec(&data[in_before as usize..], &mut out, FlushDecompress::None)
            .map_err(|e| HcertError::Decode(format!("input could not be decompressed: {e}")))?;

        if out.len() > max_len {
            return Err(HcertError::Decode(format!(
                "decompressed data exceeds {max_len} bytes"
            )));
        }
        if status == Status::StreamEnd {
            return Ok(out);
        }

        if out.len() < out.capacity() {
            let progressed = inflater.total_in() != in_before || inflater.total_out() != out_before;
            if !progressed {
                // Output space left and nothing consumed: the input ran dry mid-stream.
                return Err(HcertError::Decode("compressed stream is truncated".to_string()));
            }
            continue;
        }

        let grow = out.capacity().min(limit - out.len()).max(1);
        out.reserve_exact(grow);
    }
}

/// RFC 1950 header: deflate method with a CMF/FLG pair divisible by 31.
fn has_zlib_header(data: &[u8]) -> bool {
    match data {
        [cmf, flg, ..] => cmf & 0x0f == 8 && (u16::from(*cmf) << 8 | u16::from(*flg)) % 31 == 0,
        _ => false,
    }
}
