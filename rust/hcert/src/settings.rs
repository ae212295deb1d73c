// Licensed under the MIT License.

use hcert_common::{EnvelopeOptions, TransportOptions, DEFAULT_MAX_DECOMPRESSED_LEN, DEFAULT_PREFIXES};

/// Options for turning armored text into an envelope and certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Type prefixes tried in order; the first match is stripped.
    pub(crate) prefixes: Vec<String>,

    /// Upper bound on the inflated COSE message.
    pub(crate) max_decompressed_len: usize,

    /// Accept a COSE_Sign1 array that lacks tag 18.
    pub(crate) accept_untagged: bool,
}

impl DecodeOptions {
    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_decompressed_len(mut self, max_len: usize) -> Self {
        self.max_decompressed_len = max_len;
        self
    }

    pub fn accept_untagged_envelope(mut self) -> Self {
        self.accept_untagged = true;
        self
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn max_decompressed_len(&self) -> usize {
        self.max_decompressed_len
    }

    pub(crate) fn transport(&self) -> TransportOptions {
        TransportOptions {
            prefixes: self.prefixes.clone(),
            max_decompressed_len: self.max_decompressed_len,
        }
    }

    pub(crate) fn envelope(&self) -> EnvelopeOptions {
        EnvelopeOptions {
            accept_untagged: self.accept_untagged,
        }
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            prefixes: DEFAULT_PREFIXES.iter().map(|p| p.to_string()).collect(),
            max_decompressed_len: DEFAULT_MAX_DECOMPRESSED_LEN,
            accept_untagged: false,
        }
    }
}
