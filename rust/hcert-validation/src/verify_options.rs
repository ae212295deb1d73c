// Licensed under the MIT License.

use crate::CoseAlgorithm;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VerifyOptions {
    /// If set, verification fails unless the COSE `alg` header equals this value.
    pub expected_alg: Option<CoseAlgorithm>,
}

impl VerifyOptions {
    pub fn with_expected_alg(mut self, alg: CoseAlgorithm) -> Self {
        self.expected_alg = Some(alg);
        self
    }
}
