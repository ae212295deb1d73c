// Licensed under the MIT License.

use hcert_common::HcertError;

/// Signature algorithms accepted for HCERT (IANA COSE Algorithms registry).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum CoseAlgorithm {
    /// ECDSA w/ SHA-256 over P-256.
    ES256 = -7,
    /// RSASSA-PSS w/ SHA-256.
    PS256 = -37,
}

impl CoseAlgorithm {
    pub const ALL: [CoseAlgorithm; 2] = [CoseAlgorithm::ES256, CoseAlgorithm::PS256];

    pub fn id(self) -> i64 {
        self as i64
    }
}

impl TryFrom<i64> for CoseAlgorithm {
    type Error = HcertError;

    fn try_from(alg: i64) -> Result<Self, Self::Error> {
        match alg {
            -7 => Ok(CoseAlgorithm::ES256),
            -37 => Ok(CoseAlgorithm::PS256),
            _ => Err(HcertError::UnsupportedAlgorithm { alg }),
        }
    }
}
