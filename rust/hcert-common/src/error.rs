// Licensed under the MIT License.

//! Error taxonomy shared by every stage of the HCERT pipeline.
//!
//! Each variant means the input could not be evaluated at all. A signature
//! that simply does not match is not an error; verification reports it as
//! `Ok(false)`.

/// Category of an [`HcertError`], for callers that only branch on the kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Decode,
    Protocol,
    Validation,
    UnsupportedAlgorithm,
    Trust,
    PolicyNotFound,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HcertError {
    /// Malformed transport: base45 text or deflate stream.
    #[error("decode error: {0}")]
    Decode(String),

    /// Malformed COSE_Sign1 envelope shape.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Malformed claims, or no certificate subject present.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported signature algorithm: {alg}")]
    UnsupportedAlgorithm { alg: i64 },

    /// Key id missing, unresolved, ambiguous, or the signer certificate is unusable.
    #[error("trust error: {0}")]
    Trust(String),

    #[error("no rule policy matches certificate type {certificate_type}")]
    PolicyNotFound { certificate_type: String },
}

impl HcertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HcertError::Decode(_) => ErrorKind::Decode,
            HcertError::Protocol(_) => ErrorKind::Protocol,
            HcertError::Validation(_) => ErrorKind::Validation,
            HcertError::UnsupportedAlgorithm { .. } => ErrorKind::UnsupportedAlgorithm,
            HcertError::Trust(_) => ErrorKind::Trust,
            HcertError::PolicyNotFound { .. } => ErrorKind::PolicyNotFound,
        }
    }
}

pub type Result<T> = std::result::Result<T, HcertError>;
