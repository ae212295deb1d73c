// Licensed under the MIT License.

//! Digital Health Certificate (HCERT / EU-DCC) decoding, verification and
//! validity evaluation.
//!
//! The pipeline runs `prefix -> base45 -> deflate -> COSE_Sign1`, after which
//! the payload becomes a [`HealthCertificate`] and the signature is checked
//! against a signer resolved through a [`TrustResolver`]. A [`RuleSet`]
//! answers whether the certificate is valid at a given instant.
//!
//! ```no_run
//! use hcert::{decode, DecodeOptions, InMemoryTrustList, RuleSet, VerifyOptions};
//!
//! # fn run(raw: &str, trust: &InMemoryTrustList) -> hcert::Result<()> {
//! let decoded = decode(raw, &DecodeOptions::default())?;
//! let authentic = decoded.verify(trust, &VerifyOptions::default())?;
//! let valid_now = RuleSet::default().is_valid_at(&decoded.certificate.subject, chrono::Utc::now())?;
//! # let _ = (authentic, valid_now);
//! # Ok(())
//! # }
//! ```

mod api;
mod settings;

pub mod model;
pub mod rules;

pub use api::{decode, decode_envelope, verify, DecodedHcert, HcertVerifier};
pub use settings::DecodeOptions;

pub use model::{CertificateType, HealthCertificate, Holder, PartialDate, Subject, TestKind};
pub use rules::{PolicyPredicate, RulePolicy, RuleSet, ValidityInterval, ValidityWindow};

pub use hcert_common::{CoseSign1Envelope, ErrorKind, HcertError, Result};
pub use hcert_validation::{CoseAlgorithm, InMemoryTrustList, SignerCertificate, TrustResolver, VerifyOptions};
