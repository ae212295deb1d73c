// Licensed under the MIT License.

//! Signature verification for HCERT envelopes.
//!
//! Signer certificates are looked up by key id through a caller-supplied
//! [`TrustResolver`]; this crate never fetches or caches trust lists itself.

pub mod algorithms;
pub mod cose_sign1_verifier;
pub mod signer_key;
pub mod trust;
pub mod verify_options;

pub use algorithms::CoseAlgorithm;
pub use cose_sign1_verifier::{kid_base64, resolve_algorithm, resolve_kid, verify_cose_sign1, verify_signature};
pub use signer_key::{certificate_der, normalize_pem, public_key_material, PublicKeyMaterial};
pub use trust::{resolve_signer, InMemoryTrustList, SignerCertificate, TrustResolver};
pub use verify_options::VerifyOptions;
