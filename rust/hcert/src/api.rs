// Licensed under the MIT License.

use chrono::{DateTime, Utc};
use hcert_common::{decode_transport, parse_cose_sign1, CoseSign1Envelope, Result};
use hcert_validation::{kid_base64, verify_cose_sign1, TrustResolver, VerifyOptions};

use crate::model::HealthCertificate;
use crate::rules::RuleSet;
use crate::DecodeOptions;

/// A decoded certificate together with the envelope it arrived in.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedHcert {
    pub envelope: CoseSign1Envelope,
    pub certificate: HealthCertificate,
}

impl DecodedHcert {
    pub fn verify(&self, resolver: &dyn TrustResolver, options: &VerifyOptions) -> Result<bool> {
        verify_cose_sign1(&self.envelope, resolver, options)
    }

    /// Key id of the signer, base64-encoded.
    pub fn kid_base64(&self) -> Result<String> {
        kid_base64(&self.envelope)
    }
}

/// Strip the transport layers and parse the COSE_Sign1 envelope.
pub fn decode_envelope(raw: &str, options: &DecodeOptions) -> Result<CoseSign1Envelope> {
    let cose = decode_transport(raw, &options.transport())?;
    let envelope = parse_cose_sign1(&cose, &options.envelope())?;
    tracing::debug!(
        payload_len = envelope.payload.len(),
        signature_len = envelope.signature.len(),
        "envelope parsed"
    );
    Ok(envelope)
}

/// Decode armored text into a typed certificate. The signature is not checked.
pub fn decode(raw: &str, options: &DecodeOptions) -> Result<DecodedHcert> {
    let envelope = decode_envelope(raw, options)?;
    let certificate = HealthCertificate::from_payload(&envelope.payload)?;
    Ok(DecodedHcert { envelope, certificate })
}

/// Decode armored text and verify its signature.
///
/// The payload claims are not interpreted; a certificate with malformed claims
/// can still verify.
pub fn verify(
    raw: &str,
    options: &DecodeOptions,
    resolver: &dyn TrustResolver,
    verify_options: &VerifyOptions,
) -> Result<bool> {
    let envelope = decode_envelope(raw, options)?;
    verify_cose_sign1(&envelope, resolver, verify_options)
}

/// Decode, verify and rule settings bundled for repeated use.
#[derive(Debug, Clone, Default)]
pub struct HcertVerifier {
    decode_options: DecodeOptions,
    verify_options: VerifyOptions,
    rules: RuleSet,
}

impl HcertVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decode_options(mut self, options: DecodeOptions) -> Self {
        self.decode_options = options;
        self
    }

    pub fn with_verify_options(mut self, options: VerifyOptions) -> Self {
        self.verify_options = options;
        self
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn decode(&self, raw: &str) -> Result<DecodedHcert> {
        decode(raw, &self.decode_options)
    }

    pub fn verify(&self, raw: &str, resolver: &dyn TrustResolver) -> Result<bool> {
        verify(raw, &self.decode_options, resolver, &self.verify_options)
    }

    pub fn is_valid_at(&self, certificate: &HealthCertificate, date: DateTime<Utc>) -> Result<bool> {
        self.rules.is_valid_at(&certificate.subject, date)
    }
}
