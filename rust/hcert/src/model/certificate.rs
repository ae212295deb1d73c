// Licensed under the MIT License.

//! Typed health certificate built from a COSE payload.
//!
//! Payload registry keys: 1 issuer country, 4 expiry, 6 issued-at, and
//! -260 holding the HCERT claims map under key 1.

use chrono::{DateTime, Utc};
use hcert_common::{decode_cbor_value, HcertError, Result};

use super::claims::Claims;
use super::partial_date::PartialDate;
use super::subject::{CertificateType, Subject};
use crate::rules::RuleSet;

const CLAIM_ISSUER_COUNTRY: i64 = 1;
const CLAIM_EXPIRES_AT: i64 = 4;
const CLAIM_ISSUED_AT: i64 = 6;
const CLAIM_HCERT: i64 = -260;
const HCERT_EU_DCC_V1: i64 = 1;

/// Holder names as printed and in their ICAO 9303 transliteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holder {
    pub family_name: Option<String>,
    pub family_name_standardised: String,
    pub given_name: Option<String>,
    pub given_name_standardised: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthCertificate {
    pub issuer_country: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub holder: Holder,
    pub date_of_birth: PartialDate,
    pub version: String,
    pub subject: Subject,
}

impl HealthCertificate {
    /// Build the certificate from the CBOR payload bytes of the envelope.
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        let value = decode_cbor_value(payload)
            .map_err(|e| HcertError::Validation(format!("payload is not valid CBOR: {e}")))?;
        let cwt = Claims::new(&value, "payload")?;

        let issuer_country = cwt
            .get(CLAIM_ISSUER_COUNTRY)
            .and_then(|v| v.untagged().as_text())
            .map(str::to_string);
        let expires_at = cwt.date(CLAIM_EXPIRES_AT)?;
        let issued_at = cwt.date(CLAIM_ISSUED_AT)?;

        let hcert = cwt
            .get(CLAIM_HCERT)
            .ok_or_else(|| HcertError::Validation("missing hcert claim -260".to_string()))?;
        let dcc_value = Claims::new(hcert, "hcert")?
            .get(HCERT_EU_DCC_V1)
            .ok_or_else(|| HcertError::Validation("missing EU DCC claims under -260/1".to_string()))?;
        let dcc = Claims::new(dcc_value, "dcc")?;

        let nam = dcc
            .get("nam")
            .ok_or_else(|| HcertError::Validation("missing claim dcc.nam".to_string()))?;
        let nam = Claims::new(nam, "nam")?;
        let holder = Holder {
            family_name: nam.optional_text("fn")?,
            family_name_standardised: nam.text("fnt")?,
            given_name: nam.optional_text("gn")?,
            given_name_standardised: nam.optional_text("gnt")?,
        };

        let date_of_birth = match dcc.optional_text("dob")? {
            Some(dob) => dob.parse()?,
            None => PartialDate::Empty,
        };
        let version = dcc.optional_text("ver")?.unwrap_or_default();
        let subject = Subject::from_claims(&dcc)?;

        tracing::debug!(
            certificate_type = %subject.certificate_type(),
            version = %version,
            "certificate claims parsed"
        );

        Ok(Self {
            issuer_country,
            issued_at,
            expires_at,
            holder,
            date_of_birth,
            version,
            subject,
        })
    }

    pub fn certificate_type(&self) -> CertificateType {
        self.subject.certificate_type()
    }

    pub fn valid_from(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn valid_to(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn issuer(&self) -> &str {
        self.subject.issuer()
    }

    pub fn is_expired_at(&self, date: DateTime<Utc>) -> bool {
        date > self.expires_at
    }

    /// The subject's type is in `types` and its own gate passes.
    pub fn is_valid_for(&self, types: &[CertificateType]) -> bool {
        types.contains(&self.certificate_type()) && self.subject.is_valid()
    }

    /// The subject's type is in `types` and `rules` accept it at `date`.
    pub fn is_valid_for_date(&self, date: DateTime<Utc>, types: &[CertificateType], rules: &RuleSet) -> Result<bool> {
        if !types.contains(&self.certificate_type()) {
            return Ok(false);
        }
        rules.is_valid_at(&self.subject, date)
    }
}
