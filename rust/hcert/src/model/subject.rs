// Licensed under the MIT License.

//! The certificate subject: exactly one vaccination, test or recovery entry.

use std::fmt;

use chrono::{DateTime, Utc};
use hcert_common::{HcertError, Result};

use super::claims::Claims;

/// Test type code for a rapid antigen test.
pub const TEST_TYPE_RAPID: &str = "LP217198-3";
/// Test type code for a nucleic acid amplification test.
pub const TEST_TYPE_NAAT: &str = "LP6464-4";

pub const TEST_RESULT_NEGATIVE: &str = "260415000";
pub const TEST_RESULT_POSITIVE: &str = "260373001";

/// Certificate type flags.
///
/// The numeric codes are bit flags so that callers can describe an accepted
/// set as a mask; [`CertificateType::mask`] builds one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CertificateType {
    Vaccination = 1,
    Recovery = 2,
    NaatTest = 4,
    RapidTest = 8,
}

impl CertificateType {
    pub const ALL: [CertificateType; 4] = [
        CertificateType::Vaccination,
        CertificateType::Recovery,
        CertificateType::NaatTest,
        CertificateType::RapidTest,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn mask(types: &[CertificateType]) -> u8 {
        types.iter().fold(0, |acc, t| acc | t.code())
    }

    pub fn name(self) -> &'static str {
        match self {
            CertificateType::Vaccination => "vaccination",
            CertificateType::Recovery => "recovery",
            CertificateType::NaatTest => "naat-test",
            CertificateType::RapidTest => "rapid-test",
        }
    }
}

impl fmt::Display for CertificateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vaccination {
    pub disease_agent: String,
    pub vaccine_prophylaxis: String,
    pub medicinal_product: String,
    pub marketing_authorisation_holder: String,
    pub dose_number: u32,
    pub doses_required: u32,
    pub administered_at: DateTime<Utc>,
    pub country: String,
    pub issuer: String,
    pub certificate_id: String,
}

impl Vaccination {
    pub fn is_fully_vaccinated(&self) -> bool {
        self.dose_number >= self.doses_required
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestKind {
    RapidAntigen { device_id: Option<String> },
    Naat { name: Option<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Test {
    pub kind: TestKind,
    pub disease_agent: String,
    pub result: String,
    pub sample_collected_at: DateTime<Utc>,
    pub testing_center: String,
    pub country: String,
    pub issuer: String,
    pub certificate_id: String,
}

impl Test {
    pub fn is_negative(&self) -> bool {
        self.result == TEST_RESULT_NEGATIVE
    }
}

/// Recovery carries its own validity bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Recovery {
    pub disease_agent: Option<String>,
    pub first_positive_at: Option<DateTime<Utc>>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub country: Option<String>,
    pub issuer: String,
    pub certificate_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Subject {
    Vaccination(Vaccination),
    Test(Test),
    Recovery(Recovery),
}

impl Subject {
    pub fn certificate_type(&self) -> CertificateType {
        match self {
            Subject::Vaccination(_) => CertificateType::Vaccination,
            Subject::Test(Test {
                kind: TestKind::Naat { .. },
                ..
            }) => CertificateType::NaatTest,
            Subject::Test(Test {
                kind: TestKind::RapidAntigen { .. },
                ..
            }) => CertificateType::RapidTest,
            Subject::Recovery(_) => CertificateType::Recovery,
        }
    }

    /// The subject's own gate, independent of any date.
    pub fn is_valid(&self) -> bool {
        match self {
            Subject::Vaccination(v) => v.is_fully_vaccinated(),
            Subject::Test(t) => t.is_negative(),
            Subject::Recovery(_) => true,
        }
    }

    /// Base date the rule engine counts from.
    pub fn valid_from(&self) -> DateTime<Utc> {
        match self {
            Subject::Vaccination(v) => v.administered_at,
            Subject::Test(t) => t.sample_collected_at,
            Subject::Recovery(r) => r.valid_from,
        }
    }

    /// Explicit end date, if the subject carries one.
    pub fn valid_to(&self) -> Option<DateTime<Utc>> {
        match self {
            Subject::Recovery(r) => Some(r.valid_until),
            Subject::Vaccination(_) | Subject::Test(_) => None,
        }
    }

    pub fn issuer(&self) -> &str {
        match self {
            Subject::Vaccination(v) => &v.issuer,
            Subject::Test(t) => &t.issuer,
            Subject::Recovery(r) => &r.issuer,
        }
    }

    /// Select the subject from the holder claims: `v`, then `t`, then `r`.
    pub(crate) fn from_claims(claims: &Claims<'_>) -> Result<Self> {
        if claims.has("v") {
            return parse_vaccination(&claims.first_entry("v", "v[0]")?).map(Subject::Vaccination);
        }
        if claims.has("t") {
            return parse_test(&claims.first_entry("t", "t[0]")?).map(Subject::Test);
        }
        if claims.has("r") {
            return parse_recovery(&claims.first_entry("r", "r[0]")?).map(Subject::Recovery);
        }
        Err(HcertError::Validation("no subject parsed".to_string()))
    }
}

fn parse_vaccination(v: &Claims<'_>) -> Result<Vaccination> {
    Ok(Vaccination {
        disease_agent: v.text("tg")?,
        vaccine_prophylaxis: v.text("vp")?,
        medicinal_product: v.text("mp")?,
        marketing_authorisation_holder: v.text("ma")?,
        dose_number: v.count("dn")?,
        doses_required: v.count("sd")?,
        administered_at: v.date("dt")?,
        country: v.text("co")?,
        issuer: v.issuer()?,
        certificate_id: v.text("ci")?,
    })
}

fn parse_test(t: &Claims<'_>) -> Result<Test> {
    let test_type = t.text("tt")?;
    let kind = match test_type.as_str() {
        TEST_TYPE_RAPID => TestKind::RapidAntigen {
            device_id: t.optional_text("ma")?,
        },
        TEST_TYPE_NAAT => TestKind::Naat {
            name: t.optional_text("nm")?,
        },
        other => {
            return Err(HcertError::Validation(format!("unknown test type {other:?}")));
        }
    };

    Ok(Test {
        kind,
        disease_agent: t.text("tg")?,
        result: t.text("tr")?,
        sample_collected_at: t.date("sc")?,
        testing_center: t.optional_text("tc")?.unwrap_or_default(),
        country: t.text("co")?,
        issuer: t.issuer()?,
        certificate_id: t.text("ci")?,
    })
}

fn parse_recovery(r: &Claims<'_>) -> Result<Recovery> {
    Ok(Recovery {
        disease_agent: r.optional_text("tg")?,
        first_positive_at: r.optional_date("fr")?,
        valid_from: r.date("df")?,
        valid_until: r.date("du")?,
        country: r.optional_text("co")?,
        issuer: r.issuer()?,
        certificate_id: r.optional_text("ci")?,
    })
}
