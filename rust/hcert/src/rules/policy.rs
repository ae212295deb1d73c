// Licensed under the MIT License.

use crate::model::{CertificateType, Subject};
use crate::rules::ValidityInterval;

/// Which subjects a policy governs.
#[derive(Debug, Clone, Copy)]
pub enum PolicyPredicate {
    Type(CertificateType),
    Custom(fn(&Subject) -> bool),
}

impl PolicyPredicate {
    pub fn matches(&self, subject: &Subject) -> bool {
        match self {
            PolicyPredicate::Type(t) => subject.certificate_type() == *t,
            PolicyPredicate::Custom(f) => f(subject),
        }
    }
}

/// A validity rule for one kind of subject.
///
/// `wait` delays the start of the window; `validation` extends its end
/// past the subject's own end date (or past its start when it has none).
#[derive(Debug, Clone, Copy)]
pub struct RulePolicy {
    pub predicate: PolicyPredicate,
    pub wait: Option<ValidityInterval>,
    pub validation: Option<ValidityInterval>,
}

impl RulePolicy {
    pub fn for_type(certificate_type: CertificateType) -> Self {
        Self {
            predicate: PolicyPredicate::Type(certificate_type),
            wait: None,
            validation: None,
        }
    }

    pub fn custom(predicate: fn(&Subject) -> bool) -> Self {
        Self {
            predicate: PolicyPredicate::Custom(predicate),
            wait: None,
            validation: None,
        }
    }

    pub fn with_wait(mut self, wait: ValidityInterval) -> Self {
        self.wait = Some(wait);
        self
    }

    pub fn with_validation(mut self, validation: ValidityInterval) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn supports(&self, subject: &Subject) -> bool {
        self.predicate.matches(subject)
    }

    /// 15 days wait, valid for 18 months.
    pub fn vaccination() -> Self {
        Self::for_type(CertificateType::Vaccination)
            .with_wait(ValidityInterval::from_days(15))
            .with_validation(ValidityInterval::from_months(18))
    }

    pub fn naat_test() -> Self {
        Self::for_type(CertificateType::NaatTest).with_validation(ValidityInterval::from_hours(48))
    }

    pub fn rapid_test() -> Self {
        Self::for_type(CertificateType::RapidTest).with_validation(ValidityInterval::from_hours(24))
    }

    /// No intervals: the recovery's own bounds apply.
    pub fn recovery() -> Self {
        Self::for_type(CertificateType::Recovery)
    }
}
