// Licensed under the MIT License.

//! Policy dispatch and effective validity windows.

use chrono::{DateTime, Utc};
use hcert_common::{HcertError, Result};

use crate::model::Subject;
use crate::rules::{RulePolicy, ValidityInterval};

/// Inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityWindow {
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
}

impl ValidityWindow {
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.valid_from <= date && date <= self.valid_to
    }
}

/// An ordered list of policies; the first one that supports a subject governs it.
#[derive(Debug, Clone)]
pub struct RuleSet {
    policies: Vec<RulePolicy>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            policies: vec![
                RulePolicy::naat_test(),
                RulePolicy::rapid_test(),
                RulePolicy::vaccination(),
                RulePolicy::recovery(),
            ],
        }
    }
}

impl RuleSet {
    /// An empty rule set. Every lookup fails until policies are added.
    pub fn new() -> Self {
        Self { policies: Vec::new() }
    }

    pub fn with_policy(mut self, policy: RulePolicy) -> Self {
        self.policies.push(policy);
        self
    }

    pub fn policies(&self) -> &[RulePolicy] {
        &self.policies
    }

    pub fn policy_for(&self, subject: &Subject) -> Result<&RulePolicy> {
        self.policies
            .iter()
            .find(|p| p.supports(subject))
            .ok_or_else(|| HcertError::PolicyNotFound {
                certificate_type: subject.certificate_type().to_string(),
            })
    }

    pub fn window(&self, subject: &Subject) -> Result<ValidityWindow> {
        let policy = self.policy_for(subject)?;
        window_for(policy, subject)
    }

    /// Subject gate first, then the window check.
    pub fn is_valid_at(&self, subject: &Subject, date: DateTime<Utc>) -> Result<bool> {
        let policy = self.policy_for(subject)?;
        if !subject.is_valid() {
            tracing::debug!(certificate_type = %subject.certificate_type(), "subject gate rejected");
            return Ok(false);
        }

        let window = window_for(policy, subject)?;
        let valid = window.contains(date);
        tracing::debug!(
            certificate_type = %subject.certificate_type(),
            valid_from = %window.valid_from,
            valid_to = %window.valid_to,
            valid,
            "validity window evaluated"
        );
        Ok(valid)
    }
}

fn window_for(policy: &RulePolicy, subject: &Subject) -> Result<ValidityWindow> {
    let base_from = subject.valid_from();
    let base_to = subject.valid_to().unwrap_or(base_from);
    Ok(ValidityWindow {
        valid_from: shift(base_from, policy.wait)?,
        valid_to: shift(base_to, policy.validation)?,
    })
}

fn shift(date: DateTime<Utc>, interval: Option<ValidityInterval>) -> Result<DateTime<Utc>> {
    match interval {
        None => Ok(date),
        Some(interval) => interval
            .add_to(date)
            .ok_or_else(|| HcertError::Validation(format!("{date} + {interval} is out of range"))),
    }
}
