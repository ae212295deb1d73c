// Licensed under the MIT License.

//! Typed reads from a decoded claims map.
//!
//! Every failure is a [`HcertError::Validation`] naming the claim path.

use chrono::{DateTime, Utc};
use hcert_common::{CborKey, CborValue, HcertError, Result};

use super::dates::date_from_value;

pub(crate) const MAX_ISSUER_LEN: usize = 80;

/// A claims map plus the path it was reached by, for error messages.
#[derive(Clone, Copy)]
pub(crate) struct Claims<'a> {
    value: &'a CborValue,
    path: &'a str,
}

impl<'a> Claims<'a> {
    pub(crate) fn new(value: &'a CborValue, path: &'a str) -> Result<Self> {
        match value.untagged() {
            v @ CborValue::Map(_) => Ok(Self { value: v, path }),
            _ => Err(HcertError::Validation(format!("{path} is not a map"))),
        }
    }

    pub(crate) fn get(&self, key: impl Into<CborKey>) -> Option<&'a CborValue> {
        self.value.get(key).filter(|v| !matches!(v, CborValue::Null))
    }

    pub(crate) fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub(crate) fn text(&self, key: &str) -> Result<String> {
        self.optional_text(key)?.ok_or_else(|| self.missing(key))
    }

    pub(crate) fn optional_text(&self, key: &str) -> Result<Option<String>> {
        match self.get(key).map(CborValue::untagged) {
            None => Ok(None),
            Some(CborValue::Text(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.wrong_type(key, "text")),
        }
    }

    /// Non-negative count, given as an integer or a digit string.
    pub(crate) fn count(&self, key: &str) -> Result<u32> {
        let value = self.get(key).ok_or_else(|| self.missing(key))?;
        let parsed = match value.untagged() {
            CborValue::Int(i) => u32::try_from(*i).ok(),
            CborValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| self.wrong_type(key, "non-negative integer"))
    }

    pub(crate) fn date(&self, key: impl Into<CborKey> + Copy + std::fmt::Display) -> Result<DateTime<Utc>> {
        let value = self.get(key).ok_or_else(|| self.missing(key))?;
        date_from_value(value).map_err(|e| HcertError::Validation(format!("{}.{key}: {e}", self.path)))
    }

    pub(crate) fn optional_date(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        if self.has(key) {
            self.date(key).map(Some)
        } else {
            Ok(None)
        }
    }

    pub(crate) fn issuer(&self) -> Result<String> {
        let issuer = self.optional_text("is")?.unwrap_or_default();
        if issuer.chars().count() > MAX_ISSUER_LEN {
            return Err(HcertError::Validation(format!(
                "{}.is exceeds {MAX_ISSUER_LEN} characters",
                self.path
            )));
        }
        Ok(issuer)
    }

    /// The first entry of an array claim; the array must not be empty.
    pub(crate) fn first_entry(&self, key: &str, path: &'a str) -> Result<Claims<'a>> {
        let value = self.get(key).ok_or_else(|| self.missing(key))?;
        let entries = value
            .untagged()
            .as_array()
            .ok_or_else(|| self.wrong_type(key, "array"))?;
        let first = entries
            .first()
            .ok_or_else(|| HcertError::Validation(format!("{}.{key} is empty", self.path)))?;
        Claims::new(first, path)
    }

    fn missing(&self, key: impl std::fmt::Display) -> HcertError {
        HcertError::Validation(format!("missing claim {}.{key}", self.path))
    }

    fn wrong_type(&self, key: &str, expected: &str) -> HcertError {
        HcertError::Validation(format!("claim {}.{key} is not {expected}", self.path))
    }
}
