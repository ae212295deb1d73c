// Licensed under the MIT License.

//! Normalization of claim dates to `DateTime<Utc>`.
//!
//! Issuers encode dates in several ways: as CBOR-tagged values (tag 0 text,
//! tag 1 epoch, tag 1004 full-date), as plain text, or as bare epoch numbers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use hcert_common::CborValue;

const TAG_DATE_TIME_TEXT: u64 = 0;
const TAG_EPOCH: u64 = 1;
const TAG_FULL_DATE: u64 = 1004;

pub(crate) fn date_from_value(value: &CborValue) -> Result<DateTime<Utc>, String> {
    match value {
        CborValue::Tagged(TAG_DATE_TIME_TEXT | TAG_FULL_DATE, inner) => match inner.as_ref() {
            CborValue::Text(s) => parse_date_text(s).ok_or_else(|| format!("invalid date text {s:?}")),
            _ => Err("tagged date is not text".to_string()),
        },
        CborValue::Tagged(TAG_EPOCH, inner) => date_from_value(inner),
        CborValue::Tagged(tag, _) => Err(format!("unexpected tag {tag} on date value")),
        CborValue::Text(s) => parse_date_text(s).ok_or_else(|| format!("invalid date text {s:?}")),
        CborValue::Int(secs) => from_epoch_seconds(*secs, 0),
        CborValue::Float(f) if f.is_finite() => {
            let secs = f.floor();
            let nanos = ((f - secs) * 1e9) as u32;
            from_epoch_seconds(secs as i64, nanos)
        }
        _ => Err("date is neither text nor a number".to_string()),
    }
}

/// Parse RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.f]` (taken as UTC), or `YYYY-MM-DD` (midnight UTC).
pub fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) fn from_epoch_seconds(secs: i64, nanos: u32) -> Result<DateTime<Utc>, String> {
    DateTime::<Utc>::from_timestamp(secs, nanos).ok_or_else(|| format!("epoch timestamp {secs} out of range"))
}
