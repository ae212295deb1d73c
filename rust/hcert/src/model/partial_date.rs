// Licensed under the MIT License.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use hcert_common::HcertError;

/// A date of birth that may be known only to the year or month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialDate {
    Empty,
    Year(i32),
    YearMonth(i32, u32),
    Full(NaiveDate),
}

impl FromStr for PartialDate {
    type Err = HcertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HcertError::Validation(format!("invalid date of birth {s:?}"));

        // Some issuers append a time component; only the date part counts.
        let date = s.trim().split('T').next().unwrap_or_default();
        if date.is_empty() {
            return Ok(PartialDate::Empty);
        }

        let parts: Vec<&str> = date.split('-').collect();
        let year = parse_year(parts[0]).ok_or_else(invalid)?;
        match parts.as_slice() {
            [_] => Ok(PartialDate::Year(year)),
            [_, month] => {
                let month = parse_month(month).ok_or_else(invalid)?;
                Ok(PartialDate::YearMonth(year, month))
            }
            [_, month, day] => {
                let month = parse_month(month).ok_or_else(invalid)?;
                let day: u32 = parse_two_digits(day).ok_or_else(invalid)?;
                NaiveDate::from_ymd_opt(year, month, day)
                    .map(PartialDate::Full)
                    .ok_or_else(invalid)
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartialDate::Empty => Ok(()),
            PartialDate::Year(y) => write!(f, "{y:04}"),
            PartialDate::YearMonth(y, m) => write!(f, "{y:04}-{m:02}"),
            PartialDate::Full(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

fn parse_year(s: &str) -> Option<i32> {
    (s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()))
        .then(|| s.parse().ok())
        .flatten()
}

fn parse_month(s: &str) -> Option<u32> {
    parse_two_digits(s).filter(|m| (1..=12).contains(m))
}

fn parse_two_digits(s: &str) -> Option<u32> {
    (s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit()))
        .then(|| s.parse().ok())
        .flatten()
}
