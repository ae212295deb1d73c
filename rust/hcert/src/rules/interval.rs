// Licensed under the MIT License.

//! Calendar-aware durations written as ISO-8601 (`P15D`, `P18M`, `PT48H`).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike as _, Days, Duration, Months, Utc};
use hcert_common::HcertError;

/// A duration applied in calendar order: months, then days, then clock time.
///
/// Month arithmetic keeps the day of month and rolls any excess into the
/// following month (`2000-01-31 + P1M = 2000-03-02`).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct ValidityInterval {
    pub months: u32,
    pub days: u32,
    pub seconds: u64,
}

impl ValidityInterval {
    pub const fn from_months(months: u32) -> Self {
        Self {
            months,
            days: 0,
            seconds: 0,
        }
    }

    pub const fn from_days(days: u32) -> Self {
        Self {
            months: 0,
            days,
            seconds: 0,
        }
    }

    pub const fn from_hours(hours: u32) -> Self {
        Self {
            months: 0,
            days: 0,
            seconds: hours as u64 * 3600,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// `None` when the result leaves chrono's representable range.
    pub fn add_to(&self, date: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.seconds).ok()?;
        add_months_rolling(date, self.months)?
            .checked_add_days(Days::new(u64::from(self.days)))?
            .checked_add_signed(Duration::try_seconds(secs)?)
    }
}

impl FromStr for ValidityInterval {
    type Err = HcertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |why: &str| HcertError::Validation(format!("invalid ISO-8601 duration {s:?}: {why}"));

        let body = s.strip_prefix('P').ok_or_else(|| invalid("must start with P"))?;
        if body.is_empty() {
            return Err(invalid("no components"));
        }

        let mut out = ValidityInterval::default();
        let mut in_time = false;
        let mut saw_component = false;
        let mut saw_time_component = false;
        let mut digits = String::new();

        for c in body.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            if c == 'T' {
                if in_time || !digits.is_empty() {
                    return Err(invalid("misplaced T"));
                }
                in_time = true;
                continue;
            }

            if digits.is_empty() {
                return Err(invalid("designator without a number"));
            }
            let n: u32 = digits.parse().map_err(|_| invalid("number out of range"))?;
            digits.clear();
            saw_component = true;
            saw_time_component |= in_time;

            let overflow = || invalid("number out of range");
            match (in_time, c) {
                (false, 'Y') => out.months = add_scaled(out.months, n, 12).ok_or_else(overflow)?,
                (false, 'M') => out.months = add_scaled(out.months, n, 1).ok_or_else(overflow)?,
                (false, 'W') => out.days = add_scaled(out.days, n, 7).ok_or_else(overflow)?,
                (false, 'D') => out.days = add_scaled(out.days, n, 1).ok_or_else(overflow)?,
                (true, 'H') => out.seconds += u64::from(n) * 3600,
                (true, 'M') => out.seconds += u64::from(n) * 60,
                (true, 'S') => out.seconds += u64::from(n),
                _ => return Err(invalid("unknown designator")),
            }
        }

        if !digits.is_empty() {
            return Err(invalid("trailing number without designator"));
        }
        if !saw_component {
            return Err(invalid("no components"));
        }
        if in_time && !saw_time_component {
            return Err(invalid("T without time components"));
        }
        Ok(out)
    }
}

/// Advance the calendar month, then re-apply the original day of month
/// counted from the first, so a day past the end overflows.
fn add_months_rolling(date: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    let naive = date.naive_utc();
    let first = naive
        .date()
        .with_day(1)?
        .checked_add_months(Months::new(months))?;
    let day = first.checked_add_days(Days::new(u64::from(naive.day() - 1)))?;
    Some(day.and_time(naive.time()).and_utc())
}

fn add_scaled(acc: u32, n: u32, scale: u32) -> Option<u32> {
    acc.checked_add(n.checked_mul(scale)?)
}

impl fmt::Display for ValidityInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("PT0S");
        }
        f.write_str("P")?;
        if self.months > 0 {
            write!(f, "{}M", self.months)?;
        }
        if self.days > 0 {
            write!(f, "{}D", self.days)?;
        }
        if self.seconds > 0 {
            f.write_str("T")?;
            let (h, rest) = (self.seconds / 3600, self.seconds % 3600);
            let (m, s) = (rest / 60, rest % 60);
            if h > 0 {
                write!(f, "{h}H")?;
            }
            if m > 0 {
                write!(f, "{m}M")?;
            }
            if s > 0 {
                write!(f, "{s}S")?;
            }
        }
        Ok(())
    }
}
