//! Preparation period: a non-negative duration stored and exchanged as a
//! Go-style duration string (`"10m0s"`, `"1h30m0s"`, `"250ms"`).

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RecipeError;

const NANOS_PER_SEC: u128 = 1_000_000_000;
// Fraction digits beyond this cannot change the result at nanosecond resolution.
const MAX_FRACTION_DIGITS: usize = 20;

/// Time needed to prepare a recipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrepPeriod(Duration);

impl PrepPeriod {
    pub const ZERO: PrepPeriod = PrepPeriod(Duration::ZERO);

    pub fn new(duration: Duration) -> Self {
        Self(duration)
    }

    pub fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    pub fn duration(&self) -> Duration {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Parses a value read back from the store, where a missing field is an empty string.
    pub fn from_stored(value: &str) -> Result<Self, RecipeError> {
        if value.is_empty() {
            return Ok(Self::ZERO);
        }
        value.parse()
    }
}

impl From<Duration> for PrepPeriod {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

impl FromStr for PrepPeriod {
    type Err = RecipeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut rest = input.strip_prefix('+').unwrap_or(input);
        if rest.starts_with('-') {
            return Err(RecipeError::prep_period(input, "negative duration"));
        }
        if rest == "0" {
            return Ok(Self::ZERO);
        }
        if rest.is_empty() {
            return Err(RecipeError::prep_period(input, "empty duration"));
        }

        let mut total: u128 = 0;
        while !rest.is_empty() {
            let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            let (int_digits, after_int) = rest.split_at(int_len);

            let (frac_digits, after_number) = match after_int.strip_prefix('.') {
                Some(after_dot) => {
                    let frac_len = after_dot
                        .find(|c: char| !c.is_ascii_digit())
                        .unwrap_or(after_dot.len());
                    after_dot.split_at(frac_len)
                }
                None => ("", after_int),
            };
            if int_digits.is_empty() && frac_digits.is_empty() {
                return Err(RecipeError::prep_period(input, "expected a number"));
            }

            let unit_len = after_number
                .find(|c: char| c.is_ascii_digit() || c == '.')
                .unwrap_or(after_number.len());
            let (unit, next) = after_number.split_at(unit_len);
            let unit_nanos = unit_in_nanos(unit).ok_or_else(|| {
                if unit.is_empty() {
                    RecipeError::prep_period(input, "missing unit")
                } else {
                    RecipeError::prep_period(input, format!("unknown unit {unit:?}"))
                }
            })?;

            let overflow = || RecipeError::prep_period(input, "duration out of range");
            let whole = if int_digits.is_empty() {
                0
            } else {
                int_digits.parse::<u128>().map_err(|_| overflow())?
            };
            let mut part = whole.checked_mul(unit_nanos).ok_or_else(overflow)?;

            let frac_digits = &frac_digits[..frac_digits.len().min(MAX_FRACTION_DIGITS)];
            if !frac_digits.is_empty() {
                let numerator = frac_digits.parse::<u128>().map_err(|_| overflow())?;
                let scale = 10u128.pow(frac_digits.len() as u32);
                let frac = numerator.checked_mul(unit_nanos).ok_or_else(overflow)? / scale;
                part = part.checked_add(frac).ok_or_else(overflow)?;
            }

            total = total.checked_add(part).ok_or_else(overflow)?;
            rest = next;
        }

        let secs = u64::try_from(total / NANOS_PER_SEC)
            .map_err(|_| RecipeError::prep_period(input, "duration out of range"))?;
        let nanos = (total % NANOS_PER_SEC) as u32;
        Ok(Self(Duration::new(secs, nanos)))
    }
}

fn unit_in_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Renders `value / unit` with the remainder as a trimmed decimal fraction.
fn write_scaled(f: &mut fmt::Formatter<'_>, value: u128, unit: u128) -> fmt::Result {
    let whole = value / unit;
    let rem = value % unit;
    if rem == 0 {
        return write!(f, "{whole}");
    }
    let width = unit.ilog10() as usize;
    let frac = format!("{rem:0width$}");
    write!(f, "{whole}.{}", frac.trim_end_matches('0'))
}

impl fmt::Display for PrepPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.as_nanos();
        if total == 0 {
            return f.write_str("0s");
        }

        if total < NANOS_PER_SEC {
            return if total < 1_000 {
                write!(f, "{total}ns")
            } else if total < 1_000_000 {
                write_scaled(f, total, 1_000)?;
                f.write_str("µs")
            } else {
                write_scaled(f, total, 1_000_000)?;
                f.write_str("ms")
            };
        }

        let secs = self.0.as_secs();
        let hours = secs / 3_600;
        let minutes = (secs / 60) % 60;
        if hours > 0 {
            write!(f, "{hours}h")?;
        }
        if hours > 0 || minutes > 0 {
            write!(f, "{minutes}m")?;
        }
        let seconds_nanos = u128::from(secs % 60) * NANOS_PER_SEC + u128::from(self.0.subsec_nanos());
        write_scaled(f, seconds_nanos, NANOS_PER_SEC)?;
        f.write_str("s")
    }
}

impl Serialize for PrepPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PrepPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_stored(&raw).map_err(serde::de::Error::custom)
    }
}
