// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! UTC offsets and their `[+-]hh:mm[:ss[.SSS]]` text form.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::instant::{MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND};

/// Largest offset magnitude: 23:59:59.999.
const MAX_OFFSET_MILLIS: i64 = 24 * MILLIS_PER_HOUR - 1;

/// Milliseconds added to UTC to obtain local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Offset(i32);

impl Offset {
    pub const UTC: Offset = Offset(0);

    pub fn from_millis(millis: i64) -> Result<Self> {
        if !(-MAX_OFFSET_MILLIS..=MAX_OFFSET_MILLIS).contains(&millis) {
            return Err(Error::InvalidOffset(format!(
                "{} milliseconds is out of range",
                millis
            )));
        }
        Ok(Offset(millis as i32))
    }

    pub fn from_seconds(seconds: i32) -> Result<Self> {
        Self::from_millis(seconds as i64 * MILLIS_PER_SECOND)
    }

    /// Builds an offset from hours and minutes.
    ///
    /// Hours range over -23..=23 and minutes over -59..=59. Positive hours
    /// cannot be paired with negative minutes; with negative hours the
    /// minutes extend the offset further west, so `(-2, 30)` is `-02:30`.
    /// `(0, -30)` is the only way to express `-00:30`.
    pub fn from_hours_minutes(hours: i32, minutes: i32) -> Result<Self> {
        if !(-23..=23).contains(&hours) {
            return Err(Error::InvalidOffset(format!("hours out of range: {}", hours)));
        }
        if !(-59..=59).contains(&minutes) {
            return Err(Error::InvalidOffset(format!(
                "minutes out of range: {}",
                minutes
            )));
        }
        if hours > 0 && minutes < 0 {
            return Err(Error::InvalidOffset(format!(
                "positive hours must not have negative minutes: {}",
                minutes
            )));
        }
        let hours_in_minutes = hours * 60;
        let total_minutes = if hours_in_minutes < 0 {
            hours_in_minutes - minutes.abs()
        } else {
            hours_in_minutes + minutes
        };
        Self::from_millis(total_minutes as i64 * MILLIS_PER_MINUTE)
    }

    #[inline]
    pub const fn millis(self) -> i32 {
        self.0
    }

    /// Whole seconds, truncated toward zero.
    #[inline]
    pub const fn seconds(self) -> i32 {
        self.0 / MILLIS_PER_SECOND as i32
    }

    #[inline]
    pub const fn is_utc(self) -> bool {
        self.0 == 0
    }
}

impl FromStr for Offset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_offset(s.as_bytes()).ok_or_else(|| Error::MalformedOffsetString(s.to_string()))
    }
}

/// `[+-]hh(:mm(:ss(.SSS)?)?)?`
fn parse_offset(text: &[u8]) -> Option<Offset> {
    let (&sign, mut rest) = text.split_first()?;
    let negative = match sign {
        b'+' => false,
        b'-' => true,
        _ => return None,
    };

    let hours = take_digits(&mut rest, 2, 23)?;
    let mut millis = hours * MILLIS_PER_HOUR;

    if let Some(after) = rest.strip_prefix(b":") {
        rest = after;
        millis += take_digits(&mut rest, 2, 59)? * MILLIS_PER_MINUTE;

        if let Some(after) = rest.strip_prefix(b":") {
            rest = after;
            millis += take_digits(&mut rest, 2, 59)? * MILLIS_PER_SECOND;

            if let Some(after) = rest.strip_prefix(b".") {
                rest = after;
                millis += take_digits(&mut rest, 3, 999)?;
            }
        }
    }

    if !rest.is_empty() {
        return None;
    }
    Offset::from_millis(if negative { -millis } else { millis }).ok()
}

/// Consumes exactly `width` ASCII digits whose value is at most `max`.
fn take_digits(rest: &mut &[u8], width: usize, max: i64) -> Option<i64> {
    let slice: &[u8] = *rest;
    let digits = slice.get(..width)?;
    let mut value = 0i64;
    for &b in digits {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value * 10 + (b - b'0') as i64;
    }
    if value > max {
        return None;
    }
    *rest = &slice[width..];
    Some(value)
}

impl fmt::Display for Offset {
    /// Prints `+hh:mm`, adding `:ss` and then `.SSS` only while the
    /// remaining lower groups are non-zero.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rem = self.0 as i64;
        let sign = if rem < 0 { '-' } else { '+' };
        rem = rem.abs();

        let hours = rem / MILLIS_PER_HOUR;
        rem -= hours * MILLIS_PER_HOUR;
        let minutes = rem / MILLIS_PER_MINUTE;
        rem -= minutes * MILLIS_PER_MINUTE;
        write!(f, "{}{:02}:{:02}", sign, hours, minutes)?;
        if rem == 0 {
            return Ok(());
        }

        let seconds = rem / MILLIS_PER_SECOND;
        rem -= seconds * MILLIS_PER_SECOND;
        write!(f, ":{:02}", seconds)?;
        if rem == 0 {
            return Ok(());
        }

        write!(f, ".{:03}", rem)
    }
}
