// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Millisecond instants on the UTC and the local (wall-clock) timelines.
//!
//! [`Instant`] and [`LocalInstant`] share a representation but are different
//! types: moving between them always goes through an [`Offset`], either with
//! a checked conversion ([`Instant::to_local`], [`LocalInstant::to_utc`]) or,
//! inside the resolution engine, with an explicitly named estimate.

use std::fmt;

use chrono::{DateTime, NaiveDateTime};

use crate::error::{Error, Result};
use crate::offset::Offset;

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

const ISO_LOCAL: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Milliseconds since 1970-01-01T00:00:00Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(i64);

/// Wall-clock milliseconds since 1970-01-01T00:00:00 in some zone, i.e.
/// `utc + offset`. Not an instant: the same UTC instant has a different
/// local value in every zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalInstant(i64);

impl Instant {
    pub const MIN: Instant = Instant(i64::MIN);
    pub const MAX: Instant = Instant(i64::MAX);
    pub const EPOCH: Instant = Instant(0);

    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Instant(millis)
    }

    #[inline]
    pub const fn millis(self) -> i64 {
        self.0
    }

    pub fn saturating_add_millis(self, millis: i64) -> Self {
        Instant(self.0.saturating_add(millis))
    }

    /// Signed distance `self - other` in milliseconds, saturating.
    pub fn millis_since(self, other: Instant) -> i64 {
        self.0.saturating_sub(other.0)
    }

    /// Adds `offset` to obtain the local wall-clock value.
    pub fn to_local(self, offset: Offset) -> Result<LocalInstant> {
        self.0
            .checked_add(offset.millis() as i64)
            .map(LocalInstant)
            .ok_or(Error::ArithmeticOverflow("Adding time zone offset"))
    }

    pub fn from_naive_utc(utc: &NaiveDateTime) -> Self {
        Instant(utc.and_utc().timestamp_millis())
    }

    pub fn to_naive_utc(self) -> Option<NaiveDateTime> {
        millis_to_naive(self.0)
    }
}

impl LocalInstant {
    pub const MIN: LocalInstant = LocalInstant(i64::MIN);
    pub const MAX: LocalInstant = LocalInstant(i64::MAX);

    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        LocalInstant(millis)
    }

    #[inline]
    pub const fn millis(self) -> i64 {
        self.0
    }

    /// Subtracts `offset` to obtain the UTC instant.
    pub fn to_utc(self, offset: Offset) -> Result<Instant> {
        self.0
            .checked_sub(offset.millis() as i64)
            .map(Instant)
            .ok_or(Error::ArithmeticOverflow("Subtracting time zone offset"))
    }

    /// Reinterprets the wall-clock value as if it were UTC.
    ///
    /// This is only a first guess used when inverting a zone's offset
    /// function, never a conversion.
    #[inline]
    pub(crate) fn as_if_utc(self) -> Instant {
        Instant(self.0)
    }

    /// `self - offset`, saturating at the ends of the timeline. Used for
    /// candidate instants that are probed but not returned.
    #[inline]
    pub(crate) fn estimate_utc(self, offset: Offset) -> Instant {
        Instant(self.0.saturating_sub(offset.millis() as i64))
    }

    /// Interprets a naive date-time as a wall-clock reading, truncating
    /// below milliseconds.
    pub fn from_naive(local: &NaiveDateTime) -> Self {
        LocalInstant(local.and_utc().timestamp_millis())
    }

    pub fn to_naive(self) -> Option<NaiveDateTime> {
        millis_to_naive(self.0)
    }
}

fn millis_to_naive(millis: i64) -> Option<NaiveDateTime> {
    let secs = millis.div_euclid(MILLIS_PER_SECOND);
    let nanos = (millis.rem_euclid(MILLIS_PER_SECOND) * 1_000_000) as u32;
    DateTime::from_timestamp(secs, nanos).map(|utc| utc.naive_utc())
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_naive_utc() {
            Some(naive) => write!(f, "{}Z", naive.format(ISO_LOCAL)),
            None => write!(f, "{}ms", self.0),
        }
    }
}

impl fmt::Display for LocalInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_naive() {
            Some(naive) => write!(f, "{}", naive.format(ISO_LOCAL)),
            None => write!(f, "{}ms", self.0),
        }
    }
}
