// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Recurring daylight saving rules ("last Sunday of March at 02:00").
//!
//! A rule describes the same two transitions every year and so can answer
//! offset and transition queries for any instant without a table.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::instant::{Instant, MILLIS_PER_DAY};
use crate::offset::Offset;
use crate::source::Period;

// Calendar constants for Howard Hinnant's date algorithms
/// Days from March 1, year 0 to Unix epoch (January 1, 1970)
const DAYS_FROM_CIVIL_EPOCH_TO_UNIX_EPOCH: i64 = 719_468;
/// Days in a 400-year era (146097 = 400*365 + 97 leap days)
const DAYS_PER_ERA: i64 = 146_097;

/// Week value meaning "the last such weekday of the month".
pub const LAST_WEEK: u8 = 5;

/// When in the year a transition happens, in local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionRule {
    /// Month (1-12)
    month: u8,
    /// Week of month (1-4 for "first" through "fourth", 5 for "last")
    week: u8,
    /// Day of week (0 = Sunday, 1 = Monday, ..., 6 = Saturday)
    weekday: u8,
    /// Milliseconds after local midnight, up to and including 24:00
    time: i64,
}

impl TransitionRule {
    pub fn new(month: u8, week: u8, weekday: u8, time_millis: i64) -> Result<Self> {
        if !(1..=12).contains(&month)
            || !(1..=LAST_WEEK).contains(&week)
            || weekday > 6
            || !(0..=MILLIS_PER_DAY).contains(&time_millis)
        {
            return Err(Error::InvalidZoneData(format!(
                "invalid transition rule: month {}, week {}, weekday {}, time {}ms",
                month, week, weekday, time_millis
            )));
        }
        Ok(Self {
            month,
            week,
            weekday,
            time: time_millis,
        })
    }

    /// UTC instant of this year's transition, given the offset in effect
    /// just before it.
    fn instant_in(&self, year: i64, offset: Offset) -> Instant {
        let first_of_month = ymd_to_days(year, self.month, 1);

        let target_day = if self.week == LAST_WEEK {
            let last_of_month = first_of_month + days_in_month(year, self.month) as i64 - 1;
            let days_back = (weekday_of(last_of_month) + 7 - self.weekday) % 7;
            last_of_month - days_back as i64
        } else {
            let days_forward = (self.weekday + 7 - weekday_of(first_of_month)) % 7;
            first_of_month + days_forward as i64 + (self.week as i64 - 1) * 7
        };

        let local = target_day
            .saturating_mul(MILLIS_PER_DAY)
            .saturating_add(self.time);
        Instant::from_millis(local.saturating_sub(offset.millis() as i64))
    }
}

/// A yearly pair of transitions into and out of daylight saving time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringRule {
    standard: Offset,
    daylight: Offset,
    /// When DST starts, in local standard time
    start: TransitionRule,
    /// When DST ends, in local daylight time
    end: TransitionRule,
    standard_key: Arc<str>,
    daylight_key: Arc<str>,
}

impl RecurringRule {
    /// `save` is the extra offset during daylight saving (typically +1h);
    /// it may be negative but not zero.
    pub fn new(
        standard: Offset,
        save: i64,
        start: TransitionRule,
        end: TransitionRule,
        standard_key: impl Into<Arc<str>>,
        daylight_key: impl Into<Arc<str>>,
    ) -> Result<Self> {
        if save == 0 {
            return Err(Error::InvalidZoneData(
                "daylight saving amount must not be zero".to_string(),
            ));
        }
        let daylight = Offset::from_millis(standard.millis() as i64 + save)
            .map_err(|e| Error::InvalidZoneData(e.to_string()))?;
        Ok(Self {
            standard,
            daylight,
            start,
            end,
            standard_key: standard_key.into(),
            daylight_key: daylight_key.into(),
        })
    }

    pub fn standard_offset(&self) -> Offset {
        self.standard
    }

    pub fn period_at(&self, instant: Instant) -> Period {
        if self.is_dst_active(instant) {
            Period::new(self.daylight, self.standard, self.daylight_key.clone())
        } else {
            Period::standard(self.standard, self.standard_key.clone())
        }
    }

    pub fn offset_at(&self, instant: Instant) -> Offset {
        if self.is_dst_active(instant) {
            self.daylight
        } else {
            self.standard
        }
    }

    /// The first rule transition strictly after `instant`.
    pub fn next_after(&self, instant: Instant) -> Option<Instant> {
        let year = self.year_of(instant);
        (year - 1..=year + 1)
            .flat_map(|y| self.transitions_in(y))
            .filter(|&t| t > instant)
            .min()
    }

    /// The last rule transition at or before `instant`.
    pub fn latest_at_or_before(&self, instant: Instant) -> Option<Instant> {
        let year = self.year_of(instant);
        (year - 1..=year + 1)
            .flat_map(|y| self.transitions_in(y))
            .filter(|&t| t <= instant)
            .max()
    }

    fn transitions_in(&self, year: i64) -> [Instant; 2] {
        [
            self.start.instant_in(year, self.standard),
            self.end.instant_in(year, self.daylight),
        ]
    }

    fn is_dst_active(&self, instant: Instant) -> bool {
        let [dst_start, dst_end] = self.transitions_in(self.year_of(instant));

        // Handle northern vs southern hemisphere (start < end vs start > end)
        if dst_start < dst_end {
            instant >= dst_start && instant < dst_end
        } else {
            instant >= dst_start || instant < dst_end
        }
    }

    /// Calendar year of `instant` in local standard time.
    fn year_of(&self, instant: Instant) -> i64 {
        let local = instant
            .millis()
            .saturating_add(self.standard.millis() as i64);
        days_to_ymd(local.div_euclid(MILLIS_PER_DAY)).0
    }
}

/// Day of week for days since the Unix epoch (0 = Sunday; the epoch was a Thursday).
fn weekday_of(days: i64) -> u8 {
    (days + 4).rem_euclid(7) as u8
}

/// Convert days since the Unix epoch to year/month/day.
/// Based on Howard Hinnant's date algorithms.
pub(crate) fn days_to_ymd(days: i64) -> (i64, u8, u8) {
    let days = days + DAYS_FROM_CIVIL_EPOCH_TO_UNIX_EPOCH;
    let era = days.div_euclid(DAYS_PER_ERA);
    let doe = days.rem_euclid(DAYS_PER_ERA); // day of era
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365; // year of era
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // day of year
    let mp = (5 * doy + 2) / 153; // month index (0 = Mar, 11 = Feb)
    let d = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u8;
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

/// Convert year/month/day to days since the Unix epoch.
pub(crate) fn ymd_to_days(year: i64, month: u8, day: u8) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y.rem_euclid(400);
    let m = month as i64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * DAYS_PER_ERA + doe - DAYS_FROM_CIVIL_EPOCH_TO_UNIX_EPOCH
}

fn days_in_month(year: i64, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
                29
            } else {
                28
            }
        },
        _ => 30,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instant::MILLIS_PER_HOUR;

    fn eu_rule() -> RecurringRule {
        RecurringRule::new(
            Offset::from_millis(MILLIS_PER_HOUR).unwrap(),
            MILLIS_PER_HOUR,
            TransitionRule::new(3, LAST_WEEK, 0, 2 * MILLIS_PER_HOUR).unwrap(),
            TransitionRule::new(10, LAST_WEEK, 0, 3 * MILLIS_PER_HOUR).unwrap(),
            "CET",
            "CEST",
        )
        .unwrap()
    }

    #[test]
    fn test_calendar_round_trip() {
        for days in [-719_468, -1, 0, 1, 17_615, 47_482, 2_932_896] {
            let (y, m, d) = days_to_ymd(days);
            assert_eq!(ymd_to_days(y, m, d), days);
        }
        assert_eq!(days_to_ymd(0), (1970, 1, 1));
        assert_eq!(days_to_ymd(17_615), (2018, 3, 25));
        assert_eq!(weekday_of(17_615), 0);
    }

    #[test]
    fn test_eu_transitions_2018() {
        let rule = eu_rule();
        // 2018-03-25T01:00:00Z and 2018-10-28T01:00:00Z
        let [start, end] = rule.transitions_in(2018);
        assert_eq!(start.millis(), 1_521_939_600_000);
        assert_eq!(end.millis(), 1_540_688_400_000);

        assert_eq!(rule.offset_at(Instant::from_millis(1_521_939_599_999)).millis(), 3_600_000);
        assert_eq!(rule.offset_at(start).millis(), 7_200_000);
        assert_eq!(rule.offset_at(end).millis(), 3_600_000);
        assert_eq!(&*rule.period_at(start).name_key, "CEST");
    }

    #[test]
    fn test_next_and_previous() {
        let rule = eu_rule();
        let start = Instant::from_millis(1_521_939_600_000);
        let end = Instant::from_millis(1_540_688_400_000);
        assert_eq!(rule.next_after(Instant::from_millis(1_514_764_800_000)), Some(start));
        assert_eq!(rule.next_after(start), Some(end));
        assert_eq!(rule.latest_at_or_before(start), Some(start));
        assert_eq!(
            rule.latest_at_or_before(Instant::from_millis(start.millis() - 1))
                .map(|t| t < start),
            Some(true)
        );
    }

    #[test]
    fn test_southern_hemisphere() {
        // AEST/AEDT: first Sunday of October 02:00 to first Sunday of April 03:00
        let rule = RecurringRule::new(
            Offset::from_millis(10 * MILLIS_PER_HOUR).unwrap(),
            MILLIS_PER_HOUR,
            TransitionRule::new(10, 1, 0, 2 * MILLIS_PER_HOUR).unwrap(),
            TransitionRule::new(4, 1, 0, 3 * MILLIS_PER_HOUR).unwrap(),
            "AEST",
            "AEDT",
        )
        .unwrap();
        // 2024-01-01T00:00:00Z is summer in Sydney
        assert_eq!(
            rule.offset_at(Instant::from_millis(1_704_067_200_000)).millis(),
            11 * MILLIS_PER_HOUR as i32
        );
        // 2024-07-03 is winter
        assert_eq!(
            rule.offset_at(Instant::from_millis(1_720_000_000_000)).millis(),
            10 * MILLIS_PER_HOUR as i32
        );
    }

    #[test]
    fn test_invalid_rules() {
        assert!(TransitionRule::new(13, 1, 0, 0).is_err());
        assert!(TransitionRule::new(3, 6, 0, 0).is_err());
        assert!(TransitionRule::new(3, 1, 7, 0).is_err());
        assert!(TransitionRule::new(3, 1, 0, MILLIS_PER_DAY + 1).is_err());
        let start = TransitionRule::new(3, LAST_WEEK, 0, 0).unwrap();
        assert!(RecurringRule::new(Offset::UTC, 0, start, start, "A", "B").is_err());
    }
}
