// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Offset resolution between the UTC and local timelines.
//!
//! The UTC to local direction is a plain lookup. The reverse has to invert
//! the offset function of the zone, which is not injective:
//!
//! * in a **gap** (clocks jump forward) some local readings never happen;
//! * in an **overlap** (clocks fall back) some local readings happen twice.
//!
//! The inversion guesses the offset by treating the local value as UTC,
//! corrects the guess once, and then uses neighbouring transitions to decide
//! which side of a change the reading belongs to. The offset lookup resolves
//! overlaps to the earlier instant (the summer offset); gaps shift forward by
//! the gap length.

use chrono::NaiveDateTime;

use crate::error::{Error, Result};
use crate::instant::{Instant, LocalInstant, MILLIS_PER_HOUR};
use crate::offset::Offset;
use crate::zone::Zone;

/// How far either side of an instant [`Zone::adjust_offset`] looks for an
/// overlap.
const OVERLAP_PROBE_MILLIS: i64 = 3 * MILLIS_PER_HOUR;

impl Zone {
    /// Offset to subtract from `local` to obtain UTC.
    ///
    /// For a reading in an overlap this is the earlier (larger) offset; for
    /// a reading in a gap it is the offset before the gap, which moves the
    /// result forward past the gap.
    pub fn offset_from_local(&self, local: LocalInstant) -> Offset {
        let offset_local = self.offset(local.as_if_utc());
        let instant_adjusted = local.estimate_utc(offset_local);
        let offset_adjusted = self.offset(instant_adjusted);

        if offset_local != offset_adjusted {
            // The first guess crossed a transition. When the later offset is
            // larger and the candidates fall into different transition
            // intervals, the reading is in a gap.
            if offset_local < offset_adjusted
                && self.candidates_straddle_transition(local, offset_local, offset_adjusted)
            {
                return offset_local;
            }
        } else if offset_local.millis() >= 0 {
            // Both guesses agree, but the reading may sit in the second half
            // of an overlap whose earlier occurrence has a larger offset.
            let prev = self.previous_transition(instant_adjusted);
            if prev < instant_adjusted {
                let offset_prev = self.offset(prev);
                let diff = offset_prev.millis() as i64 - offset_local.millis() as i64;
                if instant_adjusted.millis_since(prev) <= diff {
                    return offset_prev;
                }
            }
        }
        offset_adjusted
    }

    pub fn convert_utc_to_local(&self, instant: Instant) -> Result<LocalInstant> {
        instant.to_local(self.offset(instant))
    }

    /// Converts a wall-clock reading to UTC.
    ///
    /// With `strict`, a reading inside a gap fails with
    /// [`Error::InvalidInstant`]; otherwise it moves forward by the gap
    /// length. In an overlap the candidate implied by the offset estimate
    /// is kept; use [`Zone::convert_local_to_utc_with`] or
    /// [`Zone::adjust_offset`] to pick a side. Fails with
    /// [`Error::ArithmeticOverflow`] at the ends of the timeline.
    pub fn convert_local_to_utc(&self, local: LocalInstant, strict: bool) -> Result<Instant> {
        let offset_local = self.offset(local.as_if_utc());
        let mut offset = self.offset(local.estimate_utc(offset_local));

        if offset_local != offset
            && (strict || offset_local.millis() < 0)
            && self.candidates_straddle_transition(local, offset_local, offset)
        {
            if strict {
                return Err(Error::InvalidInstant {
                    local,
                    zone: self.id().to_string(),
                });
            }
            offset = offset_local;
        }

        local.to_utc(offset)
    }

    /// Like [`Zone::convert_local_to_utc`], but keeps the offset of
    /// `original` whenever that offset is valid for `local`. This preserves
    /// which side of an overlap a value was on when only its wall-clock
    /// fields change.
    pub fn convert_local_to_utc_with(
        &self,
        local: LocalInstant,
        strict: bool,
        original: Instant,
    ) -> Result<Instant> {
        let offset_original = self.offset(original);
        match local.to_utc(offset_original) {
            Ok(candidate) if self.offset(candidate) == offset_original => Ok(candidate),
            _ => self.convert_local_to_utc(local, strict),
        }
    }

    /// The instant in `to` whose wall-clock reading matches that of
    /// `instant` in this zone.
    pub fn millis_keep_local(&self, to: &Zone, instant: Instant) -> Result<Instant> {
        if self == to {
            return Ok(instant);
        }
        let local = self.convert_utc_to_local(instant)?;
        to.convert_local_to_utc_with(local, false, instant)
    }

    /// Moves an instant inside an overlap to the other occurrence of the
    /// same wall-clock reading, if that is the preferred one. Instants
    /// outside an overlap are returned unchanged.
    ///
    /// Only overlaps within three hours of `instant` are considered.
    pub fn adjust_offset(&self, instant: Instant, prefer_later: bool) -> Instant {
        let instant_before = instant.saturating_add_millis(-OVERLAP_PROBE_MILLIS);
        let instant_after = instant.saturating_add_millis(OVERLAP_PROBE_MILLIS);
        let offset_before = self.offset(instant_before).millis() as i64;
        let offset_after = self.offset(instant_after).millis() as i64;
        if offset_before <= offset_after {
            // not an overlap
            return instant;
        }

        let diff = offset_before - offset_after;
        let transition = self.next_transition(instant_before);
        let overlap_start = transition.saturating_add_millis(-diff);
        let overlap_end = transition.saturating_add_millis(diff);
        if instant < overlap_start || instant >= overlap_end {
            return instant;
        }

        if instant.millis_since(overlap_start) >= diff {
            // currently the later occurrence
            if prefer_later {
                instant
            } else {
                instant.saturating_add_millis(-diff)
            }
        } else if prefer_later {
            instant.saturating_add_millis(diff)
        } else {
            instant
        }
    }

    /// Whether `local` falls in a daylight saving gap.
    pub fn is_local_gap(&self, local: LocalInstant) -> bool {
        if self.is_fixed() {
            return false;
        }
        matches!(self.convert_local_to_utc(local, true), Err(err) if err.is_gap())
    }

    /// Whether a calendar date-time never occurs on the wall clock here.
    pub fn is_local_date_time_gap(&self, local: &NaiveDateTime) -> bool {
        self.is_local_gap(LocalInstant::from_naive(local))
    }

    /// Compares the next transitions after the two candidate instants
    /// `local - first` and `local - second`. They differ exactly when the
    /// candidates lie in different transition intervals.
    fn candidates_straddle_transition(
        &self,
        local: LocalInstant,
        first: Offset,
        second: Offset,
    ) -> bool {
        let next_after = |offset: Offset| {
            let candidate = local.estimate_utc(offset);
            let next = self.next_transition(candidate);
            if next == candidate {
                Instant::MAX
            } else {
                next
            }
        };
        next_after(first) != next_after(second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::{local, los_angeles, paris, utc};

    #[test]
    fn test_paris_spring_gap() {
        let zone = paris();
        let in_gap = local(2018, 3, 25, 2, 30);
        assert!(zone.is_local_gap(in_gap));
        assert!(zone.convert_local_to_utc(in_gap, true).unwrap_err().is_gap());

        let lenient = zone.convert_local_to_utc(in_gap, false).unwrap();
        assert_eq!(lenient, utc(2018, 3, 25, 1, 30));
        assert_eq!(zone.convert_utc_to_local(lenient).unwrap(), local(2018, 3, 25, 3, 30));
        assert_eq!(zone.offset_from_local(in_gap).millis(), 3_600_000);

        // gap boundaries
        assert!(!zone.is_local_gap(local(2018, 3, 25, 1, 59)));
        assert!(zone.is_local_gap(local(2018, 3, 25, 2, 0)));
        assert!(!zone.is_local_gap(local(2018, 3, 25, 3, 0)));
    }

    #[test]
    fn test_paris_autumn_overlap() {
        let zone = paris();
        let ambiguous = local(2018, 10, 28, 2, 30);
        assert!(!zone.is_local_gap(ambiguous));
        // the conversion keeps the candidate its estimate lands on
        assert_eq!(
            zone.convert_local_to_utc(ambiguous, true).unwrap(),
            utc(2018, 10, 28, 1, 30)
        );
        // while the offset lookup prefers summer time
        assert_eq!(zone.offset_from_local(ambiguous).millis(), 7_200_000);

        let first = utc(2018, 10, 28, 0, 30);
        let second = utc(2018, 10, 28, 1, 30);
        assert_eq!(zone.adjust_offset(first, true), second);
        assert_eq!(zone.adjust_offset(first, false), first);
        assert_eq!(zone.adjust_offset(second, false), first);
        assert_eq!(zone.adjust_offset(second, true), second);
        // outside the overlap nothing moves
        let before = utc(2018, 10, 27, 23, 59);
        assert_eq!(zone.adjust_offset(before, true), before);
    }

    #[test]
    fn test_los_angeles_gap_and_overlap() {
        let zone = los_angeles();
        let in_gap = local(2018, 3, 11, 2, 30);
        assert!(zone.is_local_gap(in_gap));
        let lenient = zone.convert_local_to_utc(in_gap, false).unwrap();
        assert_eq!(lenient, utc(2018, 3, 11, 10, 30));
        assert_eq!(zone.convert_utc_to_local(lenient).unwrap(), local(2018, 3, 11, 3, 30));

        let ambiguous = local(2018, 11, 4, 1, 30);
        assert_eq!(
            zone.convert_local_to_utc(ambiguous, false).unwrap(),
            utc(2018, 11, 4, 8, 30)
        );
        assert_eq!(zone.offset_from_local(ambiguous).millis(), -25_200_000);
        assert_eq!(
            zone.adjust_offset(utc(2018, 11, 4, 8, 30), true),
            utc(2018, 11, 4, 9, 30)
        );
    }

    #[test]
    fn test_steady_state_round_trip() {
        let zone = paris();
        for t in [utc(2018, 1, 15, 12, 0), utc(2018, 7, 1, 0, 0), utc(1999, 12, 31, 23, 59)] {
            let local = zone.convert_utc_to_local(t).unwrap();
            assert_eq!(zone.convert_local_to_utc(local, true).unwrap(), t);
            assert_eq!(zone.offset_from_local(local), zone.offset(t));
        }
    }

    #[test]
    fn test_keep_original_offset_in_overlap() {
        let zone = paris();
        let earlier = utc(2018, 10, 28, 0, 30);
        let later = utc(2018, 10, 28, 1, 30);
        let local = zone.convert_utc_to_local(earlier).unwrap();
        assert_eq!(zone.convert_local_to_utc(local, false).unwrap(), later);
        assert_eq!(zone.convert_local_to_utc_with(local, false, earlier).unwrap(), earlier);
        assert_eq!(zone.convert_local_to_utc_with(local, false, later).unwrap(), later);
    }

    #[test]
    fn test_millis_keep_local() {
        let paris = paris();
        let la = los_angeles();
        let t = utc(2018, 6, 1, 10, 0);
        assert_eq!(paris.millis_keep_local(&paris, t).unwrap(), t);
        // 12:00 in Paris, 12:00 in Los Angeles
        assert_eq!(paris.millis_keep_local(&la, t).unwrap(), utc(2018, 6, 1, 19, 0));
        // into a gap: 02:30 does not exist in Paris on 2018-03-25
        let la_0230 = utc(2018, 3, 25, 9, 30);
        assert_eq!(la.millis_keep_local(&paris, la_0230).unwrap(), utc(2018, 3, 25, 1, 30));
    }

    #[test]
    fn test_fixed_zone() {
        let zone = Zone::fixed(Offset::from_millis(19_800_000).unwrap());
        let t = Instant::from_millis(0);
        let local = zone.convert_utc_to_local(t).unwrap();
        assert_eq!(local.millis(), 19_800_000);
        assert_eq!(zone.convert_local_to_utc(local, true).unwrap(), t);
        assert!(!zone.is_local_gap(local));
        assert_eq!(zone.adjust_offset(t, true), t);
    }

    #[test]
    fn test_overflow() {
        let east = Zone::fixed(Offset::from_millis(3_600_000).unwrap());
        let west = Zone::fixed(Offset::from_millis(-3_600_000).unwrap());
        assert!(matches!(
            east.convert_utc_to_local(Instant::MAX),
            Err(Error::ArithmeticOverflow(_))
        ));
        assert!(matches!(
            west.convert_local_to_utc(LocalInstant::MAX, false),
            Err(Error::ArithmeticOverflow(_))
        ));
        assert!(west.convert_utc_to_local(Instant::MAX).is_ok());
        // saturating probes at the ends of the timeline
        assert_eq!(paris().adjust_offset(Instant::MAX, true), Instant::MAX);
        assert_eq!(paris().adjust_offset(Instant::MIN, false), Instant::MIN);
    }

    #[test]
    fn test_date_time_gap() {
        let zone = paris();
        let naive = chrono::NaiveDate::from_ymd_opt(2018, 3, 25)
            .unwrap()
            .and_hms_opt(2, 15, 0)
            .unwrap();
        assert!(zone.is_local_date_time_gap(&naive));
        assert!(!Zone::utc().is_local_date_time_gap(&naive));
    }
}
