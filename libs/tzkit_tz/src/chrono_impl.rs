// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Lets a [`Zone`] be used with chrono's `DateTime<Tz>`.

use std::fmt;

use chrono::{FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset as _, TimeZone, Utc};

use crate::instant::{Instant, LocalInstant};
use crate::offset::Offset;
use crate::zone::Zone;

/// The offset of a `DateTime<Zone>`: the numeric offset plus the zone it
/// came from, so the zone survives chrono arithmetic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneOffset {
    zone: Zone,
    offset: Offset,
}

impl ZoneOffset {
    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }
}

impl fmt::Display for ZoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.offset, f)
    }
}

// Sub-second parts of an offset are dropped, chrono offsets are whole seconds
impl chrono::Offset for ZoneOffset {
    fn fix(&self) -> FixedOffset {
        FixedOffset::east_opt(self.offset.seconds()).unwrap_or_else(|| Utc.fix())
    }
}

impl Zone {
    fn zone_offset(&self, instant: Instant) -> ZoneOffset {
        ZoneOffset {
            zone: self.clone(),
            offset: self.offset(instant),
        }
    }
}

impl TimeZone for Zone {
    type Offset = ZoneOffset;

    fn from_offset(offset: &Self::Offset) -> Self {
        offset.zone.clone()
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<Self::Offset> {
        // Use noon on the given date to determine offset
        match local.and_hms_opt(12, 0, 0) {
            Some(noon) => self.offset_from_local_datetime(&noon),
            None => LocalResult::None,
        }
    }

    /// `None` inside a gap, `Ambiguous(earlier, later)` inside an overlap.
    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<Self::Offset> {
        let utc = match self.convert_local_to_utc(LocalInstant::from_naive(local), true) {
            Ok(utc) => utc,
            Err(_) => return LocalResult::None,
        };
        let earlier = self.adjust_offset(utc, false);
        let later = self.adjust_offset(utc, true);
        if earlier == later {
            LocalResult::Single(self.zone_offset(utc))
        } else {
            LocalResult::Ambiguous(self.zone_offset(earlier), self.zone_offset(later))
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> Self::Offset {
        match utc.and_hms_opt(12, 0, 0) {
            Some(noon) => self.offset_from_utc_datetime(&noon),
            None => self.zone_offset(Instant::EPOCH),
        }
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> Self::Offset {
        self.zone_offset(Instant::from_naive_utc(utc))
    }
}
