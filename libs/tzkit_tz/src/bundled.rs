// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Zone data derived from the IANA database compiled into chrono-tz.
//!
//! chrono-tz only answers point queries, so the first request for a zone
//! scans its offsets from 1800 to 2100 and records every change as an
//! explicit transition. Each scan runs once per process; tables are kept
//! in a process-wide cache and shared between registries.
//!
//! A change that is undone within one scan step (six hours) is missed.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Offset as _, TimeZone};
use chrono_tz::{OffsetComponents, Tz, TZ_VARIANTS};
use tracing::{trace, warn};

use crate::error::{Error, Result};
use crate::instant::{Instant, MILLIS_PER_SECOND};
use crate::offset::Offset;
use crate::provider::ZoneProvider;
use crate::source::{Period, TransitionSource};
use crate::table::ZoneTable;

/// 1800-01-01T00:00:00Z
const SCAN_START_SECS: i64 = -5_364_662_400;
/// 2100-01-01T00:00:00Z
const SCAN_END_SECS: i64 = 4_102_444_800;
const SCAN_STEP_SECS: i64 = 6 * 3600;

/// Cache of scanned tables.
static TABLE_CACHE: RwLock<Option<HashMap<&'static str, Arc<ZoneTable>>>> = RwLock::new(None);

/// The default zone provider: every zone chrono-tz knows, by its IANA name.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledProvider;

impl ZoneProvider for BundledProvider {
    fn zone_source(&self, id: &str) -> Option<Arc<dyn TransitionSource>> {
        let tz: Tz = id.parse().ok()?;
        match table_for(tz) {
            Ok(table) => Some(table),
            Err(err) => {
                warn!("Skipping zone {}: {}", id, err);
                None
            },
        }
    }

    fn available_ids(&self) -> BTreeSet<String> {
        TZ_VARIANTS.iter().map(|tz| tz.name().to_string()).collect()
    }
}

/// Scanned table for `tz`, built on first use.
pub fn table_for(tz: Tz) -> Result<Arc<ZoneTable>> {
    // Check cache first
    {
        let cache = TABLE_CACHE.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = cache.as_ref().and_then(|map| map.get(tz.name())) {
            return Ok(table.clone());
        }
    }

    // Cache miss - scan outside the lock, first writer wins
    let table = Arc::new(scan(tz)?);
    let mut cache = TABLE_CACHE.write().unwrap_or_else(PoisonError::into_inner);
    let map = cache.get_or_insert_with(HashMap::new);
    Ok(map.entry(tz.name()).or_insert(table).clone())
}

fn scan(tz: Tz) -> Result<ZoneTable> {
    let started = std::time::Instant::now();
    let mut current = Sample::at(tz, SCAN_START_SECS)?;
    let mut probe = current.clone();
    let mut builder = ZoneTable::builder(current.to_period(tz)?);

    let mut at = SCAN_START_SECS;
    while at < SCAN_END_SECS {
        let next = (at + SCAN_STEP_SECS).min(SCAN_END_SECS);
        probe.refresh(tz, next)?;
        if probe == current {
            at = next;
            continue;
        }

        // Bisect down to the first second with the new period
        let (mut lo, mut hi) = (at, next);
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            probe.refresh(tz, mid)?;
            if probe == current {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        current.refresh(tz, hi)?;
        builder.push(Instant::from_millis(hi * MILLIS_PER_SECOND), current.to_period(tz)?);
        at = hi;
    }

    let table = builder.build()?;
    trace!(
        "Scanned {} in {:?}: {} transitions",
        tz.name(),
        started.elapsed(),
        table.transitions().len()
    );
    Ok(table)
}

/// What chrono-tz reports at one second. Refreshing reuses the name buffer.
#[derive(Clone, PartialEq, Eq)]
struct Sample {
    actual_secs: i32,
    standard_millis: i64,
    name: String,
}

impl Sample {
    fn at(tz: Tz, secs: i64) -> Result<Self> {
        let mut sample = Sample {
            actual_secs: 0,
            standard_millis: 0,
            name: String::new(),
        };
        sample.refresh(tz, secs)?;
        Ok(sample)
    }

    fn refresh(&mut self, tz: Tz, secs: i64) -> Result<()> {
        let utc = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| Error::InvalidZoneData(format!("timestamp {} out of range", secs)))?
            .naive_utc();
        let offset = tz.offset_from_utc_datetime(&utc);

        self.actual_secs = offset.fix().local_minus_utc();
        self.standard_millis = offset.base_utc_offset().num_milliseconds();
        self.name.clear();
        write!(self.name, "{}", offset).map_err(|e| Error::InvalidZoneData(e.to_string()))
    }

    fn to_period(&self, tz: Tz) -> Result<Period> {
        let to_data_error = |err: Error| Error::InvalidZoneData(format!("{}: {}", tz.name(), err));
        let actual = Offset::from_seconds(self.actual_secs).map_err(to_data_error)?;
        let standard = Offset::from_millis(self.standard_millis).map_err(to_data_error)?;
        Ok(Period::new(actual, standard, self.name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paris_table() {
        let table = table_for(chrono_tz::Europe::Paris).unwrap();
        // 2018-03-25T01:00:00Z
        let spring = Instant::from_millis(1_521_939_600_000);
        assert_eq!(
            table.next_transition(Instant::from_millis(1_514_764_800_000)),
            spring
        );
        let summer = table.period_at(spring);
        assert_eq!(summer.offset.millis(), 7_200_000);
        assert_eq!(summer.standard.millis(), 3_600_000);
        assert_eq!(&*summer.name_key, "CEST");
        assert_eq!(&*table.name_key_at(Instant::from_millis(1_514_764_800_000)), "CET");
    }

    #[test]
    fn test_lmt_before_first_transition() {
        let table = table_for(chrono_tz::Europe::Paris).unwrap();
        // Paris mean time, +00:09:21
        assert_eq!(table.offset_at(Instant::MIN).millis(), 561_000);
        assert!(table.next_transition(Instant::MIN) > Instant::MIN);
    }

    #[test]
    fn test_cached_table_is_shared() {
        let first = table_for(chrono_tz::Asia::Tokyo).unwrap();
        let second = table_for(chrono_tz::Asia::Tokyo).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_provider_ids() {
        let provider = BundledProvider;
        let ids = provider.available_ids();
        assert!(ids.contains("Europe/Paris"));
        assert!(ids.contains("America/Los_Angeles"));
        assert!(provider.zone_source("Europe/Paris").is_some());
        assert!(provider.zone_source("Mars/Olympus_Mons").is_none());
    }
}
