// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use crate::instant::{Instant, MILLIS_PER_HOUR, MILLIS_PER_MINUTE};
use crate::offset::Offset;
use crate::source::Period;
use crate::table::ZoneTable;
use crate::testdata::{local, los_angeles, paris, utc};
use crate::zone::Zone;

const QUARTER_HOUR: i64 = 15 * MILLIS_PER_MINUTE;

fn hours(h: i64) -> Offset {
    Offset::from_millis(h * MILLIS_PER_HOUR).unwrap()
}

/// Los Angeles 2018 as explicit transitions only.
fn explicit_los_angeles() -> Zone {
    let table = ZoneTable::builder(Period::standard(hours(-8), "PST"))
        .transition(utc(2018, 3, 11, 10, 0), Period::new(hours(-7), hours(-8), "PDT"))
        .transition(utc(2018, 11, 4, 9, 0), Period::standard(hours(-8), "PST"))
        .build_shared()
        .unwrap();
    Zone::table_backed("Test/Explicit", table)
}

fn sweep_2018() -> impl Iterator<Item = Instant> {
    let start = utc(2018, 1, 1, 0, 0).millis();
    let end = utc(2019, 1, 1, 0, 0).millis();
    (start..end)
        .step_by(QUARTER_HOUR as usize)
        .map(Instant::from_millis)
}

#[test]
fn test_explicit_table_matches_rule() {
    let explicit = explicit_los_angeles();
    let rule = los_angeles();
    for t in sweep_2018() {
        assert_eq!(explicit.offset(t), rule.offset(t), "offset at {}", t);
        let local = rule.convert_utc_to_local(t).unwrap();
        assert_eq!(
            explicit.convert_local_to_utc(local, false).unwrap(),
            rule.convert_local_to_utc(local, false).unwrap(),
            "local {}",
            local
        );
    }
}

#[test]
fn test_explicit_table_gap() {
    let zone = explicit_los_angeles();
    let in_gap = local(2018, 3, 11, 2, 30);
    assert!(zone.is_local_gap(in_gap));
    assert_eq!(
        zone.convert_local_to_utc(in_gap, false).unwrap(),
        utc(2018, 3, 11, 10, 30)
    );
    // after the last transition there is nothing further
    let late = utc(2030, 1, 1, 0, 0);
    assert_eq!(zone.next_transition(late), late);
}

#[test]
fn test_local_reading_never_in_gap() {
    for zone in [paris(), los_angeles(), explicit_los_angeles()] {
        for t in sweep_2018() {
            let local = zone.convert_utc_to_local(t).unwrap();
            assert!(!zone.is_local_gap(local), "{} reads {} at {}", zone, local, t);
        }
    }
}

#[test]
fn test_transition_search_brackets_instant() {
    for zone in [paris(), los_angeles()] {
        for t in sweep_2018() {
            let next = zone.next_transition(t);
            let previous = zone.previous_transition(t);
            assert!(next > t, "{} next at {}", zone, t);
            assert!(previous < t, "{} previous at {}", zone, t);
            assert!(zone.next_transition(previous) <= t, "{} at {}", zone, t);
        }
    }
}

#[test]
fn test_offset_from_local_matches_conversion() {
    // outside overlaps both agree on the offset
    for zone in [paris(), los_angeles()] {
        for t in sweep_2018() {
            if zone.adjust_offset(t, true) != zone.adjust_offset(t, false) {
                continue;
            }
            let local = zone.convert_utc_to_local(t).unwrap();
            assert_eq!(zone.offset_from_local(local), zone.offset(t), "{} at {}", zone, t);
        }
    }
}

#[test]
fn test_name_only_transition() {
    let table = ZoneTable::builder(Period::standard(hours(3), "AAA"))
        .transition(Instant::from_millis(0), Period::standard(hours(3), "BBB"))
        .build_shared()
        .unwrap();
    let zone = Zone::table_backed("Test/Renamed", table);
    assert_eq!(zone.next_transition(Instant::from_millis(-1)), Instant::EPOCH);
    assert_eq!(&*zone.name_key(Instant::EPOCH), "BBB");
    // the offset never changes, so nothing is a gap and nothing moves
    let local = zone.convert_utc_to_local(Instant::EPOCH).unwrap();
    assert!(!zone.is_local_gap(local));
    assert_eq!(zone.convert_local_to_utc(local, true).unwrap(), Instant::EPOCH);
    assert_eq!(zone.adjust_offset(Instant::EPOCH, true), Instant::EPOCH);
}

#[test]
fn test_zones_share_source() {
    let zone = paris();
    let copy = zone.clone();
    assert_eq!(zone, copy);
    match (&zone, &copy) {
        (Zone::TableBacked { source: a, .. }, Zone::TableBacked { source: b, .. }) => {
            assert!(Arc::ptr_eq(a, b))
        },
        _ => panic!("expected table backed zones"),
    }
    assert_ne!(zone, Zone::utc());
}
