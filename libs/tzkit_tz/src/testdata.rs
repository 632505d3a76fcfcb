// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Rule-only zones shaped like real ones, for tests that should not depend
//! on the bundled database.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::instant::{Instant, LocalInstant, MILLIS_PER_HOUR};
use crate::offset::Offset;
use crate::rule::{RecurringRule, TransitionRule, LAST_WEEK};
use crate::source::Period;
use crate::table::ZoneTable;
use crate::zone::Zone;

fn hours(h: i64) -> Offset {
    Offset::from_millis(h * MILLIS_PER_HOUR).unwrap()
}

fn rule_zone(
    id: &str,
    standard: i64,
    start: TransitionRule,
    end: TransitionRule,
    keys: (&str, &str),
) -> Zone {
    let (standard_key, daylight_key) = keys;
    let rule = RecurringRule::new(
        hours(standard),
        MILLIS_PER_HOUR,
        start,
        end,
        standard_key,
        daylight_key,
    )
    .unwrap();
    let table = ZoneTable::builder(Period::standard(hours(standard), keys.0))
        .tail(rule)
        .build_shared()
        .unwrap();
    Zone::table_backed(id, table)
}

/// CET/CEST with EU rules.
pub fn paris() -> Zone {
    rule_zone(
        "Test/Paris",
        1,
        TransitionRule::new(3, LAST_WEEK, 0, 2 * MILLIS_PER_HOUR).unwrap(),
        TransitionRule::new(10, LAST_WEEK, 0, 3 * MILLIS_PER_HOUR).unwrap(),
        ("CET", "CEST"),
    )
}

/// PST/PDT with the 2007 US rules.
pub fn los_angeles() -> Zone {
    rule_zone(
        "Test/Los_Angeles",
        -8,
        TransitionRule::new(3, 2, 0, 2 * MILLIS_PER_HOUR).unwrap(),
        TransitionRule::new(11, 1, 0, 2 * MILLIS_PER_HOUR).unwrap(),
        ("PST", "PDT"),
    )
}

pub fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> LocalInstant {
    let naive = NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, 0)
        .unwrap();
    LocalInstant::from_naive(&naive)
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Instant {
    let naive = NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, 0)
        .unwrap();
    Instant::from_naive_utc(&naive)
}

pub fn shared(zone: &Zone) -> Arc<dyn crate::source::TransitionSource> {
    match zone {
        Zone::TableBacked { source, .. } => source.clone(),
        Zone::Fixed { .. } => panic!("not table backed"),
    }
}
