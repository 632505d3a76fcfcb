// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Display names for zones.
//!
//! Name lookups take a locale tag, the zone id and the name key that the zone
//! reports for an instant (an abbreviation such as `CEST`). A provider that
//! has nothing to say returns `None` and the registry prints the offset.

use std::fmt;

pub trait NameProvider: Send + Sync + fmt::Debug {
    fn short_name(&self, locale: &str, id: &str, name_key: &str) -> Option<String>;

    fn long_name(&self, locale: &str, id: &str, name_key: &str) -> Option<String>;
}

/// Passes alphabetic abbreviations through as short names and knows English
/// long names for common abbreviations.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNameProvider;

const LONG_NAMES: &[(&str, &str)] = &[
    ("UTC", "Coordinated Universal Time"),
    ("GMT", "Greenwich Mean Time"),
    ("BST", "British Summer Time"),
    ("WET", "Western European Standard Time"),
    ("WEST", "Western European Summer Time"),
    ("CET", "Central European Standard Time"),
    ("CEST", "Central European Summer Time"),
    ("EET", "Eastern European Standard Time"),
    ("EEST", "Eastern European Summer Time"),
    ("MSK", "Moscow Standard Time"),
    ("EST", "Eastern Standard Time"),
    ("EDT", "Eastern Daylight Time"),
    ("CST", "Central Standard Time"),
    ("CDT", "Central Daylight Time"),
    ("MST", "Mountain Standard Time"),
    ("MDT", "Mountain Daylight Time"),
    ("PST", "Pacific Standard Time"),
    ("PDT", "Pacific Daylight Time"),
    ("AKST", "Alaska Standard Time"),
    ("AKDT", "Alaska Daylight Time"),
    ("HST", "Hawaii-Aleutian Standard Time"),
    ("JST", "Japan Standard Time"),
    ("KST", "Korean Standard Time"),
    ("AEST", "Australian Eastern Standard Time"),
    ("AEDT", "Australian Eastern Daylight Time"),
    ("ACST", "Australian Central Standard Time"),
    ("ACDT", "Australian Central Daylight Time"),
    ("AWST", "Australian Western Standard Time"),
    ("NZST", "New Zealand Standard Time"),
    ("NZDT", "New Zealand Daylight Time"),
];

fn is_english(locale: &str) -> bool {
    locale.is_empty() || locale == "en" || locale.starts_with("en-") || locale.starts_with("en_")
}

impl NameProvider for DefaultNameProvider {
    fn short_name(&self, _locale: &str, _id: &str, name_key: &str) -> Option<String> {
        // numeric keys like "+03" say nothing the printed offset doesn't
        if !name_key.is_empty() && name_key.bytes().all(|b| b.is_ascii_alphabetic()) {
            Some(name_key.to_string())
        } else {
            None
        }
    }

    fn long_name(&self, locale: &str, _id: &str, name_key: &str) -> Option<String> {
        if !is_english(locale) {
            return None;
        }
        LONG_NAMES
            .iter()
            .find(|(key, _)| *key == name_key)
            .map(|(_, name)| name.to_string())
    }
}
