// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::instant::Instant;
use crate::offset::Offset;
use crate::source::TransitionSource;

static UTC: Lazy<Zone> = Lazy::new(|| Zone::Fixed {
    id: Arc::from("UTC"),
    offset: Offset::UTC,
});

/// A time zone: either a constant offset or a view over transition data.
///
/// Zones are cheap to clone and safe to share between threads. Two zones are
/// equal when their ids are equal (and, for fixed zones, their offsets).
#[derive(Clone)]
pub enum Zone {
    /// A constant offset. The id is `UTC` for the zero offset and the printed
    /// offset (`+05:30`) otherwise.
    Fixed { id: Arc<str>, offset: Offset },
    /// A region id resolved to transition data.
    TableBacked {
        id: Arc<str>,
        source: Arc<dyn TransitionSource>,
    },
}

impl Zone {
    /// The UTC singleton.
    pub fn utc() -> Zone {
        UTC.clone()
    }

    /// A fixed zone for `offset`, with the canonical id.
    pub fn fixed(offset: Offset) -> Zone {
        if offset.is_utc() {
            return Zone::utc();
        }
        Zone::Fixed {
            id: Arc::from(offset.to_string()),
            offset,
        }
    }

    pub fn table_backed(id: impl Into<Arc<str>>, source: Arc<dyn TransitionSource>) -> Zone {
        Zone::TableBacked {
            id: id.into(),
            source,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Zone::Fixed { id, .. } | Zone::TableBacked { id, .. } => id,
        }
    }

    pub fn is_utc(&self) -> bool {
        matches!(self, Zone::Fixed { offset, .. } if offset.is_utc())
    }

    /// True when the offset never changes.
    pub fn is_fixed(&self) -> bool {
        match self {
            Zone::Fixed { .. } => true,
            Zone::TableBacked { source, .. } => source.is_fixed(),
        }
    }

    /// Offset in effect at `instant`.
    pub fn offset(&self, instant: Instant) -> Offset {
        match self {
            Zone::Fixed { offset, .. } => *offset,
            Zone::TableBacked { source, .. } => source.offset_at(instant),
        }
    }

    pub fn standard_offset(&self, instant: Instant) -> Offset {
        match self {
            Zone::Fixed { offset, .. } => *offset,
            Zone::TableBacked { source, .. } => source.standard_offset_at(instant),
        }
    }

    /// Whether `instant` is outside daylight saving time.
    pub fn is_standard_offset(&self, instant: Instant) -> bool {
        match self {
            Zone::Fixed { .. } => true,
            Zone::TableBacked { source, .. } => !source.period_at(instant).is_dst(),
        }
    }

    /// Key passed to a name provider. Fixed zones use their id.
    pub fn name_key(&self, instant: Instant) -> Arc<str> {
        match self {
            Zone::Fixed { id, .. } => id.clone(),
            Zone::TableBacked { source, .. } => source.name_key_at(instant),
        }
    }

    /// The earliest transition strictly after `instant`, or `instant` when
    /// there is none.
    pub fn next_transition(&self, instant: Instant) -> Instant {
        match self {
            Zone::Fixed { .. } => instant,
            Zone::TableBacked { source, .. } => source.next_transition(instant),
        }
    }

    /// One millisecond before the latest transition at or before `instant`,
    /// or `instant` when there is none.
    pub fn previous_transition(&self, instant: Instant) -> Instant {
        match self {
            Zone::Fixed { .. } => instant,
            Zone::TableBacked { source, .. } => source.previous_transition(instant),
        }
    }
}

impl PartialEq for Zone {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Zone::Fixed { id: a, offset: x }, Zone::Fixed { id: b, offset: y }) => {
                a == b && x == y
            },
            (Zone::TableBacked { id: a, .. }, Zone::TableBacked { id: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for Zone {}

impl Hash for Zone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Fixed { id, offset } => f
                .debug_struct("Fixed")
                .field("id", id)
                .field("offset", offset)
                .finish(),
            Zone::TableBacked { id, .. } => f.debug_tuple("TableBacked").field(id).finish(),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
