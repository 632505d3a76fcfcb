// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The transition-query contract consumed by the resolution engine.

use std::fmt;
use std::sync::Arc;

use crate::instant::Instant;
use crate::offset::Offset;

/// The offsets and display key in effect over a stretch of the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Period {
    /// Actual offset.
    pub offset: Offset,
    /// Offset without daylight saving.
    pub standard: Offset,
    /// Key handed to a name provider, usually an abbreviation like `CEST`.
    pub name_key: Arc<str>,
}

impl Period {
    pub fn new(offset: Offset, standard: Offset, name_key: impl Into<Arc<str>>) -> Self {
        Self {
            offset,
            standard,
            name_key: name_key.into(),
        }
    }

    /// A period without daylight saving.
    pub fn standard(offset: Offset, name_key: impl Into<Arc<str>>) -> Self {
        Self::new(offset, offset, name_key)
    }

    pub fn is_dst(&self) -> bool {
        self.offset != self.standard
    }
}

/// Raw per-zone transition data.
///
/// Implementations must be immutable once shared, since the engine calls
/// them from any thread without locking.
pub trait TransitionSource: Send + Sync + fmt::Debug {
    fn period_at(&self, instant: Instant) -> Period;

    fn offset_at(&self, instant: Instant) -> Offset {
        self.period_at(instant).offset
    }

    fn standard_offset_at(&self, instant: Instant) -> Offset {
        self.period_at(instant).standard
    }

    fn name_key_at(&self, instant: Instant) -> Arc<str> {
        self.period_at(instant).name_key
    }

    /// The earliest transition strictly after `instant`, or `instant` itself
    /// when there is none.
    fn next_transition(&self, instant: Instant) -> Instant;

    /// One millisecond before the latest transition at or before `instant`,
    /// or `instant` itself when there is none. The returned instant still
    /// carries the offset that preceded that transition.
    fn previous_transition(&self, instant: Instant) -> Instant;

    /// True when the source has no transitions at all.
    fn is_fixed(&self) -> bool;
}
