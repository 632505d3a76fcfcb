// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Time zone offset resolution for tzkit.
//!
//! This library maps instants to wall-clock time and back for any zone in the
//! IANA database, with a precise policy for the readings that daylight saving
//! time makes impossible (gaps) or ambiguous (overlaps).
//!
//! # Architecture
//!
//! 1. **Transition sources** ([`TransitionSource`]) answer raw questions about
//!    one zone: the offset at an instant and the neighbouring transitions.
//!    [`ZoneTable`] is the in-memory implementation, optionally continued by a
//!    [`RecurringRule`].
//! 2. **Zones** ([`Zone`]) are either a fixed offset or a view over a source.
//!    All conversions are methods on `Zone` and are pure functions of the
//!    source data, safe to call from any thread.
//! 3. **The registry** ([`Registry`]) resolves ids to zones and holds the
//!    process-wide default zone, zone provider and name provider.
//!
//! The default provider ([`BundledProvider`]) derives tables from the
//! database compiled into chrono-tz. A zone is extracted on first use and
//! cached for the life of the process.
//!
//! # Gaps and overlaps
//!
//! - `convert_local_to_utc(local, strict = true)` rejects gap readings with
//!   [`Error::InvalidInstant`]; with `strict = false` they move forward by the
//!   length of the gap.
//! - [`Zone::offset_from_local`] resolves overlaps to the earlier instant;
//!   [`Zone::adjust_offset`] moves between the two occurrences.
//!
//! # Example
//!
//! ```
//! use tzkit_tz::{LocalInstant, Registry};
//!
//! let paris = Registry::global().resolve("Europe/Paris").unwrap();
//!
//! // 2018-03-25T02:30 never happened in Paris
//! let local = LocalInstant::from_millis(1_521_945_000_000);
//! assert!(paris.is_local_gap(local));
//!
//! // leniently it becomes 03:30 CEST
//! let utc = paris.convert_local_to_utc(local, false).unwrap();
//! assert_eq!(utc.to_string(), "2018-03-25T01:30:00.000Z");
//! ```

mod bundled;
mod chrono_impl;
mod engine;
pub mod environment;
mod error;
mod instant;
mod names;
mod offset;
#[cfg(feature = "serde")]
pub mod persist;
mod policy;
mod provider;
mod registry;
mod rule;
mod source;
mod table;
mod zone;

pub use bundled::{table_for, BundledProvider};
pub use chrono_impl::ZoneOffset;
pub use error::{Error, Result};
pub use instant::{
    Instant, LocalInstant, MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND,
};
pub use names::{DefaultNameProvider, NameProvider};
pub use offset::Offset;
pub use policy::{AccessPolicy, AdminAction, AllowAll, DenyAll, DenyList};
pub use provider::{MemoryProvider, ZoneProvider};
pub use registry::{Registry, RegistryConfig, UTC_ALIASES};
pub use rule::{RecurringRule, TransitionRule, LAST_WEEK};
pub use source::{Period, TransitionSource};
pub use table::{Transition, ZoneTable, ZoneTableBuilder};
pub use zone::Zone;

#[cfg(test)]
mod testdata;

#[cfg(test)]
mod tests;
