// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Pluggable sources of zone data keyed by region id.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::source::TransitionSource;

/// Supplies transition data for region ids such as `Europe/Paris`.
pub trait ZoneProvider: Send + Sync + fmt::Debug {
    /// Source for `id`, or `None` when the provider does not know it.
    fn zone_source(&self, id: &str) -> Option<Arc<dyn TransitionSource>>;

    fn available_ids(&self) -> BTreeSet<String>;
}

/// A provider over a fixed in-memory map, mostly for tests and embedding
/// hand-built tables.
#[derive(Debug, Default, Clone)]
pub struct MemoryProvider {
    sources: BTreeMap<String, Arc<dyn TransitionSource>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(mut self, id: impl Into<String>, source: Arc<dyn TransitionSource>) -> Self {
        self.insert(id, source);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, source: Arc<dyn TransitionSource>) {
        self.sources.insert(id.into(), source);
    }
}

impl ZoneProvider for MemoryProvider {
    fn zone_source(&self, id: &str) -> Option<Arc<dyn TransitionSource>> {
        self.sources.get(id).cloned()
    }

    fn available_ids(&self) -> BTreeSet<String> {
        self.sources.keys().cloned().collect()
    }
}
