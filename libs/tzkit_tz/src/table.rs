// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Explicit transition tables, optionally continued by a recurring rule.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::instant::Instant;
use crate::offset::Offset;
use crate::rule::RecurringRule;
use crate::source::{Period, TransitionSource};

/// The point at which a new [`Period`] starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub at: Instant,
    pub period: Period,
}

/// A [`TransitionSource`] backed by sorted transitions.
///
/// Before the first transition the initial period applies. From the last
/// explicit transition onwards the tail rule, when present, takes over; with
/// no explicit transitions the tail governs the whole timeline.
#[derive(Debug, Clone)]
pub struct ZoneTable {
    initial: Period,
    transitions: Vec<Transition>,
    tail: Option<RecurringRule>,
}

impl ZoneTable {
    pub fn builder(initial: Period) -> ZoneTableBuilder {
        ZoneTableBuilder {
            initial,
            transitions: Vec::new(),
            tail: None,
        }
    }

    /// A table with no transitions.
    pub fn fixed(period: Period) -> Self {
        Self {
            initial: period,
            transitions: Vec::new(),
            tail: None,
        }
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Where the tail rule takes over.
    fn tail_start(&self) -> Instant {
        self.transitions.last().map_or(Instant::MIN, |t| t.at)
    }

    fn tail_covers(&self, instant: Instant) -> Option<&RecurringRule> {
        self.tail
            .as_ref()
            .filter(|_| instant >= self.tail_start())
    }

    /// Number of explicit transitions at or before `instant`.
    #[inline]
    fn index_after(&self, instant: Instant) -> usize {
        self.transitions.partition_point(|t| t.at <= instant)
    }

    fn explicit_period_at(&self, instant: Instant) -> &Period {
        match self.index_after(instant) {
            0 => &self.initial,
            idx => &self.transitions[idx - 1].period,
        }
    }
}

impl TransitionSource for ZoneTable {
    fn period_at(&self, instant: Instant) -> Period {
        match self.tail_covers(instant) {
            Some(rule) => rule.period_at(instant),
            None => self.explicit_period_at(instant).clone(),
        }
    }

    fn offset_at(&self, instant: Instant) -> Offset {
        match self.tail_covers(instant) {
            Some(rule) => rule.offset_at(instant),
            None => self.explicit_period_at(instant).offset,
        }
    }

    fn standard_offset_at(&self, instant: Instant) -> Offset {
        match self.tail_covers(instant) {
            Some(rule) => rule.standard_offset(),
            None => self.explicit_period_at(instant).standard,
        }
    }

    fn next_transition(&self, instant: Instant) -> Instant {
        if let Some(t) = self.transitions.get(self.index_after(instant)) {
            return t.at;
        }
        self.tail
            .as_ref()
            .and_then(|rule| rule.next_after(instant))
            .filter(|&next| next > instant)
            .unwrap_or(instant)
    }

    fn previous_transition(&self, instant: Instant) -> Instant {
        if let Some(rule) = self.tail_covers(instant) {
            let tail_start = self.tail_start();
            if let Some(latest) = rule
                .latest_at_or_before(instant)
                .filter(|&t| t > tail_start || self.transitions.is_empty())
            {
                return latest.saturating_add_millis(-1);
            }
        }
        match self.index_after(instant) {
            0 => instant,
            idx => self.transitions[idx - 1].at.saturating_add_millis(-1),
        }
    }

    fn is_fixed(&self) -> bool {
        self.transitions.is_empty() && self.tail.is_none()
    }
}

pub struct ZoneTableBuilder {
    initial: Period,
    transitions: Vec<Transition>,
    tail: Option<RecurringRule>,
}

impl ZoneTableBuilder {
    pub fn transition(mut self, at: Instant, period: Period) -> Self {
        self.transitions.push(Transition { at, period });
        self
    }

    pub fn push(&mut self, at: Instant, period: Period) {
        self.transitions.push(Transition { at, period });
    }

    pub fn tail(mut self, rule: RecurringRule) -> Self {
        self.tail = Some(rule);
        self
    }

    /// Validates that transitions strictly ascend and that each one changes
    /// the offset, the standard offset or the name key.
    pub fn build(self) -> Result<ZoneTable> {
        let mut previous = &self.initial;
        let mut previous_at: Option<Instant> = None;
        for transition in &self.transitions {
            if previous_at.is_some_and(|at| transition.at <= at) {
                return Err(Error::InvalidZoneData(format!(
                    "transition at {} is not after the one before it",
                    transition.at
                )));
            }
            if transition.period == *previous {
                return Err(Error::InvalidZoneData(format!(
                    "transition at {} changes nothing",
                    transition.at
                )));
            }
            previous = &transition.period;
            previous_at = Some(transition.at);
        }
        Ok(ZoneTable {
            initial: self.initial,
            transitions: self.transitions,
            tail: self.tail,
        })
    }

    /// Shared handle, as zones hold their source.
    pub fn build_shared(self) -> Result<Arc<ZoneTable>> {
        self.build().map(Arc::new)
    }
}
