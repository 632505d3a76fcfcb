// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0
use std::env;
use std::fmt::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{field::Visit, Id, Level, Subscriber};
use tracing_core::Field;
use tzkit_tz::environment::ENV_TZKIT_LOG;

pub struct StringVisitor<'a> {
    string: &'a mut String,
}

impl<'a> StringVisitor<'a> {
    pub(crate) fn new(string: &'a mut String) -> Self {
        StringVisitor { string }
    }
}

impl Visit for StringVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        // writing to a String cannot fail
        let _ = if field.name() == "message" {
            write!(self.string, "{value:?} ")
        } else {
            write!(self.string, "{} = {:?}; ", field.name(), value)
        };
    }
}

/// One `target=level`, `target` or `level` entry of `TZKIT_LOG`.
#[derive(Debug, PartialEq, Eq)]
struct LogFilter {
    target: Option<String>,
    level: Option<Level>,
}

impl LogFilter {
    fn parse(entry: &str) -> Self {
        let entry = entry.trim();
        if let Some((target, level)) = entry.split_once('=') {
            return LogFilter {
                target: Some(target.to_string()),
                level: string_to_level(level),
            };
        }
        match string_to_level(entry) {
            Some(level) => LogFilter {
                target: None,
                level: Some(level),
            },
            None => LogFilter {
                target: Some(entry.to_string()),
                level: None,
            },
        }
    }

    /// A level filter passes its level and everything less verbose.
    fn matches(&self, metadata: &tracing::Metadata<'_>) -> bool {
        if let Some(level) = self.level {
            if *metadata.level() > level {
                return false;
            }
        }
        match &self.target {
            Some(target) => metadata.target().starts_with(target.as_str()),
            None => true,
        }
    }
}

fn string_to_level(string: &str) -> Option<Level> {
    match string.to_lowercase().as_str() {
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "warn" | "warning" => Some(Level::WARN),
        "trace" => Some(Level::TRACE),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Prints events to stderr. Disabled unless `TZKIT_LOG` is set; an empty
/// value enables everything.
pub struct MinimalTracer {
    enabled: bool,
    filters: Vec<LogFilter>,
}

impl MinimalTracer {
    pub fn register() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
        tracing::subscriber::set_global_default(Self::from_env_value(env::var(ENV_TZKIT_LOG).ok()))
    }

    fn from_env_value(value: Option<String>) -> Self {
        match value {
            Some(value) => MinimalTracer {
                enabled: true,
                filters: value
                    .split(',')
                    .filter(|entry| !entry.trim().is_empty())
                    .map(LogFilter::parse)
                    .collect(),
            },
            None => MinimalTracer {
                enabled: false,
                filters: Vec::new(),
            },
        }
    }
}

static AUTO_ID: AtomicU64 = AtomicU64::new(1);

impl Subscriber for MinimalTracer {
    fn enabled(&self, metadata: &tracing::Metadata<'_>) -> bool {
        self.enabled
            && (self.filters.is_empty()
                || self.filters.iter().any(|filter| filter.matches(metadata)))
    }

    fn new_span(&self, _span: &tracing_core::span::Attributes<'_>) -> tracing_core::span::Id {
        Id::from_u64(AUTO_ID.fetch_add(1, Ordering::Relaxed))
    }

    fn record(&self, _span: &tracing_core::span::Id, _values: &tracing_core::span::Record<'_>) {}

    fn record_follows_from(
        &self,
        _span: &tracing_core::span::Id,
        _follows: &tracing_core::span::Id,
    ) {
    }

    fn event(&self, event: &tracing::Event<'_>) {
        let metadata = event.metadata();

        let mut text = String::new();
        event.record(&mut StringVisitor::new(&mut text));

        eprintln!("{} {}: {}", metadata.level(), metadata.target(), text);
    }

    fn enter(&self, _span: &tracing_core::span::Id) {}

    fn exit(&self, _span: &tracing_core::span::Id) {}
}
