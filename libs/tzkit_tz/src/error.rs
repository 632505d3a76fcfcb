// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0
use std::fmt;

use crate::instant::LocalInstant;
use crate::policy::AdminAction;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by zone resolution, conversion and registry administration.
///
/// None of these are retried internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The id is not a known zone, alias or fixed-offset string.
    UnrecognizedZoneId(String),
    /// A strict local to UTC conversion landed in a daylight saving gap.
    InvalidInstant { local: LocalInstant, zone: String },
    /// Millisecond arithmetic would wrap.
    ArithmeticOverflow(&'static str),
    /// The text is not of the form `[+-]hh[:mm[:ss[.SSS]]]`.
    MalformedOffsetString(String),
    /// A numeric offset is outside +/-23:59:59.999 or mixes signs.
    InvalidOffset(String),
    /// A transition table or provider breaks the table invariants.
    InvalidZoneData(String),
    /// The access policy refused an administrative mutation.
    PermissionDenied(AdminAction),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnrecognizedZoneId(id) => {
                write!(f, "The time zone id '{}' is not recognised", id)
            },
            Error::InvalidInstant { local, zone } => write!(
                f,
                "Illegal instant due to time zone offset transition (daylight savings time 'gap'): {} ({})",
                local, zone
            ),
            Error::ArithmeticOverflow(what) => write!(f, "{} caused overflow", what),
            Error::MalformedOffsetString(text) => {
                write!(f, "Invalid offset format: \"{}\"", text)
            },
            Error::InvalidOffset(reason) => write!(f, "Invalid offset: {}", reason),
            Error::InvalidZoneData(reason) => write!(f, "Invalid zone data: {}", reason),
            Error::PermissionDenied(action) => {
                write!(f, "Permission denied: {} may not be changed", action)
            },
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Returns true for the daylight saving gap error of strict conversions.
    pub fn is_gap(&self) -> bool {
        matches!(self, Error::InvalidInstant { .. })
    }
}
