// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Zones persist as their id only; loading resolves the id again, so the
//! transition data always comes from the running process.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::registry::Registry;
use crate::zone::Zone;

impl Serialize for Zone {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// Resolves through [`Registry::global`].
impl<'de> Deserialize<'de> for Zone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Registry::global().resolve(&id).map_err(D::Error::custom)
    }
}

/// Deserializes a zone id against an explicit registry.
pub fn deserialize_with<'de, D: Deserializer<'de>>(
    registry: &Registry,
    deserializer: D,
) -> std::result::Result<Zone, D::Error> {
    let id = String::deserialize(deserializer)?;
    registry.resolve(&id).map_err(D::Error::custom)
}
