// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Access control for the registry's process-wide settings.

use std::env::{self, VarError};
use std::fmt;

use tracing::warn;

use crate::environment::ENV_TZKIT_ADMIN_DENY;
use crate::error::{Error, Result};

/// A mutation of a registry slot that an [`AccessPolicy`] may refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminAction {
    SetDefaultZone,
    SetZoneProvider,
    SetNameProvider,
}

impl AdminAction {
    pub const ALL: [AdminAction; 3] = [
        AdminAction::SetDefaultZone,
        AdminAction::SetZoneProvider,
        AdminAction::SetNameProvider,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AdminAction::SetDefaultZone => "default-zone",
            AdminAction::SetZoneProvider => "zone-provider",
            AdminAction::SetNameProvider => "name-provider",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub trait AccessPolicy: Send + Sync + fmt::Debug {
    /// `Err(PermissionDenied)` when `action` is not allowed.
    fn check(&self, action: AdminAction) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn check(&self, _action: AdminAction) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAll;

impl AccessPolicy for DenyAll {
    fn check(&self, action: AdminAction) -> Result<()> {
        Err(Error::PermissionDenied(action))
    }
}

/// Refuses the listed actions and allows the rest.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DenyList {
    denied: Vec<AdminAction>,
}

impl DenyList {
    pub fn new(denied: impl IntoIterator<Item = AdminAction>) -> Self {
        Self {
            denied: denied.into_iter().collect(),
        }
    }

    /// Reads `TZKIT_ADMIN_DENY`; `None` when it is unset.
    pub fn from_env() -> Option<Self> {
        build_deny_list(env::var(ENV_TZKIT_ADMIN_DENY))
    }

    /// Whitespace separated action names; `*` denies everything.
    /// Unknown names are logged and skipped.
    pub fn parse(value: &str) -> Self {
        let mut denied = Vec::new();
        for entry in value.split_whitespace() {
            if entry == "*" {
                return Self::new(AdminAction::ALL);
            }
            match AdminAction::from_name(entry) {
                Some(action) if !denied.contains(&action) => denied.push(action),
                Some(_) => {},
                None => warn!(
                    "Ignoring unknown admin action in {}: {}",
                    ENV_TZKIT_ADMIN_DENY, entry
                ),
            }
        }
        Self { denied }
    }

    pub fn denies(&self, action: AdminAction) -> bool {
        self.denied.contains(&action)
    }
}

fn build_deny_list(env_value: std::result::Result<String, VarError>) -> Option<DenyList> {
    env_value.ok().map(|value| DenyList::parse(&value))
}

impl AccessPolicy for DenyList {
    fn check(&self, action: AdminAction) -> Result<()> {
        if self.denies(action) {
            return Err(Error::PermissionDenied(action));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deny_list() {
        let list = DenyList::parse("zone-provider  name-provider bogus zone-provider");
        assert!(list.denies(AdminAction::SetZoneProvider));
        assert!(list.denies(AdminAction::SetNameProvider));
        assert!(!list.denies(AdminAction::SetDefaultZone));
        assert_eq!(
            list.check(AdminAction::SetZoneProvider),
            Err(Error::PermissionDenied(AdminAction::SetZoneProvider))
        );
        assert!(list.check(AdminAction::SetDefaultZone).is_ok());
    }

    #[test]
    fn test_wildcard_and_empty() {
        let all = DenyList::parse("*");
        assert!(AdminAction::ALL.iter().all(|&a| all.denies(a)));
        assert_eq!(DenyList::parse("   "), DenyList::default());
        assert_eq!(build_deny_list(Err(VarError::NotPresent)), None);
    }

    #[test]
    fn test_fixed_policies() {
        assert!(AllowAll.check(AdminAction::SetDefaultZone).is_ok());
        assert!(DenyAll.check(AdminAction::SetDefaultZone).is_err());
        assert_eq!(
            Error::PermissionDenied(AdminAction::SetNameProvider).to_string(),
            "Permission denied: name-provider may not be changed"
        );
    }
}
