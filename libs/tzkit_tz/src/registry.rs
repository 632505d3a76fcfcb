// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Zone lookup by id and the process-wide zone settings.
//!
//! A [`Registry`] owns three lazily initialised slots (default zone, zone
//! provider, name provider) and a cache of resolved zones. Slots are filled
//! on first read from the [`RegistryConfig`]; concurrent first reads all
//! observe the same winning value, and a filled slot only changes through
//! its setter.

use std::collections::{BTreeSet, HashMap};
use std::env;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::bundled::BundledProvider;
use crate::environment::{ENV_TZ, ENV_TZKIT_DEFAULT_ZONE};
use crate::error::{Error, Result};
use crate::instant::Instant;
use crate::names::{DefaultNameProvider, NameProvider};
use crate::offset::Offset;
use crate::policy::{AccessPolicy, AdminAction, AllowAll, DenyList};
use crate::provider::ZoneProvider;
use crate::zone::Zone;

/// Ids that always mean UTC, whatever the provider says.
pub const UTC_ALIASES: &[&str] = &[
    "UTC",
    "Etc/UTC",
    "Etc/GMT",
    "GMT",
    "UCT",
    "Universal",
    "Zulu",
    "Z",
];

static GLOBAL: Lazy<Registry> = Lazy::new(|| Registry::new(RegistryConfig::from_env()));

/// Initial settings of a [`Registry`]. Unset slots use the built-in
/// defaults: UTC, [`BundledProvider`] and [`DefaultNameProvider`].
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub default_zone_id: Option<String>,
    pub zone_provider: Option<Arc<dyn ZoneProvider>>,
    pub name_provider: Option<Arc<dyn NameProvider>>,
    pub policy: Arc<dyn AccessPolicy>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_zone_id: None,
            zone_provider: None,
            name_provider: None,
            policy: Arc::new(AllowAll),
        }
    }
}

impl RegistryConfig {
    /// Reads `TZKIT_DEFAULT_ZONE` (else `TZ`) and `TZKIT_ADMIN_DENY`.
    pub fn from_env() -> Self {
        let default_zone_id = [ENV_TZKIT_DEFAULT_ZONE, ENV_TZ]
            .into_iter()
            .filter_map(|name| env::var(name).ok())
            .find_map(|value| {
                // POSIX allows a leading colon in TZ
                let id = value.trim().trim_start_matches(':');
                (!id.is_empty()).then(|| id.to_string())
            });
        let policy: Arc<dyn AccessPolicy> = match DenyList::from_env() {
            Some(deny_list) => Arc::new(deny_list),
            None => Arc::new(AllowAll),
        };
        Self {
            default_zone_id,
            policy,
            ..Self::default()
        }
    }

    pub fn with_default_zone_id(mut self, id: impl Into<String>) -> Self {
        self.default_zone_id = Some(id.into());
        self
    }

    pub fn with_zone_provider(mut self, provider: Arc<dyn ZoneProvider>) -> Self {
        self.zone_provider = Some(provider);
        self
    }

    pub fn with_name_provider(mut self, provider: Arc<dyn NameProvider>) -> Self {
        self.name_provider = Some(provider);
        self
    }

    pub fn with_policy(mut self, policy: Arc<dyn AccessPolicy>) -> Self {
        self.policy = policy;
        self
    }
}

/// A set-once-then-replace cell. The first value stored wins races between
/// initialisers; later stores only happen through [`Slot::replace`].
struct Slot<T> {
    value: RwLock<Option<T>>,
}

impl<T: Clone> Slot<T> {
    const fn empty() -> Self {
        Self {
            value: RwLock::new(None),
        }
    }

    fn get_or_init(&self, init: impl FnOnce() -> T) -> (T, bool) {
        if let Some(value) = self.read().as_ref() {
            return (value.clone(), false);
        }
        // Build outside the lock, init may read other slots
        let candidate = init();
        let mut guard = self.write();
        let initialised = guard.is_none();
        (guard.get_or_insert(candidate).clone(), initialised)
    }

    fn replace(&self, value: T) {
        *self.write() = Some(value);
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<T>> {
        self.value.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<T>> {
        self.value.write().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct Registry {
    config: RegistryConfig,
    default_zone: Slot<Zone>,
    zone_provider: Slot<Arc<dyn ZoneProvider>>,
    name_provider: Slot<Arc<dyn NameProvider>>,
    zones: RwLock<HashMap<String, Zone>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("cached_zones", &self.read_zones().len())
            .finish()
    }
}

impl Registry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            default_zone: Slot::empty(),
            zone_provider: Slot::empty(),
            name_provider: Slot::empty(),
            zones: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide registry, configured from the environment on first use.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Resolves a zone id: UTC aliases first, then provider ids, then
    /// fixed-offset strings such as `+05:30`.
    pub fn resolve(&self, id: &str) -> Result<Zone> {
        if let Some(zone) = self.read_zones().get(id) {
            return Ok(zone.clone());
        }
        let provider = self.zone_provider();
        let zone = load(provider.as_ref(), id)?;
        let mut zones = self.write_zones();
        // The provider may have been replaced while loading; its zones must
        // not outlive the cache clear.
        if !Arc::ptr_eq(&provider, &self.zone_provider()) {
            return Ok(zone);
        }
        Ok(zones.entry(id.to_string()).or_insert(zone).clone())
    }

    /// The fixed zone for `offset`; `UTC` for zero.
    pub fn for_offset(&self, offset: Offset) -> Zone {
        if offset.is_utc() {
            return Zone::utc();
        }
        let id = offset.to_string();
        if let Some(zone) = self.read_zones().get(&id) {
            return zone.clone();
        }
        let mut zones = self.write_zones();
        zones.entry(id).or_insert_with(|| Zone::fixed(offset)).clone()
    }

    pub fn for_offset_millis(&self, millis: i64) -> Result<Zone> {
        Offset::from_millis(millis).map(|offset| self.for_offset(offset))
    }

    pub fn for_offset_hours_minutes(&self, hours: i32, minutes: i32) -> Result<Zone> {
        Offset::from_hours_minutes(hours, minutes).map(|offset| self.for_offset(offset))
    }

    /// Provider ids plus `UTC`.
    pub fn available_ids(&self) -> BTreeSet<String> {
        let mut ids = self.zone_provider().available_ids();
        ids.insert("UTC".to_string());
        ids
    }

    pub fn default_zone(&self) -> Zone {
        let (zone, initialised) = self.default_zone.get_or_init(|| self.initial_default_zone());
        if initialised {
            debug!("Default zone initialised to {}", zone);
        }
        zone
    }

    fn initial_default_zone(&self) -> Zone {
        if let Some(id) = &self.config.default_zone_id {
            match self.resolve(id) {
                Ok(zone) => return zone,
                Err(err) => warn!("Falling back to UTC as default zone: {}", err),
            }
        }
        Zone::utc()
    }

    pub fn set_default_zone(&self, zone: Zone) -> Result<()> {
        self.config.policy.check(AdminAction::SetDefaultZone)?;
        debug!("Default zone set to {}", zone);
        self.default_zone.replace(zone);
        Ok(())
    }

    pub fn zone_provider(&self) -> Arc<dyn ZoneProvider> {
        let (provider, initialised) = self.zone_provider.get_or_init(|| {
            self.config
                .zone_provider
                .clone()
                .unwrap_or_else(|| Arc::new(BundledProvider))
        });
        if initialised {
            debug!("Zone provider initialised: {:?}", provider);
        }
        provider
    }

    /// Replaces the zone provider and drops every cached zone. Zones handed
    /// out earlier keep their old data.
    pub fn set_zone_provider(&self, provider: Arc<dyn ZoneProvider>) -> Result<()> {
        self.config.policy.check(AdminAction::SetZoneProvider)?;
        if provider.available_ids().is_empty() {
            return Err(Error::InvalidZoneData(
                "zone provider offers no zone ids".to_string(),
            ));
        }
        debug!("Zone provider set to {:?}", provider);
        let mut zones = self.write_zones();
        self.zone_provider.replace(provider);
        zones.clear();
        Ok(())
    }

    pub fn name_provider(&self) -> Arc<dyn NameProvider> {
        let (provider, initialised) = self.name_provider.get_or_init(|| {
            self.config
                .name_provider
                .clone()
                .unwrap_or_else(|| Arc::new(DefaultNameProvider))
        });
        if initialised {
            debug!("Name provider initialised: {:?}", provider);
        }
        provider
    }

    pub fn set_name_provider(&self, provider: Arc<dyn NameProvider>) -> Result<()> {
        self.config.policy.check(AdminAction::SetNameProvider)?;
        debug!("Name provider set to {:?}", provider);
        self.name_provider.replace(provider);
        Ok(())
    }

    /// Short display name of `zone` at `instant`, or the printed offset.
    pub fn short_name(&self, zone: &Zone, instant: Instant, locale: &str) -> String {
        let key = zone.name_key(instant);
        self.name_provider()
            .short_name(locale, zone.id(), &key)
            .unwrap_or_else(|| zone.offset(instant).to_string())
    }

    /// Long display name of `zone` at `instant`, or the printed offset.
    pub fn long_name(&self, zone: &Zone, instant: Instant, locale: &str) -> String {
        let key = zone.name_key(instant);
        self.name_provider()
            .long_name(locale, zone.id(), &key)
            .unwrap_or_else(|| zone.offset(instant).to_string())
    }

    fn read_zones(&self) -> RwLockReadGuard<'_, HashMap<String, Zone>> {
        self.zones.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_zones(&self) -> RwLockWriteGuard<'_, HashMap<String, Zone>> {
        self.zones.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn load(provider: &dyn ZoneProvider, id: &str) -> Result<Zone> {
    if UTC_ALIASES.contains(&id) {
        return Ok(Zone::utc());
    }
    if let Some(source) = provider.zone_source(id) {
        return Ok(Zone::table_backed(id, source));
    }
    if id.starts_with(['+', '-']) {
        return id
            .parse::<Offset>()
            .map(Zone::fixed)
            .map_err(|_| Error::UnrecognizedZoneId(id.to_string()));
    }
    Err(Error::UnrecognizedZoneId(id.to_string()))
}
