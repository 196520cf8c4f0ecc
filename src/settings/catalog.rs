//! The settings catalog: one current, validated configuration plus a bounded
//! history of previous versions.

use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};

use crate::error::CrateCostError;

use super::defaults::default_settings;
use super::ids::{IdGenerator, RandomIds};
use super::store::{SettingsStore, HISTORY_LIMIT};
use super::types::CrateSettings;
use super::validation::{validate, violations};

/// Actor recorded when the catalog seeds defaults on its own.
pub const SYSTEM_ACTOR: &str = "system";

/// Versioned settings catalog over a pluggable store.
///
/// Saves are read-validate-write with a fresh version id each time. A single
/// process needs nothing more; hosts with several writers should route saves
/// through [`SettingsCatalog::save_if_current`] so a concurrent update is
/// rejected instead of silently overwritten.
pub struct SettingsCatalog<S: SettingsStore> {
    store: S,
    ids: Box<dyn IdGenerator>,
}

impl<S: SettingsStore> SettingsCatalog<S> {
    /// Create a catalog that stamps random, time-ordered version ids.
    pub fn new(store: S) -> Self {
        Self::with_id_generator(store, Box::new(RandomIds))
    }

    pub fn with_id_generator(store: S, ids: Box<dyn IdGenerator>) -> Self {
        Self { store, ids }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Return the current settings, seeding defaults when nothing usable is
    /// stored. Seeding is a single commit, so a half-seeded store never exists.
    pub fn load(&mut self) -> Result<CrateSettings, CrateCostError> {
        match self.store.current()? {
            Some(json) => match parse_valid(&json) {
                Ok(settings) => Ok(settings),
                Err(reason) => {
                    warn!("Stored settings unusable ({}), reseeding defaults", reason);
                    self.save(&default_settings(), SYSTEM_ACTOR)
                }
            },
            None => {
                info!("No stored settings, seeding defaults");
                self.save(&default_settings(), SYSTEM_ACTOR)
            }
        }
    }

    /// Stamp, validate and persist `settings` as the new current version.
    ///
    /// Returns the stamped settings. Nothing is written when validation fails.
    pub fn save(
        &mut self,
        settings: &CrateSettings,
        actor: &str,
    ) -> Result<CrateSettings, CrateCostError> {
        let mut stamped = settings.clone();
        stamped.meta.version = self.ids.next_id();
        stamped.meta.updated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        stamped.meta.updated_by = actor.to_string();

        let stamped = validate(stamped)?;
        let json = serde_json::to_string(&stamped)?;
        self.store.commit(&json, HISTORY_LIMIT)?;

        info!(
            "Saved settings version {} by {}",
            stamped.meta.version, stamped.meta.updated_by
        );
        Ok(stamped)
    }

    /// Save only if the stored version is still `expected_version`.
    ///
    /// A stored document that no longer parses is an error, never a match.
    pub fn save_if_current(
        &mut self,
        settings: &CrateSettings,
        actor: &str,
        expected_version: &str,
    ) -> Result<CrateSettings, CrateCostError> {
        let found = match self.store.current()? {
            Some(json) => serde_json::from_str::<CrateSettings>(&json)?.meta.version,
            None => String::new(),
        };

        if found != expected_version {
            warn!(
                "Rejected save by {}: expected version {}, found {}",
                actor, expected_version, found
            );
            return Err(CrateCostError::VersionConflict {
                expected: expected_version.to_string(),
                found,
            });
        }

        self.save(settings, actor)
    }

    /// Saved versions, newest first. Entries that no longer parse are skipped.
    pub fn history(&self) -> Result<Vec<CrateSettings>, CrateCostError> {
        let entries = self.store.history()?;
        let mut parsed = Vec::with_capacity(entries.len());
        for json in entries {
            match serde_json::from_str::<CrateSettings>(&json) {
                Ok(settings) => parsed.push(settings),
                Err(e) => warn!("Skipping unparsable history entry: {}", e),
            }
        }
        Ok(parsed)
    }

    /// Re-save a historical version as a new current version.
    pub fn restore(
        &mut self,
        version: &str,
        actor: &str,
    ) -> Result<CrateSettings, CrateCostError> {
        let previous = self
            .history()?
            .into_iter()
            .find(|s| s.meta.version == version)
            .ok_or_else(|| CrateCostError::VersionNotFound(version.to_string()))?;

        info!("Restoring settings version {} for {}", version, actor);
        self.save(&previous, actor)
    }

    /// Replace the current settings with the built-in defaults.
    pub fn reset_to_defaults(&mut self, actor: &str) -> Result<CrateSettings, CrateCostError> {
        self.save(&default_settings(), actor)
    }
}

fn parse_valid(json: &str) -> Result<CrateSettings, String> {
    let settings: CrateSettings = serde_json::from_str(json).map_err(|e| e.to_string())?;
    let found = violations(&settings);
    if found.is_empty() {
        Ok(settings)
    } else {
        Err(format!("{} validation violation(s)", found.len()))
    }
}
