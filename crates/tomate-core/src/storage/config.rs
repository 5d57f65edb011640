//! JSON-based timer configuration.
//!
//! Stores the three phase lengths (in seconds) and the sound files played
//! when a phase ends. Loading never fails: a missing, unreadable, malformed
//! or out-of-range file yields the defaults. Partial files are deep merged
//! onto the defaults, so `{"pomodoro": 1200}` is a valid configuration.
//!
//! Configuration is stored at `~/.config/tomate-cli/config.json` unless
//! overridden (see [`super::resolve_config_path`]).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

use crate::error::ConfigError;

/// Upper bound for any phase length: one day.
pub const MAX_DURATION_SECS: u32 = 86_400;

const DEFAULT_POMODORO_SOUND: &str = "/usr/share/sounds/freedesktop/stereo/complete.oga";
const DEFAULT_BREAK_SOUND: &str = "/usr/share/sounds/freedesktop/stereo/bell.oga";

/// Sounds played at the end of a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundConfig {
    pub pomodoro_end: String,
    pub break_end: String,
}

/// Timer configuration.
///
/// Serialized to/from camelCase JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub pomodoro: u32,
    pub short_break: u32,
    pub long_break: u32,
    pub sound: SoundConfig,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            pomodoro_end: DEFAULT_POMODORO_SOUND.into(),
            break_end: DEFAULT_BREAK_SOUND.into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pomodoro: 1500,
            short_break: 300,
            long_break: 900,
            sound: SoundConfig::default(),
        }
    }
}

/// Partial update of [`SoundConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pomodoro_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_end: Option<String>,
}

/// Partial update of [`Config`]; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pomodoro: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_break: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_break: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<SoundPatch>,
}

/// A phase length is valid when it is between 1 second and one day.
pub fn validate_duration(secs: u32) -> bool {
    secs > 0 && secs <= MAX_DURATION_SECS
}

fn check_duration(errors: &mut Vec<String>, label: &str, value: Option<u32>) {
    if let Some(secs) = value {
        if !validate_duration(secs) {
            errors.push(format!(
                "{label} must be between 1-{MAX_DURATION_SECS} seconds (got {secs})"
            ));
        }
    }
}

fn check_path(errors: &mut Vec<String>, label: &str, value: Option<&str>) {
    if let Some(path) = value {
        if path.trim().is_empty() {
            errors.push(format!("{label} sound path must not be empty"));
        }
    }
}

impl ConfigPatch {
    /// Human-readable validation failures for the fields present in the patch.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_duration(&mut errors, "Pomodoro duration", self.pomodoro);
        check_duration(&mut errors, "Short break", self.short_break);
        check_duration(&mut errors, "Long break", self.long_break);
        if let Some(ref sound) = self.sound {
            check_path(&mut errors, "Pomodoro end", sound.pomodoro_end.as_deref());
            check_path(&mut errors, "Break end", sound.break_end.as_deref());
        }
        errors
    }
}

impl From<&Config> for ConfigPatch {
    fn from(cfg: &Config) -> Self {
        Self {
            pomodoro: Some(cfg.pomodoro),
            short_break: Some(cfg.short_break),
            long_break: Some(cfg.long_break),
            sound: Some(SoundPatch {
                pomodoro_end: Some(cfg.sound.pomodoro_end.clone()),
                break_end: Some(cfg.sound.break_end.clone()),
            }),
        }
    }
}

impl Config {
    /// Human-readable validation failures; empty when the config is usable.
    pub fn validate(&self) -> Vec<String> {
        ConfigPatch::from(self).validate()
    }

    /// Copy of `self` with every field present in `patch` replaced.
    pub fn merged(&self, patch: &ConfigPatch) -> Config {
        let mut cfg = self.clone();
        if let Some(secs) = patch.pomodoro {
            cfg.pomodoro = secs;
        }
        if let Some(secs) = patch.short_break {
            cfg.short_break = secs;
        }
        if let Some(secs) = patch.long_break {
            cfg.long_break = secs;
        }
        if let Some(ref sound) = patch.sound {
            if let Some(ref path) = sound.pomodoro_end {
                cfg.sound.pomodoro_end = path.clone();
            }
            if let Some(ref path) = sound.break_end {
                cfg.sound.break_end = path.clone();
            }
        }
        cfg
    }

    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Number(_) => value
                        .trim()
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as whole seconds")))?,
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                    _ => return Err(unknown()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Get a config value as string by dot-separated key (`sound.breakEnd`).
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Copy of `self` with one dot-separated key replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value does not fit the
    /// field's type, or the result fails validation.
    pub fn with_value(&self, key: &str, value: &str) -> Result<Config, ConfigError> {
        let mut json = serde_json::to_value(self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let cfg: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        let errors = cfg.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Invalid(errors));
        }
        Ok(cfg)
    }
}

/// Recursively overlay `patch` onto `base`. Objects merge key by key,
/// anything else replaces.
fn merge_json(base: &mut serde_json::Value, patch: serde_json::Value) {
    match (base, patch) {
        (serde_json::Value::Object(base), serde_json::Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Where timer configuration comes from.
///
/// The timer only needs to read it; writing is the store's business.
pub trait ConfigSource {
    fn load(&self) -> Config;
}

/// File-backed configuration store.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, merge onto defaults and validate the file.
    ///
    /// A missing file is not an error and yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, does
    /// not match the schema or fails validation.
    pub fn try_load(&self) -> Result<Config, ConfigError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let on_disk: serde_json::Value = serde_json::from_str(&content)?;
        let mut merged = serde_json::to_value(Config::default())?;
        merge_json(&mut merged, on_disk);
        let cfg: Config = serde_json::from_value(merged)?;

        let errors = cfg.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Invalid(errors));
        }
        Ok(cfg)
    }

    /// Validate, merge with the on-disk config and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch or the merged result is invalid, or the
    /// file cannot be written.
    pub fn try_save(&self, patch: &ConfigPatch) -> Result<Config, ConfigError> {
        let errors = patch.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Invalid(errors));
        }
        let cfg = self.load().merged(patch);
        let errors = cfg.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Invalid(errors));
        }
        self.write(&cfg)?;
        Ok(cfg)
    }

    /// Like [`Self::try_save`], reporting failures through the log.
    pub fn save(&self, patch: &ConfigPatch) -> bool {
        match self.try_save(patch) {
            Ok(_) => true,
            Err(e) => {
                error!(path = %self.path.display(), "config save failed: {e}");
                false
            }
        }
    }

    /// Set one dot-separated key and persist.
    ///
    /// # Errors
    ///
    /// See [`Config::with_value`]; also fails if the file cannot be written.
    pub fn set(&self, key: &str, value: &str) -> Result<Config, ConfigError> {
        let cfg = self.load().with_value(key, value)?;
        self.write(&cfg)?;
        Ok(cfg)
    }

    /// Overwrite the file with the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn reset(&self) -> Result<Config, ConfigError> {
        let cfg = Config::default();
        self.write(&cfg)?;
        Ok(cfg)
    }

    fn write(&self, cfg: &Config) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(write_err)?;
            }
        }
        let content = serde_json::to_string_pretty(cfg)?;
        std::fs::write(&self.path, content).map_err(write_err)?;
        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }
}

impl ConfigSource for ConfigStore {
    fn load(&self) -> Config {
        self.try_load().unwrap_or_else(|e| {
            warn!(path = %self.path.display(), "invalid configuration detected, using defaults: {e}");
            Config::default()
        })
    }
}

impl ConfigSource for Config {
    fn load(&self) -> Config {
        self.clone()
    }
}
