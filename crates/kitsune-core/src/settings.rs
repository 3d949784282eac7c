//! User settings: chat endpoint, fox colour, sound, and save location.
//!
//! Settings live in `kitsune_settings.json` (overridable through
//! `KITSUNE_SETTINGS_PATH`). Reading is lenient per field: the file is
//! parsed into a [`RawSettings`] of untyped values and
//! [`migrate_settings`] keeps every valid field, replacing only the bad
//! ones with their defaults (with a warning). Missing and unknown keys are
//! harmless. A file that cannot be read or is not a JSON object degrades
//! to defaults. After loading, `KITSUNE_LLM_ENDPOINT` overrides the stored
//! endpoint.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use kitsune_types::FoxColor;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::SettingsError;

/// Default settings file name.
pub const SETTINGS_FILE: &str = "kitsune_settings.json";

/// Environment variable naming an alternative settings file.
pub const SETTINGS_PATH_ENV: &str = "KITSUNE_SETTINGS_PATH";

/// Environment variable overriding the chat endpoint.
pub const LLM_ENDPOINT_ENV: &str = "KITSUNE_LLM_ENDPOINT";

/// Persisted user settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Base URL of the chat collaborator.
    #[serde(default = "default_llm_endpoint", alias = "llm_endpoint")]
    pub llm_endpoint: String,

    /// Fur colour.
    #[serde(default, alias = "fox_color")]
    pub fox_color: FoxColor,

    /// Whether sound effects are enabled.
    #[serde(default = "default_sound_enabled", alias = "sound_enabled")]
    pub sound_enabled: bool,

    /// Directory holding the progress snapshot.
    #[serde(default = "default_save_location", alias = "save_location")]
    pub save_location: PathBuf,
}

fn default_llm_endpoint() -> String {
    "http://localhost:8000".to_owned()
}

const fn default_sound_enabled() -> bool {
    true
}

fn default_save_location() -> PathBuf {
    PathBuf::from("./saves/")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm_endpoint: default_llm_endpoint(),
            fox_color: FoxColor::default(),
            sound_enabled: default_sound_enabled(),
            save_location: default_save_location(),
        }
    }
}

impl Settings {
    /// Restore every field to its default.
    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }

    /// Set the fox colour from its label.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] for anything other than the five
    /// colour labels; the current colour is kept.
    pub fn set_fox_color(&mut self, label: &str) -> Result<FoxColor, SettingsError> {
        let color = FoxColor::from_str(label.trim())?;
        self.fox_color = color;
        Ok(color)
    }

    /// Flip the sound flag and return the new value.
    pub const fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(LLM_ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
            debug!(endpoint = %endpoint, "chat endpoint overridden from environment");
            self.llm_endpoint = endpoint;
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient reading
// ---------------------------------------------------------------------------

/// Settings as found on disk: every field optional and untyped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSettings {
    /// Chat endpoint, expected to be a string.
    #[serde(default, alias = "llm_endpoint")]
    pub llm_endpoint: Option<Value>,
    /// Colour label, expected to be a string.
    #[serde(default, alias = "fox_color")]
    pub fox_color: Option<Value>,
    /// Sound flag, expected to be a boolean.
    #[serde(default, alias = "sound_enabled")]
    pub sound_enabled: Option<Value>,
    /// Save directory, expected to be a string.
    #[serde(default, alias = "save_location")]
    pub save_location: Option<Value>,
}

/// Turn a raw document into settings, field by field.
///
/// Absent fields take their defaults silently. Present fields of the wrong
/// type, empty strings and unknown colours take their defaults with a
/// warning; the remaining fields are kept. Colour labels are matched
/// without regard to case.
pub fn migrate_settings(raw: RawSettings) -> Settings {
    let mut settings = Settings::default();

    if let Some(endpoint) = non_empty_string(raw.llm_endpoint, "llmEndpoint") {
        settings.llm_endpoint = endpoint;
    }
    if let Some(label) = non_empty_string(raw.fox_color, "foxColor") {
        match FoxColor::from_str(&label.to_ascii_lowercase()) {
            Ok(color) => settings.fox_color = color,
            Err(e) => warn!(error = %e, "ignoring fox colour in settings file"),
        }
    }
    match raw.sound_enabled {
        None => {}
        Some(Value::Bool(enabled)) => settings.sound_enabled = enabled,
        Some(other) => warn!(value = %other, "ignoring soundEnabled in settings file"),
    }
    if let Some(location) = non_empty_string(raw.save_location, "saveLocation") {
        settings.save_location = PathBuf::from(location);
    }
    settings
}

fn non_empty_string(value: Option<Value>, field: &'static str) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        other => {
            warn!(field, value = %other, "ignoring settings field");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Reads and writes the settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store for an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `KITSUNE_SETTINGS_PATH`, or `kitsune_settings.json` in the
    /// working directory.
    pub fn from_env() -> Self {
        let path = std::env::var(SETTINGS_PATH_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(SETTINGS_FILE), PathBuf::from);
        Self::new(path)
    }

    /// Settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the settings file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the file exists but cannot be read or
    /// is not a JSON object. Bad individual fields are not errors; see
    /// [`migrate_settings`].
    pub fn try_load(&self) -> Result<Option<Settings>, SettingsError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let raw: RawSettings =
            serde_json::from_str(&contents).map_err(|source| SettingsError::Json {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(migrate_settings(raw)))
    }

    /// Load settings, falling back to defaults on any failure, then apply
    /// environment overrides.
    pub fn load(&self) -> Settings {
        let mut settings = match self.try_load() {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                debug!(path = %self.path.display(), "no settings file, using defaults");
                Settings::default()
            }
            Err(e) => {
                warn!(error = %e, "settings unreadable, using defaults");
                Settings::default()
            }
        };
        settings.apply_env_overrides();
        settings
    }

    /// Write settings as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] when the directory or file cannot be
    /// written.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(settings).map_err(|source| SettingsError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
