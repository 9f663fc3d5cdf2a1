//! Persistent application settings.
//!
//! A flat JSON object of arbitrary keys. Trello credentials are stored base64
//! masked (obscured, not encrypted) and fall back to the `TRELLO_KEY` /
//! `TRELLO_TOKEN` environment variables when blank. Reads never fail: a
//! missing or malformed file reads as empty.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use dirs::config_dir;
use serde_json::{Map, Value};

use crate::trello::Credentials;

const APP_NAME: &str = "cushions";
const SETTINGS_FILE: &str = "settings.json";

pub const TRELLO_KEY: &str = "trello_key";
pub const TRELLO_TOKEN: &str = "trello_token";
pub const LAST_DIR_UPLOAD: &str = "last_dir_upload";
pub const LAST_OPENED_FILE: &str = "last_opened_file";

pub const TRELLO_KEY_ENV: &str = "TRELLO_KEY";
pub const TRELLO_TOKEN_ENV: &str = "TRELLO_TOKEN";

#[derive(Debug, Clone)]
pub struct Settings {
    path: PathBuf,
}

impl Settings {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Settings in the user's config directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::open(default_settings_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Map<String, Value> {
        match self.try_load() {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!("Failed to load settings, using defaults: {:#}", e);
                Map::new()
            }
        }
    }

    fn try_load(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path).context("Failed to read settings file")?;
        let map = serde_json::from_str(&content).context("Failed to parse settings file")?;
        Ok(map)
    }

    fn write(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create settings directory")?;
            }
        }
        let content = serde_json::to_string_pretty(map).context("Failed to serialize settings")?;
        fs::write(&self.path, content).context("Failed to write settings file")?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.load().remove(key)
    }

    /// String value of `key`; empty strings read as absent.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Set one key, keeping every other key as it was.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.update(|map| {
            map.insert(key.to_string(), value.into());
        })
    }

    fn update(&self, apply: impl FnOnce(&mut Map<String, Value>)) -> Result<()> {
        let mut map = self.load();
        apply(&mut map);
        self.write(&map)
    }

    // ============================================================
    // Credentials
    // ============================================================

    /// Stored credentials, with environment fallback for blank fields.
    pub fn credentials(&self) -> Credentials {
        self.credentials_with_env(|name| std::env::var(name).ok())
    }

    pub fn credentials_with_env(&self, env: impl Fn(&str) -> Option<String>) -> Credentials {
        let map = self.load();
        let stored = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .map(unmask)
                .unwrap_or_default()
        };

        let mut api_key = stored(TRELLO_KEY);
        let mut token = stored(TRELLO_TOKEN);
        if api_key.is_empty() {
            api_key = env(TRELLO_KEY_ENV).unwrap_or_default();
        }
        if token.is_empty() {
            token = env(TRELLO_TOKEN_ENV).unwrap_or_default();
        }
        Credentials::new(api_key, token)
    }

    pub fn set_credentials(&self, credentials: &Credentials) -> Result<()> {
        self.update(|map| {
            map.insert(TRELLO_KEY.to_string(), mask(&credentials.api_key).into());
            map.insert(TRELLO_TOKEN.to_string(), mask(&credentials.token).into());
        })
    }

    // ============================================================
    // Recent locations
    // ============================================================

    /// Directory stored under `key`, if it still exists.
    pub fn directory(&self, key: &str) -> Option<PathBuf> {
        self.get_str(key)
            .map(PathBuf::from)
            .filter(|path| path.is_dir())
    }

    /// Remember the directory containing `file` under `key`.
    pub fn set_directory_of(&self, key: &str, file: &Path) -> Result<bool> {
        match file.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            Some(dir) => {
                self.set(key, dir.to_string_lossy().into_owned())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn last_opened_file(&self) -> Option<PathBuf> {
        self.get_str(LAST_OPENED_FILE).map(PathBuf::from)
    }

    pub fn set_last_opened_file(&self, file: &Path) -> Result<()> {
        self.set(LAST_OPENED_FILE, file.to_string_lossy().into_owned())
    }

    pub fn clear_last_opened_file(&self) -> Result<()> {
        self.set(LAST_OPENED_FILE, "")
    }
}

fn default_settings_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(SETTINGS_FILE);
    Ok(path)
}

/// Obscure a value for storage.
pub fn mask(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    STANDARD.encode(text.as_bytes())
}

/// Reverse [`mask`]. Values that are not valid base64 UTF-8 come back as-is,
/// so hand-edited plain values keep working.
pub fn unmask(masked: &str) -> String {
    if masked.is_empty() {
        return String::new();
    }
    STANDARD
        .decode(masked.as_bytes())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| masked.to_string())
}
