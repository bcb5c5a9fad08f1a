// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Persisted pane height. Reads never fail and writes are best effort.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde_json::{json, Value};

const FILE_NAME: &str = "preferences.json";
const HEIGHT_KEY: &str = "separator_height";

#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
}

impl Preferences {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(FILE_NAME),
        }
    }

    /// `<config dir>/rustycatcher`, if the platform has a config dir.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rustycatcher"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved height, or `None` when missing, unreadable or not a positive
    /// integer. Numeric strings are accepted.
    pub fn load_pane_height(&self) -> Option<u32> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("No preferences at {}: {}", self.path.display(), e);
                return None;
            }
        };
        let value: Value = match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring malformed preferences {}: {}", self.path.display(), e);
                return None;
            }
        };
        let height = match value.get(HEIGHT_KEY)? {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        };
        height.filter(|h| *h > 0)
    }

    pub fn save_pane_height(&self, height: u32) {
        if let Err(e) = self.write(height) {
            warn!("Failed to save preferences to {}: {}", self.path.display(), e);
        }
    }

    fn write(&self, height: u32) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = json!({ HEIGHT_KEY: height }).to_string();
        fs::write(&self.path, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let prefs = Preferences::new(dir.path());
        assert_eq!(prefs.load_pane_height(), None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let prefs = Preferences::new(dir.path().join("nested"));
        prefs.save_pane_height(17);
        assert_eq!(prefs.load_pane_height(), Some(17));
    }

    #[test]
    fn test_invalid_values_are_none() {
        let dir = tempdir().unwrap();
        let prefs = Preferences::new(dir.path());

        fs::write(prefs.path(), "not json").unwrap();
        assert_eq!(prefs.load_pane_height(), None);

        fs::write(prefs.path(), r#"{"separator_height": "tall"}"#).unwrap();
        assert_eq!(prefs.load_pane_height(), None);

        fs::write(prefs.path(), r#"{"separator_height": -3}"#).unwrap();
        assert_eq!(prefs.load_pane_height(), None);

        fs::write(prefs.path(), r#"{"separator_height": " 9 "}"#).unwrap();
        assert_eq!(prefs.load_pane_height(), Some(9));
    }

    #[test]
    fn test_unwritable_location_is_silent() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let prefs = Preferences::new(blocker.join("sub"));

        prefs.save_pane_height(5);
        assert_eq!(prefs.load_pane_height(), None);
    }
}
