// Copyright (c) 2025 TexasFortress.AI
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use config::{Environment, File};
use log::warn;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::models::Format;
use crate::transport::TransportMode;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:1080/";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Root of the capture server; resource paths are resolved against it.
    pub base_url: String,
    pub transport: TransportMode,
    pub poll_interval_ms: u64,
    /// Format tab shown first when a message offers it.
    pub default_format: Format,
    /// Where `preferences.json` lives. Defaults to the platform config dir.
    pub state_dir: Option<String>,
    pub log: LogConfig,
}

impl Settings {
    pub fn new(config_path: Option<&str>) -> Result<Self, SettingsError> {
        let mut config_builder = config::Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("transport", "auto")?
            .set_default("poll_interval_ms", DEFAULT_POLL_INTERVAL_MS)?
            .set_default("default_format", "html")?
            .set_default("log.level", "info")?;

        if let Some(path) = config_path {
            config_builder = config_builder.add_source(File::with_name(path));
        }

        // e.g. `RUSTYCATCHER_POLL_INTERVAL_MS=500` overrides `poll_interval_ms`
        // and `RUSTYCATCHER_LOG__LEVEL=debug` overrides `log.level`
        config_builder = config_builder.add_source(
            Environment::with_prefix("RUSTYCATCHER")
                .prefix_separator("_")
                .separator("__")
                .ignore_empty(true),
        );

        // Direct environment variables for the common settings
        let env_vars = [
            ("CATCHER_URL", "base_url"),
            ("CATCHER_TRANSPORT", "transport"),
            ("CATCHER_POLL_INTERVAL_MS", "poll_interval_ms"),
            ("CATCHER_STATE_DIR", "state_dir"),
            ("CATCHER_LOG_LEVEL", "log.level"),
        ];

        for (env_var, config_path) in &env_vars {
            let Ok(value) = env::var(env_var) else {
                continue;
            };
            match *env_var {
                "CATCHER_POLL_INTERVAL_MS" => match value.parse::<u64>() {
                    Ok(ms) if ms > 0 => {
                        config_builder = config_builder.set_override(*config_path, ms)?;
                    }
                    _ => warn!("Invalid interval value in {}: {}", env_var, value),
                },
                "CATCHER_TRANSPORT" => match value.to_lowercase().as_str() {
                    mode @ ("auto" | "push" | "poll") => {
                        config_builder = config_builder.set_override(*config_path, mode)?;
                    }
                    _ => warn!("Invalid transport value in {}: {}", env_var, value),
                },
                _ => {
                    config_builder = config_builder.set_override(*config_path, value)?;
                }
            }
        }

        let settings: Settings = config_builder.build()?.try_deserialize()?;
        if settings.poll_interval_ms == 0 {
            return Err(SettingsError::Invalid(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(settings)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn state_dir(&self) -> Option<PathBuf> {
        self.state_dir.as_ref().map(PathBuf::from)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig { level: "info".to_string() }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            transport: TransportMode::Auto,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            default_format: Format::Html,
            state_dir: None,
            log: LogConfig::default(),
        }
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load or parse configuration: {0}")]
    LoadError(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::tempdir;

    const VARS: [&str; 6] = [
        "CATCHER_URL",
        "CATCHER_TRANSPORT",
        "CATCHER_POLL_INTERVAL_MS",
        "CATCHER_STATE_DIR",
        "CATCHER_LOG_LEVEL",
        "RUSTYCATCHER_POLL_INTERVAL_MS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let settings = Settings::new(None).unwrap();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.transport, TransportMode::Auto);
        assert_eq!(settings.poll_interval(), Duration::from_millis(1000));
        assert_eq!(settings.default_format, Format::Html);
        assert_eq!(settings.log.level, "info");
        assert!(settings.state_dir().is_none());
    }

    #[test]
    #[serial]
    fn test_direct_env_vars_override() {
        clear_env();
        env::set_var("CATCHER_URL", "http://mail.test:1080/");
        env::set_var("CATCHER_TRANSPORT", "Poll");
        env::set_var("CATCHER_POLL_INTERVAL_MS", "250");
        env::set_var("CATCHER_STATE_DIR", "/tmp/catcher");

        let settings = Settings::new(None).unwrap();
        clear_env();

        assert_eq!(settings.base_url, "http://mail.test:1080/");
        assert_eq!(settings.transport, TransportMode::Poll);
        assert_eq!(settings.poll_interval_ms, 250);
        assert_eq!(settings.state_dir(), Some(PathBuf::from("/tmp/catcher")));
    }

    #[test]
    #[serial]
    fn test_invalid_env_values_are_ignored() {
        clear_env();
        env::set_var("CATCHER_TRANSPORT", "carrier-pigeon");
        env::set_var("CATCHER_POLL_INTERVAL_MS", "soon");

        let settings = Settings::new(None).unwrap();
        clear_env();

        assert_eq!(settings.transport, TransportMode::Auto);
        assert_eq!(settings.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    }

    #[test]
    #[serial]
    fn test_prefixed_env_var() {
        clear_env();
        env::set_var("RUSTYCATCHER_POLL_INTERVAL_MS", "400");
        let settings = Settings::new(None).unwrap();
        clear_env();
        assert_eq!(settings.poll_interval_ms, 400);
    }

    #[test]
    #[serial]
    fn test_config_file() {
        clear_env();
        let dir = tempdir().unwrap();
        let path = dir.path().join("catcher.toml");
        fs::write(
            &path,
            concat!(
                "base_url = \"https://catcher.test/\"\n",
                "transport = \"push\"\n",
                "default_format = \"plain\"\n",
                "\n[log]\nlevel = \"debug\"\n",
            ),
        )
        .unwrap();

        let settings = Settings::new(path.to_str()).unwrap();

        assert_eq!(settings.base_url, "https://catcher.test/");
        assert_eq!(settings.transport, TransportMode::Push);
        assert_eq!(settings.default_format, Format::Plain);
        assert_eq!(settings.log.level, "debug");
    }

    #[test]
    #[serial]
    fn test_zero_interval_in_file_is_rejected() {
        clear_env();
        let dir = tempdir().unwrap();
        let path = dir.path().join("catcher.toml");
        fs::write(&path, "poll_interval_ms = 0\n").unwrap();

        assert!(matches!(
            Settings::new(path.to_str()),
            Err(SettingsError::Invalid(_))
        ));
    }
}
