//! Daemon configuration: one JSON document with a default for every field.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use handheld_companion_engine::{AdapterOptions, GyroSource, LayoutConfig, SensorOverrides};
use openhandheld_errors::ConfigError;
use openhandheld_targets::TargetKind;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Tick period in milliseconds.
    pub tick_interval_ms: u64,
    /// Pad presented to games.
    pub target: TargetKind,
    /// Rumble gain forwarded to the controller, `0.0..=1.0`.
    pub vibration_strength: f64,
    /// Upper bound of one blocking HID read.
    pub read_timeout_ms: u32,
    pub legion_gyro_source: GyroSource,
    /// Per-device sensor scaling; missing devices use built-in values.
    pub sensors: SensorOverrides,
    pub layout: LayoutConfig,
    /// Default filter level when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let adapter = AdapterOptions::default();
        Self {
            tick_interval_ms: 10,
            target: TargetKind::Xbox360,
            vibration_strength: adapter.vibration_strength,
            read_timeout_ms: adapter.read_timeout_ms,
            legion_gyro_source: adapter.legion_gyro_source,
            sensors: adapter.sensors,
            layout: LayoutConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load from `path`, writing the defaults there first if the file does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, parsed or created.
    pub async fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            info!("Config file not found at {:?}, creating default", path);
            let config = Self::default();
            config.save_to_path(path).await?;
            return Ok(config);
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {path:?}"))?;
        let config = Self::from_json(&content)
            .with_context(|| format!("Failed to parse config file: {path:?}"))?;

        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// # Errors
    ///
    /// Fails when the directory or file cannot be written.
    pub async fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        tokio::fs::write(path, self.to_json()?)
            .await
            .with_context(|| format!("Failed to write config file: {path:?}"))?;

        debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown enum
    /// values.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// # Errors
    ///
    /// Fails only if a value cannot be represented in JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config")
    }

    /// `$XDG_CONFIG_HOME/openhandheld/service.json`, falling back to
    /// `~/.config`, or `%LOCALAPPDATA%` on Windows.
    ///
    /// # Errors
    ///
    /// Fails when none of the environment variables is set.
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(windows) {
            PathBuf::from(std::env::var("LOCALAPPDATA").context("LOCALAPPDATA environment variable not set")?)
        } else if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg)
        } else {
            PathBuf::from(std::env::var("HOME").context("HOME environment variable not set")?).join(".config")
        };

        Ok(config_dir.join("openhandheld").join("service.json"))
    }

    /// # Errors
    ///
    /// Returns the first field that is out of range, including fields of the
    /// layout and the sensor overrides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tick_ms = u32::try_from(self.tick_interval_ms).map_or(f64::MAX, f64::from);
        ConfigError::check_range("tick_interval_ms", tick_ms, 1.0, 1000.0)?;
        ConfigError::check_range("vibration_strength", self.vibration_strength, 0.0, 1.0)?;
        ConfigError::check_range("read_timeout_ms", f64::from(self.read_timeout_ms), 1.0, 1000.0)?;
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Invalid {
                field: "log_level".to_string(),
                reason: format!("expected one of {}, got '{}'", LOG_LEVELS.join(", "), self.log_level),
            });
        }
        self.sensors.validate()?;
        self.layout.validate()
    }

    pub fn adapter_options(&self) -> AdapterOptions {
        AdapterOptions {
            read_timeout_ms: self.read_timeout_ms,
            vibration_strength: self.vibration_strength,
            legion_gyro_source: self.legion_gyro_source,
            sensors: self.sensors,
        }
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openhandheld_actions::ActionConfig;
    use openhandheld_input::ButtonFlags;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn defaults_are_valid() -> TestResult {
        let config = ServiceConfig::default();
        config.validate()?;
        assert_eq!(config.tick_interval_ms, 10);
        assert_eq!(config.target, TargetKind::Xbox360);
        assert_eq!(config.adapter_options(), AdapterOptions::default());
        Ok(())
    }

    #[test]
    fn empty_document_gives_defaults() -> TestResult {
        assert_eq!(ServiceConfig::from_json("{}")?, ServiceConfig::default());
        Ok(())
    }

    #[test]
    fn partial_document_keeps_other_defaults() -> TestResult {
        let config = ServiceConfig::from_json(r#"{ "target": "dualshock4", "tick_interval_ms": 4 }"#)?;
        assert_eq!(config.target, TargetKind::DualShock4);
        assert_eq!(config.tick_interval_ms, 4);
        assert_eq!(config.layout, LayoutConfig::default());
        assert_eq!(config.log_level, "info");
        Ok(())
    }

    #[test]
    fn unknown_target_is_a_parse_error() {
        let result = ServiceConfig::from_json(r#"{ "target": "gamecube" }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let config = ServiceConfig {
            tick_interval_ms: 0,
            ..ServiceConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field, .. }) if field == "tick_interval_ms"
        ));
    }

    #[test]
    fn strength_above_one_is_rejected() {
        let config = ServiceConfig {
            vibration_strength: 1.5,
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn log_level_must_be_a_level() {
        let config = ServiceConfig {
            log_level: "loud".to_string(),
            ..ServiceConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let config = ServiceConfig {
            log_level: "DEBUG".to_string(),
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_layout_fails_validation() {
        let config = ServiceConfig {
            layout: LayoutConfig::empty().bind_button(
                ButtonFlags::B1,
                ActionConfig::joystick(openhandheld_input::AxisLayoutFlags::LeftStick),
            ),
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn missing_file_is_created_with_defaults() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("service.json");

        let config = ServiceConfig::load_from_path(&path).await?;
        assert_eq!(config, ServiceConfig::default());
        assert!(path.exists());

        let reloaded = ServiceConfig::load_from_path(&path).await?;
        assert_eq!(reloaded, config);
        Ok(())
    }

    #[tokio::test]
    async fn saved_changes_survive_reload() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("service.json");
        let config = ServiceConfig {
            target: TargetKind::DualShock4,
            legion_gyro_source: GyroSource::Left,
            vibration_strength: 0.25,
            ..ServiceConfig::default()
        };

        config.save_to_path(&path).await?;
        assert_eq!(ServiceConfig::load_from_path(&path).await?, config);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_file_reports_the_path() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("service.json");
        tokio::fs::write(&path, "{ not json").await?;

        let err = ServiceConfig::load_from_path(&path).await.err().ok_or("expected a parse failure")?;
        assert!(format!("{err:#}").contains("Failed to parse config file"));
        Ok(())
    }
}
