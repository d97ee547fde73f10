//! Footprint configuration file handling

use anyhow::{Context, Result};
use footprint_core::GeoPoint;
use footprint_session::ViewMode;
use footprint_timeline::{validate_speed, PlaybackConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "footprint.toml";

/// Top-level configuration (footprint.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FootprintConfig {
    #[serde(default)]
    pub playback: PlaybackSection,
    #[serde(default)]
    pub view: ViewSection,
    #[serde(default)]
    pub origin: OriginSection,
}

/// Journey playback settings
#[derive(Debug, Deserialize, Serialize)]
pub struct PlaybackSection {
    /// Speed multiplier used when a timeline is loaded
    #[serde(default = "default_speed")]
    pub initial_speed: f64,
    /// Speeds offered to the user
    #[serde(default = "default_speeds")]
    pub speeds: Vec<f64>,
    /// Host refresh interval driving `tick`
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    #[serde(default)]
    pub loop_playback: bool,
}

fn default_speed() -> f64 {
    1.0
}

fn default_speeds() -> Vec<f64> {
    vec![0.5, 1.0, 2.0, 4.0]
}

fn default_tick_interval() -> u64 {
    16
}

impl Default for PlaybackSection {
    fn default() -> Self {
        Self {
            initial_speed: default_speed(),
            speeds: default_speeds(),
            tick_interval_ms: default_tick_interval(),
            loop_playback: false,
        }
    }
}

impl PlaybackSection {
    /// Require `speed` to be one of the offered speeds.
    pub fn check_speed(&self, speed: f64) -> Result<f64> {
        if self.speeds.contains(&speed) {
            Ok(speed)
        } else {
            anyhow::bail!(
                "Speed {speed} is not offered; choose one of {:?}",
                self.speeds
            )
        }
    }
}

/// Dashboard view settings
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ViewSection {
    #[serde(default)]
    pub default_mode: ViewMode,
}

/// Viewer position used when geolocation is unavailable
#[derive(Debug, Deserialize, Serialize)]
pub struct OriginSection {
    #[serde(default = "default_origin_lat")]
    pub lat: f64,
    #[serde(default = "default_origin_lon")]
    pub lon: f64,
}

fn default_origin_lat() -> f64 {
    11.0168
}

fn default_origin_lon() -> f64 {
    76.9558
}

impl Default for OriginSection {
    fn default() -> Self {
        Self {
            lat: default_origin_lat(),
            lon: default_origin_lon(),
        }
    }
}

impl FootprintConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `footprint.toml` in the
    /// working directory is used if present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) if path.is_dir() => path.join(CONFIG_FILE),
            Some(path) => path.to_path_buf(),
            None => {
                let local = Path::new(CONFIG_FILE);
                if !local.exists() {
                    tracing::debug!("no {CONFIG_FILE} found, using defaults");
                    return Ok(Self::default());
                }
                local.to_path_buf()
            }
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No config found at {}. Run `footprint init` to create one.",
                config_path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        tracing::debug!(path = %config_path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: FootprintConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_speed(self.playback.initial_speed).context("playback.initial_speed")?;
        for &speed in &self.playback.speeds {
            validate_speed(speed).context("playback.speeds")?;
        }
        if self.playback.tick_interval_ms == 0 {
            anyhow::bail!("playback.tick_interval_ms must be greater than zero");
        }
        self.origin_point()?;
        Ok(())
    }

    pub fn origin_point(&self) -> Result<GeoPoint> {
        GeoPoint::new(self.origin.lat, self.origin.lon).context("origin")
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig::default()
            .with_speed(self.playback.initial_speed)
            .with_loop(self.playback.loop_playback)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
