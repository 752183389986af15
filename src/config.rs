//! Startup configuration.
//!
//! Loaded once from an optional TOML file, overlaid with command-line
//! flags, validated, and then passed by reference to the renderer, the
//! feedback actor and the server. Nothing reads configuration from global
//! state.

use crate::error::ConfigError;
use crate::store::is_displayable;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Side length of one MAX7219 module in pixels.
pub const MODULE_SIZE: usize = 8;

/// Complete configuration for a DotNote instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DotNoteConfig {
    /// LED matrix geometry and static display settings.
    pub display: DisplayConfig,
    /// Scroll cadence and message text.
    pub scroll: ScrollConfig,
    /// Audible feedback on message updates.
    pub buzzer: BuzzerConfig,
    /// HTTP listener.
    pub server: ServerConfig,
    /// Message history log.
    pub history: HistoryConfig,
}

/// LED matrix geometry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Number of 8x8 modules chained together.
    pub cascaded: usize,
    /// Rotation of each module in degrees: -90, 0, 90 or 180.
    pub block_orientation: i16,
    /// Rotation of the whole display in quarter turns (0..=3).
    pub rotate: u8,
    /// LED intensity (0..=15).
    pub brightness: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cascaded: 4,
            block_orientation: -90,
            rotate: 0,
            brightness: 5,
        }
    }
}

impl DisplayConfig {
    /// Logical frame size `(width, height)` the renderer draws into.
    ///
    /// Odd rotations turn the horizontal chain into a vertical one.
    pub const fn frame_size(&self) -> (usize, usize) {
        let long = self.cascaded * MODULE_SIZE;
        if self.rotate % 2 == 0 {
            (long, MODULE_SIZE)
        } else {
            (MODULE_SIZE, long)
        }
    }
}

/// Scroll behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    /// Milliseconds between one-pixel scroll steps.
    pub speed_ms: u64,
    /// Message shown until the first update arrives.
    pub default_message: String,
    /// Blank text rendered after the message before it repeats.
    pub spacing: String,
    /// Consecutive failed frames tolerated before giving up.
    pub max_sink_failures: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            speed_ms: 50,
            default_message: "Welcome to DotNote!".to_string(),
            spacing: "   ".to_string(),
            max_sink_failures: 40,
        }
    }
}

impl ScrollConfig {
    /// Time between ticks.
    pub const fn period(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }
}

/// Buzzer settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuzzerConfig {
    /// Beep when a message is accepted.
    pub enabled: bool,
    /// BCM GPIO pin the buzzer is wired to.
    pub pin: u32,
    /// On time and off time of each beep.
    pub beep_duration_ms: u64,
    /// Beeps per accepted message.
    pub beep_count: u32,
}

impl Default for BuzzerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pin: 23,
            beep_duration_ms: 200,
            beep_count: 2,
        }
    }
}

impl BuzzerConfig {
    /// Duration of one beep (and of the gap after it).
    pub const fn beep_duration(&self) -> Duration {
        Duration::from_millis(self.beep_duration_ms)
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Message history log settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Append accepted messages to `file`.
    pub enabled: bool,
    /// Path of the history log.
    pub file: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: "messages.log".to_string(),
        }
    }
}

impl DotNoteConfig {
    /// Parse a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Check every value is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let display = &self.display;
        if display.cascaded == 0 {
            return Err(ConfigError::Invalid("display.cascaded must be at least 1".into()));
        }
        if !matches!(display.block_orientation, -90 | 0 | 90 | 180) {
            return Err(ConfigError::Invalid(format!(
                "display.block_orientation must be -90, 0, 90 or 180, got {}",
                display.block_orientation
            )));
        }
        if display.rotate > 3 {
            return Err(ConfigError::Invalid(format!(
                "display.rotate must be 0..=3, got {}",
                display.rotate
            )));
        }
        if display.brightness > 15 {
            return Err(ConfigError::Invalid(format!(
                "display.brightness must be 0..=15, got {}",
                display.brightness
            )));
        }

        if self.scroll.speed_ms == 0 {
            return Err(ConfigError::Invalid("scroll.speed_ms must be positive".into()));
        }
        if !is_displayable(&self.scroll.default_message) {
            return Err(ConfigError::Invalid(
                "scroll.default_message has no displayable characters".into(),
            ));
        }
        if self.scroll.max_sink_failures == 0 {
            return Err(ConfigError::Invalid(
                "scroll.max_sink_failures must be at least 1".into(),
            ));
        }

        if self.history.enabled && self.history.file.trim().is_empty() {
            return Err(ConfigError::Invalid("history.file is empty".into()));
        }
        Ok(())
    }
}
