//! Driver configuration, following the teacher's `emulator::config` pattern
//! (serde + toml, a fixed `CONFIG_FILE`, `load_or_default`/`save`) trimmed to
//! the fields this driver actually reads.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// Default configuration file path
const CONFIG_FILE: &str = "nes_apu_core.toml";

/// Driver configuration: sample rate, ring sizing, and mix options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,

    /// Audio ring capacity in samples (spec §5: at least 4 video-frames'
    /// worth, ≥ 2,940 samples recommended).
    pub ring_capacity_samples: usize,

    /// Whether the resampler runs its anti-aliasing filter chain. Disabling
    /// falls back to the simple averaging decimator spec.md §4.11 permits
    /// as a first implementation.
    pub filter_enabled: bool,

    /// Master volume, 0.0 (mute) to 1.0 (full).
    pub volume: f32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            ring_capacity_samples: 2_940 * 4,
            filter_enabled: true,
            volume: 1.0,
        }
    }
}

impl DriverConfig {
    /// Load configuration from file, or fall back to and persist defaults.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|_| {
            let config = Self::default();
            let _ = config.save();
            config
        })
    }

    /// Load configuration from file.
    pub fn load() -> Result<Self, io::Error> {
        let contents = fs::read_to_string(CONFIG_FILE)?;
        toml::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<(), io::Error> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(CONFIG_FILE, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DriverConfig::default();
        assert_eq!(config.sample_rate, 44_100);
        assert_eq!(config.ring_capacity_samples, 11_760);
        assert!(config.filter_enabled);
        assert_eq!(config.volume, 1.0);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = DriverConfig::default();
        let toml_str = toml::to_string(&config).expect("failed to serialize");
        let deserialized: DriverConfig = toml::from_str(&toml_str).expect("failed to deserialize");
        assert_eq!(config, deserialized);
    }
}
