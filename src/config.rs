// Configuration management
//
// Handles host-side configuration for the APU: the two injected clock
// rates and the audio output settings, persisted as TOML.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::apu::ClockRates;

/// Default configuration file path
pub const CONFIG_FILE: &str = "apu_config.toml";

/// Host configuration
///
/// Stores the resources a host injects into the APU. The device itself
/// hardcodes neither clock rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApuConfig {
    /// Clock rates
    pub clocks: ClockConfig,

    /// Audio output settings
    pub audio: AudioSettings,
}

/// Clock rate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Sample clock rate in Hz (one output sample per tick)
    pub sample_rate: u32,

    /// Frame sequencer clock rate in Hz (conventionally ~240)
    pub sequencer_rate: u32,
}

/// Audio output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Enable audio output
    pub enabled: bool,

    /// Master volume (0.0-1.0)
    pub volume: f32,

    /// Buffer size in milliseconds (affects latency)
    pub buffer_duration_ms: u32,
}

impl Default for ApuConfig {
    fn default() -> Self {
        Self {
            clocks: ClockConfig {
                sample_rate: 44_100,
                sequencer_rate: 240,
            },
            audio: AudioSettings {
                enabled: true,
                volume: 1.0,
                buffer_duration_ms: 50,
            },
        }
    }
}

impl ApuConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration, falling back to defaults if the file is
    /// missing or malformed
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path.as_ref(), contents).map_err(|e| format!("Failed to write config file: {}", e))
    }

    /// The clock rates to construct the APU with
    pub fn clock_rates(&self) -> ClockRates {
        ClockRates {
            sample_rate: self.clocks.sample_rate,
            sequencer_rate: self.clocks.sequencer_rate,
        }
    }
}
