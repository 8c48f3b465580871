//! Configuration for the NetraRig daemon
//!
//! Loads configuration from a TOML file. The dispatch pair
//! (`sequential`, `strategy`) can be overridden at startup with the
//! `--mode <N>` command-line flag, matching the table in
//! [`RigConfig::apply_mode`].

use crate::error::{Error, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub rig: RigConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    /// Simulated camera definitions for the daemon rig
    #[serde(default = "default_cameras", rename = "camera")]
    pub cameras: Vec<CameraConfig>,
    #[serde(default)]
    pub vehicle: VehicleConfig,
}

/// Render coordination configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RigConfig {
    /// Publish rate in Hz (0-30). 0 disables publishing.
    pub tick_rate_hz: u32,
    /// Sequential (true) or concurrent (false) dispatch family
    pub sequential: bool,
    /// Strategy id within the family (sequential: 0-4, concurrent: 0-7)
    pub strategy: u8,
    /// Route optimized renders through the command-buffer path
    pub use_command_buffer: bool,
}

/// Tick thread configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Fixed simulation step rate in Hz
    pub step_rate_hz: f32,
}

/// One simulated camera sensor
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CameraConfig {
    /// Camera name used in logs and frame records
    pub name: String,
    /// Whether the camera participates in render cycles
    #[serde(default = "default_true")]
    pub active: bool,
    /// Simulated render duration in milliseconds
    #[serde(default = "default_render_ms")]
    pub render_ms: f32,
}

/// Ego vehicle simulation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Whether the daemon simulates an ego vehicle body
    pub enabled: bool,
    /// Spawn position in meters (x, y, z)
    pub spawn_position: [f32; 3],
    /// Spawn heading in degrees around the vertical axis
    pub spawn_yaw_deg: f32,
}

fn default_true() -> bool {
    true
}

fn default_render_ms() -> f32 {
    2.0
}

fn default_cameras() -> Vec<CameraConfig> {
    ["front", "left", "right", "rear"]
        .iter()
        .map(|name| CameraConfig {
            name: (*name).to_string(),
            active: true,
            render_ms: 2.0,
        })
        .collect()
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 10,
            sequential: true,
            strategy: 0,
            use_command_buffer: false,
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { step_rate_hz: 60.0 }
    }
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            spawn_position: [0.0, 0.0, 0.0],
            spawn_yaw_deg: 0.0,
        }
    }
}

impl RigConfig {
    /// Apply a `--mode <N>` startup override to the dispatch pair.
    ///
    /// Unrecognized values leave the configuration unchanged.
    pub fn apply_mode(&mut self, mode: i64) {
        let (sequential, strategy) = match mode {
            0 => (true, 0),
            1 => (true, 1),
            2 => (true, 2),
            3 => (true, 3),
            4 => (true, 4),
            5 => (false, 0),
            6 => (false, 1),
            7 => (true, 0),
            _ => {
                warn!("Unrecognized render mode {}, keeping configured dispatch", mode);
                return;
            }
        };
        self.sequential = sequential;
        self.strategy = strategy;
    }

    /// Validate field ranges
    pub fn validate(&self) -> Result<()> {
        if self.tick_rate_hz > 30 {
            return Err(Error::InvalidConfig(format!(
                "tick_rate_hz {} out of range 0-30",
                self.tick_rate_hz
            )));
        }
        if self.strategy > 7 {
            return Err(Error::InvalidConfig(format!(
                "strategy {} out of range 0-7",
                self.strategy
            )));
        }
        if self.sequential && self.strategy > 4 {
            return Err(Error::InvalidConfig(format!(
                "sequential dispatch defines strategies 0-4, got {}",
                self.strategy
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    ///
    /// # Arguments
    /// - `path`: Path to TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&contents).map_err(|e| Error::ConfigParse(e.to_string()))?;
        Ok(config)
    }

    /// Default configuration for a four-camera simulated rig
    ///
    /// Suitable for testing and development. Deployments should use a
    /// proper TOML configuration file.
    pub fn sim_defaults() -> Self {
        Self {
            rig: RigConfig::default(),
            driver: DriverConfig::default(),
            cameras: default_cameras(),
            vehicle: VehicleConfig::default(),
        }
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| Error::ConfigParse(e.to_string()))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Validate all sections
    pub fn validate(&self) -> Result<()> {
        self.rig.validate()?;
        if !(self.driver.step_rate_hz.is_finite() && self.driver.step_rate_hz > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "step_rate_hz must be positive, got {}",
                self.driver.step_rate_hz
            )));
        }
        Ok(())
    }
}
