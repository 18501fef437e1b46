// src/config.rs

//! Defines the configuration structures for the host backend.
//!
//! Everything can be deserialized from a JSON file whose path is taken from
//! the `DOOM_HOST_CONFIG` environment variable. Every field has a default,
//! so a file only needs to mention what it changes:
//!
//! ```json
//! { "capabilities": "MOUSE | FOCUS_HOTKEY", "input": { "mouse_sensitivity": 2 } }
//! ```

use anyhow::{ensure, Context, Result};
use bitflags::bitflags;
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::display::{Pixel, CLEAR_COLOR};
use crate::input::{OverflowPolicy, DEFAULT_OVERFLOW_POLICY};
use crate::keys::UnmappedKeys;

/// Environment variable naming the JSON configuration file.
pub const CONFIG_ENV_VAR: &str = "DOOM_HOST_CONFIG";

/// Process-wide configuration, loaded on first use.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_or_default);

bitflags! {
    /// Optional host features the backend makes use of.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Capabilities: u8 {
        /// Queue relative pointer motion and map buttons to fire/use.
        const MOUSE = 1 << 0;
        /// The surface keeps the size reported when the window became
        /// ready; `Resized` events are ignored.
        const FIXED_SURFACE = 1 << 1;
        /// Meta+Tab lowers the process priority instead of reaching the engine.
        const FOCUS_HOTKEY = 1 << 2;
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities::FIXED_SURFACE
    }
}

// --- Top-Level Configuration Structure ---

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub input: InputConfig,
    pub capabilities: Capabilities,
    pub scheduling: SchedulingConfig,
}

impl Config {
    /// Reads the file named by `DOOM_HOST_CONFIG`, falling back to defaults
    /// when the variable is unset or the file cannot be used.
    pub fn load_or_default() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            info!("{} not set, using default configuration", CONFIG_ENV_VAR);
            return Config::default();
        };
        match Config::from_path(Path::new(&path)) {
            Ok(config) => {
                info!("Configuration loaded from {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                warn!("Ignoring configuration file: {:#}. Using defaults.", e);
                Config::default()
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Config::from_json(&text)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config =
            serde_json::from_str(text).context("Failed to parse configuration JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.display.width > 0 && self.display.height > 0,
            "display resolution must be non-zero, got {}x{}",
            self.display.width,
            self.display.height
        );
        ensure!(self.input.key_queue_capacity > 0, "key_queue_capacity must be non-zero");
        ensure!(self.input.mouse_queue_capacity > 0, "mouse_queue_capacity must be non-zero");
        ensure!(self.input.mouse_sensitivity != 0, "mouse_sensitivity must be non-zero");
        Ok(())
    }
}

// --- Display Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Engine render width in pixels.
    pub width: usize,
    /// Engine render height in pixels.
    pub height: usize,
    /// Title used when the window is requested.
    pub title: String,
    /// Colour the surface is cleared to once the window is ready.
    pub clear_color: Pixel,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            width: 640,
            height: 400,
            title: "DOOM".to_string(),
            clear_color: CLEAR_COLOR,
        }
    }
}

// --- Input Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    pub key_queue_capacity: usize,
    pub mouse_queue_capacity: usize,
    /// Multiplier applied to pointer motion when the engine reads it.
    pub mouse_sensitivity: i32,
    pub overflow_policy: OverflowPolicy,
    pub unmapped_keys: UnmappedKeys,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            key_queue_capacity: 16,
            mouse_queue_capacity: 64,
            mouse_sensitivity: 4,
            overflow_policy: DEFAULT_OVERFLOW_POLICY,
            unmapped_keys: UnmappedKeys::Drop,
        }
    }
}

// --- Scheduling Configuration ---

/// How the headless driver maps priority hints onto process niceness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Call `setpriority(2)` on priority changes. Off by default: most
    /// users cannot lower their niceness again once raised.
    pub renice: bool,
    pub interactive_nice: i32,
    pub background_nice: i32,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        SchedulingConfig {
            renice: false,
            interactive_nice: 0,
            background_nice: 10,
        }
    }
}
