//! Canvas configuration

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Canvas settings, loadable from TOML
///
/// ```toml
/// antialias = true
/// device_pixel_ratio = 2.0
/// max_states = 32
/// debug_dump_paths = false
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CanvasConfig {
    /// The backend supports edge antialiasing via fringes
    #[serde(default = "default_true")]
    pub antialias: bool,
    /// Ratio used until the first `begin_frame`
    #[serde(default = "default_pixel_ratio")]
    pub device_pixel_ratio: f32,
    /// Depth limit of the save/restore stack
    #[serde(default = "default_max_states")]
    pub max_states: usize,
    /// Log the path cache after every fill and stroke
    #[serde(default)]
    pub debug_dump_paths: bool,
}

fn default_true() -> bool {
    true
}

fn default_pixel_ratio() -> f32 {
    1.0
}

fn default_max_states() -> usize {
    32
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            antialias: default_true(),
            device_pixel_ratio: default_pixel_ratio(),
            max_states: default_max_states(),
            debug_dump_paths: false,
        }
    }
}

impl CanvasConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML document; missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn with_antialias(mut self, antialias: bool) -> Self {
        self.antialias = antialias;
        self
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    pub fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = max_states.max(1);
        self
    }

    pub fn with_debug_dump_paths(mut self, enabled: bool) -> Self {
        self.debug_dump_paths = enabled;
        self
    }
}
