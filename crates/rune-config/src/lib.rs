//! Rune Motion configuration system
//!
//! This crate provides centralized configuration for the animation engine,
//! loading settings from `rune.toml` with environment variable overrides.

use rune_animate::{AnimateError, AnimateOptions, PaintOptions, StyleProbe, native_transitions};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default configuration file, looked up in the current directory.
pub const CONFIG_FILE: &str = "rune.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid animation settings: {0}")]
    Animate(#[from] AnimateError),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RuneConfig {
    /// Frame scheduler settings
    pub scheduler: SchedulerConfig,
    /// Transition behaviour settings
    pub transitions: TransitionsConfig,
    /// Demo binary settings
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Target interval between ticks in milliseconds (default: 10)
    pub interval_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TransitionsConfig {
    /// Force native transitions on or off; probed when unset
    pub native: Option<bool>,
    /// Emit `filter: alpha(opacity=N)` with N rounded to this step
    pub opacity_filter_step: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Duration of the demo transition
    pub duration_ms: f64,
    /// How far the demo target moves, in pixels
    pub distance: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_ms: rune_animate::scheduler::DEFAULT_INTERVAL_MS,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            duration_ms: 200.0,
            distance: 100.0,
        }
    }
}

fn env_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl RuneConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `rune.toml` from the current directory, or the defaults if it is
    /// missing or broken.
    pub fn load_or_default() -> Self {
        match Self::load_from_file(CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Io(_)) => Self::default(),
            Err(err) => {
                tracing::warn!(%err, "ignoring {CONFIG_FILE}");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("RUNE_ANIMATE_INTERVAL") {
            if let Ok(interval) = val.parse::<f64>() {
                self.scheduler.interval_ms = interval;
            }
        }
        if let Ok(val) = std::env::var("RUNE_ANIMATE_NATIVE") {
            self.transitions.native = Some(env_flag(&val));
        }
        if let Ok(val) = std::env::var("RUNE_ANIMATE_OPACITY_FILTER_STEP") {
            if let Ok(step) = val.parse::<u32>() {
                self.transitions.opacity_filter_step = Some(step);
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from rune.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    /// Engine options for this configuration. Native transition support is
    /// taken from `[transitions] native` when set, otherwise probed once per
    /// process through `probe`.
    pub fn animate_options(&self, probe: &mut dyn StyleProbe) -> Result<AnimateOptions, ConfigError> {
        let native_transitions = match self.transitions.native {
            Some(forced) => forced,
            None => native_transitions(probe),
        };
        let options = AnimateOptions {
            interval_ms: self.scheduler.interval_ms,
            native_transitions,
            paint: PaintOptions {
                opacity_filter_step: self.transitions.opacity_filter_step,
            },
        };
        options.validate()?;
        Ok(options)
    }
}
