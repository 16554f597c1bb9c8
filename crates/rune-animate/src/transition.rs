//! Per-target transition configuration.
//!
//! A target is configured with a mapping `property -> { duration }` where the
//! duration is in milliseconds. A bare number is shorthand for `{ duration: n }`,
//! and the configuration may be given as a list of partial mappings that are
//! merged left to right (later entries win).
//!
//! ```ignore
//! let config = TransitionConfig::from_json(r#"[
//!     {"left": 250, "top": {"duration": 250}},
//!     {"top": 400}
//! ]"#)?;
//! assert_eq!(config.duration_for(&PropertyKey::Top), Some(400.0));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{AnimateError, Result};
use crate::types::PropertyKey;

/// Transition settings for a single property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "SpecRepr")]
pub struct TransitionSpec {
    /// Duration of the transition in milliseconds.
    #[serde(rename = "duration")]
    pub duration_ms: f64,
}

impl TransitionSpec {
    pub fn new(duration_ms: f64) -> Self {
        Self { duration_ms }
    }

    /// Native transition declaration for this spec, e.g. `opacity 0.25s linear`.
    pub fn css_declaration(&self, css_property: &str) -> String {
        format!("{} {}s linear", css_property, self.duration_ms / 1000.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpecRepr {
    Shorthand(f64),
    Full { duration: f64 },
}

impl From<SpecRepr> for TransitionSpec {
    fn from(repr: SpecRepr) -> Self {
        match repr {
            SpecRepr::Shorthand(duration_ms) | SpecRepr::Full { duration: duration_ms } => {
                Self { duration_ms }
            }
        }
    }
}

/// Either a single mapping or an ordered list of partial mappings.
#[derive(Deserialize)]
#[serde(untagged)]
enum ConfigRepr {
    Single(HashMap<PropertyKey, TransitionSpec>),
    Layered(Vec<HashMap<PropertyKey, TransitionSpec>>),
}

/// The merged transition configuration of one target.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransitionConfig {
    specs: HashMap<PropertyKey, TransitionSpec>,
}

impl TransitionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the transition for a property.
    pub fn with(mut self, key: impl Into<PropertyKey>, duration_ms: f64) -> Self {
        self.specs.insert(key.into(), TransitionSpec::new(duration_ms));
        self
    }

    /// Merge partial configurations left to right; later entries win on collision.
    pub fn merged(parts: impl IntoIterator<Item = TransitionConfig>) -> Self {
        let mut merged = Self::new();
        for part in parts {
            merged.specs.extend(part.specs);
        }
        merged
    }

    /// Parse a configuration from JSON, accepting a map or a list of maps.
    pub fn from_json(json: &str) -> Result<Self> {
        let repr: ConfigRepr = serde_json::from_str(json)?;
        let parts = match repr {
            ConfigRepr::Single(specs) => vec![specs],
            ConfigRepr::Layered(layers) => layers,
        };
        let config = Self::merged(parts.into_iter().map(|specs| Self { specs }));
        config.validate()?;
        Ok(config)
    }

    /// Reject durations that cannot describe a point in time.
    ///
    /// Zero and negative durations are valid and complete on the first tick.
    pub fn validate(&self) -> Result<()> {
        for (key, spec) in &self.specs {
            if !spec.duration_ms.is_finite() {
                return Err(AnimateError::InvalidTransition {
                    property: key.to_string(),
                    reason: format!("duration {} is not finite", spec.duration_ms),
                });
            }
        }
        Ok(())
    }

    pub fn spec_for(&self, key: &PropertyKey) -> Option<&TransitionSpec> {
        self.specs.get(key)
    }

    pub fn duration_for(&self, key: &PropertyKey) -> Option<f64> {
        self.spec_for(key).map(|spec| spec.duration_ms)
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }
}

/// Native transition property name for keys the rendering engine can animate.
pub fn css_transition_property(key: &PropertyKey) -> Option<&'static str> {
    match key {
        PropertyKey::Left => Some("left"),
        PropertyKey::Top => Some("top"),
        PropertyKey::Right => Some("right"),
        PropertyKey::Bottom => Some("bottom"),
        PropertyKey::Width => Some("width"),
        PropertyKey::Height => Some("height"),
        PropertyKey::Opacity => Some("opacity"),
        _ => None,
    }
}
