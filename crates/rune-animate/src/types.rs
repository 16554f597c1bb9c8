//! Core value types shared by the planner, animators and applier.
//!
//! - `PropertyKey`: the closed set of animatable keys plus opaque pass-through keys
//! - `StyleValue`: a numeric or keyword property value
//! - `Style`: a property set (desired style or resolved snapshot)
//! - `TargetId`: identifies an animated target inside an `AnimationManager`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for an animated target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u64);

impl TargetId {
    /// Generate a new unique target ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TargetId {
    fn default() -> Self {
        Self::new()
    }
}

/// Horizontal or vertical axis, used by the centered animator kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The dimension whose half is subtracted when committing a centered offset.
    pub fn dimension(self) -> PropertyKey {
        match self {
            Axis::Horizontal => PropertyKey::Width,
            Axis::Vertical => PropertyKey::Height,
        }
    }

    /// The style declaration a centered offset is written to.
    pub fn margin_property(self) -> &'static str {
        match self {
            Axis::Horizontal => "margin-left",
            Axis::Vertical => "margin-top",
        }
    }
}

/// A style property key.
///
/// Geometry keys and the paint keys `opacity`/`display` are known; anything else
/// is carried through untouched as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyKey {
    Top,
    Left,
    Bottom,
    Right,
    Width,
    Height,
    CenterX,
    CenterY,
    Opacity,
    Display,
    Other(String),
}

impl PropertyKey {
    /// The eight keys that are resolved from live geometry and handed to layout.
    pub const GEOMETRY: [PropertyKey; 8] = [
        PropertyKey::Left,
        PropertyKey::Top,
        PropertyKey::Right,
        PropertyKey::Bottom,
        PropertyKey::Width,
        PropertyKey::Height,
        PropertyKey::CenterX,
        PropertyKey::CenterY,
    ];

    /// Order in which staged animators are handed to the scheduler.
    ///
    /// Sizes precede centers because the centered kind reads the live size.
    pub const ANIMATION_ORDER: [PropertyKey; 10] = [
        PropertyKey::Top,
        PropertyKey::Left,
        PropertyKey::Bottom,
        PropertyKey::Right,
        PropertyKey::Width,
        PropertyKey::Height,
        PropertyKey::CenterX,
        PropertyKey::CenterY,
        PropertyKey::Opacity,
        PropertyKey::Display,
    ];

    pub fn parse(name: &str) -> Self {
        match name {
            "top" => Self::Top,
            "left" => Self::Left,
            "bottom" => Self::Bottom,
            "right" => Self::Right,
            "width" => Self::Width,
            "height" => Self::Height,
            "centerX" => Self::CenterX,
            "centerY" => Self::CenterY,
            "opacity" => Self::Opacity,
            "display" => Self::Display,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Top => "top",
            Self::Left => "left",
            Self::Bottom => "bottom",
            Self::Right => "right",
            Self::Width => "width",
            Self::Height => "height",
            Self::CenterX => "centerX",
            Self::CenterY => "centerY",
            Self::Opacity => "opacity",
            Self::Display => "display",
            Self::Other(name) => name,
        }
    }

    /// Private keys start with `_` and never take part in diffing or animation.
    pub fn is_private(&self) -> bool {
        matches!(self, Self::Other(name) if name.starts_with('_'))
    }

    pub fn is_geometry(&self) -> bool {
        Self::GEOMETRY.contains(self)
    }

    /// Position in `ANIMATION_ORDER`, if the key has one.
    pub fn animation_rank(&self) -> Option<usize> {
        Self::ANIMATION_ORDER.iter().position(|k| k == self)
    }
}

impl From<&str> for PropertyKey {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<String> for PropertyKey {
    fn from(name: String) -> Self {
        match Self::parse(&name) {
            Self::Other(_) => Self::Other(name),
            known => known,
        }
    }
}

impl From<PropertyKey> for String {
    fn from(key: PropertyKey) -> Self {
        match key {
            PropertyKey::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property value: a number (pixels, opacity) or a keyword (`display` values,
/// opaque framework values).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Keyword(String),
}

impl StyleValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Keyword(_) => None,
        }
    }

    /// Whether this is a `display` value that hides the element.
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Keyword(k) if k == "none" || k == "hidden")
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Keyword(value.to_string())
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Keyword(keyword) => f.write_str(keyword),
        }
    }
}

/// A property set: either a target's desired style or a resolved snapshot of
/// where it currently is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style {
    values: BTreeMap<PropertyKey, StyleValue>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<PropertyKey>, value: impl Into<StyleValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<PropertyKey>, value: impl Into<StyleValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &PropertyKey) -> Option<&StyleValue> {
        self.values.get(key)
    }

    pub fn get_f64(&self, key: &PropertyKey) -> Option<f64> {
        self.get(key).and_then(StyleValue::as_f64)
    }

    pub fn remove(&mut self, key: &PropertyKey) -> Option<StyleValue> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyKey, &StyleValue)> {
        self.values.iter()
    }

    /// Copy of this style without private (`_`-prefixed) keys.
    pub fn without_private(&self) -> Style {
        Style {
            values: self
                .values
                .iter()
                .filter(|(key, _)| !key.is_private())
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }

    /// True when every public key of `self` has the same value in `other`.
    ///
    /// Keys present only in `other` are not considered.
    pub fn matches_within(&self, other: &Style) -> bool {
        self.values
            .iter()
            .filter(|(key, _)| !key.is_private())
            .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl FromIterator<(PropertyKey, StyleValue)> for Style {
    fn from_iter<I: IntoIterator<Item = (PropertyKey, StyleValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
