//! Geometry boundary: resolving a target's on-screen frame under a layout.
//!
//! The planner needs "where would this target be under layout L" without
//! committing L, so providers take the hypothetical layout as an argument.

use serde::{Deserialize, Serialize};

use crate::types::{PropertyKey, Style, StyleValue};

/// An axis-aligned rectangle. `x`/`y` are relative to the containing frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A target's frame together with the frame of its container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frames {
    pub frame: Frame,
    pub container: Frame,
}

impl Frames {
    /// Express a geometry key in the terms a layout would use for it.
    ///
    /// Returns `None` for keys that are not geometry keys.
    pub fn resolve(&self, key: &PropertyKey) -> Option<f64> {
        let f = &self.frame;
        let p = &self.container;
        let value = match key {
            PropertyKey::Left => f.x,
            PropertyKey::Top => f.y,
            PropertyKey::Right => p.width - f.x - f.width,
            PropertyKey::Bottom => p.height - f.y - f.height,
            PropertyKey::Width => f.width,
            PropertyKey::Height => f.height,
            PropertyKey::CenterX => f.x + f.width / 2.0 - p.width / 2.0,
            PropertyKey::CenterY => f.y + f.height / 2.0 - p.height / 2.0,
            _ => return None,
        };
        Some(value)
    }
}

/// Provides a target's resolved geometry.
pub trait GeometryProvider {
    /// Frames the target would have if `layout` were its active layout.
    ///
    /// `None` when the target cannot be measured (e.g. not yet laid out).
    fn frames_for(&self, layout: &Style) -> Option<Frames>;
}

/// Resolves absolute-positioning layouts against a fixed container.
///
/// Each axis is resolved from whichever keys are present, in the usual
/// precedence: `left`+`width`, `left`+`right`, `right`+`width`,
/// `centerX`+`width`, and likewise vertically. Missing offsets default to 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AbsoluteLayout {
    pub container: Frame,
}

impl AbsoluteLayout {
    pub fn new(container: Frame) -> Self {
        Self { container }
    }

    fn resolve_axis(
        layout: &Style,
        [start, end, size, center]: [PropertyKey; 4],
        container_size: f64,
    ) -> (f64, f64) {
        let number = |key: &PropertyKey| layout.get(key).and_then(StyleValue::as_f64);
        let start = number(&start);
        let end = number(&end);
        let size = number(&size);
        let center = number(&center);

        match (start, end, size, center) {
            (Some(s), _, Some(w), _) => (s, w),
            (Some(s), Some(e), None, _) => (s, container_size - s - e),
            (None, Some(e), Some(w), _) => (container_size - e - w, w),
            (None, _, Some(w), Some(c)) => (container_size / 2.0 + c - w / 2.0, w),
            (None, _, Some(w), None) => (0.0, w),
            (Some(s), None, None, _) => (s, 0.0),
            (None, Some(e), None, _) => (container_size - e, 0.0),
            (None, None, None, _) => (0.0, 0.0),
        }
    }
}

impl GeometryProvider for AbsoluteLayout {
    fn frames_for(&self, layout: &Style) -> Option<Frames> {
        let (x, width) = Self::resolve_axis(
            layout,
            [
                PropertyKey::Left,
                PropertyKey::Right,
                PropertyKey::Width,
                PropertyKey::CenterX,
            ],
            self.container.width,
        );
        let (y, height) = Self::resolve_axis(
            layout,
            [
                PropertyKey::Top,
                PropertyKey::Bottom,
                PropertyKey::Height,
                PropertyKey::CenterY,
            ],
            self.container.height,
        );
        Some(Frames {
            frame: Frame::new(x, y, width, height),
            container: self.container,
        })
    }
}
