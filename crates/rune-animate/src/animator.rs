//! A single in-flight interpolation of one property on one target.
//!
//! Animators are owned by their target and reused across style changes: when a
//! property that is already animating receives a new value the planner calls
//! [`Animator::redirect`] instead of creating a second animator. The start
//! timestamp is bound lazily on the first tick so animators staged in the same
//! planning pass start in sync.

use crate::types::{Axis, PropertyKey, Style, StyleValue};

/// How an animator computes and commits its value each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorKind {
    /// Pixel offsets and sizes, floored to whole pixels while in flight.
    Pixel,
    /// Unit-interval numbers such as opacity, rounded to two decimals while in flight.
    Numeric,
    /// `centerX`/`centerY`: committed as a margin offset using the live size.
    Centered(Axis),
    /// `display`: holds the old value until the duration elapses, then commits.
    Display,
}

impl AnimatorKind {
    pub fn for_property(key: &PropertyKey) -> Self {
        match key {
            PropertyKey::CenterX => Self::Centered(Axis::Horizontal),
            PropertyKey::CenterY => Self::Centered(Axis::Vertical),
            PropertyKey::Opacity => Self::Numeric,
            PropertyKey::Display => Self::Display,
            _ => Self::Pixel,
        }
    }

    /// Whether this kind interpolates between two numbers.
    pub fn is_interpolated(self) -> bool {
        !matches!(self, Self::Display)
    }
}

/// A value to write to the element for one animator tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    /// `property: {px}px`
    Offset { property: PropertyKey, px: f64 },
    /// `margin-left`/`margin-top: {px}px`
    Centered { axis: Axis, px: f64 },
    /// A plain number routed through the paint helpers (opacity).
    Number { property: PropertyKey, value: f64 },
    /// A keyword routed through the paint helpers (display).
    Keyword { property: PropertyKey, value: StyleValue },
}

/// Result of one animator tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// New value for the target's current-style snapshot, and what to write.
    pub update: Option<(StyleValue, Commit)>,
    /// True once the tick time reached the end of the animation.
    pub finished: bool,
}

/// Runtime state of one property animation.
#[derive(Debug, Clone)]
pub struct Animator {
    pub property: PropertyKey,
    pub kind: AnimatorKind,
    /// Bound on the first tick after (re)arming.
    pub start: Option<f64>,
    pub end: f64,
    pub duration_ms: f64,
    pub start_value: StyleValue,
    pub end_value: StyleValue,
    /// True while queued in the scheduler.
    pub going: bool,
}

impl Animator {
    pub fn new(property: PropertyKey) -> Self {
        let kind = AnimatorKind::for_property(&property);
        Self {
            property,
            kind,
            start: None,
            end: 0.0,
            duration_ms: 0.0,
            start_value: StyleValue::Number(0.0),
            end_value: StyleValue::Number(0.0),
            going: false,
        }
    }

    /// Re-arm the animator with new endpoints and duration.
    ///
    /// Any remaining portion of an in-flight animation is discarded; the next
    /// tick rebinds the start time and interpolates from `from`.
    pub fn redirect(
        &mut self,
        from: StyleValue,
        to: StyleValue,
        duration_ms: f64,
        kind: AnimatorKind,
    ) {
        self.start = None;
        self.end = 0.0;
        self.duration_ms = duration_ms;
        self.start_value = from;
        self.end_value = to;
        self.kind = kind;
    }

    /// Completed fraction at `now`, clamped to `[0, 1]`.
    pub fn progress(&self, now: f64) -> f64 {
        match self.start {
            Some(start) if self.end > start => ((now - start) / (self.end - start)).clamp(0.0, 1.0),
            Some(_) => 1.0,
            None => 0.0,
        }
    }

    /// Advance to `now`. `live` is the target's current-style snapshot, read
    /// for the size a centered offset depends on.
    pub fn step(&mut self, now: f64, live: &Style) -> Step {
        if self.start.is_none() {
            self.start = Some(now);
            self.end = now + self.duration_ms;
        }
        let finished = now >= self.end;
        if finished {
            self.going = false;
        }

        let update = match self.kind {
            AnimatorKind::Display => finished.then(|| {
                (
                    self.end_value.clone(),
                    Commit::Keyword {
                        property: self.property.clone(),
                        value: self.end_value.clone(),
                    },
                )
            }),
            kind => Some(self.interpolate(kind, self.progress(now), finished, live)),
        };

        Step { update, finished }
    }

    /// Value at `percent`. Intermediate values are quantized per kind; the
    /// finishing tick lands on the end value exactly.
    fn interpolate(
        &self,
        kind: AnimatorKind,
        percent: f64,
        finished: bool,
        live: &Style,
    ) -> (StyleValue, Commit) {
        let (Some(from), Some(to)) = (self.start_value.as_f64(), self.end_value.as_f64()) else {
            return (
                self.end_value.clone(),
                Commit::Keyword {
                    property: self.property.clone(),
                    value: self.end_value.clone(),
                },
            );
        };
        let raw = if finished { to } else { from + (to - from) * percent };

        match kind {
            AnimatorKind::Numeric => {
                let value = if finished { raw } else { (raw * 100.0).round() / 100.0 };
                (
                    StyleValue::Number(value),
                    Commit::Number {
                        property: self.property.clone(),
                        value,
                    },
                )
            }
            AnimatorKind::Centered(axis) => {
                let size = live.get_f64(&axis.dimension()).unwrap_or(0.0);
                let px = (raw - size / 2.0).round();
                (StyleValue::Number(raw), Commit::Centered { axis, px })
            }
            AnimatorKind::Pixel | AnimatorKind::Display => {
                let px = if finished { raw } else { raw.floor() };
                (
                    StyleValue::Number(px),
                    Commit::Offset {
                        property: self.property.clone(),
                        px,
                    },
                )
            }
        }
    }
}
