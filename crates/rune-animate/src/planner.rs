//! Transition planning: deciding how each changed property reaches its new value.
//!
//! Given a target's current snapshot and its new desired style the planner
//! builds a normalized starting snapshot and sorts every key into one of three
//! treatments:
//!
//! - **Skip**: no transition configured, nothing visibly changes, or the key is
//!   `display` moving to a visible value. The new value is applied immediately.
//! - **Declarative**: the rendering engine animates the key natively; the new
//!   value is applied immediately together with a transition declaration.
//! - **Procedural**: an animator interpolates the key tick by tick.

use tracing::{debug, warn};

use crate::animator::AnimatorKind;
use crate::geometry::GeometryProvider;
use crate::transition::{TransitionConfig, css_transition_property};
use crate::types::{PropertyKey, Style, StyleValue};

/// How one key reaches its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum Treatment {
    Skip,
    /// Carries the native transition entry, e.g. `left 0.2s linear`.
    Declarative(String),
    Procedural { kind: AnimatorKind, duration_ms: f64 },
}

/// A property the planner wants animated procedurally.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedAnimation {
    pub property: PropertyKey,
    pub from: StyleValue,
    pub to: StyleValue,
    pub duration_ms: f64,
    pub kind: AnimatorKind,
}

/// Outcome of one planning pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    /// Snapshot to apply right away and keep as the current style.
    pub start: Style,
    /// Batched native transition declaration (comma separated).
    pub transition: String,
    /// Procedural animations, in the order they must be scheduled.
    pub animations: Vec<PlannedAnimation>,
    /// Keys settled by this pass without an animator.
    pub settled: Vec<PropertyKey>,
}

/// Plans transitions for one target.
#[derive(Debug, Clone, Copy)]
pub struct TransitionPlanner<'a> {
    transitions: &'a TransitionConfig,
    native: bool,
}

impl<'a> TransitionPlanner<'a> {
    pub fn new(transitions: &'a TransitionConfig, native: bool) -> Self {
        Self {
            transitions,
            native,
        }
    }

    /// Re-express where the target is now in the terms `desired` uses.
    ///
    /// Geometry keys are read back from the frames the target has under
    /// `current`; other keys keep their stored value, or default to the new
    /// value when nothing is stored.
    pub fn normalized_start(
        current: &Style,
        desired: &Style,
        geometry: Option<&dyn GeometryProvider>,
    ) -> Style {
        let frames = geometry.and_then(|provider| provider.frames_for(current));

        desired
            .iter()
            .map(|(key, new_value)| {
                let resolved = frames
                    .as_ref()
                    .and_then(|frames| frames.resolve(key))
                    .map(StyleValue::Number);
                let value = resolved
                    .or_else(|| current.get(key).cloned())
                    .unwrap_or_else(|| new_value.clone());
                (key.clone(), value)
            })
            .collect()
    }

    /// Decide the treatment of one key moving from `start` to `target`.
    pub fn classify(&self, key: &PropertyKey, start: &StyleValue, target: &StyleValue) -> Treatment {
        let Some(spec) = self.transitions.spec_for(key) else {
            return Treatment::Skip;
        };
        if start == target {
            return Treatment::Skip;
        }
        // Showing is instant; only hiding may be deferred.
        if *key == PropertyKey::Display && !target.is_hidden() {
            return Treatment::Skip;
        }

        if self.native {
            if let Some(css_property) = css_transition_property(key) {
                return Treatment::Declarative(spec.css_declaration(css_property));
            }
        }

        let kind = AnimatorKind::for_property(key);
        if kind.is_interpolated() && (start.as_f64().is_none() || target.as_f64().is_none()) {
            warn!(property = %key, "transition configured for a non-numeric value, applying immediately");
            return Treatment::Skip;
        }
        Treatment::Procedural {
            kind,
            duration_ms: spec.duration_ms,
        }
    }

    /// Plan the move from `current` to `desired`.
    ///
    /// Returns `None` when every public key of `desired` already matches
    /// `current`.
    pub fn plan(
        &self,
        current: &Style,
        desired: &Style,
        geometry: Option<&dyn GeometryProvider>,
    ) -> Option<Plan> {
        if desired.matches_within(current) {
            return None;
        }

        let mut start = Self::normalized_start(current, desired, geometry);
        let mut declarations = Vec::new();
        let mut animations = Vec::new();
        let mut settled = Vec::new();

        for (key, new_value) in desired.iter() {
            if key.is_private() {
                start.remove(key);
                continue;
            }
            let from = start.get(key).cloned().unwrap_or_else(|| new_value.clone());

            match self.classify(key, &from, new_value) {
                Treatment::Skip => {
                    start.set(key.clone(), new_value.clone());
                    settled.push(key.clone());
                }
                Treatment::Declarative(declaration) => {
                    declarations.push(declaration);
                    start.set(key.clone(), new_value.clone());
                    settled.push(key.clone());
                }
                Treatment::Procedural { kind, duration_ms } => {
                    animations.push(PlannedAnimation {
                        property: key.clone(),
                        from,
                        to: new_value.clone(),
                        duration_ms,
                        kind,
                    });
                }
            }
        }

        animations.sort_by(|a, b| schedule_order(&a.property, &b.property));

        debug!(
            animated = animations.len(),
            declarative = declarations.len(),
            settled = settled.len(),
            "planned style change"
        );

        Some(Plan {
            start,
            transition: declarations.join(","),
            animations,
            settled,
        })
    }
}

/// Fixed scheduling order; keys outside it follow, by name.
pub fn schedule_order(a: &PropertyKey, b: &PropertyKey) -> std::cmp::Ordering {
    let rank = |key: &PropertyKey| key.animation_rank().unwrap_or(PropertyKey::ANIMATION_ORDER.len());
    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.as_str().cmp(b.as_str()))
}
