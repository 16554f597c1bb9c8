//! Animation manager: owns animated targets and drives their animators.
//!
//! The `AnimationManager` is the entry point of the engine. It handles:
//! - Registering targets with their transition configuration
//! - Running the planner whenever a target's desired style changes
//! - Owning the reusable animator table of every target
//! - Ticking all pending animators from the shared frame scheduler
//! - Tearing targets down without leaving animators queued
//!
//! # Usage
//!
//! ```ignore
//! use rune_animate::{AnimationManager, AnimateOptions, MemoryElement, Style, TransitionConfig};
//!
//! let mut manager = AnimationManager::with_system_clock(AnimateOptions::default());
//! let id = manager.add_target(TransitionConfig::new().with("left", 200.0));
//! manager.attach_element(id, Box::new(MemoryElement::new()));
//!
//! manager.set_style(id, Style::new().with("left", 0.0));   // applied immediately
//! manager.set_style(id, Style::new().with("left", 100.0)); // animated
//!
//! // Host event loop: honour timer requests until the scheduler is idle.
//! manager.run_until_idle(|delay_ms| sleep_ms(delay_ms));
//! ```

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::animator::Animator;
use crate::applier::{PaintOptions, StyleApplier, StyleSink};
use crate::error::{AnimateError, Result};
use crate::geometry::GeometryProvider;
use crate::planner::TransitionPlanner;
use crate::scheduler::{Clock, DEFAULT_INTERVAL_MS, FrameScheduler, SystemClock};
use crate::transition::TransitionConfig;
use crate::types::{PropertyKey, Style, StyleValue, TargetId};

/// Engine-wide options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimateOptions {
    /// Target interval between ticks in milliseconds.
    pub interval_ms: f64,
    /// Whether the rendering engine animates natively (see `detect`).
    pub native_transitions: bool,
    pub paint: PaintOptions,
}

impl Default for AnimateOptions {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            native_transitions: false,
            paint: PaintOptions::default(),
        }
    }
}

impl AnimateOptions {
    /// Reject intervals the scheduler cannot wait for.
    pub fn validate(&self) -> Result<()> {
        if !self.interval_ms.is_finite() || self.interval_ms < 0.0 {
            return Err(AnimateError::InvalidInterval(self.interval_ms));
        }
        Ok(())
    }
}

/// Identifies one animator in the scheduler queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnimatorKey {
    pub target: TargetId,
    pub property: PropertyKey,
}

/// Per-target state.
struct AnimatedTarget {
    transitions: TransitionConfig,
    /// Desired style, as set by callers.
    style: Style,
    /// Where the target visually is; `None` until the first application.
    current: Option<Style>,
    animators: HashMap<PropertyKey, Animator>,
    element: Option<Box<dyn StyleSink>>,
    geometry: Option<Box<dyn GeometryProvider>>,
    applier: StyleApplier,
    transition_css: String,
    suppressed: bool,
}

impl AnimatedTarget {
    fn new(transitions: TransitionConfig, paint: PaintOptions) -> Self {
        Self {
            transitions,
            style: Style::new(),
            current: None,
            animators: HashMap::new(),
            element: None,
            geometry: None,
            applier: StyleApplier::new(paint),
            transition_css: String::new(),
            suppressed: false,
        }
    }

    /// Stop an in-flight animator so its next tick lands on `value`.
    fn settle(&mut self, property: &PropertyKey, value: &StyleValue) {
        if let Some(animator) = self.animators.get_mut(property) {
            if animator.going {
                let kind = animator.kind;
                animator.redirect(value.clone(), value.clone(), 0.0, kind);
            }
        }
    }

    /// React to a change of the desired style. Returns the properties whose
    /// animators must be handed to the scheduler, in order.
    fn style_did_change(&mut self, native: bool) -> Vec<PropertyKey> {
        let immediate = self.current.is_none() || self.suppressed || self.element.is_none();
        if immediate {
            let snapshot = self.style.without_private();
            for (key, value) in snapshot.iter() {
                self.settle(key, value);
            }
            if let Some(element) = self.element.as_deref_mut() {
                self.applier.apply(element, &snapshot, &self.transition_css);
            }
            self.current = Some(snapshot);
            return Vec::new();
        }

        let Some(current) = self.current.as_ref() else {
            return Vec::new();
        };
        let planner = TransitionPlanner::new(&self.transitions, native);
        let Some(plan) = planner.plan(current, &self.style, self.geometry.as_deref()) else {
            trace!("style unchanged");
            // An animator still heading elsewhere stops where the target already is.
            let desired = self.style.without_private();
            for (key, value) in desired.iter() {
                let heading_elsewhere = self
                    .animators
                    .get(key)
                    .is_some_and(|animator| animator.going && animator.end_value != *value);
                if heading_elsewhere {
                    self.settle(key, value);
                }
            }
            return Vec::new();
        };

        for key in &plan.settled {
            if let Some(value) = plan.start.get(key).cloned() {
                self.settle(key, &value);
            }
        }

        let mut staged = Vec::new();
        for planned in plan.animations {
            let animator = self
                .animators
                .entry(planned.property.clone())
                .or_insert_with(|| Animator::new(planned.property.clone()));
            animator.redirect(planned.from, planned.to, planned.duration_ms, planned.kind);
            if !animator.going {
                animator.going = true;
                staged.push(planned.property);
            }
        }

        self.transition_css = plan.transition;
        if let Some(element) = self.element.as_deref_mut() {
            self.applier.apply(element, &plan.start, &self.transition_css);
        }
        self.current = Some(plan.start);
        staged
    }
}

/// Owns animated targets and the frame scheduler that ticks their animators.
pub struct AnimationManager {
    targets: HashMap<TargetId, AnimatedTarget>,
    scheduler: FrameScheduler<AnimatorKey>,
    options: AnimateOptions,
}

impl AnimationManager {
    pub fn new(options: AnimateOptions, clock: Box<dyn Clock>) -> Self {
        Self {
            targets: HashMap::new(),
            scheduler: FrameScheduler::new(clock, options.interval_ms),
            options,
        }
    }

    pub fn with_system_clock(options: AnimateOptions) -> Self {
        Self::new(options, Box::new(SystemClock::new()))
    }

    pub fn options(&self) -> &AnimateOptions {
        &self.options
    }

    /// Register a target with its (already merged) transition configuration.
    pub fn add_target(&mut self, transitions: TransitionConfig) -> TargetId {
        let id = TargetId::new();
        self.targets
            .insert(id, AnimatedTarget::new(transitions, self.options.paint));
        id
    }

    /// Tear a target down: its animators are dropped and unqueued.
    pub fn remove_target(&mut self, id: TargetId) -> bool {
        if self.targets.remove(&id).is_none() {
            return false;
        }
        self.scheduler.retain(|key| key.target != id);
        debug!(target = id.0, "target removed");
        true
    }

    pub fn contains_target(&self, id: TargetId) -> bool {
        self.targets.contains_key(&id)
    }

    /// Attach the visual element styles are committed to.
    pub fn attach_element(&mut self, id: TargetId, element: Box<dyn StyleSink>) {
        if let Some(target) = self.target_mut(id) {
            target.element = Some(element);
            target.applier.forget_transition();
        }
    }

    /// Detach the element; later style changes only update the snapshot.
    pub fn detach_element(&mut self, id: TargetId) -> Option<Box<dyn StyleSink>> {
        self.target_mut(id)?.element.take()
    }

    pub fn set_geometry(&mut self, id: TargetId, geometry: Box<dyn GeometryProvider>) {
        if let Some(target) = self.target_mut(id) {
            target.geometry = Some(geometry);
        }
    }

    /// Replace the desired style and animate towards it.
    pub fn set_style(&mut self, id: TargetId, style: Style) {
        if let Some(target) = self.target_mut(id) {
            target.style = style;
            self.style_did_change(id);
        }
    }

    /// Change one property of the desired style.
    pub fn adjust(&mut self, id: TargetId, key: impl Into<PropertyKey>, value: impl Into<StyleValue>) {
        self.adjust_many(id, &Style::new().with(key, value));
    }

    /// Merge `changes` into the desired style.
    pub fn adjust_many(&mut self, id: TargetId, changes: &Style) {
        if let Some(target) = self.target_mut(id) {
            for (key, value) in changes.iter() {
                target.style.set(key.clone(), value.clone());
            }
            self.style_did_change(id);
        }
    }

    /// Take geometry keys from a layout, replanning only if one changed.
    ///
    /// Geometry keys missing from `layout` are removed from the desired style.
    pub fn set_layout(&mut self, id: TargetId, layout: &Style) {
        let Some(target) = self.target_mut(id) else {
            return;
        };
        let mut changed = false;
        for key in PropertyKey::GEOMETRY {
            let new_value = layout.get(&key);
            if target.style.get(&key) == new_value {
                continue;
            }
            match new_value {
                Some(value) => target.style.set(key, value.clone()),
                None => {
                    target.style.remove(&key);
                }
            }
            changed = true;
        }
        if changed {
            self.style_did_change(id);
        }
    }

    /// Make the next application immediate, then re-apply the desired style.
    pub fn reset_animation(&mut self, id: TargetId) {
        if let Some(target) = self.target_mut(id) {
            target.current = None;
            self.style_did_change(id);
        }
    }

    /// While suppressed, style changes apply immediately.
    pub fn set_animation_suppressed(&mut self, id: TargetId, suppressed: bool) {
        if let Some(target) = self.target_mut(id) {
            target.suppressed = suppressed;
        }
    }

    /// Run the planner for a target and queue the animators it staged.
    pub fn style_did_change(&mut self, id: TargetId) {
        let native = self.options.native_transitions;
        let Some(target) = self.target_mut(id) else {
            return;
        };
        for property in target.style_did_change(native) {
            self.scheduler.schedule(AnimatorKey {
                target: id,
                property,
            });
        }
    }

    /// Run one tick: step every animator queued before the tick began.
    pub fn tick(&mut self) {
        let (now, batch) = self.scheduler.begin_tick();
        for key in batch {
            self.step_animator(key, now);
        }
        self.scheduler.finish_tick(now);
    }

    fn step_animator(&mut self, key: AnimatorKey, now: f64) {
        let Some(target) = self.targets.get_mut(&key.target) else {
            return;
        };
        let AnimatedTarget {
            animators,
            current,
            element,
            applier,
            ..
        } = target;
        let Some(animator) = animators.get_mut(&key.property) else {
            return;
        };

        let live = current.get_or_insert_with(Style::new);
        let step = animator.step(now, live);
        if let Some((value, commit)) = step.update {
            trace!(property = %key.property, value = %value, "commit");
            live.set(key.property.clone(), value);
            if let Some(element) = element.as_deref_mut() {
                applier.commit(element, &commit);
            }
        }

        if !step.finished {
            self.scheduler.schedule(key);
        }
    }

    /// Pending timer request: wait this many milliseconds, then call `tick`.
    pub fn take_timer(&mut self) -> Option<f64> {
        self.scheduler.take_timer()
    }

    /// Honour timer requests until idle. Returns the number of ticks run.
    pub fn run_until_idle(&mut self, mut wait: impl FnMut(f64)) -> usize {
        let mut ticks = 0;
        while let Some(delay_ms) = self.scheduler.take_timer() {
            wait(delay_ms);
            self.tick();
            ticks += 1;
        }
        ticks
    }

    /// Drop every queued animator and stop the current run.
    pub fn reset(&mut self) {
        self.scheduler.reset();
        for target in self.targets.values_mut() {
            for animator in target.animators.values_mut() {
                animator.going = false;
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    pub fn pending_count(&self) -> usize {
        self.scheduler.pending_len()
    }

    /// Average frames per second of the last completed run.
    pub fn last_fps(&self) -> f64 {
        self.scheduler.last_fps()
    }

    pub fn style(&self, id: TargetId) -> Option<&Style> {
        self.targets.get(&id).map(|target| &target.style)
    }

    /// The target's current-style snapshot.
    pub fn current_style(&self, id: TargetId) -> Option<&Style> {
        self.targets.get(&id)?.current.as_ref()
    }

    pub fn animator(&self, id: TargetId, key: &PropertyKey) -> Option<&Animator> {
        self.targets.get(&id)?.animators.get(key)
    }

    /// Batched native transition declaration last set on the target.
    pub fn transition_css(&self, id: TargetId) -> Option<&str> {
        self.targets
            .get(&id)
            .map(|target| target.transition_css.as_str())
    }

    fn target_mut(&mut self, id: TargetId) -> Option<&mut AnimatedTarget> {
        let target = self.targets.get_mut(&id);
        if target.is_none() {
            warn!(target = id.0, "unknown animation target");
        }
        target
    }
}
