//! Style/layout applier: commits snapshots and animator ticks to an element.
//!
//! Geometry keys are handed to the element's layout as one subset; paint-only
//! keys (opacity, display, anything unrecognised) go through small per-key
//! helpers as individual declarations.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::animator::Commit;
use crate::types::{PropertyKey, Style, StyleValue};

/// Render/layout boundary of a visual element.
pub trait StyleSink {
    /// Commit the layout-affecting subset and re-render the element.
    fn render_layout(&mut self, layout: &Style);

    /// Set one style declaration, e.g. `("left", "10px")`.
    fn set_declaration(&mut self, name: &str, value: &str);
}

/// Options for paint helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaintOptions {
    /// Emit `filter: alpha(opacity=N)` with N rounded to this step.
    pub opacity_filter_step: Option<u32>,
}

type PaintHelper = fn(&mut dyn StyleSink, &PropertyKey, &StyleValue, &PaintOptions);

fn paint_helper(key: &PropertyKey) -> Option<PaintHelper> {
    match key {
        PropertyKey::Opacity => Some(paint_opacity),
        PropertyKey::Display => Some(paint_display),
        _ => None,
    }
}

fn paint_opacity(sink: &mut dyn StyleSink, _: &PropertyKey, value: &StyleValue, options: &PaintOptions) {
    let text = value.to_string();
    sink.set_declaration("opacity", &text);
    sink.set_declaration("-moz-opacity", &text);

    if let (Some(step), Some(opacity)) = (options.opacity_filter_step, value.as_f64()) {
        let step = f64::from(step.max(1));
        let percent = ((opacity * 100.0) / step).round() * step;
        sink.set_declaration("filter", &format!("alpha(opacity={percent})"));
    }
}

fn paint_display(sink: &mut dyn StyleSink, _: &PropertyKey, value: &StyleValue, _: &PaintOptions) {
    sink.set_declaration("display", &value.to_string());
}

fn paint_passthrough(sink: &mut dyn StyleSink, key: &PropertyKey, value: &StyleValue, _: &PaintOptions) {
    sink.set_declaration(key.as_str(), &value.to_string());
}

fn px(value: f64) -> String {
    format!("{value}px")
}

/// Applies snapshots and per-tick commits to one element.
#[derive(Debug, Clone, Default)]
pub struct StyleApplier {
    options: PaintOptions,
    last_transition: Option<String>,
}

impl StyleApplier {
    pub fn new(options: PaintOptions) -> Self {
        Self {
            options,
            last_transition: None,
        }
    }

    /// Apply a whole snapshot: layout keys as one render, paint keys through
    /// their helpers, then the transition declaration if it changed.
    pub fn apply(&mut self, sink: &mut dyn StyleSink, snapshot: &Style, transition: &str) {
        let mut layout = Style::new();
        for (key, value) in snapshot.iter() {
            if key.is_private() {
                continue;
            }
            if key.is_geometry() {
                layout.set(key.clone(), value.clone());
                continue;
            }
            let helper = paint_helper(key).unwrap_or(paint_passthrough);
            helper(sink, key, value, &self.options);
        }

        sink.render_layout(&layout);
        self.set_transition(sink, transition);
    }

    /// Write the batched native transition declaration, skipping redundant writes.
    ///
    /// Returns whether a write happened.
    pub fn set_transition(&mut self, sink: &mut dyn StyleSink, transition: &str) -> bool {
        if self.last_transition.as_deref() == Some(transition) {
            return false;
        }
        sink.set_declaration("transition", transition);
        self.last_transition = Some(transition.to_string());
        true
    }

    /// Write the value computed by one animator tick.
    pub fn commit(&self, sink: &mut dyn StyleSink, commit: &Commit) {
        match commit {
            Commit::Offset { property, px: value } => {
                sink.set_declaration(property.as_str(), &px(*value));
            }
            Commit::Centered { axis, px: value } => {
                sink.set_declaration(axis.margin_property(), &px(*value));
            }
            Commit::Number { property, value } => {
                let helper = paint_helper(property).unwrap_or(paint_passthrough);
                helper(sink, property, &StyleValue::Number(*value), &self.options);
            }
            Commit::Keyword { property, value } => {
                let helper = paint_helper(property).unwrap_or(paint_passthrough);
                helper(sink, property, value, &self.options);
            }
        }
    }

    /// Forget the last transition write, e.g. after the element was replaced.
    pub fn forget_transition(&mut self) {
        self.last_transition = None;
    }
}

#[derive(Debug, Default)]
struct MemoryElementState {
    declarations: BTreeMap<String, String>,
    layout: Style,
    layout_renders: usize,
    transition_writes: usize,
    writes: usize,
}

/// In-memory element recording what was applied to it. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryElement {
    state: Rc<RefCell<MemoryElementState>>,
}

impl MemoryElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declaration(&self, name: &str) -> Option<String> {
        self.state.borrow().declarations.get(name).cloned()
    }

    /// Parse a `{n}px` declaration back into a number.
    pub fn px(&self, name: &str) -> Option<f64> {
        self.declaration(name)?
            .strip_suffix("px")
            .and_then(|n| n.parse().ok())
    }

    /// Layout subset passed to the most recent render.
    pub fn layout(&self) -> Style {
        self.state.borrow().layout.clone()
    }

    pub fn layout_renders(&self) -> usize {
        self.state.borrow().layout_renders
    }

    pub fn transition_writes(&self) -> usize {
        self.state.borrow().transition_writes
    }

    /// Total number of declaration writes and renders.
    pub fn writes(&self) -> usize {
        self.state.borrow().writes
    }
}

impl StyleSink for MemoryElement {
    fn render_layout(&mut self, layout: &Style) {
        let mut state = self.state.borrow_mut();
        state.layout = layout.clone();
        state.layout_renders += 1;
        state.writes += 1;
    }

    fn set_declaration(&mut self, name: &str, value: &str) {
        let mut state = self.state.borrow_mut();
        if name == "transition" {
            state.transition_writes += 1;
        }
        state.writes += 1;
        state.declarations.insert(name.to_string(), value.to_string());
    }
}
