//! Property animation engine for UI elements.
//!
//! Animates numeric visual properties (position, size, opacity) and deferred
//! visibility changes by interpolating from where an element currently is to
//! its new desired style over a configured duration, or by delegating to the
//! rendering engine's native transitions when those are available.
//!
//! # Architecture
//!
//! ```text
//! AnimationManager
//!   ├── AnimatedTarget (per element)
//!   │     ├── TransitionConfig     property → duration
//!   │     ├── current snapshot     where the element visually is
//!   │     ├── Animator table       one reusable animator per property
//!   │     └── StyleApplier         layout/paint split, transition writes
//!   ├── TransitionPlanner          skip / declarative / procedural per key
//!   └── FrameScheduler             one timer ticking every pending animator
//! ```
//!
//! The element and its geometry are external collaborators reached through the
//! `StyleSink` and `GeometryProvider` traits.

pub mod animator;
pub mod applier;
pub mod detect;
pub mod error;
pub mod geometry;
pub mod manager;
pub mod planner;
pub mod scheduler;
pub mod transition;
pub mod types;

pub use animator::{Animator, AnimatorKind, Commit, Step};
pub use applier::{MemoryElement, PaintOptions, StyleApplier, StyleSink};
pub use detect::{StaticProbe, StyleProbe, TransitionSupport, native_transitions};
pub use error::{AnimateError, Result};
pub use geometry::{AbsoluteLayout, Frame, Frames, GeometryProvider};
pub use manager::{AnimateOptions, AnimationManager, AnimatorKey};
pub use planner::{Plan, PlannedAnimation, TransitionPlanner, Treatment};
pub use scheduler::{Clock, FrameScheduler, ManualClock, SchedulerState, SystemClock};
pub use transition::{TransitionConfig, TransitionSpec};
pub use types::{Axis, PropertyKey, Style, StyleValue, TargetId};
