//! Detection of native (declarative) transition support.
//!
//! Detection runs once: a probe element receives a vendor-prefixed transition
//! declaration and is then checked for a prefixed `TransitionProperty`
//! accessor. The answer is latched for the lifetime of the process.

use std::collections::HashSet;
use std::sync::OnceLock;

use tracing::debug;

/// Prefixes used when writing the probe declaration.
pub const PROBE_CSS_PREFIXES: &[&str] = &["-webkit"];

/// Accessor prefixes checked on the probe element.
pub const ACCESSOR_PREFIXES: &[&str] = &["moz", "Moz", "o", "ms", "webkit"];

/// An offscreen element used to probe the rendering engine.
pub trait StyleProbe {
    /// Replace the element's inline style text.
    fn set_css_text(&mut self, css: &str);

    /// Whether the element's style exposes an accessor with this name.
    fn has_accessor(&self, name: &str) -> bool;
}

/// Probe the engine behind `probe` for native transition support.
pub fn probe_native_transitions(probe: &mut dyn StyleProbe) -> bool {
    let css: String = PROBE_CSS_PREFIXES
        .iter()
        .map(|prefix| format!("{prefix}-transition:all 1s linear;"))
        .collect();
    probe.set_css_text(&css);

    ACCESSOR_PREFIXES
        .iter()
        .any(|prefix| probe.has_accessor(&format!("{prefix}TransitionProperty")))
}

/// A latched detection result.
#[derive(Debug, Default)]
pub struct TransitionSupport {
    latched: OnceLock<bool>,
}

impl TransitionSupport {
    pub const fn new() -> Self {
        Self {
            latched: OnceLock::new(),
        }
    }

    /// Detect on first call; later calls return the latched answer and ignore `probe`.
    pub fn detect(&self, probe: &mut dyn StyleProbe) -> bool {
        *self.latched.get_or_init(|| {
            let supported = probe_native_transitions(probe);
            debug!(supported, "native transition detection");
            supported
        })
    }

    /// Latch a value without probing. Returns the value actually latched.
    pub fn force(&self, supported: bool) -> bool {
        *self.latched.get_or_init(|| supported)
    }

    pub fn get(&self) -> Option<bool> {
        self.latched.get().copied()
    }
}

static PROCESS_SUPPORT: TransitionSupport = TransitionSupport::new();

/// Process-wide native transition support, detected once.
pub fn native_transitions(probe: &mut dyn StyleProbe) -> bool {
    PROCESS_SUPPORT.detect(probe)
}

/// A probe over a fixed set of accessor names, for engines known up front and
/// for headless hosts (an empty probe reports no support).
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    accessors: HashSet<String>,
    css_text: String,
}

impl StaticProbe {
    pub fn new<I, S>(accessors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accessors: accessors.into_iter().map(Into::into).collect(),
            css_text: String::new(),
        }
    }

    /// A probe for a host with no rendering engine.
    pub fn headless() -> Self {
        Self::default()
    }

    pub fn css_text(&self) -> &str {
        &self.css_text
    }
}

impl StyleProbe for StaticProbe {
    fn set_css_text(&mut self, css: &str) {
        self.css_text = css.to_string();
    }

    fn has_accessor(&self, name: &str) -> bool {
        self.accessors.contains(name)
    }
}
