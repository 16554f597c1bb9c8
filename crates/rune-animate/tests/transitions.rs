use anyhow::{Context, Result};
use rune_animate::{
    AbsoluteLayout, AnimateOptions, AnimationManager, Clock, Frame, ManualClock, MemoryElement,
    PropertyKey, Style, StyleValue, TargetId, TransitionConfig,
};

struct Harness {
    manager: AnimationManager,
    clock: ManualClock,
    element: MemoryElement,
    id: TargetId,
}

impl Harness {
    fn new(transitions: TransitionConfig) -> Self {
        Self::with_options(transitions, AnimateOptions::default())
    }

    fn with_options(transitions: TransitionConfig, options: AnimateOptions) -> Self {
        let clock = ManualClock::new(1000.0);
        let mut manager = AnimationManager::new(options, Box::new(clock.clone()));
        let id = manager.add_target(transitions);
        let element = MemoryElement::new();
        manager.attach_element(id, Box::new(element.clone()));
        manager.set_geometry(
            id,
            Box::new(AbsoluteLayout::new(Frame::new(0.0, 0.0, 400.0, 300.0))),
        );
        Self {
            manager,
            clock,
            element,
            id,
        }
    }

    /// Wait for the requested timer and run one tick. False when idle.
    fn tick(&mut self) -> bool {
        match self.manager.take_timer() {
            Some(delay_ms) => {
                self.clock.advance(delay_ms);
                self.manager.tick();
                true
            }
            None => false,
        }
    }

    /// Tick until the clock reaches `at` (inclusive).
    fn tick_until(&mut self, at: f64) {
        while self.clock.now_ms() < at && self.tick() {}
    }

    fn current(&self, key: &str) -> Option<f64> {
        self.manager
            .current_style(self.id)?
            .get_f64(&PropertyKey::parse(key))
    }
}

#[test]
fn left_animates_from_zero_to_hundred() -> Result<()> {
    let mut h = Harness::new(TransitionConfig::new().with("left", 200.0));
    h.manager.set_style(h.id, Style::new().with("left", 0.0));
    h.manager.set_style(h.id, Style::new().with("left", 100.0));

    // Starting snapshot is applied right away.
    assert_eq!(h.element.layout().get_f64(&PropertyKey::Left), Some(0.0));
    let animator = h
        .manager
        .animator(h.id, &PropertyKey::Left)
        .context("left animator")?;
    assert_eq!(animator.start_value, StyleValue::Number(0.0));
    assert_eq!(animator.end_value, StyleValue::Number(100.0));
    assert_eq!(animator.duration_ms, 200.0);

    // First tick binds the start time to the tick, not to the change.
    assert!(h.tick());
    let t0 = h.clock.now_ms();
    assert_eq!(
        h.manager.animator(h.id, &PropertyKey::Left).context("animator")?.start,
        Some(t0)
    );

    h.tick_until(t0 + 100.0);
    let midway = h.element.px("left").context("left declaration")?;
    assert!((midway - 50.0).abs() <= 1.0, "midway was {midway}");

    h.tick_until(t0 + 200.0);
    assert_eq!(h.element.px("left"), Some(100.0));
    assert_eq!(h.current("left"), Some(100.0));
    let animator = h.manager.animator(h.id, &PropertyKey::Left).context("animator")?;
    assert!(!animator.going);
    assert!(h.manager.is_idle());
    assert!(!h.tick());
    assert!(h.manager.last_fps() > 0.0);
    Ok(())
}

#[test]
fn opacity_midpoint_rounds_to_two_decimals() -> Result<()> {
    let mut h = Harness::new(TransitionConfig::new().with("opacity", 200.0));
    h.manager.set_style(h.id, Style::new().with("opacity", 1.0));
    h.manager.set_style(h.id, Style::new().with("opacity", 0.0));
    // Paint keys are not part of the layout subset.
    assert!(h.element.layout().is_empty());
    assert_eq!(h.element.declaration("opacity").as_deref(), Some("1"));

    assert!(h.tick());
    let t0 = h.clock.now_ms();
    h.tick_until(t0 + 100.0);
    assert_eq!(h.element.declaration("opacity").as_deref(), Some("0.5"));
    assert_eq!(h.element.declaration("-moz-opacity").as_deref(), Some("0.5"));
    assert_eq!(h.current("opacity"), Some(0.5));

    h.tick_until(t0 + 300.0);
    assert_eq!(h.element.declaration("opacity").as_deref(), Some("0"));
    Ok(())
}

#[test]
fn centered_offset_tracks_width_of_the_same_tick() -> Result<()> {
    let mut h = Harness::new(
        TransitionConfig::new()
            .with("centerX", 100.0)
            .with("width", 100.0),
    );
    h.manager
        .set_style(h.id, Style::new().with("centerX", 0.0).with("width", 100.0));
    h.manager
        .set_style(h.id, Style::new().with("centerX", 50.0).with("width", 200.0));

    while h.tick() {
        let width = h.current("width").context("width")?;
        let center = h.current("centerX").context("centerX")?;
        let margin = h.element.px("margin-left").context("margin-left")?;
        assert_eq!(margin, (center - width / 2.0).round());
    }

    assert_eq!(h.current("width"), Some(200.0));
    assert_eq!(h.current("centerX"), Some(50.0));
    assert_eq!(h.element.px("margin-left"), Some(-50.0));
    Ok(())
}

#[test]
fn hiding_waits_for_the_duration_and_showing_is_instant() -> Result<()> {
    let mut h = Harness::new(
        TransitionConfig::new()
            .with("display", 150.0)
            .with("opacity", 150.0),
    );
    h.manager.set_style(
        h.id,
        Style::new().with("display", "block").with("opacity", 1.0),
    );
    h.manager.set_style(
        h.id,
        Style::new().with("display", "none").with("opacity", 0.0),
    );
    assert_eq!(h.element.declaration("display").as_deref(), Some("block"));

    assert!(h.tick());
    let t0 = h.clock.now_ms();
    h.tick_until(t0 + 140.0);
    assert_eq!(h.element.declaration("display").as_deref(), Some("block"));

    h.tick_until(t0 + 150.0);
    assert_eq!(h.element.declaration("display").as_deref(), Some("none"));
    assert_eq!(h.element.declaration("opacity").as_deref(), Some("0"));
    assert!(h.manager.is_idle());

    // Showing again is applied in the planning pass itself.
    h.manager.set_style(
        h.id,
        Style::new().with("display", "block").with("opacity", 0.0),
    );
    assert_eq!(h.element.declaration("display").as_deref(), Some("block"));
    assert!(h.manager.is_idle());
    Ok(())
}

#[test]
fn redirect_mid_flight_starts_from_live_value() -> Result<()> {
    let mut h = Harness::new(TransitionConfig::new().with("left", 200.0));
    h.manager.set_style(h.id, Style::new().with("left", 0.0));
    h.manager.set_style(h.id, Style::new().with("left", 100.0));
    assert!(h.tick());
    let t0 = h.clock.now_ms();
    h.tick_until(t0 + 100.0);
    let live = h.current("left").context("live left")?;

    h.manager.set_style(h.id, Style::new().with("left", 0.0));
    let animator = h.manager.animator(h.id, &PropertyKey::Left).context("animator")?;
    assert_eq!(animator.start_value, StyleValue::Number(live));
    assert_eq!(animator.end_value, StyleValue::Number(0.0));
    assert_eq!(animator.start, None);
    // Reused, not duplicated.
    assert_eq!(h.manager.pending_count(), 1);

    assert!(h.tick());
    let t1 = h.clock.now_ms();
    h.tick_until(t1 + 200.0);
    assert_eq!(h.element.px("left"), Some(0.0));
    assert!(h.manager.is_idle());
    Ok(())
}

#[test]
fn settling_on_the_live_value_stops_the_animator() -> Result<()> {
    let mut h = Harness::new(TransitionConfig::new().with("left", 200.0));
    h.manager.set_style(h.id, Style::new().with("left", 0.0));
    h.manager.set_style(h.id, Style::new().with("left", 100.0));
    assert!(h.tick());
    let t0 = h.clock.now_ms();
    h.tick_until(t0 + 100.0);
    let live = h.current("left").context("live left")?;

    h.manager.set_style(h.id, Style::new().with("left", live));
    assert!(h.tick());
    assert!(h.manager.is_idle());
    assert_eq!(h.element.px("left"), Some(live));
    Ok(())
}

#[test]
fn native_transitions_skip_animators() -> Result<()> {
    let options = AnimateOptions {
        native_transitions: true,
        ..AnimateOptions::default()
    };
    let mut h = Harness::with_options(TransitionConfig::new().with("opacity", 200.0), options);
    h.manager.set_style(h.id, Style::new().with("opacity", 1.0));
    h.manager.set_style(h.id, Style::new().with("opacity", 0.0));

    assert!(h.manager.animator(h.id, &PropertyKey::Opacity).is_none());
    assert!(h.manager.is_idle());
    let css = h.manager.transition_css(h.id).context("transition css")?;
    assert!(css.contains("opacity 0.2s linear"));
    assert_eq!(
        h.element.declaration("transition").as_deref(),
        Some("opacity 0.2s linear")
    );
    assert_eq!(h.element.declaration("opacity").as_deref(), Some("0"));
    assert_eq!(h.current("opacity"), Some(0.0));

    // Same declaration again is not rewritten.
    let writes = h.element.transition_writes();
    h.manager.set_style(h.id, Style::new().with("opacity", 1.0));
    assert_eq!(h.element.transition_writes(), writes);
    Ok(())
}

#[test]
fn targets_share_one_scheduler() -> Result<()> {
    let mut h = Harness::new(TransitionConfig::new().with("top", 100.0));
    let other = h.manager.add_target(TransitionConfig::new().with("top", 50.0));
    let other_element = MemoryElement::new();
    h.manager.attach_element(other, Box::new(other_element.clone()));

    for id in [h.id, other] {
        h.manager.set_style(id, Style::new().with("top", 0.0));
        h.manager.set_style(id, Style::new().with("top", 20.0));
    }
    assert_eq!(h.manager.pending_count(), 2);

    let clock = h.clock.clone();
    let ticks = h.manager.run_until_idle(|delay_ms| clock.advance(delay_ms));
    assert_eq!(ticks, 11);
    assert_eq!(h.element.px("top"), Some(20.0));
    assert_eq!(other_element.px("top"), Some(20.0));
    Ok(())
}

#[test]
fn fractional_targets_land_exactly_and_stay_put() -> Result<()> {
    let mut h = Harness::new(
        TransitionConfig::new()
            .with("left", 200.0)
            .with("opacity", 200.0),
    );
    h.manager.set_style(h.id, Style::new().with("left", 0.0).with("opacity", 1.0));
    let target = Style::new().with("left", 100.5).with("opacity", 0.333);
    h.manager.set_style(h.id, target.clone());

    let clock = h.clock.clone();
    h.manager.run_until_idle(|delay_ms| clock.advance(delay_ms));
    assert_eq!(h.current("left"), Some(100.5));
    assert_eq!(h.current("opacity"), Some(0.333));
    assert_eq!(h.element.declaration("left").as_deref(), Some("100.5px"));
    assert_eq!(h.element.declaration("opacity").as_deref(), Some("0.333"));

    // Sending the same style again changes nothing.
    let writes = h.element.writes();
    h.manager.set_style(h.id, target);
    assert!(h.manager.is_idle());
    assert_eq!(h.manager.pending_count(), 0);
    assert_eq!(h.element.writes(), writes);
    Ok(())
}

#[test]
fn showing_while_a_hide_is_pending_keeps_the_element_visible() -> Result<()> {
    let mut h = Harness::new(
        TransitionConfig::new()
            .with("display", 150.0)
            .with("opacity", 150.0),
    );
    h.manager.set_style(
        h.id,
        Style::new().with("display", "block").with("opacity", 1.0),
    );
    h.manager.set_style(
        h.id,
        Style::new().with("display", "none").with("opacity", 0.0),
    );
    assert!(h.tick());
    let t0 = h.clock.now_ms();
    h.tick_until(t0 + 50.0);

    h.manager.set_style(
        h.id,
        Style::new().with("display", "block").with("opacity", 1.0),
    );
    assert_eq!(h.element.declaration("display").as_deref(), Some("block"));

    // Well past the end of the abandoned hide.
    while h.tick() {
        assert_eq!(h.element.declaration("display").as_deref(), Some("block"));
    }
    assert!(h.clock.now_ms() > t0 + 150.0);
    assert_eq!(h.element.declaration("display").as_deref(), Some("block"));
    assert_eq!(h.element.declaration("opacity").as_deref(), Some("1"));
    let display = h
        .manager
        .current_style(h.id)
        .and_then(|style| style.get(&PropertyKey::Display).cloned());
    assert_eq!(display, Some(StyleValue::from("block")));
    Ok(())
}

#[test]
fn showing_with_display_alone_cancels_the_pending_hide() -> Result<()> {
    let mut h = Harness::new(TransitionConfig::new().with("display", 150.0));
    h.manager.set_style(h.id, Style::new().with("display", "block"));
    h.manager.set_style(h.id, Style::new().with("display", "none"));
    assert!(h.tick());
    let t0 = h.clock.now_ms();
    h.tick_until(t0 + 50.0);

    h.manager.set_style(h.id, Style::new().with("display", "block"));
    let ticks = h.manager.run_until_idle(|_| {});
    assert!(ticks >= 1);
    assert_eq!(h.element.declaration("display").as_deref(), Some("block"));
    let animator = h.manager.animator(h.id, &PropertyKey::Display).context("display animator")?;
    assert!(!animator.going);
    Ok(())
}

#[test]
fn suppressing_mid_flight_lands_on_the_new_value() -> Result<()> {
    let mut h = Harness::new(TransitionConfig::new().with("left", 200.0));
    h.manager.set_style(h.id, Style::new().with("left", 0.0));
    h.manager.set_style(h.id, Style::new().with("left", 100.0));
    assert!(h.tick());
    let t0 = h.clock.now_ms();
    h.tick_until(t0 + 50.0);

    h.manager.set_animation_suppressed(h.id, true);
    h.manager.set_style(h.id, Style::new().with("left", 30.0));
    assert_eq!(h.element.layout().get_f64(&PropertyKey::Left), Some(30.0));

    while h.tick() {}
    assert!(h.manager.is_idle());
    assert_eq!(h.element.px("left"), Some(30.0));
    assert_eq!(h.current("left"), Some(30.0));

    // Nothing left to tick past the original end.
    h.clock.advance(500.0);
    assert!(!h.tick());
    assert_eq!(h.element.px("left"), Some(30.0));
    Ok(())
}
