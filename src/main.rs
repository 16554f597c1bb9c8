use std::time::Duration;

use anyhow::{Context, Result};
use rune_animate::{
    AbsoluteLayout, AnimationManager, Frame, MemoryElement, PropertyKey, StaticProbe, Style,
    StyleSink, TransitionConfig,
};
use rune_config::RuneConfig;

/// Element that logs every write before recording it.
struct LoggingElement {
    inner: MemoryElement,
}

impl StyleSink for LoggingElement {
    fn render_layout(&mut self, layout: &Style) {
        log::info!("render layout {:?}", layout);
        self.inner.render_layout(layout);
    }

    fn set_declaration(&mut self, name: &str, value: &str) {
        log::info!("{}: {}", name, value);
        self.inner.set_declaration(name, value);
    }
}

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let config = RuneConfig::load();
    // No rendering engine here, so probing reports no native support.
    let options = config
        .animate_options(&mut StaticProbe::headless())
        .context("invalid animation settings")?;
    log::info!(
        "interval={}ms native={} duration={}ms distance={}",
        options.interval_ms,
        options.native_transitions,
        config.demo.duration_ms,
        config.demo.distance
    );

    let mut manager = AnimationManager::with_system_clock(options);
    let id = manager.add_target(TransitionConfig::new().with("left", config.demo.duration_ms));
    let element = MemoryElement::new();
    manager.attach_element(
        id,
        Box::new(LoggingElement {
            inner: element.clone(),
        }),
    );
    manager.set_geometry(
        id,
        Box::new(AbsoluteLayout::new(Frame::new(0.0, 0.0, 800.0, 600.0))),
    );

    manager.set_style(id, Style::new().with("left", 0.0));
    manager.set_style(id, Style::new().with("left", config.demo.distance));

    let ticks = manager.run_until_idle(|delay_ms| {
        std::thread::sleep(Duration::from_secs_f64(delay_ms.max(0.0) / 1000.0));
    });

    let left = manager
        .current_style(id)
        .and_then(|style| style.get_f64(&PropertyKey::Left))
        .context("target has no left position")?;
    log::info!(
        "done: left={} after {} ticks ({:.1} fps, {} writes)",
        left,
        ticks,
        manager.last_fps(),
        element.writes()
    );
    Ok(())
}
