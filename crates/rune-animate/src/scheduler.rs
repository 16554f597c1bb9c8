//! Frame scheduler batching every pending animator onto a single timer.
//!
//! The scheduler does not own a timer. It records a *timer request* that the
//! host event loop honours by waiting the requested delay and then running a
//! tick. A tick is split in two halves so the owner can step its animators in
//! between:
//!
//! ```ignore
//! let (now, batch) = scheduler.begin_tick();
//! for key in batch {
//!     // stepping may call `scheduler.schedule(key)` again; that lands in the
//!     // next cycle, never in `batch`
//! }
//! scheduler.finish_tick(now);
//! ```
//!
//! The first `schedule` on an idle scheduler starts a new run and requests a
//! zero-delay timer, so every key queued during the same planning pass is
//! present for the first tick.

use std::cell::Cell;
use std::mem;
use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, trace};

/// Default target interval between ticks in milliseconds.
pub const DEFAULT_INTERVAL_MS: f64 = 10.0;

/// Upper bound on the per-run tick counter.
const MAX_TICKS: u32 = 1_000_000;

/// Source of absolute timestamps in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock measured from the moment it was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: f64) {
        self.now.set(self.now.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Whether a timing run is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Queue empty and no timer armed.
    Idle,
    /// A run is in progress; a timer is armed or a tick is executing.
    Running,
}

/// Batches pending keys into ticks driven by one repeating timer.
pub struct FrameScheduler<K> {
    pending: Vec<K>,
    clock: Box<dyn Clock>,
    interval_ms: f64,
    state: SchedulerState,
    /// Delay in milliseconds the host should wait before the next tick.
    timer: Option<f64>,
    ticks: u32,
    run_started_at: f64,
    last_fps: f64,
}

impl<K> FrameScheduler<K> {
    pub fn new(clock: Box<dyn Clock>, interval_ms: f64) -> Self {
        Self {
            pending: Vec::new(),
            clock,
            interval_ms: interval_ms.max(0.0),
            state: SchedulerState::Idle,
            timer: None,
            ticks: 0,
            run_started_at: 0.0,
            last_fps: 0.0,
        }
    }

    /// Scheduler using the wall clock and the default interval.
    pub fn with_system_clock() -> Self {
        Self::new(Box::new(SystemClock::new()), DEFAULT_INTERVAL_MS)
    }

    /// Queue `key` for the next tick, starting a run if the scheduler is idle.
    ///
    /// The caller guarantees a key is queued at most once per cycle.
    pub fn schedule(&mut self, key: K) {
        self.pending.push(key);
        if self.state == SchedulerState::Idle {
            self.start_run();
        }
    }

    fn start_run(&mut self) {
        self.ticks = 0;
        self.run_started_at = self.clock.now_ms();
        self.state = SchedulerState::Running;
        self.timer = Some(0.0);
        debug!(at = self.run_started_at, "animation run started");
    }

    /// Take the pending timer request, if any.
    pub fn take_timer(&mut self) -> Option<f64> {
        self.timer.take()
    }

    /// Peek at the pending timer request.
    pub fn timer(&self) -> Option<f64> {
        self.timer
    }

    /// Start a tick: timestamp it and take the whole queue, leaving it empty.
    pub fn begin_tick(&mut self) -> (f64, Vec<K>) {
        let now = self.clock.now_ms();
        self.timer = None;
        let batch = mem::take(&mut self.pending);
        trace!(at = now, pending = batch.len(), "tick");
        (now, batch)
    }

    /// Finish the tick started at `started_at`: re-arm the timer if anything
    /// was queued during the tick, otherwise go idle and latch the FPS figure.
    pub fn finish_tick(&mut self, started_at: f64) {
        if self.ticks < MAX_TICKS {
            self.ticks += 1;
        }

        let end = self.clock.now_ms();
        let elapsed = end - started_at;
        if !self.pending.is_empty() {
            self.timer = Some((self.interval_ms - elapsed).max(0.0));
            return;
        }

        self.state = SchedulerState::Idle;
        self.timer = None;
        let run_secs = (end - self.run_started_at).max(1.0) / 1000.0;
        self.last_fps = f64::from(self.ticks) / run_secs;
        debug!(
            ticks = self.ticks,
            fps = self.last_fps,
            "animation run finished"
        );
    }

    /// Drop queued keys that do not satisfy `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&K) -> bool) {
        self.pending.retain(keep);
    }

    /// Forget all queued keys and return to idle. The FPS figure is kept.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.state = SchedulerState::Idle;
        self.timer = None;
        self.ticks = 0;
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SchedulerState::Idle
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, key: &K) -> bool
    where
        K: PartialEq,
    {
        self.pending.contains(key)
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Average frames per second of the last completed run.
    pub fn last_fps(&self) -> f64 {
        self.last_fps
    }
}
