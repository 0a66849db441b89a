use crate::config::PlaybackConfig;
use crate::context::PlaybackContext;
use crate::event::PlaybackEventKind;
use crate::timer::{FiredTimer, TimerKind, TimerSlot};

/// Generation progress as seen by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressState {
    /// Progress in `[0, 1]`.
    pub value: f64,
    /// Whether generation mode is on.
    pub active: bool,
}

/// Advances a bounded progress value at a fixed tick rate while generating.
///
/// The value is derived from the tick count (`min(step * ticks, 1)`) rather
/// than accumulated, so it never drifts past the bound.
#[derive(Debug)]
pub struct ProgressDriver {
    state: ProgressState,
    ticks: u32,
    step: f64,
    interval_ms: u64,
    slot: TimerSlot,
}

impl ProgressDriver {
    /// Create an inactive driver using the configured timings.
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            state: ProgressState::default(),
            ticks: 0,
            step: config.progress_step,
            interval_ms: config.progress_interval_ms,
            slot: TimerSlot::new(),
        }
    }

    /// Current progress state.
    pub fn state(&self) -> ProgressState {
        self.state
    }

    /// Number of ticks applied since the last start.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Whether the driver is still auto-advancing.
    pub fn is_ticking(&self, ctx: &PlaybackContext<'_>) -> bool {
        self.slot.is_armed(ctx.timers)
    }

    /// Enter generation mode at zero and begin ticking.
    pub fn start(&mut self, ctx: &mut PlaybackContext<'_>) {
        self.state = ProgressState {
            value: 0.0,
            active: true,
        };
        self.ticks = 0;
        self.slot.arm_repeating(
            ctx.timers,
            ctx.now(),
            self.interval_ms,
            TimerKind::ProgressTick,
        );
        ctx.emit(
            PlaybackEventKind::GenerationStarted,
            "progress: generation started",
        );
    }

    /// Leave generation mode and reset to zero. Safe to call repeatedly.
    pub fn stop(&mut self, ctx: &mut PlaybackContext<'_>) {
        self.slot.clear(ctx.timers);
        let was_active = self.state.active;
        self.state = ProgressState::default();
        self.ticks = 0;
        if was_active {
            ctx.emit(
                PlaybackEventKind::GenerationStopped,
                "progress: generation stopped",
            );
        }
    }

    /// Apply one tick and return the new value.
    ///
    /// Reaching 1 halts the ticker; generation mode stays on until [`stop`](Self::stop).
    pub fn tick(&mut self, ctx: &mut PlaybackContext<'_>) -> f64 {
        if !self.state.active || self.state.value >= 1.0 {
            return self.state.value;
        }
        self.ticks += 1;
        self.state.value = (self.step * f64::from(self.ticks)).min(1.0);
        if self.state.value >= 1.0 {
            self.slot.clear(ctx.timers);
            ctx.emit(
                PlaybackEventKind::ProgressSaturated,
                "progress: generation complete",
            );
        }
        self.state.value
    }

    /// Handle a fired progress timer.
    pub fn on_timer(&mut self, ctx: &mut PlaybackContext<'_>, fired: FiredTimer) {
        if fired.kind == TimerKind::ProgressTick && self.slot.holds(fired.handle) {
            self.tick(ctx);
        }
    }
}
