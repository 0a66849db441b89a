//! Real-time driver: runs a [`Sequencer`] on the tokio clock.
//!
//! Each frame converts wall time into playback time, advances the
//! sequencer and publishes a fresh [`DisplayState`] on a `watch` channel.
//! The loop only ends when its [`CancellationToken`] fires, after which the
//! sequencer is cancelled so no timer outlives the run.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::display::DisplayState;
use crate::error::{PlaybackError, PlaybackResult};
use crate::sequencer::Sequencer;

/// Fastest allowed playback speed multiplier.
pub const MAX_TIME_SCALE: f64 = 1_000.0;

/// Longest wall-clock gap a single frame may consume. Longer stalls are
/// dropped rather than replayed.
pub const MAX_FRAME_LAG: Duration = Duration::from_secs(1);

/// Options for the real-time driver.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Time between two published frames.
    pub frame_interval: Duration,
    /// Playback milliseconds per wall-clock millisecond.
    pub time_scale: f64,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
            time_scale: 1.0,
        }
    }
}

impl RuntimeOptions {
    /// Set the frame interval.
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Set the playback speed multiplier.
    pub fn with_time_scale(mut self, scale: f64) -> Self {
        self.time_scale = scale;
        self
    }

    /// Reject frame intervals outside `(0, MAX_FRAME_LAG]` and speeds
    /// outside `(0, MAX_TIME_SCALE]`.
    pub fn validate(&self) -> PlaybackResult<()> {
        if self.frame_interval.is_zero() {
            return Err(PlaybackError::InvalidInput(
                "frame interval must be greater than zero".into(),
            ));
        }
        if self.frame_interval > MAX_FRAME_LAG {
            return Err(PlaybackError::InvalidInput(format!(
                "frame interval must be at most {} ms",
                MAX_FRAME_LAG.as_millis()
            )));
        }
        if !(self.time_scale.is_finite() && self.time_scale > 0.0) {
            return Err(PlaybackError::InvalidInput(format!(
                "time scale must be a positive number, got {}",
                self.time_scale
            )));
        }
        if self.time_scale > MAX_TIME_SCALE {
            return Err(PlaybackError::InvalidInput(format!(
                "time scale must be at most {MAX_TIME_SCALE}, got {}",
                self.time_scale
            )));
        }
        Ok(())
    }
}

/// What a finished run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Playback time reached before cancellation.
    pub elapsed_ms: u64,
    /// Completed script loops.
    pub iterations: u64,
    /// Resolved steps.
    pub steps_executed: u64,
    /// Frames published.
    pub frames: u64,
}

/// Drive `sequencer` in real time until `cancel` fires.
pub async fn run(
    mut sequencer: Sequencer,
    options: RuntimeOptions,
    display: watch::Sender<DisplayState>,
    cancel: CancellationToken,
) -> PlaybackResult<RunSummary> {
    options.validate()?;
    sequencer.start()?;
    display.send_replace(sequencer.display());

    info!(
        target: "holo::runtime",
        steps = sequencer.script().len(),
        time_scale = options.time_scale,
        frame_ms = options.frame_interval.as_millis() as u64,
        "playback started"
    );

    let mut ticker = tokio::time::interval(options.frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = Instant::now();
    let mut carry = 0.0_f64;
    let mut frames = 0_u64;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let now = Instant::now();
                let wall = now.duration_since(last).min(MAX_FRAME_LAG);
                let scaled = wall.as_secs_f64() * 1000.0 * options.time_scale + carry;
                last = now;
                let whole = scaled.floor();
                carry = scaled - whole;
                sequencer.advance(whole as u64)?;
                frames += 1;
                display.send_replace(sequencer.display());
            }
        }
    }

    sequencer.cancel();
    display.send_replace(sequencer.display());
    let summary = RunSummary {
        elapsed_ms: sequencer.now(),
        iterations: sequencer.iteration(),
        steps_executed: sequencer.steps_executed(),
        frames,
    };
    debug!(target: "holo::runtime", ?summary, "playback stopped");
    Ok(summary)
}

/// A playback running on a spawned tokio task.
#[derive(Debug)]
pub struct PlaybackHandle {
    display: watch::Receiver<DisplayState>,
    cancel: CancellationToken,
    task: JoinHandle<PlaybackResult<RunSummary>>,
}

impl PlaybackHandle {
    /// A receiver for the latest display state.
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.display.clone()
    }

    /// The most recent display state.
    pub fn snapshot(&self) -> DisplayState {
        self.display.borrow().clone()
    }

    /// A clone of the token that stops the playback.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Whether the playback task has finished.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel the playback and wait for it to release its timers.
    pub async fn shutdown(self) -> PlaybackResult<RunSummary> {
        self.cancel.cancel();
        self.task.await.map_err(|e| {
            PlaybackError::InvariantViolation(format!("playback task failed: {e}"))
        })?
    }
}

/// Spawn `sequencer` on the current tokio runtime.
///
/// Must be called from within a runtime context.
pub fn spawn(sequencer: Sequencer, options: RuntimeOptions) -> PlaybackHandle {
    let (tx, rx) = watch::channel(sequencer.display());
    let cancel = CancellationToken::new();
    let task = tokio::spawn(run(sequencer, options, tx, cancel.clone()));
    PlaybackHandle {
        display: rx,
        cancel,
        task,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlaybackConfig;
    use crate::display::Mode;
    use crate::script::Script;

    fn demo() -> Sequencer {
        Sequencer::new(Script::demo(), PlaybackConfig::default()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_frames_in_real_time() {
        let handle = spawn(demo(), RuntimeOptions::default());
        tokio::time::sleep(Duration::from_millis(1_000)).await;

        let state = handle.snapshot();
        assert!((900..=1_100).contains(&state.elapsed_ms));
        assert!(state.caption.starts_with("Good evening"));
        assert_eq!(state.mode, Mode::Speaking);

        let summary = handle.shutdown().await.unwrap();
        assert!(summary.frames > 10);
        assert_eq!(summary.iterations, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn time_scale_speeds_up_playback() {
        let options = RuntimeOptions::default().with_time_scale(10.0);
        let handle = spawn(demo(), options);
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert!(handle.snapshot().elapsed_ms >= 9_000);
        handle.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_resets_published_state() {
        let handle = spawn(demo(), RuntimeOptions::default());
        let rx = handle.subscribe();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!rx.borrow().caption.is_empty());

        handle.shutdown().await.unwrap();
        let last = rx.borrow().clone();
        assert_eq!(last.mode, Mode::Idle);
        assert!(last.caption.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_token_stops_immediately() {
        let (tx, _rx) = watch::channel(DisplayState::default());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let summary = run(demo(), RuntimeOptions::default(), tx, cancel)
            .await
            .unwrap();
        assert_eq!(summary.frames, 0);
        assert_eq!(summary.elapsed_ms, 0);
    }

    #[tokio::test]
    async fn invalid_options_are_rejected() {
        let (tx, _rx) = watch::channel(DisplayState::default());
        let options = RuntimeOptions::default().with_time_scale(0.0);
        let result = run(demo(), options, tx, CancellationToken::new()).await;
        assert!(matches!(result, Err(PlaybackError::InvalidInput(_))));

        assert!(
            RuntimeOptions::default()
                .with_frame_interval(Duration::ZERO)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn extreme_options_are_rejected() {
        let fast = RuntimeOptions::default().with_time_scale(1e300);
        assert!(matches!(fast.validate(), Err(PlaybackError::InvalidInput(_))));
        assert!(
            RuntimeOptions::default()
                .with_time_scale(MAX_TIME_SCALE)
                .validate()
                .is_ok()
        );
        assert!(
            RuntimeOptions::default()
                .with_frame_interval(MAX_FRAME_LAG + Duration::from_millis(1))
                .validate()
                .is_err()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_frame_advances_at_most_the_lag_cap() {
        let options = RuntimeOptions::default()
            .with_frame_interval(MAX_FRAME_LAG)
            .with_time_scale(MAX_TIME_SCALE);
        let handle = spawn(demo(), options);
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        let frame_cap = MAX_FRAME_LAG.as_millis() as u64 * MAX_TIME_SCALE as u64;
        assert!(handle.snapshot().elapsed_ms <= frame_cap);
        let summary = handle.shutdown().await.unwrap();
        assert!(summary.frames >= 1);
    }
}
