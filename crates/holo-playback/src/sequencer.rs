use tracing::{debug, info};

use crate::clock::PlaybackClock;
use crate::config::PlaybackConfig;
use crate::context::PlaybackContext;
use crate::display::{DisplayState, Mode};
use crate::error::{PlaybackError, PlaybackResult};
use crate::event::{EventLog, PlaybackEvent, PlaybackEventKind};
use crate::narrator::Narrator;
use crate::progress::ProgressDriver;
use crate::script::{Script, Step};
use crate::timer::{FiredTimer, TimerKind, TimerOwner, TimerQueue, TimerSlot};
use crate::workspace::CodeWorkspace;

/// Longest span a single `advance` or `run_until` call may cover: one day.
pub const MAX_ADVANCE_MS: u64 = 24 * 60 * 60 * 1000;

/// Builds a [`PlaybackContext`] from the sequencer's shared services.
macro_rules! context {
    ($seq:ident) => {
        PlaybackContext {
            clock: &$seq.clock,
            timers: &mut $seq.timers,
            events: &mut $seq.events,
            iteration: $seq.iteration,
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// At the start of a loop, next step not yet begun.
    Ready,
    /// Executing instant steps.
    Running,
    /// Waiting for the narrator to finish a caption.
    Speaking,
    /// Waiting for a `Wait` step timer.
    Waiting,
    /// Shut down; nothing runs again.
    Cancelled,
}

/// Plays a [`Script`] in an endless loop over virtual time.
///
/// Owns the clock, timer service, narrator, progress driver and event log.
/// Steps run strictly in order; a step begins only once the previous one
/// resolved. After the last step all state resets and the script starts
/// over, until [`cancel`](Self::cancel) is called.
pub struct Sequencer {
    script: Script,
    config: PlaybackConfig,
    clock: PlaybackClock,
    timers: TimerQueue,
    events: EventLog,
    narrator: Narrator,
    progress: ProgressDriver,
    workspace: CodeWorkspace,
    step_slot: TimerSlot,
    cursor: usize,
    phase: Phase,
    iteration: u64,
    steps_executed: u64,
    loop_started_at: u64,
    generation_started_at: Option<u64>,
}

impl std::fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("now_ms", &self.clock.now())
            .field("step", &self.cursor)
            .field("iteration", &self.iteration)
            .field("timers", &self.timers.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl Sequencer {
    /// Create a sequencer for `script` with validated timings.
    pub fn new(script: Script, config: PlaybackConfig) -> PlaybackResult<Self> {
        config.validate()?;
        Ok(Self {
            narrator: Narrator::new(&config),
            progress: ProgressDriver::new(&config),
            events: EventLog::new(config.max_events),
            script,
            config,
            clock: PlaybackClock::new(),
            timers: TimerQueue::new(),
            workspace: CodeWorkspace::demo(),
            step_slot: TimerSlot::new(),
            cursor: 0,
            phase: Phase::Ready,
            iteration: 0,
            steps_executed: 0,
            loop_started_at: 0,
            generation_started_at: None,
        })
    }

    /// Replace the code workspace shown during generation.
    pub fn with_workspace(mut self, workspace: CodeWorkspace) -> Self {
        self.workspace = workspace;
        self
    }

    /// Begin the next step without moving time. Does nothing while a step is pending.
    pub fn start(&mut self) -> PlaybackResult<()> {
        if self.phase == Phase::Ready {
            self.begin_steps()?;
        }
        Ok(())
    }

    /// Advance playback by `delta_ms`, firing every due timer in order.
    ///
    /// Spans longer than [`MAX_ADVANCE_MS`] are rejected.
    pub fn advance(&mut self, delta_ms: u64) -> PlaybackResult<()> {
        check_span(delta_ms)?;
        let target = self.clock.now().saturating_add(delta_ms);
        self.drive(target, None)
    }

    /// Advance playback up to the absolute time `at_ms`.
    ///
    /// Targets more than [`MAX_ADVANCE_MS`] ahead are rejected.
    pub fn run_until(&mut self, at_ms: u64) -> PlaybackResult<()> {
        let target = at_ms.max(self.clock.now());
        check_span(target - self.clock.now())?;
        self.drive(target, None)
    }

    /// Play `n` complete loops, stopping exactly at the loop boundary.
    pub fn run_loops(&mut self, n: u64) -> PlaybackResult<()> {
        let limit = self.iteration.saturating_add(n);
        self.drive(u64::MAX, Some(limit))
    }

    /// Stop playback: release every timer and reset to the blank idle state.
    ///
    /// Later calls to `advance` do nothing.
    pub fn cancel(&mut self) {
        if self.phase == Phase::Cancelled {
            return;
        }
        let mut ctx = context!(self);
        self.narrator.reset(&mut ctx);
        self.progress.stop(&mut ctx);
        self.step_slot.clear(&mut self.timers);
        let released = self.timers.cancel_all();
        self.generation_started_at = None;
        self.phase = Phase::Cancelled;
        self.emit(PlaybackEventKind::Cancelled, "playback cancelled");
        info!(
            target: "holo::sequencer",
            at_ms = self.clock.now(),
            iteration = self.iteration,
            released,
            "playback cancelled"
        );
    }

    /// Snapshot of everything the renderer needs for one frame.
    pub fn display(&self) -> DisplayState {
        let caption = self.narrator.state();
        let progress = self.progress.state();
        let now = self.clock.now();
        DisplayState {
            mode: Mode::derive(caption.is_speaking(), progress.active),
            speaking: caption.is_speaking(),
            generating: progress.active,
            caption: caption.revealed_text().to_string(),
            progress: progress.value,
            step: self.cursor,
            iteration: self.iteration,
            elapsed_ms: now,
            workspace: self
                .workspace
                .view_at(self.generation_started_at.map(|start| now - start)),
        }
    }

    /// The script being played.
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// The timings in use.
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// The event log.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The narrator, for caption inspection.
    pub fn narrator(&self) -> &Narrator {
        &self.narrator
    }

    /// The progress driver.
    pub fn progress(&self) -> &ProgressDriver {
        &self.progress
    }

    /// The timer service.
    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Current playback time in milliseconds.
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Number of completed loops.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Total number of steps that have resolved.
    pub fn steps_executed(&self) -> u64 {
        self.steps_executed
    }

    /// The step currently executing, if playback is running.
    pub fn current_step(&self) -> Option<&Step> {
        match self.phase {
            Phase::Speaking | Phase::Waiting | Phase::Running => {
                self.script.steps().get(self.cursor)
            }
            Phase::Ready | Phase::Cancelled => None,
        }
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.phase == Phase::Cancelled
    }

    fn drive(&mut self, target: u64, loop_limit: Option<u64>) -> PlaybackResult<()> {
        loop {
            match self.phase {
                Phase::Cancelled => return Ok(()),
                Phase::Ready => {
                    if loop_limit.is_some_and(|limit| self.iteration >= limit) {
                        return Ok(());
                    }
                    self.begin_steps()?;
                    continue;
                }
                Phase::Running | Phase::Speaking | Phase::Waiting => {}
            }

            let Some(fired) = self.timers.pop_due(target) else {
                if loop_limit.is_some() {
                    return Err(PlaybackError::InvariantViolation(format!(
                        "playback stalled at step {} with no pending timer",
                        self.cursor
                    )));
                }
                break;
            };
            self.clock.advance_to(fired.deadline);
            self.dispatch(fired)?;
            debug_assert!(
                self.timers.verify().is_ok(),
                "single-timer invariant broken: {:?}",
                self.timers.verify()
            );
        }
        self.clock.advance_to(target);
        Ok(())
    }

    fn dispatch(&mut self, fired: FiredTimer) -> PlaybackResult<()> {
        match fired.kind.owner() {
            TimerOwner::Narrator => {
                let mut ctx = context!(self);
                let signal = self.narrator.on_timer(&mut ctx, fired);
                if signal.is_some() && self.phase == Phase::Speaking {
                    self.complete_step();
                    self.begin_steps()?;
                }
            }
            TimerOwner::Progress => {
                let mut ctx = context!(self);
                self.progress.on_timer(&mut ctx, fired);
            }
            TimerOwner::Sequencer => {
                if fired.kind == TimerKind::StepDelay
                    && self.step_slot.holds(fired.handle)
                    && self.phase == Phase::Waiting
                {
                    self.step_slot.release();
                    self.complete_step();
                    self.begin_steps()?;
                }
            }
        }
        Ok(())
    }

    /// Run steps from the cursor until one has to wait or the loop ends.
    fn begin_steps(&mut self) -> PlaybackResult<()> {
        self.phase = Phase::Running;
        if self.cursor == 0 {
            self.loop_started_at = self.clock.now();
        }
        loop {
            let Some(step) = self.script.steps().get(self.cursor).cloned() else {
                return self.finish_loop();
            };

            debug!(
                target: "holo::sequencer",
                at_ms = self.clock.now(),
                index = self.cursor,
                step = step.label(),
                "step started"
            );
            self.emit(
                PlaybackEventKind::StepStarted {
                    index: self.cursor,
                    step: step.label().to_string(),
                },
                format!("step {}: {step}", self.cursor),
            );

            match step {
                Step::Say { text } => {
                    let mut ctx = context!(self);
                    if self.narrator.reveal(&mut ctx, &text).is_none() {
                        self.phase = Phase::Speaking;
                        return Ok(());
                    }
                }
                Step::Wait { ms } => {
                    self.step_slot
                        .arm_after(&mut self.timers, self.clock.now(), ms, TimerKind::StepDelay);
                    self.phase = Phase::Waiting;
                    return Ok(());
                }
                Step::StartGeneration => {
                    let mut ctx = context!(self);
                    self.progress.start(&mut ctx);
                    self.generation_started_at = Some(self.clock.now());
                    info!(target: "holo::sequencer", at_ms = self.clock.now(), "generation started");
                }
                Step::StopGeneration => {
                    let mut ctx = context!(self);
                    self.progress.stop(&mut ctx);
                    self.generation_started_at = None;
                    info!(target: "holo::sequencer", at_ms = self.clock.now(), "generation stopped");
                }
            }
            self.complete_step();
        }
    }

    fn complete_step(&mut self) {
        self.cursor += 1;
        self.steps_executed += 1;
        self.phase = Phase::Running;
    }

    fn finish_loop(&mut self) -> PlaybackResult<()> {
        // Saturated deadlines let a whole loop replay at one instant, forever.
        if self.clock.now() == self.loop_started_at {
            return Err(PlaybackError::InvariantViolation(format!(
                "loop {} finished without the clock moving (at {} ms)",
                self.iteration,
                self.clock.now()
            )));
        }
        self.emit(
            PlaybackEventKind::LoopCompleted {
                iteration: self.iteration,
            },
            format!("loop {} complete", self.iteration),
        );
        info!(
            target: "holo::sequencer",
            at_ms = self.clock.now(),
            iteration = self.iteration,
            steps = self.steps_executed,
            "loop completed"
        );

        let mut ctx = context!(self);
        self.narrator.reset(&mut ctx);
        self.progress.stop(&mut ctx);
        self.step_slot.clear(&mut self.timers);
        self.generation_started_at = None;

        self.iteration += 1;
        self.cursor = 0;
        self.phase = Phase::Ready;
        Ok(())
    }

    fn emit(&mut self, kind: PlaybackEventKind, description: impl Into<String>) {
        self.events.push(PlaybackEvent::new(
            self.clock.now(),
            self.iteration,
            kind,
            description,
        ));
    }
}

fn check_span(span_ms: u64) -> PlaybackResult<()> {
    if span_ms > MAX_ADVANCE_MS {
        return Err(PlaybackError::InvalidInput(format!(
            "cannot advance {span_ms} ms at once (limit {MAX_ADVANCE_MS} ms)"
        )));
    }
    Ok(())
}
