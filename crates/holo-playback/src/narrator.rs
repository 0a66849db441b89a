use crate::config::PlaybackConfig;
use crate::context::PlaybackContext;
use crate::event::PlaybackEventKind;
use crate::timer::{FiredTimer, TimerKind, TimerSlot};

/// Caption state read by the renderer.
///
/// `revealed` counts characters, not bytes, and never exceeds the length
/// of `full_text`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NarratorState {
    full_text: String,
    revealed: usize,
    speaking: bool,
}

impl NarratorState {
    /// The caption being revealed.
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// Number of characters currently visible.
    pub fn revealed_len(&self) -> usize {
        self.revealed
    }

    /// Whether the caption is still revealing or settling.
    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// The visible prefix of the caption.
    pub fn revealed_text(&self) -> &str {
        match self.full_text.char_indices().nth(self.revealed) {
            Some((end, _)) => &self.full_text[..end],
            None => &self.full_text,
        }
    }

    /// Whether every character of the caption is visible.
    pub fn is_fully_revealed(&self) -> bool {
        self.revealed == self.full_text.chars().count()
    }
}

/// Signal returned to the sequencer when a caption is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarratorSignal {
    /// The caption was fully revealed and its settle pause elapsed.
    Completed,
}

/// Typewriter narrator: reveals one caption at a time, one character per tick.
#[derive(Debug)]
pub struct Narrator {
    state: NarratorState,
    char_count: usize,
    reveal_interval_ms: u64,
    settle_delay_ms: u64,
    slot: TimerSlot,
}

impl Narrator {
    /// Create an idle narrator using the configured timings.
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            state: NarratorState::default(),
            char_count: 0,
            reveal_interval_ms: config.reveal_interval_ms,
            settle_delay_ms: config.settle_delay_ms,
            slot: TimerSlot::new(),
        }
    }

    /// Current caption state.
    pub fn state(&self) -> &NarratorState {
        &self.state
    }

    /// Whether a reveal is in flight (revealing or settling).
    pub fn is_busy(&self) -> bool {
        self.state.speaking
    }

    /// Start revealing `text`, cutting off any reveal already in flight.
    ///
    /// Returns `Some(Completed)` right away for an empty caption; otherwise
    /// completion arrives later through [`Narrator::on_timer`].
    pub fn reveal(&mut self, ctx: &mut PlaybackContext<'_>, text: &str) -> Option<NarratorSignal> {
        self.interrupt(ctx);

        self.state = NarratorState {
            full_text: text.to_string(),
            revealed: 0,
            speaking: true,
        };
        self.char_count = text.chars().count();
        ctx.emit(
            PlaybackEventKind::LineStarted { text: text.into() },
            format!("narrator: \"{text}\""),
        );

        if self.char_count == 0 {
            return Some(self.complete(ctx));
        }

        self.slot.arm_repeating(
            ctx.timers,
            ctx.now(),
            self.reveal_interval_ms,
            TimerKind::RevealTick,
        );
        None
    }

    /// Handle a fired narrator timer.
    pub fn on_timer(
        &mut self,
        ctx: &mut PlaybackContext<'_>,
        fired: FiredTimer,
    ) -> Option<NarratorSignal> {
        if !self.slot.holds(fired.handle) {
            return None;
        }
        match fired.kind {
            TimerKind::RevealTick => {
                self.state.revealed = (self.state.revealed + 1).min(self.char_count);
                if self.state.revealed == self.char_count {
                    ctx.emit(
                        PlaybackEventKind::LineRevealed {
                            text: self.state.full_text.clone(),
                        },
                        "narrator: caption fully revealed",
                    );
                    self.slot.arm_after(
                        ctx.timers,
                        ctx.now(),
                        self.settle_delay_ms,
                        TimerKind::Settle,
                    );
                }
                None
            }
            TimerKind::Settle => {
                self.slot.release();
                Some(self.complete(ctx))
            }
            TimerKind::ProgressTick | TimerKind::StepDelay => None,
        }
    }

    /// Drop any caption and timer, returning to the blank idle state.
    pub fn reset(&mut self, ctx: &mut PlaybackContext<'_>) {
        self.interrupt(ctx);
        self.state = NarratorState::default();
        self.char_count = 0;
    }

    fn interrupt(&mut self, ctx: &mut PlaybackContext<'_>) {
        self.slot.clear(ctx.timers);
        if self.state.speaking {
            ctx.emit(
                PlaybackEventKind::LineInterrupted {
                    text: self.state.full_text.clone(),
                    revealed: self.state.revealed,
                },
                "narrator: caption interrupted",
            );
            self.state.speaking = false;
        }
    }

    fn complete(&mut self, ctx: &mut PlaybackContext<'_>) -> NarratorSignal {
        self.state.speaking = false;
        ctx.emit(
            PlaybackEventKind::LineCompleted {
                text: self.state.full_text.clone(),
            },
            "narrator: caption complete",
        );
        NarratorSignal::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::PlaybackClock;
    use crate::event::EventLog;
    use crate::timer::{TimerOwner, TimerQueue};
    use proptest::prelude::*;

    /// Minimal driver: owns the shared services and fires due timers.
    struct Rig {
        clock: PlaybackClock,
        timers: TimerQueue,
        events: EventLog,
        narrator: Narrator,
        completions: Vec<u64>,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                clock: PlaybackClock::new(),
                timers: TimerQueue::new(),
                events: EventLog::new(0),
                narrator: Narrator::new(&PlaybackConfig::default()),
                completions: Vec::new(),
            }
        }

        fn reveal(&mut self, text: &str) {
            let mut ctx = PlaybackContext {
                clock: &self.clock,
                timers: &mut self.timers,
                events: &mut self.events,
                iteration: 0,
            };
            if self.narrator.reveal(&mut ctx, text).is_some() {
                self.completions.push(self.clock.now());
            }
        }

        fn run_until(&mut self, target: u64) {
            while let Some(fired) = self.timers.pop_due(target) {
                self.clock.advance_to(fired.deadline);
                let mut ctx = PlaybackContext {
                    clock: &self.clock,
                    timers: &mut self.timers,
                    events: &mut self.events,
                    iteration: 0,
                };
                if self.narrator.on_timer(&mut ctx, fired).is_some() {
                    self.completions.push(self.clock.now());
                }
                assert!(self.timers.verify().is_ok());
            }
            self.clock.advance_to(target);
        }

        fn text(&self) -> &str {
            self.narrator.state().revealed_text()
        }
    }

    #[test]
    fn reveals_one_character_per_interval() {
        let mut rig = Rig::new();
        rig.reveal("ABC");
        assert_eq!(rig.text(), "");
        assert!(rig.narrator.state().is_speaking());

        let mut seen = Vec::new();
        for t in [25, 50, 75] {
            rig.run_until(t);
            seen.push(rig.text().to_string());
        }
        assert_eq!(seen, vec!["A", "AB", "ABC"]);
        assert!(rig.narrator.state().is_fully_revealed());
        // Still settling
        assert!(rig.narrator.state().is_speaking());
        assert!(rig.completions.is_empty());
    }

    #[test]
    fn completion_fires_once_after_settle() {
        let mut rig = Rig::new();
        rig.reveal("ABC");
        rig.run_until(374);
        assert!(rig.completions.is_empty());
        rig.run_until(375);
        assert_eq!(rig.completions, vec![3 * 25 + 300]);
        assert!(!rig.narrator.state().is_speaking());

        rig.run_until(5_000);
        assert_eq!(rig.completions.len(), 1);
        assert!(rig.timers.is_empty());
        assert_eq!(rig.text(), "ABC");
    }

    #[test]
    fn empty_reveal_completes_immediately() {
        let mut rig = Rig::new();
        rig.reveal("");
        assert_eq!(rig.completions, vec![0]);
        assert_eq!(rig.narrator.state().revealed_len(), 0);
        assert!(!rig.narrator.state().is_speaking());
        assert!(rig.timers.is_empty());
    }

    #[test]
    fn second_reveal_cancels_the_first() {
        let mut rig = Rig::new();
        rig.reveal("XXXXXXXX");
        rig.run_until(50);
        assert_eq!(rig.text(), "XX");

        rig.reveal("ab");
        assert_eq!(rig.text(), "");
        assert_eq!(rig.timers.active_for(TimerOwner::Narrator), 1);

        rig.run_until(75);
        assert_eq!(rig.text(), "a");
        rig.run_until(100);
        assert_eq!(rig.text(), "ab");
        rig.run_until(2_000);

        // Only the second caption ever completes
        assert_eq!(rig.completions, vec![50 + 2 * 25 + 300]);
        assert_eq!(rig.events.completed_captions(), vec!["ab"]);
        assert!(rig.events.events().iter().any(|e| matches!(
            &e.kind,
            PlaybackEventKind::LineInterrupted { text, revealed: 2 } if text == "XXXXXXXX"
        )));
    }

    #[test]
    fn reveal_during_settle_also_cancels() {
        let mut rig = Rig::new();
        rig.reveal("A");
        rig.run_until(100);
        assert!(rig.narrator.is_busy());

        rig.reveal("B");
        rig.run_until(1_000);
        assert_eq!(rig.events.completed_captions(), vec!["B"]);
        assert_eq!(rig.completions.len(), 1);
    }

    #[test]
    fn multibyte_characters_reveal_whole() {
        let mut rig = Rig::new();
        rig.reveal("né✓");
        rig.run_until(50);
        assert_eq!(rig.text(), "né");
        rig.run_until(75);
        assert_eq!(rig.text(), "né✓");
    }

    #[test]
    fn reset_clears_caption_and_timers() {
        let mut rig = Rig::new();
        rig.reveal("hello");
        rig.run_until(60);
        let mut ctx = PlaybackContext {
            clock: &rig.clock,
            timers: &mut rig.timers,
            events: &mut rig.events,
            iteration: 0,
        };
        rig.narrator.reset(&mut ctx);
        assert_eq!(rig.narrator.state(), &NarratorState::default());
        assert!(rig.timers.is_empty());
        rig.run_until(1_000);
        assert!(rig.completions.is_empty());
    }

    proptest! {
        #[test]
        fn completion_time_matches_length(text in "[a-zA-Z .]{1,60}") {
            let mut rig = Rig::new();
            rig.reveal(&text);
            let n = text.chars().count() as u64;
            let mut last_len = 0;
            let mut t = 0;
            while rig.completions.is_empty() {
                t += 5;
                rig.run_until(t);
                let visible = rig.text();
                prop_assert!(text.starts_with(visible));
                prop_assert!(visible.len() >= last_len);
                last_len = visible.len();
            }
            prop_assert_eq!(rig.completions[0], n * 25 + 300);
        }
    }
}
