use crate::clock::PlaybackClock;
use crate::event::{EventLog, PlaybackEvent, PlaybackEventKind};
use crate::timer::TimerQueue;

/// Mutable context handed to the narrator and progress driver.
pub struct PlaybackContext<'a> {
    /// Current playback time.
    pub clock: &'a PlaybackClock,
    /// Shared timer service.
    pub timers: &'a mut TimerQueue,
    /// Event log of the running playback.
    pub events: &'a mut EventLog,
    /// Script loop iteration currently playing.
    pub iteration: u64,
}

impl PlaybackContext<'_> {
    /// Emit a playback event at the current time.
    pub fn emit(&mut self, kind: PlaybackEventKind, description: impl Into<String>) {
        self.events.push(PlaybackEvent::new(
            self.clock.now(),
            self.iteration,
            kind,
            description,
        ));
    }

    /// Current playback time in milliseconds.
    pub fn now(&self) -> u64 {
        self.clock.now()
    }
}
