/// Tracks playback time in milliseconds of virtual time.
///
/// The clock never moves backwards: timers fire at their exact deadlines
/// while the sequencer walks forward, then the clock settles on the
/// requested target.
#[derive(Debug, Clone, Default)]
pub struct PlaybackClock {
    now_ms: u64,
}

impl PlaybackClock {
    /// Create a new clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the current time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Move the clock forward to `at_ms`. Earlier instants are ignored.
    pub fn advance_to(&mut self, at_ms: u64) -> u64 {
        self.now_ms = self.now_ms.max(at_ms);
        self.now_ms
    }

    /// Move the clock forward by `delta_ms`. Returns the new time.
    pub fn advance_by(&mut self, delta_ms: u64) -> u64 {
        self.now_ms = self.now_ms.saturating_add(delta_ms);
        self.now_ms
    }

    /// Elapsed seconds as a float, used for animation phases.
    pub fn seconds(&self) -> f64 {
        self.now_ms as f64 / 1000.0
    }
}
