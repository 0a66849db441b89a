/// What kind of playback event occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEventKind {
    // Sequencer
    /// A script step began executing.
    StepStarted {
        /// Position of the step in the script.
        index: usize,
        /// Short label of the step.
        step: String,
    },
    /// The last script step finished and playback wrapped to the start.
    LoopCompleted {
        /// The iteration that just finished (0-based).
        iteration: u64,
    },
    /// Playback was cancelled and every pending timer released.
    Cancelled,

    // Narrator
    /// A caption began revealing.
    LineStarted {
        /// The full caption text.
        text: String,
    },
    /// The last character of a caption became visible.
    LineRevealed {
        /// The full caption text.
        text: String,
    },
    /// A caption finished its settle pause and signalled completion.
    LineCompleted {
        /// The full caption text.
        text: String,
    },
    /// A caption was cut off by a newer reveal or by a reset.
    LineInterrupted {
        /// The caption text that was cut off.
        text: String,
        /// Characters visible when it was cut off.
        revealed: usize,
    },

    // Progress
    /// Generation mode was switched on.
    GenerationStarted,
    /// Generation progress reached 1.
    ProgressSaturated,
    /// Generation mode was switched off.
    GenerationStopped,
}

impl PlaybackEventKind {
    /// The caption text carried by narrator events.
    pub fn caption(&self) -> Option<&str> {
        match self {
            Self::LineStarted { text }
            | Self::LineRevealed { text }
            | Self::LineCompleted { text }
            | Self::LineInterrupted { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// A record of something that happened during playback.
#[derive(Debug, Clone)]
pub struct PlaybackEvent {
    /// Playback time in milliseconds when the event occurred.
    pub at_ms: u64,
    /// Script loop iteration the event belongs to.
    pub iteration: u64,
    /// The specific kind of event.
    pub kind: PlaybackEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl PlaybackEvent {
    /// Create a new playback event.
    pub fn new(
        at_ms: u64,
        iteration: u64,
        kind: PlaybackEventKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            at_ms,
            iteration,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events during playback.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<PlaybackEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: PlaybackEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[PlaybackEvent] {
        &self.events
    }

    /// Return all events recorded during the given loop iteration.
    pub fn events_in_iteration(&self, iteration: u64) -> Vec<&PlaybackEvent> {
        self.events
            .iter()
            .filter(|e| e.iteration == iteration)
            .collect()
    }

    /// Texts of completed captions, in completion order.
    pub fn completed_captions(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match &e.kind {
                PlaybackEventKind::LineCompleted { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
