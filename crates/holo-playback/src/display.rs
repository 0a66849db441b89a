use std::fmt;

use crate::workspace::WorkspaceView;

/// Coarse presentation mode derived from the speaking and generating flags.
///
/// Generating wins over speaking: captions keep updating during generation,
/// but the scene stays in its generation look. Consumers that care about
/// both flags read them from [`DisplayState`] directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Nothing is happening.
    #[default]
    Idle,
    /// A caption is revealing or settling.
    Speaking,
    /// Generation mode is on.
    Generating,
}

impl Mode {
    /// Derive the mode from the two raw flags.
    pub fn derive(speaking: bool, generating: bool) -> Self {
        if generating {
            Self::Generating
        } else if speaking {
            Self::Speaking
        } else {
            Self::Idle
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Speaking => write!(f, "speaking"),
            Self::Generating => write!(f, "generating"),
        }
    }
}

/// Everything a renderer reads for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    /// Derived presentation mode.
    pub mode: Mode,
    /// Whether a caption is revealing or settling.
    pub speaking: bool,
    /// Whether generation mode is on.
    pub generating: bool,
    /// The visible part of the current caption.
    pub caption: String,
    /// Generation progress in `[0, 1]`.
    pub progress: f64,
    /// Index of the step currently executing.
    pub step: usize,
    /// Script loop iteration (0-based).
    pub iteration: u64,
    /// Playback time in milliseconds.
    pub elapsed_ms: u64,
    /// Code workspace contents.
    pub workspace: WorkspaceView,
}

impl DisplayState {
    /// Progress as a whole percentage, rounded down.
    pub fn percent(&self) -> u8 {
        (self.progress.clamp(0.0, 1.0) * 100.0).floor() as u8
    }

    /// Playback time in seconds, for animation phases.
    pub fn seconds(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }
}
