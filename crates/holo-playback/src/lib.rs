//! Scripted playback for the Holo assistant demo.
//!
//! A [`Sequencer`] plays a fixed [`Script`] of captions, pauses and
//! generation toggles in an endless loop. Captions are typed out by the
//! [`Narrator`]; generation progress is advanced by the [`ProgressDriver`].
//! Everything runs over a virtual-time [`TimerQueue`], so playback is fully
//! deterministic; the [`runtime`] module drives it on the tokio clock and
//! publishes a [`DisplayState`] per frame for a renderer to read.

/// Virtual playback clock.
pub mod clock;
/// Timing configuration for playback runs.
pub mod config;
/// Mutable context passed to the narrator and progress driver.
pub mod context;
/// Display state and presentation mode read by renderers.
pub mod display;
/// Animation levels derived from display state.
pub mod effects;
/// Error types for the playback crate.
pub mod error;
/// Playback event types and the event log.
pub mod event;
/// Typewriter caption narrator.
pub mod narrator;
/// Generation progress driver.
pub mod progress;
/// Real-time tokio driver for a sequencer.
pub mod runtime;
/// Scripts and their steps.
pub mod script;
/// Top-level playback sequencer.
pub mod sequencer;
/// Cancelable virtual-time timers.
pub mod timer;
/// Code workspace shown while generating.
pub mod workspace;

/// Re-export of [`clock::PlaybackClock`].
pub use clock::PlaybackClock;
/// Re-export of [`config::PlaybackConfig`].
pub use config::PlaybackConfig;
/// Re-export of [`context::PlaybackContext`].
pub use context::PlaybackContext;
/// Re-exports of [`display::DisplayState`] and [`display::Mode`].
pub use display::{DisplayState, Mode};
/// Re-export of [`effects::EffectLevels`].
pub use effects::EffectLevels;
/// Re-exports of [`error::PlaybackError`] and [`error::PlaybackResult`].
pub use error::{PlaybackError, PlaybackResult};
/// Re-exports of [`event::EventLog`], [`event::PlaybackEvent`], and [`event::PlaybackEventKind`].
pub use event::{EventLog, PlaybackEvent, PlaybackEventKind};
/// Re-exports of [`narrator::Narrator`] and [`narrator::NarratorState`].
pub use narrator::{Narrator, NarratorState};
/// Re-exports of [`progress::ProgressDriver`] and [`progress::ProgressState`].
pub use progress::{ProgressDriver, ProgressState};
/// Re-exports of the real-time driver types.
pub use runtime::{PlaybackHandle, RunSummary, RuntimeOptions};
/// Re-exports of [`script::Script`] and [`script::Step`].
pub use script::{Script, Step};
/// Re-export of [`sequencer::Sequencer`].
pub use sequencer::Sequencer;
/// Re-exports of the timer service types.
pub use timer::{TimerHandle, TimerKind, TimerQueue};
/// Re-exports of the code workspace types.
pub use workspace::{CodeWorkspace, WorkspaceView};
