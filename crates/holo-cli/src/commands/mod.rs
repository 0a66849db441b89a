pub mod play;
pub mod script;
pub mod trace;

use std::path::Path;

use holo_playback::{PlaybackConfig, Script, Sequencer};

/// Load a script file, or the built-in demo script when no path is given.
fn load_script(path: Option<&Path>) -> Result<Script, String> {
    match path {
        Some(path) => Script::from_path(path)
            .map_err(|e| format!("cannot load script '{}': {e}", path.display())),
        None => Ok(Script::demo()),
    }
}

/// Build a sequencer from command-line playback flags.
fn build_sequencer(
    path: Option<&Path>,
    reveal_ms: u64,
    settle_ms: u64,
    max_events: usize,
) -> Result<Sequencer, String> {
    let script = load_script(path)?;
    let config = PlaybackConfig::default()
        .with_reveal_interval(reveal_ms)
        .with_settle_delay(settle_ms)
        .with_max_events(max_events);
    Sequencer::new(script, config).map_err(|e| format!("invalid playback settings: {e}"))
}
