use std::path::Path;

use tracing::info;

use holo_playback::RuntimeOptions;
use holo_playback::runtime;

use crate::tui::{self, Scene};

pub fn run(
    script: Option<&Path>,
    reveal_ms: u64,
    settle_ms: u64,
    speed: f64,
    seed: u64,
) -> Result<(), String> {
    // Keep the live event log bounded.
    let sequencer = super::build_sequencer(script, reveal_ms, settle_ms, 256)?;
    let options = RuntimeOptions::default().with_time_scale(speed);
    options
        .validate()
        .map_err(|e| format!("invalid playback settings: {e}"))?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("cannot start runtime: {e}"))?;

    let handle = {
        let _enter = rt.enter();
        runtime::spawn(sequencer, options)
    };

    let scene = Scene::new(seed);
    let rendered = tui::run(&handle, &scene);

    let summary = rt
        .block_on(handle.shutdown())
        .map_err(|e| format!("playback error: {e}"))?;
    info!(
        target: "holo::runtime",
        elapsed_ms = summary.elapsed_ms,
        loops = summary.iterations,
        frames = summary.frames,
        "play finished"
    );
    rendered
}
