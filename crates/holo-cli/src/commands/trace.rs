use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use holo_playback::{PlaybackEvent, PlaybackEventKind, Sequencer};

pub fn run(
    script: Option<&Path>,
    reveal_ms: u64,
    settle_ms: u64,
    loops: u64,
    verbose: bool,
) -> Result<(), String> {
    if loops == 0 {
        return Err("--loops must be at least 1".into());
    }

    let mut seq = super::build_sequencer(script, reveal_ms, settle_ms, 0)?;
    seq.run_loops(loops)
        .map_err(|e| format!("playback error: {e}"))?;

    let source = script
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "demo".to_string());
    println!(
        "  {} '{}' {}",
        "Trace".bold(),
        source,
        format!("({loops} loops, reveal={reveal_ms}ms/char, settle={settle_ms}ms)").dimmed()
    );
    println!(
        "  {} steps executed, {} events logged",
        seq.steps_executed(),
        seq.events().len()
    );
    println!();

    print_captions(&seq);
    print_generation(&seq);

    if verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in seq.events().events() {
            println!("  {} {}", time_label(event), colorize_event(event));
        }
        println!();
    }

    print_summary(&seq);
    Ok(())
}

fn time_label(event: &PlaybackEvent) -> String {
    format!(
        "[{:>8.3}s #{}]",
        event.at_ms as f64 / 1000.0,
        event.iteration
    )
    .dimmed()
    .to_string()
}

fn print_captions(seq: &Sequencer) {
    println!("  {}", "Captions".bold().underline());
    let completed: Vec<_> = seq
        .events()
        .events()
        .iter()
        .filter(|e| matches!(e.kind, PlaybackEventKind::LineCompleted { .. }))
        .collect();
    for event in &completed {
        if let Some(text) = event.kind.caption() {
            println!("  {} {}", time_label(event), text.cyan());
        }
    }
    if completed.is_empty() {
        println!("  {}", "(no captions)".dimmed());
    }
    println!();
}

fn print_generation(seq: &Sequencer) {
    println!("  {}", "Generation".bold().underline());
    let mut started: Option<u64> = None;
    let mut any = false;
    for event in seq.events().events() {
        match event.kind {
            PlaybackEventKind::GenerationStarted => started = Some(event.at_ms),
            PlaybackEventKind::GenerationStopped => {
                if let Some(from) = started.take() {
                    any = true;
                    println!(
                        "  {} {:.3}s -> {:.3}s {}",
                        "GEN".magenta().bold(),
                        from as f64 / 1000.0,
                        event.at_ms as f64 / 1000.0,
                        format!("({} ms)", event.at_ms - from).dimmed()
                    );
                }
            }
            _ => {}
        }
    }
    if let Some(from) = started {
        any = true;
        println!(
            "  {} {:.3}s -> {}",
            "GEN".magenta().bold(),
            from as f64 / 1000.0,
            "(still running)".dimmed()
        );
    }
    if !any {
        println!("  {}", "(never generated)".dimmed());
    }
    println!();
}

fn print_summary(seq: &Sequencer) {
    println!("  {}", "Summary".bold().underline());
    println!();

    let config = seq.config();
    let loop_ms = seq.script().loop_duration_ms(config);
    let captions = seq
        .events()
        .events()
        .iter()
        .filter(|e| matches!(e.kind, PlaybackEventKind::LineCompleted { .. }))
        .count();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Loops".to_string(), seq.iteration().to_string()]);
    table.add_row(vec![
        "Steps executed".to_string(),
        seq.steps_executed().to_string(),
    ]);
    table.add_row(vec!["Captions completed".to_string(), captions.to_string()]);
    table.add_row(vec!["Loop duration".to_string(), format!("{loop_ms} ms")]);
    table.add_row(vec!["Playback time".to_string(), format!("{} ms", seq.now())]);

    println!("{table}");
}

fn colorize_event(event: &PlaybackEvent) -> String {
    let desc = &event.description;
    match &event.kind {
        PlaybackEventKind::StepStarted { .. } => desc.normal().to_string(),
        PlaybackEventKind::LoopCompleted { .. } => desc.green().bold().to_string(),
        PlaybackEventKind::Cancelled => desc.red().bold().to_string(),
        PlaybackEventKind::LineStarted { .. } | PlaybackEventKind::LineRevealed { .. } => {
            desc.cyan().to_string()
        }
        PlaybackEventKind::LineCompleted { .. } => desc.cyan().bold().to_string(),
        PlaybackEventKind::LineInterrupted { .. } => desc.yellow().to_string(),
        PlaybackEventKind::GenerationStarted
        | PlaybackEventKind::ProgressSaturated
        | PlaybackEventKind::GenerationStopped => desc.magenta().to_string(),
    }
}
