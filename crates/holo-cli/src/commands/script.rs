use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use holo_playback::{PlaybackConfig, Step};

pub fn run(script: Option<&Path>, json: bool) -> Result<(), String> {
    let script = super::load_script(script)?;

    if json {
        let out = script
            .to_json()
            .map_err(|e| format!("cannot serialize script: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    let config = PlaybackConfig::default();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Step", "Detail", "Duration", "Starts at"]);

    let mut at = 0_u64;
    for (i, step) in script.steps().iter().enumerate() {
        let detail = match step {
            Step::Say { text } => text.clone(),
            Step::Wait { ms } => format!("{ms} ms"),
            Step::StartGeneration | Step::StopGeneration => String::new(),
        };
        let duration = step.duration_ms(&config);
        table.add_row(vec![
            i.to_string(),
            step.label().to_string(),
            detail,
            format!("{duration} ms"),
            format!("{:.3}s", at as f64 / 1000.0),
        ]);
        at = at.saturating_add(duration);
    }

    println!(
        "  {} {}",
        "Script".bold(),
        format!("({} steps, {} captions)", script.len(), script.captions().len()).dimmed()
    );
    println!();
    println!("{table}");
    println!();
    println!(
        "  One loop takes {} ms",
        script.loop_duration_ms(&config).to_string().bold()
    );
    Ok(())
}
