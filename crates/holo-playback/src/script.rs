use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::PlaybackConfig;
use crate::error::{PlaybackError, PlaybackResult};

/// One instruction of a playback script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Reveal a caption and wait for it to settle.
    Say {
        /// Caption text.
        text: String,
    },
    /// Pure delay.
    Wait {
        /// Delay in milliseconds.
        ms: u64,
    },
    /// Switch generation mode on and restart progress from zero.
    StartGeneration,
    /// Switch generation mode off and reset progress to zero.
    StopGeneration,
}

impl Step {
    /// Convenience constructor for a `Say` step.
    pub fn say(text: impl Into<String>) -> Self {
        Self::Say { text: text.into() }
    }

    /// Convenience constructor for a `Wait` step.
    pub fn wait(ms: u64) -> Self {
        Self::Wait { ms }
    }

    /// Short lowercase label used in logs and tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Say { .. } => "say",
            Self::Wait { .. } => "wait",
            Self::StartGeneration => "start-generation",
            Self::StopGeneration => "stop-generation",
        }
    }

    /// How long this step takes to resolve under `config`.
    pub fn duration_ms(&self, config: &PlaybackConfig) -> u64 {
        match self {
            Self::Say { text } => {
                let chars = text.chars().count() as u64;
                chars
                    .saturating_mul(config.reveal_interval_ms)
                    .saturating_add(config.settle_delay_ms)
            }
            Self::Wait { ms } => *ms,
            Self::StartGeneration | Self::StopGeneration => 0,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Say { text } => write!(f, "say \"{text}\""),
            Self::Wait { ms } => write!(f, "wait {ms}ms"),
            Self::StartGeneration => write!(f, "start generation"),
            Self::StopGeneration => write!(f, "stop generation"),
        }
    }
}

#[derive(Deserialize)]
struct ScriptFile {
    steps: Vec<Step>,
}

/// An immutable, validated sequence of steps played in a loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    /// Build a script, rejecting ones that cannot loop sensibly.
    ///
    /// A script must have at least one step, no empty captions, and at
    /// least one step that takes time (a caption or a non-zero wait).
    pub fn new(steps: Vec<Step>) -> PlaybackResult<Self> {
        if steps.is_empty() {
            return Err(PlaybackError::InvalidInput("script has no steps".into()));
        }
        if let Some(idx) = steps
            .iter()
            .position(|s| matches!(s, Step::Say { text } if text.is_empty()))
        {
            return Err(PlaybackError::InvalidInput(format!(
                "step {idx} has an empty caption"
            )));
        }
        let takes_time = steps.iter().any(|s| match s {
            Step::Say { .. } => true,
            Step::Wait { ms } => *ms > 0,
            Step::StartGeneration | Step::StopGeneration => false,
        });
        if !takes_time {
            return Err(PlaybackError::InvalidInput(
                "script never waits; it would loop without advancing time".into(),
            ));
        }
        Ok(Self { steps })
    }

    /// Parse and validate a script from JSON of the form `{"steps": [...]}`.
    pub fn from_json(json: &str) -> PlaybackResult<Self> {
        let file: ScriptFile = serde_json::from_str(json)?;
        Self::new(file.steps)
    }

    /// Read, parse and validate a JSON script file.
    pub fn from_path(path: &Path) -> PlaybackResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize the script as pretty-printed JSON.
    pub fn to_json(&self) -> PlaybackResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The holographic assistant demo script.
    pub fn demo() -> Self {
        Self {
            steps: vec![
                Step::say("Good evening, sir. JARVIS online and ready."),
                Step::wait(2000),
                Step::say(
                    "Prompt received: 'Build me an AI assistant with OpenAI integration, \
                     voice input, and text-to-speech capabilities.'",
                ),
                Step::wait(1500),
                Step::say("Analyzing requirements... Identifying optimal architecture patterns."),
                Step::wait(1000),
                Step::say(
                    "Initiating code generation sequence. Deploying holographic workspace.",
                ),
                Step::wait(500),
                Step::StartGeneration,
                Step::say(
                    "Generating OpenAI integration module... Creating React hooks... \
                     Implementing voice recognition... Configuring text-to-speech engine...",
                ),
                Step::wait(8000),
                Step::say(
                    "Building type definitions... Setting up configuration schema... \
                     Optimizing bundle structure...",
                ),
                Step::wait(6000),
                Step::say(
                    "Code generation complete. 8 files created. All modules compiled \
                     successfully. System ready for deployment.",
                ),
                Step::wait(3000),
                Step::StopGeneration,
                Step::wait(2000),
            ],
        }
    }

    /// All steps in order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps in one loop.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false` for a validated script.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Captions in script order.
    pub fn captions(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|s| match s {
                Step::Say { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Length of one full loop under `config`, saturating at `u64::MAX`.
    pub fn loop_duration_ms(&self, config: &PlaybackConfig) -> u64 {
        self.steps
            .iter()
            .fold(0_u64, |total, s| total.saturating_add(s.duration_ms(config)))
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::demo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_script_is_valid() {
        let demo = Script::demo();
        let rebuilt = Script::new(demo.steps().to_vec()).unwrap();
        assert_eq!(rebuilt, demo);
        assert_eq!(demo.len(), 17);
        assert_eq!(demo.captions().len(), 7);
        assert!(demo.captions()[1].starts_with("Prompt received: 'Build me an AI assistant"));
    }

    #[test]
    fn demo_generation_brackets_three_captions() {
        let demo = Script::demo();
        let start = demo
            .steps()
            .iter()
            .position(|s| *s == Step::StartGeneration)
            .unwrap();
        let stop = demo
            .steps()
            .iter()
            .position(|s| *s == Step::StopGeneration)
            .unwrap();
        let inside = demo.steps()[start..stop]
            .iter()
            .filter(|s| matches!(s, Step::Say { .. }))
            .count();
        assert_eq!(inside, 3);
    }

    #[test]
    fn rejects_empty_script() {
        assert!(matches!(
            Script::new(vec![]),
            Err(PlaybackError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_empty_caption() {
        let err = Script::new(vec![Step::wait(10), Step::say("")]).unwrap_err();
        assert!(err.to_string().contains("step 1"));
    }

    #[test]
    fn rejects_script_that_never_waits() {
        let steps = vec![Step::StartGeneration, Step::wait(0), Step::StopGeneration];
        assert!(Script::new(steps).is_err());
    }

    #[test]
    fn step_durations() {
        let config = PlaybackConfig::default();
        assert_eq!(Step::say("ABC").duration_ms(&config), 375);
        assert_eq!(Step::wait(1500).duration_ms(&config), 1500);
        assert_eq!(Step::StartGeneration.duration_ms(&config), 0);
    }

    #[test]
    fn loop_duration_sums_steps() {
        let script = Script::new(vec![Step::say("AB"), Step::wait(100)]).unwrap();
        assert_eq!(
            script.loop_duration_ms(&PlaybackConfig::default()),
            2 * 25 + 300 + 100
        );
    }

    #[test]
    fn durations_saturate_instead_of_overflowing() {
        let config = PlaybackConfig::default().with_reveal_interval(u64::MAX);
        assert_eq!(Step::say("ABC").duration_ms(&config), u64::MAX);
        assert_eq!(Script::demo().loop_duration_ms(&config), u64::MAX);

        let script = Script::new(vec![Step::wait(u64::MAX), Step::wait(u64::MAX)]).unwrap();
        assert_eq!(
            script.loop_duration_ms(&PlaybackConfig::default()),
            u64::MAX
        );
    }

    #[test]
    fn parses_json_script() {
        let json = r#"{
            "steps": [
                {"step": "say", "text": "Hello"},
                {"step": "wait", "ms": 250},
                {"step": "start_generation"},
                {"step": "stop_generation"}
            ]
        }"#;
        let script = Script::from_json(json).unwrap();
        assert_eq!(
            script.steps(),
            &[
                Step::say("Hello"),
                Step::wait(250),
                Step::StartGeneration,
                Step::StopGeneration,
            ]
        );
    }

    #[test]
    fn json_round_trip_of_demo() {
        let json = Script::demo().to_json().unwrap();
        assert_eq!(Script::from_json(&json).unwrap(), Script::demo());
    }

    #[test]
    fn malformed_json_is_a_format_error() {
        let err = Script::from_json(r#"{"steps": [{"step": "dance"}]}"#).unwrap_err();
        assert!(matches!(err, PlaybackError::ScriptFormat(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Script::from_path(Path::new("/nonexistent/holo/script.json")).unwrap_err();
        assert!(matches!(err, PlaybackError::Io(_)));
    }

    #[test]
    fn step_display_and_label() {
        assert_eq!(Step::say("hi").to_string(), "say \"hi\"");
        assert_eq!(Step::wait(5).to_string(), "wait 5ms");
        assert_eq!(Step::StopGeneration.label(), "stop-generation");
    }
}
