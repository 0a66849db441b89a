use crate::error::{PlaybackError, PlaybackResult};

/// Upper bound for every configured interval and delay, in milliseconds.
pub const MAX_INTERVAL_MS: u64 = 60_000;

/// Timing configuration for a playback run.
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Milliseconds between two revealed caption characters.
    pub reveal_interval_ms: u64,
    /// Pause after the last caption character before the line completes.
    pub settle_delay_ms: u64,
    /// Milliseconds between two progress ticks while generating.
    pub progress_interval_ms: u64,
    /// Progress gained per tick, in `(0, 1]`.
    pub progress_step: f64,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            reveal_interval_ms: 25,
            settle_delay_ms: 300,
            progress_interval_ms: 100,
            progress_step: 0.008,
            max_events: 0,
        }
    }
}

impl PlaybackConfig {
    /// Set the caption reveal interval.
    pub fn with_reveal_interval(mut self, ms: u64) -> Self {
        self.reveal_interval_ms = ms;
        self
    }

    /// Set the settle delay after a fully revealed caption.
    pub fn with_settle_delay(mut self, ms: u64) -> Self {
        self.settle_delay_ms = ms;
        self
    }

    /// Set the progress tick interval.
    pub fn with_progress_interval(mut self, ms: u64) -> Self {
        self.progress_interval_ms = ms;
        self
    }

    /// Set the progress gained per tick.
    pub fn with_progress_step(mut self, step: f64) -> Self {
        self.progress_step = step;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Reject configurations that would stall, never advance, or overflow.
    pub fn validate(&self) -> PlaybackResult<()> {
        if self.reveal_interval_ms == 0 {
            return Err(PlaybackError::InvalidInput(
                "reveal interval must be greater than zero".into(),
            ));
        }
        if self.progress_interval_ms == 0 {
            return Err(PlaybackError::InvalidInput(
                "progress interval must be greater than zero".into(),
            ));
        }
        for (name, ms) in [
            ("reveal interval", self.reveal_interval_ms),
            ("settle delay", self.settle_delay_ms),
            ("progress interval", self.progress_interval_ms),
        ] {
            if ms > MAX_INTERVAL_MS {
                return Err(PlaybackError::InvalidInput(format!(
                    "{name} must be at most {MAX_INTERVAL_MS} ms, got {ms}"
                )));
            }
        }
        if !(self.progress_step > 0.0 && self.progress_step <= 1.0) {
            return Err(PlaybackError::InvalidInput(format!(
                "progress step must be in (0, 1], got {}",
                self.progress_step
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = PlaybackConfig::default();
        assert_eq!(config.reveal_interval_ms, 25);
        assert_eq!(config.settle_delay_ms, 300);
        assert_eq!(config.progress_interval_ms, 100);
        assert!((config.progress_step - 0.008).abs() < f64::EPSILON);
        assert_eq!(config.max_events, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_builder_chain() {
        let config = PlaybackConfig::default()
            .with_reveal_interval(10)
            .with_settle_delay(50)
            .with_progress_interval(20)
            .with_progress_step(0.5)
            .with_max_events(100);
        assert_eq!(config.reveal_interval_ms, 10);
        assert_eq!(config.settle_delay_ms, 50);
        assert_eq!(config.progress_interval_ms, 20);
        assert!((config.progress_step - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.max_events, 100);
    }

    #[test]
    fn config_rejects_zero_intervals() {
        let config = PlaybackConfig::default().with_reveal_interval(0);
        assert!(matches!(
            config.validate(),
            Err(PlaybackError::InvalidInput(_))
        ));
        let config = PlaybackConfig::default().with_progress_interval(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_rejects_bad_progress_step() {
        assert!(
            PlaybackConfig::default()
                .with_progress_step(0.0)
                .validate()
                .is_err()
        );
        assert!(
            PlaybackConfig::default()
                .with_progress_step(1.5)
                .validate()
                .is_err()
        );
        assert!(
            PlaybackConfig::default()
                .with_progress_step(f64::NAN)
                .validate()
                .is_err()
        );
        assert!(
            PlaybackConfig::default()
                .with_progress_step(1.0)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn config_rejects_intervals_above_the_cap() {
        let huge = PlaybackConfig::default().with_reveal_interval(u64::MAX);
        assert!(matches!(huge.validate(), Err(PlaybackError::InvalidInput(_))));
        assert!(
            PlaybackConfig::default()
                .with_settle_delay(MAX_INTERVAL_MS + 1)
                .validate()
                .is_err()
        );
        assert!(
            PlaybackConfig::default()
                .with_progress_interval(u64::MAX)
                .validate()
                .is_err()
        );
        let edge = PlaybackConfig::default()
            .with_reveal_interval(MAX_INTERVAL_MS)
            .with_settle_delay(MAX_INTERVAL_MS)
            .with_progress_interval(MAX_INTERVAL_MS);
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn zero_settle_delay_is_allowed() {
        let config = PlaybackConfig::default().with_settle_delay(0);
        assert!(config.validate().is_ok());
    }
}
