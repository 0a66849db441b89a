use crate::display::DisplayState;

/// Animation parameters a renderer derives from the current display state.
///
/// Core, ring and particle motion follow the speaking flag; the ambient
/// scene (stars, bloom, rotation, breathing) follows the generating flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectLevels {
    /// Angular speed of the core pulse.
    pub pulse_speed: f64,
    /// Relative amplitude of the core pulse.
    pub pulse_amount: f64,
    /// Multiplier on ring rotation speed.
    pub ring_speed: f64,
    /// Multiplier on orbital particle speed.
    pub particle_speed: f64,
    /// Background star drift speed.
    pub star_speed: f64,
    /// Bloom intensity.
    pub bloom: f64,
    /// Camera auto-rotation speed.
    pub auto_rotate: f64,
    /// Relative amplitude of the whole-scene breathing.
    pub breath_amount: f64,
    /// Angular speed of the whole-scene breathing.
    pub breath_speed: f64,
}

impl EffectLevels {
    /// Levels for the given flags.
    pub fn new(speaking: bool, generating: bool) -> Self {
        let (pulse_speed, pulse_amount, ring_speed, particle_speed) = if speaking {
            (12.0, 0.2, 2.5, 4.0)
        } else {
            (3.0, 0.08, 1.0, 1.5)
        };
        let (star_speed, bloom, auto_rotate, breath_amount, breath_speed) = if generating {
            (2.0, 2.5, 0.5, 0.1, 1.0)
        } else {
            (0.5, 2.0, 0.2, 0.05, 0.5)
        };
        Self {
            pulse_speed,
            pulse_amount,
            ring_speed,
            particle_speed,
            star_speed,
            bloom,
            auto_rotate,
            breath_amount,
            breath_speed,
        }
    }

    /// Levels for a display snapshot.
    pub fn for_state(state: &DisplayState) -> Self {
        Self::new(state.speaking, state.generating)
    }

    /// Scale of the inner core at time `t` seconds.
    pub fn core_scale(&self, t: f64) -> f64 {
        1.0 + (t * self.pulse_speed).sin() * self.pulse_amount
    }

    /// Scale of the whole scene at time `t` seconds.
    pub fn breath_scale(&self, t: f64) -> f64 {
        1.0 + (t * self.breath_speed).sin() * self.breath_amount
    }

    /// Ring rotation angle in radians at time `t` for a ring of base `speed`.
    pub fn ring_angle(&self, t: f64, speed: f64) -> f64 {
        t * speed * self.ring_speed
    }
}
