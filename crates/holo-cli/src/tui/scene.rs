//! The hologram: a pulsing core, tilted rings, orbiting particles and a
//! drifting star field, drawn on a braille canvas.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Circle, Points};
use ratatui::widgets::{Block, Borders};

use holo_playback::{DisplayState, EffectLevels};

const PARTICLES: usize = 48;
const STARS: usize = 80;
const RING_POINTS: usize = 64;

/// Base radius, tilt and speed of each ring.
const RINGS: [(f64, f64, f64); 3] = [(0.45, 0.35, 0.6), (0.6, 0.2, -0.4), (0.75, 0.5, 0.25)];

#[derive(Debug, Clone, Copy)]
struct Particle {
    radius: f64,
    phase: f64,
    speed: f64,
    tilt: f64,
}

#[derive(Debug, Clone, Copy)]
struct Star {
    x: f64,
    y: f64,
    drift: f64,
}

/// Particle and star placement, fixed for a run.
#[derive(Debug, Clone)]
pub struct Scene {
    particles: Vec<Particle>,
    stars: Vec<Star>,
}

impl Scene {
    /// Place particles and stars from `seed`.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let particles = (0..PARTICLES)
            .map(|_| Particle {
                radius: rng.random_range(0.3..0.95),
                phase: rng.random_range(0.0..TAU),
                speed: rng.random_range(0.2..0.6),
                tilt: rng.random_range(0.2..0.9),
            })
            .collect();
        let stars = (0..STARS)
            .map(|_| Star {
                x: rng.random_range(-1.0..1.0),
                y: rng.random_range(-1.0..1.0),
                drift: rng.random_range(0.02..0.08),
            })
            .collect();
        Self { particles, stars }
    }

    /// Draw the scene for `state` into `area`.
    pub fn draw(&self, frame: &mut Frame, area: Rect, state: &DisplayState) {
        let levels = EffectLevels::for_state(state);
        let t = state.seconds();
        let aspect = f64::from(area.width) / (2.0 * f64::from(area.height.max(1)));
        let breath = levels.breath_scale(t);
        let accent = if state.generating {
            Color::LightMagenta
        } else {
            Color::Cyan
        };

        let stars = self.star_points(t, &levels, aspect);
        let particles = self.particle_points(t, &levels, breath);
        let rings: Vec<Vec<(f64, f64)>> = RINGS
            .iter()
            .map(|&(radius, tilt, speed)| {
                ring_points(radius * breath, tilt, levels.ring_angle(t, speed))
            })
            .collect();
        let core = 0.18 * levels.core_scale(t) * breath;

        let title = if state.generating { " HOLO · generating " } else { " HOLO " };
        let canvas = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(accent))
                    .title(title),
            )
            .marker(Marker::Braille)
            .x_bounds([-aspect, aspect])
            .y_bounds([-1.0, 1.0])
            .paint(move |ctx| {
                ctx.draw(&Points {
                    coords: &stars,
                    color: Color::DarkGray,
                });
                for ring in &rings {
                    ctx.draw(&Points {
                        coords: ring,
                        color: Color::Blue,
                    });
                }
                ctx.draw(&Points {
                    coords: &particles,
                    color: accent,
                });
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: core,
                    color: Color::White,
                });
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: core * 0.6,
                    color: accent,
                });
            });
        frame.render_widget(canvas, area);
    }

    fn star_points(&self, t: f64, levels: &EffectLevels, aspect: f64) -> Vec<(f64, f64)> {
        self.stars
            .iter()
            .map(|s| {
                let y = wrap(s.y - t * s.drift * levels.star_speed);
                (s.x * aspect, y)
            })
            .collect()
    }

    fn particle_points(&self, t: f64, levels: &EffectLevels, breath: f64) -> Vec<(f64, f64)> {
        self.particles
            .iter()
            .map(|p| {
                let angle = p.phase + t * p.speed * levels.particle_speed;
                let r = p.radius * breath;
                (angle.cos() * r, angle.sin() * r * p.tilt)
            })
            .collect()
    }
}

/// Points of an ellipse of `radius`, flattened by `tilt`, rotated by `angle`.
fn ring_points(radius: f64, tilt: f64, angle: f64) -> Vec<(f64, f64)> {
    let (sin_a, cos_a) = angle.sin_cos();
    (0..RING_POINTS)
        .map(|i| {
            let theta = TAU * i as f64 / RING_POINTS as f64;
            let x = theta.cos() * radius;
            let y = theta.sin() * radius * tilt;
            (x * cos_a - y * sin_a, x * sin_a + y * cos_a)
        })
        .collect()
}

/// Wrap `v` into `[-1, 1)`.
fn wrap(v: f64) -> f64 {
    (v + 1.0).rem_euclid(2.0) - 1.0
}
