//! The particle collection and its per-frame physics step.

use std::f64::consts::TAU;

use super::config::{BoundaryPolicy, FieldConfig, MIN_OPACITY, MIN_RADIUS, OpacityRule, Tier};
use super::state::{Pointer, Viewport};
use super::theme::{ColorClass, Hsl};

/// Below this pointer distance no attraction is applied.
const MIN_ATTRACTION_DISTANCE: f64 = 0.001;

/// A single floating particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Radius chosen at creation; `radius` oscillates around it.
	pub base_radius: f64,
	pub radius: f64,
	pub opacity: f64,
	pub color: Hsl,
	/// Phase advance per frame for the opacity pulse.
	pub twinkle: f64,
	pub phase: f64,
	pub drift_speed: f64,
}

/// Owns the particle collection and advances it one frame at a time.
///
/// The collection is only ever replaced wholesale (on construction and
/// [`ParticleField::rebuild`]); no particle is added or removed in between.
pub struct ParticleField {
	pub particles: Vec<Particle>,
	config: FieldConfig,
	viewport: Viewport,
	tier: Tier,
}

impl ParticleField {
	pub fn new(config: FieldConfig, viewport: Viewport, rng: &mut fastrand::Rng) -> Self {
		let mut field = Self {
			particles: Vec::new(),
			config: config.sanitized(),
			viewport,
			tier: Tier::from_width(viewport.width),
		};
		field.rebuild(viewport, rng);
		field
	}

	pub fn config(&self) -> &FieldConfig {
		&self.config
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	pub fn tier(&self) -> Tier {
		self.tier
	}

	/// Swap in a new configuration and resample the collection under it.
	pub fn reconfigure(&mut self, config: FieldConfig, rng: &mut fastrand::Rng) {
		self.config = config.sanitized();
		self.rebuild(self.viewport, rng);
	}

	/// Discard every particle and sample a fresh set for `viewport`.
	pub fn rebuild(&mut self, viewport: Viewport, rng: &mut fastrand::Rng) {
		self.viewport = viewport;
		self.tier = Tier::from_width(viewport.width);

		let count = if viewport.is_empty() {
			0
		} else {
			Tier::particle_count(viewport.width)
		};

		let particles = (0..count).map(|_| self.spawn(rng)).collect();
		self.particles = particles;
	}

	fn spawn(&self, rng: &mut fastrand::Rng) -> Particle {
		let spec = self.tier.spec();
		let color = ColorClass::sample(rng);
		let radius = rng.f64() * spec.radius_span + MIN_RADIUS;
		let opacity = (rng.f64() * spec.opacity_span + MIN_OPACITY)
			.clamp(self.config.opacity_min, self.config.opacity_max);

		Particle {
			x: rng.f64() * self.viewport.width,
			y: rng.f64() * self.viewport.height,
			vx: (rng.f64() - 0.5) * spec.speed,
			vy: (rng.f64() - 0.5) * spec.speed,
			base_radius: radius,
			radius,
			opacity,
			color,
			twinkle: rng.f64() * 0.03 + 0.015,
			phase: rng.f64() * TAU,
			drift_speed: rng.f64() * 0.5 + 0.2,
		}
	}

	/// Advance every particle by one frame.
	///
	/// `time` is wall-clock seconds and only drives the smooth drift and the
	/// radius pulse; integration itself is one step per call.
	pub fn update(&mut self, pointer: Pointer, time: f64, rng: &mut fastrand::Rng) {
		let config = &self.config;
		let viewport = self.viewport;

		for p in &mut self.particles {
			attract(p, pointer, config);

			if let Some(amplitude) = config.drift {
				let angle = time * p.drift_speed + p.phase;
				p.vx += angle.sin() * amplitude;
				p.vy += angle.cos() * amplitude;
			}

			p.x += p.vx;
			p.y += p.vy;

			apply_boundary(p, config.boundary, viewport);
			update_opacity(p, config, rng);

			if let Some(pulse) = config.radius_pulse {
				let wave = (time * pulse.speed + p.phase).sin();
				p.radius = (p.base_radius * (1.0 - pulse.depth + wave * pulse.depth)).max(0.0);
			}

			p.vx *= config.damping;
			p.vy *= config.damping;

			recover_non_finite(p, config, viewport);
		}
	}
}

/// Pull `p` toward the pointer with a force that falls off linearly to zero
/// at the attraction radius.
fn attract(p: &mut Particle, pointer: Pointer, config: &FieldConfig) {
	let radius = config.attraction.radius;
	if radius <= 0.0 {
		return;
	}
	let (dx, dy) = (pointer.x - p.x, pointer.y - p.y);
	let distance = (dx * dx + dy * dy).sqrt();
	if !(MIN_ATTRACTION_DISTANCE..radius).contains(&distance) {
		return;
	}
	let force = (radius - distance) / radius * config.attraction.strength;
	p.vx += dx / distance * force;
	p.vy += dy / distance * force;
}

fn apply_boundary(p: &mut Particle, policy: BoundaryPolicy, viewport: Viewport) {
	match policy {
		BoundaryPolicy::Wrap { margin, damping } => {
			if p.x < -margin {
				p.x = viewport.width + margin;
				p.vx *= damping;
			}
			if p.x > viewport.width + margin {
				p.x = -margin;
				p.vx *= damping;
			}
			if p.y < -margin {
				p.y = viewport.height + margin;
				p.vy *= damping;
			}
			if p.y > viewport.height + margin {
				p.y = -margin;
				p.vy *= damping;
			}
		}
		BoundaryPolicy::Reflect => {
			if p.x < 0.0 || p.x > viewport.width {
				p.vx = -p.vx;
				p.x = p.x.clamp(0.0, viewport.width);
			}
			if p.y < 0.0 || p.y > viewport.height {
				p.vy = -p.vy;
				p.y = p.y.clamp(0.0, viewport.height);
			}
		}
	}
}

fn update_opacity(p: &mut Particle, config: &FieldConfig, rng: &mut fastrand::Rng) {
	let target = match config.opacity {
		OpacityRule::Pulse { base, amplitude } => {
			p.phase += p.twinkle;
			p.phase.sin() * amplitude + base
		}
		OpacityRule::RandomWalk { step } => p.opacity + (rng.f64() - 0.5) * step,
	};
	p.opacity = target.clamp(config.opacity_min, config.opacity_max);
}

/// Put a particle that picked up NaN/infinity back into a drawable state.
fn recover_non_finite(p: &mut Particle, config: &FieldConfig, viewport: Viewport) {
	if !(p.x.is_finite() && p.y.is_finite() && p.vx.is_finite() && p.vy.is_finite()) {
		(p.x, p.y) = viewport.center();
		(p.vx, p.vy) = (0.0, 0.0);
	}
	if !p.opacity.is_finite() {
		p.opacity = config.opacity_min;
	}
	if !p.radius.is_finite() {
		p.radius = p.base_radius;
	}
	if !p.phase.is_finite() {
		p.phase = 0.0;
	}
}
