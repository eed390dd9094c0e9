//! Frame rendering for the particle field.
//!
//! Drawing happens in passes for correct z-ordering:
//! 1. Clear the surface
//! 2. Connection lines between nearby particles
//! 3. Glow layers per particle, then optional sparkle rays on top

use std::f64::consts::TAU;

use super::particles::{Particle, ParticleField};
use super::surface::{DrawSurface, Stroke};
use super::theme::{ConnectionStyle, LayerFill, SparkleStyle};

/// Linear falloff for a connection: 1 at zero distance, 0 at the threshold.
///
/// Returns `None` unless `distance` is strictly below `threshold`.
pub fn connection_strength(distance: f64, threshold: f64) -> Option<f64> {
	if threshold > 0.0 && distance < threshold {
		Some((threshold - distance) / threshold)
	} else {
		None
	}
}

/// Every unordered pair of particles closer than `threshold`, with its
/// connection strength.
pub fn connected_pairs(
	particles: &[Particle],
	threshold: f64,
) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
	particles.iter().enumerate().flat_map(move |(i, a)| {
		particles[i + 1..]
			.iter()
			.enumerate()
			.filter_map(move |(offset, b)| {
				let (dx, dy) = (a.x - b.x, a.y - b.y);
				let distance = (dx * dx + dy * dy).sqrt();
				connection_strength(distance, threshold).map(|f| (i, i + 1 + offset, f))
			})
	})
}

/// Renders one complete frame.
///
/// `time` is wall-clock seconds (drives sparkle rotation); `rng` gates which
/// particles sparkle this frame.
pub fn render<S: DrawSurface + ?Sized>(
	field: &ParticleField,
	surface: &mut S,
	time: f64,
	rng: &mut fastrand::Rng,
) {
	let viewport = field.viewport();
	surface.clear(viewport.width, viewport.height);

	let config = field.config();
	draw_connections(&field.particles, surface, &config.connection);

	for p in &field.particles {
		surface.save();
		draw_glow(p, surface, field);
		if let Some(sparkle) = &config.sparkle {
			if rng.f64() < sparkle.probability {
				draw_sparkle(p, surface, sparkle, time);
			}
		}
		surface.restore();
	}
}

fn draw_connections<S: DrawSurface + ?Sized>(
	particles: &[Particle],
	surface: &mut S,
	style: &ConnectionStyle,
) {
	for (i, j, f) in connected_pairs(particles, style.distance) {
		let (a, b) = (&particles[i], &particles[j]);
		let stroke = if style.gradient {
			let end = style.end_color.with_alpha(f * style.end_alpha);
			Stroke::Gradient(vec![
				(0.0, end),
				(0.5, style.mid_color.with_alpha(f * style.mid_alpha)),
				(1.0, end),
			])
		} else {
			Stroke::Solid(style.mid_color.with_alpha(f * style.mid_alpha))
		};

		surface.save();
		surface.stroke_line((a.x, a.y), (b.x, b.y), &stroke, f * style.max_width);
		surface.restore();
	}
}

fn draw_glow<S: DrawSurface + ?Sized>(p: &Particle, surface: &mut S, field: &ParticleField) {
	let particle_color = p.color.to_css();
	for layer in &field.config().glow {
		surface.set_global_alpha((p.opacity * layer.alpha_scale).clamp(0.0, 1.0));
		let radius = p.radius * layer.radius_scale;
		match layer.fill {
			LayerFill::Particle => surface.fill_circle(p.x, p.y, radius, &particle_color),
			LayerFill::Solid(color) => surface.fill_circle(p.x, p.y, radius, &color.to_css()),
		}
	}
}

fn draw_sparkle<S: DrawSurface + ?Sized>(
	p: &Particle,
	surface: &mut S,
	style: &SparkleStyle,
	time: f64,
) {
	if style.rays == 0 {
		return;
	}
	surface.set_global_alpha((p.opacity * 0.8).clamp(0.0, 1.0));
	let stroke = Stroke::Solid(style.color);
	let (inner, outer) = (p.radius * style.inner, p.radius * style.length);

	for i in 0..style.rays {
		let angle = i as f64 * TAU / style.rays as f64 + time * style.spin;
		let (cos, sin) = (angle.cos(), angle.sin());
		surface.stroke_line(
			(p.x + cos * inner, p.y + sin * inner),
			(p.x + cos * outer, p.y + sin * outer),
			&stroke,
			style.line_width,
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_field::config::FieldConfig;
	use crate::components::particle_field::state::Viewport;
	use crate::components::particle_field::theme::{Color, Hsl, SparkleStyle};

	#[derive(Debug, PartialEq)]
	enum Op {
		Clear(f64, f64),
		Save,
		Restore,
		Alpha(f64),
		Circle { x: f64, y: f64, radius: f64, color: String },
		Line { from: (f64, f64), to: (f64, f64), stroke: Stroke, width: f64 },
	}

	#[derive(Default)]
	struct Recorder {
		ops: Vec<Op>,
	}

	impl Recorder {
		fn lines(&self) -> Vec<&Op> {
			self.ops.iter().filter(|op| matches!(op, Op::Line { .. })).collect()
		}

		fn circles(&self) -> Vec<&Op> {
			self.ops.iter().filter(|op| matches!(op, Op::Circle { .. })).collect()
		}
	}

	impl DrawSurface for Recorder {
		fn clear(&mut self, width: f64, height: f64) {
			self.ops.push(Op::Clear(width, height));
		}
		fn save(&mut self) {
			self.ops.push(Op::Save);
		}
		fn restore(&mut self) {
			self.ops.push(Op::Restore);
		}
		fn set_global_alpha(&mut self, alpha: f64) {
			self.ops.push(Op::Alpha(alpha));
		}
		fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str) {
			self.ops.push(Op::Circle {
				x,
				y,
				radius,
				color: color.to_string(),
			});
		}
		fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), stroke: &Stroke, width: f64) {
			self.ops.push(Op::Line {
				from,
				to,
				stroke: stroke.clone(),
				width,
			});
		}
	}

	fn particle(x: f64, y: f64, radius: f64, opacity: f64) -> Particle {
		Particle {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			base_radius: radius,
			radius,
			opacity,
			color: Hsl::new(210.0, 25.0, 70.0),
			twinkle: 0.02,
			phase: 0.0,
			drift_speed: 0.3,
		}
	}

	fn field_with(config: FieldConfig, particles: Vec<Particle>) -> ParticleField {
		let mut rng = fastrand::Rng::with_seed(0);
		let mut field = ParticleField::new(config, Viewport::new(800.0, 600.0), &mut rng);
		field.particles = particles;
		field
	}

	fn no_sparkle(config: FieldConfig) -> FieldConfig {
		FieldConfig {
			sparkle: None,
			..config
		}
	}

	#[test]
	fn strength_is_strict_and_linear() {
		assert_eq!(connection_strength(0.0, 140.0), Some(1.0));
		assert_eq!(connection_strength(70.0, 140.0), Some(0.5));
		assert_eq!(connection_strength(140.0, 140.0), None);
		assert_eq!(connection_strength(10.0, 0.0), None);
		assert_eq!(connection_strength(f64::NAN, 140.0), None);
	}

	#[test]
	fn connects_just_inside_threshold_only() {
		let threshold = FieldConfig::twinkle().connection.distance;
		let inside = vec![
			particle(100.0, 100.0, 1.0, 1.0),
			particle(100.0 + threshold - 1.0, 100.0, 1.0, 1.0),
		];
		let outside = vec![
			particle(100.0, 100.0, 1.0, 1.0),
			particle(100.0 + threshold + 1.0, 100.0, 1.0, 1.0),
		];

		let pairs: Vec<_> = connected_pairs(&inside, threshold).collect();
		assert_eq!(pairs.len(), 1);
		assert_eq!((pairs[0].0, pairs[0].1), (0, 1));
		assert!((pairs[0].2 - 1.0 / threshold).abs() < 1e-12);
		assert_eq!(connected_pairs(&outside, threshold).count(), 0);

		let mut rng = fastrand::Rng::with_seed(1);
		let mut surface = Recorder::default();
		render(
			&field_with(no_sparkle(FieldConfig::twinkle()), inside),
			&mut surface,
			0.0,
			&mut rng,
		);
		assert_eq!(surface.lines().len(), 1);

		let mut surface = Recorder::default();
		render(
			&field_with(no_sparkle(FieldConfig::twinkle()), outside),
			&mut surface,
			0.0,
			&mut rng,
		);
		assert!(surface.lines().is_empty());
	}

	#[test]
	fn pairs_are_unordered_and_complete() {
		let cluster = vec![
			particle(10.0, 10.0, 1.0, 1.0),
			particle(20.0, 10.0, 1.0, 1.0),
			particle(10.0, 20.0, 1.0, 1.0),
			particle(700.0, 500.0, 1.0, 1.0),
		];
		let pairs: Vec<_> = connected_pairs(&cluster, 140.0).map(|(i, j, _)| (i, j)).collect();
		assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
	}

	#[test]
	fn gradient_line_falls_off_with_distance() {
		let field = field_with(
			no_sparkle(FieldConfig::twinkle()),
			vec![particle(100.0, 100.0, 1.0, 1.0), particle(170.0, 100.0, 1.0, 1.0)],
		);
		let mut surface = Recorder::default();
		render(&field, &mut surface, 0.0, &mut fastrand::Rng::with_seed(2));

		let lines = surface.lines();
		let Op::Line { stroke, width, .. } = lines[0] else {
			panic!("expected a line");
		};
		assert!((width - 0.75).abs() < 1e-12);
		let Stroke::Gradient(stops) = stroke else {
			panic!("expected a gradient");
		};
		assert_eq!(stops.len(), 3);
		assert!((stops[0].1.a - 0.125).abs() < 1e-12);
		assert!((stops[1].1.a - 0.2).abs() < 1e-12);
		assert_eq!(stops[1].1.with_alpha(1.0), Color::rgb(148, 163, 184));
	}

	#[test]
	fn classic_lines_are_solid() {
		let field = field_with(
			FieldConfig::classic(),
			vec![particle(100.0, 100.0, 1.0, 1.0), particle(160.0, 100.0, 1.0, 1.0)],
		);
		let mut surface = Recorder::default();
		render(&field, &mut surface, 0.0, &mut fastrand::Rng::with_seed(3));

		let lines = surface.lines();
		let Op::Line { stroke, width, .. } = lines[0] else {
			panic!("expected a line");
		};
		assert!((width - 0.5).abs() < 1e-12);
		assert!(matches!(stroke, Stroke::Solid(c) if (c.a - 0.2).abs() < 1e-12));
	}

	#[test]
	fn layered_glow_draws_four_circles_with_capped_core_alpha() {
		let field =
			field_with(no_sparkle(FieldConfig::twinkle()), vec![particle(50.0, 60.0, 2.0, 1.0)]);
		let mut surface = Recorder::default();
		render(&field, &mut surface, 0.0, &mut fastrand::Rng::with_seed(4));

		let radii: Vec<f64> = surface
			.circles()
			.iter()
			.map(|op| match op {
				Op::Circle { radius, .. } => *radius,
				_ => unreachable!(),
			})
			.collect();
		assert_eq!(radii, vec![7.0, 4.4, 2.0, 0.8]);

		let alphas: Vec<f64> = surface
			.ops
			.iter()
			.filter_map(|op| match op {
				Op::Alpha(a) => Some(*a),
				_ => None,
			})
			.collect();
		assert_eq!(alphas, vec![0.15, 0.4, 0.8, 1.0]);

		let circles = surface.circles();
		let Op::Circle { color, .. } = circles[3] else {
			unreachable!();
		};
		assert_eq!(color, "#ffffff");
	}

	#[test]
	fn classic_glow_has_two_layers() {
		let field = field_with(FieldConfig::classic(), vec![particle(50.0, 60.0, 2.0, 0.5)]);
		let mut surface = Recorder::default();
		render(&field, &mut surface, 0.0, &mut fastrand::Rng::with_seed(5));
		assert_eq!(surface.circles().len(), 2);
		assert!(surface.lines().is_empty());
	}

	#[test]
	fn sparkle_draws_rays_when_gated_in() {
		let config = FieldConfig {
			sparkle: Some(SparkleStyle {
				probability: 1.0,
				..SparkleStyle::default()
			}),
			..FieldConfig::twinkle()
		};
		let field = field_with(config, vec![particle(100.0, 100.0, 10.0, 1.0)]);
		let mut surface = Recorder::default();
		render(&field, &mut surface, 0.0, &mut fastrand::Rng::with_seed(6));

		let lines = surface.lines();
		assert_eq!(lines.len(), 4);
		let Op::Line { from, to, width, .. } = lines[0] else {
			unreachable!();
		};
		assert!((from.0 - 103.0).abs() < 1e-9 && (from.1 - 100.0).abs() < 1e-9);
		assert!((to.0 - 118.0).abs() < 1e-9 && (to.1 - 100.0).abs() < 1e-9);
		assert_eq!(*width, 1.0);
	}

	#[test]
	fn sparkle_never_drawn_at_zero_probability() {
		let config = FieldConfig {
			sparkle: Some(SparkleStyle {
				probability: 0.0,
				..SparkleStyle::default()
			}),
			..FieldConfig::twinkle()
		};
		let field = field_with(config, vec![particle(100.0, 100.0, 2.0, 1.0)]);
		let mut rng = fastrand::Rng::with_seed(7);
		for frame in 0..100 {
			let mut surface = Recorder::default();
			render(&field, &mut surface, frame as f64, &mut rng);
			assert!(surface.lines().is_empty());
		}
	}

	#[test]
	fn empty_field_only_clears() {
		let field = field_with(FieldConfig::twinkle(), Vec::new());
		let mut surface = Recorder::default();
		render(&field, &mut surface, 0.0, &mut fastrand::Rng::with_seed(8));
		assert_eq!(surface.ops, vec![Op::Clear(800.0, 600.0)]);
	}

	#[test]
	fn save_and_restore_are_balanced() {
		let mut rng = fastrand::Rng::with_seed(9);
		let field =
			ParticleField::new(FieldConfig::twinkle(), Viewport::new(1280.0, 720.0), &mut rng);
		let mut surface = Recorder::default();
		render(&field, &mut surface, 1.5, &mut rng);

		let mut depth = 0i32;
		for op in &surface.ops {
			match op {
				Op::Save => depth += 1,
				Op::Restore => {
					depth -= 1;
					assert!(depth >= 0);
				}
				_ => {}
			}
		}
		assert_eq!(depth, 0);
		assert_eq!(surface.circles().len(), field.particles.len() * 4);
	}
}
