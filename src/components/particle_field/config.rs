//! Engine configuration: viewport tiers, motion policies and presets.
//!
//! A single [`FieldConfig`] parameterizes the whole loop. The two built-in
//! presets are [`FieldConfig::twinkle`] (wrapping, pulsing, glowing, sparkling)
//! and [`FieldConfig::classic`] (bouncing off edges with a random-walk twinkle).

use serde::Deserialize;

use super::theme::{ConnectionStyle, GlowLayer, SparkleStyle};

/// Viewport width bucket controlling particle count and motion scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
	SmallMobile,
	Mobile,
	Desktop,
}

/// Per-tier sampling parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierSpec {
	/// Hard ceiling on the particle count.
	pub max_count: usize,
	/// Width in pixels per particle before the ceiling applies.
	pub width_per_particle: f64,
	/// Full width of the symmetric initial velocity range.
	pub speed: f64,
	/// Span of the initial radius above [`MIN_RADIUS`].
	pub radius_span: f64,
	/// Span of the initial opacity above [`MIN_OPACITY`].
	pub opacity_span: f64,
}

/// Smallest initial particle radius.
pub const MIN_RADIUS: f64 = 0.8;
/// Smallest initial (pre-clamp) particle opacity.
pub const MIN_OPACITY: f64 = 0.4;

impl Tier {
	pub fn from_width(width: f64) -> Self {
		if width < 480.0 {
			Tier::SmallMobile
		} else if width < 768.0 {
			Tier::Mobile
		} else {
			Tier::Desktop
		}
	}

	pub fn is_mobile(self) -> bool {
		matches!(self, Tier::SmallMobile | Tier::Mobile)
	}

	pub fn spec(self) -> TierSpec {
		let (max_count, width_per_particle) = match self {
			Tier::SmallMobile => (25, 30.0),
			Tier::Mobile => (40, 20.0),
			Tier::Desktop => (100, 15.0),
		};
		if self.is_mobile() {
			TierSpec {
				max_count,
				width_per_particle,
				speed: 0.3,
				radius_span: 2.5,
				opacity_span: 0.7,
			}
		} else {
			TierSpec {
				max_count,
				width_per_particle,
				speed: 0.5,
				radius_span: 4.0,
				opacity_span: 0.9,
			}
		}
	}

	/// Number of particles for a viewport of this width.
	///
	/// The width-proportional count is fractional; it rounds up, then the
	/// tier ceiling applies. Degenerate widths yield an empty field.
	pub fn particle_count(width: f64) -> usize {
		if !width.is_finite() || width <= 0.0 {
			return 0;
		}
		let spec = Self::from_width(width).spec();
		let wanted = (width / spec.width_per_particle).min(spec.max_count as f64);
		wanted.ceil() as usize
	}
}

/// What happens when a particle leaves the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundaryPolicy {
	/// Teleport to the opposite edge, `margin` pixels outside it, and scale the
	/// crossing velocity component by `damping`.
	Wrap { margin: f64, damping: f64 },
	/// Reverse the crossing velocity component and clamp into the viewport.
	Reflect,
}

/// How opacity evolves each frame.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpacityRule {
	/// Advance the particle phase by its twinkle rate and follow
	/// `sin(phase) * amplitude + base`.
	Pulse { base: f64, amplitude: f64 },
	/// Add a uniform perturbation in `[-step/2, step/2)`.
	RandomWalk { step: f64 },
}

/// Pull toward the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Attraction {
	/// Only particles closer than this feel the pointer.
	pub radius: f64,
	/// Velocity added per frame at zero distance.
	pub strength: f64,
}

/// Time-modulated radius: `base * (1 - depth + sin(t * speed + phase) * depth)`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct RadiusPulse {
	pub speed: f64,
	pub depth: f64,
}

/// Most rays a sparkle may draw.
pub const MAX_SPARKLE_RAYS: u32 = 16;

/// Complete engine configuration.
///
/// Unknown fields are rejected so a misspelled key in the page document is
/// reported instead of silently falling back to a default.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldConfig {
	pub boundary: BoundaryPolicy,
	pub opacity: OpacityRule,
	pub opacity_min: f64,
	pub opacity_max: f64,
	pub attraction: Attraction,
	/// Amplitude of the sinusoidal ambient drift; `None` disables it.
	pub drift: Option<f64>,
	pub radius_pulse: Option<RadiusPulse>,
	/// Per-frame velocity multiplier.
	pub damping: f64,
	pub connection: ConnectionStyle,
	/// Concentric circles drawn per particle, outermost first.
	pub glow: Vec<GlowLayer>,
	pub sparkle: Option<SparkleStyle>,
}

impl FieldConfig {
	/// Wrapping edges, sinusoidal twinkle, layered glow and sparkles (default).
	pub fn twinkle() -> Self {
		Self {
			boundary: BoundaryPolicy::Wrap {
				margin: 10.0,
				damping: 0.8,
			},
			opacity: OpacityRule::Pulse {
				base: 0.7,
				amplitude: 0.3,
			},
			opacity_min: 0.3,
			opacity_max: 1.0,
			attraction: Attraction {
				radius: 150.0,
				strength: 0.008,
			},
			drift: Some(0.002),
			radius_pulse: Some(RadiusPulse {
				speed: 2.0,
				depth: 0.2,
			}),
			damping: 0.992,
			connection: ConnectionStyle::default(),
			glow: GlowLayer::layered(),
			sparkle: Some(SparkleStyle::default()),
		}
	}

	/// Bouncing edges, random-walk twinkle, solid connection lines.
	pub fn classic() -> Self {
		Self {
			boundary: BoundaryPolicy::Reflect,
			opacity: OpacityRule::RandomWalk { step: 0.02 },
			opacity_min: 0.2,
			opacity_max: 1.0,
			attraction: Attraction {
				radius: 120.0,
				strength: 0.01,
			},
			drift: None,
			radius_pulse: None,
			damping: 0.995,
			connection: ConnectionStyle {
				distance: 120.0,
				max_width: 1.0,
				gradient: false,
				..ConnectionStyle::default()
			},
			glow: GlowLayer::simple(),
			sparkle: None,
		}
	}

	pub fn preset(preset: Preset) -> Self {
		match preset {
			Preset::Twinkle => Self::twinkle(),
			Preset::Classic => Self::classic(),
		}
	}

	/// Repair values that would break the loop's invariants.
	///
	/// Opacity bounds are clamped into `[0, 1]` and ordered, damping factors
	/// into `[0, 1]`, and non-positive or non-finite distances disable the
	/// feature they belong to. Glow scales are floored at 0 and sparkle rays
	/// capped at [`MAX_SPARKLE_RAYS`].
	pub fn sanitized(mut self) -> Self {
		let lo = finite_or(self.opacity_min, 0.0).clamp(0.0, 1.0);
		let hi = finite_or(self.opacity_max, 1.0).clamp(0.0, 1.0);
		self.opacity_min = lo.min(hi);
		self.opacity_max = lo.max(hi);

		self.damping = finite_or(self.damping, 1.0).clamp(0.0, 1.0);
		if let BoundaryPolicy::Wrap { margin, damping } = &mut self.boundary {
			*margin = finite_or(*margin, 0.0).max(0.0);
			*damping = finite_or(*damping, 1.0).clamp(0.0, 1.0);
		}

		self.attraction.radius = finite_or(self.attraction.radius, 0.0).max(0.0);
		self.attraction.strength = finite_or(self.attraction.strength, 0.0);
		self.connection.distance = finite_or(self.connection.distance, 0.0).max(0.0);

		for layer in &mut self.glow {
			layer.radius_scale = finite_or(layer.radius_scale, 0.0).max(0.0);
			layer.alpha_scale = finite_or(layer.alpha_scale, 0.0).max(0.0);
		}
		if let Some(pulse) = &mut self.radius_pulse {
			pulse.depth = finite_or(pulse.depth, 0.0).clamp(0.0, 0.5);
		}
		if let Some(sparkle) = &mut self.sparkle {
			sparkle.probability = finite_or(sparkle.probability, 0.0).clamp(0.0, 1.0);
			sparkle.rays = sparkle.rays.min(MAX_SPARKLE_RAYS);
		}
		self
	}
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self::twinkle()
	}
}

fn finite_or(value: f64, fallback: f64) -> f64 {
	if value.is_finite() { value } else { fallback }
}

/// Named configurations selectable from the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
	Twinkle,
	Classic,
}

/// A bare preset selection, `{"preset": "classic"}`, with nothing else.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresetDocument {
	pub preset: Preset,
}

/// Shape of the embedded JSON configuration.
///
/// Either `{"preset": "classic"}` or a (partial) [`FieldConfig`]. Mixing a
/// preset with overrides, or naming an unknown preset, fails to parse.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ConfigDocument {
	Preset(PresetDocument),
	Full(FieldConfig),
}

impl ConfigDocument {
	pub fn into_config(self) -> FieldConfig {
		match self {
			ConfigDocument::Preset(doc) => FieldConfig::preset(doc.preset),
			ConfigDocument::Full(config) => config,
		}
		.sanitized()
	}
}
