//! Visual styling for the particle field.
//!
//! Provides colors, the particle color distribution, and the styles for
//! connection lines, glow layers and sparkles.

use serde::Deserialize;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	#[serde(default = "opaque")]
	pub a: f64,
}

fn opaque() -> f64 {
	1.0
}

impl Color {
	pub const WHITE: Color = Color::rgb(255, 255, 255);

	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Hue/saturation/lightness triple. Saturation and lightness are percentages.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
	pub h: f64,
	pub s: f64,
	pub l: f64,
}

impl Hsl {
	pub const fn new(h: f64, s: f64, l: f64) -> Self {
		Self { h, s, l }
	}

	pub fn to_css(self) -> String {
		format!("hsl({:.1}, {:.1}%, {:.1}%)", self.h, self.s, self.l)
	}
}

/// The four color families particles are drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorClass {
	/// Cool blue-gray, the most common family (40%).
	BlueGray,
	/// Neutral gray (30%).
	NeutralGray,
	/// Desaturated light silver (20%).
	LightSilver,
	/// Slate accent (10%).
	SlateAccent,
}

impl ColorClass {
	/// Map a uniform sample in `[0, 1)` onto the 40/30/20/10 split.
	pub fn from_unit(u: f64) -> Self {
		if u < 0.4 {
			ColorClass::BlueGray
		} else if u < 0.7 {
			ColorClass::NeutralGray
		} else if u < 0.9 {
			ColorClass::LightSilver
		} else {
			ColorClass::SlateAccent
		}
	}

	/// Pick a concrete shade within this family.
	pub fn shade(self, rng: &mut fastrand::Rng) -> Hsl {
		match self {
			ColorClass::BlueGray => {
				Hsl::new(210.0 + rng.f64() * 20.0, 25.0, 65.0 + rng.f64() * 20.0)
			}
			ColorClass::NeutralGray => {
				Hsl::new(220.0 + rng.f64() * 10.0, 15.0, 70.0 + rng.f64() * 15.0)
			}
			ColorClass::LightSilver => Hsl::new(0.0, 0.0, 75.0 + rng.f64() * 15.0),
			ColorClass::SlateAccent => {
				Hsl::new(200.0 + rng.f64() * 15.0, 20.0, 60.0 + rng.f64() * 20.0)
			}
		}
	}

	/// Sample a family and a shade in one go.
	pub fn sample(rng: &mut fastrand::Rng) -> Hsl {
		Self::from_unit(rng.f64()).shade(rng)
	}
}

/// Connection line style between nearby particles.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConnectionStyle {
	/// Pairs closer than this are connected.
	pub distance: f64,
	/// Line width at zero distance; falls off linearly to 0 at `distance`.
	pub max_width: f64,
	/// Color at both line ends.
	pub end_color: Color,
	/// Color at the line midpoint (and the solid color when not a gradient).
	pub mid_color: Color,
	/// Alpha at both ends at full strength.
	pub end_alpha: f64,
	/// Alpha at the midpoint at full strength.
	pub mid_alpha: f64,
	/// Stroke with an end-mid-end gradient instead of a solid color.
	pub gradient: bool,
}

impl Default for ConnectionStyle {
	fn default() -> Self {
		Self {
			distance: 140.0,
			max_width: 1.5,
			end_color: Color::rgb(100, 116, 139),
			mid_color: Color::rgb(148, 163, 184),
			end_alpha: 0.25,
			mid_alpha: 0.4,
			gradient: true,
		}
	}
}

/// What a glow layer is filled with.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerFill {
	/// The particle's own color.
	Particle,
	/// A fixed color, e.g. a white core.
	Solid(Color),
}

/// One concentric circle of a particle's glow.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct GlowLayer {
	/// Radius relative to the particle radius.
	pub radius_scale: f64,
	/// Global alpha relative to the particle opacity (capped at 1).
	pub alpha_scale: f64,
	pub fill: LayerFill,
}

impl GlowLayer {
	pub const fn new(radius_scale: f64, alpha_scale: f64, fill: LayerFill) -> Self {
		Self {
			radius_scale,
			alpha_scale,
			fill,
		}
	}

	/// Outer glow, middle glow, body, bright white core.
	pub fn layered() -> Vec<GlowLayer> {
		vec![
			GlowLayer::new(3.5, 0.15, LayerFill::Particle),
			GlowLayer::new(2.2, 0.4, LayerFill::Particle),
			GlowLayer::new(1.0, 0.8, LayerFill::Particle),
			GlowLayer::new(0.4, 1.2, LayerFill::Solid(Color::WHITE)),
		]
	}

	/// A single soft halo under the body.
	pub fn simple() -> Vec<GlowLayer> {
		vec![
			GlowLayer::new(2.0, 0.3, LayerFill::Particle),
			GlowLayer::new(1.0, 1.0, LayerFill::Particle),
		]
	}
}

/// Occasional radiating rays drawn over a particle.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SparkleStyle {
	/// Chance per particle per frame.
	pub probability: f64,
	pub rays: u32,
	/// Ray end distance relative to the particle radius.
	pub length: f64,
	/// Ray start distance relative to the particle radius.
	pub inner: f64,
	/// Rotation speed in radians per second.
	pub spin: f64,
	pub color: Color,
	pub line_width: f64,
}

impl Default for SparkleStyle {
	fn default() -> Self {
		Self {
			probability: 0.1,
			rays: 4,
			length: 1.8,
			inner: 0.3,
			spin: 2.0,
			color: Color::rgba(255, 255, 255, 0.6),
			line_width: 1.0,
		}
	}
}
