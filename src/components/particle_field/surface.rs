//! The drawing operations the renderer needs, and their canvas implementation.

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::theme::Color;

/// How a line is stroked.
#[derive(Clone, Debug, PartialEq)]
pub enum Stroke {
	Solid(Color),
	/// Linear gradient from the line start (offset 0) to its end (offset 1).
	Gradient(Vec<(f64, Color)>),
}

/// Minimal 2D raster surface.
///
/// Mirrors the subset of the canvas 2D API the particle renderer draws with,
/// so the renderer can run against a recording double in tests.
pub trait DrawSurface {
	fn clear(&mut self, width: f64, height: f64);
	fn save(&mut self);
	fn restore(&mut self);
	fn set_global_alpha(&mut self, alpha: f64);
	/// Fill a full circle with a CSS color.
	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str);
	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), stroke: &Stroke, width: f64);
}

impl DrawSurface for CanvasRenderingContext2d {
	fn clear(&mut self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn save(&mut self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&mut self) {
		CanvasRenderingContext2d::restore(self);
	}

	fn set_global_alpha(&mut self, alpha: f64) {
		CanvasRenderingContext2d::set_global_alpha(self, alpha);
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str) {
		self.set_fill_style_str(color);
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, TAU);
		self.fill();
	}

	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), stroke: &Stroke, width: f64) {
		match stroke {
			Stroke::Solid(color) => self.set_stroke_style_str(&color.to_css()),
			Stroke::Gradient(stops) => {
				let gradient = self.create_linear_gradient(from.0, from.1, to.0, to.1);
				for (offset, color) in stops {
					let _ = gradient.add_color_stop(*offset as f32, &color.to_css());
				}
				#[allow(deprecated)]
				self.set_stroke_style(&gradient);
			}
		}
		self.set_line_width(width);
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.stroke();
	}
}
