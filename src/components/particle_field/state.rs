//! External inputs to the engine: viewport size and pointer position.
//!
//! Both are plain values handed to the engine each frame. The pointer lives in
//! a shared cell so input callbacks can write it between frames while the
//! animation loop reads a consistent copy.

use std::cell::Cell;
use std::rc::Rc;

/// Drawable area in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	/// Create a viewport, treating negative or non-finite sizes as zero.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width: sanitize_extent(width),
			height: sanitize_extent(height),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.width <= 0.0 || self.height <= 0.0
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}
}

fn sanitize_extent(v: f64) -> f64 {
	if v.is_finite() { v.max(0.0) } else { 0.0 }
}

/// Last known pointer position in canvas coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
	pub x: f64,
	pub y: f64,
}

impl Pointer {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Shared, single-threaded pointer cell.
///
/// Cloning shares the same cell. Writers are the mouse/touch handlers; the
/// animation loop calls [`PointerState::get`] once per frame. The position is
/// never reset, so the last touch keeps attracting after the finger lifts.
#[derive(Clone, Debug, Default)]
pub struct PointerState {
	inner: Rc<Cell<Pointer>>,
}

impl PointerState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self) -> Pointer {
		self.inner.get()
	}

	/// Record a new position. Non-finite coordinates are ignored.
	pub fn set(&self, x: f64, y: f64) {
		if x.is_finite() && y.is_finite() {
			self.inner.set(Pointer::new(x, y));
		}
	}
}
