//! Leptos component hosting the particle field canvas.
//!
//! The component creates a canvas, sizes it to the viewport (or its parent),
//! and runs the engine from a `requestAnimationFrame` loop. Mouse and touch
//! listeners on the document feed the shared pointer state; in fullscreen mode
//! a window `resize` listener rebuilds the particle collection.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, info};
use wasm_bindgen::prelude::*;
use web_sys::{
	AddEventListenerOptions, CanvasRenderingContext2d, Event, HtmlCanvasElement, MouseEvent,
	TouchEvent, Window,
};

use super::config::FieldConfig;
use super::particles::ParticleField;
use super::render;
use super::state::{PointerState, Viewport};
use crate::error::FieldError;

/// Engine plus the random source it samples from.
struct FieldContext {
	field: ParticleField,
	rng: fastrand::Rng,
}

type Listener = Closure<dyn FnMut(Event)>;

/// Shared handles captured by the effect, the listeners and the frame loop.
#[derive(Clone)]
struct Handles {
	context: Rc<RefCell<Option<FieldContext>>>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	listeners: Rc<RefCell<Vec<Listener>>>,
	pointer: PointerState,
}

/// Renders the animated particle background on a canvas element.
///
/// With `fullscreen = true` (the default) the canvas is fixed behind the page,
/// fills the window and rebuilds its particles whenever the window resizes.
/// Otherwise it sizes itself to explicit `width`/`height` or its parent.
/// Changing `config` rebuilds the particles with the new configuration.
#[component]
pub fn ParticleFieldCanvas(
	#[prop(into)] config: Signal<FieldConfig>,
	#[prop(default = true)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let handles = Handles {
		context: Rc::new(RefCell::new(None)),
		animate: Rc::new(RefCell::new(None)),
		listeners: Rc::new(RefCell::new(Vec::new())),
		pointer: PointerState::new(),
	};

	Effect::new(move |_| {
		let config = config.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if let Some(ref mut c) = *handles.context.borrow_mut() {
			c.field.reconfigure(config, &mut c.rng);
			debug!(
				"particle-field: reconfigured, {} particles",
				c.field.particles.len()
			);
			return;
		}

		if let Err(e) = start(canvas, config, fullscreen, (width, height), &handles) {
			error!("particle-field: initialization failed: {}", e);
		}
	});

	let style = if fullscreen {
		"position: fixed; inset: 0; z-index: -1; display: block; pointer-events: none;"
	} else {
		"display: block;"
	};

	view! {
		<canvas node_ref=canvas_ref class="particle-field-canvas" style=style />
	}
}

/// Measure, acquire the 2d context, build the engine and wire everything up.
fn start(
	canvas: HtmlCanvasElement,
	config: FieldConfig,
	fullscreen: bool,
	(width, height): (Option<f64>, Option<f64>),
	handles: &Handles,
) -> Result<(), FieldError> {
	let window = web_sys::window().ok_or(FieldError::NoWindow)?;

	let viewport = if fullscreen {
		window_viewport(&window)
	} else {
		let parent = canvas.parent_element();
		let parent_width = parent.as_ref().map_or(800.0, |p| p.client_width() as f64);
		let parent_height = parent.as_ref().map_or(600.0, |p| p.client_height() as f64);
		Viewport::new(width.unwrap_or(parent_width), height.unwrap_or(parent_height))
	};
	size_canvas(&canvas, viewport);

	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")?
		.ok_or(FieldError::ContextUnavailable)?
		.dyn_into()
		.map_err(|_| FieldError::ContextUnavailable)?;

	let mut rng = fastrand::Rng::new();
	let field = ParticleField::new(config, viewport, &mut rng);
	info!(
		"particle-field: {}x{} viewport, {:?} tier, {} particles",
		viewport.width,
		viewport.height,
		field.tier(),
		field.particles.len()
	);
	*handles.context.borrow_mut() = Some(FieldContext { field, rng });

	listen_for_pointer(&window, &canvas, handles)?;
	if fullscreen {
		listen_for_resize(&window, &canvas, handles)?;
	}
	run_frame_loop(&window, ctx, handles)
}

fn window_viewport(window: &Window) -> Viewport {
	let extent = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	Viewport::new(extent(window.inner_width()), extent(window.inner_height()))
}

fn size_canvas(canvas: &HtmlCanvasElement, viewport: Viewport) {
	canvas.set_width(viewport.width as u32);
	canvas.set_height(viewport.height as u32);
}

/// Mouse moves and the first touch point update the shared pointer.
fn listen_for_pointer(
	window: &Window,
	canvas: &HtmlCanvasElement,
	handles: &Handles,
) -> Result<(), FieldError> {
	let document = window.document().ok_or(FieldError::NoWindow)?;

	let (pointer, canvas_mm) = (handles.pointer.clone(), canvas.clone());
	let on_mousemove: Listener = Closure::new(move |ev: Event| {
		if let Some(ev) = ev.dyn_ref::<MouseEvent>() {
			let rect = canvas_mm.get_bounding_client_rect();
			pointer.set(
				ev.client_x() as f64 - rect.left(),
				ev.client_y() as f64 - rect.top(),
			);
		}
	});

	let (pointer, canvas_touch) = (handles.pointer.clone(), canvas.clone());
	let on_touch: Listener = Closure::new(move |ev: Event| {
		let Some(ev) = ev.dyn_ref::<TouchEvent>() else {
			return;
		};
		if let Some(touch) = ev.touches().get(0) {
			let rect = canvas_touch.get_bounding_client_rect();
			pointer.set(
				touch.client_x() as f64 - rect.left(),
				touch.client_y() as f64 - rect.top(),
			);
		}
	});

	document
		.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref())?;

	let passive = AddEventListenerOptions::new();
	passive.set_passive(true);
	for event in ["touchstart", "touchmove"] {
		document.add_event_listener_with_callback_and_add_event_listener_options(
			event,
			on_touch.as_ref().unchecked_ref(),
			&passive,
		)?;
	}

	handles.listeners.borrow_mut().extend([on_mousemove, on_touch]);
	Ok(())
}

/// Resizing the window discards the particle set and samples a new one.
fn listen_for_resize(
	window: &Window,
	canvas: &HtmlCanvasElement,
	handles: &Handles,
) -> Result<(), FieldError> {
	let (context_resize, canvas_resize) = (handles.context.clone(), canvas.clone());
	let on_resize: Listener = Closure::new(move |_: Event| {
		let Some(win) = web_sys::window() else {
			return;
		};
		let viewport = window_viewport(&win);
		size_canvas(&canvas_resize, viewport);
		if let Some(ref mut c) = *context_resize.borrow_mut() {
			c.field.rebuild(viewport, &mut c.rng);
			debug!(
				"particle-field: resized to {}x{}, {:?} tier, {} particles",
				viewport.width,
				viewport.height,
				c.field.tier(),
				c.field.particles.len()
			);
		}
	});

	window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
	handles.listeners.borrow_mut().push(on_resize);
	Ok(())
}

/// Update then draw once per display frame, forever.
fn run_frame_loop(
	window: &Window,
	mut ctx: CanvasRenderingContext2d,
	handles: &Handles,
) -> Result<(), FieldError> {
	let (context_anim, animate_inner, pointer) = (
		handles.context.clone(),
		handles.animate.clone(),
		handles.pointer.clone(),
	);
	*handles.animate.borrow_mut() = Some(Closure::new(move || {
		if let Some(ref mut c) = *context_anim.borrow_mut() {
			let time = js_sys::Date::now() * 0.001;
			c.field.update(pointer.get(), time, &mut c.rng);
			render::render(&c.field, &mut ctx, time, &mut c.rng);
		}
		if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
			let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	}));

	if let Some(ref cb) = *handles.animate.borrow() {
		window.request_animation_frame(cb.as_ref().unchecked_ref())?;
	}
	Ok(())
}
