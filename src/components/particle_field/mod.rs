//! Animated particle background.
//!
//! Draws a field of softly glowing particles on an HTML canvas with:
//! - Drift, damping and attraction toward the mouse or first touch point
//! - Wrapping or bouncing viewport edges
//! - Twinkling opacity, pulsing radii and occasional sparkles
//! - Connection lines between nearby particles that fade with distance
//!
//! The particle count follows the viewport width tier and the whole set is
//! resampled when the window resizes.
//!
//! # Example
//!
//! ```ignore
//! use particle_field::{FieldConfig, ParticleFieldCanvas};
//!
//! view! { <ParticleFieldCanvas config=FieldConfig::classic() /> }
//! ```

mod component;
pub mod config;
mod particles;
mod render;
pub mod state;
mod surface;
pub mod theme;

pub use component::ParticleFieldCanvas;
pub use config::{ConfigDocument, FieldConfig, Preset, Tier};
pub use particles::{Particle, ParticleField};
pub use render::{connected_pairs, connection_strength, render};
pub use state::{Pointer, PointerState, Viewport};
pub use surface::{DrawSurface, Stroke};
