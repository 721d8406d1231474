//! # Fit-and-Composite Engine
//!
//! Fits the source image over the detected placeholder region and produces
//! the final composited output.

pub mod engine;
pub mod fit;

pub use engine::CompositionEngine;
pub use fit::{center_crop, composite, fit_dimensions, fit_to_box};
