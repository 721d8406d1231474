//! # Template-Compositor
//!
//! Replace a solid-color placeholder region in a template image with a
//! cover-fit photo and centered overlay text.
//!
//! Given a template whose most frequent color marks a placeholder area, the
//! compositor builds a tolerance mask around that dominant color, resizes
//! and center-crops a source image to cover the mask's bounding box,
//! composites it through the mask, and draws a centered text block on top.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use template_compositor::{compose::CompositionEngine, config::Config};
//!
//! # fn main() -> anyhow::Result<()> {
//! let engine = CompositionEngine::new(Config::default());
//! engine.compose(
//!     "template.png",
//!     "photo.jpg",
//!     "output.png",
//!     "Hello\\nWorld",
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`detector`] - Dominant-color region detection (mask + bounding box)
//! - [`compose`] - Fit-and-composite engine and the pipeline orchestrator
//! - [`text`] - Font loading and centered text overlay
//! - [`config`] - Configuration management
//!
//! The pipeline is strictly linear and fully synchronous; every failure
//! aborts the run before any output is written.

pub mod compose;
pub mod config;
pub mod detector;
pub mod error;
pub mod text;

// Re-export commonly used types for convenience
pub use crate::{
    compose::CompositionEngine,
    config::Config,
    detector::{BoundingBox, Mask},
    error::{CompositorError, Result},
};
