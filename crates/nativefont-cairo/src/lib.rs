//! nativefont cairo - cairo backend for the outline fill path
//!
//! Provides a [`RenderSurface`](nativefont_core::RenderSurface) over a
//! `cairo::Context`, so text that cannot go through the native glyph
//! primitives can still be filled as outlines.

mod cairo_surface;

pub use cairo_surface::CairoSurface;

// Re-export nativefont-core types for convenience
pub use nativefont_core::*;
