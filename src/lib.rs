//! nativefont - platform fonts behind a native font engine
//!
//! This crate provides:
//! - Lazily created, idempotently disposed native font handles
//! - Width and weight classification of native faces
//! - Synthetic italic variants
//! - Composite fallback chains built from the platform cascade list
//! - Text dispatch between native glyph primitives and outline fills
//!
//! The `cairo` feature adds a cairo backed render surface.

pub use nativefont_core::*;

#[cfg(feature = "cairo")]
pub use nativefont_cairo::CairoSurface;
