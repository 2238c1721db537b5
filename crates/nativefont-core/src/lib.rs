//! nativefont core - platform font descriptors over a native font engine
//!
//! This crate owns the lifecycle of native font objects, classifies their
//! width and weight, derives synthetic italics, builds composite fallback
//! chains and dispatches text drawing between the native glyph primitives
//! and outline filling. The engine itself sits behind [`NativeFontEngine`].

pub mod config;
pub mod constants;
pub mod drawing;
pub mod dummy_engine;
pub mod error;
pub mod font;
pub mod pipe;
pub mod traits;

// Re-export main types
pub use config::{CreationFailurePolicy, FontConfig, FontRenderContext};
pub use drawing::{AntialiasGuard, AntialiasHint, Color, GlyphVector, Paint, PositionedGlyph};
pub use error::{EngineError, FontError, FontResult, RenderError, RenderResult};
pub use font::{
    weight_class, width_class, CompositeFont, FallbackPolicy, Font, Font2D, FontStrike, FontStyle,
    NativeFont, NativeFontHandle, NativeFontId, NativeStrikeId, StrikeDesc,
};
pub use pipe::{
    GlyphPrimitives, NativePrimitives, Primitive, TextContext, TextPipe, TextRenderDispatcher,
    TracingPrimitives,
};

// Re-export traits
pub use traits::*;
