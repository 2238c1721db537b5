// src/constants.rs

// Width classes (OpenType usWidthClass)
pub const FWIDTH_ULTRA_CONDENSED: u8 = 1;
pub const FWIDTH_NORMAL: u8 = 5;
pub const FWIDTH_ULTRA_EXPANDED: u8 = 9;

// Weights on the 0..=1000 scale
pub const FWEIGHT_MIN: u16 = 0;
pub const FWEIGHT_NORMAL: u16 = 500;
pub const FWEIGHT_MAX: u16 = 1000;

/// Upper bounds (percent of normal width) for width classes 1 through 8.
/// Anything above the last bound is class 9.
pub const WIDTH_CLASS_BOUNDS: [f32; 8] = [50.0, 62.5, 75.0, 87.5, 100.0, 112.5, 125.0, 150.0];

// Fallback chain
// The stock cascade list misses Arabic for some italic faces.
pub const DEFAULT_SUPPLEMENTARY_FALLBACK: &str = "GeezaPro";
pub const DEFAULT_FAMILY_ALIASES: [(&str, &str); 1] = [(".AppleSymbolsFB", "AppleSymbols")];

// Synthetic italic
pub const DEFAULT_FAKE_ITALIC_SHEAR: f64 = -0.2;
pub const ITALIC_DERIVED_SUFFIX: &str = "Italic-Derived";

// Trace tags, one per primitive kind
pub const TRACE_DRAW_STRING: &str = "NativeDrawString";
pub const TRACE_DRAW_GLYPHS: &str = "NativeDrawGlyphs";
pub const TRACE_DRAW_UNICODES: &str = "NativeDrawUnicodes";
pub const TRACE_DRAW_UNICODE: &str = "NativeDrawUnicode";
