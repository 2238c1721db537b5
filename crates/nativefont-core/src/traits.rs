use crate::config::FontRenderContext;
use crate::drawing::{AntialiasHint, GlyphVector, Paint};
use crate::error::{EngineError, RenderResult};
use crate::font::{
    Font, Font2D, FallbackPolicy, FontStyle, NativeFont, NativeFontId, NativeStrikeId, StrikeDesc,
};
use kurbo::BezPath;

/// Platform font engine that owns native font and strike objects.
///
/// Every call is synchronous. Implementations must tolerate calls from
/// several threads at once.
pub trait NativeFontEngine: Send + Sync {
    fn create_font(&self, native_name: &str, style: FontStyle) -> Result<NativeFontId, EngineError>;
    fn dispose_font(&self, font: NativeFontId);

    /// Width in `-1.0..=1.0`, 0 being normal
    fn width_scalar(&self, font: NativeFontId) -> f32;
    /// Weight in `-1.0..=1.0`, 0 being regular
    fn weight_scalar(&self, font: NativeFontId) -> f32;
    /// Platform ordered list of families that cover what `font` lacks
    fn cascade_list(&self, font: NativeFontId) -> Vec<String>;
    fn table_bytes(&self, font: NativeFontId, tag: u32) -> Option<Vec<u8>>;

    fn create_strike(&self, font: NativeFontId, desc: &StrikeDesc) -> Result<NativeStrikeId, EngineError>;
    fn dispose_strike(&self, strike: NativeStrikeId);

    // Glyph primitives. Fire and forget.
    fn draw_string(&self, surface: &mut dyn RenderSurface, strike: NativeStrikeId, text: &str, x: f64, y: f64);
    fn draw_glyphs(&self, surface: &mut dyn RenderSurface, strike: NativeStrikeId, glyphs: &GlyphVector, x: f32, y: f32);
    fn draw_unicodes(
        &self,
        surface: &mut dyn RenderSurface,
        strike: NativeStrikeId,
        unicodes: &[u16],
        offset: usize,
        length: usize,
        x: f32,
        y: f32,
    );
    fn draw_one_unicode(&self, surface: &mut dyn RenderSurface, strike: NativeStrikeId, unicode: u16, x: f32, y: f32);
}

/// Registry of installed fonts, owned by the font manager
pub trait FontRegistry {
    fn resolve(&self, family: &str, style: FontStyle, policy: FallbackPolicy) -> Option<Font2D>;

    /// Builds the mapper that routes glyph lookups across a composite's
    /// slots. Slot 0 is the primary face.
    fn composite_glyph_mapper(&self, slots: &[&NativeFont]) -> Box<dyn CompositeGlyphMapper>;
}

/// A glyph found in one slot of a composite font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotGlyph {
    pub slot: usize,
    pub glyph: u32,
}

pub trait CompositeGlyphMapper: Send + Sync {
    fn char_to_glyph(&self, ch: char) -> Option<SlotGlyph>;
}

/// Turns text into outlines for the shape fill path
pub trait TextShaper {
    fn shape(&self, font: &Font, frc: &FontRenderContext, text: &str) -> RenderResult<GlyphVector>;
}

/// Target of text drawing
pub trait RenderSurface {
    fn name(&self) -> &str;
    fn antialias(&self) -> AntialiasHint;
    fn set_antialias(&mut self, hint: AntialiasHint);
    fn fill(&mut self, outline: &BezPath, paint: &Paint) -> RenderResult<()>;
}
