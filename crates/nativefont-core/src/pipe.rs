//! Text drawing dispatch
//!
//! A [`TextRenderDispatcher`] sends text to the native glyph primitives when
//! the context paints with a solid color through a native strike, and
//! otherwise fills shaped glyph outlines on the surface.

use crate::config::FontRenderContext;
use crate::constants::{TRACE_DRAW_GLYPHS, TRACE_DRAW_STRING, TRACE_DRAW_UNICODE, TRACE_DRAW_UNICODES};
use crate::drawing::{AntialiasGuard, AntialiasHint, Color, GlyphVector, Paint};
use crate::error::{RenderError, RenderResult};
use crate::font::{Font, FontStrike, NativeStrike, NativeStrikeId};
use crate::traits::{NativeFontEngine, RenderSurface, TextShaper};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// The four native glyph primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    DrawString,
    DrawGlyphs,
    DrawUnicodes,
    DrawUnicode,
}

impl Primitive {
    pub const ALL: [Primitive; 4] = [
        Primitive::DrawString,
        Primitive::DrawGlyphs,
        Primitive::DrawUnicodes,
        Primitive::DrawUnicode,
    ];

    /// Tag emitted by the trace decorator
    pub fn tag(self) -> &'static str {
        match self {
            Primitive::DrawString => TRACE_DRAW_STRING,
            Primitive::DrawGlyphs => TRACE_DRAW_GLYPHS,
            Primitive::DrawUnicodes => TRACE_DRAW_UNICODES,
            Primitive::DrawUnicode => TRACE_DRAW_UNICODE,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Sink for the fast path
pub trait GlyphPrimitives {
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

/// Forwards every primitive to the native engine
pub struct NativePrimitives {
    engine: Arc<dyn NativeFontEngine>,
}

impl NativePrimitives {
    pub fn new(engine: Arc<dyn NativeFontEngine>) -> Self {
        Self { engine }
    }
}

impl GlyphPrimitives for NativePrimitives {
    fn draw_string(&self, surface: &mut dyn RenderSurface, strike: NativeStrikeId, text: &str, x: f64, y: f64) {
        self.engine.draw_string(surface, strike, text, x, y);
    }

    fn draw_glyphs(&self, surface: &mut dyn RenderSurface, strike: NativeStrikeId, glyphs: &GlyphVector, x: f32, y: f32) {
        self.engine.draw_glyphs(surface, strike, glyphs, x, y);
    }

    fn draw_unicodes(
        &self,
        surface: &mut dyn RenderSurface,
        strike: NativeStrikeId,
        unicodes: &[u16],
        offset: usize,
        length: usize,
        x: f32,
        y: f32,
    ) {
        self.engine.draw_unicodes(surface, strike, unicodes, offset, length, x, y);
    }

    fn draw_one_unicode(&self, surface: &mut dyn RenderSurface, strike: NativeStrikeId, unicode: u16, x: f32, y: f32) {
        self.engine.draw_one_unicode(surface, strike, unicode, x, y);
    }
}

/// Emits a trace tag for every primitive, then delegates unchanged
pub struct TracingPrimitives<P> {
    inner: P,
    counts: [AtomicUsize; 4],
}

impl<P: GlyphPrimitives> TracingPrimitives<P> {
    pub fn new(inner: P) -> Self {
        Self { inner, counts: Default::default() }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Times `primitive` has been traced
    pub fn count(&self, primitive: Primitive) -> usize {
        self.counts[primitive.index()].load(Ordering::Relaxed)
    }

    fn trace(&self, primitive: Primitive) {
        self.counts[primitive.index()].fetch_add(1, Ordering::Relaxed);
        tracing::trace!("{}", primitive.tag());
    }
}

impl<P: GlyphPrimitives> GlyphPrimitives for TracingPrimitives<P> {
    fn draw_string(&self, surface: &mut dyn RenderSurface, strike: NativeStrikeId, text: &str, x: f64, y: f64) {
        self.trace(Primitive::DrawString);
        self.inner.draw_string(surface, strike, text, x, y);
    }

    fn draw_glyphs(&self, surface: &mut dyn RenderSurface, strike: NativeStrikeId, glyphs: &GlyphVector, x: f32, y: f32) {
        self.trace(Primitive::DrawGlyphs);
        self.inner.draw_glyphs(surface, strike, glyphs, x, y);
    }

    fn draw_unicodes(
        &self,
        surface: &mut dyn RenderSurface,
        strike: NativeStrikeId,
        unicodes: &[u16],
        offset: usize,
        length: usize,
        x: f32,
        y: f32,
    ) {
        self.trace(Primitive::DrawUnicodes);
        self.inner.draw_unicodes(surface, strike, unicodes, offset, length, x, y);
    }

    fn draw_one_unicode(&self, surface: &mut dyn RenderSurface, strike: NativeStrikeId, unicode: u16, x: f32, y: f32) {
        self.trace(Primitive::DrawUnicode);
        self.inner.draw_one_unicode(surface, strike, unicode, x, y);
    }
}

/// Drawing state for one target: surface, paint, font and render context.
///
/// The strike for the current font is resolved lazily and kept until the
/// font or render context changes.
pub struct TextContext<'a> {
    surface: &'a mut dyn RenderSurface,
    shaper: &'a dyn TextShaper,
    font: Font,
    paint: Paint,
    frc: FontRenderContext,
    strike: Option<FontStrike>,
}

impl<'a> TextContext<'a> {
    /// Solid black paint under the default render context
    pub fn new(surface: &'a mut dyn RenderSurface, shaper: &'a dyn TextShaper, font: Font) -> Self {
        Self {
            surface,
            shaper,
            font,
            paint: Paint::Solid(Color::rgb(0.0, 0.0, 0.0)),
            frc: FontRenderContext::default(),
            strike: None,
        }
    }

    pub fn with_paint(mut self, paint: Paint) -> Self {
        self.paint = paint;
        self
    }

    pub fn with_render_context(mut self, frc: FontRenderContext) -> Self {
        self.set_render_context(frc);
        self
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn paint(&self) -> &Paint {
        &self.paint
    }

    pub fn render_context(&self) -> &FontRenderContext {
        &self.frc
    }

    pub fn surface(&mut self) -> &mut dyn RenderSurface {
        &mut *self.surface
    }

    pub fn set_paint(&mut self, paint: Paint) {
        self.paint = paint;
    }

    /// Installs `font`, returning the previous one
    pub fn set_font(&mut self, font: Font) -> Font {
        if font != self.font {
            self.strike = None;
        }
        std::mem::replace(&mut self.font, font)
    }

    pub fn set_render_context(&mut self, frc: FontRenderContext) {
        if frc != self.frc {
            self.strike = None;
        }
        self.frc = frc;
    }

    /// Strike of the current font under the current render context
    pub fn strike(&mut self) -> FontStrike {
        if let Some(strike) = &self.strike {
            return strike.clone();
        }
        let strike = self.font.strike(&self.frc);
        self.strike = Some(strike.clone());
        strike
    }

    /// The native strike, if this context qualifies for the glyph primitives
    fn fast_path_strike(&mut self) -> Option<Arc<NativeStrike>> {
        if !self.paint.is_simple_color() {
            return None;
        }
        match self.strike() {
            FontStrike::Native(strike) => Some(strike),
            FontStrike::Outline => None,
        }
    }

    fn fill_outlines(&mut self, glyphs: &GlyphVector, x: f32, y: f32) -> RenderResult<()> {
        for outline in glyphs.outlines(x, y) {
            self.surface.fill(&outline, &self.paint)?;
        }
        Ok(())
    }

    /// Shapes `text` with the current font and fills it, antialiased as
    /// the render context asks
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> RenderResult<()> {
        let glyphs = self.shaper.shape(&self.font, &self.frc, text)?;
        let hint = AntialiasHint::from_enabled(self.frc.antialiased);
        let mut surface = AntialiasGuard::new(&mut *self.surface, hint);
        for outline in glyphs.outlines(x as f32, y as f32) {
            surface.fill(&outline, &self.paint)?;
        }
        Ok(())
    }
}

/// Text drawing operations
pub trait TextPipe {
    fn draw_string(&self, ctx: &mut TextContext<'_>, text: &str, x: f64, y: f64) -> RenderResult<()>;

    /// Draws with the glyph vector's own font; the context's font is
    /// restored afterwards
    fn draw_glyph_vector(&self, ctx: &mut TextContext<'_>, glyphs: &GlyphVector, x: f32, y: f32) -> RenderResult<()>;

    /// Draws `data[offset..offset + length]`.
    /// The native path receives the units as given. The shape path decodes
    /// them first, so an unpaired surrogate (including half of a pair cut by
    /// the range) is shaped as U+FFFD.
    fn draw_chars(
        &self,
        ctx: &mut TextContext<'_>,
        data: &[u16],
        offset: usize,
        length: usize,
        x: i32,
        y: i32,
    ) -> RenderResult<()>;
}

pub struct TextRenderDispatcher<P> {
    primitives: P,
}

impl TextRenderDispatcher<NativePrimitives> {
    pub fn native(engine: Arc<dyn NativeFontEngine>) -> Self {
        Self::new(NativePrimitives::new(engine))
    }
}

impl<P: GlyphPrimitives> TextRenderDispatcher<P> {
    pub fn new(primitives: P) -> Self {
        Self { primitives }
    }

    pub fn primitives(&self) -> &P {
        &self.primitives
    }

    /// Same dispatch, with every primitive traced
    pub fn trace_wrap(self) -> TextRenderDispatcher<TracingPrimitives<P>> {
        TextRenderDispatcher::new(TracingPrimitives::new(self.primitives))
    }

    /// Draws a single UTF-16 unit; a surrogate is shaped as U+FFFD
    pub fn draw_char(&self, ctx: &mut TextContext<'_>, unit: u16, x: f32, y: f32) -> RenderResult<()> {
        match ctx.fast_path_strike() {
            Some(strike) => {
                self.primitives.draw_one_unicode(&mut *ctx.surface, strike.id(), unit, x, y);
                Ok(())
            }
            None => ctx.fill_text(&String::from_utf16_lossy(&[unit]), x as f64, y as f64),
        }
    }

    fn draw_glyph_vector_with_font(
        &self,
        ctx: &mut TextContext<'_>,
        glyphs: &GlyphVector,
        x: f32,
        y: f32,
    ) -> RenderResult<()> {
        match ctx.fast_path_strike() {
            Some(strike) => {
                self.primitives.draw_glyphs(&mut *ctx.surface, strike.id(), glyphs, x, y);
                Ok(())
            }
            None => ctx.fill_outlines(glyphs, x, y),
        }
    }
}

impl<P: GlyphPrimitives> TextPipe for TextRenderDispatcher<P> {
    fn draw_string(&self, ctx: &mut TextContext<'_>, text: &str, x: f64, y: f64) -> RenderResult<()> {
        match ctx.fast_path_strike() {
            Some(strike) => {
                self.primitives.draw_string(&mut *ctx.surface, strike.id(), text, x, y);
                Ok(())
            }
            None => ctx.fill_text(text, x, y),
        }
    }

    fn draw_glyph_vector(&self, ctx: &mut TextContext<'_>, glyphs: &GlyphVector, x: f32, y: f32) -> RenderResult<()> {
        let previous = ctx.set_font(glyphs.font().clone());
        let result = self.draw_glyph_vector_with_font(ctx, glyphs, x, y);
        ctx.set_font(previous);
        result
    }

    fn draw_chars(
        &self,
        ctx: &mut TextContext<'_>,
        data: &[u16],
        offset: usize,
        length: usize,
        x: i32,
        y: i32,
    ) -> RenderResult<()> {
        let end = offset
            .checked_add(length)
            .filter(|&end| end <= data.len())
            .ok_or(RenderError::InvalidRange { offset, length, len: data.len() })?;

        match ctx.fast_path_strike() {
            Some(strike) => {
                self.primitives
                    .draw_unicodes(&mut *ctx.surface, strike.id(), data, offset, length, x as f32, y as f32);
                Ok(())
            }
            None => ctx.fill_text(&String::from_utf16_lossy(&data[offset..end]), x as f64, y as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontConfig;
    use crate::dummy_engine::{DrawCall, DummyEngine, DummyShaper, DummySurface};
    use crate::font::NativeFont;
    use kurbo::{Affine, Point};

    struct Fixture {
        engine: Arc<DummyEngine>,
        shaper: DummyShaper,
        surface: DummySurface,
    }

    impl Fixture {
        fn new(engine: DummyEngine) -> Self {
            Self { engine: Arc::new(engine), shaper: DummyShaper::new(), surface: DummySurface::new() }
        }

        fn font(&self, name: &str, size: f32) -> Font {
            let face = NativeFont::new(self.engine.clone(), Arc::new(FontConfig::default()), name);
            Font::native(Arc::new(face), size)
        }

        fn dispatcher(&self) -> TextRenderDispatcher<NativePrimitives> {
            TextRenderDispatcher::native(self.engine.clone())
        }
    }

    fn gradient() -> Paint {
        Paint::LinearGradient { start: Point::ORIGIN, end: Point::new(1.0, 0.0), stops: vec![] }
    }

    fn units(text: &str) -> Vec<u16> {
        text.encode_utf16().collect()
    }

    #[test]
    fn test_simple_paint_with_native_strike_is_forwarded() {
        let mut fx = Fixture::new(DummyEngine::new());
        let font = fx.font("Menlo-Regular", 12.0);
        let pipe = fx.dispatcher();
        let mut ctx = TextContext::new(&mut fx.surface, &fx.shaper, font);

        pipe.draw_string(&mut ctx, "hello", 1.0, 2.0).unwrap();
        let strike = ctx.strike().native_id().unwrap();
        drop(ctx);

        assert_eq!(
            fx.engine.draw_calls(),
            vec![DrawCall::String { strike, text: "hello".to_string(), x: 1.0, y: 2.0 }]
        );
        assert!(fx.surface.fills.is_empty());
        assert!(fx.shaper.shaped().is_empty());
    }

    #[test]
    fn test_non_simple_paint_takes_shape_path() {
        let mut fx = Fixture::new(DummyEngine::new());
        let font = fx.font("Menlo-Regular", 10.0);
        let pipe = fx.dispatcher();
        let mut ctx = TextContext::new(&mut fx.surface, &fx.shaper, font).with_paint(gradient());

        pipe.draw_string(&mut ctx, "abc", 0.0, 0.0).unwrap();
        drop(ctx);

        assert!(fx.engine.draw_calls().is_empty());
        assert_eq!(fx.shaper.shaped(), ["abc"]);
        assert_eq!(fx.surface.fills.len(), 3);
        assert!(fx.surface.fills.iter().all(|fill| fill.paint == gradient()));
    }

    #[test]
    fn test_missing_native_strike_takes_shape_path() {
        let mut fx = Fixture::new(DummyEngine::new().with_failing_font("Ghost"));
        let font = fx.font("Ghost", 10.0);
        let pipe = fx.dispatcher();
        let mut ctx = TextContext::new(&mut fx.surface, &fx.shaper, font);

        pipe.draw_string(&mut ctx, "ab", 0.0, 0.0).unwrap();
        drop(ctx);

        assert!(fx.engine.draw_calls().is_empty());
        assert_eq!(fx.surface.fills.len(), 2);
    }

    #[test]
    fn test_shape_path_sets_and_restores_antialias() {
        let mut fx = Fixture::new(DummyEngine::new());
        fx.surface.set_antialias(AntialiasHint::Off);
        fx.surface.clear();
        let font = fx.font("Menlo-Regular", 10.0);
        let pipe = fx.dispatcher();
        let frc = FontRenderContext::new(Affine::IDENTITY, true, false);
        let mut ctx = TextContext::new(&mut fx.surface, &fx.shaper, font)
            .with_paint(gradient())
            .with_render_context(frc);

        pipe.draw_string(&mut ctx, "ab", 0.0, 0.0).unwrap();
        drop(ctx);

        assert!(fx.surface.fills.iter().all(|fill| fill.antialias == AntialiasHint::On));
        assert_eq!(fx.surface.antialias(), AntialiasHint::Off);
        assert_eq!(fx.surface.antialias_changes, [AntialiasHint::On, AntialiasHint::Off]);
    }

    #[test]
    fn test_antialias_restored_when_fill_fails() {
        let mut fx = Fixture::new(DummyEngine::new());
        fx.surface = DummySurface::new().with_fail_after(1);
        let font = fx.font("Menlo-Regular", 10.0);
        let pipe = fx.dispatcher();
        let frc = FontRenderContext::new(Affine::IDENTITY, true, false);
        let mut ctx = TextContext::new(&mut fx.surface, &fx.shaper, font)
            .with_paint(gradient())
            .with_render_context(frc);

        let result = pipe.draw_string(&mut ctx, "abc", 0.0, 0.0);
        drop(ctx);

        assert!(matches!(result, Err(RenderError::FillFailed { .. })));
        assert_eq!(fx.surface.fills.len(), 1);
        assert_eq!(fx.surface.antialias(), AntialiasHint::Default);
    }

    #[test]
    fn test_glyph_vector_font_is_swapped_and_restored() {
        let mut fx = Fixture::new(DummyEngine::new());
        let menlo = fx.font("Menlo-Regular", 12.0);
        let courier = fx.font("Courier", 20.0);
        let glyphs = fx.shaper.shape(&courier, &FontRenderContext::default(), "xy").unwrap();
        let pipe = fx.dispatcher();
        let mut ctx = TextContext::new(&mut fx.surface, &fx.shaper, menlo.clone());

        pipe.draw_glyph_vector(&mut ctx, &glyphs, 3.0, 4.0).unwrap();
        assert_eq!(ctx.font(), &menlo);
        drop(ctx);

        let calls = fx.engine.draw_calls();
        assert!(matches!(&calls[..], [DrawCall::Glyphs { glyphs, x, y, .. }]
            if glyphs == &vec!['x' as u32, 'y' as u32] && *x == 3.0 && *y == 4.0));
        // The strike came from the glyph vector's font
        assert_eq!(fx.engine.strike_descs()[0].glyph_tx.as_coeffs()[0], 20.0);
    }

    #[test]
    fn test_glyph_vector_shape_path_fills_outlines_and_restores_font() {
        let mut fx = Fixture::new(DummyEngine::new());
        let menlo = fx.font("Menlo-Regular", 12.0);
        let glyphs = fx.shaper.shape(&menlo, &FontRenderContext::default(), "xyz").unwrap();
        let other = fx.font("Courier", 9.0);
        let pipe = fx.dispatcher();
        let mut ctx = TextContext::new(&mut fx.surface, &fx.shaper, other.clone()).with_paint(gradient());

        pipe.draw_glyph_vector(&mut ctx, &glyphs, 0.0, 0.0).unwrap();
        assert_eq!(ctx.font(), &other);
        drop(ctx);

        assert_eq!(fx.surface.fills.len(), 3);
        assert!(fx.shaper.shaped().len() == 1, "glyph vectors are not reshaped");
    }

    #[test]
    fn test_glyph_vector_font_restored_on_failure() {
        let mut fx = Fixture::new(DummyEngine::new());
        fx.surface = DummySurface::new().with_fail_after(0);
        let menlo = fx.font("Menlo-Regular", 12.0);
        let glyphs = fx.shaper.shape(&fx.font("Courier", 9.0), &FontRenderContext::default(), "x").unwrap();
        let pipe = fx.dispatcher();
        let mut ctx = TextContext::new(&mut fx.surface, &fx.shaper, menlo.clone()).with_paint(gradient());

        assert!(pipe.draw_glyph_vector(&mut ctx, &glyphs, 0.0, 0.0).is_err());
        assert_eq!(ctx.font(), &menlo);
    }

    #[test]
    fn test_draw_chars_fast_path_passes_range() {
        let mut fx = Fixture::new(DummyEngine::new());
        let font = fx.font("Menlo-Regular", 12.0);
        let pipe = fx.dispatcher();
        let data = units("xxhelloxx");
        let mut ctx = TextContext::new(&mut fx.surface, &fx.shaper, font);

        pipe.draw_chars(&mut ctx, &data, 2, 5, 7, 8).unwrap();
        drop(ctx);

        assert!(matches!(&fx.engine.draw_calls()[..], [DrawCall::Unicodes { offset: 2, length: 5, x, y, .. }]
            if *x == 7.0 && *y == 8.0));
    }

    #[test]
    fn test_draw_chars_shape_path_uses_range_only() {
        let mut fx = Fixture::new(DummyEngine::new());
        let font = fx.font("Menlo-Regular", 12.0);
        let pipe = fx.dispatcher();
        let data = units("xxhelloxx");
        let mut ctx = TextContext::new(&mut fx.surface, &fx.shaper, font).with_paint(Paint::Pattern { id: 1 });

        pipe.draw_chars(&mut ctx, &data, 2, 5, 0, 0).unwrap();
        drop(ctx);

        assert_eq!(fx.shaper.shaped(), ["hello"]);
        assert_eq!(fx.surface.fills.len(), 5);
    }

    #[test]
    fn test_draw_chars_split_surrogate_pair_shapes_replacement() {
        let mut fx = Fixture::new(DummyEngine::new());
        let font = fx.font("Menlo-Regular", 12.0);
        let pipe = fx.dispatcher();
        let data = units("a\u{1F600}");
        let mut ctx = TextContext::new(&mut fx.surface, &fx.shaper, font).with_paint(gradient());

        pipe.draw_chars(&mut ctx, &data, 0, 2, 0, 0).unwrap();
        pipe.draw_char(&mut ctx, data[2], 0.0, 0.0).unwrap();
        drop(ctx);

        assert_eq!(fx.shaper.shaped(), ["a\u{FFFD}", "\u{FFFD}"]);
        assert!(fx.engine.draw_calls().is_empty());
    }

    #[test]
    fn test_draw_chars_rejects_bad_range() {
        let mut fx = Fixture::new(DummyEngine::new());
        let font = fx.font("Menlo-Regular", 12.0);
        let pipe = fx.dispatcher();
        let data = units("abc");
        let mut ctx = TextContext::new(&mut fx.surface, &fx.shaper, font);

        assert_eq!(
            pipe.draw_chars(&mut ctx, &data, 2, 2, 0, 0),
            Err(RenderError::InvalidRange { offset: 2, length: 2, len: 3 })
        );
        assert!(pipe.draw_chars(&mut ctx, &data, usize::MAX, 2, 0, 0).is_err());
        assert!(pipe.draw_chars(&mut ctx, &data, 3, 0, 0, 0).is_ok());
        drop(ctx);
        assert_eq!(fx.engine.draw_calls().len(), 1);
    }

    #[test]
    fn test_draw_char_uses_single_unicode_primitive() {
        let mut fx = Fixture::new(DummyEngine::new());
        let font = fx.font("Menlo-Regular", 12.0);
        let pipe = fx.dispatcher();
        let mut ctx = TextContext::new(&mut fx.surface, &fx.shaper, font);

        pipe.draw_char(&mut ctx, 'q' as u16, 1.0, 1.0).unwrap();
        drop(ctx);

        assert!(matches!(&fx.engine.draw_calls()[..], [DrawCall::OneUnicode { unicode, .. }] if *unicode == 'q' as u16));
    }

    #[test]
    fn test_shaping_failure_propagates() {
        let mut fx = Fixture::new(DummyEngine::new());
        fx.shaper = DummyShaper::failing();
        let font = fx.font("Menlo-Regular", 12.0);
        let pipe = fx.dispatcher();
        let mut ctx = TextContext::new(&mut fx.surface, &fx.shaper, font).with_paint(gradient());

        assert!(matches!(
            pipe.draw_string(&mut ctx, "a", 0.0, 0.0),
            Err(RenderError::ShapingFailed { .. })
        ));
    }

    #[test]
    fn test_strike_is_reused_until_font_changes() {
        let mut fx = Fixture::new(DummyEngine::new());
        let font = fx.font("Menlo-Regular", 12.0);
        let bigger = fx.font("Menlo-Regular", 24.0);
        let pipe = fx.dispatcher();
        let mut ctx = TextContext::new(&mut fx.surface, &fx.shaper, font);

        pipe.draw_string(&mut ctx, "a", 0.0, 0.0).unwrap();
        pipe.draw_string(&mut ctx, "b", 0.0, 0.0).unwrap();
        assert_eq!(fx.engine.strike_descs().len(), 1);

        ctx.set_font(bigger);
        pipe.draw_string(&mut ctx, "c", 0.0, 0.0).unwrap();
        assert_eq!(fx.engine.strike_descs().len(), 2);
    }

    #[test]
    fn test_trace_wrap_tags_and_delegates() {
        let mut fx = Fixture::new(DummyEngine::new());
        let font = fx.font("Menlo-Regular", 12.0);
        let pipe = fx.dispatcher().trace_wrap();
        let data = units("hi");
        let mut ctx = TextContext::new(&mut fx.surface, &fx.shaper, font.clone());

        pipe.draw_string(&mut ctx, "hi", 0.0, 0.0).unwrap();
        pipe.draw_chars(&mut ctx, &data, 0, 2, 0, 0).unwrap();
        pipe.draw_char(&mut ctx, data[0], 0.0, 0.0).unwrap();
        let glyphs = fx.shaper.shape(&font, &FontRenderContext::default(), "hi").unwrap();
        pipe.draw_glyph_vector(&mut ctx, &glyphs, 0.0, 0.0).unwrap();
        drop(ctx);

        let tracer = pipe.primitives();
        for primitive in Primitive::ALL {
            assert_eq!(tracer.count(primitive), 1, "{}", primitive.tag());
        }
        assert_eq!(fx.engine.draw_calls().len(), 4);
    }

    #[test]
    fn test_trace_wrap_does_not_trace_shape_path() {
        let mut fx = Fixture::new(DummyEngine::new());
        let font = fx.font("Menlo-Regular", 12.0);
        let pipe = fx.dispatcher().trace_wrap();
        let mut ctx = TextContext::new(&mut fx.surface, &fx.shaper, font).with_paint(gradient());

        pipe.draw_string(&mut ctx, "hi", 0.0, 0.0).unwrap();
        assert_eq!(pipe.primitives().count(Primitive::DrawString), 0);
    }

    #[test]
    fn test_primitive_tags() {
        assert_eq!(Primitive::DrawString.tag(), "NativeDrawString");
        assert_eq!(Primitive::DrawGlyphs.tag(), "NativeDrawGlyphs");
        assert_eq!(Primitive::DrawUnicodes.tag(), "NativeDrawUnicodes");
        assert_eq!(Primitive::DrawUnicode.tag(), "NativeDrawUnicode");
    }
}
