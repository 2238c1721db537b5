// src/drawing.rs
use crate::font::Font;
use crate::traits::RenderSurface;
use kurbo::{Affine, BezPath, Point};
use std::ops::{Deref, DerefMut};

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
}

/// What text is filled with
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    LinearGradient { start: Point, end: Point, stops: Vec<GradientStop> },
    RadialGradient { center: Point, radius: f64, stops: Vec<GradientStop> },
    /// Image pattern registered with the surface
    Pattern { id: u64 },
}

impl Paint {
    /// Only solid colors can go through the native glyph primitives;
    /// translucent colors still count as solid.
    pub fn is_simple_color(&self) -> bool {
        matches!(self, Paint::Solid(_))
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AntialiasHint {
    #[default]
    Default,
    On,
    Off,
}

impl AntialiasHint {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            AntialiasHint::On
        } else {
            AntialiasHint::Off
        }
    }
}

/// One glyph of a shaped run, outline in font units relative to `position`
#[derive(Clone, Debug)]
pub struct PositionedGlyph {
    pub code: u32,
    pub position: Point,
    pub outline: BezPath,
}

/// Shaped glyphs together with the font that produced them
#[derive(Clone, Debug)]
pub struct GlyphVector {
    font: Font,
    glyphs: Vec<PositionedGlyph>,
}

impl GlyphVector {
    pub fn new(font: Font, glyphs: Vec<PositionedGlyph>) -> Self {
        Self { font, glyphs }
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn num_glyphs(&self) -> usize {
        self.glyphs.len()
    }

    pub fn glyphs(&self) -> &[PositionedGlyph] {
        &self.glyphs
    }

    pub fn glyph_codes(&self) -> Vec<u32> {
        self.glyphs.iter().map(|g| g.code).collect()
    }

    /// Outline of glyph `index` with the run's origin at (`x`, `y`)
    pub fn glyph_outline(&self, index: usize, x: f32, y: f32) -> Option<BezPath> {
        let glyph = self.glyphs.get(index)?;
        let offset = (x as f64 + glyph.position.x, y as f64 + glyph.position.y);
        Some(Affine::translate(offset) * glyph.outline.clone())
    }

    pub fn outlines(&self, x: f32, y: f32) -> impl Iterator<Item = BezPath> + '_ {
        (0..self.glyphs.len()).filter_map(move |i| self.glyph_outline(i, x, y))
    }
}

/// Sets a surface's antialias hint and puts the previous one back on drop,
/// including when a fill fails halfway through a run
pub struct AntialiasGuard<'s, S: RenderSurface + ?Sized> {
    surface: &'s mut S,
    saved: AntialiasHint,
}

impl<'s, S: RenderSurface + ?Sized> AntialiasGuard<'s, S> {
    pub fn new(surface: &'s mut S, hint: AntialiasHint) -> Self {
        let saved = surface.antialias();
        surface.set_antialias(hint);
        Self { surface, saved }
    }
}

impl<S: RenderSurface + ?Sized> Deref for AntialiasGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: RenderSurface + ?Sized> DerefMut for AntialiasGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: RenderSurface + ?Sized> Drop for AntialiasGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.set_antialias(self.saved);
    }
}
