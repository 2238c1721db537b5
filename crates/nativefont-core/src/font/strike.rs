//! Strike descriptions and native strike ownership

use crate::config::FontRenderContext;
use crate::font::NativeStrikeId;
use crate::traits::NativeFontEngine;
use kurbo::Affine;
use std::fmt;
use std::sync::Arc;

/// Size and transform a strike is rendered at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeDesc {
    /// Font space to device space, point size included
    pub glyph_tx: Affine,
    /// Device transform of the render context
    pub device_tx: Affine,
    pub antialiased: bool,
    pub fractional_metrics: bool,
}

impl StrikeDesc {
    pub fn new(size: f32, frc: &FontRenderContext) -> Self {
        Self {
            glyph_tx: frc.transform * Affine::scale(size as f64),
            device_tx: frc.transform,
            antialiased: frc.antialiased,
            fractional_metrics: frc.fractional_metrics,
        }
    }

    /// Concatenates a horizontal shear onto the glyph transform
    pub fn sheared(&self, shear_x: f64) -> Self {
        Self {
            glyph_tx: self.glyph_tx * Affine::skew(shear_x, 0.0),
            ..*self
        }
    }
}

/// A strike created by the native engine, released on drop
pub struct NativeStrike {
    engine: Arc<dyn NativeFontEngine>,
    id: NativeStrikeId,
    desc: StrikeDesc,
}

impl NativeStrike {
    pub fn new(engine: Arc<dyn NativeFontEngine>, id: NativeStrikeId, desc: StrikeDesc) -> Self {
        Self { engine, id, desc }
    }

    pub fn id(&self) -> NativeStrikeId {
        self.id
    }

    pub fn desc(&self) -> &StrikeDesc {
        &self.desc
    }
}

impl Drop for NativeStrike {
    fn drop(&mut self) {
        self.engine.dispose_strike(self.id);
    }
}

impl fmt::Debug for NativeStrike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeStrike")
            .field("id", &self.id)
            .field("desc", &self.desc)
            .finish()
    }
}

/// The strike a text context resolved for its current font
#[derive(Debug, Clone)]
pub enum FontStrike {
    /// Backed by the native engine; eligible for the glyph primitives
    Native(Arc<NativeStrike>),
    /// No native strike could be made; text must go through outlines
    Outline,
}

impl FontStrike {
    pub fn is_native(&self) -> bool {
        matches!(self, FontStrike::Native(_))
    }

    pub fn native_id(&self) -> Option<NativeStrikeId> {
        match self {
            FontStrike::Native(strike) => Some(strike.id()),
            FontStrike::Outline => None,
        }
    }
}
