//! Native font descriptors, their handles and fallback chains
//!
//! A [`NativeFont`] names one face known to the platform engine. It owns a
//! lazily created [`NativeFontHandle`], answers width/weight queries through
//! the classification functions in [`metrics`], derives synthetic italics
//! and builds its [`CompositeFont`] fallback chain on demand.

pub mod descriptor;
pub mod fallback;
pub mod handle;
pub mod metrics;
pub mod strike;

pub use descriptor::NativeFont;
pub use fallback::{CompositeFallbackBuilder, CompositeFont, FallbackChain};
pub use handle::NativeFontHandle;
pub use metrics::{weight_class, width_class};
pub use strike::{FontStrike, NativeStrike, StrikeDesc};

use crate::config::FontRenderContext;
use std::fmt;
use std::num::NonZeroU64;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

bitflags::bitflags! {
    /// Style bits shared with the native engine. An empty set is plain.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FontStyle: u32 {
        const BOLD = 1;
        const ITALIC = 2;
    }
}

impl FontStyle {
    pub const PLAIN: FontStyle = FontStyle::empty();

    /// Infers style bits from a face's full name, e.g. "Menlo-BoldItalic"
    pub fn from_full_name(full_name: &str) -> Self {
        const BOLD_ITALIC: [&str; 10] = [
            "bolditalic", "bold-italic", "bold italic",
            "boldoblique", "bold-oblique", "bold oblique",
            "demibold italic", "demibold-italic",
            "demibold oblique", "demibold-oblique",
        ];
        const ITALIC: [&str; 2] = ["italic", "oblique"];
        const BOLD: [&str; 5] = ["bold", "demibold", "demi-bold", "demi bold", "negreta"];

        let name = full_name.to_lowercase();
        if BOLD_ITALIC.iter().any(|s| name.contains(s)) {
            FontStyle::BOLD | FontStyle::ITALIC
        } else if ITALIC.iter().any(|s| name.contains(s)) {
            FontStyle::ITALIC
        } else if BOLD.iter().any(|s| name.contains(s)) {
            FontStyle::BOLD
        } else {
            FontStyle::PLAIN
        }
    }
}

impl Default for FontStyle {
    fn default() -> Self {
        FontStyle::PLAIN
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.contains(FontStyle::BOLD), self.contains(FontStyle::ITALIC)) {
            (false, false) => write!(f, "plain"),
            (true, false) => write!(f, "bold"),
            (false, true) => write!(f, "italic"),
            (true, true) => write!(f, "bold-italic"),
        }
    }
}

/// How hard the registry may try when a family is not installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackPolicy {
    /// Return nothing unless the exact family exists
    NoFallback,
    /// Substitute another physical font
    PhysicalFallback,
    /// Substitute a logical (composite) font
    LogicalFallback,
}

/// Opaque id of a font object living inside the native engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeFontId(NonZeroU64);

impl NativeFontId {
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

/// Opaque id of a native strike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeStrikeId(NonZeroU64);

impl NativeStrikeId {
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

/// Every kind of font face the registry can hand out.
///
/// The set is closed: code that needs a native face matches on
/// [`Font2D::Native`] instead of probing types at runtime.
#[derive(Debug, Clone)]
pub enum Font2D {
    Native(Arc<NativeFont>),
    Composite(Arc<CompositeFont>),
}

impl Font2D {
    pub fn family_name(&self) -> &str {
        match self {
            Font2D::Native(font) => font.family_name(),
            Font2D::Composite(composite) => composite.primary().family_name(),
        }
    }

    pub fn style(&self) -> FontStyle {
        match self {
            Font2D::Native(font) => font.style(),
            Font2D::Composite(composite) => composite.primary().style(),
        }
    }

    pub fn as_native(&self) -> Option<&Arc<NativeFont>> {
        match self {
            Font2D::Native(font) => Some(font),
            Font2D::Composite(_) => None,
        }
    }

    /// The face whose strike renders this font
    pub fn strike_face(&self) -> &Arc<NativeFont> {
        match self {
            Font2D::Native(font) => font,
            Font2D::Composite(composite) => composite.primary(),
        }
    }
}

impl PartialEq for Font2D {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Font2D::Native(a), Font2D::Native(b)) => a == b,
            (Font2D::Composite(a), Font2D::Composite(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A face at a point size, as installed on a text context
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    face: Font2D,
    size: f32,
}

impl Font {
    pub fn new(face: Font2D, size: f32) -> Self {
        Self { face, size }
    }

    pub fn native(face: Arc<NativeFont>, size: f32) -> Self {
        Self::new(Font2D::Native(face), size)
    }

    pub fn face(&self) -> &Font2D {
        &self.face
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Resolves the strike this font draws with under `frc`
    pub fn strike(&self, frc: &FontRenderContext) -> FontStrike {
        self.face.strike_face().strike(self.size, frc)
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Guarded state is plain data, so a poisoned lock is still usable.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
