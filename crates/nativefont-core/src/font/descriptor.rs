//! Physical font descriptor backed by the native engine

use crate::config::{FontConfig, FontRenderContext};
use crate::constants::{FWEIGHT_NORMAL, FWIDTH_NORMAL, ITALIC_DERIVED_SUFFIX};
use crate::error::{FontError, FontResult};
use crate::font::fallback::{CompositeFallbackBuilder, CompositeFont, FallbackChain};
use crate::font::metrics::{weight_class, width_class};
use crate::font::strike::{FontStrike, NativeStrike, StrikeDesc};
use crate::font::{lock, FontStyle, NativeFontHandle, NativeFontId};
use crate::traits::{FontRegistry, NativeFontEngine};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

struct CachedChain {
    chain: Arc<FallbackChain>,
    /// Built without a native font
    degraded: bool,
}

/// One face known to the native engine.
///
/// Identity is the native name plus the style bits: two descriptors naming
/// the same native face with different styles are different fonts.
pub struct NativeFont {
    full_name: String,
    family_name: String,
    native_name: String,
    style: FontStyle,
    fake_italic: bool,
    handle: NativeFontHandle,
    width: Mutex<Option<u8>>,
    weight: Mutex<Option<u16>>,
    composite: Mutex<Option<CachedChain>>,
    engine: Arc<dyn NativeFontEngine>,
    config: Arc<FontConfig>,
}

impl NativeFont {
    /// Describes the face `full_name`, which is also its family and native name
    pub fn new(engine: Arc<dyn NativeFontEngine>, config: Arc<FontConfig>, full_name: &str) -> Self {
        Self::with_family(engine, config, full_name, full_name)
    }

    pub fn with_family(
        engine: Arc<dyn NativeFontEngine>,
        config: Arc<FontConfig>,
        full_name: &str,
        family_name: &str,
    ) -> Self {
        let style = FontStyle::from_full_name(full_name);
        Self::from_parts(engine, config, full_name, family_name, full_name, style, false)
    }

    fn from_parts(
        engine: Arc<dyn NativeFontEngine>,
        config: Arc<FontConfig>,
        full_name: &str,
        family_name: &str,
        native_name: &str,
        style: FontStyle,
        fake_italic: bool,
    ) -> Self {
        let handle = NativeFontHandle::new(engine.clone(), native_name, style, config.failure_policy);
        Self {
            full_name: full_name.to_string(),
            family_name: family_name.to_string(),
            native_name: native_name.to_string(),
            style,
            fake_italic,
            handle,
            width: Mutex::new(None),
            weight: Mutex::new(None),
            composite: Mutex::new(None),
            engine,
            config,
        }
    }

    /// Same native face published under a logical family name
    pub fn logical_alias(&self, logical_family: &str) -> NativeFont {
        Self::from_parts(
            self.engine.clone(),
            self.config.clone(),
            logical_family,
            logical_family,
            &self.native_name,
            self.style,
            self.fake_italic,
        )
    }

    /// Derives a synthetic italic from this face.
    ///
    /// The variant asks the engine for the same native face with the italic
    /// bit set, and its strikes are sheared. Nothing native is created here.
    pub fn create_italic_variant(&self) -> FontResult<NativeFont> {
        if self.style.contains(FontStyle::ITALIC) {
            return Err(FontError::AlreadyItalic { name: self.full_name.clone() });
        }
        // Every strike of the variant is sheared by the configured factor
        self.config.validate()?;

        let separator = if self.style == FontStyle::BOLD { "" } else { "-" };
        let full_name = format!("{}{}{}", self.full_name, separator, ITALIC_DERIVED_SUFFIX);
        Ok(Self::from_parts(
            self.engine.clone(),
            self.config.clone(),
            &full_name,
            &self.family_name,
            &self.native_name,
            self.style | FontStyle::ITALIC,
            true,
        ))
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn native_name(&self) -> &str {
        &self.native_name
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn is_fake_italic(&self) -> bool {
        self.fake_italic
    }

    pub fn config(&self) -> &FontConfig {
        &self.config
    }

    pub fn handle(&self) -> &NativeFontHandle {
        &self.handle
    }

    /// The native font, created on first use
    pub fn native_font(&self) -> Option<NativeFontId> {
        self.handle.acquire()
    }

    /// Like [`native_font`](Self::native_font), for callers that cannot
    /// proceed without it
    pub fn try_native_font(&self) -> FontResult<NativeFontId> {
        self.handle
            .acquire()
            .ok_or_else(|| FontError::NativeFontUnavailable { name: self.full_name.clone() })
    }

    /// Width class in `1..=9`. Cached once the native font answers.
    pub fn width(&self) -> u8 {
        let mut cached = lock(&self.width);
        if let Some(width) = *cached {
            return width;
        }

        let Some(font) = self.handle.acquire() else {
            return FWIDTH_NORMAL;
        };
        let width = width_class(self.engine.width_scalar(font));
        *cached = Some(width);
        width
    }

    /// Weight in `0..=1000`. A regular native weight is answered without
    /// being cached.
    pub fn weight(&self) -> u16 {
        let mut cached = lock(&self.weight);
        if let Some(weight) = *cached {
            return weight;
        }

        let Some(font) = self.handle.acquire() else {
            return FWEIGHT_NORMAL;
        };
        let scalar = self.engine.weight_scalar(font);
        if scalar == 0.0 {
            return FWEIGHT_NORMAL;
        }
        let weight = weight_class(scalar);
        *cached = Some(weight);
        weight
    }

    /// Families the platform falls back to for this face
    pub fn cascade_list(&self) -> Option<Vec<String>> {
        let font = self.handle.acquire()?;
        Some(self.engine.cascade_list(font))
    }

    /// Raw bytes of an sfnt table, e.g. `u32::from_be_bytes(*b"cmap")`
    pub fn table_bytes(&self, tag: u32) -> Option<Vec<u8>> {
        let font = self.handle.acquire()?;
        self.engine.table_bytes(font, tag)
    }

    /// Creates a strike, shearing the glyph transform for fake italics
    pub fn create_strike(&self, desc: &StrikeDesc) -> FontStrike {
        let desc = if self.fake_italic {
            desc.sheared(self.config.fake_italic_shear)
        } else {
            *desc
        };

        let Some(font) = self.handle.acquire() else {
            return FontStrike::Outline;
        };
        match self.engine.create_strike(font, &desc) {
            Ok(id) => FontStrike::Native(Arc::new(NativeStrike::new(self.engine.clone(), id, desc))),
            Err(e) => {
                tracing::debug!("No native strike for {}: {}", self.full_name, e);
                FontStrike::Outline
            }
        }
    }

    pub fn strike(&self, size: f32, frc: &FontRenderContext) -> FontStrike {
        self.create_strike(&StrikeDesc::new(size, frc))
    }

    /// Strike under the configured default render context
    pub fn default_strike(&self, size: f32) -> FontStrike {
        self.strike(size, &self.config.render_context)
    }

    /// This face followed by its fallback chain, built on first call.
    ///
    /// A chain built while the native font is missing is only cached when
    /// the handle remembers the failure, and is dropped once the handle is
    /// disposed. A cached chain whose fallback faces have since been dropped
    /// is rebuilt.
    pub fn composite_font(self: &Arc<Self>, registry: &dyn FontRegistry) -> Arc<CompositeFont> {
        let mut cached = lock(&self.composite);
        if let Some(entry) = cached.as_ref() {
            let stale = entry.degraded && !self.handle.is_failed();
            if !stale {
                if let Some(composite) = CompositeFont::from_chain(self.clone(), entry.chain.clone()) {
                    return Arc::new(composite);
                }
            }
            tracing::debug!("Rebuilding fallback chain for {}", self.full_name);
        }

        let composite = CompositeFallbackBuilder::new(registry, &self.config).build(self);
        *cached = if self.handle.is_created() {
            Some(CachedChain { chain: composite.chain().clone(), degraded: false })
        } else if self.handle.is_failed() {
            Some(CachedChain { chain: composite.chain().clone(), degraded: true })
        } else {
            None
        };
        Arc::new(composite)
    }

    /// Drops the cached fallback chain; the next request rebuilds it
    pub fn invalidate_composite(&self) {
        *lock(&self.composite) = None;
    }

    /// Releases the native font now instead of at drop
    pub fn dispose_native(&self) {
        self.handle.dispose();
    }
}

impl PartialEq for NativeFont {
    fn eq(&self, other: &Self) -> bool {
        self.native_name == other.native_name && self.style == other.style
    }
}

impl Eq for NativeFont {}

impl Hash for NativeFont {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.native_name.hash(state);
        self.style.bits().hash(state);
    }
}

impl fmt::Display for NativeFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NativeFont {{ full_name: {}, family_name: {}, style: {} }}",
            self.full_name, self.family_name, self.style
        )
    }
}

impl fmt::Debug for NativeFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFont")
            .field("full_name", &self.full_name)
            .field("family_name", &self.family_name)
            .field("native_name", &self.native_name)
            .field("style", &self.style)
            .field("fake_italic", &self.fake_italic)
            .field("handle", &self.handle)
            .finish()
    }
}
