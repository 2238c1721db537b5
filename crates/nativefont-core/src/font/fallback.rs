//! Composite fonts built from the platform cascade list

use crate::config::FontConfig;
use crate::font::{Font2D, FallbackPolicy, FontStyle, NativeFont};
use crate::traits::{CompositeGlyphMapper, FontRegistry, SlotGlyph};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Weak};

/// Fallback faces of one primary font plus the mapper that routes glyph
/// lookups across all slots.
///
/// Faces are held weakly: the chain is cached on its primary, and two faces
/// that cascade to each other would otherwise keep each other alive.
pub struct FallbackChain {
    fonts: Vec<Weak<NativeFont>>,
    mapper: Box<dyn CompositeGlyphMapper>,
}

impl FallbackChain {
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Strong references to every face, or `None` once any of them is gone
    pub fn upgrade(&self) -> Option<Vec<Arc<NativeFont>>> {
        self.fonts.iter().map(Weak::upgrade).collect()
    }

    pub fn mapper(&self) -> &dyn CompositeGlyphMapper {
        self.mapper.as_ref()
    }
}

impl fmt::Debug for FallbackChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.fonts
                    .iter()
                    .map(|font| font.upgrade().map(|font| font.full_name().to_string())),
            )
            .finish()
    }
}

/// A primary face followed by its fallback faces
pub struct CompositeFont {
    primary: Arc<NativeFont>,
    fallbacks: Vec<Arc<NativeFont>>,
    chain: Arc<FallbackChain>,
}

impl CompositeFont {
    /// Pins the faces of `chain` behind `primary`. `None` if a fallback
    /// face has been dropped since the chain was built.
    pub fn from_chain(primary: Arc<NativeFont>, chain: Arc<FallbackChain>) -> Option<Self> {
        let fallbacks = chain.upgrade()?;
        Some(Self { primary, fallbacks, chain })
    }

    pub fn primary(&self) -> &Arc<NativeFont> {
        &self.primary
    }

    pub fn fallbacks(&self) -> &[Arc<NativeFont>] {
        &self.fallbacks
    }

    pub fn chain(&self) -> &Arc<FallbackChain> {
        &self.chain
    }

    pub fn num_slots(&self) -> usize {
        1 + self.fallbacks.len()
    }

    /// Slot 0 is the primary
    pub fn slot(&self, index: usize) -> Option<&Arc<NativeFont>> {
        match index {
            0 => Some(&self.primary),
            n => self.fallbacks.get(n - 1),
        }
    }

    pub fn slots(&self) -> impl Iterator<Item = &Arc<NativeFont>> {
        std::iter::once(&self.primary).chain(self.fallbacks.iter())
    }

    pub fn char_to_glyph(&self, ch: char) -> Option<SlotGlyph> {
        self.chain.mapper.char_to_glyph(ch)
    }

    pub fn shares_chain_with(&self, other: &CompositeFont) -> bool {
        Arc::ptr_eq(&self.chain, &other.chain)
    }
}

impl fmt::Debug for CompositeFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeFont")
            .field("primary", &self.primary.full_name())
            .field("fallbacks", &self.chain)
            .finish()
    }
}

/// Resolves a primary font's cascade list into a [`CompositeFont`]
pub struct CompositeFallbackBuilder<'a> {
    registry: &'a dyn FontRegistry,
    config: &'a FontConfig,
}

impl<'a> CompositeFallbackBuilder<'a> {
    pub fn new(registry: &'a dyn FontRegistry, config: &'a FontConfig) -> Self {
        Self { registry, config }
    }

    /// Cascade list of `primary` with the supplementary family appended.
    /// Empty cascade if the native font cannot be created.
    pub fn candidate_families(&self, primary: &NativeFont) -> Vec<String> {
        let mut families = match primary.cascade_list() {
            Some(families) => families,
            None => {
                tracing::warn!(
                    "No native font for {}; fallback chain limited to {}",
                    primary.full_name(),
                    self.config.supplementary_fallback
                );
                Vec::new()
            }
        };
        families.push(self.config.supplementary_fallback.clone());
        families
    }

    pub fn build(&self, primary: &Arc<NativeFont>) -> CompositeFont {
        // Same identity as NativeFont equality, so aliases of a face collapse
        let mut seen = HashSet::new();
        seen.insert((primary.native_name().to_string(), primary.style()));

        let mut fonts = Vec::new();
        for family in self.candidate_families(primary) {
            let family = self.config.resolve_alias(&family);
            let resolved = self
                .registry
                .resolve(family, FontStyle::PLAIN, FallbackPolicy::NoFallback);

            let font = match resolved {
                Some(Font2D::Native(font)) => font,
                Some(Font2D::Composite(_)) => {
                    tracing::debug!("Skipping composite font for fallback family {}", family);
                    continue;
                }
                None => {
                    tracing::debug!("Fallback family {} not installed", family);
                    continue;
                }
            };

            if !seen.insert((font.native_name().to_string(), font.style())) {
                continue;
            }
            fonts.push(font);
        }

        let slots: Vec<&NativeFont> = std::iter::once(primary.as_ref())
            .chain(fonts.iter().map(|font| font.as_ref()))
            .collect();
        let mapper = self.registry.composite_glyph_mapper(&slots);

        tracing::debug!(
            "Built fallback chain for {} with {} fonts",
            primary.full_name(),
            fonts.len()
        );
        let chain = FallbackChain {
            fonts: fonts.iter().map(Arc::downgrade).collect(),
            mapper,
        };
        CompositeFont {
            primary: primary.clone(),
            fallbacks: fonts,
            chain: Arc::new(chain),
        }
    }
}
