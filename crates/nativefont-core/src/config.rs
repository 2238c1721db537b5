// src/config.rs
use crate::constants::{
    DEFAULT_FAKE_ITALIC_SHEAR, DEFAULT_FAMILY_ALIASES, DEFAULT_SUPPLEMENTARY_FALLBACK,
};
use crate::error::{FontError, FontResult};
use kurbo::Affine;

/// What a handle does after the native engine refuses to create a font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreationFailurePolicy {
    /// Leave the handle unset; every later access asks the engine again.
    #[default]
    Retry,
    /// Remember the failure until the handle is disposed.
    CacheFailure,
}

/// Rendering parameters a strike is built for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontRenderContext {
    pub transform: Affine,
    pub antialiased: bool,
    pub fractional_metrics: bool,
}

impl Default for FontRenderContext {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            antialiased: false,
            fractional_metrics: false,
        }
    }
}

impl FontRenderContext {
    pub fn new(transform: Affine, antialiased: bool, fractional_metrics: bool) -> Self {
        Self { transform, antialiased, fractional_metrics }
    }
}

#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Family appended to every platform cascade list
    pub supplementary_fallback: String,
    /// Native family names rewritten before registry lookup
    pub family_aliases: Vec<(String, String)>,
    /// Horizontal shear applied to fake italic strikes
    pub fake_italic_shear: f64,
    pub failure_policy: CreationFailurePolicy,
    pub render_context: FontRenderContext,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            supplementary_fallback: DEFAULT_SUPPLEMENTARY_FALLBACK.to_string(),
            family_aliases: DEFAULT_FAMILY_ALIASES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            fake_italic_shear: DEFAULT_FAKE_ITALIC_SHEAR,
            failure_policy: CreationFailurePolicy::default(),
            render_context: FontRenderContext::default(),
        }
    }
}

impl FontConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_supplementary_fallback(mut self, family: &str) -> Self {
        self.supplementary_fallback = family.to_string();
        self
    }

    pub fn with_family_alias(mut self, from: &str, to: &str) -> Self {
        self.family_aliases.retain(|(existing, _)| existing != from);
        self.family_aliases.push((from.to_string(), to.to_string()));
        self
    }

    pub fn with_fake_italic_shear(mut self, shear: f64) -> Self {
        self.fake_italic_shear = shear;
        self
    }

    pub fn with_failure_policy(mut self, policy: CreationFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_render_context(mut self, frc: FontRenderContext) -> Self {
        self.render_context = frc;
        self
    }

    /// Rewrites a known-bad native family name, if it has an alias
    pub fn resolve_alias<'a>(&'a self, family: &'a str) -> &'a str {
        self.family_aliases
            .iter()
            .find(|(from, _)| from == family)
            .map(|(_, to)| to.as_str())
            .unwrap_or(family)
    }

    pub fn validate(&self) -> FontResult<()> {
        if !self.fake_italic_shear.is_finite() {
            return Err(FontError::ConfigurationError {
                field: "fake_italic_shear".to_string(),
                value: self.fake_italic_shear.to_string(),
            });
        }
        if self.supplementary_fallback.trim().is_empty() {
            return Err(FontError::ConfigurationError {
                field: "supplementary_fallback".to_string(),
                value: self.supplementary_fallback.clone(),
            });
        }
        Ok(())
    }
}
