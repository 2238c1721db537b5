//! Dummy engine, registry and surface for testing without a platform font stack
//!
//! Everything here records what it was asked to do so tests can assert on
//! creation counts, draw calls and fills.

use crate::config::FontRenderContext;
use crate::drawing::{AntialiasHint, GlyphVector, Paint, PositionedGlyph};
use crate::error::{EngineError, RenderError, RenderResult};
use crate::font::{
    lock, FallbackPolicy, Font, Font2D, FontStyle, NativeFont, NativeFontId, NativeStrikeId,
    StrikeDesc,
};
use crate::traits::{
    CompositeGlyphMapper, FontRegistry, NativeFontEngine, RenderSurface, SlotGlyph, TextShaper,
};
use kurbo::{BezPath, Point, Rect, Shape};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

/// One call into the engine's glyph primitives
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    String { strike: NativeStrikeId, text: String, x: f64, y: f64 },
    Glyphs { strike: NativeStrikeId, glyphs: Vec<u32>, x: f32, y: f32 },
    Unicodes { strike: NativeStrikeId, unicodes: Vec<u16>, offset: usize, length: usize, x: f32, y: f32 },
    OneUnicode { strike: NativeStrikeId, unicode: u16, x: f32, y: f32 },
}

#[derive(Default)]
struct EngineState {
    live_fonts: HashMap<NativeFontId, String>,
    created: Vec<(String, FontStyle, NativeFontId)>,
    attempts: HashMap<String, usize>,
    failing: HashSet<String>,
    width_scalars: HashMap<String, f32>,
    weight_scalars: HashMap<String, f32>,
    cascades: HashMap<String, Vec<String>>,
    tables: HashMap<(String, u32), Vec<u8>>,
    disposed_fonts: Vec<NativeFontId>,
    strike_descs: Vec<StrikeDesc>,
    live_strikes: HashSet<NativeStrikeId>,
    disposed_strikes: Vec<NativeStrikeId>,
    width_queries: usize,
    weight_queries: usize,
    cascade_queries: usize,
    draw_calls: Vec<DrawCall>,
}

/// In-memory font engine. Any name creates successfully unless marked failing.
pub struct DummyEngine {
    state: Mutex<EngineState>,
    next_id: AtomicU64,
    creation_delay: Duration,
    strike_failure: bool,
}

impl Default for DummyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyEngine {
    pub fn new() -> Self {
        DummyEngine {
            state: Mutex::new(EngineState::default()),
            next_id: AtomicU64::new(1),
            creation_delay: Duration::ZERO,
            strike_failure: false,
        }
    }

    /// Sleeps inside every `create_font`, to widen race windows
    pub fn with_creation_delay_ms(mut self, millis: u64) -> Self {
        self.creation_delay = Duration::from_millis(millis);
        self
    }

    pub fn with_failing_font(self, name: &str) -> Self {
        self.set_failing(name, true);
        self
    }

    pub fn with_strike_failure(mut self) -> Self {
        self.strike_failure = true;
        self
    }

    pub fn with_width_scalar(self, name: &str, scalar: f32) -> Self {
        self.set_width_scalar(name, scalar);
        self
    }

    pub fn with_weight_scalar(self, name: &str, scalar: f32) -> Self {
        self.set_weight_scalar(name, scalar);
        self
    }

    pub fn with_cascade(self, name: &str, families: &[&str]) -> Self {
        lock(&self.state)
            .cascades
            .insert(name.to_string(), families.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn with_table(self, name: &str, tag: u32, bytes: Vec<u8>) -> Self {
        lock(&self.state).tables.insert((name.to_string(), tag), bytes);
        self
    }

    pub fn set_failing(&self, name: &str, failing: bool) {
        let mut state = lock(&self.state);
        if failing {
            state.failing.insert(name.to_string());
        } else {
            state.failing.remove(name);
        }
    }

    pub fn set_width_scalar(&self, name: &str, scalar: f32) {
        lock(&self.state).width_scalars.insert(name.to_string(), scalar);
    }

    pub fn set_weight_scalar(&self, name: &str, scalar: f32) {
        lock(&self.state).weight_scalars.insert(name.to_string(), scalar);
    }

    /// Successful creations of `name`
    pub fn creation_count(&self, name: &str) -> usize {
        lock(&self.state).created.iter().filter(|(n, _, _)| n == name).count()
    }

    /// Creations of `name` including failed ones
    pub fn creation_attempts(&self, name: &str) -> usize {
        lock(&self.state).attempts.get(name).copied().unwrap_or(0)
    }

    pub fn created_fonts(&self) -> Vec<(String, FontStyle, NativeFontId)> {
        lock(&self.state).created.clone()
    }

    pub fn disposed_fonts(&self) -> Vec<NativeFontId> {
        lock(&self.state).disposed_fonts.clone()
    }

    pub fn live_font_count(&self) -> usize {
        lock(&self.state).live_fonts.len()
    }

    pub fn width_queries(&self) -> usize {
        lock(&self.state).width_queries
    }

    pub fn weight_queries(&self) -> usize {
        lock(&self.state).weight_queries
    }

    pub fn cascade_queries(&self) -> usize {
        lock(&self.state).cascade_queries
    }

    pub fn strike_descs(&self) -> Vec<StrikeDesc> {
        lock(&self.state).strike_descs.clone()
    }

    pub fn disposed_strikes(&self) -> Vec<NativeStrikeId> {
        lock(&self.state).disposed_strikes.clone()
    }

    pub fn live_strike_count(&self) -> usize {
        lock(&self.state).live_strikes.len()
    }

    pub fn draw_calls(&self) -> Vec<DrawCall> {
        lock(&self.state).draw_calls.clone()
    }

    pub fn clear_draw_calls(&self) {
        lock(&self.state).draw_calls.clear();
    }

    fn next_raw_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn font_name(state: &EngineState, font: NativeFontId) -> String {
        state.live_fonts.get(&font).cloned().unwrap_or_default()
    }

    fn record(&self, call: DrawCall) {
        lock(&self.state).draw_calls.push(call);
    }
}

impl NativeFontEngine for DummyEngine {
    fn create_font(&self, native_name: &str, style: FontStyle) -> Result<NativeFontId, EngineError> {
        if !self.creation_delay.is_zero() {
            thread::sleep(self.creation_delay);
        }

        let mut state = lock(&self.state);
        *state.attempts.entry(native_name.to_string()).or_insert(0) += 1;
        if state.failing.contains(native_name) {
            return Err(EngineError::FontCreationFailed {
                name: native_name.to_string(),
                reason: "not installed".to_string(),
            });
        }

        let id = NativeFontId::new(self.next_raw_id()).ok_or_else(|| EngineError::Unavailable {
            message: "font ids exhausted".to_string(),
        })?;
        state.live_fonts.insert(id, native_name.to_string());
        state.created.push((native_name.to_string(), style, id));
        Ok(id)
    }

    fn dispose_font(&self, font: NativeFontId) {
        let mut state = lock(&self.state);
        state.live_fonts.remove(&font);
        state.disposed_fonts.push(font);
    }

    fn width_scalar(&self, font: NativeFontId) -> f32 {
        let mut state = lock(&self.state);
        state.width_queries += 1;
        let name = Self::font_name(&state, font);
        state.width_scalars.get(&name).copied().unwrap_or(0.0)
    }

    fn weight_scalar(&self, font: NativeFontId) -> f32 {
        let mut state = lock(&self.state);
        state.weight_queries += 1;
        let name = Self::font_name(&state, font);
        state.weight_scalars.get(&name).copied().unwrap_or(0.0)
    }

    fn cascade_list(&self, font: NativeFontId) -> Vec<String> {
        let mut state = lock(&self.state);
        state.cascade_queries += 1;
        let name = Self::font_name(&state, font);
        state.cascades.get(&name).cloned().unwrap_or_default()
    }

    fn table_bytes(&self, font: NativeFontId, tag: u32) -> Option<Vec<u8>> {
        let state = lock(&self.state);
        let name = Self::font_name(&state, font);
        state.tables.get(&(name, tag)).cloned()
    }

    fn create_strike(&self, _font: NativeFontId, desc: &StrikeDesc) -> Result<NativeStrikeId, EngineError> {
        let mut state = lock(&self.state);
        state.strike_descs.push(*desc);
        if self.strike_failure {
            return Err(EngineError::StrikeCreationFailed { reason: "strikes disabled".to_string() });
        }
        let id = NativeStrikeId::new(self.next_raw_id()).ok_or_else(|| EngineError::Unavailable {
            message: "strike ids exhausted".to_string(),
        })?;
        state.live_strikes.insert(id);
        Ok(id)
    }

    fn dispose_strike(&self, strike: NativeStrikeId) {
        let mut state = lock(&self.state);
        state.live_strikes.remove(&strike);
        state.disposed_strikes.push(strike);
    }

    fn draw_string(&self, _surface: &mut dyn RenderSurface, strike: NativeStrikeId, text: &str, x: f64, y: f64) {
        self.record(DrawCall::String { strike, text: text.to_string(), x, y });
    }

    fn draw_glyphs(&self, _surface: &mut dyn RenderSurface, strike: NativeStrikeId, glyphs: &GlyphVector, x: f32, y: f32) {
        self.record(DrawCall::Glyphs { strike, glyphs: glyphs.glyph_codes(), x, y });
    }

    fn draw_unicodes(
        &self,
        _surface: &mut dyn RenderSurface,
        strike: NativeStrikeId,
        unicodes: &[u16],
        offset: usize,
        length: usize,
        x: f32,
        y: f32,
    ) {
        self.record(DrawCall::Unicodes { strike, unicodes: unicodes.to_vec(), offset, length, x, y });
    }

    fn draw_one_unicode(&self, _surface: &mut dyn RenderSurface, strike: NativeStrikeId, unicode: u16, x: f32, y: f32) {
        self.record(DrawCall::OneUnicode { strike, unicode, x, y });
    }
}

/// Registry over an explicit family table; no substitution of any kind
#[derive(Default)]
pub struct DummyRegistry {
    fonts: HashMap<String, Font2D>,
    lookups: Mutex<Vec<String>>,
    mapper_slots: Mutex<Vec<Vec<String>>>,
}

impl DummyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&mut self, family: &str, font: Font2D) {
        self.fonts.insert(family.to_string(), font);
    }

    /// Every family passed to `resolve`, in order
    pub fn lookups(&self) -> Vec<String> {
        lock(&self.lookups).clone()
    }

    /// Full names of the slots of each mapper built so far
    pub fn mapper_slots(&self) -> Vec<Vec<String>> {
        lock(&self.mapper_slots).clone()
    }

    pub fn mapper_builds(&self) -> usize {
        lock(&self.mapper_slots).len()
    }
}

impl FontRegistry for DummyRegistry {
    fn resolve(&self, family: &str, _style: FontStyle, _policy: FallbackPolicy) -> Option<Font2D> {
        lock(&self.lookups).push(family.to_string());
        self.fonts.get(family).cloned()
    }

    fn composite_glyph_mapper(&self, slots: &[&NativeFont]) -> Box<dyn CompositeGlyphMapper> {
        let names: Vec<String> = slots.iter().map(|font| font.full_name().to_string()).collect();
        lock(&self.mapper_slots).push(names);
        Box::new(DummyGlyphMapper { num_slots: slots.len() })
    }
}

/// ASCII maps to the primary, anything else to the last fallback slot
pub struct DummyGlyphMapper {
    num_slots: usize,
}

impl DummyGlyphMapper {
    pub fn new(num_slots: usize) -> Self {
        Self { num_slots }
    }
}

impl CompositeGlyphMapper for DummyGlyphMapper {
    fn char_to_glyph(&self, ch: char) -> Option<SlotGlyph> {
        if ch.is_ascii() && self.num_slots > 0 {
            Some(SlotGlyph { slot: 0, glyph: ch as u32 })
        } else if self.num_slots > 1 {
            Some(SlotGlyph { slot: self.num_slots - 1, glyph: ch as u32 })
        } else {
            None
        }
    }
}

/// Shapes every char into a box of 0.6em by 0.7em, advancing 0.6em
#[derive(Default)]
pub struct DummyShaper {
    shaped: Mutex<Vec<String>>,
    fail: bool,
}

impl DummyShaper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { shaped: Mutex::new(Vec::new()), fail: true }
    }

    pub fn shaped(&self) -> Vec<String> {
        lock(&self.shaped).clone()
    }
}

impl TextShaper for DummyShaper {
    fn shape(&self, font: &Font, _frc: &FontRenderContext, text: &str) -> RenderResult<GlyphVector> {
        lock(&self.shaped).push(text.to_string());
        if self.fail {
            return Err(RenderError::ShapingFailed { message: format!("cannot shape {:?}", text) });
        }

        let size = font.size() as f64;
        let advance = size * 0.6;
        let glyphs = text
            .chars()
            .enumerate()
            .map(|(i, ch)| PositionedGlyph {
                code: ch as u32,
                position: Point::new(i as f64 * advance, 0.0),
                outline: Rect::new(0.0, -size * 0.7, advance, 0.0).to_path(0.1),
            })
            .collect();
        Ok(GlyphVector::new(font.clone(), glyphs))
    }
}

/// A fill as the surface saw it
#[derive(Debug, Clone)]
pub struct RecordedFill {
    pub outline: BezPath,
    pub paint: Paint,
    pub antialias: AntialiasHint,
}

/// Surface that records fills and antialias changes
#[derive(Debug, Default)]
pub struct DummySurface {
    pub fills: Vec<RecordedFill>,
    pub antialias_changes: Vec<AntialiasHint>,
    antialias: AntialiasHint,
    fail_after: Option<usize>,
}

impl DummySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every fill once `count` fills have succeeded
    pub fn with_fail_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    pub fn clear(&mut self) {
        self.fills.clear();
        self.antialias_changes.clear();
    }
}

impl RenderSurface for DummySurface {
    fn name(&self) -> &str {
        "dummy"
    }

    fn antialias(&self) -> AntialiasHint {
        self.antialias
    }

    fn set_antialias(&mut self, hint: AntialiasHint) {
        self.antialias = hint;
        self.antialias_changes.push(hint);
    }

    fn fill(&mut self, outline: &BezPath, paint: &Paint) -> RenderResult<()> {
        if self.fail_after.is_some_and(|limit| self.fills.len() >= limit) {
            return Err(RenderError::FillFailed {
                surface: self.name().to_string(),
                message: "fill limit reached".to_string(),
            });
        }
        self.fills.push(RecordedFill {
            outline: outline.clone(),
            paint: paint.clone(),
            antialias: self.antialias,
        });
        Ok(())
    }
}
