//! Cairo render surface for glyph outline fills

use cairo::{Antialias, Context, Pattern};
use kurbo::{BezPath, PathEl, Point, QuadBez};
use nativefont_core::{AntialiasHint, Paint, RenderError, RenderResult, RenderSurface};
use std::collections::HashMap;

/// Fills outlines on a cairo context
pub struct CairoSurface {
    context: Context,
    name: String,
    patterns: HashMap<u64, Pattern>,
}

impl CairoSurface {
    pub fn new(context: Context, name: &str) -> Self {
        CairoSurface {
            context,
            name: name.to_string(),
            patterns: HashMap::new(),
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Makes `pattern` available to [`Paint::Pattern`] fills under `id`
    pub fn register_pattern(&mut self, id: u64, pattern: Pattern) {
        self.patterns.insert(id, pattern);
    }

    fn fill_error(&self, message: impl ToString) -> RenderError {
        RenderError::FillFailed {
            surface: self.name.clone(),
            message: message.to_string(),
        }
    }

    fn set_source(&self, paint: &Paint) -> RenderResult<()> {
        match paint {
            Paint::Solid(c) => {
                self.context.set_source_rgba(c.r, c.g, c.b, c.a);
                Ok(())
            }
            Paint::LinearGradient { start, end, stops } => {
                let gradient = cairo::LinearGradient::new(start.x, start.y, end.x, end.y);
                for stop in stops {
                    let c = stop.color;
                    gradient.add_color_stop_rgba(stop.offset, c.r, c.g, c.b, c.a);
                }
                self.context.set_source(&gradient).map_err(|e| self.fill_error(e))
            }
            Paint::RadialGradient { center, radius, stops } => {
                let gradient =
                    cairo::RadialGradient::new(center.x, center.y, 0.0, center.x, center.y, *radius);
                for stop in stops {
                    let c = stop.color;
                    gradient.add_color_stop_rgba(stop.offset, c.r, c.g, c.b, c.a);
                }
                self.context.set_source(&gradient).map_err(|e| self.fill_error(e))
            }
            Paint::Pattern { id } => {
                let pattern = self
                    .patterns
                    .get(id)
                    .ok_or_else(|| self.fill_error(format!("unknown pattern {}", id)))?;
                self.context.set_source(pattern).map_err(|e| self.fill_error(e))
            }
        }
    }

    /// Replaces the context's current path with `outline`.
    /// Quadratic segments are raised to cubics.
    fn append_path(&self, outline: &BezPath) {
        self.context.new_path();
        let mut current = Point::ORIGIN;
        let mut subpath_start = Point::ORIGIN;

        for el in outline.elements() {
            match *el {
                PathEl::MoveTo(p) => {
                    self.context.move_to(p.x, p.y);
                    current = p;
                    subpath_start = p;
                }
                PathEl::LineTo(p) => {
                    self.context.line_to(p.x, p.y);
                    current = p;
                }
                PathEl::QuadTo(p1, p2) => {
                    let cubic = QuadBez::new(current, p1, p2).raise();
                    self.context
                        .curve_to(cubic.p1.x, cubic.p1.y, cubic.p2.x, cubic.p2.y, p2.x, p2.y);
                    current = p2;
                }
                PathEl::CurveTo(p1, p2, p3) => {
                    self.context.curve_to(p1.x, p1.y, p2.x, p2.y, p3.x, p3.y);
                    current = p3;
                }
                PathEl::ClosePath => {
                    self.context.close_path();
                    current = subpath_start;
                }
            }
        }
    }
}

impl RenderSurface for CairoSurface {
    fn name(&self) -> &str {
        &self.name
    }

    fn antialias(&self) -> AntialiasHint {
        match self.context.antialias() {
            Antialias::Default => AntialiasHint::Default,
            Antialias::None => AntialiasHint::Off,
            _ => AntialiasHint::On,
        }
    }

    fn set_antialias(&mut self, hint: AntialiasHint) {
        self.context.set_antialias(match hint {
            AntialiasHint::Default => Antialias::Default,
            AntialiasHint::On => Antialias::Gray,
            AntialiasHint::Off => Antialias::None,
        });
    }

    fn fill(&mut self, outline: &BezPath, paint: &Paint) -> RenderResult<()> {
        self.set_source(paint)?;
        self.append_path(outline);
        self.context.fill().map_err(|e| {
            tracing::warn!("Cairo fill failed on {}: {}", self.name, e);
            self.fill_error(e)
        })
    }
}
