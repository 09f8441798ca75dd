use crate::foundation::error::{SlotfitError, SlotfitResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Axis-aligned rectangle `{x, y, w, h}` in document space.
///
/// Origin is top-left and `y` grows downward. Extents are never negative for a
/// validated value; use [`Bounds::new`] or [`Bounds::validate`] at input boundaries.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width, `>= 0`.
    pub w: f64,
    /// Height, `>= 0`.
    pub h: f64,
}

impl Bounds {
    /// Create validated bounds with finite coordinates and non-negative extents.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> SlotfitResult<Self> {
        let b = Self { x, y, w, h };
        b.validate()?;
        Ok(b)
    }

    /// Check finiteness and non-negative extents.
    pub fn validate(&self) -> SlotfitResult<()> {
        if !(self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite())
        {
            return Err(SlotfitError::geometry(format!(
                "bounds must be finite, got {self:?}"
            )));
        }
        if self.w < 0.0 || self.h < 0.0 {
            return Err(SlotfitError::geometry(format!(
                "bounds must have w >= 0 and h >= 0, got w={} h={}",
                self.w, self.h
            )));
        }
        Ok(())
    }

    /// Like [`Bounds::validate`], additionally requiring strictly positive extents.
    ///
    /// Anything used as a divisor (a source container) must pass this.
    pub fn validate_non_degenerate(&self) -> SlotfitResult<()> {
        self.validate()?;
        if self.w <= 0.0 || self.h <= 0.0 {
            return Err(SlotfitError::geometry(format!(
                "bounds must have w > 0 and h > 0, got w={} h={}",
                self.w, self.h
            )));
        }
        Ok(())
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height.
    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Convert into a `kurbo` rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::from_origin_size(self.origin(), self.size())
    }

    /// Build from a `kurbo` rectangle (normalized so extents are non-negative).
    pub fn from_rect(r: Rect) -> Self {
        let r = r.abs();
        Self {
            x: r.x0,
            y: r.y0,
            w: r.width(),
            h: r.height(),
        }
    }
}

impl From<Rect> for Bounds {
    fn from(r: Rect) -> Self {
        Self::from_rect(r)
    }
}

impl From<Bounds> for Rect {
    fn from(b: Bounds) -> Self {
        b.to_rect()
    }
}

/// Document or template canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Full-canvas bounds anchored at the origin.
    pub fn bounds(self) -> Bounds {
        Bounds {
            x: 0.0,
            y: 0.0,
            w: f64::from(self.width),
            h: f64::from(self.height),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
