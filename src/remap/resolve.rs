use crate::foundation::core::{Bounds, Point};
use crate::foundation::error::{SlotfitError, SlotfitResult};
use crate::strategy::model::{LayoutStrategy, VerticalAnchor};

/// Base placement shared by every element of one remap.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransformParams {
    /// Uniform base scale.
    pub scale: f64,
    /// Target-space position of the source rect's top-left corner.
    pub anchor: Point,
}

/// Compute base scale and anchor for placing `source` into `target`.
///
/// Without a strategy the source is uniformly fit and centered on both axes. With one,
/// its `suggested_scale` is used as-is, x stays centered and y follows `strategy.anchor`.
#[tracing::instrument(level = "debug", skip(strategy))]
pub fn resolve_transform(
    source: &Bounds,
    target: &Bounds,
    strategy: Option<&LayoutStrategy>,
) -> SlotfitResult<TransformParams> {
    source
        .validate_non_degenerate()
        .map_err(|e| SlotfitError::geometry(format!("source rect: {e}")))?;
    target
        .validate()
        .map_err(|e| SlotfitError::geometry(format!("target rect: {e}")))?;

    let (scale, anchor) = match strategy {
        None => (fit_scale(source, target), VerticalAnchor::Center),
        Some(s) => {
            s.validate()?;
            (s.suggested_scale, s.anchor)
        }
    };

    let scaled_w = source.w * scale;
    let scaled_h = source.h * scale;
    let x = target.x + (target.w - scaled_w) / 2.0;
    let y = match anchor {
        VerticalAnchor::Top => target.y,
        VerticalAnchor::Bottom => target.y + target.h - scaled_h,
        // TODO: Stretch needs a non-uniform vertical scale; it anchors like Center until then.
        VerticalAnchor::Center | VerticalAnchor::Stretch => target.y + (target.h - scaled_h) / 2.0,
    };

    Ok(TransformParams {
        scale,
        anchor: Point::new(x, y),
    })
}

/// Largest uniform scale that fits `source` inside `target`.
pub fn fit_scale(source: &Bounds, target: &Bounds) -> f64 {
    (target.w / source.w).min(target.h / source.h)
}

#[cfg(test)]
#[path = "../../tests/unit/remap/resolve.rs"]
mod tests;
