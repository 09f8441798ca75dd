use crate::foundation::core::{Bounds, Point, Vec2};
use crate::foundation::error::{SlotfitError, SlotfitResult};
use crate::remap::resolve::TransformParams;
use crate::scene::element::{AppliedTransform, Element, TransformedElement};
use crate::strategy::model::{LayoutStrategy, OverrideIndex};

/// Default fraction of the target height content may overflow vertically.
pub const MAX_BOUNDARY_VIOLATION_PERCENT: f64 = 0.03;

/// Tunables of the tree transformer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RemapSettings {
    /// Vertical bleed allowance as a fraction of the target height.
    pub bleed_fraction: f64,
}

impl Default for RemapSettings {
    fn default() -> Self {
        Self {
            bleed_fraction: MAX_BOUNDARY_VIOLATION_PERCENT,
        }
    }
}

impl RemapSettings {
    /// Validate that the bleed fraction is finite and non-negative.
    pub fn validate(&self) -> SlotfitResult<()> {
        if !self.bleed_fraction.is_finite() || self.bleed_fraction < 0.0 {
            return Err(SlotfitError::validation(format!(
                "bleed_fraction must be finite and >= 0, got {}",
                self.bleed_fraction
            )));
        }
        Ok(())
    }
}

/// Recursive placement of an element tree into a target rect.
///
/// Every element is first placed geometrically (relative position in the source rect,
/// mapped through the base scale and anchor), then shifted by the delta inherited from
/// its nearest overridden ancestor. An override replaces that position with an absolute
/// one relative to the target origin and hands the displacement it introduced down to
/// its subtree instead of the inherited delta. Only `y` is clamped.
#[derive(Debug)]
pub struct TreeTransform<'a> {
    source: Bounds,
    target: Bounds,
    params: TransformParams,
    overrides: &'a OverrideIndex<'a>,
    min_y: f64,
    max_y: f64,
}

impl<'a> TreeTransform<'a> {
    /// Prepare a transform; `source` must be non-degenerate, `params` finite with a
    /// non-negative scale and every override valid.
    pub fn new(
        source: Bounds,
        target: Bounds,
        params: TransformParams,
        overrides: &'a OverrideIndex<'a>,
        settings: &RemapSettings,
    ) -> SlotfitResult<Self> {
        source.validate_non_degenerate()?;
        target.validate()?;
        settings.validate()?;
        if !params.scale.is_finite() || params.scale < 0.0 {
            return Err(SlotfitError::geometry(format!(
                "base scale must be finite and >= 0, got {}",
                params.scale
            )));
        }
        if !params.anchor.is_finite() {
            return Err(SlotfitError::geometry(format!(
                "anchor must be finite, got {:?}",
                params.anchor
            )));
        }
        overrides.validate()?;
        let p = settings.bleed_fraction;
        Ok(Self {
            source,
            target,
            params,
            overrides,
            min_y: target.y - target.h * p,
            max_y: target.y + target.h * (1.0 + p),
        })
    }

    /// Transform `elements` in order, starting from `inherited` delta.
    pub fn apply(&self, elements: &[Element], inherited: Vec2) -> Vec<TransformedElement> {
        elements
            .iter()
            .map(|el| self.place(el, inherited))
            .collect()
    }

    fn place(&self, el: &Element, inherited: Vec2) -> TransformedElement {
        let geom = self.geometric_origin(&el.bounds);
        let mut pos = geom + inherited;
        let mut scale = self.params.scale;
        let mut child_delta = inherited;

        if let Some(o) = self.overrides.get(&el.id) {
            pos = Point::new(self.target.x + o.x_offset, self.target.y + o.y_offset);
            scale *= o.individual_scale;
            child_delta = pos - geom;
        }

        pos.y = pos.y.clamp(self.min_y, self.max_y);

        let bounds = Bounds {
            x: pos.x,
            y: pos.y,
            w: el.bounds.w * scale,
            h: el.bounds.h * scale,
        };

        TransformedElement {
            id: el.id.clone(),
            kind: el.kind,
            visible: el.visible,
            opacity: el.opacity,
            bounds,
            applied: AppliedTransform {
                scale_x: scale,
                scale_y: scale,
                offset_x: pos.x,
                offset_y: pos.y,
            },
            children: if el.is_group() {
                self.apply(&el.children, child_delta)
            } else {
                Vec::new()
            },
        }
    }

    /// Pure geometric target position of a source rect's top-left corner.
    pub fn geometric_origin(&self, b: &Bounds) -> Point {
        let src = &self.source;
        let rel_x = (b.x - src.x) / src.w;
        let rel_y = (b.y - src.y) / src.h;
        Point::new(
            self.params.anchor.x + rel_x * src.w * self.params.scale,
            self.params.anchor.y + rel_y * src.h * self.params.scale,
        )
    }

    /// Allowed range of final `y` positions.
    pub fn y_limits(&self) -> (f64, f64) {
        (self.min_y, self.max_y)
    }
}

/// Transform a source forest from the root (zero inherited delta).
#[tracing::instrument(level = "debug", skip_all, fields(roots = elements.len()))]
pub fn transform_elements(
    elements: &[Element],
    source: &Bounds,
    target: &Bounds,
    params: TransformParams,
    strategy: Option<&LayoutStrategy>,
    settings: &RemapSettings,
) -> SlotfitResult<Vec<TransformedElement>> {
    Element::validate_forest(elements)?;
    strategy.map(LayoutStrategy::validate).transpose()?;
    let overrides = OverrideIndex::build(strategy);
    let tree = TreeTransform::new(*source, *target, params, &overrides, settings)?;
    Ok(tree.apply(elements, Vec2::ZERO))
}

#[cfg(test)]
#[path = "../../tests/unit/remap/transform.rs"]
mod tests;
