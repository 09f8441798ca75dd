use std::collections::HashMap;

use crate::foundation::error::{SlotfitError, SlotfitResult};

/// Vertical anchoring of the scaled source inside the target rect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerticalAnchor {
    /// Flush with the target's top edge.
    Top,
    /// Vertically centered.
    #[default]
    Center,
    /// Flush with the target's bottom edge.
    Bottom,
    /// Accepted tag; currently anchors like [`VerticalAnchor::Center`].
    Stretch,
}

impl VerticalAnchor {
    /// Parse case-insensitively. Unknown values anchor like `Center`.
    ///
    /// Deserialization is equally lenient: `null` or any non-string value is `Center`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "TOP" => Self::Top,
            "BOTTOM" => Self::Bottom,
            "STRETCH" => Self::Stretch,
            _ => Self::Center,
        }
    }
}

impl<'de> serde::Deserialize<'de> for VerticalAnchor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let v = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match v {
            Some(serde_json::Value::String(s)) => Self::parse_lenient(&s),
            _ => Self::Center,
        })
    }
}

/// Per-element placement override.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerOverride {
    /// Target element id.
    pub layer_id: String,
    /// Absolute x offset from the target slot's origin.
    #[serde(default)]
    pub x_offset: f64,
    /// Absolute y offset from the target slot's origin.
    #[serde(default)]
    pub y_offset: f64,
    /// Multiplier applied on top of the base scale for this element only.
    #[serde(default = "default_individual_scale")]
    pub individual_scale: f64,
}

fn default_individual_scale() -> f64 {
    1.0
}

impl LayerOverride {
    /// Require finite offsets and a finite, non-negative scale multiplier.
    pub fn validate(&self) -> SlotfitResult<()> {
        if !self.x_offset.is_finite() || !self.y_offset.is_finite() {
            return Err(SlotfitError::geometry(format!(
                "override for '{}' must have finite offsets",
                self.layer_id
            )));
        }
        if !self.individual_scale.is_finite() || self.individual_scale < 0.0 {
            return Err(SlotfitError::geometry(format!(
                "override for '{}' individual_scale must be finite and >= 0",
                self.layer_id
            )));
        }
        Ok(())
    }
}

/// Externally supplied placement strategy for one remap instance.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutStrategy {
    /// Uniform base scale, used as-is instead of the fit scale.
    pub suggested_scale: f64,
    /// Vertical anchor mode.
    #[serde(default)]
    pub anchor: VerticalAnchor,
    /// Ordered per-element overrides.
    #[serde(default)]
    pub overrides: Vec<LayerOverride>,
}

impl LayoutStrategy {
    /// Strategy with a scale and anchor but no overrides.
    pub fn new(suggested_scale: f64, anchor: VerticalAnchor) -> Self {
        Self {
            suggested_scale,
            anchor,
            overrides: Vec::new(),
        }
    }

    /// Validate numeric fields.
    pub fn validate(&self) -> SlotfitResult<()> {
        if !self.suggested_scale.is_finite() || self.suggested_scale <= 0.0 {
            return Err(SlotfitError::geometry(format!(
                "strategy suggested_scale must be finite and > 0, got {}",
                self.suggested_scale
            )));
        }
        self.overrides.iter().try_for_each(LayerOverride::validate)
    }
}

/// Id to override lookup. The first override listed for an id wins.
#[derive(Debug, Default)]
pub struct OverrideIndex<'a> {
    by_id: HashMap<&'a str, &'a LayerOverride>,
    duplicates: Vec<&'a str>,
}

impl<'a> OverrideIndex<'a> {
    /// Index the overrides of `strategy` (empty for `None`).
    pub fn build(strategy: Option<&'a LayoutStrategy>) -> Self {
        let mut index = Self::default();
        let Some(strategy) = strategy else {
            return index;
        };
        for o in &strategy.overrides {
            if index.by_id.contains_key(o.layer_id.as_str()) {
                tracing::warn!(
                    layer_id = %o.layer_id,
                    "duplicate layer override ignored; first override wins"
                );
                if !index.duplicates.contains(&o.layer_id.as_str()) {
                    index.duplicates.push(&o.layer_id);
                }
                continue;
            }
            index.by_id.insert(&o.layer_id, o);
        }
        index
    }

    /// Effective override for `id`.
    pub fn get(&self, id: &str) -> Option<&'a LayerOverride> {
        self.by_id.get(id).copied()
    }

    /// Ids that had more than one override, each listed once, in encounter order.
    pub fn duplicates(&self) -> &[&'a str] {
        &self.duplicates
    }

    /// Return `true` when no override is indexed.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Validate every effective override.
    pub fn validate(&self) -> SlotfitResult<()> {
        self.by_id.values().try_for_each(|o| o.validate())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/strategy/model.rs"]
mod tests;
