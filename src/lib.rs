//! Slotfit remaps layer trees from source documents into the slots of a template.
//!
//! The pipeline, per remap instance:
//!
//! - Resolve a uniform scale and vertical anchor for the source container ([`resolve_transform`])
//! - Walk the source tree applying the transform, per-layer overrides and boundary clamping
//!   ([`transform_elements`], packaged as a [`Payload`] by [`compute_payload`])
//! - Rebuild full layer records from the originals ([`reconstruct`]) and group them per slot
//!   ([`build_output`])
//!
//! [`AssemblySession`] drives many instances at once: slot handle matching, payload caching,
//! optional parallel computation and the export readiness check ([`validate_assembly`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub(crate) mod assembly;
pub(crate) mod foundation;
pub(crate) mod reconstruct;
pub(crate) mod remap;
pub(crate) mod scene;
pub(crate) mod strategy;

pub use crate::foundation::core::{Bounds, Canvas, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{SlotfitError, SlotfitResult};
pub use crate::foundation::math::{OPACITY_MAX, approx_eq, opacity_to_u8, opacity_to_unit};

pub use crate::scene::document::{
    CANVAS_CONTAINER, ContainerRef, Document, DocumentIndex, DocumentStore, Layer,
    extract_elements,
};
pub use crate::scene::element::{AppliedTransform, Element, ElementKind, TransformedElement};
pub use crate::scene::template::{TargetSlot, Template, TemplateRegistry};

pub use crate::strategy::model::{LayerOverride, LayoutStrategy, OverrideIndex, VerticalAnchor};

pub use crate::remap::cache::{CacheStats, PayloadCache};
pub use crate::remap::fingerprint::{InputFingerprint, fingerprint_inputs};
pub use crate::remap::payload::{Payload, PayloadMetrics, SourceContext, compute_payload};
pub use crate::remap::resolve::{TransformParams, fit_scale, resolve_transform};
pub use crate::remap::transform::{
    MAX_BOUNDARY_VIOLATION_PERCENT, RemapSettings, TreeTransform, transform_elements,
};

pub use crate::reconstruct::hierarchy::{SLOT_GROUP_ID_PREFIX, SlotFill, build_output, reconstruct};

pub use crate::assembly::matcher::{
    DEFAULT_SLOT_PREFIXES, ExactName, IndexedProxy, MatcherChain, PrefixedName,
    SingleSlotFallback, SlotMatch, SlotMatcher,
};
pub use crate::assembly::session::{Assembly, AssemblyOpts, AssemblySession, InstanceFailure};
pub use crate::assembly::validate::{
    AssemblyReport, Violation, ViolationKind, WiredPayload, validate_assembly,
};
pub use crate::assembly::wiring::{RemapInstance, SlotWire, SourceRef, Wiring};
