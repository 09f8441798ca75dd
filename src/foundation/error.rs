/// Convenience result type used across slotfit.
pub type SlotfitResult<T> = Result<T, SlotfitError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum SlotfitError {
    /// Degenerate or non-finite geometry, rejected before any transform math runs.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// An identifier present at transform time has no heavy layer in the original document.
    #[error("missing original content: layer '{id}' not found in document '{document}'")]
    MissingOriginalContent {
        /// Document that was searched.
        document: String,
        /// Identifier that could not be resolved.
        id: String,
    },

    /// The declared source container could not be found in a loaded document.
    #[error("missing source: container '{container}' not found in document '{document}'")]
    MissingSource {
        /// Declared source document id.
        document: String,
        /// Declared source container name.
        container: String,
    },

    /// The declared source document is not loaded at all.
    #[error("missing source: document '{document}' is not loaded")]
    MissingDocument {
        /// Declared source document id.
        document: String,
    },

    /// A payload is wired to a slot other than the one it was computed for.
    #[error("destination mismatch: slot '{slot}' is wired to a payload declared for '{declared}'")]
    DestinationMismatch {
        /// Slot the payload is connected to.
        slot: String,
        /// Destination the payload declares.
        declared: String,
    },

    /// Fewer correctly matched slots than the template defines.
    #[error("incomplete assembly: {filled} of {total} slots filled")]
    IncompleteAssembly {
        /// Correctly matched, filled slots.
        filled: usize,
        /// Total slots in the template.
        total: usize,
    },

    /// Invalid user-provided document, template, wiring or strategy data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlotfitError {
    /// Build a [`SlotfitError::InvalidGeometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Build a [`SlotfitError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SlotfitError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`SlotfitError::MissingOriginalContent`] value.
    pub fn missing_content(document: impl Into<String>, id: impl Into<String>) -> Self {
        Self::MissingOriginalContent {
            document: document.into(),
            id: id.into(),
        }
    }

    /// Build a [`SlotfitError::MissingDocument`] value.
    pub fn missing_document(document: impl Into<String>) -> Self {
        Self::MissingDocument {
            document: document.into(),
        }
    }

    /// Build a [`SlotfitError::MissingSource`] value.
    pub fn missing_source(document: impl Into<String>, container: impl Into<String>) -> Self {
        Self::MissingSource {
            document: document.into(),
            container: container.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
