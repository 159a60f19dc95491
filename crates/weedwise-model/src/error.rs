//! Error types for the result model

/// Invariant violations and unparseable model values
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Species name outside the closed enumeration
    #[error("unknown weed species: {0}")]
    UnknownSpecies(String),

    /// Growth stage name outside the closed enumeration
    #[error("unknown growth stage: {0}")]
    UnknownGrowthStage(String),

    /// Cost level outside {Low, Medium, High}
    #[error("unknown cost level: {0}")]
    UnknownCostLevel(String),

    /// Detection confidence outside [0, 1]
    #[error("detection {id}: confidence {value} outside [0, 1]")]
    ConfidenceOutOfRange { id: String, value: f64 },

    /// Bounding box with negative origin, non-positive extent or NaN
    #[error("detection {id}: invalid bounding box ({reason})")]
    InvalidBoundingBox { id: String, reason: &'static str },

    /// Recommendation effectiveness above 100
    #[error("recommendation {id}: effectiveness {value} outside [0, 100]")]
    EffectivenessOutOfRange { id: String, value: u8 },

    /// ROI amount that must be non-negative and finite
    #[error("roi impact: {field} must be a non-negative amount, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    /// Two detections or two recommendations share an id
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    /// String is not a base64 `data:` URI
    #[error("invalid image reference: {0}")]
    InvalidImageReference(String),
}
