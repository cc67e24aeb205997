//! Error types for the DTI client core.
//!
//! # Design
//! `MalformedResponseError` is the only thing the model deserializer can
//! fail with; it always carries the dotted path of the offending key.
//! `ApiError` wraps it together with everything else a response parser can
//! report: non-2xx statuses, GraphQL error lists, and the "not found"
//! conditions DTI signals by returning `null`.

/// A payload did not match the expected schema.
///
/// `field` is the full path of the key, e.g. `data.outfit.petAppearance.bodyId`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed response at `{field}`: {reason}")]
pub struct MalformedResponseError {
    pub field: String,
    pub reason: String,
}

impl MalformedResponseError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors returned by `DtiClient` build and parse methods.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error(transparent)]
    Malformed(#[from] MalformedResponseError),

    /// GraphQL returned errors and no usable data.
    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The pose table length does not match its own header.
    #[error("invalid pet pose table: header says {expected} bytes, got {actual}")]
    InvalidPairBytes { expected: usize, actual: usize },

    #[error("outfit {id} not found")]
    OutfitNotFound { id: u64 },

    #[error("pet appearance not found: {0}")]
    MissingPetAppearance(String),

    #[error("neopet {name:?} not found")]
    NeopetNotFound { name: String },

    #[error("modeling data for this pet is not loaded into DTI yet")]
    MissingModelData,

    #[error("species {species_id} cannot be painted color {color_id}")]
    InvalidColorSpeciesPair { species_id: u32, color_id: u32 },

    #[error("one of the searched item ids is invalid")]
    InvalidItemId,

    #[error("search parameters do not form a search query")]
    NoSearchCriteria,

    /// A layer has no image url on DTI's side.
    #[error("layer {layer_id} has no image")]
    BrokenAssetImage { layer_id: u64 },
}
