//! Synchronous client core for the Dress To Impress (DTI) API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//! The async `dti` crate is the production host.
//!
//! # Design
//! - `DtiClient` is stateless; it holds only `base_url`.
//! - Each endpoint is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - Payloads are read field by field through `payload::Fields`, which
//!   reports malformed data with the full path of the offending key.
//! - Domain types are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod catalog;
pub mod client;
pub mod enums;
pub mod error;
pub mod http;
pub mod models;
pub mod neopet;
pub mod payload;
pub mod queries;
pub mod render;
pub mod search;
pub mod urls;
pub mod valid_poses;

pub use catalog::{Catalog, Lookup, NameIndex, Named};
pub use client::{Assets, ColorAppearances, DtiClient, ItemAppearances, DEFAULT_BASE_URL};
pub use enums::{AppearanceLayerType, ItemKind, KnownGlitch, LayerImageSize, ParseEnumError, PetPose, PoseBits};
pub use error::{ApiError, MalformedResponseError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use models::{
    AppearanceLayer, Color, Item, ItemAppearance, Outfit, OutfitImageUrls, PetAppearance, PetOnNeopets, Species,
    User, Zone,
};
pub use neopet::Neopet;
pub use payload::{from_value, Fields, FromPayload};
pub use render::{render_items, visible_layers};
pub use search::{SearchCursor, SearchParams, SearchQuery};
pub use valid_poses::ValidPoses;
