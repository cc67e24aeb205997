//! Async client for the Dress To Impress (DTI) API.
//!
//! # Overview
//! The production host for `dti-core`: requests are built and responses
//! parsed by the core, and this crate moves the bytes with reqwest. Species,
//! colors and the valid-pose table are cached for
//! [`ClientConfig::cache_timeout`].
//!
//! ```no_run
//! # async fn run() -> dti::Result<()> {
//! let client = dti::Client::new()?;
//! let pet = client
//!     .fetch_neopet(dti::NeopetQuery::new("Acara", "Blue").item_ids([81162]))
//!     .await?;
//! println!("{}", pet.render_url(None)?);
//! # Ok(())
//! # }
//! ```
//!
//! The crate logs through `tracing` and never installs a subscriber.

mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod search;
mod transport;

pub use client::{Client, NeopetQuery, DEFAULT_COLOR};
pub use config::ClientConfig;
pub use error::{Error, Result, TransportError};
pub use search::Search;

pub use dti_core::{
    ApiError, AppearanceLayer, Color, Item, ItemKind, LayerImageSize, Lookup, MalformedResponseError, Neopet,
    Outfit, PetAppearance, PetPose, PoseBits, SearchParams, SearchQuery, Species, Zone,
};
