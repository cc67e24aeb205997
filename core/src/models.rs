//! Domain objects parsed from DTI payloads.
//!
//! # Design
//! Every type is an immutable snapshot of server state at fetch time. Types
//! that only ever appear nested (zones, layers) are parsed by their owner;
//! `AppearanceLayer` has no `FromPayload` impl because its asset type comes
//! from the owner rather than from the payload.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::enums::{AppearanceLayerType, KnownGlitch, PetPose};
use crate::error::MalformedResponseError;
use crate::payload::{Fields, FromPayload};
use crate::urls;

/// A Neopets species, e.g. "Acara".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Species {
    pub id: u32,
    pub name: String,
}

impl FromPayload for Species {
    fn from_payload(fields: &Fields<'_>) -> Result<Self, MalformedResponseError> {
        Ok(Self {
            id: fields.id("id")?,
            name: fields.string("name")?,
        })
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A Neopets color, e.g. "Blue".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    pub id: u32,
    pub name: String,
}

impl FromPayload for Color {
    fn from_payload(fields: &Fields<'_>) -> Result<Self, MalformedResponseError> {
        Ok(Self {
            id: fields.id("id")?,
            name: fields.string("name")?,
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A wearable zone. Layers are painted in ascending `depth`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Zone {
    pub id: u32,
    pub depth: u32,
    pub label: String,
}

impl FromPayload for Zone {
    fn from_payload(fields: &Fields<'_>) -> Result<Self, MalformedResponseError> {
        Ok(Self {
            id: fields.id("id")?,
            depth: fields.id("depth")?,
            label: fields.string("label")?,
        })
    }
}

/// One image layer of a rendered pet or item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppearanceLayer {
    /// DTI id, unique across all layers of all types.
    pub id: u64,
    /// Neopets asset id. Only unique among layers of the same `asset_type`.
    pub remote_id: u64,
    /// Should always be present, but DTI occasionally returns null.
    pub image_url: Option<String>,
    pub zone: Zone,
    pub known_glitches: Vec<KnownGlitch>,
    pub asset_type: AppearanceLayerType,
}

impl AppearanceLayer {
    pub fn from_fields(fields: &Fields<'_>, asset_type: AppearanceLayerType) -> Result<Self, MalformedResponseError> {
        Ok(Self {
            id: fields.id("id")?,
            remote_id: fields.opt_number("remoteId")?.unwrap_or(0),
            image_url: fields.opt_string("imageUrl")?,
            zone: fields.parse("zone")?,
            known_glitches: fields
                .strings("knownGlitches")?
                .into_iter()
                .map(KnownGlitch::from)
                .collect(),
            asset_type,
        })
    }
}

fn layers(fields: &Fields<'_>, asset_type: AppearanceLayerType) -> Result<Vec<AppearanceLayer>, MalformedResponseError> {
    fields.list_with("layers", |f| AppearanceLayer::from_fields(f, asset_type))
}

/// The renderable state of a species/color/pose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetAppearance {
    pub id: u64,
    pub body_id: u32,
    pub is_glitched: bool,
    pub species: Species,
    pub color: Color,
    pub pose: PetPose,
    pub layers: Vec<AppearanceLayer>,
    /// Zones no item may occupy while this appearance is worn.
    pub restricted_zones: Vec<Zone>,
}

impl FromPayload for PetAppearance {
    fn from_payload(fields: &Fields<'_>) -> Result<Self, MalformedResponseError> {
        Ok(Self {
            id: fields.id("id")?,
            body_id: fields.id("bodyId")?,
            is_glitched: fields.flag("isGlitched")?,
            species: fields.parse("species")?,
            color: fields.parse("color")?,
            pose: fields.parse_str("pose")?,
            layers: layers(fields, AppearanceLayerType::Biology)?,
            restricted_zones: fields.list("restrictedZones")?,
        })
    }
}

impl PetAppearance {
    /// Link to this appearance in the DTI outfit editor.
    pub fn url(&self) -> String {
        format!(
            "{}/outfits/new?species={}&color={}&pose={}&state={}",
            urls::DTI_BASE,
            self.species.id,
            self.color.id,
            self.pose,
            self.id
        )
    }
}

/// The renderable state of an item on one pet body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAppearance {
    /// Looks like `item-<item id>-body-<body id>`.
    pub id: String,
    pub layers: Vec<AppearanceLayer>,
    pub restricted_zones: Vec<Zone>,
}

impl FromPayload for ItemAppearance {
    fn from_payload(fields: &Fields<'_>) -> Result<Self, MalformedResponseError> {
        Ok(Self {
            id: fields.string("id")?,
            layers: layers(fields, AppearanceLayerType::Object)?,
            restricted_zones: fields.list("restrictedZones")?,
        })
    }
}

impl ItemAppearance {
    /// Zones this appearance paints into.
    pub fn occupies(&self) -> impl Iterator<Item = &Zone> {
        self.layers.iter().map(|l| &l.zone)
    }

    /// The pet body this appearance fits, taken from the id suffix.
    pub fn body_id(&self) -> Option<u32> {
        self.id.rsplit('-').next()?.parse().ok()
    }
}

/// A Neopets item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub is_nc: bool,
    pub is_pb: bool,
    pub rarity: u32,
    /// Value text from the Waka guide, if known.
    pub waka_value: Option<String>,
    /// Appearance on the pet the query was made for, if requested.
    pub appearance: Option<ItemAppearance>,
}

impl FromPayload for Item {
    fn from_payload(fields: &Fields<'_>) -> Result<Self, MalformedResponseError> {
        Ok(Self {
            id: fields.id("id")?,
            name: fields.string("name")?,
            description: fields.opt_string("description")?.unwrap_or_default(),
            thumbnail_url: fields.opt_string("thumbnailUrl")?,
            is_nc: fields.flag("isNc")?,
            is_pb: fields.flag("isPb")?,
            rarity: fields.opt_number("rarityIndex")?.unwrap_or(0),
            waka_value: fields.opt_string("wakaValueText")?,
            appearance: fields.opt_parse("appearanceOn")?,
        })
    }
}

impl Item {
    pub fn is_np(&self) -> bool {
        !self.is_nc && !self.is_pb
    }

    pub fn url(&self) -> String {
        format!("{}/items/{}", urls::DTI_BASE, self.id)
    }

    pub fn legacy_url(&self) -> String {
        format!("{}/items/{}-{}", urls::LEGACY_BASE_HTTP, self.id, self.name.replace(' ', "-"))
    }

    /// A copy of this item carrying `appearance` instead of its own.
    pub fn with_appearance(&self, appearance: ItemAppearance) -> Self {
        Self {
            appearance: Some(appearance),
            ..self.clone()
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A DTI user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
}

impl FromPayload for User {
    fn from_payload(fields: &Fields<'_>) -> Result<Self, MalformedResponseError> {
        Ok(Self {
            id: fields.id("id")?,
            username: fields.string("username")?,
        })
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

/// A saved DTI outfit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outfit {
    pub id: u64,
    pub name: Option<String>,
    /// `None` for anonymous outfits.
    pub creator: Option<User>,
    pub pet_appearance: PetAppearance,
    pub worn_items: Vec<Item>,
    pub closeted_items: Vec<Item>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromPayload for Outfit {
    fn from_payload(fields: &Fields<'_>) -> Result<Self, MalformedResponseError> {
        Ok(Self {
            id: fields.id("id")?,
            name: fields.opt_string("name")?,
            creator: fields.opt_parse("creator")?,
            pet_appearance: fields.parse("petAppearance")?,
            worn_items: fields.list("wornItems")?,
            closeted_items: fields.list("closetedItems")?,
            created_at: fields.timestamp("createdAt")?,
            updated_at: fields.timestamp("updatedAt")?,
        })
    }
}

/// Pre-rendered outfit images at the three sizes DTI stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutfitImageUrls {
    pub large: String,
    pub medium: String,
    pub small: String,
}

impl Outfit {
    pub fn url(&self) -> String {
        format!("{}/outfits/{}", urls::DTI_BASE, self.id)
    }

    pub fn legacy_url(&self) -> String {
        format!("{}/outfits/{}", urls::LEGACY_BASE, self.id)
    }

    pub fn image_urls(&self) -> OutfitImageUrls {
        let padded = format!("{:09}", self.id);
        let folder = format!(
            "{}/outfits/{}/{}/{}/",
            urls::UPLOADS_BASE,
            &padded[..3],
            &padded[3..6],
            &padded[6..]
        );
        OutfitImageUrls {
            large: format!("{folder}preview.png"),
            medium: format!("{folder}medium_preview.png"),
            small: format!("{folder}small_preview.png"),
        }
    }
}

/// A real pet looked up on Neopets.com. Worn items are referenced by id only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetOnNeopets {
    pub pet_appearance: PetAppearance,
    pub worn_item_ids: Vec<u64>,
}

impl FromPayload for PetOnNeopets {
    fn from_payload(fields: &Fields<'_>) -> Result<Self, MalformedResponseError> {
        Ok(Self {
            pet_appearance: fields.parse("petAppearance")?,
            worn_item_ids: fields
                .objects("wornItems")?
                .iter()
                .map(|item| item.id("id"))
                .collect::<Result<_, _>>()?,
        })
    }
}
