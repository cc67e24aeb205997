//! A customizable pet: one species/color with its appearances and items.
//!
//! `Neopet` is assembled by the host from several responses (the pose table,
//! the pet's appearances, and the requested items); it is never parsed from a
//! single payload.

use url::form_urlencoded;

use crate::enums::{LayerImageSize, PetPose, PoseBits};
use crate::error::ApiError;
use crate::models::{AppearanceLayer, Color, Item, PetAppearance, Species};
use crate::render::{render_items, visible_layers};
use crate::urls::{self, build_layers_url};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neopet {
    pub species: Species,
    pub color: Color,
    pub pose: PetPose,
    pub valid_poses: PoseBits,
    /// One appearance per pose DTI has modeled.
    pub appearances: Vec<PetAppearance>,
    /// Items to put on the pet. Conflicting ones end up in the closet.
    pub items: Vec<Item>,
    /// Set when the pet is a real pet looked up by name.
    pub name: Option<String>,
    pub size: LayerImageSize,
}

impl Neopet {
    /// A pet built around a single known appearance.
    pub fn from_appearance(appearance: PetAppearance, valid_poses: PoseBits, items: Vec<Item>, size: LayerImageSize) -> Self {
        Self {
            species: appearance.species.clone(),
            color: appearance.color.clone(),
            pose: appearance.pose,
            valid_poses,
            appearances: vec![appearance],
            items,
            name: None,
            size,
        }
    }

    pub fn get_pet_appearance(&self, pose: PetPose) -> Option<&PetAppearance> {
        self.appearances.iter().find(|a| a.pose == pose)
    }

    /// Whether `pose` exists for this species/color.
    pub fn check(&self, pose: PetPose) -> bool {
        self.valid_poses.contains(pose)
    }

    /// Existing poses, best substitute for `override_pose` (or the pet's pose) first.
    pub fn valid_poses(&self, override_pose: Option<PetPose>) -> Vec<PetPose> {
        override_pose
            .unwrap_or(self.pose)
            .closest()
            .into_iter()
            .filter(|pose| self.check(*pose))
            .collect()
    }

    /// The appearance a render of `pose` would use.
    pub fn best_appearance(&self, pose: Option<PetPose>) -> Result<&PetAppearance, ApiError> {
        let wanted = pose.unwrap_or(self.pose);
        let pose = self.valid_poses(Some(wanted)).into_iter().next().ok_or_else(|| {
            ApiError::MissingPetAppearance(format!("{}-{}-{wanted} has no valid poses", self.species.id, self.color.id))
        })?;
        self.get_pet_appearance(pose).ok_or_else(|| {
            ApiError::MissingPetAppearance(format!("{}-{}-{pose}", self.species.id, self.color.id))
        })
    }

    /// Worn (non-conflicting) items.
    pub fn worn_items(&self) -> Vec<&Item> {
        render_items(&self.items).0
    }

    /// Layers that would be drawn for `pose`, bottom to top.
    pub fn visible_layers(&self, pose: Option<PetPose>) -> Result<Vec<&AppearanceLayer>, ApiError> {
        let appearance = self.best_appearance(pose)?;
        Ok(visible_layers(appearance, &self.worn_items()))
    }

    /// DTI's server-side render of this pet at its size.
    pub fn render_url(&self, pose: Option<PetPose>) -> Result<String, ApiError> {
        let urls = self
            .visible_layers(pose)?
            .into_iter()
            .map(|layer| {
                layer
                    .image_url
                    .as_deref()
                    .map(urls::sanitize_url)
                    .ok_or(ApiError::BrokenAssetImage { layer_id: layer.id })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(build_layers_url(&urls, self.size))
    }

    /// Link that opens this customization in the DTI outfit editor.
    pub fn closet_url(&self) -> String {
        let mut query = self.base_query();
        if let Some(pose) = self.valid_poses(None).first() {
            query.append_pair("pose", pose.name());
        }
        self.append_items(&mut query);
        format!("{}/outfits/new?{}", urls::DTI_BASE, query.finish())
    }

    /// Link for the classic wardrobe, which addresses appearances by id.
    pub fn legacy_closet_url(&self) -> String {
        let mut query = self.base_query();
        if let Some(appearance) = self.valid_poses(None).first().and_then(|pose| self.get_pet_appearance(*pose)) {
            query.append_pair("state", &appearance.id.to_string());
        }
        self.append_items(&mut query);
        format!("{}/wardrobe#{}", urls::LEGACY_BASE, query.finish())
    }

    fn base_query(&self) -> form_urlencoded::Serializer<'static, String> {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("name", self.name.as_deref().unwrap_or(""))
            .append_pair("species", &self.species.id.to_string())
            .append_pair("color", &self.color.id.to_string());
        query
    }

    fn append_items(&self, query: &mut form_urlencoded::Serializer<'static, String>) {
        let (worn, closet) = render_items(&self.items);
        for item in worn {
            query.append_pair("objects[]", &item.id.to_string());
        }
        for item in closet {
            query.append_pair("closet[]", &item.id.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::AppearanceLayerType;
    use crate::models::{ItemAppearance, Zone};

    fn zone(id: u32, depth: u32) -> Zone {
        Zone { id, depth, label: format!("zone {id}") }
    }

    fn appearance(id: u64, pose: PetPose) -> PetAppearance {
        PetAppearance {
            id,
            body_id: 93,
            is_glitched: false,
            species: Species { id: 1, name: "Acara".to_string() },
            color: Color { id: 3, name: "Blue".to_string() },
            pose,
            layers: vec![AppearanceLayer {
                id: id * 10,
                remote_id: 1,
                image_url: Some(format!("https://example.test/{id}.png")),
                zone: zone(5, 7),
                known_glitches: Vec::new(),
                asset_type: AppearanceLayerType::Biology,
            }],
            restricted_zones: Vec::new(),
        }
    }

    fn hat(id: u64) -> Item {
        Item {
            id,
            name: format!("Hat {id}"),
            description: String::new(),
            thumbnail_url: None,
            is_nc: false,
            is_pb: false,
            rarity: 0,
            waka_value: None,
            appearance: Some(ItemAppearance {
                id: format!("item-{id}-body-93"),
                layers: vec![AppearanceLayer {
                    id: id * 10,
                    remote_id: id,
                    image_url: Some(format!("https://example.test/item{id}.png")),
                    zone: zone(41, 40),
                    known_glitches: Vec::new(),
                    asset_type: AppearanceLayerType::Object,
                }],
                restricted_zones: Vec::new(),
            }),
        }
    }

    fn neopet() -> Neopet {
        Neopet {
            species: Species { id: 1, name: "Acara".to_string() },
            color: Color { id: 3, name: "Blue".to_string() },
            pose: PetPose::SadFem,
            valid_poses: PoseBits(PetPose::HappyMasc.bits() | PetPose::HappyFem.bits()),
            appearances: vec![appearance(100, PetPose::HappyMasc), appearance(101, PetPose::HappyFem)],
            items: vec![hat(1), hat(2)],
            name: Some("thyassa".to_string()),
            size: LayerImageSize::Size600,
        }
    }

    #[test]
    fn valid_poses_follow_closest_order() {
        let pet = neopet();
        assert_eq!(pet.valid_poses(None), vec![PetPose::HappyFem, PetPose::HappyMasc]);
        assert_eq!(pet.valid_poses(Some(PetPose::SickMasc)), vec![PetPose::HappyMasc, PetPose::HappyFem]);
        assert!(pet.check(PetPose::HappyMasc));
        assert!(!pet.check(PetPose::SadFem));
    }

    #[test]
    fn best_appearance_substitutes_pose() {
        let pet = neopet();
        assert_eq!(pet.best_appearance(None).unwrap().id, 101);
        assert_eq!(pet.best_appearance(Some(PetPose::HappyMasc)).unwrap().id, 100);
    }

    #[test]
    fn best_appearance_without_poses_fails() {
        let mut pet = neopet();
        pet.valid_poses = PoseBits::default();
        assert!(matches!(pet.best_appearance(None), Err(ApiError::MissingPetAppearance(_))));
    }

    #[test]
    fn closet_urls_split_worn_and_closeted() {
        let pet = neopet();
        assert_eq!(
            pet.closet_url(),
            "https://impress-2020.openneo.net/outfits/new?name=thyassa&species=1&color=3\
             &pose=HAPPY_FEM&objects%5B%5D=2&closet%5B%5D=1"
        );
        assert_eq!(
            pet.legacy_closet_url(),
            "https://impress.openneo.net/wardrobe#name=thyassa&species=1&color=3\
             &state=101&objects%5B%5D=2&closet%5B%5D=1"
        );
    }

    #[test]
    fn render_url_uses_visible_layers() {
        let pet = neopet();
        let url = pet.render_url(None).unwrap();
        assert_eq!(
            url,
            "https://impress-2020.openneo.net/api/outfitImage?size=600&layerUrls=\
             https%3A//example.test/101.png,https%3A//example.test/item2.png"
        );
    }

    #[test]
    fn render_url_reports_broken_layer() {
        let mut pet = neopet();
        pet.appearances[1].layers[0].image_url = None;
        assert!(matches!(
            pet.render_url(None),
            Err(ApiError::BrokenAssetImage { layer_id: 1010 })
        ));
    }
}
