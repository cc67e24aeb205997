//! The fixed little world the mock server serves.
//!
//! Three species, three colors, a handful of appearances and items. Layer
//! image urls point back at the mock server's `/assets` route so hosts can
//! download them.

use serde_json::{json, Value};

pub static SPECIES: [(u32, &str); 3] = [(1, "Acara"), (2, "Aisha"), (3, "Grundo")];
pub static COLORS: [(u32, &str); 3] = [(1, "Apple"), (2, "Asparagus"), (3, "Blue")];

/// `[species_count, color_count, bits...]`, row-major by species.
pub const VALID_POSES: [u8; 11] = [3, 3, 0, 0, 9, 0, 0, 8, 64, 0, 8];

pub static ZONES: [Zone; 4] = [
    Zone { id: 3, depth: 1, label: "Background" },
    Zone { id: 5, depth: 7, label: "Body" },
    Zone { id: 30, depth: 31, label: "Head" },
    Zone { id: 41, depth: 40, label: "Hat" },
];

pub static APPEARANCES: [Appearance; 5] = [
    Appearance { id: 100, species_id: 1, color_id: 3, pose: "HAPPY_MASC", body_id: 93, broken: false },
    Appearance { id: 101, species_id: 1, color_id: 3, pose: "HAPPY_FEM", body_id: 93, broken: false },
    Appearance { id: 200, species_id: 2, color_id: 3, pose: "HAPPY_FEM", body_id: 47, broken: false },
    Appearance { id: 300, species_id: 3, color_id: 3, pose: "HAPPY_FEM", body_id: 11, broken: false },
    Appearance { id: 310, species_id: 3, color_id: 1, pose: "UNCONVERTED", body_id: 12, broken: true },
];

pub static ITEMS: [Item; 3] = [
    Item { id: 81162, name: "Blue Background", kind: "NP", zone: 3, bodies: &[93, 47, 11, 12] },
    Item { id: 39951, name: "Sand Hat", kind: "NC", zone: 41, bodies: &[93, 47] },
    Item { id: 40000, name: "Fancy Hat", kind: "NP", zone: 41, bodies: &[93] },
];

pub const OUTFIT_ID: u64 = 902792;
pub const MODELED_PET: &str = "thyassa";
pub const UNMODELED_PET: &str = "unmodeled_pet";
pub const MODELING_ERROR: &str = "This pet's modeling data isn't loaded into our database yet, sorry!";

#[derive(Debug, Clone, Copy)]
pub struct Zone {
    pub id: u32,
    pub depth: u32,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Appearance {
    pub id: u64,
    pub species_id: u32,
    pub color_id: u32,
    pub pose: &'static str,
    pub body_id: u32,
    /// One layer has a null image url.
    pub broken: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Item {
    pub id: u64,
    pub name: &'static str,
    pub kind: &'static str,
    pub zone: u32,
    pub bodies: &'static [u32],
}

fn zone_json(id: u32) -> Value {
    ZONES
        .iter()
        .find(|z| z.id == id)
        .map(|z| json!({"id": z.id.to_string(), "depth": z.depth, "label": z.label}))
        .unwrap_or(Value::Null)
}

fn name_of(table: &[(u32, &str)], id: u32) -> Value {
    table
        .iter()
        .find(|(i, _)| *i == id)
        .map(|(i, name)| json!({"id": i.to_string(), "name": name}))
        .unwrap_or(Value::Null)
}

pub fn catalog_json() -> Value {
    let species: Vec<Value> = SPECIES.iter().map(|(id, _)| name_of(&SPECIES, *id)).collect();
    let colors: Vec<Value> = COLORS.iter().map(|(id, _)| name_of(&COLORS, *id)).collect();
    json!({"allSpecies": species, "allColors": colors})
}

pub fn zones_json() -> Value {
    Value::Array(ZONES.iter().map(|z| zone_json(z.id)).collect())
}

impl Appearance {
    pub fn to_json(&self, assets: &str) -> Value {
        let body_image = format!("{assets}/{}-body.png", self.id);
        let head_image = if self.broken {
            Value::Null
        } else {
            Value::String(format!("{assets}/{}-head.png", self.id))
        };
        json!({
            "id": self.id.to_string(),
            "bodyId": self.body_id.to_string(),
            "pose": self.pose,
            "isGlitched": false,
            "species": name_of(&SPECIES, self.species_id),
            "color": name_of(&COLORS, self.color_id),
            "layers": [
                {"id": (self.id * 10 + 1).to_string(), "remoteId": "1", "imageUrl": body_image, "zone": zone_json(5), "knownGlitches": []},
                {"id": (self.id * 10 + 2).to_string(), "remoteId": "2", "imageUrl": head_image, "zone": zone_json(30), "knownGlitches": []}
            ],
            "restrictedZones": []
        })
    }
}

impl Item {
    pub fn fits(&self, body_id: u32) -> bool {
        self.bodies.contains(&body_id)
    }

    pub fn appearance_json(&self, body_id: u32, assets: &str) -> Value {
        json!({
            "id": format!("item-{}-body-{body_id}", self.id),
            "layers": [{
                "id": (self.id * 1000 + u64::from(body_id)).to_string(),
                "remoteId": self.id.to_string(),
                "imageUrl": format!("{assets}/item-{}-{body_id}.png", self.id),
                "zone": zone_json(self.zone),
                "knownGlitches": []
            }],
            "restrictedZones": []
        })
    }

    pub fn to_json(&self) -> Value {
        let rarity = if self.kind == "NC" { 500 } else { 90 };
        json!({
            "id": self.id.to_string(),
            "name": self.name,
            "description": format!("A {} item.", self.name),
            "thumbnailUrl": format!("https://images.neopets.com/items/{}.gif", self.id),
            "rarityIndex": rarity,
            "isNc": self.kind == "NC",
            "isPb": self.kind == "PB",
            "wakaValueText": null
        })
    }

    /// Item plus `appearanceOn` for one body (null when it does not fit).
    pub fn fitted_json(&self, body_id: Option<u32>, assets: &str) -> Value {
        let mut item = self.to_json();
        item["appearanceOn"] = match body_id {
            Some(body) if self.fits(body) => self.appearance_json(body, assets),
            _ => Value::Null,
        };
        item
    }

    pub fn all_appearances_json(&self, assets: &str) -> Value {
        let mut item = self.to_json();
        item["allAppearances"] = self.bodies.iter().map(|b| self.appearance_json(*b, assets)).collect();
        item
    }
}

pub fn appearances_for(species_id: u32, color_id: u32) -> impl Iterator<Item = &'static Appearance> {
    APPEARANCES
        .iter()
        .filter(move |a| a.species_id == species_id && a.color_id == color_id)
}

pub fn appearance_by_id(id: u64) -> Option<&'static Appearance> {
    APPEARANCES.iter().find(|a| a.id == id)
}

pub fn body_for(species_id: u32, color_id: u32) -> Option<u32> {
    appearances_for(species_id, color_id).next().map(|a| a.body_id)
}

pub fn item_by_id(id: u64) -> Option<&'static Item> {
    ITEMS.iter().find(|i| i.id == id)
}

pub fn item_by_name(name: &str) -> Option<&'static Item> {
    ITEMS.iter().find(|i| i.name == name)
}

pub fn outfit_json(assets: &str) -> Value {
    let appearance = appearance_by_id(101).map(|a| a.to_json(assets)).unwrap_or(Value::Null);
    let items = |ids: &[u64]| -> Vec<Value> { ids.iter().filter_map(|id| item_by_id(*id)).map(Item::to_json).collect() };
    json!({
        "id": OUTFIT_ID.to_string(),
        "name": "Alex (Clockwork Orange)",
        "creator": {"id": "1", "username": "diceroll123"},
        "petAppearance": appearance,
        "wornItems": items(&[81162, 39951]),
        "closetedItems": items(&[40000]),
        "createdAt": "2015-05-06T02:37:32Z",
        "updatedAt": "2015-05-06T02:37:32Z"
    })
}
