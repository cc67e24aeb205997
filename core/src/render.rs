//! Deciding what is actually visible on a pet.
//!
//! Items conflict when one occupies a zone the other occupies or restricts.
//! Conflicts resolve first-in-first-out: a later item evicts earlier worn
//! items into the closet. Items without an appearance occupy nothing and so
//! never conflict.

use std::collections::HashSet;

use crate::models::{AppearanceLayer, Item, ItemAppearance, PetAppearance};

/// Split `items` into (worn, closeted).
pub fn render_items(items: &[Item]) -> (Vec<&Item>, Vec<&Item>) {
    let mut worn: Vec<&Item> = Vec::new();
    let mut closet: Vec<&Item> = Vec::new();
    for item in items {
        let mut i = 0;
        while i < worn.len() {
            if worn[i].id != item.id && conflicts(item, worn[i]) {
                closet.push(worn.remove(i));
            } else {
                i += 1;
            }
        }
        worn.push(item);
    }
    (worn, closet)
}

fn conflicts(a: &Item, b: &Item) -> bool {
    match (&a.appearance, &b.appearance) {
        (Some(a), Some(b)) => blocks(a, b) || blocks(b, a),
        _ => false,
    }
}

/// Whether `a` occupies any zone `b` occupies or restricts.
fn blocks(a: &ItemAppearance, b: &ItemAppearance) -> bool {
    let taken: HashSet<u32> = b
        .occupies()
        .chain(&b.restricted_zones)
        .map(|z| z.id)
        .collect();
    a.occupies().any(|z| taken.contains(&z.id))
}

/// Pet and worn item layers minus restricted zones, bottom to top.
pub fn visible_layers<'a>(pet: &'a PetAppearance, worn: &[&'a Item]) -> Vec<&'a AppearanceLayer> {
    let appearances: Vec<&ItemAppearance> = worn.iter().filter_map(|item| item.appearance.as_ref()).collect();

    let restricted: HashSet<u32> = pet
        .restricted_zones
        .iter()
        .chain(appearances.iter().flat_map(|a| &a.restricted_zones))
        .map(|z| z.id)
        .collect();

    let mut layers: Vec<&AppearanceLayer> = pet
        .layers
        .iter()
        .chain(appearances.iter().flat_map(|a| &a.layers))
        .filter(|layer| !restricted.contains(&layer.zone.id))
        .collect();
    layers.sort_by_key(|layer| layer.zone.depth);
    layers
}
