//! GraphQL documents sent to DTI.
//!
//! Each document declares a named operation; the name doubles as the
//! `operationName` field of the request body.

macro_rules! document {
    ($name:literal, $body:expr $(, $fragment:expr)* $(,)?) => {
        Operation {
            name: $name,
            document: concat!("query ", $name, $body $(, $fragment)*),
        }
    };
}

/// A named GraphQL operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub document: &'static str,
}

macro_rules! zone_fields {
    () => {
        "{ id depth label }"
    };
}

macro_rules! pet_appearance_fragment {
    () => {
        concat!(
            "\nfragment PetAppearanceFields on PetAppearance {\n",
            "  id bodyId pose isGlitched\n",
            "  species { id name }\n",
            "  color { id name }\n",
            "  layers { id remoteId knownGlitches imageUrl(size: $size) zone ",
            zone_fields!(),
            " }\n",
            "  restrictedZones ",
            zone_fields!(),
            "\n}\n"
        )
    };
}

macro_rules! item_appearance_fragment {
    () => {
        concat!(
            "\nfragment ItemAppearanceFields on ItemAppearance {\n",
            "  id\n",
            "  layers { id remoteId knownGlitches imageUrl(size: $size) zone ",
            zone_fields!(),
            " }\n",
            "  restrictedZones ",
            zone_fields!(),
            "\n}\n"
        )
    };
}

macro_rules! item_fields {
    () => {
        "id name description thumbnailUrl rarityIndex isNc isPb wakaValueText"
    };
}

pub const ALL_SPECIES_AND_COLORS: Operation = document!(
    "AllSpeciesAndColors",
    " {\n  allSpecies { id name }\n  allColors { id name }\n}\n"
);

pub const ALL_ZONES: Operation = document!("AllZones", " {\n  allZones { id depth label }\n}\n");

pub const OUTFIT_BY_ID: Operation = document!(
    "OutfitById",
    concat!(
        "($outfitId: ID!, $size: LayerImageSize!) {\n",
        "  outfit(id: $outfitId) {\n",
        "    id name createdAt updatedAt\n",
        "    creator { id username }\n",
        "    petAppearance { ...PetAppearanceFields }\n",
        "    wornItems { ",
        item_fields!(),
        " }\n",
        "    closetedItems { ",
        item_fields!(),
        " }\n",
        "  }\n",
        "}\n"
    ),
    pet_appearance_fragment!(),
);

pub const PET_APPEARANCE_BY_ID: Operation = document!(
    "PetAppearanceById",
    concat!(
        "($appearanceId: ID!, $size: LayerImageSize!) {\n",
        "  petAppearanceById(id: $appearanceId) { ...PetAppearanceFields }\n",
        "}\n"
    ),
    pet_appearance_fragment!(),
);

pub const PET_APPEARANCE: Operation = document!(
    "PetAppearance",
    concat!(
        "($speciesId: ID!, $colorId: ID!, $pose: Pose!, $size: LayerImageSize!) {\n",
        "  petAppearance(speciesId: $speciesId, colorId: $colorId, pose: $pose) { ...PetAppearanceFields }\n",
        "}\n"
    ),
    pet_appearance_fragment!(),
);

pub const PET_APPEARANCES: Operation = document!(
    "PetAppearances",
    concat!(
        "($speciesId: ID!, $colorId: ID!, $size: LayerImageSize!) {\n",
        "  petAppearances(speciesId: $speciesId, colorId: $colorId) { ...PetAppearanceFields }\n",
        "}\n"
    ),
    pet_appearance_fragment!(),
);

pub const PET_APPEARANCE_IDS: Operation = document!(
    "PetAppearanceIds",
    concat!(
        "($speciesId: ID!, $colorId: ID!) {\n",
        "  petAppearances(speciesId: $speciesId, colorId: $colorId) { id }\n",
        "}\n"
    )
);

pub const PET_ON_NEOPETS: Operation = document!(
    "PetOnNeopets",
    concat!(
        "($petName: String!, $size: LayerImageSize!) {\n",
        "  petOnNeopetsDotCom(petName: $petName) {\n",
        "    petAppearance { ...PetAppearanceFields }\n",
        "    wornItems { id }\n",
        "  }\n",
        "}\n"
    ),
    pet_appearance_fragment!(),
);

pub const PET_APPEARANCES_WITH_ITEMS_BY_IDS: Operation = document!(
    "PetAppearancesWithItemsByIds",
    concat!(
        "($speciesId: ID!, $colorId: ID!, $allItemIds: [ID!]!, $size: LayerImageSize!) {\n",
        "  petAppearances(speciesId: $speciesId, colorId: $colorId) { ...PetAppearanceFields }\n",
        "  items(ids: $allItemIds) {\n",
        "    ",
        item_fields!(),
        "\n",
        "    appearanceOn(speciesId: $speciesId, colorId: $colorId) { ...ItemAppearanceFields }\n",
        "  }\n",
        "}\n"
    ),
    pet_appearance_fragment!(),
    item_appearance_fragment!(),
);

pub const PET_APPEARANCES_WITH_ITEMS_BY_NAMES: Operation = document!(
    "PetAppearancesWithItemsByNames",
    concat!(
        "($speciesId: ID!, $colorId: ID!, $names: [String!]!, $size: LayerImageSize!) {\n",
        "  petAppearances(speciesId: $speciesId, colorId: $colorId) { ...PetAppearanceFields }\n",
        "  items: itemsByName(names: $names) {\n",
        "    ",
        item_fields!(),
        "\n",
        "    appearanceOn(speciesId: $speciesId, colorId: $colorId) { ...ItemAppearanceFields }\n",
        "  }\n",
        "}\n"
    ),
    pet_appearance_fragment!(),
    item_appearance_fragment!(),
);

pub const ALL_APPEARANCES_FOR_COLOR: Operation = document!(
    "AllAppearancesForColor",
    concat!(
        "($itemIds: [ID!]!, $preferredColorId: ID!, $size: LayerImageSize!) {\n",
        "  color(id: $preferredColorId) {\n",
        "    appliedToAllCompatibleSpecies {\n",
        "      canonicalAppearance { ...PetAppearanceFields }\n",
        "    }\n",
        "  }\n",
        "  items(ids: $itemIds) {\n",
        "    ",
        item_fields!(),
        "\n",
        "    allAppearances { ...ItemAppearanceFields }\n",
        "  }\n",
        "}\n"
    ),
    pet_appearance_fragment!(),
    item_appearance_fragment!(),
);

pub const ITEMS_BY_IDS: Operation = document!(
    "ItemsByIds",
    concat!("($itemIds: [ID!]!) {\n  items(ids: $itemIds) { ", item_fields!(), " }\n}\n")
);

pub const ITEMS_BY_NAME: Operation = document!(
    "ItemsByName",
    concat!("($names: [String!]!) {\n  itemsByName(names: $names) { ", item_fields!(), " }\n}\n")
);

pub const ITEM_SEARCH: Operation = document!(
    "ItemSearch",
    concat!(
        "($query: String!, $itemKind: ItemKindSearchFilter) {\n",
        "  itemSearch(query: $query, itemKind: $itemKind) {\n",
        "    items { ",
        item_fields!(),
        " }\n",
        "  }\n",
        "}\n"
    )
);

pub const ITEM_SEARCH_TO_FIT: Operation = document!(
    "ItemSearchToFit",
    concat!(
        "($query: String!, $speciesId: ID!, $colorId: ID!, $itemKind: ItemKindSearchFilter, ",
        "$offset: Int, $limit: Int, $size: LayerImageSize!) {\n",
        "  itemSearch: itemSearchToFit(query: $query, speciesId: $speciesId, colorId: $colorId, ",
        "itemKind: $itemKind, offset: $offset, limit: $limit) {\n",
        "    items {\n",
        "      ",
        item_fields!(),
        "\n",
        "      appearanceOn(speciesId: $speciesId, colorId: $colorId) { ...ItemAppearanceFields }\n",
        "    }\n",
        "  }\n",
        "}\n"
    ),
    item_appearance_fragment!(),
);
