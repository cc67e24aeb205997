//! Stateless HTTP request builder and response parser for the DTI API.
//!
//! # Design
//! `DtiClient` holds only a `base_url` and carries no mutable state between
//! calls. Each endpoint is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.
//!
//! Almost everything goes through `POST {base}/graphql`. DTI reports "not
//! found" by returning `null` for the requested root field, sometimes with
//! an `errors` list alongside; parsers turn that into the matching
//! `ApiError` variant.

use serde::Serialize;
use serde_json::{json, Value};

use crate::catalog::Catalog;
use crate::enums::{ItemKind, LayerImageSize, PetPose};
use crate::error::{ApiError, MalformedResponseError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::models::{Item, ItemAppearance, Outfit, PetAppearance, PetOnNeopets, Zone};
use crate::payload::{Fields, FromPayload};
use crate::queries::{self, Operation};
use crate::valid_poses::ValidPoses;

pub const DEFAULT_BASE_URL: &str = "https://impress-2020.openneo.net/api";

const MODELING_ERROR: &str = "This pet's modeling data isn't loaded into our database yet";
const UNDEFINED_PAIR_ERROR: &str = "it is undefined";

/// Synchronous, stateless client for the DTI API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct DtiClient {
    base_url: String,
}

impl Default for DtiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Pet appearances of one species/color plus the requested items fitted to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assets {
    pub pet_appearances: Vec<PetAppearance>,
    pub items: Vec<Item>,
}

impl FromPayload for Assets {
    fn from_payload(fields: &Fields<'_>) -> Result<Self, MalformedResponseError> {
        Ok(Self {
            pet_appearances: fields.list("petAppearances")?,
            items: fields.one_or_many("items")?,
        })
    }
}

/// An item with its appearance on every body it fits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAppearances {
    pub item: Item,
    pub appearances: Vec<ItemAppearance>,
}

impl FromPayload for ItemAppearances {
    fn from_payload(fields: &Fields<'_>) -> Result<Self, MalformedResponseError> {
        Ok(Self {
            item: Item::from_payload(fields)?,
            appearances: fields.list("allAppearances")?,
        })
    }
}

/// The canonical appearance of every species in one color, plus items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorAppearances {
    pub pet_appearances: Vec<PetAppearance>,
    pub items: Vec<ItemAppearances>,
}

impl FromPayload for ColorAppearances {
    fn from_payload(fields: &Fields<'_>) -> Result<Self, MalformedResponseError> {
        let mut pet_appearances: Vec<PetAppearance> = Vec::new();
        if let Some(color) = fields.opt_object("color")? {
            for species in color.objects("appliedToAllCompatibleSpecies")? {
                // Species without a canonical appearance are skipped.
                if let Some(appearance) = species.opt_parse("canonicalAppearance")? {
                    pet_appearances.push(appearance);
                }
            }
        }
        Ok(Self {
            pet_appearances,
            items: fields.list("items")?,
        })
    }
}

impl ColorAppearances {
    /// Items that fit `body_id`, each carrying its appearance for that body.
    pub fn items_for_body(&self, body_id: u32) -> Vec<Item> {
        self.items
            .iter()
            .flat_map(|entry| {
                entry
                    .appearances
                    .iter()
                    .filter(move |a| a.body_id() == Some(body_id))
                    .map(move |a| entry.item.with_appearance(a.clone()))
            })
            .collect()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a> {
    operation_name: &'a str,
    query: &'a str,
    variables: Value,
}

impl DtiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, url: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    fn graphql(&self, operation: Operation, variables: Value) -> Result<HttpRequest, ApiError> {
        let payload = GraphQlRequest {
            operation_name: operation.name,
            query: operation.document,
            variables,
        };
        let body = serde_json::to_string(&payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/graphql", self.base_url),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("accept".to_string(), "application/json".to_string()),
            ],
            body: Some(body),
        })
    }

    pub fn build_valid_pet_poses(&self) -> HttpRequest {
        self.get(format!("{}/validPetPoses", self.base_url))
    }

    pub fn parse_valid_pet_poses(&self, response: HttpResponse) -> Result<ValidPoses, ApiError> {
        check_status(&response)?;
        ValidPoses::from_bytes(&response.body)
    }

    pub fn build_all_species_and_colors(&self) -> Result<HttpRequest, ApiError> {
        self.graphql(queries::ALL_SPECIES_AND_COLORS, json!({}))
    }

    pub fn parse_all_species_and_colors(&self, response: HttpResponse) -> Result<Catalog, ApiError> {
        let envelope = Envelope::decode(&response)?;
        Ok(Catalog::from_payload(&envelope.data()?)?)
    }

    pub fn build_outfit(&self, id: u64, size: LayerImageSize) -> Result<HttpRequest, ApiError> {
        self.graphql(
            queries::OUTFIT_BY_ID,
            json!({"outfitId": id.to_string(), "size": size.name()}),
        )
    }

    pub fn parse_outfit(&self, id: u64, response: HttpResponse) -> Result<Outfit, ApiError> {
        let envelope = Envelope::decode(&response)?;
        envelope
            .data()?
            .opt_parse("outfit")?
            .ok_or_else(|| envelope.missing(ApiError::OutfitNotFound { id }))
    }

    pub fn build_pet_appearance_by_id(&self, id: u64, size: LayerImageSize) -> Result<HttpRequest, ApiError> {
        self.graphql(
            queries::PET_APPEARANCE_BY_ID,
            json!({"appearanceId": id.to_string(), "size": size.name()}),
        )
    }

    pub fn parse_pet_appearance_by_id(&self, id: u64, response: HttpResponse) -> Result<PetAppearance, ApiError> {
        let envelope = Envelope::decode(&response)?;
        envelope
            .data()?
            .opt_parse("petAppearanceById")?
            .ok_or_else(|| envelope.missing(ApiError::MissingPetAppearance(format!("appearance {id}"))))
    }

    pub fn build_pet_appearance(
        &self,
        species_id: u32,
        color_id: u32,
        pose: PetPose,
        size: LayerImageSize,
    ) -> Result<HttpRequest, ApiError> {
        self.graphql(
            queries::PET_APPEARANCE,
            json!({
                "speciesId": species_id.to_string(),
                "colorId": color_id.to_string(),
                "pose": pose.name(),
                "size": size.name(),
            }),
        )
    }

    pub fn parse_pet_appearance(
        &self,
        species_id: u32,
        color_id: u32,
        pose: PetPose,
        response: HttpResponse,
    ) -> Result<PetAppearance, ApiError> {
        let envelope = Envelope::decode(&response)?;
        envelope.data()?.opt_parse("petAppearance")?.ok_or_else(|| {
            envelope.missing(ApiError::MissingPetAppearance(format!("{species_id}-{color_id}-{pose}")))
        })
    }

    pub fn build_pet_appearances(
        &self,
        species_id: u32,
        color_id: u32,
        size: LayerImageSize,
    ) -> Result<HttpRequest, ApiError> {
        self.graphql(
            queries::PET_APPEARANCES,
            json!({
                "speciesId": species_id.to_string(),
                "colorId": color_id.to_string(),
                "size": size.name(),
            }),
        )
    }

    pub fn parse_pet_appearances(&self, response: HttpResponse) -> Result<Vec<PetAppearance>, ApiError> {
        let envelope = Envelope::decode(&response)?;
        Ok(envelope.data()?.list("petAppearances")?)
    }

    pub fn build_pet_appearance_ids(&self, species_id: u32, color_id: u32) -> Result<HttpRequest, ApiError> {
        self.graphql(
            queries::PET_APPEARANCE_IDS,
            json!({"speciesId": species_id.to_string(), "colorId": color_id.to_string()}),
        )
    }

    pub fn parse_pet_appearance_ids(&self, response: HttpResponse) -> Result<Vec<u64>, ApiError> {
        let envelope = Envelope::decode(&response)?;
        let ids = envelope
            .data()?
            .objects("petAppearances")?
            .iter()
            .map(|appearance| appearance.id("id"))
            .collect::<Result<_, _>>()?;
        Ok(ids)
    }

    pub fn build_all_zones(&self) -> Result<HttpRequest, ApiError> {
        self.graphql(queries::ALL_ZONES, json!({}))
    }

    pub fn parse_all_zones(&self, response: HttpResponse) -> Result<Vec<Zone>, ApiError> {
        let envelope = Envelope::decode(&response)?;
        Ok(envelope.data()?.list("allZones")?)
    }

    pub fn build_pet_on_neopets(&self, name: &str, size: LayerImageSize) -> Result<HttpRequest, ApiError> {
        self.graphql(queries::PET_ON_NEOPETS, json!({"petName": name, "size": size.name()}))
    }

    pub fn parse_pet_on_neopets(&self, name: &str, response: HttpResponse) -> Result<PetOnNeopets, ApiError> {
        let envelope = Envelope::decode(&response)?;
        let not_found = || ApiError::NeopetNotFound { name: name.to_string() };

        let errors = envelope.errors();
        if errors.iter().any(|message| message.contains(MODELING_ERROR)) {
            return Err(ApiError::MissingModelData);
        }
        if !errors.is_empty() {
            tracing::warn!(pet = name, errors = ?errors, "unexpected errors looking up pet");
            return Err(not_found());
        }

        let Some(data) = envelope.opt_data()? else {
            return Err(not_found());
        };
        data.opt_parse("petOnNeopetsDotCom")?.ok_or_else(not_found)
    }

    pub fn build_assets_by_ids(
        &self,
        species_id: u32,
        color_id: u32,
        item_ids: &[u64],
        size: LayerImageSize,
    ) -> Result<HttpRequest, ApiError> {
        let ids: Vec<String> = item_ids.iter().map(u64::to_string).collect();
        self.graphql(
            queries::PET_APPEARANCES_WITH_ITEMS_BY_IDS,
            json!({
                "speciesId": species_id.to_string(),
                "colorId": color_id.to_string(),
                "allItemIds": ids,
                "size": size.name(),
            }),
        )
    }

    pub fn build_assets_by_names(
        &self,
        species_id: u32,
        color_id: u32,
        names: &[String],
        size: LayerImageSize,
    ) -> Result<HttpRequest, ApiError> {
        self.graphql(
            queries::PET_APPEARANCES_WITH_ITEMS_BY_NAMES,
            json!({
                "speciesId": species_id.to_string(),
                "colorId": color_id.to_string(),
                "names": names,
                "size": size.name(),
            }),
        )
    }

    pub fn parse_assets(&self, species_id: u32, color_id: u32, response: HttpResponse) -> Result<Assets, ApiError> {
        let envelope = Envelope::decode(&response)?;
        if envelope.errors().iter().any(|message| message.contains(UNDEFINED_PAIR_ERROR)) {
            return Err(ApiError::InvalidColorSpeciesPair { species_id, color_id });
        }
        let assets = Assets::from_payload(&envelope.data()?)?;
        if assets.items.iter().any(|item| item.appearance.is_none()) {
            tracing::warn!(species_id, color_id, "some requested items have no appearance on this pet");
        }
        Ok(assets)
    }

    pub fn build_all_appearances_for_color(
        &self,
        color_id: u32,
        item_ids: &[u64],
        size: LayerImageSize,
    ) -> Result<HttpRequest, ApiError> {
        let ids: Vec<String> = item_ids.iter().map(u64::to_string).collect();
        self.graphql(
            queries::ALL_APPEARANCES_FOR_COLOR,
            json!({
                "itemIds": ids,
                "preferredColorId": color_id.to_string(),
                "size": size.name(),
            }),
        )
    }

    pub fn parse_all_appearances_for_color(&self, response: HttpResponse) -> Result<ColorAppearances, ApiError> {
        let envelope = Envelope::decode(&response)?;
        Ok(ColorAppearances::from_payload(&envelope.data()?)?)
    }

    pub fn build_items_by_ids(&self, item_ids: &[u64]) -> Result<HttpRequest, ApiError> {
        let ids: Vec<String> = item_ids.iter().map(u64::to_string).collect();
        self.graphql(queries::ITEMS_BY_IDS, json!({"itemIds": ids}))
    }

    /// DTI answers `data: null` when any of the ids does not exist.
    pub fn parse_items_by_ids(&self, response: HttpResponse) -> Result<Vec<Item>, ApiError> {
        let envelope = Envelope::decode(&response)?;
        match envelope.opt_data()? {
            Some(data) => Ok(data.list("items")?),
            None => Err(ApiError::InvalidItemId),
        }
    }

    pub fn build_items_by_name(&self, names: &[String]) -> Result<HttpRequest, ApiError> {
        self.graphql(queries::ITEMS_BY_NAME, json!({"names": names}))
    }

    /// Unknown names come back as `null` and are dropped.
    pub fn parse_items_by_name(&self, response: HttpResponse) -> Result<Vec<Item>, ApiError> {
        let envelope = Envelope::decode(&response)?;
        Ok(envelope.data()?.one_or_many("itemsByName")?)
    }

    pub fn build_item_search(&self, query: &str, item_kind: Option<ItemKind>) -> Result<HttpRequest, ApiError> {
        self.graphql(
            queries::ITEM_SEARCH,
            json!({"query": query, "itemKind": item_kind.map(ItemKind::name)}),
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn build_item_search_to_fit(
        &self,
        query: &str,
        species_id: u32,
        color_id: u32,
        item_kind: Option<ItemKind>,
        offset: u32,
        limit: u32,
        size: LayerImageSize,
    ) -> Result<HttpRequest, ApiError> {
        self.graphql(
            queries::ITEM_SEARCH_TO_FIT,
            json!({
                "query": query,
                "speciesId": species_id.to_string(),
                "colorId": color_id.to_string(),
                "itemKind": item_kind.map(ItemKind::name),
                "offset": offset,
                "limit": limit,
                "size": size.name(),
            }),
        )
    }

    /// Parses a page of either search flavor; both answer under `itemSearch`.
    pub fn parse_item_search(&self, response: HttpResponse) -> Result<Vec<Item>, ApiError> {
        let envelope = Envelope::decode(&response)?;
        let data = envelope.data()?;
        match data.opt_object("itemSearch")? {
            Some(search) => Ok(search.list("items")?),
            None => Ok(Vec::new()),
        }
    }

    /// GET of an absolute URL, e.g. a layer image.
    pub fn build_asset(&self, url: &str) -> HttpRequest {
        self.get(url.to_string())
    }

    pub fn parse_asset(&self, response: HttpResponse) -> Result<Vec<u8>, ApiError> {
        check_status(&response)?;
        Ok(response.body)
    }
}

/// A decoded GraphQL response body.
struct Envelope {
    body: Value,
}

impl Envelope {
    fn decode(response: &HttpResponse) -> Result<Self, ApiError> {
        check_status(response)?;
        let body = serde_json::from_slice(&response.body)
            .map_err(|e| MalformedResponseError::new("response", format!("invalid JSON: {e}")))?;
        Ok(Self { body })
    }

    /// Messages from `errors[]`, plus the older single `error` object.
    fn errors(&self) -> Vec<String> {
        let listed = self
            .body
            .get("errors")
            .and_then(Value::as_array)
            .into_iter()
            .flatten();
        let single = self.body.get("error").into_iter();
        listed
            .chain(single)
            .filter_map(|e| e.get("message").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }

    fn opt_data(&self) -> Result<Option<Fields<'_>>, ApiError> {
        match self.body.get("data").filter(|d| !d.is_null()) {
            Some(data) => Ok(Some(Fields::new("data", data)?)),
            None => Ok(None),
        }
    }

    fn data(&self) -> Result<Fields<'_>, ApiError> {
        self.opt_data()?.ok_or_else(|| {
            let errors = self.errors();
            tracing::warn!(errors = ?errors, "GraphQL response has no data");
            ApiError::GraphQl(errors)
        })
    }

    /// The error for a `null` root field. Any server messages are logged.
    fn missing(&self, error: ApiError) -> ApiError {
        let errors = self.errors();
        if !errors.is_empty() {
            tracing::warn!(errors = ?errors, %error, "GraphQL errors alongside null result");
        }
        error
    }
}

/// Map non-success status codes to `ApiError::HttpStatus`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpStatus {
        status: response.status,
        body: response.text(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> DtiClient {
        DtiClient::new("http://localhost:3000/api")
    }

    fn ok(body: Value) -> HttpResponse {
        HttpResponse::new(200, body.to_string())
    }

    fn request_body(req: &HttpRequest) -> Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    fn appearance_json(id: u64, pose: &str) -> Value {
        json!({
            "id": id.to_string(),
            "bodyId": "93",
            "pose": pose,
            "species": {"id": "1", "name": "Acara"},
            "color": {"id": "3", "name": "Blue"},
            "layers": [{"id": "7", "imageUrl": "https://a.test/7.png", "zone": {"id": "5", "depth": 7, "label": "Body"}}]
        })
    }

    #[test]
    fn graphql_request_shape() {
        let req = client().build_pet_appearance(1, 3, PetPose::HappyFem, LayerImageSize::Size300).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/api/graphql");
        assert!(req
            .headers
            .contains(&("content-type".to_string(), "application/json".to_string())));
        let body = request_body(&req);
        assert_eq!(body["operationName"], "PetAppearance");
        assert!(body["query"].as_str().unwrap().starts_with("query PetAppearance("));
        assert_eq!(body["variables"]["speciesId"], "1");
        assert_eq!(body["variables"]["pose"], "HAPPY_FEM");
        assert_eq!(body["variables"]["size"], "SIZE_300");
    }

    #[test]
    fn valid_pet_poses_is_a_plain_get() {
        let req = client().build_valid_pet_poses();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/validPetPoses");
        assert!(req.body.is_none());

        let poses = client()
            .parse_valid_pet_poses(HttpResponse::new(200, vec![1, 2, 0, 8]))
            .unwrap();
        assert!(poses.check(1, 2, Some(PetPose::HappyFem)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = DtiClient::new("http://localhost:3000/api/");
        assert_eq!(client.build_all_zones().unwrap().url, "http://localhost:3000/api/graphql");
        assert_eq!(DtiClient::default().base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn non_success_status_is_reported() {
        let err = client()
            .parse_all_zones(HttpResponse::new(502, "bad gateway"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpStatus { status: 502, ref body } if body == "bad gateway"));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = client().parse_all_zones(HttpResponse::new(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Malformed(ref e) if e.field == "response"));
    }

    #[test]
    fn errors_without_data_become_graphql_error() {
        let err = client()
            .parse_all_zones(ok(json!({"errors": [{"message": "boom"}], "data": null})))
            .unwrap_err();
        assert!(matches!(err, ApiError::GraphQl(ref messages) if messages == &["boom".to_string()]));
    }

    #[test]
    fn catalog_parses() {
        let catalog = client()
            .parse_all_species_and_colors(ok(json!({"data": {
                "allSpecies": [{"id": "1", "name": "Acara"}],
                "allColors": [{"id": "8", "name": "Blue"}, {"id": "1", "name": "Alien"}]
            }})))
            .unwrap();
        assert_eq!(catalog.species.len(), 1);
        assert_eq!(catalog.colors[0].name, "Blue");
    }

    #[test]
    fn malformed_nested_field_reports_data_path() {
        let err = client()
            .parse_all_zones(ok(json!({"data": {"allZones": [{"id": 1, "depth": 2}]}})))
            .unwrap_err();
        assert!(matches!(err, ApiError::Malformed(ref e) if e.field == "data.allZones[0].label"));
    }

    #[test]
    fn null_outfit_is_not_found() {
        let err = client().parse_outfit(42, ok(json!({"data": {"outfit": null}}))).unwrap_err();
        assert!(matches!(err, ApiError::OutfitNotFound { id: 42 }));
    }

    #[test]
    fn null_appearance_is_missing() {
        let err = client()
            .parse_pet_appearance(1, 3, PetPose::SadMasc, ok(json!({"data": {"petAppearance": null}})))
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingPetAppearance(ref s) if s == "1-3-SAD_MASC"));

        let err = client()
            .parse_pet_appearance_by_id(9, ok(json!({"data": {"petAppearanceById": null}})))
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingPetAppearance(_)));
    }

    #[test]
    fn appearance_ids_are_coerced() {
        let ids = client()
            .parse_pet_appearance_ids(ok(json!({"data": {"petAppearances": [{"id": "100"}, {"id": 101}]}})))
            .unwrap();
        assert_eq!(ids, vec![100, 101]);
    }

    #[test]
    fn pet_on_neopets_errors() {
        let modeling = ok(json!({
            "errors": [{"message": "This pet's modeling data isn't loaded into our database yet, sorry!"}],
            "data": {"petOnNeopetsDotCom": null}
        }));
        assert!(matches!(
            client().parse_pet_on_neopets("x", modeling).unwrap_err(),
            ApiError::MissingModelData
        ));

        let other = ok(json!({"errors": [{"message": "pet not found"}], "data": {"petOnNeopetsDotCom": null}}));
        assert!(matches!(
            client().parse_pet_on_neopets("x", other).unwrap_err(),
            ApiError::NeopetNotFound { ref name } if name == "x"
        ));

        let missing = ok(json!({"data": {"petOnNeopetsDotCom": null}}));
        assert!(client().parse_pet_on_neopets("x", missing).is_err());
    }

    #[test]
    fn pet_on_neopets_parses() {
        let pet = client()
            .parse_pet_on_neopets(
                "thyassa",
                ok(json!({"data": {"petOnNeopetsDotCom": {
                    "petAppearance": appearance_json(101, "HAPPY_FEM"),
                    "wornItems": [{"id": "39951"}]
                }}})),
            )
            .unwrap();
        assert_eq!(pet.pet_appearance.id, 101);
        assert_eq!(pet.worn_item_ids, vec![39951]);
    }

    #[test]
    fn undefined_pair_is_invalid() {
        let response = ok(json!({"error": {"message": "Cannot read property 'id' as it is undefined"}}));
        let err = client().parse_assets(2, 8, response).unwrap_err();
        assert!(matches!(err, ApiError::InvalidColorSpeciesPair { species_id: 2, color_id: 8 }));
    }

    #[test]
    fn assets_accept_single_item_object() {
        let assets = client()
            .parse_assets(
                1,
                3,
                ok(json!({"data": {
                    "petAppearances": [appearance_json(100, "HAPPY_MASC"), appearance_json(101, "HAPPY_FEM")],
                    "items": {"id": "81162", "name": "Blue Background"}
                }})),
            )
            .unwrap();
        assert_eq!(assets.pet_appearances.len(), 2);
        assert_eq!(assets.items[0].id, 81162);
    }

    #[test]
    fn assets_request_variants() {
        let by_ids = client()
            .build_assets_by_ids(1, 3, &[81162, 39951], LayerImageSize::Size600)
            .unwrap();
        let body = request_body(&by_ids);
        assert_eq!(body["operationName"], "PetAppearancesWithItemsByIds");
        assert_eq!(body["variables"]["allItemIds"], json!(["81162", "39951"]));

        let by_names = client()
            .build_assets_by_names(1, 3, &["Sand Hat".to_string()], LayerImageSize::Size600)
            .unwrap();
        let body = request_body(&by_names);
        assert_eq!(body["operationName"], "PetAppearancesWithItemsByNames");
        assert_eq!(body["variables"]["names"], json!(["Sand Hat"]));
    }

    #[test]
    fn color_appearances_group_items_by_body() {
        let parsed = client()
            .parse_all_appearances_for_color(ok(json!({"data": {
                "color": {"appliedToAllCompatibleSpecies": [
                    {"canonicalAppearance": appearance_json(101, "HAPPY_FEM")},
                    {"canonicalAppearance": null}
                ]},
                "items": [{
                    "id": "39951",
                    "name": "Sand Hat",
                    "allAppearances": [
                        {"id": "item-39951-body-93", "layers": []},
                        {"id": "item-39951-body-47", "layers": []}
                    ]
                }]
            }})))
            .unwrap();
        assert_eq!(parsed.pet_appearances.len(), 1);
        let fitted = parsed.items_for_body(93);
        assert_eq!(fitted.len(), 1);
        assert_eq!(fitted[0].appearance.as_ref().unwrap().id, "item-39951-body-93");
        assert!(parsed.items_for_body(1).is_empty());
    }

    #[test]
    fn items_by_ids_null_data_is_invalid_id() {
        let err = client()
            .parse_items_by_ids(ok(json!({"data": null, "errors": [{"message": "no such item"}]})))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidItemId));
    }

    #[test]
    fn items_by_name_skips_unknown_names() {
        let items = client()
            .parse_items_by_name(ok(json!({"data": {"itemsByName": [null, {"id": 1, "name": "a"}]}})))
            .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn search_to_fit_request_carries_paging() {
        let req = client()
            .build_item_search_to_fit("hat", 1, 3, Some(ItemKind::Nc), 30, 30, LayerImageSize::Size150)
            .unwrap();
        let body = request_body(&req);
        assert_eq!(body["operationName"], "ItemSearchToFit");
        assert_eq!(body["variables"]["offset"], 30);
        assert_eq!(body["variables"]["limit"], 30);
        assert_eq!(body["variables"]["itemKind"], "NC");

        let req = client().build_item_search("hat", None).unwrap();
        assert!(request_body(&req)["variables"]["itemKind"].is_null());
    }

    #[test]
    fn asset_passthrough() {
        let req = client().build_asset("https://a.test/7.png");
        assert_eq!(req.url, "https://a.test/7.png");
        let bytes = client().parse_asset(HttpResponse::new(200, vec![0x89, b'P'])).unwrap();
        assert_eq!(bytes, vec![0x89, b'P']);
        assert!(client().parse_asset(HttpResponse::new(404, "")).is_err());
    }
}
