//! In-process stand-in for the DTI API, used by integration tests.
//!
//! Serves `POST /api/graphql` (dispatching on `operationName`),
//! `GET /api/validPetPoses` and `GET /assets/{file}`. Every request is
//! counted per operation so tests can assert on caching behavior.

pub mod fixtures;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

use crate::fixtures::{Item, ITEMS};

pub const VALID_POSES_ROUTE: &str = "validPetPoses";
pub const ASSET_ROUTE: &str = "asset";

/// Request counters, keyed by GraphQL operation name or route.
#[derive(Clone, Debug, Default)]
pub struct MockState {
    hits: Arc<RwLock<HashMap<String, usize>>>,
}

impl MockState {
    pub async fn hits(&self, key: &str) -> usize {
        self.hits.read().await.get(key).copied().unwrap_or(0)
    }

    async fn record(&self, key: &str) {
        *self.hits.write().await.entry(key.to_string()).or_default() += 1;
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlBody {
    pub operation_name: Option<String>,
    #[serde(default)]
    pub variables: Value,
}

pub fn app() -> Router {
    app_with_state(MockState::default())
}

pub fn app_with_state(state: MockState) -> Router {
    Router::new()
        .route("/api/graphql", post(graphql))
        .route("/api/validPetPoses", get(valid_pet_poses))
        .route("/assets/{file}", get(asset))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, MockState::default()).await
}

pub async fn run_with_state(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

async fn valid_pet_poses(State(state): State<MockState>) -> Response {
    state.record(VALID_POSES_ROUTE).await;
    ([(header::CONTENT_TYPE, "application/octet-stream")], fixtures::VALID_POSES.to_vec()).into_response()
}

async fn asset(State(state): State<MockState>, Path(file): Path<String>) -> Response {
    state.record(ASSET_ROUTE).await;
    if file.starts_with("missing") {
        return StatusCode::NOT_FOUND.into_response();
    }
    let mut body = b"\x89PNG\r\n\x1a\n".to_vec();
    body.extend_from_slice(file.as_bytes());
    ([(header::CONTENT_TYPE, "image/png")], body).into_response()
}

async fn graphql(State(state): State<MockState>, headers: HeaderMap, Json(body): Json<GraphQlBody>) -> Response {
    let operation = body.operation_name.unwrap_or_default();
    state.record(&operation).await;
    tracing::debug!(operation = %operation, variables = %body.variables, "graphql request");

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let assets = format!("http://{host}/assets");
    let vars = &body.variables;

    let payload = match operation.as_str() {
        "AllSpeciesAndColors" => data(fixtures::catalog_json()),
        "AllZones" => data(json!({"allZones": fixtures::zones_json()})),
        "OutfitById" => {
            let outfit = match id(&vars["outfitId"]) {
                Some(fixtures::OUTFIT_ID) => fixtures::outfit_json(&assets),
                _ => Value::Null,
            };
            data(json!({"outfit": outfit}))
        }
        "PetAppearanceById" => {
            let appearance = id(&vars["appearanceId"])
                .and_then(fixtures::appearance_by_id)
                .map(|a| a.to_json(&assets));
            data(json!({"petAppearanceById": appearance}))
        }
        "PetAppearance" => {
            let pose = vars["pose"].as_str().unwrap_or_default();
            let appearance = pair(vars).and_then(|(s, c)| {
                fixtures::appearances_for(s, c)
                    .find(|a| a.pose == pose)
                    .map(|a| a.to_json(&assets))
            });
            data(json!({"petAppearance": appearance}))
        }
        "PetAppearances" => {
            let appearances: Vec<Value> = pair(vars)
                .map(|(s, c)| fixtures::appearances_for(s, c).map(|a| a.to_json(&assets)).collect())
                .unwrap_or_default();
            data(json!({"petAppearances": appearances}))
        }
        "PetAppearanceIds" => {
            let ids: Vec<Value> = pair(vars)
                .map(|(s, c)| fixtures::appearances_for(s, c).map(|a| json!({"id": a.id.to_string()})).collect())
                .unwrap_or_default();
            data(json!({"petAppearances": ids}))
        }
        "PetOnNeopets" => pet_on_neopets(vars["petName"].as_str().unwrap_or_default(), &assets),
        "PetAppearancesWithItemsByIds" => {
            let items = list(&vars["allItemIds"]).iter().map(|v| id(v).and_then(fixtures::item_by_id)).collect();
            assets_for(vars, items, &assets)
        }
        "PetAppearancesWithItemsByNames" => {
            let items = list(&vars["names"])
                .iter()
                .map(|v| v.as_str().and_then(fixtures::item_by_name))
                .collect();
            assets_for(vars, items, &assets)
        }
        "AllAppearancesForColor" => all_appearances_for_color(vars, &assets),
        "ItemsByIds" => {
            let found: Option<Vec<Value>> = list(&vars["itemIds"])
                .iter()
                .map(|v| id(v).and_then(fixtures::item_by_id).map(Item::to_json))
                .collect();
            match found {
                Some(items) => data(json!({"items": items})),
                None => json!({"data": null, "errors": [{"message": "Item not found"}]}),
            }
        }
        "ItemsByName" => {
            let mut items: Vec<Value> = list(&vars["names"])
                .iter()
                .map(|v| v.as_str().and_then(fixtures::item_by_name).map(Item::to_json).unwrap_or(Value::Null))
                .collect();
            // A single name comes back as a bare object.
            let result = if items.len() == 1 { items.remove(0) } else { Value::Array(items) };
            data(json!({"itemsByName": result}))
        }
        "ItemSearch" => {
            let items: Vec<Value> = search(vars).map(Item::to_json).collect();
            data(json!({"itemSearch": {"items": items}}))
        }
        "ItemSearchToFit" => item_search_to_fit(vars, &assets),
        other => {
            tracing::warn!(operation = other, "unknown graphql operation");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"errors": [{"message": format!("Unknown operation {other:?}")}]})),
            )
                .into_response();
        }
    };
    Json(payload).into_response()
}

fn data(value: Value) -> Value {
    json!({"data": value})
}

/// GraphQL `ID`s arrive as strings or numbers.
fn id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn list(value: &Value) -> Vec<Value> {
    value.as_array().cloned().unwrap_or_default()
}

fn pair(vars: &Value) -> Option<(u32, u32)> {
    let species = u32::try_from(id(&vars["speciesId"])?).ok()?;
    let color = u32::try_from(id(&vars["colorId"])?).ok()?;
    Some((species, color))
}

fn pet_on_neopets(name: &str, assets: &str) -> Value {
    match name {
        fixtures::MODELED_PET => {
            let appearance = fixtures::appearance_by_id(101).map(|a| a.to_json(assets));
            data(json!({"petOnNeopetsDotCom": {
                "petAppearance": appearance,
                "wornItems": [{"id": "39951"}, {"id": "81162"}]
            }}))
        }
        fixtures::UNMODELED_PET => json!({
            "errors": [{"message": fixtures::MODELING_ERROR}],
            "data": {"petOnNeopetsDotCom": null}
        }),
        _ => json!({
            "errors": [{"message": format!("Pet {name:?} not found")}],
            "data": {"petOnNeopetsDotCom": null}
        }),
    }
}

fn assets_for(vars: &Value, items: Vec<Option<&Item>>, assets: &str) -> Value {
    let Some((species, color)) = pair(vars) else {
        return json!({"error": {"message": "Cannot read property 'id' as it is undefined"}});
    };
    let Some(body) = fixtures::body_for(species, color) else {
        return json!({"error": {"message": "Cannot read property 'bodyId' as it is undefined"}});
    };
    let appearances: Vec<Value> = fixtures::appearances_for(species, color).map(|a| a.to_json(assets)).collect();
    let items: Vec<Value> = items
        .into_iter()
        .map(|item| item.map(|i| i.fitted_json(Some(body), assets)).unwrap_or(Value::Null))
        .collect();
    data(json!({"petAppearances": appearances, "items": items}))
}

fn all_appearances_for_color(vars: &Value, assets: &str) -> Value {
    let color = id(&vars["preferredColorId"]).and_then(|c| u32::try_from(c).ok()).unwrap_or(0);
    let species: Vec<Value> = fixtures::SPECIES
        .iter()
        .filter_map(|(s, _)| fixtures::appearances_for(*s, color).next())
        .map(|a| json!({"canonicalAppearance": a.to_json(assets)}))
        .collect();
    let items: Vec<Value> = list(&vars["itemIds"])
        .iter()
        .filter_map(|v| id(v).and_then(fixtures::item_by_id))
        .map(|i| i.all_appearances_json(assets))
        .collect();
    data(json!({
        "color": {"appliedToAllCompatibleSpecies": species},
        "items": items
    }))
}

fn search(vars: &Value) -> impl Iterator<Item = &'static Item> + '_ {
    let query = vars["query"].as_str().unwrap_or_default().to_lowercase();
    let kind = vars["itemKind"].as_str();
    ITEMS
        .iter()
        .filter(move |i| i.name.to_lowercase().contains(&query))
        .filter(move |i| kind.map_or(true, |k| i.kind == k))
}

fn item_search_to_fit(vars: &Value, assets: &str) -> Value {
    let body = pair(vars).and_then(|(s, c)| fixtures::body_for(s, c));
    let offset = vars["offset"].as_u64().unwrap_or(0) as usize;
    let limit = vars["limit"].as_u64().unwrap_or(30) as usize;
    let items: Vec<Value> = search(vars)
        .filter(|i| body.is_some_and(|b| i.fits(b)))
        .skip(offset)
        .take(limit)
        .map(|i| i.fitted_json(body, assets))
        .collect();
    data(json!({"itemSearch": {"items": items}}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_accept_strings_and_numbers() {
        assert_eq!(id(&json!("81162")), Some(81162));
        assert_eq!(id(&json!(5)), Some(5));
        assert_eq!(id(&json!("abc")), None);
        assert_eq!(id(&Value::Null), None);
    }

    #[test]
    fn graphql_body_tolerates_missing_variables() {
        let body: GraphQlBody = serde_json::from_str(r#"{"operationName":"AllZones","query":"..."}"#).unwrap();
        assert_eq!(body.operation_name.as_deref(), Some("AllZones"));
        assert!(body.variables.is_null());
    }

    #[test]
    fn search_filters_by_kind() {
        let vars = json!({"query": "hat", "itemKind": "NC"});
        let names: Vec<&str> = search(&vars).map(|i| i.name).collect();
        assert_eq!(names, vec!["Sand Hat"]);
    }

    #[test]
    fn undefined_pair_yields_legacy_error() {
        let vars = json!({"speciesId": "2", "colorId": "1"});
        let payload = assets_for(&vars, Vec::new(), "http://localhost/assets");
        assert!(payload["error"]["message"].as_str().unwrap().contains("it is undefined"));
    }

    #[test]
    fn pose_table_matches_fixtures() {
        let table = &fixtures::VALID_POSES;
        let species = usize::from(table[0]);
        let colors = usize::from(table[1]);
        assert_eq!(table.len(), 2 + species * colors);
        for appearance in fixtures::APPEARANCES.iter() {
            let index = 2 + (appearance.species_id as usize - 1) * colors + (appearance.color_id as usize - 1);
            assert_ne!(table[index], 0, "appearance {} has no pose bits", appearance.id);
        }
    }
}
