//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.

use dti_core::{from_value, ApiError, DtiClient, HttpMethod, HttpRequest, HttpResponse, Item, LayerImageSize};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000/api";

fn client() -> DtiClient {
    DtiClient::new(BASE_URL)
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

/// Simulated bodies are stored as JSON, or as a plain string for non-JSON errors.
fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    let status = sim["status"].as_u64().unwrap() as u16;
    let body = match &sim["body"] {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    HttpResponse::new(status, body)
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");
    let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["operationName"], expected["operation_name"], "{name}: operation");
    if let Some(variables) = expected.get("variables") {
        assert_eq!(&body["variables"], variables, "{name}: variables");
    }
}

fn check_error(name: &str, err: ApiError, expected: &Value) {
    match expected["kind"].as_str().unwrap() {
        "Malformed" => match err {
            ApiError::Malformed(e) => assert_eq!(e.field, expected["field"].as_str().unwrap(), "{name}: field"),
            other => panic!("{name}: expected Malformed, got {other:?}"),
        },
        "HttpStatus" => assert!(
            matches!(err, ApiError::HttpStatus { status, .. } if u64::from(status) == expected["status"].as_u64().unwrap()),
            "{name}: expected HttpStatus"
        ),
        "GraphQl" => assert!(matches!(err, ApiError::GraphQl(_)), "{name}: expected GraphQl"),
        "OutfitNotFound" => assert!(matches!(err, ApiError::OutfitNotFound { .. }), "{name}: expected OutfitNotFound"),
        "MissingModelData" => assert!(matches!(err, ApiError::MissingModelData), "{name}: expected MissingModelData"),
        "NeopetNotFound" => assert!(matches!(err, ApiError::NeopetNotFound { .. }), "{name}: expected NeopetNotFound"),
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

fn ids(values: &Value) -> Vec<u64> {
    values.as_array().unwrap().iter().map(|v| v.as_u64().unwrap()).collect()
}

// ---------------------------------------------------------------------------
// Species and colors
// ---------------------------------------------------------------------------

#[test]
fn species_and_colors_test_vectors() {
    let raw = include_str!("../../test-vectors/species_and_colors.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        // Verify build
        let req = c.build_all_species_and_colors().unwrap();
        check_request(name, &req, &case["expected_request"]);

        // Verify parse
        let result = c.parse_all_species_and_colors(simulated(case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error);
        } else {
            let catalog = result.unwrap();
            let expected = &case["expected_result"];
            let species: Vec<(u32, String)> = catalog.species.iter().map(|s| (s.id, s.name.clone())).collect();
            let colors: Vec<(u32, String)> = catalog.colors.iter().map(|c| (c.id, c.name.clone())).collect();
            let expected_species: Vec<(u32, String)> = serde_json::from_value(expected["species"].clone()).unwrap();
            let expected_colors: Vec<(u32, String)> = serde_json::from_value(expected["colors"].clone()).unwrap();
            assert_eq!(species, expected_species, "{name}: species");
            assert_eq!(colors, expected_colors, "{name}: colors");
        }
    }
}

// ---------------------------------------------------------------------------
// Outfit
// ---------------------------------------------------------------------------

#[test]
fn outfit_test_vectors() {
    let raw = include_str!("../../test-vectors/outfit.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_u64().unwrap();

        let req = c.build_outfit(id, LayerImageSize::Size600).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_outfit(id, simulated(case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error);
        } else {
            let outfit = result.unwrap();
            let expected = &case["expected_result"];
            assert_eq!(outfit.id, expected["id"].as_u64().unwrap(), "{name}: id");
            assert_eq!(outfit.name.as_deref(), expected["name"].as_str(), "{name}: name");
            assert_eq!(
                outfit.creator.as_ref().map(|u| u.username.as_str()),
                expected["creator"].as_str(),
                "{name}: creator"
            );
            assert_eq!(outfit.pet_appearance.id, expected["pet_appearance_id"].as_u64().unwrap());
            let worn: Vec<u64> = outfit.worn_items.iter().map(|i| i.id).collect();
            assert_eq!(worn, ids(&expected["worn_item_ids"]), "{name}: worn items");
            assert_eq!(outfit.created_at.to_rfc3339(), expected["created_at"].as_str().unwrap());
            assert_eq!(outfit.image_urls().large, expected["image_large"].as_str().unwrap());
        }
    }
}

// ---------------------------------------------------------------------------
// Pet on Neopets
// ---------------------------------------------------------------------------

#[test]
fn pet_on_neopets_test_vectors() {
    let raw = include_str!("../../test-vectors/pet_on_neopets.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let pet_name = case["input_name"].as_str().unwrap();

        let req = c.build_pet_on_neopets(pet_name, LayerImageSize::Size600).unwrap();
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["variables"]["petName"], pet_name, "{name}: petName");

        let result = c.parse_pet_on_neopets(pet_name, simulated(case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error);
        } else {
            let pet = result.unwrap();
            let expected = &case["expected_result"];
            assert_eq!(pet.pet_appearance.id, expected["pet_appearance_id"].as_u64().unwrap());
            assert_eq!(pet.worn_item_ids, ids(&expected["worn_item_ids"]), "{name}: worn");
        }
    }
}

// ---------------------------------------------------------------------------
// Deserializer
// ---------------------------------------------------------------------------

#[test]
fn deserializer_test_vectors() {
    let raw = include_str!("../../test-vectors/deserializer.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let result = from_value::<Item>("item", &case["payload"]);

        if let Some(expected) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_eq!(err.field, expected["field"].as_str().unwrap(), "{name}: field");
            if let Some(reason) = expected["reason"].as_str() {
                assert_eq!(err.reason, reason, "{name}: reason");
            }
        } else {
            let item = result.unwrap();
            let expected = &case["expected_result"];
            assert_eq!(item.id, expected["id"].as_u64().unwrap(), "{name}: id");
            assert_eq!(item.name, expected["name"].as_str().unwrap(), "{name}: name");
            assert_eq!(item.description, expected["description"].as_str().unwrap(), "{name}: description");
            assert_eq!(item.is_nc, expected["is_nc"].as_bool().unwrap(), "{name}: is_nc");
            assert_eq!(u64::from(item.rarity), expected["rarity"].as_u64().unwrap(), "{name}: rarity");

            // A second pass over the same payload yields an equal, separate value.
            let again = from_value::<Item>("item", &case["payload"]).unwrap();
            assert_eq!(item, again, "{name}: idempotent");
        }
    }
}
