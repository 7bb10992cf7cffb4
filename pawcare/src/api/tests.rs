#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use super::auth::UserDirectory;
use super::create_router;
use crate::config::UserEntry;
use crate::store::DogStore;
use common::{
    AdviceCard, AdviceType, CategoryCode, CreateDogCommand, CreateDogInput, ProblemCategory,
    Rating, ValidateFrom,
};

const TOKEN: &str = "f018a987-c0ae-4269-a6e7-02a0fe77e553";

const REX: &str = r#"{"name":"Rex","breed":"German Shepherd","ageMonths":24,"gender":"male","weightKg":35.5,"energyLevel":"high"}"#;

struct Fixture {
    app: Router,
    dog_id: Uuid,
}

fn fixture() -> Fixture {
    let entry = UserEntry {
        id: Uuid::new_v4(),
        email: "owner@example.com".to_string(),
        token: Uuid::parse_str(TOKEN).unwrap(),
    };
    let users = UserDirectory::new(std::slice::from_ref(&entry)).unwrap();

    let mut store = DogStore::new();
    store.register_user(entry.user());
    for (code, priority, active) in [("chewing", 2, true), ("barking", 1, true), ("digging", 3, false)] {
        store
            .add_category(
                ProblemCategory::new(CategoryCode::try_from(code).unwrap(), code, priority, active)
                    .unwrap(),
            )
            .unwrap();
    }

    let command = CreateDogCommand::validate_from(CreateDogInput {
        name: Some("Luna".to_string()),
        breed: Some("Beagle".to_string()),
        age_months: Some(18),
        gender: Some("female".to_string()),
        weight_kg: Some(9.5),
        energy_level: Some("medium".to_string()),
    })
    .unwrap();
    let dog = store.create_dog(entry.id, command).unwrap();

    for (advice_type, rating) in [
        (AdviceType::Quick, None),
        (AdviceType::Quick, Some(Rating::Helpful)),
        (AdviceType::Plan7Days, None),
    ] {
        store
            .add_advice_card(AdviceCard {
                id: Uuid::new_v4(),
                dog_id: dog.id,
                category_code: CategoryCode::try_from("barking").unwrap(),
                problem_description: "Barks at the door".to_string(),
                ai_response: "Reward calm behavior.".to_string(),
                plan_content: None,
                advice_type,
                rating,
                created_at: Utc::now(),
            })
            .unwrap();
    }

    Fixture {
        app: create_router(store, users).unwrap(),
        dog_id: dog.id,
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn violation_fields(json: &Value) -> Vec<String> {
    json["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_dog_valid() {
    let fx = fixture();
    let (status, json) = send(&fx.app, post_json("/dogs", REX)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(Uuid::parse_str(json["id"].as_str().unwrap()).is_ok());
    assert_eq!(json["name"], "Rex");
    assert_eq!(json["breed"], "German Shepherd");
    assert_eq!(json["ageMonths"], 24);
    assert_eq!(json["gender"], "male");
    assert_eq!(json["weightKg"], 35.5);
    assert_eq!(json["energyLevel"], "high");
    assert!(json["createdAt"].is_string());
    assert!(json["updatedAt"].is_string());
    assert!(json.get("ownerId").is_none());
}

#[tokio::test]
async fn test_create_dog_reports_every_violation() {
    let fx = fixture();
    let body = r#"{"name":"","breed":"German Shepherd","ageMonths":500,"gender":"invalid","weightKg":250.0,"energyLevel":"invalid"}"#;
    let (status, json) = send(&fx.app, post_json("/dogs", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_failed");
    assert_eq!(json["message"], "Invalid input data");
    let fields = violation_fields(&json);
    for field in ["name", "ageMonths", "gender", "weightKg", "energyLevel"] {
        assert!(fields.iter().any(|f| f == field), "missing {field}");
    }
    assert!(!fields.iter().any(|f| f == "breed"));
}

#[tokio::test]
async fn test_create_dog_empty_object_lists_all_required_fields() {
    let fx = fixture();
    let (status, json) = send(&fx.app, post_json("/dogs", "{}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = violation_fields(&json);
    for field in ["name", "breed", "ageMonths", "gender", "weightKg", "energyLevel"] {
        assert!(fields.iter().any(|f| f == field), "missing {field}");
    }
}

#[tokio::test]
async fn test_create_dog_repeated_request_gives_same_violations() {
    let fx = fixture();
    let body = r#"{"name":"","ageMonths":-1,"weightKg":0}"#;
    let (_, first) = send(&fx.app, post_json("/dogs", body)).await;
    let (_, second) = send(&fx.app, post_json("/dogs", body)).await;

    assert_eq!(first["violations"], second["violations"]);
}

#[tokio::test]
async fn test_create_dog_malformed_json() {
    let fx = fixture();
    let (status, json) = send(&fx.app, post_json("/dogs", r#"{"name": "Rex""#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "bad_request");
    assert!(json.get("violations").is_none());
}

#[tokio::test]
async fn test_create_dog_wrong_json_type() {
    let fx = fixture();
    let body = r#"{"name":"Rex","breed":"Beagle","ageMonths":"24","gender":"male","weightKg":9,"energyLevel":"low"}"#;
    let (status, json) = send(&fx.app, post_json("/dogs", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "bad_request");
    assert!(json.get("violations").is_none());
}

#[tokio::test]
async fn test_create_dog_ignores_query_string() {
    let fx = fixture();
    let (status, json) = send(&fx.app, post_json("/dogs?name=Other", REX)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["name"], "Rex");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let fx = fixture();
    let req = Request::builder()
        .method("POST")
        .uri("/dogs")
        .body(Body::from(REX))
        .unwrap();
    let (status, json) = send(&fx.app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "unauthorized");
    assert_eq!(json["message"], "Unauthorized");
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let fx = fixture();
    let req = Request::builder()
        .uri("/categories")
        .header(header::AUTHORIZATION, format!("Bearer {}", Uuid::new_v4()))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&fx.app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_and_get_dogs() {
    let fx = fixture();
    let (status, json) = send(&fx.app, get("/dogs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);

    let (status, json) = send(&fx.app, get(&format!("/dogs/{}", fx.dog_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Luna");

    let (status, json) = send(&fx.app, get(&format!("/dogs/{}", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn test_get_dog_invalid_path_is_bad_request() {
    let fx = fixture();
    let (status, json) = send(&fx.app, get("/dogs/not-a-uuid")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "bad_request");
    assert!(json.get("violations").is_none());
}

#[tokio::test]
async fn test_list_categories_by_priority() {
    let fx = fixture();
    let (status, json) = send(&fx.app, get("/categories")).await;

    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["barking", "chewing", "digging"]);

    let (_, json) = send(&fx.app, get("/categories?active=false")).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["code"], "digging");

    let (_, json) = send(&fx.app, get("/categories?active=1")).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_categories_bad_flag() {
    let fx = fixture();
    let (status, json) = send(&fx.app, get("/categories?active=maybe")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "bad_request");
    assert!(json.get("violations").is_none());
}

#[tokio::test]
async fn test_list_advice_cards_filters() {
    let fx = fixture();
    let base = format!("/dogs/{}/advice-cards", fx.dog_id);

    let (status, json) = send(&fx.app, get(&base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 3);

    let (_, json) = send(&fx.app, get(&format!("{base}?adviceType=quick"))).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let (_, json) = send(&fx.app, get(&format!("{base}?adviceType=quick&rated=true"))).await;
    let cards = json.as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["rating"], "helpful");
    assert_eq!(cards[0]["categoryCode"], "barking");
    assert!(cards[0].get("category").is_none());

    let (_, json) = send(&fx.app, get(&format!("{base}?adviceType=plan_7_days"))).await;
    assert_eq!(json[0]["adviceType"], "plan_7_days");
}

#[tokio::test]
async fn test_list_advice_cards_unknown_type_is_violation() {
    let fx = fixture();
    let uri = format!("/dogs/{}/advice-cards?adviceType=weekly", fx.dog_id);
    let (status, json) = send(&fx.app, get(&uri)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_failed");
    assert_eq!(json["violations"][0]["field"], "adviceType");
    assert_eq!(
        json["violations"][0]["message"],
        "Advice type must be one of: quick, plan_7_days."
    );
}

#[tokio::test]
async fn test_list_advice_cards_unknown_dog() {
    let fx = fixture();
    let uri = format!("/dogs/{}/advice-cards", Uuid::new_v4());
    let (status, _) = send(&fx.app, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_advice_card_then_list() {
    let fx = fixture();
    let uri = format!("/dogs/{}/advice-cards", fx.dog_id);
    let body = r#"{"categoryCode":"chewing","problemDescription":"Chews shoes","aiResponse":"Offer a chew toy.","adviceType":"plan_7_days","planContent":{"day1":"Swap shoes for a toy"}}"#;
    let (status, json) = send(&fx.app, post_json(&uri, body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["categoryCode"], "chewing");
    assert_eq!(json["adviceType"], "plan_7_days");
    assert_eq!(json["planContent"]["day1"], "Swap shoes for a toy");
    assert!(json["rating"].is_null());
    let id = json["id"].as_str().unwrap().to_string();

    let (_, json) = send(&fx.app, get(&format!("{uri}?adviceType=plan_7_days"))).await;
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&id.as_str()));
}

#[tokio::test]
async fn test_create_advice_card_reports_violations() {
    let fx = fixture();
    let uri = format!("/dogs/{}/advice-cards", fx.dog_id);
    let body = r#"{"categoryCode":"","aiResponse":"Ignore it.","adviceType":"plan_7_days"}"#;
    let (status, json) = send(&fx.app, post_json(&uri, body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_failed");
    assert_eq!(
        violation_fields(&json),
        vec!["categoryCode", "problemDescription", "planContent"]
    );
}

#[tokio::test]
async fn test_create_advice_card_unknown_category_or_dog() {
    let fx = fixture();
    let body = r#"{"categoryCode":"howling","problemDescription":"Howls","aiResponse":"Wait it out.","adviceType":"quick"}"#;

    let uri = format!("/dogs/{}/advice-cards", fx.dog_id);
    let (status, json) = send(&fx.app, post_json(&uri, body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("violations").is_none());

    let uri = format!("/dogs/{}/advice-cards", Uuid::new_v4());
    let (status, _) = send(&fx.app, post_json(&uri, body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
