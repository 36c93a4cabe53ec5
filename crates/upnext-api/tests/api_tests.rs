//! Integration tests for the catalog API endpoints.
//!
//! Tests drive the full app (path normalization, CORS, routing, handlers)
//! via `tower::ServiceExt` against an [`InMemoryStore`], without starting
//! a TCP server or a database.

#![allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use bson::oid::ObjectId;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;
use upnext_api::{build_app, ensure_system_lists, App, AppState};
use upnext_db::{
    Collection, DbError, DocumentStore, FindQuery, InMemoryStore, InsertOnlyUpsert,
    UpsertOutcome,
};

// =========================================================================
// Helpers
// =========================================================================

fn make_app() -> (Arc<InMemoryStore>, App) {
    let store = Arc::new(InMemoryStore::new());
    let state = Arc::new(AppState::new(store.clone()));
    (store, build_app(state))
}

async fn send(app: &App, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::get(path).body(Body::empty()).unwrap()
}

fn post_json(path: &str, body: &str) -> Request<Body> {
    Request::post(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

async fn body_bytes(response: Response) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

async fn body_to_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn bson_date(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_chrono(at)
}

fn starts_at(event: &Value) -> DateTime<Utc> {
    event["startsAt"]
        .as_str()
        .unwrap()
        .parse::<DateTime<Utc>>()
        .unwrap()
}

fn object_keys(value: &Value) -> Vec<&str> {
    let mut keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    keys
}

/// A store whose every operation outlives any reasonable deadline.
struct SlowStore;

impl SlowStore {
    async fn stall() {
        tokio::time::sleep(Duration::from_secs(30)).await;
    }
}

#[async_trait]
impl DocumentStore for SlowStore {
    async fn find(&self, _collection: Collection, _query: &FindQuery) -> Result<Vec<Document>, DbError> {
        Self::stall().await;
        Ok(Vec::new())
    }

    async fn find_one(
        &self,
        _collection: Collection,
        _query: &FindQuery,
    ) -> Result<Option<Document>, DbError> {
        Self::stall().await;
        Ok(None)
    }

    async fn insert_one(&self, _collection: Collection, _document: Document) -> Result<ObjectId, DbError> {
        Self::stall().await;
        Ok(ObjectId::new())
    }

    async fn upsert_on_insert(
        &self,
        _collection: Collection,
        _upsert: &InsertOnlyUpsert,
    ) -> Result<UpsertOutcome, DbError> {
        Self::stall().await;
        Ok(UpsertOutcome::Existing)
    }
}

// =========================================================================
// Health
// =========================================================================

#[tokio::test]
async fn test_health() {
    let (_, app) = make_app();

    let response = send(&app, get("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response).await, serde_json::json!({ "status": "ok" }));
}

// =========================================================================
// Artists
// =========================================================================

#[tokio::test]
async fn test_list_artists_capped_and_sorted() {
    let (store, app) = make_app();
    // Names inserted out of order: 37 is coprime with 120.
    let artists = (0..120_u32).map(|i| {
        doc! {
            "name": format!("Artist {:03}", (i * 37) % 120),
            "genre": "rock",
        }
    });
    store.seed(Collection::Artists, artists).await;

    let response = send(&app, get("/artists")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response).await;
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 100);
    let names: Vec<&str> = list.iter().map(|a| a["name"].as_str().unwrap()).collect();
    assert!(names.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(names[0], "Artist 000");
    assert_eq!(names[99], "Artist 099");
    // Projection drops everything but id and name (no synopsis stored).
    assert_eq!(object_keys(&list[0]), vec!["id", "name"]);
}

#[tokio::test]
async fn test_list_artists_empty_is_array() {
    let (_, app) = make_app();

    let response = send(&app, get("/artists")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn test_get_artist_projects_name_and_synopsis() {
    let (store, app) = make_app();
    let ids = store
        .seed(
            Collection::Artists,
            [doc! {
                "name": "Khruangbin",
                "synopsis": { "text": "Trio from Houston.", "source": "wiki" },
                "images": ["a.jpg"],
            }],
        )
        .await;
    let id = ids[0].to_hex();

    let response = send(&app, get(&format!("/artists/{id}"))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response).await;
    assert_eq!(object_keys(&json), vec!["id", "name", "synopsis"]);
    assert_eq!(json["id"], id.as_str());
    assert_eq!(json["name"], "Khruangbin");
    assert_eq!(json["synopsis"], serde_json::json!({ "text": "Trio from Houston." }));
}

#[tokio::test]
async fn test_get_artist_not_found_has_empty_body() {
    let (_, app) = make_app();

    let response = send(&app, get(&format!("/artists/{}", ObjectId::new().to_hex()))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_get_artist_invalid_id_is_bad_request() {
    let (_, app) = make_app();

    let response = send(&app, get("/artists/not-an-object-id")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("not-an-object-id"));
}

async fn seed_artist_events(store: &InMemoryStore, artist: ObjectId) {
    let now = Utc::now();
    let other = ObjectId::new();
    let events = [
        ("Two days ago", now - chrono::Duration::days(2), vec![artist]),
        ("Yesterday", now - chrono::Duration::days(1), vec![artist, other]),
        ("Tomorrow", now + chrono::Duration::days(1), vec![artist]),
        ("In two days", now + chrono::Duration::days(2), vec![other, artist]),
        ("Someone else", now + chrono::Duration::days(1), vec![other]),
    ];
    store
        .seed(
            Collection::Events,
            events.into_iter().map(|(title, at, artists)| {
                doc! { "title": title, "startsAt": bson_date(at), "artists": artists }
            }),
        )
        .await;
}

fn titles(json: &Value) -> Vec<&str> {
    json.as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_artist_events_upcoming_by_default() {
    let (store, app) = make_app();
    let artist = ObjectId::new();
    seed_artist_events(&store, artist).await;

    let response = send(&app, get(&format!("/artists/{}/events", artist.to_hex()))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response).await;
    assert_eq!(titles(&json), vec!["Tomorrow", "In two days"]);
    // Only the event projection reaches the client.
    assert_eq!(object_keys(&json[0]), vec!["id", "startsAt", "title"]);
}

#[tokio::test]
async fn test_artist_events_past_is_descending() {
    let (store, app) = make_app();
    let artist = ObjectId::new();
    seed_artist_events(&store, artist).await;

    let response = send(
        &app,
        get(&format!("/artists/{}/events?past=true", artist.to_hex())),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response).await;
    assert_eq!(titles(&json), vec!["Yesterday", "Two days ago"]);
    assert!(json
        .as_array()
        .unwrap()
        .iter()
        .all(|e| starts_at(e) < Utc::now()));
}

#[tokio::test]
async fn test_artist_events_other_past_values_mean_upcoming() {
    let (store, app) = make_app();
    let artist = ObjectId::new();
    seed_artist_events(&store, artist).await;

    for query in ["past=false", "past=TRUE", "past=1", "past="] {
        let path = format!("/artists/{}/events?{query}", artist.to_hex());
        let json = body_to_json(send(&app, get(&path)).await).await;
        assert_eq!(titles(&json), vec!["Tomorrow", "In two days"], "query {query}");
    }
}

#[tokio::test]
async fn test_artist_events_unknown_artist_is_empty_array() {
    let (_, app) = make_app();

    let path = format!("/artists/{}/events", ObjectId::new().to_hex());
    let response = send(&app, get(&path)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn test_artist_events_first_past_value_wins() {
    let (store, app) = make_app();
    let artist = ObjectId::new();
    seed_artist_events(&store, artist).await;

    let path = format!("/artists/{}/events?past=true&past=true", artist.to_hex());
    let response = send(&app, get(&path)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(titles(&body_to_json(response).await), vec!["Yesterday", "Two days ago"]);

    let path = format!("/artists/{}/events?past=false&past=true", artist.to_hex());
    let json = body_to_json(send(&app, get(&path)).await).await;
    assert_eq!(titles(&json), vec!["Tomorrow", "In two days"]);
}

#[tokio::test]
async fn test_undecodable_path_id_is_json_bad_request() {
    let (_, app) = make_app();

    for request in [
        get("/artists/%FF"),
        get("/artists/%FF/events"),
        get("/events/%FF"),
        get("/lists/%FF/items"),
        post_json("/lists/%FF/items", r#"{"eventId":"65a1b2c3d4e5f60718293a4b"}"#),
    ] {
        let uri = request.uri().clone();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_to_json(response).await;
        assert!(json["error"].is_string(), "{uri}: {json}");
    }
}

// =========================================================================
// Events
// =========================================================================

#[tokio::test]
async fn test_list_events_capped_and_sorted() {
    let (store, app) = make_app();
    let base = Utc::now();
    let events = (0..130_i64).map(|i| {
        doc! {
            "title": format!("Show {i}"),
            "startsAt": bson_date(base + chrono::Duration::hours((i * 53) % 130)),
            "tourName": "World Tour",
            "venue": "Somewhere",
        }
    });
    store.seed(Collection::Events, events).await;

    let response = send(&app, get("/events")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response).await;
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 100);
    let times: Vec<DateTime<Utc>> = list.iter().map(starts_at).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(object_keys(&list[0]), vec!["id", "startsAt", "title", "tourName"]);
}

#[tokio::test]
async fn test_get_event_and_not_found() {
    let (store, app) = make_app();
    let at = Utc::now();
    let ids = store
        .seed(
            Collection::Events,
            [doc! { "title": "Currents", "startsAt": bson_date(at), "tourName": null }],
        )
        .await;

    let response = send(&app, get(&format!("/events/{}", ids[0].to_hex()))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response).await;
    assert_eq!(json["title"], "Currents");
    assert!(json.get("tourName").is_none());

    let response = send(&app, get(&format!("/events/{}", ObjectId::new().to_hex()))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(response).await.is_empty());
}

// =========================================================================
// Lists
// =========================================================================

#[tokio::test]
async fn test_create_list_then_listed_after_system_list() {
    let store = Arc::new(InMemoryStore::new());
    let state = Arc::new(AppState::new(store.clone()));
    ensure_system_lists(&state).await.unwrap();
    let app = build_app(state);

    for name in ["Zydeco Nights", "Aardvark Fest"] {
        let response = send(&app, post_json("/lists", &format!(r#"{{"name":"{name}"}}"#))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send(&app, post_json("/lists", r#"{"name":"Favorites"}"#)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_to_json(response).await;
    assert_eq!(object_keys(&created), vec!["id", "name"]);
    assert_eq!(created["name"], "Favorites");
    let id = created["id"].as_str().unwrap().to_owned();
    assert_eq!(id.len(), 24);

    let json = body_to_json(send(&app, get("/lists")).await).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Attended", "Aardvark Fest", "Favorites", "Zydeco Nights"]);
    assert_eq!(json[2]["id"], id.as_str());
    assert_eq!(json[0]["isSystem"], true);
    assert_eq!(json[0]["key"], "attended");
    assert!(json[2].get("isSystem").is_none());

    let response = send(&app, get(&format!("/lists/{id}"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_to_json(response).await;
    assert_eq!(list["name"], "Favorites");
    assert!(list["createdAt"].is_string());
    assert_eq!(list["createdAt"], list["updatedAt"]);
}

#[tokio::test]
async fn test_create_list_rejects_empty_or_malformed_body() {
    let (store, app) = make_app();

    for body in [r#"{"name":""}"#, "{}", "not json", r#"{"name":42}"#, ""] {
        let response = send(&app, post_json("/lists", body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body:?}");
        let json = body_to_json(response).await;
        assert!(json["error"].is_string());
    }

    assert!(store.documents(Collection::Lists).await.is_empty());
}

#[tokio::test]
async fn test_lists_empty_is_array_and_unknown_list_is_not_found() {
    let (_, app) = make_app();

    let json = body_to_json(send(&app, get("/lists")).await).await;
    assert_eq!(json, serde_json::json!([]));

    let response = send(&app, get(&format!("/lists/{}", ObjectId::new().to_hex()))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_add_item_twice_keeps_first_note() {
    // An existing item cannot be edited through this endpoint: the second
    // submission succeeds but changes nothing.
    let (store, app) = make_app();
    let list = ObjectId::new().to_hex();
    let event = ObjectId::new().to_hex();
    let path = format!("/lists/{list}/items");

    let first = format!(
        r#"{{"eventId":"{event}","status":"attended","note":"front row","attendedAt":"2025-05-01T20:00:00Z"}}"#
    );
    let second = format!(r#"{{"eventId":"{event}","status":"saved","note":"balcony"}}"#);

    for body in [&first, &second] {
        let response = send(&app, post_json(&path, body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_to_json(response).await, serde_json::json!({ "ok": true }));
    }

    assert_eq!(store.documents(Collection::ListItems).await.len(), 1);

    let json = body_to_json(send(&app, get(&path)).await).await;
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["note"], "front row");
    assert_eq!(items[0]["status"], "attended");
    assert_eq!(items[0]["listId"], list.as_str());
    assert_eq!(items[0]["eventId"], event.as_str());
    assert_eq!(
        items[0]["attendedAt"].as_str().unwrap().parse::<DateTime<Utc>>().ok(),
        "2025-05-01T20:00:00Z".parse::<DateTime<Utc>>().ok()
    );
}

#[tokio::test]
async fn test_list_items_newest_first() {
    let (_, app) = make_app();
    let list = ObjectId::new().to_hex();
    let path = format!("/lists/{list}/items");
    let events: Vec<String> = (0..3).map(|_| ObjectId::new().to_hex()).collect();

    for event in &events {
        let response = send(&app, post_json(&path, &format!(r#"{{"eventId":"{event}"}}"#))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        // Distinct addedAt timestamps at millisecond precision.
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let json = body_to_json(send(&app, get(&path)).await).await;
    let order: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["eventId"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec![events[2].as_str(), events[1].as_str(), events[0].as_str()]);
    // Items added without optional fields omit them.
    assert_eq!(
        object_keys(&json[0]),
        vec!["addedAt", "eventId", "id", "listId"]
    );
}

#[tokio::test]
async fn test_add_item_rejects_bad_input() {
    let (store, app) = make_app();
    let path = format!("/lists/{}/items", ObjectId::new().to_hex());
    let event = ObjectId::new().to_hex();

    let bodies = [
        String::from("{}"),
        String::from(r#"{"eventId":""}"#),
        String::from(r#"{"eventId":"xyz"}"#),
        format!(r#"{{"eventId":"{event}","status":"maybe"}}"#),
        format!(r#"{{"eventId":"{event}","attendedAt":"yesterday"}}"#),
        String::from("["),
    ];
    for body in &bodies {
        let response = send(&app, post_json(&path, body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
        assert!(body_to_json(response).await["error"].is_string());
    }

    let response = send(&app, post_json("/lists/nope/items", &format!(r#"{{"eventId":"{event}"}}"#))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(store.documents(Collection::ListItems).await.is_empty());
}

#[tokio::test]
async fn test_items_of_unknown_list_is_empty_array() {
    let (_, app) = make_app();

    let path = format!("/lists/{}/items", ObjectId::new().to_hex());
    let response = send(&app, get(&path)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response).await, serde_json::json!([]));
}

// =========================================================================
// Routing, normalization, CORS
// =========================================================================

#[tokio::test]
async fn test_unknown_suffix_is_not_found() {
    let (_, app) = make_app();
    let id = ObjectId::new().to_hex();

    for path in [
        format!("/artists/{id}/unknown"),
        format!("/lists/{id}/items/extra"),
        String::from("/nowhere"),
        String::from("/"),
    ] {
        let response = send(&app, get(&path)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "path {path}");
        assert!(body_bytes(response).await.is_empty());
    }
}

#[tokio::test]
async fn test_wrong_method_is_method_not_allowed() {
    let (_, app) = make_app();
    let id = ObjectId::new().to_hex();

    let requests = [
        (Method::POST, format!("/artists/{id}")),
        (Method::DELETE, String::from("/lists")),
        (Method::PUT, format!("/lists/{id}/items")),
        (Method::POST, String::from("/health")),
    ];
    for (method, path) in requests {
        let request = Request::builder()
            .method(method.clone())
            .uri(&path)
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method} {path}");
        assert!(body_bytes(response).await.is_empty());
    }
}

#[tokio::test]
async fn test_route_shape_is_matched_before_id_is_parsed() {
    let (_, app) = make_app();

    let response = send(&app, get("/artists/zzz/unknown")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = Request::post("/artists/zzz").body(Body::empty()).unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = send(&app, get("/artists/zzz")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_paths_are_normalized_before_routing() {
    let (store, app) = make_app();
    let ids = store
        .seed(Collection::Lists, [doc! { "name": "Road trip" }])
        .await;
    let id = ids[0].to_hex();

    for path in [
        String::from("//lists/"),
        String::from("/lists//"),
        format!("/lists//{id}/"),
        format!("//lists/{id}//items"),
        String::from("/health/"),
    ] {
        let response = send(&app, get(&path)).await;
        assert_eq!(response.status(), StatusCode::OK, "path {path}");
    }
}

#[tokio::test]
async fn test_options_always_no_content() {
    let (_, app) = make_app();

    for path in ["/lists", "/artists/abc", "/nowhere"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT, "path {path}");
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        assert!(body_bytes(response).await.is_empty());
    }
}

#[tokio::test]
async fn test_preflight_advertises_methods_and_headers() {
    let (_, app) = make_app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/lists")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    assert!(methods.contains("GET") && methods.contains("POST") && methods.contains("OPTIONS"));
    let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS].to_str().unwrap();
    assert!(allowed.eq_ignore_ascii_case("content-type"));
}

#[tokio::test]
async fn test_regular_responses_carry_cors_origin() {
    let (_, app) = make_app();

    let request = Request::get("/health")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

// =========================================================================
// Store failures and bootstrap
// =========================================================================

#[tokio::test]
async fn test_store_timeout_is_internal_error() {
    let state = Arc::new(
        AppState::new(Arc::new(SlowStore)).with_request_timeout(Duration::from_millis(20)),
    );
    let app = build_app(state);

    let requests = [
        get("/artists"),
        get(&format!("/events/{}", ObjectId::new().to_hex())),
        post_json("/lists", r#"{"name":"Favorites"}"#),
        post_json(
            &format!("/lists/{}/items", ObjectId::new().to_hex()),
            &format!(r#"{{"eventId":"{}"}}"#, ObjectId::new().to_hex()),
        ),
    ];
    for request in requests {
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_to_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("timed out"));
    }
}

#[tokio::test]
async fn test_health_does_not_touch_store() {
    let state = Arc::new(
        AppState::new(Arc::new(SlowStore)).with_request_timeout(Duration::from_millis(20)),
    );
    let app = build_app(state);

    let response = send(&app, get("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_bootstrap_is_idempotent() {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(store.clone());

    let first = ensure_system_lists(&state).await.unwrap();
    let second = ensure_system_lists(&state).await.unwrap();
    upnext_api::bootstrap(&state).await;

    assert!(first.is_inserted());
    assert_eq!(second, UpsertOutcome::Existing);
    let lists = store.documents(Collection::Lists).await;
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].get_str("key").ok(), Some("attended"));
    assert_eq!(lists[0].get_str("name").ok(), Some("Attended"));
    assert_eq!(lists[0].get_bool("isSystem").ok(), Some(true));
}

#[tokio::test]
async fn test_bootstrap_failure_is_not_fatal() {
    let state =
        AppState::new(Arc::new(SlowStore)).with_request_timeout(Duration::from_millis(20));

    let result = ensure_system_lists(&state).await;
    assert!(matches!(result, Err(DbError::Timeout(_))));

    // Logs and returns instead of propagating.
    upnext_api::bootstrap(&state).await;
}
