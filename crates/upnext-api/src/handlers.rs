//! REST endpoint handlers for the catalog API.
//!
//! Every handler reads or writes through the store handles on the shared
//! [`AppState`]. Each store call carries the state's request deadline.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness check |
//! | `GET` | `/artists` | First 100 artists by name |
//! | `GET` | `/artists/{id}` | Single artist |
//! | `GET` | `/artists/{id}/events` | Upcoming or past events for an artist |
//! | `GET` | `/events` | First 100 events by start time |
//! | `GET` | `/events/{id}` | Single event |
//! | `GET` | `/lists` | All lists, system lists first |
//! | `POST` | `/lists` | Create a list |
//! | `GET` | `/lists/{id}` | Single list |
//! | `GET` | `/lists/{id}/items` | Items of a list, newest first |
//! | `POST` | `/lists/{id}/items` | Add an event to a list (first write wins) |

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::de::DeserializeOwned;
use upnext_db::NewListItem;
use upnext_types::{
    Ack, AddListItemRequest, ArtistId, CreateListRequest, CreatedList, EventId, ListId,
};

use crate::error::ApiError;
use crate::extract::{IdPath, WindowParam};
use crate::state::AppState;

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(body)?)
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Report that the process is up. Does not touch the store.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// Artists
// ---------------------------------------------------------------------------

/// List artists sorted by name.
pub async fn list_artists(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let artists = state.artists().list().await?;
    Ok(Json(artists))
}

/// Get a single artist by id.
pub async fn get_artist(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath<ArtistId>,
) -> Result<impl IntoResponse, ApiError> {
    let artist = state.artists().get(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(artist))
}

/// List an artist's upcoming events, or past events with `?past=true`.
///
/// The artist itself is not looked up; an unknown id yields `[]`.
pub async fn list_artist_events(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath<ArtistId>,
    WindowParam(window): WindowParam,
) -> Result<impl IntoResponse, ApiError> {
    let events = state.events().for_artist(id, window, Utc::now()).await?;
    Ok(Json(events))
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// List events by ascending start time.
pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let events = state.events().list().await?;
    Ok(Json(events))
}

/// Get a single event by id.
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath<EventId>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.events().get(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(event))
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

/// List every list, system lists first, then by name.
pub async fn list_lists(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let lists = state.lists().all().await?;
    Ok(Json(lists))
}

/// Create a user list. Answers `201` with the new id.
pub async fn create_list(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request: CreateListRequest = parse_body(&body)?;
    if request.name.is_empty() {
        return Err(ApiError::BadRequest(String::from("name is required")));
    }

    let id = state.lists().create(&request.name, Utc::now()).await?;
    tracing::info!(list = %id, name = %request.name, "List created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedList {
            id,
            name: request.name,
        }),
    ))
}

/// Get a single list by id.
pub async fn get_list(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath<ListId>,
) -> Result<impl IntoResponse, ApiError> {
    let list = state.lists().get(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(list))
}

/// List the items of a list, most recently added first.
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath<ListId>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state.lists().items(id).await?;
    Ok(Json(items))
}

/// Add an event to a list.
///
/// Answers `201 {"ok": true}` whether or not the event was already in the
/// list. An existing item keeps its first note, status and attended
/// time; there is no way to update them through this endpoint.
pub async fn add_list_item(
    State(state): State<Arc<AppState>>,
    IdPath(list): IdPath<ListId>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request: AddListItemRequest = parse_body(&body)?;
    if request.event_id.is_empty() {
        return Err(ApiError::BadRequest(String::from("eventId is required")));
    }

    let item = NewListItem {
        event_id: request.event_id.parse()?,
        status: request.status,
        note: request.note,
        attended_at: request.attended_at,
    };
    let outcome = state.lists().add_item(list, &item, Utc::now()).await?;
    if outcome.is_inserted() {
        tracing::info!(%list, event = %item.event_id, "List item added");
    }

    Ok((StatusCode::CREATED, Json(Ack::OK)))
}
