use std::sync::Arc;
use axum::{Extension, Json, Router};
use axum::body::Bytes;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use crate::controller::AppState;
use crate::errors::{PlaceError, Result};
use crate::models::place::{CommentPayload, PhotoPayload, PlacePayload, RatePayload};
use crate::repositories::place_store::PlaceStore;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/places", get(get_places).post(create_place))
        .route(
            "/places/:id",
            get(get_place_by_id).put(update_place).delete(delete_place),
        )
        .route("/places/:id/rate", post(rate_place))
        .route("/places/:id/comment", post(add_comment))
        .route("/places/:id/photo", post(add_photo))
        .route_layer(Extension(app_state.place_store))
}

const INVALID_ID_FORMAT: &str = "Invalid ID format";
const INVALID_ID: &str = "Invalid ID";
const INVALID_PLACE_ID: &str = "Invalid place ID";
const INVALID_JSON: &str = "Invalid JSON";
const INVALID_JSON_BODY: &str = "Invalid JSON body";

fn parse_id(raw: &str, message: &'static str) -> Result<i64> {
    raw.parse::<i64>().map_err(|_| PlaceError::InvalidId(message))
}

// Bodies are decoded by hand so every malformed payload, whatever its
// content type, is answered with the same 400.
fn decode_json<T: DeserializeOwned>(body: &Bytes, message: &'static str) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| {
        debug!("Rejected request body: {}", source);
        PlaceError::InvalidJson { message, source }
    })
}

pub async fn get_places(
    Extension(place_store): Extension<Arc<PlaceStore>>,
) -> impl IntoResponse {
    Json(place_store.list_all().await)
}

pub async fn get_place_by_id(
    Extension(place_store): Extension<Arc<PlaceStore>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, INVALID_ID_FORMAT)?;
    let place = place_store.get_by_id(id).await?;

    Ok(Json(place))
}

pub async fn create_place(
    Extension(place_store): Extension<Arc<PlaceStore>>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let payload: PlacePayload = decode_json(&body, INVALID_JSON)?;
    let place = place_store.create(payload).await?;
    info!("Added place {} ({})", place.id, place.name);

    Ok((StatusCode::CREATED, "Place added"))
}

pub async fn update_place(
    Extension(place_store): Extension<Arc<PlaceStore>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, INVALID_ID)?;
    let payload: PlacePayload = decode_json(&body, INVALID_JSON)?;
    place_store.update(id, payload).await?;

    Ok((StatusCode::OK, "Place updated"))
}

pub async fn delete_place(
    Extension(place_store): Extension<Arc<PlaceStore>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    // A malformed id can never match a stored place.
    let id = id.parse::<i64>().map_err(|_| PlaceError::UnmatchedId(id))?;
    place_store.delete(id).await?;
    info!("Deleted place {}", id);

    Ok((StatusCode::OK, "Place deleted"))
}

pub async fn rate_place(
    Extension(place_store): Extension<Arc<PlaceStore>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, INVALID_PLACE_ID)?;
    let RatePayload { rating } = decode_json(&body, INVALID_JSON_BODY)?;
    place_store.set_rating(id, rating).await?;

    Ok((StatusCode::OK, "Rating updated"))
}

pub async fn add_comment(
    Extension(place_store): Extension<Arc<PlaceStore>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, INVALID_ID)?;
    let CommentPayload { text } = decode_json(&body, INVALID_JSON)?;
    place_store.append_comment(id, text).await?;

    Ok((StatusCode::OK, "Comment added"))
}

pub async fn add_photo(
    Extension(place_store): Extension<Arc<PlaceStore>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id, INVALID_PLACE_ID)?;
    let PhotoPayload { url } = decode_json(&body, INVALID_JSON_BODY)?;
    place_store.append_photo(id, url).await?;

    Ok((StatusCode::OK, "Photo added"))
}
