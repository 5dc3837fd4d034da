use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

pub fn router() -> Router {
    Router::new().route("/health", get(get_health_check))
}

/// Liveness probe for the hosting platform, never touches the store.
async fn get_health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
