use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use tracing::debug;

pub async fn page_not_found_handler(uri: Uri) -> impl IntoResponse {
    debug!("No route for {}", uri);
    (StatusCode::NOT_FOUND, "Oops looks like you landed at the wrong endpoint")
}
