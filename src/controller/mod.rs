use std::sync::Arc;
use anyhow::Context;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;
use crate::config::Config;
use crate::helpers::handler_404::page_not_found_handler;
use crate::repositories::place_store::PlaceStore;

pub mod health_check;
pub mod places_controller;

#[derive(Clone)]
pub struct AppState {
    pub place_store: Arc<PlaceStore>,
}

pub async fn serve(
    app_state: AppState,
    config: &Config,
) -> anyhow::Result<()> {
    let application = application(app_state, config)?;

    let addr = config.socket_addr();
    info!("API server listening on: {}", addr);
    axum::Server::try_bind(&addr)
        .with_context(|| format!("Failed to bind API server to {}", addr))?
        .serve(application.into_make_service())
        .await
        .context("Error spinning up the API server")
}

pub fn application(
    app_state: AppState,
    config: &Config,
) -> anyhow::Result<Router> {
    let application = router_endpoints(app_state)
        .fallback(page_not_found_handler)
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(config)?)
                .layer(CompressionLayer::new())
        );

    Ok(application)
}

pub fn router_endpoints(app_state: AppState) -> Router {
    Router::new()
        .merge(health_check::router())
        .merge(places_controller::router(app_state))
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let allow_origin = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let origins = config
            .origin_urls
            .split(',')
            .map(|s| s.trim().parse::<HeaderValue>())
            .collect::<Result<Vec<HeaderValue>, _>>()
            .with_context(|| format!("Invalid origin in '{}'", config.origin_urls))?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS
        ])
        .allow_origin(allow_origin)
        .allow_headers([CONTENT_TYPE]))
}
