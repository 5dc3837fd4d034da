use std::sync::Arc;
use clap::Parser;
use dotenv::dotenv;
use crate::config::Config;
use crate::controller::AppState;
use crate::repositories::json_file_repo::JsonFileRepo;
use crate::repositories::place_store::PlaceStore;

pub mod config;
pub mod controller;
pub mod errors;
pub mod helpers;
pub mod models;
pub mod repositories;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();

    let place_store = PlaceStore::open(
        JsonFileRepo::new(config.places_file.clone())
    ).await;

    let app_state = AppState {
        place_store: Arc::new(place_store),
    };

    controller::serve(app_state, &config).await
}
