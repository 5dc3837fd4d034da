use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, warn};

/// Request-scoped failures. None of these are fatal to the process.
#[derive(Debug, Error)]
pub enum PlaceError {
    #[error("{0}")]
    InvalidId(&'static str),

    #[error("{message}")]
    InvalidJson {
        message: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid latitude value")]
    InvalidLatitude,

    #[error("Invalid longitude value")]
    InvalidLongitude,

    #[error("Place not found")]
    NotFound(i64),

    /// A path id that is not a number, so it cannot name any place.
    #[error("Place not found")]
    UnmatchedId(String),

    #[error("No place ids left to assign")]
    IdsExhausted,

    #[error("Failed to save places, please try again")]
    Persistence(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PlaceError>;

impl PlaceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PlaceError::InvalidId(_)
            | PlaceError::InvalidJson { .. }
            | PlaceError::InvalidLatitude
            | PlaceError::InvalidLongitude => StatusCode::BAD_REQUEST,
            PlaceError::NotFound(_) | PlaceError::UnmatchedId(_) => StatusCode::NOT_FOUND,
            PlaceError::IdsExhausted | PlaceError::Persistence(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for PlaceError {
    fn into_response(self) -> Response {
        match &self {
            PlaceError::Persistence(e) => warn!("Failed to persist places due to: {:#}", e),
            PlaceError::IdsExhausted => warn!("Refusing to create place, id counter is exhausted"),
            PlaceError::NotFound(id) => debug!("No place with id {}", id),
            PlaceError::UnmatchedId(raw) => debug!("No place matches malformed id {:?}", raw),
            _ => {}
        }
        (self.status_code(), self.to_string()).into_response()
    }
}
