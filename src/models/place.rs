use serde::{Deserialize, Deserializer, Serialize};

pub const MAX_LATITUDE: f64 = 90.0;
pub const MAX_LONGITUDE: f64 = 180.0;

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Place {
    pub id: i64,
    #[serde(rename = "placeName")]
    pub name: String,
    pub rating: f64,
    pub description: String,
    #[serde(rename = "photoURLs", deserialize_with = "null_as_empty")]
    pub photo_urls: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub comments: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Place {
    pub fn from_payload(id: i64, payload: PlacePayload) -> Self {
        Self {
            id,
            name: payload.name,
            rating: payload.rating,
            description: payload.description,
            photo_urls: payload.photo_urls,
            comments: payload.comments,
            latitude: payload.latitude,
            longitude: payload.longitude,
        }
    }

    /// Overwrites every mutable field, keeping the id.
    pub fn apply(&mut self, payload: PlacePayload) {
        self.name = payload.name;
        self.rating = payload.rating;
        self.description = payload.description;
        self.photo_urls = payload.photo_urls;
        self.comments = payload.comments;
        self.latitude = payload.latitude;
        self.longitude = payload.longitude;
    }
}

/// Body of create and full update. Any `id` sent by the client is ignored.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct PlacePayload {
    #[serde(rename = "placeName")]
    pub name: String,
    pub rating: f64,
    pub description: String,
    #[serde(rename = "photoURLs", deserialize_with = "null_as_empty")]
    pub photo_urls: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub comments: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
}

// Older places files carry `null` for lists that were never appended to.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl PlacePayload {
    pub fn has_valid_latitude(&self) -> bool {
        (-MAX_LATITUDE..=MAX_LATITUDE).contains(&self.latitude)
    }

    pub fn has_valid_longitude(&self) -> bool {
        (-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&self.longitude)
    }
}

// A body missing its field still decodes: `{}` rates 0.0 or appends "".
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct RatePayload {
    pub rating: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct CommentPayload {
    pub text: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct PhotoPayload {
    pub url: String,
}
