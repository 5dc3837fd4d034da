use std::sync::Arc;
use anyhow::anyhow;
use tokio::sync::RwLock;
use tracing::{info, warn};
use crate::errors::{PlaceError, Result};
use crate::models::place::{Place, PlacePayload};
use crate::repositories::json_file_repo::JsonFileRepo;

#[derive(Clone, Debug)]
struct PlaceCollection {
    places: Vec<Place>,
    /// `None` once the highest stored id is `i64::MAX`.
    next_id: Option<i64>,
}

impl PlaceCollection {
    fn new(places: Vec<Place>) -> Self {
        let highest = places.iter().map(|p| p.id).max().unwrap_or(0).max(0);
        let next_id = highest.checked_add(1);
        if next_id.is_none() {
            warn!("Stored places already use id {}, new places cannot be created", highest);
        }
        Self { places, next_id }
    }

    fn assign_id(&mut self) -> Result<i64> {
        let id = self.next_id.ok_or(PlaceError::IdsExhausted)?;
        self.next_id = id.checked_add(1);
        Ok(id)
    }

    fn find_mut(&mut self, id: i64) -> Result<&mut Place> {
        self.places
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PlaceError::NotFound(id))
    }
}

/// In-memory places collection backed by a JSON file.
///
/// Every mutation holds the write guard across the file rewrite, so mutations
/// are strictly serialized and each one is on disk before the next starts.
/// Mutations run against a copy that only replaces the live collection once
/// the save succeeds. The save and the swap run on their own task, so a
/// request dropped mid-write still either commits fully or not at all.
pub struct PlaceStore {
    repo: Arc<JsonFileRepo>,
    collection: Arc<RwLock<PlaceCollection>>,
}

impl PlaceStore {
    pub async fn open(
        repo: JsonFileRepo,
    ) -> Self {
        let places = repo.load().await;
        let collection = PlaceCollection::new(places);
        info!(
            "Place store backed by {} ready with {} places, next id {:?}",
            repo.path().display(),
            collection.places.len(),
            collection.next_id
        );

        Self {
            repo: Arc::new(repo),
            collection: Arc::new(RwLock::new(collection)),
        }
    }

    pub async fn list_all(&self) -> Vec<Place> {
        self.collection.read().await.places.clone()
    }

    pub async fn get_by_id(
        &self,
        id: i64,
    ) -> Result<Place> {
        self.collection
            .read()
            .await
            .places
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(PlaceError::NotFound(id))
    }

    pub async fn create(
        &self,
        payload: PlacePayload,
    ) -> Result<Place> {
        validate_coordinates(&payload)?;

        self.mutate(|collection| {
            let id = collection.assign_id()?;
            let place = Place::from_payload(id, payload);
            collection.places.push(place.clone());
            Ok(place)
        }).await
    }

    pub async fn update(
        &self,
        id: i64,
        payload: PlacePayload,
    ) -> Result<()> {
        validate_coordinates(&payload)?;

        self.mutate(|collection| {
            collection.find_mut(id)?.apply(payload);
            Ok(())
        }).await
    }

    pub async fn delete(
        &self,
        id: i64,
    ) -> Result<()> {
        self.mutate(|collection| {
            let index = collection
                .places
                .iter()
                .position(|p| p.id == id)
                .ok_or(PlaceError::NotFound(id))?;
            collection.places.remove(index);
            Ok(())
        }).await
    }

    pub async fn set_rating(
        &self,
        id: i64,
        rating: f64,
    ) -> Result<()> {
        self.mutate(|collection| {
            collection.find_mut(id)?.rating = rating;
            Ok(())
        }).await
    }

    pub async fn append_comment(
        &self,
        id: i64,
        text: String,
    ) -> Result<()> {
        self.mutate(|collection| {
            collection.find_mut(id)?.comments.push(text);
            Ok(())
        }).await
    }

    pub async fn append_photo(
        &self,
        id: i64,
        url: String,
    ) -> Result<()> {
        self.mutate(|collection| {
            collection.find_mut(id)?.photo_urls.push(url);
            Ok(())
        }).await
    }

    async fn mutate<T, F>(
        &self,
        apply: F,
    ) -> Result<T>
    where
        F: FnOnce(&mut PlaceCollection) -> Result<T>,
    {
        let mut collection = self.collection.clone().write_owned().await;
        let mut working = collection.clone();
        let output = apply(&mut working)?;

        let repo = self.repo.clone();
        let commit = tokio::spawn(async move {
            repo.save(&working.places).await?;
            *collection = working;
            Ok::<(), anyhow::Error>(())
        });

        return match commit.await {
            Ok(Ok(())) => Ok(output),
            Ok(Err(e)) => Err(PlaceError::Persistence(e)),
            Err(e) => Err(PlaceError::Persistence(anyhow!("Save task failed: {}", e))),
        };
    }
}

fn validate_coordinates(
    payload: &PlacePayload,
) -> Result<()> {
    if !payload.has_valid_latitude() {
        return Err(PlaceError::InvalidLatitude);
    }
    if !payload.has_valid_longitude() {
        return Err(PlaceError::InvalidLongitude);
    }
    Ok(())
}
