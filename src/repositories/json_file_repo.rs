use std::path::{Path, PathBuf};
use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;
use crate::models::place::Place;

/// Reads and rewrites the whole places collection as one pretty-printed JSON array.
pub struct JsonFileRepo {
    path: PathBuf,
}

impl JsonFileRepo {
    pub fn new(
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            path: path.into()
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("places.json")
    }

    fn temp_prefix(&self) -> String {
        format!(".{}-", self.file_name())
    }

    /// Loads the collection, falling back to an empty one if the file is
    /// missing, unreadable, or not a valid places array.
    pub async fn load(&self) -> Vec<Place> {
        self.remove_stale_temp_files().await;

        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    "Could not load {}, starting with an empty list: {}",
                    self.path.display(),
                    e
                );
                return Vec::new();
            }
        };

        return match serde_json::from_slice::<Vec<Place>>(&content) {
            Ok(places) => {
                info!("Loaded {} places from {}", places.len(), self.path.display());
                places
            }
            Err(e) => {
                warn!(
                    "Error parsing {}, starting with an empty list: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        };
    }

    /// Writes to a sibling temp file, fsyncs it, and renames it over the
    /// target, so a crash mid-write never leaves a truncated places file behind.
    pub async fn save(
        &self,
        places: &[Place],
    ) -> anyhow::Result<()> {
        let content = serde_json::to_vec_pretty(places)
            .context("Failed to serialize places")?;

        let tmp_path = self
            .path
            .with_file_name(format!("{}{}.tmp", self.temp_prefix(), Uuid::new_v4()));

        if let Err(e) = write_synced(&tmp_path, &content).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e).with_context(|| format!("Failed to write {}", tmp_path.display()));
        }

        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e).with_context(|| format!("Failed to replace {}", self.path.display()));
        }

        Ok(())
    }

    /// Temp files left by a process that died between write and rename.
    async fn remove_stale_temp_files(&self) {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let prefix = self.temp_prefix();

        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(_) => return,
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(&prefix) && name.ends_with(".tmp") {
                match tokio::fs::remove_file(entry.path()).await {
                    Ok(()) => warn!("Removed stale temp file {}", entry.path().display()),
                    Err(e) => warn!("Could not remove stale temp file {}: {}", entry.path().display(), e),
                }
            }
        }
    }
}

async fn write_synced(
    path: &Path,
    content: &[u8],
) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(content).await?;
    file.sync_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_places() -> Vec<Place> {
        vec![
            Place {
                id: 1,
                name: "Aisha Bibi".to_string(),
                rating: 4.5,
                description: "Mausoleum".to_string(),
                photo_urls: vec!["https://img/aisha.jpg".to_string()],
                comments: vec!["Beautiful".to_string(), "Worth the trip".to_string()],
                latitude: 42.9,
                longitude: 71.3,
            },
            Place {
                id: 3,
                name: "Karakhan".to_string(),
                rating: 4.0,
                latitude: -12.5,
                longitude: -170.25,
                ..Default::default()
            },
        ]
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepo::new(dir.path().join("places.json"));
        let places = sample_places();

        repo.save(&places).await.unwrap();

        assert_eq!(repo.load().await, places);
    }

    #[tokio::test]
    async fn save_writes_pretty_array_and_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepo::new(dir.path().join("places.json"));

        repo.save(&sample_places()).await.unwrap();

        let written = std::fs::read_to_string(repo.path()).unwrap();
        assert!(written.starts_with("[\n"));
        assert!(written.contains("\"placeName\": \"Aisha Bibi\""));

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepo::new(dir.path().join("absent.json"));

        assert!(repo.load().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("places.json");
        std::fs::write(&path, "[{\"id\": 1, ").unwrap();

        assert!(JsonFileRepo::new(path).load().await.is_empty());
    }

    #[tokio::test]
    async fn save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepo::new(dir.path().join("nope").join("places.json"));

        assert!(repo.save(&sample_places()).await.is_err());
    }

    #[tokio::test]
    async fn load_sweeps_stale_temp_files_only() {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepo::new(dir.path().join("places.json"));
        repo.save(&sample_places()).await.unwrap();

        let stale = dir.path().join(".places.json-0b1e6d1c.tmp");
        let unrelated = dir.path().join(".other.json-0b1e6d1c.tmp");
        std::fs::write(&stale, "[").unwrap();
        std::fs::write(&unrelated, "[").unwrap();

        assert_eq!(repo.load().await, sample_places());
        assert!(!stale.exists());
        assert!(unrelated.exists());
    }

    #[tokio::test]
    async fn save_replaces_previous_contents() {
        let dir = tempdir().unwrap();
        let repo = JsonFileRepo::new(dir.path().join("places.json"));

        repo.save(&sample_places()).await.unwrap();
        repo.save(&sample_places()[1..]).await.unwrap();

        let loaded = repo.load().await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 3);
    }
}
