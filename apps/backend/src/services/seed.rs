//! Catalog seeding from JSON files

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::{SeedCatalog, SeedCounts};

/// Read `modules.json`, `exercises.json`, `flashcards.json` and
/// `mindmaps.json` from `dir`. Missing files count as empty.
pub fn read_seed_dir(dir: &Path) -> Result<SeedCatalog> {
    Ok(SeedCatalog {
        modules: read_array(&dir.join("modules.json"))?,
        exercises: read_array(&dir.join("exercises.json"))?,
        flashcards: read_array(&dir.join("flashcards.json"))?,
        mindmaps: read_array(&dir.join("mindmaps.json"))?,
    })
}

/// Seed the store from `dir` unless it already holds modules.
pub async fn seed_if_empty(db: &Database, dir: &Path) -> Result<Option<SeedCounts>> {
    if db.count_modules().await? > 0 {
        tracing::info!("Catalog already present, skipping seed");
        return Ok(None);
    }

    let seed = read_seed_dir(dir)?;
    let counts = db.seed_catalog(&seed).await?;
    tracing::info!(
        modules = counts.modules,
        exercises = counts.exercises,
        flashcards = counts.flashcards,
        mindmaps = counts.mindmaps,
        "Seeded catalog from {}",
        dir.display()
    );
    Ok(Some(counts))
}

fn read_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        tracing::warn!("Seed file {} not found, skipping", path.display());
        return Ok(Vec::new());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| ApiError::Internal(format!("failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| ApiError::BadRequest(format!("invalid seed file {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_files_are_empty() {
        let dir = TempDir::new().unwrap();
        let seed = read_seed_dir(dir.path()).unwrap();
        assert!(seed.modules.is_empty());
        assert!(seed.mindmaps.is_empty());
    }

    #[test]
    fn test_reads_modules_with_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("modules.json"),
            r#"[{"title": "Shell basics", "slug": "shell-basics", "category": "linux"},
                {"title": "Pipes", "slug": "pipes", "order_index": 7}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("exercises.json"),
            r#"[{"module_id": 1, "prompt": "List hidden files"}]"#,
        )
        .unwrap();

        let seed = read_seed_dir(dir.path()).unwrap();
        assert_eq!(seed.modules.len(), 2);
        assert_eq!(seed.modules[1].category, "");
        assert_eq!(seed.modules[1].order_index, Some(7));
        assert_eq!(seed.exercises[0].kind, "practice");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("mindmaps.json"), "{not json").unwrap();
        assert!(read_seed_dir(dir.path()).is_err());
    }
}
