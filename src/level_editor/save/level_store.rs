//! Level Store
//!
//! Persistence transport for level documents. The editor only ever hands a store a
//! document and a level id; `FileLevelStore` keeps them as `<dir>/<level_id>.json`.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::level_format::LevelDocument;

#[derive(Debug, Error)]
pub enum LevelStoreError {
    #[error("level io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("level document error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("level '{0}' not found")]
    NotFound(String),

    #[error("invalid level id '{0}'")]
    InvalidLevelId(String),
}

pub trait LevelStore {
    fn save(&self, level_id: &str, document: &LevelDocument) -> Result<(), LevelStoreError>;

    fn load(&self, level_id: &str) -> Result<LevelDocument, LevelStoreError>;

    /// Ids of every stored level, sorted
    fn list(&self) -> Result<Vec<String>, LevelStoreError>;
}

pub struct FileLevelStore {
    dir: PathBuf,
}

impl FileLevelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn level_path(&self, level_id: &str) -> Result<PathBuf, LevelStoreError> {
        let valid = !level_id.is_empty()
            && level_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(LevelStoreError::InvalidLevelId(level_id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", level_id)))
    }
}

impl LevelStore for FileLevelStore {
    fn save(&self, level_id: &str, document: &LevelDocument) -> Result<(), LevelStoreError> {
        let path = self.level_path(level_id)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, document.to_json()?)?;

        log::info!(
            "[LevelStore] Saved '{}' ({} objects) to {}",
            level_id,
            document.objects.len(),
            path.display()
        );
        Ok(())
    }

    fn load(&self, level_id: &str) -> Result<LevelDocument, LevelStoreError> {
        let path = self.level_path(level_id)?;
        if !path.exists() {
            return Err(LevelStoreError::NotFound(level_id.to_string()));
        }

        let json = fs::read_to_string(&path)?;
        let document = LevelDocument::from_json(&json)?;
        log::info!("[LevelStore] Loaded '{}' from {}", level_id, path.display());
        Ok(document)
    }

    fn list(&self) -> Result<Vec<String>, LevelStoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level_editor::save::level_format::{GameSettings, WinCondition};

    fn document(name: &str) -> LevelDocument {
        let settings = GameSettings {
            name: name.to_string(),
            win_condition: WinCondition::CollectAllCoins,
            time_limit: 120,
            ..Default::default()
        };
        LevelDocument::new(settings, Vec::new())
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLevelStore::new(dir.path().join("levels"));

        store.save("level_1", &document("Coin Rush")).unwrap();
        let loaded = store.load("level_1").unwrap();
        assert_eq!(loaded, document("Coin Rush"));
        assert!(dir.path().join("levels").join("level_1.json").exists());
    }

    #[test]
    fn test_load_missing_level() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLevelStore::new(dir.path());
        assert!(matches!(
            store.load("nope"),
            Err(LevelStoreError::NotFound(id)) if id == "nope"
        ));
    }

    #[test]
    fn test_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLevelStore::new(dir.path());
        assert!(matches!(
            store.save("../escape", &document("x")),
            Err(LevelStoreError::InvalidLevelId(_))
        ));
        assert!(matches!(
            store.load(""),
            Err(LevelStoreError::InvalidLevelId(_))
        ));
    }

    #[test]
    fn test_list_sorted_json_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLevelStore::new(dir.path());
        assert!(store.list().unwrap().is_empty());

        store.save("beta", &document("b")).unwrap();
        store.save("alpha", &document("a")).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        assert_eq!(store.list().unwrap(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_corrupt_document_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLevelStore::new(dir.path());
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        assert!(matches!(store.load("broken"), Err(LevelStoreError::Json(_))));
    }
}
