//! File-based fallback storage.
//!
//! When the ledger database is unreachable the pipeline still persists each
//! validated record as a standalone JSON file so no discovery is lost.

use crate::error::Result;
use crate::schema::Discovery;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Writes discovery records as timestamped JSON files.
pub struct FallbackStore {
    dir: PathBuf,
}

impl FallbackStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Persist a single record. Creates the directory on first use.
    pub fn save(&self, discovery: &Discovery) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;

        let filename = format!(
            "discovery_{}_{}.json",
            discovery.discovered_at.format("%Y%m%d_%H%M%S"),
            discovery.id.simple()
        );
        let path = self.dir.join(filename);

        let json = serde_json::to_string_pretty(discovery)?;
        std::fs::write(&path, json)?;

        warn!(path = %path.display(), "stored discovery to fallback file");
        Ok(path)
    }

    /// Load every record previously written to the fallback directory.
    /// Unreadable files are skipped with a warning.
    pub fn load_all(&self) -> Result<Vec<Discovery>> {
        let mut discoveries = Vec::new();

        if !self.dir.exists() {
            return Ok(discoveries);
        }

        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let contents = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<Discovery>(&contents) {
                Ok(discovery) => discoveries.push(discovery),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable fallback file");
                }
            }
        }

        Ok(discoveries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Discovery {
        Discovery::new("MKVLAWFHDERTGYNQCSPI".to_string(), 0.82)
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FallbackStore::new(dir.path());

        let discovery = sample();
        let path = store.save(&discovery).unwrap();
        assert!(path.exists());

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, discovery.id);
        assert_eq!(loaded[0].sequence, discovery.sequence);
    }

    #[test]
    fn test_load_all_skips_non_json_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FallbackStore::new(dir.path());

        store.save(&sample()).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a record").unwrap();
        std::fs::write(dir.path().join("broken.json"), "{").unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_load_all_on_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FallbackStore::new(dir.path().join("never_created"));
        assert!(store.load_all().unwrap().is_empty());
    }
}
