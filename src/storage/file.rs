use crate::config::Config;
use crate::error::{Error, Result};
use crate::posts::Collection;
use crate::storage::{decode, encode, Storage};
use log::debug;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File-based storage keeping the whole collection in one JSON document.
///
/// Files:
/// - `<data_file>`: the post array, pretty printed
/// - `.tmp*` next to it: one uniquely named scratch file per save, renamed
///   over `<data_file>` once written
///
/// Concurrent saves never share a scratch file; the last rename wins.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Create storage for the data file named in config
    pub fn new(config: &Config) -> Self {
        Self::with_path(config.get_data_file().clone())
    }

    /// Create storage for an explicit path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        JsonFileStorage { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the data file; `.` for bare file names
    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Create an empty document if none exists yet.
    ///
    /// Returns true if a document was created. An existing document is never
    /// touched.
    pub fn init(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        fs::create_dir_all(self.parent_dir())
            .map_err(|e| Error::StorageUnavailable(format!("Failed to create data directory: {}", e)))?;
        self.save(&Collection::new())?;
        Ok(true)
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Collection> {
        let document = fs::read_to_string(&self.path).map_err(|e| {
            Error::StorageUnavailable(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        let posts = decode(&document)?;
        debug!("Loaded {} posts from {}", posts.len(), self.path.display());
        Ok(posts)
    }

    fn save(&self, posts: &Collection) -> Result<()> {
        let bytes = encode(posts)?;

        // Same directory as the target so the rename stays on one filesystem
        let mut file = NamedTempFile::new_in(self.parent_dir())
            .map_err(|e| Error::StorageUnavailable(format!("Failed to create temp file: {}", e)))?;
        file.write_all(&bytes)
            .map_err(|e| Error::StorageUnavailable(format!("Failed to write posts: {}", e)))?;

        // Fsync before rename (crash safety)
        file.as_file()
            .sync_all()
            .map_err(|e| Error::StorageUnavailable(format!("Failed to fsync temp file: {}", e)))?;

        file.persist(&self.path).map_err(|e| {
            Error::StorageUnavailable(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;

        // Fsync parent directory so the rename itself is durable
        let parent = File::open(self.parent_dir())
            .map_err(|e| Error::StorageUnavailable(format!("Failed to open parent directory: {}", e)))?;
        parent
            .sync_all()
            .map_err(|e| Error::StorageUnavailable(format!("Failed to fsync parent directory: {}", e)))?;

        debug!("Saved {} posts to {}", posts.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (JsonFileStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::with_path(temp_dir.path().join("blog_posts.json"));
        (storage, temp_dir)
    }

    #[test]
    fn test_load_missing_file() {
        let (storage, _temp_dir) = create_test_storage();
        assert!(matches!(storage.load(), Err(Error::StorageUnavailable(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let (storage, _temp_dir) = create_test_storage();
        fs::write(storage.path(), "[{\"id\": \"one\"}]").unwrap();
        assert!(matches!(storage.load(), Err(Error::MalformedDocument(_))));
    }

    #[test]
    fn test_load_legacy_posts_without_likes() {
        let (storage, _temp_dir) = create_test_storage();
        fs::write(
            storage.path(),
            r#"[{"id": 1, "author": "A. Writer", "title": "Hello", "content": "Body text"},
               {"id": 3, "author": "B", "title": "Again", "content": "More", "likes": 3}]"#,
        )
        .unwrap();

        let posts = storage.load().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts.find_by_id(1).unwrap().likes, 0);
        assert_eq!(posts.find_by_id(3).unwrap().likes, 3);
        assert_eq!(posts.next_id().unwrap(), 4);
    }

    #[test]
    fn test_save_and_load() {
        let (storage, temp_dir) = create_test_storage();
        let mut posts = Collection::new();
        posts.insert("alice".into(), "First".into(), "Hello".into()).unwrap();
        posts.insert("bob".into(), "Second".into(), "World".into()).unwrap();
        posts.increment_like(2);

        storage.save(&posts).unwrap();

        assert_eq!(storage.load().unwrap(), posts);
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_writes_indented_array() {
        let (storage, _temp_dir) = create_test_storage();
        let mut posts = Collection::new();
        posts.insert("alice".into(), "First".into(), "Hello".into()).unwrap();

        storage.save(&posts).unwrap();

        let text = fs::read_to_string(storage.path()).unwrap();
        assert!(text.starts_with("[\n    {\n        \"id\": 1,"));
    }

    #[test]
    fn test_save_overwrites_previous_document() {
        let (storage, _temp_dir) = create_test_storage();
        let mut posts = Collection::new();
        posts.insert("a".into(), "t".into(), "c".into()).unwrap();
        posts.insert("a".into(), "t".into(), "c".into()).unwrap();
        storage.save(&posts).unwrap();

        posts.delete(1);
        storage.save(&posts).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.find_by_id(1).is_none());
    }

    #[test]
    fn test_init_creates_empty_document_once() {
        let temp_dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::with_path(temp_dir.path().join("data").join("posts.json"));

        assert!(storage.init().unwrap());
        assert!(storage.load().unwrap().is_empty());

        let mut posts = Collection::new();
        posts.insert("a".into(), "t".into(), "c".into()).unwrap();
        storage.save(&posts).unwrap();

        assert!(!storage.init().unwrap());
        assert_eq!(storage.load().unwrap().len(), 1);
    }

    #[test]
    fn test_concurrent_saves_all_succeed() {
        let (storage, temp_dir) = create_test_storage();
        let mut posts = Collection::new();
        posts.insert("a".into(), "t".into(), "c".into()).unwrap();

        let failures: usize = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        (0..50)
                            .filter(|_| storage.save(&posts).is_err())
                            .count()
                    })
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).sum()
        });

        assert_eq!(failures, 0);
        assert_eq!(storage.load().unwrap(), posts);
        // Only the data file remains; no scratch files left behind
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }
}
