use crate::error::{Error, Result};
use crate::posts::Collection;
use crate::storage::{decode, encode, Storage};
use std::sync::Mutex;

/// In-memory stand-in for the file backend.
///
/// Holds the serialized document rather than a `Collection`, so loads and
/// saves cross the same JSON boundary (and fail the same way) as on disk.
#[derive(Debug)]
pub struct MemoryStorage {
    document: Mutex<Option<String>>,
}

impl MemoryStorage {
    /// Storage holding an empty collection (`[]`)
    pub fn empty() -> Self {
        Self::with_document("[]")
    }

    /// Storage with no document at all; every load fails
    pub fn missing() -> Self {
        MemoryStorage {
            document: Mutex::new(None),
        }
    }

    /// Storage holding the given raw document text
    pub fn with_document(document: impl Into<String>) -> Self {
        MemoryStorage {
            document: Mutex::new(Some(document.into())),
        }
    }

    /// Current raw document, if any
    pub fn document(&self) -> Result<Option<String>> {
        let document = self
            .document
            .lock()
            .map_err(|_| Error::StorageUnavailable("In-memory document lock poisoned".to_string()))?;
        Ok(document.clone())
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Collection> {
        let document = self
            .document
            .lock()
            .map_err(|_| Error::StorageUnavailable("In-memory document lock poisoned".to_string()))?;

        match document.as_deref() {
            Some(text) => decode(text),
            None => Err(Error::StorageUnavailable(
                "No in-memory document".to_string(),
            )),
        }
    }

    fn save(&self, posts: &Collection) -> Result<()> {
        let bytes = encode(posts)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| Error::MalformedDocument(format!("Serialized posts are not UTF-8: {}", e)))?;

        let mut document = self
            .document
            .lock()
            .map_err(|_| Error::StorageUnavailable("In-memory document lock poisoned".to_string()))?;
        *document = Some(text);
        Ok(())
    }
}
