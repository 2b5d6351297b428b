pub mod file;
pub mod memory;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

use crate::error::{Error, Result};
use crate::posts::Collection;
use serde::Serialize;

/// Storage abstraction for the post collection, kept as one document.
///
/// Implementations must preserve:
/// - Whole-document reads: `load` re-reads every time, nothing is cached
/// - Whole-document writes: `save` replaces the previous document entirely
/// - No silent defaults: a missing document is an error, not an empty list
pub trait Storage {
    /// Load and parse the full collection
    ///
    /// Fails with `StorageUnavailable` when the document cannot be read and
    /// `MalformedDocument` when it does not parse.
    fn load(&self) -> Result<Collection>;

    /// Serialize and replace the full collection
    fn save(&self, posts: &Collection) -> Result<()>;
}

/// Parse a stored document into a collection
pub(crate) fn decode(document: &str) -> Result<Collection> {
    serde_json::from_str(document)
        .map_err(|e| Error::MalformedDocument(format!("Failed to parse posts: {}", e)))
}

/// Render a collection as pretty JSON with 4-space indentation
pub(crate) fn encode(posts: &Collection) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    posts
        .serialize(&mut serializer)
        .map_err(|e| Error::MalformedDocument(format!("Failed to serialize posts: {}", e)))?;
    Ok(buf)
}
