use serde::{Deserialize, Serialize};

/// A single blog post.
///
/// Invariants:
/// - `id` is assigned by the collection, never by the client
/// - `likes` never goes negative
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: u64,

    pub author: String,

    pub title: String,

    pub content: String,

    /// Older documents omit the counter entirely
    #[serde(default)]
    pub likes: u64,
}

impl Post {
    /// Create a post with no likes yet
    pub fn new(id: u64, author: String, title: String, content: String) -> Self {
        Post {
            id,
            author,
            title,
            content,
            likes: 0,
        }
    }

    /// Add one like, returning the new count
    pub fn like(&mut self) -> u64 {
        self.likes = self.likes.saturating_add(1);
        self.likes
    }
}
