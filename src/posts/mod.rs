pub mod post;

pub use post::Post;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// The full, ordered set of posts as stored in one document.
///
/// Order is insertion order; lookups always go by id through a linear scan.
/// Ids are pairwise distinct as long as every post enters through `insert`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Collection {
    posts: Vec<Post>,
}

impl Collection {
    /// Create an empty collection
    pub fn new() -> Self {
        Collection { posts: Vec::new() }
    }

    pub fn from_posts(posts: Vec<Post>) -> Self {
        Collection { posts }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn into_posts(self) -> Vec<Post> {
        self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// First post carrying `id`, if any
    pub fn find_by_id(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// Id for the next insert: one past the current maximum, or 1 when empty.
    ///
    /// This is not a persistent counter. Deleting the post holding the
    /// maximum id makes that id available again. Fails with `IdsExhausted`
    /// when the maximum is already `u64::MAX`.
    pub fn next_id(&self) -> Result<u64> {
        match self.posts.iter().map(|post| post.id).max() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or(Error::IdsExhausted(max)),
        }
    }

    /// Append a new post with a fresh id and zero likes.
    ///
    /// Fields are taken as-is; empty strings are accepted. The collection is
    /// left untouched if no id can be assigned.
    pub fn insert(&mut self, author: String, title: String, content: String) -> Result<Post> {
        let post = Post::new(self.next_id()?, author, title, content);
        self.posts.push(post.clone());
        Ok(post)
    }

    /// Replace title and content of post `id`, leaving author and likes alone
    pub fn update(&mut self, id: u64, title: String, content: String) -> Result<()> {
        let post = self
            .posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or(Error::NotFound(id))?;

        post.title = title;
        post.content = content;
        Ok(())
    }

    /// Remove every post with `id`. Returns how many were removed (0 is fine).
    pub fn delete(&mut self, id: u64) -> usize {
        let before = self.posts.len();
        self.posts.retain(|post| post.id != id);
        before - self.posts.len()
    }

    /// Like the first post with `id` and stop there.
    ///
    /// Returns the new like count, or `None` (collection untouched) when no
    /// post matches.
    pub fn increment_like(&mut self, id: u64) -> Option<u64> {
        self.posts
            .iter_mut()
            .find(|post| post.id == id)
            .map(Post::like)
    }
}
