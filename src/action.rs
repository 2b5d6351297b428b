use crate::error::{Error, Result};
use crate::posts::{Collection, Post};
use crate::storage::Storage;
use log::{info, warn};

/// One request-level operation on the post collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Fetch every post for display
    List,

    /// Append a new post; the id is assigned here, never by the caller
    Create {
        author: String,
        title: String,
        content: String,
    },

    /// Fetch one post to pre-fill the edit form
    ShowUpdateForm { id: u64 },

    /// Replace title and content of an existing post
    SubmitUpdate {
        id: u64,
        title: String,
        content: String,
    },

    /// Remove a post; unknown ids are fine
    Delete { id: u64 },

    /// Add one like; unknown ids are fine
    Like { id: u64 },
}

/// What the caller should show after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Full collection, in stored order
    Listing(Vec<Post>),

    /// Existing post for the edit form
    Form(Post),

    /// Post appended; callers treat this like `Redirect`
    Created(Post),

    /// Done, go back to the listing
    Redirect,

    /// Referenced post does not exist (update paths only)
    NotFound(u64),
}

/// Run one load → mutate → save cycle against `storage`.
///
/// Storage failures propagate untouched. A missing post is only reported on
/// the two update paths; delete and like treat it as success.
pub fn handle<S: Storage + ?Sized>(storage: &S, action: Action) -> Result<Outcome> {
    let mut posts = storage.load()?;

    match action {
        Action::List => Ok(Outcome::Listing(posts.into_posts())),

        Action::Create {
            author,
            title,
            content,
        } => {
            let post = posts.insert(author, title, content)?;
            storage.save(&posts)?;
            info!("Created post {} by {}", post.id, post.author);
            Ok(Outcome::Created(post))
        }

        Action::ShowUpdateForm { id } => match posts.find_by_id(id) {
            Some(post) => Ok(Outcome::Form(post.clone())),
            None => {
                warn!("Post {} not found for edit form", id);
                Ok(Outcome::NotFound(id))
            }
        },

        Action::SubmitUpdate { id, title, content } => {
            apply_update(storage, &mut posts, id, title, content)
        }

        Action::Delete { id } => {
            let removed = posts.delete(id);
            storage.save(&posts)?;
            info!("Deleted post {} ({} removed)", id, removed);
            Ok(Outcome::Redirect)
        }

        Action::Like { id } => {
            match posts.increment_like(id) {
                Some(likes) => info!("Post {} now has {} likes", id, likes),
                None => info!("Ignoring like for unknown post {}", id),
            }
            storage.save(&posts)?;
            Ok(Outcome::Redirect)
        }
    }
}

fn apply_update<S: Storage + ?Sized>(
    storage: &S,
    posts: &mut Collection,
    id: u64,
    title: String,
    content: String,
) -> Result<Outcome> {
    match posts.update(id, title, content) {
        Ok(()) => {
            storage.save(posts)?;
            info!("Updated post {}", id);
            Ok(Outcome::Redirect)
        }
        Err(Error::NotFound(id)) => {
            warn!("Post {} not found for update", id);
            Ok(Outcome::NotFound(id))
        }
        Err(e) => Err(e),
    }
}
