use async_trait::async_trait;

use crate::domain::{PageWindow, Post, PostId};
use crate::error::RepoError;

/// Generic repository trait for the operations every table supports.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID. `Ok(None)` means no such row.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Count every row.
    async fn count(&self) -> Result<u64, RepoError>;

    /// Delete an entity by its ID. Fails with [`RepoError::NotFound`] when
    /// nothing was deleted.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository.
///
/// Listings are ordered newest `published_at` first, unpublished posts
/// last, ties broken by descending id.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, PostId> {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError>;

    async fn find_page(&self, window: PageWindow) -> Result<Vec<Post>, RepoError>;

    /// Insert a new row and return the store-assigned id.
    async fn insert(&self, post: &Post) -> Result<PostId, RepoError>;

    /// Overwrite the row with the given id, returning rows affected.
    async fn update(&self, id: PostId, post: &Post) -> Result<u64, RepoError>;
}
