use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewPost, Post, PostPatch};
use crate::error::RepoError;

/// Post store - persistence over post records keyed by id.
///
/// Implementations must keep `find_all` ordered by `created` then `id`,
/// and `find_one` must always pick the record with the lowest id.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert already-built records as-is. Returns how many were inserted.
    async fn insert_many(&self, posts: Vec<Post>) -> Result<usize, RepoError>;

    /// All posts, oldest first.
    async fn find_all(&self) -> Result<Vec<Post>, RepoError>;

    /// Find a post by its unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// The post with the lowest id, if any.
    async fn find_one(&self) -> Result<Option<Post>, RepoError>;

    async fn count(&self) -> Result<u64, RepoError>;

    /// Persist a new post, assigning its id and creation time.
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError>;

    /// Apply a partial update. Fails with [`RepoError::NotFound`] for an unknown id.
    async fn update_by_id(&self, id: Uuid, patch: PostPatch) -> Result<(), RepoError>;

    /// Delete a post. Unknown ids are a no-op; returns whether a record was removed.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, RepoError>;

    /// Remove every post.
    async fn drop_all(&self) -> Result<(), RepoError>;
}
