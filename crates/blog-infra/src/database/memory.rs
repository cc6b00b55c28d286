//! In-memory post store - used when no database is configured, and by the test harness.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{NewPost, Post, PostPatch};
use blog_core::error::RepoError;
use blog_core::ports::PostStore;

/// In-memory post store using a `BTreeMap` with async RwLock.
///
/// Keys are post ids, so the first entry is always the lowest id.
/// Note: Data is lost on process restart.
pub struct InMemoryPostStore {
    posts: RwLock<BTreeMap<Uuid, Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn insert_many(&self, posts: Vec<Post>) -> Result<usize, RepoError> {
        let mut store = self.posts.write().await;

        // All or nothing, like a single multi-row INSERT.
        for (i, post) in posts.iter().enumerate() {
            if store.contains_key(&post.id) || posts[..i].iter().any(|p| p.id == post.id) {
                return Err(RepoError::Constraint(format!(
                    "Post {} already exists",
                    post.id
                )));
            }
        }

        let inserted = posts.len();
        store.extend(posts.into_iter().map(|post| (post.id, post)));

        tracing::debug!(inserted, "Inserted posts");
        Ok(inserted)
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let store = self.posts.read().await;
        let mut posts: Vec<Post> = store.values().cloned().collect();
        posts.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(posts)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let store = self.posts.read().await;
        Ok(store.get(&id).cloned())
    }

    async fn find_one(&self) -> Result<Option<Post>, RepoError> {
        let store = self.posts.read().await;
        Ok(store.values().next().cloned())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        let store = self.posts.read().await;
        Ok(store.len() as u64)
    }

    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let mut store = self.posts.write().await;

        let mut post = Post::new(new_post);
        while store.contains_key(&post.id) {
            post.id = Uuid::new_v4();
        }
        store.insert(post.id, post.clone());

        tracing::debug!(post_id = %post.id, "Created post");
        Ok(post)
    }

    async fn update_by_id(&self, id: Uuid, patch: PostPatch) -> Result<(), RepoError> {
        let mut store = self.posts.write().await;
        let post = store.get_mut(&id).ok_or(RepoError::NotFound)?;
        patch.apply(post);
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut store = self.posts.write().await;
        Ok(store.remove(&id).is_some())
    }

    async fn drop_all(&self) -> Result<(), RepoError> {
        let mut store = self.posts.write().await;
        store.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use blog_core::domain::Author;

    use super::*;

    fn new_post(title: &str, content: &str) -> NewPost {
        let author = Author::new("Jason", "Vance").unwrap();
        NewPost::new(&author, title, content).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find_by_id() {
        let store = InMemoryPostStore::new();
        let created = store.create(new_post("Title", "Content")).await.unwrap();

        let found = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.author_name, "Jason Vance");
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_one_picks_lowest_id() {
        let store = InMemoryPostStore::new();
        let posts: Vec<Post> = (0..5)
            .map(|i| Post::new(new_post(&format!("Post {i}"), "")))
            .collect();
        let lowest = posts.iter().map(|p| p.id).min().unwrap();

        assert_eq!(store.insert_many(posts).await.unwrap(), 5);
        assert_eq!(store.find_one().await.unwrap().unwrap().id, lowest);
    }

    #[tokio::test]
    async fn test_insert_many_rejects_duplicate_ids() {
        let store = InMemoryPostStore::new();
        let post = Post::new(new_post("Title", "Content"));

        store.insert_many(vec![post.clone()]).await.unwrap();
        let result = store.insert_many(vec![post]).await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let store = InMemoryPostStore::new();
        let result = store
            .update_by_id(Uuid::new_v4(), PostPatch::default().with_content("x"))
            .await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryPostStore::new();
        let created = store.create(new_post("Title", "Content")).await.unwrap();

        assert!(store.delete_by_id(created.id).await.unwrap());
        assert!(!store.delete_by_id(created.id).await.unwrap());
        assert!(store.find_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_is_oldest_first() {
        let store = InMemoryPostStore::new();
        let first = store.create(new_post("First", "")).await.unwrap();
        let second = store.create(new_post("Second", "")).await.unwrap();

        let all = store.find_all().await.unwrap();
        let ids: Vec<Uuid> = all.iter().map(|p| p.id).collect();
        if first.created == second.created {
            let mut expected = vec![first.id, second.id];
            expected.sort();
            assert_eq!(ids, expected);
        } else {
            assert_eq!(ids, vec![first.id, second.id]);
        }
    }

    #[tokio::test]
    async fn test_drop_all_clears_store() {
        let store = InMemoryPostStore::new();
        store.create(new_post("Title", "Content")).await.unwrap();
        store.drop_all().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.find_one().await.unwrap().is_none());
    }
}
