//! In-memory post repository - used when no database is configured.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::domain::{PageWindow, Post, PostId};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository};

#[derive(Default)]
struct Rows {
    posts: BTreeMap<PostId, Post>,
    last_id: PostId,
}

/// Post repository backed by a map behind an async RwLock.
///
/// Ids are assigned sequentially from 1 and never reused.
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryPostRepository {
    rows: RwLock<Rows>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn sorted(&self) -> Vec<Post> {
        let rows = self.rows.read().await;
        let mut posts: Vec<Post> = rows.posts.values().cloned().collect();
        posts.sort_by(newest_first);
        posts
    }
}

fn newest_first(a: &Post, b: &Post) -> Ordering {
    let a_at = a.published_timestamp().ok().flatten();
    let b_at = b.published_timestamp().ok().flatten();

    let by_date = match (a_at, b_at) {
        (Some(a_at), Some(b_at)) => b_at.cmp(&a_at),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_date.then_with(|| b.id.cmp(&a.id))
}

#[async_trait]
impl BaseRepository<Post, PostId> for InMemoryPostRepository {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.posts.get(&id).cloned())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.posts.len() as u64)
    }

    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        let mut rows = self.rows.write().await;
        rows.posts.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.sorted().await)
    }

    async fn find_page(&self, window: PageWindow) -> Result<Vec<Post>, RepoError> {
        let offset = usize::try_from(window.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit()).unwrap_or(usize::MAX);

        Ok(self.sorted().await.into_iter().skip(offset).take(limit).collect())
    }

    async fn insert(&self, post: &Post) -> Result<PostId, RepoError> {
        let mut rows = self.rows.write().await;
        rows.last_id += 1;
        let id = rows.last_id;

        let stored = Post {
            id: Some(id),
            published_at: post.publication().map(str::to_owned),
            errors: Vec::new(),
            ..post.clone()
        };
        rows.posts.insert(id, stored);

        Ok(id)
    }

    async fn update(&self, id: PostId, post: &Post) -> Result<u64, RepoError> {
        let mut rows = self.rows.write().await;
        let Some(stored) = rows.posts.get_mut(&id) else {
            return Ok(0);
        };

        stored.title = post.title.clone();
        stored.content = post.content.clone();
        stored.published_at = post.publication().map(str::to_owned);

        Ok(1)
    }
}
