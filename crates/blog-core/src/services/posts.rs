use std::sync::Arc;

use crate::domain::{PageWindow, Paginator, Post, PostColumn, PostId};
use crate::error::{DomainError, RepoError};
use crate::ports::PostRepository;

const ENTITY: &str = "post";

/// One page of the post listing together with its pagination state.
#[derive(Debug, Clone)]
pub struct PostListing {
    pub posts: Vec<Post>,
    pub total: u64,
    pub paginator: Paginator,
}

/// Post operations. Writes are gated on [`Post::validate`].
#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    /// Every post, newest first.
    pub async fn get_all(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.repo.find_all().await?)
    }

    /// At most `limit` posts starting at `offset`, newest first.
    pub async fn get_page(&self, limit: i64, offset: i64) -> Result<Vec<Post>, DomainError> {
        let window = PageWindow::new(limit, offset)?;
        self.get_window(window).await
    }

    async fn get_window(&self, window: PageWindow) -> Result<Vec<Post>, DomainError> {
        if window.limit() == 0 {
            return Ok(Vec::new());
        }
        Ok(self.repo.find_page(window).await?)
    }

    /// A numbered page of the listing, sized `per_page`.
    pub async fn list(&self, page: i64, per_page: i64) -> Result<PostListing, DomainError> {
        let total = self.get_total().await?;
        let paginator = Paginator::new(page, per_page, total)?;
        let posts = if paginator.is_past_end() {
            Vec::new()
        } else {
            self.get_window(paginator.window()).await?
        };

        Ok(PostListing {
            posts,
            total,
            paginator,
        })
    }

    /// Look a post up by id, populating only `columns`.
    ///
    /// `Ok(None)` means the row does not exist; store failures are errors.
    pub async fn get_post_by_id(
        &self,
        id: PostId,
        columns: &[PostColumn],
    ) -> Result<Option<Post>, DomainError> {
        let post = self.repo.find_by_id(id).await?;

        Ok(post.map(|post| {
            if columns == PostColumn::ALL {
                post
            } else {
                post.project(columns)
            }
        }))
    }

    pub async fn get_total(&self) -> Result<u64, DomainError> {
        Ok(self.repo.count().await?)
    }

    /// Validate and insert, assigning the new id onto `post`.
    pub async fn create(&self, post: &mut Post) -> Result<(), DomainError> {
        if let Some(id) = post.id {
            return Err(DomainError::AlreadySaved(id));
        }
        if !post.validate() {
            tracing::debug!(errors = ?post.errors, "Rejected post create");
            return Err(DomainError::Validation(post.errors.clone()));
        }

        let id = self.repo.insert(post).await?;
        post.id = Some(id);

        tracing::info!(post_id = id, "Post created");
        Ok(())
    }

    /// Validate and overwrite the stored row.
    ///
    /// Updating an id with no row is not an error.
    pub async fn update(&self, post: &mut Post) -> Result<(), DomainError> {
        let id = post.id.ok_or(DomainError::MissingId)?;
        if !post.validate() {
            tracing::debug!(post_id = id, errors = ?post.errors, "Rejected post update");
            return Err(DomainError::Validation(post.errors.clone()));
        }

        let rows = self.repo.update(id, post).await?;
        if rows == 0 {
            tracing::debug!(post_id = id, "Update matched no rows");
        }

        Ok(())
    }

    /// Delete the stored row. A missing row is [`DomainError::NotFound`].
    pub async fn delete(&self, post: &Post) -> Result<(), DomainError> {
        let id = post.id.ok_or(DomainError::MissingId)?;

        match self.repo.delete(id).await {
            Ok(()) => {
                tracing::info!(post_id = id, "Post deleted");
                Ok(())
            }
            Err(RepoError::NotFound) => Err(DomainError::NotFound {
                entity_type: ENTITY,
                id,
            }),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::ValidationError;
    use crate::ports::BaseRepository;

    /// Records every store call; answers from a fixed row set.
    #[derive(Default)]
    struct RecordingRepository {
        calls: Mutex<Vec<&'static str>>,
        rows: Vec<Post>,
        fail: bool,
    }

    impl RecordingRepository {
        fn record(&self, call: &'static str) -> Result<(), RepoError> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                return Err(RepoError::Query("connection reset".to_string()));
            }
            Ok(())
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BaseRepository<Post, PostId> for RecordingRepository {
        async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
            self.record("find_by_id")?;
            Ok(self.rows.iter().find(|p| p.id == Some(id)).cloned())
        }

        async fn count(&self) -> Result<u64, RepoError> {
            self.record("count")?;
            Ok(self.rows.len() as u64)
        }

        async fn delete(&self, id: PostId) -> Result<(), RepoError> {
            self.record("delete")?;
            if self.rows.iter().any(|p| p.id == Some(id)) {
                Ok(())
            } else {
                Err(RepoError::NotFound)
            }
        }
    }

    #[async_trait]
    impl PostRepository for RecordingRepository {
        async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
            self.record("find_all")?;
            Ok(self.rows.clone())
        }

        async fn find_page(&self, window: PageWindow) -> Result<Vec<Post>, RepoError> {
            self.record("find_page")?;
            Ok(self
                .rows
                .iter()
                .skip(window.offset() as usize)
                .take(window.limit() as usize)
                .cloned()
                .collect())
        }

        async fn insert(&self, _post: &Post) -> Result<PostId, RepoError> {
            self.record("insert")?;
            Ok(42)
        }

        async fn update(&self, _id: PostId, _post: &Post) -> Result<u64, RepoError> {
            self.record("update")?;
            Ok(0)
        }
    }

    fn saved(id: PostId, title: &str) -> Post {
        let mut post = Post::new(title, "Body", "2024-01-01 00:00:00");
        post.id = Some(id);
        post
    }

    fn build(repo: RecordingRepository) -> (PostService, Arc<RecordingRepository>) {
        let repo = Arc::new(repo);
        (PostService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_post_without_store_access() {
        let (service, repo) = build(RecordingRepository::default());
        let mut post = Post::new("", "", "");

        let err = service.create(&mut post).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(ref e) if e.len() == 2));
        assert_eq!(
            post.errors,
            vec![ValidationError::TitleRequired, ValidationError::ContentRequired]
        );
        assert_eq!(post.id, None);
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_post_without_store_access() {
        let (service, repo) = build(RecordingRepository::default());
        let mut post = saved(3, "Title");
        post.content.clear();

        let err = service.update(&mut post).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(post.errors, vec![ValidationError::ContentRequired]);
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_store_id() {
        let (service, repo) = build(RecordingRepository::default());
        let mut post = Post::new("A", "B", "");

        service.create(&mut post).await.unwrap();

        assert_eq!(post.id, Some(42));
        assert_eq!(repo.calls(), vec!["insert"]);
    }

    #[tokio::test]
    async fn test_create_refuses_already_saved_post() {
        let (service, repo) = build(RecordingRepository::default());
        let mut post = saved(5, "Title");

        let err = service.create(&mut post).await.unwrap_err();

        assert!(matches!(err, DomainError::AlreadySaved(5)));
        assert_eq!(post.id, Some(5));
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_of_missing_row_succeeds() {
        let (service, _repo) = build(RecordingRepository::default());
        let mut post = saved(99, "Title");

        assert!(service.update(&mut post).await.is_ok());
    }

    #[tokio::test]
    async fn test_unsaved_post_cannot_be_updated_or_deleted() {
        let (service, repo) = build(RecordingRepository::default());
        let mut post = Post::new("A", "B", "");

        assert!(matches!(
            service.update(&mut post).await,
            Err(DomainError::MissingId)
        ));
        assert!(matches!(
            service.delete(&post).await,
            Err(DomainError::MissingId)
        ));
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_not_found() {
        let (service, _repo) = build(RecordingRepository::default());

        let err = service.delete(&saved(404, "Gone")).await.unwrap_err();

        assert!(matches!(
            err,
            DomainError::NotFound {
                entity_type: "post",
                id: 404
            }
        ));
    }

    #[tokio::test]
    async fn test_get_page_rejects_negative_bounds() {
        let (service, repo) = build(RecordingRepository::default());

        assert!(matches!(
            service.get_page(-1, 0).await,
            Err(DomainError::InvalidPage(_))
        ));
        assert!(matches!(
            service.get_page(2, -1).await,
            Err(DomainError::InvalidPage(_))
        ));
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn test_get_page_with_zero_limit_is_empty() {
        let (service, repo) = build(RecordingRepository {
            rows: vec![saved(1, "One")],
            ..Default::default()
        });

        assert!(service.get_page(0, 0).await.unwrap().is_empty());
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_row_and_store_failure_are_distinct() {
        let (service, _repo) = build(RecordingRepository::default());
        assert!(service.get_post_by_id(1, PostColumn::ALL).await.unwrap().is_none());

        let (failing, _repo) = build(RecordingRepository {
            fail: true,
            ..Default::default()
        });
        assert!(matches!(
            failing.get_post_by_id(1, PostColumn::ALL).await,
            Err(DomainError::Repo(RepoError::Query(_)))
        ));
    }

    #[tokio::test]
    async fn test_get_post_by_id_projects_columns() {
        let (service, _repo) = build(RecordingRepository {
            rows: vec![saved(1, "One")],
            ..Default::default()
        });

        let post = service
            .get_post_by_id(1, &[PostColumn::Title])
            .await
            .unwrap()
            .unwrap();

        assert_eq!(post.title, "One");
        assert_eq!(post.id, None);
        assert!(post.content.is_empty());
        assert_eq!(post.published_at, None);
    }

    #[tokio::test]
    async fn test_list_combines_total_and_page() {
        let rows = (1..=5).map(|i| saved(i, "Post")).collect();
        let (service, repo) = build(RecordingRepository {
            rows,
            ..Default::default()
        });

        let listing = service.list(2, 2).await.unwrap();

        assert_eq!(listing.total, 5);
        assert_eq!(listing.posts.len(), 2);
        assert_eq!(listing.posts[0].id, Some(3));
        assert_eq!(listing.paginator.previous, Some(1));
        assert_eq!(listing.paginator.next, Some(3));
        assert_eq!(repo.calls(), vec!["count", "find_page"]);
    }

    #[tokio::test]
    async fn test_list_rejects_page_beyond_bigint_offset() {
        let (service, repo) = build(RecordingRepository {
            rows: vec![saved(1, "One")],
            ..Default::default()
        });

        assert!(matches!(
            service.list(i64::MAX, 4).await,
            Err(DomainError::InvalidPage(_))
        ));
        assert_eq!(repo.calls(), vec!["count"]);
    }

    #[tokio::test]
    async fn test_list_past_last_page_skips_store_query() {
        let rows = (1..=3).map(|i| saved(i, "Post")).collect();
        let (service, repo) = build(RecordingRepository {
            rows,
            ..Default::default()
        });

        let listing = service.list(7, 2).await.unwrap();

        assert!(listing.posts.is_empty());
        assert_eq!(listing.total, 3);
        assert_eq!(listing.paginator.next, None);
        assert_eq!(listing.paginator.previous, Some(6));
        assert_eq!(repo.calls(), vec!["count"]);
    }
}
