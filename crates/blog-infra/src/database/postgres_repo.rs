//! PostgreSQL post repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};

use blog_core::domain::{PageWindow, Post, PostId};
use blog_core::error::RepoError;
use blog_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, repo_error};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// Newest first, unpublished rows last, ties by descending id.
fn newest_first() -> Select<PostEntity> {
    PostEntity::find()
        .order_by_asc(post::Column::PublishedAt.is_null())
        .order_by_desc(post::Column::PublishedAt)
        .order_by_desc(post::Column::Id)
}

fn active_model(post: &Post) -> Result<post::ActiveModel, RepoError> {
    post::ActiveModel::try_from(post).map_err(|e| RepoError::Constraint(e.to_string()))
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let rows = newest_first().all(&self.db).await.map_err(repo_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_page(&self, window: PageWindow) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(
            limit = window.limit(),
            offset = window.offset(),
            "Fetching post page"
        );

        let rows = newest_first()
            .limit(window.limit())
            .offset(window.offset())
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, post: &Post) -> Result<PostId, RepoError> {
        let model = active_model(post)?
            .insert(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(model.id)
    }

    async fn update(&self, id: PostId, post: &Post) -> Result<u64, RepoError> {
        let result = PostEntity::update_many()
            .set(active_model(post)?)
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.rows_affected)
    }
}
