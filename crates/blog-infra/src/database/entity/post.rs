//! Post entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use blog_core::domain::{Post, ValidationError, format_published_at};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub published_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for Post {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            title: model.title,
            content: model.content,
            published_at: model.published_at.as_ref().map(format_published_at),
            errors: Vec::new(),
        }
    }
}

/// Column values of a Domain Post, leaving the id for the store to assign.
///
/// An unpublished post is written as `NULL`.
impl TryFrom<&Post> for ActiveModel {
    type Error = ValidationError;

    fn try_from(post: &Post) -> Result<Self, Self::Error> {
        Ok(Self {
            id: NotSet,
            title: Set(post.title.clone()),
            content: Set(post.content.clone()),
            published_at: Set(post.published_timestamp()?),
        })
    }
}
