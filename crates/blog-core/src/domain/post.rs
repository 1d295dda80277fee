use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use super::validation::{ValidationError, parse_published_at};

/// Store-assigned post identifier.
pub type PostId = i64;

/// Post entity - a piece of writing for publication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// `None` until the store assigns an id on create.
    pub id: Option<PostId>,
    pub title: String,
    pub content: String,
    /// Publication time as `YYYY-MM-DD HH:MM:SS`; `None` means unpublished.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub published_at: Option<String>,
    /// Messages from the most recent validation.
    #[serde(skip)]
    pub errors: Vec<ValidationError>,
}

impl Post {
    /// Create an unsaved post. An empty `published_at` means unpublished.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        published_at: impl Into<String>,
    ) -> Self {
        let published_at = published_at.into();
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            published_at: (!published_at.is_empty()).then_some(published_at),
            errors: Vec::new(),
        }
    }

    /// The publication time, treating an empty string the same as absent.
    pub fn publication(&self) -> Option<&str> {
        self.published_at.as_deref().filter(|s| !s.is_empty())
    }

    /// Parsed publication time for the store boundary.
    pub fn published_timestamp(&self) -> Result<Option<NaiveDateTime>, ValidationError> {
        match self.publication() {
            None => Ok(None),
            Some(raw) => parse_published_at(raw)
                .map(Some)
                .ok_or(ValidationError::InvalidPublishedAt),
        }
    }

    /// Check the in-memory fields, replacing `errors` with what failed.
    pub fn validate(&mut self) -> bool {
        self.errors.clear();

        if self.title.is_empty() {
            self.errors.push(ValidationError::TitleRequired);
        }
        if self.content.is_empty() {
            self.errors.push(ValidationError::ContentRequired);
        }
        if self.published_timestamp().is_err() {
            self.errors.push(ValidationError::InvalidPublishedAt);
        }

        self.errors.is_empty()
    }

    /// Keep only the requested columns, resetting everything else to defaults.
    pub fn project(self, columns: &[PostColumn]) -> Self {
        let wants = |column: PostColumn| columns.contains(&column);
        Self {
            id: if wants(PostColumn::Id) { self.id } else { None },
            title: if wants(PostColumn::Title) {
                self.title
            } else {
                String::new()
            },
            content: if wants(PostColumn::Content) {
                self.content
            } else {
                String::new()
            },
            published_at: if wants(PostColumn::PublishedAt) {
                self.published_at
            } else {
                None
            },
            errors: Vec::new(),
        }
    }
}

/// A selectable column of the `post` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostColumn {
    Id,
    Title,
    Content,
    PublishedAt,
}

impl PostColumn {
    /// Every column, the equivalent of `SELECT *`.
    pub const ALL: &'static [PostColumn] = &[
        PostColumn::Id,
        PostColumn::Title,
        PostColumn::Content,
        PostColumn::PublishedAt,
    ];
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
